// tests/common/mod.rs
//
// Scripted stand-ins for the camera and the backend.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::oneshot;

use bioguard::capture::{CaptureError, Frame, FrameSource};
use bioguard::service::{ServiceError, Verdict, VerificationService};

/// Hands out `frame-1`, `frame-2`, ... or nothing at all.
pub struct CountingSource {
    pub snapshots: AtomicUsize,
    ready: AtomicBool,
}

impl CountingSource {
    pub fn ready() -> Arc<Self> {
        Arc::new(Self { snapshots: AtomicUsize::new(0), ready: AtomicBool::new(true) })
    }

    pub fn not_ready() -> Arc<Self> {
        Arc::new(Self { snapshots: AtomicUsize::new(0), ready: AtomicBool::new(false) })
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.snapshots.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FrameSource for CountingSource {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn snapshot(&self) -> Result<Option<Frame>, CaptureError> {
        let n = self.snapshots.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.ready.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(Some(Frame::new(format!("frame-{n}").into_bytes())))
    }
}

/// What the scripted backend should answer.
#[derive(Clone)]
pub enum Reply {
    Match(&'static str),
    NoMatch,
    Down,
}

impl Reply {
    fn into_result(self) -> Result<Verdict, ServiceError> {
        match self {
            Reply::Match(user) => Ok(Verdict::Match { user: user.into(), confidence: None }),
            Reply::NoMatch => Ok(Verdict::NoMatch { status: "failure".into(), message: None }),
            Reply::Down => Err(ServiceError::Status(502)),
        }
    }
}

/// Answers every request with the current reply.
pub struct ScriptedService {
    reply: Mutex<Reply>,
    pub calls: AtomicUsize,
}

impl ScriptedService {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self { reply: Mutex::new(reply), calls: AtomicUsize::new(0) })
    }

    pub fn set(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VerificationService for ScriptedService {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn verify(&self, _frame: Frame) -> Result<Verdict, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.lock().unwrap().clone().into_result()
    }
}

/// Holds each request until the test releases the gate for its frame.
#[derive(Default)]
pub struct GatedService {
    gates: Mutex<HashMap<Vec<u8>, oneshot::Receiver<Reply>>>,
}

impl GatedService {
    /// Register a gate for `frame` and return the key that opens it.
    pub fn gate(&self, frame: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(frame.as_bytes().to_vec(), rx);
        tx
    }
}

#[async_trait]
impl VerificationService for GatedService {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn verify(&self, frame: Frame) -> Result<Verdict, ServiceError> {
        let gate = self.gates.lock().unwrap().remove(&frame.bytes);
        match gate {
            Some(rx) => rx.await.unwrap_or(Reply::Down).into_result(),
            None => Reply::Down.into_result(),
        }
    }
}

/// Answers with the frame's own text after a per-call delay: the first call
/// takes `first`, every later one `rest`.
pub struct SlowService {
    first: Duration,
    rest: Duration,
    pub calls: AtomicUsize,
}

impl SlowService {
    pub fn new(first: Duration, rest: Duration) -> Arc<Self> {
        Arc::new(Self { first, rest, calls: AtomicUsize::new(0) })
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VerificationService for SlowService {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn verify(&self, frame: Frame) -> Result<Verdict, ServiceError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(if n == 0 { self.first } else { self.rest }).await;
        let user = String::from_utf8_lossy(&frame.bytes).into_owned();
        Ok(Verdict::Match { user, confidence: None })
    }
}
