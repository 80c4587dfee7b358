// src/session/runner.rs

//! Timer that fires one cycle per period.
//!
//! The first cycle starts one full period after `start()`.  Ticks are never
//! skipped because an earlier cycle is still waiting on the backend: each tick
//! spawns its own cycle task, so several may be in flight and the board's
//! `OrderingPolicy` decides which result stays on screen.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use log::Level;
use tokio::{
    sync::{oneshot, watch},
    task::{JoinHandle, JoinSet},
    time::{self, Instant, MissedTickBehavior},
};

use super::{
    cycle::{self, CycleReport},
    state::{StateBoard, VerificationState},
};
use crate::{
    bioguard_log,
    capture::FrameSource,
    config::LoopConfig,
    service::VerificationService,
};

/// Owns the collaborators and the displayed state. Cheap to clone.
#[derive(Clone)]
pub struct VerificationLoop {
    source: Arc<dyn FrameSource>,
    service: Arc<dyn VerificationService>,
    board: Arc<StateBoard>,
    next_sequence: Arc<AtomicU64>,
    cfg: LoopConfig,
}

impl VerificationLoop {
    pub fn new(
        source: Arc<dyn FrameSource>,
        service: Arc<dyn VerificationService>,
        cfg: LoopConfig,
    ) -> Self {
        Self {
            source,
            service,
            board: Arc::new(StateBoard::new(cfg.policy)),
            next_sequence: Arc::new(AtomicU64::new(0)),
            cfg,
        }
    }

    pub fn state(&self) -> VerificationState {
        self.board.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<VerificationState> {
        self.board.subscribe()
    }

    /// Run one cycle now, outside the timer.
    pub async fn run_cycle(&self) -> CycleReport {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        cycle::run_cycle(sequence, self.source.as_ref(), self.service.as_ref(), &self.board).await
    }

    /// Start ticking. The timer lives until the handle is stopped or dropped.
    pub fn start(&self) -> LoopHandle {
        let (stop_tx, stop_rx) = oneshot::channel();
        let timer = tokio::spawn(self.clone().drive(stop_rx));
        bioguard_log!(
            Level::Info,
            "loop",
            "Started: {} → {} every {:?} ({:?})",
            self.source.name(),
            self.service.name(),
            self.cfg.period,
            self.cfg.policy
        );
        LoopHandle { stop_tx: Some(stop_tx), timer: Some(timer) }
    }

    async fn drive(self, mut stop_rx: oneshot::Receiver<()>) {
        let period = self.cfg.period;
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cycles: JoinSet<CycleReport> = JoinSet::new();

        loop {
            tokio::select! {
                _ = &mut stop_rx => break,
                _ = ticker.tick() => {
                    let this = self.clone();
                    cycles.spawn(async move { this.run_cycle().await });
                    if cycles.len() > 1 {
                        bioguard_log!(Level::Debug, "loop", "{} cycles in flight", cycles.len());
                    }
                }
                Some(joined) = cycles.join_next(), if !cycles.is_empty() => {
                    match joined {
                        Ok(report) => bioguard_log!(
                            Level::Trace, "loop", "#{} finished as {} in {:?}",
                            report.sequence, report.phase.as_str(), report.elapsed
                        ),
                        Err(e) => bioguard_log!(Level::Error, "loop", "cycle task failed: {}", e),
                    }
                }
            }
        }

        self.drain(cycles).await;
    }

    /// Give in-flight cycles up to the grace period, then abort the rest.
    async fn drain(&self, mut cycles: JoinSet<CycleReport>) {
        if cycles.is_empty() {
            return;
        }
        let pending = cycles.len();
        let grace = self.cfg.shutdown_grace;
        let finished = time::timeout(grace, async {
            while cycles.join_next().await.is_some() {}
        })
        .await;

        if finished.is_err() {
            bioguard_log!(
                Level::Warn,
                "loop",
                "Aborting {} of {} cycle(s) still in flight after {:?}",
                cycles.len(),
                pending,
                grace
            );
            cycles.shutdown().await;
        }
    }
}

/// Scoped lifetime of a started loop. Dropping it cancels the timer and any
/// cycle still in flight.
pub struct LoopHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    timer: Option<JoinHandle<()>>,
}

impl LoopHandle {
    /// Stop ticking and wait (within the grace period) for in-flight cycles.
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(timer) = self.timer.take() {
            if let Err(e) = timer.await {
                bioguard_log!(Level::Error, "loop", "timer task failed: {}", e);
            }
        }
        bioguard_log!(Level::Info, "loop", "Stopped");
    }

    pub fn is_running(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for LoopHandle {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
