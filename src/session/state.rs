// src/session/state.rs

//! The displayed verification state and the board that owns it.
//!
//! `VerificationState` is an immutable value.  Cycles never edit it in place:
//! they build a new one and hand it to the `StateBoard`, which swaps it in as a
//! whole (or refuses it, see `OrderingPolicy`).  Watchers get every accepted
//! value through a `tokio::sync::watch` channel.

use std::fmt;

use tokio::sync::watch;

use crate::config::OrderingPolicy;
use crate::service::{ServiceError, Verdict};

pub const SCANNING: &str = "SCANNING...";
pub const UNKNOWN: &str = "UNKNOWN";
pub const OFFLINE: &str = "OFFLINE (Check Backend)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityLabel {
    Scanning,
    Unknown,
    Offline,
    Subject(String),
}

impl fmt::Display for IdentityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityLabel::Scanning => f.write_str(SCANNING),
            IdentityLabel::Unknown => f.write_str(UNKNOWN),
            IdentityLabel::Offline => f.write_str(OFFLINE),
            IdentityLabel::Subject(name) => f.write_str(name),
        }
    }
}

/// What the operator sees. `is_match` holds iff the label is a subject.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationState {
    identity_label: IdentityLabel,
    confidence: Option<f64>,
    sequence: u64,
}

impl VerificationState {
    /// State at mount, before any cycle completed.
    pub fn scanning() -> Self {
        Self { identity_label: IdentityLabel::Scanning, confidence: None, sequence: 0 }
    }

    pub fn matched(sequence: u64, user: String, confidence: Option<f64>) -> Self {
        Self { identity_label: IdentityLabel::Subject(user), confidence, sequence }
    }

    pub fn unmatched(sequence: u64) -> Self {
        Self { identity_label: IdentityLabel::Unknown, confidence: None, sequence }
    }

    pub fn unreachable(sequence: u64) -> Self {
        Self { identity_label: IdentityLabel::Offline, confidence: None, sequence }
    }

    /// Map the result of one verification call onto the next state.
    pub fn from_outcome(sequence: u64, outcome: &Result<Verdict, ServiceError>) -> Self {
        match outcome {
            Ok(Verdict::Match { user, confidence }) => {
                Self::matched(sequence, user.clone(), *confidence)
            }
            Ok(Verdict::NoMatch { .. }) => Self::unmatched(sequence),
            Err(_) => Self::unreachable(sequence),
        }
    }

    pub fn identity_label(&self) -> &IdentityLabel {
        &self.identity_label
    }

    pub fn is_match(&self) -> bool {
        matches!(self.identity_label, IdentityLabel::Subject(_))
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    /// Sequence number of the cycle that produced this state (0 = initial).
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Same label and confidence, regardless of which cycle produced it.
    pub fn same_display(&self, other: &Self) -> bool {
        self.identity_label == other.identity_label && self.confidence == other.confidence
    }
}

impl Default for VerificationState {
    fn default() -> Self {
        Self::scanning()
    }
}

/// Single owner of the displayed state.
pub struct StateBoard {
    tx: watch::Sender<VerificationState>,
    policy: OrderingPolicy,
}

impl StateBoard {
    pub fn new(policy: OrderingPolicy) -> Self {
        let (tx, _) = watch::channel(VerificationState::scanning());
        Self { tx, policy }
    }

    pub fn policy(&self) -> OrderingPolicy {
        self.policy
    }

    pub fn current(&self) -> VerificationState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<VerificationState> {
        self.tx.subscribe()
    }

    /// Swap in `next`. Returns `false` when the policy discarded it as stale.
    pub fn publish(&self, next: VerificationState) -> bool {
        match self.policy {
            OrderingPolicy::Arrival => {
                self.tx.send_replace(next);
                true
            }
            OrderingPolicy::LatestIssued => self.tx.send_if_modified(|current| {
                if next.sequence > current.sequence {
                    *current = next;
                    true
                } else {
                    false
                }
            }),
        }
    }
}
