// src/session/cycle.rs

//! One capture-and-verify pass.
//!
//! `Idle → Capturing → Verifying → {Matched | Unmatched | Unreachable}`, or
//! `Capturing → Skipped` when the source has no frame.  Nothing here returns an
//! error: every failure is folded into the terminal phase.

use std::time::{Duration, Instant};

use log::Level;

use super::state::{StateBoard, VerificationState};
use crate::{
    bioguard_log,
    capture::FrameSource,
    service::{Verdict, VerificationService},
    telemetry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Capturing,
    Verifying,
    Matched,
    Unmatched,
    Unreachable,
    /// No frame was available; the state was left alone.
    Skipped,
}

impl CyclePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            CyclePhase::Idle => "idle",
            CyclePhase::Capturing => "capturing",
            CyclePhase::Verifying => "verifying",
            CyclePhase::Matched => "matched",
            CyclePhase::Unmatched => "unmatched",
            CyclePhase::Unreachable => "unreachable",
            CyclePhase::Skipped => "skipped",
        }
    }

    /// Terminal phases that try to replace the displayed state.
    pub fn publishes(self) -> bool {
        matches!(self, CyclePhase::Matched | CyclePhase::Unmatched | CyclePhase::Unreachable)
    }
}

/// What happened during one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub sequence: u64,
    pub phase: CyclePhase,
    /// `false` when skipped or when the board discarded a stale result.
    pub applied: bool,
    pub elapsed: Duration,
}

fn advance(sequence: u64, phase: &mut CyclePhase, next: CyclePhase) {
    bioguard_log!(
        Level::Trace,
        "cycle",
        "#{} {} → {}",
        sequence,
        phase.as_str(),
        next.as_str()
    );
    *phase = next;
}

/// Run cycle `sequence` against `source` and `service`, publishing to `board`.
pub async fn run_cycle(
    sequence: u64,
    source: &dyn FrameSource,
    service: &dyn VerificationService,
    board: &StateBoard,
) -> CycleReport {
    let started = Instant::now();
    let mut phase = CyclePhase::Idle;
    let _in_flight = telemetry::cycle_started();

    advance(sequence, &mut phase, CyclePhase::Capturing);
    let frame = match source.snapshot().await {
        Ok(Some(frame)) => Some(frame),
        Ok(None) => None,
        Err(e) => {
            bioguard_log!(Level::Warn, "cycle", "#{} {} source failed: {}", sequence, source.name(), e);
            None
        }
    };

    let Some(frame) = frame else {
        advance(sequence, &mut phase, CyclePhase::Skipped);
        telemetry::cycle_finished(phase, false);
        return CycleReport { sequence, phase, applied: false, elapsed: started.elapsed() };
    };

    advance(sequence, &mut phase, CyclePhase::Verifying);
    let outcome = service.verify(frame).await;

    let terminal = match &outcome {
        Ok(Verdict::Match { user, confidence }) => {
            bioguard_log!(Level::Info, "cycle", "#{} identified {} (confidence={:?})", sequence, user, confidence);
            CyclePhase::Matched
        }
        Ok(Verdict::NoMatch { status, message }) => {
            bioguard_log!(Level::Debug, "cycle", "#{} no match (status={}, message={:?})", sequence, status, message);
            CyclePhase::Unmatched
        }
        Err(e) => {
            bioguard_log!(Level::Warn, "cycle", "#{} {} unreachable: {}", sequence, service.name(), e);
            CyclePhase::Unreachable
        }
    };
    advance(sequence, &mut phase, terminal);

    let applied = board.publish(VerificationState::from_outcome(sequence, &outcome));
    if !applied {
        bioguard_log!(
            Level::Debug,
            "cycle",
            "#{} result discarded, board already shows #{}",
            sequence,
            board.current().sequence()
        );
    }

    telemetry::cycle_finished(phase, applied);
    CycleReport { sequence, phase, applied, elapsed: started.elapsed() }
}
