// src/telemetry.rs

//! Prometheus counters for the verification loop.

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::session::cycle::CyclePhase;

pub const CYCLES_TOTAL: &str = "bioguard_cycles_total";
pub const CYCLES_IN_FLIGHT: &str = "bioguard_cycles_in_flight";
pub const STALE_RESPONSES_TOTAL: &str = "bioguard_stale_responses_total";

/// Serve `/metrics` on `addr`. Must run inside the tokio runtime.
pub fn install_exporter(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()
}

/// Holds one slot of `bioguard_cycles_in_flight` until dropped, so aborted
/// cycles give theirs back too.
#[must_use]
pub struct InFlight(());

impl Drop for InFlight {
    fn drop(&mut self) {
        gauge!(CYCLES_IN_FLIGHT).decrement(1.0);
    }
}

pub fn cycle_started() -> InFlight {
    gauge!(CYCLES_IN_FLIGHT).increment(1.0);
    InFlight(())
}

pub fn cycle_finished(phase: CyclePhase, applied: bool) {
    counter!(CYCLES_TOTAL, "outcome" => phase.as_str()).increment(1);
    if !applied && phase.publishes() {
        counter!(STALE_RESPONSES_TOTAL).increment(1);
    }
}
