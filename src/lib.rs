// src/lib.rs
// ────────────────────────────────────────────────────────────────────────────
// Public library entry point.  Re-export everything for both `main.rs` and
// integration tests.

mod macros;

pub mod capture;
pub mod config;
pub mod display;
pub mod service;
pub mod session;
pub mod telemetry;
