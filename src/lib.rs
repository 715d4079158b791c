// src/lib.rs
// =============================================================================
// link-sentry: bounded-concurrency broken link checking.
//
// Modules:
// - checker: the engine (normalize, probe, admit, batch)
// - api:     the check-links request boundary (auth + validation)
// - config:  engine settings and defaults
// - cli:     clap definitions for the binary
// - logging: tracing subscriber setup
// =============================================================================

pub mod api;
pub mod checker;
pub mod cli;
pub mod config;
pub mod logging;
