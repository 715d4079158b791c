// src/checker/mod.rs
// =============================================================================
// This module contains the link checking engine.
//
// Submodules (leaf first):
// - normalize: turns submitted URLs into fetchable ones
// - http:      HEAD-then-GET probing of a single URL
// - admission: caps how many probes run at once
// - batch:     fans a batch out to the prober and gathers broken links
// - report:    the records, outcomes and results passed between them
//
// This file re-exports the public API so callers write
// `checker::BatchOrchestrator` instead of `checker::batch::BatchOrchestrator`.
// =============================================================================

mod admission;
mod batch;
mod http;
mod normalize;
mod report;

pub use admission::{AdmissionController, AdmissionSlot};
pub use batch::{BatchError, BatchOrchestrator};
pub use http::{classify, LinkProber, LinkTransport, ProbeFault, ProbeStages, ReqwestTransport};
pub use normalize::{normalize, NormalizePolicy};
pub use report::{
    BatchResult, BrokenLinkReport, LinkRecord, ProbeOutcome, BROWSER_EXCEPTION_ERROR, CANCELLED,
    LINK_ERROR,
};
