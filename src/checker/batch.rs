// src/checker/batch.rs
// =============================================================================
// Checks a whole batch of link records and keeps only the broken ones.
//
// How it works:
// 1. Build one HTTP client (one connection pool) for the batch
// 2. Spawn one task per record into a JoinSet
// 3. Each task waits for an admission slot, probes, and returns an optional
//    BrokenLinkReport
// 4. Join every task, collect the reports, drop the client
//
// A failing probe only marks its own record broken. The batch itself fails
// only for problems outside per-item work: the client cannot be built, or a
// task panics.
//
// Rust concepts:
// - JoinSet: owns the spawned tasks; dropping it aborts whatever is left
// - Arc: the prober is shared read-only by every task
// - tokio::select!: race "slot became free" against "batch was cancelled"
// =============================================================================

use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::admission::AdmissionController;
use super::http::{LinkProber, LinkTransport, ReqwestTransport};
use super::report::{BatchResult, BrokenLinkReport, LinkRecord, ProbeOutcome, CANCELLED};
use crate::config::{CheckerConfig, ConfigError};

/// A fault outside per-item processing. Aborts the whole batch.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("invalid checker configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("probe task failed: {0}")]
    Task(#[from] JoinError),
}

#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    config: CheckerConfig,
}

impl BatchOrchestrator {
    pub fn new(config: CheckerConfig) -> Result<Self, BatchError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Probes every record and returns the broken ones, in completion order.
    pub async fn check_batch(&self, items: Vec<LinkRecord>) -> Result<BatchResult, BatchError> {
        self.check_batch_with_cancel(items, CancellationToken::new())
            .await
    }

    /// Like [`check_batch`](Self::check_batch), but stops admitting new probes
    /// once `cancel` fires. Records that never got a slot are reported with
    /// status "Cancelled"; probes already in flight run to completion.
    pub async fn check_batch_with_cancel(
        &self,
        items: Vec<LinkRecord>,
        cancel: CancellationToken,
    ) -> Result<BatchResult, BatchError> {
        let transport = ReqwestTransport::new(&self.config)?;
        self.run(transport, items, cancel).await
    }

    // Transport-agnostic engine. The client inside `transport` lives exactly
    // as long as this call.
    pub(crate) async fn run<T>(
        &self,
        transport: T,
        items: Vec<LinkRecord>,
        cancel: CancellationToken,
    ) -> Result<BatchResult, BatchError>
    where
        T: LinkTransport + 'static,
    {
        let started = Instant::now();
        let total = items.len();
        let prober = Arc::new(LinkProber::new(transport, self.config.normalize));
        let admission = AdmissionController::new(self.config.concurrency);

        info!(items = total, concurrency = admission.capacity(), "checking batch");

        let mut tasks = JoinSet::new();
        for record in items {
            let prober = Arc::clone(&prober);
            let admission = admission.clone();
            let cancel = cancel.clone();

            tasks.spawn(async move {
                let outcome = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => ProbeOutcome::broken(CANCELLED),
                    slot = admission.acquire() => match slot {
                        Ok(_slot) => prober.probe(&record.url).await,
                        Err(_) => ProbeOutcome::broken(CANCELLED),
                    },
                };
                BrokenLinkReport::from_outcome(record, outcome)
            });
        }

        let mut broken_links = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            if let Some(report) = joined? {
                broken_links.push(report);
            }
        }

        let result = BatchResult::from_reports(broken_links);
        info!(
            items = total,
            broken = result.count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "batch complete"
        );

        Ok(result)
    }
}
