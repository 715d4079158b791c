// src/checker/report.rs
// =============================================================================
// Data types that flow through a batch check.
//
// - LinkRecord:       one submitted row (sku, country, url)
// - ProbeOutcome:     what probing a single URL concluded
// - BrokenLinkReport: a row in the output, only for broken links
// - BatchResult:      the whole response (count + broken links)
//
// Field names on the wire follow the catalog export format ("Sku", "Pais",
// "LinkUrl", "Status"), so the structs use #[serde(rename = ...)].
// =============================================================================

use serde::{Deserialize, Serialize};

/// Status text for any HTTP status >= 400, on either probe stage.
pub const LINK_ERROR: &str = "Link Error";

/// Status text when the fallback GET itself fails at the transport level.
pub const BROWSER_EXCEPTION_ERROR: &str = "Browser exception Error";

/// Status text for items a cancelled batch never got around to.
pub const CANCELLED: &str = "Cancelled";

/// One submitted link. Identity is its position in the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    #[serde(rename = "Sku", default)]
    pub sku: Option<String>,
    #[serde(rename = "Pais", default)]
    pub country: Option<String>,
    #[serde(rename = "LinkUrl")]
    pub url: String,
}

impl LinkRecord {
    pub fn new(sku: Option<&str>, country: Option<&str>, url: &str) -> Self {
        Self {
            sku: sku.map(str::to_string),
            country: country.map(str::to_string),
            url: url.to_string(),
        }
    }
}

/// Result of probing one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Healthy,
    Broken { reason: String },
}

impl ProbeOutcome {
    pub fn broken(reason: impl Into<String>) -> Self {
        ProbeOutcome::Broken {
            reason: reason.into(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, ProbeOutcome::Healthy)
    }
}

/// A broken link, carrying the record's fields exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrokenLinkReport {
    #[serde(rename = "Sku")]
    pub sku: Option<String>,
    #[serde(rename = "Pais")]
    pub country: Option<String>,
    #[serde(rename = "LinkUrl")]
    pub original_url: String,
    #[serde(rename = "Status")]
    pub status_reason: String,
}

impl BrokenLinkReport {
    // Healthy outcomes produce no report
    pub fn from_outcome(record: LinkRecord, outcome: ProbeOutcome) -> Option<Self> {
        match outcome {
            ProbeOutcome::Healthy => None,
            ProbeOutcome::Broken { reason } => Some(Self {
                sku: record.sku,
                country: record.country,
                original_url: record.url,
                status_reason: reason,
            }),
        }
    }
}

/// The response for one batch.
///
/// Build it with [`BatchResult::from_reports`] so `count` always equals
/// `broken_links.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub count: usize,
    pub broken_links: Vec<BrokenLinkReport>,
}

impl BatchResult {
    pub fn from_reports(broken_links: Vec<BrokenLinkReport>) -> Self {
        Self {
            count: broken_links.len(),
            broken_links,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.broken_links.is_empty()
    }
}
