// src/checker/normalize.rs
// =============================================================================
// This module turns whatever the caller submitted into a URL we can fetch.
//
// Catalog feeds are messy: "example.com/p/123", "  https://shop.example ",
// "HTTP://EXAMPLE.COM". Two policies are supported:
//
// - Prefix:     add "http://" when no http/https scheme is present, otherwise
//               leave the string alone (default)
// - Structured: same scheme defaulting, then parse the URL and force a "www."
//               prefix onto dotted domain names
//
// The normalized string is only used for the outbound request. Reports always
// carry the URL exactly as submitted.
// =============================================================================

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use url::Url;

/// Which canonicalization to apply before probing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum NormalizePolicy {
    /// Prepend `http://` when there is no http/https scheme
    #[default]
    Prefix,
    /// Default the scheme, then force a `www.` host prefix
    Structured,
}

// Normalizes a raw URL according to the policy
//
// Never fails: malformed input still comes back as *something* a client can
// attempt, and the probe will classify the failure.
//
// Examples (Prefix):
//   "example.com/404"      -> "http://example.com/404"
//   "https://example.com"  -> "https://example.com"
//
// Examples (Structured):
//   "example.com/404"      -> "http://www.example.com/404"
//   "https://shop.example" -> "https://www.shop.example/"
pub fn normalize(raw_url: &str, policy: NormalizePolicy) -> String {
    let prefixed = with_default_scheme(raw_url.trim());

    match policy {
        NormalizePolicy::Prefix => prefixed,
        NormalizePolicy::Structured => force_www(&prefixed).unwrap_or(prefixed),
    }
}

fn with_default_scheme(url: &str) -> String {
    if has_http_scheme(url) {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

// Case-insensitive so "HTTPS://Example.com" is not turned into
// "http://HTTPS://Example.com"
fn has_http_scheme(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

// Returns None when the URL does not parse; the caller keeps the prefixed form.
//
// IP literals and single-label hosts ("localhost") are left untouched, since
// "www.127.0.0.1" or "www.localhost" would never resolve.
fn force_www(url: &str) -> Option<String> {
    let mut parsed = Url::parse(url).ok()?;

    let host = parsed.domain()?.to_string();
    if host.starts_with("www.") || !host.contains('.') {
        return Some(parsed.to_string());
    }

    parsed.set_host(Some(&format!("www.{}", host))).ok()?;
    Some(parsed.to_string())
}
