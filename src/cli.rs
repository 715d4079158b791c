// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - check: read a JSON array of link records and report the broken ones
// - probe: check a single URL and print what the prober concluded
//
// Shared engine settings (concurrency, timeout, user agent, normalization)
// live in CheckerArgs and are flattened into both subcommands.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::api::parse_token_entry;
use crate::checker::NormalizePolicy;
use crate::config::{CheckerConfig, DEFAULT_CONCURRENCY, DEFAULT_USER_AGENT};

#[derive(Parser, Debug)]
#[command(
    name = "link-sentry",
    version,
    about = "Find broken links in a batch of catalog URLs",
    long_about = "link-sentry probes every submitted URL (HEAD first, GET as a fallback) \
                  under a concurrency cap and reports only the ones that are broken."
)]
pub struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a batch of link records
    ///
    /// Example: link-sentry check links.json --token marketing-cloud-token --json
    Check {
        /// JSON file with an array of {"Sku","Pais","LinkUrl"} records ("-" for stdin)
        input: PathBuf,

        /// Bearer token identifying the caller
        #[arg(long, env = "LINK_SENTRY_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Accepted TOKEN=IDENTITY pairs; replaces the built-in table (repeatable)
        #[arg(long = "tokens", value_parser = parse_token_entry)]
        tokens: Vec<(String, String)>,

        /// Print the response as JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        checker: CheckerArgs,
    },

    /// Probe a single URL
    ///
    /// Example: link-sentry probe example.com/products/42
    Probe {
        url: String,

        #[command(flatten)]
        checker: CheckerArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CheckerArgs {
    /// Maximum number of probes in flight
    #[arg(long, env = "LINK_SENTRY_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Total timeout per request, in seconds
    #[arg(long, default_value_t = 20)]
    pub timeout_secs: u64,

    /// User-Agent header sent with every probe
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// How submitted URLs are turned into fetchable ones
    #[arg(long, value_enum, default_value_t = NormalizePolicy::Prefix)]
    pub normalize: NormalizePolicy,
}

impl CheckerArgs {
    pub fn to_config(&self) -> CheckerConfig {
        CheckerConfig::default()
            .with_concurrency(self.concurrency)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_user_agent(self.user_agent.clone())
            .with_normalize(self.normalize)
    }
}
