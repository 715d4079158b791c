// src/config.rs
// =============================================================================
// Settings that shape how a batch is checked.
//
// CheckerConfig is built from CLI flags (see cli.rs) or from defaults in
// tests. Everything here is fixed for the lifetime of one batch.
// =============================================================================

use std::time::Duration;
use thiserror::Error;

use crate::checker::NormalizePolicy;

/// Default number of probes allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 100;

/// Total per-request timeout, covering connect, redirects and headers.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Redirect hops followed before a request counts as failed.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Sent on every probe. Plenty of storefronts answer 403 to non-browser agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
    #[error("user agent must not be empty")]
    EmptyUserAgent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerConfig {
    pub concurrency: usize,
    pub timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
    pub normalize: NormalizePolicy,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            normalize: NormalizePolicy::default(),
        }
    }
}

impl CheckerConfig {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_normalize(mut self, policy: NormalizePolicy) -> Self {
        self.normalize = policy;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyUserAgent);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = CheckerConfig::default();
        assert_eq!(config.concurrency, 100);
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(config.normalize, NormalizePolicy::Prefix);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let config = CheckerConfig::default().with_concurrency(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroConcurrency));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = CheckerConfig::default().with_timeout(Duration::ZERO);
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn test_rejects_blank_user_agent() {
        let config = CheckerConfig::default().with_user_agent("   ");
        assert_eq!(config.validate(), Err(ConfigError::EmptyUserAgent));
    }
}
