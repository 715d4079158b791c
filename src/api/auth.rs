// src/api/auth.rs
// =============================================================================
// Bearer-token checks for the check-links operation.
//
// The engine never sees credentials. The adapter asks a CredentialVerifier
// "who is this token?" and only forwards the batch if the answer is someone.
// =============================================================================

use std::collections::HashMap;

/// Maps a bearer token to a caller identity.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Option<String>;
}

/// Fixed token table, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenTable {
    tokens: HashMap<String, String>,
}

impl StaticTokenTable {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            tokens: entries
                .into_iter()
                .map(|(token, identity)| (token.into(), identity.into()))
                .collect(),
        }
    }

    /// The table used when no `--tokens` flags are given.
    pub fn builtin() -> Self {
        Self::new([("marketing-cloud-token", "mc-user")])
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

impl CredentialVerifier for StaticTokenTable {
    fn verify(&self, token: &str) -> Option<String> {
        self.tokens.get(token).cloned()
    }
}

// Parses one "token=identity" flag value
pub fn parse_token_entry(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((token, identity)) if !token.is_empty() && !identity.is_empty() => {
            Ok((token.to_string(), identity.to_string()))
        }
        _ => Err(format!("expected TOKEN=IDENTITY, got '{}'", raw)),
    }
}

// Extracts the token from an Authorization header value
//
// Accepts "Bearer <token>" with any casing of the scheme. Anything else,
// including an empty token, is treated as missing.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_knows_marketing_cloud() {
        let table = StaticTokenTable::builtin();
        assert_eq!(table.verify("marketing-cloud-token").as_deref(), Some("mc-user"));
        assert_eq!(table.verify("nope"), None);
    }

    #[test]
    fn test_parse_token_entry() {
        assert_eq!(
            parse_token_entry("abc=ci-bot"),
            Ok(("abc".to_string(), "ci-bot".to_string()))
        );
        assert!(parse_token_entry("abc").is_err());
        assert!(parse_token_entry("=ci-bot").is_err());
        assert!(parse_token_entry("abc=").is_err());
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer   abc "), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
