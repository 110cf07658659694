//! Remote user-id lookup for GitHub noreply addresses.
//!
//! Lookups are best effort: callers log a [`RemoteLookupError`] and render
//! the id as the empty string.
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use ureq::Agent;

use crate::error::RemoteLookupError;

/// Resolves a provider username to its numeric user id.
#[cfg_attr(test, mockall::automock)]
pub trait UserLookup: Send + Sync {
    /// Look up the numeric id of `username`.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteLookupError`] if the request fails or the response
    /// has no usable id.
    fn user_id(&self, username: &str) -> Result<String, RemoteLookupError>;
}

/// Lookup used when network access is disabled; always fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLookup;

impl UserLookup for NoLookup {
    fn user_id(&self, username: &str) -> Result<String, RemoteLookupError> {
        Err(RemoteLookupError::Request {
            url: GitHubLookup::url(GitHubLookup::DEFAULT_API, username),
            reason: "remote lookups are disabled".to_string(),
        })
    }
}

/// Extract the `id` field from a GitHub user JSON document.
fn parse_user_id(url: &str, body: &str) -> Result<String, RemoteLookupError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| RemoteLookupError::InvalidResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    match value.get("id") {
        Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
        Some(serde_json::Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(RemoteLookupError::MissingField {
            url: url.to_string(),
            field: "id",
        }),
    }
}

/// [`UserLookup`] against the GitHub REST API.
///
/// Results (successes and failures) are cached per username for the
/// lifetime of the value so each account is queried at most once per run.
pub struct GitHubLookup {
    agent: Agent,
    api_base: String,
    cache: Mutex<HashMap<String, Result<String, RemoteLookupError>>>,
}

impl std::fmt::Debug for GitHubLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubLookup")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl GitHubLookup {
    /// Public GitHub API endpoint.
    pub const DEFAULT_API: &'static str = "https://api.github.com";

    const TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a lookup against the public API.
    #[must_use]
    pub fn new() -> Self {
        Self::with_api_base(Self::DEFAULT_API)
    }

    /// Create a lookup against a different API base URL.
    #[must_use]
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Self::TIMEOUT))
            .build()
            .into();
        Self {
            agent,
            api_base: api_base.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn url(api_base: &str, username: &str) -> String {
        format!("{}/users/{username}", api_base.trim_end_matches('/'))
    }

    fn fetch(&self, url: &str) -> Result<String, RemoteLookupError> {
        let request_error = |reason: String| RemoteLookupError::Request {
            url: url.to_string(),
            reason,
        };
        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", concat!("devprofile/", env!("CARGO_PKG_VERSION")))
            .header("Accept", "application/vnd.github+json")
            .call()
            .map_err(|e| request_error(e.to_string()))?;
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| request_error(e.to_string()))?;
        parse_user_id(url, &body)
    }
}

impl Default for GitHubLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl UserLookup for GitHubLookup {
    fn user_id(&self, username: &str) -> Result<String, RemoteLookupError> {
        if let Ok(cache) = self.cache.lock()
            && let Some(hit) = cache.get(username)
        {
            return hit.clone();
        }
        let result = self.fetch(&Self::url(&self.api_base, username));
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(username.to_string(), result.clone());
        }
        result
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const URL: &str = "https://api.github.com/users/alice";

    #[test]
    fn numeric_id_is_extracted() {
        let body = r#"{"login":"alice","id":583231,"type":"User"}"#;
        assert_eq!(parse_user_id(URL, body).unwrap(), "583231");
    }

    #[test]
    fn missing_id_is_reported() {
        let err = parse_user_id(URL, r#"{"message":"Not Found"}"#).unwrap_err();
        assert_eq!(
            err,
            RemoteLookupError::MissingField {
                url: URL.to_string(),
                field: "id"
            }
        );
    }

    #[test]
    fn null_id_is_missing() {
        assert!(matches!(
            parse_user_id(URL, r#"{"id":null}"#),
            Err(RemoteLookupError::MissingField { .. })
        ));
    }

    #[test]
    fn invalid_json_is_reported() {
        assert!(matches!(
            parse_user_id(URL, "<html>rate limited</html>"),
            Err(RemoteLookupError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn url_joins_base_and_username() {
        assert_eq!(GitHubLookup::url("https://api.github.com/", "alice"), URL);
    }

    #[test]
    fn no_lookup_always_fails() {
        assert!(matches!(
            NoLookup.user_id("alice"),
            Err(RemoteLookupError::Request { .. })
        ));
    }

    #[test]
    fn unreachable_host_fails_and_is_cached() {
        // Port 9 (discard) on loopback refuses connections on CI hosts.
        let lookup = GitHubLookup::with_api_base("http://127.0.0.1:9");
        let first = lookup.user_id("alice").unwrap_err();
        assert!(matches!(first, RemoteLookupError::Request { .. }));
        assert_eq!(lookup.user_id("alice").unwrap_err(), first);
    }
}
