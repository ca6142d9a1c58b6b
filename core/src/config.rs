//! Base-URL resolution from the environment.

use std::env;

/// Explicit API base URL, e.g. `http://localhost:8000/api`.
pub const API_URL_VAR: &str = "OCTOFIT_API_URL";
/// Set inside GitHub Codespaces; the backend is then forwarded on port 8000.
pub const CODESPACE_VAR: &str = "CODESPACE_NAME";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ApiConfig {
    /// Resolve from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve using `lookup` for variables. Precedence: the Codespace
    /// forward URL, then `OCTOFIT_API_URL`, then `DEFAULT_BASE_URL`. Blank
    /// values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let base_url = if let Some(codespace) = read(CODESPACE_VAR) {
            format!("https://{}-8000.app.github.dev/api", codespace.trim())
        } else if let Some(url) = read(API_URL_VAR) {
            url.trim().to_string()
        } else {
            DEFAULT_BASE_URL.to_string()
        };
        Self { base_url }
    }
}
