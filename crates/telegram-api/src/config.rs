//! Configuration types for the Telegram Bot API client.

/// Configuration for connecting to the Telegram Bot API.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL of the API server (e.g., "https://api.telegram.org").
    pub api_root: String,
    /// Bot authentication token issued by @BotFather.
    pub token: String,
}

impl ApiConfig {
    /// Create a configuration for the public Bot API endpoint.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_root: "https://api.telegram.org".to_string(),
            token: token.into(),
        }
    }

    /// Create a configuration with a custom API server (local Bot API
    /// server or test double).
    pub fn with_api_root(api_root: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_root: api_root.into(),
            token: token.into(),
        }
    }

    /// Get the URL for a Bot API method call.
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_root, self.token, method)
    }
}

// The token is a credential; keep it out of logs.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_root", &self.api_root)
            .field("token", &"<redacted>")
            .finish()
    }
}
