//! Minimal W3C WebDriver client for a chromedriver endpoint.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::WebDriverConfig;
use crate::error::ExtractorError;

/// Key under which element references are returned (W3C element identifier).
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Script that hides the automation flag from the page.
const MASK_WEBDRIVER_SCRIPT: &str =
    "Object.defineProperty(navigator, 'webdriver', {get: () => undefined})";

/// Response envelope used by all WebDriver endpoints.
#[derive(Debug, Deserialize)]
struct WireValue<T> {
    value: T,
}

/// Error payload returned by the driver on failure.
#[derive(Debug, Deserialize)]
struct WireError {
    error: String,
    message: String,
}

/// Payload returned when a session is created.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewSession {
    session_id: String,
}

/// A live browser session held open against chromedriver.
///
/// Sessions own an OS browser process; every exit path must end in
/// [`WebDriverSession::close`].
pub struct WebDriverSession {
    http: Client,
    config: WebDriverConfig,
    session_id: String,
}

impl WebDriverSession {
    /// Start an isolated, automation-hardened headless browser session.
    pub async fn create(http: Client, config: WebDriverConfig) -> Result<Self, ExtractorError> {
        let (width, height) = config.window_size;
        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": {
                        "args": [
                            "--headless=new",
                            "--no-sandbox",
                            "--disable-dev-shm-usage",
                            "--disable-gpu",
                            format!("--window-size={},{}", width, height),
                            format!("--user-agent={}", config.user_agent),
                            "--disable-blink-features=AutomationControlled",
                        ],
                        "excludeSwitches": ["enable-automation"],
                        "useAutomationExtension": false,
                    }
                }
            }
        });

        let new_session: NewSession = Self::handle(
            http.post(config.new_session_url())
                .json(&capabilities)
                .send()
                .await
                .map_err(ExtractorError::Http)?,
        )
        .await?;

        info!("Started WebDriver session {}", new_session.session_id);

        let session = Self {
            http,
            config,
            session_id: new_session.session_id,
        };

        // Mask the flag before the target page runs any bot checks.
        if let Err(e) = session.execute(MASK_WEBDRIVER_SCRIPT).await {
            warn!("Failed to mask automation flag: {}", e);
        }

        Ok(session)
    }

    /// Get the session id.
    pub fn id(&self) -> &str {
        &self.session_id
    }

    /// Navigate to a URL.
    pub async fn navigate(&self, url: &str) -> Result<(), ExtractorError> {
        debug!("Navigating to {}", url);
        let _: Value = self.post("url", &json!({ "url": url })).await?;
        Ok(())
    }

    /// Execute a synchronous script in the page and return its result.
    pub async fn execute(&self, script: &str) -> Result<Value, ExtractorError> {
        self.post(
            "execute/sync",
            &json!({ "script": script, "args": [] }),
        )
        .await
    }

    /// Find elements by CSS selector, returning their element references.
    pub async fn find_elements(&self, css: &str) -> Result<Vec<String>, ExtractorError> {
        let value: Value = self
            .post(
                "elements",
                &json!({ "using": "css selector", "value": css }),
            )
            .await?;

        let elements = value
            .as_array()
            .ok_or_else(|| ExtractorError::UnexpectedResponse("elements is not an array".into()))?
            .iter()
            .filter_map(|e| e.get(ELEMENT_KEY).and_then(Value::as_str))
            .map(String::from)
            .collect();

        Ok(elements)
    }

    /// Read an element attribute, `None` when absent.
    pub async fn element_attribute(
        &self,
        element: &str,
        name: &str,
    ) -> Result<Option<String>, ExtractorError> {
        self.get(&format!("element/{}/attribute/{}", element, name))
            .await
    }

    /// Read an element property, `None` when absent or not a string.
    pub async fn element_property(
        &self,
        element: &str,
        name: &str,
    ) -> Result<Option<String>, ExtractorError> {
        let value: Value = self
            .get(&format!("element/{}/property/{}", element, name))
            .await?;
        Ok(value.as_str().map(String::from))
    }

    /// Tear the session down, releasing the browser process.
    pub async fn close(&self) -> Result<(), ExtractorError> {
        debug!("Closing WebDriver session {}", self.session_id);
        let response = self
            .http
            .delete(self.config.session_url(&self.session_id, ""))
            .send()
            .await
            .map_err(ExtractorError::Http)?;
        let _: Value = Self::handle(response).await?;
        Ok(())
    }

    /// POST to an endpoint under this session.
    async fn post<R: DeserializeOwned>(
        &self,
        tail: &str,
        body: &Value,
    ) -> Result<R, ExtractorError> {
        let response = self
            .http
            .post(self.config.session_url(&self.session_id, tail))
            .json(body)
            .send()
            .await
            .map_err(ExtractorError::Http)?;

        Self::handle(response).await
    }

    /// GET an endpoint under this session.
    async fn get<R: DeserializeOwned>(&self, tail: &str) -> Result<R, ExtractorError> {
        let response = self
            .http
            .get(self.config.session_url(&self.session_id, tail))
            .send()
            .await
            .map_err(ExtractorError::Http)?;

        Self::handle(response).await
    }

    /// Unwrap the WebDriver response envelope, mapping driver errors.
    async fn handle<R: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<R, ExtractorError> {
        let status = response.status();

        if status.is_success() {
            let body: WireValue<R> = response.json().await.map_err(ExtractorError::Http)?;
            return Ok(body.value);
        }

        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<WireValue<WireError>>(&body) {
            Ok(wire) => Err(ExtractorError::WebDriver {
                error: wire.value.error,
                message: wire.value.message,
            }),
            Err(_) => Err(ExtractorError::WebDriver {
                error: format!("http {}", status.as_u16()),
                message: body,
            }),
        }
    }
}

impl std::fmt::Debug for WebDriverSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebDriverSession")
            .field("session_id", &self.session_id)
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_new_session_payload() {
        let body = r#"{"value": {"sessionId": "abc123", "capabilities": {"browserName": "chrome"}}}"#;
        let parsed: WireValue<NewSession> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.value.session_id, "abc123");
    }

    #[test]
    fn test_parse_error_payload() {
        let body = r#"{"value": {"error": "no such window", "message": "window was closed", "stacktrace": ""}}"#;
        let parsed: WireValue<WireError> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.value.error, "no such window");
    }
}
