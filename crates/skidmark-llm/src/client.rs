// Claude Messages API client.
//
// Sends one non-streaming request per prompt and returns the concatenated
// text blocks of the reply. Used as the roast pipeline's `TextGenerator`.

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use skidmark_core::TextGenerator;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const DEFAULT_TEMPERATURE: f64 = 0.9;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Everything needed to build an `LlmClient`.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub api_url: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            api_url: ANTHROPIC_API_URL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// ClaudeClient
// ---------------------------------------------------------------------------

/// Low-level Claude API client.
pub struct ClaudeClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    api_url: String,
    max_tokens: u32,
    temperature: f64,
}

impl ClaudeClient {
    /// Create a client with default endpoint and sampling settings.
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            api_url: ANTHROPIC_API_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `user_content` as a single user message and return the reply
    /// text.
    pub async fn send_message(&self, user_content: &str) -> anyhow::Result<String> {
        if self.api_key.is_empty() {
            anyhow::bail!("API key not configured");
        }

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "messages": [{ "role": "user", "content": user_content }]
        });

        debug!(model = %self.model, prompt_len = user_content.len(), "sending message");

        let response = self
            .http
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .context("failed to reach the Claude API")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("failed to read Claude API response body")?;

        if !status.is_success() {
            let detail = parse_error_message(&text).unwrap_or_else(|| "no error details".to_string());
            warn!(%status, %detail, "Claude API returned an error");
            anyhow::bail!("API returned status {status}: {detail}");
        }

        let reply: Value =
            serde_json::from_str(&text).context("Claude API response is not valid JSON")?;

        if let Some((input, output)) = parse_usage(&reply) {
            debug!(input_tokens = input, output_tokens = output, "message complete");
        }

        parse_message_text(&reply).context("Claude API response has no text content")
    }
}

#[async_trait]
impl TextGenerator for ClaudeClient {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        self.send_message(prompt).await
    }
}

// ---------------------------------------------------------------------------
// LlmClient wrapper
// ---------------------------------------------------------------------------

/// High-level wrapper that can be either an active Claude client or disabled.
pub enum LlmClient {
    /// Claude API is configured and ready.
    Active(ClaudeClient),
    /// No API key configured; every generation fails.
    Disabled,
}

impl LlmClient {
    /// `Active` when a non-empty API key is present, otherwise `Disabled`.
    pub fn from_config(settings: &LlmSettings) -> Self {
        match &settings.api_key {
            Some(key) if !key.is_empty() => LlmClient::Active(
                ClaudeClient::new(key.clone(), settings.model.clone())
                    .with_api_url(settings.api_url.clone())
                    .with_max_tokens(settings.max_tokens)
                    .with_temperature(settings.temperature),
            ),
            _ => LlmClient::Disabled,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, LlmClient::Active(_))
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        match self {
            LlmClient::Active(client) => client.send_message(prompt).await,
            LlmClient::Disabled => anyhow::bail!("LLM not configured"),
        }
    }
}

// ---------------------------------------------------------------------------
// JSON parsing helpers
// ---------------------------------------------------------------------------

/// Concatenate the `text` blocks of a Messages API reply.
///
/// Expected shape: `{ "content": [ { "type": "text", "text": "..." }, ... ] }`
pub(crate) fn parse_message_text(reply: &Value) -> Option<String> {
    let blocks = reply.get("content")?.as_array()?;
    let texts: Vec<&str> = blocks
        .iter()
        .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|b| b.get("text")?.as_str())
        .collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.concat())
    }
}

/// Extract `(input_tokens, output_tokens)` from a reply's `usage` object.
pub(crate) fn parse_usage(reply: &Value) -> Option<(u64, u64)> {
    let usage = reply.get("usage")?;
    Some((
        usage.get("input_tokens")?.as_u64()?,
        usage.get("output_tokens")?.as_u64()?,
    ))
}

/// Extract `error.message` from an API error body.
///
/// Expected shape: `{ "type": "error", "error": { "type": "...", "message": "..." } }`
pub(crate) fn parse_error_message(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    v.get("error")?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- JSON parsing --

    #[test]
    fn parse_single_text_block() {
        let reply: Value = serde_json::from_str(
            r#"{
                "id": "msg_1",
                "type": "message",
                "role": "assistant",
                "content": [{ "type": "text", "text": "{\"1\": \"roast\"}" }],
                "usage": { "input_tokens": 812, "output_tokens": 96 }
            }"#,
        )
        .unwrap();
        assert_eq!(parse_message_text(&reply), Some("{\"1\": \"roast\"}".to_string()));
        assert_eq!(parse_usage(&reply), Some((812, 96)));
    }

    #[test]
    fn parse_multiple_text_blocks_skips_others() {
        let reply: Value = serde_json::from_str(
            r#"{ "content": [
                { "type": "text", "text": "{\"1\": " },
                { "type": "tool_use", "id": "x", "name": "noop", "input": {} },
                { "type": "text", "text": "\"roast\"}" }
            ] }"#,
        )
        .unwrap();
        assert_eq!(parse_message_text(&reply), Some("{\"1\": \"roast\"}".to_string()));
    }

    #[test]
    fn parse_missing_or_empty_content() {
        let reply: Value = serde_json::from_str(r#"{ "content": [] }"#).unwrap();
        assert_eq!(parse_message_text(&reply), None);
        let reply: Value = serde_json::from_str(r#"{ "id": "msg_1" }"#).unwrap();
        assert_eq!(parse_message_text(&reply), None);
        assert_eq!(parse_usage(&reply), None);
    }

    #[test]
    fn parse_api_error_message() {
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        assert_eq!(parse_error_message(body), Some("Overloaded".to_string()));
        assert_eq!(parse_error_message("<html>bad gateway</html>"), None);
        assert_eq!(parse_error_message(r#"{"error": "flat"}"#), None);
    }

    // -- LlmClient construction --

    #[test]
    fn from_config_with_api_key_returns_active() {
        let settings = LlmSettings {
            api_key: Some("sk-ant-test-key".to_string()),
            ..Default::default()
        };
        let client = LlmClient::from_config(&settings);
        assert!(client.is_active());
        match client {
            LlmClient::Active(inner) => assert_eq!(inner.model(), DEFAULT_MODEL),
            LlmClient::Disabled => unreachable!(),
        }
    }

    #[test]
    fn from_config_without_api_key_returns_disabled() {
        let client = LlmClient::from_config(&LlmSettings::default());
        assert!(matches!(client, LlmClient::Disabled));
    }

    #[test]
    fn from_config_with_empty_api_key_returns_disabled() {
        let settings = LlmSettings {
            api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(!LlmClient::from_config(&settings).is_active());
    }

    // -- Failure paths without network --

    #[tokio::test]
    async fn disabled_client_fails_generation() {
        let err = LlmClient::Disabled.generate("prompt").await.unwrap_err();
        assert_eq!(err.to_string(), "LLM not configured");
    }

    #[tokio::test]
    async fn empty_api_key_fails_without_request() {
        let client = ClaudeClient::new(String::new(), "model".to_string())
            .with_api_url("http://127.0.0.1:9");
        let err = client.generate("prompt").await.unwrap_err();
        assert_eq!(err.to_string(), "API key not configured");
    }

    // -- Integration-style tests with mock TCP server --

    /// Accept one connection, capture the full request, reply with `status`
    /// and a JSON `body`, then close.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let task = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            // Read until the headers and the declared body have arrived.
            let mut request = Vec::new();
            let mut buf = vec![0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(end) = text.find("\r\n\r\n") {
                    let content_length = text[..end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())?
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();

            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{addr}/v1/messages"), task)
    }

    #[tokio::test]
    async fn mock_server_success_flow() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"id":"msg_1","type":"message","role":"assistant","content":[{"type":"text","text":"```json\n{\"1\": \"toast\"}\n```"}],"usage":{"input_tokens":10,"output_tokens":5}}"#,
        )
        .await;

        let client = ClaudeClient::new("sk-test".to_string(), "test-model".to_string())
            .with_api_url(url)
            .with_max_tokens(512)
            .with_temperature(0.5);
        let text = client.generate("roast them").await.unwrap();
        assert_eq!(text, "```json\n{\"1\": \"toast\"}\n```");

        let request = server.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /v1/messages"));
        assert!(lower.contains("x-api-key: sk-test"));
        assert!(lower.contains("anthropic-version: 2023-06-01"));

        let body_start = request.find("\r\n\r\n").unwrap() + 4;
        let body: Value = serde_json::from_str(&request[body_start..]).unwrap();
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "roast them");
    }

    #[tokio::test]
    async fn mock_server_error_status() {
        let (url, server) = serve_once(
            "529 Site Overloaded",
            r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#,
        )
        .await;

        let settings = LlmSettings {
            api_key: Some("sk-test".to_string()),
            api_url: url,
            ..Default::default()
        };
        let client = LlmClient::from_config(&settings);
        let err = client.generate("roast them").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("529"), "{message}");
        assert!(message.contains("Overloaded"), "{message}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn mock_server_reply_without_text_is_error() {
        let (url, server) = serve_once("200 OK", r#"{"id":"msg_1","content":[]}"#).await;

        let client = ClaudeClient::new("sk-test".to_string(), DEFAULT_MODEL.to_string())
            .with_api_url(url);
        let err = client.generate("roast them").await.unwrap_err();
        assert!(err.to_string().contains("no text content"));
        server.await.unwrap();
    }
}
