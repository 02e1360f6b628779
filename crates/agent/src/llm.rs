use std::time::Duration;

use async_trait::async_trait;
use proposey_core::config::{LlmConfig, LlmProvider};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const MAX_ERROR_BODY_CHARS: usize = 500;

/// JSON schema the model output must conform to, with the name the provider reports it under.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputSchema {
    pub name: String,
    pub schema: Value,
}

/// Why a provider call failed, derived from the HTTP status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LlmErrorKind {
    /// 401/403: bad API key or permissions.
    Auth,
    /// 404: unknown model.
    NotFound,
    RateLimit,
    /// 5xx: provider-side outage.
    ServerError,
    Unknown,
}

impl LlmErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Auth,
            404 => Self::NotFound,
            429 => Self::RateLimit,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("llm provider returned {status} ({kind:?}): {message}")]
    Status { status: u16, kind: LlmErrorKind, message: String },
    #[error("llm request timed out: {0}")]
    Timeout(String),
    #[error("llm transport failure: {0}")]
    Transport(String),
    #[error("llm response was malformed: {0}")]
    MalformedResponse(String),
    #[error("llm output does not match the draft schema: {0}")]
    Schema(String),
    #[error("llm client is misconfigured: {0}")]
    Configuration(String),
}

impl LlmError {
    pub fn from_status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            kind: LlmErrorKind::from_status(status),
            message: truncate_body(body),
        }
    }

    pub fn network(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Generative-model capability: one prompt in, one schema-constrained JSON value out.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate_object(&self, prompt: &str, schema: &OutputSchema)
        -> Result<Value, LlmError>;
}

/// Client for any `/chat/completions` endpoint that honours `response_format: json_schema`.
#[derive(Clone, Debug)]
pub struct OpenAiCompatibleClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
    temperature: f32,
}

impl OpenAiCompatibleClient {
    pub fn new(
        base_url: &str,
        api_key: Option<SecretString>,
        model: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(LlmError::Configuration(format!(
                "base url `{base_url}` must start with http:// or https://"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| LlmError::Configuration(format!("failed to build http client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key,
            model: model.into(),
            temperature,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let base_url = resolve_base_url(config)?;
        Self::new(
            &base_url,
            config.api_key.clone(),
            config.model.clone(),
            config.temperature,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, prompt: &str, schema: &OutputSchema) -> Value {
        json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [{ "role": "user", "content": prompt }],
            "response_format": {
                "type": "json_schema",
                "json_schema": { "name": schema.name, "schema": schema.schema },
            },
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatibleClient {
    async fn generate_object(
        &self,
        prompt: &str,
        schema: &OutputSchema,
    ) -> Result<Value, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(
            event_name = "llm.request.started",
            model = %self.model,
            url = %url,
            schema = %schema.name,
            "calling llm provider"
        );

        let mut request = self.client.post(&url).json(&self.request_body(prompt, schema));
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request.send().await.map_err(|err| LlmError::network(&err))?;
        let status = response.status();
        let text = response.text().await.map_err(|err| LlmError::network(&err))?;

        if !status.is_success() {
            warn!(
                event_name = "llm.request.failed",
                status = status.as_u16(),
                model = %self.model,
                "llm provider returned an error status"
            );
            return Err(LlmError::from_status(status.as_u16(), &text));
        }

        let data: Value = serde_json::from_str(&text)
            .map_err(|err| LlmError::MalformedResponse(format!("response is not json: {err}")))?;
        let content = data["choices"]
            .get(0)
            .and_then(|choice| choice["message"]["content"].as_str())
            .ok_or_else(|| {
                LlmError::MalformedResponse("no message content in first choice".to_string())
            })?;

        serde_json::from_str(content).map_err(|err| {
            LlmError::MalformedResponse(format!("message content is not json: {err}"))
        })
    }
}

fn resolve_base_url(config: &LlmConfig) -> Result<String, LlmError> {
    let configured = config
        .base_url
        .as_deref()
        .map(|value| value.trim().trim_end_matches('/'))
        .filter(|value| !value.is_empty());

    match config.provider {
        LlmProvider::OpenAi => Ok(configured.unwrap_or(OPENAI_DEFAULT_BASE_URL).to_string()),
        LlmProvider::Ollama => configured
            .map(|base| format!("{base}/v1"))
            .ok_or_else(|| LlmError::Configuration("ollama requires llm.base_url".to_string())),
    }
}

fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }
    let mut truncated = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect::<String>();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use proposey_core::config::{LlmConfig, LlmProvider};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use super::{LlmClient, LlmError, LlmErrorKind, OpenAiCompatibleClient, OutputSchema};

    async fn spawn(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub listener");
        let address = listener.local_addr().expect("stub address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{address}")
    }

    fn schema() -> OutputSchema {
        OutputSchema { name: "proposal_draft".to_string(), schema: json!({ "type": "object" }) }
    }

    fn client(base_url: &str, api_key: Option<&str>) -> OpenAiCompatibleClient {
        OpenAiCompatibleClient::new(
            base_url,
            api_key.map(|key| key.to_string().into()),
            "gpt-4o-mini",
            0.7,
            Duration::from_secs(5),
        )
        .expect("client should build")
    }

    fn llm_config(provider: LlmProvider, base_url: Option<&str>) -> LlmConfig {
        LlmConfig {
            provider,
            api_key: None,
            base_url: base_url.map(str::to_string),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 5,
            temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn generate_object_sends_schema_and_parses_message_content() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let authorized = headers
                    .get("authorization")
                    .and_then(|value| value.to_str().ok())
                    == Some("Bearer sk-test");
                let well_formed = body["model"] == "gpt-4o-mini"
                    && body["response_format"]["type"] == "json_schema"
                    && body["response_format"]["json_schema"]["name"] == "proposal_draft"
                    && body["messages"][0]["content"] == "write a proposal";
                if !(authorized && well_formed) {
                    return (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad request" })));
                }
                let content = json!({ "title_md": "# Hi", "description_md": "Body" }).to_string();
                (
                    StatusCode::OK,
                    Json(json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })),
                )
            }),
        );
        let base_url = spawn(router).await;

        let value = client(&format!("{base_url}/v1"), Some("sk-test"))
            .generate_object("write a proposal", &schema())
            .await
            .expect("generation should succeed");

        assert_eq!(value, json!({ "title_md": "# Hi", "description_md": "Body" }));
    }

    #[tokio::test]
    async fn error_status_is_classified() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
        );
        let base_url = spawn(router).await;

        let error = client(&base_url, None)
            .generate_object("prompt", &schema())
            .await
            .expect_err("401 should fail");

        assert!(matches!(
            error,
            LlmError::Status { status: 401, kind: LlmErrorKind::Auth, ref message }
                if message == "invalid api key"
        ));
    }

    #[tokio::test]
    async fn non_json_message_content_is_malformed() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async {
                Json(json!({ "choices": [{ "message": { "content": "Sure! Here is your proposal" } }] }))
            }),
        );
        let base_url = spawn(router).await;

        let error = client(&base_url, None)
            .generate_object("prompt", &schema())
            .await
            .expect_err("prose content should fail");

        assert!(matches!(error, LlmError::MalformedResponse(_)));
    }

    #[test]
    fn base_url_follows_provider() {
        let openai = OpenAiCompatibleClient::from_config(&llm_config(LlmProvider::OpenAi, None))
            .expect("openai client");
        assert_eq!(openai.base_url(), "https://api.openai.com/v1");

        let ollama = OpenAiCompatibleClient::from_config(&llm_config(
            LlmProvider::Ollama,
            Some("http://localhost:11434/"),
        ))
        .expect("ollama client");
        assert_eq!(ollama.base_url(), "http://localhost:11434/v1");
    }

    #[test]
    fn status_kinds_cover_common_failures() {
        assert_eq!(LlmErrorKind::from_status(403), LlmErrorKind::Auth);
        assert_eq!(LlmErrorKind::from_status(429), LlmErrorKind::RateLimit);
        assert_eq!(LlmErrorKind::from_status(503), LlmErrorKind::ServerError);
        assert_eq!(LlmErrorKind::from_status(418), LlmErrorKind::Unknown);
    }
}
