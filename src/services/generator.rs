use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::GeneratorConfig;
use crate::constants::IMAGE_PROMPT_STYLE;
use crate::flow::{GenerationRequest, InputMode};
use crate::services::mock;
use crate::services::schema::{session_schema, SYSTEM_INSTRUCTION};
use crate::session::Session;

const API_KEY_HEADER: &str = "x-goog-api-key";
const ERROR_BODY_LIMIT: usize = 512;

/// Client for the `generateContent` endpoint, with an offline mock mode.
#[derive(Debug, Clone)]
pub struct GenerativeClient {
    config: GeneratorConfig,
    client: reqwest::Client,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generator is disabled")]
    Disabled,
    #[error("generator api key is missing")]
    MissingApiKey,
    #[error("generator request timed out")]
    Timeout,
    #[error("generator network error: {0}")]
    Network(String),
    #[error("generator api error: status={status}, message={message}")]
    Api { status: u16, message: String },
    #[error("generator returned no usable content")]
    EmptyResponse,
    #[error("generator returned an undecodable session: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(e.to_string())
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    generation_config: Value,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: Option<String>,
    data: String,
}

impl GenerateResponse {
    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .into_iter()
            .flat_map(|c| c.parts.iter())
    }

    fn first_text(&self) -> Option<&str> {
        self.parts().find_map(|p| p.text.as_deref())
    }

    fn first_image(&self) -> Option<String> {
        self.parts().find_map(|p| {
            p.inline_data.as_ref().map(|d| {
                let mime = d.mime_type.as_deref().unwrap_or("image/png");
                format!("data:{mime};base64,{}", d.data)
            })
        })
    }
}

/// Prompt for a session request.
pub fn session_prompt(request: &GenerationRequest) -> String {
    let mut prompt = match request.mode {
        InputMode::Text => format!("Text: {}", request.input),
        InputMode::Topic | InputMode::Forge => format!("Topic: {}", request.input),
    };
    if !request.manual_words.is_empty() {
        prompt.push_str("\nTarget words: ");
        prompt.push_str(&request.manual_words.join(", "));
    }
    prompt
}

pub fn image_prompt(visual_prompt: &str) -> String {
    format!("{visual_prompt}. {IMAGE_PROMPT_STYLE}")
}

impl GenerativeClient {
    pub fn new(config: &GeneratorConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            config: config.clone(),
            client,
        }
    }

    /// Rejects a live configuration that cannot authenticate.
    pub fn validate_config(config: &GeneratorConfig) -> Result<(), GenerationError> {
        if config.enabled && !config.mock && config.api_key.trim().is_empty() {
            return Err(GenerationError::MissingApiKey);
        }
        Ok(())
    }

    pub fn is_mock(&self) -> bool {
        self.config.mock
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            model
        )
    }

    async fn call(&self, model: &str, body: &GenerateRequest<'_>) -> Result<GenerateResponse, GenerationError> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut message = response.text().await.unwrap_or_default();
            if message.len() > ERROR_BODY_LIMIT {
                let cut = (0..=ERROR_BODY_LIMIT)
                    .rev()
                    .find(|i| message.is_char_boundary(*i))
                    .unwrap_or(0);
                message.truncate(cut);
            }
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<GenerateResponse>().await?)
    }

    /// Generates a full session. The returned session is not validated here.
    pub async fn generate_session(&self, request: &GenerationRequest) -> Result<Session, GenerationError> {
        if !self.config.enabled {
            return Err(GenerationError::Disabled);
        }
        if self.config.mock {
            return Ok(mock::mock_session(request));
        }

        let prompt = session_prompt(request);
        let body = GenerateRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![TextPart { text: &prompt }],
            }],
            system_instruction: Some(Content {
                role: None,
                parts: vec![TextPart {
                    text: SYSTEM_INSTRUCTION,
                }],
            }),
            generation_config: serde_json::json!({
                "responseMimeType": "application/json",
                "responseSchema": session_schema(),
            }),
        };

        let started = std::time::Instant::now();
        let response = self.call(&self.config.text_model, &body).await?;
        let text = response.first_text().ok_or(GenerationError::EmptyResponse)?;
        let session: Session = serde_json::from_str(text)?;
        tracing::info!(
            model = %self.config.text_model,
            words = session.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Session generated"
        );
        Ok(session)
    }

    /// Generates an illustration as a data URI. Any failure yields `None`.
    pub async fn generate_image(&self, visual_prompt: &str) -> Option<String> {
        if !self.config.enabled {
            return None;
        }
        if self.config.mock {
            return Some(mock::MOCK_IMAGE.to_string());
        }

        let prompt = image_prompt(visual_prompt);
        let body = GenerateRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![TextPart { text: &prompt }],
            }],
            system_instruction: None,
            generation_config: serde_json::json!({
                "responseModalities": ["IMAGE"],
                "imageConfig": { "aspectRatio": "1:1" },
            }),
        };

        match self.call(&self.config.image_model, &body).await {
            Ok(response) => response.first_image(),
            Err(e) => {
                tracing::debug!(error = %e, "Image generation failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::SessionTicket;

    fn request(mode: InputMode, input: &str, manual: &[&str]) -> GenerationRequest {
        GenerationRequest {
            ticket: SessionTicket(1),
            mode,
            input: input.to_string(),
            manual_words: manual.iter().map(|w| w.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn disabled_mode_returns_error() {
        let cfg = GeneratorConfig {
            enabled: false,
            ..GeneratorConfig::mock()
        };
        let client = GenerativeClient::new(&cfg);
        let result = client
            .generate_session(&request(InputMode::Topic, "tides", &[]))
            .await;
        assert!(matches!(result, Err(GenerationError::Disabled)));
        assert_eq!(client.generate_image("waves").await, None);
    }

    #[tokio::test]
    async fn mock_mode_builds_session_and_image() {
        let client = GenerativeClient::new(&GeneratorConfig::mock());
        let session = client
            .generate_session(&request(InputMode::Topic, "photosynthesis", &[]))
            .await
            .unwrap();
        assert!(!session.words.is_empty());
        let image = client.generate_image("leaf").await.unwrap();
        assert!(image.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn live_mode_needs_a_key() {
        let cfg = GeneratorConfig {
            mock: false,
            api_key: " ".to_string(),
            ..GeneratorConfig::mock()
        };
        assert!(matches!(
            GenerativeClient::validate_config(&cfg),
            Err(GenerationError::MissingApiKey)
        ));
        assert!(GenerativeClient::validate_config(&GeneratorConfig::mock()).is_ok());
    }

    #[test]
    fn prompts_follow_mode() {
        assert_eq!(
            session_prompt(&request(InputMode::Topic, "tides", &[])),
            "Topic: tides"
        );
        assert_eq!(
            session_prompt(&request(InputMode::Text, "calm sea", &["calm", "sea"])),
            "Text: calm sea\nTarget words: calm, sea"
        );
        assert_eq!(
            image_prompt("a glowing orb"),
            "a glowing orb. 3D render, octane, cinematic, vibrant."
        );
    }

    #[test]
    fn response_extracts_text_and_inline_image() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "{\"topic\":\"t\"}" },
                        { "inlineData": { "mimeType": "image/jpeg", "data": "QUJD" } }
                    ]
                }
            }]
        });
        let response: GenerateResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.first_text(), Some("{\"topic\":\"t\"}"));
        assert_eq!(
            response.first_image().as_deref(),
            Some("data:image/jpeg;base64,QUJD")
        );
    }

    #[test]
    fn empty_response_has_nothing() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(response.first_text().is_none());
        assert!(response.first_image().is_none());
    }

    #[test]
    fn endpoint_joins_model() {
        let cfg = GeneratorConfig {
            api_url: "https://example.test/v1beta/".to_string(),
            ..GeneratorConfig::mock()
        };
        let client = GenerativeClient::new(&cfg);
        assert_eq!(
            client.endpoint("gemini-2.5-flash-image"),
            "https://example.test/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
    }

    mod live {
        use axum::extract::Path;
        use axum::http::{HeaderMap, StatusCode};
        use axum::response::{IntoResponse, Response};
        use axum::routing::post;
        use axum::{Json, Router};
        use serde_json::{json, Value};

        use super::*;
        use crate::session::fixtures;

        const KEY: &str = "test-key";

        async fn generate(
            Path(call): Path<String>,
            headers: HeaderMap,
            Json(body): Json<Value>,
        ) -> Response {
            if headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) != Some(KEY) {
                return StatusCode::UNAUTHORIZED.into_response();
            }
            match call.trim_end_matches(":generateContent") {
                "text-ok" => {
                    if body["generationConfig"]["responseMimeType"] != "application/json"
                        || body["systemInstruction"].is_null()
                    {
                        return StatusCode::BAD_REQUEST.into_response();
                    }
                    let text = serde_json::to_string(&fixtures::session(2)).unwrap();
                    Json(json!({
                        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
                    }))
                    .into_response()
                }
                "text-empty" => Json(json!({ "candidates": [] })).into_response(),
                "image-ok" => Json(json!({
                    "candidates": [{
                        "content": {
                            "parts": [{ "inlineData": { "mimeType": "image/webp", "data": "QUJD" } }]
                        }
                    }]
                }))
                .into_response(),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "é".repeat(600)).into_response(),
            }
        }

        async fn serve_stub() -> String {
            let app = Router::new().route("/models/:call", post(generate));
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });
            format!("http://{addr}")
        }

        fn client(api_url: &str, text_model: &str, image_model: &str) -> GenerativeClient {
            GenerativeClient::new(&GeneratorConfig {
                enabled: true,
                mock: false,
                api_url: api_url.to_string(),
                api_key: KEY.to_string(),
                text_model: text_model.to_string(),
                image_model: image_model.to_string(),
                timeout_secs: 5,
            })
        }

        #[tokio::test]
        async fn decodes_session_from_first_text_part() {
            let url = serve_stub().await;
            let session = client(&url, "text-ok", "image-ok")
                .generate_session(&request(InputMode::Topic, "tides", &[]))
                .await
                .unwrap();
            assert_eq!(session, fixtures::session(2));
        }

        #[tokio::test]
        async fn server_error_is_an_api_error_cut_on_a_char_boundary() {
            let url = serve_stub().await;
            let result = client(&url, "text-broken", "image-ok")
                .generate_session(&request(InputMode::Topic, "tides", &[]))
                .await;
            let (status, message) = match result {
                Err(GenerationError::Api { status, message }) => (status, message),
                other => panic!("expected an api error, got {other:?}"),
            };
            assert_eq!(status, 500);
            assert!(!message.is_empty() && message.len() <= ERROR_BODY_LIMIT);
            assert!(message.chars().all(|c| c == 'é'));
        }

        #[tokio::test]
        async fn missing_candidates_is_an_empty_response() {
            let url = serve_stub().await;
            let result = client(&url, "text-empty", "image-ok")
                .generate_session(&request(InputMode::Topic, "tides", &[]))
                .await;
            assert!(matches!(result, Err(GenerationError::EmptyResponse)));
        }

        #[tokio::test]
        async fn image_comes_back_as_data_uri() {
            let url = serve_stub().await;
            let image = client(&url, "text-ok", "image-ok").generate_image("a glowing orb").await;
            assert_eq!(image.as_deref(), Some("data:image/webp;base64,QUJD"));
        }

        #[tokio::test]
        async fn failed_image_call_leaves_image_absent() {
            let url = serve_stub().await;
            let client = client(&url, "text-ok", "image-broken");
            assert_eq!(client.generate_image("a glowing orb").await, None);
        }

        #[tokio::test]
        async fn unreachable_server_is_a_network_error() {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            let url = format!("http://{}", listener.local_addr().unwrap());
            drop(listener);
            let result = client(&url, "text-ok", "image-ok")
                .generate_session(&request(InputMode::Topic, "tides", &[]))
                .await;
            assert!(matches!(result, Err(GenerationError::Network(_))));
        }
    }
}
