use base64::{engine::general_purpose, Engine as _};
use image::DynamicImage;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::CONFIG;
use crate::llm::media::detect_mime_type;
use crate::styles;
use crate::utils::http::get_http_client;
use crate::utils::timing::log_llm_timing;

/// One styling invocation: a catalog style, the source portrait bytes, and
/// optional free-text tweaks appended to the style's prompt.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub style_id: String,
    pub source_image: Vec<u8>,
    pub custom_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    Unconfigured,
    ServerError,
    RateLimited,
    AccessDenied,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("API key not configured")]
    Unconfigured,
    #[error("Server error (500). The API may be experiencing issues. Please try again in a few minutes.")]
    Server,
    #[error("Rate limit exceeded. Please wait a moment before trying again.")]
    RateLimited,
    #[error("Access denied. Please check your API key and permissions.")]
    AccessDenied,
    #[error("No image generated in response")]
    NoImage,
    #[error("Error generating image: {0}")]
    Unknown(String),
}

impl GenerationError {
    pub fn category(&self) -> FailureCategory {
        match self {
            GenerationError::Unconfigured => FailureCategory::Unconfigured,
            GenerationError::Server => FailureCategory::ServerError,
            GenerationError::RateLimited => FailureCategory::RateLimited,
            GenerationError::AccessDenied => FailureCategory::AccessDenied,
            GenerationError::NoImage | GenerationError::Unknown(_) => FailureCategory::Unknown,
        }
    }
}

pub type GenerationResult = Result<DynamicImage, GenerationError>;

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

/// Client for the Gemini image-preview `generateContent` endpoint. Holds the
/// credential and the shared HTTP handle for its whole lifetime; stateless
/// across calls. A client built without a key is disabled: `generate` reports
/// `Unconfigured` without touching the network.
pub struct GenerationClient {
    http: Client,
    api_key: Option<String>,
    model: String,
    api_base: String,
    safety_profile: String,
}

impl GenerationClient {
    pub fn from_config() -> Self {
        Self::new(
            CONFIG.gemini_api_key.clone(),
            CONFIG.gemini_image_model.clone(),
            CONFIG.gemini_api_base.clone(),
            CONFIG.gemini_safety_settings.clone(),
        )
    }

    pub fn new(api_key: String, model: String, api_base: String, safety_profile: String) -> Self {
        let trimmed = api_key.trim();
        let api_key = (!trimmed.is_empty()).then(|| trimmed.to_string());
        GenerationClient {
            http: get_http_client().clone(),
            api_key,
            model,
            api_base,
            safety_profile,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Runs one style transfer. Exactly one round trip, no retries, no
    /// client-side deadline; every transport or service fault comes back as a
    /// classified `GenerationError`, never as a panic or propagated fault.
    ///
    /// The style id must come from the catalog; an id outside it is a caller
    /// bug and panics.
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(GenerationError::Unconfigured);
        };

        let style = styles::get(&request.style_id)
            .unwrap_or_else(|| panic!("unknown style id: {}", request.style_id));

        let prompt = compose_prompt(style.prompt_template, request.custom_text.as_deref());
        debug!(
            target: "llm.gemini",
            style = style.id,
            prompt_chars = prompt.len(),
            image_bytes = request.source_image.len(),
            "composed generation prompt"
        );

        let payload = self.build_payload(&prompt, &request.source_image);

        log_llm_timing(
            "gemini",
            &self.model,
            "generate_pfp",
            Some(json!({ "style": style.id })),
            || async {
                let response = self.invoke(api_key, &payload).await?;
                first_image_in_response(response)
            },
        )
        .await
    }

    fn build_payload(&self, prompt: &str, source_image: &[u8]) -> Value {
        let mime_type =
            detect_mime_type(source_image).unwrap_or_else(|| "image/png".to_string());
        let encoded = general_purpose::STANDARD.encode(source_image);
        json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "text": prompt },
                    { "inlineData": { "mimeType": mime_type, "data": encoded } }
                ]
            }],
            "generationConfig": {
                "responseModalities": ["TEXT", "IMAGE"]
            },
            "safetySettings": build_safety_settings(&self.safety_profile),
        })
    }

    async fn invoke(
        &self,
        api_key: &str,
        payload: &Value,
    ) -> Result<GeminiResponse, GenerationError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, self.model, api_key
        );

        let response = match self.http.post(&url).json(payload).send().await {
            Ok(response) => response,
            Err(err) => {
                let err_text = self.redact_api_key(&err.to_string());
                warn!(
                    "Gemini request failed to send: {} (timeout={}, connect={})",
                    err_text,
                    err.is_timeout(),
                    err.is_connect()
                );
                return Err(classify_fault_text(&err_text));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let (message, body_summary) = summarize_error_body(&body);
            warn!("Gemini API error: status={}, body={}", status, body_summary);
            let detail = message.unwrap_or(body_summary);
            return Err(classify_status(status, &self.redact_api_key(&detail)));
        }

        response
            .json::<GeminiResponse>()
            .await
            .map_err(|err| GenerationError::Unknown(self.redact_api_key(&err.to_string())))
    }

    fn redact_api_key(&self, text: &str) -> String {
        match self.api_key.as_deref() {
            Some(key) => text.replace(key, "[redacted]"),
            None => text.to_string(),
        }
    }
}

/// Appends the optional user tweaks to a style's prompt template. Whitespace-
/// only tweaks count as absent; otherwise the template and the tweak pass
/// through verbatim.
pub fn compose_prompt(template: &str, custom_text: Option<&str>) -> String {
    match custom_text {
        Some(text) if !text.trim().is_empty() => {
            format!("{template}\n\nAdditional modifications: {text}")
        }
        _ => template.to_string(),
    }
}

fn build_safety_settings(profile: &str) -> Vec<Value> {
    let threshold = match profile {
        "standard" => "BLOCK_MEDIUM_AND_ABOVE",
        _ => "OFF",
    };

    vec![
        json!({ "category": "HARM_CATEGORY_HARASSMENT", "threshold": threshold }),
        json!({ "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": threshold }),
        json!({ "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": threshold }),
        json!({ "category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": threshold }),
        json!({ "category": "HARM_CATEGORY_CIVIC_INTEGRITY", "threshold": threshold }),
    ]
}

// First image wins: the model may chat around the image, and only the first
// inline image part is authoritative. Text parts are surfaced as diagnostics.
fn first_image_in_response(response: GeminiResponse) -> GenerationResult {
    for candidate in response.candidates.unwrap_or_default() {
        let parts = candidate
            .content
            .and_then(|content| content.parts)
            .unwrap_or_default();
        for part in parts {
            match part {
                GeminiPart::Text { text } => {
                    if !text.trim().is_empty() {
                        info!("Model commentary: {}", truncate_for_log(&text, 400));
                    }
                }
                GeminiPart::InlineData { inline_data } => {
                    if !inline_data.mime_type.starts_with("image/") {
                        continue;
                    }
                    let bytes = general_purpose::STANDARD
                        .decode(inline_data.data)
                        .map_err(|err| {
                            GenerationError::Unknown(format!("invalid base64 image payload: {err}"))
                        })?;
                    let image = image::load_from_memory(&bytes).map_err(|err| {
                        GenerationError::Unknown(format!("undecodable image payload: {err}"))
                    })?;
                    return Ok(image);
                }
                GeminiPart::Other(_) => {}
            }
        }
    }

    Err(GenerationError::NoImage)
}

// Typed statuses classify on the numeric code; the taxonomy and its priority
// (server error before rate limit before access) match the substring fallback.
fn classify_status(status: StatusCode, detail: &str) -> GenerationError {
    if status.is_server_error() {
        GenerationError::Server
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        GenerationError::RateLimited
    } else if status == StatusCode::FORBIDDEN {
        GenerationError::AccessDenied
    } else {
        GenerationError::Unknown(format!("status {status}: {detail}"))
    }
}

// Fallback for faults that only surface as text (connect/timeout errors from
// the transport). Substring tests run in priority order.
fn classify_fault_text(text: &str) -> GenerationError {
    if text.contains("500") {
        GenerationError::Server
    } else if text.contains("429") {
        GenerationError::RateLimited
    } else if text.contains("403") {
        GenerationError::AccessDenied
    } else {
        GenerationError::Unknown(text.to_string())
    }
}

fn summarize_error_body(body: &str) -> (Option<String>, String) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return (None, "empty response body".to_string());
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        let message = value
            .pointer("/error/message")
            .and_then(|v| v.as_str())
            .map(|v| v.to_string())
            .or_else(|| {
                value
                    .get("message")
                    .and_then(|v| v.as_str())
                    .map(|v| v.to_string())
            });
        return (message, truncate_for_log(&value.to_string(), 2000));
    }

    (None, truncate_for_log(trimmed, 2000))
}

fn truncate_for_log(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 PNG, the smallest payload the image crate will decode.
    const TINY_PNG_B64: &str =
        "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    fn response_from(parts: Value) -> GeminiResponse {
        serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": parts } }]
        }))
        .expect("test response must deserialize")
    }

    fn disabled_client() -> GenerationClient {
        GenerationClient::new(
            String::new(),
            "test-model".to_string(),
            // Unroutable on purpose: an accidental network attempt would fail
            // with a category other than Unconfigured and break the test.
            "http://127.0.0.1:9".to_string(),
            "permissive".to_string(),
        )
    }

    #[test]
    fn compose_prompt_without_custom_text_is_the_template() {
        assert_eq!(compose_prompt("Template text.", None), "Template text.");
        assert_eq!(compose_prompt("Template text.", Some("")), "Template text.");
        assert_eq!(
            compose_prompt("Template text.", Some("   \n\t")),
            "Template text."
        );
    }

    #[test]
    fn compose_prompt_appends_custom_text_verbatim() {
        assert_eq!(
            compose_prompt("Template text.", Some("add a galaxy background")),
            "Template text.\n\nAdditional modifications: add a galaxy background"
        );
    }

    #[test]
    fn first_image_wins_over_leading_text() {
        let response = response_from(json!([
            { "text": "Here is your styled portrait:" },
            { "inlineData": { "mimeType": "image/png", "data": TINY_PNG_B64 } },
            { "text": "hope you like it" }
        ]));

        let image = first_image_in_response(response).expect("image part must win");
        assert_eq!((image.width(), image.height()), (1, 1));
    }

    #[test]
    fn text_only_response_reports_no_image() {
        let response = response_from(json!([
            { "text": "I cannot produce an image for this request." }
        ]));

        let err = first_image_in_response(response).unwrap_err();
        assert_eq!(err, GenerationError::NoImage);
        assert_eq!(err.category(), FailureCategory::Unknown);
        assert_eq!(err.to_string(), "No image generated in response");
    }

    #[test]
    fn non_image_inline_parts_are_skipped() {
        let response = response_from(json!([
            { "inlineData": { "mimeType": "application/octet-stream", "data": "AAAA" } },
            { "inlineData": { "mimeType": "image/png", "data": TINY_PNG_B64 } }
        ]));

        assert!(first_image_in_response(response).is_ok());
    }

    #[test]
    fn unrecognized_part_shapes_do_not_break_the_scan() {
        let response = response_from(json!([
            { "fileData": { "fileUri": "https://example.com/file" } },
            { "inlineData": { "mimeType": "image/png", "data": TINY_PNG_B64 } }
        ]));

        assert!(first_image_in_response(response).is_ok());
    }

    #[test]
    fn corrupt_image_payload_surfaces_as_unknown() {
        let response = response_from(json!([
            { "inlineData": { "mimeType": "image/png", "data": "!!!not-base64!!!" } }
        ]));

        let err = first_image_in_response(response).unwrap_err();
        assert_eq!(err.category(), FailureCategory::Unknown);
    }

    #[test]
    fn typed_statuses_classify_by_code() {
        for code in [500u16, 502, 503] {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(classify_status(status, ""), GenerationError::Server);
        }
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, ""),
            GenerationError::RateLimited
        );
        assert_eq!(
            classify_status(StatusCode::FORBIDDEN, ""),
            GenerationError::AccessDenied
        );

        let err = classify_status(StatusCode::NOT_FOUND, "model not found");
        assert_eq!(err.category(), FailureCategory::Unknown);
        assert_eq!(
            err.to_string(),
            "Error generating image: status 404 Not Found: model not found"
        );
    }

    #[test]
    fn fault_text_classifies_by_substring() {
        assert_eq!(
            classify_fault_text("HTTP 500 internal error"),
            GenerationError::Server
        );
        assert_eq!(
            classify_fault_text("got 429 from upstream"),
            GenerationError::RateLimited
        );
        assert_eq!(
            classify_fault_text("403 forbidden"),
            GenerationError::AccessDenied
        );

        let err = classify_fault_text("connection reset by peer");
        assert_eq!(err.category(), FailureCategory::Unknown);
        assert_eq!(
            err.to_string(),
            "Error generating image: connection reset by peer"
        );
    }

    #[test]
    fn fault_text_priority_is_server_before_rate_limit() {
        assert_eq!(
            classify_fault_text("status 500 after 429 retry"),
            GenerationError::Server
        );
    }

    #[test]
    fn category_messages_are_fixed() {
        assert_eq!(
            GenerationError::Server.to_string(),
            "Server error (500). The API may be experiencing issues. Please try again in a few minutes."
        );
        assert_eq!(
            GenerationError::RateLimited.to_string(),
            "Rate limit exceeded. Please wait a moment before trying again."
        );
        assert_eq!(
            GenerationError::AccessDenied.to_string(),
            "Access denied. Please check your API key and permissions."
        );
        assert_eq!(
            GenerationError::Unconfigured.to_string(),
            "API key not configured"
        );
    }

    #[tokio::test]
    async fn unconfigured_client_short_circuits_for_every_style() {
        let client = disabled_client();
        assert!(!client.is_configured());

        for style in crate::styles::all() {
            let request = GenerationRequest {
                style_id: style.id.to_string(),
                source_image: vec![0u8; 4],
                custom_text: None,
            };
            let err = client.generate(&request).await.unwrap_err();
            assert_eq!(err.category(), FailureCategory::Unconfigured);
        }
    }

    #[test]
    fn whitespace_only_key_disables_the_client() {
        let client = GenerationClient::new(
            "   ".to_string(),
            "test-model".to_string(),
            "http://127.0.0.1:9".to_string(),
            "permissive".to_string(),
        );
        assert!(!client.is_configured());
    }

    #[test]
    fn error_body_summary_prefers_the_api_message() {
        let (message, _) = summarize_error_body(
            r#"{"error": {"code": 429, "message": "Resource has been exhausted"}}"#,
        );
        assert_eq!(message.as_deref(), Some("Resource has been exhausted"));

        let (message, summary) = summarize_error_body("");
        assert_eq!(message, None);
        assert_eq!(summary, "empty response body");
    }
}
