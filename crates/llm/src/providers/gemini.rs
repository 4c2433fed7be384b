//! Gemini grounded-generation provider.
//!
//! Sends `generateContent` requests with the `google_maps` and
//! `google_search` tools enabled and extracts both the model text and the
//! grounding-chunk citations. When the caller supplies device coordinates
//! they are forwarded through `toolConfig.retrievalConfig.latLng` so the
//! maps tool can bias results toward the user.
//!
//! API: https://ai.google.dev/api/generate-content

use std::collections::HashSet;

use crate::client::{GroundedClient, GroundedReply, GroundedRequest, SourceKind, SourceRef};
use localfind_core::{AppError, AppResult};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini client.
pub struct GeminiClient {
    /// Base URL for the generative endpoint
    base_url: String,

    /// API key appended to each request
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new client against the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Create a new client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Convert a `GroundedRequest` to the wire format.
    fn to_wire_request(&self, request: &GroundedRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            tools: vec![Tool::maps(), Tool::search()],
            tool_config: request.location.map(|loc| ToolConfig {
                retrieval_config: RetrievalConfig {
                    lat_lng: WireLatLng {
                        latitude: loc.latitude,
                        longitude: loc.longitude,
                    },
                },
            }),
        }
    }
}

#[async_trait::async_trait]
impl GroundedClient for GeminiClient {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GroundedRequest) -> AppResult<GroundedReply> {
        tracing::info!(model = %request.model, "Sending generateContent request");
        tracing::debug!("Request: {:?}", request);

        let wire_request = self.to_wire_request(request);
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, request.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                // Connection-level failures are treated as transient
                if e.is_connect() || e.is_timeout() {
                    AppError::Overloaded(format!("Failed to reach endpoint: {}", e))
                } else {
                    AppError::Api(format!("Failed to send request: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(classify_http_error(status, &body));
        }

        let wire_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Api(format!("Failed to parse endpoint response: {}", e)))?;

        tracing::info!("Received generateContent reply");

        convert_response(&request.model, wire_response)
    }
}

/// Map an HTTP failure to the application error taxonomy.
///
/// 429 and 5xx are transient overload; everything else is a plain API
/// error, except bodies that name overload/unavailability explicitly.
fn classify_http_error(status: StatusCode, body: &str) -> AppError {
    let message = extract_error_message(body).unwrap_or_else(|| body.to_string());
    let message = format!("{}: {}", status, message);

    let transient = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    if transient || message.contains("UNAVAILABLE") || message.contains("overloaded") {
        AppError::Overloaded(message)
    } else {
        AppError::Api(message)
    }
}

/// Pull the human-readable message out of an error body, if it is the
/// standard `{"error": {"message": ...}}` shape.
fn extract_error_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    json.get("error")?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}

/// Convert a wire response into a `GroundedReply`.
fn convert_response(model: &str, response: GenerateContentResponse) -> AppResult<GroundedReply> {
    if let Some(feedback) = response.prompt_feedback {
        if let Some(reason) = feedback.block_reason {
            return Err(AppError::SafetyBlocked(format!(
                "Prompt blocked ({}). Please modify your query.",
                reason
            )));
        }
    }

    let mut text_parts = Vec::new();
    let mut sources = Vec::new();
    let mut seen_uris = HashSet::new();

    for candidate in &response.candidates {
        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(AppError::SafetyBlocked(
                "Reply filtered by safety settings. Please modify your query.".to_string(),
            ));
        }

        if let Some(ref content) = candidate.content {
            for part in &content.parts {
                if let Some(ref text) = part.text {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        text_parts.push(trimmed.to_string());
                    }
                }
            }
        }

        if let Some(ref metadata) = candidate.grounding_metadata {
            for chunk in &metadata.grounding_chunks {
                let (reference, kind) = match (&chunk.maps, &chunk.web) {
                    (Some(maps), _) => (maps, SourceKind::Maps),
                    (None, Some(web)) => (web, SourceKind::Web),
                    (None, None) => continue,
                };

                let Some(ref uri) = reference.uri else {
                    continue;
                };

                if !seen_uris.insert(uri.clone()) {
                    continue;
                }

                sources.push(SourceRef {
                    title: reference.title.clone().unwrap_or_else(|| uri.clone()),
                    uri: uri.clone(),
                    kind,
                });
            }
        }
    }

    if text_parts.is_empty() {
        return Err(AppError::Api("Endpoint returned no content".to_string()));
    }

    Ok(GroundedReply {
        text: text_parts.join("\n\n"),
        sources,
        model: model.to_string(),
    })
}

// Wire format: requests

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    tools: Vec<Tool>,
    #[serde(rename = "toolConfig", skip_serializing_if = "Option::is_none")]
    tool_config: Option<ToolConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "google_maps", skip_serializing_if = "Option::is_none")]
    google_maps: Option<EmptyToolSpec>,
    #[serde(rename = "google_search", skip_serializing_if = "Option::is_none")]
    google_search: Option<EmptyToolSpec>,
}

impl Tool {
    fn maps() -> Self {
        Self {
            google_maps: Some(EmptyToolSpec {}),
            google_search: None,
        }
    }

    fn search() -> Self {
        Self {
            google_maps: None,
            google_search: Some(EmptyToolSpec {}),
        }
    }
}

#[derive(Debug, Serialize)]
struct EmptyToolSpec {}

#[derive(Debug, Serialize)]
struct ToolConfig {
    #[serde(rename = "retrievalConfig")]
    retrieval_config: RetrievalConfig,
}

#[derive(Debug, Serialize)]
struct RetrievalConfig {
    #[serde(rename = "latLng")]
    lat_lng: WireLatLng,
}

#[derive(Debug, Serialize)]
struct WireLatLng {
    latitude: f64,
    longitude: f64,
}

// Wire format: responses

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    maps: Option<ChunkReference>,
    web: Option<ChunkReference>,
}

#[derive(Debug, Deserialize)]
struct ChunkReference {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}
