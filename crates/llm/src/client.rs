//! Grounded-generation client abstraction and request/response types.
//!
//! This module defines the core abstractions for interacting with a
//! generative endpoint that supports search/maps grounding tools.

use crate::types::LatLng;
use localfind_core::AppResult;
use serde::{Deserialize, Serialize};

/// A grounded generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundedRequest {
    /// The prompt text to send to the model
    pub prompt: String,

    /// Model identifier (e.g., "gemini-2.5-flash")
    pub model: String,

    /// Optional device coordinates for the maps grounding tool
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LatLng>,
}

impl GroundedRequest {
    /// Create a new request with required fields.
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            location: None,
        }
    }

    /// Attach device coordinates.
    pub fn with_location(mut self, location: LatLng) -> Self {
        self.location = Some(location);
        self
    }
}

/// Where a citation source came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Maps grounding (place listings)
    Maps,
    /// Web search grounding
    Web,
}

/// A citation source extracted from the endpoint's grounding metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    /// Human-readable title (falls back to the URI)
    pub title: String,

    /// Link target
    pub uri: String,

    /// Grounding tool that produced this source
    pub kind: SourceKind,
}

/// A grounded generation reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundedReply {
    /// The model's raw text output
    pub text: String,

    /// Citation sources, in grounding order, deduplicated by URI
    pub sources: Vec<SourceRef>,

    /// Model that generated the reply
    pub model: String,
}

/// Trait for grounded-generation providers.
///
/// This trait abstracts the underlying endpoint (Gemini today) behind a
/// unified interface the dispatch layer can drive and tests can stub.
#[async_trait::async_trait]
pub trait GroundedClient: Send + Sync {
    /// Get the provider name (e.g., "gemini").
    fn provider_name(&self) -> &str;

    /// Perform a grounded generation call.
    ///
    /// # Errors
    /// - `Overloaded` for transient endpoint overload (retryable)
    /// - `SafetyBlocked` when the reply was filtered by safety settings
    /// - `Api` for other endpoint failures, including empty replies
    async fn generate(&self, request: &GroundedRequest) -> AppResult<GroundedReply>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LatLng;

    #[test]
    fn test_request_builder() {
        let location = LatLng::new(41.0, 29.0).unwrap();
        let request =
            GroundedRequest::new("kahvaltı yerleri", "gemini-2.5-flash").with_location(location);

        assert_eq!(request.model, "gemini-2.5-flash");
        assert_eq!(request.location.unwrap().latitude, 41.0);
    }
}
