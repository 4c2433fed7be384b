//! Grounded-client factory.
//!
//! This module provides a factory for creating grounded-generation clients
//! based on application configuration. It handles provider resolution and
//! secret injection.

use crate::client::GroundedClient;
use crate::providers::GeminiClient;
use std::sync::Arc;

/// Create a grounded client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier (currently "gemini")
/// * `endpoint` - Optional custom endpoint base URL
/// * `api_key` - API key (required by gemini)
///
/// # Errors
/// Returns error if the provider is unknown or required secrets are missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> Result<Arc<dyn GroundedClient>, String> {
    match provider.to_lowercase().as_str() {
        "gemini" | "google" => {
            let Some(api_key) = api_key else {
                return Err("Gemini provider requires API key".to_string());
            };
            let client = match endpoint {
                Some(base_url) => GeminiClient::with_base_url(base_url, api_key),
                None => GeminiClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        _ => Err(format!("Unknown provider: {}", provider)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_gemini_client() {
        let client = create_client("gemini", None, Some("key"));
        assert!(client.is_ok());
        assert_eq!(client.unwrap().provider_name(), "gemini");
    }

    #[test]
    fn test_gemini_requires_api_key() {
        match create_client("gemini", None, None) {
            Err(err) => assert!(err.contains("requires API key")),
            Ok(_) => panic!("Expected error for Gemini without API key"),
        }
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None, Some("key")) {
            Err(err) => assert!(err.contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
