//! Generative-endpoint integration for the Localfind CLI.
//!
//! This crate provides a provider-agnostic abstraction for grounded
//! generation: a prompt goes out with the web-search and maps tools enabled,
//! and the reply comes back as raw text plus the citation sources the
//! endpoint grounded it on.
//!
//! # Providers
//! - **Gemini**: `generateContent` with `google_search` and `google_maps`
//!   grounding tools (default)
//!
//! # Example
//! ```no_run
//! use localfind_llm::{GroundedClient, GroundedRequest, providers::GeminiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new("api-key");
//! let request = GroundedRequest::new("coffee roasters in Izmir", "gemini-2.5-flash");
//! let reply = client.generate(&request).await?;
//! println!("{}", reply.text);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod retry;
pub mod types;

// Re-export main types
pub use client::{GroundedClient, GroundedReply, GroundedRequest, SourceKind, SourceRef};
pub use factory::create_client;
pub use providers::GeminiClient;
pub use retry::RetryPolicy;
pub use types::{LatLng, SearchDepth};
