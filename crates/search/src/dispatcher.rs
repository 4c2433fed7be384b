//! Two-tier search dispatch.
//!
//! Tier one: each model call runs under the overload retry policy
//! (exponential backoff), and an unparseable reply re-issues the same
//! request a bounded number of times. Tier two: if the preferred model
//! variant stays overloaded after its budget, the search falls back once to
//! the other variant. Safety blocks and other non-transient errors surface
//! immediately and never switch models.

use crate::normalize::normalize_response;
use crate::record::Business;
use localfind_core::{AppConfig, AppError, AppResult};
use localfind_llm::{GroundedClient, GroundedRequest, RetryPolicy, SearchDepth, SourceRef};
use localfind_prompt::{build_search_prompt, build_search_prompt_with};

/// One search invocation.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Natural-language business query
    pub query: String,

    /// Optional device coordinates for maps grounding
    pub location: Option<localfind_llm::LatLng>,

    /// Preferred model-speed variant
    pub depth: SearchDepth,
}

/// The result of a dispatched search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Normalized business records, in model output order
    pub businesses: Vec<Business>,

    /// Citation sources from grounding metadata
    pub sources: Vec<SourceRef>,

    /// Model that produced the final reply
    pub model_used: String,

    /// Whether the reply came from the fallback variant
    pub fallback_used: bool,
}

/// Run a search with retry and model fallback.
pub async fn find_businesses(
    client: &dyn GroundedClient,
    config: &AppConfig,
    options: &SearchOptions,
) -> AppResult<SearchOutcome> {
    let prompt = build_prompt(config, &options.query)?;
    let policy = RetryPolicy::new(config.retry.max_attempts, config.retry.initial_delay_ms);

    let primary_model = config.model_for(options.depth.as_str())?;
    tracing::info!(
        "Searching with {} ({})",
        options.depth.label(),
        primary_model
    );

    match attempt_with_model(client, config, options, &prompt, primary_model, &policy).await {
        Ok((businesses, sources, model_used)) => Ok(SearchOutcome {
            businesses,
            sources,
            model_used,
            fallback_used: false,
        }),
        Err(e) if e.is_overloaded() => {
            let fallback_depth = options.depth.fallback();
            let fallback_model = config.model_for(fallback_depth.as_str())?;
            tracing::warn!(
                "{} ({}) is overloaded. Trying {} ({})...",
                options.depth.label(),
                primary_model,
                fallback_depth.label(),
                fallback_model
            );

            match attempt_with_model(client, config, options, &prompt, fallback_model, &policy)
                .await
            {
                Ok((businesses, sources, model_used)) => Ok(SearchOutcome {
                    businesses,
                    sources,
                    model_used,
                    fallback_used: true,
                }),
                Err(e2) if e2.is_overloaded() => Err(AppError::Overloaded(
                    "Both fast and deep search models are currently overloaded. \
                     Please try again in a few moments."
                        .to_string(),
                )),
                Err(e2) => Err(e2),
            }
        }
        Err(e) => Err(e),
    }
}

/// Run the request/normalize loop for one model, consuming the bounded
/// parse-retry budget on malformed replies.
async fn attempt_with_model(
    client: &dyn GroundedClient,
    config: &AppConfig,
    options: &SearchOptions,
    prompt: &str,
    model: &str,
    policy: &RetryPolicy,
) -> AppResult<(Vec<Business>, Vec<SourceRef>, String)> {
    let mut request = GroundedRequest::new(prompt, model);
    if let Some(location) = options.location {
        request = request.with_location(location);
    }

    let mut parse_attempt = 0u32;

    loop {
        let reply = policy.run(|| client.generate(&request)).await?;

        match normalize_response(&reply.text) {
            Ok(businesses) => {
                tracing::info!(
                    "Normalized {} businesses, {} sources (model {})",
                    businesses.len(),
                    reply.sources.len(),
                    reply.model
                );
                return Ok((businesses, reply.sources, reply.model));
            }
            Err(e) if e.is_malformed() && parse_attempt < config.retry.parse_retries => {
                parse_attempt += 1;
                tracing::warn!(
                    "Reply failed to normalize ({}). Retrying request ({}/{})...",
                    e,
                    parse_attempt,
                    config.retry.parse_retries
                );
            }
            Err(e) => return Err(e),
        }
    }
}

/// Render the search prompt, honoring a configured template override.
fn build_prompt(config: &AppConfig, query: &str) -> AppResult<String> {
    match config.prompt_template {
        Some(ref path) => {
            let template = std::fs::read_to_string(path).map_err(|e| {
                AppError::Config(format!("Failed to read prompt template {:?}: {}", path, e))
            })?;
            build_search_prompt_with(&template, query)
        }
        None => build_search_prompt(query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use localfind_llm::{GroundedReply, SourceKind};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Stub client that serves a script of canned outcomes.
    struct ScriptedClient {
        script: Mutex<VecDeque<AppResult<GroundedReply>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(script: Vec<AppResult<GroundedReply>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn models_called(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl GroundedClient for ScriptedClient {
        fn provider_name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, request: &GroundedRequest) -> AppResult<GroundedReply> {
            self.calls.lock().unwrap().push(request.model.clone());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AppError::Other("script exhausted".to_string())))
        }
    }

    fn reply(text: &str) -> AppResult<GroundedReply> {
        Ok(GroundedReply {
            text: text.to_string(),
            sources: vec![SourceRef {
                title: "Kafe Pi".to_string(),
                uri: "https://maps.google.com/?cid=1".to_string(),
                kind: SourceKind::Maps,
            }],
            model: "scripted-model".to_string(),
        })
    }

    fn overloaded() -> AppResult<GroundedReply> {
        Err(AppError::Overloaded("503".to_string()))
    }

    /// Config tuned so tests never sleep: one overload attempt per model.
    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.retry.max_attempts = 1;
        config.retry.initial_delay_ms = 1;
        config.retry.parse_retries = 2;
        config
    }

    fn options() -> SearchOptions {
        SearchOptions {
            query: "coffee in Kadıköy".to_string(),
            location: None,
            depth: SearchDepth::Fast,
        }
    }

    const GOOD_JSON: &str = r#"[{"name": "Kafe Pi", "category": "Cafe"}]"#;

    #[tokio::test]
    async fn test_successful_search() {
        let client = ScriptedClient::new(vec![reply(GOOD_JSON)]);
        let outcome = find_businesses(&client, &test_config(), &options())
            .await
            .unwrap();

        assert_eq!(outcome.businesses.len(), 1);
        assert_eq!(outcome.businesses[0].name, "Kafe Pi");
        assert_eq!(outcome.sources.len(), 1);
        assert!(!outcome.fallback_used);
        assert_eq!(client.models_called(), ["gemini-2.5-flash"]);
    }

    #[tokio::test]
    async fn test_parse_retry_then_success() {
        let client = ScriptedClient::new(vec![reply("I found some nice places!"), reply(GOOD_JSON)]);
        let outcome = find_businesses(&client, &test_config(), &options())
            .await
            .unwrap();

        assert_eq!(outcome.businesses.len(), 1);
        assert!(!outcome.fallback_used);
        assert_eq!(client.models_called().len(), 2);
    }

    #[tokio::test]
    async fn test_parse_retry_budget_exhausted() {
        let prose = || reply("No table here, sorry.");
        let client = ScriptedClient::new(vec![prose(), prose(), prose()]);
        let err = find_businesses(&client, &test_config(), &options())
            .await
            .unwrap_err();

        assert!(err.is_malformed());
        // 1 initial + 2 parse retries, never the fallback model
        assert_eq!(client.models_called(), vec!["gemini-2.5-flash"; 3]);
    }

    #[tokio::test]
    async fn test_overload_falls_back_to_other_variant() {
        let client = ScriptedClient::new(vec![overloaded(), reply(GOOD_JSON)]);
        let outcome = find_businesses(&client, &test_config(), &options())
            .await
            .unwrap();

        assert!(outcome.fallback_used);
        assert_eq!(
            client.models_called(),
            ["gemini-2.5-flash", "gemini-2.5-pro"]
        );
    }

    #[tokio::test]
    async fn test_both_variants_overloaded() {
        let client = ScriptedClient::new(vec![overloaded(), overloaded()]);
        let err = find_businesses(&client, &test_config(), &options())
            .await
            .unwrap_err();

        assert!(err.is_overloaded());
        assert!(err.to_string().contains("Both fast and deep"));
    }

    #[tokio::test]
    async fn test_safety_block_surfaces_without_fallback() {
        let client = ScriptedClient::new(vec![Err(AppError::SafetyBlocked(
            "blocked".to_string(),
        ))]);
        let err = find_businesses(&client, &test_config(), &options())
            .await
            .unwrap_err();

        assert!(err.is_safety_blocked());
        assert_eq!(client.models_called(), ["gemini-2.5-flash"]);
    }

    #[tokio::test]
    async fn test_empty_query_rejected_before_dispatch() {
        let client = ScriptedClient::new(vec![]);
        let mut opts = options();
        opts.query = "   ".to_string();

        let err = find_businesses(&client, &test_config(), &opts)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Prompt(_)));
        assert!(client.models_called().is_empty());
    }

    #[tokio::test]
    async fn test_deep_preference_falls_back_to_fast() {
        let client = ScriptedClient::new(vec![overloaded(), reply(GOOD_JSON)]);
        let mut opts = options();
        opts.depth = SearchDepth::Deep;

        let outcome = find_businesses(&client, &test_config(), &opts)
            .await
            .unwrap();

        assert!(outcome.fallback_used);
        assert_eq!(
            client.models_called(),
            ["gemini-2.5-pro", "gemini-2.5-flash"]
        );
    }
}
