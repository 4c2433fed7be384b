//! Prompt builder for rendering the search instruction template.

use handlebars::Handlebars;
use localfind_core::{AppError, AppResult};
use std::collections::HashMap;

/// Built-in instruction template.
///
/// The model is told to answer with a bare JSON array using the known
/// English keys. `responseSchema` cannot be forced here because structured
/// output is not supported together with the maps grounding tool, so the
/// format request lives in the prompt text and the normalizer tolerates
/// deviations.
const DEFAULT_TEMPLATE: &str = r#"You are a highly efficient AI assistant specialized in finding local business information.

YOUR TASK:
1. Search for local businesses matching the user's query using the maps and web search tools.
2. Extract specific details for EVERY SINGLE business found in the search results.
3. Return the data as a strict JSON array of objects.

CRITICAL INSTRUCTIONS:
- You MUST include ALL businesses found in the search results (grounding chunks).
- Do NOT summarize, filter, or truncate the list.
- If the search tool returns 20 businesses, your JSON array MUST contain 20 objects.
- Do not select only the "top" or "best" ones. List them all to ensure the list matches the source citations.

OUTPUT FORMAT:
Return ONLY a valid JSON array. Do not include markdown formatting (like ```json) or introductory text.

JSON STRUCTURE per business:
{
  "name": "Business Name",
  "category": "Category",
  "address": "Full Street Address",
  "phone": "Phone Number",
  "website": "Website URL",
  "email": "Email Address",
  "mapsLink": "Google Maps Direct Link",
  "rating": "Rating (e.g. 4.5/5)",
  "reviews": "Number of reviews",
  "price": "Price Range (e.g. $$)",
  "hours": "Opening Hours",
  "status": "Open/Closed Status"
}

RULES:
- If a field is missing, use "N/A".
- "mapsLink" MUST be the direct Google Maps URL found via the maps tool.
- "website": PRIORITIZE the website link provided directly by the maps tool result. Only use web search if the maps tool does not provide it.
- "email": Use web search to find the email address.
- Do not hallucinate contact info.

USER QUERY: "{{query}}""#;

/// Render the built-in search prompt for a user query.
pub fn build_search_prompt(query: &str) -> AppResult<String> {
    build_search_prompt_with(DEFAULT_TEMPLATE, query)
}

/// Render a custom search-prompt template for a user query.
///
/// The template receives a single `query` variable. This is the hook used
/// when the config points at a replacement template file.
pub fn build_search_prompt_with(template: &str, query: &str) -> AppResult<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(AppError::Prompt("Search query cannot be empty".to_string()));
    }

    let mut variables = HashMap::new();
    variables.insert("query".to_string(), trimmed.to_string());

    render_template(template, &variables)
}

/// Render a Handlebars template with variables.
pub fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_default_prompt() {
        let prompt = build_search_prompt("dentists in Kadıköy").unwrap();
        assert!(prompt.contains("USER QUERY: \"dentists in Kadıköy\""));
        assert!(prompt.contains("strict JSON array"));
        assert!(prompt.contains("\"mapsLink\""));
    }

    #[test]
    fn test_query_is_trimmed() {
        let prompt = build_search_prompt("  pizza  ").unwrap();
        assert!(prompt.contains("USER QUERY: \"pizza\""));
    }

    #[test]
    fn test_empty_query_rejected() {
        assert!(build_search_prompt("   ").is_err());
    }

    #[test]
    fn test_custom_template() {
        let prompt = build_search_prompt_with("Find: {{query}}", "bakeries").unwrap();
        assert_eq!(prompt, "Find: bakeries");
    }

    #[test]
    fn test_no_html_escaping() {
        let prompt = build_search_prompt_with("Q: {{query}}", "fish & chips").unwrap();
        assert_eq!(prompt, "Q: fish & chips");
    }
}
