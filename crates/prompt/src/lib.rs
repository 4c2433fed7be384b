//! Prompt construction for the Localfind CLI.
//!
//! Renders the business-search instruction template (Handlebars) that asks
//! the model to use its maps/search tools and answer with a strict JSON
//! array of business objects.

pub mod builder;

pub use builder::{build_search_prompt, build_search_prompt_with, render_template};
