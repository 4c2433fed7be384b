//! Search command handler.
//!
//! Dispatches a grounded business search and renders the normalized table
//! in the requested output format. Diagnostics go to stderr via tracing;
//! stdout carries only the rendered data.

use clap::Args;
use localfind_core::{config::AppConfig, AppError, AppResult};
use localfind_llm::{create_client, LatLng, SearchDepth, SourceRef};
use localfind_search::{
    export, find_businesses, sort_records, Business, Field, SearchOptions, SearchOutcome,
};
use std::path::PathBuf;

/// Search for local businesses
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// The business query (e.g. "24-hour pharmacies in Kadıköy")
    pub query: String,

    /// Device coordinates as "lat,lng" for maps grounding
    #[arg(short, long)]
    pub location: Option<String>,

    /// Search depth preference (fast, deep)
    #[arg(short, long, default_value = "fast")]
    pub depth: String,

    /// Sort results by a column (e.g. "rating", "Business Name")
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort in descending order
    #[arg(long, requires = "sort_by")]
    pub descending: bool,

    /// Output format (table, csv, json)
    #[arg(short = 'f', long, default_value = "table")]
    pub format: String,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl OutputFormat {
    fn parse(s: &str) -> AppResult<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(AppError::Config(format!(
                "Unknown output format: {}. Supported: table, csv, json",
                other
            ))),
        }
    }
}

impl SearchCommand {
    /// Execute the search command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");
        tracing::debug!("Search command options: {:?}", self);

        // 1. Validate configuration for the active provider
        config.validate()?;

        // 2. Resolve search options
        let depth = SearchDepth::parse(&self.depth).ok_or_else(|| {
            AppError::Config(format!(
                "Unknown search depth: {}. Supported: fast, deep",
                self.depth
            ))
        })?;

        let location = match self.location {
            Some(ref raw) => Some(LatLng::parse(raw)?),
            None => None,
        };

        let sort_field = match self.sort_by {
            Some(ref name) => Some(Field::parse(name).ok_or_else(|| {
                AppError::Config(format!("Unknown sort column: {}", name))
            })?),
            None => None,
        };

        let format = OutputFormat::parse(&self.format)?;

        // 3. Create the grounded client
        let client = create_client(
            &config.provider,
            config.endpoint.as_deref(),
            config.api_key.as_deref(),
        )
        .map_err(AppError::Config)?;

        // 4. Dispatch the search
        let options = SearchOptions {
            query: self.query.clone(),
            location,
            depth,
        };

        let mut outcome = find_businesses(client.as_ref(), config, &options).await?;

        if outcome.businesses.is_empty() {
            tracing::warn!("No businesses found for query: {}", self.query);
        }

        // 5. Sort if requested
        if let Some(field) = sort_field {
            sort_records(&mut outcome.businesses, field, self.descending);
        }

        // 6. Render and emit
        let rendered = match format {
            OutputFormat::Table => render_table(&outcome),
            OutputFormat::Csv => export::to_csv(&outcome.businesses),
            OutputFormat::Json => render_json(&outcome)?,
        };

        match self.output {
            Some(ref path) => {
                std::fs::write(path, &rendered)?;
                tracing::info!("Wrote {} results to {:?}", outcome.businesses.len(), path);
            }
            None => print!("{}", rendered),
        }

        Ok(())
    }
}

/// Render the outcome as an aligned text table with a numbered source list.
fn render_table(outcome: &SearchOutcome) -> String {
    let mut out = String::new();

    if outcome.businesses.is_empty() {
        out.push_str("No businesses found.\n");
    } else {
        out.push_str(&format_table(&outcome.businesses));
    }

    if !outcome.sources.is_empty() {
        out.push_str("\nSources:\n");
        for (index, source) in outcome.sources.iter().enumerate() {
            out.push_str(&format_source(index + 1, source));
        }
    }

    let count = outcome.businesses.len();
    out.push_str(&format!(
        "\n{} {} (model: {}{})\n",
        count,
        if count == 1 { "result" } else { "results" },
        outcome.model_used,
        if outcome.fallback_used { ", fallback" } else { "" }
    ));

    out
}

fn format_table(records: &[Business]) -> String {
    let mut widths: Vec<usize> = Field::ALL
        .iter()
        .map(|f| f.label().chars().count())
        .collect();

    for record in records {
        for (i, field) in Field::ALL.iter().enumerate() {
            widths[i] = widths[i].max(record.get(*field).chars().count());
        }
    }

    let mut out = String::new();

    let header: Vec<String> = Field::ALL
        .iter()
        .enumerate()
        .map(|(i, f)| pad(f.label(), widths[i]))
        .collect();
    out.push_str(&header.join("  "));
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    for record in records {
        let row: Vec<String> = Field::ALL
            .iter()
            .enumerate()
            .map(|(i, f)| pad(record.get(*f), widths[i]))
            .collect();
        out.push_str(row.join("  ").trim_end());
        out.push('\n');
    }

    out
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    let mut padded = s.to_string();
    padded.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
    padded
}

fn format_source(number: usize, source: &SourceRef) -> String {
    if source.title == source.uri {
        format!("  {}. {}\n", number, source.uri)
    } else {
        format!("  {}. {} - {}\n", number, source.title, source.uri)
    }
}

fn render_json(outcome: &SearchOutcome) -> AppResult<String> {
    let value = serde_json::json!({
        "businesses": outcome.businesses,
        "sources": outcome.sources,
        "model": outcome.model_used,
        "fallbackUsed": outcome.fallback_used,
    });
    let mut rendered = serde_json::to_string_pretty(&value)?;
    rendered.push('\n');
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use localfind_llm::SourceKind;

    fn outcome_with(businesses: Vec<Business>, sources: Vec<SourceRef>) -> SearchOutcome {
        SearchOutcome {
            businesses,
            sources,
            model_used: "gemini-2.5-flash".to_string(),
            fallback_used: false,
        }
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::parse("table").unwrap(), OutputFormat::Table);
        assert_eq!(OutputFormat::parse("CSV").unwrap(), OutputFormat::Csv);
        assert_eq!(OutputFormat::parse("json").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::parse("yaml").is_err());
    }

    #[test]
    fn test_table_includes_all_columns_and_sources() {
        let mut business = Business::default();
        business.name = "Kafe Pi".to_string();
        business.rating = "4.2/5".to_string();

        let sources = vec![SourceRef {
            title: "Kafe Pi".to_string(),
            uri: "https://maps.google.com/?cid=1".to_string(),
            kind: SourceKind::Maps,
        }];

        let rendered = render_table(&outcome_with(vec![business], sources));

        for field in Field::ALL {
            assert!(rendered.contains(field.label()), "missing {}", field.label());
        }
        assert!(rendered.contains("Kafe Pi"));
        assert!(rendered.contains("1. Kafe Pi - https://maps.google.com/?cid=1"));
        assert!(rendered.contains("1 result (model: gemini-2.5-flash)"));
    }

    #[test]
    fn test_result_count_pluralized() {
        let single = render_table(&outcome_with(vec![Business::default()], vec![]));
        assert!(single.contains("1 result (model:"));

        let several = render_table(&outcome_with(
            vec![Business::default(), Business::default()],
            vec![],
        ));
        assert!(several.contains("2 results (model:"));
    }

    #[test]
    fn test_empty_table() {
        let rendered = render_table(&outcome_with(vec![], vec![]));
        assert!(rendered.contains("No businesses found."));
        assert!(!rendered.contains("Sources:"));
    }

    #[test]
    fn test_json_rendering() {
        let mut business = Business::default();
        business.name = "Kafe Pi".to_string();

        let rendered = render_json(&outcome_with(vec![business], vec![])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["businesses"][0]["name"], "Kafe Pi");
        assert_eq!(value["model"], "gemini-2.5-flash");
        assert_eq!(value["fallbackUsed"], false);
    }
}
