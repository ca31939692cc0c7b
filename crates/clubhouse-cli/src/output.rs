//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use clubhouse_domain::{Citation, QueryResponse};
use clubhouse_indexer::IngestionSummary;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Snippet length shown in the sources table.
const TABLE_SNIPPET_CHARS: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a query response.
    pub fn format_response(&self, response: &QueryResponse) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(response)?),
            OutputFormat::Quiet => Ok(response.answer.clone()),
            OutputFormat::Table => Ok(self.format_response_table(response)),
        }
    }

    fn format_response_table(&self, response: &QueryResponse) -> String {
        let mut out = response.answer.clone();

        if !response.filters_applied.is_empty() {
            out.push_str("\n\n");
            out.push_str(&self.info(&format!("Filters: {}", response.filters_applied)));
        }

        if !response.citations.is_empty() {
            out.push_str("\n\n");
            out.push_str(&self.colorize("Sources:", "cyan"));
            out.push('\n');
            out.push_str(&sources_table(&response.citations));
        }
        out
    }

    /// Format an ingestion summary.
    pub fn format_summary(&self, summary: &IngestionSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
            OutputFormat::Quiet => Ok(format!("{} {}", summary.documents_processed, summary.chunks_upserted)),
            OutputFormat::Table => {
                let report = summary.summary();
                if summary.is_success() {
                    Ok(report)
                } else {
                    Ok(self.colorize(&report, "yellow"))
                }
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn sources_table(citations: &[Citation]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["#", "Club", "Source", "Score", "Snippet"]);

    for citation in citations {
        builder.push_record([
            citation.source_number.to_string(),
            citation.club_name.clone(),
            citation.source_file.clone().unwrap_or_else(|| "-".to_string()),
            format!("{:.3}", citation.relevance_score),
            truncate(&citation.text_snippet, TABLE_SNIPPET_CHARS),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

/// Shorten `text` to `max` characters on one line.
fn truncate(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}
