use anyhow::Result;
use clap::ValueEnum;
use colored::*;

use crate::dataset::Dataset;
use crate::search::{RankedNote, SearchResults};

const WRAP_WIDTH: usize = 80;
const PREVIEW_CHARS: usize = 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Pretty,
  Json,
}

/// Render search results, most similar first
pub fn render_results(results: &SearchResults, format: OutputFormat) -> Result<String> {
  match format {
    OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
    OutputFormat::Pretty => Ok(render_pretty(results)),
  }
}

fn render_pretty(results: &SearchResults) -> String {
  if results.results.is_empty() {
    return format!("No matches found for: {}", results.query.yellow());
  }

  results.results.iter().map(render_single_result).collect::<Vec<_>>().join("\n")
}

fn render_single_result(result: &RankedNote) -> String {
  let header = format!(
    "=== #{} {} (row {}) ===",
    result.rank,
    format!("{:.4}", result.score).green().bold(),
    result.row
  );

  let mut lines = vec![header];
  lines.extend(wrap_text(&result.text, WRAP_WIDTH));
  lines.push(String::new());
  lines.join("\n")
}

/// Tabular preview of the loaded notes
pub fn render_dataset(dataset: &Dataset, limit: usize) -> String {
  let mut lines = vec![format!(
    "{} notes, {}-dimensional embeddings",
    dataset.len().to_string().bold(),
    dataset.dimensions()
  )];

  for note in dataset.notes().iter().take(limit) {
    lines.push(format!("{:>5}  {}", note.row.to_string().blue(), preview(&note.text)));
  }

  if dataset.len() > limit {
    lines.push(format!("  ... {} more", dataset.len() - limit).dimmed().to_string());
  }

  lines.join("\n")
}

fn preview(text: &str) -> String {
  let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");
  if flattened.chars().count() <= PREVIEW_CHARS {
    flattened
  } else {
    let truncated: String = flattened.chars().take(PREVIEW_CHARS - 3).collect();
    format!("{truncated}...")
  }
}

/// Greedy word wrap measured in characters; words longer than `width` get their own line
fn wrap_text(text: &str, width: usize) -> Vec<String> {
  text.split('\n').flat_map(|paragraph| wrap_paragraph(paragraph, width)).collect()
}

fn wrap_paragraph(paragraph: &str, width: usize) -> Vec<String> {
  let mut lines = Vec::new();
  let mut line = String::new();
  let mut line_chars = 0;

  for word in paragraph.split_whitespace() {
    let word_chars = word.chars().count();
    if line_chars > 0 && line_chars + 1 + word_chars > width {
      lines.push(std::mem::take(&mut line));
      line_chars = 0;
    }

    if line_chars > 0 {
      line.push(' ');
      line_chars += 1;
    }
    line.push_str(word);
    line_chars += word_chars;
  }

  lines.push(line);
  lines
}
