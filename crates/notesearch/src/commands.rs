use anyhow::{Context, Result};
use colored::*;
use dialoguer::Input;
use std::fmt::Display;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::credential;
use crate::dataset::Dataset;
use crate::display::{self, OutputFormat};
use crate::provider::{EmbeddingProvider, OpenAiProvider};
use crate::search::{self, SearchOptions};

pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Load the embeddings file named on the command line
pub fn load_dataset(file: &Path, config: &Config) -> Result<Dataset> {
  let dataset = Dataset::from_path(file, &config.columns())?;
  info!(file = %file.display(), notes = dataset.len(), dimensions = dataset.dimensions(), "loaded notes");
  Ok(dataset)
}

/// Build the provider client; fails before any search when no key is available
pub fn connect_provider(config: &Config, api_key: Option<String>) -> Result<OpenAiProvider> {
  let api_key = credential::resolve_api_key(api_key).with_context(|| {
    format!("Set {} or pass --api-key to enable search", credential::API_KEY_ENV_VAR)
  })?;
  let provider = OpenAiProvider::new(api_key, config.provider_config())?;
  debug!(model = %provider.config().model, "provider configured");
  Ok(provider)
}

/// Run a single search and print the results
pub fn search_notes(
  file: &Path,
  terms: &[String],
  options: &SearchOptions,
  config: &Config,
  api_key: Option<String>,
) -> Result<()> {
  let dataset = load_dataset(file, config)?;
  let provider = connect_provider(config, api_key)?;

  let query = terms.join(" ");
  let n = options.results.unwrap_or(config.results);
  let results = search::search(&dataset, &query, n, &provider)?;

  println!("{}", display::render_results(&results, options.format)?);
  Ok(())
}

/// Load the notes once, then answer queries until an empty line
pub fn interactive(
  file: &Path,
  options: &SearchOptions,
  config: &Config,
  api_key: Option<String>,
) -> Result<()> {
  let dataset = load_dataset(file, config)?;
  let provider = connect_provider(config, api_key)?;
  let n = options.results.unwrap_or(config.results);

  eprintln!(
    "{} Loaded {} notes. Enter a query, or an empty line to quit.",
    "ℹ".blue(),
    dataset.len()
  );

  let stdout = io::stdout();
  if io::stdin().is_terminal() {
    let queries = std::iter::from_fn(prompt_for_query);
    run_queries(&dataset, queries, n, options.format, &provider, &mut stdout.lock())
  } else {
    let queries = io::stdin().lock().lines().map_while(query_or_end);
    run_queries(&dataset, queries, n, options.format, &provider, &mut stdout.lock())
  }
}

fn prompt_for_query() -> Option<String> {
  let answer =
    Input::<String>::new().with_prompt("Search your notes").allow_empty(true).interact_text();
  query_or_end(answer)
}

/// A failed read ends the session like an empty line, but is logged
fn query_or_end<E: Display>(answer: std::result::Result<String, E>) -> Option<String> {
  match answer {
    Ok(query) => Some(query),
    Err(e) => {
      warn!(error = %e, "could not read query, ending session");
      None
    }
  }
}

/// Answer each query in turn. A failed search is reported and the session continues.
pub fn run_queries<I, W>(
  dataset: &Dataset,
  queries: I,
  n: usize,
  format: OutputFormat,
  provider: &dyn EmbeddingProvider,
  out: &mut W,
) -> Result<()>
where
  I: IntoIterator<Item = String>,
  W: Write,
{
  for query in queries {
    let query = query.trim();
    if query.is_empty() {
      break;
    }

    match search::search(dataset, query, n, provider) {
      Ok(results) => writeln!(out, "{}", display::render_results(&results, format)?)?,
      Err(e) => eprintln!("{} {}", "[error]".red().bold(), e),
    }
  }

  Ok(())
}

/// Preview the loaded notes without contacting the provider
pub fn show(file: &Path, limit: usize, config: &Config) -> Result<()> {
  let dataset = load_dataset(file, config)?;
  println!("{}", display::render_dataset(&dataset, limit));
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dataset::Note;
  use crate::error::SearchError;
  use crate::provider::StaticEmbeddingProvider;
  use std::cell::Cell;

  fn dataset() -> Dataset {
    Dataset::from_notes(vec![
      Note::new(1, "north note", vec![0.0, 1.0]),
      Note::new(2, "east note", vec![1.0, 0.0]),
    ])
    .unwrap()
  }

  struct FlakyProvider {
    calls: Cell<usize>,
  }

  impl EmbeddingProvider for FlakyProvider {
    fn embed(&self, _text: &str) -> crate::error::Result<Vec<f32>> {
      self.calls.set(self.calls.get() + 1);
      if self.calls.get() == 1 {
        Err(SearchError::Provider { message: "connection reset".to_string() })
      } else {
        Ok(vec![1.0, 0.0])
      }
    }
  }

  #[test]
  fn test_run_queries_stops_at_empty_line() {
    colored::control::set_override(false);
    let provider = StaticEmbeddingProvider::new(vec![1.0, 0.0]);
    let queries = vec!["first".to_string(), "".to_string(), "never run".to_string()];
    let mut out = Vec::new();

    run_queries(&dataset(), queries, 1, OutputFormat::Pretty, &provider, &mut out).unwrap();

    let output = String::from_utf8(out).unwrap();
    assert_eq!(output.matches("east note").count(), 1);
    assert!(!output.contains("north note"));
  }

  #[test]
  fn test_terminal_read_error_ends_session() {
    let broken: std::result::Result<String, io::Error> =
      Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal closed"));
    assert_eq!(query_or_end(broken), None);
    let typed: std::result::Result<String, io::Error> = Ok("coffee".to_string());
    assert_eq!(query_or_end(typed), Some("coffee".to_string()));
  }

  #[test]
  fn test_run_queries_continues_after_failure() {
    let provider = FlakyProvider { calls: Cell::new(0) };
    let queries = vec!["fails".to_string(), "works".to_string()];
    let mut out = Vec::new();

    run_queries(&dataset(), queries, 1, OutputFormat::Json, &provider, &mut out).unwrap();

    let output = String::from_utf8(out).unwrap();
    assert_eq!(provider.calls.get(), 2);
    assert!(!output.contains("\"fails\""));
    assert!(output.contains("\"works\""));
  }
}
