use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use crate::dataset::{Dataset, Note};
use crate::display::OutputFormat;
use crate::error::{Result, SearchError};
use crate::provider::EmbeddingProvider;
use crate::similarity;

pub const DEFAULT_RESULT_COUNT: usize = 3;

/// A note with its similarity to the query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedNote {
  /// 1-based position in the result list
  pub rank: usize,
  /// 1-based data row in the source file
  pub row: usize,
  pub text: String,
  pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
  pub query: String,
  pub results: Vec<RankedNote>,
}

/// Search configuration options
#[derive(Args, Debug, Clone, Default)]
pub struct SearchOptions {
  /// Number of results to return [default: 3, or `results` from the config file]
  #[arg(short = 'n', long = "results")]
  pub results: Option<usize>,
  /// Output format
  #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
  pub format: OutputFormat,
}

/// Rank every note in `dataset` against `query` and keep the best `n`.
///
/// The provider is asked for exactly one embedding. Provider failures and
/// dimension mismatches are returned as errors; nothing is retried.
pub fn search(
  dataset: &Dataset,
  query: &str,
  n: usize,
  provider: &dyn EmbeddingProvider,
) -> Result<SearchResults> {
  if query.trim().is_empty() {
    return Err(SearchError::EmptyQuery);
  }

  let query_embedding = provider.embed(query)?;
  if query_embedding.len() != dataset.dimensions() {
    return Err(SearchError::DimensionMismatch {
      expected: dataset.dimensions(),
      actual: query_embedding.len(),
    });
  }
  if query_embedding.iter().any(|v| !v.is_finite()) {
    return Err(SearchError::Provider {
      message: "query embedding contains a non-finite value".to_string(),
    });
  }

  let results = rank(dataset.notes(), &query_embedding, n)?;
  info!(query, notes = dataset.len(), returned = results.len(), "search complete");

  Ok(SearchResults { query: query.to_string(), results })
}

/// Score notes by cosine similarity to `query_embedding`, best first.
///
/// Ties keep their original order.
pub fn rank(notes: &[Note], query_embedding: &[f32], n: usize) -> Result<Vec<RankedNote>> {
  let mut scored = notes
    .iter()
    .map(|note| Ok((note, similarity::cosine(note.embedding.as_slice(), query_embedding)?)))
    .collect::<Result<Vec<_>>>()?;

  scored.sort_by(|a, b| b.1.total_cmp(&a.1));
  debug!(scored = scored.len(), keep = n, "ranked notes");

  Ok(
    scored
      .into_iter()
      .take(n)
      .enumerate()
      .map(|(index, (note, score))| RankedNote {
        rank: index + 1,
        row: note.row,
        text: note.text.clone(),
        score,
      })
      .collect(),
  )
}
