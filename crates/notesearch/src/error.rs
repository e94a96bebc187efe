use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
  #[error("Embeddings file not found: {}. Please provide the embeddings file.", .path.display())]
  DatasetNotFound { path: PathBuf },

  #[error("Missing required column '{column}' (found: {available})")]
  MissingColumn { column: String, available: String },

  #[error("Dataset contains no notes")]
  EmptyDataset,

  #[error("Malformed embedding on row {row}: {message}")]
  MalformedEmbedding { row: usize, message: String },

  #[error("Row {row} has a {actual}-dimensional embedding, expected {expected}")]
  InconsistentDimensions { row: usize, expected: usize, actual: usize },

  #[error("Embedding dimension mismatch: dataset has {expected}, query has {actual}")]
  DimensionMismatch { expected: usize, actual: usize },

  #[error("Search query is empty")]
  EmptyQuery,

  #[error("No API key supplied for the embedding provider")]
  MissingCredential,

  #[error("Invalid provider base URL '{url}': {message}")]
  InvalidBaseUrl { url: String, message: String },

  #[error("Embedding provider request failed: {message}")]
  Provider { message: String },

  #[error("Embedding provider returned HTTP {status}: {message}")]
  ProviderStatus { status: u16, message: String },

  #[error("Failed to read CSV: {0}")]
  Csv(#[from] csv::Error),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}
