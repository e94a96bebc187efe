//! Notesearch - Semantic Search over Embedded Notes
//!
//! Loads a CSV of notes with precomputed embeddings and ranks them against a
//! natural-language query by cosine similarity, using an external embedding
//! provider for the query vector.

pub mod commands;
pub mod config;
pub mod credential;
pub mod dataset;
pub mod display;
pub mod embedding;
pub mod error;
pub mod provider;
pub mod search;
pub mod similarity;

pub use dataset::{ColumnNames, Dataset, Note};
pub use embedding::Embedding;
pub use error::{Result, SearchError};
pub use provider::{EmbeddingProvider, OpenAiProvider, ProviderConfig, StaticEmbeddingProvider};
pub use search::{rank, search, RankedNote, SearchResults, DEFAULT_RESULT_COUNT};
