use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::embedding::Embedding;
use crate::error::{Result, SearchError};

pub const DEFAULT_TEXT_COLUMN: &str = "Notes";
pub const DEFAULT_EMBEDDING_COLUMN: &str = "embedding";

/// A single note and its precomputed embedding
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
  /// 1-based data row in the source file
  pub row: usize,
  pub text: String,
  pub embedding: Embedding,
}

impl Note {
  pub fn new(row: usize, text: impl Into<String>, embedding: impl Into<Embedding>) -> Self {
    Self { row, text: text.into(), embedding: embedding.into() }
  }
}

/// Names of the columns holding note text and embeddings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
  pub text: String,
  pub embedding: String,
}

impl Default for ColumnNames {
  fn default() -> Self {
    Self { text: DEFAULT_TEXT_COLUMN.to_string(), embedding: DEFAULT_EMBEDDING_COLUMN.to_string() }
  }
}

/// In-memory table of notes sharing one embedding dimensionality
#[derive(Debug, Clone)]
pub struct Dataset {
  notes: Vec<Note>,
  dimensions: usize,
}

impl Dataset {
  /// Load a dataset from a CSV file on disk
  pub fn from_path(path: &Path, columns: &ColumnNames) -> Result<Self> {
    if !path.is_file() {
      return Err(SearchError::DatasetNotFound { path: path.to_path_buf() });
    }

    debug!(path = %path.display(), "loading embeddings file");
    let file = File::open(path)?;
    Self::from_reader(file, columns)
  }

  /// Load a dataset from any CSV source
  pub fn from_reader<R: Read>(reader: R, columns: &ColumnNames) -> Result<Self> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let text_index = find_column(&headers, &columns.text)?;
    let embedding_index = find_column(&headers, &columns.embedding)?;

    let mut notes = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
      let record = record?;
      let row = index + 1;

      let text = record.get(text_index).unwrap_or_default().to_string();
      let raw_embedding = record.get(embedding_index).unwrap_or_default();
      let embedding = Embedding::parse(raw_embedding)
        .map_err(|message| SearchError::MalformedEmbedding { row, message })?;

      notes.push(Note { row, text, embedding });
    }

    Self::from_notes(notes)
  }

  /// Build a dataset from notes that already carry typed embeddings
  pub fn from_notes(notes: Vec<Note>) -> Result<Self> {
    let first = notes.first().ok_or(SearchError::EmptyDataset)?;
    let dimensions = first.embedding.dimensions();

    if let Some(note) = notes.iter().find(|note| note.embedding.dimensions() != dimensions) {
      return Err(SearchError::InconsistentDimensions {
        row: note.row,
        expected: dimensions,
        actual: note.embedding.dimensions(),
      });
    }

    if let Some(note) = notes.iter().find(|note| !note.embedding.is_finite()) {
      return Err(SearchError::MalformedEmbedding {
        row: note.row,
        message: "embedding contains a non-finite value".to_string(),
      });
    }

    debug!(notes = notes.len(), dimensions, "dataset loaded");
    Ok(Self { notes, dimensions })
  }

  pub fn notes(&self) -> &[Note] {
    &self.notes
  }

  pub fn len(&self) -> usize {
    self.notes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.notes.is_empty()
  }

  /// Dimensionality shared by every note's embedding
  pub fn dimensions(&self) -> usize {
    self.dimensions
  }
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
  headers.iter().position(|header| header.trim() == name).ok_or_else(|| {
    SearchError::MissingColumn {
      column: name.to_string(),
      available: headers.iter().collect::<Vec<_>>().join(", "),
    }
  })
}
