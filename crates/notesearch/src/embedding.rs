use serde::{Deserialize, Serialize};

/// A fixed-length embedding vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
  pub fn new(values: Vec<f32>) -> Self {
    Self(values)
  }

  /// Parse the textual list encoding stored in a dataset cell, e.g. `[0.01, -0.02]`
  pub fn parse(raw: &str) -> Result<Self, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return Err("cell is empty".to_string());
    }

    let values: Vec<f32> = serde_json::from_str(trimmed)
      .map_err(|e| format!("expected a list of numbers ({e})"))?;

    if values.is_empty() {
      return Err("embedding has no values".to_string());
    }

    if let Some(position) = values.iter().position(|v| !v.is_finite()) {
      return Err(format!("value {} is out of range for a 32-bit float", position + 1));
    }

    Ok(Self(values))
  }

  pub fn dimensions(&self) -> usize {
    self.0.len()
  }

  pub fn is_finite(&self) -> bool {
    self.0.iter().all(|v| v.is_finite())
  }

  pub fn as_slice(&self) -> &[f32] {
    &self.0
  }

  pub fn into_inner(self) -> Vec<f32> {
    self.0
  }
}

impl From<Vec<f32>> for Embedding {
  fn from(values: Vec<f32>) -> Self {
    Self::new(values)
  }
}

impl AsRef<[f32]> for Embedding {
  fn as_ref(&self) -> &[f32] {
    &self.0
  }
}
