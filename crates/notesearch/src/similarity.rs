use crate::error::{Result, SearchError};

/// Cosine similarity between two embeddings of equal length.
///
/// Returns a score in [-1, 1]. A zero-magnitude vector on either side scores 0.0.
/// Vectors of different lengths are a usage error and are never truncated or padded.
pub fn cosine(a: &[f32], b: &[f32]) -> Result<f32> {
  if a.len() != b.len() {
    return Err(SearchError::DimensionMismatch { expected: a.len(), actual: b.len() });
  }

  let dot_product: f64 = a.iter().zip(b.iter()).map(|(x, y)| *x as f64 * *y as f64).sum();
  let magnitude_a = magnitude(a);
  let magnitude_b = magnitude(b);

  if magnitude_a == 0.0 || magnitude_b == 0.0 {
    return Ok(0.0);
  }

  let similarity = (dot_product / (magnitude_a * magnitude_b)).clamp(-1.0, 1.0);
  // -0.0 would sort below 0.0 under a total order
  Ok(if similarity == 0.0 { 0.0 } else { similarity as f32 })
}

fn magnitude(v: &[f32]) -> f64 {
  v.iter().map(|x| *x as f64 * *x as f64).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_identical_vectors() {
    assert_eq!(cosine(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]).unwrap(), 1.0);
  }

  #[test]
  fn test_orthogonal_vectors() {
    assert_eq!(cosine(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), 0.0);
  }

  #[test]
  fn test_opposite_vectors() {
    assert_eq!(cosine(&[1.0, 0.0], &[-1.0, 0.0]).unwrap(), -1.0);
  }

  #[test]
  fn test_scale_invariance() {
    let score = cosine(&[3.0, 4.0], &[30.0, 40.0]).unwrap();
    assert!((score - 1.0).abs() < 1e-6);
  }

  #[test]
  fn test_known_angle() {
    let score = cosine(&[1.0, 1.0], &[1.0, 0.0]).unwrap();
    assert!((score - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
  }

  #[test]
  fn test_orthogonal_score_is_positive_zero() {
    let score = cosine(&[-1.0, 0.0], &[0.0, -1.0]).unwrap();
    assert_eq!(score.to_bits(), 0.0f32.to_bits());
  }

  #[test]
  fn test_zero_vector_scores_zero() {
    assert_eq!(cosine(&[0.0, 0.0], &[1.0, 0.0]).unwrap(), 0.0);
    assert_eq!(cosine(&[1.0, 0.0], &[0.0, 0.0]).unwrap(), 0.0);
  }

  #[test]
  fn test_dimension_mismatch_is_an_error() {
    let err = cosine(&[1.0, 0.0, 0.0], &[1.0, 0.0]).unwrap_err();
    assert!(matches!(err, SearchError::DimensionMismatch { expected: 3, actual: 2 }));
  }

  #[test]
  fn test_scores_stay_in_range() {
    let vectors: [&[f32]; 4] =
      [&[0.1, 0.2, 0.3], &[-0.3, 0.2, -0.1], &[1e-7, 1e-7, 1e-7], &[1e6, -1e6, 3.0]];
    for a in vectors {
      for b in vectors {
        let score = cosine(a, b).unwrap();
        assert!((-1.0..=1.0).contains(&score), "score {score} out of range");
      }
    }
  }
}
