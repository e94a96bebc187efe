use notesearch::{search, ColumnNames, Dataset, SearchError, StaticEmbeddingProvider};

const JOURNAL: &str = "\
Notes,embedding
Walked the dog along the river,\"[0.9, 0.1, 0.0]\"
Fixed the flaky integration test,\"[0.0, 1.0, 0.0]\"
River cleanup volunteer day,\"[0.7, 0.0, 0.7]\"
Bought new running shoes,\"[0.0, 0.0, 1.0]\"
Rainy morning by the river,\"[1.0, 0.0, 0.0]\"
";

fn journal() -> Dataset {
  Dataset::from_reader(JOURNAL.as_bytes(), &ColumnNames::default()).unwrap()
}

#[test]
fn test_top_three_matches_hand_ranking() {
  let provider = StaticEmbeddingProvider::new(vec![1.0, 0.0, 0.0]);
  let results = search(&journal(), "river", 3, &provider).unwrap();

  // cos: 1.0 (row 5), 0.9939 (row 1), 0.7071 (row 3), 0.0 (rows 2, 4)
  let rows: Vec<usize> = results.results.iter().map(|r| r.row).collect();
  assert_eq!(rows, vec![5, 1, 3]);
  assert_eq!(results.results[0].score, 1.0);
  assert!((results.results[1].score - 0.9939).abs() < 1e-4);
  assert!((results.results[2].score - 0.7071).abs() < 1e-4);
}

#[test]
fn test_zero_score_ties_keep_file_order() {
  let provider = StaticEmbeddingProvider::new(vec![1.0, 0.0, 0.0]);
  let results = search(&journal(), "river", 5, &provider).unwrap().results;

  assert_eq!(results.len(), 5);
  assert_eq!(results[3].row, 2);
  assert_eq!(results[4].row, 4);
}

#[test]
fn test_searches_reuse_loaded_dataset() {
  let dataset = journal();

  let running = StaticEmbeddingProvider::new(vec![0.0, 0.0, 1.0]);
  let coding = StaticEmbeddingProvider::new(vec![0.0, 1.0, 0.0]);

  let first = search(&dataset, "running", 1, &running).unwrap();
  let second = search(&dataset, "coding", 1, &coding).unwrap();

  assert_eq!(first.results[0].text, "Bought new running shoes");
  assert_eq!(second.results[0].text, "Fixed the flaky integration test");
}

#[test]
fn test_query_dimension_mismatch() {
  let provider = StaticEmbeddingProvider::new(vec![1.0; 1536]);
  let err = search(&journal(), "river", 3, &provider).unwrap_err();
  assert!(matches!(err, SearchError::DimensionMismatch { expected: 3, actual: 1536 }));
}

#[test]
fn test_overflowing_cell_is_rejected_before_ranking() {
  let csv = "Notes,embedding\nbig,\"[1e50, 0.0]\"\naligned,\"[1.0, 0.0]\"\northo,\"[0.0, 1.0]\"\n";
  let err = Dataset::from_reader(csv.as_bytes(), &ColumnNames::default()).unwrap_err();
  assert!(matches!(err, SearchError::MalformedEmbedding { row: 1, .. }));
}

#[test]
fn test_scores_stay_ordered_with_extreme_values() {
  let csv = "Notes,embedding\nhuge,\"[3.0e38, 0.0]\"\naligned,\"[1.0, 0.0]\"\northo,\"[0.0, 1.0]\"\n";
  let dataset = Dataset::from_reader(csv.as_bytes(), &ColumnNames::default()).unwrap();
  let provider = StaticEmbeddingProvider::new(vec![1.0, 0.0]);

  let results = search(&dataset, "east", 3, &provider).unwrap().results;
  assert!(results.iter().all(|r| (-1.0..=1.0).contains(&r.score)));
  assert!(results.windows(2).all(|pair| pair[0].score >= pair[1].score));
  assert_eq!(results[2].text, "ortho");
}
