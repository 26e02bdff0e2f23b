//! Edit-distance queries over line-oriented corpora.
use std::io::{self, BufRead, Cursor, Read};

use agglo_core::{
    AggloBuilder, Algorithm, DistanceQuery, DistanceQueryError, Linkage, cut_by_count,
    cut_by_height,
};
use agglo_providers_text::{TextProvider, TextProviderError};
use rstest::{fixture, rstest};

#[fixture]
fn spellings() -> TextProvider {
    TextProvider::try_from_reader("spellings", Cursor::new("colour\ncolor\nflavour\nflavor\n"))
        .expect("corpus must load")
}

fn labels(assignments: &[agglo_core::ClusterId]) -> Vec<u64> {
    assignments.iter().map(|id| id.get()).collect()
}

#[rstest]
#[case::insert_u(0, 1, 1.0)]
#[case::other_pair(2, 3, 1.0)]
#[case::cross_short(1, 3, 4.0)]
#[case::cross_long(0, 2, 4.0)]
#[case::mixed_lengths(0, 3, 5.0)]
#[case::self_pair(2, 2, 0.0)]
fn distances_count_character_edits(
    spellings: TextProvider,
    #[case] left: usize,
    #[case] right: usize,
    #[case] expected: f64,
) {
    assert_eq!(spellings.distance(left, right).expect("in range"), expected);
    assert_eq!(spellings.distance(right, left).expect("in range"), expected);
}

#[rstest]
#[case::accent("naïve", "naive", 1.0)]
#[case::classic("kitten", "sitting", 3.0)]
#[case::blank_lines("", "", 0.0)]
fn edits_are_counted_per_character(
    #[case] left: &str,
    #[case] right: &str,
    #[case] expected: f64,
) {
    let provider = TextProvider::new("pair", vec![left.to_owned(), right.to_owned()])
        .expect("two lines");
    assert_eq!(provider.distance(0, 1).expect("in range"), expected);
}

#[rstest]
fn batch_distances_follow_candidate_order(spellings: TextProvider) {
    let row = spellings
        .batch_distances(0, &[3, 1, 0])
        .expect("candidates in range");
    assert_eq!(row, vec![5.0, 1.0, 0.0]);
}

#[rstest]
#[case::query(4, 0)]
#[case::candidate(0, 4)]
fn rejects_indices_past_the_corpus(
    spellings: TextProvider,
    #[case] left: usize,
    #[case] right: usize,
) {
    let err = spellings.distance(left, right).expect_err("index 4 is out of range");
    assert!(matches!(err, DistanceQueryError::OutOfBounds { index: 4 }));
}

#[rstest]
#[case::unix("alpha\nbeta\n", &["alpha", "beta"])]
#[case::windows("carriage\r\nreturn\r\n", &["carriage", "return"])]
#[case::unterminated("lonely", &["lonely"])]
#[case::blank_line_kept("a\n\nb\n", &["a", "", "b"])]
fn reader_lines_lose_their_terminators(#[case] raw: &str, #[case] expected: &[&str]) {
    let provider = TextProvider::try_from_reader("lines", Cursor::new(raw)).expect("non-empty");
    assert_eq!(provider.lines(), expected);
}

#[rstest]
fn empty_corpora_are_rejected() {
    let from_reader = TextProvider::try_from_reader("empty", Cursor::new(""))
        .expect_err("no lines to cluster");
    assert!(matches!(from_reader, TextProviderError::EmptyInput));
    let from_vec = TextProvider::new("empty", Vec::new()).expect_err("no lines to cluster");
    assert!(matches!(from_vec, TextProviderError::EmptyInput));
}

struct BrokenPipe;

impl Read for BrokenPipe {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }
}

impl BufRead for BrokenPipe {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn consume(&mut self, _amt: usize) {}
}

#[rstest]
fn read_failures_surface_as_io_errors() {
    let err = TextProvider::try_from_reader("pipe", BrokenPipe).expect_err("read fails");
    match err {
        TextProviderError::Io(source) => assert_eq!(source.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[rstest]
fn describes_itself(spellings: TextProvider) {
    assert_eq!(spellings.name(), "spellings");
    assert_eq!(spellings.len(), 4);
    assert!(!spellings.is_empty());
    assert!(!spellings.is_squared());
}

#[rstest]
fn single_linkage_groups_spelling_variants(spellings: TextProvider) {
    let hierarchy = AggloBuilder::new()
        .with_algorithm(Algorithm::Slink)
        .build()
        .expect("default configuration")
        .run(&spellings)
        .expect("clustering succeeds");

    let mut heights: Vec<f64> = hierarchy.merges().iter().map(|m| m.distance()).collect();
    heights.sort_by(f64::total_cmp);
    assert_eq!(heights, vec![1.0, 1.0, 4.0]);
    assert_eq!(
        labels(cut_by_height(&hierarchy, 1.0).assignments()),
        vec![0, 0, 1, 1]
    );
}

#[rstest]
fn complete_linkage_splits_on_the_worst_pair(spellings: TextProvider) {
    let hierarchy = AggloBuilder::new()
        .with_algorithm(Algorithm::NnChain)
        .with_linkage(Linkage::Complete)
        .build()
        .expect("valid configuration")
        .run(&spellings)
        .expect("clustering succeeds");

    let top = hierarchy
        .merges()
        .iter()
        .map(|m| m.distance())
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(top, 5.0);
    let two = cut_by_count(&hierarchy, 2).expect("two clusters exist");
    assert_eq!(labels(two.assignments()), vec![0, 0, 1, 1]);
}
