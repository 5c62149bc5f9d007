//! Partition numbering and doc id order are enforced.

use crate::common::*;
use quarry::{IndexBuilder, IndexConfig};

#[test]
fn gap_in_partition_numbers_aborts() {
    let index = TestIndex::new();
    index.write_partitions("simple9", &abc_docs(), 1);
    std::fs::remove_file(index.paths.partition_dictionary(1)).unwrap();
    std::fs::remove_file(index.paths.partition_blob(1)).unwrap();

    let err = PartitionMerger::new(index.paths.clone())
        .merge_directory()
        .unwrap_err();
    assert!(matches!(err, Error::OrderingViolation(_)), "{err}");
    assert_eq!(
        index.file_names(),
        vec!["part000.dct", "part000.idx", "part002.dct", "part002.idx"]
    );
}

#[test]
fn unplaceable_dictionary_name_aborts() {
    let index = TestIndex::new();
    index.write_partitions("simple9", &abc_docs(), 2);
    std::fs::copy(
        index.paths.partition_dictionary(1),
        index.file("partX.dct"),
    )
    .unwrap();

    assert!(matches!(
        PartitionMerger::new(index.paths.clone()).merge_directory(),
        Err(Error::OrderingViolation(_))
    ));
}

#[test]
fn explicit_partitions_must_be_in_order() {
    let index = TestIndex::new();
    index.write_partitions("simple9", &abc_docs(), 2);

    let reversed = vec![
        index.paths.partition_files(1),
        index.paths.partition_files(0),
    ];
    let err = PartitionMerger::new(index.paths.clone())
        .merge(&reversed)
        .unwrap_err();
    assert!(matches!(err, Error::OrderingViolation(_)));
    assert!(!index.paths.has_merged_index());
}

#[test]
fn accumulator_rejects_repeated_doc_id() {
    let mut accumulator = PostingAccumulator::new();
    accumulator.observe(4, terms("ab")).unwrap();

    for doc_id in [4, 2] {
        let err = accumulator.observe(doc_id, terms("c")).unwrap_err();
        assert!(matches!(err, Error::OrderingViolation(_)));
    }
    // Rejected documents left no trace
    assert_eq!(accumulator.last_doc(), Some(4));
    assert!(accumulator.state(t('c')).is_none());

    accumulator.observe(5, terms("c")).unwrap();
    assert_eq!(accumulator.term_count(), 3);
}

#[test]
fn builder_rejects_decreasing_stream_and_cleans_up() {
    let index = TestIndex::new();
    let builder = IndexBuilder::new(
        index.paths.clone(),
        IndexConfig::for_testing().with_partition_size(1),
    )
    .unwrap()
    .with_hasher(LetterHasher);

    let docs = vec![
        Ok(Document::new(1, "u1", "a")),
        Ok(Document::new(2, "u2", "b")),
        Ok(Document::new(2, "u3", "c")),
    ];
    let err = builder.build(docs).unwrap_err();
    assert!(matches!(err, Error::OrderingViolation(_)));
    assert!(index.paths.discover_partitions().unwrap().is_empty());
}
