//! Quick (rename) and general (concatenate) merges agree.

use crate::common::*;

fn corpus() -> Vec<(DocId, Vec<TermId>)> {
    (0..60u64)
        .map(|doc_id| {
            let mut ids = vec![t('a')];
            if doc_id % 2 == 0 {
                ids.push(t('e'));
            }
            if doc_id % 7 == 3 {
                ids.push(t('s'));
            }
            if doc_id == 41 {
                ids.push(t('r'));
            }
            (doc_id * 3 + 1, ids)
        })
        .collect()
}

#[test]
fn partition_count_does_not_change_decoded_lists() {
    let docs = corpus();
    let expected = reference_postings(&docs);

    for partition_size in [1, 2, 7, 60, 1000] {
        let index = TestIndex::new();
        index.write_partitions("simple9", &docs, partition_size);
        index.merge();
        assert_eq!(
            decode_all(&index.open("simple9")),
            expected,
            "partition_size {}",
            partition_size
        );
    }
}

#[test]
fn single_and_multi_partition_blobs_are_identical() {
    let docs = corpus();

    let single = TestIndex::new();
    single.write_partitions("varbyte", &docs, docs.len());
    single.merge();

    let multi = TestIndex::new();
    multi.write_partitions("varbyte", &docs, 9);
    multi.merge();

    assert_eq!(
        std::fs::read(single.paths.merged_blob()).unwrap(),
        std::fs::read(multi.paths.merged_blob()).unwrap()
    );
    assert_eq!(
        std::fs::read(single.paths.merged_dictionary()).unwrap(),
        std::fs::read(multi.paths.merged_dictionary()).unwrap()
    );
}

#[test]
fn always_copy_matches_rename() {
    let docs = corpus();

    let quick = TestIndex::new();
    quick.write_partitions("simple9", &docs, docs.len());
    let outcome = quick.merge();
    assert!(matches!(outcome, MergeOutcome::Quick(_)));

    let copied = TestIndex::new();
    copied.write_partitions("simple9", &docs, docs.len());
    let outcome = PartitionMerger::new(copied.paths.clone())
        .with_strategy(MergeStrategy::AlwaysCopy)
        .merge_directory()
        .unwrap();
    assert!(matches!(outcome, MergeOutcome::Merged(_)));
    assert_eq!(copied.file_names(), vec!["entire_index", "terms_dict"]);

    assert_eq!(
        std::fs::read(quick.paths.merged_blob()).unwrap(),
        std::fs::read(copied.paths.merged_blob()).unwrap()
    );
    assert_eq!(
        std::fs::read(quick.paths.merged_dictionary()).unwrap(),
        std::fs::read(copied.paths.merged_dictionary()).unwrap()
    );
}

#[test]
fn merge_stats_report_totals() {
    let index = TestIndex::new();
    index.write_partitions("simple9", &corpus(), 20);

    let stats = index.merge().stats().unwrap();
    assert_eq!(stats.partitions, 3);
    assert_eq!(stats.terms, 4);
    assert_eq!(
        stats.blob_bytes,
        std::fs::metadata(index.paths.merged_blob()).unwrap().len()
    );
}
