//! The three-document example, end to end through both merge paths.

use crate::common::*;

#[test]
fn two_partitions_decode_to_full_lists() {
    let index = TestIndex::new();
    assert_eq!(index.write_partitions("simple9", &abc_docs(), 2), 2);
    assert_eq!(
        index.file_names(),
        vec!["part000.dct", "part000.idx", "part001.dct", "part001.idx"]
    );

    let outcome = index.merge();
    assert!(matches!(outcome, MergeOutcome::Merged(_)));
    assert_eq!(outcome.status_message(), "Index is built successfully");
    assert_eq!(index.file_names(), vec!["entire_index", "terms_dict"]);

    let reader = index.open("simple9");
    assert_eq!(reader.postings(t('a')).unwrap(), Some(vec![0, 2]));
    assert_eq!(reader.postings(t('b')).unwrap(), Some(vec![0, 1]));
    assert_eq!(reader.postings(t('c')).unwrap(), Some(vec![1]));
    assert_eq!(reader.postings(t('z')).unwrap(), None);
}

#[test]
fn single_partition_takes_quick_path() {
    let index = TestIndex::new();
    assert_eq!(index.write_partitions("simple9", &abc_docs(), 10), 1);

    let outcome = index.merge();
    assert!(matches!(outcome, MergeOutcome::Quick(_)));
    assert_eq!(outcome.status_message(), "Index is built successfully (quick)");

    let reader = index.open("simple9");
    assert_eq!(decode_all(&reader), reference_postings(&abc_docs()));
}

#[test]
fn merged_dictionary_is_in_term_order() {
    let index = TestIndex::new();
    index.write_partitions("varbyte", &abc_docs(), 1);
    index.merge();

    let dictionary = TermDictionary::load(&index.paths.merged_dictionary()).unwrap();
    let ids: Vec<TermId> = dictionary.term_ids().collect();
    assert_eq!(ids, terms("abc"));

    // Chunks are laid out back to back
    let mut offset = 0;
    for entry in dictionary.iter() {
        assert_eq!(entry.offset as u64, offset);
        offset = entry.end();
    }
    assert_eq!(
        std::fs::metadata(index.paths.merged_blob()).unwrap().len(),
        offset
    );
}
