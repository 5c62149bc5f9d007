//! Simple-9 caps a delta at 28 bits; variable-byte does not.

use crate::common::*;
use quarry::{CodecError, SIMPLE9_MAX_VALUE};

fn wide_gap_docs() -> Vec<(DocId, Vec<TermId>)> {
    vec![(1, terms("a")), (1 + (1 << 28), terms("ab"))]
}

#[test]
fn simple9_rejects_wide_gap() {
    let index = TestIndex::new();
    let err = write_partitions(&index.paths, "simple9", &wide_gap_docs(), 1).unwrap_err();
    assert!(
        matches!(err, Error::Codec(CodecError::ValueOutOfRange { .. })),
        "{err}"
    );
    // The failing window wrote nothing
    assert_eq!(index.file_names(), vec!["part000.dct", "part000.idx"]);
}

#[test]
fn simple9_accepts_largest_delta() {
    let docs = vec![(0, terms("a")), (SIMPLE9_MAX_VALUE, terms("a"))];
    let index = TestIndex::new();
    index.write_partitions("simple9", &docs, 1);
    index.merge();
    assert_eq!(
        index.open("simple9").postings(t('a')).unwrap(),
        Some(vec![0, SIMPLE9_MAX_VALUE])
    );
}

#[test]
fn varbyte_carries_wide_gap() {
    let docs = wide_gap_docs();
    let index = TestIndex::new();
    index.write_partitions("varbyte", &docs, 1);
    index.merge();

    let reader = index.open("varbyte");
    assert_eq!(decode_all(&reader), reference_postings(&docs));
}

#[test]
fn unknown_scheme_is_rejected() {
    let index = TestIndex::new();
    let err = write_partitions(&index.paths, "gamma", &abc_docs(), 1).unwrap_err();
    assert!(matches!(err, Error::Codec(CodecError::UnknownScheme(_))));
}
