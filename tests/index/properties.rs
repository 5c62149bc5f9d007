//! Randomized corpora: any partitioning decodes to the unpartitioned lists.

use crate::common::*;
use proptest::prelude::*;

/// Strictly increasing doc ids, each with a subset of a small vocabulary.
fn doc_stream() -> impl Strategy<Value = Vec<(DocId, Vec<TermId>)>> {
    (
        0u64..50,
        proptest::collection::vec(
            (1u64..1_000, proptest::collection::vec(0i64..24, 0..6)),
            1..80,
        ),
    )
        .prop_map(|(start, items)| {
            let mut doc_id = start;
            items
                .into_iter()
                .map(|(gap, ids)| {
                    let doc = (doc_id, ids);
                    doc_id += gap;
                    doc
                })
                .collect()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn any_partitioning_matches_reference(
        docs in doc_stream(),
        partition_size in 1usize..12,
        varbyte in any::<bool>(),
    ) {
        let scheme = if varbyte { "varbyte" } else { "simple9" };
        let expected = reference_postings(&docs);

        let index = TestIndex::new();
        index.write_partitions(scheme, &docs, partition_size);
        index.merge();
        prop_assert_eq!(decode_all(&index.open(scheme)), expected);
    }

    #[test]
    fn quick_and_general_paths_agree(
        docs in doc_stream(),
        partition_size in 1usize..6,
    ) {
        let single = TestIndex::new();
        single.write_partitions("simple9", &docs, docs.len());
        single.merge();

        let split = TestIndex::new();
        split.write_partitions("simple9", &docs, partition_size);
        split.merge();

        prop_assert_eq!(
            decode_all(&single.open("simple9")),
            decode_all(&split.open("simple9"))
        );
    }
}
