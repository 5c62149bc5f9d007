//! Document sources through the builder, merge and lookup.

use crate::common::*;
use quarry::{
    read_codec_scheme, IndexBuilder, IndexConfig, JsonLinesSource, SpiderDirSource, UrlList,
    Xxh3TermHasher,
};

fn jsonl(index: &TestIndex, docs: &[Document]) -> std::path::PathBuf {
    let path = index.file("docs.jsonl");
    let body: String = docs.iter().map(|doc| json_line(doc) + "\n").collect();
    std::fs::write(&path, body).unwrap();
    path
}

fn json_line(doc: &Document) -> String {
    format!(
        "{{\"doc_id\":{},\"url\":\"{}\",\"text\":\"{}\"}}",
        doc.doc_id, doc.url, doc.text
    )
}

#[test]
fn json_lines_build_merge_lookup() {
    let input = TestIndex::new();
    let source_path = jsonl(
        &input,
        &[
            Document::new(0, "http://x/0", "Rust is fast"),
            Document::new(1, "http://x/1", "rust, rust and more RUST"),
            Document::new(2, "http://x/2", "fast index"),
            Document::new(3, "http://x/3", ""),
            Document::new(4, "http://x/4", "index"),
        ],
    );

    let index = TestIndex::new();
    let builder = IndexBuilder::new(
        index.paths.clone(),
        IndexConfig::default().with_partition_size(2),
    )
    .unwrap();
    let summary = builder
        .build(JsonLinesSource::open(&source_path).unwrap())
        .unwrap();
    assert_eq!(summary.documents, 5);
    assert_eq!(summary.partitions, 3);
    assert_eq!(summary.codec, "simple9");
    assert_eq!(read_codec_scheme(&index.paths).unwrap(), "simple9");

    let urls = UrlList::open(&index.paths).unwrap();
    assert_eq!(urls.len(), 5);
    assert_eq!(urls.url(3), Some("http://x/3"));

    index.merge();
    let reader = IndexReader::open(&index.paths).unwrap();
    let hasher = builder.hasher();
    assert_eq!(
        reader.postings_for_token("rust", hasher).unwrap(),
        Some(vec![0, 1])
    );
    assert_eq!(
        reader.postings_for_token("fast", hasher).unwrap(),
        Some(vec![0, 2])
    );
    assert_eq!(
        reader.postings_for_token("index", hasher).unwrap(),
        Some(vec![2, 4])
    );
    assert_eq!(reader.postings_for_token("slow", hasher).unwrap(), None);
}

#[test]
fn spider_directory_is_read_in_numeric_order() {
    let crawl = TestIndex::new();
    std::fs::write(
        crawl.file("index.json"),
        r#"{"10": "http://s/10", "2": "http://s/2", "7": "http://s/7"}"#,
    )
    .unwrap();
    let texts = crawl.file("clean_texts");
    std::fs::create_dir(&texts).unwrap();
    std::fs::write(texts.join("2.txt"), "alpha beta").unwrap();
    std::fs::write(texts.join("7.txt"), "beta").unwrap();
    std::fs::write(texts.join("10.txt"), "alpha").unwrap();

    let index = TestIndex::new();
    let builder = IndexBuilder::new(
        index.paths.clone(),
        IndexConfig::for_testing().with_codec("varbyte"),
    )
    .unwrap();
    builder
        .build(SpiderDirSource::open(crawl.root()).unwrap())
        .unwrap();

    let urls = UrlList::open(&index.paths).unwrap();
    assert_eq!(
        urls.iter().collect::<Vec<_>>(),
        vec!["http://s/2", "http://s/7", "http://s/10"]
    );

    index.merge();
    let reader = IndexReader::open(&index.paths).unwrap();
    assert_eq!(reader.codec_scheme(), "varbyte");
    assert_eq!(
        reader.postings_for_token("alpha", builder.hasher()).unwrap(),
        Some(vec![2, 10])
    );
    assert_eq!(
        reader.postings_for_token("beta", builder.hasher()).unwrap(),
        Some(vec![2, 7])
    );
}

#[test]
fn missing_spider_text_fails_build() {
    let crawl = TestIndex::new();
    std::fs::write(crawl.file("index.json"), r#"{"1": "http://s/1"}"#).unwrap();
    std::fs::create_dir(crawl.file("clean_texts")).unwrap();

    let index = TestIndex::new();
    let builder = IndexBuilder::new(index.paths.clone(), IndexConfig::for_testing()).unwrap();
    let err = builder
        .build(SpiderDirSource::open(crawl.root()).unwrap())
        .unwrap_err();
    assert!(matches!(err, Error::IoAt { .. }));
}

#[test]
fn custom_hasher_keys_terms() {
    let index = TestIndex::new();
    let builder = IndexBuilder::new(index.paths.clone(), IndexConfig::for_testing())
        .unwrap()
        .with_hasher(LetterHasher);
    builder
        .build(vec![
            Ok(Document::new(0, "u0", "apple banana")),
            Ok(Document::new(1, "u1", "banana cherry")),
            Ok(Document::new(2, "u2", "avocado")),
        ])
        .unwrap();
    index.merge();

    // 'apple' and 'avocado' collide under the letter hasher
    let reader = IndexReader::open(&index.paths).unwrap();
    assert_eq!(decode_all(&reader), reference_postings(&abc_docs()));
}

#[test]
fn seeded_hasher_changes_term_ids() {
    let index = TestIndex::new();
    let config = IndexConfig::for_testing().with_hash_seed(99);
    let builder = IndexBuilder::new(index.paths.clone(), config).unwrap();
    builder
        .build(vec![Ok(Document::new(1, "u", "word"))])
        .unwrap();
    index.merge();

    let reader = IndexReader::open(&index.paths).unwrap();
    assert!(reader
        .postings_for_token("word", &Xxh3TermHasher::new(99))
        .unwrap()
        .is_some());
    assert!(reader
        .postings_for_token("word", &Xxh3TermHasher::new(0))
        .unwrap()
        .is_none());
}

#[test]
fn min_token_len_drops_short_tokens() {
    let index = TestIndex::new();
    let config = IndexConfig::for_testing().with_min_token_len(3);
    let builder = IndexBuilder::new(index.paths.clone(), config).unwrap();
    builder
        .build(vec![Ok(Document::new(1, "u", "a an the index"))])
        .unwrap();
    index.merge();

    let reader = IndexReader::open(&index.paths).unwrap();
    assert_eq!(reader.term_count(), 2);
}

#[test]
fn build_refuses_directory_with_partitions() {
    let index = TestIndex::new();
    index.write_partitions("simple9", &abc_docs(), 2);

    let builder = IndexBuilder::new(index.paths.clone(), IndexConfig::for_testing()).unwrap();
    let err = builder
        .build(vec![Ok(Document::new(9, "u", "late"))])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(index.paths.discover_partitions().unwrap().len(), 2);
}

#[test]
fn malformed_line_fails_build_without_partitions() {
    let input = TestIndex::new();
    let path = input.file("docs.jsonl");
    std::fs::write(
        &path,
        "{\"doc_id\":0,\"url\":\"u\",\"text\":\"a\"}\n{\"doc_id\":1,\"url\":\n",
    )
    .unwrap();

    let index = TestIndex::new();
    let builder = IndexBuilder::new(
        index.paths.clone(),
        IndexConfig::for_testing().with_partition_size(1).with_batch_size(1),
    )
    .unwrap();
    let err = builder
        .build(JsonLinesSource::open(&path).unwrap())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)), "{err}");
    assert!(index.paths.discover_partitions().unwrap().is_empty());
}

#[test]
fn empty_stream_writes_no_partitions() {
    let index = TestIndex::new();
    let builder = IndexBuilder::new(index.paths.clone(), IndexConfig::for_testing()).unwrap();
    let summary = builder.build(Vec::<Result<Document>>::new()).unwrap();
    assert_eq!(summary.partitions, 0);
    assert_eq!(summary.documents, 0);
    assert!(UrlList::open(&index.paths).unwrap().is_empty());

    assert!(matches!(
        PartitionMerger::new(index.paths.clone()).merge_directory(),
        Err(Error::NoPartitions(_))
    ));
}
