//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use quarry::{
    get_codec, DocId, Document, Error, IndexPaths, IndexReader, MergeOutcome, MergeStrategy,
    PartitionFiles, PartitionMerger, PartitionWriter, PostingAccumulator, PostingCodec, Result,
    TermDictionary, TermHasher, TermId,
};
use tempfile::TempDir;

// ============================================================================
// Fixtures
// ============================================================================

/// Temporary index directory, removed on drop.
pub struct TestIndex {
    pub dir: TempDir,
    pub paths: IndexPaths,
}

impl TestIndex {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let paths = IndexPaths::from_root(dir.path());
        TestIndex { dir, paths }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write partitions for `docs`, flushing every `partition_size` documents.
    pub fn write_partitions(
        &self,
        scheme: &str,
        docs: &[(DocId, Vec<TermId>)],
        partition_size: usize,
    ) -> usize {
        write_partitions(&self.paths, scheme, docs, partition_size)
            .expect("Failed to write partitions")
    }

    pub fn merge(&self) -> MergeOutcome {
        PartitionMerger::new(self.paths.clone())
            .merge_directory()
            .expect("Merge failed")
    }

    pub fn open(&self, scheme: &str) -> IndexReader {
        let codec = get_codec(scheme).expect("Unknown scheme");
        IndexReader::open_pair(
            &self.paths.merged_dictionary(),
            &self.paths.merged_blob(),
            codec,
        )
        .expect("Failed to open merged index")
    }

    /// Names of all regular files in the directory, sorted.
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.root())
            .expect("read_dir")
            .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Drive the accumulator and partition writer directly, the way a build does.
pub fn write_partitions(
    paths: &IndexPaths,
    scheme: &str,
    docs: &[(DocId, Vec<TermId>)],
    partition_size: usize,
) -> Result<usize> {
    paths.create_directories()?;
    let mut accumulator = PostingAccumulator::new();
    let mut writer = PartitionWriter::new(paths.clone(), get_codec(scheme)?);
    let mut in_window = 0;
    for (doc_id, terms) in docs {
        accumulator.observe(*doc_id, terms.iter().copied())?;
        in_window += 1;
        if in_window == partition_size {
            writer.flush(&mut accumulator)?;
            in_window = 0;
        }
    }
    if in_window > 0 {
        writer.flush(&mut accumulator)?;
    }
    Ok(writer.partitions_written())
}

// ============================================================================
// Reference model
// ============================================================================

/// Term → ascending, duplicate-free doc ids, computed without any codec.
pub fn reference_postings(docs: &[(DocId, Vec<TermId>)]) -> BTreeMap<TermId, Vec<DocId>> {
    let mut postings: BTreeMap<TermId, Vec<DocId>> = BTreeMap::new();
    for (doc_id, terms) in docs {
        for &term in terms {
            let list = postings.entry(term).or_default();
            if list.last() != Some(doc_id) {
                list.push(*doc_id);
            }
        }
    }
    postings
}

/// Decode every term of an open index.
pub fn decode_all(reader: &IndexReader) -> BTreeMap<TermId, Vec<DocId>> {
    let terms: Vec<TermId> = reader.dictionary().term_ids().collect();
    terms
        .into_iter()
        .map(|term| {
            let docs = reader
                .postings(term)
                .expect("decode failed")
                .expect("term listed in dictionary");
            (term, docs)
        })
        .collect()
}

// ============================================================================
// Term naming
// ============================================================================

/// Term id of a single-letter name: `t('a') == 97`.
pub fn t(name: char) -> TermId {
    name as TermId
}

/// Term ids for each letter of `names`.
pub fn terms(names: &str) -> Vec<TermId> {
    names.chars().map(t).collect()
}

/// Hashes each token to the code point of its first character.
pub struct LetterHasher;

impl TermHasher for LetterHasher {
    fn hash_term(&self, token: &str) -> TermId {
        token.chars().next().map(t).unwrap_or(0)
    }
}

/// Doc stream of the worked example: a→[0,2], b→[0,1], c→[1].
pub fn abc_docs() -> Vec<(DocId, Vec<TermId>)> {
    vec![(0, terms("ab")), (1, terms("bc")), (2, terms("a"))]
}
