//! Partitioned inverted-index builder and concatenation merge
//!
//! A build streams documents through a tokenizer and term hasher into a
//! [`PostingAccumulator`], flushing a partition every `partition_size`
//! documents. Each partition's chunk for a term is delta-coded against the
//! last doc id any earlier partition emitted for that term, which lets the
//! [`PartitionMerger`] build the full-corpus index by concatenating encoded
//! byte ranges without ever decoding them.
//!
//! # Example
//!
//! ```no_run
//! use quarry_core::Document;
//! use quarry_index::{IndexBuilder, IndexConfig, IndexPaths, IndexReader, PartitionMerger};
//!
//! # fn main() -> quarry_core::Result<()> {
//! let paths = IndexPaths::from_root("./index");
//! let builder = IndexBuilder::new(paths.clone(), IndexConfig::default())?;
//! builder.build(vec![
//!     Ok(Document::new(0, "http://a/", "a b")),
//!     Ok(Document::new(1, "http://b/", "b c")),
//! ])?;
//! PartitionMerger::new(paths.clone()).merge_directory()?;
//!
//! let reader = IndexReader::open(&paths)?;
//! let docs = reader.postings_for_token("b", builder.hasher())?;
//! assert_eq!(docs, Some(vec![0, 1]));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accumulator;
pub mod atomic;
pub mod builder;
pub mod config;
pub mod format;
pub mod hasher;
pub mod merge;
pub mod partition;
pub mod reader;
pub mod sidecar;
pub mod source;
pub mod tokenizer;

pub use accumulator::{PostingAccumulator, PostingState, TermPostings};
pub use builder::{BuildSummary, IndexBuilder};
pub use config::{IndexConfig, DEFAULT_BATCH_SIZE, DEFAULT_PARTITION_SIZE};
pub use format::{DictEntry, IndexPaths, PartitionFiles, TermDictionary};
pub use hasher::Xxh3TermHasher;
pub use merge::{MergeOutcome, MergeStats, MergeStrategy, PartitionMerger};
pub use partition::{PartitionInfo, PartitionWriter};
pub use reader::IndexReader;
pub use sidecar::{read_codec_scheme, write_codec_scheme, UrlList, UrlListWriter};
pub use source::{JsonLinesSource, SpiderDirSource};
pub use tokenizer::WordTokenizer;
