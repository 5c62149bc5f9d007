//! Quarry - partitioned inverted-index builder
//!
//! Quarry turns an ordered document stream into an inverted index in two
//! phases: a build writes fixed-size partitions (`part000.dct` /
//! `part000.idx`, ...), and a merge concatenates them into one dictionary
//! (`terms_dict`) and one posting blob (`entire_index`) without decoding a
//! single posting list.
//!
//! # Quick Start
//!
//! ```no_run
//! use quarry::{Document, IndexBuilder, IndexConfig, IndexPaths, IndexReader, PartitionMerger};
//!
//! # fn main() -> quarry::Result<()> {
//! let paths = IndexPaths::from_root("./temp_idx");
//! let builder = IndexBuilder::new(paths.clone(), IndexConfig::default())?;
//! builder.build(vec![Ok(Document::new(1, "http://a/", "hello world"))])?;
//!
//! let outcome = PartitionMerger::new(paths.clone()).merge_directory()?;
//! println!("{}", outcome.status_message());
//!
//! let reader = IndexReader::open(&paths)?;
//! let docs = reader.postings_for_token("hello", builder.hasher())?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `quarry-core`: ids, [`Document`], [`Error`] and the collaborator traits
//! - `quarry-codec`: the Simple-9 and variable-byte posting codecs
//! - `quarry-index`: accumulator, partition writer, merger, reader, sidecars

pub use quarry_codec::{
    get_codec, is_supported, Simple9Codec, VarByteCodec, DEFAULT_SCHEME, SIMPLE9_MAX_VALUE,
};
pub use quarry_core::{
    CodecError, DocId, Document, Error, PartitionId, PostingCodec, Result, TermHasher, TermId,
    Tokenizer, NO_DOC,
};
pub use quarry_index::*;
