//! Core types and traits for Quarry
//!
//! This crate defines the foundational types shared by every layer of the
//! index builder:
//! - TermId / DocId / PartitionId: the integer identities the index is keyed by
//! - Document: one item of the ordered document stream
//! - Error: Error type hierarchy (I/O, format, ordering, codec, config)
//! - Traits: collaborator seams (PostingCodec, Tokenizer, TermHasher)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CodecError, Error, Result};
pub use traits::{PostingCodec, TermHasher, Tokenizer};
pub use types::{DocId, Document, PartitionId, TermId, NO_DOC};
