//! Core types for Quarry
//!
//! This module defines the foundational types:
//! - TermId: 64-bit signed hash of a vocabulary token
//! - DocId: externally assigned, strictly increasing document identifier
//! - PartitionId: sequence number of a flushed partition
//! - Document: one (doc id, url, text) item of a document stream

use serde::{Deserialize, Serialize};

/// Vocabulary key.
///
/// Produced by a [`TermHasher`](crate::traits::TermHasher). Distinct tokens may
/// collide; the index treats them as the same term.
pub type TermId = i64;

/// Document identifier.
///
/// Assigned by the document source. Strictly increasing across the whole
/// corpus and never reused; delta coding depends on it.
pub type DocId = u64;

/// Partition sequence number (0, 1, 2, ...) in production order.
pub type PartitionId = u32;

/// Carry value of a term that has never been emitted.
///
/// Every posting list delta chain starts from this base.
pub const NO_DOC: DocId = 0;

/// One document of the corpus stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier
    pub doc_id: DocId,
    /// Source url, recorded in the url list sidecar
    pub url: String,
    /// Extracted plain text
    pub text: String,
}

impl Document {
    /// Create a new document
    pub fn new(doc_id: DocId, url: impl Into<String>, text: impl Into<String>) -> Self {
        Document {
            doc_id,
            url: url.into(),
            text: text.into(),
        }
    }
}
