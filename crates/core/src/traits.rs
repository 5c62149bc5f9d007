//! Collaborator traits
//!
//! The index builder only ever sees these seams. Concrete codecs live in
//! `quarry-codec`; the default tokenizer and hasher live in `quarry-index`.

use crate::error::CodecError;
use crate::types::{DocId, TermId};

/// Posting list codec.
///
/// Encodes a carry-prefixed doc id list as packed deltas. The first element
/// is the base the deltas start from and is not itself emitted, so encoded
/// chunks of consecutive windows can be concatenated byte-wise and still
/// decode to the complete list.
///
/// # Thread Safety
///
/// Codecs must be `Send + Sync`: a partition's posting lists are encoded in
/// parallel.
///
/// # Scheme Identity
///
/// Each codec has a unique scheme name that is persisted once per build so
/// the reader can instantiate the matching decoder.
pub trait PostingCodec: Send + Sync {
    /// Encode `docs[1..]` as deltas from `docs[0]`.
    ///
    /// `docs` must be non-empty and non-decreasing. A single-element input
    /// encodes to zero bytes.
    fn encode(&self, docs: &[DocId]) -> Result<Vec<u8>, CodecError>;

    /// Decode packed deltas into absolute doc ids, starting from base 0.
    fn decode(&self, data: &[u8]) -> Result<Vec<DocId>, CodecError>;

    /// Unique scheme identifier (e.g. `"simple9"`).
    fn scheme(&self) -> &str;
}

/// Splits document text into its set of distinct tokens.
pub trait Tokenizer: Send + Sync {
    /// Tokenize `text`. The result contains each token at most once.
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Maps a token to its term id.
///
/// Must be deterministic for the duration of one build.
pub trait TermHasher: Send + Sync {
    /// Hash a token to a term id
    fn hash_term(&self, token: &str) -> TermId;
}
