//! Merged index reader
//!
//! Opens `terms_dict` + `entire_index`, instantiates the codec named in
//! `encoding.ini` and decodes whole posting lists on demand. The blob is
//! memory-mapped; each term's bytes are one concatenation-safe stream, so a
//! single decode yields the corpus-wide list.

use std::fs::File;
use std::path::Path;

use quarry_codec::get_codec;
use quarry_core::{DocId, Error, PostingCodec, Result, TermHasher, TermId};
use tracing::debug;

use crate::format::{DictEntry, IndexPaths, TermDictionary};
use crate::sidecar::read_codec_scheme;

/// Backing storage for a blob
enum BlobData {
    /// Heap bytes (empty blobs cannot be mapped)
    Owned(Vec<u8>),
    /// Memory-mapped file
    Mmap(memmap2::Mmap),
}

impl BlobData {
    fn as_bytes(&self) -> &[u8] {
        match self {
            BlobData::Owned(v) => v,
            BlobData::Mmap(m) => m,
        }
    }
}

/// Read-only view of a dictionary/blob pair
pub struct IndexReader {
    dictionary: TermDictionary,
    blob: BlobData,
    codec: Box<dyn PostingCodec>,
}

impl IndexReader {
    /// Open the merged index of a directory
    pub fn open(paths: &IndexPaths) -> Result<Self> {
        let scheme = read_codec_scheme(paths)?;
        let codec = get_codec(&scheme)?;
        Self::open_pair(&paths.merged_dictionary(), &paths.merged_blob(), codec)
    }

    /// Open any dictionary/blob pair (a merged index or a single partition)
    /// with an explicit codec.
    ///
    /// The dictionary is validated against the blob length.
    pub fn open_pair(
        dictionary_path: &Path,
        blob_path: &Path,
        codec: Box<dyn PostingCodec>,
    ) -> Result<Self> {
        let dictionary = TermDictionary::load(dictionary_path)?;
        let file = File::open(blob_path).map_err(|e| Error::io_at(blob_path, e))?;
        let len = file
            .metadata()
            .map_err(|e| Error::io_at(blob_path, e))?
            .len();
        let blob = if len == 0 {
            BlobData::Owned(Vec::new())
        } else {
            // SAFETY: the index is immutable once merged; nothing in this
            // crate writes to a blob after its final rename.
            let mmap =
                unsafe { memmap2::Mmap::map(&file) }.map_err(|e| Error::io_at(blob_path, e))?;
            BlobData::Mmap(mmap)
        };
        dictionary.validate_against_blob(blob.as_bytes().len() as u64, dictionary_path)?;

        debug!(
            target: "quarry::reader",
            terms = dictionary.len(),
            blob_bytes = len,
            scheme = codec.scheme(),
            "Index opened"
        );
        Ok(IndexReader {
            dictionary,
            blob,
            codec,
        })
    }

    /// Dictionary of the open index
    pub fn dictionary(&self) -> &TermDictionary {
        &self.dictionary
    }

    /// Number of terms
    pub fn term_count(&self) -> usize {
        self.dictionary.len()
    }

    /// Blob size in bytes
    pub fn blob_len(&self) -> u64 {
        self.blob.as_bytes().len() as u64
    }

    /// Codec scheme used to decode postings
    pub fn codec_scheme(&self) -> &str {
        self.codec.scheme()
    }

    /// Encoded bytes of a term
    pub fn raw_postings(&self, term_id: TermId) -> Option<&[u8]> {
        self.dictionary
            .get(term_id)
            .map(|entry| self.slice(entry))
    }

    /// Decoded posting list of a term, `None` if the term is not indexed
    pub fn postings(&self, term_id: TermId) -> Result<Option<Vec<DocId>>> {
        match self.raw_postings(term_id) {
            Some(bytes) => Ok(Some(self.codec.decode(bytes)?)),
            None => Ok(None),
        }
    }

    /// Decoded posting list of a token under the build's hasher
    pub fn postings_for_token(
        &self,
        token: &str,
        hasher: &dyn TermHasher,
    ) -> Result<Option<Vec<DocId>>> {
        self.postings(hasher.hash_term(token))
    }

    fn slice(&self, entry: &DictEntry) -> &[u8] {
        // Bounds were validated on open
        &self.blob.as_bytes()[entry.offset as usize..entry.end() as usize]
    }
}
