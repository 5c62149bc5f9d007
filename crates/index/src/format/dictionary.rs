//! Term dictionary format
//!
//! ```text
//! +----------------+
//! | count: u64     |  8 bytes
//! +----------------+
//! | term_id: i64   |  \
//! | offset: u32    |   } 16 bytes, repeated `count` times
//! | length: u32    |  /
//! +----------------+
//! ```
//!
//! All integers are little-endian. The file length must be exactly
//! `8 + 16 * count`; there is no trailer and no checksum, so every
//! structural check the format allows is made on load.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use quarry_core::{Error, Result, TermId};
use rustc_hash::FxHashMap;

/// Size of the record count header
pub const DICT_HEADER_SIZE: usize = 8;
/// Size of one `{term_id, offset, length}` record
pub const DICT_RECORD_SIZE: usize = 16;

/// Location of one term's bytes inside a blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictEntry {
    /// Term the bytes belong to
    pub term_id: TermId,
    /// Byte offset into the blob
    pub offset: u32,
    /// Number of bytes
    pub length: u32,
}

impl DictEntry {
    /// One past the last blob byte of this entry
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.length as u64
    }
}

/// In-memory term dictionary.
///
/// Entries keep their file order; a side index gives O(1) lookup by term.
#[derive(Debug, Clone, Default)]
pub struct TermDictionary {
    entries: Vec<DictEntry>,
    index: FxHashMap<TermId, usize>,
}

impl TermDictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty dictionary with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        TermDictionary {
            entries: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Append an entry.
    ///
    /// Returns `false` (and leaves the dictionary unchanged) if the term is
    /// already present.
    pub fn insert(&mut self, entry: DictEntry) -> bool {
        if self.index.contains_key(&entry.term_id) {
            return false;
        }
        self.index.insert(entry.term_id, self.entries.len());
        self.entries.push(entry);
        true
    }

    /// Look up a term
    pub fn get(&self, term_id: TermId) -> Option<&DictEntry> {
        self.index.get(&term_id).map(|&i| &self.entries[i])
    }

    /// Whether the term is present
    pub fn contains(&self, term_id: TermId) -> bool {
        self.index.contains_key(&term_id)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in file order
    pub fn entries(&self) -> &[DictEntry] {
        &self.entries
    }

    /// Iterate entries in file order
    pub fn iter(&self) -> std::slice::Iter<'_, DictEntry> {
        self.entries.iter()
    }

    /// Iterate term ids in file order
    pub fn term_ids(&self) -> impl Iterator<Item = TermId> + '_ {
        self.entries.iter().map(|e| e.term_id)
    }

    /// Size of the serialized dictionary in bytes
    pub fn encoded_len(&self) -> u64 {
        (DICT_HEADER_SIZE + DICT_RECORD_SIZE * self.entries.len()) as u64
    }

    /// Serialize to a writer
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u64::<LittleEndian>(self.entries.len() as u64)?;
        for entry in &self.entries {
            writer.write_i64::<LittleEndian>(entry.term_id)?;
            writer.write_u32::<LittleEndian>(entry.offset)?;
            writer.write_u32::<LittleEndian>(entry.length)?;
        }
        Ok(())
    }

    /// Serialize to an in-memory buffer
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len() as usize);
        // Writing into a Vec cannot fail
        let _ = self.write_to(&mut buf);
        buf
    }

    /// Deserialize from a reader holding exactly `total_len` bytes.
    ///
    /// `path` only labels errors.
    pub fn read_from<R: Read>(reader: &mut R, total_len: u64, path: &Path) -> Result<Self> {
        if total_len < DICT_HEADER_SIZE as u64 {
            return Err(Error::format(
                path,
                format!("{} bytes is too short for the record count", total_len),
            ));
        }
        let count = reader
            .read_u64::<LittleEndian>()
            .map_err(|e| Error::io_at(path, e))?;

        let expected = count
            .checked_mul(DICT_RECORD_SIZE as u64)
            .and_then(|records| records.checked_add(DICT_HEADER_SIZE as u64));
        if expected != Some(total_len) {
            return Err(Error::format(
                path,
                format!(
                    "record count {} does not match file length {}",
                    count, total_len
                ),
            ));
        }

        // count * 16 fits in the file length, so it fits in usize on 64-bit
        let mut dictionary = TermDictionary::with_capacity(count as usize);
        for position in 0..count {
            let term_id = reader
                .read_i64::<LittleEndian>()
                .map_err(|e| Error::io_at(path, e))?;
            let offset = reader
                .read_u32::<LittleEndian>()
                .map_err(|e| Error::io_at(path, e))?;
            let length = reader
                .read_u32::<LittleEndian>()
                .map_err(|e| Error::io_at(path, e))?;
            if !dictionary.insert(DictEntry {
                term_id,
                offset,
                length,
            }) {
                return Err(Error::format(
                    path,
                    format!("duplicate term {} at record {}", term_id, position),
                ));
            }
        }
        Ok(dictionary)
    }

    /// Deserialize from a byte slice
    pub fn from_bytes(bytes: &[u8], path: &Path) -> Result<Self> {
        let mut reader = bytes;
        Self::read_from(&mut reader, bytes.len() as u64, path)
    }

    /// Load a dictionary file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io_at(path, e))?;
        let len = file.metadata().map_err(|e| Error::io_at(path, e))?.len();
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader, len, path)
    }

    /// Check that every entry lies inside a blob of `blob_len` bytes.
    ///
    /// `path` names the dictionary in the error.
    pub fn validate_against_blob(&self, blob_len: u64, path: &Path) -> Result<()> {
        if let Some(entry) = self.entries.iter().find(|e| e.end() > blob_len) {
            return Err(Error::format(
                path,
                format!(
                    "term {} spans bytes {}..{} past blob length {}",
                    entry.term_id,
                    entry.offset,
                    entry.end(),
                    blob_len
                ),
            ));
        }
        Ok(())
    }
}
