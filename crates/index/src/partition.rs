//! Partition writer
//!
//! Turns an accumulator snapshot into one `part<NNN>.dct` / `part<NNN>.idx`
//! pair. Chunks are encoded in parallel, then written sequentially in
//! ascending term id order, so the blob layout and the dictionary order
//! always agree.
//!
//! The blob is committed before the dictionary: a dictionary on disk always
//! has its complete blob next to it.

use std::time::Instant;

use quarry_core::{CodecError, Error, PartitionId, PostingCodec, Result};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::accumulator::{PostingAccumulator, TermPostings};
use crate::atomic::{sync_dir, AtomicFile};
use crate::format::{DictEntry, IndexPaths, PartitionFiles, TermDictionary};

/// Summary of one written partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionInfo {
    /// Partition number
    pub id: PartitionId,
    /// Dictionary entries written
    pub terms: usize,
    /// Blob size in bytes
    pub blob_bytes: u64,
    /// Files written
    pub files: PartitionFiles,
}

/// Writes numbered partitions into an index directory.
///
/// Partition ids start at 0 and increase by one per flush, matching the
/// ascending doc id windows the accumulator saw.
pub struct PartitionWriter {
    paths: IndexPaths,
    codec: Box<dyn PostingCodec>,
    next_id: PartitionId,
}

impl PartitionWriter {
    /// Create a writer whose first partition is `part000`
    pub fn new(paths: IndexPaths, codec: Box<dyn PostingCodec>) -> Self {
        PartitionWriter {
            paths,
            codec,
            next_id: 0,
        }
    }

    /// Id the next flush will use
    pub fn next_id(&self) -> PartitionId {
        self.next_id
    }

    /// Number of partitions written so far
    pub fn partitions_written(&self) -> usize {
        self.next_id as usize
    }

    /// Codec used for every chunk
    pub fn codec(&self) -> &dyn PostingCodec {
        self.codec.as_ref()
    }

    /// Index directory
    pub fn paths(&self) -> &IndexPaths {
        &self.paths
    }

    /// Flush the accumulator's open window as the next partition.
    ///
    /// The accumulator is reset even if writing fails afterwards; a failed
    /// flush is fatal to the build.
    pub fn flush(&mut self, accumulator: &mut PostingAccumulator) -> Result<PartitionInfo> {
        let snapshot = accumulator.snapshot_and_reset();
        self.write_snapshot(&snapshot)
    }

    /// Write an already taken snapshot as the next partition.
    ///
    /// `snapshot` must be sorted by term id with no duplicates, as
    /// [`PostingAccumulator::snapshot_and_reset`] returns it.
    pub fn write_snapshot(&mut self, snapshot: &[TermPostings]) -> Result<PartitionInfo> {
        let started = Instant::now();
        let id = self.next_id;
        let files = self.paths.partition_files(id);

        let codec = self.codec.as_ref();
        let chunks: Vec<Vec<u8>> = snapshot
            .par_iter()
            .map(|postings| codec.encode(&postings.docs))
            .collect::<std::result::Result<_, CodecError>>()?;

        let mut dictionary = TermDictionary::with_capacity(snapshot.len());
        let mut blob = AtomicFile::create(&files.blob)?;
        let mut offset: u64 = 0;
        for (postings, chunk) in snapshot.iter().zip(&chunks) {
            let entry = entry_at(postings.term_id, offset, chunk.len(), &files)?;
            if !dictionary.insert(entry) {
                return Err(Error::invalid_input(format!(
                    "term {} appears twice in one snapshot",
                    postings.term_id
                )));
            }
            blob.put(chunk)?;
            offset = entry.end();
        }
        blob.commit()?;

        if let Err(e) = write_dictionary(&dictionary, &files) {
            // A blob without its dictionary is not a partition
            let _ = std::fs::remove_file(&files.blob);
            return Err(e);
        }
        sync_dir(self.paths.root())?;

        self.next_id += 1;

        info!(
            target: "quarry::partition",
            partition = id,
            terms = dictionary.len(),
            blob_bytes = offset,
            "Partition flushed"
        );
        debug!(
            target: "quarry::partition",
            partition = id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Partition write timing"
        );

        Ok(PartitionInfo {
            id,
            terms: dictionary.len(),
            blob_bytes: offset,
            files,
        })
    }
}

fn write_dictionary(dictionary: &TermDictionary, files: &PartitionFiles) -> Result<()> {
    let mut dct = AtomicFile::create(&files.dictionary)?;
    dictionary
        .write_to(&mut dct)
        .map_err(|e| Error::io_at(&files.dictionary, e))?;
    dct.commit()
}

/// Build a dictionary entry, refusing offsets past the `u32` range.
fn entry_at(
    term_id: quarry_core::TermId,
    offset: u64,
    len: usize,
    files: &PartitionFiles,
) -> Result<DictEntry> {
    let end = offset + len as u64;
    if end > u32::MAX as u64 {
        return Err(Error::format(
            &files.blob,
            format!(
                "blob would grow to {} bytes, past the 32-bit offset range",
                end
            ),
        ));
    }
    Ok(DictEntry {
        term_id,
        offset: offset as u32,
        length: len as u32,
    })
}
