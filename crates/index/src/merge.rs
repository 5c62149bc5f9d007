//! Partition merger
//!
//! Combines `part000 .. partN-1` into `terms_dict` / `entire_index` by pure
//! byte-range concatenation. Chunks are never decoded: each partition's chunk
//! for a term is already delta-coded against the last doc id of the nearest
//! preceding partition holding that term, so appending chunks in ascending
//! partition order rebuilds the corpus-wide list. Merging in any other order
//! corrupts every multi-partition list without any error, so partition
//! numbering is checked before a byte is copied.
//!
//! # Crash Safety
//!
//! 1. Stale `.*.tmp` files from an earlier crash are removed
//! 2. Merged blob and dictionary are written to temporary files and fsynced
//! 3. Blob is renamed into place, then the dictionary
//! 4. The directory is fsynced
//! 5. Only then are the input partitions deleted (dictionary before blob)
//!
//! A crash before step 5 finishes leaves complete inputs behind; running the
//! merge again recomputes the same output from them.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::time::Instant;

use quarry_core::{Error, Result, TermId};
use tracing::{debug, info, warn};

use crate::atomic::{is_temp_name, sync_dir, AtomicFile};
use crate::format::{check_contiguous, DictEntry, IndexPaths, PartitionFiles, TermDictionary};

/// How a single partition is merged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Rename a single partition into place; copy otherwise
    #[default]
    Auto,
    /// Always copy byte ranges, even for a single partition
    AlwaysCopy,
}

/// Counters for a completed merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Partitions consumed
    pub partitions: usize,
    /// Terms in the merged dictionary
    pub terms: usize,
    /// Merged blob size in bytes
    pub blob_bytes: u64,
}

/// Result of a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A single partition was renamed into place
    Quick(MergeStats),
    /// Partitions were concatenated
    Merged(MergeStats),
    /// No partitions, but a merged index is already present
    AlreadyMerged,
}

impl MergeOutcome {
    /// One-line status message reported by the merge tool
    pub fn status_message(&self) -> &'static str {
        match self {
            MergeOutcome::Quick(_) => "Index is built successfully (quick)",
            MergeOutcome::Merged(_) => "Index is built successfully",
            MergeOutcome::AlreadyMerged => "Index is already built",
        }
    }

    /// Counters, if anything was merged
    pub fn stats(&self) -> Option<MergeStats> {
        match self {
            MergeOutcome::Quick(stats) | MergeOutcome::Merged(stats) => Some(*stats),
            MergeOutcome::AlreadyMerged => None,
        }
    }
}

/// Merges the partitions of one index directory
#[derive(Debug, Clone)]
pub struct PartitionMerger {
    paths: IndexPaths,
    strategy: MergeStrategy,
}

impl PartitionMerger {
    /// Create a merger for an index directory
    pub fn new(paths: IndexPaths) -> Self {
        PartitionMerger {
            paths,
            strategy: MergeStrategy::Auto,
        }
    }

    /// Set the single-partition strategy
    pub fn with_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Index directory
    pub fn paths(&self) -> &IndexPaths {
        &self.paths
    }

    /// Discover and merge every partition in the directory.
    ///
    /// With no partitions, an existing merged pair is left untouched
    /// ([`MergeOutcome::AlreadyMerged`]); otherwise the directory holds no
    /// index at all and [`Error::NoPartitions`] is returned.
    pub fn merge_directory(&self) -> Result<MergeOutcome> {
        self.cleanup_temp_files()?;
        if let Some(outcome) = self.finish_interrupted_quick()? {
            return Ok(outcome);
        }
        let partitions = self.paths.discover_partitions()?;
        if partitions.is_empty() {
            if self.paths.has_merged_index() {
                info!(target: "quarry::merge", root = %self.paths.root().display(), "Index already merged");
                return Ok(MergeOutcome::AlreadyMerged);
            }
            return Err(Error::NoPartitions(self.paths.root().to_path_buf()));
        }
        self.merge(&partitions)
    }

    /// Merge the given partitions into the directory's merged pair.
    ///
    /// `partitions` must be numbered `0..N` in slice order. Every input
    /// dictionary is validated against its blob before any output is
    /// written; on error all inputs are left in place.
    pub fn merge(&self, partitions: &[PartitionFiles]) -> Result<MergeOutcome> {
        if partitions.is_empty() {
            return Err(Error::NoPartitions(self.paths.root().to_path_buf()));
        }
        check_contiguous(partitions)?;

        let started = Instant::now();
        info!(
            target: "quarry::merge",
            partitions = partitions.len(),
            root = %self.paths.root().display(),
            "Merge started"
        );

        let outcome = match (partitions, self.strategy) {
            ([single], MergeStrategy::Auto) => self.merge_quick(single)?,
            _ => self.merge_general(partitions)?,
        };

        if let Some(stats) = outcome.stats() {
            let path = match outcome {
                MergeOutcome::Quick(_) => "quick",
                _ => "general",
            };
            info!(
                target: "quarry::merge",
                path,
                partitions = stats.partitions,
                terms = stats.terms,
                blob_bytes = stats.blob_bytes,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Merge complete"
            );
        }
        Ok(outcome)
    }

    /// Rename the only partition into place.
    fn merge_quick(&self, partition: &PartitionFiles) -> Result<MergeOutcome> {
        let (dictionary, blob_len) = load_validated(partition)?;

        let merged_blob = self.paths.merged_blob();
        let merged_dictionary = self.paths.merged_dictionary();
        std::fs::rename(&partition.blob, &merged_blob)
            .map_err(|e| Error::io_at(&partition.blob, e))?;
        std::fs::rename(&partition.dictionary, &merged_dictionary)
            .map_err(|e| Error::io_at(&partition.dictionary, e))?;
        sync_dir(self.paths.root())?;

        Ok(MergeOutcome::Quick(MergeStats {
            partitions: 1,
            terms: dictionary.len(),
            blob_bytes: blob_len,
        }))
    }

    /// Complete a quick merge that stopped between its two renames.
    ///
    /// That leaves `entire_index` beside a lone `part000.dct` whose blob is
    /// gone and no `terms_dict`. The dictionary still describes the renamed
    /// blob, so it is validated against it and renamed too.
    fn finish_interrupted_quick(&self) -> Result<Option<MergeOutcome>> {
        let partition = self.paths.partition_files(0);
        let merged_blob = self.paths.merged_blob();
        let merged_dictionary = self.paths.merged_dictionary();
        if !partition.dictionary.is_file()
            || partition.blob.exists()
            || !merged_blob.is_file()
            || merged_dictionary.exists()
            || self.paths.partition_dictionary(1).exists()
        {
            return Ok(None);
        }

        let dictionary = TermDictionary::load(&partition.dictionary)?;
        let blob_len = std::fs::metadata(&merged_blob)
            .map_err(|e| Error::io_at(&merged_blob, e))?
            .len();
        dictionary.validate_against_blob(blob_len, &partition.dictionary)?;

        warn!(
            target: "quarry::merge",
            dictionary = %partition.dictionary.display(),
            "Finishing interrupted quick merge"
        );
        std::fs::rename(&partition.dictionary, &merged_dictionary)
            .map_err(|e| Error::io_at(&partition.dictionary, e))?;
        sync_dir(self.paths.root())?;

        Ok(Some(MergeOutcome::Quick(MergeStats {
            partitions: 1,
            terms: dictionary.len(),
            blob_bytes: blob_len,
        })))
    }

    /// Concatenate every term's chunks across partitions.
    fn merge_general(&self, partitions: &[PartitionFiles]) -> Result<MergeOutcome> {
        let mut inputs = Vec::with_capacity(partitions.len());
        for partition in partitions {
            let (dictionary, _) = load_validated(partition)?;
            inputs.push(dictionary);
        }

        let mut terms: Vec<TermId> = inputs.iter().flat_map(|d| d.term_ids()).collect();
        terms.sort_unstable();
        terms.dedup();
        debug!(target: "quarry::merge", terms = terms.len(), "Term union computed");

        let mut cursors = partitions
            .iter()
            .map(BlobCursor::open)
            .collect::<Result<Vec<_>>>()?;

        let merged_blob_path = self.paths.merged_blob();
        let mut blob = AtomicFile::create(&merged_blob_path)?;
        let mut merged = TermDictionary::with_capacity(terms.len());
        let mut offset: u64 = 0;

        for &term_id in &terms {
            let mut length: u64 = 0;
            for (dictionary, cursor) in inputs.iter().zip(cursors.iter_mut()) {
                if let Some(entry) = dictionary.get(term_id) {
                    cursor.copy_range(entry, &mut blob)?;
                    length += entry.length as u64;
                }
            }
            if offset + length > u32::MAX as u64 {
                return Err(Error::format(
                    &merged_blob_path,
                    format!(
                        "merged blob would grow to {} bytes, past the 32-bit offset range",
                        offset + length
                    ),
                ));
            }
            merged.insert(DictEntry {
                term_id,
                offset: offset as u32,
                length: length as u32,
            });
            offset += length;
        }

        // Close every input before anything is renamed or deleted
        drop(cursors);

        let merged_dictionary_path = self.paths.merged_dictionary();
        let mut dct = AtomicFile::create(&merged_dictionary_path)?;
        merged
            .write_to(&mut dct)
            .map_err(|e| Error::io_at(&merged_dictionary_path, e))?;

        blob.commit()?;
        dct.commit()?;
        sync_dir(self.paths.root())?;

        self.remove_inputs(partitions)?;

        Ok(MergeOutcome::Merged(MergeStats {
            partitions: partitions.len(),
            terms: merged.len(),
            blob_bytes: offset,
        }))
    }

    fn remove_inputs(&self, partitions: &[PartitionFiles]) -> Result<()> {
        for partition in partitions {
            std::fs::remove_file(&partition.dictionary)
                .map_err(|e| Error::io_at(&partition.dictionary, e))?;
            std::fs::remove_file(&partition.blob).map_err(|e| Error::io_at(&partition.blob, e))?;
        }
        sync_dir(self.paths.root())?;
        debug!(target: "quarry::merge", removed = partitions.len(), "Input partitions removed");
        Ok(())
    }

    /// Remove temporary files left behind by an interrupted build or merge.
    ///
    /// Returns the number of files removed.
    pub fn cleanup_temp_files(&self) -> Result<usize> {
        let root = self.paths.root();
        if !root.exists() {
            return Ok(0);
        }

        let mut count = 0;
        for entry in std::fs::read_dir(root).map_err(|e| Error::io_at(root, e))? {
            let entry = entry.map_err(|e| Error::io_at(root, e))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if is_temp_name(&name) && entry.path().is_file() {
                warn!(target: "quarry::merge", file = %name, "Removing stale temporary file");
                std::fs::remove_file(entry.path()).map_err(|e| Error::io_at(entry.path(), e))?;
                count += 1;
            }
        }
        Ok(count)
    }
}

/// Load a partition's dictionary and check it against its blob length.
fn load_validated(partition: &PartitionFiles) -> Result<(TermDictionary, u64)> {
    let dictionary = TermDictionary::load(&partition.dictionary)?;
    let blob_len = std::fs::metadata(&partition.blob)
        .map_err(|e| Error::io_at(&partition.blob, e))?
        .len();
    dictionary.validate_against_blob(blob_len, &partition.dictionary)?;
    Ok((dictionary, blob_len))
}

/// Buffered reader over one partition blob.
///
/// Dictionaries are written in blob order and the merge walks terms in the
/// same order, so most copies continue exactly where the last one ended and
/// need no seek.
struct BlobCursor {
    path: PathBuf,
    reader: BufReader<File>,
    position: u64,
}

impl BlobCursor {
    fn open(partition: &PartitionFiles) -> Result<Self> {
        let file = File::open(&partition.blob).map_err(|e| Error::io_at(&partition.blob, e))?;
        Ok(BlobCursor {
            path: partition.blob.clone(),
            reader: BufReader::new(file),
            position: 0,
        })
    }

    /// Append exactly `entry.length` bytes starting at `entry.offset`.
    fn copy_range(&mut self, entry: &DictEntry, out: &mut AtomicFile) -> Result<()> {
        let offset = entry.offset as u64;
        if offset != self.position {
            self.reader
                .seek(SeekFrom::Start(offset))
                .map_err(|e| Error::io_at(&self.path, e))?;
            self.position = offset;
        }

        let wanted = entry.length as u64;
        let copied = io::copy(&mut (&mut self.reader).take(wanted), out)
            .map_err(|e| Error::io_at(&self.path, e))?;
        self.position += copied;
        if copied != wanted {
            return Err(Error::format(
                &self.path,
                format!(
                    "term {} needs {} bytes at offset {}, blob ended after {}",
                    entry.term_id, wanted, offset, copied
                ),
            ));
        }
        Ok(())
    }
}
