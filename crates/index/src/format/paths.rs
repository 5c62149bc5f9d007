//! Index directory structure
//!
//! A build writes everything into one flat directory:
//!
//! ```text
//! index/
//! ├── part000.dct      # Partition dictionaries and blobs,
//! ├── part000.idx      # deleted once merged
//! ├── part001.dct
//! ├── part001.idx
//! ├── terms_dict       # Merged dictionary
//! ├── entire_index     # Merged blob
//! ├── encoding.ini     # Codec scheme name
//! ├── url_list         # One url per document, in doc id order
//! └── quarry.toml      # Optional configuration
//! ```
//!
//! Files being written live next to their final name as `.<name>.tmp`.

use std::path::{Path, PathBuf};

use quarry_core::{Error, PartitionId, Result};

/// Prefix of partition file names
pub const PARTITION_PREFIX: &str = "part";
/// Extension of dictionary files
pub const DICT_EXTENSION: &str = "dct";
/// Extension of blob files
pub const BLOB_EXTENSION: &str = "idx";
/// Merged dictionary file name
pub const MERGED_DICTIONARY: &str = "terms_dict";
/// Merged blob file name
pub const MERGED_BLOB: &str = "entire_index";
/// Codec scheme sidecar
pub const CODEC_SCHEME_FILE: &str = "encoding.ini";
/// Url list sidecar
pub const URL_LIST_FILE: &str = "url_list";
/// Config file name placed in the index directory
pub const CONFIG_FILE_NAME: &str = "quarry.toml";

/// Base name of a partition (`part000`, `part001`, ..., `part1000`)
pub fn partition_name(id: PartitionId) -> String {
    format!("{}{:03}", PARTITION_PREFIX, id)
}

/// Parse the partition id out of a dictionary file name.
///
/// Accepts `part<digits>.dct` only.
pub fn parse_partition_id(file_name: &str) -> Option<PartitionId> {
    let stem = file_name
        .strip_suffix(DICT_EXTENSION)?
        .strip_suffix('.')?
        .strip_prefix(PARTITION_PREFIX)?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

/// Dictionary and blob of one partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionFiles {
    /// Partition number
    pub id: PartitionId,
    /// `.dct` path
    pub dictionary: PathBuf,
    /// `.idx` path
    pub blob: PathBuf,
}

/// Index directory paths
#[derive(Debug, Clone)]
pub struct IndexPaths {
    root: PathBuf,
}

impl IndexPaths {
    /// Create paths from root directory
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        IndexPaths {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the index directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Dictionary path of partition `id`
    pub fn partition_dictionary(&self, id: PartitionId) -> PathBuf {
        self.root
            .join(format!("{}.{}", partition_name(id), DICT_EXTENSION))
    }

    /// Blob path of partition `id`
    pub fn partition_blob(&self, id: PartitionId) -> PathBuf {
        self.root
            .join(format!("{}.{}", partition_name(id), BLOB_EXTENSION))
    }

    /// Both files of partition `id`
    pub fn partition_files(&self, id: PartitionId) -> PartitionFiles {
        PartitionFiles {
            id,
            dictionary: self.partition_dictionary(id),
            blob: self.partition_blob(id),
        }
    }

    /// Merged dictionary path
    pub fn merged_dictionary(&self) -> PathBuf {
        self.root.join(MERGED_DICTIONARY)
    }

    /// Merged blob path
    pub fn merged_blob(&self) -> PathBuf {
        self.root.join(MERGED_BLOB)
    }

    /// Codec scheme sidecar path
    pub fn codec_scheme(&self) -> PathBuf {
        self.root.join(CODEC_SCHEME_FILE)
    }

    /// Url list sidecar path
    pub fn url_list(&self) -> PathBuf {
        self.root.join(URL_LIST_FILE)
    }

    /// Config file path
    pub fn config(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    /// Check if a merged index exists
    ///
    /// Both files must be present.
    pub fn has_merged_index(&self) -> bool {
        self.merged_dictionary().exists() && self.merged_blob().exists()
    }

    /// Create the index directory
    pub fn create_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| Error::io_at(&self.root, e))
    }

    /// Find every partition dictionary in the directory.
    ///
    /// Each `*.dct` must be named `part<digits>.dct` and have its `.idx`
    /// beside it. The ids, sorted, must be exactly `0..N`; a gap, a
    /// duplicate number (`part1.dct` next to `part001.dct`) or a foreign
    /// `.dct` name is an ordering violation, since merging such a set would
    /// silently corrupt every multi-partition posting list.
    ///
    /// A missing directory holds no partitions.
    pub fn discover_partitions(&self) -> Result<Vec<PartitionFiles>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        let entries = std::fs::read_dir(&self.root).map_err(|e| Error::io_at(&self.root, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::io_at(&self.root, e))?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') || !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(DICT_EXTENSION) {
                continue;
            }
            let id = parse_partition_id(&name).ok_or_else(|| {
                Error::ordering(format!(
                    "cannot place {} in partition order: expected {}<number>.{}",
                    name, PARTITION_PREFIX, DICT_EXTENSION
                ))
            })?;
            let blob = path.with_extension(BLOB_EXTENSION);
            found.push(PartitionFiles {
                id,
                dictionary: path,
                blob,
            });
        }

        found.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.dictionary.cmp(&b.dictionary)));
        check_contiguous(&found)?;

        if let Some(missing) = found.iter().find(|p| !p.blob.is_file()) {
            return Err(Error::format(
                &missing.dictionary,
                format!("blob {} is missing", missing.blob.display()),
            ));
        }
        Ok(found)
    }
}

/// Require partition ids to be exactly `0, 1, ..., N-1` in slice order.
pub fn check_contiguous(partitions: &[PartitionFiles]) -> Result<()> {
    for (expected, partition) in partitions.iter().enumerate() {
        if partition.id as usize != expected {
            return Err(Error::ordering(format!(
                "partitions must be numbered 0..{} in order, found {} at position {}",
                partitions.len(),
                partition_name(partition.id),
                expected
            )));
        }
    }
    Ok(())
}
