//! On-disk byte formats for partitions and the merged index.
//!
//! # Module Structure
//!
//! - `dictionary`: term dictionary (`.dct` / `terms_dict`) records
//! - `paths`: index directory layout and partition discovery
//!
//! Blobs (`.idx` / `entire_index`) have no structure of their own: they are
//! the concatenated codec chunks addressed by a dictionary.

pub mod dictionary;
pub mod paths;

pub use dictionary::{DictEntry, TermDictionary, DICT_HEADER_SIZE, DICT_RECORD_SIZE};
pub use paths::{
    check_contiguous, parse_partition_id, partition_name, IndexPaths, PartitionFiles, BLOB_EXTENSION,
    CODEC_SCHEME_FILE, CONFIG_FILE_NAME, DICT_EXTENSION, MERGED_BLOB, MERGED_DICTIONARY,
    PARTITION_PREFIX, URL_LIST_FILE,
};
