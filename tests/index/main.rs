//! Partition build and merge integration tests
//!
//! Drives the accumulator, partition writer, merger and reader together
//! against on-disk index directories.

#[path = "../common/mod.rs"]
mod common;

mod build_pipeline;
mod codec_limits;
mod merge_paths;
mod ordering;
mod properties;
mod scenario;
