//! Posting list codecs.
//!
//! Every posting list chunk in a partition blob is produced by one of these
//! codecs. A chunk holds only the deltas after its base (the term's carry),
//! so chunks of consecutive partitions concatenate into one valid stream.
//!
//! The scheme name is persisted once per build (`encoding.ini`); query-time
//! readers call [`get_codec`] with it.
//!
//! # Usage
//!
//! ```
//! use quarry_codec::get_codec;
//!
//! let codec = get_codec("simple9").unwrap();
//! let first = codec.encode(&[0, 3, 5]).unwrap();
//! let second = codec.encode(&[5, 9]).unwrap();
//!
//! let mut stream = first.clone();
//! stream.extend_from_slice(&second);
//! assert_eq!(codec.decode(&stream).unwrap(), vec![3, 5, 9]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod delta;
mod simple9;
mod varbyte;

pub use quarry_core::{CodecError, PostingCodec};
pub use simple9::{Simple9Codec, SIMPLE9_MAX_VALUE};
pub use varbyte::VarByteCodec;

/// Scheme used when a configuration does not name one.
pub const DEFAULT_SCHEME: &str = "simple9";

/// Every scheme [`get_codec`] recognizes.
pub const SUPPORTED_SCHEMES: &[&str] = &["simple9", "varbyte"];

/// Get a codec by its scheme name.
///
/// Returns the codec if recognized, or an error for unknown schemes.
///
/// # Known Codecs
///
/// - `"simple9"`: 28 payload bits per 32-bit word, 9 packing modes
/// - `"varbyte"`: LEB128, 7 payload bits per byte
pub fn get_codec(scheme: &str) -> Result<Box<dyn PostingCodec>, CodecError> {
    match scheme {
        "simple9" => Ok(Box::new(Simple9Codec)),
        "varbyte" => Ok(Box::new(VarByteCodec)),
        _ => Err(CodecError::UnknownScheme(scheme.to_string())),
    }
}

/// Check whether a scheme name is registered.
pub fn is_supported(scheme: &str) -> bool {
    SUPPORTED_SCHEMES.contains(&scheme)
}
