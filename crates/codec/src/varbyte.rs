//! Variable-byte (LEB128) codec.
//!
//! Seven payload bits per byte, low-order group first; the high bit marks
//! that another byte follows.

use quarry_core::{CodecError, DocId, PostingCodec};

use crate::delta;

const SCHEME: &str = "varbyte";

/// Encode a u64 as a variable-length integer (LEB128).
pub(crate) fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Decode a varint from a byte slice, returning (value, bytes_consumed).
pub(crate) fn decode_varint(data: &[u8]) -> Option<(u64, usize)> {
    let mut value: u64 = 0;
    let mut shift = 0;
    for (i, &byte) in data.iter().enumerate() {
        // The tenth byte may only carry the single remaining bit
        if shift >= 64 || (shift == 63 && byte & 0x7E != 0) {
            return None;
        }
        value |= ((byte & 0x7F) as u64) << shift;
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
        shift += 7;
    }
    None // truncated
}

/// LEB128 codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct VarByteCodec;

impl PostingCodec for VarByteCodec {
    fn encode(&self, docs: &[DocId]) -> Result<Vec<u8>, CodecError> {
        let deltas = delta::deltas(docs)?;
        let mut out = Vec::with_capacity(deltas.len());
        for value in deltas {
            encode_varint(value, &mut out);
        }
        Ok(out)
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<DocId>, CodecError> {
        let mut deltas = Vec::with_capacity(data.len());
        let mut pos = 0;
        while pos < data.len() {
            let (value, consumed) = decode_varint(&data[pos..]).ok_or_else(|| {
                CodecError::decode(
                    format!("truncated or overlong varint at byte {}", pos),
                    SCHEME,
                    data.len(),
                )
            })?;
            deltas.push(value);
            pos += consumed;
        }
        delta::prefix_sums(&deltas, SCHEME, data.len())
    }

    fn scheme(&self) -> &str {
        SCHEME
    }
}
