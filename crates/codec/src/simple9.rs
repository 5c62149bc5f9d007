//! Simple-9 word packing.
//!
//! Each 32-bit little-endian word carries a 4-bit selector in its high
//! nibble and 28 payload bits split into equal slots:
//!
//! ```text
//! selector  slots x bits
//!    0        28 x 1
//!    1        14 x 2
//!    2         9 x 3
//!    3         7 x 4
//!    4         5 x 5
//!    5         4 x 7
//!    6         3 x 9
//!    7         2 x 14
//!    8         1 x 28
//! ```
//!
//! Values occupy slots from the low bits upward. The encoder only picks a
//! mode when at least that many values remain, so every slot holds a real
//! value and no word is padded. That keeps chunks concatenation-safe.

use byteorder::{ByteOrder, LittleEndian};
use quarry_core::{CodecError, DocId, PostingCodec};

use crate::delta;

const SCHEME: &str = "simple9";

/// (slots, bits per slot), indexed by selector
const MODES: [(usize, u32); 9] = [
    (28, 1),
    (14, 2),
    (9, 3),
    (7, 4),
    (5, 5),
    (4, 7),
    (3, 9),
    (2, 14),
    (1, 28),
];

/// Largest delta a single Simple-9 slot can hold.
pub const SIMPLE9_MAX_VALUE: u64 = (1 << 28) - 1;

/// Simple-9 codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Simple9Codec;

impl Simple9Codec {
    /// Pick the densest mode that fits the values starting at `values[0]`.
    fn select(values: &[u64]) -> Option<(usize, usize, u32)> {
        MODES
            .iter()
            .enumerate()
            .find(|&(_, &(slots, bits))| {
                slots <= values.len() && values[..slots].iter().all(|&v| v < (1u64 << bits))
            })
            .map(|(selector, &(slots, bits))| (selector, slots, bits))
    }
}

impl PostingCodec for Simple9Codec {
    fn encode(&self, docs: &[DocId]) -> Result<Vec<u8>, CodecError> {
        let deltas = delta::deltas(docs)?;
        if let Some(&value) = deltas.iter().find(|&&d| d > SIMPLE9_MAX_VALUE) {
            return Err(CodecError::ValueOutOfRange {
                value,
                max: SIMPLE9_MAX_VALUE,
                scheme: SCHEME.to_string(),
            });
        }

        let mut out = Vec::with_capacity(deltas.len() * 2);
        let mut word_buf = [0u8; 4];
        let mut pos = 0;
        while pos < deltas.len() {
            let (selector, slots, bits) =
                Self::select(&deltas[pos..]).ok_or_else(|| CodecError::ValueOutOfRange {
                    value: deltas[pos],
                    max: SIMPLE9_MAX_VALUE,
                    scheme: SCHEME.to_string(),
                })?;

            let mut word = (selector as u32) << 28;
            for (slot, &value) in deltas[pos..pos + slots].iter().enumerate() {
                word |= (value as u32) << (slot as u32 * bits);
            }
            LittleEndian::write_u32(&mut word_buf, word);
            out.extend_from_slice(&word_buf);
            pos += slots;
        }
        Ok(out)
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<DocId>, CodecError> {
        if data.len() % 4 != 0 {
            return Err(CodecError::decode(
                "length is not a multiple of the 4-byte word size",
                SCHEME,
                data.len(),
            ));
        }

        let mut deltas = Vec::with_capacity(data.len() / 2);
        for chunk in data.chunks_exact(4) {
            let word = LittleEndian::read_u32(chunk);
            let selector = (word >> 28) as usize;
            let &(slots, bits) = MODES.get(selector).ok_or_else(|| {
                CodecError::decode(format!("invalid selector {}", selector), SCHEME, data.len())
            })?;
            let mask = (1u32 << bits) - 1;
            for slot in 0..slots {
                deltas.push(((word >> (slot as u32 * bits)) & mask) as u64);
            }
        }
        delta::prefix_sums(&deltas, SCHEME, data.len())
    }

    fn scheme(&self) -> &str {
        SCHEME
    }
}
