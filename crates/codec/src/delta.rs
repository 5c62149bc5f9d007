//! Delta and prefix-sum helpers shared by the codecs.

use quarry_core::{CodecError, DocId};

/// Successive differences of a carry-prefixed list.
///
/// `docs[0]` is the base and produces no output; the result has
/// `docs.len() - 1` entries.
pub fn deltas(docs: &[DocId]) -> Result<Vec<u64>, CodecError> {
    let (&base, rest) = docs.split_first().ok_or(CodecError::EmptySequence)?;
    let mut out = Vec::with_capacity(rest.len());
    let mut last = base;
    for (i, &doc) in rest.iter().enumerate() {
        if doc < last {
            return Err(CodecError::NotAscending {
                position: i + 1,
                previous: last,
                current: doc,
            });
        }
        out.push(doc - last);
        last = doc;
    }
    Ok(out)
}

/// Running sums of `deltas`, starting from base 0.
///
/// Overflowing `u64` means the input was not produced by [`deltas`].
pub fn prefix_sums(deltas: &[u64], scheme: &str, data_len: usize) -> Result<Vec<DocId>, CodecError> {
    let mut out = Vec::with_capacity(deltas.len());
    let mut acc: DocId = 0;
    for &delta in deltas {
        acc = acc
            .checked_add(delta)
            .ok_or_else(|| CodecError::decode("doc id overflows u64", scheme, data_len))?;
        out.push(acc);
    }
    Ok(out)
}
