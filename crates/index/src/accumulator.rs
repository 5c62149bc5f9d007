//! Posting accumulator
//!
//! In-memory per-term state for the partition window that is currently
//! open. Each term keeps:
//! - `carry`: the last doc id ever emitted for it ([`NO_DOC`] if never)
//! - `fresh`: doc ids seen since the last flush, ascending
//!
//! A flush ([`PostingAccumulator::snapshot_and_reset`]) hands out
//! `[carry, fresh...]` for every term with new activity and moves the last
//! fresh doc id into `carry`. Terms silent in a window are left out of the
//! snapshot but keep their carry, so the next chunk written for them is
//! delta-coded against the right base no matter how many partitions they
//! skipped.
//!
//! # Memory
//!
//! Silent terms hold only their carry (no heap allocation). Peak memory is
//! bounded by the postings of one window plus one carry per term ever seen.

use quarry_core::{DocId, Error, Result, TermId, NO_DOC};
use rustc_hash::FxHashMap;

/// Per-term accumulator state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingState {
    carry: DocId,
    fresh: Vec<DocId>,
}

impl PostingState {
    fn new() -> Self {
        PostingState {
            carry: NO_DOC,
            fresh: Vec::new(),
        }
    }

    /// Last doc id emitted for this term in a previous window
    pub fn carry(&self) -> DocId {
        self.carry
    }

    /// Doc ids seen in the open window
    pub fn fresh(&self) -> &[DocId] {
        &self.fresh
    }
}

/// One term's flushed posting list chunk.
///
/// `docs[0]` is the carry the chunk is delta-coded against; `docs[1..]` are
/// the doc ids first seen in this window. Always at least two entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermPostings {
    /// Term the chunk belongs to
    pub term_id: TermId,
    /// Carry followed by the window's doc ids
    pub docs: Vec<DocId>,
}

/// Accumulates postings for the open partition window.
///
/// Owned by the caller that drives the build and passed by `&mut` into the
/// partition writer; there is exactly one writer of this state.
#[derive(Debug, Default)]
pub struct PostingAccumulator {
    states: FxHashMap<TermId, PostingState>,
    last_doc: Option<DocId>,
    pending_postings: usize,
}

impl PostingAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `doc_id` contains every term in `term_ids`.
    ///
    /// Doc ids must be strictly increasing across calls; anything else is
    /// rejected before any state changes. A term listed twice for the same
    /// document is recorded once.
    ///
    /// Returns the number of distinct terms recorded for the document.
    pub fn observe<I>(&mut self, doc_id: DocId, term_ids: I) -> Result<usize>
    where
        I: IntoIterator<Item = TermId>,
    {
        if let Some(last) = self.last_doc {
            if doc_id <= last {
                return Err(Error::ordering(format!(
                    "doc id {} observed after doc id {}",
                    doc_id, last
                )));
            }
        }
        self.last_doc = Some(doc_id);

        let mut recorded = 0;
        for term_id in term_ids {
            let state = self.states.entry(term_id).or_insert_with(PostingState::new);
            if state.fresh.last() != Some(&doc_id) {
                state.fresh.push(doc_id);
                recorded += 1;
            }
        }
        self.pending_postings += recorded;
        Ok(recorded)
    }

    /// Take every term's window chunk and start a new window.
    ///
    /// Returns `[carry, fresh...]` for each term that gained at least one
    /// doc id since the last call, in ascending term id order. Every term,
    /// returned or not, keeps its last emitted doc id as the carry for the
    /// next window.
    pub fn snapshot_and_reset(&mut self) -> Vec<TermPostings> {
        let mut snapshot = Vec::new();
        for (&term_id, state) in self.states.iter_mut() {
            let Some(&last) = state.fresh.last() else {
                continue;
            };
            let fresh = std::mem::take(&mut state.fresh);
            let mut docs = Vec::with_capacity(fresh.len() + 1);
            docs.push(state.carry);
            docs.extend(fresh);
            state.carry = last;
            snapshot.push(TermPostings { term_id, docs });
        }
        snapshot.sort_unstable_by_key(|postings| postings.term_id);
        self.pending_postings = 0;
        snapshot
    }

    /// Number of distinct terms ever observed
    pub fn term_count(&self) -> usize {
        self.states.len()
    }

    /// Number of terms with doc ids in the open window
    pub fn active_terms(&self) -> usize {
        self.states.values().filter(|s| !s.fresh.is_empty()).count()
    }

    /// Number of (term, doc) postings in the open window
    pub fn pending_postings(&self) -> usize {
        self.pending_postings
    }

    /// Whether the open window holds any postings
    pub fn is_window_empty(&self) -> bool {
        self.pending_postings == 0
    }

    /// Last doc id observed, if any
    pub fn last_doc(&self) -> Option<DocId> {
        self.last_doc
    }

    /// State of a term, if it was ever observed
    pub fn state(&self, term_id: TermId) -> Option<&PostingState> {
        self.states.get(&term_id)
    }

    /// Carry of a term, if it was ever observed
    pub fn carry(&self, term_id: TermId) -> Option<DocId> {
        self.states.get(&term_id).map(|s| s.carry)
    }
}
