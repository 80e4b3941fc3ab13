//! Input candidates and their composite match records.

use crate::match_::{partition, Match, Partition, Streaks};
use serde::Serialize;
use std::sync::Arc;

/// An indexed candidate entry.
///
/// `id` is assigned once at input time, starting at 1 in input order, and
/// never changes afterwards. Terms are built once per session and shared
/// (via `Arc`) by every [`CompositeMatch`] that references them, so they
/// stay cheap to clone into cached result sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term {
    pub id: u64,
    value: Arc<str>,
}

impl Term {
    pub fn new(id: u64, value: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A [`Term`] bound to the tuple of per-pattern matches that made it survive
/// a filter call, plus its rank.
///
/// Exists only when every pattern in the composite matched; see
/// [`crate::contest::Contest::try_match`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeMatch {
    pub term: Term,
    pub per_pattern_matches: Vec<Match>,
    rank: (usize, usize),
}

impl CompositeMatch {
    /// Builds the composite record from a term and its per-pattern matches,
    /// computing the rank `(Σ length, len(value))` per §4.3.
    pub fn new(term: Term, per_pattern_matches: Vec<Match>) -> Self {
        let sum_lengths: usize = per_pattern_matches.iter().map(|m| m.length).sum();
        let rank = (sum_lengths, term.value().chars().count());
        Self {
            term,
            per_pattern_matches,
            rank,
        }
    }

    pub fn rank(&self) -> (usize, usize) {
        self.rank
    }

    /// The union of every per-pattern match's indices, viewed as maximal
    /// contiguous spans.
    pub fn highlight_spans(&self) -> Vec<(usize, usize)> {
        let merged = self
            .per_pattern_matches
            .iter()
            .fold(Streaks::new([]), |acc, m| acc.merge(&Streaks::new(m.indices.iter().copied())));
        merged.spans()
    }

    pub fn partitions(&self) -> Vec<Partition> {
        partition(self.term.value(), &self.highlight_spans())
    }

    /// The rendering record shape from §6.3.
    pub fn to_record(&self) -> CompositeMatchRecord {
        CompositeMatchRecord {
            id: self.term.id,
            value: self.term.value().to_string(),
            rank: [self.rank.0, self.rank.1],
            partitions: self.partitions(),
        }
    }
}

/// The rendering record consumed by UI collaborators (§6.3): a flattened,
/// serializable view of a [`CompositeMatch`] that doesn't expose internal
/// per-pattern `Match` details.
#[derive(Debug, Clone, Serialize)]
pub struct CompositeMatchRecord {
    pub id: u64,
    pub value: String,
    pub rank: [usize; 2],
    pub partitions: Vec<Partition>,
}
