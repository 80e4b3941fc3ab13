//! Per-pattern match records and the streak/partition machinery built on top
//! of them.

use std::collections::BTreeSet;
use serde::Serialize;

/// The result of applying a single [`crate::Pattern`] to a single value.
///
/// `indices` are exact 0-based **char** offsets into the value (after smart
/// case folding, conceptually) that make up the matched window. An
/// `Unhighlighted` match — produced by inverse patterns, empty patterns, and
/// the no-op substitute for a bad regex — carries `length` equal to the full
/// value length and an empty `indices` set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Match {
    pub length: usize,
    pub indices: BTreeSet<usize>,
}

impl Match {
    /// A match that highlights nothing: used by inverse patterns on success,
    /// by the empty pattern, and by a disabled bad-regex pattern.
    pub fn unhighlighted(value_char_len: usize) -> Self {
        Self {
            length: value_char_len,
            indices: BTreeSet::new(),
        }
    }
}

/// A maximal contiguous run of indices, represented as a half-open
/// `[start, end)` range.
pub type Span = (usize, usize);

/// View of a set of indices as an ascending sequence of maximal contiguous
/// spans. `Streaks(a) ∪ Streaks(b) = Streaks(a.indices ∪ b.indices)`: merging
/// is just a union of the underlying index sets followed by
/// re-segmentation, which is exactly what [`Streaks::merge`] does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Streaks {
    indices: BTreeSet<usize>,
}

impl Streaks {
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            indices: indices.into_iter().collect(),
        }
    }

    pub fn merge(&self, other: &Streaks) -> Streaks {
        Streaks {
            indices: self.indices.union(&other.indices).copied().collect(),
        }
    }

    /// The ascending, disjoint spans covering `indices`.
    pub fn spans(&self) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut iter = self.indices.iter().copied();
        let Some(first) = iter.next() else {
            return spans;
        };
        let (mut start, mut end) = (first, first + 1);
        for i in iter {
            if i == end {
                end = i + 1;
            } else {
                spans.push((start, end));
                start = i;
                end = i + 1;
            }
        }
        spans.push((start, end));
        spans
    }
}

/// A `{unmatched, matched}` segment used by renderers, per §4.3.
///
/// Concatenating `unmatched + matched` across partitions in order reproduces
/// the original value exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    pub unmatched: String,
    pub matched: String,
}

/// Splits `value` into partitions along `spans`, which must be ascending and
/// disjoint (as produced by [`Streaks::spans`]).
///
/// If `spans` is empty, a single unmatched partition holding the whole value
/// is emitted (even if `value` is empty, in which case the lone partition is
/// itself empty).
pub fn partition(value: &str, spans: &[Span]) -> Vec<Partition> {
    let chars: Vec<char> = value.chars().collect();
    let slice = |a: usize, b: usize| -> String { chars[a..b].iter().collect() };

    if spans.is_empty() {
        return vec![Partition {
            unmatched: value.to_string(),
            matched: String::new(),
        }];
    }

    let mut partitions = Vec::with_capacity(spans.len() + 1);
    let mut last_end = 0;
    for &(start, end) in spans {
        partitions.push(Partition {
            unmatched: slice(last_end, start),
            matched: slice(start, end),
        });
        last_end = end;
    }
    if last_end < chars.len() {
        partitions.push(Partition {
            unmatched: slice(last_end, chars.len()),
            matched: String::new(),
        });
    }
    partitions
}
