//! Incremental cache (§4.5): amortizes matching across keystrokes for
//! composites made entirely of incremental (Fuzzy/Exact) patterns.

use crate::pattern::PatternKind;
use crate::term::CompositeMatch;
use itertools::Itertools;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Bound on distinct value-tuples retained per pattern-variant class before
/// the oldest is evicted. Keeps a long session's memory bounded; eviction is
/// plain FIFO rather than true LRU since re-deriving an evicted entry only
/// costs one extra full scan, not correctness.
const MAX_CACHE_ENTRIES_PER_CLASS: usize = 64;

type ValueTuple = Vec<String>;

/// A cached result set. Conceptually a "frozen set" per §4.5 — terms are
/// unique by construction (a `CompositeMatch` derives from one `Term`, and a
/// composite is matched over a term list with no duplicates), but stored as
/// a `Vec` rather than a hash set so that the arrival order a `Contest`
/// scanned terms in (and, transitively, §4.4's insertion-order tie-break) is
/// preserved across a cache round-trip instead of being scrambled by
/// `HashSet`'s unspecified iteration order.
type CachedSet = Arc<Vec<CompositeMatch>>;

#[derive(Default)]
struct PatternTypeCache {
    entries: HashMap<ValueTuple, CachedSet>,
    insertion_order: VecDeque<ValueTuple>,
}

impl PatternTypeCache {
    fn insert(&mut self, key: ValueTuple, value: CachedSet) {
        if !self.entries.contains_key(&key) {
            self.insertion_order.push_back(key.clone());
            if self.insertion_order.len() > MAX_CACHE_ENTRIES_PER_CLASS {
                if let Some(oldest) = self.insertion_order.pop_front() {
                    self.entries.remove(&oldest);
                }
            }
        }
        self.entries.insert(key, value);
    }
}

/// The outcome of an exhaust-search lookup.
pub enum CacheHit {
    /// The exact requested tuple was cached; callers can use it as-is.
    Exact(CachedSet),
    /// A strict ancestor's result set was found; callers must re-filter it.
    Superset(CachedSet),
}

/// Session-scoped, two-level cache: pattern-variant-class tuple to
/// pattern-value tuple to a frozen set of prior matches.
///
/// Owned by the caller (a filter session), not by [`crate::contest::Contest`]
/// or any single `filter` call, so it can persist across keystrokes and be
/// cleared wholesale when a new candidate list is loaded.
#[derive(Default)]
pub struct IncrementalCache {
    classes: HashMap<Vec<PatternKind>, PatternTypeCache>,
}

impl IncrementalCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards every cached entry, e.g. when the candidate list changes.
    pub fn clear(&mut self) {
        self.classes.clear();
    }

    /// Looks up `values` (one string per pattern, in the composite's order)
    /// under `class`, trying the exact tuple first and then its ancestors
    /// by independently shrinking each coordinate, rightmost coordinate
    /// varying fastest, smallest cached result wins.
    pub fn lookup(&self, class: &[PatternKind], values: &[String]) -> Option<CacheHit> {
        let sub = self.classes.get(class)?;

        if let Some(exact) = sub.entries.get(values) {
            return Some(CacheHit::Exact(Arc::clone(exact)));
        }

        let prefix_lists: Vec<Vec<String>> = values.iter().map(|v| prefixes(v)).collect();
        if prefix_lists.iter().any(Vec::is_empty) {
            return None;
        }

        let mut best: Option<CachedSet> = None;
        let mut best_size = usize::MAX;
        for combo in prefix_lists.into_iter().multi_cartesian_product() {
            if combo.as_slice() == values {
                continue;
            }
            if let Some(set) = sub.entries.get(&combo) {
                if set.len() < best_size {
                    best_size = set.len();
                    best = Some(Arc::clone(set));
                }
            }
        }
        best.map(CacheHit::Superset)
    }

    /// Records `result` under the exact `(class, values)` tuple, preserving
    /// the arrival order `result` was computed in.
    pub fn store(&mut self, class: Vec<PatternKind>, values: ValueTuple, result: Vec<CompositeMatch>) {
        self.classes.entry(class).or_default().insert(values, Arc::new(result));
    }
}

/// `value`'s non-empty character prefixes, longest (most specific) first.
/// An empty value can't be shrunk below itself, so it yields just `[""]`.
fn prefixes(value: &str) -> Vec<String> {
    let chars: Vec<char> = value.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    (1..=chars.len()).rev().map(|n| chars[..n].iter().collect()).collect()
}
