//! Election (filtering, ranking, limiting) and the top-level `filter` entry
//! point that ties the parser, patterns and incremental cache together.

use crate::cache::{CacheHit, IncrementalCache};
use crate::error::FilterError;
use crate::parser;
use crate::pattern::{Pattern, PatternKind};
use crate::term::{CompositeMatch, Term};
use tracing::trace;

/// Options accepted by [`filter`], mirroring §6.2.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Truncate the result after sorting/limiting.
    pub limit: Option<usize>,
    /// `None` always sorts; `Some(n) <= 0` never sorts; `Some(n) > 0` sorts
    /// only when the matched count is below `n`.
    pub sort_limit: Option<i64>,
    /// Reverse the final output, applied after sort and limit.
    pub reverse: bool,
    /// Downgrade a bad `@`-regex sub-pattern to a no-op instead of erroring.
    pub ignore_bad_patterns: bool,
    /// Consult and update the incremental cache when every sub-pattern is
    /// incremental (Fuzzy/Exact).
    pub incremental: bool,
    /// Reserved for callers wanting to emit diagnostics; the core itself
    /// only ever logs through `tracing`.
    pub debug: bool,
}

/// A parsed composite pattern, ready to be applied to terms.
pub struct Contest {
    patterns: Vec<Pattern>,
}

impl Contest {
    pub fn new(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }

    /// A `CompositeMatch` exists for `term` iff every sub-pattern matches,
    /// per §4.3.
    pub fn try_match(&self, term: &Term) -> Option<CompositeMatch> {
        let mut matches = Vec::with_capacity(self.patterns.len());
        for pattern in &self.patterns {
            matches.push(pattern.best_match(term.value())?);
        }
        Some(CompositeMatch::new(term.clone(), matches))
    }

    /// Filters `terms` down to those with a `CompositeMatch`, preserving
    /// `terms`' arrival order. Terms are unique by construction, so a `Vec`
    /// carries the same membership as a set while keeping the order
    /// `apply_options`' stable sort needs for §4.4's insertion-order
    /// tie-break.
    pub fn matched_over<'a>(&self, terms: impl IntoIterator<Item = &'a Term>) -> Vec<CompositeMatch> {
        terms.into_iter().filter_map(|t| self.try_match(t)).collect()
    }

    /// Applies the sort/limit/reverse policy of §4.4 to an already-filtered
    /// set of matches.
    pub fn apply_options(&self, mut matched: Vec<CompositeMatch>, options: &FilterOptions) -> Vec<CompositeMatch> {
        match options.sort_limit {
            None => matched.sort_by_key(CompositeMatch::rank),
            Some(sort_limit) if sort_limit <= 0 => {}
            Some(sort_limit) => {
                if (matched.len() as i64) < sort_limit {
                    matched.sort_by_key(CompositeMatch::rank);
                }
            }
        }
        if let Some(limit) = options.limit {
            matched.truncate(limit);
        }
        if options.reverse {
            matched.reverse();
        }
        matched
    }

    /// Filters, sorts, limits and reverses in one call, ignoring the
    /// incremental cache. Used by tests and by [`filter`] for the
    /// non-incremental path.
    pub fn elect<'a>(&self, terms: impl IntoIterator<Item = &'a Term>, options: &FilterOptions) -> Vec<CompositeMatch> {
        let matched = self.matched_over(terms);
        self.apply_options(matched, options)
    }

    /// Whether every sub-pattern is incremental (participates in the cache).
    /// An empty composite is vacuously "all incremental" by this predicate,
    /// but [`filter`] never engages the cache for an empty composite since
    /// there is nothing to shrink a prefix from.
    pub fn all_incremental(&self) -> bool {
        self.patterns.iter().all(Pattern::incremental)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn class_key(&self) -> Vec<PatternKind> {
        self.patterns.iter().map(Pattern::kind).collect()
    }

    pub fn pattern_values(&self) -> Vec<String> {
        self.patterns.iter().map(|p| p.value().to_string()).collect()
    }
}

/// Parses `raw_pattern`, matches it against `terms`, and returns the ranked,
/// limited result (§6.2).
///
/// When `options.incremental` is set and every sub-pattern is incremental,
/// `cache` is consulted via the exhaust search (§4.5) before falling back to
/// a full scan over `terms`, and is updated with the freshly computed result
/// afterwards. The call is atomic with respect to the cache: a `BadRegex`
/// error leaves it untouched.
pub fn filter(
    terms: &[Term],
    raw_pattern: &str,
    options: &FilterOptions,
    mut cache: Option<&mut IncrementalCache>,
) -> Result<Vec<CompositeMatch>, FilterError> {
    let patterns = parser::parse(raw_pattern, options.ignore_bad_patterns).map_err(|source| {
        FilterError::BadRegex {
            pattern: raw_pattern.to_string(),
            source,
        }
    })?;
    let contest = Contest::new(patterns);

    if contest.is_empty() {
        return Ok(contest.elect(terms.iter(), options));
    }

    let use_cache = options.incremental && contest.all_incremental();
    if !use_cache {
        return Ok(contest.elect(terms.iter(), options));
    }

    let class_key = contest.class_key();
    let values = contest.pattern_values();
    let hit = cache.as_deref().and_then(|c| c.lookup(&class_key, &values));

    let matched: Vec<CompositeMatch> = match hit {
        Some(CacheHit::Exact(set)) => {
            trace!(pattern = raw_pattern, "incremental cache exact hit");
            set.iter().cloned().collect()
        }
        Some(CacheHit::Superset(set)) => {
            trace!(pattern = raw_pattern, superset_size = set.len(), "incremental cache superset hit");
            let rematched = contest.matched_over(set.iter().map(|cm| &cm.term));
            if let Some(cache) = cache.as_deref_mut() {
                cache.store(class_key, values, rematched.clone());
            }
            rematched
        }
        None => {
            trace!(pattern = raw_pattern, "incremental cache miss, full scan");
            let rematched = contest.matched_over(terms.iter());
            if let Some(cache) = cache.as_deref_mut() {
                cache.store(class_key, values, rematched.clone());
            }
            rematched
        }
    };

    Ok(contest.apply_options(matched, options))
}
