//! Typed sub-patterns and their `best_match` semantics (§4.2).

use crate::match_::Match;
use regex::RegexBuilder;
use std::collections::BTreeSet;
use tracing::trace;

/// Which of the five sub-pattern families a [`Pattern`] belongs to.
///
/// Besides identifying matching semantics, `PatternKind` is the outer key of
/// the incremental cache (§4.5): a composite's cache bucket is the ordered
/// tuple of its patterns' kinds, so `[Fuzzy, Exact]` and `[Exact, Fuzzy]` are
/// distinct classes even though they contain the same two kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PatternKind {
    Fuzzy,
    InverseFuzzy,
    Exact,
    InverseExact,
    Regex,
}

impl PatternKind {
    /// Whether extending this pattern's value (typing another character)
    /// can only shrink the set of matched values, never grow it.
    ///
    /// `Fuzzy` and `Exact` have this property and participate in the
    /// incremental cache; the inverse variants and `Regex` do not — relaxing
    /// an inverse pattern or an arbitrary regex can add candidates back in,
    /// so caching a prior (shorter) result would be unsound.
    pub fn incremental(self) -> bool {
        matches!(self, PatternKind::Fuzzy | PatternKind::Exact)
    }
}

/// A smart-cased pattern value shared by `Fuzzy`, `InverseFuzzy`, `Exact` and
/// `InverseExact`.
///
/// If the raw sub-pattern is all-lowercase, matching is case-insensitive and
/// `chars`/`value` hold the lowercased form; otherwise matching is
/// case-sensitive and the original text is kept untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CaseFolded {
    value: String,
    chars: Vec<char>,
    ignore_case: bool,
}

impl CaseFolded {
    fn new(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        let ignore_case = lowered == raw;
        let value = if ignore_case { lowered } else { raw.to_string() };
        let chars = value.chars().collect();
        Self {
            value,
            chars,
            ignore_case,
        }
    }

    fn len_chars(&self) -> usize {
        self.chars.len()
    }

    /// The candidate's chars, folded to match this pattern's case mode.
    fn candidate_chars(&self, value: &str) -> Vec<char> {
        if self.ignore_case {
            value.to_lowercase().chars().collect()
        } else {
            value.chars().collect()
        }
    }
}

/// One typed sub-pattern, dispatched from [`crate::parser::parse`].
#[derive(Debug, Clone)]
pub enum Pattern {
    Fuzzy(CaseFolded),
    InverseFuzzy(CaseFolded),
    Exact(CaseFolded),
    InverseExact(CaseFolded),
    Regex(RegexPattern),
}

/// A compiled (or, if empty or bad-and-ignored, inert) regex sub-pattern.
#[derive(Debug, Clone)]
pub struct RegexPattern {
    raw: String,
    state: RegexState,
}

/// The empty pattern and a disabled bad regex both skip the `regex` crate
/// entirely, but they rank differently (§3 vs §7), so they're kept as
/// distinct states rather than collapsed into one "no compiled regex" case.
#[derive(Debug, Clone)]
enum RegexState {
    Compiled(regex::Regex),
    /// An empty `@`-pattern: matches everything, Unhighlighted, full
    /// `len(value)` rank contribution, per §3's "empty pattern" rule.
    Empty,
    /// A bad regex downgraded via `ignore_bad_patterns`: matches everything
    /// but contributes zero to the rank sum, per §7.
    Disabled,
}

impl Pattern {
    pub fn kind(&self) -> PatternKind {
        match self {
            Pattern::Fuzzy(_) => PatternKind::Fuzzy,
            Pattern::InverseFuzzy(_) => PatternKind::InverseFuzzy,
            Pattern::Exact(_) => PatternKind::Exact,
            Pattern::InverseExact(_) => PatternKind::InverseExact,
            Pattern::Regex(_) => PatternKind::Regex,
        }
    }

    pub fn incremental(&self) -> bool {
        self.kind().incremental()
    }

    /// The stored (possibly case-folded) pattern value, used as the
    /// incremental cache's inner key coordinate.
    pub fn value(&self) -> &str {
        match self {
            Pattern::Fuzzy(c) | Pattern::InverseFuzzy(c) | Pattern::Exact(c) | Pattern::InverseExact(c) => {
                &c.value
            }
            Pattern::Regex(r) => &r.raw,
        }
    }

    pub(crate) fn fuzzy(raw: &str) -> Self {
        Pattern::Fuzzy(CaseFolded::new(raw))
    }

    pub(crate) fn inverse_fuzzy(raw: &str) -> Self {
        Pattern::InverseFuzzy(CaseFolded::new(raw))
    }

    pub(crate) fn exact(raw: &str) -> Self {
        Pattern::Exact(CaseFolded::new(raw))
    }

    pub(crate) fn inverse_exact(raw: &str) -> Self {
        Pattern::InverseExact(CaseFolded::new(raw))
    }

    /// Builds a `Regex` pattern. On compile failure, either disables the
    /// pattern (`ignore_bad_patterns`) or returns the `regex::Error` so the
    /// caller can surface [`crate::FilterError::BadRegex`].
    pub(crate) fn regex(raw: &str, ignore_bad_patterns: bool) -> Result<Self, regex::Error> {
        if raw.is_empty() {
            return Ok(Pattern::Regex(RegexPattern {
                raw: raw.to_string(),
                state: RegexState::Empty,
            }));
        }
        match RegexBuilder::new(raw).case_insensitive(true).unicode(true).build() {
            Ok(re) => Ok(Pattern::Regex(RegexPattern {
                raw: raw.to_string(),
                state: RegexState::Compiled(re),
            })),
            Err(err) if ignore_bad_patterns => {
                trace!(pattern = raw, error = %err, "disabling bad regex pattern");
                Ok(Pattern::Regex(RegexPattern {
                    raw: raw.to_string(),
                    state: RegexState::Disabled,
                }))
            }
            Err(err) => Err(err),
        }
    }

    /// Applies this pattern to a candidate value, per §4.2.
    ///
    /// Returns `None` when the pattern fails to match (or, for an inverse
    /// pattern, when the thing it's inverting *does* match).
    pub fn best_match(&self, value: &str) -> Option<Match> {
        match self {
            Pattern::Fuzzy(c) => fuzzy_best_match(c, value),
            Pattern::InverseFuzzy(c) => {
                if fuzzy_best_match(c, value).is_some() {
                    None
                } else {
                    Some(Match::unhighlighted(value.chars().count()))
                }
            }
            Pattern::Exact(c) => exact_best_match(c, value),
            Pattern::InverseExact(c) => {
                if exact_best_match(c, value).is_some() {
                    None
                } else {
                    Some(Match::unhighlighted(value.chars().count()))
                }
            }
            Pattern::Regex(r) => regex_best_match(r, value),
        }
    }
}

fn fuzzy_best_match(pattern: &CaseFolded, value: &str) -> Option<Match> {
    if pattern.len_chars() == 0 {
        return Some(Match::unhighlighted(value.chars().count()));
    }
    let candidate = pattern.candidate_chars(value);
    let pchars = &pattern.chars;
    let indices = shortest_fuzzy_span(&candidate, pchars)?;
    let length = indices[indices.len() - 1] - indices[0] + 1;
    Some(Match {
        length,
        indices: indices.into_iter().collect(),
    })
}

/// Finds the indices of the shortest window in `value` across which
/// `pattern` occurs as a (possibly non-contiguous) subsequence, per the
/// scanning algorithm recommended by §4.2: for every occurrence of the
/// pattern's first character, greedily consume the remaining characters in
/// order and track the minimum resulting span. Short-circuits as soon as a
/// span equal to the pattern's length is found, since no shorter span is
/// possible.
fn shortest_fuzzy_span(value: &[char], pattern: &[char]) -> Option<Vec<usize>> {
    debug_assert!(!pattern.is_empty());
    let mut best: Option<Vec<usize>> = None;
    let mut best_len = usize::MAX;

    for start in 0..value.len() {
        if value[start] != pattern[0] {
            continue;
        }
        let mut indices = Vec::with_capacity(pattern.len());
        indices.push(start);
        let mut cursor = start + 1;
        let mut complete = true;
        for &pc in &pattern[1..] {
            match value[cursor..].iter().position(|&c| c == pc) {
                Some(rel) => {
                    let idx = cursor + rel;
                    indices.push(idx);
                    cursor = idx + 1;
                }
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if !complete {
            continue;
        }
        let span = indices[indices.len() - 1] - start + 1;
        if span < best_len {
            best_len = span;
            let found_optimal = span == pattern.len();
            best = Some(indices);
            if found_optimal {
                return best;
            }
        }
    }
    best
}

fn exact_best_match(pattern: &CaseFolded, value: &str) -> Option<Match> {
    if pattern.len_chars() == 0 {
        return Some(Match::unhighlighted(value.chars().count()));
    }
    let candidate = pattern.candidate_chars(value);
    let pchars = &pattern.chars;
    let start = candidate
        .windows(pchars.len())
        .position(|window| window == pchars.as_slice())?;
    Some(Match {
        length: pchars.len(),
        indices: (start..start + pchars.len()).collect(),
    })
}

fn regex_best_match(pattern: &RegexPattern, value: &str) -> Option<Match> {
    let re = match &pattern.state {
        RegexState::Empty => return Some(Match::unhighlighted(value.chars().count())),
        // A disabled (bad-regex) pattern matches everything but, unlike the
        // inverse/empty "unhighlighted" case, contributes zero to the rank
        // sum rather than the full value length — it never should have been
        // able to discriminate or weigh in on ranking at all.
        RegexState::Disabled => {
            return Some(Match {
                length: 0,
                indices: BTreeSet::new(),
            })
        }
        RegexState::Compiled(re) => re,
    };
    let m = re.find(value)?;
    let char_start = value[..m.start()].chars().count();
    let char_end = char_start + value[m.start()..m.end()].chars().count();
    Some(Match {
        length: char_end - char_start,
        indices: (char_start..char_end).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(m: &Match) -> BTreeSet<usize> {
        m.indices.clone()
    }

    #[test]
    fn fuzzy_shortest_span_prefers_tighter_window() {
        let p = Pattern::fuzzy("fb");
        let m = p.best_match("foo/bar.txt").unwrap();
        // "f" at 0, "b" at 4 -> span length 5.
        assert_eq!(m.length, 5);
        assert_eq!(indices(&m), BTreeSet::from([0, 4]));
    }

    #[test]
    fn fuzzy_short_circuits_on_optimal_span() {
        let p = Pattern::fuzzy("ab");
        let m = p.best_match("xabxab").unwrap();
        assert_eq!(m.length, 2);
        assert_eq!(indices(&m), BTreeSet::from([1, 2]));
    }

    #[test]
    fn fuzzy_smart_case_sensitive_when_uppercase_present() {
        let p = Pattern::fuzzy("READ");
        assert!(p.best_match("README.md").is_some());
        assert!(p.best_match("readme.txt").is_none());
    }

    #[test]
    fn fuzzy_smart_case_insensitive_when_all_lowercase() {
        let p = Pattern::fuzzy("read");
        assert!(p.best_match("README.md").is_some());
    }

    #[test]
    fn fuzzy_empty_matches_everything_unhighlighted() {
        let p = Pattern::fuzzy("");
        let m = p.best_match("anything").unwrap();
        assert!(m.indices.is_empty());
        assert_eq!(m.length, "anything".chars().count());
    }

    #[test]
    fn exact_matches_first_occurrence() {
        let p = Pattern::exact("main");
        let m = p.best_match("main.rs").unwrap();
        assert_eq!(m.length, 4);
        assert_eq!(indices(&m), BTreeSet::from([0, 1, 2, 3]));
        assert!(p.best_match("util.rs").is_none());
    }

    #[test]
    fn inverse_fuzzy_matches_absence() {
        let p = Pattern::inverse_fuzzy("a");
        assert!(p.best_match("beta").is_none());
        let m = p.best_match("beto").unwrap();
        assert!(m.indices.is_empty());
        assert_eq!(m.length, 4);
    }

    #[test]
    fn inverse_exact_matches_absence() {
        let p = Pattern::inverse_exact("xyz");
        assert!(p.best_match("test").is_some());
        assert!(p.best_match("xyzzy").is_none());
    }

    #[test]
    fn regex_unanchored_search() {
        let p = Pattern::regex("[0-9]+", false).unwrap();
        let m = p.best_match("room42").unwrap();
        assert_eq!(m.length, 2);
        assert_eq!(indices(&m), BTreeSet::from([4, 5]));
    }

    #[test]
    fn regex_is_case_insensitive() {
        let p = Pattern::regex("readme", false).unwrap();
        assert!(p.best_match("README.md").is_some());
    }

    #[test]
    fn regex_bad_pattern_errors_by_default() {
        assert!(Pattern::regex("[", false).is_err());
    }

    #[test]
    fn regex_bad_pattern_disabled_when_ignored() {
        let p = Pattern::regex("[", true).unwrap();
        let m = p.best_match("anything").unwrap();
        assert!(m.indices.is_empty());
        assert_eq!(m.length, 0);
    }

    #[test]
    fn regex_empty_pattern_is_unhighlighted_full_length() {
        // An empty `@`-pattern is the §3 "empty pattern" case, not a
        // disabled bad regex: it ranks by the full value length, not zero.
        let p = Pattern::regex("", false).unwrap();
        let m = p.best_match("anything").unwrap();
        assert!(m.indices.is_empty());
        assert_eq!(m.length, "anything".chars().count());
    }

    #[test]
    fn pattern_kind_incremental_flags() {
        assert!(PatternKind::Fuzzy.incremental());
        assert!(PatternKind::Exact.incremental());
        assert!(!PatternKind::InverseFuzzy.incremental());
        assert!(!PatternKind::InverseExact.incremental());
        assert!(!PatternKind::Regex.incremental());
    }
}
