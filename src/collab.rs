//! Interfaces for collaborators named by the spec but implemented outside
//! this crate: persistent history and input completion.

/// Opaque session history, driven by a host-owned up/down key binding.
///
/// The core never implements or calls into a concrete store; hosts supply
/// their own (file-backed, in-memory, whatever) and use it alongside
/// [`crate::contest::filter`], not through it.
pub trait HistoryStore {
    /// Appends `entry` to the history, deduplicating and evicting the
    /// oldest entry if the store enforces a capacity bound.
    fn add(&mut self, entry: &str);
    /// The entry after `current` in the history, or `None` at the newest
    /// end.
    fn next(&mut self, current: &str) -> Option<String>;
    /// The entry before `current` in the history, or `None` at the oldest
    /// end.
    fn prev(&mut self, current: &str) -> Option<String>;
}

/// The longest string every candidate in `candidates` begins with.
///
/// Callers are expected to have already restricted `candidates` to terms
/// whose value starts with the user's current input (§6.4); this function
/// only computes the shared prefix. Returns `None` for an empty iterator,
/// and `Some("")` if the candidates share no common prefix.
pub fn longest_common_prefix<'a>(candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut iter = candidates.into_iter();
    let first = iter.next()?;
    let mut prefix: Vec<char> = first.chars().collect();

    for candidate in iter {
        let common = prefix
            .iter()
            .zip(candidate.chars())
            .take_while(|(a, b)| **a == *b)
            .count();
        prefix.truncate(common);
        if prefix.is_empty() {
            break;
        }
    }

    Some(prefix.into_iter().collect())
}

/// Separator-bounded completion: each candidate is first truncated to end
/// just after its first occurrence of `separator` at or after character
/// index `from`, and candidates with no such occurrence are dropped; the
/// longest common prefix of the truncated set is then returned.
///
/// Useful for path-like values where completion should stop at the next
/// `/` rather than racing to the end of the longest shared filename.
pub fn longest_common_prefix_until<'a>(
    candidates: impl IntoIterator<Item = &'a str>,
    from: usize,
    separator: char,
) -> Option<String> {
    let truncated: Vec<String> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let chars: Vec<char> = candidate.chars().collect();
            if from >= chars.len() {
                return None;
            }
            chars[from..]
                .iter()
                .position(|&c| c == separator)
                .map(|rel| chars[..from + rel + 1].iter().collect())
        })
        .collect();

    longest_common_prefix(truncated.iter().map(String::as_str))
}
