//! Tokenizes a raw, space-separated pattern string into [`Pattern`]s.

use crate::pattern::Pattern;

/// Splits `raw` into sub-pattern tokens and resolves each to a typed
/// [`Pattern`] by its prefix.
///
/// Sub-patterns are separated by single unescaped spaces. A `\` escapes the
/// character that follows it (so `\ ` is a literal space that does not
/// separate patterns, and `\\` is a literal backslash); escapes are resolved
/// strictly left to right, one character at a time, which is what makes
/// `\\ ` (an escaped backslash followed by a real separator) behave
/// differently from `\\\ ` (an escaped backslash followed by an escaped
/// space). Leading whitespace is trimmed; empty sub-patterns (e.g. from
/// doubled spaces) are discarded.
///
/// `ignore_bad_patterns` controls what happens when a `@`-prefixed token
/// fails to compile as a regex: propagate the [`regex::Error`] or fall back
/// to a no-op pattern, per §7.
pub fn parse(raw: &str, ignore_bad_patterns: bool) -> Result<Vec<Pattern>, regex::Error> {
    tokenize(raw)
        .into_iter()
        .map(|token| make_pattern(&token, ignore_bad_patterns))
        .collect()
}

fn tokenize(raw: &str) -> Vec<String> {
    let trimmed = raw.trim_start();

    // Fast path: no escapes and no separators means the whole string is one
    // pattern, skipping the char-by-char walk entirely.
    if !trimmed.contains(' ') && !trimmed.contains('\\') {
        return if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![trimmed.to_string()]
        };
    }

    let mut tokens = vec![String::new()];
    let mut chars = trimmed.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars.next().unwrap_or('\\');
                tokens.last_mut().unwrap().push(escaped);
            }
            ' ' => tokens.push(String::new()),
            other => tokens.last_mut().unwrap().push(other),
        }
    }
    tokens.retain(|t| !t.is_empty());
    tokens
}

fn make_pattern(token: &str, ignore_bad_patterns: bool) -> Result<Pattern, regex::Error> {
    if let Some(rest) = token.strip_prefix("!=") {
        Ok(Pattern::inverse_exact(rest))
    } else if let Some(rest) = token.strip_prefix('!') {
        Ok(Pattern::inverse_fuzzy(rest))
    } else if let Some(rest) = token.strip_prefix('=') {
        Ok(Pattern::exact(rest))
    } else if let Some(rest) = token.strip_prefix('@') {
        Pattern::regex(rest, ignore_bad_patterns)
    } else {
        Ok(Pattern::fuzzy(token))
    }
}
