use thiserror::Error;

/// Errors that can abort a [`crate::filter`] call.
///
/// A `filter` call is atomic with respect to the incremental cache: if it
/// returns an error, the cache is left exactly as it was before the call.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A `@`-prefixed regex sub-pattern failed to compile.
    ///
    /// Only raised when `ignore_bad_patterns` is `false`; otherwise the
    /// offending sub-pattern is silently replaced by a no-op pattern that
    /// matches every value with an empty highlight.
    #[error("invalid regex pattern `{pattern}`: {source}")]
    BadRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
