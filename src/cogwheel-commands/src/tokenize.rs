//! Shell-style tokenization of input lines.

use thiserror::Error;

/// The input line could not be tokenized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line has unbalanced quoting or a trailing escape")]
pub struct TokenizeError;

/// Split a raw input line into whitespace-separated tokens, honoring
/// POSIX-style quoting and escapes.
///
/// `foo "bar baz" qux` yields `["foo", "bar baz", "qux"]`. An empty or
/// whitespace-only line yields an empty vector.
pub fn split_line(line: &str) -> Result<Vec<String>, TokenizeError> {
    shlex::split(line).ok_or(TokenizeError)
}
