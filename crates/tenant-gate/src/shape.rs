//! Keyword and shape validation.
//!
//! Lexical checks that a statement is a single `SELECT` with no mutating
//! verbs. This is a coarse filter, not a parser: a prohibited keyword inside a
//! string literal still rejects the query.

use crate::error::{RejectedQuery, Result};
use crate::policy::PROHIBITED_KEYWORDS;

const SELECT: &str = "select";

/// Trim the query and strip trailing semicolons.
///
/// Only a blank query is empty. Any run of trailing `;` mixed with whitespace
/// is removed afterwards, so `";"` normalizes to `""` and fails the leading
/// `SELECT` check instead.
pub fn normalize(query: &str) -> Result<&str> {
    let mut statement = query.trim();
    if statement.is_empty() {
        return Err(RejectedQuery::empty_query());
    }

    while let Some(stripped) = statement.strip_suffix(';') {
        statement = stripped.trim_end();
    }

    Ok(statement)
}

/// Validate a normalized statement.
///
/// Checks, in order: leading `SELECT`, prohibited keywords, nested `SELECT`.
pub fn validate_shape(statement: &str) -> Result<()> {
    if !starts_with_select(statement) {
        return Err(RejectedQuery::not_select());
    }

    let lower = statement.to_lowercase();

    if let Some(keyword) = find_prohibited_keyword(&lower) {
        return Err(RejectedQuery::prohibited_keyword(keyword));
    }

    if is_nested_select(statement, &lower) {
        return Err(RejectedQuery::nested_select());
    }

    Ok(())
}

/// `SELECT` (any case) followed by whitespace.
fn starts_with_select(statement: &str) -> bool {
    statement
        .get(..SELECT.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(SELECT))
        && statement[SELECT.len()..]
            .chars()
            .next()
            .is_some_and(char::is_whitespace)
}

/// First prohibited keyword that appears followed by whitespace.
fn find_prohibited_keyword(lower: &str) -> Option<&'static str> {
    PROHIBITED_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| followed_by_whitespace(lower, keyword))
}

fn followed_by_whitespace(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(pos, _)| {
        haystack[pos + needle.len()..]
            .chars()
            .next()
            .is_some_and(char::is_whitespace)
    })
}

/// Narrow nesting heuristic: more than one `select` in any case, and the
/// literal lowercase sequence `) select`.
fn is_nested_select(statement: &str, lower: &str) -> bool {
    lower.matches(SELECT).count() > 1 && statement.contains(") select")
}
