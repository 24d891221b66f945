//! Row-count bounding.

use std::num::NonZeroU32;
use std::sync::OnceLock;

use regex::Regex;

fn limit_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?i)\blimit\s+\d+").expect("limit regex should compile"))
}

/// Appends a `LIMIT` to statements that carry none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBound {
    cap: NonZeroU32,
}

impl RowBound {
    /// Create a bound with the given row cap.
    #[must_use]
    pub const fn new(cap: NonZeroU32) -> Self {
        Self { cap }
    }

    /// The configured row cap.
    #[must_use]
    pub const fn cap(&self) -> NonZeroU32 {
        self.cap
    }

    /// Whether the statement already contains `LIMIT <digits>` anywhere.
    ///
    /// A `LIMIT` in a subquery counts, so the outer statement stays unbounded
    /// in that case.
    #[must_use]
    pub fn has_limit(statement: &str) -> bool {
        limit_regex().is_match(statement)
    }

    /// Append ` LIMIT <cap>` unless a numeric `LIMIT` is already present.
    ///
    /// An existing limit is kept even when it exceeds the cap. Applying this
    /// twice gives the same result as applying it once.
    #[must_use]
    pub fn enforce_limit(&self, statement: &str) -> String {
        if Self::has_limit(statement) {
            statement.to_string()
        } else {
            format!("{statement} LIMIT {}", self.cap)
        }
    }
}

impl Default for RowBound {
    fn default() -> Self {
        Self::new(crate::DEFAULT_ROW_CAP)
    }
}
