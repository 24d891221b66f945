//! Error hierarchy for tenant-gate.
//!
//! Every gate failure is a single [`RejectedQuery`] type. Callers classify it
//! through the `is_xxx()` predicates; the `Display` output is the reason that
//! goes back to the model so it can reformulate the query.

use thiserror::Error;

/// Result alias for gate operations.
pub type Result<T> = std::result::Result<T, RejectedQuery>;

/// A query the gate refused to prepare.
///
/// None of these are retryable by the gate. A retry means the caller (usually
/// the model) writes a different query.
///
/// # Example
///
/// ```rust
/// use tenant_gate::QueryGate;
///
/// let err = QueryGate::default().prepare("SELECT * FROM videos", "t-1").unwrap_err();
/// assert!(err.is_missing_tenant_placeholder());
/// assert_eq!(err.kind_name(), "missing_tenant_placeholder");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct RejectedQuery {
    kind: ErrorKind,
}

/// Internal rejection classification.
///
/// Kept `pub(crate)` so variants can be added without breaking callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub(crate) enum ErrorKind {
    #[error("empty query")]
    EmptyQuery,

    #[error("only SELECT statements allowed")]
    NotSelect,

    #[error("only read-only queries are permitted (prohibited keyword `{keyword}`)")]
    ProhibitedKeyword { keyword: &'static str },

    #[error("nested SELECT statements are not allowed")]
    NestedSelect,

    #[error(
        "queries touching tenant-scoped tables must include the {{{{{placeholder}}}}} placeholder"
    )]
    MissingTenantPlaceholder { placeholder: String },
}

impl RejectedQuery {
    // ═══════════════════════════════════════════════════════════════════════
    // Constructors
    // ═══════════════════════════════════════════════════════════════════════

    /// Query was empty or whitespace after trimming.
    #[must_use]
    pub const fn empty_query() -> Self {
        Self {
            kind: ErrorKind::EmptyQuery,
        }
    }

    /// Query does not start with `SELECT`.
    #[must_use]
    pub const fn not_select() -> Self {
        Self {
            kind: ErrorKind::NotSelect,
        }
    }

    /// Query contains a mutating keyword.
    #[must_use]
    pub const fn prohibited_keyword(keyword: &'static str) -> Self {
        Self {
            kind: ErrorKind::ProhibitedKeyword { keyword },
        }
    }

    /// Query matches the `) select` nesting pattern.
    #[must_use]
    pub const fn nested_select() -> Self {
        Self {
            kind: ErrorKind::NestedSelect,
        }
    }

    /// Query touches a tenant-scoped table without the tenant placeholder.
    #[must_use]
    pub fn missing_tenant_placeholder(placeholder: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::MissingTenantPlaceholder {
                placeholder: placeholder.into(),
            },
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Predicates
    // ═══════════════════════════════════════════════════════════════════════

    /// Returns true for an empty or whitespace-only query.
    #[must_use]
    pub const fn is_empty_query(&self) -> bool {
        matches!(self.kind, ErrorKind::EmptyQuery)
    }

    /// Returns true when the statement is not a `SELECT`.
    #[must_use]
    pub const fn is_not_select(&self) -> bool {
        matches!(self.kind, ErrorKind::NotSelect)
    }

    /// Returns true when a prohibited keyword was found.
    #[must_use]
    pub const fn is_prohibited_keyword(&self) -> bool {
        matches!(self.kind, ErrorKind::ProhibitedKeyword { .. })
    }

    /// Returns true for the nested `SELECT` heuristic.
    #[must_use]
    pub const fn is_nested_select(&self) -> bool {
        matches!(self.kind, ErrorKind::NestedSelect)
    }

    /// Returns true when the tenant placeholder was required but absent.
    #[must_use]
    pub const fn is_missing_tenant_placeholder(&self) -> bool {
        matches!(self.kind, ErrorKind::MissingTenantPlaceholder { .. })
    }

    /// The offending keyword, for prohibited-keyword rejections.
    #[must_use]
    pub const fn keyword(&self) -> Option<&'static str> {
        match &self.kind {
            ErrorKind::ProhibitedKeyword { keyword } => Some(*keyword),
            _ => None,
        }
    }

    /// Stable `snake_case` name of the rejection kind, for logs and metrics labels.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match &self.kind {
            ErrorKind::EmptyQuery => "empty_query",
            ErrorKind::NotSelect => "not_select",
            ErrorKind::ProhibitedKeyword { .. } => "prohibited_keyword",
            ErrorKind::NestedSelect => "nested_select",
            ErrorKind::MissingTenantPlaceholder { .. } => "missing_tenant_placeholder",
        }
    }
}

/// Invalid gate policy, raised while building a [`crate::QueryGate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// Placeholder name is not a plain SQL identifier.
    #[error(
        "invalid tenant placeholder '{0}': must be 1-127 characters (a-z, A-Z, 0-9, _), not starting with a digit"
    )]
    InvalidPlaceholder(String),

    /// Tenant-scoped table name is not a plain SQL identifier.
    #[error(
        "invalid tenant-scoped table '{0}': must be 1-127 characters (a-z, A-Z, 0-9, _), not starting with a digit"
    )]
    InvalidTableName(String),

    /// Placeholder pattern failed to compile.
    #[error("failed to compile placeholder pattern: {0}")]
    Pattern(String),
}
