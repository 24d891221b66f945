//! Gate policy: the constants a deployment enforces against.

use std::num::NonZeroU32;

use crate::error::PolicyError;

/// Statement keywords that are never allowed, matched case-insensitively when
/// followed by whitespace. Not configurable.
pub const PROHIBITED_KEYWORDS: &[&str] = &[
    "insert", "update", "delete", "alter", "drop", "create", "replace", "truncate", "grant",
    "revoke", "comment", "copy", "attach", "vacuum",
];

/// Tables whose rows belong to a single tenant in the default deployment.
///
/// Must stay in sync with the schema manifest handed to the model.
pub const DEFAULT_SCOPED_TABLES: &[&str] = &["videos", "daily_metrics"];

/// Identifier inside the `{{...}}` tenant placeholder.
pub const DEFAULT_PLACEHOLDER: &str = "user_id";

/// Row cap appended to queries without a `LIMIT`.
pub const DEFAULT_ROW_CAP: NonZeroU32 = NonZeroU32::new(100).unwrap();

/// Maximum length for SQL identifiers (HANA limit is 127)
const MAX_IDENTIFIER_LENGTH: usize = 127;

/// Deployment-specific gate settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePolicy {
    scoped_tables: Vec<String>,
    placeholder: String,
    row_cap: NonZeroU32,
}

impl GatePolicy {
    /// Create a policy, validating table names and the placeholder identifier.
    ///
    /// Table names are stored lowercased; matching is case-insensitive.
    pub fn new<I, S>(
        scoped_tables: I,
        placeholder: impl Into<String>,
        row_cap: NonZeroU32,
    ) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let placeholder = placeholder.into();
        if !is_valid_identifier(&placeholder) {
            return Err(PolicyError::InvalidPlaceholder(placeholder));
        }

        let mut tables = Vec::new();
        for table in scoped_tables {
            let table = table.as_ref().trim();
            if !is_valid_identifier(table) {
                return Err(PolicyError::InvalidTableName(table.to_string()));
            }
            let table = table.to_lowercase();
            if !tables.contains(&table) {
                tables.push(table);
            }
        }

        Ok(Self {
            scoped_tables: tables,
            placeholder,
            row_cap,
        })
    }

    /// Lowercased tenant-scoped table names.
    #[must_use]
    pub fn scoped_tables(&self) -> &[String] {
        &self.scoped_tables
    }

    /// Placeholder identifier, without braces.
    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Placeholder as written in a query, e.g. `{{user_id}}`.
    #[must_use]
    pub fn placeholder_token(&self) -> String {
        format!("{{{{{}}}}}", self.placeholder)
    }

    /// Row cap applied when a query carries no `LIMIT`.
    #[must_use]
    pub const fn row_cap(&self) -> NonZeroU32 {
        self.row_cap
    }

    /// Whether `table` is tenant-scoped under this policy.
    #[must_use]
    pub fn is_scoped_table(&self, table: &str) -> bool {
        let table = table.to_lowercase();
        self.scoped_tables.iter().any(|t| *t == table)
    }
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            scoped_tables: DEFAULT_SCOPED_TABLES
                .iter()
                .map(|t| (*t).to_string())
                .collect(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            row_cap: DEFAULT_ROW_CAP,
        }
    }
}

/// Plain SQL identifier: ASCII letters, digits and `_`, not starting with a digit.
pub fn is_valid_identifier(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_IDENTIFIER_LENGTH {
        return false;
    }

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return false;
    }

    name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
