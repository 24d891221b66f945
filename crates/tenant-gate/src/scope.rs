//! Tenant-scope enforcement.
//!
//! A query that mentions a tenant-scoped table must carry the tenant
//! placeholder (`{{user_id}}` by default). The gate then binds every
//! placeholder to the caller's tenant, either inline as a quoted literal or as
//! a positional driver parameter.

use regex::Regex;

use crate::error::{PolicyError, RejectedQuery, Result};
use crate::policy::GatePolicy;

/// Positional parameter marker understood by the HANA driver.
pub const PARAMETER_MARKER: &str = "?";

/// Detects tenant-scoped table references and binds the tenant placeholder.
#[derive(Debug, Clone)]
pub struct TenantScope {
    tables: Vec<String>,
    placeholder: String,
    pattern: Regex,
}

impl TenantScope {
    /// Build the scope enforcer for a policy.
    pub fn new(policy: &GatePolicy) -> std::result::Result<Self, PolicyError> {
        let pattern = Regex::new(&format!(
            r"(?i)\{{\{{\s*{}\s*\}}\}}",
            regex::escape(policy.placeholder())
        ))
        .map_err(|e| PolicyError::Pattern(e.to_string()))?;

        Ok(Self {
            tables: policy.scoped_tables().to_vec(),
            placeholder: policy.placeholder().to_string(),
            pattern,
        })
    }

    /// Whether the query references any tenant-scoped table.
    ///
    /// Substring matching on the lowercased text: a table counts as referenced
    /// when its name is followed by anything other than an identifier
    /// character, which covers `FROM videos`, `videos.view_count`,
    /// `videos,` and a table name at the very end of the statement.
    pub fn requires_scope(&self, query: &str) -> bool {
        let lower = query.to_lowercase();
        self.tables
            .iter()
            .any(|table| references_table(&lower, table))
    }

    /// Whether the query contains at least one placeholder occurrence.
    pub fn has_placeholder(&self, query: &str) -> bool {
        self.pattern.is_match(query)
    }

    /// Substitute `'<tenant_id>'` for every placeholder occurrence.
    ///
    /// `tenant_id` comes from the session layer and is not escaped. Queries
    /// that touch no scoped table are returned unchanged.
    pub fn enforce_scope(&self, query: &str, tenant_id: &str) -> Result<String> {
        if !self.check(query)? {
            return Ok(query.to_string());
        }

        let literal = format!("'{tenant_id}'");
        Ok(self
            .pattern
            .replace_all(query, regex::NoExpand(&literal))
            .into_owned())
    }

    /// Replace every placeholder with a positional marker.
    ///
    /// Returns the rewritten text and the number of markers, one tenant
    /// parameter to bind per marker.
    pub fn parameterize(&self, query: &str) -> Result<(String, usize)> {
        if !self.check(query)? {
            return Ok((query.to_string(), 0));
        }

        let count = self.pattern.find_iter(query).count();
        let sql = self
            .pattern
            .replace_all(query, regex::NoExpand(PARAMETER_MARKER))
            .into_owned();
        Ok((sql, count))
    }

    /// `Ok(true)` when scoping applies, `Ok(false)` when the query only touches
    /// global tables.
    fn check(&self, query: &str) -> Result<bool> {
        if !self.requires_scope(query) {
            return Ok(false);
        }

        if !self.has_placeholder(query) {
            return Err(RejectedQuery::missing_tenant_placeholder(&self.placeholder));
        }

        Ok(true)
    }
}

fn references_table(lower: &str, table: &str) -> bool {
    lower.match_indices(table).any(|(pos, _)| {
        lower[pos + table.len()..]
            .chars()
            .next()
            .is_none_or(|c| !is_identifier_char(c))
    })
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '#'
}
