//! The composed gate: shape check, tenant scope, row bound.

use tracing::debug;

use crate::bound::RowBound;
use crate::error::{PolicyError, RejectedQuery, Result};
use crate::policy::GatePolicy;
use crate::scope::TenantScope;
use crate::shape::{normalize, validate_shape};

/// Statement ready for execution with its positional tenant parameters.
///
/// `params` holds one tenant id per `?` marker, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundQuery {
    sql: String,
    params: Vec<String>,
}

impl BoundQuery {
    /// Executable SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Positional parameters, in marker order.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Split into SQL text and parameters.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.sql, self.params)
    }
}

/// Turns an untrusted query plus a trusted tenant id into an executable
/// statement, or rejects it.
///
/// Stateless after construction and cheap to share across tasks.
#[derive(Debug, Clone)]
pub struct QueryGate {
    policy: GatePolicy,
    scope: TenantScope,
    bound: RowBound,
}

impl QueryGate {
    /// Build a gate for the given policy.
    pub fn new(policy: GatePolicy) -> std::result::Result<Self, PolicyError> {
        let scope = TenantScope::new(&policy)?;
        let bound = RowBound::new(policy.row_cap());
        Ok(Self {
            policy,
            scope,
            bound,
        })
    }

    /// Policy this gate enforces.
    #[must_use]
    pub const fn policy(&self) -> &GatePolicy {
        &self.policy
    }

    /// Validate, scope and bound a query, inlining the tenant id as a quoted
    /// literal.
    ///
    /// Rejections are reported in this order: empty, not a `SELECT`,
    /// prohibited keyword, nested `SELECT`, missing tenant placeholder.
    pub fn prepare(&self, raw_query: &str, tenant_id: &str) -> Result<String> {
        let statement = self.validate(raw_query)?;
        let scoped = self
            .scope
            .enforce_scope(statement, tenant_id)
            .inspect_err(log_rejection)?;
        Ok(self.bound.enforce_limit(&scoped))
    }

    /// Same checks as [`QueryGate::prepare`], but every placeholder becomes a
    /// `?` marker bound to `tenant_id` by the driver.
    pub fn prepare_bound(&self, raw_query: &str, tenant_id: &str) -> Result<BoundQuery> {
        let statement = self.validate(raw_query)?;
        let (scoped, markers) = self
            .scope
            .parameterize(statement)
            .inspect_err(log_rejection)?;

        Ok(BoundQuery {
            sql: self.bound.enforce_limit(&scoped),
            params: vec![tenant_id.to_string(); markers],
        })
    }

    fn validate<'a>(&self, raw_query: &'a str) -> Result<&'a str> {
        let statement = normalize(raw_query).inspect_err(log_rejection)?;
        validate_shape(statement).inspect_err(log_rejection)?;
        Ok(statement)
    }
}

impl Default for QueryGate {
    fn default() -> Self {
        let policy = GatePolicy::default();
        Self {
            scope: TenantScope::new(&policy).expect("default placeholder pattern should compile"),
            bound: RowBound::new(policy.row_cap()),
            policy,
        }
    }
}

fn log_rejection(err: &RejectedQuery) {
    debug!(reason = err.kind_name(), "Query rejected: {}", err);
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;

    const TENANT: &str = "abc-123";

    fn gate() -> QueryGate {
        QueryGate::default()
    }

    #[test]
    fn test_scoped_query_gets_tenant_and_limit() {
        let sql = gate()
            .prepare(
                "SELECT * FROM videos WHERE user_id = {{user_id}} ORDER BY view_count DESC",
                TENANT,
            )
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM videos WHERE user_id = 'abc-123' ORDER BY view_count DESC LIMIT 100"
        );
    }

    #[test]
    fn test_global_query_keeps_limit_and_strips_semicolon() {
        let sql = gate()
            .prepare(
                "select username from creators order by follower_count desc limit 5;",
                TENANT,
            )
            .unwrap();
        assert_eq!(
            sql,
            "select username from creators order by follower_count desc limit 5"
        );
    }

    #[test]
    fn test_scoped_table_without_placeholder_rejected() {
        let err = gate().prepare("SELECT * FROM videos", TENANT).unwrap_err();
        assert!(err.is_missing_tenant_placeholder());
        assert!(err.to_string().contains("{{user_id}}"));
    }

    #[test]
    fn test_mutation_rejected() {
        let err = gate()
            .prepare("DELETE FROM videos WHERE user_id = {{user_id}}", TENANT)
            .unwrap_err();
        assert!(err.is_not_select());
    }

    #[test]
    fn test_stacked_mutation_rejected() {
        let err = gate()
            .prepare("SELECT 1; DROP TABLE videos", TENANT)
            .unwrap_err();
        assert!(err.is_prohibited_keyword());
        assert_eq!(err.keyword(), Some("drop"));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(gate().prepare("", TENANT).unwrap_err().is_empty_query());
        assert!(gate().prepare("  \n\t", TENANT).unwrap_err().is_empty_query());
    }

    #[test]
    fn test_semicolons_only_rejected_as_not_select() {
        assert!(gate().prepare("  ;\n", TENANT).unwrap_err().is_not_select());
        assert!(gate().prepare(" ;; ", "t").unwrap_err().is_not_select());
    }

    #[test]
    fn test_global_query_with_limit_unchanged() {
        let sql = "SELECT username, follower_count FROM creators ORDER BY follower_count DESC LIMIT 10";
        assert_eq!(gate().prepare(sql, TENANT).unwrap(), sql);
        assert_eq!(gate().prepare(sql, "other-tenant").unwrap(), sql);
    }

    #[test]
    fn test_drop_then_select_rejected_as_not_select() {
        let err = gate()
            .prepare("DROP TABLE videos; SELECT 1", TENANT)
            .unwrap_err();
        assert!(err.is_not_select());
    }

    #[test]
    fn test_uppercase_select_after_paren_allowed() {
        let sql = gate()
            .prepare("SELECT a FROM (SELECT a FROM creators) SELECT b", "t")
            .unwrap();
        assert_eq!(sql, "SELECT a FROM (SELECT a FROM creators) SELECT b LIMIT 100");
    }

    #[test]
    fn test_precedence_keyword_before_placeholder() {
        let err = gate()
            .prepare("SELECT * FROM videos; update videos set x = 1", TENANT)
            .unwrap_err();
        assert!(err.is_prohibited_keyword());
    }

    #[test]
    fn test_precedence_nested_before_placeholder() {
        let err = gate()
            .prepare("SELECT * FROM (SELECT * FROM videos) select 1", TENANT)
            .unwrap_err();
        assert!(err.is_nested_select());
    }

    #[test]
    fn test_prepare_output_passes_gate_again() {
        let gate = gate();
        let once = gate
            .prepare("SELECT id FROM creators WHERE follower_count > 10", TENANT)
            .unwrap();
        assert_eq!(gate.prepare(&once, TENANT).unwrap(), once);
    }

    #[test]
    fn test_prepare_bound_parameterizes() {
        let bound = gate()
            .prepare_bound(
                "SELECT v.id FROM videos v JOIN daily_metrics d ON d.user_id = {{user_id}} \
                 WHERE v.user_id = {{ user_id }};",
                TENANT,
            )
            .unwrap();
        assert_eq!(
            bound.sql(),
            "SELECT v.id FROM videos v JOIN daily_metrics d ON d.user_id = ? \
             WHERE v.user_id = ? LIMIT 100"
        );
        assert_eq!(bound.params(), &[TENANT.to_string(), TENANT.to_string()]);
    }

    #[test]
    fn test_prepare_bound_global_query_has_no_params() {
        let (sql, params) = gate()
            .prepare_bound("SELECT username FROM creators LIMIT 3", TENANT)
            .unwrap()
            .into_parts();
        assert_eq!(sql, "SELECT username FROM creators LIMIT 3");
        assert!(params.is_empty());
    }

    #[test]
    fn test_prepare_bound_rejects_like_prepare() {
        let err = gate()
            .prepare_bound("SELECT * FROM daily_metrics", TENANT)
            .unwrap_err();
        assert!(err.is_missing_tenant_placeholder());
    }

    #[test]
    fn test_custom_policy() {
        let policy =
            GatePolicy::new(["orders"], "tenant_id", NonZeroU32::new(10).unwrap()).unwrap();
        let gate = QueryGate::new(policy).unwrap();

        assert_eq!(gate.policy().row_cap().get(), 10);
        assert_eq!(
            gate.prepare("SELECT * FROM orders WHERE tenant_id = {{tenant_id}}", "acme")
                .unwrap(),
            "SELECT * FROM orders WHERE tenant_id = 'acme' LIMIT 10"
        );
        // videos is not scoped under this policy
        assert_eq!(
            gate.prepare("SELECT * FROM videos", "acme").unwrap(),
            "SELECT * FROM videos LIMIT 10"
        );
    }
}
