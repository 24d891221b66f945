//! Session layer: where the trusted tenant identifier comes from.
//!
//! Tool arguments never carry the tenant. The handler asks a
//! [`SessionResolver`] for it on every call.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Authenticated tenant identifier.
///
/// Non-empty, with no leading or trailing whitespace. The id is never
/// rewritten: it is inserted into SQL verbatim in inline binding mode, so it
/// must come from an authenticated source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::Config("tenant id must not be empty".into()));
        }
        if id.trim() != id {
            return Err(Error::Config(format!(
                "tenant id {id:?} has leading or trailing whitespace"
            )));
        }
        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TenantId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Supplies the tenant for the current session.
///
/// `None` means the session is unauthenticated and every data tool fails.
pub trait SessionResolver: Send + Sync + fmt::Debug {
    fn resolve(&self) -> Option<TenantId>;
}

/// Resolver over a tenant fixed at process start.
///
/// A stdio server serves exactly one client, so the tenant is bound once from
/// the CLI, environment or config file.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    tenant: Option<TenantId>,
}

impl StaticSession {
    #[must_use]
    pub const fn new(tenant: Option<TenantId>) -> Self {
        Self { tenant }
    }

    #[must_use]
    pub const fn unauthenticated() -> Self {
        Self { tenant: None }
    }
}

impl SessionResolver for StaticSession {
    fn resolve(&self) -> Option<TenantId> {
        self.tenant.clone()
    }
}
