//! Configuration builder

use std::num::{NonZeroU32, NonZeroUsize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tenant_gate::{DEFAULT_PLACEHOLDER, DEFAULT_ROW_CAP, DEFAULT_SCOPED_TABLES, GatePolicy};
use url::Url;

use crate::Error;
use crate::guard::DEFAULT_QUERY_TIMEOUT;
use crate::manifest::{SCHEMA_MANIFEST, verify_scoped_tables};
use crate::session::TenantId;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub connection_url: Url,
    pub pool_size: NonZeroUsize,
    pub gate: GateConfig,
    pub session: SessionConfig,
    pub telemetry: TelemetryConfig,
}

impl Config {
    #[must_use]
    pub const fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    #[must_use]
    pub const fn policy(&self) -> &GatePolicy {
        &self.gate.policy
    }

    #[must_use]
    pub const fn query_timeout(&self) -> Duration {
        self.gate.query_timeout
    }
}

/// Gate settings resolved from all configuration sources
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub policy: GatePolicy,
    pub tenant_binding: TenantBinding,
    pub query_timeout: Duration,
    /// Manifest text, checked against the policy at build time
    pub manifest: String,
}

/// Session settings
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub tenant_id: Option<TenantId>,
}

/// How the tenant id reaches the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TenantBinding {
    /// Substituted into the SQL text as a quoted literal
    Inline,
    /// Bound through the driver as a positional parameter
    #[default]
    Parameter,
}

impl FromStr for TenantBinding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inline" | "literal" => Ok(Self::Inline),
            "parameter" | "param" | "bound" => Ok(Self::Parameter),
            other => Err(Error::Config(format!(
                "unknown tenant binding '{other}', expected 'inline' or 'parameter'"
            ))),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    pub otlp_endpoint: Option<String>,
    pub service_name: String,
    pub log_level: String,
    pub json_logs: bool,
}

/// Configuration builder with fluent API
#[derive(Debug)]
pub struct ConfigBuilder {
    connection_url: Option<Url>,
    pool_size: NonZeroUsize,
    scoped_tables: Option<Vec<String>>,
    placeholder: Option<String>,
    row_cap: Option<NonZeroU32>,
    tenant_binding: TenantBinding,
    query_timeout: Duration,
    manifest_path: Option<PathBuf>,
    tenant_id: Option<String>,
    telemetry: TelemetryConfig,
}

impl ConfigBuilder {
    const DEFAULT_POOL_SIZE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(3); // 4

    #[must_use]
    pub const fn new() -> Self {
        Self {
            connection_url: None,
            pool_size: Self::DEFAULT_POOL_SIZE,
            scoped_tables: None,
            placeholder: None,
            row_cap: None,
            tenant_binding: TenantBinding::Parameter,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            manifest_path: None,
            tenant_id: None,
            telemetry: TelemetryConfig {
                otlp_endpoint: None,
                service_name: String::new(),
                log_level: String::new(),
                json_logs: false,
            },
        }
    }

    #[must_use]
    pub fn connection_url(mut self, url: Url) -> Self {
        self.connection_url = Some(url);
        self
    }

    #[must_use]
    pub const fn pool_size(mut self, size: NonZeroUsize) -> Self {
        self.pool_size = size;
        self
    }

    /// Tenant-scoped table names, replacing the defaults
    #[must_use]
    pub fn scoped_tables(mut self, tables: Vec<String>) -> Self {
        self.scoped_tables = Some(tables);
        self
    }

    /// Placeholder identifier, without braces
    #[must_use]
    pub fn placeholder(mut self, placeholder: String) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    #[must_use]
    pub const fn row_cap(mut self, cap: NonZeroU32) -> Self {
        self.row_cap = Some(cap);
        self
    }

    #[must_use]
    pub const fn tenant_binding(mut self, binding: TenantBinding) -> Self {
        self.tenant_binding = binding;
        self
    }

    #[must_use]
    pub const fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Read the schema manifest from a file instead of the built-in one
    #[must_use]
    pub fn manifest_path(mut self, path: PathBuf) -> Self {
        self.manifest_path = Some(path);
        self
    }

    #[must_use]
    pub fn tenant_id(mut self, tenant_id: String) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    #[must_use]
    pub fn otlp_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.telemetry.otlp_endpoint = endpoint;
        self
    }

    #[must_use]
    pub fn service_name(mut self, name: String) -> Self {
        self.telemetry.service_name = name;
        self
    }

    #[must_use]
    pub fn log_level(mut self, level: String) -> Self {
        self.telemetry.log_level = level;
        self
    }

    #[must_use]
    pub const fn json_logs(mut self, enabled: bool) -> Self {
        self.telemetry.json_logs = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> crate::Result<Config> {
        let connection_url = self
            .connection_url
            .ok_or_else(|| Error::Config("connection_url is required".into()))?;

        if self.query_timeout.is_zero() {
            return Err(Error::Config("query timeout must be greater than zero".into()));
        }

        let policy = GatePolicy::new(
            self.scoped_tables.unwrap_or_else(|| {
                DEFAULT_SCOPED_TABLES
                    .iter()
                    .map(|t| (*t).to_string())
                    .collect()
            }),
            self.placeholder
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()),
            self.row_cap.unwrap_or(DEFAULT_ROW_CAP),
        )
        .map_err(|e| Error::Config(e.to_string()))?;

        let manifest = match self.manifest_path {
            Some(path) => std::fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!(
                    "Failed to read schema manifest {}: {}",
                    path.display(),
                    e
                ))
            })?,
            None => SCHEMA_MANIFEST.to_string(),
        };
        verify_scoped_tables(&manifest, &policy)?;

        let tenant_id = self.tenant_id.map(TenantId::new).transpose()?;

        // Apply defaults for telemetry
        let service_name = if self.telemetry.service_name.is_empty() {
            "tenant-gate-mcp".to_string()
        } else {
            self.telemetry.service_name
        };

        let log_level = if self.telemetry.log_level.is_empty() {
            "info".to_string()
        } else {
            self.telemetry.log_level
        };

        Ok(Config {
            connection_url,
            pool_size: self.pool_size,
            gate: GateConfig {
                policy,
                tenant_binding: self.tenant_binding,
                query_timeout: self.query_timeout,
                manifest,
            },
            session: SessionConfig { tenant_id },
            telemetry: TelemetryConfig {
                otlp_endpoint: self.telemetry.otlp_endpoint,
                service_name,
                log_level,
                json_logs: self.telemetry.json_logs,
            },
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
