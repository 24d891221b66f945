//! Environment variable loading for configuration

use std::env;
use std::num::{NonZeroU32, NonZeroUsize};
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use super::builder::{ConfigBuilder, TenantBinding};
use crate::Result;

/// Environment variable names
mod vars {
    pub const HANA_URL: &str = "HANA_URL";
    pub const HANA_USER: &str = "HANA_USER";
    pub const HANA_PASSWORD: &str = "HANA_PASSWORD";
    pub const HANA_POOL_SIZE: &str = "HANA_POOL_SIZE";
    pub const GATE_ROW_CAP: &str = "GATE_ROW_CAP";
    pub const GATE_SCOPED_TABLES: &str = "GATE_SCOPED_TABLES";
    pub const GATE_PLACEHOLDER: &str = "GATE_PLACEHOLDER";
    pub const GATE_TENANT_BINDING: &str = "GATE_TENANT_BINDING";
    pub const GATE_QUERY_TIMEOUT_SECS: &str = "GATE_QUERY_TIMEOUT_SECS";
    pub const GATE_MANIFEST_PATH: &str = "GATE_MANIFEST_PATH";
    pub const GATE_TENANT_ID: &str = "GATE_TENANT_ID";
    pub const OTEL_EXPORTER_OTLP_ENDPOINT: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
    pub const OTEL_SERVICE_NAME: &str = "OTEL_SERVICE_NAME";
    pub const RUST_LOG: &str = "RUST_LOG";
    pub const GATE_JSON_LOGS: &str = "GATE_JSON_LOGS";
}

/// Load configuration from environment variables
pub fn load_from_env(mut builder: ConfigBuilder) -> Result<ConfigBuilder> {
    // Connection URL
    if let Ok(url_str) = env::var(vars::HANA_URL) {
        let mut url = Url::parse(&url_str)
            .map_err(|e| crate::Error::Config(format!("Invalid {}: {}", vars::HANA_URL, e)))?;

        // Optionally override user/password from separate env vars
        if let Ok(user) = env::var(vars::HANA_USER) {
            url.set_username(&user)
                .map_err(|()| crate::Error::Config("Failed to set username in URL".into()))?;
        }
        if let Ok(password) = env::var(vars::HANA_PASSWORD) {
            url.set_password(Some(&password))
                .map_err(|()| crate::Error::Config("Failed to set password in URL".into()))?;
        }

        builder = builder.connection_url(url);
    }

    if let Ok(size_str) = env::var(vars::HANA_POOL_SIZE)
        && let Ok(size) = size_str.parse::<usize>()
        && let Some(nz) = NonZeroUsize::new(size)
    {
        builder = builder.pool_size(nz);
    }

    // Gate policy
    if let Ok(cap_str) = env::var(vars::GATE_ROW_CAP) {
        let cap = cap_str
            .trim()
            .parse::<u32>()
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| {
                crate::Error::Config(format!(
                    "Invalid {}: expected a positive integer, got '{cap_str}'",
                    vars::GATE_ROW_CAP
                ))
            })?;
        builder = builder.row_cap(cap);
    }

    if let Ok(tables) = env::var(vars::GATE_SCOPED_TABLES) {
        builder = builder.scoped_tables(split_list(&tables));
    }

    if let Ok(placeholder) = env::var(vars::GATE_PLACEHOLDER) {
        builder = builder.placeholder(placeholder.trim().to_string());
    }

    if let Ok(binding) = env::var(vars::GATE_TENANT_BINDING) {
        builder = builder.tenant_binding(binding.parse::<TenantBinding>()?);
    }

    if let Ok(timeout_str) = env::var(vars::GATE_QUERY_TIMEOUT_SECS)
        && let Ok(secs) = timeout_str.parse::<u64>()
    {
        builder = builder.query_timeout(Duration::from_secs(secs));
    }

    if let Ok(path) = env::var(vars::GATE_MANIFEST_PATH) {
        builder = builder.manifest_path(PathBuf::from(path));
    }

    // Session
    if let Ok(tenant) = env::var(vars::GATE_TENANT_ID) {
        builder = builder.tenant_id(tenant);
    }

    // Telemetry
    if let Ok(endpoint) = env::var(vars::OTEL_EXPORTER_OTLP_ENDPOINT) {
        builder = builder.otlp_endpoint(Some(endpoint));
    }

    if let Ok(name) = env::var(vars::OTEL_SERVICE_NAME) {
        builder = builder.service_name(name);
    }

    if let Ok(level) = env::var(vars::RUST_LOG) {
        builder = builder.log_level(level);
    }

    if let Ok(val) = env::var(vars::GATE_JSON_LOGS) {
        builder = builder.json_logs(parse_bool(&val));
    }

    Ok(builder)
}

fn parse_bool(s: &str) -> bool {
    matches!(s.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

/// Comma-separated list, blanks dropped.
pub(super) fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
