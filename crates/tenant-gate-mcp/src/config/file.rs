//! TOML configuration file loading

use std::num::{NonZeroU32, NonZeroUsize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::builder::{ConfigBuilder, TenantBinding};
use crate::Result;

/// Configuration file locations checked in order
const CONFIG_PATHS: &[&str] = &[
    "./tenant-gate.toml",
    "~/.config/tenant-gate/config.toml",
    "/etc/tenant-gate/config.toml",
];

/// Find the first existing configuration file
pub fn find_config_file() -> Option<PathBuf> {
    for path_str in CONFIG_PATHS {
        let path = if path_str.starts_with('~') {
            if let Ok(home) = std::env::var("HOME") {
                PathBuf::from(path_str.replacen('~', &home, 1))
            } else {
                continue;
            }
        } else {
            PathBuf::from(path_str)
        };

        if path.exists() {
            return Some(path);
        }
    }
    None
}

/// Load configuration from a TOML file
pub fn load_from_file(path: &Path, builder: ConfigBuilder) -> Result<ConfigBuilder> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::Error::Config(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    let file_config: FileConfig = toml::from_str(&content).map_err(|e| {
        crate::Error::Config(format!(
            "Failed to parse config file {}: {}",
            path.display(),
            e
        ))
    })?;

    apply_file_config(builder, file_config)
}

fn apply_file_config(mut builder: ConfigBuilder, config: FileConfig) -> Result<ConfigBuilder> {
    if let Some(conn) = config.connection {
        if let Some(url_str) = conn.url {
            let url = Url::parse(&url_str)
                .map_err(|e| crate::Error::Config(format!("Invalid connection URL: {e}")))?;
            builder = builder.connection_url(url);
        }

        if let Some(size) = conn.pool_size
            && let Some(nz) = NonZeroUsize::new(size)
        {
            builder = builder.pool_size(nz);
        }
    }

    if let Some(gate) = config.gate {
        if let Some(cap) = gate.row_cap {
            let cap = NonZeroU32::new(cap)
                .ok_or_else(|| crate::Error::Config("gate.row_cap must be positive".into()))?;
            builder = builder.row_cap(cap);
        }

        if let Some(tables) = gate.scoped_tables {
            builder = builder.scoped_tables(tables);
        }

        if let Some(placeholder) = gate.placeholder {
            builder = builder.placeholder(placeholder);
        }

        if let Some(binding) = gate.tenant_binding {
            builder = builder.tenant_binding(binding.parse::<TenantBinding>()?);
        }

        if let Some(timeout) = gate.query_timeout_secs {
            builder = builder.query_timeout(Duration::from_secs(timeout));
        }

        if let Some(path) = gate.manifest_path {
            builder = builder.manifest_path(path);
        }
    }

    if let Some(tenant) = config.session.and_then(|s| s.tenant_id) {
        builder = builder.tenant_id(tenant);
    }

    if let Some(obs) = config.observability {
        if let Some(endpoint) = obs.otlp_endpoint {
            builder = builder.otlp_endpoint(Some(endpoint));
        }

        if let Some(name) = obs.service_name {
            builder = builder.service_name(name);
        }

        if let Some(level) = obs.log_level {
            builder = builder.log_level(level);
        }

        if let Some(json) = obs.json_logs {
            builder = builder.json_logs(json);
        }
    }

    Ok(builder)
}

/// Root configuration file structure
#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    connection: Option<ConnectionConfig>,
    gate: Option<GateFileConfig>,
    session: Option<SessionFileConfig>,
    observability: Option<ObservabilityConfig>,
}

#[derive(Debug, Deserialize)]
struct ConnectionConfig {
    url: Option<String>,
    pool_size: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct GateFileConfig {
    row_cap: Option<u32>,
    scoped_tables: Option<Vec<String>>,
    placeholder: Option<String>,
    tenant_binding: Option<String>,
    query_timeout_secs: Option<u64>,
    manifest_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct SessionFileConfig {
    tenant_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObservabilityConfig {
    otlp_endpoint: Option<String>,
    service_name: Option<String>,
    log_level: Option<String>,
    json_logs: Option<bool>,
}
