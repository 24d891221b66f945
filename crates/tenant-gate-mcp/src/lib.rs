//! MCP analytics tool server in front of a tenant-scoped SQL gate

pub mod analytics;
pub mod config;
mod constants;
mod error;
pub mod executor;
pub mod guard;
mod helpers;
pub mod manifest;
pub mod observability;
mod pool;
pub mod server;
pub mod session;
pub mod transport;
pub mod types;

pub use config::{
    Config, ConfigBuilder, GateConfig, SessionConfig, TelemetryConfig, TenantBinding,
};
pub use error::{Error, Result};
pub use executor::{HanaExecutor, QueryExecutor, QueryRows};
pub use guard::ExecutionGuard;
pub use pool::{Pool, PooledConnection, create_pool};
pub use server::ServerHandler;
pub use session::{SessionResolver, StaticSession, TenantId};
pub use types::*;
