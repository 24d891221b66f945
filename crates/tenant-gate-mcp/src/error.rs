use std::time::Duration;

use rmcp::ErrorData;
use tenant_gate::RejectedQuery;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Connection error: {0}")]
    Connection(#[from] hdbconnect::HdbError),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Query timeout after {0:?}")]
    QueryTimeout(Duration),

    #[error("Query rejected: {0}")]
    Rejected(#[from] RejectedQuery),

    #[error("No authenticated tenant for this session")]
    Unauthorized,

    #[error("Transport error: {0}")]
    Transport(String),
}

impl Error {
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::QueryTimeout(_))
    }

    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    #[must_use]
    pub const fn is_pool_exhausted(&self) -> bool {
        matches!(self, Self::PoolExhausted)
    }

    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    #[must_use]
    pub const fn is_query(&self) -> bool {
        matches!(self, Self::Query(_))
    }

    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// The gate rejection, if this error is one.
    #[must_use]
    pub const fn rejection(&self) -> Option<&RejectedQuery> {
        match self {
            Self::Rejected(rejected) => Some(rejected),
            _ => None,
        }
    }
}

/// Convert our Error type to rmcp `ErrorData`
///
/// Rejections carry the bare reason as the message so the model can rewrite
/// its query; the rejection kind travels in `data`.
impl From<Error> for ErrorData {
    fn from(err: Error) -> Self {
        match err {
            Error::Connection(e) => {
                Self::internal_error(format!("Database connection error: {e}"), None)
            }
            Error::Query(msg) => Self::internal_error(format!("Query error: {msg}"), None),
            Error::Config(msg) => Self::invalid_params(format!("Configuration error: {msg}"), None),
            Error::PoolExhausted => Self::internal_error("Connection pool exhausted", None),
            Error::QueryTimeout(duration) => {
                Self::internal_error(format!("Query timeout after {duration:?}"), None)
            }
            Error::Rejected(rejected) => Self::invalid_params(
                rejected.to_string(),
                Some(serde_json::json!({ "kind": rejected.kind_name() })),
            ),
            Error::Unauthorized => {
                Self::invalid_request("No authenticated tenant for this session", None)
            }
            Error::Transport(msg) => Self::internal_error(format!("Transport error: {msg}"), None),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
