//! Read-only, tenant-scoped SQL gate for model-generated analytics queries.
//!
//! The gate takes an untrusted SQL string written by a language model plus a
//! trusted tenant identifier and either rejects it or returns a single
//! statement that is:
//!
//! - a lone `SELECT` with no mutating keywords,
//! - bound to the tenant on every tenant-scoped table it touches,
//! - capped to a maximum row count when no `LIMIT` is present.
//!
//! The checks are lexical on purpose. They are conservative and can reject
//! harmless text (a prohibited keyword inside a string literal), but they never
//! need a grammar for the target database.
//!
//! # Example
//!
//! ```rust
//! use tenant_gate::QueryGate;
//!
//! let gate = QueryGate::default();
//! let sql = gate
//!     .prepare(
//!         "SELECT * FROM videos WHERE user_id = {{user_id}} ORDER BY view_count DESC",
//!         "abc-123",
//!     )
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT * FROM videos WHERE user_id = 'abc-123' ORDER BY view_count DESC LIMIT 100"
//! );
//! ```
#![warn(missing_docs)]

pub mod bound;
pub mod error;
pub mod gate;
pub mod policy;
pub mod scope;
pub mod shape;

pub use bound::RowBound;
pub use error::{PolicyError, RejectedQuery, Result};
pub use gate::{BoundQuery, QueryGate};
pub use policy::{
    DEFAULT_PLACEHOLDER, DEFAULT_ROW_CAP, DEFAULT_SCOPED_TABLES, GatePolicy, PROHIBITED_KEYWORDS,
};
pub use scope::TenantScope;
