//! Query execution backend
//!
//! The gate hands over exactly one statement plus its positional tenant
//! parameters. Backends execute it and return column names and JSON rows; they
//! never reinterpret the SQL.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;
use crate::helpers::{get_connection, hdb_value_to_json};
use crate::pool::Pool;

/// Columns and rows of one executed statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryRows {
    #[must_use]
    pub const fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, compared case-insensitively.
    ///
    /// HANA reports unquoted identifiers in upper case.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Cell at `row` in the named column.
    #[must_use]
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }
}

/// Executes a single gated statement.
#[async_trait]
pub trait QueryExecutor: Send + Sync + fmt::Debug {
    /// Run `sql`, binding `params` to its `?` markers in order.
    async fn query(&self, sql: &str, params: &[String]) -> Result<QueryRows>;
}

/// SAP HANA backend over a pooled `hdbconnect_async` connection.
pub struct HanaExecutor {
    pool: Pool,
}

impl HanaExecutor {
    #[must_use]
    pub const fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

impl fmt::Debug for HanaExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.pool.status();
        f.debug_struct("HanaExecutor")
            .field("pool_size", &status.size)
            .field("pool_max_size", &status.max_size)
            .finish()
    }
}

#[async_trait]
impl QueryExecutor for HanaExecutor {
    async fn query(&self, sql: &str, params: &[String]) -> Result<QueryRows> {
        let conn = get_connection(&self.pool).await?;

        let result_set = if params.is_empty() {
            conn.query(sql).await?
        } else {
            let mut stmt = conn.prepare(sql).await?;
            stmt.execute(&params).await?.into_result_set()?
        };

        let metadata = result_set.metadata().clone();
        let columns: Vec<String> = metadata
            .iter()
            .map(|col| col.columnname().to_string())
            .collect();

        let rows: Vec<Vec<Value>> = result_set
            .into_rows()
            .await?
            .into_iter()
            .map(|row| row.into_iter().map(|v| hdb_value_to_json(&v)).collect())
            .collect();

        tracing::debug!(
            row_count = rows.len(),
            columns = columns.len(),
            bound_params = params.len(),
            "Statement executed"
        );

        Ok(QueryRows { columns, rows })
    }
}
