//! Constants for the MCP server

/// SQL query to check database connection health
pub const HEALTH_CHECK_QUERY: &str = "SELECT 1 FROM DUMMY";

/// Connection status: success
pub const STATUS_OK: &str = "ok";

/// Default row count for the fixed listing tools
pub const DEFAULT_LIST_LIMIT: u32 = 10;

/// Default look-back window for `get_daily_metrics`
pub const DEFAULT_DAYS: u32 = 7;

/// Longest look-back window accepted by `get_daily_metrics`
pub const MAX_DAYS: u32 = 366;

/// Characters of free text (captions, bios) returned by the fixed tools
pub const TEXT_PREVIEW_CHARS: usize = 100;

/// Minimum length of a custom analytics query
pub const MIN_QUERY_CHARS: usize = 10;

/// Instructions advertised to MCP clients
pub const SERVER_INSTRUCTIONS: &str = "Analytics assistant tools for creator performance data. \
Use the tools to retrieve real data and never guess values. Custom queries are read-only \
SELECT statements and must include the tenant placeholder when referencing tenant-scoped \
tables. Call schema_manifest to see the available tables and columns.";
