//! Type definitions for MCP tools

use rmcp::ErrorData;
use rmcp::handler::server::wrapper::Json;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DAYS, DEFAULT_LIST_LIMIT};

/// Result type for MCP tool handlers returning structured JSON data
pub type ToolResult<T> = Result<Json<T>, ErrorData>;

const fn default_list_limit() -> u32 {
    DEFAULT_LIST_LIMIT
}

const fn default_days() -> u32 {
    DEFAULT_DAYS
}

/// Connection health check result
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PingResult {
    #[schemars(description = "Connection status: ok or error")]
    pub status: String,
    #[schemars(description = "Query latency in milliseconds")]
    pub latency_ms: u64,
}

/// Schema manifest and the tenant rules that apply to it
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ManifestResult {
    #[schemars(description = "Markdown description of the queryable tables and usage rules")]
    pub manifest: String,
    #[schemars(description = "Tables that require the tenant placeholder")]
    pub scoped_tables: Vec<String>,
    #[schemars(description = "Tenant placeholder to write in queries, e.g. {{user_id}}")]
    pub placeholder: String,
    #[schemars(description = "Row cap appended to queries without a LIMIT")]
    pub row_cap: u32,
}

/// Parameters for a custom analytics query
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CustomQueryParams {
    /// SQL SELECT statement
    #[schemars(
        description = "SQL SELECT statement using tables documented in the schema manifest. Include {{user_id}} when referencing tenant-scoped tables (videos, daily_metrics)"
    )]
    pub query: String,
}

/// Custom analytics query result
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CustomQueryResult {
    #[schemars(description = "Statement that was executed after scoping and bounding")]
    pub query: String,
    #[schemars(description = "Number of rows returned")]
    pub row_count: usize,
    #[schemars(description = "Column names in result set")]
    pub columns: Vec<String>,
    #[schemars(description = "Result rows as JSON arrays")]
    pub rows: Vec<Vec<serde_json::Value>>,
}

/// Ordering for `get_video_metrics`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VideoSort {
    #[default]
    Engagement,
    Views,
    Likes,
    Recent,
}

impl VideoSort {
    /// Column the listing is ordered by, descending.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Engagement => "engagement_rate",
            Self::Views => "view_count",
            Self::Likes => "like_count",
            Self::Recent => "video_created_at",
        }
    }
}

/// Parameters for `get_video_metrics`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoMetricsParams {
    #[serde(default = "default_list_limit")]
    #[schemars(description = "Number of videos to return (default 10)")]
    pub limit: u32,
    #[serde(default)]
    #[schemars(description = "Sort videos by this metric: engagement, views, likes or recent")]
    pub sort_by: VideoSort,
}

/// One video of the authenticated creator
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoMetric {
    pub id: Option<String>,
    #[schemars(description = "Caption, first 100 characters")]
    pub description: Option<String>,
    pub views: i64,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    #[schemars(description = "Engagement rate in percent")]
    pub engagement_rate: Option<f64>,
    pub created_at: Option<String>,
}

/// `get_video_metrics` result
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoMetricsResult {
    pub videos: Vec<VideoMetric>,
    pub count: usize,
}

/// Parameters for `get_daily_metrics`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DailyMetricsParams {
    #[serde(default = "default_days")]
    #[schemars(description = "Number of days to look back (default 7)")]
    pub days: u32,
}

/// Summed totals over the period
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DailyTotals {
    pub views: i64,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
}

/// One day of metrics
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DailyMetric {
    pub date: Option<String>,
    pub views: i64,
    pub likes: i64,
    #[schemars(description = "Average engagement rate in percent")]
    pub engagement: Option<f64>,
    #[schemars(description = "Closing follower count for the day")]
    pub followers: i64,
}

/// `get_daily_metrics` result
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DailyMetricsResult {
    pub period: String,
    pub totals: DailyTotals,
    pub daily_breakdown: Vec<DailyMetric>,
}

/// Account-level summary
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OverallStats {
    pub total_videos: i64,
    pub total_views: i64,
    pub total_likes: i64,
    #[schemars(description = "Average engagement rate in percent, two decimals")]
    pub avg_engagement_rate: f64,
    pub current_followers: i64,
}

/// Parameters for `find_similar_creators`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SimilarCreatorsParams {
    #[serde(default)]
    #[schemars(description = "Minimum follower count")]
    pub min_followers: Option<u64>,
    #[serde(default)]
    #[schemars(description = "Maximum follower count")]
    pub max_followers: Option<u64>,
    #[serde(default = "default_list_limit")]
    #[schemars(description = "Maximum number of results (default 10)")]
    pub limit: u32,
}

/// A creator from the shared creators table
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreatorSummary {
    pub username: Option<String>,
    pub followers: i64,
    pub total_likes: i64,
    pub videos: i64,
    #[schemars(description = "Bio, first 100 characters")]
    pub bio: Option<String>,
}

/// `find_similar_creators` result
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SimilarCreatorsResult {
    pub creators: Vec<CreatorSummary>,
    pub count: usize,
}
