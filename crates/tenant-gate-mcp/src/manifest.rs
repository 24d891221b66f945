//! Schema manifest handed to the model.
//!
//! The manifest is the only description of the data the model sees. The
//! tenant-scoped tables the gate enforces must be documented in it together
//! with their tenant owner column, otherwise the model cannot write a query
//! the gate will accept.

use tenant_gate::GatePolicy;

use crate::{Error, Result};

/// Default manifest for the creator analytics schema.
pub const SCHEMA_MANIFEST: &str = r"# Analytics Schema Manifest (read-only)

## videos
- id (uuid): internal identifier
- user_id (uuid): owner of the video (scoped to current tenant/session)
- tiktok_video_id (text): TikTok video identifier
- description (text): video caption text
- view_count (integer)
- like_count (integer)
- comment_count (integer)
- share_count (integer)
- engagement_rate (numeric, %)
- video_created_at (timestamp)
- source (jsonb, optional metadata)

## daily_metrics
- id (uuid)
- user_id (uuid)
- date (date, YYYY-MM-DD)
- total_views (integer)
- total_likes (integer)
- total_comments (integer)
- total_shares (integer)
- follower_count (integer, closing followers for the day)
- avg_engagement_rate (numeric, %)

## creators
- id (uuid)
- tiktok_id (text)
- username (text)
- follower_count (integer)
- following_count (integer)
- total_likes (bigint)
- video_count (integer)
- bio (text)
- profile_data (jsonb, scraper metadata)
- last_scraped_at (timestamp)

## Usage Rules
1. Always scope analytics queries by the authenticated user's `user_id` using the {{user_id}} placeholder.
2. Never attempt INSERT/UPDATE/DELETE; assistant has read-only access.
3. Prefer aggregated data from `daily_metrics` for trend questions.
4. When searching creators, combine follower_count ranges with textual filters when available.
5. If requested data is unavailable, respond with a helpful explanation instead of fabricating numbers.
";

/// A `## table` section of the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestTable {
    pub name: String,
    pub columns: Vec<String>,
}

/// Table sections in manifest order.
///
/// A section is a `## <identifier>` heading followed by `- <column> ...`
/// bullets. Headings that are not a single identifier (`## Usage Rules`) are
/// skipped.
pub fn documented_tables(manifest: &str) -> Vec<ManifestTable> {
    let mut tables: Vec<ManifestTable> = Vec::new();
    let mut in_table = false;

    for line in manifest.lines().map(str::trim) {
        if let Some(heading) = line.strip_prefix("## ") {
            let heading = heading.trim();
            in_table = tenant_gate::policy::is_valid_identifier(heading);
            if in_table {
                tables.push(ManifestTable {
                    name: heading.to_lowercase(),
                    columns: Vec::new(),
                });
            }
            continue;
        }

        if line.starts_with('#') {
            in_table = false;
            continue;
        }

        if in_table
            && let Some(item) = line.strip_prefix("- ")
            && let Some(table) = tables.last_mut()
        {
            let column: String = item
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect();
            if !column.is_empty() {
                table.columns.push(column.to_lowercase());
            }
        }
    }

    tables
}

/// Check that every tenant-scoped table is documented with the owner column.
///
/// The owner column is named like the placeholder identifier, so the default
/// policy requires `videos.user_id` and `daily_metrics.user_id`.
pub fn verify_scoped_tables(manifest: &str, policy: &GatePolicy) -> Result<()> {
    let tables = documented_tables(manifest);
    let owner = policy.placeholder().to_lowercase();

    for scoped in policy.scoped_tables() {
        let Some(table) = tables.iter().find(|t| t.name == *scoped) else {
            return Err(Error::Config(format!(
                "tenant-scoped table '{scoped}' is not documented in the schema manifest"
            )));
        };

        if !table.columns.iter().any(|c| *c == owner) {
            return Err(Error::Config(format!(
                "tenant-scoped table '{scoped}' has no '{owner}' column in the schema manifest"
            )));
        }
    }

    Ok(())
}
