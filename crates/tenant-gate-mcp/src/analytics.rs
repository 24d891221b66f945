//! Fixed analytics queries and result shaping.
//!
//! Every statement here is written with the tenant placeholder and goes
//! through the same gate as model-authored SQL. Only integers are formatted
//! into the text.

use std::num::NonZeroU32;

use crate::constants::{MAX_DAYS, TEXT_PREVIEW_CHARS};
use crate::executor::QueryRows;
use crate::helpers::{json_to_f64, json_to_i64, json_to_string, round2, truncate_chars};
use crate::types::{
    CreatorSummary, DailyMetric, DailyMetricsResult, DailyTotals, OverallStats, VideoMetric,
    VideoSort,
};

/// Clamp a requested row count into `1..=cap`.
pub const fn clamp_limit(requested: u32, cap: NonZeroU32) -> u32 {
    if requested == 0 {
        1
    } else if requested > cap.get() {
        cap.get()
    } else {
        requested
    }
}

/// Clamp a look-back window into `1..=MAX_DAYS`.
pub const fn clamp_days(requested: u32) -> u32 {
    if requested == 0 {
        1
    } else if requested > MAX_DAYS {
        MAX_DAYS
    } else {
        requested
    }
}

pub fn video_metrics_sql(placeholder: &str, sort_by: VideoSort, limit: u32) -> String {
    format!(
        "SELECT tiktok_video_id, description, view_count, like_count, comment_count, \
         share_count, engagement_rate, video_created_at FROM videos \
         WHERE user_id = {placeholder} ORDER BY {} DESC LIMIT {limit}",
        sort_by.column()
    )
}

pub fn daily_metrics_sql(placeholder: &str, days: u32) -> String {
    format!(
        "SELECT date, total_views, total_likes, total_comments, total_shares, \
         avg_engagement_rate, follower_count FROM daily_metrics \
         WHERE user_id = {placeholder} AND date >= ADD_DAYS(CURRENT_DATE, -{days}) \
         ORDER BY date DESC LIMIT {}",
        days + 1
    )
}

pub fn video_totals_sql(placeholder: &str) -> String {
    format!(
        "SELECT COUNT(*) AS total_videos, SUM(view_count) AS total_views, \
         SUM(like_count) AS total_likes, AVG(engagement_rate) AS avg_engagement \
         FROM videos WHERE user_id = {placeholder} LIMIT 1"
    )
}

pub fn latest_followers_sql(placeholder: &str) -> String {
    format!(
        "SELECT follower_count FROM daily_metrics WHERE user_id = {placeholder} \
         ORDER BY date DESC LIMIT 1"
    )
}

pub fn similar_creators_sql(
    min_followers: Option<u64>,
    max_followers: Option<u64>,
    limit: u32,
) -> String {
    let conditions: Vec<String> = [
        min_followers.map(|min| format!("follower_count >= {min}")),
        max_followers.map(|max| format!("follower_count <= {max}")),
    ]
    .into_iter()
    .flatten()
    .collect();

    let filter = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    format!(
        "SELECT username, follower_count, total_likes, video_count, bio FROM creators{filter} \
         ORDER BY follower_count DESC LIMIT {limit}"
    )
}

fn preview(rows: &QueryRows, row: usize, column: &str) -> Option<String> {
    json_to_string(rows.get(row, column)).map(|text| truncate_chars(&text, TEXT_PREVIEW_CHARS))
}

pub fn video_metrics(rows: &QueryRows) -> Vec<VideoMetric> {
    (0..rows.len())
        .map(|i| VideoMetric {
            id: json_to_string(rows.get(i, "tiktok_video_id")),
            description: preview(rows, i, "description"),
            views: json_to_i64(rows.get(i, "view_count")),
            likes: json_to_i64(rows.get(i, "like_count")),
            comments: json_to_i64(rows.get(i, "comment_count")),
            shares: json_to_i64(rows.get(i, "share_count")),
            engagement_rate: json_to_f64(rows.get(i, "engagement_rate")),
            created_at: json_to_string(rows.get(i, "video_created_at")),
        })
        .collect()
}

pub fn daily_metrics(rows: &QueryRows, days: u32) -> DailyMetricsResult {
    let mut totals = DailyTotals::default();
    let mut daily_breakdown = Vec::with_capacity(rows.len());

    for i in 0..rows.len() {
        let views = json_to_i64(rows.get(i, "total_views"));
        let likes = json_to_i64(rows.get(i, "total_likes"));

        totals.views += views;
        totals.likes += likes;
        totals.comments += json_to_i64(rows.get(i, "total_comments"));
        totals.shares += json_to_i64(rows.get(i, "total_shares"));

        daily_breakdown.push(DailyMetric {
            date: json_to_string(rows.get(i, "date")),
            views,
            likes,
            engagement: json_to_f64(rows.get(i, "avg_engagement_rate")),
            followers: json_to_i64(rows.get(i, "follower_count")),
        });
    }

    DailyMetricsResult {
        period: format!("Last {days} days"),
        totals,
        daily_breakdown,
    }
}

pub fn overall_stats(totals: &QueryRows, followers: &QueryRows) -> OverallStats {
    OverallStats {
        total_videos: json_to_i64(totals.get(0, "total_videos")),
        total_views: json_to_i64(totals.get(0, "total_views")),
        total_likes: json_to_i64(totals.get(0, "total_likes")),
        avg_engagement_rate: json_to_f64(totals.get(0, "avg_engagement")).map_or(0.0, round2),
        current_followers: json_to_i64(followers.get(0, "follower_count")),
    }
}

pub fn creators(rows: &QueryRows) -> Vec<CreatorSummary> {
    (0..rows.len())
        .map(|i| CreatorSummary {
            username: json_to_string(rows.get(i, "username")),
            followers: json_to_i64(rows.get(i, "follower_count")),
            total_likes: json_to_i64(rows.get(i, "total_likes")),
            videos: json_to_i64(rows.get(i, "video_count")),
            bio: preview(rows, i, "bio"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tenant_gate::QueryGate;

    use super::*;

    const TOKEN: &str = "{{user_id}}";

    fn cap(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(0, cap(100)), 1);
        assert_eq!(clamp_limit(10, cap(100)), 10);
        assert_eq!(clamp_limit(5000, cap(100)), 100);
    }

    #[test]
    fn test_clamp_days() {
        assert_eq!(clamp_days(0), 1);
        assert_eq!(clamp_days(30), 30);
        assert_eq!(clamp_days(10_000), MAX_DAYS);
    }

    #[test]
    fn test_fixed_statements_pass_the_gate() {
        let gate = QueryGate::default();
        let statements = [
            video_metrics_sql(TOKEN, VideoSort::Views, 10),
            daily_metrics_sql(TOKEN, 7),
            video_totals_sql(TOKEN),
            latest_followers_sql(TOKEN),
            similar_creators_sql(Some(1000), Some(50_000), 10),
            similar_creators_sql(None, None, 5),
        ];

        for sql in statements {
            let prepared = gate.prepare(&sql, "t-1").unwrap();
            assert!(!prepared.contains("{{"), "placeholder left in {prepared}");
            assert!(!prepared.ends_with("LIMIT 100"), "limit appended to {prepared}");
        }
    }

    #[test]
    fn test_video_metrics_sql_orders_by_metric() {
        let sql = video_metrics_sql(TOKEN, VideoSort::Likes, 3);
        assert!(sql.contains("WHERE user_id = {{user_id}}"));
        assert!(sql.ends_with("ORDER BY like_count DESC LIMIT 3"));
    }

    #[test]
    fn test_daily_metrics_sql_window() {
        let sql = daily_metrics_sql(TOKEN, 14);
        assert!(sql.contains("ADD_DAYS(CURRENT_DATE, -14)"));
        assert!(sql.ends_with("LIMIT 15"));
    }

    #[test]
    fn test_similar_creators_sql_filters() {
        assert_eq!(
            similar_creators_sql(None, None, 10),
            "SELECT username, follower_count, total_likes, video_count, bio FROM creators \
             ORDER BY follower_count DESC LIMIT 10"
        );
        let sql = similar_creators_sql(Some(10), Some(20), 5);
        assert!(sql.contains(" WHERE follower_count >= 10 AND follower_count <= 20 "));
        let sql = similar_creators_sql(None, Some(20), 5);
        assert!(sql.contains(" WHERE follower_count <= 20 "));
    }

    #[test]
    fn test_video_metrics_mapping() {
        let long_caption = "x".repeat(250);
        let rows = QueryRows::new(
            [
                "TIKTOK_VIDEO_ID",
                "DESCRIPTION",
                "VIEW_COUNT",
                "LIKE_COUNT",
                "COMMENT_COUNT",
                "SHARE_COUNT",
                "ENGAGEMENT_RATE",
                "VIDEO_CREATED_AT",
            ]
            .map(String::from)
            .to_vec(),
            vec![vec![
                json!("v1"),
                json!(long_caption),
                json!(1500),
                json!(120),
                json!(8),
                json!(3),
                json!("8.75"),
                json!("2024-05-01T10:00:00"),
            ]],
        );

        let videos = video_metrics(&rows);
        assert_eq!(videos.len(), 1);
        let video = &videos[0];
        assert_eq!(video.id.as_deref(), Some("v1"));
        assert_eq!(video.description.as_ref().unwrap().len(), 100);
        assert_eq!(video.views, 1500);
        assert_eq!(video.engagement_rate, Some(8.75));
        assert_eq!(video.created_at.as_deref(), Some("2024-05-01T10:00:00"));
    }

    #[test]
    fn test_daily_metrics_totals() {
        let rows = QueryRows::new(
            [
                "DATE",
                "TOTAL_VIEWS",
                "TOTAL_LIKES",
                "TOTAL_COMMENTS",
                "TOTAL_SHARES",
                "AVG_ENGAGEMENT_RATE",
                "FOLLOWER_COUNT",
            ]
            .map(String::from)
            .to_vec(),
            vec![
                vec![
                    json!("2024-05-02"),
                    json!(100),
                    json!(10),
                    json!(2),
                    json!(1),
                    json!(4.5),
                    json!(900),
                ],
                vec![
                    json!("2024-05-01"),
                    json!(50),
                    json!(5),
                    json!(null),
                    json!(4),
                    json!(null),
                    json!(880),
                ],
            ],
        );

        let result = daily_metrics(&rows, 7);
        assert_eq!(result.period, "Last 7 days");
        assert_eq!(
            result.totals,
            DailyTotals {
                views: 150,
                likes: 15,
                comments: 2,
                shares: 5,
            }
        );
        assert_eq!(result.daily_breakdown.len(), 2);
        assert_eq!(result.daily_breakdown[1].engagement, None);
        assert_eq!(result.daily_breakdown[0].followers, 900);
    }

    #[test]
    fn test_overall_stats_rounds_and_defaults() {
        let totals = QueryRows::new(
            ["TOTAL_VIDEOS", "TOTAL_VIEWS", "TOTAL_LIKES", "AVG_ENGAGEMENT"]
                .map(String::from)
                .to_vec(),
            vec![vec![json!(4), json!("12000"), json!(900), json!("5.4567")]],
        );

        let stats = overall_stats(&totals, &QueryRows::default());
        assert_eq!(stats.total_videos, 4);
        assert_eq!(stats.total_views, 12000);
        assert!((stats.avg_engagement_rate - 5.46).abs() < 1e-9);
        assert_eq!(stats.current_followers, 0);
    }

    #[test]
    fn test_overall_stats_empty_account() {
        let totals = QueryRows::new(
            ["TOTAL_VIDEOS", "TOTAL_VIEWS", "TOTAL_LIKES", "AVG_ENGAGEMENT"]
                .map(String::from)
                .to_vec(),
            vec![vec![json!(0), json!(null), json!(null), json!(null)]],
        );

        let stats = overall_stats(&totals, &QueryRows::default());
        assert_eq!(stats.total_views, 0);
        assert!(stats.avg_engagement_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn test_creators_mapping() {
        let rows = QueryRows::new(
            ["USERNAME", "FOLLOWER_COUNT", "TOTAL_LIKES", "VIDEO_COUNT", "BIO"]
                .map(String::from)
                .to_vec(),
            vec![vec![
                json!("alice"),
                json!(12000),
                json!("340000"),
                json!(85),
                json!(null),
            ]],
        );

        let creators = creators(&rows);
        assert_eq!(creators[0].username.as_deref(), Some("alice"));
        assert_eq!(creators[0].total_likes, 340_000);
        assert!(creators[0].bio.is_none());
    }
}
