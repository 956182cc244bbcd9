//! Ranking and discovery queries over lessons.

use anyhow::Result;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

/// Default trailing window for the contributor ranking, in days.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Default result size for ranking and related-content lookups.
pub const DEFAULT_DISCOVERY_LIMIT: i64 = 6;

/// One row of the top-contributor ranking: an author joined with their
/// profile, plus how many lessons they posted inside the window.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TopContributor {
    pub author_email: String,
    pub lesson_count: i64,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl TopContributor {
    /// Group lessons created in the trailing window by author, count,
    /// order by count descending, and join each author's profile.
    ///
    /// Ties break by author email ascending, which keeps the ordering
    /// stable across runs.
    pub async fn query(window_days: i64, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT l.author_email,
                    COUNT(*) AS lesson_count,
                    u.display_name,
                    u.photo_url
             FROM life_lessons l
             LEFT JOIN users u ON u.email = l.author_email
             WHERE l.created_at >= NOW() - ($1 * INTERVAL '1 day')
             GROUP BY l.author_email, u.display_name, u.photo_url
             ORDER BY lesson_count DESC, l.author_email ASC
             LIMIT $2",
        )
        .bind(window_days)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
