use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};

use crate::data::{DataResult, SocialPost};

/// Insert-or-ignore cache of social posts, keyed by `source:id`
pub struct SocialCache {
    pub pool: SqlitePool,
}

impl SocialCache {
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!(url = database_url, "Opening social post cache");

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .context("Failed to parse SOCIAL_CACHE_URL")?
            .create_if_missing(true);

        if let Some(parent) = connect_options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        // Every connection to an in-memory database is a separate database
        let max_connections = if database_url.contains(":memory:") { 1 } else { 4 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(std::time::Duration::from_secs(10))
            .connect_with(connect_options)
            .await
            .context("Failed to open social cache database")?;

        let cache = SocialCache { pool };
        cache.run_migrations().await?;
        Ok(cache)
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run social cache migrations")?;
        debug!("Social cache schema ready");
        Ok(())
    }

    /// Record a post. Returns false when the key was already cached.
    pub async fn insert_post(&self, post: &SocialPost, fetch_time: NaiveDateTime) -> DataResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO posts
                (id, source, ticker, title, content, author, timestamp, score, url, fetch_time)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(post.cache_key())
        .bind(&post.source)
        .bind(&post.ticker)
        .bind(&post.title)
        .bind(post.content.as_deref().unwrap_or_default())
        .bind(post.author.as_deref().unwrap_or("unknown"))
        .bind(post.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string())
        .bind(post.score)
        .bind(&post.url)
        .bind(fetch_time.format("%Y-%m-%dT%H:%M:%S").to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> DataResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    pub async fn close(self) {
        info!("Closing social cache");
        self.pool.close().await;
    }
}
