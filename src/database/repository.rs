use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{NewsDraft, NewsItem};

/// Persistence contract for news records. Every operation is atomic on a
/// single record; listings are ordered newest first.
#[async_trait]
pub trait NewsStore: Send + Sync {
    async fn insert(&self, draft: NewsDraft, now: DateTime<Utc>) -> Result<NewsItem, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<NewsItem>, DatabaseError>;

    /// Overwrite the mutable fields of `id`. Fails with `DatabaseError::NotFound`
    /// when the record does not exist.
    async fn update(
        &self,
        id: i64,
        draft: NewsDraft,
        now: DateTime<Utc>,
    ) -> Result<NewsItem, DatabaseError>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: i64) -> Result<bool, DatabaseError>;

    async fn list_all(&self) -> Result<Vec<NewsItem>, DatabaseError>;

    async fn list_by_category(&self, category: &str) -> Result<Vec<NewsItem>, DatabaseError>;

    /// Distinct non-null categories.
    async fn categories(&self) -> Result<Vec<String>, DatabaseError>;

    async fn count(&self) -> Result<i64, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}

const NEWS_COLUMNS: &str =
    r#"id, title, summary, image, category, "time", created_at, updated_at"#;

/// PostgreSQL-backed store over the `news` table
pub struct PgNewsStore {
    pool: PgPool,
}

impl PgNewsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NewsStore for PgNewsStore {
    async fn insert(&self, draft: NewsDraft, now: DateTime<Utc>) -> Result<NewsItem, DatabaseError> {
        let sql = format!(
            r#"INSERT INTO news (title, summary, image, category, "time", created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $6)
               RETURNING {}"#,
            NEWS_COLUMNS
        );

        let item = sqlx::query_as::<_, NewsItem>(&sql)
            .bind(draft.title)
            .bind(draft.summary)
            .bind(draft.image)
            .bind(draft.category)
            .bind(draft.time)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        Ok(item)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<NewsItem>, DatabaseError> {
        let sql = format!("SELECT {} FROM news WHERE id = $1", NEWS_COLUMNS);

        let item = sqlx::query_as::<_, NewsItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    async fn update(
        &self,
        id: i64,
        draft: NewsDraft,
        now: DateTime<Utc>,
    ) -> Result<NewsItem, DatabaseError> {
        let sql = format!(
            r#"UPDATE news
               SET title = $2, summary = $3, image = $4, category = $5, "time" = $6,
                   updated_at = GREATEST($7, updated_at)
               WHERE id = $1
               RETURNING {}"#,
            NEWS_COLUMNS
        );

        sqlx::query_as::<_, NewsItem>(&sql)
            .bind(id)
            .bind(draft.title)
            .bind(draft.summary)
            .bind(draft.image)
            .bind(draft.category)
            .bind(draft.time)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DatabaseError::NotFound(id))
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM news WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> Result<Vec<NewsItem>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM news ORDER BY created_at DESC, id DESC",
            NEWS_COLUMNS
        );

        Ok(sqlx::query_as::<_, NewsItem>(&sql).fetch_all(&self.pool).await?)
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<NewsItem>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM news WHERE category = $1 ORDER BY created_at DESC, id DESC",
            NEWS_COLUMNS
        );

        Ok(sqlx::query_as::<_, NewsItem>(&sql)
            .bind(category)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn categories(&self) -> Result<Vec<String>, DatabaseError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT category FROM news WHERE category IS NOT NULL",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(category,)| category).collect())
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM news")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
