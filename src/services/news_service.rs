use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::database::manager::DatabaseError;
use crate::database::models::{NewsDraft, NewsItem};
use crate::database::repository::NewsStore;

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("News not found with id: {0}")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(DatabaseError),
}

impl From<DatabaseError> for NewsError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(id) => NewsError::NotFound(id),
            other => NewsError::Database(other),
        }
    }
}

/// Business operations over a news store
#[derive(Clone)]
pub struct NewsService {
    store: Arc<dyn NewsStore>,
}

impl NewsService {
    pub fn new(store: Arc<dyn NewsStore>) -> Self {
        Self { store }
    }

    /// All news, newest first
    pub async fn get_all_news(&self) -> Result<Vec<NewsItem>, NewsError> {
        Ok(self.store.list_all().await?)
    }

    pub async fn get_news_by_id(&self, id: i64) -> Result<Option<NewsItem>, NewsError> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// News in `category`, newest first. An unknown category yields an empty list.
    pub async fn get_news_by_category(&self, category: &str) -> Result<Vec<NewsItem>, NewsError> {
        Ok(self.store.list_by_category(category).await?)
    }

    pub async fn create_news(&self, draft: NewsDraft) -> Result<NewsItem, NewsError> {
        let item = self.store.insert(draft, Utc::now()).await?;
        info!("Created news {}", item.id);
        Ok(item)
    }

    /// Overwrite every mutable field of an existing record.
    pub async fn update_news(&self, id: i64, draft: NewsDraft) -> Result<NewsItem, NewsError> {
        let item = self.store.update(id, draft, Utc::now()).await?;
        info!("Updated news {}", id);
        Ok(item)
    }

    /// Remove a record if present. Deleting a missing id succeeds.
    pub async fn delete_news(&self, id: i64) -> Result<(), NewsError> {
        if self.store.delete(id).await? {
            info!("Deleted news {}", id);
        } else {
            debug!("Delete of missing news {} ignored", id);
        }
        Ok(())
    }

    pub async fn get_categories(&self) -> Result<Vec<String>, NewsError> {
        Ok(self.store.categories().await?)
    }

    /// Insert `items` only when the store holds no news at all.
    pub async fn seed_if_empty(&self, items: Vec<NewsDraft>) -> Result<usize, NewsError> {
        if self.store.count().await? > 0 {
            return Ok(0);
        }

        let mut inserted = 0;
        for draft in items {
            self.store.insert(draft, Utc::now()).await?;
            inserted += 1;
        }
        info!("Seeded {} sample news items", inserted);
        Ok(inserted)
    }

    /// Fail fast when the backing store is unreachable
    pub async fn check_store(&self) -> Result<(), NewsError> {
        Ok(self.store.ping().await?)
    }
}
