use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewsDraft, NewsItem};
use crate::database::repository::NewsStore;

#[derive(Default)]
struct MemoryState {
    rows: BTreeMap<i64, NewsItem>,
    last_id: i64,
}

/// In-process store used when no database URL is configured. Ids come from a
/// counter that is never rewound, so deleted ids are not reused.
#[derive(Default)]
pub struct MemoryNewsStore {
    state: RwLock<MemoryState>,
}

impl MemoryNewsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut items: Vec<NewsItem>) -> Vec<NewsItem> {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    items
}

#[async_trait]
impl NewsStore for MemoryNewsStore {
    async fn insert(&self, draft: NewsDraft, now: DateTime<Utc>) -> Result<NewsItem, DatabaseError> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let item = NewsItem::from_draft(state.last_id, draft, now);
        state.rows.insert(item.id, item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<NewsItem>, DatabaseError> {
        Ok(self.state.read().await.rows.get(&id).cloned())
    }

    async fn update(
        &self,
        id: i64,
        draft: NewsDraft,
        now: DateTime<Utc>,
    ) -> Result<NewsItem, DatabaseError> {
        let mut state = self.state.write().await;
        let item = state.rows.get_mut(&id).ok_or(DatabaseError::NotFound(id))?;
        item.apply(draft, now);
        Ok(item.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        Ok(self.state.write().await.rows.remove(&id).is_some())
    }

    async fn list_all(&self) -> Result<Vec<NewsItem>, DatabaseError> {
        let items = self.state.read().await.rows.values().cloned().collect();
        Ok(newest_first(items))
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<NewsItem>, DatabaseError> {
        let items = self
            .state
            .read()
            .await
            .rows
            .values()
            .filter(|item| item.category.as_deref() == Some(category))
            .cloned()
            .collect();
        Ok(newest_first(items))
    }

    async fn categories(&self) -> Result<Vec<String>, DatabaseError> {
        let state = self.state.read().await;
        let mut seen = HashSet::new();
        Ok(state
            .rows
            .values()
            .filter_map(|item| item.category.clone())
            .filter(|category| seen.insert(category.clone()))
            .collect())
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        Ok(self.state.read().await.rows.len() as i64)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
