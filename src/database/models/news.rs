use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const TITLE_MAX_CHARS: usize = 255;
pub const SUMMARY_MAX_CHARS: usize = 1000;

/// A stored news record, as persisted and as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub time: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewsItem {
    /// Build a freshly created record. Both timestamps come from the same instant.
    pub fn from_draft(id: i64, draft: NewsDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            summary: draft.summary,
            image: draft.image,
            category: draft.category,
            time: draft.time,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every mutable field from `draft`. Omitted optionals become `None`.
    pub fn apply(&mut self, draft: NewsDraft, now: DateTime<Utc>) {
        self.title = draft.title;
        self.summary = draft.summary;
        self.image = draft.image;
        self.category = draft.category;
        self.time = draft.time;
        self.updated_at = self.updated_at.max(now);
    }
}

/// Request body for create and update. Server-owned fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewsInput {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub time: Option<String>,
}

/// Validated mutable fields of a news record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsDraft {
    pub title: String,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub time: Option<String>,
}

impl NewsDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: None,
            image: None,
            category: None,
            time: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

impl NewsInput {
    /// Check column constraints, returning per-field messages on failure.
    pub fn validate(self) -> Result<NewsDraft, HashMap<String, String>> {
        let mut field_errors = HashMap::new();

        match self.title.as_deref() {
            None | Some("") => {
                field_errors.insert("title".to_string(), "This field is required".to_string());
            }
            Some(title) if title.chars().count() > TITLE_MAX_CHARS => {
                field_errors.insert(
                    "title".to_string(),
                    format!("Must be at most {} characters", TITLE_MAX_CHARS),
                );
            }
            Some(_) => {}
        }

        if let Some(summary) = self.summary.as_deref() {
            if summary.chars().count() > SUMMARY_MAX_CHARS {
                field_errors.insert(
                    "summary".to_string(),
                    format!("Must be at most {} characters", SUMMARY_MAX_CHARS),
                );
            }
        }

        if !field_errors.is_empty() {
            return Err(field_errors);
        }

        Ok(NewsDraft {
            title: self.title.unwrap_or_default(),
            summary: self.summary,
            image: self.image,
            category: self.category,
            time: self.time,
        })
    }
}
