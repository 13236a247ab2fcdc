pub mod news_service;

pub use news_service::{NewsError, NewsService};
