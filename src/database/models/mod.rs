pub mod news;

pub use news::{NewsDraft, NewsInput, NewsItem};
