// src/ingest/types.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForumComment {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub score: i64,
}

/// One submission with its (already truncated) comment list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForumPost {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub comments: Vec<ForumComment>,
}

#[async_trait::async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch up to `limit` posts, in listing order.
    async fn fetch_posts(&self, limit: usize) -> Result<Vec<ForumPost>>;
    fn name(&self) -> &'static str;
}
