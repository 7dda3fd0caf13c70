// src/ingest/providers/fixture.rs
//! Offline provider: post records from a JSON file, same shape the live
//! client produces (`[{ "id", "title", "body", "score", "comments": [{ "body", "score" }] }]`).

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::ingest::types::{ForumPost, PostSource};

enum Mode {
    Inline(String),
    File(PathBuf),
}

pub struct FixtureProvider {
    mode: Mode,
}

impl FixtureProvider {
    pub fn from_fixture(content: &str) -> Self {
        Self {
            mode: Mode::Inline(content.to_string()),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        Self {
            mode: Mode::File(path.to_path_buf()),
        }
    }

    fn parse_posts(s: &str) -> Result<Vec<ForumPost>> {
        serde_json::from_str(s).context("parsing fixture posts json")
    }
}

#[async_trait]
impl PostSource for FixtureProvider {
    async fn fetch_posts(&self, limit: usize) -> Result<Vec<ForumPost>> {
        let mut posts = match &self.mode {
            Mode::Inline(s) => Self::parse_posts(s)?,
            Mode::File(p) => {
                let raw = tokio::fs::read_to_string(p)
                    .await
                    .with_context(|| format!("reading fixture {}", p.display()))?;
                Self::parse_posts(&raw)?
            }
        };
        posts.truncate(limit);
        Ok(posts)
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
