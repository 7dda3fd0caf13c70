// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::ingest::types::{ForumPost, PostSource};
use anyhow::{Context, Result};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

/// Comment bodies left behind by moderation or account deletion.
const PLACEHOLDER_BODIES: [&str; 2] = ["[deleted]", "[removed]"];

/// One-time metrics registration (so series show up in the exposition).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_posts_fetched_total", "Posts returned by the provider.");
        describe_counter!(
            "ingest_snippets_total",
            "Text snippets produced from fetched posts."
        );
        describe_counter!(
            "ingest_provider_errors_total",
            "Provider fetch/parse errors."
        );
    });
}

/// Flatten posts into analyzable snippets, per post:
/// title → body → each real comment body. Posts keep fetch order.
pub fn collect_snippets(posts: &[ForumPost]) -> Vec<String> {
    let mut out = Vec::new();
    for post in posts {
        if !post.title.is_empty() {
            out.push(post.title.clone());
        }
        if !post.body.is_empty() {
            out.push(post.body.clone());
        }
        for c in &post.comments {
            if !c.body.is_empty() && !PLACEHOLDER_BODIES.contains(&c.body.as_str()) {
                out.push(c.body.clone());
            }
        }
    }
    out
}

/// Fetch posts once from `provider`. Fetch errors are fatal for the run.
pub async fn run_once(provider: &dyn PostSource, limit: usize) -> Result<Vec<ForumPost>> {
    ensure_metrics_described();

    let posts = match provider.fetch_posts(limit).await {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = ?e, provider = provider.name(), "provider error");
            counter!("ingest_provider_errors_total").increment(1);
            return Err(e).with_context(|| format!("fetching posts from {}", provider.name()));
        }
    };

    counter!("ingest_posts_fetched_total").increment(posts.len() as u64);
    tracing::info!(
        target: "ingest",
        provider = provider.name(),
        posts = posts.len(),
        "posts fetched"
    );
    Ok(posts)
}

/// Fetch and flatten in one go.
pub async fn fetch_snippets(provider: &dyn PostSource, limit: usize) -> Result<Vec<String>> {
    let posts = run_once(provider, limit).await?;
    let snippets = collect_snippets(&posts);
    counter!("ingest_snippets_total").increment(snippets.len() as u64);
    Ok(snippets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::ForumComment;

    fn comment(body: &str) -> ForumComment {
        ForumComment {
            body: body.to_string(),
            score: 1,
        }
    }

    #[test]
    fn flattens_in_post_order_and_skips_placeholders() {
        let posts = vec![
            ForumPost {
                id: "a".into(),
                title: "Title A".into(),
                body: String::new(),
                score: 10,
                comments: vec![comment("first"), comment("[deleted]"), comment("")],
            },
            ForumPost {
                id: "b".into(),
                title: "Title B".into(),
                body: "Body B".into(),
                score: 3,
                comments: vec![comment("[removed]"), comment("second")],
            },
        ];
        assert_eq!(
            collect_snippets(&posts),
            vec!["Title A", "first", "Title B", "Body B", "second"]
        );
    }

    #[test]
    fn empty_title_is_skipped() {
        let posts = vec![ForumPost {
            id: "c".into(),
            body: "only body".into(),
            ..ForumPost::default()
        }];
        assert_eq!(collect_snippets(&posts), vec!["only body"]);
    }
}
