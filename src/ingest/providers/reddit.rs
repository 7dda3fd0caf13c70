// src/ingest/providers/reddit.rs
//! Reddit client: OAuth token, paginated "hot" listing, per-post comments.
//!
//! Comments are fetched with `raw_json=1` (no HTML entity escaping), the
//! "load more" stubs are ignored, and the tree is walked breadth-first and
//! cut at `comments_per_post`. A fixed delay follows every submission.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::VecDeque;
use std::time::Duration;

use crate::config::app::{AppConfig, RedditCredentials};
use crate::error::AnalyzerError;
use crate::ingest::types::{ForumComment, ForumPost, PostSource};

const AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_URL: &str = "https://oauth.reddit.com";
/// Reddit caps listing pages at 100 items.
const MAX_PAGE: usize = 100;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Thing>,
    #[serde(default)]
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RawSubmission {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    score: i64,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    #[serde(default)]
    body: String,
    #[serde(default)]
    score: i64,
    /// Either `""` or a nested listing.
    #[serde(default)]
    replies: serde_json::Value,
}

pub struct RedditProvider {
    creds: RedditCredentials,
    subreddit: String,
    rate_limit_delay: Duration,
    comments_per_post: usize,
    client: reqwest::Client,
}

impl RedditProvider {
    /// Fails with a config error when credentials are missing.
    pub fn new(cfg: &AppConfig) -> Result<Self, AnalyzerError> {
        cfg.validate_reddit()?;
        let client = reqwest::Client::builder()
            .user_agent(cfg.reddit.user_agent.clone())
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AnalyzerError::Fetch(format!("building http client: {e}")))?;
        Ok(Self {
            creds: cfg.reddit.clone(),
            subreddit: cfg.subreddit.clone(),
            rate_limit_delay: cfg.rate_limit_delay,
            comments_per_post: cfg.comments_per_post,
            client,
        })
    }

    async fn access_token(&self) -> Result<String> {
        let client_id = self.creds.client_id.as_deref().unwrap_or_default();
        let secret = self.creds.client_secret.as_deref();

        // Script apps use the password grant; otherwise app-only access.
        let form: Vec<(&str, &str)> = match (&self.creds.username, &self.creds.password) {
            (Some(u), Some(p)) => vec![
                ("grant_type", "password"),
                ("username", u.as_str()),
                ("password", p.as_str()),
            ],
            _ => vec![("grant_type", "client_credentials")],
        };

        let resp = self
            .client
            .post(AUTH_URL)
            .basic_auth(client_id, secret)
            .form(&form)
            .send()
            .await
            .context("reddit auth request")?
            .error_for_status()
            .context("reddit auth rejected")?;
        let token: TokenResponse = resp.json().await.context("reddit auth response")?;
        tracing::debug!(target: "ingest", "reddit access token acquired");
        Ok(token.access_token)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        token: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let resp = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url} status"))?;
        resp.json::<T>()
            .await
            .with_context(|| format!("decoding {url}"))
    }

    async fn hot_submissions(&self, token: &str, limit: usize) -> Result<Vec<RawSubmission>> {
        let url = format!("{API_URL}/r/{}/hot", self.subreddit);
        let mut out = Vec::with_capacity(limit);
        let mut after: Option<String> = None;

        while out.len() < limit {
            let page = (limit - out.len()).min(MAX_PAGE);
            let mut query = vec![("limit", page.to_string()), ("raw_json", "1".to_string())];
            if let Some(a) = &after {
                query.push(("after", a.clone()));
            }

            let listing: Listing = self.get_json(token, &url, &query).await?;
            if listing.data.children.is_empty() {
                break;
            }
            out.extend(parse_submissions(listing.data.children));
            after = listing.data.after;
            if after.is_none() {
                break;
            }
        }

        out.truncate(limit);
        Ok(out)
    }

    async fn comments_for(&self, token: &str, id: &str) -> Result<Vec<ForumComment>> {
        let url = format!("{API_URL}/r/{}/comments/{id}", self.subreddit);
        let query = [("raw_json", "1".to_string())];
        let listings: Vec<Listing> = self.get_json(token, &url, &query).await?;
        let top = listings
            .into_iter()
            .nth(1)
            .ok_or_else(|| anyhow!("comment listing missing for {id}"))?;
        Ok(flatten_comments(top.data.children, self.comments_per_post))
    }
}

#[async_trait]
impl PostSource for RedditProvider {
    async fn fetch_posts(&self, limit: usize) -> Result<Vec<ForumPost>> {
        let token = self.access_token().await?;
        let submissions = self.hot_submissions(&token, limit).await?;

        let mut posts = Vec::with_capacity(submissions.len());
        for sub in submissions {
            let comments = self.comments_for(&token, &sub.id).await?;
            tracing::debug!(
                target: "ingest",
                id = %sub.id,
                comments = comments.len(),
                "submission fetched"
            );
            posts.push(ForumPost {
                id: sub.id,
                title: sub.title,
                body: sub.selftext,
                score: sub.score,
                comments,
            });
            tokio::time::sleep(self.rate_limit_delay).await;
        }
        Ok(posts)
    }

    fn name(&self) -> &'static str {
        "reddit"
    }
}

fn parse_submissions(children: Vec<Thing>) -> Vec<RawSubmission> {
    children
        .into_iter()
        .filter(|t| t.kind == "t3")
        .filter_map(|t| serde_json::from_value(t.data).ok())
        .collect()
}

/// Breadth-first walk over the comment forest; keeps the first `max`
/// comments, then drops those with an empty body.
fn flatten_comments(top_level: Vec<Thing>, max: usize) -> Vec<ForumComment> {
    let mut queue: VecDeque<Thing> = top_level.into();
    let mut taken = Vec::new();

    while let Some(thing) = queue.pop_front() {
        if taken.len() >= max {
            break;
        }
        if thing.kind != "t1" {
            continue;
        }
        let Ok(raw) = serde_json::from_value::<RawComment>(thing.data) else {
            continue;
        };
        if raw.replies.is_object() {
            if let Ok(nested) = serde_json::from_value::<Listing>(raw.replies) {
                queue.extend(nested.data.children);
            }
        }
        taken.push(ForumComment {
            body: raw.body,
            score: raw.score,
        });
    }

    taken.retain(|c| !c.body.is_empty());
    taken
}

#[cfg(test)]
mod tests {
    use super::*;

    fn things(json: &str) -> Vec<Thing> {
        serde_json::from_str::<Listing>(json).unwrap().data.children
    }

    const COMMENTS: &str = r#"{"kind":"Listing","data":{"after":null,"children":[
        {"kind":"t1","data":{"body":"top one","score":5,"replies":{"kind":"Listing","data":{"children":[
            {"kind":"t1","data":{"body":"nested","score":1,"replies":""}},
            {"kind":"more","data":{"count":4,"children":["x","y"]}}
        ]}}}},
        {"kind":"t1","data":{"body":"top two","score":2,"replies":""}},
        {"kind":"t1","data":{"body":"","score":0,"replies":""}},
        {"kind":"more","data":{"count":10}}
    ]}}"#;

    #[test]
    fn comments_are_breadth_first() {
        let out = flatten_comments(things(COMMENTS), 20);
        let bodies: Vec<_> = out.iter().map(|c| c.body.as_str()).collect();
        assert_eq!(bodies, vec!["top one", "top two", "nested"]);
        assert_eq!(out[0].score, 5);
    }

    #[test]
    fn comment_cap_applies_before_empty_filter() {
        let out = flatten_comments(things(COMMENTS), 3);
        let bodies: Vec<_> = out.iter().map(|c| c.body.as_str()).collect();
        // third slot went to the empty comment, which is then dropped
        assert_eq!(bodies, vec!["top one", "top two"]);
    }

    #[test]
    fn only_link_things_become_submissions() {
        let json = r#"{"kind":"Listing","data":{"after":"t3_b","children":[
            {"kind":"t3","data":{"id":"a","title":"AMD?","selftext":"","score":3}},
            {"kind":"t5","data":{"id":"zz"}},
            {"kind":"t3","data":{"id":"b","title":"Intel","selftext":"body","score":1}}
        ]}}"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.data.after.as_deref(), Some("t3_b"));
        let subs = parse_submissions(listing.data.children);
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[1].selftext, "body");
    }

    #[test]
    fn missing_credentials_fail_fast() {
        let cfg = AppConfig::default();
        assert!(matches!(
            RedditProvider::new(&cfg),
            Err(AnalyzerError::Config(_))
        ));
    }
}
