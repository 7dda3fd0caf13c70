// src/config/app.rs
//! Process configuration, built once at startup and passed down explicitly.
//!
//! Values come from the environment (after `.env` is loaded by the binary) and
//! can be overridden by CLI flags. Nothing else in the crate reads env vars.

use crate::error::{AnalyzerError, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "PCPartsSentiment/1.0";
pub const DEFAULT_SUBREDDIT: &str = "pcbuilds";
pub const DEFAULT_MAX_POSTS: usize = 100;
pub const DEFAULT_RATE_LIMIT_DELAY_SECS: u64 = 2;
pub const DEFAULT_COMMENTS_PER_POST: usize = 20;
pub const DEFAULT_BRANDS_FILE: &str = "config/brands.json";
pub const DEFAULT_LEXICON_PATH: &str = "data/vader_lexicon.txt";
pub const DEFAULT_LEXICON_URL: &str =
    "https://raw.githubusercontent.com/cjhutto/vaderSentiment/master/vaderSentiment/vader_lexicon.txt";

/// Reddit API credentials. Username/password are optional (client-credentials grant).
#[derive(Debug, Clone, Default)]
pub struct RedditCredentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub user_agent: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub reddit: RedditCredentials,
    pub subreddit: String,
    pub max_posts: usize,
    pub rate_limit_delay: Duration,
    pub comments_per_post: usize,
    pub brands_file: PathBuf,
    pub lexicon_path: PathBuf,
    pub lexicon_url: String,
    /// Reject brands listed under more than one category.
    pub strict_catalog: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reddit: RedditCredentials {
                user_agent: DEFAULT_USER_AGENT.to_string(),
                ..RedditCredentials::default()
            },
            subreddit: DEFAULT_SUBREDDIT.to_string(),
            max_posts: DEFAULT_MAX_POSTS,
            rate_limit_delay: Duration::from_secs(DEFAULT_RATE_LIMIT_DELAY_SECS),
            comments_per_post: DEFAULT_COMMENTS_PER_POST,
            brands_file: PathBuf::from(DEFAULT_BRANDS_FILE),
            lexicon_path: PathBuf::from(DEFAULT_LEXICON_PATH),
            lexicon_url: DEFAULT_LEXICON_URL.to_string(),
            strict_catalog: false,
        }
    }
}

impl AppConfig {
    /// Build from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values behave like unset ones.
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut cfg = Self::default();

        cfg.reddit.client_id = get("REDDIT_CLIENT_ID");
        cfg.reddit.client_secret = get("REDDIT_CLIENT_SECRET");
        cfg.reddit.username = get("REDDIT_USERNAME");
        cfg.reddit.password = get("REDDIT_PASSWORD");
        if let Some(ua) = get("REDDIT_USER_AGENT") {
            cfg.reddit.user_agent = ua;
        }

        if let Some(sub) = get("SUBREDDIT") {
            cfg.subreddit = sub.trim_start_matches("r/").to_string();
        }
        if let Some(n) = get("MAX_POSTS") {
            cfg.max_posts = parse_number("MAX_POSTS", &n)?;
        }
        if let Some(n) = get("RATE_LIMIT_DELAY") {
            cfg.rate_limit_delay = Duration::from_secs(parse_number("RATE_LIMIT_DELAY", &n)?);
        }
        if let Some(n) = get("COMMENTS_PER_POST") {
            cfg.comments_per_post = parse_number("COMMENTS_PER_POST", &n)?;
        }
        if let Some(p) = get("BRANDS_FILE") {
            cfg.brands_file = PathBuf::from(p);
        }
        if let Some(p) = get("LEXICON_PATH") {
            cfg.lexicon_path = PathBuf::from(p);
        }
        if let Some(u) = get("LEXICON_URL") {
            cfg.lexicon_url = u;
        }
        if let Some(v) = get("STRICT_CATALOG") {
            cfg.strict_catalog = parse_flag(&v);
        }

        Ok(cfg)
    }

    /// Reddit credentials are only needed when the live provider is used.
    pub fn validate_reddit(&self) -> Result<()> {
        if self.reddit.client_id.is_none() || self.reddit.client_secret.is_none() {
            return Err(AnalyzerError::Config(
                "Reddit API credentials are required (REDDIT_CLIENT_ID / REDDIT_CLIENT_SECRET)"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.parse::<T>()
        .map_err(|_| AnalyzerError::Config(format!("{key} must be a non-negative integer, got `{raw}`")))
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
