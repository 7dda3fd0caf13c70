// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod lexicon;
pub mod mentions;
pub mod metrics;
pub mod report;
pub mod sentiment;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{BrandResults, BrandSentimentSummary, Sentiment, SentimentCounts};
pub use crate::catalog::BrandCatalog;
pub use crate::config::AppConfig;
pub use crate::engine::{analyze_snippets, AnalysisReport};
pub use crate::error::AnalyzerError;
pub use crate::mentions::{BrandMentionSet, MentionExtractor};
pub use crate::sentiment::{LexiconScorer, SentimentScore, SentimentScorer};
