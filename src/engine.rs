// src/engine.rs
//! # Analysis Engine
//! Pure pipeline: snippets → brand mentions → per-brand summaries.
//! No I/O; the scorer is injected so runs are reproducible in tests.

use crate::aggregate::{self, BrandResults, SentimentCounts, Totals};
use crate::error::Result;
use crate::mentions::{BrandMentionSet, MentionExtractor};
use crate::sentiment::SentimentScorer;
use metrics::{describe_gauge, gauge};
use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub results: BrandResults,
    pub summary: SentimentCounts,
    pub totals: Totals,
}

impl AnalysisReport {
    /// "No brands found" is a valid, successful outcome.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_gauge!(
            "analysis_brands_found",
            "Distinct brands with at least one mention in the last run."
        );
    });
}

/// Aggregate an already extracted mention set.
pub fn analyze_mentions<S>(mentions: &BrandMentionSet, scorer: &S) -> Result<AnalysisReport>
where
    S: SentimentScorer + ?Sized,
{
    ensure_metrics_described();

    let results = aggregate::summarize(mentions, scorer)?;
    let summary = aggregate::summary_counts(&results);
    let totals = aggregate::totals(&results);

    gauge!("analysis_brands_found").set(results.len() as f64);
    info!(
        target: "engine",
        brands = totals.total_brands,
        mentions = totals.total_mentions,
        positive = summary.positive,
        neutral = summary.neutral,
        negative = summary.negative,
        "analysis complete"
    );

    Ok(AnalysisReport {
        results,
        summary,
        totals,
    })
}

/// Full core pipeline over raw snippets.
pub fn analyze_snippets<T, S>(
    snippets: &[T],
    extractor: &MentionExtractor,
    scorer: &S,
) -> Result<AnalysisReport>
where
    T: AsRef<str>,
    S: SentimentScorer + ?Sized,
{
    let mentions = extractor.extract_mentions(snippets);
    info!(
        target: "engine",
        snippets = snippets.len(),
        brands = mentions.len(),
        "mentions extracted"
    );
    analyze_mentions(&mentions, scorer)
}
