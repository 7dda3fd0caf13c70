// src/aggregate.rs
//! Per-brand aggregation of snippet scores.
//!
//! Policy: the mean compound score decides the label (unrounded), the stored
//! average is rounded to 3 places for display. Thresholds are inclusive at
//! ±0.05; anything strictly between is Neutral.

use crate::error::Result;
use crate::mentions::BrandMentionSet;
use crate::sentiment::{SentimentScore, SentimentScorer};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

pub const POSITIVE_THRESHOLD: f64 = 0.05;
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandSentimentSummary {
    pub mention_count: usize,
    /// Mean compound score, rounded to 3 decimal places.
    pub avg_compound_score: f64,
    pub sentiment: Sentiment,
    /// One score per snippet, in mention order.
    pub individual_scores: Vec<SentimentScore>,
}

/// Brand → summary. Ordered by brand name; use [`leaderboard`] for ranking.
pub type BrandResults = BTreeMap<String, BrandSentimentSummary>;

/// Number of brands per label. All three labels are always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SentimentCounts {
    #[serde(rename = "Positive")]
    pub positive: usize,
    #[serde(rename = "Neutral")]
    pub neutral: usize,
    #[serde(rename = "Negative")]
    pub negative: usize,
}

impl SentimentCounts {
    pub fn get(&self, label: Sentiment) -> usize {
        match label {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    fn bump(&mut self, label: Sentiment) {
        match label {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Sentiment, usize)> + '_ {
        Sentiment::ALL.into_iter().map(|s| (s, self.get(s)))
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

/// Aggregate totals shown under the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub total_brands: usize,
    pub total_mentions: usize,
    /// Mean of the per-brand (rounded) averages; `None` when no brands.
    pub overall_average: Option<f64>,
}

/// Three-way partition of the compound range.
pub fn classify(compound: f64) -> Sentiment {
    if compound >= POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else if compound <= NEGATIVE_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Rounds on the exact decimal expansion of `x`; scaling by 1000 first
/// would turn values just below a tie into a tie.
pub fn round3(x: f64) -> f64 {
    format!("{x:.3}").parse().unwrap_or(x)
}

/// Score every snippet of every brand and fold into summaries.
/// The first scorer error aborts the whole run.
pub fn summarize<S>(mentions: &BrandMentionSet, scorer: &S) -> Result<BrandResults>
where
    S: SentimentScorer + ?Sized,
{
    let mut results = BrandResults::new();

    for (brand, texts) in mentions {
        if texts.is_empty() {
            continue;
        }

        let individual_scores = texts
            .iter()
            .map(|t| scorer.score(t))
            .collect::<Result<Vec<_>>>()?;

        let total: f64 = individual_scores.iter().map(|s| s.compound).sum();
        let mean = total / individual_scores.len() as f64;

        results.insert(
            brand.clone(),
            BrandSentimentSummary {
                mention_count: individual_scores.len(),
                avg_compound_score: round3(mean),
                sentiment: classify(mean),
                individual_scores,
            },
        );
    }

    Ok(results)
}

pub fn summary_counts(results: &BrandResults) -> SentimentCounts {
    let mut counts = SentimentCounts::default();
    for summary in results.values() {
        counts.bump(summary.sentiment);
    }
    counts
}

/// Brands by descending average score. Stable: ties keep brand-name order.
pub fn leaderboard(results: &BrandResults) -> Vec<(&str, &BrandSentimentSummary)> {
    let mut rows: Vec<_> = results.iter().map(|(b, s)| (b.as_str(), s)).collect();
    rows.sort_by(|a, b| {
        b.1.avg_compound_score
            .partial_cmp(&a.1.avg_compound_score)
            .unwrap_or(Ordering::Equal)
    });
    rows
}

pub fn totals(results: &BrandResults) -> Totals {
    let total_brands = results.len();
    let total_mentions = results.values().map(|s| s.mention_count).sum();
    let overall_average = (total_brands > 0).then(|| {
        results.values().map(|s| s.avg_compound_score).sum::<f64>() / total_brands as f64
    });
    Totals {
        total_brands,
        total_mentions,
        overall_average,
    }
}
