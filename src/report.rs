// src/report.rs
//! Console rendering of an [`AnalysisReport`]: ranked table, summary block,
//! or JSON. Everything returns `String`; the binary decides where it goes.

use crate::aggregate::{leaderboard, Sentiment};
use crate::engine::AnalysisReport;
use std::fmt::Write as _;

const RULE_WIDTH: usize = 60;

pub fn header(subreddit: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule}\nBrand Sentiment Analyzer\nr/{subreddit} Sentiment Analysis Tool\n{rule}\n")
}

fn icon(s: Sentiment) -> &'static str {
    match s {
        Sentiment::Positive => "😊",
        Sentiment::Neutral => "😐",
        Sentiment::Negative => "😞",
    }
}

/// "g.skill" → "G.Skill", "western digital" → "Western Digital".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Whole numbers keep one decimal ("0.0", "1.0").
fn fmt_score(x: f64) -> String {
    if x.fract() == 0.0 {
        format!("{x:.1}")
    } else {
        format!("{x}")
    }
}

/// Ranked table plus summary. Empty results render a single notice.
pub fn render_text(report: &AnalysisReport) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "\n{rule}\nSENTIMENT ANALYSIS RESULTS\n{rule}");

    if report.is_empty() {
        let _ = writeln!(out, "No brand mentions found in the analyzed posts.");
        return out;
    }

    let _ = writeln!(
        out,
        "\n{:<20} {:<10} {:<8} {:<10}",
        "Brand", "Mentions", "Score", "Sentiment"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    for (brand, s) in leaderboard(&report.results) {
        let _ = writeln!(
            out,
            "{:<20} {:<10} {:<8} {:<10} {}",
            title_case(brand),
            s.mention_count,
            fmt_score(s.avg_compound_score),
            s.sentiment.as_str(),
            icon(s.sentiment)
        );
    }

    let _ = writeln!(out, "\n{rule}\nSUMMARY\n{rule}");
    let _ = writeln!(out, "Total brands analyzed: {}", report.totals.total_brands);
    for (label, n) in report.summary.iter() {
        let _ = writeln!(out, "{label} sentiment: {n} brands");
    }
    let _ = writeln!(out, "Total mentions: {}", report.totals.total_mentions);
    if let Some(avg) = report.totals.overall_average {
        let _ = writeln!(out, "Overall average sentiment: {avg:.3}");
    }
    out
}

pub fn render_json(report: &AnalysisReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{self, BrandResults, BrandSentimentSummary};
    use crate::sentiment::SentimentScore;

    fn report(rows: &[(&str, f64, usize)]) -> AnalysisReport {
        let mut results = BrandResults::new();
        for &(brand, avg, n) in rows {
            results.insert(
                brand.to_string(),
                BrandSentimentSummary {
                    mention_count: n,
                    avg_compound_score: avg,
                    sentiment: aggregate::classify(avg),
                    individual_scores: vec![SentimentScore::from_compound(avg); n],
                },
            );
        }
        AnalysisReport {
            summary: aggregate::summary_counts(&results),
            totals: aggregate::totals(&results),
            results,
        }
    }

    #[test]
    fn title_case_matches_brand_display() {
        assert_eq!(title_case("amd"), "Amd");
        assert_eq!(title_case("g.skill"), "G.Skill");
        assert_eq!(title_case("western digital"), "Western Digital");
        assert_eq!(title_case("be quiet!"), "Be Quiet!");
    }

    #[test]
    fn table_is_ranked_and_summarized() {
        let text = render_text(&report(&[("intel", -0.2, 1), ("amd", 0.6, 2)]));
        let amd = text.find("Amd").unwrap();
        let intel = text.find("Intel").unwrap();
        assert!(amd < intel);
        assert!(text.contains("Positive sentiment: 1 brands"));
        assert!(text.contains("Neutral sentiment: 0 brands"));
        assert!(text.contains("Total mentions: 3"));
        assert!(text.contains("Overall average sentiment: 0.200"));
    }

    #[test]
    fn empty_report_has_notice_only() {
        let text = render_text(&report(&[]));
        assert!(text.contains("No brand mentions found"));
        assert!(!text.contains("SUMMARY"));
    }

    #[test]
    fn json_carries_results_and_counts() {
        let json = render_json(&report(&[("amd", 0.0, 1)])).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["results"]["amd"]["sentiment"], "Neutral");
        assert_eq!(v["summary"]["Neutral"], 1);
        assert_eq!(v["totals"]["total_mentions"], 1);
    }

    #[test]
    fn whole_scores_keep_a_decimal() {
        assert_eq!(fmt_score(0.0), "0.0");
        assert_eq!(fmt_score(0.133), "0.133");
    }
}
