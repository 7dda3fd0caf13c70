// src/mentions.rs
//! Brand mention extraction: one whole-word, case-insensitive matcher per
//! catalog brand, applied to every snippet.
//!
//! Brand names are escaped literally before being wrapped in `\b`, so
//! "G.Skill" or "Western Digital" match as phrases and "AMD" does not match
//! inside "RAMDisk".

use crate::catalog::BrandCatalog;
use crate::error::{AnalyzerError, Result};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::debug;

/// Snippets whose trimmed length is below this are ignored.
pub const MIN_SNIPPET_CHARS: usize = 3;

/// Lowercased brand → snippets (original text) it was found in, in scan order.
pub type BrandMentionSet = BTreeMap<String, Vec<String>>;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "mentions_snippets_scanned_total",
            "Snippets run through the brand matchers."
        );
        describe_counter!(
            "mentions_snippets_skipped_total",
            "Snippets skipped as empty or too short."
        );
        describe_counter!(
            "mentions_matches_total",
            "Brand/snippet pairs recorded as mentions."
        );
    });
}

/// Short anonymized id for a snippet; raw text never goes to the logs.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// A lowercased brand paired with its whole-word matcher.
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    brand: String,
    re: Regex,
}

impl CompiledMatcher {
    pub fn new(brand: &str) -> Result<Self> {
        let brand = brand.to_lowercase();
        let pattern = format!(r"(?i)\b{}\b", regex::escape(&brand));
        let re = Regex::new(&pattern).map_err(|e| AnalyzerError::CatalogMalformed {
            path: PathBuf::new(),
            reason: format!("brand `{brand}` cannot be compiled: {e}"),
        })?;
        Ok(Self { brand, re })
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// `text` is expected to be lowercased already.
    pub fn is_match(&self, text: &str) -> bool {
        self.re.is_match(text)
    }
}

/// Read-only after construction; safe to share across threads.
#[derive(Debug, Clone)]
pub struct MentionExtractor {
    matchers: Vec<CompiledMatcher>,
}

impl MentionExtractor {
    /// Compile one matcher per unique lowercased brand in the catalog.
    pub fn new(catalog: &BrandCatalog) -> Result<Self> {
        Self::from_brands(catalog.all_brands())
    }

    pub fn from_brands<I, S>(brands: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ensure_metrics_described();
        let unique: BTreeSet<String> = brands
            .into_iter()
            .map(|b| b.as_ref().to_lowercase())
            .filter(|b| !b.trim().is_empty())
            .collect();
        let matchers = unique
            .iter()
            .map(|b| CompiledMatcher::new(b))
            .collect::<Result<Vec<_>>>()?;
        debug!(target: "mentions", matchers = matchers.len(), "brand matchers compiled");
        Ok(Self { matchers })
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Every brand with at least one whole-word occurrence in `text`.
    /// Overlapping brands ("amd" and "amd ryzen") are all reported.
    pub fn find_brands_in(&self, text: &str) -> BTreeSet<String> {
        if text.trim().is_empty() {
            return BTreeSet::new();
        }
        let lowered = text.to_lowercase();
        self.matchers
            .iter()
            .filter(|m| m.is_match(&lowered))
            .map(|m| m.brand().to_string())
            .collect()
    }

    /// Group snippets by the brands they mention. Short snippets are skipped;
    /// repeated snippets are recorded once per occurrence.
    pub fn extract_mentions<S: AsRef<str>>(&self, snippets: &[S]) -> BrandMentionSet {
        let mut out = BrandMentionSet::new();
        let mut skipped = 0u64;

        for snippet in snippets {
            let text = snippet.as_ref();
            if text.trim().chars().count() < MIN_SNIPPET_CHARS {
                skipped += 1;
                continue;
            }

            let found = self.find_brands_in(text);
            if found.is_empty() {
                continue;
            }
            debug!(
                target: "mentions",
                id = %anon_hash(text),
                brands = ?found,
                "snippet matched"
            );
            counter!("mentions_matches_total").increment(found.len() as u64);
            for brand in found {
                out.entry(brand).or_default().push(text.to_string());
            }
        }

        counter!("mentions_snippets_scanned_total").increment(snippets.len() as u64 - skipped);
        counter!("mentions_snippets_skipped_total").increment(skipped);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor(brands: &[&str]) -> MentionExtractor {
        MentionExtractor::from_brands(brands.iter().copied()).unwrap()
    }

    #[test]
    fn whole_word_only() {
        let ex = extractor(&["AMD"]);
        assert!(ex.find_brands_in("AMD Ryzen CPU").contains("amd"));
        assert!(ex.find_brands_in("amd").contains("amd"));
        assert!(ex.find_brands_in("Got an (AMD), finally!").contains("amd"));
        assert!(ex.find_brands_in("RAMDisk").is_empty());
        assert!(ex.find_brands_in("amd_fan").is_empty());
    }

    #[test]
    fn matcher_reports_lowercased_brand() {
        let m = CompiledMatcher::new("Western Digital").unwrap();
        assert_eq!(m.brand(), "western digital");
        assert!(m.is_match("my western digital drive"));
    }

    #[test]
    fn punctuation_and_phrases_are_literal() {
        let ex = extractor(&["G.Skill", "Western Digital"]);
        let found = ex.find_brands_in("g.skill ram and a western digital drive");
        assert_eq!(found.len(), 2);
        // `.` is escaped, so it does not act as a wildcard.
        assert!(ex.find_brands_in("gxskill").is_empty());
        assert!(ex.find_brands_in("western  digital").is_empty());
    }

    #[test]
    fn overlapping_brands_are_all_reported() {
        let ex = extractor(&["AMD", "AMD Ryzen"]);
        let found = ex.find_brands_in("my AMD Ryzen rig");
        assert!(found.contains("amd") && found.contains("amd ryzen"));
    }

    #[test]
    fn blank_text_finds_nothing() {
        let ex = extractor(&["AMD"]);
        assert!(ex.find_brands_in("").is_empty());
        assert!(ex.find_brands_in("   \n").is_empty());
    }

    #[test]
    fn duplicates_are_kept_per_occurrence() {
        let ex = extractor(&["Intel"]);
        let snippets = ["Intel again", "Intel again", "no brand here"];
        let out = ex.extract_mentions(&snippets);
        assert_eq!(out["intel"], vec!["Intel again", "Intel again"]);
    }

    #[test]
    fn anon_hash_is_short_hex() {
        let h = anon_hash("hello");
        assert_eq!(h.len(), 12);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
