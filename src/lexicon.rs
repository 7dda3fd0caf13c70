// src/lexicon.rs
//! Word-valence lexicon used by the sentiment scorer.
//!
//! The file uses the VADER layout: `token<TAB>mean<TAB>std<TAB>raw ratings`;
//! only the first two columns are read. On first use the lexicon is loaded
//! from disk, downloaded into place if it is missing, and memoized for the
//! rest of the process. Failed attempts are not cached.

use crate::error::{AnalyzerError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

static SHARED: OnceCell<Arc<Lexicon>> = OnceCell::const_new();

/// Where the lexicon lives and where to fetch it from when absent.
#[derive(Debug, Clone)]
pub struct LexiconSource {
    pub path: PathBuf,
    pub url: String,
}

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    valences: HashMap<String, f64>,
}

impl Lexicon {
    /// Parse the tab-separated lexicon. Malformed lines are skipped; a file
    /// without a single usable entry is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut valences = HashMap::new();
        let mut bad = 0usize;

        for line in raw.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let mut cols = line.split('\t');
            let (Some(token), Some(mean)) = (cols.next(), cols.next()) else {
                bad += 1;
                continue;
            };
            match mean.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && !token.is_empty() => {
                    valences.insert(token.to_lowercase(), v);
                }
                _ => bad += 1,
            }
        }

        if bad > 0 {
            warn!(target: "lexicon", skipped = bad, "skipped malformed lexicon lines");
        }
        if valences.is_empty() {
            return Err(AnalyzerError::LexiconUnavailable(
                "lexicon contains no usable entries".to_string(),
            ));
        }
        Ok(Self { valences })
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            valences: pairs
                .into_iter()
                .map(|(w, v)| (w.into().to_lowercase(), v))
                .collect(),
        }
    }

    /// Valence for a lowercased token.
    #[inline]
    pub fn get(&self, token: &str) -> Option<f64> {
        self.valences.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.valences.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

/// Process-wide lexicon, initialized at most once.
pub async fn ensure_lexicon(source: &LexiconSource) -> Result<Arc<Lexicon>> {
    SHARED
        .get_or_try_init(|| load_or_fetch(source))
        .await
        .cloned()
}

/// Load from `source.path`, downloading from `source.url` first if the file is missing.
pub async fn load_or_fetch(source: &LexiconSource) -> Result<Arc<Lexicon>> {
    if !source.path.exists() {
        fetch_to(&source.url, &source.path).await?;
    }

    let raw = tokio::fs::read_to_string(&source.path)
        .await
        .map_err(|e| unavailable(format!("reading {}: {e}", source.path.display())))?;
    let lexicon = Lexicon::parse(&raw)?;
    info!(
        target: "lexicon",
        path = %source.path.display(),
        entries = lexicon.len(),
        "sentiment lexicon ready"
    );
    Ok(Arc::new(lexicon))
}

async fn fetch_to(url: &str, path: &Path) -> Result<()> {
    info!(target: "lexicon", %url, "lexicon missing locally; downloading");

    let resp = reqwest::get(url)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| unavailable(format!("downloading {url}: {e}")))?;
    let body = resp
        .text()
        .await
        .map_err(|e| unavailable(format!("reading body from {url}: {e}")))?;

    // Validate before writing so a bad download never lands in the cache.
    Lexicon::parse(&body)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| unavailable(format!("creating {}: {e}", dir.display())))?;
    }
    tokio::fs::write(path, body)
        .await
        .map_err(|e| unavailable(format!("writing {}: {e}", path.display())))?;
    Ok(())
}

fn unavailable(msg: String) -> AnalyzerError {
    AnalyzerError::LexiconUnavailable(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vader_layout() {
        let raw = "good\t1.9\t0.9\t[2, 2, 1]\nbad\t-2.5\t0.5\t[-3, -2]\n";
        let lex = Lexicon::parse(raw).unwrap();
        assert_eq!(lex.len(), 2);
        assert_eq!(lex.get("good"), Some(1.9));
        assert_eq!(lex.get("bad"), Some(-2.5));
        assert_eq!(lex.get("meh"), None);
    }

    #[test]
    fn skips_malformed_lines() {
        let raw = "good\t1.9\nbroken line\nugly\tNaN\n\nlove\t3.2\t0.4";
        let lex = Lexicon::parse(raw).unwrap();
        assert_eq!(lex.len(), 2);
        assert!(lex.contains("love"));
    }

    #[test]
    fn empty_lexicon_is_unavailable() {
        let err = Lexicon::parse("nothing here\n").unwrap_err();
        assert!(matches!(err, AnalyzerError::LexiconUnavailable(_)));
    }

    #[tokio::test]
    async fn loads_existing_file_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lex.txt");
        std::fs::write(&path, "great\t3.1\t0.5\n").unwrap();
        let src = LexiconSource {
            path,
            // never contacted because the file exists
            url: "http://127.0.0.1:9/unused".into(),
        };
        let lex = load_or_fetch(&src).await.unwrap();
        assert_eq!(lex.get("great"), Some(3.1));
    }

    #[tokio::test]
    async fn missing_file_and_unreachable_url_fails() {
        let dir = tempfile::tempdir().unwrap();
        let src = LexiconSource {
            path: dir.path().join("absent.txt"),
            url: "http://127.0.0.1:9/vader_lexicon.txt".into(),
        };
        let err = load_or_fetch(&src).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::LexiconUnavailable(_)));
        assert!(!src.path.exists());
    }
}
