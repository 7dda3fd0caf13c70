// src/catalog.rs
//! Brand catalog: category → ordered brand names, loaded once at startup.
//!
//! Supported formats:
//! - JSON object: `{ "cpu": ["AMD", "Intel"], "gpu": ["Nvidia"] }` (default)
//! - TOML table:  `cpu = ["AMD", "Intel"]` (when the file ends in `.toml`)
//!
//! Categories keep their file order. Brand lookups are case-insensitive.

use crate::error::{AnalyzerError, Result};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Sentinel returned by [`BrandCatalog::category_of`] for brands outside the catalog.
pub const UNKNOWN_CATEGORY: &str = "unknown";

#[derive(Debug, Clone, Default)]
pub struct BrandCatalog {
    categories: Vec<(String, Vec<String>)>,
    /// lowercased brand → index into `categories` (first category wins)
    index: HashMap<String, usize>,
}

impl BrandCatalog {
    /// Load the catalog from `path`. With `strict`, a brand listed under two
    /// different categories is rejected instead of resolving to the first one.
    pub fn load(path: &Path, strict: bool) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => AnalyzerError::CatalogNotFound {
                path: path.to_path_buf(),
            },
            _ => malformed(path, format!("unreadable: {e}")),
        })?;

        let is_toml = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let raw = if is_toml {
            parse_toml(&content)
        } else {
            parse_json(&content)
        }
        .map_err(|reason| malformed(path, reason))?;

        let catalog = Self::build(raw, strict).map_err(|reason| malformed(path, reason))?;
        info!(
            target: "catalog",
            path = %path.display(),
            categories = catalog.categories.len(),
            brands = catalog.index.len(),
            "brand catalog loaded"
        );
        Ok(catalog)
    }

    /// Build directly from `(category, brands)` pairs (non-strict).
    pub fn from_categories<I, C, B>(categories: I) -> Self
    where
        I: IntoIterator<Item = (C, Vec<B>)>,
        C: Into<String>,
        B: Into<String>,
    {
        let raw = categories
            .into_iter()
            .map(|(c, bs)| (c.into(), bs.into_iter().map(Into::into).collect()))
            .collect();
        // Non-strict build cannot fail.
        Self::build(raw, false).unwrap_or_default()
    }

    fn build(raw: Vec<(String, Vec<String>)>, strict: bool) -> std::result::Result<Self, String> {
        let mut categories = Vec::with_capacity(raw.len());
        let mut index: HashMap<String, usize> = HashMap::new();

        for (category, brands) in raw {
            let idx = categories.len();
            let mut kept = Vec::with_capacity(brands.len());
            for brand in brands {
                if brand.trim().is_empty() {
                    warn!(target: "catalog", %category, "skipping blank brand name");
                    continue;
                }
                let lower = brand.to_lowercase();
                match index.get(&lower).copied() {
                    Some(prev) if prev != idx => {
                        let prev_cat: &(String, Vec<String>) = &categories[prev];
                        if strict {
                            return Err(format!(
                                "brand `{brand}` is listed under both `{}` and `{category}`",
                                prev_cat.0
                            ));
                        }
                        warn!(
                            target: "catalog",
                            %brand, first = %prev_cat.0, duplicate = %category,
                            "brand listed in several categories; first one wins"
                        );
                    }
                    Some(_) => {}
                    None => {
                        index.insert(lower, idx);
                    }
                }
                kept.push(brand);
            }
            categories.push((category, kept));
        }

        Ok(Self { categories, index })
    }

    /// Union of all brands, lowercased, deduplicated and sorted.
    pub fn all_brands(&self) -> BTreeSet<String> {
        self.index.keys().cloned().collect()
    }

    /// Category the brand was loaded under, or `"unknown"`.
    pub fn category_of(&self, brand: &str) -> &str {
        self.index
            .get(&brand.to_lowercase())
            .map(|&i| self.categories[i].0.as_str())
            .unwrap_or(UNKNOWN_CATEGORY)
    }

    /// Categories in file order.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(c, bs)| (c.as_str(), bs.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

fn malformed(path: &Path, reason: String) -> AnalyzerError {
    AnalyzerError::CatalogMalformed {
        path: PathBuf::from(path),
        reason,
    }
}

fn parse_json(s: &str) -> std::result::Result<Vec<(String, Vec<String>)>, String> {
    let root: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(s).map_err(|e| format!("invalid JSON: {e}"))?;
    root.into_iter()
        .map(|(category, v)| {
            let brands: Vec<String> = serde_json::from_value(v)
                .map_err(|_| format!("category `{category}` must be a list of strings"))?;
            Ok((category, brands))
        })
        .collect()
}

fn parse_toml(s: &str) -> std::result::Result<Vec<(String, Vec<String>)>, String> {
    let root: toml::Table = toml::from_str(s).map_err(|e| format!("invalid TOML: {e}"))?;
    root.into_iter()
        .map(|(category, v)| {
            let brands: Vec<String> = v
                .try_into()
                .map_err(|_| format!("category `{category}` must be a list of strings"))?;
            Ok((category, brands))
        })
        .collect()
}
