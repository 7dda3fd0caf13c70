// src/sentiment.rs
//! Sentiment scoring: a stable score record plus the lexicon-based scorer.
//!
//! `LexiconScorer` follows the VADER heuristics: lexicon valence per token,
//! booster/dampener words, negation within the three preceding tokens
//! (with the "never so/this" and "without doubt" exceptions), "least"
//! negation, ALL-CAPS emphasis, the "but" contrast rule and `!`/`?`
//! emphasis. The compound score is normalized into [-1, 1].
//!
//! Not carried over: VADER's multi-word idiom table and its emoji
//! descriptions.

use crate::error::{AnalyzerError, Result};
use crate::lexicon::Lexicon;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const BOOST_INCR: f64 = 0.293;
const BOOST_DECR: f64 = -0.293;
/// Extra emphasis for an ALL-CAPS sentiment word in mixed-case text.
const CAPS_INCR: f64 = 0.733;
const NEGATION_SCALAR: f64 = -0.74;
/// Normalization constant for the compound score.
const ALPHA: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentScore {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
    /// Normalized overall polarity in [-1.0, 1.0].
    pub compound: f64,
}

impl SentimentScore {
    pub fn from_compound(compound: f64) -> Self {
        Self {
            compound,
            ..Self::default()
        }
    }
}

/// Anything that turns a snippet into a [`SentimentScore`].
/// Implementations must be deterministic for identical input.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> Result<SentimentScore>;
}

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "sentiment_snippets_scored_total",
            "Snippets scored by the lexicon scorer."
        );
    });
}

#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: Arc<Lexicon>,
}

impl LexiconScorer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        ensure_metrics_described();
        Self { lexicon }
    }

    #[inline]
    fn in_lexicon(&self, w: &str) -> bool {
        self.lexicon.contains(&w.to_lowercase())
    }

    /// Per-token valences after boosters, caps and negation are applied.
    fn token_valences(&self, tokens: &[&str]) -> Vec<f64> {
        let cap_diff = has_cap_differential(tokens);
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let mut out = Vec::with_capacity(tokens.len());

        for (i, tok) in tokens.iter().enumerate() {
            let lower = lowered[i].as_str();

            // Boosters carry no valence of their own.
            let next_is_of = tokens
                .get(i + 1)
                .is_some_and(|n| n.eq_ignore_ascii_case("of"));
            if booster_scalar(lower).is_some() || (lower == "kind" && next_is_of) {
                out.push(0.0);
                continue;
            }

            let Some(mut valence) = self.lexicon.get(lower) else {
                out.push(0.0);
                continue;
            };

            // "no" directly before another sentiment word only negates it.
            if lower == "no" && tokens.get(i + 1).is_some_and(|n| self.in_lexicon(n)) {
                out.push(0.0);
                continue;
            }

            if cap_diff && is_all_caps(tok) {
                valence += CAPS_INCR.copysign(valence);
            }

            for back in 0..3 {
                if i <= back {
                    break;
                }
                let prev = tokens[i - back - 1];
                if self.in_lexicon(prev) {
                    continue;
                }
                let mut s = scalar_inc_dec(prev, valence, cap_diff);
                if back == 1 {
                    s *= 0.95;
                } else if back == 2 {
                    s *= 0.9;
                }
                valence += s;
                valence = negation_check(valence, &lowered, back, i);
            }
            valence = self.least_check(valence, &lowered, i);

            out.push(valence);
        }

        apply_but_rule(tokens, &mut out);
        out
    }

    /// "least" right before a sentiment word negates it, except in
    /// "at least" and "very least".
    fn least_check(&self, valence: f64, lowered: &[String], i: usize) -> f64 {
        if i == 0 || lowered[i - 1] != "least" || self.lexicon.contains("least") {
            return valence;
        }
        if i > 1 && matches!(lowered[i - 2].as_str(), "at" | "very") {
            return valence;
        }
        valence * NEGATION_SCALAR
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> Result<SentimentScore> {
        let tokens = tokenize(text);
        let valences = self.token_valences(&tokens);
        let score = fold_valences(text, &valences);
        counter!("sentiment_snippets_scored_total").increment(1);

        if !score.compound.is_finite() {
            return Err(AnalyzerError::ScoringFailed(format!(
                "non-finite compound score ({})",
                score.compound
            )));
        }
        Ok(score)
    }
}

/// Whitespace tokens with surrounding ASCII punctuation stripped. Short tokens such
/// as emoticons (":)") are kept as-is; single characters are dropped.
fn tokenize(s: &str) -> Vec<&str> {
    s.split_whitespace()
        .map(|raw| {
            let stripped = raw.trim_matches(|c: char| c.is_ascii_punctuation());
            if stripped.chars().count() <= 2 {
                raw
            } else {
                stripped
            }
        })
        .filter(|t| t.chars().count() > 1)
        .collect()
}

fn is_all_caps(tok: &str) -> bool {
    tok.chars().any(char::is_alphabetic) && !tok.chars().any(char::is_lowercase)
}

/// True when some, but not all, tokens are shouted.
fn has_cap_differential(tokens: &[&str]) -> bool {
    let caps = tokens.iter().filter(|t| is_all_caps(t)).count();
    caps > 0 && caps < tokens.len()
}

fn booster_scalar(lower: &str) -> Option<f64> {
    match lower {
        "absolutely" | "amazingly" | "awfully" | "completely" | "considerably" | "decidedly"
        | "deeply" | "enormously" | "entirely" | "especially" | "exceptionally" | "extremely"
        | "fabulously" | "fully" | "greatly" | "highly" | "hugely" | "incredibly"
        | "intensely" | "majorly" | "more" | "most" | "particularly" | "purely" | "quite"
        | "really" | "remarkably" | "so" | "substantially" | "thoroughly" | "totally"
        | "tremendously" | "truly" | "unbelievably" | "unusually" | "utterly" | "very" => {
            Some(BOOST_INCR)
        }
        "almost" | "barely" | "hardly" | "kinda" | "kindof" | "less" | "little"
        | "marginally" | "occasionally" | "partly" | "scarcely" | "slightly" | "somewhat"
        | "sorta" | "sortof" => Some(BOOST_DECR),
        _ => None,
    }
}

fn scalar_inc_dec(word: &str, valence: f64, cap_diff: bool) -> f64 {
    let Some(mut scalar) = booster_scalar(&word.to_lowercase()) else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if cap_diff && is_all_caps(word) {
        if valence > 0.0 {
            scalar += CAPS_INCR;
        } else {
            scalar -= CAPS_INCR;
        }
    }
    scalar
}

fn is_negator(tok: &str) -> bool {
    tok.contains("n't")
        || matches!(
            tok,
            "not"
                | "no"
                | "never"
                | "none"
                | "nope"
                | "nor"
                | "neither"
                | "nothing"
                | "nowhere"
                | "cannot"
                | "without"
                | "rarely"
                | "seldom"
                | "despite"
                | "aint"
                | "arent"
                | "cant"
                | "couldnt"
                | "didnt"
                | "doesnt"
                | "dont"
                | "hadnt"
                | "hasnt"
                | "havent"
                | "isnt"
                | "shouldnt"
                | "wasnt"
                | "werent"
                | "wont"
                | "wouldnt"
        )
}

/// Negation by the token `back + 1` places before `i`. "never so good" and
/// "never this good" intensify instead, "without doubt" leaves it alone.
fn negation_check(valence: f64, lowered: &[String], back: usize, i: usize) -> f64 {
    let w = |k: usize| lowered[i - k].as_str();
    let so_or_this = |t: &str| t == "so" || t == "this";

    match back {
        0 => {
            if is_negator(w(1)) {
                return valence * NEGATION_SCALAR;
            }
        }
        1 => {
            if w(2) == "never" && so_or_this(w(1)) {
                return valence * 1.25;
            }
            if w(2) == "without" && w(1) == "doubt" {
                return valence;
            }
            if is_negator(w(2)) {
                return valence * NEGATION_SCALAR;
            }
        }
        _ => {
            if (w(3) == "never" && so_or_this(w(2))) || so_or_this(w(1)) {
                return valence * 1.25;
            }
            if w(3) == "without" && (w(2) == "doubt" || w(1) == "doubt") {
                return valence;
            }
            if is_negator(w(3)) {
                return valence * NEGATION_SCALAR;
            }
        }
    }
    valence
}

/// Sentiment before "but" is halved, after it amplified by half.
fn apply_but_rule(tokens: &[&str], valences: &mut [f64]) {
    let Some(pivot) = tokens.iter().position(|t| t.eq_ignore_ascii_case("but")) else {
        return;
    };
    for (i, v) in valences.iter_mut().enumerate() {
        if i < pivot {
            *v *= 0.5;
        } else if i > pivot {
            *v *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let bangs = text.matches('!').count().min(4) as f64;
    let qm = text.matches('?').count();
    let qm_amp = match qm {
        0 | 1 => 0.0,
        2..=3 => qm as f64 * 0.18,
        _ => 0.96,
    };
    bangs * 0.292 + qm_amp
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round_to(x: f64, places: usize) -> f64 {
    format!("{x:.places$}").parse().unwrap_or(x)
}

fn fold_valences(text: &str, valences: &[f64]) -> SentimentScore {
    if valences.is_empty() {
        return SentimentScore::default();
    }

    let emphasis = punctuation_emphasis(text);
    let mut sum: f64 = valences.iter().sum();
    if sum > 0.0 {
        sum += emphasis;
    } else if sum < 0.0 {
        sum -= emphasis;
    }
    let compound = normalize(sum);

    let mut pos = 0.0;
    let mut neg = 0.0;
    let mut neu = 0.0;
    for &v in valences {
        if v > 0.0 {
            pos += v + 1.0;
        } else if v < 0.0 {
            neg += v - 1.0;
        } else {
            neu += 1.0;
        }
    }
    if pos > neg.abs() {
        pos += emphasis;
    } else if pos < neg.abs() {
        neg -= emphasis;
    }

    let total = pos + neg.abs() + neu;
    if total == 0.0 {
        return SentimentScore::from_compound(round_to(compound, 4));
    }
    SentimentScore {
        negative: round_to((neg / total).abs(), 3),
        neutral: round_to((neu / total).abs(), 3),
        positive: round_to((pos / total).abs(), 3),
        compound: round_to(compound, 4),
    }
}
