//! Obfuscation classification
//!
//! Classifies arbitrary text into one of a fixed set of obfuscation-class
//! labels via an ordered, first-match-wins tier list. Structural signals
//! (invisible markers, emoji density) are checked before the coarser
//! entropy heuristic, so the more unambiguous evidence always wins.

use crate::config::DetectionConfig;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Obfuscation-class labels.
///
/// `Unknown` is a reserved label: no current tier produces it, but it stays
/// in the taxonomy as an extension point for future detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObfuscationClass {
    Plain,
    Emoji,
    ZeroWidth,
    HighEntropy,
    Unknown,
}

impl fmt::Display for ObfuscationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObfuscationClass::Plain => write!(f, "plain"),
            ObfuscationClass::Emoji => write!(f, "emoji"),
            ObfuscationClass::ZeroWidth => write!(f, "zero_width"),
            ObfuscationClass::HighEntropy => write!(f, "high_entropy"),
            ObfuscationClass::Unknown => write!(f, "unknown"),
        }
    }
}

/// One detection tier: a named predicate and the label it produces.
/// Exposing the rules as data keeps the priority order auditable and lets
/// new tiers be inserted without restructuring control flow.
pub struct DetectionRule {
    pub name: &'static str,
    pub label: ObfuscationClass,
    predicate: fn(&str, &DetectionConfig) -> bool,
}

impl DetectionRule {
    pub fn matches(&self, text: &str, config: &DetectionConfig) -> bool {
        (self.predicate)(text, config)
    }
}

impl fmt::Debug for DetectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectionRule")
            .field("name", &self.name)
            .field("label", &self.label)
            .finish()
    }
}

fn contains_zero_width(text: &str, config: &DetectionConfig) -> bool {
    text.chars().any(|c| config.is_zero_width(c))
}

fn contains_many_emojis(text: &str, config: &DetectionConfig) -> bool {
    let mut count = 0usize;
    for c in text.chars() {
        if config.in_emoji_range(c) {
            count += 1;
            if count >= config.emoji_threshold {
                return true;
            }
        }
    }
    false
}

fn exceeds_entropy_threshold(text: &str, config: &DetectionConfig) -> bool {
    shannon_entropy(text) > config.entropy_threshold
}

/// Shannon entropy in bits over the lowercase alphabetic characters of
/// `text`. Non-letters are excluded; an empty filtered set has entropy 0.
/// Natural language sits around 3.5-4.5 bits, so substitution- or
/// Vigenère-obfuscated text shows up as an unusually flat distribution.
pub fn shannon_entropy(text: &str) -> f64 {
    let mut counts: HashMap<char, usize> = HashMap::new();
    let mut total = 0usize;
    for c in text.chars().filter(|c| c.is_alphabetic()) {
        for lc in c.to_lowercase() {
            *counts.entry(lc).or_insert(0) += 1;
            total += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    counts
        .values()
        .map(|count| {
            let p = *count as f64 / total as f64;
            -p * p.log2()
        })
        .sum()
}

/// First-match-wins obfuscation classifier over an ordered rule list.
pub struct CipherClassifier {
    config: Arc<DetectionConfig>,
    rules: Vec<DetectionRule>,
}

impl CipherClassifier {
    pub fn new(config: Arc<DetectionConfig>) -> crate::errors::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rules: vec![
                DetectionRule {
                    name: "zero_width_marker",
                    label: ObfuscationClass::ZeroWidth,
                    predicate: contains_zero_width,
                },
                DetectionRule {
                    name: "emoji_density",
                    label: ObfuscationClass::Emoji,
                    predicate: contains_many_emojis,
                },
                DetectionRule {
                    name: "letter_entropy",
                    label: ObfuscationClass::HighEntropy,
                    predicate: exceeds_entropy_threshold,
                },
            ],
        })
    }

    /// The ordered tier list, highest priority first.
    pub fn rules(&self) -> &[DetectionRule] {
        &self.rules
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Classify one text. Pure and deterministic: identical input yields
    /// identical output regardless of call order or prior calls.
    pub fn classify(&self, text: &str) -> ObfuscationClass {
        self.rules
            .iter()
            .find(|rule| rule.matches(text, &self.config))
            .map(|rule| rule.label)
            .unwrap_or(ObfuscationClass::Plain)
    }

    /// Classify many independent texts in parallel.
    pub fn classify_batch(&self, texts: &[String]) -> Vec<ObfuscationClass> {
        texts.par_iter().map(|t| self.classify(t)).collect()
    }
}
