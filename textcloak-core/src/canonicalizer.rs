//! Text canonicalization
//!
//! Reduces arbitrary (possibly obfuscated) text to a normalized analysis
//! form, in a fixed order: NFKC compatibility normalization, invisible
//! marker removal, emoji-to-token replacement, lowercasing. Idempotent:
//! canonicalizing an already-canonical string returns it unchanged.
//!
//! Known gap, intentionally preserved: NFKC only folds homoglyphs that have
//! a compatibility mapping to their Latin counterpart (fullwidth forms,
//! ligatures). Look-alikes from unrelated scripts — the Cyrillic glyphs the
//! homoglyph cipher uses — survive canonicalization unchanged. Do not paper
//! over this with a transliteration table.

use crate::config::DetectionConfig;
use std::sync::Arc;
use unicode_normalization::UnicodeNormalization;

/// Placeholder token substituted for each emoji-range codepoint.
pub const EMOJI_PLACEHOLDER: &str = "<EMOJI>";

/// Canonicalization options. Explicit and enumerated rather than an
/// open-ended map, so future toggles are typed and discoverable; currently
/// there are none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct CanonicalizeOptions {}

impl CanonicalizeOptions {
    pub fn new() -> Self {
        Self {}
    }
}

pub struct Canonicalizer {
    config: Arc<DetectionConfig>,
}

impl Canonicalizer {
    pub fn new(config: Arc<DetectionConfig>) -> Self {
        Self { config }
    }

    /// Canonicalize `text`. Absent input yields the empty string — this is
    /// the one boundary where a missing value is coerced rather than
    /// rejected.
    pub fn canonicalize(&self, text: Option<&str>, _options: &CanonicalizeOptions) -> String {
        let Some(text) = text else {
            return String::new();
        };

        let normalized: String = text.nfkc().collect();

        let mut out = String::with_capacity(normalized.len());
        for c in normalized.chars() {
            if self.config.is_zero_width(c) {
                continue;
            }
            if self.config.in_emoji_range(c) {
                out.push_str(EMOJI_PLACEHOLDER);
            } else {
                out.push(c);
            }
        }

        out.to_lowercase()
    }
}
