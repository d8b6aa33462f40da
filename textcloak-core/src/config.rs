//! Immutable cipher key material and detection configuration
//!
//! Every table the transforms and detectors rely on lives here, built once
//! and shared read-only for the life of the process. Re-generating a mapping
//! ad hoc would silently break comparisons against previously stored
//! variants, so all of this is pinned: fixed seed, fixed tables, validated
//! at construction.

use crate::errors::{Result, TextCloakError};
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Seed for the monoalphabetic substitution table. Changing this invalidates
/// every previously generated `substitution` variant.
pub const SUBSTITUTION_SEED: u64 = 42;

/// Zero-width space, inserted at even character positions.
pub const ZERO_WIDTH_SPACE: char = '\u{200B}';
/// Zero-width joiner, inserted at odd character positions.
pub const ZERO_WIDTH_JOINER: char = '\u{200D}';

fn alphabet() -> impl Iterator<Item = char> {
    (b'a'..=b'z').map(char::from)
}

/// Key material for every cipher scheme in the catalog.
///
/// Serializable so a deployment can pin its configuration alongside the
/// variants it generated; unvalidated instances (e.g. deserialized from a
/// config file) must pass [`KeyMaterial::validate`] before use — the engine
/// constructor enforces this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyMaterial {
    /// Caesar offset for the single-shift cipher.
    pub caesar_shift: u8,
    /// Shifts applied in sequence by the chained Caesar cipher.
    pub chain_shifts: [u8; 3],
    /// Short repeating Vigenère key.
    pub vigenere_key: String,
    /// Natural-language Vigenère key, emulating realistic key reuse.
    pub vigenere_nl_key: String,
    /// Bijective lowercase-letter substitution mapping.
    pub substitution: BTreeMap<char, char>,
    /// Lowercase letter to emoji glyph.
    pub emoji: BTreeMap<char, char>,
    /// Latin letter to visually similar Cyrillic glyph.
    pub homoglyphs: BTreeMap<char, char>,
    /// Invisible codepoints inserted by the steganographic transform,
    /// alternating by position parity.
    pub stego_markers: [char; 2],
}

impl KeyMaterial {
    /// The pinned production key material. The substitution table is derived
    /// from [`SUBSTITUTION_SEED`] with a seeded Fisher-Yates shuffle, so the
    /// mapping is identical across runs and across hosts.
    pub fn pinned() -> Self {
        let letters: Vec<char> = alphabet().collect();
        let mut shuffled = letters.clone();
        let mut rng = StdRng::seed_from_u64(SUBSTITUTION_SEED);
        shuffled.shuffle(&mut rng);
        let substitution = letters.iter().copied().zip(shuffled).collect();

        let emoji = alphabet()
            .zip([
                '😀', '😃', '😄', '😁', '😆', '😅', '🤣', '😊', '😇', '🙂', '🙃', '😉', '😌',
                '😍', '😘', '😜', '🤓', '😎', '😤', '😱', '🤯', '😈', '👻', '🤖', '👽', '🧠',
            ])
            .collect();

        let homoglyphs = [
            ('a', 'а'),
            ('e', 'е'),
            ('o', 'о'),
            ('p', 'р'),
            ('c', 'с'),
            ('x', 'х'),
            ('y', 'у'),
            ('h', 'һ'),
        ]
        .into_iter()
        .collect();

        Self {
            caesar_shift: 3,
            chain_shifts: [3, 11, 7],
            vigenere_key: "KEY".to_string(),
            vigenere_nl_key: "security".to_string(),
            substitution,
            emoji,
            homoglyphs,
            stego_markers: [ZERO_WIDTH_SPACE, ZERO_WIDTH_JOINER],
        }
    }

    /// Process-wide shared instance, built once.
    pub fn shared() -> &'static KeyMaterial {
        static PINNED: Lazy<KeyMaterial> = Lazy::new(KeyMaterial::pinned);
        &PINNED
    }

    /// Fail-fast integrity check. Malformed key material must be rejected
    /// here, never discovered mid-transform.
    pub fn validate(&self) -> Result<()> {
        for (name, key) in [
            ("vigenere_key", &self.vigenere_key),
            ("vigenere_nl_key", &self.vigenere_nl_key),
        ] {
            if key.is_empty() {
                return Err(TextCloakError::Configuration(format!(
                    "{name} must not be empty"
                )));
            }
            if !key.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(TextCloakError::Configuration(format!(
                    "{name} must be ASCII-alphabetic, got {key:?}"
                )));
            }
        }

        let domain: BTreeSet<char> = alphabet().collect();
        let keys: BTreeSet<char> = self.substitution.keys().copied().collect();
        let values: BTreeSet<char> = self.substitution.values().copied().collect();
        if keys != domain || values != domain {
            return Err(TextCloakError::Configuration(
                "substitution table must be a bijection over a-z".to_string(),
            ));
        }

        if self.emoji.len() != 26 || !self.emoji.keys().copied().eq(alphabet()) {
            return Err(TextCloakError::Configuration(
                "emoji table must map each of a-z".to_string(),
            ));
        }

        if self.homoglyphs.is_empty() {
            return Err(TextCloakError::Configuration(
                "homoglyph table must not be empty".to_string(),
            ));
        }

        if self.stego_markers[0] == self.stego_markers[1] {
            return Err(TextCloakError::Configuration(
                "stego markers must be two distinct codepoints".to_string(),
            ));
        }

        Ok(())
    }

    /// Inverse of the substitution mapping. Only meaningful after
    /// [`validate`](Self::validate) has confirmed bijectivity.
    pub fn substitution_inverse(&self) -> BTreeMap<char, char> {
        self.substitution.iter().map(|(k, v)| (*v, *k)).collect()
    }
}

impl Default for KeyMaterial {
    fn default() -> Self {
        Self::pinned()
    }
}

/// Thresholds and character-class definitions for obfuscation detection.
/// Policy knobs, deliberately separate from the detection algorithm so they
/// can be tuned without touching it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Invisible codepoints that trigger the zero-width tier.
    pub zero_width_chars: BTreeSet<char>,
    /// Inclusive codepoint range treated as emoji.
    pub emoji_range: (u32, u32),
    /// Emoji-count threshold for the emoji tier.
    pub emoji_threshold: usize,
    /// Shannon-entropy threshold (bits) for the high-entropy tier.
    /// Natural language sits around 3.5-4.5 bits over letters.
    pub entropy_threshold: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            zero_width_chars: ['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}']
                .into_iter()
                .collect(),
            emoji_range: (0x1F300, 0x1FAFF),
            emoji_threshold: 5,
            entropy_threshold: 4.5,
        }
    }
}

impl DetectionConfig {
    /// Process-wide shared instance, built once.
    pub fn shared() -> &'static DetectionConfig {
        static DEFAULT: Lazy<DetectionConfig> = Lazy::new(DetectionConfig::default);
        &DEFAULT
    }

    pub fn validate(&self) -> Result<()> {
        if self.zero_width_chars.is_empty() {
            return Err(TextCloakError::Configuration(
                "zero-width marker set must not be empty".to_string(),
            ));
        }
        if self.emoji_range.0 > self.emoji_range.1 {
            return Err(TextCloakError::Configuration(format!(
                "emoji range is inverted: {:#X}..{:#X}",
                self.emoji_range.0, self.emoji_range.1
            )));
        }
        if self.emoji_threshold == 0 {
            return Err(TextCloakError::Configuration(
                "emoji threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_zero_width(&self, c: char) -> bool {
        self.zero_width_chars.contains(&c)
    }

    pub fn in_emoji_range(&self, c: char) -> bool {
        let cp = c as u32;
        self.emoji_range.0 <= cp && cp <= self.emoji_range.1
    }
}
