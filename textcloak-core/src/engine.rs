//! Deterministic cipher transformation engine
//!
//! Maps a plaintext prompt to a fixed catalog of ten named obfuscation
//! variants. Every transform is a pure function of its input and the pinned
//! key material: total over arbitrary Unicode (including the empty string),
//! with unmapped characters passing through unchanged.

use crate::config::KeyMaterial;
use crate::errors::{Result, TextCloakError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// A base prompt supplied by the corpus builder. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaintextPrompt {
    pub id: String,
    pub text: String,
}

/// The ten catalog entries, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CipherKind {
    Plain,
    Caesar,
    Vigenere,
    Substitution,
    Emoji,
    Stego,
    CaesarChain,
    VigenereNl,
    Homoglyph,
    HybridStego,
}

impl CipherKind {
    pub const ALL: [CipherKind; 10] = [
        CipherKind::Plain,
        CipherKind::Caesar,
        CipherKind::Vigenere,
        CipherKind::Substitution,
        CipherKind::Emoji,
        CipherKind::Stego,
        CipherKind::CaesarChain,
        CipherKind::VigenereNl,
        CipherKind::Homoglyph,
        CipherKind::HybridStego,
    ];
}

impl fmt::Display for CipherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherKind::Plain => write!(f, "plain"),
            CipherKind::Caesar => write!(f, "caesar"),
            CipherKind::Vigenere => write!(f, "vigenere"),
            CipherKind::Substitution => write!(f, "substitution"),
            CipherKind::Emoji => write!(f, "emoji"),
            CipherKind::Stego => write!(f, "stego"),
            CipherKind::CaesarChain => write!(f, "caesar_chain"),
            CipherKind::VigenereNl => write!(f, "vigenere_nl"),
            CipherKind::Homoglyph => write!(f, "homoglyph"),
            CipherKind::HybridStego => write!(f, "hybrid_stego"),
        }
    }
}

/// One obfuscated rendering of a base prompt. Written once, never mutated;
/// the encoded text round-trips through JSON byte-for-byte, invisible and
/// homoglyph characters included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherVariant {
    #[serde(rename = "id")]
    pub prompt_id: String,
    pub cipher: CipherKind,
    pub encoded_text: String,
}

/// Shift ASCII letters by `shift` positions mod 26, preserving case.
/// Everything that is not an ASCII letter passes through unchanged, so
/// `caesar(caesar(t, s), 26 - s) == t` holds for arbitrary Unicode `t`.
pub fn caesar(text: &str, shift: u8) -> String {
    let shift = shift % 26;
    text.chars()
        .map(|c| {
            let base = if c.is_ascii_uppercase() {
                b'A'
            } else if c.is_ascii_lowercase() {
                b'a'
            } else {
                return c;
            };
            char::from(base + (c as u8 - base + shift) % 26)
        })
        .collect()
}

/// Cipher transformation engine over validated key material.
pub struct CipherEngine {
    keys: Arc<KeyMaterial>,
}

impl CipherEngine {
    /// Build an engine, rejecting malformed key material up front.
    pub fn new(keys: Arc<KeyMaterial>) -> Result<Self> {
        keys.validate()?;
        Ok(Self { keys })
    }

    pub fn key_material(&self) -> &KeyMaterial {
        &self.keys
    }

    pub fn caesar(&self, text: &str) -> String {
        caesar(text, self.keys.caesar_shift)
    }

    /// Polyalphabetic shift keyed by a repeating key. The key index advances
    /// only on ASCII letters; other characters consume no key position.
    fn vigenere_with(&self, text: &str, key: &str) -> String {
        let key: Vec<u8> = key.bytes().map(|b| b.to_ascii_lowercase() - b'a').collect();
        let mut j = 0usize;
        text.chars()
            .map(|c| {
                let base = if c.is_ascii_uppercase() {
                    b'A'
                } else if c.is_ascii_lowercase() {
                    b'a'
                } else {
                    return c;
                };
                let k = key[j % key.len()];
                j += 1;
                char::from(base + (c as u8 - base + k) % 26)
            })
            .collect()
    }

    pub fn vigenere(&self, text: &str) -> String {
        self.vigenere_with(text, &self.keys.vigenere_key)
    }

    /// Vigenère keyed with a natural-language word, emulating realistic
    /// key reuse.
    pub fn vigenere_nl(&self, text: &str) -> String {
        self.vigenere_with(text, &self.keys.vigenere_nl_key)
    }

    /// Monoalphabetic replacement via the pinned bijective table; output
    /// case mirrors input case.
    pub fn substitution(&self, text: &str) -> String {
        text.chars()
            .map(|c| match self.keys.substitution.get(&c.to_ascii_lowercase()) {
                Some(sub) if c.is_ascii_uppercase() => sub.to_ascii_uppercase(),
                Some(sub) => *sub,
                None => c,
            })
            .collect()
    }

    /// One-to-one letter-to-glyph mapping. Digits, punctuation, and
    /// whitespace pass through; not designed to be automatically reversible.
    pub fn emoji_encode(&self, text: &str) -> String {
        text.chars()
            .map(|c| {
                self.keys
                    .emoji
                    .get(&c.to_ascii_lowercase())
                    .copied()
                    .unwrap_or(c)
            })
            .collect()
    }

    /// Insert one invisible marker after every non-space character,
    /// alternating by position parity. Stripping the markers reproduces the
    /// visible text exactly.
    pub fn zero_width_stego(&self, text: &str) -> String {
        let [even, odd] = self.keys.stego_markers;
        let mut out = String::with_capacity(text.len() * 2);
        for (i, c) in text.chars().enumerate() {
            out.push(c);
            if c != ' ' {
                out.push(if i % 2 == 0 { even } else { odd });
            }
        }
        out
    }

    /// Three Caesar shifts applied in sequence. The net arithmetic effect is
    /// a single shift, but the composition is kept for audit traceability.
    pub fn caesar_chain(&self, text: &str) -> String {
        self.keys
            .chain_shifts
            .iter()
            .fold(text.to_string(), |acc, shift| caesar(&acc, *shift))
    }

    /// Replace a fixed subset of Latin letters with visually similar
    /// Cyrillic glyphs; unmapped characters unchanged.
    pub fn homoglyph_encode(&self, text: &str) -> String {
        text.chars()
            .map(|c| {
                self.keys
                    .homoglyphs
                    .get(&c.to_ascii_lowercase())
                    .copied()
                    .unwrap_or(c)
            })
            .collect()
    }

    /// Homoglyph substitution followed by zero-width insertion.
    pub fn hybrid_stego(&self, text: &str) -> String {
        self.zero_width_stego(&self.homoglyph_encode(text))
    }

    fn encode(&self, kind: CipherKind, text: &str) -> String {
        match kind {
            CipherKind::Plain => text.to_string(),
            CipherKind::Caesar => self.caesar(text),
            CipherKind::Vigenere => self.vigenere(text),
            CipherKind::Substitution => self.substitution(text),
            CipherKind::Emoji => self.emoji_encode(text),
            CipherKind::Stego => self.zero_width_stego(text),
            CipherKind::CaesarChain => self.caesar_chain(text),
            CipherKind::VigenereNl => self.vigenere_nl(text),
            CipherKind::Homoglyph => self.homoglyph_encode(text),
            CipherKind::HybridStego => self.hybrid_stego(text),
        }
    }

    /// All ten variants of one text, keyed by cipher, in catalog order.
    /// Byte-identical across calls for fixed key material.
    pub fn generate_all_encodings(&self, text: &str) -> BTreeMap<CipherKind, String> {
        CipherKind::ALL
            .iter()
            .map(|kind| (*kind, self.encode(*kind, text)))
            .collect()
    }

    /// The full catalog for one prompt, in catalog order.
    pub fn catalog_for_prompt(&self, prompt: &PlaintextPrompt) -> Vec<CipherVariant> {
        debug!(prompt_id = %prompt.id, "generating cipher catalog");
        CipherKind::ALL
            .iter()
            .map(|kind| CipherVariant {
                prompt_id: prompt.id.clone(),
                cipher: *kind,
                encoded_text: self.encode(*kind, &prompt.text),
            })
            .collect()
    }

    /// Encode a whole corpus. Prompts are independent, so this fans out
    /// across worker threads with only read access to the shared key
    /// material.
    pub fn encode_corpus(&self, prompts: &[PlaintextPrompt]) -> Vec<CipherVariant> {
        let variants: Vec<CipherVariant> = prompts
            .par_iter()
            .flat_map_iter(|prompt| self.catalog_for_prompt(prompt))
            .collect();
        info!(
            prompts = prompts.len(),
            variants = variants.len(),
            "encoded corpus"
        );
        variants
    }

    /// Re-derive stored variants against the current key material. A
    /// mismatch means the cipher configuration drifted since the variants
    /// were generated — the silent-disagreement hazard this library treats
    /// as a data-integrity failure, not a runtime one.
    pub fn verify_catalog(&self, variants: &[CipherVariant]) -> Result<()> {
        for variant in variants {
            // Per-prompt all-or-nothing: bail on the first variant that no
            // longer re-derives, naming the prompt and the failing cipher.
            let fresh = self.encode(variant.cipher, &self.plain_text_of(variants, variant)?);
            if fresh != variant.encoded_text {
                return Err(TextCloakError::CatalogMismatch {
                    prompt_id: variant.prompt_id.clone(),
                    cipher: variant.cipher.to_string(),
                });
            }
        }
        Ok(())
    }

    /// The `plain` entry is the source text every other variant of the same
    /// prompt must re-derive from.
    fn plain_text_of(&self, variants: &[CipherVariant], of: &CipherVariant) -> Result<String> {
        variants
            .iter()
            .find(|v| v.prompt_id == of.prompt_id && v.cipher == CipherKind::Plain)
            .map(|v| v.encoded_text.clone())
            .ok_or_else(|| TextCloakError::CatalogMismatch {
                prompt_id: of.prompt_id.clone(),
                cipher: CipherKind::Plain.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> CipherEngine {
        CipherEngine::new(Arc::new(KeyMaterial::pinned())).unwrap()
    }

    #[test]
    fn caesar_shifts_and_preserves_case() {
        assert_eq!(caesar("Attack at Dawn!", 3), "Dwwdfn dw Gdzq!");
    }

    #[test]
    fn caesar_round_trips() {
        let text = "The quick brown fox, 1234 — naïve?";
        for shift in 0..26u8 {
            assert_eq!(caesar(&caesar(text, shift), 26 - shift), text);
        }
    }

    #[test]
    fn caesar_leaves_non_ascii_letters_alone() {
        assert_eq!(caesar("héllo", 3), "kéoor");
    }

    #[test]
    fn vigenere_key_index_skips_non_letters() {
        let e = engine();
        // Key "KEY": with non-letters consuming no key position, the second
        // word continues mid-key rather than restarting it.
        assert_eq!(e.vigenere("ab cd"), "kf an");
    }

    #[test]
    fn vigenere_preserves_case() {
        let e = engine();
        assert_eq!(e.vigenere("AB"), "KF");
    }

    #[test]
    fn substitution_mirrors_input_case() {
        let e = engine();
        let lower = e.substitution("abc");
        let upper = e.substitution("ABC");
        assert_eq!(upper, lower.to_ascii_uppercase());
    }

    #[test]
    fn substitution_inverse_recovers_letters() {
        let e = engine();
        let inverse = e.key_material().substitution_inverse();
        let original = "defend the east wall";
        let encoded = e.substitution(original);
        let decoded: String = encoded
            .chars()
            .map(|c| inverse.get(&c).copied().unwrap_or(c))
            .collect();
        assert_eq!(decoded, original);
    }

    #[test]
    fn emoji_passes_through_digits_and_punctuation() {
        let e = engine();
        let encoded = e.emoji_encode("a1!");
        assert!(encoded.starts_with('😀'));
        assert!(encoded.ends_with("1!"));
    }

    #[test]
    fn emoji_maps_uppercase_through_lowercase_table() {
        let e = engine();
        assert_eq!(e.emoji_encode("A"), e.emoji_encode("a"));
    }

    #[test]
    fn stego_strip_reproduces_visible_text() {
        let e = engine();
        let original = "reset my password, please";
        let encoded = e.zero_width_stego(original);
        let markers = e.key_material().stego_markers;
        let stripped: String = encoded.chars().filter(|c| !markers.contains(c)).collect();
        assert_eq!(stripped, original);
    }

    #[test]
    fn stego_markers_alternate_by_parity() {
        let e = engine();
        let [even, odd] = e.key_material().stego_markers;
        let encoded: Vec<char> = e.zero_width_stego("ab").chars().collect();
        assert_eq!(encoded, vec!['a', even, 'b', odd]);
    }

    #[test]
    fn stego_skips_spaces() {
        let e = engine();
        let markers = e.key_material().stego_markers;
        let encoded = e.zero_width_stego("a b");
        // No marker directly after the space character itself.
        let chars: Vec<char> = encoded.chars().collect();
        let space_at = chars.iter().position(|c| *c == ' ').unwrap();
        assert!(!markers.contains(&chars[space_at + 1]));
    }

    #[test]
    fn caesar_chain_equals_net_shift() {
        let e = engine();
        let text = "Composed shifts stay auditable";
        // 3 + 11 + 7 = 21 mod 26
        assert_eq!(e.caesar_chain(text), caesar(text, 21));
    }

    #[test]
    fn homoglyph_replaces_only_the_fixed_subset() {
        let e = engine();
        let encoded = e.homoglyph_encode("echo");
        assert_eq!(encoded, "есһо");
        assert_eq!(e.homoglyph_encode("z9 "), "z9 ");
    }

    #[test]
    fn hybrid_is_homoglyph_then_stego() {
        let e = engine();
        let text = "open";
        assert_eq!(
            e.hybrid_stego(text),
            e.zero_width_stego(&e.homoglyph_encode(text))
        );
    }

    #[test]
    fn catalog_has_ten_entries_with_plain_identity() {
        let e = engine();
        let encodings = e.generate_all_encodings("test");
        assert_eq!(encodings.len(), 10);
        assert_eq!(encodings[&CipherKind::Plain], "test");
    }

    #[test]
    fn catalog_is_byte_identical_across_calls() {
        let e = engine();
        let text = "Normalize the characters and summarise the instructions.";
        assert_eq!(e.generate_all_encodings(text), e.generate_all_encodings(text));
    }

    #[test]
    fn empty_input_is_total() {
        let e = engine();
        for (_, encoded) in e.generate_all_encodings("") {
            assert_eq!(encoded, "");
        }
    }

    #[test]
    fn verify_catalog_accepts_fresh_variants() {
        let e = engine();
        let prompt = PlaintextPrompt {
            id: "portal_bug".to_string(),
            text: "a user reports their 2FA code is rejected".to_string(),
        };
        let variants = e.catalog_for_prompt(&prompt);
        e.verify_catalog(&variants).unwrap();
    }

    #[test]
    fn verify_catalog_names_the_drifted_cipher() {
        let e = engine();
        let prompt = PlaintextPrompt {
            id: "p1".to_string(),
            text: "some text".to_string(),
        };
        let mut variants = e.catalog_for_prompt(&prompt);
        let idx = variants
            .iter()
            .position(|v| v.cipher == CipherKind::Caesar)
            .unwrap();
        variants[idx].encoded_text.push('x');
        match e.verify_catalog(&variants) {
            Err(TextCloakError::CatalogMismatch { prompt_id, cipher }) => {
                assert_eq!(prompt_id, "p1");
                assert_eq!(cipher, "caesar");
            }
            other => panic!("expected CatalogMismatch, got {other:?}"),
        }
    }

    #[test]
    fn encode_corpus_is_prompts_times_catalog() {
        let e = engine();
        let prompts = vec![
            PlaintextPrompt {
                id: "a".to_string(),
                text: "first".to_string(),
            },
            PlaintextPrompt {
                id: "b".to_string(),
                text: "second".to_string(),
            },
        ];
        let variants = e.encode_corpus(&prompts);
        assert_eq!(variants.len(), 20);
        assert!(variants
            .iter()
            .any(|v| v.prompt_id == "b" && v.cipher == CipherKind::HybridStego));
    }
}
