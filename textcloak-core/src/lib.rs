//! TextCloak: deterministic text obfuscation, detection, and canonicalization
//!
//! Four components, composed leaf-to-root: a cipher transformation engine
//! producing a fixed ten-variant catalog per prompt, an obfuscation
//! classifier over an ordered rule list, a canonicalizer reducing text to a
//! normalized analysis form, and a fail-closed defensive gate combining the
//! two. All of it is synchronous, CPU-bound, and pure over an immutable
//! configuration built once per process.

pub mod canonicalizer;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod errors;
pub mod gate;

// Re-exports
pub use canonicalizer::{CanonicalizeOptions, Canonicalizer, EMOJI_PLACEHOLDER};
pub use classifier::{shannon_entropy, CipherClassifier, DetectionRule, ObfuscationClass};
pub use config::{DetectionConfig, KeyMaterial, SUBSTITUTION_SEED};
pub use engine::{caesar, CipherEngine, CipherKind, CipherVariant, PlaintextPrompt};
pub use errors::{Result, TextCloakError};
pub use gate::{DefensiveGate, GateDecision, GateOutcome, REFUSAL_MESSAGE};

use once_cell::sync::Lazy;
use std::sync::Arc;

/// Top-level configuration: cipher key material plus detection policy.
#[derive(Debug, Clone, Default)]
pub struct TextCloakConfig {
    pub key_material: KeyMaterial,
    pub detection: DetectionConfig,
}

impl TextCloakConfig {
    /// Cross-field integrity: the markers the stego transform inserts must
    /// be markers the detector recognizes, or the gate would wave through
    /// this library's own output.
    pub fn validate(&self) -> Result<()> {
        self.key_material.validate()?;
        self.detection.validate()?;
        for marker in self.key_material.stego_markers {
            if !self.detection.is_zero_width(marker) {
                return Err(TextCloakError::Configuration(format!(
                    "stego marker U+{:04X} is not in the detection marker set",
                    marker as u32
                )));
            }
        }
        Ok(())
    }
}

/// Main library interface, wiring the four components over one shared
/// configuration.
pub struct TextCloak {
    engine: CipherEngine,
    classifier: CipherClassifier,
    canonicalizer: Canonicalizer,
    gate: DefensiveGate,
}

impl TextCloak {
    pub fn new(config: TextCloakConfig) -> Result<Self> {
        config.validate()?;
        let keys = Arc::new(config.key_material);
        let detection = Arc::new(config.detection);
        Ok(Self {
            engine: CipherEngine::new(keys)?,
            classifier: CipherClassifier::new(detection.clone())?,
            canonicalizer: Canonicalizer::new(detection.clone()),
            gate: DefensiveGate::new(detection)?,
        })
    }

    /// Process-wide instance over the pinned configuration, built once.
    pub fn shared() -> &'static TextCloak {
        static SHARED: Lazy<TextCloak> = Lazy::new(|| {
            TextCloak::new(TextCloakConfig::default())
                .expect("pinned TextCloak configuration failed to validate")
        });
        &SHARED
    }

    pub fn engine(&self) -> &CipherEngine {
        &self.engine
    }

    pub fn classifier(&self) -> &CipherClassifier {
        &self.classifier
    }

    pub fn generate_all_encodings(
        &self,
        text: &str,
    ) -> std::collections::BTreeMap<CipherKind, String> {
        self.engine.generate_all_encodings(text)
    }

    pub fn encode_corpus(&self, prompts: &[PlaintextPrompt]) -> Vec<CipherVariant> {
        self.engine.encode_corpus(prompts)
    }

    pub fn classify(&self, text: &str) -> ObfuscationClass {
        self.classifier.classify(text)
    }

    pub fn canonicalize(&self, text: Option<&str>, options: &CanonicalizeOptions) -> String {
        self.canonicalizer.canonicalize(text, options)
    }

    pub fn guard(&self, input: Option<&str>) -> GateDecision {
        self.gate.guard(input)
    }
}

/// Classify `text` with the pinned configuration.
pub fn classify(text: &str) -> ObfuscationClass {
    TextCloak::shared().classify(text)
}

/// Canonicalize `text` with the pinned configuration.
pub fn canonicalize(text: Option<&str>, options: &CanonicalizeOptions) -> String {
    TextCloak::shared().canonicalize(text, options)
}

/// Gate `text` with the pinned configuration: the canonicalized text when it
/// classifies as plain, the fixed refusal otherwise.
pub fn defensive_gate(text: &str) -> String {
    TextCloak::shared().guard(Some(text)).response
}
