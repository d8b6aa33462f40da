//! Fail-closed defensive gate
//!
//! Combines the classifier and the canonicalizer into an input boundary
//! that never forwards suspected-obfuscated content: anything that does not
//! classify as plain gets one fixed restatement request, and the payload is
//! not processed further. A single call moves through received → classified
//! → accepted/rejected; nothing persists between calls and nothing retries.

use crate::canonicalizer::{CanonicalizeOptions, Canonicalizer};
use crate::classifier::{CipherClassifier, ObfuscationClass};
use crate::config::DetectionConfig;
use crate::errors::Result;
use std::sync::Arc;
use tracing::warn;

/// The fixed refusal/restatement-request message returned for any
/// non-plain classification, verbatim.
pub const REFUSAL_MESSAGE: &str = "Your message appears to be encoded, obfuscated, or \
steganographic. For safety, please restate your request in clear, plain language without \
any ciphers or hidden content.";

/// Terminal state of one gate call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Accepted,
    Rejected,
}

/// The decision for one input: how it classified, where it ended up, and
/// the text to hand back (canonicalized input or the fixed refusal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDecision {
    pub class: ObfuscationClass,
    pub outcome: GateOutcome,
    pub response: String,
}

pub struct DefensiveGate {
    classifier: CipherClassifier,
    canonicalizer: Canonicalizer,
}

impl DefensiveGate {
    pub fn new(config: Arc<DetectionConfig>) -> Result<Self> {
        Ok(Self {
            classifier: CipherClassifier::new(config.clone())?,
            canonicalizer: Canonicalizer::new(config),
        })
    }

    /// Run one input through classify-then-decide. Absent input is coerced
    /// to the empty string, which classifies as plain.
    pub fn guard(&self, input: Option<&str>) -> GateDecision {
        let text = input.unwrap_or("");
        let class = self.classifier.classify(text);

        if class != ObfuscationClass::Plain {
            warn!(%class, "rejecting obfuscated input");
            return GateDecision {
                class,
                outcome: GateOutcome::Rejected,
                response: REFUSAL_MESSAGE.to_string(),
            };
        }

        GateDecision {
            class,
            outcome: GateOutcome::Accepted,
            response: self
                .canonicalizer
                .canonicalize(Some(text), &CanonicalizeOptions::new()),
        }
    }

    /// Convenience wrapper returning just the response text.
    pub fn sanitize(&self, input: Option<&str>) -> String {
        self.guard(input).response
    }
}
