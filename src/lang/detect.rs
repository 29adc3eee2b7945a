//! Language fallback resolver.
//!
//! Wraps the external identification predictor with a deterministic safety
//! net: when the predictor is unsure (low confidence, or a label outside the
//! supported set), the text's own script decides. Short and code-mixed
//! sentences routinely confuse statistical identifiers; the script scan is
//! cheap and reproducible.

use anyhow::Result;
use tracing::debug;

use crate::lang::{Language, LanguageRegistry};
use crate::models::LanguageIdentifier;

/// Minimum predictor confidence to accept its label verbatim.
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Confidence assigned to script-based fallback decisions.
pub const FALLBACK_CONFIDENCE: f32 = 0.6;

/// Outcome of language detection for one sentence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionResult {
    pub language: Language,
    pub confidence: f32,
}

/// Resolve the language of `text`.
///
/// 1. Ask the external predictor. A confident answer for a supported
///    language is returned verbatim.
/// 2. Otherwise scan the registry in its fixed priority order and return the
///    first language whose script matches any character, with
///    [`FALLBACK_CONFIDENCE`].
/// 3. No script match at all defaults to English.
///
/// Predictor failures propagate; they are a sentence-level failure, not
/// something to silently default around.
pub async fn resolve(identifier: &dyn LanguageIdentifier, text: &str) -> Result<DetectionResult> {
    let (label, confidence) = identifier.predict(text).await?;
    let code = label.trim_start_matches("__label__");

    if confidence >= CONFIDENCE_THRESHOLD {
        if let Ok(language) = Language::from_code(code) {
            return Ok(DetectionResult {
                language,
                confidence,
            });
        }
    }

    debug!(
        label = code,
        confidence, "predictor not trusted, falling back to script scan"
    );

    for config in LanguageRegistry::get().list() {
        if config.script_matches(text) {
            return Ok(DetectionResult {
                language: Language::from_code(config.code)?,
                confidence: FALLBACK_CONFIDENCE,
            });
        }
    }

    Ok(DetectionResult {
        language: Language::ENGLISH,
        confidence: FALLBACK_CONFIDENCE,
    })
}
