//! Language layer: supported-language registry, validated language type,
//! script predicates, and the detection fallback resolver.
//!
//! # Architecture
//!
//! - `registry`: single source of truth for supported languages and their
//!   script predicates; entry order is the detection fallback priority
//! - `script`: Unicode block predicates shared by detection and validation
//! - `detect`: wraps the external identifier with a confidence-gated,
//!   script-based fallback

pub mod detect;
pub mod registry;
pub mod script;

pub use detect::{resolve, DetectionResult};
pub use registry::{LanguageConfig, LanguageRegistry};

use anyhow::{bail, Result};

/// A validated language.
///
/// Can only be constructed for codes present in the registry, so a
/// `Language` in hand is always a supported one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    code: &'static str,
}

impl Language {
    /// The pipeline's target language.
    pub const JAPANESE: Language = Language { code: "ja" };

    /// The fallback language when no script matches.
    pub const ENGLISH: Language = Language { code: "en" };

    /// Create a `Language` from an ISO 639-1 code string.
    ///
    /// Fails if the code is not in the supported set.
    pub fn from_code(code: &str) -> Result<Language> {
        match LanguageRegistry::get().get_by_code(code) {
            Some(config) => Ok(Language { code: config.code }),
            None => bail!("unsupported language code: '{}'", code),
        }
    }

    /// The ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// The full registry configuration for this language.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    /// The English name of the language.
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// True if this is the pipeline's target language.
    pub fn is_japanese(&self) -> bool {
        *self == Language::JAPANESE
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code)
    }
}
