//! Language registry: single source of truth for the supported languages.
//!
//! The registry holds every language the pipeline can translate from, along
//! with its script predicate. The order of the entries matters: it is the
//! fixed priority order the fallback resolver scans when the statistical
//! identifier is not trusted, so detection stays deterministic.

use std::sync::OnceLock;

use crate::lang::script;

/// Configuration for one supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "ja")
    pub code: &'static str,

    /// English name of the language (e.g., "Japanese")
    pub name: &'static str,

    /// Native name of the language (e.g., "日本語")
    pub native_name: &'static str,

    /// Script predicate: does a character belong to this language's script?
    pub script: fn(char) -> bool,
}

impl LanguageConfig {
    /// True if any character of `text` belongs to this language's script.
    pub fn script_matches(&self, text: &str) -> bool {
        text.chars().any(self.script)
    }
}

/// Global language registry.
///
/// Initialized once on first access; immutable thereafter.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Look up a language configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// All supported languages, in detection priority order.
    pub fn list(&self) -> &[LanguageConfig] {
        &self.languages
    }
}

/// The supported language set.
///
/// Order is the detection fallback priority: plain Latin is checked first so
/// undecorated ASCII text resolves to English before the Romance languages
/// (whose predicate also accepts plain Latin) get a chance to claim it.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            script: script::latin,
        },
        LanguageConfig {
            code: "hi",
            name: "Hindi",
            native_name: "हिन्दी",
            script: script::devanagari,
        },
        LanguageConfig {
            code: "ja",
            name: "Japanese",
            native_name: "日本語",
            script: script::japanese,
        },
        LanguageConfig {
            code: "ko",
            name: "Korean",
            native_name: "한국어",
            script: script::hangul,
        },
        LanguageConfig {
            code: "fr",
            name: "French",
            native_name: "Français",
            script: script::latin_extended,
        },
        LanguageConfig {
            code: "es",
            name: "Spanish",
            native_name: "Español",
            script: script::latin_extended,
        },
        LanguageConfig {
            code: "it",
            name: "Italian",
            native_name: "Italiano",
            script: script::latin_extended,
        },
        LanguageConfig {
            code: "pt",
            name: "Portuguese",
            native_name: "Português",
            script: script::latin_extended,
        },
        LanguageConfig {
            code: "ru",
            name: "Russian",
            native_name: "Русский",
            script: script::cyrillic,
        },
    ]
}
