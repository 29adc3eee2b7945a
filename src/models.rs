//! Collaborator seams for the external models.
//!
//! The pipeline never talks to a concrete model directly. Each capability
//! (language identification, translation, morphological analysis, reading
//! annotation) sits behind an object-safe async trait, and the orchestrator
//! receives them bundled in a [`ModelSet`]. Tests inject stubs; production
//! wires in the HTTP client from `crate::inference`.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::lang::Language;

/// Statistical language-identification predictor.
#[async_trait]
pub trait LanguageIdentifier: Send + Sync {
    /// Predict the most likely language of `text`.
    ///
    /// Returns a language label (fastText-style `__label__xx` prefixes are
    /// tolerated by the caller) and a confidence in `[0, 1]`.
    async fn predict(&self, text: &str) -> Result<(String, f32)>;
}

/// Sequence-to-sequence translation model.
#[async_trait]
pub trait TranslationModel: Send + Sync {
    /// Translate `text` from `source` into the `target` language code.
    ///
    /// The pipeline always passes `"ja"` as the target.
    async fn translate(&self, text: &str, source: Language, target: &str) -> Result<String>;
}

/// One token of a morphological analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Morpheme {
    /// Surface form as it appears in the text
    pub surface: String,

    /// Coarse part-of-speech tag
    pub part_of_speech: String,
}

/// Morphological analyzer for Japanese text.
#[async_trait]
pub trait MorphologicalAnalyzer: Send + Sync {
    /// Split `text` into an ordered sequence of morphemes.
    async fn tokenize(&self, text: &str) -> Result<Vec<Morpheme>>;
}

/// Furigana generator (optional capability).
#[async_trait]
pub trait ReadingAnnotator: Send + Sync {
    /// Annotate `text` with reading hints in bracket notation, e.g.
    /// `漢字[かんじ]`; words whose reading equals their surface form pass
    /// through unannotated.
    async fn annotate(&self, text: &str) -> Result<String>;
}

/// The capability bundle handed to the pipeline.
///
/// Replaces process-wide model handles: everything the orchestrator calls
/// out to travels through this struct, so unit tests can swap in stub
/// collaborators per test.
#[derive(Clone)]
pub struct ModelSet {
    pub identifier: Arc<dyn LanguageIdentifier>,
    pub translator: Arc<dyn TranslationModel>,
    pub analyzer: Arc<dyn MorphologicalAnalyzer>,

    /// Absent when no reading annotator is configured; the furigana field of
    /// results stays empty in that case.
    pub annotator: Option<Arc<dyn ReadingAnnotator>>,
}
