//! Batch orchestrator: drives sentences through detection, translation,
//! normalization, and morphological analysis.
//!
//! Sentences are processed strictly in input order, one at a time; each
//! external call is awaited fully before the next begins. One sentence's
//! failure never aborts the batch: every failure is caught at the sentence
//! boundary and converted into an error-bearing result, so output rows keep
//! their positional correspondence with the input.

use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::cache::{CacheKey, TranslationCache};
use crate::config::Config;
use crate::lang::{detect, script, DetectionResult, Language};
use crate::metrics::PipelineMetrics;
use crate::models::{ModelSet, Morpheme};
use crate::normalize::{self, NOT_JAPANESE_TAG};
use crate::rate_limit::RateLimiter;

/// Marker placed in `standard_japanese_text` when the rate limiter denies a
/// translation request.
pub const RATE_LIMIT_MARKER: &str = "[Rate limit exceeded: slow down]";

/// Separator between rendered morphemes in `morphological_analysis`.
const MORPHEME_SEPARATOR: &str = " | ";

/// Per-sentence failure classes.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("language identification failed: {0}")]
    Identification(String),

    #[error("translation failed: {0}")]
    Translation(String),

    #[error("rate limit exceeded: translation requests are being throttled")]
    RateLimitExceeded,

    /// Non-fatal: logged at the call site, never surfaces in a result.
    #[error("cache write failed: {0}")]
    CacheWrite(String),

    #[error("morphological analysis failed: {0}")]
    Analysis(String),

    /// Input acquisition failed upstream of the batch (e.g. an unreadable
    /// file); surfaces as "no input", not as a crash.
    #[error("no input text could be extracted: {0}")]
    Extraction(String),
}

/// Terminal record for one sentence.
///
/// Carries either a usable `standard_japanese_text` or an `error` payload,
/// never neither.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingResult {
    pub original_text: String,
    pub detected_language: String,
    pub confidence: f32,
    pub standard_japanese_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub furigana: Option<String>,
    pub morphological_analysis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessingResult {
    fn success(
        original: &str,
        detection: &DetectionResult,
        standard_japanese_text: String,
        furigana: Option<String>,
        morphological_analysis: String,
    ) -> Self {
        Self {
            original_text: original.to_string(),
            detected_language: detection.language.code().to_string(),
            confidence: detection.confidence,
            standard_japanese_text,
            furigana,
            morphological_analysis,
            error: None,
        }
    }

    fn rate_limited(original: &str, detection: &DetectionResult) -> Self {
        Self {
            original_text: original.to_string(),
            detected_language: detection.language.code().to_string(),
            confidence: detection.confidence,
            standard_japanese_text: RATE_LIMIT_MARKER.to_string(),
            furigana: None,
            morphological_analysis: String::new(),
            error: Some(PipelineError::RateLimitExceeded.to_string()),
        }
    }

    fn failed(original: &str, err: &PipelineError) -> Self {
        Self {
            original_text: original.to_string(),
            detected_language: "unknown".to_string(),
            confidence: 0.0,
            standard_japanese_text: String::new(),
            furigana: None,
            morphological_analysis: String::new(),
            error: Some(err.to_string()),
        }
    }

    /// True when this record carries a usable translation.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// The translation pipeline for one session.
pub struct Pipeline {
    models: ModelSet,
    cache: TranslationCache,
    limiter: Mutex<RateLimiter>,
    translator_model: String,
    generate_furigana: bool,
}

impl Pipeline {
    pub fn new(
        models: ModelSet,
        cache: TranslationCache,
        limiter: RateLimiter,
        translator_model: impl Into<String>,
    ) -> Self {
        Self {
            models,
            cache,
            limiter: Mutex::new(limiter),
            translator_model: translator_model.into(),
            generate_furigana: false,
        }
    }

    /// Build a pipeline from configuration, opening the cache database.
    pub fn from_config(config: &Config, models: ModelSet) -> anyhow::Result<Self> {
        let cache = TranslationCache::open(&config.cache_db_path)?;
        let limiter = RateLimiter::new(
            config.rate_limit_capacity,
            Duration::from_secs(config.rate_limit_window_secs),
        );
        Ok(
            Self::new(models, cache, limiter, config.translator_model.clone())
                .with_furigana(config.generate_furigana),
        )
    }

    /// Enable or disable furigana generation for Japanese output.
    pub fn with_furigana(mut self, enabled: bool) -> Self {
        self.generate_furigana = enabled;
        self
    }

    /// Process a batch of sentences in order.
    ///
    /// Output order matches input order; sentences that are empty after
    /// cleanup produce no record, so the output may be shorter than the
    /// input. `on_progress(index, total)` fires after every sentence,
    /// skipped ones included.
    pub async fn process_batch<F>(&self, sentences: &[String], mut on_progress: F) -> Vec<ProcessingResult>
    where
        F: FnMut(usize, usize),
    {
        let total = sentences.len();
        let mut results = Vec::with_capacity(total);

        for (i, sentence) in sentences.iter().enumerate() {
            if let Some(result) = self.process_sentence(sentence).await {
                results.push(result);
            }
            on_progress(i + 1, total);
        }

        results
    }

    /// Process a single sentence. Returns `None` for input that is empty
    /// after cleanup.
    pub async fn process_sentence(&self, sentence: &str) -> Option<ProcessingResult> {
        let cleaned = normalize::clean_input(sentence);
        if cleaned.is_empty() {
            return None;
        }

        match self.run_sentence(sentence, &cleaned).await {
            Ok(result) => Some(result),
            Err(err) => {
                warn!("Sentence processing failed: {}", err);
                Some(ProcessingResult::failed(sentence, &err))
            }
        }
    }

    async fn run_sentence(
        &self,
        original: &str,
        cleaned: &str,
    ) -> Result<ProcessingResult, PipelineError> {
        let detection = detect::resolve(self.models.identifier.as_ref(), cleaned)
            .await
            .map_err(|e| PipelineError::Identification(e.to_string()))?;

        // Already Japanese: no translation step, the cleaned input is the
        // standard text.
        if detection.language.is_japanese() {
            let analysis = self.analyze(cleaned).await?;
            let furigana = self.maybe_annotate(cleaned).await;
            return Ok(ProcessingResult::success(
                original,
                &detection,
                cleaned.to_string(),
                furigana,
                analysis,
            ));
        }

        if !self.limiter.lock().unwrap().allow() {
            PipelineMetrics::global().record_rate_limited();
            return Ok(ProcessingResult::rate_limited(original, &detection));
        }

        let translation = self.translate_cached(cleaned, detection.language).await?;

        let analysis = self.analyze(&translation).await?;
        let furigana = self.maybe_annotate(&translation).await;

        // Script-membership validation: output with no Japanese character is
        // flagged, not dropped. The tag goes on the emitted text only; the
        // cache row and the analysis above use the untagged text.
        let standard_japanese_text = if script::contains_japanese(&translation) {
            translation
        } else {
            format!("{} {}", NOT_JAPANESE_TAG, translation)
        };

        Ok(ProcessingResult::success(
            original,
            &detection,
            standard_japanese_text,
            furigana,
            analysis,
        ))
    }

    /// Cache-gated translation: lookup by (text, source language, model),
    /// invoke the model on a miss, normalize, and append to the cache.
    async fn translate_cached(
        &self,
        text: &str,
        source: Language,
    ) -> Result<String, PipelineError> {
        let key = CacheKey {
            source_text: text,
            source_language: source.code(),
            model: &self.translator_model,
        };
        let metrics = PipelineMetrics::global();

        match self.cache.lookup(&key) {
            Ok(Some(hit)) => {
                metrics.record_cache_hit();
                return Ok(hit);
            }
            Ok(None) => metrics.record_cache_miss(),
            Err(err) => {
                // A broken cache degrades to a miss, not a failed sentence
                warn!("Cache lookup failed, treating as miss: {}", err);
                metrics.record_cache_miss();
            }
        }

        metrics.record_translator_call();
        let raw = self
            .models
            .translator
            .translate(text, source, Language::JAPANESE.code())
            .await
            .map_err(|e| {
                metrics.record_translator_failure();
                PipelineError::Translation(e.to_string())
            })?;

        // Source-language cleanup first, then the universal Japanese pass
        let normalized = normalize::japanese_output(&normalize::normalize(&raw, source.code()));

        if let Err(err) = self.cache.store(&key, &normalized) {
            let err = PipelineError::CacheWrite(err.to_string());
            warn!("{}; translation kept uncached", err);
        }

        Ok(normalized)
    }

    async fn analyze(&self, text: &str) -> Result<String, PipelineError> {
        let morphemes = self
            .models
            .analyzer
            .tokenize(text)
            .await
            .map_err(|e| PipelineError::Analysis(e.to_string()))?;
        Ok(format_morphemes(&morphemes))
    }

    async fn maybe_annotate(&self, text: &str) -> Option<String> {
        if !self.generate_furigana {
            return None;
        }
        let annotator = self.models.annotator.as_ref()?;
        match annotator.annotate(text).await {
            Ok(annotated) => Some(annotated),
            Err(err) => {
                warn!("Furigana generation failed: {}", err);
                None
            }
        }
    }
}

/// Render morphemes as `surface(pos)` pairs joined by a fixed separator.
pub fn format_morphemes(morphemes: &[Morpheme]) -> String {
    morphemes
        .iter()
        .map(|m| format!("{}({})", m.surface, m.part_of_speech))
        .collect::<Vec<_>>()
        .join(MORPHEME_SEPARATOR)
}
