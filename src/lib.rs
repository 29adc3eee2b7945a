//! Multilingual text → Standard Japanese pipeline.
//!
//! Takes free-form multilingual text, splits it into sentences, identifies
//! each sentence's source language (with a deterministic script fallback),
//! translates non-Japanese sentences through an external model behind a
//! durable cache and a per-session rate limiter, normalizes the output per
//! language, and attaches a morphological breakdown.
//!
//! The external models (identifier, translator, morphological analyzer,
//! furigana annotator) are capabilities behind the traits in [`models`];
//! [`inference`] provides the HTTP-backed production implementation and
//! tests inject stubs.

pub mod cache;
pub mod config;
pub mod inference;
pub mod lang;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod rate_limit;
pub mod segment;

pub use cache::{CacheKey, TranslationCache};
pub use lang::{DetectionResult, Language};
pub use models::{ModelSet, Morpheme};
pub use pipeline::{Pipeline, PipelineError, ProcessingResult};
pub use rate_limit::RateLimiter;
