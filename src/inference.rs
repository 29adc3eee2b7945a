//! HTTP client for the external model server.
//!
//! The identification, translation, morphological-analysis, and reading
//! models run behind a small HTTP service; this client implements the
//! collaborator traits against it. One attempt per call: a failed request
//! surfaces immediately as a sentence-level failure, it is never retried
//! here.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::lang::Language;
use crate::models::{
    LanguageIdentifier, Morpheme, MorphologicalAnalyzer, ReadingAnnotator, TranslationModel,
};

/// Client for the model server's HTTP API.
#[derive(Debug, Clone)]
pub struct ModelServerClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    translator_model: String,
}

#[derive(Debug, Serialize)]
struct IdentifyRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct IdentifyResponse {
    language: String,
    confidence: f32,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    source_lang: &'a str,
    target_lang: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translation: String,
}

#[derive(Debug, Serialize)]
struct TokenizeRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenizeResponse {
    morphemes: Vec<Morpheme>,
}

#[derive(Debug, Serialize)]
struct ReadingsRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ReadingsResponse {
    tokens: Vec<ReadingToken>,
}

#[derive(Debug, Deserialize)]
struct ReadingToken {
    surface: String,
    reading: String,
}

impl ModelServerClient {
    /// Create a client for the server at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        translator_model: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            translator_model: translator_model.into(),
        }
    }

    /// The model identifier sent with every translation request; also the
    /// model component of cache keys.
    pub fn translator_model(&self) -> &str {
        &self.translator_model
    }

    async fn post<T: Serialize, R: DeserializeOwned>(&self, endpoint: &str, body: &T) -> Result<R> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self.http.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to reach model server at {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Model server error ({}) on {}: {}", status, endpoint, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse model server response from {}", endpoint))
    }
}

#[async_trait]
impl LanguageIdentifier for ModelServerClient {
    async fn predict(&self, text: &str) -> Result<(String, f32)> {
        let response: IdentifyResponse = self.post("/identify", &IdentifyRequest { text }).await?;
        Ok((response.language, response.confidence))
    }
}

#[async_trait]
impl TranslationModel for ModelServerClient {
    async fn translate(&self, text: &str, source: Language, target: &str) -> Result<String> {
        let response: TranslateResponse = self
            .post(
                "/translate",
                &TranslateRequest {
                    text,
                    source_lang: source.code(),
                    target_lang: target,
                    model: &self.translator_model,
                },
            )
            .await?;
        Ok(response.translation)
    }
}

#[async_trait]
impl MorphologicalAnalyzer for ModelServerClient {
    async fn tokenize(&self, text: &str) -> Result<Vec<Morpheme>> {
        let response: TokenizeResponse = self.post("/tokenize", &TokenizeRequest { text }).await?;
        Ok(response.morphemes)
    }
}

#[async_trait]
impl ReadingAnnotator for ModelServerClient {
    async fn annotate(&self, text: &str) -> Result<String> {
        let response: ReadingsResponse = self.post("/readings", &ReadingsRequest { text }).await?;
        Ok(format_readings(&response.tokens))
    }
}

/// Render reading tokens in bracket notation: `漢字[かんじ]` when the reading
/// differs from the surface form, plain pass-through when it does not.
fn format_readings(tokens: &[ReadingToken]) -> String {
    let mut out = String::new();
    for token in tokens {
        if token.reading.is_empty() || token.reading == token.surface {
            out.push_str(&token.surface);
        } else {
            out.push_str(&format!("{}[{}]", token.surface, token.reading));
        }
    }
    out
}
