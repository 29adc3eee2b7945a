use anyhow::Result;

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    // Model server
    pub inference_base_url: String,
    pub inference_api_key: Option<String>,
    pub translator_model: String,

    // Translation cache
    pub cache_db_path: String,

    // Rate limiting
    pub rate_limit_capacity: usize,
    pub rate_limit_window_secs: u64,

    // Output options
    pub generate_furigana: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Model server
            inference_base_url: std::env::var("INFERENCE_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8600".to_string()),
            inference_api_key: std::env::var("INFERENCE_API_KEY").ok(),
            translator_model: std::env::var("TRANSLATOR_MODEL")
                .unwrap_or_else(|_| "facebook/m2m100_418M".to_string()),

            // Translation cache
            cache_db_path: std::env::var("CACHE_DB_PATH")
                .unwrap_or_else(|_| "translation_cache.sqlite".to_string()),

            // Rate limiting
            rate_limit_capacity: std::env::var("RATE_LIMIT_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            rate_limit_window_secs: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),

            // Output options
            generate_furigana: std::env::var("GENERATE_FURIGANA")
                .ok()
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}
