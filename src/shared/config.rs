//! Application configuration. API credential, paths, encoding quality.

use serde::Deserialize;

/// Default JPEG re-encode quality. Balances payload size against what the
/// model needs to judge materials and lighting.
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Vision API key. Read from ROOMLENS_AI_API_KEY.
    #[serde(default)]
    pub ai_api_key: Option<String>,

    /// Vision API URL. Defaults to OpenAI. Read from ROOMLENS_AI_API_URL.
    #[serde(default)]
    pub ai_api_url: Option<String>,

    /// Vision model name. Defaults to "gpt-4o-mini". Read from ROOMLENS_AI_MODEL.
    #[serde(default)]
    pub ai_model: Option<String>,

    /// Directory scanned by the library picker. Read from ROOMLENS_LIBRARY_DIR.
    #[serde(default)]
    pub library_dir: Option<String>,

    /// External command that writes a fresh capture to the path it is given
    /// via the OUT placeholder. Read from ROOMLENS_CAPTURE_CMD.
    #[serde(default)]
    pub capture_cmd: Option<String>,

    /// JPEG re-encode quality (1-100). Read from ROOMLENS_JPEG_QUALITY.
    #[serde(default)]
    pub jpeg_quality: Option<u8>,

    /// Directory for saved critique reports. Read from ROOMLENS_REPORTS_DIR.
    #[serde(default)]
    pub reports_dir: Option<String>,
}

impl AppConfig {
    /// Build from the process environment (plus an optional file named by
    /// ROOMLENS_CONFIG). `.env` loading happens once in main, not here.
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("ROOMLENS"));
        if let Ok(path) = std::env::var("ROOMLENS_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    /// Returns the vision API key if configured. Reads from config or
    /// ROOMLENS_AI_API_KEY env.
    pub fn ai_api_key(&self) -> Option<String> {
        self.ai_api_key
            .clone()
            .or_else(|| std::env::var("ROOMLENS_AI_API_KEY").ok())
    }

    /// Returns the vision API URL. Defaults to OpenAI chat completions endpoint.
    pub fn ai_api_url_or_default(&self) -> String {
        self.ai_api_url
            .clone()
            .or_else(|| std::env::var("ROOMLENS_AI_API_URL").ok())
            .unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string())
    }

    /// Returns the vision model name. Defaults to "gpt-4o-mini".
    pub fn ai_model_or_default(&self) -> String {
        self.ai_model
            .clone()
            .or_else(|| std::env::var("ROOMLENS_AI_MODEL").ok())
            .unwrap_or_else(|| "gpt-4o-mini".to_string())
    }

    /// Returns true if the vision service is configured (API key present
    /// and non-blank).
    pub fn is_ai_configured(&self) -> bool {
        self.ai_api_key()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }

    /// Returns the photo library directory. Defaults to "./photos".
    pub fn library_dir_or_default(&self) -> String {
        self.library_dir
            .clone()
            .unwrap_or_else(|| "./photos".to_string())
    }

    /// Returns the reports directory. Defaults to "./reports".
    pub fn reports_dir_or_default(&self) -> String {
        self.reports_dir
            .clone()
            .unwrap_or_else(|| "./reports".to_string())
    }

    /// Returns the JPEG quality, clamped to 1-100. Defaults to
    /// DEFAULT_JPEG_QUALITY if unset.
    pub fn jpeg_quality_or_default(&self) -> u8 {
        self.jpeg_quality
            .unwrap_or(DEFAULT_JPEG_QUALITY)
            .clamp(1, 100)
    }
}
