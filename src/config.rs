use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the nutrition catalog CSV produced by the menu scraper
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Half-width of the uniform jitter band added to similarity scores
    #[serde(default = "default_recommendation_jitter")]
    pub recommendation_jitter: f64,

    /// Maximum number of items returned per meal category
    #[serde(default = "default_meals_per_category")]
    pub meals_per_category: usize,

    /// Base URL of an OpenAI-compatible chat completions API
    #[serde(default = "default_assistant_api_url")]
    pub assistant_api_url: String,

    /// API key for the assistant; the local template reply is used when unset
    #[serde(default)]
    pub assistant_api_key: Option<String>,

    /// Model name sent to the assistant API
    #[serde(default = "default_assistant_model")]
    pub assistant_model: String,

    /// Request timeout for the assistant API, in seconds
    #[serde(default = "default_assistant_timeout_secs")]
    pub assistant_timeout_secs: u64,
}

fn default_catalog_path() -> String {
    "data/menu.csv".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_recommendation_jitter() -> f64 {
    0.1
}

fn default_meals_per_category() -> usize {
    5
}

fn default_assistant_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_assistant_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_assistant_timeout_secs() -> u64 {
    15
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !self.recommendation_jitter.is_finite() || self.recommendation_jitter < 0.0 {
            anyhow::bail!(
                "RECOMMENDATION_JITTER must be a non-negative number, got {}",
                self.recommendation_jitter
            );
        }
        if self.meals_per_category == 0 {
            anyhow::bail!("MEALS_PER_CATEGORY must be at least 1");
        }
        Ok(())
    }

    /// Returns the API key only when it is present and non-blank
    pub fn assistant_key(&self) -> Option<&str> {
        self.assistant_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
