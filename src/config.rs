use serde::{Deserialize, Serialize};

/// Browser-like identity sent with page fetches; some news sites refuse unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (iPhone; U; CPU iPhone OS 4_0 like Mac OS X; en-us) AppleWebKit/532.9 (KHTML, like Gecko) Version/4.0.5 Mobile/8A293 Safari/6531.22.7";

/// Main configuration structure loaded from wordscope.toml and environment variables
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub languages: LanguagesConfig,
    #[serde(default)]
    pub translate: TranslateConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Difficulty scoring defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Highest frequency rank considered by the difficulty estimate
    pub rank_ceiling: u32,
    /// Boundary used when a request does not carry one
    pub default_rank_boundary: f64,
    pub default_personalized: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rank_ceiling: 10_000,
            default_rank_boundary: 10_000.0,
            default_personalized: true,
        }
    }
}

/// Concurrent page fetching
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    pub default_timeout_secs: u64,
    pub max_timeout_secs: u64,
    pub user_agent: String,
    pub max_body_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: 10,
            max_timeout_secs: 120,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_body_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LanguagesConfig {
    pub available: Vec<String>,
}

impl Default for LanguagesConfig {
    fn default() -> Self {
        Self {
            available: ["en", "fr", "de", "it", "no", "ro", "es", "nl", "da", "pl", "pt", "sv"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Translation endpoint; the API key only ever comes from the environment
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslateConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/language/translate/v2".to_string(),
            timeout_ms: 10_000,
            api_key: None,
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub log_level: String,
    /// Upper bound on cached per-user probability snapshots
    pub probability_cache_max: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "wordscope=info".to_string(),
            probability_cache_max: 1000,
        }
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "wordscope=info".to_string()),
            probability_cache_max: std::env::var("WORDSCOPE_PROBABILITY_CACHE_MAX")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&v: &usize| v > 0)
                .unwrap_or(1000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            fetch: FetchConfig::default(),
            languages: LanguagesConfig::default(),
            translate: TranslateConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses WORDSCOPE_CONFIG environment variable or defaults to "wordscope.toml"
    pub fn load() -> anyhow::Result<Self> {
        crate::load_env();

        let config_path = std::env::var("WORDSCOPE_CONFIG")
            .unwrap_or_else(|_| "wordscope.toml".to_string());

        let mut config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            Self::from_toml_str(&content)?
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides();
        config.runtime = RuntimeConfig::load_from_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document; missing sections fall back to defaults
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply env overrides (env-first)
    pub fn apply_env_overrides(&mut self) {
        if let Some(ceiling) = std::env::var("WORDSCOPE_RANK_CEILING")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
        {
            tracing::debug!("WORDSCOPE_RANK_CEILING env override applied");
            self.scoring.rank_ceiling = ceiling;
        }
        if let Some(timeout) = std::env::var("WORDSCOPE_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            tracing::debug!("WORDSCOPE_FETCH_TIMEOUT_SECS env override applied");
            self.fetch.default_timeout_secs = timeout;
        }
        if let Ok(ua) = std::env::var("WORDSCOPE_USER_AGENT")
            && !ua.trim().is_empty()
        {
            self.fetch.user_agent = ua;
        }
        if let Ok(langs) = std::env::var("WORDSCOPE_LANGUAGES") {
            self.languages.available = langs
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }
        self.translate.api_key = std::env::var("WORDSCOPE_TRANSLATE_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
    }

    /// Validate and clamp values into their supported ranges
    pub fn validate(&mut self) -> anyhow::Result<()> {
        if self.scoring.rank_ceiling == 0 {
            anyhow::bail!("scoring.rank_ceiling must be at least 1");
        }
        let ceiling = f64::from(self.scoring.rank_ceiling);
        if !self.scoring.default_rank_boundary.is_finite() {
            anyhow::bail!("scoring.default_rank_boundary must be a finite number");
        }
        if self.scoring.default_rank_boundary > ceiling || self.scoring.default_rank_boundary < 1.0
        {
            tracing::warn!(
                "default_rank_boundary {} outside [1, {}], clamping",
                self.scoring.default_rank_boundary,
                ceiling
            );
            self.scoring.default_rank_boundary =
                self.scoring.default_rank_boundary.clamp(1.0, ceiling);
        }

        if self.fetch.max_timeout_secs == 0 {
            anyhow::bail!("fetch.max_timeout_secs must be at least 1");
        }
        if self.fetch.default_timeout_secs == 0
            || self.fetch.default_timeout_secs > self.fetch.max_timeout_secs
        {
            tracing::warn!(
                "default_timeout_secs {} outside [1, {}], clamping",
                self.fetch.default_timeout_secs,
                self.fetch.max_timeout_secs
            );
            self.fetch.default_timeout_secs = self
                .fetch
                .default_timeout_secs
                .clamp(1, self.fetch.max_timeout_secs);
        }
        if self.fetch.max_body_bytes == 0 {
            anyhow::bail!("fetch.max_body_bytes must be greater than 0");
        }

        if self.languages.available.is_empty() {
            anyhow::bail!("languages.available must list at least one language code");
        }
        Ok(())
    }
}
