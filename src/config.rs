use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::models::{BlendWeights, ScoringWeights};
use crate::services::CompletionParams;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub profiles: ProfileSettings,
    #[serde(default)]
    pub ranking: RankingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_judge_max_tokens")]
    pub judge_max_tokens: u32,
    #[serde(default = "default_extract_max_tokens")]
    pub extract_max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_repeat_penalty")]
    pub repeat_penalty: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_llm_endpoint(),
            judge_max_tokens: default_judge_max_tokens(),
            extract_max_tokens: default_extract_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            repeat_penalty: default_repeat_penalty(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn judge_params(&self) -> CompletionParams {
        self.params(self.judge_max_tokens)
    }

    pub fn extract_params(&self) -> CompletionParams {
        self.params(self.extract_max_tokens)
    }

    fn params(&self, max_tokens: u32) -> CompletionParams {
        CompletionParams {
            max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            repeat_penalty: self.repeat_penalty,
        }
    }
}

fn default_true() -> bool { true }
fn default_llm_endpoint() -> String { "http://127.0.0.1:8080".to_string() }
fn default_judge_max_tokens() -> u32 { 80 }
fn default_extract_max_tokens() -> u32 { 128 }
fn default_temperature() -> f32 { 0.4 }
fn default_top_p() -> f32 { 0.9 }
fn default_top_k() -> u32 { 40 }
fn default_repeat_penalty() -> f32 { 1.1 }
fn default_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileSettings {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self { data_dir: default_data_dir() }
    }
}

fn default_data_dir() -> String { "data/users".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct RankingSettings {
    #[serde(default = "default_shortlist_size")]
    pub shortlist_size: usize,
    #[serde(default = "default_top_matches")]
    pub top_matches: usize,
    #[serde(default = "default_calculate_limit")]
    pub calculate_limit: usize,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            shortlist_size: default_shortlist_size(),
            top_matches: default_top_matches(),
            calculate_limit: default_calculate_limit(),
        }
    }
}

fn default_shortlist_size() -> usize { 5 }
fn default_top_matches() -> usize { 3 }
fn default_calculate_limit() -> usize { 10 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub blend: BlendConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_exact_overlap")]
    pub exact_overlap: u8,
    #[serde(default = "default_cuisine_increment")]
    pub cuisine_increment: u8,
    #[serde(default = "default_cuisine_cap")]
    pub cuisine_cap: u8,
    #[serde(default = "default_keyword_increment")]
    pub keyword_increment: u8,
    #[serde(default = "default_keyword_cap")]
    pub keyword_cap: u8,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            exact_overlap: default_exact_overlap(),
            cuisine_increment: default_cuisine_increment(),
            cuisine_cap: default_cuisine_cap(),
            keyword_increment: default_keyword_increment(),
            keyword_cap: default_keyword_cap(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            exact_overlap: config.exact_overlap,
            cuisine_increment: config.cuisine_increment,
            cuisine_cap: config.cuisine_cap,
            keyword_increment: config.keyword_increment,
            keyword_cap: config.keyword_cap,
        }
    }
}

fn default_exact_overlap() -> u8 { 40 }
fn default_cuisine_increment() -> u8 { 30 }
fn default_cuisine_cap() -> u8 { 60 }
fn default_keyword_increment() -> u8 { 5 }
fn default_keyword_cap() -> u8 { 20 }

#[derive(Debug, Clone, Deserialize)]
pub struct BlendConfig {
    #[serde(default = "default_deterministic_weight")]
    pub deterministic: f64,
    #[serde(default = "default_judge_weight")]
    pub judge: f64,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            deterministic: default_deterministic_weight(),
            judge: default_judge_weight(),
        }
    }
}

impl From<&BlendConfig> for BlendWeights {
    fn from(config: &BlendConfig) -> Self {
        Self {
            deterministic: config.deterministic,
            judge: config.judge,
        }
    }
}

fn default_deterministic_weight() -> f64 { 0.6 }
fn default_judge_weight() -> f64 { 0.4 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "plain".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with FOOD_FRIEND)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., FOOD_FRIEND__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("FOOD_FRIEND")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("FOOD_FRIEND")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the short-form environment variables used in local setups
/// (`LLM_ENDPOINT`, `DATA_DIR`)
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(endpoint) = env::var("LLM_ENDPOINT") {
        builder = builder.set_override("llm.endpoint", endpoint)?;
    }
    if let Ok(data_dir) = env::var("DATA_DIR") {
        builder = builder.set_override("profiles.data_dir", data_dir)?;
    }

    builder.build()
}
