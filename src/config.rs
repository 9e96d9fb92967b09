use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "https://api.replicate.com";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Debug, Clone)]
pub struct MinimaxConfig {
    pub api_token: Option<String>,
    pub base_url: Option<String>,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        MinimaxConfig {
            api_token: None,
            base_url: None,
        }
    }
}

impl MinimaxConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_token = env::var("MINIMAX_API_TOKEN").ok();
        let base_url = env::var("MINIMAX_API_BASE").ok();

        MinimaxConfig {
            api_token,
            base_url,
        }
    }

    pub fn with_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Some(api_token.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub minimax: MinimaxConfig,
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            minimax: MinimaxConfig::default(),
            output_dir: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        // Picks up a local .env when present; real environment wins.
        let _ = dotenv::dotenv();
        let output_dir = env::var("RIMAGEN_OUTPUT_DIR").ok().map(PathBuf::from);

        Config {
            minimax: MinimaxConfig::from_env(),
            output_dir,
        }
    }

    pub fn with_minimax(mut self, config: MinimaxConfig) -> Self {
        self.minimax = config;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }
}
