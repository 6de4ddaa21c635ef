use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    pub mistral_api_key: Option<String>,

    #[serde(default = "default_api_url")]
    pub mistral_api_url: String,

    #[serde(default = "default_feed_urls")]
    pub feed_urls: Vec<String>,

    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,

    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("arxiv-digest");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("papers.db").to_string_lossy().to_string()
}

fn default_api_url() -> String {
    "https://api.mistral.ai".to_string()
}

fn default_feed_urls() -> Vec<String> {
    vec![
        "https://arxiv.org/rss/cs.AI".to_string(),
        "https://arxiv.org/rss/cs.LG".to_string(),
        "https://arxiv.org/rss/cs.CL".to_string(),
    ]
}

fn default_fetch_limit() -> usize {
    10
}

fn default_listen_addr() -> String {
    "127.0.0.1:8000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            mistral_api_key: None,
            mistral_api_url: default_api_url(),
            feed_urls: default_feed_urls(),
            fetch_limit: default_fetch_limit(),
            listen_addr: default_listen_addr(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| AppError::Config(e.to_string()))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("arxiv-digest")
            .join("config.toml")
    }
}
