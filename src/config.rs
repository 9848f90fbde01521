// Startup configuration from the environment

use std::env;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {0} is not a valid integer")]
    Invalid(&'static str),
}

/// Credentials and paths consumed once at startup. The three identifiers
/// are required; missing any of them is fatal before the first update is
/// processed. The cookie jar is only checked for existence per request.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_id: i64,
    pub api_hash: String,
    pub bot_token: String,
    pub cookies_file: PathBuf,
    pub download_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_id = required("API_ID")?
            .parse::<i64>()
            .map_err(|_| ConfigError::Invalid("API_ID"))?;
        let api_hash = required("API_HASH")?;
        let bot_token = required("BOT_TOKEN")?;

        let cookies_file = env::var("COOKIES_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("cookies.txt"));
        let download_dir = env::var("DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::temp_dir());

        Ok(Self {
            api_id,
            api_hash,
            bot_token,
            cookies_file,
            download_dir,
        })
    }

    /// Cookie jar path, or None when no file exists there right now.
    pub fn cookies_if_present(&self) -> Option<PathBuf> {
        self.cookies_file.exists().then(|| self.cookies_file.clone())
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}
