use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// Provider credentials are optional at startup: a request selecting a model
/// whose credential is absent fails with a ConfigurationError at call time,
/// so a deployment with only one provider key still serves that provider.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the static reference JSON files (standards catalog,
    /// pedagogical approaches, topic mappings).
    pub files_dir: PathBuf,
    /// Flat directory generated PDFs are written to and served from.
    pub output_dir: PathBuf,
    pub anthropic_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            files_dir: std::env::var("FILES_DIR")
                .unwrap_or_else(|_| "files".to_string())
                .into(),
            output_dir: std::env::var("OUTPUT_DIR")
                .unwrap_or_else(|_| "outputs".to_string())
                .into(),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an env var, treating empty strings as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_env_empty_string_is_none() {
        std::env::set_var("API_TEST_EMPTY_KEY", "  ");
        assert!(optional_env("API_TEST_EMPTY_KEY").is_none());
        std::env::remove_var("API_TEST_EMPTY_KEY");
    }

    #[test]
    fn test_optional_env_present() {
        std::env::set_var("API_TEST_SET_KEY", "sk-test");
        assert_eq!(optional_env("API_TEST_SET_KEY").as_deref(), Some("sk-test"));
        std::env::remove_var("API_TEST_SET_KEY");
    }
}
