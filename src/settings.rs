use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

pub const DEFAULT_NOTES_PATH: &str = "data/notes.json";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub notes_path: PathBuf,
    pub gemini_model: String,
    pub gemini_base_url: String,
    #[serde(default)]
    pub gemini_api_key: Option<String>,
}

impl Settings {
    /// Defaults, then `BLOG_*` environment variables; a bare `GEMINI_API_KEY` wins
    /// over `BLOG_GEMINI_API_KEY`.
    pub fn load() -> Result<Self> {
        Self::from_env(Environment::with_prefix("BLOG"), std::env::var("GEMINI_API_KEY").ok())
    }

    fn from_env(env: Environment, api_key: Option<String>) -> Result<Self> {
        let settings = Config::builder()
            .set_default("notes_path", DEFAULT_NOTES_PATH)?
            .set_default("gemini_model", DEFAULT_MODEL)?
            .set_default("gemini_base_url", DEFAULT_GEMINI_BASE_URL)?
            .add_source(env)
            .set_override_option("gemini_api_key", api_key.filter(|k| !k.is_empty()))?
            .build()
            .context("building settings")?;
        settings
            .try_deserialize()
            .context("invalid settings")
    }

    pub fn api_key(&self) -> Option<&str> {
        self.gemini_api_key.as_deref().filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("BLOG").source(Some(map))
    }

    #[test]
    fn defaults() {
        let s = Settings::from_env(env(&[]), None).unwrap();
        assert_eq!(s.notes_path, PathBuf::from(DEFAULT_NOTES_PATH));
        assert_eq!(s.gemini_model, DEFAULT_MODEL);
        assert_eq!(s.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
        assert!(s.api_key().is_none());
    }

    #[test]
    fn prefixed_env_overrides_defaults() {
        let s = Settings::from_env(
            env(&[("BLOG_NOTES_PATH", "/tmp/export.json"), ("BLOG_GEMINI_API_KEY", "k1")]),
            None,
        )
        .unwrap();
        assert_eq!(s.notes_path, PathBuf::from("/tmp/export.json"));
        assert_eq!(s.api_key(), Some("k1"));
    }

    #[test]
    fn bare_api_key_wins() {
        let s = Settings::from_env(env(&[("BLOG_GEMINI_API_KEY", "k1")]), Some("k2".into())).unwrap();
        assert_eq!(s.api_key(), Some("k2"));
    }

    #[test]
    fn empty_bare_key_ignored() {
        let s = Settings::from_env(env(&[]), Some(String::new())).unwrap();
        assert!(s.api_key().is_none());
    }
}
