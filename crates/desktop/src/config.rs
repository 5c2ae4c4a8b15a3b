//! Configuration management using config.toml

use jbk_core::{JbkError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Project URL, e.g. https://xyz.supabase.co
    #[serde(default)]
    pub supabase_url: String,

    /// Public anon key sent as `apikey`
    #[serde(default)]
    pub supabase_anon_key: String,

    /// Where the signed-in session is kept between runs
    #[serde(default = "default_session_file")]
    pub session_file: String,

    /// Seconds between connectivity checks
    #[serde(default = "default_health_check_secs")]
    pub health_check_secs: u64,
}

fn default_session_file() -> String {
    "session.json".to_string()
}

fn default_health_check_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            session_file: default_session_file(),
            health_check_secs: default_health_check_secs(),
        }
    }
}

impl Config {
    /// Load config from file, creating default if it doesn't exist, then
    /// apply environment overrides
    pub fn load() -> Self {
        let mut config = Self::load_from(Path::new(CONFIG_PATH));
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::error!("Error parsing {}: {}", path.display(), e);
                        return Config::default();
                    }
                },
                Err(e) => {
                    tracing::error!("Error reading {}: {}", path.display(), e);
                    return Config::default();
                }
            }
        }

        // Write a template the user can fill in
        let config = Config::default();
        if let Err(e) = config.save_to(path) {
            tracing::warn!("Could not create {}: {}", path.display(), e);
        }
        config
    }

    /// `SUPABASE_URL` and `SUPABASE_ANON_KEY` win over the file
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("SUPABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.supabase_url = url;
        }
        if let Some(key) = var("SUPABASE_ANON_KEY").filter(|v| !v.trim().is_empty()) {
            self.supabase_anon_key = key;
        }
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| JbkError::Config(e.to_string()))?;
        fs::write(path, content).map_err(|e| JbkError::Config(e.to_string()))?;
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        !self.supabase_url.trim().is_empty() && !self.supabase_anon_key.trim().is_empty()
    }

    /// Why the backend client cannot be built, if it cannot
    pub fn validate(&self) -> Result<()> {
        if self.supabase_url.trim().is_empty() {
            return Err(JbkError::Config(format!(
                "supabase_url mancante: impostalo in {} o con SUPABASE_URL",
                CONFIG_PATH
            )));
        }
        if self.supabase_anon_key.trim().is_empty() {
            return Err(JbkError::Config(format!(
                "supabase_anon_key mancante: impostalo in {} o con SUPABASE_ANON_KEY",
                CONFIG_PATH
            )));
        }
        if !self.supabase_url.starts_with("http://") && !self.supabase_url.starts_with("https://") {
            return Err(JbkError::Config(format!("URL non valido: {}", self.supabase_url)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_creates_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config::load_from(&path);
        assert_eq!(config, Config::default());
        assert!(path.exists());
        assert!(!config.is_valid());
    }

    #[test]
    fn partial_file_gets_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "supabase_url = \"https://jbk.supabase.co\"\nsupabase_anon_key = \"anon\"\n").unwrap();
        let config = Config::load_from(&path);
        assert!(config.is_valid());
        assert_eq!(config.session_file, "session.json");
        assert_eq!(config.health_check_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = Config {
            supabase_url: "https://old.supabase.co".into(),
            ..Default::default()
        };
        config.apply_env(|key| match key {
            "SUPABASE_URL" => Some("https://new.supabase.co".into()),
            "SUPABASE_ANON_KEY" => Some("key".into()),
            _ => None,
        });
        assert_eq!(config.supabase_url, "https://new.supabase.co");
        assert_eq!(config.supabase_anon_key, "key");
    }

    #[test]
    fn validate_explains_what_is_missing() {
        let config = Config {
            supabase_url: "https://jbk.supabase.co".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("supabase_anon_key"));

        let config = Config {
            supabase_url: "jbk.supabase.co".into(),
            supabase_anon_key: "anon".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
