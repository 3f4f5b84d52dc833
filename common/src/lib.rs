/*!
common/src/lib.rs

Shared configuration types for newspost.

This file provides:
- Config data structures (deserialized from TOML, every field defaulted)
- An async loader merging a default file with an optional override file
- Environment overrides and resolution of the two required API keys
*/

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// News search API (Currents API) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub api_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub language: String,
    /// Comma separated category filter passed as-is to the API
    pub category: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.currentsapi.services/v1/latest-news".to_string(),
            api_key_env: "CURRENTS_API_KEY".to_string(),
            language: "en".to_string(),
            category: "health,technology".to_string(),
        }
    }
}

/// OpenAI-compatible chat completion endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub model: String,
    /// Per-request timeout. Unset means the HTTP client default applies.
    pub timeout_seconds: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_seconds: None,
        }
    }
}

/// Language of the prompt templates and of the "no news" placeholder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

/// Generated content settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub locale: Locale,
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub news: NewsConfig,
    pub llm: LlmConfig,
    pub content: ContentConfig,
}

impl Config {
    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence). Missing files
    /// are skipped, so with neither present the built-in defaults are returned.
    pub async fn load_with_defaults(
        default_path: Option<&Path>,
        override_path: Option<&Path>,
    ) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        for path in [default_path, override_path].into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            let data = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let val: toml::Value = toml::from_str(&data)
                .with_context(|| format!("Failed to parse configuration: {}", path.display()))?;
            merge_toml(&mut config_value, val);
        }

        let cfg: Config = config_value
            .try_into()
            .context("Failed to parse merged configuration")?;
        Ok(cfg)
    }

    /// Startup resolution shared by the binaries: `default_path`, then `explicit` (which
    /// must exist) or `./config.toml` when present, then environment overrides and validation.
    pub async fn resolve<F>(default_path: &Path, explicit: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let override_path = match explicit {
            Some(p) if !p.exists() => bail!("Config file not found: {}", p.display()),
            Some(p) => Some(p.to_path_buf()),
            None => Some(PathBuf::from("config.toml")).filter(|p| p.exists()),
        };

        let mut config = Self::load_with_defaults(Some(default_path), override_path.as_deref())
            .await
            .context("failed to load configuration")?;
        config.apply_env_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides taken from the process environment (`PORT`).
    /// `lookup` abstracts `std::env::var` so callers and tests can supply their own source.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {:?}", port))?;
        }
        Ok(())
    }

    /// Sanity checks run once at startup.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.news.api_url)
            .with_context(|| format!("invalid news.api_url: {}", self.news.api_url))?;
        Url::parse(&self.llm.api_url)
            .with_context(|| format!("invalid llm.api_url: {}", self.llm.api_url))?;
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.llm.model.trim().is_empty() {
            bail!("llm.model must not be empty");
        }
        Ok(())
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}

/// API keys read once at startup. Never logged: `Debug` is implemented by hand.
#[derive(Clone)]
pub struct Secrets {
    pub news_api_key: String,
    pub llm_api_key: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("news_api_key", &"<redacted>")
            .field("llm_api_key", &"<redacted>")
            .finish()
    }
}

impl Secrets {
    /// Resolve both API keys from the environment variables named in `config`.
    /// Fails if either variable is unset or blank, naming every missing variable.
    pub fn resolve<F>(config: &Config, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let news = fetch(&config.news.api_key_env);
        let llm = fetch(&config.llm.api_key_env);

        match (news, llm) {
            (Some(news_api_key), Some(llm_api_key)) => Ok(Self {
                news_api_key,
                llm_api_key,
            }),
            (news, llm) => {
                let missing: Vec<&str> = [
                    (news.is_none(), config.news.api_key_env.as_str()),
                    (llm.is_none(), config.llm.api_key_env.as_str()),
                ]
                .into_iter()
                .filter_map(|(absent, name)| absent.then_some(name))
                .collect();
                bail!("{} must be set", missing.join(" and "))
            }
        }
    }

    /// Resolve from the real process environment.
    pub fn from_env(config: &Config) -> Result<Self> {
        Self::resolve(config, |name| std::env::var(name).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: Config = toml::from_str("").expect("parse config");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.news.category, "health,technology");
        assert_eq!(cfg.news.language, "en");
        assert_eq!(cfg.llm.model, "gpt-4o-mini");
        assert_eq!(cfg.llm.timeout_seconds, None);
        assert_eq!(cfg.content.locale, Locale::En);
        cfg.validate().expect("defaults are valid");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let toml = r#"
            [llm]
            model = "gpt-4o"

            [content]
            locale = "ru"
        "#;
        let cfg: Config = toml::from_str(toml).expect("parse config");
        assert_eq!(cfg.llm.model, "gpt-4o");
        assert_eq!(cfg.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(cfg.content.locale, Locale::Ru);
    }

    #[tokio::test]
    async fn override_file_wins_over_default_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let default_path = dir.path().join("config.default.toml");
        let override_path = dir.path().join("config.toml");
        std::fs::write(
            &default_path,
            "[server]\nport = 9000\naddress = \"127.0.0.1\"\n[news]\nlanguage = \"de\"\n",
        )
        .expect("write default");
        std::fs::write(&override_path, "[server]\nport = 9100\n").expect("write override");

        let cfg = Config::load_with_defaults(Some(default_path.as_path()), Some(override_path.as_path()))
            .await
            .expect("load");
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.address, "127.0.0.1");
        assert_eq!(cfg.news.language, "de");
    }

    #[tokio::test]
    async fn missing_files_are_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let absent = dir.path().join("nope.toml");
        let cfg = Config::load_with_defaults(Some(absent.as_path()), None)
            .await
            .expect("load");
        assert_eq!(cfg.server.port, 8000);
    }

    #[tokio::test]
    async fn resolve_rejects_missing_explicit_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let default_path = dir.path().join("config.default.toml");
        let missing = dir.path().join("missing.toml");

        let err = Config::resolve(default_path.as_path(), Some(missing.as_path()), env(&[]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[tokio::test]
    async fn resolve_merges_explicit_file_then_env() {
        let dir = tempfile::tempdir().expect("tempdir");
        let default_path = dir.path().join("config.default.toml");
        let explicit = dir.path().join("custom.toml");
        std::fs::write(&default_path, "[llm]\nmodel = \"gpt-4o\"\n").expect("write default");
        std::fs::write(&explicit, "[server]\nport = 9100\n").expect("write explicit");

        let cfg = Config::resolve(
            default_path.as_path(),
            Some(explicit.as_path()),
            env(&[("PORT", "9200")]),
        )
        .await
        .expect("resolve");
        assert_eq!(cfg.llm.model, "gpt-4o");
        assert_eq!(cfg.server.port, 9200);
    }

    #[tokio::test]
    async fn resolve_validates_result() {
        let dir = tempfile::tempdir().expect("tempdir");
        let default_path = dir.path().join("config.default.toml");
        let explicit = dir.path().join("custom.toml");
        std::fs::write(&explicit, "[news]\napi_url = \"not a url\"\n").expect("write explicit");

        let err = Config::resolve(default_path.as_path(), Some(explicit.as_path()), env(&[]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("news.api_url"));
    }

    #[test]
    fn port_env_override() {
        let mut cfg = Config::default();
        cfg.apply_env_overrides(env(&[("PORT", "8123")])).expect("override");
        assert_eq!(cfg.server.port, 8123);

        let err = cfg
            .apply_env_overrides(env(&[("PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn validate_rejects_bad_url() {
        let mut cfg = Config::default();
        cfg.news.api_url = "not a url".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn secrets_resolve_when_both_present() {
        let cfg = Config::default();
        let secrets = Secrets::resolve(
            &cfg,
            env(&[("CURRENTS_API_KEY", "news-key"), ("OPENAI_API_KEY", "llm-key")]),
        )
        .expect("resolve");
        assert_eq!(secrets.news_api_key, "news-key");
        assert_eq!(secrets.llm_api_key, "llm-key");
        assert!(!format!("{:?}", secrets).contains("news-key"));
    }

    #[test]
    fn secrets_missing_either_key_fails() {
        let cfg = Config::default();

        let err = Secrets::resolve(&cfg, env(&[("OPENAI_API_KEY", "llm-key")])).unwrap_err();
        assert_eq!(err.to_string(), "CURRENTS_API_KEY must be set");

        let err = Secrets::resolve(&cfg, env(&[("CURRENTS_API_KEY", "news-key")])).unwrap_err();
        assert_eq!(err.to_string(), "OPENAI_API_KEY must be set");

        let err = Secrets::resolve(&cfg, env(&[("CURRENTS_API_KEY", "  ")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "CURRENTS_API_KEY and OPENAI_API_KEY must be set"
        );
    }
}
