use crate::error::ConfigError;
use std::collections::HashMap;
use std::env;
use tracing::Level;

/// Bundled config for builds without a `.env` file (web, mobile)
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";
pub const DEFAULT_SPEECH_LANG: &str = "de-DE";
pub const DEFAULT_ENTRY_LIMIT: u32 = 50;

/// Settings read once at startup and handed to the UI through context.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base: String,
    pub api_token: Option<String>,
    pub speech_lang: String,
    pub entry_limit: u32,
    pub log_level: Level,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_token: None,
            speech_lang: DEFAULT_SPEECH_LANG.to_string(),
            entry_limit: DEFAULT_ENTRY_LIMIT,
            log_level: Level::INFO,
        }
    }
}

impl AppConfig {
    /// Settings for the running platform. The browser has no process env, so
    /// web builds read the bundled file directly.
    pub fn load() -> Result<Self, ConfigError> {
        #[cfg(target_arch = "wasm32")]
        {
            Self::from_bundled()
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::from_env()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_bundled() -> Result<Self, ConfigError> {
        Self::from_env_file(BUNDLED_CONFIG)
    }

    /// Build from the contents of an env file without touching the process env.
    pub fn from_env_file(source: &str) -> Result<Self, ConfigError> {
        let pairs: HashMap<&str, &str> = parse_env_lines(source).collect();
        Self::from_lookup(|key| pairs.get(key).map(|value| value.to_string()))
    }

    /// Build from an arbitrary key lookup so tests don't touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_base = match lookup("LIFETRACKER_API_BASE") {
            Some(raw) => normalize_base(&raw)?,
            None => defaults.api_base,
        };
        let api_token = lookup("LIFETRACKER_API_TOKEN")
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        let speech_lang = lookup("LIFETRACKER_SPEECH_LANG")
            .map(|lang| lang.trim().to_string())
            .filter(|lang| !lang.is_empty())
            .unwrap_or(defaults.speech_lang);
        let entry_limit = lookup("LIFETRACKER_ENTRY_LIMIT")
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(defaults.entry_limit);
        let log_level = lookup("LIFETRACKER_LOG")
            .and_then(|raw| raw.trim().parse::<Level>().ok())
            .unwrap_or(defaults.log_level);

        Ok(Self {
            api_base,
            api_token,
            speech_lang,
            entry_limit,
            log_level,
        })
    }
}

fn normalize_base(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidUrl {
            key: "LIFETRACKER_API_BASE",
            value: raw.to_string(),
        })
    }
}

/// Populates the process env on native targets. Web builds skip this and use
/// [`AppConfig::from_bundled`].
#[cfg(not(target_arch = "wasm32"))]
pub fn load_dotenv() {
    // First try to load from .env file (desktop dev)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    // Fall back to bundled config (mobile builds)
    load_bundled_config();
}

#[cfg(not(target_arch = "wasm32"))]
fn load_bundled_config() {
    for (key, value) in parse_env_lines(BUNDLED_CONFIG) {
        // Only set if not already set (allow env override)
        if env::var(key).is_err() {
            // SAFETY: We're setting env vars at startup before any threads are spawned
            unsafe {
                env::set_var(key, value);
            }
        }
    }
}

/// `KEY=VALUE` pairs of an env file, skipping comments and blank lines.
pub fn parse_env_lines(source: &str) -> impl Iterator<Item = (&str, &str)> {
    source.lines().filter_map(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (key, value) = line.split_once('=')?;
        Some((key.trim(), value.trim()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_base, "http://localhost:8000/api");
        assert_eq!(config.speech_lang, "de-DE");
    }

    #[test]
    fn trailing_slash_is_dropped_from_base() {
        let config =
            AppConfig::from_lookup(lookup(&[("LIFETRACKER_API_BASE", "https://x.dev/api/")]))
                .unwrap();
        assert_eq!(config.api_base, "https://x.dev/api");
    }

    #[test]
    fn relative_base_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("LIFETRACKER_API_BASE", "/api")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn bad_numbers_and_blank_tokens_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            ("LIFETRACKER_ENTRY_LIMIT", "lots"),
            ("LIFETRACKER_API_TOKEN", "   "),
            ("LIFETRACKER_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.entry_limit, 50);
        assert_eq!(config.api_token, None);
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn env_lines_skip_comments() {
        let parsed: Vec<_> = parse_env_lines("# c\n\nA=1\n B = two \nnot a pair\n").collect();
        assert_eq!(parsed, vec![("A", "1"), ("B", "two")]);
    }

    #[test]
    fn bundled_file_builds_config_without_process_env() {
        let config = AppConfig::from_bundled().unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.speech_lang, DEFAULT_SPEECH_LANG);
        assert_eq!(config.entry_limit, DEFAULT_ENTRY_LIMIT);
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    fn env_file_values_override_defaults() {
        let config = AppConfig::from_env_file(
            "# web\nLIFETRACKER_API_BASE=https://tracker.example/api/\nLIFETRACKER_SPEECH_LANG=en-US\nLIFETRACKER_API_TOKEN=abc\n",
        )
        .unwrap();
        assert_eq!(config.api_base, "https://tracker.example/api");
        assert_eq!(config.speech_lang, "en-US");
        assert_eq!(config.api_token.as_deref(), Some("abc"));
    }
}
