use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

const ENV_CONFIG_PATH: &str = "EVIDENCE_INTEL_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_DEADLINE_SECS: u64 = 60;
const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 8;

/// Source filtering configuration applied to the corroboration registry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceFilterConfig {
    /// Allowed domains (whitelist). If empty, all domains are allowed.
    #[serde(default)]
    pub allow: Vec<String>,
    /// Denied domains (blacklist). Applied after allow list.
    #[serde(default)]
    pub deny: Vec<String>,
}

impl SourceFilterConfig {
    /// Check if a URL is allowed based on the allow/deny lists
    pub fn is_url_allowed(&self, url: &Url) -> bool {
        let host = match url.host_str() {
            Some(h) => h.to_lowercase(),
            None => return false,
        };

        if self.deny.iter().any(|d| host.contains(&d.to_lowercase())) {
            return false;
        }

        if self.allow.is_empty() {
            return true;
        }

        self.allow.iter().any(|a| host.contains(&a.to_lowercase()))
    }

    /// Same as [`is_url_allowed`](Self::is_url_allowed) for a raw string; unparseable URLs are rejected
    pub fn is_allowed(&self, raw: &str) -> bool {
        Url::parse(raw)
            .map(|url| self.is_url_allowed(&url))
            .unwrap_or(false)
    }
}

/// Which `SourceLookup` backend answers corroboration queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupBackend {
    #[default]
    Http,
    Fixture,
    None,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorroborationConfig {
    #[serde(default)]
    pub backend: LookupBackend,
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
    /// Records file for the fixture backend
    #[serde(default)]
    pub fixtures_path: Option<String>,
    /// Source lookups in flight at once for one document
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,
}

impl Default for CorroborationConfig {
    fn default() -> Self {
        Self {
            backend: LookupBackend::default(),
            lookup_timeout_ms: DEFAULT_LOOKUP_TIMEOUT_MS,
            fixtures_path: None,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }
}

impl CorroborationConfig {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            deadline_secs: DEFAULT_DEADLINE_SECS,
        }
    }
}

impl AnalysisConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

fn default_lookup_timeout_ms() -> u64 {
    DEFAULT_LOOKUP_TIMEOUT_MS
}

fn default_max_concurrent_lookups() -> usize {
    DEFAULT_MAX_CONCURRENT_LOOKUPS
}

fn default_deadline_secs() -> u64 {
    DEFAULT_DEADLINE_SECS
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub sources: SourceFilterConfig,
    #[serde(default)]
    pub corroboration: CorroborationConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub sources: SourceFilterConfig,
    pub corroboration: CorroborationConfig,
    pub analysis: AnalysisConfig,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: SourceFilterConfig::default(),
            corroboration: CorroborationConfig::default(),
            analysis: AnalysisConfig::default(),
            port: 8080,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let config_path = std::env::var(ENV_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let file = Self::load_config_file(&config_path).unwrap_or_default();

        Self {
            sources: file.sources,
            corroboration: file.corroboration,
            analysis: file.analysis,
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => Self::parse_config(&contents, path),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    fn parse_config(contents: &str, path: &Path) -> Option<ConfigFile> {
        let contents = contents.trim();
        if contents.is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Some(ConfigFile::default());
        }

        match serde_yaml::from_str(contents) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "Loaded configuration from file");
                Some(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
