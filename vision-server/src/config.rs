//! Configuration for the vision server.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Main configuration structure, built once at startup and carried in
/// [`crate::AppState`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted request body; larger requests get 413.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    /// Directory uploaded files are written into. Created at startup.
    #[serde(default = "default_upload_dir")]
    pub dir: PathBuf,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
        }
    }
}

/// DeepFace server connection and invocation limits.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_classifier_url")]
    pub base_url: String,
    /// Face detector the DeepFace server should use (e.g. "opencv", "retinaface").
    #[serde(default = "default_detector_backend")]
    pub detector_backend: String,
    /// Upper bound on a single classification call, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Maximum number of classification calls in flight at once.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Whether inference error details are returned to clients.
    /// When false they are only logged.
    #[serde(default = "default_true")]
    pub expose_errors: bool,
}

impl ClassifierConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: default_classifier_url(),
            detector_backend: default_detector_backend(),
            timeout_secs: default_timeout(),
            max_concurrent: default_max_concurrent(),
            expose_errors: default_true(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// SQLite database holding chat messages (`sqlite:` prefix optional).
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when RUST_LOG is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_max_body_bytes() -> usize {
    50 * 1024 * 1024
}
fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}
fn default_classifier_url() -> String {
    "http://localhost:5005".to_string()
}
fn default_detector_backend() -> String {
    "opencv".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_max_concurrent() -> usize {
    1
}
fn default_true() -> bool {
    true
}
fn default_database_url() -> String {
    "sqlite:./data/messages.db".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. PORT environment variable (listening port only)
    /// 2. Environment variables (VISION__SECTION__KEY format)
    /// 3. config.toml file (if present)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let port = parse_port(env::var("PORT").ok())?;

        let config = ConfigLoader::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("server.max_body_bytes", default_max_body_bytes() as i64)?
            .set_default("uploads.dir", "uploads")?
            .set_default("classifier.base_url", default_classifier_url())?
            .set_default("classifier.timeout_secs", default_timeout() as i64)?
            .set_default("classifier.max_concurrent", default_max_concurrent() as i64)?
            .set_default("history.database_url", default_database_url())?
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("VISION")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", port)?
            .build()?;

        config.try_deserialize()
    }
}

fn parse_port(raw: Option<String>) -> Result<Option<i64>, ConfigError> {
    raw.map(|value| {
        value
            .trim()
            .parse::<u16>()
            .map(i64::from)
            .map_err(|_| ConfigError::Message(format!("invalid PORT value: {:?}", value)))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server_config() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 5000);
        assert_eq!(server.max_body_bytes, 52_428_800);
    }

    #[test]
    fn test_default_classifier_config() {
        let classifier = ClassifierConfig::default();
        assert_eq!(classifier.detector_backend, "opencv");
        assert_eq!(classifier.timeout(), Duration::from_secs(30));
        assert_eq!(classifier.max_concurrent, 1);
        assert!(classifier.expose_errors);
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port(None).unwrap(), None);
        assert_eq!(parse_port(Some("8081".to_string())).unwrap(), Some(8081));
        assert_eq!(parse_port(Some(" 5000 ".to_string())).unwrap(), Some(5000));
        assert!(parse_port(Some("http".to_string())).is_err());
        assert!(parse_port(Some("70000".to_string())).is_err());
    }

    // Mutates process environment; no other test here may read it.
    #[test]
    fn test_load_precedence_from_environment() {
        env::set_var("PORT", "6123");
        env::set_var("VISION__SERVER__PORT", "7000");
        env::set_var("VISION__CLASSIFIER__TIMEOUT_SECS", "9");
        env::set_var("VISION__CLASSIFIER__DETECTOR_BACKEND", "retinaface");

        let loaded = Config::load();

        env::remove_var("PORT");
        env::remove_var("VISION__SERVER__PORT");
        env::remove_var("VISION__CLASSIFIER__TIMEOUT_SECS");
        env::remove_var("VISION__CLASSIFIER__DETECTOR_BACKEND");

        let config = loaded.unwrap();
        assert_eq!(config.server.port, 6123);
        assert_eq!(config.classifier.timeout(), Duration::from_secs(9));
        assert_eq!(config.classifier.detector_backend, "retinaface");
        assert_eq!(config.classifier.base_url, "http://localhost:5005");
        assert_eq!(config.history.database_url, "sqlite:./data/messages.db");
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let config: Config = ConfigLoader::builder()
            .add_source(config::File::from_str(
                "[classifier]\nbase_url = \"http://deepface:5005\"\nexpose_errors = false\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.classifier.base_url, "http://deepface:5005");
        assert!(!config.classifier.expose_errors);
        assert_eq!(config.classifier.timeout_secs, 30);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.uploads.dir, PathBuf::from("uploads"));
    }
}
