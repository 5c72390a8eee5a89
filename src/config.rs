//! Configuration loader and validator for the demo servers.
use crate::model::Demo;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub app: App,
    pub server: Server,
    pub database: Database,
}

/// App-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct App {
    /// Directory holding one SQLite file per demo.
    pub data_dir: String,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Server {
    pub host: String,
    pub port: u16,
    /// Show underlying error details on 500 pages.
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Database {
    /// Log every SQL statement issued.
    #[serde(default)]
    pub echo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: App {
                data_dir: "./data".into(),
            },
            server: Server {
                host: "127.0.0.1".into(),
                port: 5000,
                debug: true,
            },
            database: Database { echo: true },
        }
    }
}

impl Config {
    /// Ensure required directories exist (creates `app.data_dir` if missing).
    pub fn ensure_dirs(&self) -> Result<(), std::io::Error> {
        fs::create_dir_all(&self.app.data_dir)
    }

    /// SQLite URL for a demo's database inside `app.data_dir`.
    pub fn database_url(&self, demo: Demo) -> String {
        format!(
            "sqlite://{}/{}",
            self.app.data_dir.trim_end_matches('/'),
            demo.database_file()
        )
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Like [`load`], but falls back to [`Config::default`] when the file is absent.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "config file not found; using defaults");
        return Ok(Config::default());
    }
    load(Some(path))
}

/// Validate a configuration instance.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.app.data_dir.trim().is_empty() {
        return Err(ConfigError::Invalid("app.data_dir must be non-empty"));
    }
    if cfg.server.host.trim().is_empty() {
        return Err(ConfigError::Invalid("server.host must be non-empty"));
    }
    if cfg.server.port == 0 {
        return Err(ConfigError::Invalid("server.port must be > 0"));
    }
    Ok(())
}

/// Reference YAML matching [`Config::default`].
pub fn example() -> &'static str {
    r#"app:
  data_dir: "./data"

server:
  host: "127.0.0.1"
  port: 5000
  debug: true

database:
  echo: true
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_example_ok() {
        let cfg: Config = serde_yaml::from_str(example()).unwrap();
        validate(&cfg).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn flags_default_to_off() {
        let cfg: Config = serde_yaml::from_str(
            "app:\n  data_dir: ./d\nserver:\n  host: 0.0.0.0\n  port: 8080\ndatabase: {}\n",
        )
        .unwrap();
        assert!(!cfg.server.debug);
        assert!(!cfg.database.echo);
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn invalid_values() {
        let mut cfg = Config::default();
        cfg.app.data_dir = " ".into();
        let err = validate(&cfg).unwrap_err();
        match err { ConfigError::Invalid(msg) => assert!(msg.contains("data_dir")), _ => panic!("wrong error") }

        let mut cfg = Config::default();
        cfg.server.host = "".into();
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));

        let mut cfg = Config::default();
        cfg.server.port = 0;
        let err = validate(&cfg).unwrap_err();
        match err { ConfigError::Invalid(msg) => assert!(msg.contains("server.port")), _ => panic!("wrong error") }
    }

    #[test]
    fn database_url_per_demo() {
        let mut cfg = Config::default();
        cfg.app.data_dir = "/tmp/demos/".into();
        assert_eq!(cfg.database_url(Demo::Pets), "sqlite:///tmp/demos/pet_shop.db");
        assert_eq!(cfg.database_url(Demo::Employees), "sqlite:///tmp/demos/employees.db");
        assert_eq!(cfg.database_url(Demo::Intro), "sqlite:///tmp/demos/movies_example.db");
    }

    #[test]
    fn ensure_dirs_creates_data_dir() {
        let td = tempdir().unwrap();
        let data_path = td.path().join("data");
        let mut cfg = Config::default();
        cfg.app.data_dir = data_path.to_string_lossy().to_string();
        cfg.ensure_dirs().unwrap();
        assert!(data_path.exists());
    }

    #[test]
    fn load_from_file_ok() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.yaml");
        fs::write(&p, example().replace("5000", "5050")).unwrap();
        let cfg = load(Some(&p)).unwrap();
        assert_eq!(cfg.server.port, 5050);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let td = tempdir().unwrap();
        let cfg = load_or_default(&td.path().join("nope.yaml")).unwrap();
        assert_eq!(cfg, Config::default());

        assert!(matches!(load(Some(&td.path().join("nope.yaml"))), Err(ConfigError::Io(_))));
    }
}
