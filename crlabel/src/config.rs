//! Configuration: TOML file merged with command-line overrides.
//!
//! Every key is optional. A missing default config file means "all defaults";
//! a `--config` path that does not exist is an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crlabel_core::reading_lock::LockConfig;
use crlabel_core::session::SessionConfig;

use crate::cli::Cli;
use crate::error::{Error, Result};

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";
pub const DEFAULT_THEME: &str = "catppuccin-mocha";
pub const DEFAULT_SYNTAX: &str = "py";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BACKOFF_MS: u64 = 500;

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub server: Option<String>,
    pub theme: Option<String>,
    pub words_per_minute: Option<u32>,
    pub min_lock_ms: Option<u64>,
    pub fetch_retries: Option<u32>,
    pub retry_backoff_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    /// File extension used to pick a syntax for highlighting.
    pub syntax: Option<String>,
    pub log_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server: String,
    pub theme: String,
    pub session: SessionConfig,
    pub request_timeout: Duration,
    pub syntax: String,
    pub log_file: PathBuf,
}

impl Config {
    pub fn load(cli: &Cli) -> Result<Self> {
        let file_config = match &cli.config {
            Some(path) => {
                let path = Path::new(path);
                if !path.exists() {
                    return Err(Error::ConfigNotFound(path.to_path_buf()));
                }
                parse_config(&std::fs::read_to_string(path)?)?
            }
            None => {
                let path = config_path();
                if path.exists() {
                    parse_config(&std::fs::read_to_string(&path)?)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        let config = merge(file_config, cli);
        validate(&config)?;
        Ok(config)
    }
}

/// Returns the path to the default config file.
///
/// Prefers `$XDG_CONFIG_HOME/crlabel/config.toml`; falls back to
/// `~/.config/crlabel/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("crlabel").join("config.toml")
}

pub fn parse_config(content: &str) -> Result<ConfigFile> {
    let config: ConfigFile = toml::from_str(content)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if !(config.server.starts_with("http://") || config.server.starts_with("https://")) {
        return Err(Error::ConfigValidation(format!(
            "server must be an http:// or https:// URL, got {:?}",
            config.server
        )));
    }
    if config.session.lock.words_per_minute == 0 {
        return Err(Error::ConfigValidation(
            "words_per_minute must be greater than zero".to_string(),
        ));
    }
    if config.request_timeout.is_zero() {
        return Err(Error::ConfigValidation(
            "request_timeout_secs must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn merge(file: ConfigFile, cli: &Cli) -> Config {
    let defaults = LockConfig::default();
    let lock = LockConfig {
        words_per_minute: cli
            .words_per_minute
            .or(file.words_per_minute)
            .unwrap_or(defaults.words_per_minute),
        min_lock: cli
            .min_lock_ms
            .or(file.min_lock_ms)
            .map(Duration::from_millis)
            .unwrap_or(defaults.min_lock),
    };

    Config {
        server: cli
            .server
            .clone()
            .or(file.server)
            .unwrap_or_else(|| DEFAULT_SERVER.to_string()),
        theme: cli
            .theme
            .clone()
            .or(file.theme)
            .unwrap_or_else(|| DEFAULT_THEME.to_string()),
        session: SessionConfig {
            lock,
            fetch_retries: cli.fetch_retries.or(file.fetch_retries).unwrap_or(0),
            retry_backoff: Duration::from_millis(
                file.retry_backoff_ms.unwrap_or(DEFAULT_BACKOFF_MS),
            ),
        },
        request_timeout: Duration::from_secs(
            file.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        ),
        syntax: file.syntax.unwrap_or_else(|| DEFAULT_SYNTAX.to_string()),
        log_file: cli
            .log_file
            .clone()
            .or(file.log_file)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("crlabel.log")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli_with_config(path: &Path) -> Cli {
        Cli {
            config: Some(path.to_string_lossy().into_owned()),
            ..Cli::default()
        }
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = merge(parse_config("").unwrap(), &Cli::default());
        assert_eq!(config.server, DEFAULT_SERVER);
        assert_eq!(config.session, SessionConfig::default());
        assert_eq!(config.syntax, "py");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn cli_overrides_file() {
        let file = parse_config(
            r#"
            server = "http://annotate.internal:9000"
            words_per_minute = 300
            min_lock_ms = 1500
            fetch_retries = 2
            "#,
        )
        .unwrap();
        let cli = Cli {
            words_per_minute: Some(800),
            ..Cli::default()
        };
        let config = merge(file, &cli);
        assert_eq!(config.server, "http://annotate.internal:9000");
        assert_eq!(config.session.lock.words_per_minute, 800);
        assert_eq!(config.session.lock.min_lock, Duration::from_millis(1500));
        assert_eq!(config.session.fetch_retries, 2);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            parse_config("wpm = 10"),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn load_reads_explicit_file_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "server = \"http://localhost:8123\"\ntheme = \"dark\"").unwrap();

        let config = Config::load(&cli_with_config(&path)).unwrap();
        assert_eq!(config.server, "http://localhost:8123");
        assert_eq!(config.theme, "dark");

        std::fs::write(&path, "server = \"localhost:8123\"").unwrap();
        assert!(matches!(
            Config::load(&cli_with_config(&path)),
            Err(Error::ConfigValidation(_))
        ));

        std::fs::write(&path, "words_per_minute = 0").unwrap();
        assert!(matches!(
            Config::load(&cli_with_config(&path)),
            Err(Error::ConfigValidation(_))
        ));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            Config::load(&cli_with_config(&missing)),
            Err(Error::ConfigNotFound(_))
        ));
    }
}
