use std::{
    collections::HashMap,
    env, fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use log::LevelFilter;

/// Environment variable pointing at the config file.
pub const CONFIG_PATH_VAR: &str = "LOXPR_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "loxpr.conf";

const LOG_LEVEL_KEY: &str = "LOG_LEVEL";

/// `KEY=VALUE` settings, one per line. Blank lines and `#` comments are ignored.
#[derive(Debug, Default, PartialEq)]
pub struct Config {
    values: HashMap<String, String>,
}

impl Config {
    pub fn parse(text: &str) -> Self {
        let values = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
            .collect();
        Self { values }
    }

    /// A missing file is not an error, it just means nothing is configured.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Self::parse(&text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => {
                Err(e).with_context(|| format!("Could not read config file {}", path.display()))
            }
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let path = env::var_os(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load(&path)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.get(LOG_LEVEL_KEY) {
            Some("INFO") => LevelFilter::Info,
            Some("ERROR") => LevelFilter::Error,
            _ => LevelFilter::Warn,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_key_values() {
        let config = Config::parse("# comment\n\nLOG_LEVEL=INFO\n  OTHER = some value  \nbroken line\n");
        assert_eq!(config.get("LOG_LEVEL"), Some("INFO"));
        assert_eq!(config.get("OTHER"), Some("some value"));
        assert_eq!(config.get("broken line"), None);
        assert_eq!(config.get("missing"), None);
    }

    #[test]
    fn log_levels() {
        assert_eq!(Config::parse("LOG_LEVEL=INFO\n").log_level(), LevelFilter::Info);
        assert_eq!(Config::parse("LOG_LEVEL=ERROR\n").log_level(), LevelFilter::Error);
        assert_eq!(Config::parse("LOG_LEVEL=WARNING\n").log_level(), LevelFilter::Warn);
        assert_eq!(Config::parse("LOG_LEVEL=info\n").log_level(), LevelFilter::Warn);
        assert_eq!(Config::parse("LOG_LEVEL=\n").log_level(), LevelFilter::Warn);
        assert_eq!(Config::default().log_level(), LevelFilter::Warn);
    }

    #[test]
    fn load_from_file() {
        let path = env::temp_dir().join(format!("loxpr-config-test-{}.conf", std::process::id()));
        fs::write(&path, "LOG_LEVEL=ERROR\r\n").unwrap();
        let config = Config::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.log_level(), LevelFilter::Error);
    }

    #[test]
    fn missing_file_is_empty_config() {
        let path = env::temp_dir().join("loxpr-config-test-does-not-exist.conf");
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }
}
