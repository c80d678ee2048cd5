use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://www.grc.com";
pub const DEFAULT_BACKTO: i32 = 2005;
pub const DEFAULT_OUTPUT: &str = "snarchive.xml";
pub const DEFAULT_CACHE_DIR: &str = ".cache";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Run configuration. Fixed defaults, each overridable through `SNARCHIVE_*` env vars.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    /// Oldest archive year to include; `None` means only the current page.
    pub backto: Option<i32>,
    pub output: PathBuf,
    pub cache_dir: PathBuf,
    pub template: Option<PathBuf>,
    pub item_template: Option<PathBuf>,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            backto: Some(DEFAULT_BACKTO),
            output: PathBuf::from(DEFAULT_OUTPUT),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            template: None,
            item_template: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();
        if let Some(v) = lookup("SNARCHIVE_BASE_URL") {
            cfg.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("SNARCHIVE_BACKTO") {
            cfg.backto = match v.trim() {
                "" | "0" => None,
                s => Some(parse_num("SNARCHIVE_BACKTO", s)?),
            };
        }
        if let Some(v) = lookup("SNARCHIVE_OUTPUT") { cfg.output = PathBuf::from(v); }
        if let Some(v) = lookup("SNARCHIVE_CACHE_DIR") { cfg.cache_dir = PathBuf::from(v); }
        cfg.template = lookup("SNARCHIVE_TEMPLATE").map(PathBuf::from);
        cfg.item_template = lookup("SNARCHIVE_ITEM_TEMPLATE").map(PathBuf::from);
        if let Some(v) = lookup("SNARCHIVE_TIMEOUT_SECS") {
            cfg.timeout = Duration::from_secs(parse_num("SNARCHIVE_TIMEOUT_SECS", v.trim())?);
        }
        Ok(cfg)
    }

    pub fn current_url(&self) -> String {
        format!("{}/securitynow.htm", self.base_url)
    }

    pub fn year_url(&self, year: i32) -> String {
        format!("{}/sn/past/{}.htm", self.base_url, year)
    }
}

fn parse_num<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidNumber { var, value: value.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let cfg = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.current_url(), "https://www.grc.com/securitynow.htm");
        assert_eq!(cfg.year_url(2015), "https://www.grc.com/sn/past/2015.htm");
    }

    #[test]
    fn overrides_and_disabled_history() {
        let cfg = Config::from_lookup(lookup(&[
            ("SNARCHIVE_BASE_URL", "http://localhost:8080/"),
            ("SNARCHIVE_BACKTO", "0"),
            ("SNARCHIVE_OUTPUT", "out.xml"),
            ("SNARCHIVE_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert_eq!(cfg.backto, None);
        assert_eq!(cfg.output, PathBuf::from("out.xml"));
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_number_is_an_error() {
        let err = Config::from_lookup(lookup(&[("SNARCHIVE_BACKTO", "last year")])).unwrap_err();
        assert!(err.to_string().contains("SNARCHIVE_BACKTO"));
    }
}
