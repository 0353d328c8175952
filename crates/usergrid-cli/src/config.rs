// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use usergrid_app::PAGE_SIZE;

pub const APP_NAME: &str = "usergrid";
pub const CONFIG_PATH_ENV: &str = "USERGRID_CONFIG_PATH";

const CONFIG_VERSION: i64 = 1;
const DEFAULT_FETCH_URL: &str = "http://localhost:5001/api/users";
const DEFAULT_UPDATE_URL: &str = "http://localhost:5001/api/update-user";
const DEFAULT_TIMEOUT: &str = "10s";
const DEFAULT_LOG_LEVEL: &str = "info";
const MAX_PAGE_SIZE: u32 = 1000;
const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub grid: Grid,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api: Api::default(),
            grid: Grid::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub fetch_url: Option<String>,
    pub update_url: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            fetch_url: Some(DEFAULT_FETCH_URL.to_owned()),
            update_url: Some(DEFAULT_UPDATE_URL.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Grid {
    pub page_size: Option<u32>,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            page_size: Some(PAGE_SIZE),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` and put values under [api], [grid], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        for (key, value) in [
            ("api.fetch_url", &self.api.fetch_url),
            ("api.update_url", &self.api.update_url),
        ] {
            if let Some(url) = value {
                validate_endpoint(key, url)
                    .with_context(|| format!("invalid [api] section in {}", path.display()))?;
            }
        }

        if let Some(timeout) = &self.api.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "api.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(page_size) = self.grid.page_size
            && !(1..=MAX_PAGE_SIZE).contains(&page_size)
        {
            bail!(
                "grid.page_size in {} must be between 1 and {}, got {}",
                path.display(),
                MAX_PAGE_SIZE,
                page_size
            );
        }

        if let Some(level) = &self.log.level
            && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str())
        {
            bail!(
                "log.level in {} must be one of {}, got {:?}",
                path.display(),
                LOG_LEVELS.join(", "),
                level
            );
        }

        if let Some(file) = &self.log.file
            && file.trim().is_empty()
        {
            bail!(
                "log.file in {} is empty; remove the key to use the default log location",
                path.display()
            );
        }

        Ok(())
    }

    pub fn fetch_url(&self) -> &str {
        self.api.fetch_url.as_deref().unwrap_or(DEFAULT_FETCH_URL)
    }

    pub fn update_url(&self) -> &str {
        self.api.update_url.as_deref().unwrap_or(DEFAULT_UPDATE_URL)
    }

    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(self.api.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn page_size(&self) -> u32 {
        self.grid.page_size.unwrap_or(PAGE_SIZE)
    }

    pub fn log_level(&self) -> String {
        self.log
            .level
            .as_deref()
            .unwrap_or(DEFAULT_LOG_LEVEL)
            .to_ascii_lowercase()
    }

    /// Explicit `[log].file`, else `<cache dir>/usergrid/usergrid.log`.
    pub fn log_file(&self) -> Option<PathBuf> {
        match &self.log.file {
            Some(file) => Some(PathBuf::from(file)),
            None => dirs::cache_dir().map(|root| root.join(APP_NAME).join("usergrid.log")),
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# usergrid config\n# Place this file at: {}\n\nversion = 1\n\n[api]\nfetch_url = \"{}\"\nupdate_url = \"{}\"\ntimeout = \"{}\"\n\n[grid]\npage_size = {}\n\n[log]\n# One of: off, error, warn, info, debug, trace. USERGRID_LOG overrides it.\nlevel = \"{}\"\n# Optional. Default is the platform cache dir (for example ~/.cache/usergrid/usergrid.log)\n# file = \"/absolute/path/to/usergrid.log\"\n",
            path.display(),
            DEFAULT_FETCH_URL,
            DEFAULT_UPDATE_URL,
            DEFAULT_TIMEOUT,
            PAGE_SIZE,
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn validate_endpoint(key: &str, raw: &str) -> Result<()> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("{key} must not be empty");
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        bail!("{key} must be an http:// or https:// URL, got {trimmed:?}");
    }
    Ok(())
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        let secs = mins
            .checked_mul(60)
            .ok_or_else(|| anyhow!("timeout {raw:?} is too large"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 10s)")
}

#[cfg(test)]
mod tests {
    use super::{CONFIG_PATH_ENV, Config, parse_duration};
    use anyhow::Result;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;
    use usergrid_testkit::temp_config_path;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let (temp, path) = temp_config_path()?;
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let (_temp, path) = temp_config_path()?;
        let config = Config::load(&path)?;
        assert_eq!(config.version, 1);
        assert_eq!(config.fetch_url(), "http://localhost:5001/api/users");
        assert_eq!(config.update_url(), "http://localhost:5001/api/update-user");
        assert_eq!(config.page_size(), 200);
        assert_eq!(config.timeout()?, Duration::from_secs(10));
        assert_eq!(config.log_level(), "info");
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[api]\nfetch_url = \"http://localhost/api/users\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[api], [grid], and [log]"));
        Ok(())
    }

    #[test]
    fn full_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[api]\nfetch_url = \"https://users.internal/api/users\"\nupdate_url = \"https://users.internal/api/update-user\"\ntimeout = \"2s\"\n[grid]\npage_size = 50\n[log]\nlevel = \"DEBUG\"\nfile = \"/var/log/usergrid.log\"\n",
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.fetch_url(), "https://users.internal/api/users");
        assert_eq!(config.update_url(), "https://users.internal/api/update-user");
        assert_eq!(config.timeout()?, Duration::from_secs(2));
        assert_eq!(config.page_size(), 50);
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.log_file(), Some(PathBuf::from("/var/log/usergrid.log")));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 3\n")?;
        let error = Config::load(&path).expect_err("v3 config should fail");
        assert!(error.to_string().contains("unsupported config version 3"));
        Ok(())
    }

    #[test]
    fn relative_endpoint_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[api]\nupdate_url = \"/api/update-user\"\n")?;
        let error = Config::load(&path).expect_err("relative url should fail");
        let message = format!("{error:#}");
        assert!(message.contains("api.update_url"), "unexpected message: {message}");
        assert!(message.contains("http://"), "unexpected message: {message}");
        Ok(())
    }

    #[test]
    fn page_size_bounds_are_validated() -> Result<()> {
        for raw in ["0", "5000"] {
            let (_temp, path) = write_config(&format!("version = 1\n[grid]\npage_size = {raw}\n"))?;
            let error = Config::load(&path).expect_err("out of range page size should fail");
            assert!(
                error.to_string().contains("grid.page_size"),
                "unexpected message: {error}"
            );
        }
        Ok(())
    }

    #[test]
    fn unknown_log_level_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[log]\nlevel = \"loud\"\n")?;
        let error = Config::load(&path).expect_err("unknown level should fail");
        let message = error.to_string();
        assert!(message.contains("log.level"));
        assert!(message.contains("trace"));
        Ok(())
    }

    #[test]
    fn timeout_parses_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        Ok(())
    }

    #[test]
    fn timeout_rejects_invalid_and_zero_values() -> Result<()> {
        let error = parse_duration("soon").expect_err("invalid duration should fail");
        assert!(error.to_string().contains("invalid"));

        let (_temp, path) = write_config("version = 1\n[api]\ntimeout = \"0s\"\n")?;
        let error = Config::load(&path).expect_err("zero timeout should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn timeout_rejects_minutes_that_overflow_seconds() {
        let error = parse_duration("999999999999999999m").expect_err("overflow should fail");
        assert!(error.to_string().contains("too large"));
        assert!(parse_duration(&format!("{}m", u64::MAX / 60)).is_ok());
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let (_temp, override_path) = temp_config_path()?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, &override_path);
        }
        let resolved = Config::default_path();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
        assert_eq!(resolved?, override_path);
        Ok(())
    }

    #[test]
    fn default_path_ends_in_app_config_file() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("usergrid/config.toml"), "got {}", path.display());
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_loader() -> Result<()> {
        let (_temp, path) = temp_config_path()?;
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[api]"));
        assert!(example.contains("[grid]"));
        assert!(example.contains("[log]"));

        std::fs::write(&path, example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.page_size(), 200);
        assert_eq!(config.fetch_url(), "http://localhost:5001/api/users");
        Ok(())
    }
}
