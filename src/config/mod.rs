use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use directories::BaseDirs;

use crate::language::Language;
use crate::session::SettlePolicy;

const ENV_PREFIX: &str = "COMPILERD_";

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    overrides: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(&default_config_path())
    }

    /// Defaults, then the rc file at `path`, then the environment.
    pub fn load_from(path: &Path) -> Self {
        let mut map = default_map();

        if path.exists() {
            if let Ok(file) = fs::File::open(path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }

        // COMPILERD_RUNNER_BASE_URL and friends map onto the bare key
        for (k, v) in env::vars() {
            if let Some(stripped) = k.strip_prefix(ENV_PREFIX) {
                map.insert(stripped.to_string(), v);
            }
        }

        Self {
            inner: map,
            overrides: HashMap::new(),
            config_path: path.to_path_buf(),
        }
    }

    /// CLI flags land here and win over everything else.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.overrides.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(v) = self.overrides.get(key) {
            return Some(v.clone());
        }
        if is_config_key(key) {
            if let Ok(v) = env::var(key) {
                return Some(v);
            }
        }
        self.inner.get(key).cloned()
    }

    pub fn runner_base_url(&self) -> String {
        self.get("RUNNER_BASE_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RUNNER_BASE_URL.to_string())
    }

    /// `None` leaves the transport without a timeout.
    pub fn request_timeout(&self) -> Result<Option<Duration>> {
        let raw = match self.get("REQUEST_TIMEOUT") {
            Some(v) => v,
            None => return Ok(None),
        };
        let raw = raw.trim();
        if raw.is_empty() || raw == "0" || raw.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        let secs = raw
            .parse::<u64>()
            .with_context(|| format!("REQUEST_TIMEOUT must be whole seconds, got `{}`", raw))?;
        Ok(Some(Duration::from_secs(secs)))
    }

    pub fn default_language(&self) -> Result<Language> {
        match self.get("DEFAULT_LANGUAGE") {
            Some(v) => Ok(v.parse::<Language>()?),
            None => Ok(Language::default()),
        }
    }

    pub fn settle_policy(&self) -> Result<SettlePolicy> {
        match self.get("SETTLE_POLICY") {
            Some(v) => v.parse(),
            None => Ok(SettlePolicy::default()),
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.get("LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join("compilerd").join("compilerd.log"))
    }
}

const DEFAULT_RUNNER_BASE_URL: &str = "http://localhost:3000";

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "RUNNER_BASE_URL",
        "REQUEST_TIMEOUT",
        "DEFAULT_LANGUAGE",
        "SETTLE_POLICY",
        "LOG_FILE",
    ];
    KEYS.contains(&k)
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("compilerd").join(".compilerdrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("RUNNER_BASE_URL".into(), DEFAULT_RUNNER_BASE_URL.into());
    m.insert("DEFAULT_LANGUAGE".into(), Language::default().wire_id().into());
    m.insert("SETTLE_POLICY".into(), "last-settled-wins".into());
    m.insert(
        "LOG_FILE".into(),
        env::temp_dir()
            .join("compilerd")
            .join("compilerd.log")
            .to_string_lossy()
            .into_owned(),
    );
    m
}
