use anyhow::{anyhow, Context};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::{env, path::Path, sync::OnceLock, time::Duration};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/";
pub const DEFAULT_CONFIG_PATH: &str = "config.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_BASE_URL: &str = "ATTENDANCE_API_BASE_URL";
pub const ENV_TIMEZONE: &str = "ATTENDANCE_TIMEZONE";
pub const ENV_REQUEST_TIMEOUT: &str = "ATTENDANCE_REQUEST_TIMEOUT_SECS";
pub const ENV_CONFIG_PATH: &str = "ATTENDANCE_CONFIG_PATH";

/// Raw settings as read from `config.json` or the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub api_base_url: Option<String>,
    pub time_zone: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    api_base_url: String,
    time_zone: Tz,
    request_timeout: Duration,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            time_zone: Tz::UTC,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ResolvedConfig {
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl RuntimeConfig {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("Invalid runtime config JSON")
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&raw).map(Some)
    }

    /// Reads overrides through `lookup`; unparsable timeouts are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            api_base_url: non_empty(ENV_API_BASE_URL),
            time_zone: non_empty(ENV_TIMEZONE),
            request_timeout_secs: non_empty(ENV_REQUEST_TIMEOUT)
                .and_then(|value| value.trim().parse().ok()),
        }
    }

    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Values set in `overrides` win.
    pub fn merge(self, overrides: RuntimeConfig) -> Self {
        Self {
            api_base_url: overrides.api_base_url.or(self.api_base_url),
            time_zone: overrides.time_zone.or(self.time_zone),
            request_timeout_secs: overrides.request_timeout_secs.or(self.request_timeout_secs),
        }
    }

    pub fn resolve(&self) -> anyhow::Result<ResolvedConfig> {
        let time_zone = match &self.time_zone {
            Some(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|_| anyhow!("Invalid {} value: {}", ENV_TIMEZONE, name))?,
            None => Tz::UTC,
        };
        let mut api_base_url = self
            .api_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        if !api_base_url.ends_with('/') {
            api_base_url.push('/');
        }
        let secs = self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS).max(1);
        Ok(ResolvedConfig {
            api_base_url,
            time_zone,
            request_timeout: Duration::from_secs(secs),
        })
    }
}

static RUNTIME_CONFIG: OnceLock<ResolvedConfig> = OnceLock::new();

/// File settings first, environment on top.
pub fn load() -> anyhow::Result<ResolvedConfig> {
    let env_config = RuntimeConfig::from_env();
    let path = env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let file_config = RuntimeConfig::from_file(Path::new(&path))?.unwrap_or_default();
    file_config.merge(env_config).resolve()
}

/// Resolves the configuration once; later calls return the cached value.
pub fn init() -> anyhow::Result<&'static ResolvedConfig> {
    if let Some(cached) = RUNTIME_CONFIG.get() {
        return Ok(cached);
    }
    let resolved = load()?;
    log::info!(
        "Runtime config initialized: api_base_url={} time_zone={}",
        resolved.api_base_url(),
        resolved.time_zone().name()
    );
    Ok(RUNTIME_CONFIG.get_or_init(|| resolved))
}

pub fn current() -> &'static ResolvedConfig {
    if let Some(cached) = RUNTIME_CONFIG.get() {
        return cached;
    }
    match init() {
        Ok(resolved) => resolved,
        Err(err) => {
            log::warn!("Using default runtime config: {:#}", err);
            RUNTIME_CONFIG.get_or_init(ResolvedConfig::default)
        }
    }
}

pub fn api_base_url() -> String {
    current().api_base_url().to_string()
}

pub fn current_time_zone() -> Tz {
    current().time_zone()
}
