//! Configuration: ordered providers, first value wins.
//!
//! 설정 값은 여러 공급자(provider)를 순서대로 조회해서 결정합니다.
//! 예: 호스팅 시크릿 파일 → 환경 변수 → 기본값.
//! 클라이언트 파사드는 어느 공급자가 값을 돌려줬는지 알지 못합니다.

use crate::error::{HuddleError, HuddleResult};
use serde_json::Value;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Data directory for the JSON file store.
pub const KEY_DATA_DIR: &str = "HUDDLE_DATA_DIR";
/// Backend selector: `local` or `hosted`.
pub const KEY_BACKEND: &str = "HUDDLE_BACKEND";
/// Hosted database URL.
pub const KEY_HOSTED_URL: &str = "SUPABASE_URL";
/// Hosted database anonymous key.
pub const KEY_HOSTED_ANON_KEY: &str = "SUPABASE_ANON_KEY";
/// Hosted database service-role key (admin operations).
pub const KEY_HOSTED_SERVICE_KEY: &str = "SUPABASE_SERVICE_KEY";

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "data/db";

// ════════════════════════════════════════════
// Providers
// ════════════════════════════════════════════

/// One source of configuration values.
pub trait ConfigProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Value for `key`, if this provider has one.
    fn get(&self, key: &str) -> Option<String>;
}

/// Process environment, optionally with a key prefix.
#[derive(Debug, Default, Clone)]
pub struct EnvProvider {
    prefix: String,
}

impl EnvProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `<prefix><key>` instead of `<key>`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl ConfigProvider for EnvProvider {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        env::var(format!("{}{}", self.prefix, key))
            .ok()
            .filter(|value| !value.is_empty())
    }
}

/// Flat JSON object file (`{"KEY": "value", ...}`), e.g. a secrets file.
///
/// A missing file provides nothing. Non-string scalars are rendered as text.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl JsonFileProvider {
    /// Load the file at `path`; absent files yield an empty provider.
    pub fn load(path: impl AsRef<Path>) -> HuddleResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut values = HashMap::new();

        if path.is_file() {
            let json = fs::read_to_string(&path)?;
            let parsed: serde_json::Map<String, Value> = serde_json::from_str(&json)?;
            for (key, value) in parsed {
                let text = match value {
                    Value::String(s) => s,
                    Value::Null => continue,
                    other => other.to_string(),
                };
                values.insert(key, text);
            }
        }

        Ok(Self { path, values })
    }

    /// File this provider was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigProvider for JsonFileProvider {
    fn name(&self) -> &str {
        "json-file"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// In-memory key/value provider (defaults, tests, CLI overrides).
#[derive(Debug, Default, Clone)]
pub struct MapProvider {
    name: String,
    values: HashMap<String, String>,
}

impl MapProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: HashMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl ConfigProvider for MapProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

// ════════════════════════════════════════════
// Resolver
// ════════════════════════════════════════════

/// Tries providers in order; the first one returning a value wins.
#[derive(Default)]
pub struct ConfigResolver {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider (lower priority than those already added).
    pub fn with_provider(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Standard chain: optional secrets file, then the environment.
    pub fn standard(secrets_file: Option<&Path>) -> HuddleResult<Self> {
        let mut resolver = Self::new();
        if let Some(path) = secrets_file {
            resolver = resolver.with_provider(JsonFileProvider::load(path)?);
        }
        Ok(resolver.with_provider(EnvProvider::new()))
    }

    /// Value for `key` from the first provider that has it.
    pub fn get(&self, key: &str) -> Option<String> {
        self.providers.iter().find_map(|provider| {
            let value = provider.get(key)?;
            debug!(key, provider = provider.name(), "config value resolved");
            Some(value)
        })
    }

    /// Like [`get`](Self::get), but a missing key is an error.
    pub fn require(&self, key: &str) -> HuddleResult<String> {
        self.get(key).ok_or_else(|| HuddleError::Config {
            key: key.to_string(),
            hint: format!("set {key} in the environment or the secrets file"),
        })
    }
}

// ════════════════════════════════════════════
// HuddleConfig
// ════════════════════════════════════════════

/// Credentials for the hosted relational backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedCredentials {
    pub url: String,
    pub key: String,
}

/// Which backend the client facade talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendMode {
    /// JSON files under `data_dir`
    Local,
    /// Hosted database
    Hosted(HostedCredentials),
}

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuddleConfig {
    pub data_dir: PathBuf,
    pub backend: BackendMode,
}

impl HuddleConfig {
    /// Local backend at `data_dir`.
    pub fn local(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            backend: BackendMode::Local,
        }
    }

    /// Resolve from providers.
    ///
    /// `HUDDLE_BACKEND=hosted` requires `SUPABASE_URL` and `SUPABASE_ANON_KEY`.
    pub fn resolve(resolver: &ConfigResolver) -> HuddleResult<Self> {
        let data_dir = resolver
            .get(KEY_DATA_DIR)
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());

        let backend = match resolver
            .get(KEY_BACKEND)
            .map(|mode| mode.to_lowercase())
            .as_deref()
        {
            None | Some("local") => BackendMode::Local,
            Some("hosted") => BackendMode::Hosted(HostedCredentials {
                url: resolver.require(KEY_HOSTED_URL)?,
                key: resolver.require(KEY_HOSTED_ANON_KEY)?,
            }),
            Some(other) => {
                return Err(HuddleError::InvalidArguments(format!(
                    "{KEY_BACKEND} must be 'local' or 'hosted', got '{other}'"
                )));
            }
        };

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            backend,
        })
    }

    /// Service-role credentials for admin operations (seeding a hosted backend).
    pub fn admin_credentials(resolver: &ConfigResolver) -> HuddleResult<HostedCredentials> {
        Ok(HostedCredentials {
            url: resolver.require(KEY_HOSTED_URL)?,
            key: resolver.require(KEY_HOSTED_SERVICE_KEY)?,
        })
    }
}
