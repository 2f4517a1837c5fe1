//! Layered application configuration.
//!
//! Sources, later ones winning:
//!
//! 1. `<config dir>/settings.toml`
//! 2. `<config dir>/.secrets.toml`
//! 3. environment variables prefixed `E4EFS_`, with `__` separating the
//!    section from the key (`E4EFS_POSTGRES__HOST`, `E4EFS_POOL__POOL_SIZE`)
//!
//! The config dir is `/e4efs/config` when `E4EFS_DOCKER` is set, otherwise
//! `E4EFS_CONFIG_DIR`, or the working directory. Missing
//! files are skipped. Environment values are read as TOML literals where they
//! parse (`8000`, `true`, `["http://a"]`) and as plain strings otherwise.

use std::fmt;
use std::path::{Path, PathBuf};

use axum::http::HeaderValue;
use fishsense_db::PoolSettings;
use serde::{Deserialize, Deserializer};
use sqlx::postgres::PgConnectOptions;
use toml::{Table, Value};

const ENV_PREFIX: &str = "E4EFS_";
const CONFIG_DIR_VAR: &str = "E4EFS_CONFIG_DIR";
const DOCKER_VAR: &str = "E4EFS_DOCKER";
const DOCKER_CONFIG_DIR: &str = "/e4efs/config";
const SETTINGS_FILES: [&str; 2] = ["settings.toml", ".secrets.toml"];

/// Errors raised while loading configuration. Startup aborts on any of them.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration at `{path}`: {message}")]
    Invalid { path: String, message: String },
}

impl ConfigError {
    fn invalid(path: &str, message: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// HTTP server settings (`[server]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins. Empty means no cross-origin access.
    pub cors_origins: Vec<String>,
    /// Per-request deadline in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            cors_origins: Vec::new(),
            request_timeout_secs: 30,
        }
    }
}

/// Database connection settings (`[postgres]`).
#[derive(Clone, Deserialize)]
pub struct PostgresSettings {
    #[serde(deserialize_with = "scalar_string")]
    pub host: String,
    #[serde(default = "default_pg_port")]
    pub port: u16,
    #[serde(deserialize_with = "scalar_string")]
    pub username: String,
    #[serde(deserialize_with = "scalar_string")]
    pub password: String,
    #[serde(deserialize_with = "scalar_string")]
    pub database: String,
}

fn default_pg_port() -> u16 {
    5432
}

impl fmt::Debug for PostgresSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

impl PostgresSettings {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database)
    }
}

/// Complete, validated application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub postgres: PostgresSettings,
    #[serde(default)]
    pub pool: PoolSettings,
}

impl AppConfig {
    /// Load from the default config dir and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let dir = config_dir(|name| std::env::var(name).ok());
        Self::from_sources(&dir, std::env::vars())
    }

    /// Load from `dir` plus the given environment pairs.
    pub fn from_sources(
        dir: &Path,
        env: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, ConfigError> {
        let mut merged = Table::new();
        for name in SETTINGS_FILES {
            let path = dir.join(name);
            if !path.is_file() {
                continue;
            }
            let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            let table: Table = text
                .parse()
                .map_err(|source| ConfigError::Parse { path, source })?;
            merge_tables(&mut merged, table);
        }
        apply_env_overrides(&mut merged, env);

        let config: AppConfig = serde_path_to_error::deserialize(Value::Table(merged))
            .map_err(|err| ConfigError::invalid(&err.path().to_string(), err.inner().to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::invalid("server.host", "must not be blank"));
        }
        if self.postgres.host.trim().is_empty() {
            return Err(ConfigError::invalid("postgres.host", "must not be blank"));
        }
        if self.postgres.database.trim().is_empty() {
            return Err(ConfigError::invalid("postgres.database", "must not be blank"));
        }
        if self.pool.pool_size == 0 {
            return Err(ConfigError::invalid("pool.pool_size", "must be at least 1"));
        }
        if self.pool.admission_limit == 0 {
            return Err(ConfigError::invalid("pool.admission_limit", "must be at least 1"));
        }
        if let Some(origin) = self
            .server
            .cors_origins
            .iter()
            .find(|origin| HeaderValue::from_str(origin).is_err())
        {
            return Err(ConfigError::invalid(
                "server.cors_origins",
                format!("invalid origin `{origin}`"),
            ));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "server.request_timeout_secs",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Recursively overlay `overlay` onto `base`; nested tables merge key by key.
fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(existing)), Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Directory holding the settings files. A non-empty `E4EFS_DOCKER` wins.
fn config_dir(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    if lookup(DOCKER_VAR).is_some_and(|value| !value.is_empty()) {
        return PathBuf::from(DOCKER_CONFIG_DIR);
    }
    lookup(CONFIG_DIR_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn apply_env_overrides(table: &mut Table, env: impl IntoIterator<Item = (String, String)>) {
    for (name, raw) in env {
        if name == CONFIG_DIR_VAR || name == DOCKER_VAR {
            continue;
        }
        let Some(key) = name.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let path: Vec<String> = key
            .split("__")
            .map(|segment| segment.to_ascii_lowercase())
            .collect();
        if path.iter().any(String::is_empty) {
            continue;
        }
        set_path(table, &path, env_value(&raw));
    }
}

/// Interpret an environment value as a TOML literal, falling back to a string.
fn env_value(raw: &str) -> Value {
    format!("v = {raw}")
        .parse::<Table>()
        .ok()
        .and_then(|mut table| table.remove("v"))
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

fn set_path(table: &mut Table, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut cursor = table;
    for key in parents {
        let entry = cursor
            .entry(key.clone())
            .or_insert_with(|| Value::Table(Table::new()));
        if !entry.is_table() {
            *entry = Value::Table(Table::new());
        }
        let Value::Table(next) = entry else {
            return;
        };
        cursor = next;
    }
    cursor.insert(last.clone(), value);
}

/// Accept any scalar for string settings, so `E4EFS_POSTGRES__PASSWORD=1234`
/// still yields the string `"1234"`.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use assert_matches::assert_matches;

    use super::*;

    const SETTINGS: &str = r#"
[server]
port = 9000
cors_origins = ["http://localhost:5173"]

[postgres]
host = "db.internal"
username = "fishsense"
password = "placeholder"
database = "fishsense"

[pool]
pool_size = 4
"#;

    fn no_env() -> Vec<(String, String)> {
        Vec::new()
    }

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn settings_file_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.toml"), SETTINGS).unwrap();

        let config = AppConfig::from_sources(dir.path(), no_env()).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.postgres.port, 5432);
        assert_eq!(config.pool.pool_size, 4);
        assert_eq!(config.pool.max_overflow, 10);
        assert_eq!(config.pool.admission_limit, 20);
    }

    #[test]
    fn secrets_file_overlays_settings_per_key() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.toml"), SETTINGS).unwrap();
        fs::write(
            dir.path().join(".secrets.toml"),
            "[postgres]\npassword = \"from-secrets\"\n",
        )
        .unwrap();

        let config = AppConfig::from_sources(dir.path(), no_env()).unwrap();
        assert_eq!(config.postgres.password, "from-secrets");
        assert_eq!(config.postgres.host, "db.internal");
    }

    #[test]
    fn environment_wins_and_is_coerced() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.toml"), SETTINGS).unwrap();

        let config = AppConfig::from_sources(
            dir.path(),
            env(&[
                ("E4EFS_POSTGRES__HOST", "10.0.0.5"),
                ("E4EFS_POSTGRES__PASSWORD", "12345"),
                ("E4EFS_POOL__ADMISSION_LIMIT", "3"),
                ("E4EFS_SERVER__PORT", "8080"),
                ("E4EFS_DOCKER", "1"),
                ("FISHSENSE_SERVER__PORT", "1"),
                ("UNRELATED", "ignored"),
            ]),
        )
        .unwrap();
        assert_eq!(config.postgres.host, "10.0.0.5");
        assert_eq!(config.postgres.password, "12345");
        assert_eq!(config.pool.admission_limit, 3);
        assert_eq!(config.server.port, 8080);
    }

    fn vars(
        pairs: &'static [(&'static str, &'static str)],
    ) -> impl Fn(&str) -> Option<String> {
        move |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn docker_flag_selects_the_container_config_dir() {
        assert_eq!(config_dir(vars(&[])), PathBuf::from("."));
        assert_eq!(
            config_dir(vars(&[("E4EFS_CONFIG_DIR", "/etc/fishsense")])),
            PathBuf::from("/etc/fishsense")
        );
        assert_eq!(
            config_dir(vars(&[
                ("E4EFS_DOCKER", "true"),
                ("E4EFS_CONFIG_DIR", "/etc/fishsense"),
            ])),
            PathBuf::from("/e4efs/config")
        );
        assert_eq!(
            config_dir(vars(&[("E4EFS_DOCKER", "")])),
            PathBuf::from(".")
        );
    }

    #[test]
    fn environment_alone_is_enough() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::from_sources(
            dir.path(),
            env(&[
                ("E4EFS_POSTGRES__HOST", "localhost"),
                ("E4EFS_POSTGRES__USERNAME", "postgres"),
                ("E4EFS_POSTGRES__PASSWORD", "postgres"),
                ("E4EFS_POSTGRES__DATABASE", "fishsense"),
            ]),
        )
        .unwrap();
        assert_eq!(config.postgres.database, "fishsense");
    }

    #[test]
    fn missing_postgres_section_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::from_sources(dir.path(), no_env());
        assert_matches!(result, Err(ConfigError::Invalid { .. }));
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.toml"), SETTINGS).unwrap();

        let result =
            AppConfig::from_sources(dir.path(), env(&[("E4EFS_POOL__POOL_SIZE", "0")]));
        assert_matches!(result, Err(ConfigError::Invalid { path, .. }) if path == "pool.pool_size");
    }

    #[test]
    fn unparseable_cors_origin_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.toml"), SETTINGS).unwrap();

        let result = AppConfig::from_sources(
            dir.path(),
            env(&[("E4EFS_SERVER__CORS_ORIGINS", "[\"http://bad\\norigin\"]")]),
        );
        assert_matches!(
            result,
            Err(ConfigError::Invalid { path, .. }) if path == "server.cors_origins"
        );
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.toml"), "[postgres\nhost = ").unwrap();
        let result = AppConfig::from_sources(dir.path(), no_env());
        assert_matches!(result, Err(ConfigError::Parse { .. }));
    }

    #[test]
    fn password_is_redacted_in_debug_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.toml"), SETTINGS).unwrap();
        let config = AppConfig::from_sources(dir.path(), no_env()).unwrap();
        let rendered = format!("{:?}", config.postgres);
        assert!(!rendered.contains("placeholder"));
        assert!(rendered.contains("<redacted>"));
    }
}
