//! Configuration management
//!
//! Settings come from an optional TOML file; the CLI layers its flags and
//! environment variables on top before calling [`Config::validate`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default number of concurrent restore workers
pub const DEFAULT_WORKERS_COUNT: usize = 10;
/// Default retention of a restored copy, in days
pub const DEFAULT_RESTORE_DAYS: i32 = 30;
pub const DEFAULT_REGION: &str = "nl-ams";

/// Deadline for fetching a single listing page
pub const PAGE_TIMEOUT: Duration = Duration::from_secs(3);
/// Deadline for a single restore request
pub const RESTORE_TIMEOUT: Duration = Duration::from_secs(10);

const CONFIG_DIR_NAME: &str = "cold2warm";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings consumed by the restore pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Number of concurrent workers, bounds in-flight restore calls
    pub workers_count: usize,

    /// Count archival objects without sending restore requests
    pub dry_run: bool,

    #[serde(skip, default = "default_page_timeout")]
    pub page_timeout: Duration,

    #[serde(skip, default = "default_restore_timeout")]
    pub restore_timeout: Duration,
}

fn default_page_timeout() -> Duration {
    PAGE_TIMEOUT
}

fn default_restore_timeout() -> Duration {
    RESTORE_TIMEOUT
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            workers_count: DEFAULT_WORKERS_COUNT,
            dry_run: false,
            page_timeout: PAGE_TIMEOUT,
            restore_timeout: RESTORE_TIMEOUT,
        }
    }
}

impl WorkerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.workers_count == 0 {
            return Err(Error::Config(
                "workers count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Connection and request settings for the S3-compatible service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Config {
    /// Custom endpoint, without the bucket name. `https://` is assumed when
    /// no scheme is given.
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket_name: String,
    /// Only objects under this prefix are listed
    pub prefix: String,
    /// How long restored copies stay available
    pub days: i32,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: DEFAULT_REGION.to_string(),
            access_key: String::new(),
            secret_key: String::new(),
            bucket_name: String::new(),
            prefix: String::new(),
            days: DEFAULT_RESTORE_DAYS,
        }
    }
}

impl S3Config {
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("endpoint", &self.endpoint),
            ("access key", &self.access_key),
            ("secret key", &self.secret_key),
            ("bucket name", &self.bucket_name),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("S3 {name} is required")));
            }
        }

        if self.days < 1 {
            return Err(Error::Config(format!(
                "restore days must be at least 1, got {}",
                self.days
            )));
        }

        normalize_endpoint(&self.endpoint)?;
        Ok(())
    }
}

/// Prefix `https://` to a scheme-less endpoint and check it parses as a URL
pub fn normalize_endpoint(endpoint: &str) -> Result<String> {
    let endpoint = endpoint.trim();
    let endpoint = if endpoint.starts_with("http") {
        endpoint.to_string()
    } else {
        format!("https://{endpoint}")
    };

    let parsed = url::Url::parse(&endpoint)
        .map_err(|e| Error::Config(format!("Invalid endpoint '{endpoint}': {e}")))?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(Error::Config(format!("Endpoint '{endpoint}' has no host")));
    }

    Ok(endpoint)
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub worker: WorkerConfig,
    pub s3: S3Config,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.worker.validate()?;
        self.s3.validate()
    }
}

/// Locates and loads the config file
pub struct ConfigManager {
    config_path: PathBuf,
    required: bool,
}

impl ConfigManager {
    /// Use the default location, `<config dir>/cold2warm/config.toml`
    ///
    /// A missing file at the default location yields the default config.
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            Error::Config("Could not determine the user config directory".to_string())
        })?;

        Ok(Self {
            config_path: config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME),
            required: false,
        })
    }

    /// Use an explicitly named file, which must exist
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            required: true,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            if self.required {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    self.config_path.display()
                )));
            }
            tracing::debug!(path = %self.config_path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!(path = %self.config_path.display(), "Loaded config file");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn valid_s3() -> S3Config {
        S3Config {
            endpoint: "s3.nl-ams.scw.cloud".to_string(),
            access_key: "access".to_string(),
            secret_key: "secret".to_string(),
            bucket_name: "backups".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.worker.workers_count, 10);
        assert!(!config.worker.dry_run);
        assert_eq!(config.worker.page_timeout, PAGE_TIMEOUT);
        assert_eq!(config.s3.region, "nl-ams");
        assert_eq!(config.s3.days, 30);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let worker = WorkerConfig {
            workers_count: 0,
            ..Default::default()
        };
        assert!(matches!(worker.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_s3_validation() {
        assert!(valid_s3().validate().is_ok());

        let missing_bucket = S3Config {
            bucket_name: "  ".to_string(),
            ..valid_s3()
        };
        let err = missing_bucket.validate().unwrap_err();
        assert!(err.to_string().contains("bucket name"));

        let zero_days = S3Config {
            days: 0,
            ..valid_s3()
        };
        assert!(zero_days.validate().is_err());
    }

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(
            normalize_endpoint("s3.nl-ams.scw.cloud").unwrap(),
            "https://s3.nl-ams.scw.cloud"
        );
        assert_eq!(
            normalize_endpoint("http://localhost:9000").unwrap(),
            "http://localhost:9000"
        );
        assert!(normalize_endpoint("https://").is_err());
    }

    #[test]
    fn test_load_missing_default_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager {
            config_path: temp_dir.path().join("config.toml"),
            required: false,
        };
        let config = manager.load().unwrap();
        assert_eq!(config.worker.workers_count, DEFAULT_WORKERS_COUNT);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("nope.toml"));
        assert!(matches!(manager.load(), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[worker]
workers_count = 4

[s3]
endpoint = "s3.fr-par.scw.cloud"
bucket_name = "archive"
days = 7
"#,
        )
        .unwrap();

        let config = ConfigManager::with_path(&path).load().unwrap();
        assert_eq!(config.worker.workers_count, 4);
        assert!(!config.worker.dry_run);
        assert_eq!(config.worker.restore_timeout, RESTORE_TIMEOUT);
        assert_eq!(config.s3.bucket_name, "archive");
        assert_eq!(config.s3.region, DEFAULT_REGION);
        assert_eq!(config.s3.days, 7);
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "worker = [").unwrap();

        let result = ConfigManager::with_path(&path).load();
        assert!(matches!(result, Err(Error::TomlParse(_))));
    }
}
