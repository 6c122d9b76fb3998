//! Service configuration.
//!
//! Settings come from three layers, highest priority first: command line
//! flags, environment variables (read by clap), and an optional YAML file
//! given with `--config`. Anything left unset takes the built-in default.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:5000";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_DOWNLOAD_DIR: &str = "download";
pub const DEFAULT_REGION_FILE: &str = "world_power_region.geojson";
pub const DEFAULT_CLEANUP_DELAY_SECS: u64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid listen address '{0}'")]
    ListenAddr(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Climate data extraction API server
#[derive(Parser, Debug, Default)]
#[command(name = "climate-api")]
#[command(about = "Extracts per-region climate series with extreme-event flags")]
pub struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "CLIMATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen address [default: 0.0.0.0:5000]
    #[arg(short, long, env = "CLIMATE_LISTEN_ADDR")]
    pub listen: Option<String>,

    /// Log level, used when RUST_LOG is unset [default: info]
    #[arg(long, env = "CLIMATE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory holding the region file and `{variable}_{method}.nc` datasets [default: data]
    #[arg(long, env = "CLIMATE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output directory, wiped before every extraction [default: download]
    #[arg(long, env = "CLIMATE_DOWNLOAD_DIR")]
    pub download_dir: Option<PathBuf>,

    /// Region GeoJSON file, relative to the data directory unless absolute
    #[arg(long, env = "CLIMATE_REGION_FILE")]
    pub region_file: Option<PathBuf>,

    /// Seconds between a download and deletion of the file [default: 300]
    #[arg(long, env = "CLIMATE_CLEANUP_DELAY_SECS")]
    pub cleanup_delay_secs: Option<u64>,

    /// Directory served under /static
    #[arg(long, env = "CLIMATE_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Public domain reported by /health
    #[arg(long, env = "CLIMATE_PUBLIC_DOMAIN")]
    pub public_domain: Option<String>,

    /// Number of tokio worker threads (default: number of CPU cores)
    #[arg(long, env = "CLIMATE_WORKER_THREADS")]
    pub worker_threads: Option<usize>,
}

/// Keys accepted in the YAML config file. All optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub listen: Option<String>,
    pub log_level: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub download_dir: Option<PathBuf>,
    pub region_file: Option<PathBuf>,
    pub cleanup_delay_secs: Option<u64>,
    pub static_dir: Option<PathBuf>,
    pub public_domain: Option<String>,
    pub worker_threads: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as unit, not as an empty map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}

/// Resolved service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub listen: SocketAddr,
    pub log_level: String,
    pub data_dir: PathBuf,
    pub download_dir: PathBuf,
    /// Region file path, already joined with `data_dir` when relative.
    pub region_file: PathBuf,
    pub cleanup_delay: Duration,
    pub static_dir: Option<PathBuf>,
    pub public_domain: Option<String>,
    pub worker_threads: Option<usize>,
}

impl ApiConfig {
    /// Resolve `args` over the config file named by `args.config`, if any.
    pub fn load(args: Args) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(args, file)
    }

    /// Merge CLI/env values over file values over defaults.
    pub fn merge(args: Args, file: FileConfig) -> Result<Self, ConfigError> {
        let listen = args
            .listen
            .or(file.listen)
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let listen: SocketAddr = listen
            .parse()
            .map_err(|_| ConfigError::ListenAddr(listen.clone()))?;

        let data_dir = args
            .data_dir
            .or(file.data_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let region_file = args
            .region_file
            .or(file.region_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REGION_FILE));
        let region_file = if region_file.is_absolute() {
            region_file
        } else {
            data_dir.join(region_file)
        };

        Ok(Self {
            listen,
            log_level: args
                .log_level
                .or(file.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            data_dir,
            download_dir: args
                .download_dir
                .or(file.download_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOAD_DIR)),
            region_file,
            cleanup_delay: Duration::from_secs(
                args.cleanup_delay_secs
                    .or(file.cleanup_delay_secs)
                    .unwrap_or(DEFAULT_CLEANUP_DELAY_SECS),
            ),
            static_dir: args.static_dir.or(file.static_dir),
            public_domain: args.public_domain.or(file.public_domain),
            worker_threads: args.worker_threads.or(file.worker_threads),
        })
    }

    /// Configuration with defaults rooted at `root` (`root/data`, `root/download`).
    pub fn with_root(root: &Path) -> Self {
        let data_dir = root.join(DEFAULT_DATA_DIR);
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 0)),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            region_file: data_dir.join(DEFAULT_REGION_FILE),
            data_dir,
            download_dir: root.join(DEFAULT_DOWNLOAD_DIR),
            cleanup_delay: Duration::from_secs(DEFAULT_CLEANUP_DELAY_SECS),
            static_dir: None,
            public_domain: None,
            worker_threads: None,
        }
    }

    /// Reject settings that would make the output directory lifecycle unsafe.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.download_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("download_dir must not be empty".into()));
        }
        // The download dir is deleted recursively on every request
        let download_dir = comparable_path(&self.download_dir);
        let data_dir = comparable_path(&self.data_dir);
        if data_dir.starts_with(&download_dir) || download_dir.starts_with(&data_dir) {
            return Err(ConfigError::Invalid(format!(
                "download_dir {} must not overlap data_dir {}",
                self.download_dir.display(),
                self.data_dir.display()
            )));
        }
        if comparable_path(&self.region_file).starts_with(&download_dir) {
            return Err(ConfigError::Invalid(format!(
                "region_file {} must not live inside download_dir",
                self.region_file.display()
            )));
        }
        if self.cleanup_delay.is_zero() {
            return Err(ConfigError::Invalid(
                "cleanup_delay_secs must be greater than zero".into(),
            ));
        }
        if self.worker_threads == Some(0) {
            return Err(ConfigError::Invalid("worker_threads must be greater than zero".into()));
        }
        Ok(())
    }
}

/// Absolute form of `path` for containment checks.
///
/// The longest existing ancestor is canonicalized so symlinks and `..`
/// resolve; the missing remainder is appended as written.
fn comparable_path(path: &Path) -> PathBuf {
    let absolute: PathBuf = if path.is_absolute() {
        path.components().collect()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path).components().collect(),
            Err(_) => path.components().collect(),
        }
    };

    let mut missing = Vec::new();
    let mut existing = absolute.as_path();
    loop {
        if let Ok(mut resolved) = existing.canonicalize() {
            resolved.extend(missing.iter().rev());
            return resolved;
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return absolute,
        }
    }
}
