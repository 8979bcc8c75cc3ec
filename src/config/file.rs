//! Configuration file and environment sources

use std::path::{Path, PathBuf};

use super::{parser, ConfigSource};
use crate::error::{GraphError, Result};
use crate::models::config::PartialSettings;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".pysourcegraph.toml";

/// Default environment variable prefix
pub const ENV_PREFIX: &str = "PYSOURCEGRAPH";

/// Configuration file source
pub struct FileConfig {
    path: PathBuf,
    name: String,
    priority: u8,
}

impl FileConfig {
    /// Create a new file configuration source with the default path
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            name: "default config file".to_string(),
            priority: 20,
        }
    }

    /// Create a new file configuration source with a custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
            priority: 20,
        }
    }

    /// Set the priority for this configuration source
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Get the path of this configuration file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a default configuration file at this location
    pub fn create_default(&self) -> Result<()> {
        parser::create_default_config(&self.path)
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<PartialSettings> {
        if !self.is_available() {
            return Err(GraphError::ConfigNotFound {
                path: self.path.clone(),
                #[cfg(not(tarpaulin_include))]
                backtrace: std::backtrace::Backtrace::capture(),
            });
        }

        parser::parse_config_file(&self.path)
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment variable configuration source.
///
/// Reads `<PREFIX>_SCAN_PATH`, `<PREFIX>_EXTENSIONS`, `<PREFIX>_MARKERS`,
/// `<PREFIX>_EXCLUDE`, `<PREFIX>_MAX_DEPTH`, `<PREFIX>_FOLLOW_LINKS`,
/// `<PREFIX>_PARALLEL`, `<PREFIX>_THREADS`, `<PREFIX>_TIMEOUT_SECS`,
/// `<PREFIX>_OUTPUT_FORMAT` and `<PREFIX>_OUTPUT_FILE`. Lists are
/// comma-separated; values that fail to parse are ignored.
pub struct EnvConfig {
    prefix: String,
    name: String,
    priority: u8,
}

const ENV_KEYS: &[&str] = &[
    "SCAN_PATH",
    "EXTENSIONS",
    "MARKERS",
    "EXCLUDE",
    "MAX_DEPTH",
    "FOLLOW_LINKS",
    "PARALLEL",
    "THREADS",
    "TIMEOUT_SECS",
    "OUTPUT_FORMAT",
    "OUTPUT_FILE",
];

impl EnvConfig {
    /// Create a new environment variable configuration source
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("{} environment variables", &prefix),
            prefix,
            priority: 10,
        }
    }

    /// Set the priority for this configuration source
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.prefix, key)).ok()
    }

    fn list(&self, key: &str) -> Option<Vec<String>> {
        self.var(key).map(|value| {
            value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
    }

    fn parsed<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.var(key).and_then(|value| value.trim().parse().ok())
    }
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialSettings> {
        Ok(PartialSettings {
            scan_path: self.var("SCAN_PATH").map(PathBuf::from),
            source_extensions: self.list("EXTENSIONS"),
            marker_files: self.list("MARKERS"),
            exclude_patterns: self.list("EXCLUDE"),
            max_depth: self.parsed("MAX_DEPTH"),
            follow_links: self.parsed("FOLLOW_LINKS"),
            parallel: self.parsed("PARALLEL"),
            threads: self.parsed("THREADS"),
            timeout_secs: self.parsed("TIMEOUT_SECS"),
            output_format: self.parsed("OUTPUT_FORMAT"),
            output_file: self.var("OUTPUT_FILE").map(PathBuf::from),
        })
    }

    fn is_available(&self) -> bool {
        ENV_KEYS.iter().any(|key| self.var(key).is_some())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
