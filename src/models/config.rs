//! Configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration settings for mapping a source tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Root directory to map
    pub scan_path: PathBuf,

    /// File extensions (without the dot) treated as parseable modules
    pub source_extensions: Vec<String>,

    /// File names certifying a directory as a package root
    pub marker_files: Vec<String>,

    /// Glob patterns for entries to skip while mapping
    pub exclude_patterns: Vec<String>,

    /// Maximum directory depth to map below the root
    pub max_depth: Option<usize>,

    /// Whether to follow symbolic links during directory traversal
    pub follow_links: bool,

    /// Whether to map sub-directories and files in parallel
    pub parallel: bool,

    /// Worker threads for parallel mapping (defaults to the CPU count)
    pub threads: Option<usize>,

    /// Give up mapping after this many seconds
    pub timeout_secs: Option<u64>,

    /// Output format (text, json, dot)
    pub output_format: OutputFormat,

    /// Output file path (if not specified, output to stdout)
    pub output_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scan_path: PathBuf::from("."),
            source_extensions: vec!["py".to_string()],
            marker_files: vec![
                "__init__.py".to_string(),
                "setup.py".to_string(),
                "pyproject.toml".to_string(),
            ],
            exclude_patterns: [
                ".git",
                ".hg",
                "__pycache__",
                ".venv",
                "venv",
                ".tox",
                ".nox",
                ".mypy_cache",
                ".pytest_cache",
                "build",
                "dist",
                "*.egg-info",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            max_depth: None,
            follow_links: false,
            parallel: false,
            threads: None,
            timeout_secs: None,
            output_format: OutputFormat::Text,
            output_file: None,
        }
    }
}

impl Settings {
    /// Settings with defaults rooted at `scan_path`
    pub fn for_path(scan_path: impl Into<PathBuf>) -> Self {
        Self {
            scan_path: scan_path.into(),
            ..Self::default()
        }
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented tree listing
    Text,
    /// JSON serialization of the node tree
    Json,
    /// Graphviz DOT of the import graph
    Dot,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "dot" => Ok(OutputFormat::Dot),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Dot => write!(f, "dot"),
        }
    }
}

/// Partial settings for configuration merging
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialSettings {
    pub scan_path: Option<PathBuf>,
    pub source_extensions: Option<Vec<String>>,
    pub marker_files: Option<Vec<String>>,
    pub exclude_patterns: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub follow_links: Option<bool>,
    pub parallel: Option<bool>,
    pub threads: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
}

impl PartialSettings {
    /// Merge another PartialSettings into this one
    /// Fields from `other` take precedence over existing fields
    pub fn merge_from(&mut self, other: PartialSettings) {
        if other.scan_path.is_some() {
            self.scan_path = other.scan_path;
        }
        if other.source_extensions.is_some() {
            self.source_extensions = other.source_extensions;
        }
        if other.marker_files.is_some() {
            self.marker_files = other.marker_files;
        }
        if other.exclude_patterns.is_some() {
            self.exclude_patterns = other.exclude_patterns;
        }
        if other.max_depth.is_some() {
            self.max_depth = other.max_depth;
        }
        if other.follow_links.is_some() {
            self.follow_links = other.follow_links;
        }
        if other.parallel.is_some() {
            self.parallel = other.parallel;
        }
        if other.threads.is_some() {
            self.threads = other.threads;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.output_file.is_some() {
            self.output_file = other.output_file;
        }
    }

    /// Convert partial settings to full settings
    /// Uses defaults for any fields that are None
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();

        if let Some(scan_path) = &self.scan_path {
            settings.scan_path = scan_path.clone();
        }
        if let Some(source_extensions) = &self.source_extensions {
            settings.source_extensions = source_extensions.clone();
        }
        if let Some(marker_files) = &self.marker_files {
            settings.marker_files = marker_files.clone();
        }
        if let Some(exclude_patterns) = &self.exclude_patterns {
            settings.exclude_patterns = exclude_patterns.clone();
        }
        if let Some(max_depth) = self.max_depth {
            settings.max_depth = Some(max_depth);
        }
        if let Some(follow_links) = self.follow_links {
            settings.follow_links = follow_links;
        }
        if let Some(parallel) = self.parallel {
            settings.parallel = parallel;
        }
        if let Some(threads) = self.threads {
            settings.threads = Some(threads);
        }
        if let Some(timeout_secs) = self.timeout_secs {
            settings.timeout_secs = Some(timeout_secs);
        }
        if let Some(output_format) = self.output_format {
            settings.output_format = output_format;
        }
        if let Some(output_file) = &self.output_file {
            settings.output_file = Some(output_file.clone());
        }

        settings
    }
}
