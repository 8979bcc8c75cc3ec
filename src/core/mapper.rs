//! Directory mapping
//!
//! Recursively turns a directory into a Package node. Sub-directories are
//! mapped first, then every parseable file becomes a Module. Directories
//! that contribute nothing are pruned, so a returned Package always has at
//! least one child.
//!
//! Failures on single entries (unreadable directories, files that do not
//! parse, symlink cycles) are recorded and skipped. Only cancellation ends
//! a run early.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dashmap::DashSet;
use glob::Pattern;
use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::core::cancel::CancellationToken;
use crate::error::{GraphError, Result, ResultExt};
use crate::models::config::Settings;
use crate::models::node::Node;
use crate::parsers::python::PythonParser;

/// Maps directories to Package nodes
pub struct DirectoryMapper {
    settings: Settings,
    exclude_patterns: Vec<Pattern>,
    parser: PythonParser,
    visited: DashSet<PathBuf>,
    errors: Mutex<Vec<(PathBuf, GraphError)>>,
    token: CancellationToken,
}

impl DirectoryMapper {
    /// Create a mapper; fails if an exclude pattern does not compile
    pub fn new(settings: Settings) -> Result<Self> {
        let exclude_patterns = compile_exclude_patterns(&settings.exclude_patterns)?;
        let token = match settings.timeout_secs {
            Some(secs) => CancellationToken::with_timeout(Duration::from_secs(secs)),
            None => CancellationToken::new(),
        };

        Ok(Self {
            settings,
            exclude_patterns,
            parser: PythonParser::new()?,
            visited: DashSet::new(),
            errors: Mutex::new(Vec::new()),
            token,
        })
    }

    /// Replace the cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Handle to this mapper's cancellation token
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Map `dir` into a Package node, or `None` if nothing under it is mappable
    pub fn map_directory(&self, dir: &Path) -> Result<Option<Node>> {
        self.visited.clear();

        if !self.settings.parallel {
            return self.map_dir(dir, dir, 0);
        }

        let threads = self.settings.threads.unwrap_or_else(num_cpus::get);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .with_context(|| "Failed to start mapping thread pool")?;

        pool.install(|| self.map_dir(dir, dir, 0))
    }

    /// Parse one source file into a Module node.
    ///
    /// Read and parse failures are recorded and yield `None`.
    pub fn map_module(&self, path: &Path) -> Result<Option<Node>> {
        self.token.check()?;

        match self.parser.parse_file(path) {
            Ok(analysis) => Ok(Some(analysis.into_node())),
            Err(err) => {
                self.record(path, err);
                Ok(None)
            }
        }
    }

    /// Diagnostics recorded so far, as path and message pairs
    pub fn errors(&self) -> Vec<(PathBuf, String)> {
        self.errors
            .lock()
            .iter()
            .map(|(path, err)| (path.clone(), err.user_message()))
            .collect()
    }

    /// Take ownership of the recorded diagnostics, leaving none behind
    pub fn take_errors(&self) -> Vec<(PathBuf, GraphError)> {
        std::mem::take(&mut *self.errors.lock())
    }

    /// Check if a path matches any exclude pattern, by name or root-relative path
    pub fn is_excluded(&self, root: &Path, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        let relative = path.strip_prefix(root).unwrap_or(path).to_string_lossy();

        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.matches(&name) || pattern.matches(&relative))
    }

    fn map_dir(&self, root: &Path, dir: &Path, depth: usize) -> Result<Option<Node>> {
        self.token.check()?;

        if let Some(max_depth) = self.settings.max_depth {
            if depth > max_depth {
                debug!(path = %dir.display(), depth, "beyond max depth, skipping");
                return Ok(None);
            }
        }

        let canonical = match fs::canonicalize(dir).with_file_context(dir) {
            Ok(canonical) => canonical,
            Err(err) => {
                self.record(dir, err);
                return Ok(None);
            }
        };
        if !self.visited.insert(canonical.clone()) {
            self.record(dir, GraphError::symlink_cycle(dir, canonical));
            return Ok(None);
        }

        let (dirs, files) = match self.partition_entries(root, dir) {
            Some(entries) => entries,
            None => return Ok(None),
        };
        if dirs.is_empty() && files.is_empty() {
            debug!(path = %dir.display(), "nothing to map");
            return Ok(None);
        }

        let name = dir
            .file_name()
            .or_else(|| canonical.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut package = Node::package(name, dir);

        let (sub_packages, modules) = if self.settings.parallel {
            let sub_packages = dirs
                .par_iter()
                .map(|sub| self.map_dir(root, sub, depth + 1))
                .collect::<Result<Vec<_>>>()?;
            let modules = files
                .par_iter()
                .map(|file| self.map_module(file))
                .collect::<Result<Vec<_>>>()?;
            (sub_packages, modules)
        } else {
            let sub_packages = dirs
                .iter()
                .map(|sub| self.map_dir(root, sub, depth + 1))
                .collect::<Result<Vec<_>>>()?;
            let modules = files
                .iter()
                .map(|file| self.map_module(file))
                .collect::<Result<Vec<_>>>()?;
            (sub_packages, modules)
        };

        for child in sub_packages.into_iter().chain(modules).flatten() {
            package.add_child(child);
        }

        if package.is_childless() {
            debug!(path = %dir.display(), "no mappable content, pruning");
            return Ok(None);
        }

        debug!(path = %dir.display(), children = package.child_count(), "mapped package");
        Ok(Some(package))
    }

    /// Split the entries of `dir` into sub-directories and parseable files,
    /// both sorted by name. `None` if the directory cannot be read.
    fn partition_entries(&self, root: &Path, dir: &Path) -> Option<(Vec<PathBuf>, Vec<PathBuf>)> {
        let entries = match fs::read_dir(dir).with_file_context(dir) {
            Ok(entries) => entries,
            Err(err) => {
                self.record(dir, err);
                return None;
            }
        };

        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => paths.push(entry.path()),
                Err(err) => self.record(dir, GraphError::io_error(err)),
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut dirs = Vec::new();
        let mut files = Vec::new();

        for path in paths {
            if self.is_excluded(root, &path) {
                debug!(path = %path.display(), "excluded");
                continue;
            }

            let link_metadata = match fs::symlink_metadata(&path).with_file_context(&path) {
                Ok(metadata) => metadata,
                Err(err) => {
                    self.record(&path, err);
                    continue;
                }
            };

            let metadata = if link_metadata.file_type().is_symlink() {
                if !self.settings.follow_links {
                    self.record(&path, GraphError::symlink_skipped(&path));
                    continue;
                }
                match fs::metadata(&path).with_file_context(&path) {
                    Ok(metadata) => metadata,
                    Err(err) => {
                        self.record(&path, err);
                        continue;
                    }
                }
            } else {
                link_metadata
            };

            if metadata.is_dir() {
                dirs.push(path);
            } else if metadata.is_file() && self.is_source_file(&path) {
                files.push(path);
            }
        }

        Some((dirs, files))
    }

    fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy())
            .is_some_and(|ext| self.settings.source_extensions.iter().any(|e| *e == ext))
    }

    fn record(&self, path: &Path, err: GraphError) {
        warn!(path = %path.display(), "{}", err.user_message());
        self.errors.lock().push((path.to_path_buf(), err));
    }
}

/// Compile exclude patterns into glob patterns
fn compile_exclude_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|pattern| Pattern::new(pattern).map_err(GraphError::from))
        .collect()
}
