//! Entry point: validate a package root and map it

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::info;

use crate::core::cancel::CancellationToken;
use crate::core::mapper::DirectoryMapper;
use crate::error::{GraphError, Result};
use crate::models::config::Settings;
use crate::models::node::Node;
use crate::models::report::MappingReport;

/// Builds the node tree of a package root
pub struct TreeBuilder {
    mapper: DirectoryMapper,
}

impl TreeBuilder {
    /// Create a builder for `settings.scan_path`
    pub fn new(settings: Settings) -> Result<Self> {
        Ok(Self {
            mapper: DirectoryMapper::new(settings)?,
        })
    }

    /// Use `token` to cancel the run from elsewhere
    pub fn with_cancellation(self, token: CancellationToken) -> Self {
        Self {
            mapper: self.mapper.with_cancellation(token),
        }
    }

    pub fn root(&self) -> &Path {
        &self.mapper.settings().scan_path
    }

    /// Map the root into a tree, `None` if nothing in it is mappable.
    ///
    /// Fails with `InvalidPath` if the root is not a directory and with
    /// `NotAPackage` if it holds none of the marker files.
    pub fn build(&self) -> Result<Option<Node>> {
        self.validate_root()?;
        self.mapper.map_directory(self.root())
    }

    /// Like [`TreeBuilder::build`], also collecting the skipped entries
    pub fn build_report(&self) -> Result<MappingReport> {
        let start_time = Instant::now();
        let tree = self.build()?;

        let mut report = MappingReport::new(self.root().to_path_buf(), tree);
        for (path, err) in self.mapper.take_errors() {
            report.add_error(path, &err);
        }
        report.set_scan_duration(start_time.elapsed());

        info!(
            root = %self.root().display(),
            nodes = report.counts.total(),
            diagnostics = report.diagnostics.len(),
            "mapping finished"
        );
        Ok(report)
    }

    fn validate_root(&self) -> Result<()> {
        let root = self.root();
        if !root.is_dir() {
            return Err(GraphError::invalid_path(root));
        }

        let markers = &self.mapper.settings().marker_files;
        if !markers.iter().any(|marker| root.join(marker).is_file()) {
            return Err(GraphError::not_a_package(root, markers));
        }
        Ok(())
    }
}

/// Map the package rooted at `path` with default settings
pub fn tree_builder(path: impl Into<PathBuf>) -> Result<Option<Node>> {
    TreeBuilder::new(Settings::for_path(path))?.build()
}
