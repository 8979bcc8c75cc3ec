//! Settings validation

use std::path::Path;

use crate::error::{GraphError, Result, ResultExt};
use crate::models::config::Settings;

/// Settings validator for ensuring configuration is valid
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate settings and return errors if invalid
    pub fn validate(settings: &Settings) -> Result<()> {
        if !settings.scan_path.is_dir() {
            return Err(GraphError::invalid_path(&settings.scan_path));
        }

        if settings.source_extensions.is_empty() {
            return Err(GraphError::config_error("At least one source extension is required"));
        }
        if let Some(ext) = settings
            .source_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(GraphError::config_error(format!(
                "Invalid source extension '{}': give it without the leading dot",
                ext
            )));
        }

        if settings.marker_files.is_empty() {
            return Err(GraphError::config_error("At least one package marker file is required"));
        }

        for pattern in &settings.exclude_patterns {
            glob::Pattern::new(pattern)
                .with_context(|| format!("Invalid exclude pattern: {}", pattern))?;
        }

        if settings.max_depth == Some(0) {
            return Err(GraphError::config_error("Max depth must be at least 1"));
        }

        if settings.threads == Some(0) {
            return Err(GraphError::config_error("Thread count must be at least 1"));
        }

        if let Some(path) = &settings.output_file {
            Self::validate_output_path(path)?;
        }

        Ok(())
    }

    /// Validate that an output path is writable
    fn validate_output_path(path: &Path) -> Result<()> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        if !parent.exists() {
            return Err(GraphError::invalid_path(parent));
        }

        let metadata = std::fs::metadata(parent).map_err(GraphError::io_error)?;
        if metadata.permissions().readonly() {
            return Err(GraphError::permission_denied(parent));
        }

        Ok(())
    }
}
