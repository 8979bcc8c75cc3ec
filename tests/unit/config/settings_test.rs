use std::path::PathBuf;
use tempfile::tempdir;
use pysourcegraph::{
    config::{ConfigBuilder, FileConfig, SettingsValidator},
    error::{GraphError, Result},
    models::config::{OutputFormat, PartialSettings, Settings},
};

#[test]
fn test_default_settings() {
    let settings = Settings::default();

    assert_eq!(settings.scan_path, PathBuf::from("."));
    assert_eq!(settings.source_extensions, vec!["py".to_string()]);
    assert!(settings.marker_files.contains(&"__init__.py".to_string()));
    assert!(settings.marker_files.contains(&"setup.py".to_string()));
    for excluded in [".git", "__pycache__", ".venv", "venv", ".tox", "build", "*.egg-info"] {
        assert!(
            settings.exclude_patterns.iter().any(|p| p == excluded),
            "{} is not excluded by default",
            excluded
        );
    }
    assert_eq!(settings.max_depth, None);
    assert!(!settings.follow_links);
    assert!(!settings.parallel);
    assert_eq!(settings.output_format, OutputFormat::Text);
    assert_eq!(settings.output_file, None);
}

#[test]
fn test_output_format_from_str() {
    assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
    assert_eq!("dot".parse::<OutputFormat>(), Ok(OutputFormat::Dot));
    assert!("yaml".parse::<OutputFormat>().is_err());
    assert_eq!(OutputFormat::Text.to_string(), "text");
}

#[test]
fn test_later_sources_override_earlier_ones() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        "max_depth = 2\nexclude_patterns = [\"venv\"]\noutput_format = \"json\"\n",
    )?;

    let settings = ConfigBuilder::new()
        .add_config_file(&config_path)?
        .merge(PartialSettings {
            scan_path: Some(temp_dir.path().to_path_buf()),
            max_depth: Some(9),
            ..Default::default()
        })
        .build()?;

    assert_eq!(settings.max_depth, Some(9));
    assert_eq!(settings.exclude_patterns, vec!["venv".to_string()]);
    assert_eq!(settings.output_format, OutputFormat::Json);
    Ok(())
}

#[test]
fn test_builder_from_missing_file() {
    let result = ConfigBuilder::new().add_config_file(std::path::Path::new("/nonexistent/psg.toml"));
    assert!(matches!(result, Err(GraphError::ConfigNotFound { .. })));
}

#[test]
fn test_load_from_unavailable_source_is_noop() -> Result<()> {
    let temp_dir = tempdir()?;
    let settings = ConfigBuilder::new()
        .load_from(&FileConfig::with_path(temp_dir.path().join("absent.toml")))?
        .merge(PartialSettings {
            scan_path: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        })
        .build()?;

    assert_eq!(settings, Settings::for_path(temp_dir.path()));
    Ok(())
}

#[test]
fn test_validator_rejects_file_as_scan_path() -> Result<()> {
    let temp_dir = tempdir()?;
    let file = temp_dir.path().join("module.py");
    std::fs::write(&file, "")?;

    let err = SettingsValidator::validate(&Settings::for_path(&file)).unwrap_err();
    assert!(matches!(err, GraphError::InvalidPath { .. }));
    Ok(())
}

#[test]
fn test_validator_rejects_zero_threads() -> Result<()> {
    let temp_dir = tempdir()?;
    let mut settings = Settings::for_path(temp_dir.path());
    settings.threads = Some(0);

    assert!(matches!(
        SettingsValidator::validate(&settings),
        Err(GraphError::Config { .. })
    ));
    Ok(())
}
