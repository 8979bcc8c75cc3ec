use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;
use pysourcegraph::{
    config::parser::{create_default_config, parse_config_content, parse_config_file, validate_partial_settings},
    error::{GraphError, Result},
    models::config::{OutputFormat, PartialSettings, Settings},
};

#[test]
fn test_parse_config_content() -> Result<()> {
    let config_content = r#"
        scan_path = "/test/path"
        source_extensions = ["py", "pyi"]
        marker_files = ["setup.cfg"]
        exclude_patterns = ["build", "dist"]
        max_depth = 5
        output_format = "dot"
        follow_links = true
        timeout_secs = 30
    "#;

    let settings = parse_config_content(config_content, "virtual_path.toml")?;

    assert_eq!(settings.scan_path, Some(PathBuf::from("/test/path")));
    assert_eq!(
        settings.source_extensions,
        Some(vec!["py".to_string(), "pyi".to_string()])
    );
    assert_eq!(settings.marker_files, Some(vec!["setup.cfg".to_string()]));
    assert_eq!(
        settings.exclude_patterns,
        Some(vec!["build".to_string(), "dist".to_string()])
    );
    assert_eq!(settings.max_depth, Some(5));
    assert_eq!(settings.output_format, Some(OutputFormat::Dot));
    assert_eq!(settings.follow_links, Some(true));
    assert_eq!(settings.timeout_secs, Some(30));
    assert_eq!(settings.parallel, None);

    Ok(())
}

#[test]
fn test_parse_config_file() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("test_config.toml");
    fs::write(&config_path, "parallel = true\nthreads = 3\noutput_file = \"tree.json\"\n")?;

    let settings = parse_config_file(&config_path)?;

    assert_eq!(settings.parallel, Some(true));
    assert_eq!(settings.threads, Some(3));
    assert_eq!(settings.output_file, Some(PathBuf::from("tree.json")));

    Ok(())
}

#[test]
fn test_unknown_output_format_is_a_parse_error() {
    let err = parse_config_content("output_format = \"yaml\"", "bad.toml").unwrap_err();
    assert!(matches!(err, GraphError::ConfigParse { .. }));
}

#[test]
fn test_invalid_values_are_config_errors() {
    for content in [
        "source_extensions = []",
        "source_extensions = [\".py\"]",
        "marker_files = [\"\"]",
        "exclude_patterns = [\"[unclosed\"]",
        "max_depth = 0",
        "threads = 0",
        "output_file = \"\"",
    ] {
        let err = parse_config_content(content, "bad.toml").unwrap_err();
        assert!(
            matches!(err, GraphError::Config { .. }),
            "expected a config error for {:?}, got {:?}",
            content,
            err
        );
    }
}

#[test]
fn test_validate_partial_settings_accepts_empty() -> Result<()> {
    validate_partial_settings(&PartialSettings::default(), "empty.toml")
}

#[test]
fn test_default_config_round_trip() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config/.pysourcegraph.toml");

    create_default_config(&config_path)?;
    let partial = parse_config_file(&config_path)?;

    assert_eq!(partial.to_settings(), Settings::default());
    Ok(())
}
