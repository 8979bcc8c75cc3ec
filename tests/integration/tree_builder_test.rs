use std::fs;
use tempfile::tempdir;
use pysourcegraph::{
    core::{tree_builder, TreeBuilder},
    error::{ErrorSeverity, GraphError, Result},
    models::config::Settings,
};

#[test]
fn test_root_without_markers_fails() -> Result<()> {
    let temp_dir = tempdir()?;
    fs::write(temp_dir.path().join("main.py"), "import os\n")?;
    fs::create_dir(temp_dir.path().join("lib"))?;
    fs::write(temp_dir.path().join("lib/__init__.py"), "")?;

    let err = tree_builder(temp_dir.path()).unwrap_err();

    match &err {
        GraphError::NotAPackage { path, markers, .. } => {
            assert_eq!(path, temp_dir.path());
            assert!(markers.contains(&"__init__.py".to_string()));
            assert!(markers.contains(&"setup.py".to_string()));
        }
        other => panic!("Expected NotAPackage, got {:?}", other),
    }
    assert_eq!(err.severity(), ErrorSeverity::Critical);
    Ok(())
}

#[test]
fn test_root_that_is_a_file_fails() -> Result<()> {
    let temp_dir = tempdir()?;
    let file = temp_dir.path().join("setup.py");
    fs::write(&file, "")?;

    assert!(matches!(
        tree_builder(&file),
        Err(GraphError::InvalidPath { .. })
    ));
    Ok(())
}

#[test]
fn test_setup_py_marker() -> Result<()> {
    let temp_dir = tempdir()?;
    fs::write(
        temp_dir.path().join("setup.py"),
        "from setuptools import setup\nsetup(name='demo')\n",
    )?;
    fs::create_dir(temp_dir.path().join("demo"))?;
    fs::write(temp_dir.path().join("demo/core.py"), "class Engine:\n    pass\n")?;

    let tree = tree_builder(temp_dir.path())?.unwrap();

    assert!(tree.is_package());
    let names: Vec<&str> = tree.children().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["demo", "setup"]);

    let setup = tree.find_child("setup").unwrap();
    assert_eq!(setup.children()[0].name(), "setuptools.setup");
    Ok(())
}

#[test]
fn test_custom_marker_files() -> Result<()> {
    let temp_dir = tempdir()?;
    fs::write(temp_dir.path().join("setup.cfg"), "[metadata]\n")?;
    fs::write(temp_dir.path().join("app.py"), "")?;

    let mut settings = Settings::for_path(temp_dir.path());
    settings.marker_files = vec!["setup.cfg".to_string()];

    let tree = TreeBuilder::new(settings)?.build()?.unwrap();
    assert_eq!(tree.child_count(), 1);
    Ok(())
}

#[test]
fn test_marker_only_package_with_nothing_parseable() -> Result<()> {
    let temp_dir = tempdir()?;
    fs::write(temp_dir.path().join("pyproject.toml"), "[project]\nname = 'x'\n")?;

    assert_eq!(tree_builder(temp_dir.path())?, None);
    Ok(())
}

#[test]
fn test_report_for_generated_project() -> Result<()> {
    let temp_dir = tempdir()?;
    let modules =
        crate::fixtures::generate_project::generate_project(temp_dir.path(), 2, 2).unwrap();

    let builder = TreeBuilder::new(Settings::for_path(temp_dir.path()))?;
    let report = builder.build_report()?;

    assert!(report.is_clean());
    assert_eq!(report.counts.modules, modules);
    // root + 2 packages at depth 0 + 4 at depth 1
    assert_eq!(report.counts.packages, 7);
    assert_eq!(report.root, temp_dir.path());
    Ok(())
}
