use std::fs;
use std::path::Path;
use tempfile::tempdir;
use pysourcegraph::{
    error::{ErrorSeverity, GraphError, Result},
    parsers::PythonParser,
};

#[test]
fn test_module_docstring_and_children() -> Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("service.py");
    fs::write(
        &path,
        "#!/usr/bin/env python\n# -*- coding: utf-8 -*-\n\"\"\"Service entry point.\"\"\"\n\nimport logging\n\n\nclass Service:\n    pass\n",
    )?;

    let parser = PythonParser::new()?;
    let module = parser.parse_file(&path)?.into_node();

    assert_eq!(module.name(), "service");
    assert_eq!(module.docstring(), Some("Service entry point."));
    assert_eq!(module.filepath(), Some(path.as_path()));
    assert_eq!(module.child_count(), 2);
    Ok(())
}

#[test]
fn test_missing_file_is_a_read_error() -> Result<()> {
    let temp_dir = tempdir()?;
    let parser = PythonParser::new()?;

    let err = parser.parse_file(&temp_dir.path().join("gone.py")).unwrap_err();

    assert!(matches!(err, GraphError::IoRead { .. }));
    assert_eq!(err.severity(), ErrorSeverity::Error);
    assert!(!err.is_critical());
    Ok(())
}

#[test]
fn test_unclosed_bracket_is_a_parse_error() -> Result<()> {
    let parser = PythonParser::new()?;
    let err = parser
        .parse_source(Path::new("pkg/broken.py"), "import os\nvalues = [1, 2,\n")
        .unwrap_err();

    match &err {
        GraphError::Parse { path, .. } => assert_eq!(path, Path::new("pkg/broken.py")),
        other => panic!("Expected Parse error, got {:?}", other),
    }
    assert_eq!(err.severity(), ErrorSeverity::Warning);
    Ok(())
}

#[test]
fn test_parser_is_shared_across_threads() -> Result<()> {
    let parser = PythonParser::new()?;

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let parser = &parser;
                scope.spawn(move || {
                    let source = format!("def f{}(a): pass\n", i);
                    parser
                        .parse_source(Path::new("threaded.py"), &source)
                        .map(|analysis| analysis.declarations.len())
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), 1);
        }
    });
    Ok(())
}

fn parse_failure(source: &str) -> String {
    let parser = PythonParser::new().unwrap();
    match parser.parse_source(Path::new("legacy.py"), source) {
        Err(GraphError::Parse { message, .. }) => message,
        Err(other) => panic!("Expected Parse error, got {:?}", other),
        Ok(analysis) => panic!("Expected Parse error, parsed {:?}", analysis),
    }
}

#[test]
fn test_python2_print_statement_is_rejected() {
    let message = parse_failure("import sys\nprint \"hello\"\n");
    assert_eq!(message, "Python 2 print statement at line 2, column 1");
}

#[test]
fn test_python2_exec_statement_is_rejected() {
    let message = parse_failure("exec \"x = 1\"\n");
    assert!(message.starts_with("Python 2 exec statement"), "unexpected message: {}", message);
}

#[test]
fn test_backquote_expression_is_rejected() {
    let message = parse_failure("x = `1`\n");
    assert_eq!(message, "backquote expression at line 1, column 5");
}

#[test]
fn test_legacy_octal_literal_is_rejected() {
    let message = parse_failure("import os\nos.chmod('run.sh', 0777)\n");
    assert!(message.starts_with("leading zeros in decimal integer literal"));
    assert!(message.contains("line 2"), "unexpected message: {}", message);
}

#[test]
fn test_unmatched_dedent_is_rejected() {
    let message = parse_failure("def f():\n    return\n  pass\n");
    assert!(message.contains("line 3"), "unexpected message: {}", message);
}

#[test]
fn test_python3_forms_still_parse() -> Result<()> {
    let parser = PythonParser::new()?;
    let source = "print(\"hello\")\nexec(\"x = 1\")\nmode = 0o777 + 0\n\n\ndef f(flag):\n    if flag:\n        a = 1; b = 2\n    # note\n    else:\n        return repr(flag)\n    return a + b\n";

    let analysis = parser.parse_source(Path::new("modern.py"), source)?;

    assert_eq!(analysis.declarations.len(), 1);
    Ok(())
}
