use std::path::Path;
use pysourcegraph::{
    error::Result,
    parsers::{Declaration, PythonParser},
};

fn declarations(source: &str) -> Result<Vec<Declaration>> {
    let parser = PythonParser::new()?;
    Ok(parser.parse_source(Path::new("sample.py"), source)?.declarations)
}

fn targets(declarations: &[Declaration]) -> Vec<&str> {
    declarations
        .iter()
        .filter_map(|d| match d {
            Declaration::Import { target, .. } => Some(target.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_import_forms() -> Result<()> {
    let source = "\
import os
import xml.etree.ElementTree as ET
from collections import OrderedDict, defaultdict as dd
from . import sibling
from ..parent.mod import Thing
from typing import (
    Any,
    Optional,
)
from star import *
";
    let found = declarations(source)?;

    assert_eq!(
        targets(&found),
        vec![
            "os",
            "xml.etree.ElementTree",
            "collections.OrderedDict",
            "collections.defaultdict",
            "sibling",
            "parent.mod.Thing",
            "typing.Any",
            "typing.Optional",
            "star.*",
        ]
    );
    assert_eq!(
        found[1],
        Declaration::Import {
            target: "xml.etree.ElementTree".to_string(),
            alias: Some("ET".to_string()),
        }
    );
    assert_eq!(
        found[3],
        Declaration::Import {
            target: "collections.defaultdict".to_string(),
            alias: Some("dd".to_string()),
        }
    );
    Ok(())
}

#[test]
fn test_imports_inside_functions_are_found() -> Result<()> {
    let source = "\
def lazy():
    import heavy
    try:
        from fast import impl
    except ImportError:
        impl = None
";
    let found = declarations(source)?;

    assert_eq!(targets(&found), vec!["heavy", "fast.impl"]);
    Ok(())
}

#[test]
fn test_class_and_method_docstrings() -> Result<()> {
    let source = r#"
class Repository:
    '''Stores things.'''

    def get(self, key, default=None):
        """Fetch one item.

        Returns the default when missing.
        """

    def put(self, key, value, *, overwrite=False):
        return None
"#;
    let found = declarations(source)?;

    assert_eq!(
        found,
        vec![
            Declaration::Class {
                name: "Repository".to_string(),
                docstring: Some("Stores things.".to_string()),
            },
            Declaration::Function {
                name: "get".to_string(),
                docstring: Some("Fetch one item.\n\nReturns the default when missing.".to_string()),
                arguments: vec!["self".to_string(), "key".to_string(), "default".to_string()],
            },
            Declaration::Function {
                name: "put".to_string(),
                docstring: None,
                arguments: vec!["self".to_string(), "key".to_string(), "value".to_string()],
            },
        ]
    );
    Ok(())
}

#[test]
fn test_byte_and_format_strings_are_not_docstrings() -> Result<()> {
    let source = "\
def raw():
    b'bytes'

def formatted(name):
    f'hello {name}'
";
    let found = declarations(source)?;

    for declaration in found {
        match declaration {
            Declaration::Function { docstring, .. } => assert_eq!(docstring, None),
            other => panic!("unexpected declaration {:?}", other),
        }
    }
    Ok(())
}

#[test]
fn test_lambda_and_assignments_are_ignored() -> Result<()> {
    let found = declarations("square = lambda x: x * x\nvalue = 3\n")?;
    assert!(found.is_empty());
    Ok(())
}
