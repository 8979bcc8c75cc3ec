//! Parsing of Python source files
//!
//! tree-sitter turns each file into a syntax tree; the declaration
//! extractor then pulls out imports, classes and functions with their
//! docstrings. Files that tree-sitter accepts but Python 3 would refuse
//! to compile are rejected as parse failures.

pub mod declarations;
pub mod docstring;
pub mod python;
pub mod syntax_check;

pub use declarations::{extract_declarations, Declaration};
pub use python::{ModuleAnalysis, ParserPool, PythonParser};
