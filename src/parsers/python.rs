//! Python source parsing backed by tree-sitter

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;
use tree_sitter::{Language, Parser, Tree};

use super::declarations::{extract_declarations, Declaration};
use super::docstring::docstring_of;
use super::syntax_check::first_syntax_issue;
use crate::error::{GraphError, Result};
use crate::models::node::Node;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Pool of reusable parsers for concurrent parsing
pub struct ParserPool {
    language: Language,
    parsers: Mutex<Vec<Parser>>,
}

impl ParserPool {
    /// Create a pool pre-filled with `size` Python parsers
    pub fn new(size: usize) -> Result<Self> {
        let language: Language = tree_sitter_python::LANGUAGE.into();
        let mut parsers = Vec::with_capacity(size);
        for _ in 0..size {
            parsers.push(new_parser(&language)?);
        }
        Ok(Self {
            language,
            parsers: Mutex::new(parsers),
        })
    }

    /// Take a parser from the pool, creating one if the pool is drained
    pub fn take(&self) -> Result<Parser> {
        match self.parsers.lock().pop() {
            Some(parser) => Ok(parser),
            None => new_parser(&self.language),
        }
    }

    /// Return a parser to the pool
    pub fn return_parser(&self, mut parser: Parser) {
        parser.reset();
        self.parsers.lock().push(parser);
    }

    /// Number of idle parsers
    pub fn available(&self) -> usize {
        self.parsers.lock().len()
    }
}

fn new_parser(language: &Language) -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(language)
        .map_err(|e| GraphError::parser_init_error(e.to_string()))?;
    Ok(parser)
}

/// Parses Python modules and extracts their declarations
pub struct PythonParser {
    pool: ParserPool,
}

impl PythonParser {
    /// Create a parser with one pooled tree-sitter parser per CPU
    pub fn new() -> Result<Self> {
        Ok(Self {
            pool: ParserPool::new(num_cpus::get())?,
        })
    }

    /// Read and parse one module from disk
    #[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn parse_file(&self, path: &Path) -> Result<ModuleAnalysis> {
        let source = fs::read_to_string(path).map_err(|e| GraphError::read_error(path, e))?;
        let source = source.strip_prefix(BYTE_ORDER_MARK).unwrap_or(&source);
        self.parse_source(path, source)
    }

    /// Parse module source text; `path` names the module and labels errors
    pub fn parse_source(&self, path: &Path, source: &str) -> Result<ModuleAnalysis> {
        let tree = self.parse_tree(path, source)?;
        let root = tree.root_node();

        if let Some(issue) = first_syntax_issue(root, source) {
            return Err(GraphError::parse_error(path, issue.to_string()));
        }

        let declarations = extract_declarations(root, source);
        debug!(count = declarations.len(), "extracted declarations");

        Ok(ModuleAnalysis {
            path: path.to_path_buf(),
            name: module_name(path),
            docstring: docstring_of(root, source),
            declarations,
        })
    }

    fn parse_tree(&self, path: &Path, source: &str) -> Result<Tree> {
        let mut parser = self.pool.take()?;
        let tree = parser.parse(source, None);
        self.pool.return_parser(parser);

        tree.ok_or_else(|| GraphError::parse_error(path, "parser produced no syntax tree"))
    }
}

/// Module name: the file name without its extension
pub fn module_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Everything extracted from one successfully parsed module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleAnalysis {
    pub path: PathBuf,
    pub name: String,
    pub docstring: Option<String>,
    pub declarations: Vec<Declaration>,
}

impl ModuleAnalysis {
    /// Build the module node with one child per declaration, in order
    pub fn into_node(self) -> Node {
        let mut module = Node::module(self.name, self.docstring, self.path);
        for declaration in self.declarations {
            module.add_child(declaration.into_node());
        }
        module
    }
}
