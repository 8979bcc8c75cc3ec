//! Output formatting and writing functionality

mod formatters;
mod writers;

pub use self::formatters::{format_report_dot, format_report_json, format_report_text, format_tree_text};
pub use self::writers::{create_writer, FileWriter, OutputWriter, StdoutWriter};

use crate::error::Result;
use crate::models::config::OutputFormat;
use crate::models::report::MappingReport;

/// Trait for different output formatters
pub trait Formatter {
    /// Format a mapping report into a string
    fn format(&self, report: &MappingReport) -> Result<String>;
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    pub verbose: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, report: &MappingReport) -> Result<String> {
        Ok(format_report_text(report, self.verbose))
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, report: &MappingReport) -> Result<String> {
        format_report_json(report, self.pretty)
    }
}

/// DOT formatter rendering the import graph
pub struct DotFormatter;

impl Formatter for DotFormatter {
    fn format(&self, report: &MappingReport) -> Result<String> {
        Ok(format_report_dot(report))
    }
}

/// Create a formatter based on the output format
pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Dot => Box::new(DotFormatter),
    }
}
