//! Markup engine: text to tree, tree to bytes.
//!
//! The rest of the crate only talks to [`MarkupEngine`]. [`CommonMark`] is the
//! bundled implementation; it reads lightweight markup with `pulldown-cmark`
//! and writes trees through format-specific [`Writer`]s.

pub mod contents;
pub mod html;
pub mod parse;
pub mod xml;

use crate::model::Node;
use std::fmt;
use thiserror::Error;

/// Output formats a tree can be rendered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Xml,
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Stylesheet linked from hypertext output
    pub stylesheet: Option<String>,
    /// Indent nested elements of structured output
    pub indent: bool,
}

/// Diagnostic severity, ordered from harmless to fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info = 1,
    Warning = 2,
    Error = 3,
    Severe = 4,
}

impl Severity {
    pub fn level(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Severe => "SEVERE",
        };
        write!(f, "{}/{}", name, self.level())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{severity} at line {line}: {message}")]
pub struct MarkupError {
    pub severity: Severity,
    pub line: usize,
    pub message: String,
}

impl MarkupError {
    pub fn severe(line: usize, message: impl Into<String>) -> Self {
        MarkupError {
            severity: Severity::Severe,
            line,
            message: message.into(),
        }
    }
}

/// Parse and render capability the catalog is built on.
pub trait MarkupEngine {
    /// Parse markup text into a tree rooted at a document node.
    fn parse(&self, text: &str) -> Result<Node, MarkupError>;

    /// Render a document tree to the bytes of `format`.
    fn render(
        &self,
        doc: &Node,
        format: Format,
        options: &RenderOptions,
    ) -> Result<Vec<u8>, MarkupError>;
}

/// Trait for serializing a tree into a specific output format.
pub trait Writer {
    fn write(&self, doc: &Node, options: &RenderOptions) -> String;
}

/// Create a writer for the given format.
pub fn create_writer(format: Format) -> Box<dyn Writer> {
    match format {
        Format::Html => Box::new(html::HtmlWriter),
        Format::Xml => Box::new(xml::XmlWriter),
    }
}

/// CommonMark reader with docutils-style sectioning, plus the bundled writers.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommonMark;

impl MarkupEngine for CommonMark {
    fn parse(&self, text: &str) -> Result<Node, MarkupError> {
        parse::parse(text)
    }

    fn render(
        &self,
        doc: &Node,
        format: Format,
        options: &RenderOptions,
    ) -> Result<Vec<u8>, MarkupError> {
        Ok(create_writer(format).write(doc, options).into_bytes())
    }
}
