//! Module docstring extraction from Python source.
//!
//! The source is parsed as a Python module. A leading expression statement
//! holding a plain string constant is the docstring; it is cleaned the way
//! `inspect.cleandoc` does. Every failure is folded into a [`DocComment`]
//! variant; nothing here returns an error to the caller.

use crate::model::SourceUnit;
use rustpython_parser::{ast, Mode};
use thiserror::Error;
use tracing::debug;

/// Substituted when the module does not parse.
pub const SYNTAX_ERROR_TEXT: &str = "**SYNTAX ERROR IN MODULE SOURCE**";

/// Substituted when the module has no docstring.
pub const NO_DOCSTRING_TEXT: &str = "**NO DOCSTRING**";

/// Package initializer; skipped silently when it has no docstring.
pub const PACKAGE_INITIALIZER: &str = "__init__.py";

const TAB_SIZE: usize = 8;

/// Outcome of looking for a module docstring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocComment {
    Found(String),
    Missing,
    SyntaxError(SyntaxError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

/// Documentation text for a unit, sentinels included.
///
/// `None` means the unit produces no catalog entry at all.
pub fn doc_text(unit: &SourceUnit, raw: &str) -> Option<String> {
    match extract(raw) {
        DocComment::Found(doc) => Some(doc),
        DocComment::SyntaxError(e) => {
            debug!(path = %unit.full_path.display(), error = %e, "module does not parse");
            Some(SYNTAX_ERROR_TEXT.to_string())
        }
        DocComment::Missing if unit.display_name == PACKAGE_INITIALIZER => None,
        DocComment::Missing => Some(NO_DOCSTRING_TEXT.to_string()),
    }
}

/// Normalize line endings, parse, and look for a module docstring.
pub fn extract(raw: &str) -> DocComment {
    let src = normalize_newlines(raw);
    let body = match rustpython_parser::parse(&src, Mode::Module, "<module>") {
        Ok(ast::Mod::Module(module)) => module.body,
        Ok(_) => Vec::new(),
        Err(e) => {
            let offset = u32::from(e.offset) as usize;
            return DocComment::SyntaxError(SyntaxError {
                line: line_of(&src, offset),
                message: e.error.to_string(),
            });
        }
    };
    match body.first().and_then(docstring) {
        Some(doc) if !doc.is_empty() => DocComment::Found(doc),
        _ => DocComment::Missing,
    }
}

/// Drop a leading byte-order mark; `\r\n` and lone `\r` become `\n`, and the
/// text always ends with a newline.
pub fn normalize_newlines(raw: &str) -> String {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut src = raw.replace("\r\n", "\n").replace('\r', "\n");
    src.push('\n');
    src
}

fn line_of(src: &str, offset: usize) -> usize {
    src.get(..offset)
        .unwrap_or(src)
        .matches('\n')
        .count()
        + 1
}

/// Docstring of a statement that is a bare string constant, cleaned.
///
/// Byte strings and f-strings do not count.
fn docstring(stmt: &ast::Stmt) -> Option<String> {
    let ast::Stmt::Expr(ast::StmtExpr { value, .. }) = stmt else {
        return None;
    };
    match value.as_ref() {
        ast::Expr::Constant(ast::ExprConstant {
            value: ast::Constant::Str(text),
            ..
        }) => Some(cleandoc(text)),
        _ => None,
    }
}

/// Clean docstring indentation the way Python's `inspect.cleandoc` does.
fn cleandoc(doc: &str) -> String {
    let expanded: Vec<String> = doc.split('\n').map(expand_tabs).collect();

    let margin = expanded
        .iter()
        .skip(1)
        .filter_map(|line| {
            let content = line.trim_start().chars().count();
            (content > 0).then(|| line.chars().count() - content)
        })
        .min();

    let mut lines: Vec<String> = Vec::with_capacity(expanded.len());
    for (i, line) in expanded.iter().enumerate() {
        if i == 0 {
            lines.push(line.trim_start().to_string());
        } else if let Some(margin) = margin {
            lines.push(line.chars().skip(margin).collect());
        } else {
            lines.push(line.clone());
        }
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|l| l.is_empty()).count();
    lines.drain(..leading);
    lines.join("\n")
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut col = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = TAB_SIZE - col % TAB_SIZE;
            out.extend(std::iter::repeat(' ').take(pad));
            col += pad;
        } else {
            out.push(c);
            col += 1;
        }
    }
    out
}
