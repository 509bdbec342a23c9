//! Fragment parsing: documentation text to a tree, never an error.

use crate::markup::{MarkupEngine, MarkupError};
use crate::model::{Kind, Node};
use std::path::Path;
use tracing::warn;

/// Parse `text` with `engine`. A parse error yields a stand-in tree naming
/// `path` and the error severity instead.
pub fn parse_fragment(engine: &dyn MarkupEngine, text: &str, path: &Path) -> Node {
    match engine.parse(text) {
        Ok(tree) => tree,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "documentation comment could not be parsed");
            diagnostic_tree(path, &e)
        }
    }
}

fn diagnostic_tree(path: &Path, error: &MarkupError) -> Node {
    Node::with_children(
        Kind::Document,
        vec![
            Node::paragraph("Markup engine could not parse documentation comment"),
            Node::paragraph(format!(
                "Error level {} or higher in '{}'",
                error.severity,
                path.display()
            )),
        ],
    )
}
