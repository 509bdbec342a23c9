//! Table-of-contents transform.
//!
//! Fills a placeholder container inside a contents topic with a nested bullet
//! list linking every section of the document. Each entry gets a
//! `toc-entry-N` id and the section title links back to it. Sections must
//! already carry ids; those without one are left out.

use super::MarkupError;
use crate::model::{Kind, Node, Target};

/// Replace the placeholder in `document.children[topic_index]` with the
/// generated contents. A topic with nothing to list is removed.
pub fn apply(document: &mut Node, topic_index: usize) -> Result<(), MarkupError> {
    let placeholder = document
        .children
        .get(topic_index)
        .filter(|topic| topic.kind == Kind::Topic)
        .and_then(|topic| topic.children.iter().position(|c| c.kind == Kind::Container))
        .ok_or_else(|| MarkupError::severe(0, "contents placeholder not found"))?;

    let mut counter = 0;
    let list = build_contents(document, &mut counter);

    match list {
        Some(list) => document.children[topic_index].children[placeholder] = list,
        None => {
            document.children.remove(topic_index);
        }
    }
    Ok(())
}

fn build_contents(node: &mut Node, counter: &mut usize) -> Option<Node> {
    let mut items = Vec::new();

    for section in node.children.iter_mut().filter(|c| c.kind == Kind::Section) {
        let Some(section_id) = section.first_id().map(str::to_string) else {
            continue;
        };
        *counter += 1;
        let entry_id = format!("toc-entry-{}", counter);

        let mut entry_text = Vec::new();
        if let Some(title) = section
            .children
            .iter_mut()
            .find(|c| matches!(c.kind, Kind::Title { .. }))
        {
            entry_text = strip_references(&title.children);
            title.kind = Kind::Title {
                backref: Some(entry_id.clone()),
            };
        }

        let mut reference = Node::with_children(
            Kind::Reference {
                target: Target::Internal(section_id),
                name: None,
            },
            entry_text,
        );
        reference.ids.push(entry_id);

        let mut item = Node::with_children(
            Kind::ListItem,
            vec![Node::with_children(Kind::Paragraph, vec![reference])],
        );
        if let Some(sublist) = build_contents(section, counter) {
            item.push(sublist);
        }
        items.push(item);
    }

    if items.is_empty() {
        None
    } else {
        Some(Node::with_children(Kind::BulletList, items))
    }
}

/// Copy title content, unwrapping links so entries do not nest anchors.
fn strip_references(nodes: &[Node]) -> Vec<Node> {
    let mut out = Vec::new();
    for node in nodes {
        match node.kind {
            Kind::Reference { .. } => out.extend(strip_references(&node.children)),
            _ => {
                let mut copy = Node::new(node.kind.clone());
                copy.children = strip_references(&node.children);
                out.push(copy);
            }
        }
    }
    out
}
