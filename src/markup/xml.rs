//! XML writer: generic structured export of the tree.
//!
//! One element per node, named after its kind. Running text stays on one
//! line; with `indent` set, block elements are nested four spaces per level.

use super::{RenderOptions, Writer};
use crate::model::{Kind, Node, Target};

pub struct XmlWriter;

impl Writer for XmlWriter {
    fn write(&self, doc: &Node, options: &RenderOptions) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        write_element(doc, 0, options.indent, &mut out);
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}

fn write_element(node: &Node, level: usize, indent: bool, out: &mut String) {
    if indent {
        out.push_str(&"    ".repeat(level));
    }

    let tag = node.kind.tag_name();
    if node.children.is_empty() {
        out.push_str(&format!("<{}{}/>", tag, attributes(node)));
    } else if node.kind.is_text_element() {
        write_inline(node, out);
    } else {
        out.push_str(&format!("<{}{}>", tag, attributes(node)));
        if indent {
            out.push('\n');
        }
        for child in &node.children {
            if child.kind.is_inline() {
                if indent {
                    out.push_str(&"    ".repeat(level + 1));
                }
                write_inline(child, out);
                if indent {
                    out.push('\n');
                }
            } else {
                write_element(child, level + 1, indent, out);
            }
        }
        if indent {
            out.push_str(&"    ".repeat(level));
        }
        out.push_str(&format!("</{}>", tag));
    }

    if indent {
        out.push('\n');
    }
}

fn write_inline(node: &Node, out: &mut String) {
    if let Kind::Text(ref t) = node.kind {
        out.push_str(&xml_escape(t));
        return;
    }
    let tag = node.kind.tag_name();
    if node.children.is_empty() {
        out.push_str(&format!("<{}{}/>", tag, attributes(node)));
        return;
    }
    out.push_str(&format!("<{}{}>", tag, attributes(node)));
    for child in &node.children {
        write_inline(child, out);
    }
    out.push_str(&format!("</{}>", tag));
}

fn attributes(node: &Node) -> String {
    let mut attrs: Vec<(&str, String)> = Vec::new();
    if !node.ids.is_empty() {
        attrs.push(("ids", node.ids.join(" ")));
    }
    match node.kind {
        Kind::Title {
            backref: Some(ref refid),
        } => attrs.push(("refid", refid.clone())),
        Kind::EnumeratedList { start } if start != 1 => attrs.push(("start", start.to_string())),
        Kind::Reference {
            ref target,
            ref name,
        } => {
            match target {
                Target::Internal(refid) => attrs.push(("refid", refid.clone())),
                Target::External(uri) => attrs.push(("refuri", uri.clone())),
            }
            if let Some(name) = name {
                attrs.push(("name", name.clone()));
            }
        }
        Kind::Image { ref uri, ref alt } => {
            attrs.push(("uri", uri.clone()));
            if !alt.is_empty() {
                attrs.push(("alt", alt.clone()));
            }
        }
        _ => {}
    }
    attrs
        .iter()
        .map(|(k, v)| format!(" {}=\"{}\"", k, xml_escape(v)))
        .collect()
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
