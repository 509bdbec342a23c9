//! HTML writer: standalone page with semantic markup.

use super::{RenderOptions, Writer};
use crate::model::{Kind, Node, Target};

pub struct HtmlWriter;

impl Writer for HtmlWriter {
    fn write(&self, doc: &Node, options: &RenderOptions) -> String {
        let mut out = String::new();

        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        if let Some(title) = doc.title_text() {
            out.push_str(&format!("<title>{}</title>\n", html_escape(&title)));
        }
        match options.stylesheet {
            Some(ref href) => out.push_str(&format!(
                "<link rel=\"stylesheet\" href=\"{}\" type=\"text/css\">\n",
                html_escape(href)
            )),
            None => {
                out.push_str("<style>\n");
                out.push_str("body { font-family: system-ui, sans-serif; max-width: 48em; margin: 2em auto; padding: 0 1em; }\n");
                out.push_str("code { background: #f4f4f4; padding: 0.15em 0.3em; border-radius: 3px; }\n");
                out.push_str("pre { background: #f4f4f4; padding: 1em; border-radius: 5px; overflow-x: auto; }\n");
                out.push_str("dt { font-weight: bold; margin-top: 0.5em; }\n");
                out.push_str("dd { margin-left: 1.5em; }\n");
                out.push_str(".topic-title { font-weight: bold; }\n");
                out.push_str("a.toc-backref { color: inherit; text-decoration: none; }\n");
                out.push_str("</style>\n");
            }
        }
        out.push_str("</head>\n<body>\n");

        render_node(doc, &Kind::Document, 0, &mut out);

        out.push_str("</body>\n</html>\n");
        out
    }
}

/// Render `node`; `depth` counts the sections enclosing it.
fn render_node(node: &Node, parent: &Kind, depth: usize, out: &mut String) {
    match node.kind {
        Kind::Document => {
            block(node, "div", " class=\"document\"", depth, out);
        }
        Kind::Section => {
            block(node, "div", " class=\"section\"", depth + 1, out);
        }
        Kind::Topic => {
            block(node, "div", " class=\"contents topic\"", depth, out);
        }
        Kind::Title { ref backref } => {
            let (tag, class) = match parent {
                Kind::Document => ("h1".to_string(), " class=\"title\""),
                Kind::Topic => ("p".to_string(), " class=\"topic-title\""),
                _ => (format!("h{}", (depth + 1).min(6)), ""),
            };
            out.push_str(&format!("<{}{}{}>", tag, class, id_attr(node)));
            match backref {
                Some(refid) => {
                    out.push_str(&format!(
                        "<a class=\"toc-backref\" href=\"#{}\">",
                        html_escape(refid)
                    ));
                    inline_children(node, out);
                    out.push_str("</a>");
                }
                None => inline_children(node, out),
            }
            out.push_str(&format!("</{}>\n", tag));
        }
        Kind::Paragraph => inline_block(node, "p", "", out),
        Kind::Term => inline_block(node, "dt", "", out),
        Kind::LiteralBlock => inline_block(node, "pre", " class=\"literal-block\"", out),
        Kind::BulletList => block(node, "ul", "", depth, out),
        Kind::EnumeratedList { start } => {
            let attrs = if start == 1 {
                String::new()
            } else {
                format!(" start=\"{}\"", start)
            };
            block(node, "ol", &attrs, depth, out);
        }
        Kind::ListItem => block(node, "li", "", depth, out),
        Kind::DefinitionList => block(node, "dl", "", depth, out),
        Kind::DefinitionListItem => {
            for child in &node.children {
                render_node(child, &node.kind, depth, out);
            }
        }
        Kind::Definition => block(node, "dd", "", depth, out),
        Kind::BlockQuote => block(node, "blockquote", "", depth, out),
        Kind::Container => block(node, "div", " class=\"container\"", depth, out),
        Kind::Transition => out.push_str("<hr>\n"),
        _ => render_inline(node, out),
    }
}

/// Element whose children are blocks.
fn block(node: &Node, tag: &str, attrs: &str, depth: usize, out: &mut String) {
    out.push_str(&format!("<{}{}{}>\n", tag, attrs, id_attr(node)));
    extra_ids(node, out);
    for child in &node.children {
        render_node(child, &node.kind, depth, out);
    }
    out.push_str(&format!("</{}>\n", tag));
}

/// Element whose children are running text.
fn inline_block(node: &Node, tag: &str, attrs: &str, out: &mut String) {
    out.push_str(&format!("<{}{}{}>", tag, attrs, id_attr(node)));
    extra_ids(node, out);
    inline_children(node, out);
    out.push_str(&format!("</{}>\n", tag));
}

fn inline_children(node: &Node, out: &mut String) {
    for child in &node.children {
        render_inline(child, out);
    }
}

fn render_inline(node: &Node, out: &mut String) {
    match node.kind {
        Kind::Text(ref t) => out.push_str(&html_escape(t)),
        Kind::Strong => wrap_inline(node, "strong", "", out),
        Kind::Emphasis => wrap_inline(node, "em", "", out),
        Kind::Literal => wrap_inline(node, "code", "", out),
        Kind::Reference { ref target, .. } => {
            let attrs = match target {
                Target::Internal(refid) => format!(
                    " class=\"reference internal\" href=\"#{}\"",
                    html_escape(refid)
                ),
                Target::External(uri) => format!(
                    " class=\"reference external\" href=\"{}\"",
                    html_escape(uri)
                ),
            };
            wrap_inline(node, "a", &attrs, out);
        }
        Kind::Image { ref uri, ref alt } => {
            out.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\"{}>",
                html_escape(uri),
                html_escape(alt),
                id_attr(node)
            ));
        }
        // Block content in an inline position: render it as text.
        _ => inline_children(node, out),
    }
}

fn wrap_inline(node: &Node, tag: &str, attrs: &str, out: &mut String) {
    out.push_str(&format!("<{}{}{}>", tag, attrs, id_attr(node)));
    inline_children(node, out);
    out.push_str(&format!("</{}>", tag));
}

fn id_attr(node: &Node) -> String {
    match node.first_id() {
        Some(id) => format!(" id=\"{}\"", html_escape(id)),
        None => String::new(),
    }
}

/// Anchors for every id after the first.
fn extra_ids(node: &Node, out: &mut String) {
    for id in node.ids.iter().skip(1) {
        out.push_str(&format!("<span id=\"{}\"></span>", html_escape(id)));
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(doc: &Node, options: &RenderOptions) -> String {
        HtmlWriter.write(doc, options)
    }

    fn sample() -> Node {
        let mut section = Node::with_children(
            Kind::Section,
            vec![Node::title("a.py"), Node::paragraph("Body <text> & more")],
        );
        section.ids = vec!["lid2".to_string(), "lid5".to_string()];
        let mut doc = Node::with_children(Kind::Document, vec![Node::title("Listing"), section]);
        doc.ids.push("lid1".to_string());
        doc
    }

    #[test]
    fn page_skeleton() {
        let html = render(&sample(), &RenderOptions::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Listing</title>"));
        assert!(html.contains("<style>"));
        assert!(html.contains("<h1 class=\"title\">Listing</h1>"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn sections_carry_ids_and_headings() {
        let html = render(&sample(), &RenderOptions::default());
        assert!(html.contains("<div class=\"section\" id=\"lid2\">\n<span id=\"lid5\"></span>"));
        assert!(html.contains("<h2>a.py</h2>"));
        assert!(html.contains("<p>Body &lt;text&gt; &amp; more</p>"));
    }

    #[test]
    fn stylesheet_is_linked() {
        let options = RenderOptions {
            stylesheet: Some("site.css".to_string()),
            indent: false,
        };
        let html = render(&sample(), &options);
        assert!(html.contains("<link rel=\"stylesheet\" href=\"site.css\""));
        assert!(!html.contains("<style>"));
    }

    #[test]
    fn references_and_backrefs() {
        let title = Node::with_children(
            Kind::Title {
                backref: Some("toc-entry-1".to_string()),
            },
            vec![Node::text("Sec")],
        );
        let para = Node::with_children(
            Kind::Paragraph,
            vec![
                Node::internal_reference("lid3", "x.py", vec![Node::text("x.py")]),
                Node::with_children(
                    Kind::Reference {
                        target: Target::External("http://e.org".to_string()),
                        name: None,
                    },
                    vec![Node::text("e")],
                ),
            ],
        );
        let doc = Node::with_children(
            Kind::Document,
            vec![Node::with_children(Kind::Section, vec![title, para])],
        );
        let html = render(&doc, &RenderOptions::default());
        assert!(html.contains("<h2><a class=\"toc-backref\" href=\"#toc-entry-1\">Sec</a></h2>"));
        assert!(html.contains("<a class=\"reference internal\" href=\"#lid3\">x.py</a>"));
        assert!(html.contains("<a class=\"reference external\" href=\"http://e.org\">e</a>"));
    }

    #[test]
    fn definition_list() {
        let item = Node::with_children(
            Kind::DefinitionListItem,
            vec![
                Node::with_children(Kind::Term, vec![Node::text("name")]),
                Node::with_children(Kind::Definition, vec![Node::paragraph("meaning")]),
            ],
        );
        let doc = Node::with_children(
            Kind::Document,
            vec![Node::with_children(Kind::DefinitionList, vec![item])],
        );
        let html = render(&doc, &RenderOptions::default());
        assert!(html.contains("<dl>\n<dt>name</dt>\n<dd>\n<p>meaning</p>\n</dd>\n</dl>"));
    }
}
