//! Markup reader: `pulldown-cmark` events to a sectioned document tree.
//!
//! Headings do not stay flat. Like docutils, each heading opens a section that
//! runs until the next heading of the same or a higher rank, and ranks are
//! assigned to heading styles in order of first appearance.

use super::MarkupError;
use crate::model::{Kind, Node, Target};
use pulldown_cmark::{Event, Options, Parser, Tag};

/// A top-level item before sectioning.
enum Block {
    Heading { level: usize, line: usize, title: Node },
    Body(Node),
}

struct Frame {
    node: Node,
    /// Children are spliced into the parent when the frame closes
    transparent: bool,
    heading: Option<(usize, usize)>,
}

impl Frame {
    fn new(kind: Kind) -> Self {
        Frame {
            node: Node::new(kind),
            transparent: false,
            heading: None,
        }
    }
}

/// Parse markup text into a document tree.
pub fn parse(text: &str) -> Result<Node, MarkupError> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut stack: Vec<Frame> = vec![Frame::new(Kind::Document)];

    for (event, range) in Parser::new_ext(text, Options::empty()).into_offset_iter() {
        match event {
            Event::Start(tag) => {
                let frame = match tag {
                    Tag::Heading { level, .. } => {
                        let line = line_of(text, range.start);
                        if stack.len() != 1 {
                            return Err(MarkupError::severe(line, "Unexpected section title"));
                        }
                        let mut frame = Frame::new(Kind::Title { backref: None });
                        frame.heading = Some((level as usize, line));
                        frame
                    }
                    Tag::Paragraph | Tag::HtmlBlock => Frame::new(Kind::Paragraph),
                    Tag::BlockQuote(_) => Frame::new(Kind::BlockQuote),
                    Tag::CodeBlock(_) => Frame::new(Kind::LiteralBlock),
                    Tag::List(Some(start)) => Frame::new(Kind::EnumeratedList { start }),
                    Tag::List(None) => Frame::new(Kind::BulletList),
                    Tag::Item => Frame::new(Kind::ListItem),
                    Tag::Emphasis => Frame::new(Kind::Emphasis),
                    Tag::Strong => Frame::new(Kind::Strong),
                    Tag::Link { dest_url, .. } => Frame::new(Kind::Reference {
                        target: Target::External(dest_url.to_string()),
                        name: None,
                    }),
                    Tag::Image { dest_url, .. } => Frame::new(Kind::Image {
                        uri: dest_url.to_string(),
                        alt: String::new(),
                    }),
                    _ => {
                        let mut frame = Frame::new(Kind::Container);
                        frame.transparent = true;
                        frame
                    }
                };
                stack.push(frame);
            }
            Event::End(_) => {
                if stack.len() > 1 {
                    if let Some(frame) = stack.pop() {
                        close(frame, &mut stack, &mut blocks);
                    }
                }
            }
            Event::Text(t) => push_text(&mut stack, &t),
            Event::Html(t) | Event::InlineHtml(t) => push_text(&mut stack, &t),
            Event::SoftBreak | Event::HardBreak => push_text(&mut stack, "\n"),
            Event::Code(t) => {
                push_inline(
                    &mut stack,
                    Node::with_children(Kind::Literal, vec![Node::text(t.to_string())]),
                );
            }
            Event::Rule => push_inline(&mut stack, Node::new(Kind::Transition)),
            _ => {}
        }
    }

    // Unbalanced events never come out of the parser; fold anything left over.
    while stack.len() > 1 {
        if let Some(frame) = stack.pop() {
            close(frame, &mut stack, &mut blocks);
        }
    }

    let mut doc = stack
        .pop()
        .map(|f| f.node)
        .unwrap_or_else(|| Node::new(Kind::Document));
    for child in wrap_inline_runs(std::mem::take(&mut doc.children)) {
        blocks.push(Block::Body(child));
    }

    doc.children = promote_title(sectionize(blocks)?);
    Ok(doc)
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset.min(text.len())].matches('\n').count() + 1
}

fn push_text(stack: &mut [Frame], text: &str) {
    let Some(top) = stack.last_mut() else {
        return;
    };
    if let Some(Node {
        kind: Kind::Text(prev),
        ..
    }) = top.node.children.last_mut()
    {
        prev.push_str(text);
        return;
    }
    top.node.push(Node::text(text));
}

fn push_inline(stack: &mut [Frame], node: Node) {
    if let Some(top) = stack.last_mut() {
        top.node.push(node);
    }
}

/// Finish a frame and attach its node to the parent (or to the block list).
fn close(frame: Frame, stack: &mut [Frame], blocks: &mut Vec<Block>) {
    let Frame {
        mut node,
        transparent,
        heading,
    } = frame;

    match node.kind {
        Kind::LiteralBlock => {
            if let Some(Node {
                kind: Kind::Text(t), ..
            }) = node.children.last_mut()
            {
                if t.ends_with('\n') {
                    t.pop();
                }
            }
        }
        Kind::Image { ref mut alt, .. } => {
            *alt = node.children.iter().map(Node::text_content).collect();
            node.children.clear();
        }
        Kind::ListItem | Kind::BlockQuote => {
            node.children = wrap_inline_runs(std::mem::take(&mut node.children));
        }
        _ => {}
    }

    let at_top = stack.len() == 1;
    if let Some((level, line)) = heading {
        flush_top(stack, blocks);
        blocks.push(Block::Heading {
            level,
            line,
            title: node,
        });
        return;
    }

    let nodes = if transparent {
        node.children
    } else {
        vec![node]
    };
    if let Some(parent) = stack.last_mut() {
        parent.node.children.extend(nodes);
    }
    if at_top {
        flush_top(stack, blocks);
    }
}

/// Move pending document-level content to the block list, keeping it in
/// order with the headings around it.
fn flush_top(stack: &mut [Frame], blocks: &mut Vec<Block>) {
    if let [doc] = stack {
        for child in wrap_inline_runs(std::mem::take(&mut doc.node.children)) {
            blocks.push(Block::Body(child));
        }
    }
}

/// Group runs of inline nodes into paragraphs; whitespace-only runs vanish.
fn wrap_inline_runs(children: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::with_capacity(children.len());
    let mut run: Vec<Node> = Vec::new();

    fn flush_run(run: &mut Vec<Node>, out: &mut Vec<Node>) {
        let blank = run
            .iter()
            .all(|n| matches!(&n.kind, Kind::Text(t) if t.trim().is_empty()));
        if !blank {
            out.push(Node::with_children(Kind::Paragraph, std::mem::take(run)));
        }
        run.clear();
    }

    for child in children {
        if child.kind.is_inline() {
            run.push(child);
        } else {
            flush_run(&mut run, &mut out);
            out.push(child);
        }
    }
    flush_run(&mut run, &mut out);
    out
}

/// Nest body blocks under headings, ranking heading styles by first use.
fn sectionize(blocks: Vec<Block>) -> Result<Vec<Node>, MarkupError> {
    let mut styles: Vec<usize> = Vec::new();
    let mut root: Vec<Node> = Vec::new();
    let mut open: Vec<Node> = Vec::new();

    for block in blocks {
        match block {
            Block::Body(node) => match open.last_mut() {
                Some(section) => section.push(node),
                None => root.push(node),
            },
            Block::Heading { level, line, title } => {
                let depth = match styles.iter().position(|&s| s == level) {
                    Some(i) => i + 1,
                    None if styles.len() == open.len() => {
                        styles.push(level);
                        styles.len()
                    }
                    None => return Err(MarkupError::severe(line, "Title level inconsistent")),
                };
                if depth > open.len() + 1 {
                    return Err(MarkupError::severe(line, "Title level inconsistent"));
                }
                while open.len() >= depth {
                    close_section(&mut open, &mut root);
                }
                open.push(Node::with_children(Kind::Section, vec![title]));
            }
        }
    }
    while !open.is_empty() {
        close_section(&mut open, &mut root);
    }
    Ok(root)
}

fn close_section(open: &mut Vec<Node>, root: &mut Vec<Node>) {
    if let Some(section) = open.pop() {
        match open.last_mut() {
            Some(parent) => parent.push(section),
            None => root.push(section),
        }
    }
}

/// A lone top-level section becomes the document itself: its title moves up.
fn promote_title(mut children: Vec<Node>) -> Vec<Node> {
    if children.len() == 1 && children[0].kind == Kind::Section {
        return children.remove(0).children;
    }
    children
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(nodes: &[Node]) -> Vec<&'static str> {
        nodes.iter().map(|n| n.kind.tag_name()).collect()
    }

    #[test]
    fn plain_paragraphs() {
        let doc = parse("First plugin.\n\nSecond paragraph.\n").unwrap();
        assert_eq!(doc.kind, Kind::Document);
        assert_eq!(kinds(&doc.children), ["paragraph", "paragraph"]);
        assert_eq!(doc.children[0].text_content(), "First plugin.");
    }

    #[test]
    fn strong_sentinel() {
        let doc = parse("**NO DOCSTRING**").unwrap();
        assert_eq!(kinds(&doc.children), ["paragraph"]);
        assert_eq!(kinds(&doc.children[0].children), ["strong"]);
        assert_eq!(doc.children[0].text_content(), "NO DOCSTRING");
    }

    #[test]
    fn lone_section_title_is_promoted() {
        let doc = parse("Title\n=====\n\nBody text.\n").unwrap();
        assert_eq!(kinds(&doc.children), ["title", "paragraph"]);
        assert_eq!(doc.children[0].text_content(), "Title");
    }

    #[test]
    fn sibling_sections_stay_sections() {
        let doc = parse("Intro.\n\n# One\n\nA.\n\n# Two\n\nB.\n").unwrap();
        assert_eq!(kinds(&doc.children), ["paragraph", "section", "section"]);
        assert_eq!(doc.children[1].title_text().as_deref(), Some("One"));
        assert_eq!(doc.children[2].title_text().as_deref(), Some("Two"));
    }

    #[test]
    fn nested_sections_follow_first_seen_rank() {
        // "###" is seen first, so it ranks above "#".
        let doc = parse("### Top\n\n# Sub\n\ntext\n\n### Next\n").unwrap();
        assert_eq!(kinds(&doc.children), ["section", "section"]);
        let top = &doc.children[0];
        assert_eq!(kinds(&top.children), ["title", "section"]);
        assert_eq!(top.children[1].title_text().as_deref(), Some("Sub"));
    }

    #[test]
    fn skipped_title_level_is_severe() {
        let err = parse("# A\n\n## B\n\n### C\n\n# D\n\n### E\n").unwrap_err();
        assert_eq!(err.severity, super::super::Severity::Severe);
        assert_eq!(err.message, "Title level inconsistent");
        assert_eq!(err.line, 9);
    }

    #[test]
    fn heading_inside_list_is_severe() {
        let err = parse("- # nested\n").unwrap_err();
        assert_eq!(err.message, "Unexpected section title");
    }

    #[test]
    fn tight_list_items_get_paragraphs() {
        let doc = parse("- one\n- two\n").unwrap();
        let list = &doc.children[0];
        assert_eq!(list.kind, Kind::BulletList);
        assert_eq!(kinds(&list.children), ["list_item", "list_item"]);
        assert_eq!(kinds(&list.children[0].children), ["paragraph"]);
    }

    #[test]
    fn literal_block_and_inline_literal() {
        let doc = parse("Use `x`::\n\n    code here\n").unwrap();
        assert_eq!(kinds(&doc.children), ["paragraph", "literal_block"]);
        assert_eq!(doc.children[1].text_content(), "code here");
        assert!(kinds(&doc.children[0].children).contains(&"literal"));
    }

    #[test]
    fn links_and_images() {
        let doc = parse("See [site](http://example.com) ![logo](l.png)\n").unwrap();
        let para = &doc.children[0];
        let link = para
            .find_first(&|n: &Node| matches!(n.kind, Kind::Reference { .. }))
            .unwrap();
        assert_eq!(
            link.kind,
            Kind::Reference {
                target: Target::External("http://example.com".to_string()),
                name: None
            }
        );
        let image = para
            .find_first(&|n: &Node| matches!(n.kind, Kind::Image { .. }))
            .unwrap();
        assert_eq!(
            image.kind,
            Kind::Image {
                uri: "l.png".to_string(),
                alt: "logo".to_string()
            }
        );
    }

    #[test]
    fn empty_text_gives_empty_document() {
        let doc = parse("").unwrap();
        assert!(doc.children.is_empty());
    }
}
