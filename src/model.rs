//! Data model for the catalog: a closed, owned document tree.
//!
//! Fragments parsed from single files and the merged composite document share
//! this representation. Nodes own their children, so copying a fragment into
//! the composite is a plain `clone()`.

use std::path::PathBuf;

/// One discovered source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// File name, e.g. `Alpha.py`
    pub display_name: String,
    pub full_path: PathBuf,
}

/// A source unit paired with the parsed tree of its documentation comment.
#[derive(Debug, Clone)]
pub struct Entry {
    pub unit: SourceUnit,
    pub fragment: Node,
}

/// Target of a reference node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Id of a node inside the same document
    Internal(String),
    /// URI outside the document
    External(String),
}

/// Node kinds. Structural kinds carry no payload; leaf and link kinds do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    Document,
    Section,
    Topic,
    /// Heading of the enclosing document, section or topic.
    /// `backref` points at the contents entry linking here.
    Title {
        backref: Option<String>,
    },
    Paragraph,
    BulletList,
    EnumeratedList {
        start: u64,
    },
    ListItem,
    DefinitionList,
    DefinitionListItem,
    Term,
    Definition,
    BlockQuote,
    LiteralBlock,
    Transition,
    /// Generic grouping node, also used as the contents placeholder.
    Container,
    Reference {
        target: Target,
        name: Option<String>,
    },
    Image {
        uri: String,
        alt: String,
    },
    Strong,
    Emphasis,
    Literal,
    Text(String),
}

impl Kind {
    /// Kinds that receive a synthetic id on every id-assignment pass.
    pub fn is_identified(&self) -> bool {
        matches!(self, Kind::Document | Kind::Section | Kind::Topic)
    }

    /// Kinds whose content is running text rather than nested blocks.
    pub fn is_text_element(&self) -> bool {
        matches!(
            self,
            Kind::Title { .. }
                | Kind::Paragraph
                | Kind::Term
                | Kind::LiteralBlock
                | Kind::Reference { .. }
                | Kind::Strong
                | Kind::Emphasis
                | Kind::Literal
        )
    }

    /// Inline kinds, which never stand alone inside a block container.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            Kind::Text(_)
                | Kind::Reference { .. }
                | Kind::Image { .. }
                | Kind::Strong
                | Kind::Emphasis
                | Kind::Literal
        )
    }

    /// Element name used by the structured export.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Kind::Document => "document",
            Kind::Section => "section",
            Kind::Topic => "topic",
            Kind::Title { .. } => "title",
            Kind::Paragraph => "paragraph",
            Kind::BulletList => "bullet_list",
            Kind::EnumeratedList { .. } => "enumerated_list",
            Kind::ListItem => "list_item",
            Kind::DefinitionList => "definition_list",
            Kind::DefinitionListItem => "definition_list_item",
            Kind::Term => "term",
            Kind::Definition => "definition",
            Kind::BlockQuote => "block_quote",
            Kind::LiteralBlock => "literal_block",
            Kind::Transition => "transition",
            Kind::Container => "container",
            Kind::Reference { .. } => "reference",
            Kind::Image { .. } => "image",
            Kind::Strong => "strong",
            Kind::Emphasis => "emphasis",
            Kind::Literal => "literal",
            Kind::Text(_) => "#text",
        }
    }
}

/// A tree node. `ids` accumulates synthetic identifiers; the first one is the
/// canonical link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: Kind,
    pub ids: Vec<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: Kind) -> Self {
        Node {
            kind,
            ids: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_children(kind: Kind, children: Vec<Node>) -> Self {
        Node {
            kind,
            ids: Vec::new(),
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::new(Kind::Text(text.into()))
    }

    pub fn title(text: impl Into<String>) -> Self {
        Node::with_children(Kind::Title { backref: None }, vec![Node::text(text)])
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Node::with_children(Kind::Paragraph, vec![Node::text(text)])
    }

    pub fn internal_reference(refid: &str, name: &str, children: Vec<Node>) -> Self {
        Node::with_children(
            Kind::Reference {
                target: Target::Internal(refid.to_string()),
                name: Some(name.to_string()),
            },
            children,
        )
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn first_id(&self) -> Option<&str> {
        self.ids.first().map(String::as_str)
    }

    /// Concatenated text of this subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Kind::Text(ref t) = self.kind {
            out.push_str(t);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Depth-first pre-order search, the node itself included.
    pub fn find_first<F: Fn(&Node) -> bool>(&self, pred: &F) -> Option<&Node> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_first(pred))
    }

    /// Title text of a document, section or topic, if it has one.
    pub fn title_text(&self) -> Option<String> {
        self.children
            .iter()
            .find(|c| matches!(c.kind, Kind::Title { .. }))
            .map(Node::text_content)
    }

    /// All ids in the subtree, pre-order.
    pub fn all_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.extend(self.ids.iter().map(String::as_str));
        for child in &self.children {
            child.collect_ids(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_content_concatenates_leaves() {
        let p = Node::with_children(
            Kind::Paragraph,
            vec![
                Node::text("Hello "),
                Node::with_children(Kind::Strong, vec![Node::text("world")]),
            ],
        );
        assert_eq!(p.text_content(), "Hello world");
    }

    #[test]
    fn find_first_is_preorder() {
        let doc = Node::with_children(
            Kind::Document,
            vec![
                Node::with_children(Kind::Section, vec![Node::paragraph("inner")]),
                Node::paragraph("outer"),
            ],
        );
        let found = doc
            .find_first(&|n: &Node| n.kind == Kind::Paragraph)
            .map(Node::text_content);
        assert_eq!(found.as_deref(), Some("inner"));
    }

    #[test]
    fn title_text_of_section() {
        let s = Node::with_children(Kind::Section, vec![Node::title("a.py")]);
        assert_eq!(s.title_text().as_deref(), Some("a.py"));
        assert_eq!(Node::new(Kind::Section).title_text(), None);
    }

    #[test]
    fn identified_kinds() {
        assert!(Kind::Document.is_identified());
        assert!(Kind::Section.is_identified());
        assert!(Kind::Topic.is_identified());
        assert!(!Kind::Paragraph.is_identified());
        assert!(!Kind::Title { backref: None }.is_identified());
    }
}
