//! Composite document assembly.
//!
//! Builds one document from the per-file fragments, in discovery order:
//!
//! 1. title, then an optional contents topic (a placeholder until the end)
//! 2. an optional summary section: a quick-index row of letters and a
//!    definition list of `name -> first paragraph`
//! 3. one section per file, titled with the file name
//!
//! Ids come from a single run-scoped [`IdAllocator`]. A file's section is
//! given its id before the summary links to it.

use crate::error::CatalogError;
use crate::markup::contents;
use crate::model::{Entry, Kind, Node};
use tracing::debug;

/// Definition used when a fragment has no paragraph.
pub const NO_SUMMARY_TEXT: &str = "No summary found";

pub const SUMMARY_TITLE: &str = "Plugins summary";

pub const CONTENTS_TITLE: &str = "Contents";

#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Full document title, timestamp included
    pub title: String,
    pub contents: bool,
    pub summary: bool,
}

/// Issues `lid1`, `lid2`, ... and never hands out the same id twice.
#[derive(Debug, Default)]
pub struct IdAllocator {
    issued: usize,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fresh id to `node` and to every document, section and topic
    /// below it, in pre-order. Nodes that already have ids get another one.
    pub fn assign(&mut self, node: &mut Node) {
        self.assign_at(node, 0);
    }

    fn assign_at(&mut self, node: &mut Node, depth: usize) {
        if depth == 0 || node.kind.is_identified() {
            self.issued += 1;
            node.ids.push(format!("lid{}", self.issued));
        }
        for child in &mut node.children {
            self.assign_at(child, depth + 1);
        }
    }

    pub fn issued(&self) -> usize {
        self.issued
    }
}

/// Run-scoped merge state.
pub struct Merger {
    options: MergeOptions,
    ids: IdAllocator,
}

impl Merger {
    pub fn new(options: MergeOptions) -> Self {
        Merger {
            options,
            ids: IdAllocator::new(),
        }
    }

    /// Merge `entries` (in discovery order) into one document.
    pub fn merge(mut self, entries: &[Entry]) -> Result<Node, CatalogError> {
        let mut doc = Node::new(Kind::Document);
        doc.push(Node::title(self.options.title.clone()));

        // Must precede everything it lists.
        let contents_at = if self.options.contents {
            doc.push(Node::with_children(
                Kind::Topic,
                vec![Node::title(CONTENTS_TITLE), Node::new(Kind::Container)],
            ));
            Some(doc.children.len() - 1)
        } else {
            None
        };

        let summary_at = doc.children.len();
        let mut summary = self.options.summary.then(Summary::default);

        for entry in entries {
            let name = &entry.unit.display_name;
            let fragment = &entry.fragment;
            if fragment.kind != Kind::Document {
                return Err(CatalogError::MergeInvariant(format!(
                    "fragment for {} is not rooted at a document",
                    name
                )));
            }

            let mut section = Node::with_children(Kind::Section, vec![Node::title(name.clone())]);
            self.ids.assign(&mut section);

            if let Some(summary) = summary.as_mut() {
                let section_id = section.first_id().ok_or_else(|| {
                    CatalogError::MergeInvariant(format!("section for {} has no id", name))
                })?;
                summary.add(&mut self.ids, name, section_id, fragment)?;
            }

            // A fragment with its own title needs one more level so the file
            // name stays the outermost heading.
            let copies = fragment.children.clone();
            if fragment
                .children
                .iter()
                .any(|c| matches!(c.kind, Kind::Title { .. }))
            {
                section.push(Node::with_children(Kind::Section, copies));
            } else {
                section.children.extend(copies);
            }

            doc.push(section);
        }

        if let Some(summary) = summary {
            doc.children.insert(summary_at, summary.into_section());
        }

        if let Some(topic_index) = contents_at {
            self.ids.assign(&mut doc);
            contents::apply(&mut doc, topic_index)
                .map_err(|e| CatalogError::MergeInvariant(e.to_string()))?;
        }

        debug!(
            sections = entries.len(),
            ids = self.ids.issued(),
            "merged composite document"
        );
        Ok(doc)
    }
}

/// Summary content collected while walking the entries.
#[derive(Default)]
struct Summary {
    /// Quick-index references, one per leading-letter group
    index: Vec<Node>,
    items: Vec<Node>,
    last_letter: Option<String>,
}

impl Summary {
    fn add(
        &mut self,
        ids: &mut IdAllocator,
        name: &str,
        section_id: &str,
        fragment: &Node,
    ) -> Result<(), CatalogError> {
        let first_para = fragment
            .find_first(&|n: &Node| n.kind == Kind::Paragraph)
            .cloned()
            .unwrap_or_else(|| Node::paragraph(NO_SUMMARY_TEXT));

        let mut reference = Node::internal_reference(section_id, name, vec![Node::text(name)]);

        // Only compares with the previous group; relies on sorted input.
        let letter = first_letter(name);
        if self.last_letter.as_deref() != Some(letter.as_str()) {
            ids.assign(&mut reference);
            let refid = reference.first_id().ok_or_else(|| {
                CatalogError::MergeInvariant(format!("summary reference for {} has no id", name))
            })?;
            self.index.push(Node::internal_reference(
                refid,
                name,
                vec![Node::text(format!("{} ", letter))],
            ));
            self.last_letter = Some(letter);
        }

        self.items.push(Node::with_children(
            Kind::DefinitionListItem,
            vec![
                Node::with_children(Kind::Term, vec![reference]),
                Node::with_children(Kind::Definition, vec![first_para]),
            ],
        ));
        Ok(())
    }

    fn into_section(self) -> Node {
        Node::with_children(
            Kind::Section,
            vec![
                Node::title(SUMMARY_TITLE),
                Node::with_children(Kind::Paragraph, self.index),
                Node::with_children(Kind::DefinitionList, self.items),
            ],
        )
    }
}

/// Uppercased first character of a display name.
fn first_letter(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}
