//! Immutable document tree
//!
//! The markup parser (`scraper`, backed by html5ever) produces a tree of
//! non-atomic tendrils that cannot cross thread boundaries. This module copies
//! that tree once into an owned, index-based arena so a single [`Document`] can
//! be shared by `Arc` across every concurrent analysis task without locking.

mod node;

pub use node::{Descendants, NodeId, NodeKind, NodeRef};

use node::NodeData;
use scraper::Html;

/// A parsed, read-only HTML document
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Document {
    /// Index of the document root node
    pub const ROOT: NodeId = 0;

    /// Parses HTML content into a document tree
    ///
    /// Parsing is error tolerant: malformed markup is repaired the way a
    /// browser would, so this never fails.
    ///
    /// # Example
    ///
    /// ```
    /// use page_lens::document::Document;
    ///
    /// let doc = Document::parse("<html><head><title>Hi</title></head></html>");
    /// let title = doc
    ///     .descendants()
    ///     .find(|n| n.is_element("title"))
    ///     .unwrap();
    /// assert_eq!(title.first_child().and_then(|c| c.text()), Some("Hi"));
    /// ```
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        Self::from_html(&parsed)
    }

    /// Copies a `scraper` tree into an owned document
    pub fn from_html(html: &Html) -> Self {
        let mut document = Self {
            nodes: vec![NodeData::new(NodeKind::Document)],
        };

        let mut stack = vec![(html.tree.root(), Self::ROOT)];
        while let Some((source, parent)) = stack.pop() {
            for child in source.children() {
                let Some(kind) = NodeKind::from_scraper(child.value()) else {
                    continue;
                };
                let id = document.nodes.len();
                document.nodes.push(NodeData::new(kind));
                document.nodes[parent].children.push(id);
                stack.push((child, id));
            }
        }

        document
    }

    /// Returns the document root
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(self, Self::ROOT)
    }

    /// Depth-first, document-order traversal of every node
    pub fn descendants(&self) -> Descendants<'_> {
        self.root().descendants()
    }

    /// Total number of nodes, including the root
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id]
    }
}
