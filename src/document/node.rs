use crate::document::Document;

/// Index of a node inside its [`Document`]
pub type NodeId = usize;

/// The kind of a document node and its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document root
    Document,

    /// A `<!DOCTYPE ...>` declaration
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },

    /// An element with its lowercase tag name and attributes in source order
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },

    Text(String),

    Comment(String),
}

impl NodeKind {
    /// Converts a `scraper` node; fragments and processing instructions are dropped
    pub(crate) fn from_scraper(node: &scraper::Node) -> Option<Self> {
        match node {
            scraper::Node::Doctype(doctype) => Some(Self::Doctype {
                name: doctype.name().to_string(),
                public_id: doctype.public_id().to_string(),
                system_id: doctype.system_id().to_string(),
            }),
            scraper::Node::Element(element) => Some(Self::Element {
                name: element.name().to_ascii_lowercase(),
                attrs: element
                    .attrs()
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect(),
            }),
            scraper::Node::Text(text) => Some(Self::Text(String::from(&**text))),
            scraper::Node::Comment(comment) => Some(Self::Comment(String::from(&**comment))),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) children: Vec<NodeId>,
}

impl NodeData {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }
}

/// A borrowed handle to one node of a [`Document`]
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    document: &'a Document,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(document: &'a Document, id: NodeId) -> Self {
        Self { document, id }
    }

    pub fn kind(&self) -> &'a NodeKind {
        &self.document.data(self.id).kind
    }

    /// Direct children in document order
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let document = self.document;
        document
            .data(self.id)
            .children
            .iter()
            .map(move |&id| NodeRef::new(document, id))
    }

    pub fn first_child(&self) -> Option<NodeRef<'a>> {
        self.children().next()
    }

    /// This node and everything below it, depth-first in document order
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants {
            document: self.document,
            stack: vec![self.id],
        }
    }

    /// Lowercase tag name if this is an element
    pub fn element_name(&self) -> Option<&'a str> {
        match self.kind() {
            NodeKind::Element { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Returns true if this is an element with the given tag name
    pub fn is_element(&self, tag: &str) -> bool {
        self.element_name()
            .is_some_and(|name| name.eq_ignore_ascii_case(tag))
    }

    /// Element attributes in source order; empty for non-elements
    pub fn attrs(&self) -> &'a [(String, String)] {
        match self.kind() {
            NodeKind::Element { attrs, .. } => attrs.as_slice(),
            _ => &[],
        }
    }

    /// Looks up an attribute value by case-insensitive name
    pub fn attr(&self, key: &str) -> Option<&'a str> {
        self.attrs()
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attr(key).is_some()
    }

    /// Text content if this is a text node
    pub fn text(&self) -> Option<&'a str> {
        match self.kind() {
            NodeKind::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

/// Pre-order iterator over a subtree
pub struct Descendants<'a> {
    document: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.document.data(id).children.iter().rev().copied());
        Some(NodeRef::new(self.document, id))
    }
}
