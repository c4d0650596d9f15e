//! # Document Module
//!
//! An owned, ordered element tree for API registry documents (`vk.xml`,
//! `video.xml` and the supplemental XML files found in a config directory).
//!
//! ## Overview
//!
//! - **[`Document`]** - a parsed file; owns exactly one root [`Element`]
//! - **[`Element`]** - tag, attributes in source order, ordered children
//! - **[`Node`]** - a child is either an element or a run of text
//!
//! Text nodes are kept because registry markup is mixed content
//! (`<type>typedef <type>uint32_t</type> <name>VkFlags</name>;</type>`) and
//! generators read it back. Only element children ever take part in a merge;
//! see [`extend`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use layergen::document::{extend, Document};
//!
//! let mut registry = Document::from_path("vk.xml")?;
//! let supplement = Document::from_path("configs/extra.xml")?;
//! extend(&mut registry, supplement);
//! ```

pub mod extend;
mod parse;
mod write;

pub use extend::{extend, extend_from_path, extend_with_policy, MatchPolicy, LEAF_TAGS};
pub use parse::ParseError;
pub use write::to_xml_string;

use std::path::Path;

use crate::error::GenError;

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested element.
    Element(Element),
    /// Unescaped character data.
    Text(String),
}

/// A named element with attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Element name, e.g. `command`, `types`, `require`
    pub tag: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Child elements and text, in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: add an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder: append a child element.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.append(child);
        self
    }

    /// Builder: append a text node.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Look up an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Append an element as the last child.
    pub fn append(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Iterate over child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// First child element with the given tag.
    #[must_use]
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.elements().find(|e| e.tag == tag)
    }

    /// All child elements with the given tag.
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |e| e.tag == tag)
    }

    /// Concatenated text of this element and all descendants.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Text of the first child element with the given tag.
    #[must_use]
    pub fn child_text(&self, tag: &str) -> Option<String> {
        self.find(tag).map(Element::text)
    }

    /// Number of elements in this subtree, including `self`.
    #[must_use]
    pub fn element_count(&self) -> usize {
        1 + self.elements().map(Element::element_count).sum::<usize>()
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => collect_text(e, out),
        }
    }
}

/// A parsed document: a single root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The document element, e.g. `<registry>`
    pub root: Element,
}

impl Document {
    /// Wrap an element as a document root.
    #[must_use]
    pub fn new(root: Element) -> Self {
        Document { root }
    }

    /// Parse a document from XML text.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed XML, mismatched tags or a
    /// document without a root element.
    pub fn parse_str(xml: &str) -> Result<Self, ParseError> {
        parse::parse_document(xml)
    }

    /// Read and parse a document from disk.
    ///
    /// # Errors
    ///
    /// [`GenError::Filesystem`] when the file cannot be read,
    /// [`GenError::DocumentParse`] when its content is not a well-formed document.
    pub fn from_path(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| GenError::filesystem(path, e))?;
        Document::parse_str(&content).map_err(|e| GenError::parse(path, e.to_string()))
    }

    /// Serialize the document back to XML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML writer fails.
    pub fn to_xml(&self) -> anyhow::Result<String> {
        to_xml_string(self)
    }
}
