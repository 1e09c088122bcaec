//! Backend-neutral attributed tree used by the flame codecs.
//!
//! Codecs only talk to [`XmlElement`]: named attributes, ordered children and
//! text content. Parsing goes through `roxmltree`; writing is done here.

pub mod values;

use crate::foundation::error::{FlameError, FlameResult};

#[derive(Clone, Debug, Default, PartialEq)]
/// One element with its attributes (document order), children and text.
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-insensitive (ASCII) tag comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

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
            Some((_, v)) => *v = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attributes.iter().position(|(k, _)| k == name)?;
        Some(self.attributes.remove(idx).1)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// All descendants in document (pre-)order, excluding `self`.
    pub fn descendants(&self) -> Vec<&XmlElement> {
        fn walk<'a>(e: &'a XmlElement, out: &mut Vec<&'a XmlElement>) {
            for c in &e.children {
                out.push(c);
                walk(c, out);
            }
        }

        let mut out = Vec::new();
        walk(self, &mut out);
        out
    }

    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a XmlElement> {
        self.descendants()
            .into_iter()
            .filter(|e| e.name == name)
            .collect()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Parse a document and return its root element.
    pub fn parse(doc: &str) -> FlameResult<Self> {
        let doc = roxmltree::Document::parse(doc)
            .map_err(|e| FlameError::format(format!("malformed XML: {e}")))?;
        Ok(Self::from_node(doc.root_element()))
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let mut out = Self::new(node.tag_name().name());
        for a in node.attributes() {
            out.attributes.push((a.name().to_string(), a.value().to_string()));
        }
        for child in node.children() {
            if child.is_element() {
                out.children.push(Self::from_node(child));
            } else if child.is_text() {
                out.text.push_str(child.text().unwrap_or_default());
            }
        }
        out
    }

    /// Serialize this element (and its subtree) with two-space indentation.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        self.write_into(&mut out, 0);
        out
    }

    /// Serialize as a standalone document with an XML declaration.
    pub fn to_document_string(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        self.write_into(&mut out, 0);
        out
    }

    fn write_into(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(&self.name);
        for (k, v) in &self.attributes {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            out.push_str(&escape(v, true));
            out.push('"');
        }

        let text = self.text.trim();
        if self.children.is_empty() && text.is_empty() {
            out.push_str(" />\n");
            return;
        }

        out.push('>');
        if self.children.is_empty() {
            out.push_str(&escape(&self.text, false));
        } else {
            out.push('\n');
            for c in &self.children {
                c.write_into(out, depth + 1);
            }
            if !text.is_empty() {
                out.push_str(&escape(&self.text, false));
            }
            out.push_str(&indent);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push_str(">\n");
    }
}

fn escape(s: &str, attribute: bool) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if attribute => escaped.push_str("&quot;"),
            '\n' if attribute => escaped.push_str("&#10;"),
            '\r' if attribute => escaped.push_str("&#13;"),
            '\t' if attribute => escaped.push_str("&#9;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
#[path = "../../tests/unit/xml/tree.rs"]
mod tests;
