//! Structured output surface.
//!
//! Layout and routing build a tree of [`Markup`] values; turning that tree
//! into text is left to a [`Serializer`], so nothing upstream depends on a
//! particular markup syntax.

use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    Element(Element),
    /// Escaped on output.
    Text(String),
    /// Spliced verbatim. Used for fragments supplied by rendering hooks.
    Raw(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Markup>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: &str, value: impl ToString) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn attrs<I>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.attrs.extend(attrs);
        self
    }

    pub fn child(mut self, child: impl Into<Markup>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.child(Markup::Text(text.to_string()))
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements with the given tag, skipping text and raw fragments.
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter_map(move |child| match child {
            Markup::Element(e) if e.tag == tag => Some(e),
            _ => None,
        })
    }
}

impl From<Element> for Markup {
    fn from(element: Element) -> Self {
        Markup::Element(element)
    }
}

/// Turns a markup tree into text.
pub trait Serializer {
    fn serialize(&self, nodes: &[Markup]) -> String;
}

/// HTML/SVG text output. Every element gets an explicit closing tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSerializer;

impl Serializer for HtmlSerializer {
    fn serialize(&self, nodes: &[Markup]) -> String {
        let mut out = String::with_capacity(4096);
        for node in nodes {
            write_markup(&mut out, node);
        }
        out
    }
}

fn write_markup(out: &mut String, node: &Markup) {
    match node {
        Markup::Element(e) => {
            let _ = write!(out, "<{}", e.tag);
            for (name, value) in &e.attrs {
                let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
            }
            out.push('>');
            for child in &e.children {
                write_markup(out, child);
            }
            let _ = write!(out, "</{}>", e.tag);
        }
        Markup::Text(text) => out.push_str(&escape_text(text)),
        Markup::Raw(raw) => out.push_str(raw),
    }
}

/// Escape special characters for attribute values.
pub fn escape_attr(input: &str) -> String {
    escape_text(input).replace('"', "&quot;")
}

/// Escape special characters for text content.
pub fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
