//! Virtual document access and an owned, mutable SVG element tree.
//!
//! The rendered page is parsed with `scraper`; the `<svg>` subtree the
//! compositor works on is copied out into [`SvgElement`] so the parsed page
//! itself is never mutated.

use crate::{Error, Result};
use scraper::{ElementRef, Html, Node, Selector};

/// Marker attribute carried by the background element/group.
pub const BACKGROUND_ATTR: &str = "data-element-type";
pub const BACKGROUND_VALUE: &str = "Background";

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// HTML elements that never have content and may be written as `<name/>`.
const HTML_VOID: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// A parsed page as produced by a diagram renderer.
#[derive(Debug)]
pub struct VirtualDocument {
    html: Html,
}

impl VirtualDocument {
    /// Parse a full HTML document (or fragment; html5ever fills in the shell).
    pub fn parse(markup: &str) -> Self {
        Self { html: Html::parse_document(markup) }
    }

    /// Wrap bare SVG markup in a `<div id="container">` page.
    pub fn from_svg(svg: &str) -> Self {
        Self::parse(&format!(
            "<!DOCTYPE html><html><body><div id=\"container\">{}</div></body></html>",
            svg
        ))
    }

    /// Copy out the first `<svg>` below `container`.
    pub fn svg_in(&self, container: &str) -> Result<SvgElement> {
        let selector = Selector::parse(&format!("{} svg", container))
            .map_err(|e| Error::ConfigError(format!("Bad container selector '{}': {:?}", container, e)))?;
        let el = self
            .html
            .select(&selector)
            .next()
            .ok_or_else(|| Error::ElementNotFound(container.to_string()))?;
        Ok(SvgElement::from_element_ref(el))
    }
}

/// A node in the owned tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SvgNode {
    Element(SvgElement),
    Text(String),
    Comment(String),
}

/// An owned element with ordered attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgElement {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<SvgNode>,
    /// Set for HTML content under `<foreignObject>`
    html: bool,
}

impl SvgElement {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), attrs: Vec::new(), children: Vec::new(), html: false }
    }

    /// An element in the HTML namespace, as found inside `<foreignObject>`.
    pub fn html(name: &str) -> Self {
        Self { html: true, ..Self::new(name) }
    }

    pub fn is_html(&self) -> bool {
        self.html
    }

    /// Whether the element may be written as `<name/>`.
    ///
    /// An HTML parser ignores the slash on non-void HTML elements, so those
    /// always get an explicit end tag.
    fn self_closes(&self) -> bool {
        !self.html || HTML_VOID.contains(&self.name.as_str())
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: &str, value: impl ToString) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_child(mut self, child: SvgElement) -> Self {
        self.children.push(SvgNode::Element(child));
        self
    }

    fn from_element_ref(el: ElementRef<'_>) -> Self {
        let value = el.value();
        let mut out = if &*value.name.ns == XHTML_NS {
            SvgElement::html(value.name())
        } else {
            SvgElement::new(value.name())
        };
        for (k, v) in value.attrs() {
            // `xmlns:xlink` surfaces as a bare `xlink` local name; prefixed
            // attributes (`xlink:href`) surface as `href`, which SVG 2 accepts.
            if k == "xlink" && v == XLINK_NS {
                continue;
            }
            out.attrs.push((k.to_string(), v.to_string()));
        }
        for child in el.children() {
            match child.value() {
                Node::Element(_) => {
                    if let Some(child_el) = ElementRef::wrap(child) {
                        out.children.push(SvgNode::Element(SvgElement::from_element_ref(child_el)));
                    }
                }
                Node::Text(t) => out.children.push(SvgNode::Text(t.text.to_string())),
                Node::Comment(c) => out.children.push(SvgNode::Comment(c.comment.to_string())),
                _ => {}
            }
        }
        out
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing in place to keep attribute order stable.
    pub fn set_attr(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|(k, _)| k == key)?;
        Some(self.attrs.remove(idx).1)
    }

    pub fn is_tagged_background(&self) -> bool {
        self.attr(BACKGROUND_ATTR) == Some(BACKGROUND_VALUE)
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &SvgElement> {
        self.children.iter().filter_map(|c| match c {
            SvgNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Index (into `children`) of the first direct child element named `name`.
    pub fn child_index(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|c| matches!(c, SvgNode::Element(e) if e.name == name))
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut SvgElement> {
        match self.children.get_mut(index) {
            Some(SvgNode::Element(e)) => Some(e),
            _ => None,
        }
    }

    pub fn insert_child(&mut self, index: usize, child: SvgElement) {
        let index = index.min(self.children.len());
        self.children.insert(index, SvgNode::Element(child));
    }

    pub fn append_child(&mut self, child: SvgElement) {
        self.children.push(SvgNode::Element(child));
    }

    /// Remove direct children matching `pred`; returns how many were removed.
    pub fn remove_children_where<F>(&mut self, pred: F) -> usize
    where
        F: Fn(&SvgElement) -> bool,
    {
        let before = self.children.len();
        self.children
            .retain(|c| !matches!(c, SvgNode::Element(e) if pred(e)));
        before - self.children.len()
    }

    /// Remove matching elements anywhere below this one.
    pub fn remove_descendants_where<F>(&mut self, pred: &F) -> usize
    where
        F: Fn(&SvgElement) -> bool,
    {
        let mut removed = self.remove_children_where(pred);
        for child in self.children.iter_mut() {
            if let SvgNode::Element(e) = child {
                removed += e.remove_descendants_where(pred);
            }
        }
        removed
    }

    /// First matching element in document order (self excluded).
    pub fn find_descendant_mut<F>(&mut self, pred: &F) -> Option<&mut SvgElement>
    where
        F: Fn(&SvgElement) -> bool,
    {
        for child in self.children.iter_mut() {
            if let SvgNode::Element(e) = child {
                if pred(e) {
                    return Some(e);
                }
                if let Some(found) = e.find_descendant_mut(pred) {
                    return Some(found);
                }
            }
        }
        None
    }

    pub fn find_descendant<F>(&self, pred: &F) -> Option<&SvgElement>
    where
        F: Fn(&SvgElement) -> bool,
    {
        for e in self.child_elements() {
            if pred(e) {
                return Some(e);
            }
            if let Some(found) = e.find_descendant(pred) {
                return Some(found);
            }
        }
        None
    }

    pub fn count_descendants<F>(&self, pred: &F) -> usize
    where
        F: Fn(&SvgElement) -> bool,
    {
        self.child_elements()
            .map(|e| usize::from(pred(e)) + e.count_descendants(pred))
            .sum()
    }

    /// Parse the `viewBox` into `[min-x, min-y, width, height]`.
    pub fn view_box(&self) -> Option<[f64; 4]> {
        let raw = self.attr("viewBox")?;
        let nums: Vec<f64> = raw
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(str::parse::<f64>)
            .collect::<std::result::Result<_, _>>()
            .ok()?;
        match nums.as_slice() {
            [x, y, w, h] if w.is_finite() && h.is_finite() => Some([*x, *y, *w, *h]),
            _ => None,
        }
    }

    /// Serialize to markup (the element's outer markup).
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out, true);
        out
    }

    fn write_markup(&self, out: &mut String, root: bool) {
        out.push('<');
        out.push_str(&self.name);
        // The HTML parser keeps the namespace on the element, not as an
        // attribute; restore it so the output stands alone as an SVG file.
        if root && self.name == "svg" && self.attr("xmlns").is_none() {
            out.push_str(&format!(" xmlns=\"{}\"", SVG_NS));
        }
        for (k, v) in &self.attrs {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            out.push_str(&escape(v, true));
            out.push('"');
        }
        if self.children.is_empty() && self.self_closes() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                SvgNode::Element(e) => e.write_markup(out, false),
                SvgNode::Text(t) => out.push_str(&escape(t, false)),
                SvgNode::Comment(c) => {
                    out.push_str("<!--");
                    out.push_str(c);
                    out.push_str("-->");
                }
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

fn escape(s: &str, attr: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
