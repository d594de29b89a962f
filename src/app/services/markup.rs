use std::fmt::Write;

use crate::app::domain::tree::{Document, NodeData, NodeId};

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// Escape text content for HTML.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape an attribute value for a double-quoted HTML attribute.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Serialize `node` and its subtree as HTML.
pub fn to_html(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, node, &mut out);
    out
}

/// Serialize the children of `node` (the DOM's `innerHTML`).
pub fn inner_html(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    for &child in doc.children(node) {
        write_node(doc, child, &mut out);
    }
    out
}

/// Serialize the whole document with a doctype.
pub fn document_html(doc: &Document) -> String {
    let mut out = String::from("<!DOCTYPE html>\n");
    write_node(doc, doc.root(), &mut out);
    out.push('\n');
    out
}

fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    match doc.data(node) {
        NodeData::Text(text) => out.push_str(&escape_text(text)),
        NodeData::Element(el) => {
            out.push('<');
            out.push_str(&el.tag);
            if !el.classes.is_empty() {
                let _ = write!(out, " class=\"{}\"", escape_attr(&el.classes.join(" ")));
            }
            for (name, value) in &el.attrs {
                if value.is_empty() {
                    let _ = write!(out, " {name}");
                } else {
                    let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
                }
            }
            out.push('>');
            if VOID_TAGS.contains(&el.tag.as_str()) {
                return;
            }
            for &child in doc.children(node) {
                write_node(doc, child, out);
            }
            let _ = write!(out, "</{}>", el.tag);
        }
    }
}

/// One line per node, indented by depth: `tag#id.class` for elements,
/// quoted text for text nodes. Used for readable before/after diffs.
pub fn outline(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_outline(doc, node, 0, &mut out);
    out
}

fn write_outline(doc: &Document, node: NodeId, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match doc.data(node) {
        NodeData::Text(text) => {
            let _ = writeln!(out, "{indent}{text:?}");
        }
        NodeData::Element(el) => {
            let mut label = el.tag.clone();
            if let Some(id) = doc.id(node) {
                let _ = write!(label, "#{id}");
            }
            for class in &el.classes {
                let _ = write!(label, ".{class}");
            }
            let _ = writeln!(out, "{indent}{label}");
            for &child in doc.children(node) {
                write_outline(doc, child, depth + 1, out);
            }
        }
    }
}
