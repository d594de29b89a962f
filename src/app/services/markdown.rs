//! Markdown to document tree.
//!
//! Renders pulldown-cmark events straight into [`Document`] nodes. Fenced
//! code is wrapped in `div.command-block > pre > code.language-*` so the
//! search handler and code highlighter find it; headings get stable ids.

use std::collections::HashSet;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use super::text_ops::{code_language, slugify};
use crate::app::domain::tree::{Document, NodeId};

/// A heading produced while rendering, for building a table of contents.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedHeading {
    pub level: u8,
    pub id: String,
    pub title: String,
    pub node: NodeId,
}

fn heading_tag(level: HeadingLevel) -> (&'static str, u8) {
    match level {
        HeadingLevel::H1 => ("h1", 1),
        HeadingLevel::H2 => ("h2", 2),
        HeadingLevel::H3 => ("h3", 3),
        HeadingLevel::H4 => ("h4", 4),
        HeadingLevel::H5 => ("h5", 5),
        HeadingLevel::H6 => ("h6", 6),
    }
}

struct TreeWriter<'d> {
    doc: &'d mut Document,
    stack: Vec<NodeId>,
    id_prefix: String,
    used_ids: HashSet<String>,
    headings: Vec<RenderedHeading>,
    /// Level of each open heading and whether it carried an explicit id.
    open_headings: Vec<(u8, bool)>,
}

impl<'d> TreeWriter<'d> {
    fn current(&self) -> NodeId {
        // The stack always holds the render root at the bottom.
        self.stack[self.stack.len() - 1]
    }

    fn open(&mut self, tag: &str) -> NodeId {
        let el = self.doc.create_element(tag);
        let parent = self.current();
        self.doc.append_child(parent, el);
        self.stack.push(el);
        el
    }

    fn leaf(&mut self, tag: &str) -> NodeId {
        let el = self.doc.create_element(tag);
        let parent = self.current();
        self.doc.append_child(parent, el);
        el
    }

    fn text(&mut self, text: &str) {
        let parent = self.current();
        if self.doc.tag(parent) == Some("img") {
            let alt = format!("{}{}", self.doc.attr(parent, "alt").unwrap_or_default(), text);
            self.doc.set_attr(parent, "alt", &alt);
            return;
        }
        let node = self.doc.create_text(text);
        self.doc.append_child(parent, node);
    }

    fn unique_id(&mut self, base: &str) -> String {
        let base = if base.is_empty() {
            self.id_prefix.clone()
        } else if self.id_prefix.is_empty() {
            base.to_string()
        } else {
            format!("{}-{}", self.id_prefix, base)
        };
        let mut candidate = base.clone();
        let mut n = 1;
        while !self.used_ids.insert(candidate.clone()) {
            n += 1;
            candidate = format!("{base}-{n}");
        }
        candidate
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.open("p");
            }
            Tag::Heading { level, id, .. } => {
                let (name, level) = heading_tag(level);
                let el = self.open(name);
                let explicit = id.is_some();
                if let Some(id) = id {
                    self.used_ids.insert(id.to_string());
                    self.doc.set_attr(el, "id", &id);
                }
                self.open_headings.push((level, explicit));
            }
            Tag::CodeBlock(kind) => {
                let block = self.leaf("div");
                self.doc.add_class(block, "command-block");
                let pre = self.doc.create_element("pre");
                let code = self.doc.create_element("code");
                self.doc.append_child(block, pre);
                self.doc.append_child(pre, code);
                if let CodeBlockKind::Fenced(info) = kind
                    && let Some(lang) = code_language(&info)
                {
                    self.doc.add_class(code, &format!("language-{lang}"));
                }
                self.stack.push(code);
            }
            Tag::List(Some(start)) => {
                let ol = self.open("ol");
                if start != 1 {
                    self.doc.set_attr(ol, "start", &start.to_string());
                }
            }
            Tag::List(None) => {
                self.open("ul");
            }
            Tag::Item => {
                self.open("li");
            }
            Tag::Emphasis => {
                self.open("em");
            }
            Tag::Strong => {
                self.open("strong");
            }
            Tag::Strikethrough => {
                self.open("del");
            }
            Tag::Link { dest_url, title, .. } => {
                let a = self.open("a");
                self.doc.set_attr(a, "href", &dest_url);
                if !title.is_empty() {
                    self.doc.set_attr(a, "title", &title);
                }
            }
            Tag::Image { dest_url, title, .. } => {
                let img = self.open("img");
                self.doc.set_attr(img, "src", &dest_url);
                self.doc.set_attr(img, "alt", "");
                if !title.is_empty() {
                    self.doc.set_attr(img, "title", &title);
                }
            }
            Tag::Table(_) => {
                self.open("table");
            }
            Tag::TableHead => {
                self.open("thead");
            }
            Tag::TableRow => {
                self.open("tr");
            }
            Tag::TableCell => {
                self.open("td");
            }
            _ => {
                self.open("div");
            }
        }
    }

    fn end(&mut self, tag: TagEnd) {
        let Some(node) = self.stack.pop() else {
            return;
        };
        if let TagEnd::Heading(_) = tag
            && let Some((level, explicit)) = self.open_headings.pop()
        {
            let title = self.doc.text_content(node);
            let id = if explicit {
                self.doc.id(node).unwrap_or_default().to_string()
            } else {
                let id = self.unique_id(&slugify(&title));
                self.doc.set_attr(node, "id", &id);
                id
            };
            self.headings.push(RenderedHeading {
                level,
                id,
                title,
                node,
            });
        }
    }
}

/// Render `markdown` as children of `parent`. Generated heading ids are
/// prefixed with `id_prefix` and unique within this call.
pub fn render_markdown(
    doc: &mut Document,
    parent: NodeId,
    markdown: &str,
    id_prefix: &str,
) -> Vec<RenderedHeading> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

    let mut writer = TreeWriter {
        doc: &mut *doc,
        stack: vec![parent],
        id_prefix: id_prefix.to_string(),
        used_ids: HashSet::new(),
        headings: Vec::new(),
        open_headings: Vec::new(),
    };

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(tag) => writer.start(tag),
            Event::End(tag) => {
                if writer.stack.len() > 1 {
                    writer.end(tag);
                }
            }
            Event::Text(text) => writer.text(&text),
            Event::Code(code) => {
                let el = writer.leaf("code");
                let text = writer.doc.create_text(&code);
                writer.doc.append_child(el, text);
            }
            Event::SoftBreak => writer.text("\n"),
            Event::HardBreak => {
                writer.leaf("br");
            }
            Event::Rule => {
                writer.leaf("hr");
            }
            Event::TaskListMarker(checked) => {
                let input = writer.leaf("input");
                writer.doc.set_attr(input, "type", "checkbox");
                writer.doc.set_attr(input, "disabled", "");
                if checked {
                    writer.doc.set_attr(input, "checked", "");
                }
            }
            Event::Html(raw) | Event::InlineHtml(raw) => {
                log::debug!("skipping raw html in markdown: {}", raw.trim());
            }
            _ => {}
        }
    }

    let headings = writer.headings;
    doc.normalize(parent);
    headings
}
