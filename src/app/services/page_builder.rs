//! Assembles a documentation page from a manifest.
//!
//! Layout produced:
//!
//! ```text
//! body
//!   header.header
//!     button.toggle-sidebar > i.fas.fa-bars
//!     h1.page-title
//!     div.search > input#search-input
//!     button.mode-toggle > i.fas.fa-moon
//!   div.container
//!     aside.sidebar > nav > ul > li[data-content=<id>]   (first is .active)
//!     main.main-content > div.content#<id>               (first is .active)
//!       h2, div.toc > ul > li > a[href=#<heading>], rendered markdown
//! ```

use super::markdown::{RenderedHeading, render_markdown};
use crate::app::domain::manifest::{PageManifest, SectionSpec};
use crate::app::domain::settings::{ACTIVE_CLASS, MOON_GLYPH};
use crate::app::domain::tree::{Document, NodeId};
use crate::app::infrastructure::error::Result;

/// Heading level listed in each section's table of contents.
const TOC_LEVEL: u8 = 3;

fn element(doc: &mut Document, parent: NodeId, tag: &str, classes: &[&str]) -> NodeId {
    let el = doc.create_element(tag);
    for class in classes {
        doc.add_class(el, class);
    }
    doc.append_child(parent, el);
    el
}

fn text(doc: &mut Document, parent: NodeId, value: &str) {
    let node = doc.create_text(value);
    doc.append_child(parent, node);
}

fn build_head(doc: &mut Document, manifest: &PageManifest) {
    let head = doc.head();
    let meta = element(doc, head, "meta", &[]);
    doc.set_attr(meta, "charset", "utf-8");
    let viewport = element(doc, head, "meta", &[]);
    doc.set_attr(viewport, "name", "viewport");
    doc.set_attr(viewport, "content", "width=device-width, initial-scale=1.0");
    let title = element(doc, head, "title", &[]);
    text(doc, title, &manifest.title);
    if let Some(href) = &manifest.stylesheet {
        let link = element(doc, head, "link", &[]);
        doc.set_attr(link, "rel", "stylesheet");
        doc.set_attr(link, "href", href);
    }
}

fn build_header(doc: &mut Document, parent: NodeId, title: &str) {
    let header = element(doc, parent, "header", &["header"]);

    let toggle = element(doc, header, "button", &["toggle-sidebar"]);
    doc.set_attr(toggle, "aria-label", "Toggle sidebar");
    element(doc, toggle, "i", &["fas", "fa-bars"]);

    let h1 = element(doc, header, "h1", &["page-title"]);
    text(doc, h1, title);

    let search = element(doc, header, "div", &["search"]);
    let input = element(doc, search, "input", &[]);
    doc.set_attr(input, "type", "text");
    doc.set_attr(input, "id", "search-input");
    doc.set_attr(input, "placeholder", "Search...");

    let mode = element(doc, header, "button", &["mode-toggle"]);
    doc.set_attr(mode, "aria-label", "Toggle dark mode");
    element(doc, mode, "i", &["fas", MOON_GLYPH]);
}

fn build_nav_item(doc: &mut Document, list: NodeId, section: &SectionSpec, active: bool) {
    let li = element(doc, list, "li", &[]);
    doc.set_attr(li, "data-content", &section.id);
    if active {
        doc.add_class(li, ACTIVE_CLASS);
    }
    if let Some(icon) = &section.icon {
        element(doc, li, "i", &["fas", icon.as_str()]);
        text(doc, li, " ");
    }
    text(doc, li, &section.title);
}

fn build_toc(doc: &mut Document, section: NodeId, before: Option<NodeId>, headings: &[RenderedHeading]) {
    let entries: Vec<&RenderedHeading> = headings.iter().filter(|h| h.level == TOC_LEVEL).collect();
    if entries.is_empty() {
        return;
    }
    let toc = doc.create_element("div");
    doc.add_class(toc, "toc");
    match before {
        Some(reference) => doc.insert_before(section, toc, reference),
        None => doc.append_child(section, toc),
    }
    let list = element(doc, toc, "ul", &[]);
    for heading in entries {
        let li = element(doc, list, "li", &[]);
        let a = element(doc, li, "a", &[]);
        doc.set_attr(a, "href", &format!("#{}", heading.id));
        text(doc, a, &heading.title);
    }
}

/// Build the full page tree for `manifest`, reading section sources as needed.
pub fn build_page(manifest: &PageManifest) -> Result<Document> {
    let mut doc = Document::new();
    build_head(&mut doc, manifest);

    let body = doc.body();
    build_header(&mut doc, body, &manifest.title);

    let container = element(&mut doc, body, "div", &["container"]);
    let sidebar = element(&mut doc, container, "aside", &["sidebar"]);
    let nav = element(&mut doc, sidebar, "nav", &[]);
    let list = element(&mut doc, nav, "ul", &[]);
    let main = element(&mut doc, container, "main", &["main-content"]);

    for (idx, section) in manifest.sections.iter().enumerate() {
        let active = idx == 0;
        build_nav_item(&mut doc, list, section, active);

        let content = element(&mut doc, main, "div", &["content"]);
        doc.set_attr(content, "id", &section.id);
        if active {
            doc.add_class(content, ACTIVE_CLASS);
        }
        let h2 = element(&mut doc, content, "h2", &[]);
        text(&mut doc, h2, &section.title);

        let markdown = manifest.section_markdown(section)?;
        let first_rendered = doc.children(content).len();
        let headings = render_markdown(&mut doc, content, &markdown, &section.id);
        let before = doc.children(content).get(first_rendered).copied();
        build_toc(&mut doc, content, before, &headings);
        log::debug!(
            "rendered section '{}' ({} headings)",
            section.id,
            headings.len()
        );
    }

    let root = doc.root();
    doc.normalize(root);
    Ok(doc)
}
