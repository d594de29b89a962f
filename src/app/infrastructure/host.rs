//! The environment the page runs in: viewport size, element geometry and
//! scrolling. Browsers provide this natively; [`Viewport`] is a headless
//! stand-in with a simple flow-layout estimate.

use crate::app::domain::tree::{Document, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScrollRequest {
    To { top: f64, behavior: ScrollBehavior },
    /// Bring `node` to the vertical center of the viewport.
    IntoView { node: NodeId, behavior: ScrollBehavior },
}

pub trait Host {
    /// Current viewport width in logical pixels.
    fn viewport_width(&self) -> u32;

    /// Distance from the top of the page to the top of `node`.
    fn offset_top(&self, doc: &Document, node: NodeId) -> f64;

    /// Start a scroll. Animation is fire-and-forget.
    fn scroll(&mut self, doc: &Document, request: ScrollRequest);
}

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "div", "footer", "form", "h1", "h2", "h3", "h4",
    "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr",
    "ul",
];

/// Headless viewport. Each block-level element is treated as one line of
/// `line_height` pixels; requests are applied immediately and recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub line_height: f64,
    pub scroll_top: f64,
    pub history: Vec<ScrollRequest>,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            line_height: 24.0,
            scroll_top: 0.0,
            history: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: u32) {
        self.width = width;
    }

    pub fn last_request(&self) -> Option<&ScrollRequest> {
        self.history.last()
    }

    fn is_block(doc: &Document, node: NodeId) -> bool {
        doc.tag(node).is_some_and(|tag| BLOCK_TAGS.contains(&tag))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 800)
    }
}

impl Host for Viewport {
    fn viewport_width(&self) -> u32 {
        self.width
    }

    fn offset_top(&self, doc: &Document, node: NodeId) -> f64 {
        let preceding = doc
            .descendants(doc.body())
            .into_iter()
            .take_while(|&n| n != node)
            .filter(|&n| Self::is_block(doc, n) && !doc.contains(n, node))
            .count();
        preceding as f64 * self.line_height
    }

    fn scroll(&mut self, doc: &Document, request: ScrollRequest) {
        let top = match &request {
            ScrollRequest::To { top, .. } => *top,
            ScrollRequest::IntoView { node, .. } => {
                let offset = self.offset_top(doc, *node);
                offset - (f64::from(self.height) - self.line_height) / 2.0
            }
        };
        self.scroll_top = top.max(0.0);
        log::debug!("scroll to {:.1} ({:?})", self.scroll_top, request);
        self.history.push(request);
    }
}
