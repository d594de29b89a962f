use crate::app::domain::selector::Selector;
use crate::app::domain::settings::{ACTIVE_CLASS, SIDEBAR_OPEN_CLASS, SelectorSettings};
use crate::app::domain::tree::{Document, NodeId};
use crate::app::infrastructure::error::Result;

/// Mobile sidebar: explicit toggle plus dismissal on clicks elsewhere.
/// The body's `sidebar-open` class always mirrors the sidebar's state.
pub struct SidebarController {
    sidebar: Selector,
    toggle: Selector,
}

impl SidebarController {
    pub fn new(selectors: &SelectorSettings) -> Result<Self> {
        Ok(Self {
            sidebar: Selector::parse(&selectors.sidebar)?,
            toggle: Selector::parse(&selectors.sidebar_toggle)?,
        })
    }

    fn sidebar(&self, doc: &Document) -> Option<NodeId> {
        doc.query_selector(doc.root(), &self.sidebar)
    }

    pub fn is_toggle(&self, doc: &Document, node: NodeId) -> bool {
        self.toggle.matches(doc, node)
    }

    pub fn is_open(&self, doc: &Document) -> bool {
        self.sidebar(doc)
            .is_some_and(|sidebar| doc.has_class(sidebar, ACTIVE_CLASS))
    }

    /// Flip visibility. Returns the new state, or `None` without a sidebar.
    pub fn toggle(&self, doc: &mut Document) -> Option<bool> {
        let Some(sidebar) = self.sidebar(doc) else {
            log::warn!("sidebar toggle clicked but no '{}' element", self.sidebar);
            return None;
        };
        let open = doc.toggle_class(sidebar, ACTIVE_CLASS);
        self.mirror_body(doc, open);
        log::debug!("sidebar {}", if open { "opened" } else { "closed" });
        Some(open)
    }

    /// Hide the sidebar. Returns true when it was open.
    pub fn close(&self, doc: &mut Document) -> bool {
        let Some(sidebar) = self.sidebar(doc) else {
            return false;
        };
        let was_open = doc.has_class(sidebar, ACTIVE_CLASS);
        doc.remove_class(sidebar, ACTIVE_CLASS);
        self.mirror_body(doc, false);
        was_open
    }

    fn mirror_body(&self, doc: &mut Document, open: bool) {
        let body = doc.body();
        if open {
            doc.add_class(body, SIDEBAR_OPEN_CLASS);
        } else {
            doc.remove_class(body, SIDEBAR_OPEN_CLASS);
        }
    }

    /// Document-level click handling: on mobile, a click outside both the
    /// sidebar and its toggle closes an open sidebar. Returns true if closed.
    pub fn dismiss_on_outside_click(&self, doc: &mut Document, target: NodeId, mobile: bool) -> bool {
        if !mobile {
            return false;
        }
        let Some(sidebar) = self.sidebar(doc) else {
            return false;
        };
        if !doc.has_class(sidebar, ACTIVE_CLASS) || doc.contains(sidebar, target) {
            return false;
        }
        let on_toggle = doc
            .query_selector(doc.root(), &self.toggle)
            .is_some_and(|toggle| doc.contains(toggle, target));
        if on_toggle {
            return false;
        }
        self.close(doc)
    }
}
