use crate::app::domain::selector::Selector;
use crate::app::domain::settings::{ACTIVE_CLASS, SelectorSettings};
use crate::app::domain::tree::{Document, NodeId};
use crate::app::infrastructure::error::Result;

/// Attribute on a navigation item naming the section it shows.
pub const CONTENT_ATTR: &str = "data-content";

/// Tab-style switching between content sections.
pub struct NavigationController {
    items: Selector,
    sections: Selector,
}

impl NavigationController {
    pub fn new(selectors: &SelectorSettings) -> Result<Self> {
        Ok(Self {
            items: Selector::parse(&selectors.nav_items)?,
            sections: Selector::parse(&selectors.sections)?,
        })
    }

    pub fn is_item(&self, doc: &Document, node: NodeId) -> bool {
        self.items.matches(doc, node)
    }

    /// The content section an item refers to, if it exists.
    pub fn section_for(&self, doc: &Document, item: NodeId) -> Option<NodeId> {
        let content_id = doc.attr(item, CONTENT_ATTR)?;
        doc.element_by_id(content_id)
            .filter(|&section| self.sections.matches(doc, section))
    }

    /// Make `item` and its section the only active ones.
    ///
    /// Returns the section shown. When the item names no existing section
    /// nothing changes and `None` is returned.
    pub fn activate(&self, doc: &mut Document, item: NodeId) -> Option<NodeId> {
        let Some(section) = self.section_for(doc, item) else {
            log::warn!(
                "navigation item {} refers to missing section {:?}",
                item,
                doc.attr(item, CONTENT_ATTR)
            );
            return None;
        };

        let root = doc.root();
        for other in doc.query_selector_all(root, &self.items) {
            doc.remove_class(other, ACTIVE_CLASS);
        }
        doc.add_class(item, ACTIVE_CLASS);

        for other in doc.query_selector_all(root, &self.sections) {
            doc.remove_class(other, ACTIVE_CLASS);
        }
        doc.add_class(section, ACTIVE_CLASS);

        log::debug!("showing section {:?}", doc.id(section));
        Some(section)
    }

    pub fn active_items(&self, doc: &Document) -> Vec<NodeId> {
        doc.query_selector_all(doc.root(), &self.items)
            .into_iter()
            .filter(|&n| doc.has_class(n, ACTIVE_CLASS))
            .collect()
    }

    pub fn active_sections(&self, doc: &Document) -> Vec<NodeId> {
        doc.query_selector_all(doc.root(), &self.sections)
            .into_iter()
            .filter(|&n| doc.has_class(n, ACTIVE_CLASS))
            .collect()
    }
}
