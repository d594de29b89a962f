use crate::app::domain::selector::Selector;
use crate::app::domain::settings::SelectorSettings;
use crate::app::domain::tree::{Document, NodeId};
use crate::app::infrastructure::error::Result;
use crate::app::infrastructure::host::{Host, ScrollBehavior, ScrollRequest};

/// Table-of-contents links: smooth scroll to the anchor, leaving room for
/// the fixed header.
pub struct TocController {
    links: Selector,
    offset: f64,
    behavior: ScrollBehavior,
}

impl TocController {
    pub fn new(selectors: &SelectorSettings, offset: f64, behavior: ScrollBehavior) -> Result<Self> {
        Ok(Self {
            links: Selector::parse(&selectors.toc_links)?,
            offset,
            behavior,
        })
    }

    pub fn is_link(&self, doc: &Document, node: NodeId) -> bool {
        self.links.matches(doc, node)
    }

    /// Handle a click on `link`. Returns true when the default jump should
    /// be suppressed, which is the case for every `#fragment` link.
    pub fn on_click<H: Host>(&self, doc: &Document, host: &mut H, link: NodeId) -> bool {
        let Some(fragment) = doc.attr(link, "href").and_then(|href| href.strip_prefix('#')) else {
            log::debug!("toc link {link} is not a fragment link");
            return false;
        };

        match doc.element_by_id(fragment) {
            Some(target) => {
                let top = host.offset_top(doc, target) - self.offset;
                host.scroll(
                    doc,
                    ScrollRequest::To {
                        top,
                        behavior: self.behavior,
                    },
                );
            }
            None => log::debug!("toc target '#{fragment}' not found"),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::infrastructure::host::Viewport;

    fn page() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let toc = doc.create_element("div");
        doc.add_class(toc, "toc");
        doc.append_child(body, toc);
        let link = doc.create_element("a");
        doc.set_attr(link, "href", "#deep");
        doc.append_child(toc, link);
        let mut target = body;
        for i in 0..20 {
            let p = doc.create_element("p");
            doc.append_child(body, p);
            if i == 15 {
                doc.set_attr(p, "id", "deep");
                target = p;
            }
        }
        (doc, link, target)
    }

    fn controller() -> TocController {
        TocController::new(&SelectorSettings::default(), 80.0, ScrollBehavior::Smooth).unwrap()
    }

    #[test]
    fn test_scrolls_to_target_minus_offset() {
        let (doc, link, target) = page();
        let mut viewport = Viewport::new(1280, 800);
        let expected = viewport.offset_top(&doc, target) - 80.0;
        assert!(controller().on_click(&doc, &mut viewport, link));
        assert_eq!(
            viewport.last_request(),
            Some(&ScrollRequest::To {
                top: expected,
                behavior: ScrollBehavior::Smooth
            })
        );
        assert_eq!(viewport.scroll_top, expected);
    }

    #[test]
    fn test_instant_behavior_is_passed_through() {
        let (doc, link, _) = page();
        let toc = TocController::new(&SelectorSettings::default(), 80.0, ScrollBehavior::Instant).unwrap();
        let mut viewport = Viewport::default();
        toc.on_click(&doc, &mut viewport, link);
        assert!(matches!(
            viewport.last_request(),
            Some(ScrollRequest::To {
                behavior: ScrollBehavior::Instant,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_target_prevents_default_without_scrolling() {
        let (mut doc, link, _) = page();
        doc.set_attr(link, "href", "#nowhere");
        let mut viewport = Viewport::new(1280, 800);
        viewport.scroll_top = 120.0;
        assert!(controller().on_click(&doc, &mut viewport, link));
        assert!(viewport.history.is_empty());
        assert_eq!(viewport.scroll_top, 120.0);
    }

    #[test]
    fn test_external_link_keeps_default() {
        let (mut doc, link, _) = page();
        doc.set_attr(link, "href", "https://git-scm.com/docs");
        let mut viewport = Viewport::default();
        assert!(!controller().on_click(&doc, &mut viewport, link));
        assert!(viewport.history.is_empty());
    }

    #[test]
    fn test_is_link() {
        let (doc, link, target) = page();
        let toc = controller();
        assert!(toc.is_link(&doc, link));
        assert!(!toc.is_link(&doc, target));
    }
}
