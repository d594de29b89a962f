use crate::app::domain::selector::Selector;
use crate::app::domain::settings::{DARK_MODE_CLASS, MOON_GLYPH, SUN_GLYPH, SelectorSettings};
use crate::app::domain::tree::{Document, NodeId};
use crate::app::infrastructure::error::Result;

/// Dark/light switch. The flag lives on `body`; the control's icon shows the
/// mode a further click would switch to.
pub struct ThemeController {
    toggle: Selector,
    icon: Selector,
}

impl ThemeController {
    pub fn new(selectors: &SelectorSettings) -> Result<Self> {
        Ok(Self {
            toggle: Selector::parse(&selectors.theme_toggle)?,
            icon: Selector::parse("i")?,
        })
    }

    pub fn is_toggle(&self, doc: &Document, node: NodeId) -> bool {
        self.toggle.matches(doc, node)
    }

    pub fn is_dark(&self, doc: &Document) -> bool {
        doc.has_class(doc.body(), DARK_MODE_CLASS)
    }

    /// Flip the theme from `control`. Returns true when dark mode is now on.
    pub fn toggle(&self, doc: &mut Document, control: NodeId) -> bool {
        let body = doc.body();
        let dark = doc.toggle_class(body, DARK_MODE_CLASS);

        match doc.query_selector(control, &self.icon) {
            Some(icon) => {
                let (from, to) = if dark {
                    (MOON_GLYPH, SUN_GLYPH)
                } else {
                    (SUN_GLYPH, MOON_GLYPH)
                };
                doc.remove_class(icon, from);
                doc.add_class(icon, to);
            }
            None => log::warn!("theme toggle {control} has no icon"),
        }

        log::debug!("theme now {}", if dark { "dark" } else { "light" });
        dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let button = doc.create_element("button");
        doc.add_class(button, "mode-toggle");
        let icon = doc.create_element("i");
        doc.add_class(icon, "fas");
        doc.add_class(icon, MOON_GLYPH);
        doc.append_child(button, icon);
        let body = doc.body();
        doc.append_child(body, button);
        (doc, button, icon)
    }

    fn glyphs(doc: &Document, icon: NodeId) -> (bool, bool) {
        (doc.has_class(icon, SUN_GLYPH), doc.has_class(icon, MOON_GLYPH))
    }

    #[test]
    fn test_toggle_to_dark_shows_sun() {
        let (mut doc, button, icon) = page();
        let theme = ThemeController::new(&SelectorSettings::default()).unwrap();
        assert!(theme.toggle(&mut doc, button));
        assert!(theme.is_dark(&doc));
        assert_eq!(glyphs(&doc, icon), (true, false));
        assert!(doc.has_class(icon, "fas"));
    }

    #[test]
    fn test_toggle_twice_restores() {
        let (mut doc, button, icon) = page();
        let theme = ThemeController::new(&SelectorSettings::default()).unwrap();
        theme.toggle(&mut doc, button);
        assert!(!theme.toggle(&mut doc, button));
        assert!(!theme.is_dark(&doc));
        assert_eq!(glyphs(&doc, icon), (false, true));
    }

    #[test]
    fn test_exactly_one_glyph_even_from_inconsistent_start() {
        let (mut doc, button, icon) = page();
        doc.add_class(icon, SUN_GLYPH);
        let theme = ThemeController::new(&SelectorSettings::default()).unwrap();
        for _ in 0..3 {
            theme.toggle(&mut doc, button);
            let (sun, moon) = glyphs(&doc, icon);
            assert!(sun ^ moon);
            assert_eq!(sun, theme.is_dark(&doc));
        }
    }

    #[test]
    fn test_toggle_without_icon_still_flips() {
        let mut doc = Document::new();
        let button = doc.create_element("button");
        let body = doc.body();
        doc.append_child(body, button);
        let theme = ThemeController::new(&SelectorSettings::default()).unwrap();
        assert!(theme.toggle(&mut doc, button));
    }
}
