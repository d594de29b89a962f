use super::controllers::highlight::HighlightController;
use super::controllers::navigation::NavigationController;
use super::controllers::search::{SearchController, SearchOutcome};
use super::controllers::sidebar::SidebarController;
use super::controllers::theme::ThemeController;
use super::controllers::toc::TocController;
use super::domain::events::{DispatchOutcome, PageEvent};
use super::domain::settings::PageSettings;
use super::domain::tree::{Document, NodeId};
use super::infrastructure::error::Result;
use super::infrastructure::host::{Host, Viewport};

pub const NAVIGATION: &str = "navigation";
pub const SIDEBAR_TOGGLE: &str = "sidebar-toggle";
pub const THEME_TOGGLE: &str = "theme-toggle";
pub const TOC_LINK: &str = "toc-link";
pub const OUTSIDE_CLICK: &str = "outside-click";
pub const SEARCH: &str = "search";

/// Owns the page document and the host it is shown in, and routes user
/// events to the behavior controllers.
pub struct PageController<H: Host = Viewport> {
    doc: Document,
    host: H,
    pub settings: PageSettings,
    navigation: NavigationController,
    sidebar: SidebarController,
    theme: ThemeController,
    search: SearchController,
    toc: TocController,
    pub highlight: HighlightController,
    last_search: Option<SearchOutcome>,
}

impl<H: Host> PageController<H> {
    /// Compile every configured selector. Fails on invalid selector syntax.
    pub fn new(doc: Document, settings: PageSettings, host: H) -> Result<Self> {
        let selectors = &settings.selectors;
        let navigation = NavigationController::new(selectors)?;
        let sidebar = SidebarController::new(selectors)?;
        let theme = ThemeController::new(selectors)?;
        let search = SearchController::new(&settings)?;
        let toc = TocController::new(selectors, settings.toc_scroll_offset, settings.scroll_behavior())?;
        let highlight = HighlightController::new(selectors, settings.code_theme, settings.highlight_code)?;

        Ok(Self {
            doc,
            host,
            settings,
            navigation,
            sidebar,
            theme,
            search,
            toc,
            highlight,
            last_search: None,
        })
    }

    /// One-time setup once the document is loaded: the code highlighting pass.
    pub fn initialize(&mut self) {
        let count = self.highlight.highlight_all(&mut self.doc);
        log::debug!("page initialized, {count} code blocks highlighted");
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_parts(self) -> (Document, H) {
        (self.doc, self.host)
    }

    /// Result of the most recent search input, if any.
    pub fn last_search(&self) -> Option<&SearchOutcome> {
        self.last_search.as_ref()
    }

    pub fn is_mobile(&self) -> bool {
        self.settings.is_mobile(self.host.viewport_width())
    }

    /// Route `event` to its handlers. Targets that are not part of this
    /// document are ignored.
    pub fn dispatch(&mut self, event: PageEvent) -> Result<DispatchOutcome> {
        let target = match &event {
            PageEvent::Click { target } | PageEvent::Input { target, .. } => *target,
        };
        if !self.doc.is_attached(target) {
            log::warn!("ignoring event for node {target}: not in the document");
            return Ok(DispatchOutcome::default());
        }
        match event {
            PageEvent::Click { target } => Ok(self.click(target)),
            PageEvent::Input { target, value } => self.input(target, &value),
        }
    }

    /// Element handlers from the target outwards, then the document-level
    /// outside-click check.
    fn click(&mut self, target: NodeId) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();

        for node in self.doc.ancestors_inclusive(target) {
            if self.navigation.is_item(&self.doc, node) {
                self.on_nav_click(node);
                outcome.handled.push(NAVIGATION);
            }
            if self.sidebar.is_toggle(&self.doc, node) {
                self.sidebar.toggle(&mut self.doc);
                outcome.handled.push(SIDEBAR_TOGGLE);
            }
            if self.theme.is_toggle(&self.doc, node) {
                self.theme.toggle(&mut self.doc, node);
                outcome.handled.push(THEME_TOGGLE);
            }
            if self.toc.is_link(&self.doc, node) {
                if self.toc.on_click(&self.doc, &mut self.host, node) {
                    outcome.default_prevented = true;
                }
                outcome.handled.push(TOC_LINK);
            }
        }

        let mobile = self.is_mobile();
        if self.sidebar.dismiss_on_outside_click(&mut self.doc, target, mobile) {
            outcome.handled.push(OUTSIDE_CLICK);
        }

        log::debug!("click on {target}: {:?}", outcome.handled);
        outcome
    }

    fn on_nav_click(&mut self, item: NodeId) {
        if self.navigation.activate(&mut self.doc, item).is_none() {
            return;
        }
        if self.is_mobile() {
            self.sidebar.close(&mut self.doc);
        }
    }

    fn input(&mut self, target: NodeId, value: &str) -> Result<DispatchOutcome> {
        let mut outcome = DispatchOutcome::default();
        if self.search.is_input(&self.doc, target) {
            let result = self.search.on_input(&mut self.doc, &mut self.host, value)?;
            self.last_search = Some(result);
            outcome.handled.push(SEARCH);
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::app::domain::manifest::PageManifest;
    use crate::app::domain::selector::Selector;
    use crate::app::domain::settings::{
        ACTIVE_CLASS, DARK_MODE_CLASS, HIGHLIGHT_CLASS, HIGHLIGHTED_CODE_CLASS, MOON_GLYPH,
        SIDEBAR_OPEN_CLASS, SUN_GLYPH,
    };
    use crate::app::infrastructure::host::ScrollRequest;
    use crate::app::services::markup::to_html;
    use crate::app::services::page_builder::build_page;

    const MANIFEST: &str = r##"
        title = "Git Reference"

        [[sections]]
        id = "basics"
        title = "Basics"
        icon = "fa-terminal"
        markdown = """
### Create a repository

```bash
git init
```

### Stage changes

```bash
git add README.md
git status
```
"""

        [[sections]]
        id = "branching"
        title = "Branching"
        markdown = """
### Create a branch

```bash
git branch feature
```

#### Switch branches

```bash
git switch feature
```
"""
    "##;

    fn controller(width: u32) -> PageController {
        let manifest = PageManifest::from_toml(MANIFEST, Path::new(".")).unwrap();
        let doc = build_page(&manifest).unwrap();
        let mut page = PageController::new(doc, manifest.settings, Viewport::new(width, 800)).unwrap();
        page.initialize();
        page
    }

    fn first(page: &PageController, sel: &str) -> NodeId {
        let doc = page.document();
        doc.query_selector(doc.root(), &Selector::parse(sel).unwrap())
            .unwrap()
    }

    fn all(page: &PageController, sel: &str) -> Vec<NodeId> {
        let doc = page.document();
        doc.query_selector_all(doc.root(), &Selector::parse(sel).unwrap())
    }

    fn click(page: &mut PageController, sel: &str) -> DispatchOutcome {
        let target = first(page, sel);
        page.dispatch(PageEvent::Click { target }).unwrap()
    }

    fn search(page: &mut PageController, value: &str) -> DispatchOutcome {
        let target = first(page, "#search-input");
        page.dispatch(PageEvent::Input {
            target,
            value: value.to_string(),
        })
        .unwrap()
    }

    fn body_has(page: &PageController, class: &str) -> bool {
        let doc = page.document();
        doc.has_class(doc.body(), class)
    }

    fn marker_count(page: &PageController) -> usize {
        all(page, &format!(".{HIGHLIGHT_CLASS}")).len()
    }

    #[test]
    fn test_initialize_highlights_code() {
        let page = controller(1280);
        let blocks = all(&page, "pre code");
        assert_eq!(blocks.len(), 4);
        for block in blocks {
            assert!(page.document().has_class(block, HIGHLIGHTED_CODE_CLASS));
        }
    }

    #[test]
    fn test_nav_click_switches_section() {
        let mut page = controller(1280);
        let outcome = click(&mut page, "li[data-content=branching]");
        assert!(outcome.ran(NAVIGATION));

        let active_items = all(&page, "nav ul li.active");
        let active_sections = all(&page, ".content.active");
        assert_eq!(active_items.len(), 1);
        assert_eq!(active_sections.len(), 1);
        assert_eq!(
            page.document().attr(active_items[0], "data-content"),
            page.document().id(active_sections[0])
        );
        assert_eq!(page.document().id(active_sections[0]), Some("branching"));
    }

    #[test]
    fn test_click_on_nav_icon_bubbles_to_item() {
        let mut page = controller(1280);
        click(&mut page, "li[data-content=branching]");
        let outcome = click(&mut page, "li[data-content=basics] i");
        assert!(outcome.ran(NAVIGATION));
        assert_eq!(page.document().id(first(&page, ".content.active")), Some("basics"));
    }

    #[test]
    fn test_nav_click_closes_sidebar_on_mobile() {
        let mut page = controller(800);
        click(&mut page, ".toggle-sidebar");
        assert!(body_has(&page, SIDEBAR_OPEN_CLASS));
        click(&mut page, "li[data-content=branching]");
        assert!(!page.document().has_class(first(&page, ".sidebar"), ACTIVE_CLASS));
        assert!(!body_has(&page, SIDEBAR_OPEN_CLASS));
    }

    #[test]
    fn test_nav_click_keeps_sidebar_on_desktop() {
        let mut page = controller(1280);
        click(&mut page, ".toggle-sidebar");
        click(&mut page, "li[data-content=branching]");
        assert!(page.document().has_class(first(&page, ".sidebar"), ACTIVE_CLASS));
        assert!(body_has(&page, SIDEBAR_OPEN_CLASS));
    }

    #[test]
    fn test_toggle_click_does_not_self_dismiss() {
        let mut page = controller(800);
        let outcome = click(&mut page, ".toggle-sidebar i");
        assert!(outcome.ran(SIDEBAR_TOGGLE));
        assert!(!outcome.ran(OUTSIDE_CLICK));
        assert!(body_has(&page, SIDEBAR_OPEN_CLASS));
    }

    #[test]
    fn test_sidebar_toggle_twice_restores() {
        let mut page = controller(1280);
        let before = to_html(page.document(), page.document().body());
        click(&mut page, ".toggle-sidebar");
        click(&mut page, ".toggle-sidebar");
        assert_eq!(to_html(page.document(), page.document().body()), before);
    }

    #[test]
    fn test_outside_click_by_width() {
        let mut page = controller(992);
        click(&mut page, ".toggle-sidebar");
        let outcome = click(&mut page, ".page-title");
        assert!(outcome.ran(OUTSIDE_CLICK));
        assert!(!body_has(&page, SIDEBAR_OPEN_CLASS));

        let mut page = controller(993);
        click(&mut page, ".toggle-sidebar");
        let outcome = click(&mut page, ".page-title");
        assert!(!outcome.ran(OUTSIDE_CLICK));
        assert!(body_has(&page, SIDEBAR_OPEN_CLASS));
    }

    #[test]
    fn test_outside_click_follows_resize() {
        let mut page = controller(1280);
        click(&mut page, ".toggle-sidebar");
        page.host_mut().resize(600);
        click(&mut page, ".page-title");
        assert!(!body_has(&page, SIDEBAR_OPEN_CLASS));
    }

    #[test]
    fn test_theme_toggle_round_trip() {
        let mut page = controller(1280);
        let icon = first(&page, ".mode-toggle i");
        let outcome = click(&mut page, ".mode-toggle");
        assert!(outcome.ran(THEME_TOGGLE));
        assert!(body_has(&page, DARK_MODE_CLASS));
        assert!(page.document().has_class(icon, SUN_GLYPH));
        assert!(!page.document().has_class(icon, MOON_GLYPH));

        click(&mut page, ".mode-toggle i");
        assert!(!body_has(&page, DARK_MODE_CLASS));
        assert!(page.document().has_class(icon, MOON_GLYPH));
        assert!(!page.document().has_class(icon, SUN_GLYPH));
    }

    #[test]
    fn test_search_marks_headings_in_active_section_only() {
        let mut page = controller(1280);
        let outcome = search(&mut page, "Create");
        assert!(outcome.ran(SEARCH));
        let markers = all(&page, &format!(".{HIGHLIGHT_CLASS}"));
        assert_eq!(markers.len(), 1);
        assert_eq!(page.document().text_content(markers[0]), "Create");
        let basics = first(&page, "#basics");
        assert!(page.document().contains(basics, markers[0]));
    }

    #[test]
    fn test_search_inside_highlighted_code() {
        let mut page = controller(1280);
        let code = all(&page, "#basics pre code")[1];
        let before = page.document().text_content(code);
        search(&mut page, "git status");
        assert!(marker_count(&page) >= 1);
        assert_eq!(page.document().text_content(code), before);
        let marked: String = all(&page, &format!("#basics .{HIGHLIGHT_CLASS}"))
            .into_iter()
            .map(|m| page.document().text_content(m))
            .collect();
        assert_eq!(marked, "git status");
    }

    #[test]
    fn test_search_follows_active_section() {
        let mut page = controller(1280);
        click(&mut page, "li[data-content=branching]");
        search(&mut page, "switch");
        let markers = all(&page, &format!(".{HIGHLIGHT_CLASS}"));
        assert!(!markers.is_empty());
        let branching = first(&page, "#branching");
        assert!(markers.iter().all(|&m| page.document().contains(branching, m)));
    }

    #[test]
    fn test_short_query_clears_everything() {
        let mut page = controller(1280);
        let section = first(&page, "#basics");
        let clean = to_html(page.document(), section);
        search(&mut page, "git");
        assert!(marker_count(&page) > 0);
        search(&mut page, "g");
        assert_eq!(marker_count(&page), 0);
        assert_eq!(to_html(page.document(), section), clean);
        search(&mut page, "");
        assert_eq!(to_html(page.document(), section), clean);
    }

    #[test]
    fn test_unmatched_query_removes_prior_markers() {
        let mut page = controller(1280);
        search(&mut page, "git");
        search(&mut page, "zzzz");
        assert_eq!(marker_count(&page), 0);
        assert_eq!(page.last_search().map(|s| s.markers), Some(0));
    }

    #[test]
    fn test_search_twice_same_markup() {
        let mut page = controller(1280);
        let section = first(&page, "#basics");
        search(&mut page, "git");
        let once = to_html(page.document(), section);
        search(&mut page, "git");
        assert_eq!(to_html(page.document(), section), once);
    }

    #[test]
    fn test_search_scrolls_last_match_into_view() {
        let mut page = controller(1280);
        search(&mut page, "git");
        let last_code = *all(&page, "#basics pre code").last().unwrap();
        match page.host().last_request() {
            Some(ScrollRequest::IntoView { node, .. }) => assert_eq!(*node, last_code),
            other => panic!("unexpected scroll {other:?}"),
        }
    }

    #[test]
    fn test_toc_click_scrolls_with_offset() {
        let mut page = controller(1280);
        let link = first(&page, "#basics .toc a");
        let href = page.document().attr(link, "href").unwrap().to_string();
        let target = page.document().element_by_id(&href[1..]).unwrap();
        let expected = page.host().offset_top(page.document(), target) - 80.0;

        let outcome = page.dispatch(PageEvent::Click { target: link }).unwrap();
        assert!(outcome.default_prevented);
        assert!(outcome.ran(TOC_LINK));
        match page.host().last_request() {
            Some(ScrollRequest::To { top, .. }) => assert_eq!(*top, expected),
            other => panic!("unexpected scroll {other:?}"),
        }
    }

    #[test]
    fn test_toc_click_missing_target() {
        let mut page = controller(1280);
        let link = first(&page, "#basics .toc a");
        page.document_mut().set_attr(link, "href", "#missing");
        let outcome = page.dispatch(PageEvent::Click { target: link }).unwrap();
        assert!(outcome.default_prevented);
        assert!(page.host().history.is_empty());
    }

    #[test]
    fn test_input_on_other_element_ignored() {
        let mut page = controller(1280);
        let target = first(&page, ".page-title");
        let outcome = page
            .dispatch(PageEvent::Input {
                target,
                value: "git".to_string(),
            })
            .unwrap();
        assert!(outcome.handled.is_empty());
        assert_eq!(marker_count(&page), 0);
    }

    #[test]
    fn test_foreign_and_detached_targets_ignored() {
        let mut page = controller(1280);
        let before = to_html(page.document(), page.document().root());

        let foreign = NodeId(usize::MAX);
        let outcome = page.dispatch(PageEvent::Click { target: foreign }).unwrap();
        assert_eq!(outcome, DispatchOutcome::default());
        let outcome = page
            .dispatch(PageEvent::Input {
                target: foreign,
                value: "git".to_string(),
            })
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::default());

        let detached = page.document_mut().create_element("div");
        let outcome = page.dispatch(PageEvent::Click { target: detached }).unwrap();
        assert!(outcome.handled.is_empty());
        assert_eq!(to_html(page.document(), page.document().root()), before);
        assert!(page.host().history.is_empty());
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let mut settings = PageSettings::default();
        settings.selectors.toc_links = ".toc >".to_string();
        let result = PageController::new(Document::new(), settings, Viewport::default());
        assert!(result.is_err());
    }
}
