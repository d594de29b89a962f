use serde::{Deserialize, Serialize};

use crate::app::infrastructure::host::ScrollBehavior;

pub const ACTIVE_CLASS: &str = "active";
pub const SIDEBAR_OPEN_CLASS: &str = "sidebar-open";
pub const DARK_MODE_CLASS: &str = "dark-mode";
pub const SUN_GLYPH: &str = "fa-sun";
pub const MOON_GLYPH: &str = "fa-moon";
pub const HIGHLIGHT_CLASS: &str = "search-highlight";
pub const HIGHLIGHTED_CODE_CLASS: &str = "highlighted";

/// Available code highlighting themes from syntect
/// Each theme has a display name and the internal syntect theme key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CodeTheme {
    #[default]
    InspiredGitHub,
    Base16OceanDark,
    Base16OceanLight,
    Base16EightiesDark,
    Base16MochaDark,
    SolarizedDark,
    SolarizedLight,
}

impl CodeTheme {
    /// Get the syntect theme key for this theme
    pub fn theme_key(&self) -> &'static str {
        match self {
            Self::InspiredGitHub => "InspiredGitHub",
            Self::Base16OceanDark => "base16-ocean.dark",
            Self::Base16OceanLight => "base16-ocean.light",
            Self::Base16EightiesDark => "base16-eighties.dark",
            Self::Base16MochaDark => "base16-mocha.dark",
            Self::SolarizedDark => "Solarized (dark)",
            Self::SolarizedLight => "Solarized (light)",
        }
    }

    /// Get all available themes
    pub fn all() -> &'static [CodeTheme] {
        &[
            Self::InspiredGitHub,
            Self::Base16OceanDark,
            Self::Base16OceanLight,
            Self::Base16EightiesDark,
            Self::Base16MochaDark,
            Self::SolarizedDark,
            Self::SolarizedLight,
        ]
    }
}

/// Selectors describing where each control lives in the rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorSettings {
    #[serde(default = "default_nav_items")]
    pub nav_items: String,

    #[serde(default = "default_sections")]
    pub sections: String,

    #[serde(default = "default_active_section")]
    pub active_section: String,

    #[serde(default = "default_sidebar")]
    pub sidebar: String,

    #[serde(default = "default_sidebar_toggle")]
    pub sidebar_toggle: String,

    #[serde(default = "default_theme_toggle")]
    pub theme_toggle: String,

    #[serde(default = "default_search_input")]
    pub search_input: String,

    /// Blocks scanned by the search handler inside the active section
    #[serde(default = "default_search_targets")]
    pub search_targets: String,

    #[serde(default = "default_toc_links")]
    pub toc_links: String,

    /// Blocks handed to the code highlighter at startup
    #[serde(default = "default_code_blocks")]
    pub code_blocks: String,
}

fn default_nav_items() -> String {
    "nav ul li".to_string()
}

fn default_sections() -> String {
    ".content".to_string()
}

fn default_active_section() -> String {
    ".content.active".to_string()
}

fn default_sidebar() -> String {
    ".sidebar".to_string()
}

fn default_sidebar_toggle() -> String {
    ".toggle-sidebar".to_string()
}

fn default_theme_toggle() -> String {
    ".mode-toggle".to_string()
}

fn default_search_input() -> String {
    "#search-input".to_string()
}

fn default_search_targets() -> String {
    ".command-block pre code, h3, h4".to_string()
}

fn default_toc_links() -> String {
    ".toc a".to_string()
}

fn default_code_blocks() -> String {
    "pre code".to_string()
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            nav_items: default_nav_items(),
            sections: default_sections(),
            active_section: default_active_section(),
            sidebar: default_sidebar(),
            sidebar_toggle: default_sidebar_toggle(),
            theme_toggle: default_theme_toggle(),
            search_input: default_search_input(),
            search_targets: default_search_targets(),
            toc_links: default_toc_links(),
            code_blocks: default_code_blocks(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSettings {
    /// Viewports at or below this width use the collapsible sidebar
    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint: u32,

    /// Space kept free above a table-of-contents target (fixed header)
    #[serde(default = "default_toc_scroll_offset")]
    pub toc_scroll_offset: f64,

    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    #[serde(default = "default_highlight_style")]
    pub highlight_style: String,

    #[serde(default = "default_highlight_code")]
    pub highlight_code: bool,

    /// Animate scrolls; off jumps straight to the target (reduced motion)
    #[serde(default = "default_smooth_scroll")]
    pub smooth_scroll: bool,

    #[serde(default)]
    pub code_theme: CodeTheme,

    #[serde(default)]
    pub selectors: SelectorSettings,
}

fn default_mobile_breakpoint() -> u32 {
    992
}

fn default_toc_scroll_offset() -> f64 {
    80.0
}

fn default_min_query_len() -> usize {
    2
}

fn default_highlight_style() -> String {
    "background-color: yellow; color: black;".to_string()
}

fn default_highlight_code() -> bool {
    true
}

fn default_smooth_scroll() -> bool {
    true
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            mobile_breakpoint: default_mobile_breakpoint(),
            toc_scroll_offset: default_toc_scroll_offset(),
            min_query_len: default_min_query_len(),
            highlight_style: default_highlight_style(),
            highlight_code: default_highlight_code(),
            smooth_scroll: default_smooth_scroll(),
            code_theme: CodeTheme::default(),
            selectors: SelectorSettings::default(),
        }
    }
}

impl PageSettings {
    /// True when the given viewport width uses the mobile layout.
    pub fn is_mobile(&self, viewport_width: u32) -> bool {
        viewport_width <= self.mobile_breakpoint
    }

    pub fn scroll_behavior(&self) -> ScrollBehavior {
        if self.smooth_scroll {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Instant
        }
    }
}
