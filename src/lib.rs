//! Interactive behavior for static documentation pages.
//!
//! A [`Document`](app::Document) tree is built from a TOML manifest and
//! Markdown sections, then driven by a [`PageController`](app::PageController)
//! that handles section tabs, the mobile sidebar, the theme toggle, search
//! highlighting and table-of-contents scrolling.

pub mod app;
