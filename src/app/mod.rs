//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Document tree, Selector, Settings, Manifest, Events)
//! - `controllers/` - Page behaviors (navigation, sidebar, theme, search, toc, highlight)
//! - `services/` - Business operations (markdown, page builder, markup, syntax, replay)
//! - `infrastructure/` - External integrations (host viewport, error)
//! - `state.rs` - Main page coordinator

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use domain::{
    CodeTheme, DispatchOutcome, Document, NodeData, NodeId, PageEvent, PageManifest, PageSettings,
    SectionSpec, Selector, SelectorSettings,
};
pub use infrastructure::error::{AppError, Result};
pub use infrastructure::host::{Host, ScrollBehavior, ScrollRequest, Viewport};
pub use services::markup::document_html;
pub use services::page_builder::build_page;
pub use services::replay::{ReplayReport, ReplayScript, run_script};
pub use state::PageController;
