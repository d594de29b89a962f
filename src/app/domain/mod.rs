//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - The document tree and its selector queries
//! - Page settings and the page manifest
//! - Event types dispatched to the page controller

pub mod events;
pub mod manifest;
pub mod selector;
pub mod settings;
pub mod tree;

pub use events::{DispatchOutcome, PageEvent};
pub use manifest::{PageManifest, SectionSpec};
pub use selector::Selector;
pub use settings::{CodeTheme, PageSettings, SelectorSettings};
pub use tree::{Document, NodeData, NodeId};
