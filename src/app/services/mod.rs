//! Services layer - business operations and utilities.
//!
//! This module contains business logic and operations:
//! - Text matching and slug helpers
//! - Code highlighting (syntect)
//! - Markdown rendering and page assembly
//! - Markup serialization
//! - Event script replay

pub mod markdown;
pub mod markup;
pub mod page_builder;
pub mod replay;
pub mod syntax;
pub mod text_ops;
