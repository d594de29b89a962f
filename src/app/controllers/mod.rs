//! Controllers layer - orchestration and coordination.
//!
//! Each controller owns the compiled selectors for one page behavior and
//! mutates the document in response to events:
//! - Section navigation
//! - Mobile sidebar
//! - Dark/light theme
//! - Search highlighting
//! - Table-of-contents scrolling
//! - Code block highlighting

pub mod highlight;
pub mod navigation;
pub mod search;
pub mod sidebar;
pub mod theme;
pub mod toc;
