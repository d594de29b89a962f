//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - The host environment (viewport, geometry, scrolling)
//! - Error types

pub mod error;
pub mod host;
