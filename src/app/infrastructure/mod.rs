//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - FLTK buffer utilities
//! - OS clipboard access
//! - Error types

pub mod buffer;
pub mod clipboard;
pub mod error;
