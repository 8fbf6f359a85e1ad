//! Application layer.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (spans, settings, messages)
//! - `services/` - Pure text operations (classifier, sequence, equation, ...)
//! - `controllers/` - Orchestration around the services
//! - `infrastructure/` - External integrations (FLTK buffer, clipboard, error)
//! - `state.rs` - Main application coordinator

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use domain::{AppSettings, Message, Span, SpanCategory, ThemeMode};
pub use infrastructure::buffer::buffer_text_no_leak;
pub use infrastructure::error::{AppError, Result};
pub use services::markdown::{ClassifyResult, MarkdownClassifier};
pub use state::AppState;
