//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Spans and interactive regions produced by the classifier
//! - Application settings
//! - Message types for the event system

pub mod messages;
pub mod settings;
pub mod span;

pub use messages::Message;
pub use settings::{AppSettings, ThemeMode};
pub use span::{CodeRunInteraction, LinkInteraction, Span, SpanCategory, TokenKind};
