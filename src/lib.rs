//! MarkPad - a small markdown note editor.
//!
//! The interesting parts live under [`app::services`]: a regex-driven
//! markdown span classifier with interactive link and code-run
//! regions, clipboard sequence and list-paste flows, and a safe
//! arithmetic evaluator behind the `=` keystroke. The FLTK shell in
//! `ui/` and `main.rs` is a thin message-dispatch layer over them.

pub mod app;
pub mod ui;
