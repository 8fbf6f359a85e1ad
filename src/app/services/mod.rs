//! Pure application services. Nothing in here touches FLTK; every
//! service takes text in and hands text or spans back, which is what
//! keeps them testable without a running UI.

pub mod clipboard;
pub mod equation;
pub mod increment;
pub mod list_edit;
pub mod markdown;
pub mod sequence;
pub mod tags;
