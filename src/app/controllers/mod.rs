//! Controllers sit between the message loop and the services: they own
//! service state, talk to the OS (clipboard, timers), and hand the UI
//! ready-to-apply results.

pub mod highlight;
pub mod paste;
