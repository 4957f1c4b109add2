//! The consumption workflow: a service actor that owns one session at a time
//! and walks it through review, reason editing, submission and close.

pub mod error;
pub mod phase;
pub mod report;
pub mod service;

pub use error::*;
pub use phase::*;
pub use report::*;
pub use service::*;
