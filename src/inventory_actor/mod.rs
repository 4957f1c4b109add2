//! Shelf inventory records and the consume mutation the workflow relies on.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
