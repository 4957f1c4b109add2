pub mod item;
pub mod reason;
pub mod candidate;
pub mod session;
pub mod outcome;
pub mod error;

pub use item::*;
pub use reason::*;
pub use candidate::*;
pub use session::*;
pub use outcome::*;
pub use error::*;
