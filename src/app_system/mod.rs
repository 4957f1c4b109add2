//! System orchestration, startup, shutdown and process-wide setup.

pub mod pantry_system;
pub mod settings;
pub mod telemetry;

pub use pantry_system::*;
pub use settings::*;
pub use telemetry::*;
