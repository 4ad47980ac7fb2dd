//! Domain services: merge policy, referential checks, audit recording, and
//! telemetry wiring.

pub mod audit;
pub mod merge;
pub mod reference;
pub mod telemetry;

pub use audit::*;
pub use merge::*;
pub use reference::*;
pub use telemetry::*;
