//! Capability traits the persistence crate implements for the domain.

pub mod traits;

pub use traits::*;
