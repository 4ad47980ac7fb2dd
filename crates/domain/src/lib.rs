//! Domain-level building blocks for the gateway admin service.
//!
//! The model module defines the configuration entities and their merge and
//! validation rules; the storage module declares the capability traits the
//! persistence crate implements; the services module carries the policies
//! that sit between the two (merge, referential checks, audit recording)
//! plus telemetry wiring shared with the binary.

pub mod config;
pub mod model;
pub mod services;
pub mod storage;

pub use config::{AdminConfig, ConfigError};
pub use model::*;
pub use services::*;
pub use storage::*;
