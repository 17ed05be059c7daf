//! # API Shared
//!
//! Shared definitions for the Nuskha APIs.
//!
//! Contains:
//! - Wire types (`dto` module) used by the REST API, the CLI and `nuskha-core`
//! - Localised user-facing messages (`messages` module)
//! - Shared services like `HealthService`

pub mod dto;
pub mod health;
pub mod messages;

pub use dto::*;
pub use health::HealthService;
