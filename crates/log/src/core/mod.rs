//! Core components for the gateway logging system.
//!
//! ### [`error`] - Error handling
//! The [`LogError`] enum and the [`LogResult`] alias used by every fallible
//! parsing and provisioning API in the crate. The logging facade itself never
//! returns errors.

pub mod error;

pub use error::{LogError, LogResult};
