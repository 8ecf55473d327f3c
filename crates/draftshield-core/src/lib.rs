//! DraftShield Core — error types and configuration.

pub mod config;
pub mod error;

pub use config::ShieldConfig;
pub use error::{Error, Result};
