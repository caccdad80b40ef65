//! Infrastructure layer module
//!
//! This module contains the adapters around the external crates the loader
//! builds on:
//! - Configuration layering and decoding (figment)
//! - Field validation (validator)

pub mod config;
pub mod validators;
