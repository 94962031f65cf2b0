//! Foundation types for the OPAL toolkit.
//!
//! This crate contains the types shared by the OPAL navigation crates:
//! the error taxonomy and the `Result` alias. Widget and enhancement
//! crates depend on it without pulling in the navigation engine.

pub mod error;

pub use error::{NavError, Result};
