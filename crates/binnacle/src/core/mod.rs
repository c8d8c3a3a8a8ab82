//! Core abstractions for diagram detection
//!
//! This module defines the value types shared by every detector: the
//! diagram type enumeration, the normalized shape model, the analysis
//! result types, plus the crate's error and logging infrastructure.

mod analysis;
mod error;
pub mod logging;
mod types;

pub use analysis::*;
pub use error::*;
pub use logging::*;
pub use types::*;
