//! Diagram type detection engine
//!
//! Three detection strategies share one output shape:
//!
//! - [`ShapeDetector`] scores the normalized shape list against the
//!   declarative rule catalogue — the format-independent fallback.
//! - [`DrawioDetector`] and [`PlantUmlDetector`] score raw source text
//!   before normalization, where style tokens and explicit directives
//!   are still intact.
//!
//! [`analyze_file`] selects the strategy from the file extension and is
//! the error boundary for the whole subsystem: it always returns a
//! fully-populated [`DiagramAnalysis`](crate::core::DiagramAnalysis).

mod dispatch;
mod drawio;
mod metadata;
mod plantuml;
mod rules;
mod score;
mod shape;

pub use dispatch::*;
pub use drawio::*;
pub use metadata::*;
pub use plantuml::*;
pub use rules::*;
pub use shape::*;

use once_cell::sync::Lazy;
use regex::Regex;

/// Dotted-quad IP address, a strong network-diagram signal
pub(crate) static IP_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}\b").expect("valid IP pattern"));
