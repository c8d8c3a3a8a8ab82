//! Detection result value types
//!
//! The detectors produce a [`DiagramAnalysis`]: a detected type with a
//! 0–100 confidence, the per-type evidence that supported it, and a
//! coarse metadata snapshot of the input. All values here are plain
//! immutable data; none of them carry behavior beyond constructors.

use serde::{Deserialize, Serialize};

use crate::core::DiagramType;

/// Derived statistics about a diagram, computed once per analysis call
///
/// For shape-based detection the fields come from the normalized shape
/// list; the source-aware detectors derive the same snapshot from raw
/// markup heuristics instead.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiagramMetadata {
    /// Number of non-edge shapes
    pub total_shapes: usize,
    /// Number of edge shapes
    pub total_edges: usize,
    /// Distinct shape type labels, order not significant
    pub shape_types: Vec<String>,
    /// Any shape type carries UML/Cisco/actor vocabulary
    pub has_specialized_shapes: bool,
    /// Any edge carries an arrowhead at its target end
    pub has_directional_flow: bool,
    /// More nodes than connections, suggesting containment
    pub has_hierarchy: bool,
    /// Temporal vocabulary appears in labels
    pub has_temporal: bool,
    /// Data-model vocabulary appears in shape types
    pub has_data_model: bool,
    /// Network vocabulary appears in shape types
    pub has_network_elements: bool,
}

/// Outcome of a single pattern matcher invocation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PatternMatch {
    /// Whether the pattern fired at all
    pub matches: bool,
    /// 0–100 strength of the match
    pub confidence: f64,
    /// Human-readable notes explaining the match
    pub evidence: Vec<String>,
}

impl PatternMatch {
    /// A non-firing result with no evidence
    pub fn miss() -> Self {
        Self::default()
    }

    /// A firing result with the given confidence and one evidence line
    pub fn hit(confidence: f64, evidence: impl Into<String>) -> Self {
        Self {
            matches: true,
            confidence,
            evidence: vec![evidence.into()],
        }
    }
}

/// A fired detection rule, recorded for transparency
///
/// One record is emitted per rule in which at least one matcher fired,
/// not per matcher. `weight` is the raw sum of matched matcher weights
/// (not normalized); consumers sort evidence by this relative magnitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionPattern {
    /// The diagram type this rule argues for
    pub diagram_type: DiagramType,
    /// Human-readable notes from every matched pattern, in matcher order
    pub evidence: Vec<String>,
    /// Sum of matched matcher weights
    pub weight: f64,
    /// 0–100 rule confidence, 0 when the rule missed its floor
    pub confidence: f64,
}

/// The final output of any detection call
///
/// Constructed fresh per call and immutable once returned. The external
/// orchestrator attaches it to the normalized diagram value to route
/// generator selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramAnalysis {
    /// Best-scoring diagram type, `Unknown` when nothing cleared its floor
    pub detected_type: DiagramType,
    /// 0–100 confidence of the best match
    pub confidence: f64,
    /// Every rule that fired, in evaluation order
    pub patterns: Vec<DetectionPattern>,
    /// Metadata snapshot of the analyzed input
    pub metadata: DiagramMetadata,
}

impl DiagramAnalysis {
    /// The canonical empty analysis: `Unknown`, zero confidence, no
    /// patterns, zeroed metadata
    ///
    /// Returned for missing files, malformed content, and unsupported
    /// extensions; indistinguishable from "no evidence was present".
    pub fn unknown() -> Self {
        Self {
            detected_type: DiagramType::Unknown,
            confidence: 0.0,
            patterns: Vec::new(),
            metadata: DiagramMetadata::default(),
        }
    }
}

impl Default for DiagramAnalysis {
    fn default() -> Self {
        Self::unknown()
    }
}
