//! Core type definitions for diagram detection
//!
//! This module contains the fundamental types shared across the detection
//! pipeline: the closed diagram type enumeration and the normalized
//! shape model produced by the format-specific ingestion parsers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of diagram types the engine can assign
///
/// Exactly one tag is the result of any analysis. `Unknown` is reserved
/// for the cases where no rule clears its confidence floor or the input
/// could not be read at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagramType {
    /// Generic process flow with decisions and terminals
    Flowchart,
    /// Actors and lifelines exchanging ordered messages
    Sequence,
    /// Classes with attributes, methods, and associations
    Class,
    /// States joined by guarded transitions
    State,
    /// Components, interfaces, and dependency wiring
    Component,
    /// Entities, relationship diamonds, and attribute ellipses
    EntityRelationship,
    /// Routers, switches, and addressed hosts
    Network,
    /// Time-scheduled task bars
    Gantt,
    /// Radial idea hierarchy
    Mindmap,
    /// Events along a time axis
    Timeline,
    /// No type-specific evidence found
    #[default]
    Unknown,
}

impl DiagramType {
    /// All concrete (non-`Unknown`) diagram types, in rule catalogue order
    pub fn detectable() -> &'static [DiagramType] {
        &[
            DiagramType::Sequence,
            DiagramType::Class,
            DiagramType::State,
            DiagramType::Component,
            DiagramType::EntityRelationship,
            DiagramType::Network,
            DiagramType::Flowchart,
        ]
    }

    /// Returns true when no type could be assigned
    pub fn is_unknown(&self) -> bool {
        matches!(self, DiagramType::Unknown)
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramType::Flowchart => write!(f, "flowchart"),
            DiagramType::Sequence => write!(f, "sequence"),
            DiagramType::Class => write!(f, "class"),
            DiagramType::State => write!(f, "state"),
            DiagramType::Component => write!(f, "component"),
            DiagramType::EntityRelationship => write!(f, "entity-relationship"),
            DiagramType::Network => write!(f, "network"),
            DiagramType::Gantt => write!(f, "gantt"),
            DiagramType::Mindmap => write!(f, "mindmap"),
            DiagramType::Timeline => write!(f, "timeline"),
            DiagramType::Unknown => write!(f, "unknown"),
        }
    }
}

/// Visual style attributes of a normalized shape
///
/// The ingestion parsers resolve format-specific styling into these
/// fields; the detector only reads a handful of them (line pattern,
/// rounding, arrow ends) as classification evidence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub fill_foreground: String,
    pub fill_background: String,
    pub text_color: String,
    pub line_color: String,
    pub line_weight: f32,
    /// 0 = solid; 2 is the conventional dashed pattern
    pub line_pattern: i32,
    /// Corner rounding radius; > 0 means rounded corners
    pub rounding: i32,
    /// Arrow code at the edge origin; 0 = none
    pub begin_arrow: i32,
    /// Arrow code at the edge target; 0 = none
    pub end_arrow: i32,
    pub fill_pattern: i32,
}

impl ShapeStyle {
    /// Returns true if the edge carries an arrowhead at its target end
    pub fn has_end_arrow(&self) -> bool {
        self.end_arrow > 0
    }

    /// Returns true if the line is drawn dashed
    pub fn is_dashed(&self) -> bool {
        self.line_pattern == 2
    }

    /// Returns true if corners are rounded
    pub fn is_rounded(&self) -> bool {
        self.rounding > 0
    }
}

/// A normalized node or edge extracted from any source diagram format
///
/// Produced by the ingestion parsers and consumed read-only by the
/// detector. When `is_edge` is true the `from_node`/`to_node` identities
/// are populated, though either may be empty if the source format could
/// not resolve them; the detector tolerates empty identities.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Shape {
    /// Unique identifier within the diagram
    pub id: String,
    /// Format-resolved shape type label (e.g. "umlActor", "rectangle")
    pub shape_type: String,
    /// Display text
    pub label: String,
    /// Resolved visual style
    pub style: ShapeStyle,
    /// True when this shape is a connector rather than a node
    pub is_edge: bool,
    /// Source node identity (edges only)
    pub from_node: String,
    /// Target node identity (edges only)
    pub to_node: String,
}

impl Shape {
    /// Create a node shape with the given type and label
    pub fn node(id: impl Into<String>, shape_type: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            shape_type: shape_type.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    /// Create an edge shape connecting two node identities
    pub fn edge(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            shape_type: "edge".to_string(),
            label: label.into(),
            is_edge: true,
            from_node: from.into(),
            to_node: to.into(),
            ..Self::default()
        }
    }

    /// Replace the style record, builder-style
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }
}

/// A normalized diagram: the shape list plus the optional attached analysis
///
/// The external orchestrator attaches a [`DiagramAnalysis`] after running
/// detection; downstream generator routing treats a missing analysis (or a
/// detected type of `Unknown`) as flowchart-style rendering.
///
/// [`DiagramAnalysis`]: crate::core::DiagramAnalysis
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Diagram {
    pub shapes: Vec<Shape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<crate::core::DiagramAnalysis>,
}

impl Diagram {
    /// Create a diagram from a shape list, with no analysis attached
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self {
            shapes,
            analysis: None,
        }
    }

    /// The diagram type generators should route on
    ///
    /// Falls back to flowchart when no analysis is attached or the
    /// detector returned `Unknown`.
    pub fn routing_type(&self) -> DiagramType {
        match &self.analysis {
            Some(analysis) if !analysis.detected_type.is_unknown() => analysis.detected_type,
            _ => DiagramType::Flowchart,
        }
    }
}
