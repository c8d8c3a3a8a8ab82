//! Binnacle - Diagram type detection for heterogeneous diagram formats
//!
//! A library that classifies diagrams — DrawIO XML, PlantUML text, or
//! any format already normalized into a shape list — into a diagram
//! type (flowchart, sequence, class, state, ...) with a 0–100
//! confidence and itemized supporting evidence.
//!
//! # Quick Start
//!
//! ```rust
//! use binnacle::analyze_file;
//!
//! let content: &[u8] = b"@startuml\nparticipant Alice\nAlice -> Bob: hello\n@enduml";
//! let analysis = analyze_file("diagram.puml", Some(content));
//! println!("{} ({}%)", analysis.detected_type, analysis.confidence.round());
//! ```
//!
//! # Shape-Based Detection
//!
//! For formats with no source-aware detector, run the generic detector
//! against the normalized shape list your parser produced:
//!
//! ```rust
//! use binnacle::prelude::*;
//!
//! let shapes = vec![
//!     Shape::node("r1", "router", "core 10.0.0.1"),
//!     Shape::node("s1", "switch", "access"),
//! ];
//! let analysis = analyze_shapes(&shapes);
//! assert_eq!(analysis.detected_type, DiagramType::Network);
//! ```
//!
//! Every entry point is infallible: missing files, malformed content,
//! and unknown extensions all produce the canonical empty analysis
//! (`Unknown`, confidence 0) rather than an error.

pub mod core;
pub mod detect;

pub use crate::core::*;
pub use crate::detect::{analyze_file, analyze_shapes, DetectorKind};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        DetectError, DetectionPattern, Diagram, DiagramAnalysis, DiagramMetadata, DiagramType,
        PatternMatch, Shape, ShapeStyle,
    };
    pub use crate::detect::{
        analyze_file, analyze_shapes, DetectorKind, DrawioDetector, PlantUmlDetector,
        ShapeDetector,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_file_with_plantuml_bytes() {
        let content = b"@startuml\nparticipant Alice\nparticipant Bob\nAlice -> Bob: hello\n@enduml";
        let analysis = analyze_file("diagram.puml", Some(content.as_slice()));
        assert_eq!(analysis.detected_type, DiagramType::Sequence);
        assert!(analysis.confidence > 0.0);
    }

    #[test]
    fn test_analyze_file_with_drawio_bytes() {
        let content = br#"<mxGraphModel><root>
            <mxCell id="2" value="User" style="shape=umlActor;" vertex="1"/>
            <mxCell id="3" value="Web" style="shape=umlLifeline;" vertex="1"/>
        </root></mxGraphModel>"#;
        let analysis = analyze_file("diagram.drawio", Some(content.as_slice()));
        assert_eq!(analysis.detected_type, DiagramType::Sequence);
    }

    #[test]
    fn test_analyze_file_missing_path_is_unknown() {
        let analysis = analyze_file("/no/such/diagram.drawio", None);
        assert_eq!(analysis.detected_type, DiagramType::Unknown);
        assert_eq!(analysis.confidence, 0.0);
    }

    #[test]
    fn test_attach_analysis_to_diagram() {
        let shapes = vec![
            Shape::node("a", "umlActor", "User"),
            Shape::node("b", "umlLifeline", "Web"),
            Shape::node("c", "umlLifeline", "Api"),
            Shape::edge("e1", "b", "c", ""),
        ];
        let analysis = analyze_shapes(&shapes);
        let mut diagram = Diagram::new(shapes);
        diagram.analysis = Some(analysis);
        assert_eq!(diagram.routing_type(), DiagramType::Sequence);
    }
}
