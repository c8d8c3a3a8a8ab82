//! Metadata extraction from normalized shape lists
//!
//! Derives the coarse statistics and feature flags the detection rules
//! consult. A pure, total function of the shape list: empty input yields
//! zero counts, an empty type set, and all flags false.

use tracing::trace;

use crate::core::{DiagramMetadata, Shape};

/// Shape-type vocabulary that marks a diagram as using specialized stencils
const SPECIALIZED_KEYWORDS: [&str; 6] = ["uml", "cisco", "class", "component", "actor", "lifeline"];

/// Label vocabulary hinting at temporal ordering
const TEMPORAL_KEYWORDS: [&str; 7] = ["time", "sequence", "order", "step", "phase", "before", "after"];

/// Shape-type vocabulary hinting at a data model
const DATA_MODEL_KEYWORDS: [&str; 6] = ["table", "entity", "attribute", "relation", "key", "field"];

/// Shape-type vocabulary hinting at network elements
const NETWORK_KEYWORDS: [&str; 6] = ["router", "switch", "server", "firewall", "cisco", "network"];

/// Extract a metadata snapshot from a normalized shape list
pub fn extract_metadata(shapes: &[Shape]) -> DiagramMetadata {
    let nodes: Vec<&Shape> = shapes.iter().filter(|s| !s.is_edge).collect();
    let edges: Vec<&Shape> = shapes.iter().filter(|s| s.is_edge).collect();

    let mut shape_types: Vec<String> = Vec::new();
    for shape in shapes {
        if !shape_types.contains(&shape.shape_type) {
            shape_types.push(shape.shape_type.clone());
        }
    }

    let metadata = DiagramMetadata {
        total_shapes: nodes.len(),
        total_edges: edges.len(),
        has_specialized_shapes: has_specialized_shapes(&shape_types),
        has_directional_flow: has_directional_flow(&edges),
        has_hierarchy: has_hierarchy(&nodes, &edges),
        has_temporal: has_temporal(shapes),
        has_data_model: contains_keyword(&shape_types, &DATA_MODEL_KEYWORDS),
        has_network_elements: contains_keyword(&shape_types, &NETWORK_KEYWORDS),
        shape_types,
    };

    trace!(
        total_shapes = metadata.total_shapes,
        total_edges = metadata.total_edges,
        shape_type_count = metadata.shape_types.len(),
        "Extracted diagram metadata"
    );

    metadata
}

fn has_specialized_shapes(shape_types: &[String]) -> bool {
    contains_keyword(shape_types, &SPECIALIZED_KEYWORDS)
}

fn has_directional_flow(edges: &[&Shape]) -> bool {
    edges.iter().any(|edge| edge.style.has_end_arrow())
}

/// More nodes than connections suggests containment rather than flow
fn has_hierarchy(nodes: &[&Shape], edges: &[&Shape]) -> bool {
    !nodes.is_empty() && (edges.len() as f64) / (nodes.len() as f64) < 0.5
}

fn has_temporal(shapes: &[Shape]) -> bool {
    shapes.iter().any(|shape| {
        let label = shape.label.to_lowercase();
        TEMPORAL_KEYWORDS.iter().any(|keyword| label.contains(keyword))
    })
}

fn contains_keyword(shape_types: &[String], keywords: &[&str]) -> bool {
    shape_types.iter().any(|shape_type| {
        let lowered = shape_type.to_lowercase();
        keywords.iter().any(|keyword| lowered.contains(keyword))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ShapeStyle;

    #[test]
    fn test_empty_input_is_zeroed() {
        let metadata = extract_metadata(&[]);
        assert_eq!(metadata.total_shapes, 0);
        assert_eq!(metadata.total_edges, 0);
        assert!(metadata.shape_types.is_empty());
        assert!(!metadata.has_specialized_shapes);
        assert!(!metadata.has_directional_flow);
        assert!(!metadata.has_hierarchy);
        assert!(!metadata.has_temporal);
        assert!(!metadata.has_data_model);
        assert!(!metadata.has_network_elements);
    }

    #[test]
    fn test_counts_split_nodes_and_edges() {
        let shapes = vec![
            Shape::node("a", "rectangle", "A"),
            Shape::node("b", "rectangle", "B"),
            Shape::edge("e1", "a", "b", ""),
        ];
        let metadata = extract_metadata(&shapes);
        assert_eq!(metadata.total_shapes, 2);
        assert_eq!(metadata.total_edges, 1);
    }

    #[test]
    fn test_shape_types_are_deduplicated() {
        let shapes = vec![
            Shape::node("a", "rectangle", "A"),
            Shape::node("b", "rectangle", "B"),
            Shape::node("c", "ellipse", "C"),
        ];
        let metadata = extract_metadata(&shapes);
        assert_eq!(metadata.shape_types.len(), 2);
        assert!(metadata.shape_types.contains(&"rectangle".to_string()));
        assert!(metadata.shape_types.contains(&"ellipse".to_string()));
    }

    #[test]
    fn test_specialized_shapes_case_insensitive() {
        let shapes = vec![Shape::node("a", "umlActor", "User")];
        assert!(extract_metadata(&shapes).has_specialized_shapes);

        let shapes = vec![Shape::node("a", "CISCO.router", "r1")];
        assert!(extract_metadata(&shapes).has_specialized_shapes);

        let shapes = vec![Shape::node("a", "rectangle", "User")];
        assert!(!extract_metadata(&shapes).has_specialized_shapes);
    }

    #[test]
    fn test_directional_flow_requires_end_arrow() {
        let arrow_style = ShapeStyle {
            end_arrow: 1,
            ..ShapeStyle::default()
        };
        let shapes = vec![
            Shape::node("a", "rectangle", "A"),
            Shape::edge("e1", "a", "a", "").with_style(arrow_style),
        ];
        assert!(extract_metadata(&shapes).has_directional_flow);

        let shapes = vec![
            Shape::node("a", "rectangle", "A"),
            Shape::edge("e1", "a", "a", ""),
        ];
        assert!(!extract_metadata(&shapes).has_directional_flow);
    }

    #[test]
    fn test_hierarchy_ratio() {
        // 3 nodes, 1 edge: ratio 0.33 < 0.5
        let shapes = vec![
            Shape::node("a", "rectangle", "A"),
            Shape::node("b", "rectangle", "B"),
            Shape::node("c", "rectangle", "C"),
            Shape::edge("e1", "a", "b", ""),
        ];
        assert!(extract_metadata(&shapes).has_hierarchy);

        // 2 nodes, 2 edges: ratio 1.0
        let shapes = vec![
            Shape::node("a", "rectangle", "A"),
            Shape::node("b", "rectangle", "B"),
            Shape::edge("e1", "a", "b", ""),
            Shape::edge("e2", "b", "a", ""),
        ];
        assert!(!extract_metadata(&shapes).has_hierarchy);
    }

    #[test]
    fn test_temporal_vocabulary_in_labels() {
        let shapes = vec![Shape::node("a", "rectangle", "Step 1: gather input")];
        assert!(extract_metadata(&shapes).has_temporal);

        let shapes = vec![Shape::node("a", "rectangle", "Gather input")];
        assert!(!extract_metadata(&shapes).has_temporal);
    }

    #[test]
    fn test_data_model_and_network_vocabularies() {
        let shapes = vec![Shape::node("a", "table", "users")];
        let metadata = extract_metadata(&shapes);
        assert!(metadata.has_data_model);
        assert!(!metadata.has_network_elements);

        let shapes = vec![Shape::node("a", "router", "edge-1")];
        let metadata = extract_metadata(&shapes);
        assert!(metadata.has_network_elements);
        assert!(!metadata.has_data_model);
    }
}
