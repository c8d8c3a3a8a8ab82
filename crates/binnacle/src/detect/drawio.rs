//! Source-aware detection for DrawIO XML
//!
//! Scores raw `mxGraphModel` XML before shape normalization. Style
//! attribute tokens (`shape=umlActor`, `rounded=1`, `dashed=1`) are
//! unambiguous signals in the source but are lossily translated during
//! normalization, so this detector reads them directly.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, span, Level};

use crate::core::{DiagramAnalysis, DiagramMetadata, DiagramType};
use crate::detect::score::{summarize, ScoreCard};
use crate::detect::IP_ADDRESS;

static STYLE_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"style="[^"]*""#).expect("valid style pattern"));
static SHAPE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"shape=([^;"]+)"#).expect("valid shape pattern"));

/// Detector for raw DrawIO XML content
///
/// Stateless; reusable across calls. Never fails: malformed or
/// non-UTF-8 input simply produces little or no evidence.
pub struct DrawioDetector;

impl DrawioDetector {
    pub fn new() -> Self {
        Self
    }

    /// Analyze raw DrawIO file bytes
    pub fn analyze_bytes(&self, bytes: &[u8]) -> DiagramAnalysis {
        let xml = String::from_utf8_lossy(bytes);
        self.analyze_xml(&xml)
    }

    /// Analyze DrawIO XML text for diagram type patterns
    pub fn analyze_xml(&self, xml: &str) -> DiagramAnalysis {
        let analyze_span = span!(Level::INFO, "analyze_drawio", input_len = xml.len());
        let _enter = analyze_span.enter();

        let cards = vec![
            sequence_signals(xml),
            class_signals(xml),
            state_signals(xml),
            component_signals(xml),
            entity_relationship_signals(xml),
            network_signals(xml),
            flowchart_signals(xml),
        ];

        let (detected_type, confidence, patterns) = summarize(cards);

        debug!(
            detected_type = %detected_type,
            confidence,
            pattern_count = patterns.len(),
            "DrawIO analysis completed"
        );

        DiagramAnalysis {
            detected_type,
            confidence,
            patterns,
            metadata: xml_metadata(xml),
        }
    }
}

impl Default for DrawioDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Style attribute token in any of its quoting forms
fn has_attr_token(xml: &str, key: &str, value: &str) -> bool {
    xml.contains(&format!("{key}={value}"))
        || xml.contains(&format!("{key}=\"{value}\""))
        || xml.contains(&format!("{key}='{value}'"))
}

fn sequence_signals(xml: &str) -> ScoreCard {
    let mut card = ScoreCard::new(DiagramType::Sequence);
    let lowered = xml.to_lowercase();

    card.add_if(
        has_attr_token(xml, "shape", "umlActor"),
        30.0,
        "Found UML actor shapes",
    );
    card.add_if(xml.contains("umlLifeline"), 35.0, "Found UML lifeline shapes");

    for term in ["message", "call", "return", "activate", "deactivate", "login", "validate"] {
        card.add_if(
            lowered.contains(term),
            8.0,
            format!("Found sequence terminology: {term}"),
        );
    }

    card.add_if(
        xml.contains("chronologicallyOrdered"),
        20.0,
        "Found chronological ordering",
    );
    card.add_if(
        xml.contains("endArrow=block") || xml.contains("endArrow=open"),
        15.0,
        "Found message arrows",
    );
    card.add_if(
        xml.contains("dashed=1") || xml.contains("dashed=\"1\""),
        10.0,
        "Found return message patterns",
    );

    card
}

fn class_signals(xml: &str) -> ScoreCard {
    let mut card = ScoreCard::new(DiagramType::Class);
    let lowered = xml.to_lowercase();

    card.add_if(
        xml.contains("shape=umlClass") || xml.contains("swimlane"),
        40.0,
        "Found UML class shapes",
    );
    // DrawIO class compartments arrive as HTML-encoded rich text
    card.add_if(
        xml.contains("&lt;hr") && xml.contains("margin:0px"),
        35.0,
        "Found HTML-formatted class content",
    );
    let has_separator = xml.contains('|') || xml.contains("&vert;") || xml.contains("&lt;hr");
    let has_visibility = xml.contains('+')
        || xml.contains('-')
        || xml.contains('#')
        || xml.contains("&plus;")
        || xml.contains("&minus;");
    card.add_if(
        has_separator && has_visibility,
        30.0,
        "Found class attribute/method notation",
    );
    let has_parens = xml.contains("()") || xml.contains("&lpar;") || xml.contains("&rpar;");
    let has_types = xml.contains(": ")
        || xml.contains("boolean")
        || xml.contains("string")
        || xml.contains("int")
        || xml.contains("void");
    card.add_if(has_parens && has_types, 25.0, "Found method notation with types");

    let type_count = ["int", "string", "boolean", "decimal", "datetime", "void"]
        .iter()
        .filter(|data_type| xml.contains(*data_type))
        .count();
    card.add_if(type_count >= 2, 20.0, format!("Found {type_count} data types"));

    card.add_if(
        xml.contains("endArrow=")
            && (xml.contains("triangle") || xml.contains("diamond") || xml.contains("block")),
        15.0,
        "Found UML association arrows",
    );
    card.add_if(
        xml.contains("1..*") || xml.contains("0..1") || xml.contains("0..*") || xml.contains('*'),
        15.0,
        "Found multiplicity notation",
    );

    for term in ["class", "interface", "abstract", "extends", "implements"] {
        card.add_if(
            lowered.contains(term),
            5.0,
            format!("Found class terminology: {term}"),
        );
    }

    card
}

fn state_signals(xml: &str) -> ScoreCard {
    let mut card = ScoreCard::new(DiagramType::State);
    let lowered = xml.to_lowercase();

    card.add_if(
        xml.contains("shape=startState") || xml.contains("shape=endState"),
        35.0,
        "Found start/end state shapes",
    );
    card.add_if(
        xml.contains("rounded=1") || xml.contains("arcSize="),
        25.0,
        "Found rounded state shapes",
    );
    card.add_if(
        xml.contains('[') && xml.contains(']') && xml.contains('/'),
        30.0,
        "Found state transition notation",
    );

    for term in ["idle", "active", "waiting", "processing", "transition"] {
        card.add_if(
            lowered.contains(term),
            5.0,
            format!("Found state terminology: {term}"),
        );
    }

    card
}

fn component_signals(xml: &str) -> ScoreCard {
    let mut card = ScoreCard::new(DiagramType::Component);

    card.add_if(
        xml.contains("shape=component") || xml.contains("shape=module"),
        40.0,
        "Found component shapes",
    );
    card.add_if(
        xml.contains("shape=ellipse") && xml.contains("interface"),
        30.0,
        "Found interface ellipses",
    );
    // Stereotype guillemets arrive entity-encoded
    card.add_if(
        xml.contains("&lt;&lt;") && xml.contains("&gt;&gt;"),
        20.0,
        "Found stereotype notation",
    );
    card.add_if(
        xml.contains("dashed=1") || xml.contains("strokeDasharray"),
        15.0,
        "Found dependency relationships",
    );

    card
}

fn entity_relationship_signals(xml: &str) -> ScoreCard {
    let mut card = ScoreCard::new(DiagramType::EntityRelationship);
    let lowered = xml.to_lowercase();

    let has_rectangles = has_attr_token(xml, "shape", "rectangle") || xml.contains("shape=table");
    let has_specialized =
        xml.contains("umlActor") || xml.contains("umlClass") || xml.contains("component");
    card.add_if(
        has_rectangles && !has_specialized,
        35.0,
        "Found entity rectangles",
    );
    card.add_if(
        has_attr_token(xml, "shape", "rhombus") || xml.contains("shape=diamond"),
        35.0,
        "Found relationship diamonds",
    );
    card.add_if(
        has_attr_token(xml, "shape", "ellipse") && !xml.contains("interface"),
        25.0,
        "Found attribute ellipses",
    );
    card.add_if(
        xml.contains("1:1") || xml.contains("1:M") || xml.contains("M:N") || xml.contains("1:N"),
        30.0,
        "Found cardinality notation",
    );

    for term in ["entity", "relationship", "attribute", "primary", "foreign", "key", "table"] {
        card.add_if(
            lowered.contains(term),
            8.0,
            format!("Found ER terminology: {term}"),
        );
    }

    // Strong sequence evidence overrules generic rectangles
    if xml.contains("umlActor") || xml.contains("umlLifeline") {
        card.penalize(30.0);
    }

    card
}

fn network_signals(xml: &str) -> ScoreCard {
    let mut card = ScoreCard::new(DiagramType::Network);
    let lowered = xml.to_lowercase();

    card.add_if(
        xml.contains("mxgraph.cisco") || xml.contains("cisco"),
        40.0,
        "Found Cisco network shapes",
    );

    for device in ["router", "switch", "firewall", "server", "hub"] {
        card.add_if(
            lowered.contains(device),
            10.0,
            format!("Found network device: {device}"),
        );
    }

    card.add_if(IP_ADDRESS.is_match(xml), 30.0, "Found IP addresses");
    card.add_if(
        lowered.contains("vlan") || lowered.contains("subnet"),
        20.0,
        "Found VLAN/subnet terminology",
    );

    card
}

fn flowchart_signals(xml: &str) -> ScoreCard {
    let mut card = ScoreCard::new(DiagramType::Flowchart);

    card.add_if(
        xml.contains("shape=diamond") || xml.contains("shape=rhombus"),
        30.0,
        "Found decision diamonds",
    );
    card.add_if(xml.contains("shape=ellipse"), 25.0, "Found start/end terminals");
    card.add_if(xml.contains("shape=rectangle"), 20.0, "Found process rectangles");
    card.add_if(
        xml.contains("endArrow=") || xml.contains("arrow"),
        15.0,
        "Found directional flow",
    );

    // Fallback rule: specialized stencils mean some other card should win
    let has_specialized = xml.contains("uml")
        || xml.contains("cisco")
        || xml.contains("actor")
        || xml.contains("lifeline");
    if has_specialized {
        card.penalize(20.0);
    }

    card
}

/// Metadata derived from XML heuristics; no shape list exists yet at
/// this stage
fn xml_metadata(xml: &str) -> DiagramMetadata {
    let cells = xml.matches("<mxCell").count();
    let edges = xml.matches("edge=\"1\"").count();
    let lowered = xml.to_lowercase();

    let mut shape_types: Vec<String> = Vec::new();
    for style in STYLE_ATTR.find_iter(xml) {
        if let Some(capture) = SHAPE_TOKEN.captures(style.as_str()) {
            let shape = capture[1].to_string();
            if !shape_types.contains(&shape) {
                shape_types.push(shape);
            }
        }
    }

    DiagramMetadata {
        total_shapes: cells.saturating_sub(edges),
        total_edges: edges,
        shape_types,
        has_specialized_shapes: xml.contains("uml") || xml.contains("cisco"),
        has_directional_flow: xml.contains("endArrow=") || xml.contains("startArrow="),
        has_hierarchy: xml.contains("parent=") && !xml.contains("parent=\"1\""),
        has_temporal: lowered.contains("sequence") || lowered.contains("time"),
        has_data_model: xml.contains("table") || xml.contains("entity"),
        has_network_elements: xml.contains("cisco") || xml.contains("network"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEQUENCE_XML: &str = r#"<mxfile><diagram><mxGraphModel><root>
        <mxCell id="0"/><mxCell id="1" parent="0"/>
        <mxCell id="2" value="User" style="shape=umlActor;html=1;" vertex="1" parent="1"/>
        <mxCell id="3" value="Web" style="shape=umlLifeline;" vertex="1" parent="1"/>
        <mxCell id="4" value="1: login()" style="endArrow=block;dashed=1;" edge="1" parent="1"/>
    </root></mxGraphModel></diagram></mxfile>"#;

    const NETWORK_XML: &str = r#"<mxfile><diagram><mxGraphModel><root>
        <mxCell id="0"/><mxCell id="1" parent="0"/>
        <mxCell id="2" value="core 192.168.1.1" style="shape=mxgraph.cisco.routers.router;" vertex="1" parent="1"/>
        <mxCell id="3" value="vlan 10 switch" style="shape=mxgraph.cisco.switches.workgroup_switch;" vertex="1" parent="1"/>
        <mxCell id="4" style="endArrow=none;" edge="1" parent="1"/>
    </root></mxGraphModel></diagram></mxfile>"#;

    #[test]
    fn test_detects_sequence_from_xml() {
        let detector = DrawioDetector::new();
        let analysis = detector.analyze_bytes(SEQUENCE_XML.as_bytes());
        assert_eq!(analysis.detected_type, DiagramType::Sequence);
        assert!(analysis.confidence > 60.0);
        assert!(!analysis.patterns.is_empty());
        assert!(!analysis.patterns[0].evidence.is_empty());
    }

    #[test]
    fn test_detects_network_from_xml() {
        let detector = DrawioDetector::new();
        let analysis = detector.analyze_bytes(NETWORK_XML.as_bytes());
        assert_eq!(analysis.detected_type, DiagramType::Network);
        assert!(analysis.confidence > 70.0);
        assert!(analysis.metadata.has_network_elements);
    }

    #[test]
    fn test_malformed_bytes_return_unknown() {
        let detector = DrawioDetector::new();
        let analysis = detector.analyze_bytes(b"not a real diagram");
        assert_eq!(analysis.detected_type, DiagramType::Unknown);
        assert_eq!(analysis.confidence, 0.0);
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let detector = DrawioDetector::new();
        let analysis = detector.analyze_bytes(&[0xff, 0xfe, 0x00, 0x80]);
        assert_eq!(analysis.detected_type, DiagramType::Unknown);
        assert_eq!(analysis.confidence, 0.0);
    }

    #[test]
    fn test_xml_metadata_counts() {
        let metadata = xml_metadata(SEQUENCE_XML);
        assert_eq!(metadata.total_edges, 1);
        assert_eq!(metadata.total_shapes, 4);
        assert!(metadata.shape_types.contains(&"umlActor".to_string()));
        assert!(metadata.shape_types.contains(&"umlLifeline".to_string()));
        assert!(metadata.has_specialized_shapes);
        assert!(metadata.has_directional_flow);
    }

    #[test]
    fn test_flowchart_penalized_by_specialized_content() {
        // Arrows alone would score 15, but UML content zeroes it out
        let card = flowchart_signals(SEQUENCE_XML);
        assert_eq!(card.confidence(), 0.0);
    }

    #[test]
    fn test_er_penalized_by_sequence_evidence() {
        let card = entity_relationship_signals(SEQUENCE_XML);
        assert!(card.confidence() < 35.0);
    }

    #[test]
    fn test_determinism() {
        let detector = DrawioDetector::new();
        let first = detector.analyze_bytes(NETWORK_XML.as_bytes());
        let second = detector.analyze_bytes(NETWORK_XML.as_bytes());
        assert_eq!(first, second);
    }
}
