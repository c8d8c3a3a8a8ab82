//! Source-aware detection for PlantUML text
//!
//! PlantUML sources frequently declare their diagram type outright
//! (`@startgantt`, `state Idle`, `class Account`). When such a
//! directive is present the detector believes it and short-circuits at
//! confidence 95; otherwise it falls back to additive scoring over the
//! notation fragments each diagram family uses.

use tracing::{debug, info, span, Level};

use crate::core::{DetectionPattern, DiagramAnalysis, DiagramMetadata, DiagramType};
use crate::detect::score::{summarize, ScoreCard};
use crate::detect::IP_ADDRESS;

/// Confidence assigned to an explicit type directive
const DIRECTIVE_CONFIDENCE: f64 = 95.0;

/// Arrow fragments counted as edges in the text metadata
const ARROWS: [&str; 8] = ["->", "<-", "-->", "<--", "..>", "<..", "||--||", "}|--||"];

/// Detector for raw PlantUML text content
///
/// Stateless; reusable across calls. Never fails: malformed or
/// non-UTF-8 input simply produces little or no evidence.
pub struct PlantUmlDetector;

impl PlantUmlDetector {
    pub fn new() -> Self {
        Self
    }

    /// Analyze raw PlantUML file bytes
    pub fn analyze_bytes(&self, bytes: &[u8]) -> DiagramAnalysis {
        let content = String::from_utf8_lossy(bytes);
        self.analyze_text(&content)
    }

    /// Analyze PlantUML text for diagram type patterns
    pub fn analyze_text(&self, content: &str) -> DiagramAnalysis {
        let analyze_span = span!(Level::INFO, "analyze_plantuml", input_len = content.len());
        let _enter = analyze_span.enter();

        // The source said what it is; believe it
        if let Some((directive_type, evidence)) = detect_explicit_type(content) {
            info!(detected_type = %directive_type, "Found explicit type directive");
            return DiagramAnalysis {
                detected_type: directive_type,
                confidence: DIRECTIVE_CONFIDENCE,
                patterns: vec![DetectionPattern {
                    diagram_type: directive_type,
                    evidence: vec![evidence.to_string()],
                    weight: DIRECTIVE_CONFIDENCE,
                    confidence: DIRECTIVE_CONFIDENCE,
                }],
                metadata: text_metadata(content),
            };
        }

        let cards = vec![
            sequence_signals(content),
            class_signals(content),
            state_signals(content),
            component_signals(content),
            entity_relationship_signals(content),
            network_signals(content),
            flowchart_signals(content),
        ];

        let (detected_type, confidence, patterns) = summarize(cards);

        debug!(
            detected_type = %detected_type,
            confidence,
            pattern_count = patterns.len(),
            "PlantUML analysis completed"
        );

        DiagramAnalysis {
            detected_type,
            confidence,
            patterns,
            metadata: text_metadata(content),
        }
    }
}

impl Default for PlantUmlDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan for an explicit diagram type declaration, line by line
fn detect_explicit_type(content: &str) -> Option<(DiagramType, &'static str)> {
    for line in content.lines() {
        let lowered = line.trim().to_lowercase();

        if lowered.contains("@startsequence") || lowered.contains("!define sequence") {
            return Some((
                DiagramType::Sequence,
                "Found explicit sequence diagram directive",
            ));
        }
        if lowered.contains("@startclass") || lowered.contains("class ") {
            return Some((DiagramType::Class, "Found explicit class diagram directive"));
        }
        if lowered.contains("@startstate") || lowered.contains("state ") {
            return Some((DiagramType::State, "Found explicit state diagram directive"));
        }
        if lowered.contains("@startcomponent") || lowered.contains("component ") {
            return Some((
                DiagramType::Component,
                "Found explicit component diagram directive",
            ));
        }
        if lowered.contains("@startgantt") {
            return Some((DiagramType::Gantt, "Found explicit Gantt diagram directive"));
        }
        if lowered.contains("@startmindmap") {
            return Some((DiagramType::Mindmap, "Found explicit mindmap directive"));
        }
    }
    None
}

fn sequence_signals(content: &str) -> ScoreCard {
    let mut card = ScoreCard::new(DiagramType::Sequence);

    card.add_if(
        content.contains("participant ") || content.contains("actor "),
        35.0,
        "Found participant/actor declarations",
    );
    card.add_if(
        content.contains("->") || content.contains("<-") || content.contains("-->"),
        30.0,
        "Found message arrows",
    );
    card.add_if(
        content.contains("activate ") || content.contains("deactivate "),
        25.0,
        "Found activation/deactivation",
    );

    for keyword in ["note over", "note left", "note right", "alt", "else", "opt", "loop"] {
        card.add_if(
            content.contains(keyword),
            5.0,
            format!("Found sequence keyword: {keyword}"),
        );
    }

    card
}

fn class_signals(content: &str) -> ScoreCard {
    let mut card = ScoreCard::new(DiagramType::Class);

    card.add_if(
        content.contains("class ") || content.contains("interface ") || content.contains("abstract "),
        40.0,
        "Found class/interface declarations",
    );
    card.add_if(
        content.contains(" extends ") || content.contains(" implements ") || content.contains(" <|-- "),
        30.0,
        "Found inheritance/implementation relationships",
    );
    card.add_if(
        content.contains(" -- ") || content.contains(" o-- ") || content.contains(" *-- "),
        25.0,
        "Found association relationships",
    );
    card.add_if(
        content.contains('+') || content.contains('-') || content.contains('#') || content.contains("()"),
        20.0,
        "Found method/attribute visibility notation",
    );

    card
}

fn state_signals(content: &str) -> ScoreCard {
    let mut card = ScoreCard::new(DiagramType::State);

    card.add_if(
        content.contains("state ") || content.contains("[*]"),
        35.0,
        "Found state declarations",
    );
    card.add_if(
        content.contains(" --> ") || content.contains(" : "),
        30.0,
        "Found state transitions",
    );
    card.add_if(
        content.contains("state ") && content.contains(" {"),
        25.0,
        "Found composite states",
    );

    for keyword in ["entry", "exit", "do"] {
        card.add_if(
            content.contains(&format!("{keyword} /")),
            10.0,
            format!("Found state keyword: {keyword}"),
        );
    }

    card
}

fn component_signals(content: &str) -> ScoreCard {
    let mut card = ScoreCard::new(DiagramType::Component);

    card.add_if(
        content.contains("component ") || content.contains("package "),
        40.0,
        "Found component/package declarations",
    );
    card.add_if(
        content.contains("interface ") || content.contains("() "),
        30.0,
        "Found interface declarations",
    );
    card.add_if(
        content.contains("..>") || content.contains("-->"),
        25.0,
        "Found dependency relationships",
    );
    card.add_if(
        content.contains("<<") && content.contains(">>"),
        15.0,
        "Found stereotype notation",
    );

    card
}

fn entity_relationship_signals(content: &str) -> ScoreCard {
    let mut card = ScoreCard::new(DiagramType::EntityRelationship);

    card.add_if(
        content.contains("entity ") || content.contains("table "),
        40.0,
        "Found entity/table declarations",
    );
    card.add_if(
        content.contains("||--||") || content.contains("}|--||") || content.contains("||--o{"),
        35.0,
        "Found ER relationship notation",
    );
    card.add_if(
        content.contains("one to one")
            || content.contains("one to many")
            || content.contains("many to many"),
        25.0,
        "Found cardinality notation",
    );

    card
}

fn network_signals(content: &str) -> ScoreCard {
    let mut card = ScoreCard::new(DiagramType::Network);
    let lowered = content.to_lowercase();

    for keyword in ["router", "switch", "server", "firewall", "hub", "gateway"] {
        card.add_if(
            lowered.contains(keyword),
            15.0,
            format!("Found network element: {keyword}"),
        );
    }

    card.add_if(IP_ADDRESS.is_match(content), 25.0, "Found IP addresses");

    for protocol in ["tcp", "udp", "http", "https", "ftp", "ssh"] {
        card.add_if(
            lowered.contains(protocol),
            10.0,
            format!("Found network protocol: {protocol}"),
        );
    }

    card
}

fn flowchart_signals(content: &str) -> ScoreCard {
    let mut card = ScoreCard::new(DiagramType::Flowchart);

    card.add_if(
        content.contains(':') && content.contains(';'),
        30.0,
        "Found activity notation",
    );
    card.add_if(
        content.contains("if (") || content.contains("while ("),
        25.0,
        "Found decision points",
    );
    card.add_if(
        content.contains("start") || content.contains("stop") || content.contains("end"),
        20.0,
        "Found start/end points",
    );

    // Fallback rule: specialized declarations mean another card should win
    let has_specialized = content.contains("class ")
        || content.contains("participant ")
        || content.contains("state ")
        || content.contains("component ");
    if has_specialized {
        card.penalize(20.0);
    }

    card
}

/// Metadata derived from text heuristics; no shape list exists yet at
/// this stage
fn text_metadata(content: &str) -> DiagramMetadata {
    let mut edge_count = 0;
    for arrow in ARROWS {
        edge_count += content.matches(arrow).count();
    }

    // Lines that are neither directives, comments, nor edges stand in
    // for shapes
    let shape_lines = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with('@') && !line.starts_with('!') && !line.starts_with('\''))
        .filter(|line| !ARROWS.iter().any(|arrow| line.contains(arrow)))
        .count();

    DiagramMetadata {
        total_shapes: shape_lines,
        total_edges: edge_count,
        shape_types: vec!["plantuml".to_string()],
        has_specialized_shapes: content.contains("class ") || content.contains("participant "),
        has_directional_flow: content.contains("->") || content.contains("-->"),
        has_hierarchy: content.contains("extends ") || content.contains("implements "),
        has_temporal: content.contains("activate ") || content.contains("deactivate "),
        has_data_model: content.contains("entity ") || content.contains("table "),
        has_network_elements: ["router", "switch", "server", "firewall"]
            .iter()
            .any(|keyword| content.to_lowercase().contains(keyword)),
    }
}
