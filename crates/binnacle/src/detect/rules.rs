//! Declarative detection rule catalogue
//!
//! One rule per detectable diagram type, each composed of weighted
//! pattern matchers over the normalized shape list. The catalogue is a
//! module-level constant: adding a diagram type is a data-only change,
//! and the scoring algorithm in [`shape`](crate::detect::shape) stays
//! uniform across all rules.
//!
//! Rule order doubles as tie-break priority; the flowchart rule is the
//! generic fallback and must stay last.

use crate::core::{DiagramMetadata, DiagramType, PatternMatch, Shape};
use crate::detect::IP_ADDRESS;

/// A named, weighted heuristic test contributing to a rule's score
pub struct PatternMatcher {
    /// Identifier for diagnostics
    pub name: &'static str,
    /// Relative importance within the owning rule, not globally normalized
    pub weight: u32,
    /// Pure matcher over the shape list and its metadata
    pub matcher: fn(&[Shape], &DiagramMetadata) -> PatternMatch,
}

/// The complete weighted-pattern scoring definition for one diagram type
pub struct DetectionRule {
    pub diagram_type: DiagramType,
    /// Rules scoring below this floor are treated as non-firing
    pub minimum_confidence: f64,
    pub patterns: &'static [PatternMatcher],
}

/// The full rule catalogue, in tie-break priority order
pub static CATALOGUE: &[DetectionRule] = &[
    DetectionRule {
        diagram_type: DiagramType::Sequence,
        minimum_confidence: 60.0,
        patterns: &[
            PatternMatcher {
                name: "uml-actors",
                weight: 30,
                matcher: sequence_actors,
            },
            PatternMatcher {
                name: "lifelines",
                weight: 35,
                matcher: sequence_lifelines,
            },
            PatternMatcher {
                name: "message-flows",
                weight: 25,
                matcher: sequence_messages,
            },
            PatternMatcher {
                name: "temporal-keywords",
                weight: 10,
                matcher: sequence_temporal,
            },
        ],
    },
    DetectionRule {
        diagram_type: DiagramType::Class,
        minimum_confidence: 65.0,
        patterns: &[
            PatternMatcher {
                name: "class-shapes",
                weight: 40,
                matcher: class_shapes,
            },
            PatternMatcher {
                name: "attributes-methods",
                weight: 30,
                matcher: class_members,
            },
            PatternMatcher {
                name: "associations",
                weight: 20,
                matcher: class_associations,
            },
            PatternMatcher {
                name: "inheritance",
                weight: 10,
                matcher: class_inheritance,
            },
        ],
    },
    DetectionRule {
        diagram_type: DiagramType::State,
        minimum_confidence: 70.0,
        patterns: &[
            PatternMatcher {
                name: "start-end-states",
                weight: 35,
                matcher: state_terminals,
            },
            PatternMatcher {
                name: "rounded-rectangles",
                weight: 25,
                matcher: state_rounded,
            },
            PatternMatcher {
                name: "transitions",
                weight: 30,
                matcher: state_transitions,
            },
            PatternMatcher {
                name: "state-keywords",
                weight: 10,
                matcher: state_keywords,
            },
        ],
    },
    DetectionRule {
        diagram_type: DiagramType::Component,
        minimum_confidence: 60.0,
        patterns: &[
            PatternMatcher {
                name: "component-shapes",
                weight: 40,
                matcher: component_shapes,
            },
            PatternMatcher {
                name: "interfaces",
                weight: 30,
                matcher: component_interfaces,
            },
            PatternMatcher {
                name: "dependencies",
                weight: 20,
                matcher: component_dependencies,
            },
            PatternMatcher {
                name: "stereotypes",
                weight: 10,
                matcher: component_stereotypes,
            },
        ],
    },
    DetectionRule {
        diagram_type: DiagramType::EntityRelationship,
        minimum_confidence: 65.0,
        patterns: &[
            PatternMatcher {
                name: "entities",
                weight: 35,
                matcher: er_entities,
            },
            PatternMatcher {
                name: "relationships",
                weight: 30,
                matcher: er_relationships,
            },
            PatternMatcher {
                name: "attributes",
                weight: 25,
                matcher: er_attributes,
            },
            PatternMatcher {
                name: "cardinality",
                weight: 10,
                matcher: er_cardinality,
            },
        ],
    },
    DetectionRule {
        diagram_type: DiagramType::Network,
        minimum_confidence: 70.0,
        patterns: &[
            PatternMatcher {
                name: "network-shapes",
                weight: 40,
                matcher: network_devices,
            },
            PatternMatcher {
                name: "ip-addresses",
                weight: 30,
                matcher: network_ips,
            },
            PatternMatcher {
                name: "vlans",
                weight: 20,
                matcher: network_vlans,
            },
            PatternMatcher {
                name: "network-terms",
                weight: 10,
                matcher: network_terms,
            },
        ],
    },
    // Most generic rule, declared last so every specialized type wins ties
    DetectionRule {
        diagram_type: DiagramType::Flowchart,
        minimum_confidence: 40.0,
        patterns: &[
            PatternMatcher {
                name: "decision-shapes",
                weight: 30,
                matcher: flowchart_decisions,
            },
            PatternMatcher {
                name: "process-shapes",
                weight: 25,
                matcher: flowchart_processes,
            },
            PatternMatcher {
                name: "start-end-terminals",
                weight: 25,
                matcher: flowchart_terminals,
            },
            PatternMatcher {
                name: "directional-flow",
                weight: 20,
                matcher: flowchart_directional,
            },
        ],
    },
];

fn counted(count: usize, per_item: f64) -> f64 {
    (count as f64 * per_item).min(100.0)
}

fn type_contains(shape: &Shape, keyword: &str) -> bool {
    shape.shape_type.to_lowercase().contains(keyword)
}

fn label_contains(shape: &Shape, keyword: &str) -> bool {
    shape.label.to_lowercase().contains(keyword)
}

// --- Sequence matchers ---

fn sequence_actors(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let count = shapes
        .iter()
        .filter(|s| type_contains(s, "actor") || label_contains(s, "actor"))
        .count();
    PatternMatch {
        matches: count > 0,
        confidence: counted(count, 50.0),
        evidence: vec![format!("Found {} actor shapes", count)],
    }
}

fn sequence_lifelines(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let typed = shapes
        .iter()
        .filter(|s| type_contains(s, "lifeline"))
        .count();
    let count = shapes
        .iter()
        .filter(|s| {
            type_contains(s, "lifeline")
                || shapes.iter().any(|edge| {
                    edge.is_edge
                        && !edge.from_node.is_empty()
                        && edge.from_node == s.id
                        && edge.to_node != s.id
                })
        })
        .count();
    // Topology alone is weak evidence: every connected diagram has
    // nodes with outgoing edges. Only typed lifelines score strongly.
    let confidence = if typed > 0 {
        counted(count, 40.0)
    } else {
        (count as f64 * 15.0).min(55.0)
    };
    PatternMatch {
        matches: count > 1,
        confidence,
        evidence: vec![format!("Found {} potential lifelines", count)],
    }
}

fn sequence_messages(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let count = shapes
        .iter()
        .filter(|s| {
            s.is_edge
                && (s.label.contains("call") || s.label.contains("message") || s.label.contains(':'))
        })
        .count();
    PatternMatch {
        matches: count > 0,
        confidence: counted(count, 30.0),
        evidence: vec![format!("Found {} message flows", count)],
    }
}

fn sequence_temporal(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    const TERMS: [&str; 7] = [
        "activate",
        "deactivate",
        "create",
        "destroy",
        "call",
        "return",
        "response",
    ];
    let matched = shapes
        .iter()
        .any(|s| TERMS.iter().any(|term| label_contains(s, term)));
    if matched {
        PatternMatch::hit(80.0, "Found temporal keywords in labels")
    } else {
        PatternMatch::miss()
    }
}

// --- Class matchers ---

fn class_shapes(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let count = shapes
        .iter()
        .filter(|s| {
            type_contains(s, "class")
                || type_contains(s, "swimlane")
                || (s.label.contains('|') && s.label.contains('-'))
        })
        .count();
    PatternMatch {
        matches: count > 0,
        confidence: counted(count, 50.0),
        evidence: vec![format!("Found {} class-like shapes", count)],
    }
}

/// Member-row punctuation: compartment separators, call parentheses, or
/// lines starting with a UML visibility marker. Requiring the marker at
/// line start keeps ordinary hyphenated labels from matching.
fn class_members(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let matched = shapes.iter().any(|s| {
        s.label.contains('|')
            || s.label.contains("()")
            || s.label.lines().any(|line| {
                let trimmed = line.trim_start();
                trimmed.starts_with('+') || trimmed.starts_with('-') || trimmed.starts_with('#')
            })
    });
    if matched {
        PatternMatch::hit(90.0, "Found class attributes/methods notation")
    } else {
        PatternMatch::miss()
    }
}

fn class_associations(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let count = shapes
        .iter()
        .filter(|s| {
            s.is_edge
                && (s.label.contains('*') || s.label.contains('1') || s.label.contains("0.."))
        })
        .count();
    PatternMatch {
        matches: count > 0,
        confidence: counted(count, 25.0),
        evidence: vec![format!("Found {} associations with multiplicity", count)],
    }
}

fn class_inheritance(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let count = shapes
        .iter()
        .filter(|s| s.is_edge && type_contains(s, "inheritance"))
        .count();
    PatternMatch {
        matches: count > 0,
        confidence: 95.0,
        evidence: vec![format!("Found {} inheritance relationships", count)],
    }
}

// --- State matchers ---

fn state_terminals(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let typed = shapes.iter().any(|s| {
        type_contains(s, "startstate")
            || type_contains(s, "initialstate")
            || type_contains(s, "endstate")
            || type_contains(s, "finalstate")
    });
    let starts = shapes
        .iter()
        .filter(|s| {
            type_contains(s, "startstate")
                || type_contains(s, "initialstate")
                || label_contains(s, "start")
        })
        .count();
    let ends = shapes
        .iter()
        .filter(|s| {
            type_contains(s, "endstate")
                || type_contains(s, "finalstate")
                || label_contains(s, "end")
        })
        .count();
    // Start/end labels also occur on flowchart terminals; only the
    // state-specific shape types count as strong evidence.
    PatternMatch {
        matches: starts > 0 || ends > 0,
        confidence: if typed { 90.0 } else { 45.0 },
        evidence: vec![format!("Found {} start and {} end states", starts, ends)],
    }
}

fn state_rounded(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let count = shapes
        .iter()
        .filter(|s| !s.is_edge && s.style.is_rounded())
        .count();
    PatternMatch {
        matches: count > 2,
        confidence: counted(count, 20.0),
        evidence: vec![format!("Found {} rounded state shapes", count)],
    }
}

fn state_transitions(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let count = shapes
        .iter()
        .filter(|s| {
            s.is_edge
                && (s.label.contains('/') || s.label.contains('[') || s.label.contains("when"))
        })
        .count();
    PatternMatch {
        matches: count > 0,
        confidence: counted(count, 30.0),
        evidence: vec![format!("Found {} state transitions with triggers", count)],
    }
}

fn state_keywords(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    const TERMS: [&str; 6] = ["idle", "active", "waiting", "processing", "complete", "error"];
    let matched = shapes
        .iter()
        .any(|s| TERMS.iter().any(|term| label_contains(s, term)));
    if matched {
        PatternMatch::hit(75.0, "Found state-related keywords")
    } else {
        PatternMatch::miss()
    }
}

// --- Component matchers ---

fn component_shapes(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let count = shapes
        .iter()
        .filter(|s| {
            type_contains(s, "component")
                || type_contains(s, "module")
                || s.label.contains("<<component>>")
                || s.label.contains("<<module>>")
        })
        .count();
    PatternMatch {
        matches: count > 0,
        confidence: counted(count, 40.0),
        evidence: vec![format!("Found {} component shapes", count)],
    }
}

fn component_interfaces(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let named = shapes
        .iter()
        .any(|s| type_contains(s, "interface") || s.label.contains("<<interface>>"));
    let count = shapes
        .iter()
        .filter(|s| {
            type_contains(s, "interface")
                || type_contains(s, "ellipse")
                || s.label.contains("<<interface>>")
        })
        .count();
    // Bare ellipses also appear as flowchart terminals and ER attributes
    let confidence = if named {
        counted(count, 35.0)
    } else {
        (count as f64 * 20.0).min(40.0)
    };
    PatternMatch {
        matches: count > 0,
        confidence,
        evidence: vec![format!("Found {} interface elements", count)],
    }
}

fn component_dependencies(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let count = shapes
        .iter()
        .filter(|s| {
            s.is_edge
                && (s.style.is_dashed() || s.label.contains("depends") || s.label.contains("uses"))
        })
        .count();
    PatternMatch {
        matches: count > 0,
        confidence: counted(count, 25.0),
        evidence: vec![format!("Found {} dependency relationships", count)],
    }
}

fn component_stereotypes(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let matched = shapes
        .iter()
        .any(|s| s.label.contains("<<") && s.label.contains(">>"));
    if matched {
        PatternMatch::hit(85.0, "Found stereotype notation")
    } else {
        PatternMatch::miss()
    }
}

// --- Entity-relationship matchers ---

fn er_entities(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let count = shapes
        .iter()
        .filter(|s| {
            !s.is_edge
                && (type_contains(s, "rectangle") || type_contains(s, "table"))
                && !type_contains(s, "rhombus")
        })
        .count();
    // Capped below the rule floor: plain rectangles are everywhere, so
    // entities alone never make an ER diagram.
    PatternMatch {
        matches: count > 1,
        confidence: (count as f64 * 20.0).min(60.0),
        evidence: vec![format!("Found {} potential entities", count)],
    }
}

fn er_relationships(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let count = shapes
        .iter()
        .filter(|s| !s.is_edge && type_contains(s, "rhombus"))
        .count();
    PatternMatch {
        matches: count > 0,
        confidence: counted(count, 35.0),
        evidence: vec![format!("Found {} relationship diamonds", count)],
    }
}

fn er_attributes(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let count = shapes
        .iter()
        .filter(|s| !s.is_edge && type_contains(s, "ellipse"))
        .count();
    PatternMatch {
        matches: count > 0,
        confidence: counted(count, 20.0),
        evidence: vec![format!("Found {} attribute ellipses", count)],
    }
}

fn er_cardinality(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let matched = shapes.iter().any(|s| {
        s.is_edge
            && (s.label.contains("1:1") || s.label.contains("1:M") || s.label.contains("M:N"))
    });
    if matched {
        PatternMatch::hit(90.0, "Found cardinality notation")
    } else {
        PatternMatch::miss()
    }
}

// --- Network matchers ---

fn network_devices(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    const DEVICES: [&str; 6] = ["cisco", "network", "router", "switch", "server", "firewall"];
    let count = shapes
        .iter()
        .filter(|s| DEVICES.iter().any(|device| type_contains(s, device)))
        .count();
    PatternMatch {
        matches: count > 0,
        confidence: counted(count, 40.0),
        evidence: vec![format!("Found {} network device shapes", count)],
    }
}

fn network_ips(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let matched = shapes.iter().any(|s| IP_ADDRESS.is_match(&s.label));
    if matched {
        PatternMatch::hit(95.0, "Found IP addresses in labels")
    } else {
        PatternMatch::miss()
    }
}

fn network_vlans(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let matched = shapes
        .iter()
        .any(|s| label_contains(s, "vlan") || label_contains(s, "subnet"));
    if matched {
        PatternMatch::hit(85.0, "Found VLAN/subnet terminology")
    } else {
        PatternMatch::miss()
    }
}

fn network_terms(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    const TERMS: [&str; 7] = ["gateway", "dns", "dhcp", "nat", "vpn", "wan", "lan"];
    let matched = shapes
        .iter()
        .any(|s| TERMS.iter().any(|term| label_contains(s, term)));
    if matched {
        PatternMatch::hit(80.0, "Found network-specific terminology")
    } else {
        PatternMatch::miss()
    }
}

// --- Flowchart matchers (generic fallback) ---

fn flowchart_decisions(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let count = shapes
        .iter()
        .filter(|s| {
            !s.is_edge
                && (type_contains(s, "diamond")
                    || type_contains(s, "rhombus")
                    || s.label.contains('?')
                    || label_contains(s, "if")
                    || label_contains(s, "decision"))
        })
        .count();
    PatternMatch {
        matches: count > 0,
        confidence: counted(count, 35.0),
        evidence: vec![format!("Found {} decision points", count)],
    }
}

fn flowchart_processes(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let count = shapes
        .iter()
        .filter(|s| !s.is_edge && (type_contains(s, "rectangle") || type_contains(s, "process")))
        .count();
    PatternMatch {
        matches: count > 2,
        confidence: counted(count, 15.0),
        evidence: vec![format!("Found {} process steps", count)],
    }
}

fn flowchart_terminals(shapes: &[Shape], _metadata: &DiagramMetadata) -> PatternMatch {
    let count = shapes
        .iter()
        .filter(|s| {
            !s.is_edge
                && (type_contains(s, "ellipse")
                    || type_contains(s, "terminator")
                    || label_contains(s, "start")
                    || label_contains(s, "end")
                    || label_contains(s, "begin"))
        })
        .count();
    PatternMatch {
        matches: count > 0,
        confidence: counted(count, 30.0),
        evidence: vec![format!("Found {} start/end terminals", count)],
    }
}

fn flowchart_directional(_shapes: &[Shape], metadata: &DiagramMetadata) -> PatternMatch {
    PatternMatch {
        matches: metadata.has_directional_flow,
        confidence: 70.0,
        evidence: vec!["Found directional flow between elements".to_string()],
    }
}
