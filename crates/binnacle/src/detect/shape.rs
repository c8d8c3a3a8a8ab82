//! Generic shape-based diagram type detection
//!
//! Evaluates the declarative rule catalogue against a normalized shape
//! list. Format-independent: this is the fallback classifier for every
//! ingestion path that has already produced shapes.

use tracing::{debug, span, trace, Level};

use crate::core::{DetectionPattern, DiagramAnalysis, DiagramType, Shape};
use crate::detect::metadata::extract_metadata;
use crate::detect::rules::{DetectionRule, CATALOGUE};

/// Shape-based detector backed by the static rule catalogue
///
/// Holds no per-call state; one instance can serve any number of
/// sequential or concurrent `analyze` calls.
pub struct ShapeDetector {
    rules: &'static [DetectionRule],
}

struct RuleOutcome {
    confidence: f64,
    evidence: Vec<String>,
    weight: f64,
    any_matched: bool,
}

impl ShapeDetector {
    pub fn new() -> Self {
        Self { rules: CATALOGUE }
    }

    /// Analyze a normalized shape list and classify the diagram type
    ///
    /// Deterministic and side-effect-free; empty or degenerate input
    /// yields the canonical `Unknown` analysis.
    pub fn analyze(&self, shapes: &[Shape]) -> DiagramAnalysis {
        let analyze_span = span!(Level::INFO, "analyze_shapes", shape_count = shapes.len());
        let _enter = analyze_span.enter();

        let metadata = extract_metadata(shapes);
        let mut patterns: Vec<DetectionPattern> = Vec::new();
        let mut best_type = DiagramType::Unknown;
        let mut best_confidence = 0.0_f64;

        for rule in self.rules {
            let outcome = self.evaluate_rule(rule, shapes, &metadata);
            trace!(
                rule = %rule.diagram_type,
                confidence = outcome.confidence,
                matched = outcome.any_matched,
                "Evaluated rule"
            );

            // Rules in which nothing matched leave no trace; rules gated
            // by their floor are still recorded with confidence 0.
            if outcome.any_matched {
                patterns.push(DetectionPattern {
                    diagram_type: rule.diagram_type,
                    evidence: outcome.evidence,
                    weight: outcome.weight,
                    confidence: outcome.confidence,
                });
            }

            if outcome.confidence > best_confidence {
                best_type = rule.diagram_type;
                best_confidence = outcome.confidence;
            }
        }

        debug!(
            detected_type = %best_type,
            confidence = best_confidence,
            pattern_count = patterns.len(),
            "Shape analysis completed"
        );

        DiagramAnalysis {
            detected_type: best_type,
            confidence: best_confidence,
            patterns,
            metadata,
        }
    }

    /// Weighted-average scoring over the rule's matched patterns, gated
    /// by the rule's own confidence floor
    fn evaluate_rule(
        &self,
        rule: &DetectionRule,
        shapes: &[Shape],
        metadata: &crate::core::DiagramMetadata,
    ) -> RuleOutcome {
        let mut total_score = 0.0_f64;
        let mut total_weight = 0.0_f64;
        let mut evidence: Vec<String> = Vec::new();

        for pattern in rule.patterns {
            let result = (pattern.matcher)(shapes, metadata);
            if result.matches {
                total_score += result.confidence * pattern.weight as f64;
                total_weight += pattern.weight as f64;
                evidence.extend(result.evidence);
            }
        }

        let raw_confidence = if total_weight > 0.0 {
            total_score / total_weight
        } else {
            0.0
        };

        RuleOutcome {
            confidence: if raw_confidence >= rule.minimum_confidence {
                raw_confidence
            } else {
                0.0
            },
            evidence,
            weight: total_weight,
            any_matched: total_weight > 0.0,
        }
    }
}

impl Default for ShapeDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ShapeStyle;

    fn arrow_style() -> ShapeStyle {
        ShapeStyle {
            end_arrow: 1,
            ..ShapeStyle::default()
        }
    }

    #[test]
    fn test_empty_input_returns_unknown() {
        let detector = ShapeDetector::new();
        let analysis = detector.analyze(&[]);
        assert_eq!(analysis.detected_type, DiagramType::Unknown);
        assert_eq!(analysis.confidence, 0.0);
        assert!(analysis.patterns.is_empty());
        assert_eq!(analysis.metadata.total_shapes, 0);
    }

    #[test]
    fn test_sequence_diagram_classification() {
        let detector = ShapeDetector::new();
        let shapes = vec![
            Shape::node("a", "umlActor", "User"),
            Shape::node("b", "umlLifeline", "Web"),
            Shape::node("c", "umlLifeline", "Api"),
            Shape::edge("e1", "b", "c", ""),
        ];
        let analysis = detector.analyze(&shapes);
        assert_eq!(analysis.detected_type, DiagramType::Sequence);
        assert!(analysis.confidence > 60.0);
        let sequence_pattern = analysis
            .patterns
            .iter()
            .find(|p| p.diagram_type == DiagramType::Sequence)
            .expect("sequence rule should have fired");
        assert!(!sequence_pattern.evidence.is_empty());
    }

    #[test]
    fn test_network_diagram_classification() {
        let detector = ShapeDetector::new();
        let shapes = vec![
            Shape::node("r1", "cisco.router", "core 10.0.0.1"),
            Shape::node("s1", "switch", "access"),
            Shape::edge("e1", "r1", "s1", ""),
        ];
        let analysis = detector.analyze(&shapes);
        assert_eq!(analysis.detected_type, DiagramType::Network);
        assert!(analysis.confidence > 70.0);
    }

    #[test]
    fn test_flowchart_fallback_classification() {
        let detector = ShapeDetector::new();
        let shapes = vec![
            Shape::node("a", "ellipse", "Start"),
            Shape::node("b", "rectangle", "Read record"),
            Shape::node("c", "rectangle", "Transform record"),
            Shape::node("d", "rhombus", "Valid?"),
            Shape::node("f", "rectangle", "Write record"),
            Shape::node("g", "ellipse", "Done"),
            Shape::edge("e1", "a", "b", "").with_style(arrow_style()),
            Shape::edge("e2", "b", "c", "").with_style(arrow_style()),
            Shape::edge("e3", "c", "d", "").with_style(arrow_style()),
            Shape::edge("e4", "d", "f", "Yes").with_style(arrow_style()),
            Shape::edge("e5", "f", "g", "").with_style(arrow_style()),
        ];
        let analysis = detector.analyze(&shapes);
        assert_eq!(analysis.detected_type, DiagramType::Flowchart);
        assert!(analysis.confidence >= 40.0);
    }

    #[test]
    fn test_below_floor_rule_recorded_with_zero_confidence() {
        let detector = ShapeDetector::new();
        // One lonely decision point: flowchart matchers fire but the
        // weighted average (35) stays below the 40 floor.
        let shapes = vec![Shape::node("a", "diamond", "ok?")];
        let analysis = detector.analyze(&shapes);
        assert_eq!(analysis.detected_type, DiagramType::Unknown);
        assert_eq!(analysis.confidence, 0.0);
        let flowchart_pattern = analysis
            .patterns
            .iter()
            .find(|p| p.diagram_type == DiagramType::Flowchart)
            .expect("gated rule should still be recorded");
        assert_eq!(flowchart_pattern.confidence, 0.0);
        assert!(flowchart_pattern.weight > 0.0);
    }

    #[test]
    fn test_determinism() {
        let detector = ShapeDetector::new();
        let shapes = vec![
            Shape::node("a", "umlActor", "User"),
            Shape::node("b", "umlLifeline", "Web"),
            Shape::node("c", "umlLifeline", "Api"),
            Shape::edge("e1", "b", "c", "1: login()"),
        ];
        let first = detector.analyze(&shapes);
        let second = detector.analyze(&shapes);
        assert_eq!(first, second);
    }

    #[test]
    fn test_pattern_weight_is_sum_of_matched_weights() {
        let detector = ShapeDetector::new();
        let shapes = vec![
            Shape::node("r1", "router", "edge 10.0.0.1"),
            Shape::node("r2", "switch", "subnet 20 access"),
        ];
        let analysis = detector.analyze(&shapes);
        let network_pattern = analysis
            .patterns
            .iter()
            .find(|p| p.diagram_type == DiagramType::Network)
            .expect("network rule should have fired");
        // devices (40) + ip (30) + vlans (20) matched
        assert_eq!(network_pattern.weight, 90.0);
    }
}
