//! Additive score accumulation for the source-aware detectors
//!
//! Raw-text detection sums weighted signal hits per candidate type,
//! capped at 100, with occasional negative adjustments when strong
//! evidence for a competing type is present. The uncapped running total
//! doubles as the output pattern's weight, preserving relative
//! magnitude for consumers that sort evidence by importance.

use crate::core::{DetectionPattern, DiagramType};

/// Running score for one candidate diagram type
#[derive(Debug, Clone)]
pub(crate) struct ScoreCard {
    pub diagram_type: DiagramType,
    points: f64,
    evidence: Vec<String>,
}

impl ScoreCard {
    pub fn new(diagram_type: DiagramType) -> Self {
        Self {
            diagram_type,
            points: 0.0,
            evidence: Vec::new(),
        }
    }

    /// Record a signal hit worth `points`, with a human-readable note
    pub fn add(&mut self, points: f64, note: impl Into<String>) {
        self.points += points;
        self.evidence.push(note.into());
    }

    /// Record a signal hit only when `hit` is true
    pub fn add_if(&mut self, hit: bool, points: f64, note: impl Into<String>) {
        if hit {
            self.add(points, note);
        }
    }

    /// Deduct points when competing evidence is present, floored at 0
    pub fn penalize(&mut self, points: f64) {
        self.points = (self.points - points).max(0.0);
    }

    /// The capped 0–100 confidence
    pub fn confidence(&self) -> f64 {
        self.points.min(100.0)
    }

    /// Convert into an output pattern record; zero-score cards vanish
    pub fn into_pattern(self) -> Option<DetectionPattern> {
        if self.points > 0.0 {
            Some(DetectionPattern {
                diagram_type: self.diagram_type,
                confidence: self.points.min(100.0),
                weight: self.points,
                evidence: self.evidence,
            })
        } else {
            None
        }
    }
}

/// Pick the best card by capped confidence (strict `>`, first wins ties)
/// and collect every nonzero card as a pattern record
pub(crate) fn summarize(cards: Vec<ScoreCard>) -> (DiagramType, f64, Vec<DetectionPattern>) {
    let mut best_type = DiagramType::Unknown;
    let mut best_confidence = 0.0_f64;

    for card in &cards {
        if card.confidence() > best_confidence {
            best_type = card.diagram_type;
            best_confidence = card.confidence();
        }
    }

    let patterns = cards.into_iter().filter_map(ScoreCard::into_pattern).collect();
    (best_type, best_confidence, patterns)
}
