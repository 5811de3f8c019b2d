//! Classification result model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The label chosen for an image and how confident the model was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Human-readable class name.
    pub label: String,

    /// Winning score as a percentage, truncated toward zero.
    ///
    /// Not clamped: an unnormalized score vector can push this above 100.
    pub confidence: u32,

    /// Raw winning score as produced by the model.
    pub score: f32,

    /// Position of the winning class in the label set.
    pub index: usize,
}

impl Classification {
    /// Build a classification, deriving the percentage from `score`.
    pub fn new(label: impl Into<String>, index: usize, score: f32) -> Self {
        Self {
            label: label.into(),
            confidence: confidence_percent(score),
            score,
            index,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} with confidence {}%", self.label, self.confidence)
    }
}

/// `trunc(score * 100)`, evaluated in `f32`.
///
/// Negative and NaN scores map to 0; the selector never hands those over.
/// Scores above 1.0 are not clamped to 100, but the cast saturates: anything
/// at or beyond `u32::MAX / 100` (including infinity) yields `u32::MAX`.
pub fn confidence_percent(score: f32) -> u32 {
    (score * 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_confidence_truncates() {
        assert_eq!(confidence_percent(0.989), 98);
        assert_eq!(confidence_percent(0.9), 90);
        assert_eq!(confidence_percent(0.005), 0);
        assert_eq!(confidence_percent(1.0), 100);
    }

    #[test]
    fn test_confidence_not_clamped() {
        assert_eq!(confidence_percent(2.5), 250);
    }

    #[test]
    fn test_confidence_saturates() {
        assert_eq!(confidence_percent(f32::INFINITY), u32::MAX);
        assert_eq!(confidence_percent(1e30), u32::MAX);
    }

    #[test]
    fn test_display() {
        let c = Classification::new("dog", 1, 0.9);
        assert_eq!(c.to_string(), "dog with confidence 90%");
    }
}
