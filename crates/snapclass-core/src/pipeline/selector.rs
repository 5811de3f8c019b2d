//! Reduction of a score vector to the winning label.

use std::cmp::Ordering;

use tracing::trace;

use crate::error::ClassifyError;
use crate::models::classification::Classification;

use super::labels::LabelSet;

/// Outcome of scanning a score vector for its maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    /// A class scored above zero.
    Found { index: usize, score: f32 },
    /// Every score was `<= 0` (or NaN), or there were no scores.
    NotFound,
}

/// Scan `scores` once for the first strictly-greatest positive entry.
///
/// The running maximum starts at `0.0`, so only positive scores can win and
/// ties keep the earlier index.
pub fn scan(scores: &[f32]) -> Selection {
    let mut best = Selection::NotFound;
    let mut max = 0.0f32;

    for (index, &score) in scores.iter().enumerate() {
        if score > max {
            max = score;
            best = Selection::Found { index, score };
        }
    }

    best
}

fn check_lengths(scores: &[f32], labels: &LabelSet) -> Result<(), ClassifyError> {
    if scores.len() != labels.len() {
        return Err(ClassifyError::DimensionMismatch(format!(
            "model produced {} scores for {} labels",
            scores.len(),
            labels.len()
        )));
    }
    Ok(())
}

/// Pick the best label for a score vector.
///
/// Lengths are checked before any indexing. When no score is positive the
/// result is [`ClassifyError::NoPositiveScore`] rather than a guessed label.
pub fn select(scores: &[f32], labels: &LabelSet) -> Result<Classification, ClassifyError> {
    check_lengths(scores, labels)?;

    match scan(scores) {
        Selection::Found { index, score } => {
            let label = labels.get(index).ok_or_else(|| {
                ClassifyError::DimensionMismatch(format!("no label at index {}", index))
            })?;
            trace!("Selected class {} ({}) with score {}", index, label, score);
            Ok(Classification::new(label, index, score))
        }
        Selection::NotFound => Err(ClassifyError::NoPositiveScore),
    }
}

/// The `k` highest-scoring labels, best first.
///
/// NaN scores are skipped; equal scores keep their label order.
pub fn rank(scores: &[f32], labels: &LabelSet, k: usize) -> Result<Vec<Classification>, ClassifyError> {
    check_lengths(scores, labels)?;

    let mut indexed: Vec<(usize, f32)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, s)| !s.is_nan())
        .collect();

    // Stable sort keeps index order among equal scores
    indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    indexed.truncate(k);

    Ok(indexed
        .into_iter()
        .filter_map(|(index, score)| {
            labels
                .get(index)
                .map(|label| Classification::new(label, index, score))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn animals() -> LabelSet {
        LabelSet::from_iter(["cat", "dog", "bird"])
    }

    #[test]
    fn test_select_best() {
        let result = select(&[0.1, 0.9, 0.3], &animals()).unwrap();
        assert_eq!(result.label, "dog");
        assert_eq!(result.confidence, 90);
        assert_eq!(result.index, 1);
    }

    #[test]
    fn test_select_truncates() {
        let result = select(&[0.989, 0.011, 0.0], &animals()).unwrap();
        assert_eq!(result.label, "cat");
        assert_eq!(result.confidence, 98);
    }

    #[test]
    fn test_all_zero_scores() {
        let err = select(&[0.0, 0.0, 0.0], &animals()).unwrap_err();
        assert!(matches!(err, ClassifyError::NoPositiveScore));
    }

    #[test]
    fn test_negative_scores() {
        let err = select(&[-0.5, -0.1, -2.0], &animals()).unwrap_err();
        assert!(matches!(err, ClassifyError::NoPositiveScore));
    }

    #[test]
    fn test_empty_scores_and_labels() {
        let err = select(&[], &LabelSet::default()).unwrap_err();
        assert!(matches!(err, ClassifyError::NoPositiveScore));
    }

    #[test]
    fn test_length_mismatch() {
        let err = select(&[0.5, 0.5], &animals()).unwrap_err();
        assert!(matches!(err, ClassifyError::DimensionMismatch(_)));

        let err = select(&[0.1, 0.2, 0.3, 0.4], &animals()).unwrap_err();
        assert!(matches!(err, ClassifyError::DimensionMismatch(_)));
    }

    #[test]
    fn test_tie_keeps_first() {
        assert_eq!(scan(&[0.4, 0.4, 0.2]), Selection::Found { index: 0, score: 0.4 });
    }

    #[test]
    fn test_nan_never_wins() {
        assert_eq!(scan(&[f32::NAN, 0.2]), Selection::Found { index: 1, score: 0.2 });
        assert_eq!(scan(&[f32::NAN]), Selection::NotFound);
    }

    #[test]
    fn test_unnormalized_scores_not_clamped() {
        let result = select(&[1.0, 3.5, 2.0], &animals()).unwrap();
        assert_eq!(result.label, "dog");
        assert_eq!(result.confidence, 350);
    }

    #[test]
    fn test_rank_top_two() {
        let ranked = rank(&[0.1, 0.6, 0.3], &animals(), 2).unwrap();
        let labels: Vec<&str> = ranked.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["dog", "bird"]);
        assert_eq!(ranked[1].confidence, 30);
    }

    #[test]
    fn test_rank_more_than_available() {
        let ranked = rank(&[0.2, f32::NAN, 0.2], &animals(), 10).unwrap();
        let labels: Vec<&str> = ranked.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["cat", "bird"]);
    }

    #[test]
    fn test_rank_length_mismatch() {
        let err = rank(&[0.2], &animals(), 1).unwrap_err();
        assert!(matches!(err, ClassifyError::DimensionMismatch(_)));
    }
}
