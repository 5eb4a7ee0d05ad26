//! Macro-F1 evaluation of classified comments against reference labels.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::comments::Comment;
use crate::error::{Error, Result};
use crate::types::CommentId;

/// Outcome of comparing reference labels with predictions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    /// Macro-averaged F1 over every class seen
    pub f1_macro: f64,
    /// Labels that matched a classified comment
    pub matched: usize,
    /// Labels with no classified comment
    pub unmatched: usize,
}

/// Mean per-class F1 over `(true, predicted)` pairs.
///
/// Classes are the union of labels seen on either side. Returns `0.0` when
/// there are no pairs.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn macro_f1(pairs: &[(i64, i64)]) -> f64 {
    if pairs.is_empty() {
        return 0.0;
    }

    let classes: BTreeSet<i64> = pairs.iter().flat_map(|&(t, p)| [t, p]).collect();
    let total: f64 = classes
        .iter()
        .map(|&class| {
            let tp = pairs.iter().filter(|&&(t, p)| t == class && p == class).count();
            let fp = pairs.iter().filter(|&&(t, p)| t != class && p == class).count();
            let fn_ = pairs.iter().filter(|&&(t, p)| t == class && p != class).count();

            let precision = if tp + fp > 0 { tp as f64 / (tp + fp) as f64 } else { 0.0 };
            let recall = if tp + fn_ > 0 { tp as f64 / (tp + fn_) as f64 } else { 0.0 };
            if precision + recall == 0.0 {
                0.0
            } else {
                2.0 * precision * recall / (precision + recall)
            }
        })
        .sum();

    total / classes.len() as f64
}

/// Predicted class codes of classified comments, keyed by id.
pub fn predictions_of<'a, I>(comments: I) -> HashMap<CommentId, i64>
where
    I: IntoIterator<Item = &'a Comment>,
{
    comments
        .into_iter()
        .map(|c| (c.id, i64::from(c.score.code())))
        .collect()
}

/// Align reference labels with predictions by comment id and score them.
///
/// Fails with [`Error::NoOverlap`] when no label matches a prediction.
pub fn evaluate(
    labels: &HashMap<CommentId, i64>,
    predictions: &HashMap<CommentId, i64>,
) -> Result<Evaluation> {
    let pairs: Vec<(i64, i64)> = labels
        .iter()
        .filter_map(|(id, &truth)| predictions.get(id).map(|&pred| (truth, pred)))
        .collect();

    if pairs.is_empty() {
        return Err(Error::NoOverlap);
    }

    let evaluation = Evaluation {
        f1_macro: macro_f1(&pairs),
        matched: pairs.len(),
        unmatched: labels.len() - pairs.len(),
    };
    debug!(?evaluation, "labels evaluated");
    Ok(evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_perfect_predictions() {
        let pairs = [(0, 0), (1, 1), (2, 2), (2, 2)];
        assert!(close(macro_f1(&pairs), 1.0));
    }

    #[test]
    fn test_empty_pairs() {
        assert!(close(macro_f1(&[]), 0.0));
    }

    #[test]
    fn test_mixed_predictions() {
        // class 0: tp=1 fp=0 fn=1 -> p=1 r=0.5 f1=2/3
        // class 1: tp=1 fp=1 fn=0 -> p=0.5 r=1 f1=2/3
        let pairs = [(0, 0), (0, 1), (1, 1)];
        assert!(close(macro_f1(&pairs), 2.0 / 3.0));
    }

    #[test]
    fn test_class_only_predicted() {
        // class 2 never appears in truth: its f1 is 0 and still counts
        let pairs = [(0, 0), (1, 2)];
        // class 0: f1=1, class 1: f1=0, class 2: f1=0
        assert!(close(macro_f1(&pairs), 1.0 / 3.0));
    }

    #[test]
    fn test_evaluate_aligns_by_id() {
        let labels: HashMap<CommentId, i64> =
            [(CommentId(1), 2), (CommentId(2), 0), (CommentId(9), 1)].into_iter().collect();
        let predictions: HashMap<CommentId, i64> =
            [(CommentId(1), 2), (CommentId(2), 0), (CommentId(3), 1)].into_iter().collect();

        let evaluation = evaluate(&labels, &predictions).unwrap();
        assert_eq!(evaluation.matched, 2);
        assert_eq!(evaluation.unmatched, 1);
        assert!(close(evaluation.f1_macro, 1.0));
    }

    #[test]
    fn test_predictions_of_comments() {
        use crate::comments::SentimentScore;

        let comments = vec![
            Comment {
                id: CommentId(1),
                text: "fine".to_string(),
                score: SentimentScore::Neutral,
                created_at: None,
            },
            Comment {
                id: CommentId(2),
                text: "great".to_string(),
                score: SentimentScore::Positive,
                created_at: None,
            },
        ];
        let predictions = predictions_of(&comments);
        assert_eq!(predictions[&CommentId(1)], 1);
        assert_eq!(predictions[&CommentId(2)], 2);
    }

    #[test]
    fn test_evaluate_no_overlap() {
        let labels: HashMap<CommentId, i64> = [(CommentId(1), 2)].into_iter().collect();
        let predictions: HashMap<CommentId, i64> = [(CommentId(2), 2)].into_iter().collect();
        assert!(matches!(evaluate(&labels, &predictions), Err(Error::NoOverlap)));
    }
}
