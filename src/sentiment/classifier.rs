use anyhow::Result;
use async_trait::async_trait;

use crate::error::PipelineError;
use crate::models::{Sentiment, SentimentScore, SentimentWeights};

/// Three-class sentence sentiment classifier.
///
/// Implementations return exactly one score per input text, in input order.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, texts: &[String]) -> Result<Vec<SentimentScore>>;
}

/// Turn raw classifier output into typed scores.
///
/// `weights[i]` holds `(class, probability)` pairs for sentence `i`. Pairs are
/// matched by class name so their order does not matter.
pub fn scores_from_raw(
    labels: &[String],
    weights: &[Vec<(String, f64)>],
) -> Result<Vec<SentimentScore>, PipelineError> {
    if labels.len() != weights.len() {
        return Err(PipelineError::ClassifierMismatch {
            expected: labels.len(),
            got: weights.len(),
        });
    }

    labels
        .iter()
        .zip(weights)
        .map(|(label, pairs)| -> Result<SentimentScore, PipelineError> {
            Ok(SentimentScore {
                label: label.parse()?,
                weights: weights_from_pairs(pairs)?,
            })
        })
        .collect()
}

fn weights_from_pairs(pairs: &[(String, f64)]) -> Result<SentimentWeights, PipelineError> {
    let mut positive = None;
    let mut negative = None;
    let mut neutral = None;

    for (class, value) in pairs {
        if !(0.0..=1.0).contains(value) {
            return Err(PipelineError::InvalidWeight {
                class: class.clone(),
                value: *value,
            });
        }
        match class.parse::<Sentiment>()? {
            Sentiment::Positive => positive = Some(*value),
            Sentiment::Negative => negative = Some(*value),
            Sentiment::Neutral => neutral = Some(*value),
        }
    }

    Ok(SentimentWeights {
        positive: positive.ok_or(PipelineError::MissingWeight { class: "positive" })?,
        negative: negative.ok_or(PipelineError::MissingWeight { class: "negative" })?,
        neutral: neutral.ok_or(PipelineError::MissingWeight { class: "neutral" })?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(positive: f64, negative: f64, neutral: f64) -> Vec<(String, f64)> {
        vec![
            ("positive".to_string(), positive),
            ("negative".to_string(), negative),
            ("neutral".to_string(), neutral),
        ]
    }

    #[test]
    fn test_scores_from_raw() {
        let labels = vec!["negative".to_string(), "neutral".to_string()];
        let weights = vec![pairs(0.1, 0.8, 0.1), pairs(0.05, 0.05, 0.9)];

        let scores = scores_from_raw(&labels, &weights).unwrap();

        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].label, Sentiment::Negative);
        assert_eq!(scores[0].weights.negative, 0.8);
        assert_eq!(scores[1].label, Sentiment::Neutral);
        assert_eq!(scores[1].weights.neutral, 0.9);
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let labels = vec!["sarcastic".to_string()];
        let weights = vec![pairs(0.3, 0.3, 0.4)];

        let err = scores_from_raw(&labels, &weights).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownSentiment(_)));
    }

    #[test]
    fn test_missing_weight_is_rejected() {
        let labels = vec!["positive".to_string()];
        let weights = vec![vec![("positive".to_string(), 0.9), ("neutral".to_string(), 0.1)]];

        let err = scores_from_raw(&labels, &weights).unwrap_err();
        assert!(matches!(err, PipelineError::MissingWeight { class: "negative" }));
    }

    #[test]
    fn test_out_of_range_weight_is_rejected() {
        let labels = vec!["positive".to_string()];
        let weights = vec![pairs(1.2, 0.0, 0.0)];

        let err = scores_from_raw(&labels, &weights).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidWeight { .. }));
    }

    #[test]
    fn test_length_mismatch() {
        let labels = vec!["positive".to_string(), "neutral".to_string()];
        let weights = vec![pairs(0.9, 0.05, 0.05)];

        let err = scores_from_raw(&labels, &weights).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ClassifierMismatch { expected: 2, got: 1 }
        ));
    }
}
