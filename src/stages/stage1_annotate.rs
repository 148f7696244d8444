use anyhow::Result;
use tracing::{debug, info};

use crate::error::PipelineError;
use crate::models::{FlattenedSpeech, Sentiment};
use crate::sentiment::SentimentClassifier;

/// Execute Stage 1: sentiment annotation
///
/// All sentence texts of the speech go to the classifier as one ordered
/// batch. The scores are matched to sentences by position, so the classifier
/// must return exactly one score per sentence.
pub async fn annotate_speech<C>(classifier: &C, speech: FlattenedSpeech) -> Result<FlattenedSpeech>
where
    C: SentimentClassifier + ?Sized,
{
    if speech.sentences.is_empty() {
        debug!("Speech {}: no sentences to classify", speech.speech.id);
        return Ok(speech);
    }

    let texts = speech.texts();
    let scores = classifier.classify(&texts).await?;

    if scores.len() != texts.len() {
        return Err(PipelineError::ClassifierMismatch {
            expected: texts.len(),
            got: scores.len(),
        }
        .into());
    }

    let sentences = speech
        .sentences
        .iter()
        .zip(scores)
        .map(|(sentence, score)| sentence.with_sentiment(score))
        .collect::<Vec<_>>();

    let count = |label: Sentiment| {
        sentences
            .iter()
            .filter(|s| s.sentiment.map(|score| score.label) == Some(label))
            .count()
    };
    info!(
        "Speech {}: {} sentences classified ({} positive, {} neutral, {} negative)",
        speech.speech.id,
        sentences.len(),
        count(Sentiment::Positive),
        count(Sentiment::Neutral),
        count(Sentiment::Negative)
    );

    Ok(FlattenedSpeech {
        speech: speech.speech,
        sentences,
    })
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::collections::HashMap;

    use anyhow::Result;
    use async_trait::async_trait;

    use crate::models::{Sentiment, SentimentScore, SentimentWeights};
    use crate::sentiment::SentimentClassifier;

    /// Classifier answering from a fixed text → label table (neutral otherwise)
    #[derive(Default)]
    pub struct TableClassifier {
        pub labels: HashMap<String, Sentiment>,
        /// Drop the last score to break the positional contract
        pub truncate: bool,
    }

    impl TableClassifier {
        pub fn with(mut self, text: &str, label: Sentiment) -> Self {
            self.labels.insert(text.to_string(), label);
            self
        }
    }

    pub fn score(label: Sentiment) -> SentimentScore {
        let (positive, negative, neutral) = match label {
            Sentiment::Positive => (0.8, 0.1, 0.1),
            Sentiment::Negative => (0.1, 0.8, 0.1),
            Sentiment::Neutral => (0.1, 0.1, 0.8),
        };
        SentimentScore {
            label,
            weights: SentimentWeights {
                positive,
                negative,
                neutral,
            },
        }
    }

    #[async_trait]
    impl SentimentClassifier for TableClassifier {
        async fn classify(&self, texts: &[String]) -> Result<Vec<SentimentScore>> {
            let mut scores: Vec<SentimentScore> = texts
                .iter()
                .map(|t| score(self.labels.get(t).copied().unwrap_or(Sentiment::Neutral)))
                .collect();
            if self.truncate {
                scores.pop();
            }
            Ok(scores)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::TableClassifier;
    use super::*;
    use crate::models::openparliament::SAMPLE_SPEECH;
    use crate::models::{DocumentResponse, SpeechDocument};
    use crate::stages::flatten_speech;

    fn sample_speech() -> FlattenedSpeech {
        let response: DocumentResponse = serde_json::from_str(SAMPLE_SPEECH).unwrap();
        flatten_speech(&SpeechDocument {
            source_url: "https://example.org".to_string(),
            data: response.data,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_annotate_preserves_order() {
        let classifier = TableClassifier::default()
            .with("Sehr geehrte Frau Präsidentin!", Sentiment::Positive)
            .with("Das ist ein schlechter Entwurf.", Sentiment::Negative);

        let original = sample_speech();
        let annotated = annotate_speech(&classifier, original.clone()).await.unwrap();

        assert!(annotated.is_annotated());
        assert_eq!(annotated.sentences.len(), original.sentences.len());
        let labels: Vec<Sentiment> = annotated
            .sentences
            .iter()
            .map(|s| s.sentiment.unwrap().label)
            .collect();
        assert_eq!(
            labels,
            vec![
                Sentiment::Neutral,
                Sentiment::Positive,
                Sentiment::Negative,
                Sentiment::Neutral,
                Sentiment::Neutral
            ]
        );
        assert_eq!(annotated.sentences[2].sentiment.unwrap().weights.negative, 0.8);

        // Everything but the sentiment is carried over unchanged
        for (before, after) in original.sentences.iter().zip(&annotated.sentences) {
            assert_eq!(before.text, after.text);
            assert_eq!(before.duration, after.duration);
        }
        assert_eq!(annotated.speech, original.speech);
    }

    #[tokio::test]
    async fn test_annotate_rejects_short_output() {
        let classifier = TableClassifier {
            truncate: true,
            ..Default::default()
        };

        let err = annotate_speech(&classifier, sample_speech()).await.unwrap_err();
        let err = err.downcast::<PipelineError>().unwrap();
        assert!(matches!(
            err,
            PipelineError::ClassifierMismatch { expected: 5, got: 4 }
        ));
    }

    #[tokio::test]
    async fn test_annotate_empty_speech_skips_classifier() {
        let classifier = TableClassifier {
            truncate: true,
            ..Default::default()
        };
        let mut speech = sample_speech();
        speech.sentences.clear();

        let annotated = annotate_speech(&classifier, speech).await.unwrap();
        assert!(annotated.sentences.is_empty());
    }
}
