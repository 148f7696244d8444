use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Sentiment polarity assigned by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl FromStr for Sentiment {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(PipelineError::UnknownSentiment(other.to_string())),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-class probabilities returned alongside a label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentWeights {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

/// Label and weights for one sentence; they only ever exist together
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub label: Sentiment,
    pub weights: SentimentWeights,
}

/// Role of the speaker of a sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeakerStatus {
    MainSpeaker,
    President,
    Other,
}

impl SpeakerStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "main-speaker" => SpeakerStatus::MainSpeaker,
            "president" => SpeakerStatus::President,
            _ => SpeakerStatus::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeakerStatus::MainSpeaker => "main-speaker",
            SpeakerStatus::President => "president",
            SpeakerStatus::Other => "other",
        }
    }
}

/// Whether a sentence was spoken as part of the speech or is a recorded comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentenceKind {
    Speech,
    Comment,
    Other,
}

impl SentenceKind {
    pub fn parse(value: &str) -> Self {
        match value {
            "speech" => SentenceKind::Speech,
            "comment" => SentenceKind::Comment,
            _ => SentenceKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentenceKind::Speech => "speech",
            SentenceKind::Comment => "comment",
            SentenceKind::Other => "other",
        }
    }
}

/// One spoken sentence with the metadata of the block it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceRecord {
    /// Owning speech
    pub speech_id: String,
    /// Position within the flattened speech
    pub index: usize,
    pub speaker: Option<String>,
    pub speaker_status: Option<SpeakerStatus>,
    pub kind: SentenceKind,
    pub text: String,
    /// Start timestamp in seconds
    pub time_start: Option<f64>,
    /// End timestamp in seconds
    pub time_end: Option<f64>,
    /// Seconds spoken, 0 when a timestamp is missing
    pub duration: f64,
    pub party: Option<String>,
    pub faction: Option<String>,
    /// Set by the annotation stage
    pub sentiment: Option<SentimentScore>,
}

impl SentenceRecord {
    pub fn is_main_speaker(&self) -> bool {
        self.speaker_status == Some(SpeakerStatus::MainSpeaker)
    }

    /// Copy of this record carrying the given sentiment
    pub fn with_sentiment(&self, score: SentimentScore) -> Self {
        Self {
            sentiment: Some(score),
            ..self.clone()
        }
    }
}

/// Duration in seconds between two timestamps; 0 unless both are known
pub fn sentence_duration(start: Option<f64>, end: Option<f64>) -> f64 {
    match (start, end) {
        (Some(start), Some(end)) => end - start,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_from_str() {
        assert_eq!("positive".parse::<Sentiment>().unwrap(), Sentiment::Positive);
        assert_eq!("neutral".parse::<Sentiment>().unwrap(), Sentiment::Neutral);
        assert_eq!("negative".parse::<Sentiment>().unwrap(), Sentiment::Negative);

        let err = "Positive".parse::<Sentiment>().unwrap_err();
        assert!(matches!(err, PipelineError::UnknownSentiment(ref s) if s == "Positive"));
    }

    #[test]
    fn test_sentence_duration() {
        assert_eq!(sentence_duration(Some(2.5), Some(4.0)), 1.5);
        assert_eq!(sentence_duration(None, Some(4.0)), 0.0);
        assert_eq!(sentence_duration(Some(2.5), None), 0.0);
        assert_eq!(sentence_duration(None, None), 0.0);
    }

    #[test]
    fn test_speaker_status_parse() {
        assert_eq!(SpeakerStatus::parse("main-speaker"), SpeakerStatus::MainSpeaker);
        assert_eq!(SpeakerStatus::parse("president"), SpeakerStatus::President);
        assert_eq!(SpeakerStatus::parse("vice-president"), SpeakerStatus::Other);
    }
}
