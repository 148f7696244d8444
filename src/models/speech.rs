use serde::{Deserialize, Serialize};

use super::{SentenceKind, SentenceRecord, SpeakerStatus};

/// Placeholder used when a speaker, party or faction cannot be resolved
pub const UNKNOWN: &str = "unknown";

/// Metadata shared by all sentences of one speech
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRecord {
    pub id: String,
    pub source_url: String,
    /// Recording length in seconds as reported by the API
    pub duration: f64,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub agenda_item_title: String,
    pub agenda_item_official_title: Option<String>,
    pub main_speaker: String,
    pub main_speaker_party: String,
    pub main_speaker_faction: String,
    /// Whether any sentence carries the main-speaker status
    pub has_main_speaker: bool,
}

/// A speech broken down into its sentences, in spoken order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlattenedSpeech {
    pub speech: SpeechRecord,
    pub sentences: Vec<SentenceRecord>,
}

impl FlattenedSpeech {
    pub fn texts(&self) -> Vec<String> {
        self.sentences.iter().map(|s| s.text.clone()).collect()
    }

    pub fn sentences_by_kind(&self, kind: SentenceKind) -> impl Iterator<Item = &SentenceRecord> {
        self.sentences.iter().filter(move |s| s.kind == kind)
    }

    pub fn sentences_by_speaker_status(
        &self,
        status: SpeakerStatus,
    ) -> impl Iterator<Item = &SentenceRecord> {
        self.sentences
            .iter()
            .filter(move |s| s.speaker_status == Some(status))
    }

    pub fn main_speaker_sentences(&self) -> impl Iterator<Item = &SentenceRecord> {
        self.sentences_by_speaker_status(SpeakerStatus::MainSpeaker)
    }

    pub fn is_annotated(&self) -> bool {
        self.sentences.iter().all(|s| s.sentiment.is_some())
    }
}
