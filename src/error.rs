use thiserror::Error;

/// Malformed-input errors raised while turning speech documents into
/// annotated sentence records. All of these abort the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("speech {speech_id}: invalid {field} timestamp {value:?} in sentence {index}")]
    InvalidTimestamp {
        speech_id: String,
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("speech {speech_id}: sentence {index} ends before it starts ({start} > {end})")]
    NegativeDuration {
        speech_id: String,
        index: usize,
        start: f64,
        end: f64,
    },

    #[error("unknown sentiment label {0:?} (expected positive, neutral or negative)")]
    UnknownSentiment(String),

    #[error("sentiment weight for {class} is missing")]
    MissingWeight { class: &'static str },

    #[error("sentiment weight for {class} is out of range: {value}")]
    InvalidWeight { class: String, value: f64 },

    #[error("classifier returned {got} results for {expected} sentences")]
    ClassifierMismatch { expected: usize, got: usize },

    #[error("speech {speech_id}: main-speaker sentence {index} has no sentiment")]
    UnannotatedSentence { speech_id: String, index: usize },
}
