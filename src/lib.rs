pub mod api;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod sentiment;
pub mod stages;

pub use api::{
    ApiConfig, BUNDESTAG_FACTIONS, DateRange, Faction, FactionTable, OpenParliamentClient,
    SearchQuery,
};
pub use error::PipelineError;
pub use io::{parse_speech_file, read_speech_summaries, write_speech_summaries};
pub use models::{
    CategorySummary, FlattenedSpeech, GroupingKey, SentenceRecord, Sentiment, SpeechDocument,
    SpeechRecord, SpeechSummary,
};
pub use pipeline::{analyse_document, analyse_documents, AnalysedSpeech};
pub use sentiment::{ClassifierConfig, HttpSentimentClassifier, SentimentClassifier};
pub use stages::{
    annotate_speech, execute_report, flatten_speech, group_summaries, report_timestamp,
    summarize_speech, ReportConfig, ReportResult, RunReport,
};
