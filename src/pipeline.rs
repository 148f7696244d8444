use anyhow::Result;
use tracing::{info, warn};

use crate::models::{FlattenedSpeech, SpeechDocument, SpeechSummary};
use crate::sentiment::SentimentClassifier;
use crate::stages::{annotate_speech, flatten_speech, summarize_speech, RunReport};

/// One speech after flattening, annotation and summarizing
#[derive(Debug, Clone)]
pub struct AnalysedSpeech {
    pub speech: FlattenedSpeech,
    /// `None` if the speech has no main-speaker sentences
    pub summary: Option<SpeechSummary>,
}

/// Run stages 0-2 on a single speech document
pub async fn analyse_document<C>(
    classifier: &C,
    document: &SpeechDocument,
    category: Option<&str>,
) -> Result<AnalysedSpeech>
where
    C: SentimentClassifier + ?Sized,
{
    let flattened = flatten_speech(document)?;
    let speech = annotate_speech(classifier, flattened).await?;
    let summary = summarize_speech(&speech, category)?;
    Ok(AnalysedSpeech { speech, summary })
}

/// Analyse documents one after another and add the results to `run`.
///
/// Speeches without a main speaker are logged and left out of the summaries.
/// The first failing speech aborts the whole run.
pub async fn analyse_documents<C>(
    classifier: &C,
    documents: &[SpeechDocument],
    category: Option<&str>,
    run: &mut RunReport,
) -> Result<()>
where
    C: SentimentClassifier + ?Sized,
{
    for (i, document) in documents.iter().enumerate() {
        info!(
            "Analysing speech {} ({}/{})",
            document.data.id,
            i + 1,
            documents.len()
        );
        let analysed = analyse_document(classifier, document, category).await?;

        match analysed.summary {
            Some(summary) => run.summaries.push(summary),
            None => {
                warn!(
                    "Speech {} has no main-speaker sentences, leaving it out",
                    document.data.id
                );
                run.dropped.push(document.data.id.clone());
            }
        }
        run.speeches.push(analysed.speech);
    }

    Ok(())
}
