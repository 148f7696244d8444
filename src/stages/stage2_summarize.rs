use std::collections::BTreeMap;

use tracing::debug;

use crate::error::PipelineError;
use crate::models::{
    CategorySummary, FlattenedSpeech, GroupingKey, SentenceRecord, SentimentDurations,
    SpeechSummary,
};

/// Sum main-speaker durations per sentiment label.
///
/// Every main-speaker sentence must already be annotated.
pub fn sentiment_durations<'a>(
    sentences: impl IntoIterator<Item = &'a SentenceRecord>,
) -> Result<SentimentDurations, PipelineError> {
    let mut durations = SentimentDurations::default();

    for sentence in sentences.into_iter().filter(|s| s.is_main_speaker()) {
        let score = sentence
            .sentiment
            .ok_or_else(|| PipelineError::UnannotatedSentence {
                speech_id: sentence.speech_id.clone(),
                index: sentence.index,
            })?;
        durations.add(score.label, sentence.duration);
    }

    Ok(durations)
}

/// Execute Stage 2 for one speech: duration-weighted sentiment summary
///
/// Returns `None` when the speech has no main-speaker sentences at all. A
/// speech whose main-speaker sentences add up to zero seconds is kept with
/// all percentages set to 0.
pub fn summarize_speech(
    speech: &FlattenedSpeech,
    category: Option<&str>,
) -> Result<Option<SpeechSummary>, PipelineError> {
    let sentence_count = speech.main_speaker_sentences().count();
    if sentence_count == 0 {
        return Ok(None);
    }

    let durations = sentiment_durations(&speech.sentences)?;
    let shares = durations.shares();
    let record = &speech.speech;

    debug!(
        "Speech {}: {:.1}s main-speaker time, {:.3} positive / {:.3} negative",
        record.id, durations.total, shares.positive, shares.negative
    );

    Ok(Some(SpeechSummary {
        speech_id: record.id.clone(),
        api_url: record.source_url.clone(),
        category: category.map(str::to_string),
        date_start: record.date_start.clone(),
        agenda_item_title: record.agenda_item_title.clone(),
        main_speaker: record.main_speaker.clone(),
        main_speaker_party: record.main_speaker_party.clone(),
        main_speaker_faction: record.main_speaker_faction.clone(),
        sentence_count,
        total_duration: durations.total,
        duration_positive: durations.positive,
        duration_neutral: durations.neutral,
        duration_negative: durations.negative,
        percentage_positive: shares.positive,
        percentage_neutral: shares.neutral,
        percentage_negative: shares.negative,
    }))
}

/// Group speech summaries and recompute percentages from the summed durations.
///
/// Groups are ordered by label. Within a group, durations are added in
/// speech id order so the totals do not depend on the input order.
pub fn group_summaries(summaries: &[SpeechSummary], key: GroupingKey) -> Vec<CategorySummary> {
    let mut groups: BTreeMap<&str, Vec<&SpeechSummary>> = BTreeMap::new();
    for summary in summaries {
        groups.entry(summary.group_label(key)).or_default().push(summary);
    }

    groups
        .into_iter()
        .map(|(label, mut members)| {
            members.sort_by(|a, b| {
                a.speech_id
                    .cmp(&b.speech_id)
                    .then_with(|| a.total_duration.total_cmp(&b.total_duration))
            });

            let mut durations = SentimentDurations::default();
            for member in &members {
                durations.merge(&member.durations());
            }
            let shares = durations.shares();

            CategorySummary {
                group: label.to_string(),
                grouping: key,
                category: common_category(&members),
                speech_count: members.len(),
                total_duration: durations.total,
                duration_positive: durations.positive,
                duration_neutral: durations.neutral,
                duration_negative: durations.negative,
                percentage_positive: shares.positive,
                percentage_neutral: shares.neutral,
                percentage_negative: shares.negative,
            }
        })
        .collect()
}

/// The category shared by every member, if there is exactly one
fn common_category(members: &[&SpeechSummary]) -> Option<String> {
    let first = members.first()?.category.as_deref()?;
    members
        .iter()
        .all(|m| m.category.as_deref() == Some(first))
        .then(|| first.to_string())
}
