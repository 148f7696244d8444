use serde_json::Value;
use tracing::{debug, error};

use crate::error::PipelineError;
use crate::models::{
    sentence_duration, FlattenedSpeech, RawSentence, SentenceKind, SentenceRecord, SpeakerStatus,
    SpeechDocument, SpeechRecord, UNKNOWN,
};

/// Perform Stage 0: flatten a speech document into sentence records
///
/// Each sentence inherits speaker, speaker status and kind from its text block,
/// and the speaker is resolved to party and faction through the people listed
/// in the document. The first main-speaker sentence determines the main
/// speaker of the whole speech.
pub fn flatten_speech(document: &SpeechDocument) -> Result<FlattenedSpeech, PipelineError> {
    let data = &document.data;
    let mut sentences = Vec::new();

    for block in data.text_blocks() {
        let kind = SentenceKind::parse(&block.block_type);
        let speaker_status = block.speakerstatus.as_deref().map(SpeakerStatus::parse);
        let person = block.speaker.as_deref().and_then(|name| data.find_person(name));
        let party = person.and_then(|p| p.party.as_ref()).and_then(|a| a.label.clone());
        let faction = person.and_then(|p| p.faction.as_ref()).and_then(|a| a.label.clone());

        for raw in &block.sentences {
            let index = sentences.len();
            let (time_start, time_end) = parse_timestamps(&data.id, index, raw)?;
            let duration = sentence_duration(time_start, time_end);

            if duration < 0.0 {
                log_invalid_sentence(raw);
                return Err(PipelineError::NegativeDuration {
                    speech_id: data.id.clone(),
                    index,
                    start: time_start.unwrap_or_default(),
                    end: time_end.unwrap_or_default(),
                });
            }

            sentences.push(SentenceRecord {
                speech_id: data.id.clone(),
                index,
                speaker: block.speaker.clone(),
                speaker_status,
                kind,
                text: raw.text.clone(),
                time_start,
                time_end,
                duration,
                party: party.clone(),
                faction: faction.clone(),
                sentiment: None,
            });
        }
    }

    let speech = speech_record(document, &sentences);
    debug!(
        "Speech {}: {} sentences, main speaker {} ({})",
        speech.id,
        sentences.len(),
        speech.main_speaker,
        speech.main_speaker_faction
    );

    Ok(FlattenedSpeech { speech, sentences })
}

fn speech_record(document: &SpeechDocument, sentences: &[SentenceRecord]) -> SpeechRecord {
    let data = &document.data;
    let agenda = &data.relationships.agenda_item.data.attributes;

    let first_main = sentences.iter().find(|s| s.is_main_speaker());
    let main_speaker = first_main
        .and_then(|s| s.speaker.clone())
        .unwrap_or_else(|| UNKNOWN.to_string());

    let (party, faction) = if main_speaker == UNKNOWN {
        (None, None)
    } else {
        let person = data.find_person(&main_speaker);
        (
            person.and_then(|p| p.party.as_ref()).and_then(|a| a.label.clone()),
            person.and_then(|p| p.faction.as_ref()).and_then(|a| a.label.clone()),
        )
    };

    SpeechRecord {
        id: data.id.clone(),
        source_url: document.source_url.clone(),
        duration: data.attributes.duration,
        date_start: data.attributes.date_start.clone(),
        date_end: data.attributes.date_end.clone(),
        agenda_item_title: agenda.title.clone(),
        agenda_item_official_title: agenda.official_title.clone(),
        main_speaker,
        main_speaker_party: party.unwrap_or_else(|| UNKNOWN.to_string()),
        main_speaker_faction: faction.unwrap_or_else(|| UNKNOWN.to_string()),
        has_main_speaker: first_main.is_some(),
    }
}

fn parse_timestamps(
    speech_id: &str,
    index: usize,
    raw: &RawSentence,
) -> Result<(Option<f64>, Option<f64>), PipelineError> {
    let parse = |field: &'static str, value: &Option<Value>| {
        parse_timestamp(value).map_err(|value| {
            log_invalid_sentence(raw);
            PipelineError::InvalidTimestamp {
                speech_id: speech_id.to_string(),
                index,
                field,
                value,
            }
        })
    };

    Ok((
        parse("timeStart", &raw.time_start)?,
        parse("timeEnd", &raw.time_end)?,
    ))
}

/// Parse a timestamp given either as a JSON number or a numeric string.
///
/// Absent or null timestamps are `None`; anything else that is not a finite
/// number is returned as the offending raw value.
pub fn parse_timestamp(value: &Option<Value>) -> Result<Option<f64>, String> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(seconds) if seconds.is_finite() => Ok(Some(seconds)),
        _ => Err(value.as_ref().map(|v| v.to_string()).unwrap_or_default()),
    }
}

fn log_invalid_sentence(raw: &RawSentence) {
    error!(
        "Invalid sentence: {}",
        serde_json::to_string(raw).unwrap_or_else(|_| format!("{:?}", raw))
    );
}
