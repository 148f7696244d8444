use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{CategorySummary, FlattenedSpeech, SentenceRecord, SpeechSummary};

/// Column order of speech summary files
pub const SPEECH_SUMMARY_HEADER: [&str; 16] = [
    "speech_id",
    "api_url",
    "category",
    "date_start",
    "agenda_item_title",
    "main_speaker",
    "main_speaker_party",
    "main_speaker_faction",
    "sentence_count",
    "total_duration",
    "duration_positive",
    "duration_neutral",
    "duration_negative",
    "percentage_positive",
    "percentage_neutral",
    "percentage_negative",
];

/// Column order of grouped summary files
pub const CATEGORY_SUMMARY_HEADER: [&str; 11] = [
    "group",
    "grouping",
    "category",
    "speech_count",
    "total_duration",
    "duration_positive",
    "duration_neutral",
    "duration_negative",
    "percentage_positive",
    "percentage_neutral",
    "percentage_negative",
];

/// Column order of per-speech sentence files
pub const SENTENCE_HEADER: [&str; 15] = [
    "speech_id",
    "index",
    "speaker",
    "speaker_status",
    "kind",
    "text",
    "time_start",
    "time_end",
    "duration",
    "party",
    "faction",
    "sentiment",
    "sentiment_positive_weight",
    "sentiment_negative_weight",
    "sentiment_neutral_weight",
];

/// Flat CSV row for one sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceRow {
    pub speech_id: String,
    pub index: usize,
    pub speaker: Option<String>,
    pub speaker_status: Option<String>,
    pub kind: String,
    pub text: String,
    pub time_start: Option<f64>,
    pub time_end: Option<f64>,
    pub duration: f64,
    pub party: Option<String>,
    pub faction: Option<String>,
    pub sentiment: Option<String>,
    pub sentiment_positive_weight: Option<f64>,
    pub sentiment_negative_weight: Option<f64>,
    pub sentiment_neutral_weight: Option<f64>,
}

impl From<&SentenceRecord> for SentenceRow {
    fn from(s: &SentenceRecord) -> Self {
        Self {
            speech_id: s.speech_id.clone(),
            index: s.index,
            speaker: s.speaker.clone(),
            speaker_status: s.speaker_status.map(|st| st.as_str().to_string()),
            kind: s.kind.as_str().to_string(),
            text: s.text.clone(),
            time_start: s.time_start,
            time_end: s.time_end,
            duration: s.duration,
            party: s.party.clone(),
            faction: s.faction.clone(),
            sentiment: s.sentiment.map(|score| score.label.to_string()),
            sentiment_positive_weight: s.sentiment.map(|score| score.weights.positive),
            sentiment_negative_weight: s.sentiment.map(|score| score.weights.negative),
            sentiment_neutral_weight: s.sentiment.map(|score| score.weights.neutral),
        }
    }
}

/// Write rows under a fixed header; the header is written even without rows
fn write_csv<T: Serialize>(path: &Path, header: &[&str], rows: impl IntoIterator<Item = T>) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;

    writer.write_record(header).context("Failed to write CSV header")?;
    for row in rows {
        writer.serialize(row).context("Failed to write CSV row")?;
    }
    writer.flush().with_context(|| format!("Failed to flush {:?}", path))?;
    Ok(())
}

pub fn write_speech_summaries(path: &Path, summaries: &[SpeechSummary]) -> Result<()> {
    write_csv(path, &SPEECH_SUMMARY_HEADER, summaries)
}

/// Read a file written by [`write_speech_summaries`]
pub fn read_speech_summaries(path: &Path) -> Result<Vec<SpeechSummary>> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    reader
        .deserialize()
        .collect::<Result<Vec<SpeechSummary>, _>>()
        .with_context(|| format!("Failed to parse speech summaries from {:?}", path))
}

pub fn write_category_summaries(path: &Path, groups: &[CategorySummary]) -> Result<()> {
    write_csv(path, &CATEGORY_SUMMARY_HEADER, groups)
}

pub fn write_sentences(path: &Path, speech: &FlattenedSpeech) -> Result<()> {
    write_csv(
        path,
        &SENTENCE_HEADER,
        speech.sentences.iter().map(SentenceRow::from),
    )
}

/// Both plot axes run from 0 to this share
pub const PLOT_MAX: f64 = 0.2;

/// Plot colour index per faction, in faction name order
pub fn faction_colors(summaries: &[SpeechSummary]) -> Vec<(String, usize)> {
    summaries
        .iter()
        .map(|s| s.main_speaker_faction.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .enumerate()
        .map(|(i, faction)| (faction.to_string(), i))
        .collect()
}

/// Scatter plot of positive (x) against negative (y) share, one point per
/// speech, coloured by faction. Points outside the plotted box are clipped.
pub fn plot_sentiment_scatter(path: &Path, summaries: &[SpeechSummary]) -> Result<()> {
    let plot_err = |e: &dyn std::fmt::Display| anyhow::anyhow!("Failed to draw plot {:?}: {}", path, e);

    let root = BitMapBackend::new(path, (800, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| plot_err(&e))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(40)
        .build_cartesian_2d(0f64..PLOT_MAX, 0f64..PLOT_MAX)
        .map_err(|e| plot_err(&e))?;

    let grid = BLACK.mix(0.2);
    for step in 0..=4 {
        let v = step as f64 * PLOT_MAX / 4.0;
        chart
            .draw_series(LineSeries::new(vec![(v, 0.0), (v, PLOT_MAX)], &grid))
            .map_err(|e| plot_err(&e))?;
        chart
            .draw_series(LineSeries::new(vec![(0.0, v), (PLOT_MAX, v)], &grid))
            .map_err(|e| plot_err(&e))?;
    }

    let in_box = |s: &&SpeechSummary| {
        (0.0..=PLOT_MAX).contains(&s.percentage_positive)
            && (0.0..=PLOT_MAX).contains(&s.percentage_negative)
    };
    let clipped = summaries.iter().filter(|s| !in_box(s)).count();
    if clipped > 0 {
        debug!("{} speeches outside the plotted range", clipped);
    }

    for (faction, index) in faction_colors(summaries) {
        let color = Palette99::pick(index);
        info!("Plot colour {} = faction {}", index, faction);
        chart
            .draw_series(
                summaries
                    .iter()
                    .filter(|s| s.main_speaker_faction == faction)
                    .filter(in_box)
                    .map(|s| {
                        Circle::new(
                            (s.percentage_positive, s.percentage_negative),
                            5,
                            color.filled(),
                        )
                    }),
            )
            .map_err(|e| plot_err(&e))?;
    }

    root.present().map_err(|e| plot_err(&e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Sentiment, SentenceKind, SentimentScore, SentimentWeights, SpeakerStatus, SpeechRecord,
    };

    fn summary(id: &str, faction: &str, positive: f64, negative: f64) -> SpeechSummary {
        SpeechSummary {
            speech_id: id.to_string(),
            api_url: format!("https://example.org/media/{}", id),
            category: Some("Budget".to_string()),
            date_start: None,
            agenda_item_title: "Haushalt, Finanzen; \"Schuldenbremse\"".to_string(),
            main_speaker: "Anna Beispiel".to_string(),
            main_speaker_party: "SPD".to_string(),
            main_speaker_faction: faction.to_string(),
            sentence_count: 12,
            total_duration: 61.337,
            duration_positive: 61.337 * positive,
            duration_neutral: 61.337 * (1.0 - positive - negative),
            duration_negative: 61.337 * negative,
            percentage_positive: positive,
            percentage_neutral: 1.0 - positive - negative,
            percentage_negative: negative,
        }
    }

    #[test]
    fn test_speech_summary_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("master_summary.csv");
        let summaries = vec![
            summary("S1", "SPD", 0.1 + 0.2, 0.0),
            summary("S2", "AfD", 1.0 / 3.0, 0.125),
        ];

        write_speech_summaries(&path, &summaries).unwrap();
        let read = read_speech_summaries(&path).unwrap();

        assert_eq!(read, summaries);
    }

    #[test]
    fn test_header_matches_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        write_speech_summaries(&path, &[summary("S1", "SPD", 0.1, 0.1)]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(header, SPEECH_SUMMARY_HEADER.join(","));
    }

    #[test]
    fn test_empty_files_still_have_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.csv");

        write_category_summaries(&path, &[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), CATEGORY_SUMMARY_HEADER.join(","));
        assert!(read_speech_summaries(&dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn test_write_sentences() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S1.csv");
        let score = SentimentScore {
            label: Sentiment::Negative,
            weights: SentimentWeights {
                positive: 0.1,
                negative: 0.7,
                neutral: 0.2,
            },
        };
        let speech = FlattenedSpeech {
            speech: SpeechRecord {
                id: "S1".to_string(),
                source_url: String::new(),
                duration: 3.0,
                date_start: None,
                date_end: None,
                agenda_item_title: "Haushalt".to_string(),
                agenda_item_official_title: None,
                main_speaker: "Anna Beispiel".to_string(),
                main_speaker_party: "SPD".to_string(),
                main_speaker_faction: "SPD".to_string(),
                has_main_speaker: true,
            },
            sentences: vec![SentenceRecord {
                speech_id: "S1".to_string(),
                index: 0,
                speaker: Some("Anna Beispiel".to_string()),
                speaker_status: Some(SpeakerStatus::MainSpeaker),
                kind: SentenceKind::Speech,
                text: "Nein, das lehnen wir ab.".to_string(),
                time_start: Some(1.0),
                time_end: Some(3.0),
                duration: 2.0,
                party: Some("SPD".to_string()),
                faction: None,
                sentiment: Some(score),
            }],
        };

        write_sentences(&path, &speech).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, SENTENCE_HEADER.to_vec());
        let rows: Vec<SentenceRow> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].speaker_status.as_deref(), Some("main-speaker"));
        assert_eq!(rows[0].sentiment.as_deref(), Some("negative"));
        assert_eq!(rows[0].sentiment_negative_weight, Some(0.7));
        assert_eq!(rows[0].text, "Nein, das lehnen wir ab.");
        assert_eq!(rows[0].faction, None);
    }

    #[test]
    fn test_faction_colors_are_stable() {
        let summaries = vec![
            summary("S1", "SPD", 0.1, 0.1),
            summary("S2", "AfD", 0.1, 0.1),
            summary("S3", "SPD", 0.1, 0.1),
        ];

        assert_eq!(
            faction_colors(&summaries),
            vec![("AfD".to_string(), 0), ("SPD".to_string(), 1)]
        );
    }

    #[test]
    fn test_plot_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentiment_scatter.png");
        let summaries = vec![
            summary("S1", "SPD", 0.05, 0.1),
            summary("S2", "AfD", 0.15, 0.02),
            summary("S3", "FDP", 0.6, 0.3),
        ];

        plot_sentiment_scatter(&path, &summaries).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }
}
