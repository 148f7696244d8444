use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::io::{plot_sentiment_scatter, write_category_summaries, write_sentences, write_speech_summaries};
use crate::models::{FlattenedSpeech, GroupingKey, SpeechSummary};
use crate::stages::group_summaries;

/// Configuration for Stage 3 reporting
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Root directory of all reports
    pub output_dir: PathBuf,
    /// Groupings to write a grouped file for
    pub groupings: Vec<GroupingKey>,
    /// Whether to write one sentence file per speech
    pub write_sentences: bool,
    /// Whether to draw the positive/negative scatter plot
    pub plot: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("results"),
            groupings: vec![GroupingKey::Party],
            write_sentences: true,
            plot: false,
        }
    }
}

/// Everything one run produced, ready to be written
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Name used in file names of cross-category reports
    pub label: String,
    pub speeches: Vec<FlattenedSpeech>,
    pub summaries: Vec<SpeechSummary>,
    /// Speeches left out because they have no main speaker
    pub dropped: Vec<String>,
}

/// Result of Stage 3 reporting
#[derive(Debug, Default)]
pub struct ReportResult {
    pub run_dir: PathBuf,
    pub master_summary: PathBuf,
    pub sentence_files: Vec<PathBuf>,
    pub grouped_files: Vec<PathBuf>,
    pub plot: Option<PathBuf>,
}

/// Timestamp used in report paths
pub fn report_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// Replace characters that are unsafe in file names
pub fn sanitize_file_component(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

/// `<dir>/<category>_<grouping>_<timestamp>.csv`
pub fn grouped_report_path(dir: &Path, category: &str, grouping: GroupingKey, timestamp: &str) -> PathBuf {
    dir.join(format!(
        "{}_{}_{}.csv",
        sanitize_file_component(category),
        grouping,
        timestamp
    ))
}

/// Execute Stage 3: write the reports of one run
///
/// Produces below `<output_dir>`:
/// 1. `<timestamp>/<speech-id>.csv` with the annotated sentences of each speech
/// 2. `<timestamp>/master_summary.csv` with one row per speech
/// 3. `<category>_<grouping>_<timestamp>.csv` per grouping
/// 4. `<timestamp>/sentiment_scatter.png` if plotting is enabled
pub fn execute_report(run: &RunReport, config: &ReportConfig, timestamp: &str) -> Result<ReportResult> {
    let run_dir = config.output_dir.join(timestamp);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("Failed to create directory: {:?}", run_dir))?;

    let mut result = ReportResult {
        run_dir: run_dir.clone(),
        master_summary: run_dir.join("master_summary.csv"),
        ..Default::default()
    };

    if config.write_sentences {
        for speech in &run.speeches {
            let path = run_dir.join(format!("{}.csv", sanitize_file_component(&speech.speech.id)));
            write_sentences(&path, speech)?;
            result.sentence_files.push(path);
        }
        info!("Wrote {} sentence files to {:?}", result.sentence_files.len(), run_dir);
    }

    write_speech_summaries(&result.master_summary, &run.summaries)?;
    info!(
        "Wrote {} speech summaries to {:?}",
        run.summaries.len(),
        result.master_summary
    );

    for &grouping in &config.groupings {
        for (category, summaries) in summaries_for_grouping(run, grouping) {
            let groups = group_summaries(&summaries, grouping);
            let path = grouped_report_path(&config.output_dir, &category, grouping, timestamp);
            write_category_summaries(&path, &groups)?;
            info!("Wrote {} {} groups to {:?}", groups.len(), grouping, path);
            result.grouped_files.push(path);
        }
    }

    if config.plot {
        let path = run_dir.join("sentiment_scatter.png");
        plot_sentiment_scatter(&path, &run.summaries)?;
        info!("Wrote scatter plot to {:?}", path);
        result.plot = Some(path);
    }

    Ok(result)
}

/// Summaries to group for each output file.
///
/// Grouping by category spans the whole run; party and faction groupings get
/// one file per category.
fn summaries_for_grouping(run: &RunReport, grouping: GroupingKey) -> Vec<(String, Vec<SpeechSummary>)> {
    if grouping == GroupingKey::Category {
        return vec![(run.label.clone(), run.summaries.clone())];
    }

    let mut by_category: BTreeMap<String, Vec<SpeechSummary>> = BTreeMap::new();
    for summary in &run.summaries {
        let category = summary.category.clone().unwrap_or_else(|| run.label.clone());
        by_category.entry(category).or_default().push(summary.clone());
    }
    by_category.into_iter().collect()
}
