use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use redeton::{
    analyse_document, analyse_documents, execute_report, parse_speech_file, report_timestamp,
    ApiConfig, ClassifierConfig, DateRange, FactionTable, GroupingKey, HttpSentimentClassifier,
    OpenParliamentClient, ReportConfig, RunReport, SearchQuery,
};

#[derive(Parser)]
#[command(name = "redeton")]
#[command(author, version, about = "Sentiment of parliamentary speeches, weighted by speaking time", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse speeches matching one or more search queries
    Analyse {
        /// Search keyword; repeat for several categories
        #[arg(short, long = "query", default_values_t = ["Ausländer".to_string(), "Budget".to_string()])]
        queries: Vec<String>,

        /// Only search speeches by this faction (name or identifier)
        #[arg(long)]
        faction: Option<String>,

        /// Grouping of the summary files; repeat for several
        #[arg(long = "group-by", value_enum, default_value = "party")]
        group_by: Vec<GroupBy>,

        #[command(flatten)]
        search: SearchArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Analyse a query once per faction and compare the factions
    Factions {
        /// Search keyword
        #[arg(short, long)]
        query: String,

        #[command(flatten)]
        search: SearchArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Analyse a single speech
    Speech {
        /// Speech identifier or full API URL
        #[arg(long, required_unless_present = "input", conflicts_with = "input")]
        id: Option<String>,

        /// Speech document saved as JSON
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Maximum number of speeches per search
    #[arg(short, long, default_value = "20")]
    limit: usize,

    /// First day of the search range (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day of the search range (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[derive(Args)]
struct OutputArgs {
    /// Directory for all reports
    #[arg(short, long, default_value = "results")]
    output_dir: PathBuf,

    /// Draw a positive/negative scatter plot
    #[arg(long)]
    plot: bool,

    /// Skip the per-speech sentence files
    #[arg(long)]
    no_sentences: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupBy {
    Category,
    Party,
    Faction,
}

impl From<GroupBy> for GroupingKey {
    fn from(value: GroupBy) -> Self {
        match value {
            GroupBy::Category => GroupingKey::Category,
            GroupBy::Party => GroupingKey::Party,
            GroupBy::Faction => GroupingKey::Faction,
        }
    }
}

/// First sitting of the German Bundestag
const EARLIEST_DATE: (i32, u32, u32) = (1949, 9, 7);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyse {
            queries,
            faction,
            group_by,
            search,
            output,
        } => {
            setup_logging(output.verbose);
            let groupings = group_by.into_iter().map(GroupingKey::from).collect();
            run_analyse(queries, faction, groupings, search, output).await
        }
        Commands::Factions {
            query,
            search,
            output,
        } => {
            setup_logging(output.verbose);
            run_factions(query, search, output).await
        }
        Commands::Speech { id, input, output } => {
            setup_logging(output.verbose);
            run_speech(id, input, output).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn report_config(output: &OutputArgs, groupings: Vec<GroupingKey>) -> ReportConfig {
    ReportConfig {
        output_dir: output.output_dir.clone(),
        groupings,
        write_sentences: !output.no_sentences,
        plot: output.plot,
    }
}

fn date_range(search: &SearchArgs) -> Result<Option<DateRange>> {
    if search.from.is_none() && search.to.is_none() {
        return Ok(None);
    }
    let (y, m, d) = EARLIEST_DATE;
    let from = match search.from {
        Some(date) => date,
        None => NaiveDate::from_ymd_opt(y, m, d).context("Invalid earliest date")?,
    };
    let to = search
        .to
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    DateRange::from_dates(from, to).map(Some)
}

fn base_query(text: &str, search: &SearchArgs) -> Result<SearchQuery> {
    let mut query = SearchQuery::new(text).with_limit(search.limit);
    if let Some(range) = date_range(search)? {
        query = query.with_date_range(range);
    }
    Ok(query)
}

async fn run_analyse(
    queries: Vec<String>,
    faction: Option<String>,
    groupings: Vec<GroupingKey>,
    search: SearchArgs,
    output: OutputArgs,
) -> Result<()> {
    let client = OpenParliamentClient::new(ApiConfig::from_env());
    let classifier = HttpSentimentClassifier::new(ClassifierConfig::from_env());
    let factions = FactionTable::default();

    let faction_id = match faction.as_deref() {
        Some(name) => {
            let resolved = factions.resolve(name).with_context(|| {
                let known: Vec<&str> = factions.iter().map(|f| f.name).collect();
                format!("Unknown faction {:?} (known: {})", name, known.join(", "))
            })?;
            info!("Filtering by faction {} ({})", resolved.name, resolved.id);
            Some(resolved.id)
        }
        None => None,
    };

    let mut run = RunReport {
        label: queries.join("+"),
        ..Default::default()
    };

    for text in &queries {
        let mut query = base_query(text, &search)?;
        if let Some(id) = faction_id {
            query = query.with_faction(id);
        }

        let documents = client.search(&query).await?;
        if documents.is_empty() {
            warn!("No speeches found for {:?}", text);
            continue;
        }
        analyse_documents(&classifier, &documents, Some(text.as_str()), &mut run).await?;
    }

    write_reports(&run, &report_config(&output, groupings))
}

async fn run_factions(query_text: String, search: SearchArgs, output: OutputArgs) -> Result<()> {
    let client = OpenParliamentClient::new(ApiConfig::from_env());
    let classifier = HttpSentimentClassifier::new(ClassifierConfig::from_env());
    let factions = FactionTable::default();

    let mut run = RunReport {
        label: query_text.clone(),
        ..Default::default()
    };

    for faction in factions.iter() {
        info!("Faction {}: searching {:?}", faction.name, query_text);
        let query = base_query(&query_text, &search)?.with_faction(faction.id);

        let documents = client.search(&query).await?;
        if documents.is_empty() {
            warn!("No speeches found for faction {}", faction.name);
            continue;
        }
        analyse_documents(&classifier, &documents, Some(query_text.as_str()), &mut run).await?;
    }

    write_reports(&run, &report_config(&output, vec![GroupingKey::Faction]))
}

async fn run_speech(id: Option<String>, input: Option<PathBuf>, output: OutputArgs) -> Result<()> {
    let classifier = HttpSentimentClassifier::new(ClassifierConfig::from_env());

    let document = match (id, input) {
        (_, Some(path)) => {
            info!("Loading speech from {:?}", path);
            parse_speech_file(&path).context("Failed to parse speech document")?
        }
        (Some(id), None) => {
            let client = OpenParliamentClient::new(ApiConfig::from_env());
            client.fetch_speech(&id).await?
        }
        (None, None) => anyhow::bail!("Either --id or --input is required"),
    };

    let analysed = analyse_document(&classifier, &document, None).await?;
    let mut run = RunReport {
        label: document.data.id.clone(),
        ..Default::default()
    };
    match analysed.summary {
        Some(summary) => run.summaries.push(summary),
        None => {
            warn!("Speech {} has no main-speaker sentences", document.data.id);
            run.dropped.push(document.data.id.clone());
        }
    }
    run.speeches.push(analysed.speech);

    write_reports(&run, &report_config(&output, Vec::new()))
}

fn write_reports(run: &RunReport, config: &ReportConfig) -> Result<()> {
    let timestamp = report_timestamp();
    let result = execute_report(run, config, &timestamp)?;

    info!(
        "Complete: {} speeches analysed, {} summarized, {} dropped",
        run.speeches.len(),
        run.summaries.len(),
        run.dropped.len()
    );
    info!("Reports written to {:?}", result.run_dir);
    for path in &result.grouped_files {
        info!("Grouped summary: {:?}", path);
    }
    if let Some(plot) = &result.plot {
        info!("Scatter plot: {:?}", plot);
    }

    Ok(())
}
