use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use nahw_idafa::{
    answer_sets, corpus_to_json, score, to_json, CorpusProcessor, DetectorConfig, ExportOptions,
    IdafaDetector, CONFIG_ENV,
};
use nahw_morph::{compare_ids, Aggregator, Lexicon, Segment};
use tracing::{info, warn};
use tracing_subscriber::prelude::*;

#[derive(Debug, Parser)]
#[command(
    name = "nahw",
    about = "Detect idafa constructions in tagged classical-Arabic segments"
)]
struct Cli {
    /// Path to the detector config file (JSON). Falls back to the file named
    /// by NAHW_CONFIG, then to the built-in defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Group segments into display units
    Aggregate {
        /// JSON array of segments
        input: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// Detect constructions in one passage
    Detect {
        /// JSON array of segments
        input: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Detect constructions surah by surah
    Corpus {
        /// JSON array of segments
        input: PathBuf,
        /// Process surahs on the rayon pool
        #[arg(long)]
        parallel: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Score a selection of segment ids against detected constructions
    Score {
        /// JSON array of segments the answers are detected from
        input: PathBuf,
        /// Selected segment ids
        #[arg(long, num_args = 1.., required = true)]
        selection: Vec<String>,
        #[arg(long)]
        lexicon: Option<PathBuf>,
    },
}

#[derive(Debug, clap::Args)]
struct OutputArgs {
    /// Lexicon JSON keyed by segment id
    #[arg(long)]
    lexicon: Option<PathBuf>,
    #[arg(long)]
    pretty: bool,
    #[arg(long)]
    no_statistics: bool,
    #[arg(long)]
    no_chains: bool,
}

impl OutputArgs {
    fn export_options(&self) -> ExportOptions {
        ExportOptions {
            include_statistics: !self.no_statistics,
            include_chains: !self.no_chains,
            prettify: self.pretty,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_observability(cli.log_json);

    let mut config = match &cli.config {
        Some(path) => DetectorConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DetectorConfig::from_env_or_default()
            .with_context(|| format!("loading config from {CONFIG_ENV}"))?,
    };

    match cli.command {
        Commands::Aggregate { input, pretty } => {
            let mut segments = read_segments(&input)?;
            segments.sort_by(|a, b| compare_ids(&a.id, &b.id));
            let units = Aggregator::default().aggregate(&segments);
            info!(segments = segments.len(), units = units.len(), "aggregated");
            print_json(&units, pretty)?;
        }
        Commands::Detect { input, output } => {
            let segments = by_id(read_segments(&input)?);
            let lexicon = read_lexicon(output.lexicon.as_deref())?;
            let result = IdafaDetector::new(config).detect(&segments, lexicon.as_ref())?;
            for note in &result.notes {
                warn!("{}", note);
            }
            println!("{}", to_json(&result, &output.export_options())?);
        }
        Commands::Corpus {
            input,
            parallel,
            output,
        } => {
            config.parallel_corpus |= parallel;
            let segments = read_segments(&input)?;
            let lexicon = read_lexicon(output.lexicon.as_deref())?;
            let detector = IdafaDetector::new(config);
            let mut processor = CorpusProcessor::new(&detector);
            if let Some(lexicon) = &lexicon {
                processor = processor.with_lexicon(lexicon);
            }
            let result = processor.process(&segments)?;
            println!("{}", corpus_to_json(&result, &output.export_options())?);
        }
        Commands::Score {
            input,
            selection,
            lexicon,
        } => {
            let segments = by_id(read_segments(&input)?);
            let lexicon = read_lexicon(lexicon.as_deref())?;
            let result = IdafaDetector::new(config).detect(&segments, lexicon.as_ref())?;
            let selection: HashSet<String> = selection.into_iter().collect();
            let answer = score(&answer_sets(&result), &selection);
            print_json(&answer, false)?;
        }
    }

    Ok(())
}

fn init_observability(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,nahw_idafa=debug".into());

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_line_number(true)
            .json()
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn read_segments(path: &Path) -> anyhow::Result<Vec<Segment>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing segments in {}", path.display()))
}

fn read_lexicon(path: Option<&Path>) -> anyhow::Result<Option<Lexicon>> {
    path.map(|path| {
        Lexicon::from_path(path).with_context(|| format!("loading lexicon {}", path.display()))
    })
    .transpose()
}

fn by_id(segments: Vec<Segment>) -> HashMap<String, Segment> {
    let mut map = HashMap::with_capacity(segments.len());
    for segment in segments {
        if let Some(previous) = map.insert(segment.id.clone(), segment) {
            warn!(segment = %previous.id, "duplicate segment id, keeping the last record");
        }
    }
    map
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
