use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;
use wsd_lexicon::SenseInventory;
use wsd_text::{RuleTagger, SlashTagger, Tagger};

use wsd_trainingset::{
    LoadMode, NounOutcome, NounReport, OutputLayout, PipelineError, Settings, bootstrap_nouns,
    build_vocabulary, extract_corpus, select_focus,
};

const DEFAULT_LEXICON: &str = "lexicon.txt";

#[derive(Parser)]
#[command(name = "create-td", about = "Build WSD training sets from raw text")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract context windows into per-noun unlabelled corpora.
    Extract {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Bootstrap sense sets and write labelled training sets.
    Bootstrap {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Extract, then bootstrap.
    Run {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Number the words of every labelled training set into vocab.txt.
    Vocab {
        #[arg(long, default_value = "out")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Directory of input documents (*.txt).
    #[arg(long)]
    input: PathBuf,
    #[arg(long, value_enum, default_value_t = TaggerKind::Rule)]
    tagger: TaggerKind,
}

#[derive(Args)]
struct CommonArgs {
    #[arg(long, default_value = "out")]
    output: PathBuf,
    #[arg(long, default_value = DEFAULT_LEXICON)]
    lexicon: PathBuf,
    /// Properties file with windowSize, failThreshold, ...
    #[arg(long)]
    settings: Option<PathBuf>,
    #[arg(long)]
    window_size: Option<usize>,
    #[arg(long)]
    fail_threshold: Option<f64>,
    #[arg(long)]
    max_iterations: Option<usize>,
    #[arg(long)]
    load_mode: Option<LoadMode>,
    /// Focus nouns; all lexicon nouns when empty.
    words: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum TaggerKind {
    /// Built-in rule tagger over raw text.
    Rule,
    /// Pre-tagged `surface/TAG` input.
    Slash,
}

impl TaggerKind {
    fn build(self) -> Box<dyn Tagger> {
        match self {
            TaggerKind::Rule => Box::new(RuleTagger),
            TaggerKind::Slash => Box::new(SlashTagger),
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Extract { input, common } => {
            let job = Job::prepare(&common)?;
            job.extract(&input)?;
        }
        Command::Bootstrap { common } => {
            let job = Job::prepare(&common)?;
            job.bootstrap();
        }
        Command::Run { input, common } => {
            let job = Job::prepare(&common)?;
            job.extract(&input)?;
            job.bootstrap();
        }
        Command::Vocab { output } => {
            let layout = OutputLayout::new(output);
            let vocab = build_vocabulary(&layout)?;
            vocab.write(&layout.vocab())?;
            info!("wrote {} words to {}", vocab.len(), layout.vocab().display());
        }
    }
    Ok(())
}

/// Everything resolved before any processing starts.
struct Job {
    settings: Settings,
    layout: OutputLayout,
    inventory: SenseInventory,
    focus: Vec<String>,
}

impl Job {
    fn prepare(args: &CommonArgs) -> Result<Self, PipelineError> {
        let settings = load_settings(args)?;
        info!(
            "window {} (min {}), fail threshold {:.1}%, max iterations {}",
            settings.window_size,
            settings.min_valid_size(),
            settings.fail_threshold,
            settings.max_iterations
        );

        let inventory = load_lexicon(&args.lexicon)?;
        let focus = select_focus(&inventory, &args.words)?;
        info!("{} focus nouns", focus.len());
        Ok(Self {
            settings,
            layout: OutputLayout::new(&args.output),
            inventory,
            focus,
        })
    }

    fn extract(&self, input: &InputArgs) -> Result<(), PipelineError> {
        let tagger = input.tagger.build();
        let report = extract_corpus(
            &input.input,
            &self.layout,
            &self.inventory,
            &self.focus,
            &self.settings,
            tagger.as_ref(),
        )?;
        for noun in &report.failed_nouns {
            warn!("{noun}: extraction output incomplete");
        }
        Ok(())
    }

    fn bootstrap(&self) {
        let start = Instant::now();
        let reports = bootstrap_nouns(&self.layout, &self.inventory, &self.focus, &self.settings);
        summarize(&reports);
        info!("bootstrapping done in {} ms", start.elapsed().as_millis());
    }
}

fn load_settings(args: &CommonArgs) -> Result<Settings, PipelineError> {
    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    settings.apply_env();
    if let Some(size) = args.window_size {
        settings.window_size = size;
    }
    if let Some(threshold) = args.fail_threshold {
        settings.fail_threshold = threshold;
    }
    if let Some(max) = args.max_iterations {
        settings.max_iterations = max;
    }
    if let Some(mode) = args.load_mode {
        settings.load_mode = mode;
    }
    Ok(settings)
}

fn load_lexicon(path: &Path) -> Result<SenseInventory, PipelineError> {
    if !path.is_file() {
        return Err(PipelineError::MissingLexicon(path.to_path_buf()));
    }
    let start = Instant::now();
    let inventory = SenseInventory::load(path).map_err(PipelineError::Lexicon)?;
    info!(
        "lexicon {} loaded in {} ms: {} nouns",
        path.display(),
        start.elapsed().as_millis(),
        inventory.len()
    );
    Ok(inventory)
}

fn summarize(reports: &[NounReport]) {
    let (mut labelled, mut skipped, mut failed) = (0, 0, 0);
    for report in reports {
        match &report.outcome {
            NounOutcome::Labelled(summary) => {
                labelled += 1;
                info!(
                    "{}: {:.2}% -> {:.2}% after {} passes",
                    report.noun,
                    summary.initial.success_rate(),
                    summary.last.success_rate(),
                    summary.convergence.passes
                );
            }
            NounOutcome::AlreadyLabelled | NounOutcome::NoCorpus => skipped += 1,
            NounOutcome::Failed(_) => failed += 1,
        }
    }
    info!("{labelled} nouns labelled, {skipped} skipped, {failed} failed");
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
