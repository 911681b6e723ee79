//! bayes-spam CLI: train and evaluate a naive-Bayes spam classifier.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use bayes_spam::config::ClassifierConfig;
use bayes_spam::corpus::{CorpusMode, load_corpus};
use bayes_spam::evaluate::evaluate_corpus;
use bayes_spam::tokenize::tokenize;

#[derive(Parser)]
#[command(name = "bayes-spam", version, about = "Naive-Bayes spam classifier")]
struct Cli {
    /// TOML config file (see `bayes-spam init-config`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Additive smoothing constant k (overrides the config file).
    #[arg(long, global = true)]
    smoothing: Option<f64>,

    /// Seed for the train/test shuffle (overrides the config file).
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the tokens extracted from a text.
    Tokenize {
        /// Text to tokenize.
        text: String,
    },

    /// Split a corpus, train on one part and report accuracy on the rest.
    Evaluate {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Share of the corpus used for training.
        #[arg(long)]
        train_fraction: Option<f64>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Train on a whole corpus and score the given texts.
    Predict {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Texts to classify.
        #[arg(required = true)]
        texts: Vec<String>,
    },

    /// Write the default configuration as TOML.
    InitConfig {
        /// Destination path.
        path: PathBuf,
    },
}

/// Options shared by the commands that train on a corpus.
#[derive(Args)]
struct CorpusArgs {
    /// Corpus root laid out as <root>/<folder>/<email-file>.
    #[arg(long = "corpus")]
    root: PathBuf,

    /// Spam probability above which a message is called spam.
    #[arg(long)]
    threshold: Option<f64>,

    /// Which parts of each email to use: "subject" or "subject-and-body".
    #[arg(long)]
    mode: Option<CorpusMode>,
}

impl CorpusArgs {
    fn apply(&self, config: &mut ClassifierConfig) {
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(mode) = self.mode {
            config.corpus_mode = mode;
        }
    }
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ClassifierConfig::load(path)?,
        None => ClassifierConfig::default(),
    };
    if let Some(k) = cli.smoothing {
        config.smoothing = k;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    match cli.command {
        Commands::Tokenize { text } => {
            let mut tokens: Vec<String> = tokenize(&text).into_iter().collect();
            tokens.sort();
            if tokens.is_empty() {
                println!("No tokens.");
            } else {
                println!("Tokens ({}):", tokens.len());
                for token in &tokens {
                    println!("  {token}");
                }
            }
        }

        Commands::Evaluate {
            corpus,
            train_fraction,
            json,
        } => {
            corpus.apply(&mut config);
            if let Some(fraction) = train_fraction {
                config.train_fraction = fraction;
            }

            let report = evaluate_corpus(&corpus.root, &config)?;
            if json {
                let json = serde_json::to_string_pretty(&report).into_diagnostic()?;
                println!("{json}");
            } else {
                println!("{report}");
            }
        }

        Commands::Predict { corpus, texts } => {
            corpus.apply(&mut config);
            config.validate()?;

            let data = load_corpus(&corpus.root, config.corpus_mode)?;
            let mut model = config.build_classifier()?;
            model.train(&data);
            println!("{}", model.stats());
            println!();

            for text in &texts {
                let p = model.predict(text);
                let label = if p > config.threshold { "spam" } else { "ham" };
                println!("  {p:.4} [{label}] {text}");
            }
        }

        Commands::InitConfig { path } => {
            ClassifierConfig::default().save(&path)?;
            println!("Wrote default config to {}", path.display());
        }
    }

    Ok(())
}
