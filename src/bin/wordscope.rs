//! Command-line host for the wordscope core.
//!
//! Reads JSON payloads from files, runs scoring or fetching, and prints JSON results to
//! stdout. Logs go to stderr.
//!
//! Usage:
//!   wordscope difficulty --lang es --input texts.json --ranks ranks.csv --known known.json
//!   wordscope learnability --lang es --input texts.json --bookmarks bookmarks.json
//!   wordscope known-words --lang es --bookmarks bookmarks.json --ranks ranks.csv
//!   wordscope learning --lang es --bookmarks bookmarks.json
//!   wordscope fetch --input urls.json --timeout 5
//!   wordscope page https%3A%2F%2Fexample.com%2F
//!   wordscope translate --from de --to en Hund
//!   wordscope languages

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wordscope::config::Config;
use wordscope::fetch::{FetchBatchRequest, Fetcher, HttpPageSource};
use wordscope::history::{self, Bookmark};
use wordscope::scoring::{DifficultyRequest, LearnabilityRequest};
use wordscope::snapshot::probability_cache;
use wordscope::tokenizer::decode_word;
use wordscope::translate::{GoogleTranslator, Translator};
use wordscope::{KnownProbabilities, LanguageRegistry, RankTable, Scorer};

#[derive(Parser)]
#[command(name = "wordscope")]
#[command(about = "Text difficulty scoring and article fetching", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Median and average difficulty for a batch of texts
    Difficulty {
        #[arg(long)]
        lang: String,
        /// JSON: {"texts": [{"id", "content"}], "rank_boundary"?, "personalized"?}
        #[arg(long)]
        input: PathBuf,
        /// CSV with a language,word,rank header
        #[arg(long)]
        ranks: PathBuf,
        /// JSON object of word -> probability the user knows it
        #[arg(long)]
        known: Option<PathBuf>,
    },
    /// Share of each text made of words the user is studying
    Learnability {
        #[arg(long)]
        lang: String,
        /// JSON: {"texts": [{"id", "content"}]}
        #[arg(long)]
        input: PathBuf,
        /// JSON array of bookmarks with their exercise log
        #[arg(long)]
        bookmarks: PathBuf,
    },
    /// Mastered words that have a frequency rank
    KnownWords {
        #[arg(long)]
        lang: String,
        #[arg(long)]
        bookmarks: PathBuf,
        #[arg(long)]
        ranks: PathBuf,
    },
    /// Bookmarks still being learned
    Learning {
        #[arg(long)]
        lang: String,
        #[arg(long)]
        bookmarks: PathBuf,
    },
    /// Fetch article text and lead image for many URLs under one deadline
    Fetch {
        /// JSON: {"urls": [{"url", "id"}], "timeout"?}
        #[arg(long)]
        input: PathBuf,
        /// Seconds; overrides the payload's timeout
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Print the raw body of a (possibly percent-encoded) URL
    Page { url: String },
    /// Translate a single word
    Translate {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        word: String,
    },
    /// List the configured language codes
    Languages,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.runtime.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let registry = LanguageRegistry::from_config(&config);

    match cli.command {
        Commands::Difficulty {
            lang,
            input,
            ranks,
            known,
        } => {
            let request: DifficultyRequest = read_json(&input)?;
            let cache = probability_cache::<PathBuf>(&config.runtime);
            let known = match known {
                Some(path) => cache.get_or_load(&path, || read_json::<KnownProbabilities>(&path))?,
                None => Arc::new(KnownProbabilities::empty()),
            };
            let scorer = Scorer::new(registry, Arc::new(load_ranks(&ranks)?), config.scoring.clone());
            let options = request.options(scorer.config());
            let scores = scorer.difficulty_for_texts(&lang, request.texts, &options, &known)?;
            print_json(&scores)
        }
        Commands::Learnability {
            lang,
            input,
            bookmarks,
        } => {
            let request: LearnabilityRequest = read_json(&input)?;
            let bookmarks: Vec<Bookmark> = read_json(&bookmarks)?;
            let language = registry.resolve(&lang)?;
            let learning = history::learning_set(&bookmarks, &language);
            let scorer = Scorer::new(registry, Arc::new(RankTable::new()), config.scoring.clone());
            let scores = scorer.learnability_for_texts(&lang, request.texts, &learning)?;
            print_json(&scores)
        }
        Commands::KnownWords {
            lang,
            bookmarks,
            ranks,
        } => {
            let language = registry.resolve(&lang)?;
            let bookmarks: Vec<Bookmark> = read_json(&bookmarks)?;
            let ranks = load_ranks(&ranks)?;
            print_json(&history::known_words(&bookmarks, &language, &ranks))
        }
        Commands::Learning { lang, bookmarks } => {
            let language = registry.resolve(&lang)?;
            let bookmarks: Vec<Bookmark> = read_json(&bookmarks)?;
            print_json(&history::still_learning(&bookmarks, &language))
        }
        Commands::Fetch { input, timeout } => {
            let request: FetchBatchRequest = read_json(&input)?;
            let timeout = timeout.map(Duration::from_secs).or(request.timeout());
            let fetcher = Fetcher::http(&config.fetch)?;
            let results = fetcher.fetch_all(request.urls, timeout).await;
            print_json(&results)
        }
        Commands::Page { url } => {
            let source = HttpPageSource::new(&config.fetch)?;
            let page = source.get_page(&url).await?;
            info!(url = %page.url, bytes = page.body.len(), "Page fetched");
            println!("{}", page.body);
            Ok(())
        }
        Commands::Translate { from, to, word } => {
            let from = registry.resolve(&from)?;
            let to = registry.resolve(&to)?;
            let translator = GoogleTranslator::new(&config.translate)?;
            let translation = translator.translate(&decode_word(&word), &from, &to).await?;
            println!("{}", translation);
            Ok(())
        }
        Commands::Languages => print_json(&registry.available()),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn load_ranks(path: &Path) -> Result<RankTable> {
    RankTable::from_csv_path(path)
        .with_context(|| format!("Failed to load ranks from {}", path.display()))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
