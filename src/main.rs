//! Brand Sentiment Analyzer CLI entrypoint.
//! Fetches posts, extracts brand mentions, scores them and prints a leaderboard.
//!
//! Exit status: 0 on success (including "no brand mentions"), 1 on any fatal error.

use anyhow::{bail, Result};
use brand_sentiment_analyzer::{
    catalog::BrandCatalog,
    config::AppConfig,
    engine,
    ingest::{
        self,
        providers::{FixtureProvider, RedditProvider},
        types::PostSource,
    },
    lexicon::{ensure_lexicon, LexiconSource},
    mentions::MentionExtractor,
    metrics::Metrics,
    report,
    sentiment::LexiconScorer,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "brand-sentiment-analyzer")]
#[command(about = "Analyze brand sentiment in a forum community", long_about = None)]
struct CliArgs {
    /// Number of posts to analyze (default: MAX_POSTS or 100)
    #[arg(long)]
    posts: Option<usize>,

    /// Subreddit to read (default: SUBREDDIT or pcbuilds)
    #[arg(long)]
    subreddit: Option<String>,

    /// Brand catalog file, JSON or TOML (default: BRANDS_FILE or config/brands.json)
    #[arg(long)]
    brands: Option<PathBuf>,

    /// Read posts from a JSON file instead of the Reddit API
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Seconds to wait after each fetched submission
    #[arg(long)]
    delay: Option<u64>,

    /// Reject brands listed under more than one category
    #[arg(long)]
    strict_catalog: bool,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Print Prometheus metrics for the run after the report
    #[arg(long)]
    metrics: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl CliArgs {
    fn apply(&self, cfg: &mut AppConfig) {
        if let Some(n) = self.posts {
            cfg.max_posts = n;
        }
        if let Some(s) = &self.subreddit {
            cfg.subreddit = s.trim_start_matches("r/").to_string();
        }
        if let Some(p) = &self.brands {
            cfg.brands_file = p.clone();
        }
        if let Some(d) = self.delay {
            cfg.rate_limit_delay = Duration::from_secs(d);
        }
        if self.strict_catalog {
            cfg.strict_catalog = true;
        }
    }
}

/// Targets used by the library's structured log events.
const LOG_TARGETS: [&str; 6] = [
    "brand_sentiment_analyzer",
    "catalog",
    "mentions",
    "lexicon",
    "ingest",
    "engine",
];

/// Logs go to stderr so stdout carries only the report.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let mut directives: Vec<String> = LOG_TARGETS.iter().map(|t| format!("{t}={level}")).collect();
    directives.push("warn".to_string());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives.join(",")));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

async fn run(args: CliArgs) -> Result<ExitCode> {
    let mut cfg = AppConfig::from_env()?;
    args.apply(&mut cfg);

    let metrics = if args.metrics {
        Some(Metrics::init(cfg.max_posts)?)
    } else {
        None
    };

    if !args.json {
        print!("{}", report::header(&cfg.subreddit));
    }
    if args.verbose {
        info!(
            subreddit = %cfg.subreddit,
            max_posts = cfg.max_posts,
            delay_secs = cfg.rate_limit_delay.as_secs(),
            brands_file = %cfg.brands_file.display(),
            "configuration"
        );
    }

    // Fail closed on catalog and lexicon before touching the network.
    let catalog = BrandCatalog::load(&cfg.brands_file, cfg.strict_catalog)?;
    if catalog.is_empty() {
        warn!(path = %cfg.brands_file.display(), "brand catalog has no brands");
    }
    let extractor = MentionExtractor::new(&catalog)?;

    let lexicon = ensure_lexicon(&LexiconSource {
        path: cfg.lexicon_path.clone(),
        url: cfg.lexicon_url.clone(),
    })
    .await?;
    let scorer = LexiconScorer::new(lexicon);

    let provider: Box<dyn PostSource> = match &args.fixture {
        Some(path) => Box::new(FixtureProvider::from_path(path)),
        None => Box::new(RedditProvider::new(&cfg)?),
    };

    info!(provider = provider.name(), limit = cfg.max_posts, "fetching posts");
    let posts = ingest::run_once(provider.as_ref(), cfg.max_posts).await?;
    if posts.is_empty() {
        bail!("no posts found; check the forum API configuration");
    }

    let snippets = ingest::collect_snippets(&posts);
    info!(posts = posts.len(), snippets = snippets.len(), "extracting brand mentions");

    let report = engine::analyze_snippets(&snippets, &extractor, &scorer)?;

    if args.json {
        println!("{}", report::render_json(&report)?);
    } else {
        print!("{}", report::render_text(&report));
        if !report.is_empty() {
            println!(
                "\nAnalysis completed at {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
            );
        }
    }

    if let Some(m) = metrics {
        println!("\n{}", m.render());
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local/dev; missing file is fine.
    let _ = dotenvy::dotenv();

    let args = CliArgs::parse();
    let verbose = args.verbose;
    init_tracing(verbose);

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            if verbose {
                eprintln!("\nError: {e:?}");
            } else {
                eprintln!("\nError: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
