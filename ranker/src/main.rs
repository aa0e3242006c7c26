use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use ranker::report::{write_jsonl, write_table};
use ranker::{load_seeds, local_targets, rank, score_targets, FileFetcher, HttpFetcher, HttpOptions, RunOptions, Target};
use scoring::{FetchContent, KeywordCatalog};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "ranker")]
#[command(about = "Fetch pages, score them against weighted keywords, and rank them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and rank the URLs listed in a seeds file
    Web {
        /// Path to a file with one URL (or NAME<TAB>URL) per line
        #[arg(long)]
        seeds: PathBuf,
        /// Request timeout seconds
        #[arg(long, default_value_t = 12)]
        timeout_secs: u64,
        /// User-Agent string sent with every request
        #[arg(long, default_value = "keyword-ranker/0.1")]
        user_agent: String,
        /// Largest response body accepted, in bytes
        #[arg(long, default_value_t = 2 * 1024 * 1024)]
        max_bytes: usize,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Rank local text/HTML files from a file or directory
    Local {
        /// Input path (file or directory)
        #[arg(long)]
        input: PathBuf,
        /// File extensions to include when walking a directory
        #[arg(long, value_delimiter = ',', default_value = "txt,html,htm")]
        ext: Vec<String>,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Print the effective keyword catalog as JSON
    Catalog {
        #[command(flatten)]
        catalog: CatalogArgs,
    },
}

#[derive(Args)]
struct CatalogArgs {
    /// JSON keyword catalog ([{"term": ..., "weight": ...}]); builtin list when unset
    #[arg(long, env = "KEYWORD_CATALOG")]
    catalog: Option<PathBuf>,
}

#[derive(Args)]
struct CommonArgs {
    #[command(flatten)]
    catalog: CatalogArgs,
    /// Output file; stdout when unset
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
    /// Only report the N best pages
    #[arg(long)]
    top: Option<usize>,
    /// Number of pages fetched at once
    #[arg(long, default_value_t = 8)]
    concurrency: usize,
    /// Score raw markup instead of extracted page text
    #[arg(long, default_value_t = false)]
    raw: bool,
    /// Abort on the first failed fetch
    #[arg(long, default_value_t = false)]
    fail_fast: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Jsonl,
    Table,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Web { seeds, timeout_secs, user_agent, max_bytes, common } => {
            let targets = load_seeds(&seeds)?;
            let opts = HttpOptions {
                user_agent,
                timeout: Duration::from_secs(timeout_secs),
                max_bytes,
                extract_text: !common.raw,
            };
            let fetcher = HttpFetcher::new(opts, tokio::runtime::Handle::current())?;
            run(targets, fetcher, &common).await
        }
        Commands::Local { input, ext, common } => {
            let targets = local_targets(&input, &ext)?;
            run(targets, FileFetcher { extract_text: !common.raw }, &common).await
        }
        Commands::Catalog { catalog } => {
            let catalog = KeywordCatalog::load(catalog.catalog.as_deref())?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, &catalog)?;
            out.write_all(b"\n")?;
            Ok(())
        }
    }
}

async fn run<F>(targets: Vec<Target>, fetcher: F, common: &CommonArgs) -> Result<()>
where
    F: FetchContent + Send + Sync + 'static,
{
    let catalog = Arc::new(KeywordCatalog::load(common.catalog.catalog.as_deref())?);
    tracing::info!(targets = targets.len(), keywords = catalog.len(), concurrency = common.concurrency, "ranking");

    let run_opts = RunOptions { concurrency: common.concurrency, fail_fast: common.fail_fast };
    let outcome = score_targets(targets, Arc::new(fetcher), catalog.clone(), &run_opts).await?;
    for f in &outcome.failures {
        tracing::warn!(url = %f.url, error = %f.error, "not ranked");
    }

    let mut ranked = rank(outcome.pages, &catalog);
    if let Some(n) = common.top { ranked.truncate(n); }

    let mut out: Box<dyn Write> = match &common.output {
        Some(path) => {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).ok();
            }
            Box::new(BufWriter::new(File::create(path)?))
        }
        None => Box::new(io::stdout().lock()),
    };
    match common.format {
        Format::Jsonl => write_jsonl(&mut out, &ranked)?,
        Format::Table => write_table(&mut out, &ranked)?,
    }
    Ok(())
}
