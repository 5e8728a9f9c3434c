//! Populates the Qdrant collection from a JSON array of articles, or from
//! live RSS feeds.
//!
//! ```bash
//! cargo run --bin ingest -- --file data/articles.json --recreate
//! cargo run --bin ingest -- --rss --max-articles 50 --snapshot articles_fetched.json
//! ```

use std::error::Error;
use std::path::PathBuf;

use ai_llm_service::LlmServiceProfiles;
use ai_llm_service::config::default_config::{config_gemini_generation, config_jina_embedding};
use clap::Parser;
use rag_store::feeds::{DEFAULT_FEEDS, DEFAULT_MAX_ARTICLES, FEED_PAUSE, FeedFetcher, write_snapshot};
use rag_store::ingest::{IngestOptions, ingest_articles, load_articles};
use rag_store::{Article, DistanceKind, QdrantFacade, RagConfig};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "ingest", about = "Embed news articles and upsert them into Qdrant")]
struct Cli {
    /// JSON file with an array of `{id?, title?, url?, text}` objects.
    #[arg(short, long, required_unless_present = "rss", conflicts_with = "rss")]
    file: Option<PathBuf>,

    /// Collect articles from RSS feeds instead of a file. Always recreates
    /// the collection with Cosine distance.
    #[arg(long)]
    rss: bool,

    /// Feed URL to collect (repeatable); defaults to four world-news feeds.
    #[arg(long = "feed", requires = "rss")]
    feeds: Vec<String>,

    /// Maximum number of articles collected across all feeds.
    #[arg(long, default_value_t = DEFAULT_MAX_ARTICLES, requires = "rss")]
    max_articles: usize,

    /// Where the collected articles are written as JSON.
    #[arg(long, default_value = "articles_fetched.json", requires = "rss")]
    snapshot: PathBuf,

    /// Drop and recreate the collection before upserting.
    #[arg(long)]
    recreate: bool,

    /// Characters of article text sent to the embedding model.
    #[arg(long, default_value_t = 1000)]
    max_text_chars: usize,

    /// Characters of article text stored in the point payload.
    #[arg(long, default_value_t = 400)]
    payload_chars: usize,

    /// Texts per embedding request.
    #[arg(long, default_value_t = 16)]
    batch: usize,
}

impl Cli {
    async fn articles(&self) -> Result<Vec<Article>, Box<dyn Error>> {
        if self.rss {
            let feeds: Vec<String> = if self.feeds.is_empty() {
                DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect()
            } else {
                self.feeds.clone()
            };
            let fetcher = FeedFetcher::new(FEED_PAUSE)?;
            return Ok(fetcher.collect(&feeds, self.max_articles).await);
        }

        let file = self.file.as_ref().ok_or("--file or --rss is required")?;
        let articles = load_articles(file)?;
        info!("read {} article(s) from {}", articles.len(), file.display());
        Ok(articles)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    api::telemetry::init("info");

    let cli = Cli::parse();

    let mut rag_cfg = RagConfig::from_env()?;
    if cli.rss {
        rag_cfg.distance = DistanceKind::Cosine;
    }
    let llm = LlmServiceProfiles::new(config_jina_embedding()?, config_gemini_generation()?)?;
    let facade = QdrantFacade::new(&rag_cfg)?;

    let articles = cli.articles().await?;
    if cli.rss && articles.is_empty() {
        warn!("no articles collected; check the feed URLs");
        return Ok(());
    }

    let opts = IngestOptions {
        recreate: cli.recreate || cli.rss,
        max_text_chars: cli.max_text_chars,
        payload_chars: cli.payload_chars,
        embed_batch: cli.batch,
        ..IngestOptions::default()
    };
    let report = ingest_articles(&facade, &llm, &articles, &opts).await?;

    info!(
        upserted = report.upserted,
        skipped = report.skipped,
        dimension = report.dimension,
        collection = %rag_cfg.collection,
        "ingest complete"
    );

    if cli.rss {
        write_snapshot(&cli.snapshot, &articles)?;
        info!("wrote {} article(s) to {}", articles.len(), cli.snapshot.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn rss_mode_defaults() {
        let cli = Cli::try_parse_from(["ingest", "--rss"]).unwrap();
        assert!(cli.rss && cli.file.is_none() && cli.feeds.is_empty());
        assert_eq!(cli.max_articles, 50);
        assert_eq!(cli.snapshot, PathBuf::from("articles_fetched.json"));
    }

    #[test]
    fn a_source_is_required_and_exclusive() {
        assert!(Cli::try_parse_from(["ingest"]).is_err());
        assert!(Cli::try_parse_from(["ingest", "--rss", "--file", "a.json"]).is_err());
        assert!(Cli::try_parse_from(["ingest", "--file", "a.json", "--feed", "http://x.test/rss"]).is_err());

        let cli = Cli::try_parse_from(["ingest", "-f", "a.json", "--recreate"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("a.json")));
        assert!(cli.recreate && !cli.rss);
    }
}
