//! Article collection from RSS/Atom feeds.
//!
//! Each entry becomes one [`Article`]: text is the entry summary (RSS
//! `description`) or, when that is blank, its full content; the id is the
//! entry guid, or its link when the feed carries no guid. Feeds that fail to
//! download or parse are skipped with a warning.

use std::path::Path;
use std::time::Duration;

use feed_rs::model::Entry;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::RagError;
use crate::record::Article;

/// World-news feeds collected when none are given.
pub const DEFAULT_FEEDS: [&str; 4] = [
    "http://feeds.reuters.com/reuters/topNews",
    "https://www.theguardian.com/world/rss",
    "https://rss.nytimes.com/services/xml/rss/nyt/World.xml",
    "https://feeds.bbci.co.uk/news/world/rss.xml",
];

/// Upper bound on articles collected across all feeds.
pub const DEFAULT_MAX_ARTICLES: usize = 50;

/// Pause between consecutive feed downloads.
pub const FEED_PAUSE: Duration = Duration::from_millis(300);

const FEED_TIMEOUT: Duration = Duration::from_secs(20);

/// Parses one RSS/Atom document into articles, in feed order.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<Article>, RagError> {
    let feed = feed_rs::parser::Builder::new()
        .id_generator(|links, _title, _uri| {
            links.first().map(|l| l.href.clone()).unwrap_or_default()
        })
        .build()
        .parse(bytes)?;
    Ok(feed.entries.into_iter().map(entry_to_article).collect())
}

fn entry_to_article(entry: Entry) -> Article {
    let url = entry.links.first().map(|l| l.href.clone());
    let text = entry
        .summary
        .map(|t| t.content)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| entry.content.and_then(|c| c.body))
        .unwrap_or_default();

    Article {
        id: Some(entry.id).filter(|id| !id.is_empty()).map(Value::String),
        title: entry.title.map(|t| t.content),
        url,
        text,
    }
}

/// Downloads feeds one after another.
pub struct FeedFetcher {
    client: reqwest::Client,
    pause: Duration,
}

impl FeedFetcher {
    /// Builds the HTTP client; `pause` is slept between consecutive feeds.
    pub fn new(pause: Duration) -> Result<Self, RagError> {
        let client = reqwest::Client::builder().timeout(FEED_TIMEOUT).build()?;
        Ok(Self { client, pause })
    }

    /// Downloads and parses a single feed.
    pub async fn fetch(&self, url: &str) -> Result<Vec<Article>, RagError> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        parse_feed(&body)
    }

    /// Collects up to `max` articles from `feeds` in order.
    ///
    /// Stops requesting feeds once `max` is reached. Failing feeds are logged
    /// and skipped, so the result may be empty.
    pub async fn collect<S: AsRef<str>>(&self, feeds: &[S], max: usize) -> Vec<Article> {
        let mut out: Vec<Article> = Vec::new();

        for (i, feed) in feeds.iter().enumerate() {
            if out.len() >= max {
                break;
            }
            if i > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }

            let url = feed.as_ref();
            match self.fetch(url).await {
                Ok(articles) => {
                    let room = max - out.len();
                    debug!(feed = %url, entries = articles.len(), "feed parsed");
                    out.extend(articles.into_iter().take(room));
                }
                Err(e) => warn!(feed = %url, error = %e, "feed skipped"),
            }
        }

        info!("collected {} article(s) from {} feed(s)", out.len(), feeds.len());
        out
    }
}

/// Writes the collected articles as pretty JSON, loadable by
/// [`crate::ingest::load_articles`].
pub fn write_snapshot(path: impl AsRef<Path>, articles: &[Article]) -> Result<(), RagError> {
    let json = serde_json::to_string_pretty(articles)?;
    std::fs::write(path.as_ref(), json)?;
    debug!("wrote {} article(s) to {:?}", articles.len(), path.as_ref());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const WORLD_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>World</title>
    <link>https://news.example.test/world</link>
    <description>World news</description>
    <item>
      <title>Rates held</title>
      <link>https://news.example.test/rates</link>
      <guid isPermaLink="false">rates-2024-06</guid>
      <description>The central bank held rates.</description>
    </item>
    <item>
      <title>Storm warning</title>
      <link>https://news.example.test/storm</link>
      <description>A storm is coming.</description>
    </item>
    <item>
      <title>Long read</title>
      <link>https://news.example.test/long</link>
      <guid>long-1</guid>
      <content:encoded>Full body only.</content:encoded>
    </item>
  </channel>
</rss>"#;

    fn fetcher() -> FeedFetcher {
        FeedFetcher::new(Duration::ZERO).unwrap()
    }

    async fn serve(server: &MockServer, at: &str, expected: u64) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/rss+xml")
                    .set_body_string(WORLD_RSS),
            )
            .expect(expected)
            .mount(server)
            .await;
    }

    #[test]
    fn rss_items_become_articles() {
        let articles = parse_feed(WORLD_RSS.as_bytes()).unwrap();
        assert_eq!(articles.len(), 3);

        let first = &articles[0];
        assert_eq!(first.id, Some(Value::String("rates-2024-06".into())));
        assert_eq!(first.title.as_deref(), Some("Rates held"));
        assert_eq!(first.url.as_deref(), Some("https://news.example.test/rates"));
        assert_eq!(first.text, "The central bank held rates.");

        // no guid: the link stands in for the id
        assert_eq!(articles[1].id, Some(Value::String("https://news.example.test/storm".into())));

        assert_eq!(articles[2].text, "Full body only.");
    }

    #[test]
    fn garbage_is_a_feed_error() {
        assert!(matches!(parse_feed(b"<html>not a feed</html>"), Err(RagError::Feed(_))));
    }

    #[tokio::test]
    async fn failing_feed_is_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        serve(&server, "/world", 1).await;

        let feeds = vec![format!("{}/down", server.uri()), format!("{}/world", server.uri())];
        let articles = fetcher().collect(&feeds, DEFAULT_MAX_ARTICLES).await;
        assert_eq!(articles.len(), 3);
        assert_eq!(articles[0].title.as_deref(), Some("Rates held"));
    }

    #[tokio::test]
    async fn collection_stops_at_the_cap() {
        let server = MockServer::start().await;
        serve(&server, "/first", 1).await;
        serve(&server, "/second", 0).await;

        let feeds = vec![format!("{}/first", server.uri()), format!("{}/second", server.uri())];
        let articles = fetcher().collect(&feeds, 2).await;
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[1].title.as_deref(), Some("Storm warning"));
    }

    #[test]
    fn snapshot_round_trips_through_the_file_loader() {
        let path = std::env::temp_dir().join(format!("feeds-snapshot-{}.json", std::process::id()));
        let articles = parse_feed(WORLD_RSS.as_bytes()).unwrap();

        write_snapshot(&path, &articles).unwrap();
        let back = crate::ingest::load_articles(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back.len(), 3);
        assert_eq!(back[1].url.as_deref(), Some("https://news.example.test/storm"));
    }
}
