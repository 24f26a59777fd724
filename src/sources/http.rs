//! Live backend querying sources over HTTP
//!
//! JSON APIs are searched with `?q=`, search pages are scraped for result links and
//! RSS feeds are read item by item. Every response is reduced to [`SourceRecord`]s and
//! matched the same way the offline backends are. Feeds do not take a query, so each one
//! is downloaded once and shared by every claim checked against it for a short while.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use serde_json::Value;
use tokio::sync::OnceCell;
use tokio::time::Instant;
use url::Url;

use super::{LookupError, SourceLookup, SourceRecord, best_hit, search_terms};
use crate::model::{Claim, QueryMethod, SourceDescriptor, SourceHit};

const USER_AGENT: &str = "evidence-intel/1.0";

/// Field names tried in order when reading JSON search results
const TITLE_FIELDS: &[&str] = &["title", "name", "headline"];
const TEXT_FIELDS: &[&str] = &["notes", "description", "summary", "text", "snippet"];
const URL_FIELDS: &[&str] = &["url", "link", "href"];
const LIST_FIELDS: &[&str] = &["results", "items", "data"];

/// How long a downloaded feed answers later lookups
const FEED_TTL: Duration = Duration::from_secs(300);

type SharedFeed = Arc<OnceCell<Arc<Vec<SourceRecord>>>>;

/// Recently downloaded feeds, keyed by feed URL
///
/// Concurrent lookups of the same feed wait on one download. Failed downloads are not
/// kept, so the next lookup retries.
#[derive(Default)]
struct FeedCache {
    entries: Mutex<HashMap<String, (Instant, SharedFeed)>>,
}

impl FeedCache {
    fn slot(&self, url: &str) -> SharedFeed {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        entries.retain(|_, (created, _)| now.duration_since(*created) < FEED_TTL);
        entries
            .entry(url.to_string())
            .or_insert_with(|| (now, Arc::new(OnceCell::new())))
            .1
            .clone()
    }

    async fn get_or_fetch<F, Fut>(
        &self,
        url: &str,
        fetch: F,
    ) -> Result<Arc<Vec<SourceRecord>>, LookupError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<SourceRecord>, LookupError>>,
    {
        let slot = self.slot(url);
        slot.get_or_try_init(|| async move { fetch().await.map(Arc::new) })
            .await
            .cloned()
    }
}

pub struct HttpSourceLookup {
    client: Client,
    feeds: FeedCache,
}

impl HttpSourceLookup {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            feeds: FeedCache::default(),
        }
    }

    async fn fetch_records(
        &self,
        query: &QueryMethod,
        terms: &str,
    ) -> Result<Vec<SourceRecord>, LookupError> {
        match query {
            QueryMethod::Api { endpoint } => {
                let response = self
                    .client
                    .get(endpoint)
                    .query(&[("q", terms)])
                    .send()
                    .await?;
                let body: Value = check_status(response)?.json().await?;
                Ok(parse_json_records(&body))
            }
            QueryMethod::SearchPage { url_template } => {
                let url = url_template.replace("{query}", &urlencoding::encode(terms));
                let base = Url::parse(&url).map_err(|e| LookupError::ParseError(e.to_string()))?;
                let response = self.client.get(base.clone()).send().await?;
                let html = check_status(response)?.text().await?;
                Ok(parse_search_page(&html, &base))
            }
            QueryMethod::Rss { feed_url } => {
                let records = self
                    .feeds
                    .get_or_fetch(feed_url, || self.fetch_feed(feed_url))
                    .await?;
                Ok(records.as_ref().clone())
            }
        }
    }

    async fn fetch_feed(&self, feed_url: &str) -> Result<Vec<SourceRecord>, LookupError> {
        let response = self.client.get(feed_url).send().await?;
        let bytes = check_status(response)?.bytes().await?;
        tracing::debug!(feed = %feed_url, bytes = bytes.len(), "Downloaded feed");
        parse_feed(&bytes)
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LookupError> {
    if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(LookupError::RateLimited);
    }
    Ok(response.error_for_status()?)
}

impl Default for HttpSourceLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceLookup for HttpSourceLookup {
    async fn lookup(
        &self,
        claim: &Claim,
        source: &SourceDescriptor,
    ) -> Result<Vec<SourceHit>, LookupError> {
        if !source.queryable {
            return Err(LookupError::NotQueryable(source.id.clone()));
        }

        let terms = search_terms(claim);
        let records = self.fetch_records(&source.query, &terms).await?;

        tracing::debug!(
            source = %source.id,
            terms = %terms,
            records = records.len(),
            "Source query returned"
        );

        Ok(best_hit(claim, source, &records).into_iter().collect())
    }

    fn backend(&self) -> &'static str {
        "http"
    }
}

/// Result items from a JSON search response
///
/// Accepts a bare array, `{"results"|"items"|"data": [...]}`, or the CKAN shape `{"result": {"results": [...]}}`.
fn parse_json_records(body: &Value) -> Vec<SourceRecord> {
    let items = body
        .as_array()
        .or_else(|| {
            LIST_FIELDS
                .iter()
                .find_map(|field| body.get(*field).and_then(Value::as_array))
        })
        .or_else(|| {
            body.get("result")
                .and_then(|r| r.get("results"))
                .and_then(Value::as_array)
        });

    items
        .map(|items| {
            items
                .iter()
                .map(|item| SourceRecord {
                    title: first_string(item, TITLE_FIELDS),
                    url: first_string(item, URL_FIELDS),
                    text: first_string(item, TEXT_FIELDS),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn first_string(item: &Value, fields: &[&str]) -> String {
    fields
        .iter()
        .find_map(|field| item.get(*field).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

/// Links on a search results page, resolved against the page URL
fn parse_search_page(html: &str, base: &Url) -> Vec<SourceRecord> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|anchor| {
            let text = anchor.text().collect::<String>().trim().to_string();
            if text.is_empty() {
                return None;
            }
            let href = anchor.value().attr("href")?;
            let url = base.join(href).ok()?;
            Some(SourceRecord {
                title: text,
                url: url.to_string(),
                text: String::new(),
            })
        })
        .collect()
}

fn parse_feed(bytes: &[u8]) -> Result<Vec<SourceRecord>, LookupError> {
    let channel =
        rss::Channel::read_from(bytes).map_err(|e| LookupError::ParseError(e.to_string()))?;

    Ok(channel
        .items()
        .iter()
        .map(|item| SourceRecord {
            title: item.title().unwrap_or_default().to_string(),
            url: item.link().unwrap_or_default().to_string(),
            text: item.description().unwrap_or_default().to_string(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::model::{ClaimType, SourceCategory};
    use crate::sources::test_support::{claim, source};

    #[test]
    fn test_json_shapes() {
        let ckan: Value = serde_json::json!({
            "result": {"results": [{"title": "WSIB claims data", "notes": "Denied claims by year", "url": "https://open.example/1"}]}
        });
        let records = parse_json_records(&ckan);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "Denied claims by year");

        let flat: Value = serde_json::json!([{"name": "x", "summary": "y", "link": "z"}]);
        assert_eq!(
            parse_json_records(&flat)[0],
            SourceRecord {
                title: "x".into(),
                url: "z".into(),
                text: "y".into()
            }
        );

        assert!(parse_json_records(&serde_json::json!({"unexpected": true})).is_empty());
    }

    #[test]
    fn test_search_page_links_resolved() {
        let html = r#"<html><body>
            <a href="/decisions/2023/1">WSIB denied appeal</a>
            <a href="https://other.example/x">External</a>
            <a href="/empty"> </a>
        </body></html>"#;
        let base = Url::parse("https://tribunal.example.org/search?q=x").unwrap();
        let records = parse_search_page(html, &base);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].url, "https://tribunal.example.org/decisions/2023/1");
        assert_eq!(records[0].title, "WSIB denied appeal");
    }

    #[test]
    fn test_feed_items() {
        let feed = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Hansard</title><link>https://example.org</link><description>d</description>
<item><title>Debate on WSIB reform</title><link>https://example.org/1</link><description>Members said claims were denied.</description></item>
</channel></rss>"#;
        let records = parse_feed(feed.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://example.org/1");

        assert!(matches!(parse_feed(b"not xml"), Err(LookupError::ParseError(_))));
    }

    fn record(title: &str) -> SourceRecord {
        SourceRecord {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_feed_downloaded_once_for_concurrent_lookups() {
        let cache = FeedCache::default();
        let counter = AtomicUsize::new(0);
        let downloads = &counter;
        let fetch = move || async move {
            downloads.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok::<_, LookupError>(vec![record("Debate on WSIB reform")])
        };

        let (a, b, c) = tokio::join!(
            cache.get_or_fetch("https://example.org/feed", fetch),
            cache.get_or_fetch("https://example.org/feed", fetch),
            cache.get_or_fetch("https://example.org/feed", fetch),
        );

        assert_eq!(downloads.load(Ordering::SeqCst), 1);
        assert_eq!(a.unwrap()[0].title, "Debate on WSIB reform");
        assert!(b.is_ok() && c.is_ok());
    }

    #[tokio::test]
    async fn test_failed_feed_download_is_retried() {
        let cache = FeedCache::default();
        let failed = cache
            .get_or_fetch("https://example.org/feed", || async { Err::<Vec<SourceRecord>, _>(LookupError::RateLimited) })
            .await;
        assert!(matches!(failed, Err(LookupError::RateLimited)));

        let retried = cache
            .get_or_fetch("https://example.org/feed", || async { Ok::<_, LookupError>(vec![record("x")]) })
            .await
            .unwrap();
        assert_eq!(retried.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_feed_expires_after_ttl() {
        let cache = FeedCache::default();
        let counter = AtomicUsize::new(0);
        let downloads = &counter;
        let fetch = move || async move {
            downloads.fetch_add(1, Ordering::SeqCst);
            Ok::<_, LookupError>(vec![record("x")])
        };

        cache.get_or_fetch("https://example.org/feed", fetch).await.unwrap();
        cache.get_or_fetch("https://example.org/feed", fetch).await.unwrap();
        assert_eq!(downloads.load(Ordering::SeqCst), 1);

        tokio::time::advance(FEED_TTL + Duration::from_secs(1)).await;
        cache.get_or_fetch("https://example.org/feed", fetch).await.unwrap();
        assert_eq!(downloads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unqueryable_source_rejected() {
        let lookup = HttpSourceLookup::new();
        let mut s = source("closed", SourceCategory::Data);
        s.queryable = false;
        let result = lookup.lookup(&claim(ClaimType::Fraud, "fraud", "WSIB"), &s).await;
        assert!(matches!(result, Err(LookupError::NotQueryable(_))));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_open_canada_search() {
        let lookup = HttpSourceLookup::new();
        let mut s = source("open-canada", SourceCategory::Data);
        s.query = QueryMethod::Api {
            endpoint: "https://open.canada.ca/data/api/3/action/package_search".to_string(),
        };
        let result = lookup
            .lookup(&claim(ClaimType::Denial, "denied", "Service Canada"), &s)
            .await;
        assert!(result.is_ok());
    }
}
