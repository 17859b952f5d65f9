//! Web page loading and main-content extraction
//!
//! Fetches a URL and extracts its readable text using CSS selectors,
//! preferring semantic content containers over the raw body.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// A loaded page: extracted text plus source metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub text: String,
    pub source: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Request failed: {0}")]
    Http(String),

    #[error("HTTP {status} for: {url}")]
    HttpStatus { status: u16, url: String },
}

/// Loads the documents behind a URL.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Fetch and extract. An empty page yields zero documents, which is a
    /// valid outcome rather than an error.
    async fn load(&self, url: &str) -> Result<Vec<Document>, LoadError>;
}

pub struct PageLoader {
    client: Client,
}

impl PageLoader {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (compatible; RagNodeBot/1.0)")
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl Default for PageLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentLoader for PageLoader {
    async fn load(&self, url: &str) -> Result<Vec<Document>, LoadError> {
        let parsed = Url::parse(url).map_err(|e| LoadError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !["http", "https"].contains(&parsed.scheme()) {
            return Err(LoadError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        debug!("Fetching page: {}", url);

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| LoadError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| LoadError::Http(e.to_string()))?;

        let documents = documents_from_html(&html, url);
        info!("Loaded {} documents from {}", documents.len(), url);
        Ok(documents)
    }
}

/// Build documents from raw HTML. Pages with no extractable text produce an
/// empty vector.
pub fn documents_from_html(html: &str, source: &str) -> Vec<Document> {
    let text = extract_main_content(html);
    if text.is_empty() {
        return vec![];
    }

    vec![Document {
        text,
        source: source.to_string(),
        title: extract_title(html),
    }]
}

/// Extract main content from HTML.
///
/// Tries semantic containers first (`article`, `main`, `[role='main']`,
/// common content class names); falls back to the whole `body`.
fn extract_main_content(html: &str) -> String {
    let document = Html::parse_document(html);

    let selectors = [
        "article",
        "main",
        "[role='main']",
        ".post-content",
        ".article-content",
        ".entry-content",
        ".content-body",
        "#content",
        ".prose",
    ];

    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let cleaned = clean_text(&element.text().collect::<Vec<_>>().join(" "));
                if cleaned.len() > 200 {
                    return cleaned;
                }
            }
        }
    }

    if let Ok(body_selector) = Selector::parse("body") {
        if let Some(body) = document.select(&body_selector).next() {
            return clean_text(&body.text().collect::<Vec<_>>().join(" "));
        }
    }

    String::new()
}

fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Normalize whitespace into single spaces.
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
