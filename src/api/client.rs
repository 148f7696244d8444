use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, info, warn};

use super::SearchQuery;
use crate::models::{DocumentResponse, SearchResponse, SpeechData, SpeechDocument};

const DEFAULT_BASE_URL: &str = "https://de.openparliament.tv/api/v1";

/// Configuration for the OpenParliament.tv API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API root, e.g. "https://de.openparliament.tv/api/v1"
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables, falling back to the public API
    pub fn from_env() -> Self {
        let base_url = std::env::var("OPENPARLIAMENT_API_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL of a single speech document
    pub fn document_url(&self, id: &str) -> String {
        format!("{}/media/{}", self.base_url, urlencoding::encode(id))
    }
}

/// Transcript fetcher for the OpenParliament.tv API
pub struct OpenParliamentClient {
    client: Client,
    config: ApiConfig,
}

impl OpenParliamentClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Run a search and return the first `query.limit` speeches
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SpeechDocument>> {
        let url = query.search_url(&self.config.base_url);
        debug!("GET {}", url);

        let body = self.get_text(&url).await?;
        let documents = parse_search_response(&body, query.limit, &self.config)?;

        info!(
            "Search {:?}: {} speeches{}",
            query.text,
            documents.len(),
            query
                .limit
                .map(|l| format!(" (limit {})", l))
                .unwrap_or_default()
        );
        Ok(documents)
    }

    /// Fetch one speech by identifier or by its full URL
    pub async fn fetch_speech(&self, id_or_url: &str) -> Result<SpeechDocument> {
        let url = if id_or_url.starts_with("http://") || id_or_url.starts_with("https://") {
            id_or_url.to_string()
        } else {
            self.config.document_url(id_or_url)
        };
        debug!("GET {}", url);

        let body = self.get_text(&url).await?;
        parse_document_response(&body, &url)
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenParliament API error: {} - {}", status, body);
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read response from {}", url))
    }
}

/// Parse a search response body, truncating to `limit` results.
///
/// A body without a `data` key counts as zero results.
pub fn parse_search_response(
    body: &str,
    limit: Option<usize>,
    config: &ApiConfig,
) -> Result<Vec<SpeechDocument>> {
    let response: SearchResponse =
        serde_json::from_str(body).context("Failed to parse search response")?;

    let Some(results) = response.data else {
        warn!("Search response has no data, treating as zero results");
        return Ok(Vec::new());
    };

    let take = limit.unwrap_or(results.len());
    Ok(results
        .into_iter()
        .take(take)
        .map(|data| {
            let source_url = source_url(&data, config);
            SpeechDocument { source_url, data }
        })
        .collect())
}

/// Parse a single-document response body fetched from `url`
pub fn parse_document_response(body: &str, url: &str) -> Result<SpeechDocument> {
    let response: DocumentResponse =
        serde_json::from_str(body).with_context(|| format!("Failed to parse speech from {}", url))?;
    Ok(SpeechDocument {
        source_url: url.to_string(),
        data: response.data,
    })
}

fn source_url(data: &SpeechData, config: &ApiConfig) -> String {
    data.links
        .as_ref()
        .and_then(|l| l.self_link.clone())
        .unwrap_or_else(|| config.document_url(&data.id))
}
