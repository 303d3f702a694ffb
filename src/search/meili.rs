//! Meilisearch-backed search index
//!
//! Talks to the Meilisearch HTTP API directly with reqwest. Every call is
//! bounded by the client timeout so an unreachable index fails fast.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{SearchError, SearchResult};
use crate::models::ProductDocument;
use crate::search::{SearchHits, SearchIndex};

/// Body of a Meilisearch search response; unknown fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    hits: Vec<ProductDocument>,
    estimated_total_hits: Option<u64>,
}

// == Meilisearch Index ==
#[derive(Debug, Clone)]
pub struct MeiliSearchIndex {
    client: Client,
    host: String,
    index: String,
    api_key: String,
}

impl MeiliSearchIndex {
    /// Creates a client for `index` on `host`, bounding every call by `timeout`.
    pub fn new(
        host: impl Into<String>,
        index: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> SearchResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!("product-catalog/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            host: host.into().trim_end_matches('/').to_string(),
            index: index.into(),
            api_key: api_key.into(),
        })
    }

    /// Creates a client from configuration.
    pub fn from_config(config: &Config) -> SearchResult<Self> {
        Self::new(
            config.search_host.clone(),
            config.search_index.clone(),
            config.search_api_key.clone(),
            config.search_timeout(),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/indexes/{}/{}", self.host, self.index, path)
    }
}

/// Converts a non-success status into `SearchError::Status`.
async fn check_status(response: Response) -> SearchResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SearchError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl SearchIndex for MeiliSearchIndex {
    async fn search(&self, query: &str, limit: u32, offset: u32) -> SearchResult<SearchHits> {
        debug!("Searching index {} for {:?}", self.index, query);

        let response = self
            .client
            .post(self.url("search"))
            .bearer_auth(&self.api_key)
            .json(&json!({ "q": query, "limit": limit, "offset": offset }))
            .send()
            .await?;

        let body: SearchResponse = check_status(response).await?.json().await?;
        let estimated_total = body
            .estimated_total_hits
            .unwrap_or(body.hits.len() as u64);

        Ok(SearchHits {
            hits: body.hits,
            estimated_total,
        })
    }

    async fn upsert_documents(&self, documents: &[ProductDocument]) -> SearchResult<()> {
        let response = self
            .client
            .post(format!("{}?primaryKey=id", self.url("documents")))
            .bearer_auth(&self.api_key)
            .json(documents)
            .send()
            .await?;

        check_status(response).await?;
        info!(
            "Submitted {} documents to index {}",
            documents.len(),
            self.index
        );
        Ok(())
    }
}
