//! Google Books catalog implementation.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::models::{Book, SearchPage, SearchQuery};
use crate::sources::{Catalog, CatalogError};
use crate::utils::HttpClient;

/// Public Google Books volumes endpoint, used for both search and detail
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/books/v1/volumes";

/// Google Books catalog
///
/// Search and detail lookups are single requests with no retry. Base URLs
/// are configurable so the catalog can be pointed at a local server.
#[derive(Debug, Clone)]
pub struct GoogleBooksCatalog {
    client: Arc<HttpClient>,
    search_base: String,
    detail_base: String,
}

impl GoogleBooksCatalog {
    pub fn new() -> Result<Self, CatalogError> {
        Ok(Self::with_endpoints(
            Arc::new(HttpClient::new()?),
            DEFAULT_API_BASE,
            DEFAULT_API_BASE,
        ))
    }

    /// Create a catalog against explicit search and detail base URLs
    pub fn with_endpoints(
        client: Arc<HttpClient>,
        search_base: impl Into<String>,
        detail_base: impl Into<String>,
    ) -> Self {
        Self {
            client,
            search_base: search_base.into(),
            detail_base: detail_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a catalog from the `[api]` configuration section
    pub fn from_config(api: &ApiConfig) -> Result<Self, CatalogError> {
        let client = HttpClient::with_settings(
            &api.user_agent,
            Duration::from_secs(api.timeout_seconds),
        )?;
        Ok(Self::with_endpoints(
            Arc::new(client),
            api.search_base.clone(),
            api.detail_base.clone(),
        ))
    }

    /// URL for one page of a search
    pub fn search_url(&self, query: &SearchQuery) -> String {
        format!(
            "{}?q={}&startIndex={}&maxResults={}",
            self.search_base,
            urlencoding::encode(&query.query),
            query.start_index,
            query.max_results
        )
    }

    /// URL for one book's full record
    pub fn detail_url(&self, id: &str) -> String {
        format!("{}/{}", self.detail_base, urlencoding::encode(id))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        tracing::debug!(url, "GET");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Catalog for GoogleBooksCatalog {
    fn id(&self) -> &str {
        "google_books"
    }

    fn name(&self) -> &str {
        "Google Books"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchPage, CatalogError> {
        if query.query.trim().is_empty() {
            return Err(CatalogError::InvalidRequest(
                "search query must not be empty".to_string(),
            ));
        }

        let url = self.search_url(query);
        let page: SearchPage = self.get_json(&url).await?;

        tracing::debug!(
            query = %query.query,
            start_index = query.start_index,
            returned = page.items.len(),
            total = page.total_items,
            "Search page received"
        );

        Ok(page)
    }

    async fn get_by_id(&self, id: &str) -> Result<Book, CatalogError> {
        self.validate_id(id)?;
        let url = self.detail_url(id);
        match self.get_json(&url).await {
            Err(CatalogError::Status { status: 404, .. }) => {
                Err(CatalogError::NotFound(id.to_string()))
            }
            other => other,
        }
    }
}
