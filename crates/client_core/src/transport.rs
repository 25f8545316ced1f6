//! HTTP access to the `/search` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use shared::{domain::ResultSet, error::ApiError, protocol::SearchRequest, protocol::SEARCH_ROUTE};
use url::Url;

use crate::error::SearchError;

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn fetch(&self, request: &SearchRequest) -> Result<ResultSet, SearchError>;
}

pub struct SearchClient {
    http: Client,
    search_url: Url,
}

impl SearchClient {
    pub fn new(server_url: &str) -> Result<Self, SearchError> {
        Self::with_http_client(server_url, Client::new())
    }

    pub fn with_http_client(server_url: &str, http: Client) -> Result<Self, SearchError> {
        let search_url = Url::parse(server_url)?.join(SEARCH_ROUTE)?;
        Ok(Self { http, search_url })
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }
}

#[async_trait]
impl SearchBackend for SearchClient {
    async fn fetch(&self, request: &SearchRequest) -> Result<ResultSet, SearchError> {
        // `query` percent-encodes the values.
        let response = self
            .http
            .get(self.search_url.clone())
            .query(request)
            .send()
            .await
            .map_err(SearchError::Transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(SearchError::Transport)?;

        if !status.is_success() {
            let message = match serde_json::from_slice::<ApiError>(&body) {
                Ok(api_error) => api_error.message,
                Err(_) => String::from_utf8_lossy(&body).into_owned(),
            };
            return Err(SearchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(SearchError::Decode)
    }
}
