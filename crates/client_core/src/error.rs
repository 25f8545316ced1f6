use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorKind {
    Config,
    Transport,
    Status,
    Decode,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid server url: {0}")]
    InvalidServerUrl(#[from] url::ParseError),
    #[error("search request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("search failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("search response is not a result list: {0}")]
    Decode(#[source] serde_json::Error),
}

impl SearchError {
    pub fn kind(&self) -> SearchErrorKind {
        match self {
            SearchError::InvalidServerUrl(_) => SearchErrorKind::Config,
            SearchError::Transport(_) => SearchErrorKind::Transport,
            SearchError::Status { .. } => SearchErrorKind::Status,
            SearchError::Decode(_) => SearchErrorKind::Decode,
        }
    }

    /// Short text for an error banner.
    pub fn banner_text(&self) -> String {
        match self {
            SearchError::InvalidServerUrl(_) => "Search is misconfigured.".to_string(),
            SearchError::Transport(_) => {
                "Search server unreachable; check your connection and retry.".to_string()
            }
            SearchError::Status { message, .. } => format!("Search failed: {message}"),
            SearchError::Decode(_) => "Search returned an unreadable response.".to_string(),
        }
    }
}
