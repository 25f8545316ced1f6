use serde::{Deserialize, Serialize};

pub const SEARCH_ROUTE: &str = "/search";
pub const HEALTHZ_ROUTE: &str = "/healthz";

pub const QUERY_PARAM: &str = "q";
pub const EXISTING_PARAM: &str = "existing";

/// Results added per page on top of the `existing` offset.
pub const DEFAULT_MAX_NEW_RESULTS: usize = 20;

pub const MISSING_QUERY_MESSAGE: &str = "missing search query in URL params";
pub const MALFORMED_EXISTING_MESSAGE: &str = "expecting existing to be parseable into an integer";

/// Query string of `GET /search`.
///
/// `existing` is the number of rows the caller already shows. The server
/// answers with the cumulative prefix of `existing + page size` results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub q: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing: Option<usize>,
}

impl SearchRequest {
    pub fn fresh(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            existing: None,
        }
    }

    pub fn more(q: impl Into<String>, existing: usize) -> Self {
        Self {
            q: q.into(),
            existing: Some(existing),
        }
    }
}
