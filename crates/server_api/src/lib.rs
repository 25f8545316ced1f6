use corpus::{Corpus, CorpusError};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{MALFORMED_EXISTING_MESSAGE, MISSING_QUERY_MESSAGE},
};
use tracing::debug;

#[derive(Clone)]
pub struct ApiContext {
    pub corpus: Corpus,
    pub max_new_results: usize,
}

/// Raw `GET /search` parameters, before validation.
#[derive(Debug, Default, Clone)]
pub struct SearchParams<'a> {
    pub q: Option<&'a str>,
    pub existing: Option<&'a str>,
}

/// Runs a search and returns the first `existing + max_new_results` excerpts.
///
/// The response is cumulative: a caller that already shows `existing` rows
/// receives those rows again followed by the next page.
pub async fn search(ctx: &ApiContext, params: SearchParams<'_>) -> Result<Vec<String>, ApiError> {
    let query = match params.q {
        Some(q) if !q.is_empty() => q.to_string(),
        _ => return Err(ApiError::validation(MISSING_QUERY_MESSAGE)),
    };
    let existing = parse_existing(params.existing)?;
    let limit = existing.saturating_add(ctx.max_new_results);

    let corpus = ctx.corpus.clone();
    let lookup = query.clone();
    let results = tokio::task::spawn_blocking(move || corpus.search(&lookup, limit))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .map_err(corpus_error)?;

    debug!(query = %query, existing, returned = results.len(), "search served");
    Ok(results)
}

fn parse_existing(raw: Option<&str>) -> Result<usize, ApiError> {
    match raw {
        None => Ok(0),
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| ApiError::validation(MALFORMED_EXISTING_MESSAGE)),
    }
}

fn corpus_error(err: CorpusError) -> ApiError {
    match err {
        CorpusError::EmptyQuery => ApiError::validation(MISSING_QUERY_MESSAGE),
        CorpusError::Pattern(e) => ApiError::validation(e.to_string()),
        CorpusError::Io { .. } => ApiError::internal(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(text: &str) -> ApiContext {
        ApiContext {
            corpus: Corpus::from_text(text).with_window(2),
            max_new_results: 2,
        }
    }

    fn params<'a>(q: Option<&'a str>, existing: Option<&'a str>) -> SearchParams<'a> {
        SearchParams { q, existing }
    }

    #[tokio::test]
    async fn missing_or_empty_query_is_a_validation_error() {
        let ctx = ctx("drunk drunk");
        for q in [None, Some("")] {
            let err = search(&ctx, params(q, None)).await.expect_err("should fail");
            assert_eq!(err.code, ErrorCode::Validation);
            assert_eq!(err.message, MISSING_QUERY_MESSAGE);
        }
    }

    #[tokio::test]
    async fn malformed_existing_is_a_validation_error() {
        let ctx = ctx("drunk drunk");
        for existing in ["abc", "-1", "1.5"] {
            let err = search(&ctx, params(Some("drunk"), Some(existing)))
                .await
                .expect_err("should fail");
            assert_eq!(err.code, ErrorCode::Validation);
            assert_eq!(err.message, MALFORMED_EXISTING_MESSAGE);
        }
    }

    #[tokio::test]
    async fn first_page_is_capped_at_page_size() {
        let ctx = ctx("drunk drunk drunk drunk drunk");
        let results = search(&ctx, params(Some("drunk"), None)).await.expect("search");
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn existing_extends_the_cumulative_prefix() {
        let ctx = ctx("drunk drunk drunk drunk drunk");
        let first = search(&ctx, params(Some("drunk"), None)).await.expect("search");
        let more = search(&ctx, params(Some("drunk"), Some("2"))).await.expect("search");
        assert_eq!(more.len(), 4);
        assert_eq!(&more[..2], &first[..]);

        let all = search(&ctx, params(Some("drunk"), Some("40"))).await.expect("search");
        assert_eq!(all.len(), 5);
    }
}
