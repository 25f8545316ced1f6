use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::{info, warn};

/// Bytes of context kept on each side of a match start.
pub const DEFAULT_RESULT_WINDOW: usize = 250;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("load {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("search query must not be empty")]
    EmptyQuery,
    #[error("search query could not be compiled: {0}")]
    Pattern(#[from] regex::Error),
}

/// Full text searched by the server, shared cheaply between request handlers.
#[derive(Debug, Clone)]
pub struct Corpus {
    text: Arc<str>,
    window: usize,
}

impl Corpus {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path.display(), "corpus is not valid UTF-8; replacing invalid sequences");
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };

        info!(path = %path.display(), bytes = text.len(), "corpus loaded");
        Ok(Self::from_text(text))
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Arc::from(text.into()),
            window: DEFAULT_RESULT_WINDOW,
        }
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns context windows for the first `limit` matches of `query`.
    ///
    /// Matching is case-insensitive and literal; matches are non-overlapping
    /// and reported in document order.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, CorpusError> {
        let matcher = compile(query)?;
        Ok(matcher
            .find_iter(&self.text)
            .take(limit)
            .map(|found| self.excerpt(found.start()).to_string())
            .collect())
    }

    pub fn count_matches(&self, query: &str) -> Result<usize, CorpusError> {
        let matcher = compile(query)?;
        Ok(matcher.find_iter(&self.text).count())
    }

    fn excerpt(&self, start: usize) -> &str {
        let text: &str = &self.text;
        let mut lo = start.saturating_sub(self.window);
        let mut hi = start.saturating_add(self.window).min(text.len());

        while !text.is_char_boundary(lo) {
            lo -= 1;
        }
        while !text.is_char_boundary(hi) {
            hi += 1;
        }

        &text[lo..hi]
    }
}

fn compile(query: &str) -> Result<Regex, CorpusError> {
    if query.is_empty() {
        return Err(CorpusError::EmptyQuery);
    }
    Ok(RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()?)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
