//! View binding for the search controller.
//!
//! A view owns the form, the result table and the error banner. The
//! controller receives one at construction and never looks elements up.

use crate::{error::SearchError, render::TableBody};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Submit,
    Click,
}

/// A UI event delivered to a controller handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormEvent {
    kind: EventKind,
    default_prevented: bool,
}

impl FormEvent {
    pub fn submit() -> Self {
        Self {
            kind: EventKind::Submit,
            default_prevented: false,
        }
    }

    pub fn click() -> Self {
        Self {
            kind: EventKind::Click,
            default_prevented: false,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Suppresses native form submission or navigation.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

pub trait SearchView: Send {
    /// Current value of the form's `query` field, unmodified.
    fn query_value(&self) -> String;
    fn rendered_row_count(&self) -> usize;
    fn replace_table_body(&mut self, body: TableBody);
    fn show_error(&mut self, error: &SearchError);
    fn clear_error(&mut self);
}

/// In-memory page model: a query field, a result table body and a banner.
#[derive(Debug, Clone, Default)]
pub struct HtmlTableView {
    query: String,
    body: TableBody,
    error_banner: Option<String>,
}

impl HtmlTableView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn table_body_markup(&self) -> &str {
        &self.body.markup
    }

    pub fn rows(&self) -> &[String] {
        &self.body.rows
    }

    pub fn error_banner(&self) -> Option<&str> {
        self.error_banner.as_deref()
    }
}

impl SearchView for HtmlTableView {
    fn query_value(&self) -> String {
        self.query.clone()
    }

    fn rendered_row_count(&self) -> usize {
        self.body.row_count()
    }

    fn replace_table_body(&mut self, body: TableBody) {
        self.body = body;
    }

    fn show_error(&mut self, error: &SearchError) {
        self.error_banner = Some(error.banner_text());
    }

    fn clear_error(&mut self) {
        self.error_banner = None;
    }
}
