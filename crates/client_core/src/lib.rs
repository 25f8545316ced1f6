use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use shared::{domain::ResultItem, protocol::SearchRequest};
use tokio::sync::{broadcast, Mutex, MutexGuard};
use tracing::{debug, warn};

pub mod error;
pub mod render;
pub mod transport;
pub mod view;

pub use error::{SearchError, SearchErrorKind};
pub use render::{render_rows, TableBody};
pub use transport::{SearchBackend, SearchClient};
pub use view::{EventKind, FormEvent, HtmlTableView, SearchView};

/// Tag carried by every outgoing request. Later requests get larger numbers.
pub type RequestSeq = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    ResultsRendered { seq: RequestSeq, rows: usize },
    StaleResponseDiscarded { seq: RequestSeq },
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered { seq: RequestSeq, rows: usize },
    /// A newer request had already settled; the table was left alone.
    Stale { seq: RequestSeq },
}

struct BoundView<V> {
    view: V,
    /// Highest sequence whose response, success or failure, reached the view.
    last_settled: RequestSeq,
}

/// Turns form events into `/search` requests and renders the answers.
///
/// Several requests may be in flight. A response is applied only when no
/// later request has settled before it, successfully or not.
pub struct SearchController<V: SearchView> {
    backend: Arc<dyn SearchBackend>,
    bound: Mutex<BoundView<V>>,
    next_seq: AtomicU64,
    events: broadcast::Sender<ControllerEvent>,
}

impl<V: SearchView> SearchController<V> {
    pub fn new(view: V, backend: Arc<dyn SearchBackend>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            backend,
            bound: Mutex::new(BoundView {
                view,
                last_settled: 0,
            }),
            next_seq: AtomicU64::new(0),
            events,
        })
    }

    pub fn connect(view: V, server_url: &str) -> Result<Arc<Self>, SearchError> {
        let client = SearchClient::new(server_url)?;
        Ok(Self::new(view, Arc::new(client)))
    }

    /// Submit handler: fresh search for the form's current query.
    pub async fn search(&self, event: &mut FormEvent) -> Result<RenderOutcome, SearchError> {
        event.prevent_default();
        let query = self.bound.lock().await.view.query_value();
        self.dispatch(SearchRequest::fresh(query)).await
    }

    /// Load-more handler: asks for results past the rows already shown.
    ///
    /// The response replaces the table. The server answers with the
    /// cumulative prefix, so nothing already shown is lost.
    pub async fn more_results(&self, event: &mut FormEvent) -> Result<RenderOutcome, SearchError> {
        event.prevent_default();
        let request = {
            let guard = self.bound.lock().await;
            SearchRequest::more(guard.view.query_value(), guard.view.rendered_row_count())
        };
        self.dispatch(request).await
    }

    /// Replaces the table body with one row per item.
    pub async fn update_table(&self, results: &[ResultItem]) -> usize {
        let mut guard = self.bound.lock().await;
        render_into(&mut guard.view, results)
    }

    pub async fn view(&self) -> ViewGuard<'_, V> {
        ViewGuard {
            guard: self.bound.lock().await,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    async fn dispatch(&self, request: SearchRequest) -> Result<RenderOutcome, SearchError> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(seq, query = %request.q, existing = ?request.existing, "search request issued");

        let fetched = self.backend.fetch(&request).await;
        let mut guard = self.bound.lock().await;

        match fetched {
            Ok(results) => {
                if seq <= guard.last_settled {
                    debug!(seq, last_settled = guard.last_settled, "discarding stale search response");
                    let _ = self.events.send(ControllerEvent::StaleResponseDiscarded { seq });
                    return Ok(RenderOutcome::Stale { seq });
                }
                guard.last_settled = seq;
                let rows = render_into(&mut guard.view, &results);
                let _ = self.events.send(ControllerEvent::ResultsRendered { seq, rows });
                Ok(RenderOutcome::Rendered { seq, rows })
            }
            Err(err) => {
                warn!(seq, error = %err, "search request failed");
                if seq > guard.last_settled {
                    guard.last_settled = seq;
                    guard.view.show_error(&err);
                }
                let _ = self.events.send(ControllerEvent::Error(err.to_string()));
                Err(err)
            }
        }
    }
}

fn render_into<V: SearchView>(view: &mut V, results: &[ResultItem]) -> usize {
    let body = render_rows(results);
    let rows = body.row_count();
    view.replace_table_body(body);
    view.clear_error();
    rows
}

/// Locked access to the bound view.
pub struct ViewGuard<'a, V> {
    guard: MutexGuard<'a, BoundView<V>>,
}

impl<V> std::ops::Deref for ViewGuard<'_, V> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.guard.view
    }
}

impl<V> std::ops::DerefMut for ViewGuard<'_, V> {
    fn deref_mut(&mut self) -> &mut V {
        &mut self.guard.view
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
