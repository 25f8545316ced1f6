use super::*;
use async_trait::async_trait;
use client_core::SearchBackend;
use shared::{domain::ResultSet, protocol::SearchRequest};
use std::sync::{Arc, Mutex};

/// Returns the cumulative prefix of `corpus`, two rows per page.
struct PagedBackend {
    corpus: Vec<&'static str>,
    requests: Mutex<Vec<SearchRequest>>,
}

#[async_trait]
impl SearchBackend for PagedBackend {
    async fn fetch(&self, request: &SearchRequest) -> Result<ResultSet, SearchError> {
        self.requests.lock().expect("requests").push(request.clone());
        let end = (request.existing.unwrap_or(0) + 2).min(self.corpus.len());
        Ok(self.corpus[..end].iter().map(|row| (*row).into()).collect())
    }
}

fn paged(corpus: Vec<&'static str>) -> Arc<PagedBackend> {
    Arc::new(PagedBackend {
        corpus,
        requests: Mutex::new(Vec::new()),
    })
}

fn output<W: AsRef<[u8]>>(out: &W) -> String {
    String::from_utf8(out.as_ref().to_vec()).expect("utf8")
}

#[test]
fn plain_output_numbers_trimmed_rows() {
    let body = TableBody {
        markup: String::new(),
        rows: vec!["  to be \n".into(), "or not".into()],
    };
    assert_eq!(format_body(&body, false), "--- 1 ---\nto be\n--- 2 ---\nor not\n");
}

#[tokio::test]
async fn html_flag_prints_escaped_markup() {
    let backend = paged(vec!["<i>Hamlet</i>"]);
    let controller = SearchController::new(TerminalView::new("hamlet", true, Vec::new()), backend);

    run(&controller, 0).await.expect("run");

    let view = controller.view().await;
    assert_eq!(
        output(&view.out),
        "<tr><td>&lt;i&gt;Hamlet&lt;/i&gt;</td></tr>\n"
    );
}

#[tokio::test]
async fn more_steps_send_shown_row_count_and_reprint_table() {
    let backend = paged(vec!["a", "b", "c", "d", "e"]);
    let controller = SearchController::new(
        TerminalView::new("drunk", false, Vec::new()),
        backend.clone(),
    );

    let outcomes = run(&controller, 2).await.expect("run");
    let rows: Vec<usize> = outcomes
        .iter()
        .map(|outcome| match outcome {
            RenderOutcome::Rendered { rows, .. } => *rows,
            RenderOutcome::Stale { .. } => 0,
        })
        .collect();
    assert_eq!(rows, vec![2, 4, 5]);

    let existing: Vec<Option<usize>> = backend
        .requests
        .lock()
        .expect("requests")
        .iter()
        .map(|request| request.existing)
        .collect();
    assert_eq!(existing, vec![None, Some(2), Some(4)]);

    let view = controller.view().await;
    assert_eq!(view.rendered_row_count(), 5);
    assert!(output(&view.out).ends_with("--- 5 ---\ne\n"));
}

#[tokio::test]
async fn errors_are_written_and_stop_the_run() {
    let controller = SearchController::connect(
        TerminalView::new("q", false, Vec::new()),
        "http://127.0.0.1:1",
    )
    .expect("client");

    let err = run(&controller, 3).await.expect_err("should fail");
    assert_eq!(err.kind(), client_core::SearchErrorKind::Transport);

    let view = controller.view().await;
    assert_eq!(
        output(&view.out),
        "error: Search server unreachable; check your connection and retry.\n"
    );
}
