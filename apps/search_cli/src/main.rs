use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use client_core::{
    FormEvent, HtmlTableView, RenderOutcome, SearchController, SearchError, SearchView, TableBody,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Search a shakesearch server from the terminal")]
struct Args {
    #[arg(long, default_value = "http://localhost:3001")]
    server_url: String,
    /// Number of "load more" steps after the first search.
    #[arg(long, default_value_t = 0)]
    more: usize,
    /// Print the table body markup instead of plain rows.
    #[arg(long)]
    html: bool,
    query: String,
}

/// Writes every table update and error banner to `out`.
struct TerminalView<W> {
    page: HtmlTableView,
    html: bool,
    out: W,
}

impl<W: Write + Send> TerminalView<W> {
    fn new(query: impl Into<String>, html: bool, out: W) -> Self {
        Self {
            page: HtmlTableView::with_query(query),
            html,
            out,
        }
    }
}

fn format_body(body: &TableBody, html: bool) -> String {
    if html {
        return format!("{}\n", body.markup);
    }
    body.rows
        .iter()
        .enumerate()
        .map(|(index, row)| format!("--- {} ---\n{}\n", index + 1, row.trim()))
        .collect()
}

impl<W: Write + Send> SearchView for TerminalView<W> {
    fn query_value(&self) -> String {
        self.page.query_value()
    }

    fn rendered_row_count(&self) -> usize {
        self.page.rendered_row_count()
    }

    fn replace_table_body(&mut self, body: TableBody) {
        let _ = self.out.write_all(format_body(&body, self.html).as_bytes());
        self.page.replace_table_body(body);
    }

    fn show_error(&mut self, error: &SearchError) {
        let _ = writeln!(self.out, "error: {}", error.banner_text());
        self.page.show_error(error);
    }

    fn clear_error(&mut self) {
        self.page.clear_error();
    }
}

/// One search followed by `more` load-more steps.
async fn run<V: SearchView>(
    controller: &SearchController<V>,
    more: usize,
) -> Result<Vec<RenderOutcome>, SearchError> {
    let mut outcomes = vec![controller.search(&mut FormEvent::submit()).await?];
    for _ in 0..more {
        outcomes.push(controller.more_results(&mut FormEvent::click()).await?);
    }
    Ok(outcomes)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let view = TerminalView::new(args.query, args.html, io::stdout());
    let controller = SearchController::connect(view, &args.server_url)?;

    for outcome in run(&controller, args.more).await? {
        if let RenderOutcome::Rendered { rows, .. } = outcome {
            eprintln!("({rows} results shown)");
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
