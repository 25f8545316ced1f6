use maud::html;
use shared::domain::ResultItem;

/// A fully built table body, written to the view in one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableBody {
    pub markup: String,
    pub rows: Vec<String>,
}

impl TableBody {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// One `<tr><td>` per item, in order. Cell text is HTML-escaped.
pub fn render_rows(results: &[ResultItem]) -> TableBody {
    let rows: Vec<String> = results.iter().map(ResultItem::text).collect();
    let markup = html! {
        @for row in &rows {
            tr { td { (row) } }
        }
    };
    TableBody {
        markup: markup.into_string(),
        rows,
    }
}
