use super::text::{children, find_first, raw_text, stripped_text, tag_is};
use crate::models::TableRow;
use scraper::ElementRef;

/// Marker of footnote rows spanning the whole table
const FOOTNOTE_MARKER: &str = "参考：";

fn header_names(table: ElementRef<'_>) -> Vec<String> {
    find_first(table, &["thead"])
        .and_then(|thead| find_first(thead, &["tr"]))
        .map(|tr| {
            children(tr)
                .filter(|cell| cell.value().name() == "th")
                .map(stripped_text)
                .collect()
        })
        .unwrap_or_default()
}

fn is_footnote_row(cells: &[ElementRef<'_>]) -> bool {
    let [cell] = cells else {
        return false;
    };
    let spans_columns = cell
        .value()
        .attr("colspan")
        .is_some_and(|span| span.trim() != "1");
    spans_columns && raw_text(*cell).contains(FOOTNOTE_MARKER)
}

/// Convert an HTML table into rows of column name → cell text.
///
/// Columns without a header name are keyed `col_<n>` (1-based).
pub fn parse_table(table: Option<ElementRef<'_>>) -> Vec<TableRow> {
    let Some(table) = table else {
        return Vec::new();
    };
    let headers = header_names(table);

    let Some(tbody) = find_first(table, &["tbody"]) else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    for tr in children(tbody).filter(|el| el.value().name() == "tr") {
        let cells: Vec<ElementRef<'_>> = children(tr).filter(|el| tag_is(*el, &["td", "th"])).collect();
        if cells.is_empty() || is_footnote_row(&cells) {
            continue;
        }

        let mut row = TableRow::new();
        for (index, cell) in cells.iter().enumerate() {
            let key = headers
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("col_{}", index + 1));
            row.insert(key, stripped_text(*cell));
        }
        rows.push(row);
    }
    rows
}
