// src/presidents/grid.rs

//! Flatten an HTML `<table>` into a rectangular grid of cell texts.
//!
//! `colspan` repeats a cell's text across the columns it covers, `rowspan`
//! carries it down into the following rows, so every row lines up with the
//! header. Text inside `<style>`/`<script>` is ignored.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

use crate::error::{Result, WrangleError};

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("table selector"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("row selector"));

/// Grid of the first `<table>` in `html`.
pub fn first_table_grid(html: &str) -> Result<Vec<Vec<String>>> {
    let doc = Html::parse_document(html);
    let table = doc.select(&TABLE).next().ok_or(WrangleError::NoTable)?;
    let grid = table_grid(table);
    debug!(rows = grid.len(), "flattened table");
    Ok(grid)
}

/// A cell still hanging down from a `rowspan` above.
struct Carry {
    text: String,
    rows_left: usize,
}

pub fn table_grid(table: ElementRef<'_>) -> Vec<Vec<String>> {
    let mut grid = Vec::new();
    let mut carry: Vec<Option<Carry>> = Vec::new();

    for tr in table.select(&ROW) {
        let mut cells = tr
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|e| matches!(e.value().name(), "th" | "td"));
        let mut row: Vec<String> = Vec::new();
        let mut col = 0;

        loop {
            if let Some(text) = take_carry(&mut carry, col) {
                row.push(text);
                col += 1;
                continue;
            }
            let Some(cell) = cells.next() else { break };
            let text = cell_text(cell);
            let colspan = span(cell, "colspan", MAX_COLSPAN);
            let rowspan = span(cell, "rowspan", MAX_ROWSPAN);
            for _ in 0..colspan {
                if rowspan > 1 {
                    if carry.len() <= col {
                        carry.resize_with(col + 1, || None);
                    }
                    carry[col] = Some(Carry {
                        text: text.clone(),
                        rows_left: rowspan - 1,
                    });
                }
                row.push(text.clone());
                col += 1;
            }
        }

        // rowspans to the right of this row's last cell
        while col < carry.len() {
            row.push(take_carry(&mut carry, col).unwrap_or_default());
            col += 1;
        }
        while row.last().is_some_and(|c| c.is_empty()) {
            row.pop();
        }

        if !row.is_empty() {
            grid.push(row);
        }
    }
    grid
}

fn take_carry(carry: &mut [Option<Carry>], col: usize) -> Option<String> {
    let slot = carry.get_mut(col)?;
    let c = slot.as_mut()?;
    let text = c.text.clone();
    c.rows_left -= 1;
    if c.rows_left == 0 {
        *slot = None;
    }
    Some(text)
}

/// Browsers cap spans at these values.
const MAX_COLSPAN: usize = 1000;
const MAX_ROWSPAN: usize = 65534;

fn span(cell: ElementRef<'_>, attr: &str, max: usize) -> usize {
    cell.value()
        .attr(attr)
        .and_then(|v| v.trim().trim_end_matches(';').parse::<usize>().ok())
        .filter(|&n| n > 0)
        .map_or(1, |n| n.min(max))
}

/// Visible text of a cell, whitespace collapsed. `<br>` reads as a space.
pub fn cell_text(cell: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in cell.descendants() {
        let text = match node.value() {
            Node::Text(text) => text,
            Node::Element(e) if e.name() == "br" => {
                out.push(' ');
                continue;
            }
            _ => continue,
        };
        let hidden = node.ancestors().any(|a| {
            ElementRef::wrap(a).is_some_and(|e| matches!(e.value().name(), "style" | "script"))
        });
        if !hidden {
            out.push_str(text);
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colspan_repeats_across_columns() {
        let html = r#"<table>
            <tr><th>No.</th><th colspan="2">Party</th></tr>
            <tr><td>1</td><td style="background:#fff"></td><td>Unaffiliated</td></tr>
        </table>"#;
        let grid = first_table_grid(html).unwrap();
        assert_eq!(grid[0], vec!["No.", "Party", "Party"]);
        assert_eq!(grid[1], vec!["1", "", "Unaffiliated"]);
    }

    #[test]
    fn rowspan_carries_down() {
        let html = r#"<table>
            <tr><th>Name</th><th>Term</th><th>VP</th></tr>
            <tr><td rowspan="2">John Adams</td><td rowspan="2">1797–1801</td><td>Jefferson</td></tr>
            <tr><td>Nobody</td></tr>
            <tr><td>Thomas Jefferson</td><td>1801–1809</td><td rowspan="3">Burr</td></tr>
            <tr><td>X</td></tr>
        </table>"#;
        let grid = first_table_grid(html).unwrap();
        assert_eq!(grid[2], vec!["John Adams", "1797–1801", "Nobody"]);
        assert_eq!(grid[4], vec!["X", "", "Burr"]);
    }

    #[test]
    fn ignores_style_text_and_collapses_whitespace() {
        let html = r#"<table><tr><td><style>.x{color:red}</style>Harry   S.
            Truman<br>(1884–1972)</td></tr></table>"#;
        let grid = first_table_grid(html).unwrap();
        assert_eq!(grid[0][0], "Harry S. Truman (1884–1972)");
    }

    #[test]
    fn line_break_separates_words() {
        let html = "<table><tr><td>Grover<br>Cleveland</td></tr></table>";
        let grid = first_table_grid(html).unwrap();
        assert_eq!(grid[0][0], "Grover Cleveland");
    }

    #[test]
    fn oversized_spans_are_capped() {
        let html = r#"<table>
            <tr><td colspan="1000000000">x</td></tr>
            <tr><td rowspan="4000000000">y</td><td>z</td></tr>
            <tr><td>w</td></tr>
        </table>"#;
        let grid = first_table_grid(html).unwrap();
        assert_eq!(grid[0].len(), MAX_COLSPAN);
        assert!(grid[0].iter().all(|c| c == "x"));
        assert_eq!(grid[2], vec!["y", "w"]);
    }

    #[test]
    fn missing_table_is_error() {
        assert!(matches!(
            first_table_grid("<p>nothing here</p>"),
            Err(WrangleError::NoTable)
        ));
    }
}
