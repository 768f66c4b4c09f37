//! Plain-text rendering of select results

use crate::schema::{Record, TableSchema};

/// Renders records as a bordered table with columns in schema order.
///
/// A column missing from a record renders as an empty cell.
pub fn render_records(schema: &TableSchema, records: &[Record]) -> String {
    let headers: Vec<&str> = schema.columns().iter().map(|c| c.name.as_str()).collect();

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            headers
                .iter()
                .map(|column| record.get(column).map(ToString::to_string).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let border = {
        let segments: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
        format!("+{}+", segments.join("+"))
    };

    let format_row = |cells: &[&str]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width - cell.chars().count();
                format!(" {}{} ", cell, " ".repeat(pad))
            })
            .collect();
        format!("|{}|", padded.join("|"))
    };

    let mut lines = Vec::with_capacity(rows.len() + 4);
    lines.push(border.clone());
    lines.push(format_row(headers.as_slice()));
    lines.push(border.clone());
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(format_row(cells.as_slice()));
    }
    lines.push(border);
    lines.join("\n")
}
