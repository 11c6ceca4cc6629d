//! Plain text tables.

use std::iter;

use itertools::Itertools;
use unicode_width::UnicodeWidthStr;

/// Placed between columns.
pub const COLUMN_SEPARATOR: &str = "  ";

/// Format rows under a header line and a dashed rule.
///
/// Columns are as wide as their widest cell; the last column is not padded.
/// Rows shorter than the header are padded with empty cells. Produces no
/// lines at all when there are no rows.
///
/// ```
/// use scopecat::table::format_table;
///
/// let lines = format_table(&["name", "value"], &[vec!["a", "1"], vec!["bbb", "22"]]);
/// assert_eq!(lines, vec!["name  value", "----  -----", "a     1", "bbb   22"]);
/// ```
pub fn format_table<S: AsRef<str>>(headers: &[&str], rows: &[Vec<S>]) -> Vec<String> {
    if rows.is_empty() {
        return Vec::new();
    }

    let rows = rows
        .iter()
        .map(|row| row.iter().map(AsRef::as_ref).collect_vec())
        .collect_vec();
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(iter::once(headers.len()))
        .max()
        .unwrap_or_default();

    let mut widths = vec![0; columns];
    for row in iter::once(headers).chain(rows.iter().map(Vec::as_slice)) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let rule = widths.iter().map(|width| "-".repeat(*width)).join(COLUMN_SEPARATOR);
    iter::once(format_line(headers, &widths))
        .chain(iter::once(rule))
        .chain(rows.iter().map(|row| format_line(row, &widths)))
        .collect()
}

fn format_line(cells: &[&str], widths: &[usize]) -> String {
    let last = widths.len().saturating_sub(1);
    widths
        .iter()
        .enumerate()
        .map(|(column, width)| {
            let cell = cells.get(column).copied().unwrap_or_default();
            if column == last {
                cell.to_string()
            } else {
                let padding = width.saturating_sub(cell.width());
                format!("{cell}{}", " ".repeat(padding))
            }
        })
        .join(COLUMN_SEPARATOR)
}
