//! Prompt-safe markdown rendering of extracted tables.

/// Body rows kept when rendering a table for a prompt.
pub const MAX_TABLE_ROWS: usize = 12;

/// Flatten line breaks and trim, without otherwise altering the cell.
pub fn normalise_cell(cell: &str) -> String {
    cell.replace(['\n', '\r'], " ").trim().to_string()
}

/// Render a bounded markdown table.
///
/// Rows are padded or cut to the header width. A missing header becomes
/// `col1..colN` from the first row. Only the first [`MAX_TABLE_ROWS`] rows
/// are kept; a truncation note records how many were dropped.
pub fn render_markdown_table(header: Option<&[String]>, rows: &[Vec<String>]) -> String {
    let header: Vec<String> = match header {
        Some(h) if !h.is_empty() => h.iter().map(|c| normalise_cell(c)).collect(),
        _ => {
            let n_cols = rows.first().map(Vec::len).unwrap_or(0);
            (1..=n_cols).map(|i| format!("col{}", i)).collect()
        }
    };

    if rows.is_empty() && header.is_empty() {
        return "(Empty table)".to_string();
    }

    let width = header.len();
    let mut lines = Vec::with_capacity(rows.len().min(MAX_TABLE_ROWS) + 4);
    lines.push(format!("| {} |", header.join(" | ")));
    lines.push(format!("| {} |", vec!["---"; width].join(" | ")));

    for row in rows.iter().take(MAX_TABLE_ROWS) {
        let cells: Vec<String> = (0..width)
            .map(|i| row.get(i).map(|c| normalise_cell(c)).unwrap_or_default())
            .collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }

    if rows.len() > MAX_TABLE_ROWS {
        lines.push(String::new());
        lines.push(format!(
            "(Truncated: showing {} of {} rows.)",
            MAX_TABLE_ROWS,
            rows.len()
        ));
    }

    lines.join("\n")
}

/// Prefix a rendered table with its id and page.
pub fn render_table_fallback(table_id: &str, page: u32, markdown: &str) -> String {
    format!("[Table {} | page {}]\n{}", table_id, page, markdown)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_renders_header_and_rows() {
        let header = row(&["Time", "Event"]);
        let rows = vec![row(&["02:10", "NEWS2 7\nnot escalated"]), row(&["02:40"])];

        let md = render_markdown_table(Some(&header), &rows);
        assert_eq!(
            md,
            "| Time | Event |\n| --- | --- |\n| 02:10 | NEWS2 7 not escalated |\n| 02:40 |  |"
        );
    }

    #[test]
    fn test_missing_header_uses_column_numbers() {
        let rows = vec![row(&["a", "b", "c"])];
        let md = render_markdown_table(None, &rows);
        assert!(md.starts_with("| col1 | col2 | col3 |"));
    }

    #[test]
    fn test_long_tables_are_truncated() {
        let rows: Vec<Vec<String>> = (0..20).map(|i| row(&[&i.to_string()])).collect();
        let md = render_markdown_table(Some(&row(&["n"])), &rows);

        assert!(md.ends_with("(Truncated: showing 12 of 20 rows.)"));
        assert!(md.contains("| 11 |"));
        assert!(!md.contains("| 12 |"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(render_markdown_table(None, &[]), "(Empty table)");
    }

    #[test]
    fn test_fallback_prefix() {
        assert_eq!(
            render_table_fallback("p02_t01", 2, "(Empty table)"),
            "[Table p02_t01 | page 2]\n(Empty table)"
        );
    }
}
