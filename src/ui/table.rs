//! Plain-text table layout for grid views.

use unicode_width::UnicodeWidthStr;

use crate::core::render::GridView;

/// Formats a grid as box-drawn text lines. An empty grid produces no lines.
pub fn grid_lines(grid: &GridView) -> Vec<String> {
    if grid.is_empty() {
        return Vec::new();
    }

    let widths = column_widths(grid);
    let mut lines = Vec::new();

    lines.push(border_line("┌", "┐", "┬", &widths));
    lines.push(content_line(&grid.headers, &widths));
    if !grid.rows.is_empty() {
        lines.push(border_line("├", "┤", "┼", &widths));
        for row in &grid.rows {
            lines.push(content_line(row, &widths));
        }
    }
    lines.push(border_line("└", "┘", "┴", &widths));

    lines
}

fn column_widths(grid: &GridView) -> Vec<usize> {
    let columns = grid
        .headers
        .len()
        .max(grid.rows.iter().map(|row| row.len()).max().unwrap_or(0));

    let mut widths = vec![0usize; columns];
    for row in std::iter::once(&grid.headers).chain(grid.rows.iter()) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(UnicodeWidthStr::width(cell.as_str()));
        }
    }
    widths
}

fn border_line(left: &str, right: &str, junction: &str, widths: &[usize]) -> String {
    let mut line = String::from(left);
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            line.push_str(junction);
        }
        line.push_str(&"─".repeat(width + 2));
    }
    line.push_str(right);
    line
}

fn content_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("│");
    for (i, width) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        let padding = width.saturating_sub(UnicodeWidthStr::width(cell));
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(padding));
        line.push_str(" │");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_grid_produces_no_lines() {
        assert!(grid_lines(&GridView::default()).is_empty());
    }

    #[test]
    fn grid_renders_with_aligned_borders() {
        let grid = GridView {
            headers: vec!["Name".to_string(), "Price".to_string()],
            rows: vec![
                vec!["Widget".to_string(), "5".to_string()],
                vec!["Gadget".to_string(), "7".to_string()],
            ],
        };

        let lines = grid_lines(&grid);
        assert_eq!(
            lines,
            vec![
                "┌────────┬───────┐",
                "│ Name   │ Price │",
                "├────────┼───────┤",
                "│ Widget │ 5     │",
                "│ Gadget │ 7     │",
                "└────────┴───────┘",
            ]
        );
    }

    #[test]
    fn header_only_grid_skips_the_separator() {
        let grid = GridView {
            headers: vec!["Feature".to_string(), "A".to_string(), "B".to_string()],
            rows: vec![],
        };

        let lines = grid_lines(&grid);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Feature"));
    }

    #[test]
    fn short_rows_are_padded_to_the_full_column_count() {
        let grid = GridView {
            headers: vec!["A".to_string(), "B".to_string()],
            rows: vec![vec!["only".to_string()]],
        };

        let lines = grid_lines(&grid);
        assert_eq!(lines[3], "│ only │   │");
    }
}
