//! Text-grid rendering helpers shared by the engines' `render` output.
//!
//! Output is for human eyes only; nothing in the crate parses it back.

/// Excel-style alphabetic labels (A, B, ..., Z, AA, AB, ...).
#[must_use]
pub fn alphabetic_labels(count: usize, uppercase: bool) -> Vec<String> {
    let base = if uppercase { b'A' } else { b'a' };
    (1..=count)
        .map(|mut index| {
            let mut label = Vec::new();
            while index > 0 {
                let remainder = (index - 1) % 26;
                label.push(base + remainder as u8);
                index = (index - 1) / 26;
            }
            label.reverse();
            String::from_utf8(label).expect("labels are ASCII")
        })
        .collect()
}

/// Render a rectangular grid with bordered cells and row/column labels.
///
/// `cell_width` is a minimum; cells grow to fit the widest content or
/// column label. Each row of `cells` must have `col_labels.len()` entries.
#[must_use]
pub fn render_grid(
    cells: &[Vec<String>],
    row_labels: &[String],
    col_labels: &[String],
    cell_width: usize,
    padding: usize,
) -> String {
    assert_eq!(cells.len(), row_labels.len(), "one label per row");
    for row in cells {
        assert_eq!(row.len(), col_labels.len(), "one label per column");
    }

    let content_width = cells
        .iter()
        .flatten()
        .chain(col_labels.iter())
        .map(String::len)
        .max()
        .unwrap_or(1)
        .max(cell_width)
        .max(1);
    let cell_total = content_width + padding * 2;
    let label_width = row_labels.iter().map(String::len).max().unwrap_or(0);

    let format_cell = |text: &str| {
        let left = (content_width - text.len()) / 2;
        let right = content_width - text.len() - left;
        format!(
            "{pad}{blank_l}{text}{blank_r}{pad}",
            pad = " ".repeat(padding),
            blank_l = " ".repeat(left),
            blank_r = " ".repeat(right),
        )
    };
    let render_line = |row: &[String], label: &str| {
        let body = row.iter().map(|cell| format_cell(cell)).collect::<Vec<_>>();
        format!("{label:>label_width$} |{}|", body.join("|"))
    };

    let separator = format!(
        "{} +{}+",
        " ".repeat(label_width),
        vec!["-".repeat(cell_total); col_labels.len()].join("+")
    );

    let mut lines = vec![render_line(col_labels, ""), separator.clone()];
    for (row, label) in cells.iter().zip(row_labels) {
        lines.push(render_line(row, label));
        lines.push(separator.clone());
    }
    lines.join("\n")
}
