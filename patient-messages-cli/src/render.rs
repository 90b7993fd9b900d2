//! Plain-text table renderer.

use std::fmt::Write;

use patient_messages_lib::TableView;
use patient_messages_lib::selection::HeaderCheckbox;

const MAX_CELL: usize = 28;

fn checkbox(state: HeaderCheckbox) -> &'static str {
    match state {
        HeaderCheckbox::Unchecked => "[ ]",
        HeaderCheckbox::Indeterminate => "[-]",
        HeaderCheckbox::Checked => "[x]",
    }
}

fn clip(s: &str) -> String {
    if s.chars().count() <= MAX_CELL {
        return s.to_string();
    }
    let mut out: String = s.chars().take(MAX_CELL - 1).collect();
    out.push('…');
    out
}

/// Render a frame to a string.
///
/// A failed load renders as an empty table; the caller reports `view.error`.
pub fn render(view: &TableView) -> String {
    let mut lines: Vec<Vec<String>> = Vec::with_capacity(view.rows.len() + 1);

    let mut header = vec![checkbox(view.header.checkbox).to_string()];
    header.extend(view.header.columns.iter().map(|c| c.to_string()));
    lines.push(header);

    for row in &view.rows {
        lines.push(vec![
            if row.is_selected { "[x]" } else { "[ ]" }.to_string(),
            clip(&row.patient_name),
            clip(&row.room_number),
            clip(&row.attending_person_name),
            row.send_timestamp.clone().unwrap_or_default(),
            row.reply_timestamp.clone().unwrap_or_default(),
            row.latency_text(),
            clip(&row.admin_comments),
        ]);
    }

    let columns = lines.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            lines
                .iter()
                .filter_map(|l| l.get(i))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for line in &lines {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<w$}", cell, w = w))
            .collect();
        let _ = writeln!(out, "{}", cells.join("  ").trim_end());
    }

    if view.is_loading {
        let _ = writeln!(out, "Loading…");
    }

    let pager = &view.pager;
    let range = match pager.displayed_range() {
        Some((from, to)) => format!("{}–{} of {}", from, to, pager.count),
        None => format!("0 of {}", pager.count),
    };
    let options: Vec<String> = pager
        .rows_per_page_options
        .iter()
        .map(|n| {
            if *n == pager.rows_per_page {
                format!("[{}]", n)
            } else {
                n.to_string()
            }
        })
        .collect();
    let _ = writeln!(out, "Rows per page: {}   {}", options.join(" "), range);

    out
}

#[cfg(test)]
mod tests {
    use patient_messages_lib::pager::{PageState, PagerViewModel};
    use patient_messages_lib::{LoadState, Record, RecordId, Timestamp};

    use super::*;

    #[test]
    fn test_render_loaded_table() {
        let state = LoadState::Loaded(vec![
            Record::new(1)
                .with_patient_name("Jane Roe")
                .with_send_timestamp(Timestamp::from_unix(100).unwrap())
                .with_reply_timestamp(Timestamp::from_unix(150).unwrap()),
            Record::new(2).with_patient_name("John Doe"),
        ]);
        let pager = PagerViewModel::new(2, PageState::new(0, 10).unwrap());
        let view = TableView::build(&state, &[RecordId::from(1)], pager);

        let out = render(&view);
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[0].starts_with("[-]  Patient Name"));
        assert!(lines[1].starts_with("[x]  Jane Roe"));
        assert!(lines[1].contains("50s"));
        assert!(lines[2].starts_with("[ ]  John Doe"));
        assert!(lines[2].contains("not available"));
        assert_eq!(lines[3], "Rows per page: 5 [10] 25   1–2 of 2");
    }

    #[test]
    fn test_render_failure() {
        let pager = PagerViewModel::new(0, PageState::default());
        let view = TableView::build(&LoadState::Failed("HTTP 500: boom".into()), &[], pager);

        let out = render(&view);
        assert!(out.starts_with("[ ]  Patient Name"));
        assert!(!out.contains("HTTP 500"));
        assert!(out.contains("0 of 0"));
    }

    #[test]
    fn test_clip_long_cells() {
        let long = "x".repeat(40);
        assert_eq!(clip(&long).chars().count(), MAX_CELL);
        assert_eq!(clip("short"), "short");
    }
}
