//! Table presenter: pure projection from load state and selection to view-models.

use std::collections::HashSet;

use crate::model::{Record, RecordId, ResponseLatency};
use crate::pager::PagerViewModel;
use crate::selection::{HeaderCheckbox, SelectionFlags};
use crate::store::LoadState;

/// Column labels, in display order, after the checkbox column.
pub const COLUMNS: &[&str] = &[
    "Patient Name",
    "Room Number",
    "Attending Person Name",
    "Send Timestamp",
    "Reply Timestamp",
    "Time Difference",
    "Comments",
];

/// Header row: the "select all" checkbox and column labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderViewModel {
    /// "Select all" checkbox state.
    pub checkbox: HeaderCheckbox,
    /// Column labels, see [`COLUMNS`].
    pub columns: &'static [&'static str],
}

impl HeaderViewModel {
    /// Checkbox renders as checked.
    pub fn is_checked(&self) -> bool {
        self.checkbox == HeaderCheckbox::Checked
    }

    /// Checkbox renders as indeterminate.
    pub fn is_indeterminate(&self) -> bool {
        self.checkbox == HeaderCheckbox::Indeterminate
    }
}

/// One render-ready table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowViewModel {
    pub id: RecordId,
    /// Row id is in the caller's selection.
    pub is_selected: bool,
    pub patient_name: String,
    pub room_number: String,
    pub attending_person_name: String,
    /// Formatted send time; `None` when missing.
    pub send_timestamp: Option<String>,
    /// Formatted reply time; `None` until replied.
    pub reply_timestamp: Option<String>,
    pub response_latency: ResponseLatency,
    pub admin_comments: String,
    pub avatar_url: Option<String>,
}

impl RowViewModel {
    fn from_record(record: &Record, is_selected: bool) -> Self {
        Self {
            id: record.id.clone(),
            is_selected,
            patient_name: record.patient_name.clone().unwrap_or_default(),
            room_number: record.room_number.clone().unwrap_or_default(),
            attending_person_name: record.attending_person_name.clone().unwrap_or_default(),
            send_timestamp: record.send_timestamp.map(|ts| ts.display()),
            reply_timestamp: record.reply_timestamp.map(|ts| ts.display()),
            response_latency: record.response_latency(),
            admin_comments: record.admin_comments.clone().unwrap_or_default(),
            avatar_url: record.avatar_url.clone(),
        }
    }

    /// Latency cell text ("not available" when a timestamp is missing).
    pub fn latency_text(&self) -> String {
        self.response_latency.to_string()
    }
}

/// Header plus rows, handed to the table-view renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub header: HeaderViewModel,
    /// One row per loaded record, in received order.
    pub rows: Vec<RowViewModel>,
}

/// Project the store state and the caller's selection into view-models.
///
/// Rows appear only when records are loaded, in the order received.
pub fn project(state: &LoadState, selected: &[RecordId]) -> Projection {
    let records = state.records();
    let selected: HashSet<&RecordId> = selected.iter().collect();

    let rows = records
        .iter()
        .map(|record| RowViewModel::from_record(record, selected.contains(&record.id)))
        .collect::<Vec<_>>();

    let flags = SelectionFlags::derive_with(records, &selected);

    Projection {
        header: HeaderViewModel {
            checkbox: flags.header(),
            columns: COLUMNS,
        },
        rows,
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub header: HeaderViewModel,
    pub rows: Vec<RowViewModel>,
    pub pager: PagerViewModel,
    /// Failure message to show, if the load failed.
    pub error: Option<String>,
    /// The load is still in flight.
    pub is_loading: bool,
}

impl TableView {
    /// Project the state and selection, and attach the pager and load status.
    pub fn build(state: &LoadState, selected: &[RecordId], pager: PagerViewModel) -> Self {
        let Projection { header, rows } = project(state, selected);
        Self {
            header,
            rows,
            pager,
            error: state.error().map(str::to_string),
            is_loading: state.is_loading(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Timestamp;
    use crate::pager::PageState;

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_unix(secs).unwrap()
    }

    fn loaded(ids: &[i64]) -> LoadState {
        LoadState::Loaded(ids.iter().map(|&id| Record::new(id)).collect())
    }

    #[test]
    fn test_scenario_partial_selection() {
        let state = LoadState::Loaded(vec![
            Record::new(1)
                .with_send_timestamp(ts(100))
                .with_reply_timestamp(ts(150)),
            Record::new(2).with_send_timestamp(ts(200)),
        ]);

        let projection = project(&state, &[RecordId::from(1)]);

        assert_eq!(projection.rows.len(), 2);
        assert!(projection.rows[0].is_selected);
        assert_eq!(projection.rows[0].response_latency.seconds(), Some(50));
        assert!(!projection.rows[1].is_selected);
        assert_eq!(projection.rows[1].latency_text(), "not available");
        assert!(projection.rows[1].reply_timestamp.is_none());

        assert!(!projection.header.is_checked());
        assert!(projection.header.is_indeterminate());
    }

    #[test]
    fn test_non_loaded_states_render_no_rows() {
        let selected = [RecordId::from(1)];
        for state in [
            LoadState::Idle,
            LoadState::Loading,
            LoadState::Failed("Data fetch failed".into()),
        ] {
            let projection = project(&state, &selected);
            assert!(projection.rows.is_empty());
            assert_eq!(projection.header.checkbox, HeaderCheckbox::Unchecked);
        }
    }

    #[test]
    fn test_row_order_preserved() {
        let orders: [&[i64]; 3] = [&[1, 2, 3, 4], &[4, 3, 2, 1], &[3, 1, 4, 2]];
        for order in orders {
            let projection = project(&loaded(order), &[]);
            let ids: Vec<RecordId> = projection.rows.iter().map(|r| r.id.clone()).collect();
            let expected: Vec<RecordId> = order.iter().map(|&id| RecordId::from(id)).collect();
            assert_eq!(ids, expected);
        }
    }

    #[test]
    fn test_all_selected_header() {
        let selected = [RecordId::from(2), RecordId::from(1)];
        let projection = project(&loaded(&[1, 2]), &selected);
        assert!(projection.header.is_checked());
        assert!(!projection.header.is_indeterminate());
        assert!(projection.rows.iter().all(|r| r.is_selected));
    }

    #[test]
    fn test_missing_text_fields_render_empty() {
        let projection = project(&loaded(&[1]), &[]);
        let row = &projection.rows[0];
        assert_eq!(row.patient_name, "");
        assert_eq!(row.admin_comments, "");
        assert_eq!(row.send_timestamp, None);
        assert_eq!(row.avatar_url, None);
    }

    #[test]
    fn test_table_view_surfaces_error_and_loading() {
        let pager = PagerViewModel::new(0, PageState::default());

        let view = TableView::build(&LoadState::Failed("HTTP 500: boom".into()), &[], pager.clone());
        assert_eq!(view.error.as_deref(), Some("HTTP 500: boom"));
        assert!(!view.is_loading);
        assert!(view.rows.is_empty());

        let view = TableView::build(&LoadState::Loading, &[], pager);
        assert!(view.is_loading);
        assert!(view.error.is_none());
    }
}
