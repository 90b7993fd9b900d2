//! Selection coordination against an externally owned selection set.
//!
//! The caller owns the set of selected ids. This module only derives
//! checkbox flags from it and turns checkbox toggles into
//! [`SelectionIntent`]s delivered through optional callbacks.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::model::{Record, RecordId};

type Callback = Arc<dyn Fn() + Send + Sync>;
type IdCallback = Arc<dyn Fn(&RecordId) + Send + Sync>;

/// Rendered state of the header ("select all") checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderCheckbox {
    /// No loaded row selected, or nothing loaded.
    #[default]
    Unchecked,
    /// Some but not all rows selected.
    Indeterminate,
    /// Every loaded row selected.
    Checked,
}

/// Flags derived from the loaded records and the selection.
///
/// Never both true. Recomputed on every render rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionFlags {
    /// Every loaded row is selected (header checked).
    pub all_selected: bool,
    /// Some but not all loaded rows are selected (header indeterminate).
    pub some_selected: bool,
}

impl SelectionFlags {
    /// Derive flags for `records` given the caller's selection.
    ///
    /// Only rows whose id is selected count; selected ids that match no
    /// loaded record are ignored. An empty record set is never selected.
    pub fn derive(records: &[Record], selected: &[RecordId]) -> Self {
        let selected: HashSet<&RecordId> = selected.iter().collect();
        Self::derive_with(records, &selected)
    }

    pub(crate) fn derive_with(records: &[Record], selected: &HashSet<&RecordId>) -> Self {
        let total = records.len();
        let hits = records.iter().filter(|r| selected.contains(&r.id)).count();

        Self {
            all_selected: total > 0 && hits == total,
            some_selected: hits > 0 && hits < total,
        }
    }

    /// Header checkbox state. `all_selected` wins over `some_selected`.
    pub fn header(&self) -> HeaderCheckbox {
        if self.all_selected {
            HeaderCheckbox::Checked
        } else if self.some_selected {
            HeaderCheckbox::Indeterminate
        } else {
            HeaderCheckbox::Unchecked
        }
    }
}

/// A requested change to the caller's selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionIntent {
    /// Header checkbox checked.
    SelectAll,
    /// Header checkbox cleared.
    DeselectAll,
    /// Row checkbox checked.
    SelectOne(RecordId),
    /// Row checkbox cleared.
    DeselectOne(RecordId),
}

impl SelectionIntent {
    /// Apply the intent to a caller-owned selection.
    ///
    /// `SelectAll` replaces the selection with every loaded id. The core
    /// never calls this; it is offered to callers that keep a plain list.
    pub fn apply(&self, selection: &mut Vec<RecordId>, records: &[Record]) {
        match self {
            Self::SelectAll => {
                let mut seen = HashSet::with_capacity(records.len());
                selection.clear();
                selection.extend(
                    records
                        .iter()
                        .filter(|r| seen.insert(&r.id))
                        .map(|r| r.id.clone()),
                );
            }
            Self::DeselectAll => selection.clear(),
            Self::SelectOne(id) => {
                if !selection.contains(id) {
                    selection.push(id.clone());
                }
            }
            Self::DeselectOne(id) => selection.retain(|s| s != id),
        }
    }
}

/// Optional handlers for selection intents.
///
/// A missing handler is a silent no-op.
#[derive(Clone, Default)]
pub struct SelectionCallbacks {
    on_select_all: Option<Callback>,
    on_deselect_all: Option<Callback>,
    on_select_one: Option<IdCallback>,
    on_deselect_one: Option<IdCallback>,
}

impl SelectionCallbacks {
    /// Create callbacks with every handler unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler for [`SelectionIntent::SelectAll`].
    pub fn on_select_all(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_select_all = Some(Arc::new(f));
        self
    }

    /// Handler for [`SelectionIntent::DeselectAll`].
    pub fn on_deselect_all(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_deselect_all = Some(Arc::new(f));
        self
    }

    /// Handler for [`SelectionIntent::SelectOne`], given the row id.
    pub fn on_select_one(mut self, f: impl Fn(&RecordId) + Send + Sync + 'static) -> Self {
        self.on_select_one = Some(Arc::new(f));
        self
    }

    /// Handler for [`SelectionIntent::DeselectOne`], given the row id.
    pub fn on_deselect_one(mut self, f: impl Fn(&RecordId) + Send + Sync + 'static) -> Self {
        self.on_deselect_one = Some(Arc::new(f));
        self
    }

    /// Deliver an intent to its handler, if one is set.
    pub fn dispatch(&self, intent: &SelectionIntent) {
        log::trace!("Selection intent {:?}", intent);
        match intent {
            SelectionIntent::SelectAll => {
                if let Some(f) = &self.on_select_all {
                    f();
                }
            }
            SelectionIntent::DeselectAll => {
                if let Some(f) = &self.on_deselect_all {
                    f();
                }
            }
            SelectionIntent::SelectOne(id) => {
                if let Some(f) = &self.on_select_one {
                    f(id);
                }
            }
            SelectionIntent::DeselectOne(id) => {
                if let Some(f) = &self.on_deselect_one {
                    f(id);
                }
            }
        }
    }
}

impl fmt::Debug for SelectionCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionCallbacks")
            .field("on_select_all", &self.on_select_all.is_some())
            .field("on_deselect_all", &self.on_deselect_all.is_some())
            .field("on_select_one", &self.on_select_one.is_some())
            .field("on_deselect_one", &self.on_deselect_one.is_some())
            .finish()
    }
}

/// Reconciles the caller's selection with the currently loaded records.
///
/// Built per render from borrowed inputs; holds no state of its own.
pub struct SelectionCoordinator<'a> {
    records: &'a [Record],
    selected: HashSet<&'a RecordId>,
    callbacks: &'a SelectionCallbacks,
}

impl<'a> SelectionCoordinator<'a> {
    /// Build a coordinator for this render's records, selection and handlers.
    pub fn new(
        records: &'a [Record],
        selected: &'a [RecordId],
        callbacks: &'a SelectionCallbacks,
    ) -> Self {
        Self {
            records,
            selected: selected.iter().collect(),
            callbacks,
        }
    }

    /// Current checkbox flags.
    pub fn flags(&self) -> SelectionFlags {
        SelectionFlags::derive_with(self.records, &self.selected)
    }

    /// Current header checkbox state.
    pub fn header_checkbox(&self) -> HeaderCheckbox {
        self.flags().header()
    }

    /// Whether the row with this id is checked.
    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.selected.contains(id)
    }

    /// Header checkbox toggled to `checked`.
    ///
    /// The caller decides what "all" means; on an empty table the flags stay false.
    pub fn toggle_all(&self, checked: bool) -> SelectionIntent {
        let intent = if checked {
            SelectionIntent::SelectAll
        } else {
            SelectionIntent::DeselectAll
        };
        self.callbacks.dispatch(&intent);
        intent
    }

    /// Row checkbox for `id` toggled to `checked`.
    pub fn toggle_one(&self, id: &RecordId, checked: bool) -> SelectionIntent {
        let intent = if checked {
            SelectionIntent::SelectOne(id.clone())
        } else {
            SelectionIntent::DeselectOne(id.clone())
        };
        self.callbacks.dispatch(&intent);
        intent
    }
}
