//! Pager passthrough.
//!
//! Page state is owned by the caller. The table only reads it for display
//! and forwards pager events unchanged.

use std::fmt;
use std::sync::Arc;

use crate::error::PageError;

/// Rows-per-page choices offered by the pager.
pub const ROWS_PER_PAGE_OPTIONS: &[usize] = &[5, 10, 25];

type PageCallback = Arc<dyn Fn(usize) + Send + Sync>;

/// Caller-owned pagination state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    page: usize,
    rows_per_page: usize,
}

impl PageState {
    /// Creates a page state. `rows_per_page` must be positive.
    pub fn new(page: usize, rows_per_page: usize) -> Result<Self, PageError> {
        if rows_per_page == 0 {
            return Err(PageError::ZeroRowsPerPage);
        }
        Ok(Self {
            page,
            rows_per_page,
        })
    }

    /// Zero-based page index.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Rows shown per page, at least one.
    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page: 0,
            rows_per_page: ROWS_PER_PAGE_OPTIONS[0],
        }
    }
}

/// What the pager widget is given to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerViewModel {
    /// Total number of records as reported by the caller.
    pub count: usize,
    /// Zero-based page index.
    pub page: usize,
    /// Rows shown per page.
    pub rows_per_page: usize,
    /// Choices offered in the rows-per-page selector.
    pub rows_per_page_options: &'static [usize],
}

impl PagerViewModel {
    /// Build the pager view from the caller's count and page state.
    pub fn new(count: usize, state: PageState) -> Self {
        Self {
            count,
            page: state.page,
            rows_per_page: state.rows_per_page,
            rows_per_page_options: ROWS_PER_PAGE_OPTIONS,
        }
    }

    /// Inclusive 1-based range of rows on the current page, as `(from, to)`.
    ///
    /// `None` when the page lies past the end of `count`.
    pub fn displayed_range(&self) -> Option<(usize, usize)> {
        let from = self.page.checked_mul(self.rows_per_page)?;
        if from >= self.count {
            return None;
        }
        let to = from.saturating_add(self.rows_per_page).min(self.count);
        Some((from + 1, to))
    }
}

/// Optional handlers the pager events are forwarded to.
#[derive(Clone, Default)]
pub struct PagerCallbacks {
    on_page_change: Option<PageCallback>,
    on_rows_per_page_change: Option<PageCallback>,
}

impl PagerCallbacks {
    /// Create callbacks with every handler unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler receiving the requested page index.
    pub fn on_page_change(mut self, f: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_page_change = Some(Arc::new(f));
        self
    }

    /// Handler receiving the requested rows per page.
    pub fn on_rows_per_page_change(mut self, f: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_rows_per_page_change = Some(Arc::new(f));
        self
    }

    /// Forward a page change. No-op without a handler.
    pub fn page_changed(&self, page: usize) {
        if let Some(f) = &self.on_page_change {
            f(page);
        }
    }

    /// Forward a rows-per-page change. No-op without a handler.
    pub fn rows_per_page_changed(&self, rows_per_page: usize) {
        if let Some(f) = &self.on_rows_per_page_change {
            f(rows_per_page);
        }
    }
}

impl fmt::Debug for PagerCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagerCallbacks")
            .field("on_page_change", &self.on_page_change.is_some())
            .field("on_rows_per_page_change", &self.on_rows_per_page_change.is_some())
            .finish()
    }
}
