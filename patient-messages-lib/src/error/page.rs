//! Pager error types

/// Errors produced when building a [`PageState`](crate::pager::PageState).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    /// Rows per page must be at least one.
    #[error("rows per page must be positive")]
    ZeroRowsPerPage,
}
