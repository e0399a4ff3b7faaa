//! Pagination module
//!
//! Client-side paging and search state for a single list.
//!
//! # Overview
//!
//! [`PaginationController`] accumulates pages fetched from a [`PageSource`]
//! (the HTTP client, or anything else), resets when the search term changes,
//! cancels superseded requests and retries failures. Renderers read
//! [`Snapshot`]s and call the operations; they never touch the state.
//!
//! `load_more` and `refresh` are tracked independently and never cancel each
//! other. A slow load-more can therefore append after a refresh of the same
//! query has replaced the list.

mod controller;
mod driver;
mod state;
mod types;

pub use controller::PaginationController;
pub use driver::{drive_queries, drive_queries_with};
pub use types::{
    ControllerConfig, ControllerStatus, LoadOutcome, OperationKind, OperationOutcome,
    OperationPhase, PageSource, SkipReason, Snapshot,
};
