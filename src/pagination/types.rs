//! Pagination types and traits
//!
//! Defines the page source abstraction, the per-operation state machine and
//! the snapshot handed to renderers.

use crate::error::Result;
use crate::http::HttpClient;
use crate::retry::RetryPolicy;
use crate::types::{Item, PageRequest, PageResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

// ============================================================================
// Page Source
// ============================================================================

/// Something that can fetch a page of items
///
/// Implementations must resolve with [`crate::Error::Cancelled`] once `cancel`
/// fires, so callers can tell a superseded request from a failed one.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    /// Fetch a single page
    async fn fetch(&self, request: &PageRequest, cancel: &CancellationToken)
        -> Result<PageResult<T>>;
}

#[async_trait]
impl<T> PageSource<T> for HttpClient
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(
        &self,
        request: &PageRequest,
        cancel: &CancellationToken,
    ) -> Result<PageResult<T>> {
        self.fetch_page(request, Some(cancel)).await
    }
}

// ============================================================================
// Controller Config
// ============================================================================

/// Settings of a [`super::PaginationController`]
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Items requested per page
    pub page_size: u32,
    /// Retry policy for both load-more and refresh
    pub retry: RetryPolicy,
    /// Search term the controller starts with
    pub initial_query: Option<String>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            retry: RetryPolicy::default(),
            initial_query: None,
        }
    }
}

impl ControllerConfig {
    /// Config with the given page size and default retry policy
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    /// Set the retry policy
    #[must_use]
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the initial query
    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.initial_query = Some(query.into());
        self
    }
}

// ============================================================================
// Operation State Machine
// ============================================================================

/// The two kinds of fetch the controller issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Append the next page
    LoadMore,
    /// Replace items with the first page
    Refresh,
}

/// Phase of one operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationPhase {
    /// Nothing in flight
    Idle,
    /// A request is in flight
    Pending,
}

/// How the last settled request of an operation kind ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOutcome {
    /// Result applied to the state
    Succeeded,
    /// Gave up after retries, `last_error` was set
    Failed,
    /// Cancelled, superseded or discarded as stale
    Cancelled,
}

/// A request that currently owns an operation kind
#[derive(Debug, Clone)]
pub(crate) struct ActiveRequest {
    pub(crate) id: u64,
    pub(crate) generation: u64,
    pub(crate) token: CancellationToken,
}

/// `Idle -> Pending -> {Succeeded, Failed, Cancelled} -> Idle`
///
/// At most one request owns the tracker. Starting a new one hands back the
/// previous owner's token so the caller can cancel it.
#[derive(Debug, Default)]
pub(crate) struct OperationTracker {
    active: Option<ActiveRequest>,
    last_outcome: Option<OperationOutcome>,
}

impl OperationTracker {
    pub(crate) fn phase(&self) -> OperationPhase {
        if self.active.is_some() {
            OperationPhase::Pending
        } else {
            OperationPhase::Idle
        }
    }

    pub(crate) fn last_outcome(&self) -> Option<OperationOutcome> {
        self.last_outcome
    }

    /// Pending on behalf of the given query generation
    pub(crate) fn is_pending_for(&self, generation: u64) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| a.generation == generation)
    }

    pub(crate) fn owns(&self, id: u64) -> bool {
        self.active.as_ref().is_some_and(|a| a.id == id)
    }

    /// Take ownership, returning the superseded request if any
    pub(crate) fn begin(&mut self, request: ActiveRequest) -> Option<ActiveRequest> {
        self.active.replace(request)
    }

    /// Settle the request `id`; ignored when it no longer owns the tracker
    pub(crate) fn settle(&mut self, id: u64, outcome: OperationOutcome) -> bool {
        if !self.owns(id) {
            return false;
        }
        self.active = None;
        self.last_outcome = Some(outcome);
        true
    }

    /// Cancel whatever is in flight
    pub(crate) fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            active.token.cancel();
            self.last_outcome = Some(OperationOutcome::Cancelled);
        }
    }
}

// ============================================================================
// Results & Snapshots
// ============================================================================

/// Why an operation did not issue a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A load-more for the current query is already in flight
    InFlight,
    /// No pages left for the current query
    Exhausted,
    /// The controller was disposed
    Disposed,
}

/// Result of a `load_more` or `refresh` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Page applied; number of items it carried
    Completed { items: usize },
    /// No request was issued
    Skipped(SkipReason),
    /// Cancelled or superseded; state untouched
    Cancelled,
    /// Arrived after the query changed; state untouched
    Discarded,
    /// Failed after retries; message stored as `last_error`
    Failed(String),
}

impl LoadOutcome {
    /// Whether a page was applied
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Overall controller status, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerStatus {
    Refreshing,
    LoadingMore,
    Exhausted,
    Idle,
}

/// Read-only copy of the paging state for renderers
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub items: Vec<T>,
    pub query: Option<String>,
    pub next_offset: u64,
    pub exhausted: bool,
    pub is_loading_more: bool,
    pub is_refreshing: bool,
    pub last_error: Option<String>,
    pub status: ControllerStatus,
    pub load_more_outcome: Option<OperationOutcome>,
    pub refresh_outcome: Option<OperationOutcome>,
}

impl<T: Item> Snapshot<T> {
    /// Ids of the loaded items, in order
    pub fn ids(&self) -> Vec<T::Id> {
        self.items.iter().map(Item::id).collect()
    }

    /// Number of loaded items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is loaded
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
