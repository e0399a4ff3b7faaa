//! Pagination/search controller
//!
//! Owns the paging state and decides when to fetch, how pages merge, which
//! requests get cancelled, and what error a renderer gets to see.

use super::state::PagingState;
use super::types::{
    ActiveRequest, ControllerConfig, LoadOutcome, OperationKind, OperationOutcome, OperationPhase,
    PageSource, SkipReason, Snapshot,
};
use crate::error::Result;
use crate::types::{normalize_query, Item, PageRequest, PageResult};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Controller for one paged, searchable list
///
/// Cloning is cheap and every clone drives the same state, so operations can
/// be spawned onto the runtime. The state lock is never held across an await.
pub struct PaginationController<T: Item> {
    inner: Arc<Inner<T>>,
}

struct Inner<T: Item> {
    source: Arc<dyn PageSource<T>>,
    config: ControllerConfig,
    state: Mutex<PagingState<T>>,
    /// Parent of every request token
    root: CancellationToken,
}

impl<T: Item> Inner<T> {
    fn lock(&self) -> MutexGuard<'_, PagingState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Item> Drop for Inner<T> {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

impl<T: Item> Clone for PaginationController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Item> PaginationController<T> {
    /// Create a controller over a shared page source
    pub fn new(source: Arc<dyn PageSource<T>>, config: ControllerConfig) -> Self {
        let query = normalize_query(config.initial_query.as_deref());
        Self {
            inner: Arc::new(Inner {
                source,
                config,
                state: Mutex::new(PagingState::new(query)),
                root: CancellationToken::new(),
            }),
        }
    }

    /// Create a controller that owns its page source
    pub fn from_source<S>(source: S, config: ControllerConfig) -> Self
    where
        S: PageSource<T> + 'static,
    {
        Self::new(Arc::new(source), config)
    }

    /// Items requested per page
    pub fn page_size(&self) -> u32 {
        self.inner.config.page_size
    }

    /// Current search term
    pub fn query(&self) -> Option<String> {
        self.inner.lock().query.clone()
    }

    /// Whether `dispose` was called
    pub fn is_disposed(&self) -> bool {
        self.inner.lock().disposed
    }

    /// Phase of an operation kind, including requests left over from an
    /// earlier query
    pub fn phase(&self, kind: OperationKind) -> OperationPhase {
        self.inner.lock().tracker_mut(kind).phase()
    }

    /// Copy of the state for rendering
    pub fn snapshot(&self) -> Snapshot<T> {
        self.inner.lock().snapshot()
    }

    /// Fetch and append the next page.
    ///
    /// Skipped while a load for the current query is in flight or once the
    /// list is exhausted. A pending load left over from an earlier query is
    /// cancelled and replaced.
    pub async fn load_more(&self) -> LoadOutcome {
        let (request, pending) = {
            let mut state = self.inner.lock();
            if state.disposed {
                return LoadOutcome::Skipped(SkipReason::Disposed);
            }
            if state.is_loading_more() {
                return LoadOutcome::Skipped(SkipReason::InFlight);
            }
            if state.exhausted {
                return LoadOutcome::Skipped(SkipReason::Exhausted);
            }

            let request = PageRequest::new(self.page_size(), state.next_offset)
                .with_query(state.query.as_deref());
            let pending = self.begin(&mut state, OperationKind::LoadMore);
            (request, pending)
        };

        debug!(
            "Loading page: offset={} limit={} query={:?} (request #{})",
            request.offset, request.limit, request.query, pending.id
        );
        let result = self.fetch_with_retry(&request, &pending.token).await;
        pending.complete(result)
    }

    /// Fetch the first page again and replace the list with it.
    ///
    /// Allowed in any state, including exhausted. Does not touch an in-flight
    /// load-more; an older refresh still in flight is superseded.
    pub async fn refresh(&self) -> LoadOutcome {
        let (request, pending) = {
            let mut state = self.inner.lock();
            if state.disposed {
                return LoadOutcome::Skipped(SkipReason::Disposed);
            }

            let request =
                PageRequest::new(self.page_size(), 0).with_query(state.query.as_deref());
            let pending = self.begin(&mut state, OperationKind::Refresh);
            (request, pending)
        };

        info!(
            "Refreshing list: query={:?} (request #{})",
            request.query, pending.id
        );
        let result = self.fetch_with_retry(&request, &pending.token).await;
        pending.complete(result)
    }

    /// Apply a new (already debounced) search term.
    ///
    /// Clears the list when the normalized term differs from the current one
    /// and returns `true`; nothing is fetched.
    pub fn on_query_change(&self, query: &str) -> bool {
        let query = normalize_query(Some(query));
        let mut state = self.inner.lock();
        if state.disposed || state.query == query {
            return false;
        }

        info!("Query changed from {:?} to {:?}, resetting", state.query, query);
        state.reset(query);
        true
    }

    /// Cancel everything in flight; later operations are skipped
    pub fn dispose(&self) {
        let mut state = self.inner.lock();
        if state.disposed {
            return;
        }
        state.disposed = true;
        state.load_more.cancel();
        state.refresh.cancel();
        drop(state);

        self.inner.root.cancel();
        info!("Controller disposed");
    }

    fn begin<'a>(&'a self, state: &mut PagingState<T>, kind: OperationKind) -> PendingOp<'a, T> {
        let id = state.next_request_id();
        let generation = state.generation;
        let token = self.inner.root.child_token();

        let active = ActiveRequest {
            id,
            generation,
            token: token.clone(),
        };
        if let Some(previous) = state.tracker_mut(kind).begin(active) {
            debug!("Superseding {:?} request #{}", kind, previous.id);
            previous.token.cancel();
        }
        state.last_error = None;

        PendingOp {
            inner: &self.inner,
            kind,
            id,
            generation,
            token,
            settled: false,
        }
    }

    async fn fetch_with_retry(
        &self,
        request: &PageRequest,
        token: &CancellationToken,
    ) -> Result<PageResult<T>> {
        let source = &self.inner.source;
        self.inner
            .config
            .retry
            .run(token, |attempt| {
                if attempt > 1 {
                    debug!("Attempt {} for offset {}", attempt, request.offset);
                }
                source.fetch(request, token)
            })
            .await
    }
}

impl<T: Item> std::fmt::Debug for PaginationController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("PaginationController")
            .field("config", &self.inner.config)
            .field("query", &state.query)
            .field("items", &state.items.len())
            .field("next_offset", &state.next_offset)
            .field("exhausted", &state.exhausted)
            .finish_non_exhaustive()
    }
}

/// An in-flight request that must settle its tracker exactly once.
///
/// Dropping it unsettled (the caller's future was dropped) counts as a
/// cancellation, so the loading flag can never get stuck.
struct PendingOp<'a, T: Item> {
    inner: &'a Inner<T>,
    kind: OperationKind,
    id: u64,
    generation: u64,
    token: CancellationToken,
    settled: bool,
}

impl<T: Item> PendingOp<'_, T> {
    fn complete(mut self, result: Result<PageResult<T>>) -> LoadOutcome {
        self.settled = true;
        let kind = self.kind;
        let mut state = self.inner.lock();

        if !state.tracker_mut(kind).owns(self.id) {
            debug!("{:?} request #{} was superseded, dropping result", kind, self.id);
            return LoadOutcome::Cancelled;
        }

        if state.generation != self.generation {
            debug!(
                "{:?} request #{} belongs to an older query, dropping result",
                kind, self.id
            );
            state
                .tracker_mut(kind)
                .settle(self.id, OperationOutcome::Cancelled);
            return LoadOutcome::Discarded;
        }

        let (outcome, settled_as) = match result {
            Ok(page) => {
                let items = match kind {
                    OperationKind::LoadMore => state.append_page(page),
                    OperationKind::Refresh => state.replace_with_first_page(page),
                };
                debug!(
                    "{:?} request #{} applied {} items (next_offset={}, exhausted={})",
                    kind, self.id, items, state.next_offset, state.exhausted
                );
                (LoadOutcome::Completed { items }, OperationOutcome::Succeeded)
            }
            Err(e) if e.is_cancelled() => (LoadOutcome::Cancelled, OperationOutcome::Cancelled),
            Err(e) => {
                warn!("{:?} request #{} failed: {}", kind, self.id, e);
                let message = e.user_message();
                state.last_error = Some(message.clone());
                (LoadOutcome::Failed(message), OperationOutcome::Failed)
            }
        };

        state.tracker_mut(kind).settle(self.id, settled_as);
        outcome
    }
}

impl<T: Item> Drop for PendingOp<'_, T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        self.token.cancel();
        self.inner
            .lock()
            .tracker_mut(self.kind)
            .settle(self.id, OperationOutcome::Cancelled);
    }
}
