//! Paging state owned by the controller

use super::types::{ControllerStatus, OperationKind, OperationTracker, Snapshot};
use crate::types::{Item, PageResult};

/// Accumulated pages for one query, plus request bookkeeping
#[derive(Debug)]
pub(crate) struct PagingState<T> {
    pub(crate) items: Vec<T>,
    pub(crate) next_offset: u64,
    pub(crate) exhausted: bool,
    pub(crate) last_error: Option<String>,
    pub(crate) query: Option<String>,
    /// Bumped on every effective query change
    pub(crate) generation: u64,
    pub(crate) load_more: OperationTracker,
    pub(crate) refresh: OperationTracker,
    pub(crate) disposed: bool,
    next_request_id: u64,
}

impl<T: Item> PagingState<T> {
    pub(crate) fn new(query: Option<String>) -> Self {
        Self {
            items: Vec::new(),
            next_offset: 0,
            exhausted: false,
            last_error: None,
            query,
            generation: 0,
            load_more: OperationTracker::default(),
            refresh: OperationTracker::default(),
            disposed: false,
            next_request_id: 0,
        }
    }

    pub(crate) fn next_request_id(&mut self) -> u64 {
        self.next_request_id += 1;
        self.next_request_id
    }

    pub(crate) fn tracker_mut(&mut self, kind: OperationKind) -> &mut OperationTracker {
        match kind {
            OperationKind::LoadMore => &mut self.load_more,
            OperationKind::Refresh => &mut self.refresh,
        }
    }

    /// Start over for a new query. In-flight requests are left alone; their
    /// results are dropped because the generation moved on.
    pub(crate) fn reset(&mut self, query: Option<String>) {
        self.items.clear();
        self.next_offset = 0;
        self.exhausted = false;
        self.last_error = None;
        self.query = query;
        self.generation += 1;
    }

    /// Append a page fetched at `next_offset`
    pub(crate) fn append_page(&mut self, page: PageResult<T>) -> usize {
        let added = page.items.len();
        self.items.extend(page.items);
        self.next_offset += added as u64;
        self.exhausted = self.next_offset >= page.total_count;
        added
    }

    /// Replace everything with the first page
    pub(crate) fn replace_with_first_page(&mut self, page: PageResult<T>) -> usize {
        let count = page.items.len();
        self.items = page.items;
        self.next_offset = count as u64;
        self.exhausted = count as u64 >= page.total_count;
        count
    }

    pub(crate) fn is_loading_more(&self) -> bool {
        self.load_more.is_pending_for(self.generation)
    }

    pub(crate) fn is_refreshing(&self) -> bool {
        self.refresh.is_pending_for(self.generation)
    }

    pub(crate) fn status(&self) -> ControllerStatus {
        if self.is_refreshing() {
            ControllerStatus::Refreshing
        } else if self.is_loading_more() {
            ControllerStatus::LoadingMore
        } else if self.exhausted {
            ControllerStatus::Exhausted
        } else {
            ControllerStatus::Idle
        }
    }

    pub(crate) fn snapshot(&self) -> Snapshot<T> {
        Snapshot {
            items: self.items.clone(),
            query: self.query.clone(),
            next_offset: self.next_offset,
            exhausted: self.exhausted,
            is_loading_more: self.is_loading_more(),
            is_refreshing: self.is_refreshing(),
            last_error: self.last_error.clone(),
            status: self.status(),
            load_more_outcome: self.load_more.last_outcome(),
            refresh_outcome: self.refresh.last_outcome(),
        }
    }
}
