//! Feeds search input into a controller

use super::controller::PaginationController;
use super::types::{LoadOutcome, Snapshot};
use crate::debounce::DebounceExt;
use crate::error::Result;
use crate::types::Item;
use futures::stream::FuturesUnordered;
use futures::{Stream, StreamExt};
use std::time::Duration;
use tracing::debug;

/// Debounce raw search input and apply every settled term.
///
/// Each term that changes the query resets the controller and starts the
/// first page in the background, so a newer term can supersede a load that
/// is still running. Returns the outcomes of those loads in the order they
/// finished, once the input has ended and every load has settled.
pub async fn drive_queries<T, S>(
    controller: &PaginationController<T>,
    raw_queries: S,
    delay: Duration,
) -> Result<Vec<LoadOutcome>>
where
    T: Item,
    S: Stream<Item = String>,
{
    drive_queries_with(controller, raw_queries, delay, |_, _| {}).await
}

/// Like [`drive_queries`], calling `on_outcome` as each load settles.
///
/// Input keeps being read while loads are in flight.
pub async fn drive_queries_with<T, S, F>(
    controller: &PaginationController<T>,
    raw_queries: S,
    delay: Duration,
    mut on_outcome: F,
) -> Result<Vec<LoadOutcome>>
where
    T: Item,
    S: Stream<Item = String>,
    F: FnMut(&LoadOutcome, &Snapshot<T>),
{
    let settled = raw_queries.debounce(delay);
    tokio::pin!(settled);

    let mut loads = FuturesUnordered::new();
    let mut outcomes = Vec::new();
    let mut input_done = false;

    loop {
        tokio::select! {
            query = settled.next(), if !input_done => {
                let Some(query) = query else {
                    input_done = true;
                    continue;
                };
                if !controller.on_query_change(&query) {
                    debug!("Settled query {:?} unchanged, nothing to load", query);
                    continue;
                }
                let controller = controller.clone();
                loads.push(tokio::spawn(async move { controller.load_more().await }));
            }
            Some(joined) = loads.next() => {
                let outcome = joined?;
                on_outcome(&outcome, &controller.snapshot());
                outcomes.push(outcome);
            }
            else => break,
        }
    }

    Ok(outcomes)
}
