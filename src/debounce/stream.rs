//! Debounce stream adaptor

use futures::ready;
use futures::Stream;
use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::{Instant, Sleep};

pin_project! {
    /// Stream returned by [`debounce`]
    #[must_use = "streams do nothing unless polled"]
    pub struct Debounced<S: Stream> {
        #[pin]
        stream: S,
        #[pin]
        sleep: Sleep,
        delay: Duration,
        pending: Option<S::Item>,
        finished: bool,
    }
}

/// Re-emit the latest item of `stream` once it has been quiet for `delay`
///
/// Every new item restarts the timer and replaces the held value. When the
/// input ends, a held value is emitted right away before the stream ends.
/// Must be called from within a tokio runtime.
pub fn debounce<S: Stream>(stream: S, delay: Duration) -> Debounced<S> {
    Debounced {
        stream,
        sleep: tokio::time::sleep(delay),
        delay,
        pending: None,
        finished: false,
    }
}

impl<S: Stream> Stream for Debounced<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        while !*this.finished {
            match this.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => {
                    *this.pending = Some(item);
                    this.sleep.as_mut().reset(Instant::now() + *this.delay);
                }
                Poll::Ready(None) => *this.finished = true,
                Poll::Pending => break,
            }
        }

        if *this.finished {
            return Poll::Ready(this.pending.take());
        }

        if this.pending.is_some() {
            ready!(this.sleep.as_mut().poll(cx));
            return Poll::Ready(this.pending.take());
        }

        Poll::Pending
    }
}

/// Extension trait adding `.debounce()` to every stream
pub trait DebounceExt: Stream {
    /// See [`debounce`]
    fn debounce(self, delay: Duration) -> Debounced<Self>
    where
        Self: Sized,
    {
        debounce(self, delay)
    }
}

impl<S: Stream> DebounceExt for S {}
