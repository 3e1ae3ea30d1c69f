//! Non-blocking set of in-flight futures, drained once per frame.
//!
//! The render loop must never wait on a collaborator, so futures are
//! polled with a no-op waker: a completed future is picked up on the next
//! frame that calls `poll_ready`, whichever frame that is.

use std::future::Future;
use std::task::{Context, Poll};

use futures::future::{AbortHandle, Abortable, FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::task::noop_waker_ref;

pub struct PendingSet<T> {
    futures: FuturesUnordered<LocalBoxFuture<'static, Option<T>>>,
}

impl<T: 'static> PendingSet<T> {
    pub fn new() -> Self {
        Self {
            futures: FuturesUnordered::new(),
        }
    }

    /// Track a future. The returned handle aborts it; an aborted future
    /// is removed on the next poll without yielding a value.
    pub fn push<F>(&mut self, future: F) -> AbortHandle
    where
        F: Future<Output = T> + 'static,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let future = Abortable::new(future, registration).map(|result| result.ok());
        self.futures.push(future.boxed_local());
        handle
    }

    /// Collect every future that has completed since the last call.
    pub fn poll_ready(&mut self) -> Vec<T> {
        let mut cx = Context::from_waker(noop_waker_ref());
        let mut ready = Vec::new();
        while let Poll::Ready(Some(item)) = self.futures.poll_next_unpin(&mut cx) {
            if let Some(value) = item {
                ready.push(value);
            }
        }
        ready
    }

    /// Number of futures still tracked (including aborted ones not yet polled).
    pub fn len(&self) -> usize {
        self.futures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.futures.is_empty()
    }

    /// Forget every tracked future without polling it again.
    pub fn clear(&mut self) {
        self.futures.clear();
    }
}

impl<T: 'static> Default for PendingSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
