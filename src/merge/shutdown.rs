//! Bookkeeping for stopping the remaining sources of a merge.
//!
//! Under `stop-and-wait` every remaining source is driven through up to two
//! phases: first its outstanding request (if any) is allowed to settle, then
//! it is asked to stop and awaited. Under `stop-no-wait` only the stop phase
//! runs, and its failures are ignored. Sources drain independently of each
//! other; only the order within one source is fixed.

use core::pin::Pin;
use core::task::{ready, Context, Poll};

use crate::source::Source;

/// What the merge knows about the outstanding request of one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    /// The first request was issued when the merge was built, but the race
    /// has not polled the source yet.
    Unpolled,
    /// The previous request settled with a value. The next one is issued but
    /// the source has not been polled for it.
    Requested,
    /// The source was polled and returned `Pending`.
    InFlight,
    /// Exhausted, failed or stopped. The source is never polled again.
    Retired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Settling,
    Stopping,
    Done,
}

pub(crate) struct Shutdown<E> {
    phases: Vec<Phase>,
    remaining: usize,
    collect: bool,
    error: Option<E>,
}

impl<E> Shutdown<E> {
    /// Start draining every source which is not yet retired, settling
    /// outstanding requests first and collecting failures.
    pub(crate) fn new(slots: &[Slot]) -> Self {
        Self::with_phases(slots, true, |slot| match slot {
            Slot::Requested => Phase::Stopping,
            Slot::Unpolled | Slot::InFlight => Phase::Settling,
            Slot::Retired => Phase::Done,
        })
    }

    /// Ask every source which is not yet retired to stop, ignoring failures.
    /// Outstanding requests are abandoned.
    pub(crate) fn stop_only(slots: &[Slot]) -> Self {
        Self::with_phases(slots, false, |slot| match slot {
            Slot::Retired => Phase::Done,
            _ => Phase::Stopping,
        })
    }

    fn with_phases(slots: &[Slot], collect: bool, phase: impl Fn(&Slot) -> Phase) -> Self {
        let phases: Vec<_> = slots.iter().map(phase).collect();
        let remaining = phases.iter().filter(|p| **p != Phase::Done).count();
        Self {
            phases,
            remaining,
            collect,
            error: None,
        }
    }

    /// The number of sources which have not stopped yet.
    pub(crate) fn remaining(&self) -> usize {
        self.remaining
    }

    /// Whether the source at `index` still needs to be polled.
    pub(crate) fn is_draining(&self, index: usize) -> bool {
        self.phases[index] != Phase::Done
    }

    /// Returns `true` once every source finished stopping.
    pub(crate) fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// Drive one source towards being stopped.
    ///
    /// Returns `Poll::Ready` once the source has stopped. The value of an
    /// in-flight request is discarded; failures are collected.
    pub(crate) fn poll_source<S>(
        &mut self,
        index: usize,
        mut source: Pin<&mut S>,
        cx: &mut Context<'_>,
    ) -> Poll<()>
    where
        S: Source<Error = E> + ?Sized,
    {
        if self.phases[index] == Phase::Settling {
            if let Some(Err(error)) = ready!(source.as_mut().poll_next(cx)) {
                tracing::trace!(index, "in-flight request failed during shutdown");
                self.record(error);
            }
            self.phases[index] = Phase::Stopping;
        }

        if self.phases[index] == Phase::Stopping {
            if let Err(error) = ready!(source.poll_stop(cx)) {
                tracing::trace!(index, "source failed to stop");
                self.record(error);
            }
            self.finish(index);
        }

        Poll::Ready(())
    }

    /// Mark a source as stopped without polling it.
    pub(crate) fn finish(&mut self, index: usize) {
        if self.phases[index] != Phase::Done {
            self.phases[index] = Phase::Done;
            self.remaining -= 1;
        }
    }

    /// Take the first error observed while draining.
    pub(crate) fn take_error(&mut self) -> Option<E> {
        self.error.take()
    }

    fn record(&mut self, error: E) {
        if !self.collect {
            tracing::trace!("ignoring shutdown failure");
        } else if self.error.is_none() {
            self.error = Some(error);
        } else {
            tracing::debug!("discarding additional shutdown failure");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{self, SourceExt};
    use futures::task::noop_waker;

    #[test]
    fn only_live_sources_drain() {
        let slots = [Slot::Requested, Slot::Retired, Slot::InFlight, Slot::Unpolled];
        let shutdown = Shutdown::<()>::new(&slots);
        assert!(shutdown.is_draining(0));
        assert!(!shutdown.is_draining(1));
        assert!(shutdown.is_draining(2));
        assert!(shutdown.is_draining(3));
        assert_eq!(shutdown.remaining(), 3);
        assert!(!shutdown.is_finished());
    }

    #[test]
    fn unpolled_source_settles_its_first_request() {
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        let mut shutdown = Shutdown::new(&[Slot::Unpolled]);
        let source = source::from_try_stream(futures_lite::stream::iter([Err::<i32, _>("first")]));
        let mut source = core::pin::pin!(source);

        assert!(shutdown.poll_source(0, source.as_mut(), &mut cx).is_ready());
        assert_eq!(shutdown.take_error(), Some("first"));
    }

    #[test]
    fn stop_only_ignores_failures() {
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        let mut shutdown = Shutdown::stop_only(&[Slot::InFlight, Slot::Unpolled]);
        let mut source = source::iter::<_, &str>([1])
            .on_stop(|| async { Err("stop") })
            .boxed();

        assert!(shutdown.poll_source(0, source.as_mut(), &mut cx).is_ready());
        assert_eq!(shutdown.remaining(), 1);
        assert_eq!(shutdown.take_error(), None);
    }

    #[test]
    fn in_flight_failure_is_collected_before_stop() {
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        let mut shutdown = Shutdown::new(&[Slot::InFlight]);
        let mut source = source::from_try_stream(futures_lite::stream::iter([Err::<i32, _>("in flight")]))
            .on_stop(|| async { Err("stop") })
            .boxed();

        assert!(shutdown.poll_source(0, source.as_mut(), &mut cx).is_ready());
        assert!(shutdown.is_finished());
        assert_eq!(shutdown.take_error(), Some("in flight"));
        assert_eq!(shutdown.take_error(), None);
    }
}
