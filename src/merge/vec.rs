use super::shutdown::{Shutdown, Slot};
use super::{from_iter, Merge as MergeTrait, Mode};
use crate::source::{IntoSource, Source};
use crate::utils::{self, WakerVec};

use core::fmt;
use core::pin::Pin;
use core::task::{ready, Context, Poll};
use futures_core::stream::{FusedStream, Stream};

/// A source that merges multiple sources into a single source.
///
/// This `struct` is created by the [`merge`] and [`merge_with`] functions,
/// and by the [`Merge`] trait. See their documentation for more.
///
/// The merge is itself a [`Source`], so merges nest, and a [`Stream`] of
/// `Result`s.
///
/// [`merge`]: crate::merge()
/// [`merge_with`]: crate::merge_with()
/// [`Merge`]: super::Merge
#[must_use = "sources do nothing unless polled"]
#[pin_project::pin_project]
pub struct Merge<S>
where
    S: Source,
{
    #[pin]
    sources: Vec<Option<S>>,
    slots: Vec<Slot>,
    wakers: WakerVec,
    mode: Mode,
    state: State,
    live: usize,
    cursor: usize,
    shutdown: Option<Shutdown<S::Error>>,
    detached: Option<Shutdown<S::Error>>,
    failure: Option<S::Error>,
    deferred: Option<S::Error>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Draining,
    Closed,
}

enum Settled<T, E> {
    Value(T),
    Exhausted,
    Failed(E),
}

impl<S> Merge<S>
where
    S: Source,
{
    pub(crate) fn new(mode: Mode, sources: Vec<S>) -> Self {
        let len = sources.len();
        tracing::debug!(sources = len, %mode, "merging sources");
        Self {
            wakers: WakerVec::new(len),
            slots: vec![Slot::Unpolled; len],
            sources: sources.into_iter().map(Some).collect(),
            mode,
            state: State::Running,
            live: len,
            cursor: 0,
            shutdown: None,
            detached: None,
            failure: None,
            deferred: None,
        }
    }

    /// The shutdown mode of this merge.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The number of sources which are still being raced.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if no source is being raced anymore.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Returns `true` once the merge has terminated. A closed merge never
    /// polls its sources for values again.
    pub fn is_closed(&self) -> bool {
        self.state == State::Closed
    }

    /// Race the outstanding requests until one of them settles.
    fn poll_race(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Settled<S::Item, S::Error>> {
        let mut this = self.project();

        // Short-circuit if we have no sources left to race
        if *this.live == 0 {
            return Poll::Ready(Settled::Exhausted);
        }

        let len = this.sources.len();
        let mut readiness = this.wakers.readiness().lock().unwrap();
        readiness.set_waker(cx.waker());

        // Scan round-robin, starting after the source which settled last.
        loop {
            if !readiness.any_ready() {
                // Nothing is ready yet
                return Poll::Pending;
            }

            let index = *this.cursor;
            *this.cursor = (index + 1) % len;

            if !readiness.clear_ready(index) || this.slots[index] == Slot::Retired {
                continue;
            }

            // unlock readiness so we don't deadlock when polling
            drop(readiness);

            let mut cx = Context::from_waker(this.wakers.get(index).unwrap());
            let mut entry = utils::get_pin_mut_from_vec(this.sources.as_mut(), index).unwrap();
            let polled = match entry.as_mut().as_pin_mut() {
                Some(source) => source.poll_next(&mut cx),
                None => Poll::Ready(None),
            };

            match polled {
                Poll::Ready(Some(Ok(item))) => {
                    // Issue the next request. The source is polled for it on
                    // the next call, never before.
                    this.slots[index] = Slot::Requested;
                    this.wakers.readiness().lock().unwrap().set_ready(index);
                    return Poll::Ready(Settled::Value(item));
                }
                Poll::Ready(None) => {
                    tracing::trace!(index, "source exhausted");
                    this.slots[index] = Slot::Retired;
                    entry.set(None);
                    *this.live -= 1;
                    if *this.live == 0 {
                        return Poll::Ready(Settled::Exhausted);
                    }
                }
                Poll::Ready(Some(Err(error))) => {
                    tracing::debug!(index, "source failed");
                    this.slots[index] = Slot::Retired;
                    entry.set(None);
                    *this.live -= 1;
                    return Poll::Ready(Settled::Failed(error));
                }
                Poll::Pending => this.slots[index] = Slot::InFlight,
            }

            // Lock readiness so we can use it again
            readiness = this.wakers.readiness().lock().unwrap();
        }
    }

    /// Leave the running state and prepare the shutdown of the remaining
    /// sources according to the mode.
    fn begin_shutdown(self: Pin<&mut Self>) {
        let this = self.project();
        *this.state = State::Draining;
        tracing::debug!(mode = %this.mode, live = *this.live, "shutting down remaining sources");

        if !this.mode.stops_sources() {
            return;
        }
        *this.shutdown = Some(match *this.mode {
            Mode::StopAndWait => Shutdown::new(this.slots),
            _ => Shutdown::stop_only(this.slots),
        });
        this.wakers.readiness().lock().unwrap().set_all_ready();
    }

    /// Drive the shutdown and close the merge.
    ///
    /// Under `stop-and-wait` this waits for every source. Under
    /// `stop-no-wait` every source is polled to stop once, and the stops
    /// which did not finish are carried on by later calls.
    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut this = self.project();
        if *this.state != State::Draining {
            return Poll::Ready(());
        }

        if let Some(mut shutdown) = this.shutdown.take() {
            let stopped = drain(&mut shutdown, this.sources.as_mut(), this.slots, this.wakers, cx);
            if *this.mode == Mode::StopAndWait {
                if stopped.is_pending() {
                    *this.shutdown = Some(shutdown);
                    return Poll::Pending;
                }
                *this.deferred = shutdown.take_error();
            } else if stopped.is_pending() {
                tracing::debug!(pending = shutdown.remaining(), "continuing stops in the background");
                *this.detached = Some(shutdown);
            }
        }

        *this.state = State::Closed;
        *this.live = 0;
        tracing::debug!(failed = this.deferred.is_some(), "shutdown complete");
        Poll::Ready(())
    }

    /// Make progress on stops which were left unfinished by `stop-no-wait`.
    fn poll_detached(self: Pin<&mut Self>, cx: &mut Context<'_>) {
        let this = self.project();
        if let Some(shutdown) = this.detached.as_mut() {
            if drain(shutdown, this.sources, this.slots, this.wakers, cx).is_ready() {
                tracing::trace!("background stops finished");
                *this.detached = None;
            }
        }
    }
}

/// Poll every draining source which was woken, dropping the ones which
/// stopped. Ready once no source is left draining.
fn drain<S: Source>(
    shutdown: &mut Shutdown<S::Error>,
    mut sources: Pin<&mut Vec<Option<S>>>,
    slots: &mut [Slot],
    wakers: &WakerVec,
    cx: &mut Context<'_>,
) -> Poll<()> {
    let mut readiness = wakers.readiness().lock().unwrap();
    readiness.set_waker(cx.waker());

    for index in 0..slots.len() {
        if !shutdown.is_draining(index) || !readiness.clear_ready(index) {
            continue;
        }

        // unlock readiness so we don't deadlock when polling
        drop(readiness);

        let mut cx = Context::from_waker(wakers.get(index).unwrap());
        let mut entry = utils::get_pin_mut_from_vec(sources.as_mut(), index).unwrap();
        let stopped = match entry.as_mut().as_pin_mut() {
            Some(source) => shutdown.poll_source(index, source, &mut cx).is_ready(),
            None => {
                shutdown.finish(index);
                true
            }
        };
        if stopped {
            slots[index] = Slot::Retired;
            entry.set(None);
        }

        // Lock readiness so we can use it again
        readiness = wakers.readiness().lock().unwrap();
    }

    if shutdown.is_finished() {
        Poll::Ready(())
    } else {
        Poll::Pending
    }
}

impl<S> fmt::Debug for Merge<S>
where
    S: Source,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Merge")
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("live", &self.live)
            .finish()
    }
}

impl<S> Source for Merge<S>
where
    S: Source,
{
    type Item = S::Item;
    type Error = S::Error;

    fn poll_next(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Self::Item, Self::Error>>> {
        loop {
            let state = self.state;
            match state {
                State::Running => match ready!(self.as_mut().poll_race(cx)) {
                    Settled::Value(item) => return Poll::Ready(Some(Ok(item))),
                    Settled::Exhausted => {
                        tracing::trace!("all sources exhausted");
                        *self.as_mut().project().state = State::Closed;
                        return Poll::Ready(None);
                    }
                    Settled::Failed(error) => {
                        *self.as_mut().project().failure = Some(error);
                        self.as_mut().begin_shutdown();
                    }
                },
                State::Draining => {
                    ready!(self.as_mut().poll_shutdown(cx));
                    let this = self.project();
                    let error = this.failure.take().or_else(|| this.deferred.take());
                    return Poll::Ready(error.map(Err));
                }
                State::Closed => {
                    self.as_mut().poll_detached(cx);
                    return Poll::Ready(self.project().deferred.take().map(Err));
                }
            }
        }
    }

    fn poll_stop(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        if self.state == State::Running {
            tracing::trace!("stop requested");
            self.as_mut().begin_shutdown();
        }
        ready!(self.as_mut().poll_shutdown(cx));
        self.as_mut().poll_detached(cx);

        let this = self.project();
        match this.failure.take().or_else(|| this.deferred.take()) {
            Some(error) => Poll::Ready(Err(error)),
            None => Poll::Ready(Ok(())),
        }
    }
}

impl<S> Stream for Merge<S>
where
    S: Source,
{
    type Item = Result<S::Item, S::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Source::poll_next(self, cx)
    }
}

impl<S> FusedStream for Merge<S>
where
    S: Source,
{
    fn is_terminated(&self) -> bool {
        self.state == State::Closed && self.deferred.is_none()
    }
}

impl<S> FromIterator<S> for Merge<S>
where
    S: Source,
{
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        from_iter(Mode::default(), iter)
    }
}

impl<S> MergeTrait for Vec<S>
where
    S: IntoSource,
{
    type Item = S::Item;
    type Error = S::Error;
    type Source = Merge<S::IntoSource>;

    fn merge_with(self, mode: Mode) -> Self::Source {
        from_iter(mode, self)
    }
}
