use core::fmt;
use core::marker::PhantomData;
use core::pin::Pin;
use core::task::{ready, Context, Poll};

use futures_core::Stream;
use pin_project::pin_project;

use super::Source;

/// A source which yields the items of an infallible stream.
///
/// This `struct` is created by the [`from_stream`] function. See its
/// documentation for more.
#[pin_project]
#[must_use = "sources do nothing unless polled"]
pub struct FromStream<S, E> {
    #[pin]
    stream: Option<S>,
    _error: PhantomData<fn() -> E>,
}

/// Converts a [`Stream`] into a source that never fails.
///
/// Stopping the source drops the stream in place, which runs its
/// destructors. A stopped source is exhausted.
pub fn from_stream<S: Stream, E>(stream: S) -> FromStream<S, E> {
    FromStream {
        stream: Some(stream),
        _error: PhantomData,
    }
}

impl<S: fmt::Debug, E> fmt::Debug for FromStream<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromStream")
            .field("stream", &self.stream)
            .finish()
    }
}

impl<S: Stream, E> Source for FromStream<S, E> {
    type Item = S::Item;
    type Error = E;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Result<S::Item, E>>> {
        match self.project().stream.as_pin_mut() {
            Some(stream) => Poll::Ready(ready!(stream.poll_next(cx)).map(Ok)),
            None => Poll::Ready(None),
        }
    }

    fn poll_stop(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), E>> {
        self.project().stream.set(None);
        Poll::Ready(Ok(()))
    }
}

/// A source which yields the items of a stream of results.
///
/// This `struct` is created by the [`from_try_stream`] function. See its
/// documentation for more.
#[derive(Debug)]
#[pin_project]
#[must_use = "sources do nothing unless polled"]
pub struct FromTryStream<S> {
    #[pin]
    stream: Option<S>,
}

/// Converts a [`Stream`] of `Result`s into a source.
///
/// An `Err` item is a failure of the source. Stopping the source drops the
/// stream in place, which runs its destructors. A stopped source is
/// exhausted.
///
/// # Examples
///
/// ```
/// use fanin::prelude::*;
/// use fanin::source;
/// use futures_lite::future::block_on;
/// use futures_lite::stream;
///
/// block_on(async {
///     let mut s = source::from_try_stream(stream::iter([Ok(1), Err("boom")]));
///     assert_eq!(s.next().await, Some(Ok(1)));
///     assert_eq!(s.next().await, Some(Err("boom")));
/// })
/// ```
pub fn from_try_stream<S, T, E>(stream: S) -> FromTryStream<S>
where
    S: Stream<Item = Result<T, E>>,
{
    FromTryStream {
        stream: Some(stream),
    }
}

impl<S, T, E> Source for FromTryStream<S>
where
    S: Stream<Item = Result<T, E>>,
{
    type Item = T;
    type Error = E;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Result<T, E>>> {
        match self.project().stream.as_pin_mut() {
            Some(stream) => stream.poll_next(cx),
            None => Poll::Ready(None),
        }
    }

    fn poll_stop(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), E>> {
        self.project().stream.set(None);
        Poll::Ready(Ok(()))
    }
}
