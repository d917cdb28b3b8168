use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use super::{BoxSource, Source, WithStop};

/// An extension trait for the [`Source`] trait.
pub trait SourceExt: Source {
    /// Pull the next element out of the source.
    ///
    /// Resolves to `Some(Ok(value))`, `Some(Err(error))`, or `None` once the
    /// source is exhausted.
    fn next(&mut self) -> Next<'_, Self>
    where
        Self: Unpin,
    {
        Next { source: self }
    }

    /// Ask the source to stop, resolving once it released its resources.
    ///
    /// This is the close path for a consumer which stops pulling before the
    /// source is exhausted.
    fn stop(&mut self) -> Stop<'_, Self>
    where
        Self: Unpin,
    {
        Stop { source: self }
    }

    /// Run an asynchronous cleanup after the source was asked to stop.
    ///
    /// The hook runs after the source's own stop settled, and only once.
    fn on_stop<F, Fut>(self, hook: F) -> WithStop<Self, F, Fut>
    where
        Self: Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), Self::Error>>,
    {
        WithStop::new(self, hook)
    }

    /// Box the source, erasing its type.
    fn boxed<'a>(self) -> BoxSource<'a, Self::Item, Self::Error>
    where
        Self: Sized + 'a,
    {
        Box::pin(self)
    }
}

impl<S: Source + ?Sized> SourceExt for S {}

/// Future for the [`SourceExt::next`] method.
#[derive(Debug)]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Next<'a, S: ?Sized> {
    source: &'a mut S,
}

impl<S: Source + Unpin + ?Sized> Future for Next<'_, S> {
    type Output = Option<Result<S::Item, S::Error>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut *self.source).poll_next(cx)
    }
}

/// Future for the [`SourceExt::stop`] method.
#[derive(Debug)]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Stop<'a, S: ?Sized> {
    source: &'a mut S,
}

impl<S: Source + Unpin + ?Sized> Future for Stop<'_, S> {
    type Output = Result<(), S::Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut *self.source).poll_stop(cx)
    }
}
