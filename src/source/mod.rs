//! The pull protocol merged sources implement.
//!
//! A [`Source`] is an asynchronous producer which is asked for one element at
//! a time through [`Source::poll_next`], and which can be asked to release its
//! resources early through [`Source::poll_stop`]. Every element is either a
//! value (`Some(Ok(_))`), a failure (`Some(Err(_))`), or the end of the
//! sequence (`None`).
//!
//! # Examples
//!
//! ```
//! use fanin::prelude::*;
//! use fanin::source;
//! use futures_lite::future::block_on;
//!
//! block_on(async {
//!     let mut s = source::iter::<_, ()>([1, 2]);
//!     assert_eq!(s.next().await, Some(Ok(1)));
//!     assert_eq!(s.next().await, Some(Ok(2)));
//!     assert_eq!(s.next().await, None);
//! })
//! ```

use core::ops::DerefMut;
use core::pin::Pin;
use core::task::{Context, Poll};

mod from_stream;
mod into_source;
mod iter;
mod source_ext;
mod with_stop;

pub use from_stream::{from_stream, from_try_stream, FromStream, FromTryStream};
pub use into_source::IntoSource;
pub use iter::{iter, Iter};
pub use source_ext::{Next, SourceExt, Stop};
pub use with_stop::WithStop;

/// A boxed, type-erased [`Source`], for merging sources of different types.
pub type BoxSource<'a, T, E> = Pin<Box<dyn Source<Item = T, Error = E> + 'a>>;

/// An asynchronous producer of values which is polled one element at a time.
///
/// At most one request is outstanding per source: after `poll_next` returned
/// `Poll::Pending` the same request is resumed on the next call, and a new
/// request only starts once the previous one settled.
#[must_use = "sources do nothing unless polled"]
pub trait Source {
    /// The values this source produces.
    type Item;

    /// The failure this source can settle a request or a stop with.
    type Error;

    /// Attempt to pull the next element out of this source.
    ///
    /// Returns `Poll::Ready(None)` once the source is exhausted. A source
    /// which failed is exhausted as well, and is never polled again by the
    /// merge.
    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Self::Item, Self::Error>>>;

    /// Ask the source to stop and release its resources.
    ///
    /// Settles once the cleanup has finished, possibly with an error. The
    /// default implementation has nothing to clean up and settles
    /// immediately.
    fn poll_stop(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        let _ = cx;
        Poll::Ready(Ok(()))
    }
}

impl<S: ?Sized + Source + Unpin> Source for &mut S {
    type Item = S::Item;
    type Error = S::Error;

    fn poll_next(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Self::Item, Self::Error>>> {
        S::poll_next(Pin::new(&mut **self), cx)
    }

    fn poll_stop(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        S::poll_stop(Pin::new(&mut **self), cx)
    }
}

impl<S: ?Sized + Source + Unpin> Source for Box<S> {
    type Item = S::Item;
    type Error = S::Error;

    fn poll_next(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Self::Item, Self::Error>>> {
        Pin::new(&mut **self).poll_next(cx)
    }

    fn poll_stop(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Pin::new(&mut **self).poll_stop(cx)
    }
}

impl<P> Source for Pin<P>
where
    P: DerefMut + Unpin,
    P::Target: Source,
{
    type Item = <P::Target as Source>::Item;
    type Error = <P::Target as Source>::Error;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Self::Item, Self::Error>>> {
        self.get_mut().as_mut().poll_next(cx)
    }

    fn poll_stop(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.get_mut().as_mut().poll_stop(cx)
    }
}
