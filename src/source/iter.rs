use core::fmt;
use core::marker::PhantomData;
use core::pin::Pin;
use core::task::{Context, Poll};

use super::Source;

/// A source which yields the elements of an iterator.
///
/// This `struct` is created by the [`iter`] function. See its documentation
/// for more.
#[must_use = "sources do nothing unless polled"]
pub struct Iter<I, E> {
    iter: Option<I>,
    _error: PhantomData<fn() -> E>,
}

/// Converts an iterator into a source that never fails.
///
/// Stopping the source drops the iterator.
///
/// # Examples
///
/// ```
/// use fanin::prelude::*;
/// use fanin::source;
/// use futures_lite::future::block_on;
///
/// block_on(async {
///     let mut s = source::iter::<_, ()>(vec!["a"]);
///     assert_eq!(s.next().await, Some(Ok("a")));
///     assert_eq!(s.next().await, None);
/// })
/// ```
pub fn iter<I: IntoIterator, E>(iter: I) -> Iter<I::IntoIter, E> {
    Iter {
        iter: Some(iter.into_iter()),
        _error: PhantomData,
    }
}

impl<I: fmt::Debug, E> fmt::Debug for Iter<I, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("iter", &self.iter).finish()
    }
}

impl<I, E> Unpin for Iter<I, E> {}

impl<I: Iterator, E> Source for Iter<I, E> {
    type Item = I::Item;
    type Error = E;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Result<I::Item, E>>> {
        Poll::Ready(self.iter.as_mut().and_then(Iterator::next).map(Ok))
    }

    fn poll_stop(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), E>> {
        self.iter = None;
        Poll::Ready(Ok(()))
    }
}
