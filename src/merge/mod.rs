//! Fan-in of many sources into one.
//!
//! A merge yields the values of all its sources as soon as each becomes
//! available, in completion order rather than source order. The values of a
//! single source keep their relative order.
//!
//! | Outcome of the race | What the merge does |
//! | --- | --- |
//! | a value | yields it; the source gets a new request |
//! | exhaustion | retires the source and keeps racing the others |
//! | a failure | retires the source, shuts the others down, yields the failure |
//!
//! How the remaining sources are shut down is selected with [`Mode`].

use crate::source::{IntoSource, Source};

pub(crate) mod array;
mod mode;
pub(crate) mod shutdown;
pub(crate) mod vec;

pub use mode::{Mode, ParseModeError};

/// Combines multiple sources into a single source of all their outputs.
///
/// Values are yielded as soon as they're received, and the merge continues
/// until every source has been exhausted or one of them fails. The output
/// ordering between sources is not guaranteed.
///
/// # Examples
///
/// ```
/// use fanin::prelude::*;
/// use fanin::source;
/// use futures_lite::future::block_on;
///
/// block_on(async {
///     let a = source::iter::<_, ()>([1, 2]);
///     let b = source::iter::<_, ()>([3]);
///     let mut s = [a, b].merge();
///
///     let mut buf = vec![];
///     while let Some(n) = s.next().await {
///         buf.push(n.unwrap());
///     }
///     buf.sort_unstable();
///     assert_eq!(&buf, &[1, 2, 3]);
/// })
/// ```
pub trait Merge {
    /// The values the merged sources produce.
    type Item;

    /// The failure the merged sources can settle with.
    type Error;

    /// The combined source.
    type Source: Source<Item = Self::Item, Error = Self::Error>;

    /// Combine multiple sources into a single source, using the default
    /// [`Mode::StopNoWait`] shutdown.
    fn merge(self) -> Self::Source
    where
        Self: Sized,
    {
        self.merge_with(Mode::default())
    }

    /// Combine multiple sources into a single source, shutting remaining
    /// sources down according to `mode`.
    fn merge_with(self, mode: Mode) -> Self::Source;
}

pub(crate) fn from_iter<I>(mode: Mode, sources: I) -> vec::Merge<<I::Item as IntoSource>::IntoSource>
where
    I: IntoIterator,
    I::Item: IntoSource,
{
    vec::Merge::new(mode, sources.into_iter().map(IntoSource::into_source).collect())
}
