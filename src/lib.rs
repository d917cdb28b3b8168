//! Fan-in of asynchronous sources, in completion order.
//!
//! This crate merges N independently progressing [`Source`]s into a single
//! source which yields each value as soon as it becomes available. Values of
//! one source keep their order; no order is promised between sources.
//!
//! A source is polled for at most one element at a time. When a source is
//! exhausted it is retired; when it fails, the failure is passed to the
//! consumer unchanged after the remaining sources have been shut down. How
//! they are shut down is configured per merge with a [`Mode`]:
//!
//! - [`Mode::NoStop`]: abandon the remaining sources.
//! - [`Mode::StopNoWait`] (default): ask them to stop, fire and forget.
//! - [`Mode::StopAndWait`]: ask them to stop, wait for all of them, and
//!   surface the first error they report.
//!
//! A consumer which stops pulling early calls [`SourceExt::stop`] on the
//! merge, which runs the same shutdown.
//!
//! # Examples
//!
//! ```rust
//! use fanin::prelude::*;
//! use fanin::source;
//! use futures_lite::future::block_on;
//!
//! block_on(async {
//!     let a = source::iter::<_, &str>([1, 2]);
//!     let b = source::iter::<_, &str>([3, 4]);
//!     let mut s = fanin::merge([a, b]);
//!
//!     let mut out = vec![];
//!     while let Some(n) = s.next().await {
//!         out.push(n?);
//!     }
//!     out.sort_unstable();
//!     assert_eq!(out, [1, 2, 3, 4]);
//!     Ok::<_, &str>(())
//! })
//! .unwrap();
//! ```
//!
//! Stop early, waiting for every source to clean up:
//!
//! ```rust
//! use fanin::merge::Mode;
//! use fanin::prelude::*;
//! use fanin::source;
//! use futures_lite::future::block_on;
//!
//! block_on(async {
//!     let a = source::iter::<_, &str>(1..).on_stop(|| async { Err("a failed") });
//!     let b = source::iter::<_, &str>(1..);
//!     let mut s = fanin::merge_with(Mode::StopAndWait, [a.boxed(), b.boxed()]);
//!
//!     assert_eq!(s.next().await, Some(Ok(1)));
//!     assert_eq!(s.stop().await, Err("a failed"));
//!     assert_eq!(s.next().await, None);
//! })
//! ```
//!
//! [`Source`]: source::Source
//! [`Mode`]: merge::Mode
//! [`Mode::NoStop`]: merge::Mode::NoStop
//! [`Mode::StopNoWait`]: merge::Mode::StopNoWait
//! [`Mode::StopAndWait`]: merge::Mode::StopAndWait
//! [`SourceExt::stop`]: source::SourceExt::stop

#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, unreachable_pub)]

mod utils;

/// The fanin prelude.
pub mod prelude {
    pub use super::merge::Merge as _;
    pub use super::source::IntoSource as _;
    pub use super::source::Source as _;
    pub use super::source::SourceExt as _;
}

pub mod merge;
pub mod source;

use merge::Mode;
use source::IntoSource;

/// Helper types for merging a runtime-sized collection of sources.
pub mod vec {
    pub use crate::merge::vec::Merge;
}

/// Merge `sources` into one, shutting them down with the default
/// [`Mode::StopNoWait`].
///
/// Every element of `sources` is converted into a source once, here. An
/// empty collection produces a merge which is exhausted immediately.
///
/// # Examples
///
/// ```
/// use fanin::prelude::*;
/// use fanin::source;
/// use futures_lite::future::block_on;
///
/// block_on(async {
///     let mut s = fanin::merge(Vec::<source::Iter<std::vec::IntoIter<u8>, ()>>::new());
///     assert_eq!(s.next().await, None);
/// })
/// ```
pub fn merge<I>(sources: I) -> vec::Merge<<I::Item as IntoSource>::IntoSource>
where
    I: IntoIterator,
    I::Item: IntoSource,
{
    merge_with(Mode::default(), sources)
}

/// Merge `sources` into one, shutting remaining sources down according to
/// `mode` when the merge terminates early.
pub fn merge_with<I>(mode: Mode, sources: I) -> vec::Merge<<I::Item as IntoSource>::IntoSource>
where
    I: IntoIterator,
    I::Item: IntoSource,
{
    merge::from_iter(mode, sources)
}
