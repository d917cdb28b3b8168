//! Pin safety regression tests for merged `!Unpin` sources.

use std::{
    marker::PhantomPinned,
    pin::Pin,
    task::{Context, Poll},
};

use fanin::merge::Mode;
use fanin::prelude::*;
use fanin::source::Source;

struct PinCheckSource {
    self_ptr: Option<*const Self>,
    remaining: usize,
    pending: bool,
    stopped: bool,
    _pinned: PhantomPinned,
}

impl PinCheckSource {
    fn items(items: usize) -> Self {
        Self {
            self_ptr: None,
            remaining: items,
            pending: false,
            stopped: false,
            _pinned: PhantomPinned,
        }
    }

    fn check(self: Pin<&mut Self>) -> &mut Self {
        let this = unsafe { self.get_unchecked_mut() };
        let current = this as *const Self;
        let stored = *this.self_ptr.get_or_insert(current);
        assert_eq!(stored, current, "moved after pinning");
        this
    }
}

impl Source for PinCheckSource {
    type Item = usize;
    type Error = ();

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Result<usize, ()>>> {
        let this = self.check();
        assert!(!this.stopped, "polled after stop");

        // Alternate between pending and ready so every request is in flight once.
        this.pending = !this.pending;
        if this.pending {
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }

        if this.remaining > 0 {
            this.remaining -= 1;
            Poll::Ready(Some(Ok(this.remaining)))
        } else {
            Poll::Ready(None)
        }
    }

    fn poll_stop(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), ()>> {
        self.check().stopped = true;
        Poll::Ready(Ok(()))
    }
}

#[test]
fn merge_no_move_while_draining() {
    futures_lite::future::block_on(async {
        let sources: Vec<_> = (0..10).map(|i| PinCheckSource::items(i + 5)).collect();
        let mut s = fanin::merge(sources);
        for _ in 0..5 {
            assert!(matches!(s.next().await, Some(Ok(_))));
        }

        // Moving the merge keeps its sources in place.
        let mut moved = s;
        let mut count = 5;
        while let Some(item) = moved.next().await {
            item.unwrap();
            count += 1;
        }
        assert_eq!(count, (5..15).sum::<usize>());
    });
}

#[test]
fn merge_no_move_while_stopping() {
    for mode in [Mode::StopNoWait, Mode::StopAndWait] {
        futures_lite::future::block_on(async {
            let sources: Vec<_> = (0..10).map(|_| PinCheckSource::items(3)).collect();
            let mut s = fanin::merge_with(mode, sources);
            for _ in 0..15 {
                assert!(matches!(s.next().await, Some(Ok(_))));
            }

            let mut moved = s;
            assert_eq!(moved.stop().await, Ok(()));
            assert_eq!(moved.next().await, None);
        });
    }
}
