use fanin::source::{self, FromStream};
use futures_core::Stream;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use super::shuffle;

/// Wakers of the parked countdowns, keyed by index, and the index whose
/// turn it is to complete.
#[derive(Default)]
struct Schedule {
    parked: BTreeMap<usize, Waker>,
    next: usize,
}

/// Shuffled countdown streams.
pub fn streams_vec(len: usize) -> Vec<Countdown> {
    let schedule = Rc::new(RefCell::new(Schedule::default()));
    let mut streams: Vec<_> = (0..len)
        .map(|index| Countdown::new(index, schedule.clone()))
        .collect();
    shuffle(&mut streams);
    streams
}

/// Shuffled countdowns as infallible sources.
pub fn sources_vec(len: usize) -> Vec<FromStream<Countdown, ()>> {
    streams_vec(len).into_iter().map(source::from_stream).collect()
}

pub fn sources_array<const N: usize>() -> [FromStream<Countdown, ()>; N] {
    let schedule = Rc::new(RefCell::new(Schedule::default()));
    let mut sources =
        std::array::from_fn(|index| source::from_stream(Countdown::new(index, schedule.clone())));
    shuffle(&mut sources);
    sources
}

/// Yields its own index once every lower index has completed.
///
/// Every poll wakes the lowest parked countdown before parking itself, so a
/// merge has to keep routing wake-ups through its readiness set.
pub struct Countdown {
    index: usize,
    schedule: Rc<RefCell<Schedule>>,
    done: bool,
}

impl Countdown {
    fn new(index: usize, schedule: Rc<RefCell<Schedule>>) -> Self {
        Self {
            index,
            schedule,
            done: false,
        }
    }
}

impl Stream for Countdown {
    type Item = usize;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<usize>> {
        if self.done {
            return Poll::Ready(None);
        }

        let index = self.index;
        let mut schedule = self.schedule.borrow_mut();
        if let Some((_, waker)) = schedule.parked.pop_first() {
            waker.wake();
        }

        if schedule.next == index {
            schedule.next += 1;
            drop(schedule);
            self.done = true;
            Poll::Ready(Some(index))
        } else {
            schedule.parked.insert(index, cx.waker().clone());
            Poll::Pending
        }
    }
}
