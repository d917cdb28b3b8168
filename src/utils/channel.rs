use std::{
    cell::RefCell,
    collections::VecDeque,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll, Waker},
};

use crate::source::Source;

struct LocalChannel<T, E> {
    queue: VecDeque<Result<T, E>>,
    waker: Option<Waker>,
    closed: bool,
    stopped: bool,
}

/// The receiving half of a local channel, usable as a [`Source`] which
/// returns `Pending` until something is sent.
pub(crate) struct LocalReceiver<T, E> {
    channel: Rc<RefCell<LocalChannel<T, E>>>,
}

impl<T, E> Source for LocalReceiver<T, E> {
    type Item = T;
    type Error = E;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Result<T, E>>> {
        let mut channel = self.channel.borrow_mut();

        match channel.queue.pop_front() {
            Some(item) => Poll::Ready(Some(item)),
            None if channel.closed || channel.stopped => Poll::Ready(None),
            None => {
                channel.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }

    fn poll_stop(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), E>> {
        let mut channel = self.channel.borrow_mut();
        channel.stopped = true;
        channel.queue.clear();
        Poll::Ready(Ok(()))
    }
}

pub(crate) struct LocalSender<T, E> {
    channel: Rc<RefCell<LocalChannel<T, E>>>,
}

impl<T, E> LocalSender<T, E> {
    pub(crate) fn send(&self, item: T) {
        self.push(Ok(item));
    }

    pub(crate) fn fail(&self, error: E) {
        self.push(Err(error));
    }

    /// Whether the receiving side was asked to stop.
    pub(crate) fn is_stopped(&self) -> bool {
        self.channel.borrow().stopped
    }

    fn push(&self, item: Result<T, E>) {
        let mut channel = self.channel.borrow_mut();
        channel.queue.push_back(item);
        let _ = channel.waker.take().map(Waker::wake);
    }
}

impl<T, E> Drop for LocalSender<T, E> {
    fn drop(&mut self) {
        let mut channel = self.channel.borrow_mut();
        channel.closed = true;
        let _ = channel.waker.take().map(Waker::wake);
    }
}

pub(crate) fn local_channel<T, E>() -> (LocalSender<T, E>, LocalReceiver<T, E>) {
    let channel = Rc::new(RefCell::new(LocalChannel {
        queue: VecDeque::new(),
        waker: None,
        closed: false,
        stopped: false,
    }));

    (
        LocalSender {
            channel: channel.clone(),
        },
        LocalReceiver { channel },
    )
}
