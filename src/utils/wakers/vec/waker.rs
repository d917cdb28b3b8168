use std::sync::{Arc, Mutex};
use std::task::Wake;

use super::ReadinessVec;

/// A waker handed to a single source. Waking it marks that source as ready
/// and forwards the wake-up to the task driving the merge.
#[derive(Debug, Clone)]
pub(crate) struct SourceWaker {
    pub(crate) index: usize,
    pub(crate) readiness: Arc<Mutex<ReadinessVec>>,
}

impl SourceWaker {
    pub(crate) fn new(index: usize, readiness: Arc<Mutex<ReadinessVec>>) -> Self {
        Self { index, readiness }
    }
}

impl Wake for SourceWaker {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref()
    }

    fn wake_by_ref(self: &Arc<Self>) {
        let mut readiness = self.readiness.lock().unwrap();
        if !readiness.set_ready(self.index) {
            // A source can only be woken after it was polled, and every poll
            // sets the parent waker first.
            if let Some(parent) = readiness.parent_waker() {
                parent.wake_by_ref();
            }
        }
    }
}
