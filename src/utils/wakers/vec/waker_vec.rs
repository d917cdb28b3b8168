use std::sync::Arc;
use std::sync::Mutex;
use std::task::Waker;

use super::{ReadinessVec, SourceWaker};

/// One waker per source, all sharing a single readiness set.
pub(crate) struct WakerVec {
    wakers: Vec<Waker>,
    readiness: Arc<Mutex<ReadinessVec>>,
}

impl WakerVec {
    /// Create a new instance of `WakerVec`.
    pub(crate) fn new(len: usize) -> Self {
        let readiness = Arc::new(Mutex::new(ReadinessVec::new(len)));
        let wakers = (0..len)
            .map(|i| Arc::new(SourceWaker::new(i, readiness.clone())).into())
            .collect();
        Self { wakers, readiness }
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Waker> {
        self.wakers.get(index)
    }

    /// Access the `Readiness`.
    pub(crate) fn readiness(&self) -> &Mutex<ReadinessVec> {
        self.readiness.as_ref()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use futures::task::noop_waker;

    #[test]
    fn wake_marks_ready_and_forwards() {
        let wakers = WakerVec::new(2);
        {
            let mut readiness = wakers.readiness().lock().unwrap();
            readiness.set_waker(&noop_waker());
            readiness.clear_ready(0);
            readiness.clear_ready(1);
            assert!(!readiness.any_ready());
        }

        wakers.get(1).unwrap().wake_by_ref();

        let mut readiness = wakers.readiness().lock().unwrap();
        assert!(!readiness.clear_ready(0));
        assert!(readiness.clear_ready(1));
    }
}
