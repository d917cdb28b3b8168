mod readiness_vec;
mod waker;
mod waker_vec;

pub(crate) use readiness_vec::ReadinessVec;
pub(crate) use waker::SourceWaker;
pub(crate) use waker_vec::WakerVec;
