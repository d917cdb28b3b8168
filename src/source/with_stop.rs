use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{ready, Context, Poll};

use pin_project::pin_project;

use super::Source;

/// A source with an asynchronous cleanup hook.
///
/// This `struct` is created by the [`on_stop`] method on [`SourceExt`]. See
/// its documentation for more.
///
/// [`on_stop`]: super::SourceExt::on_stop
/// [`SourceExt`]: super::SourceExt
#[pin_project]
#[must_use = "sources do nothing unless polled"]
pub struct WithStop<S: Source, F, Fut> {
    #[pin]
    source: S,
    hook: Option<F>,
    #[pin]
    cleanup: Option<Fut>,
    state: State,
    error: Option<S::Error>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    StoppingSource,
    CleaningUp,
    Stopped,
}

impl<S: Source, F, Fut> WithStop<S, F, Fut> {
    pub(crate) fn new(source: S, hook: F) -> Self {
        Self {
            source,
            hook: Some(hook),
            cleanup: None,
            state: State::Running,
            error: None,
        }
    }
}

impl<S, F, Fut> fmt::Debug for WithStop<S, F, Fut>
where
    S: Source + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WithStop")
            .field("source", &self.source)
            .field("state", &self.state)
            .finish()
    }
}

impl<S, F, Fut> Source for WithStop<S, F, Fut>
where
    S: Source,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), S::Error>>,
{
    type Item = S::Item;
    type Error = S::Error;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Self::Item, Self::Error>>> {
        let this = self.project();
        match *this.state {
            State::Running => this.source.poll_next(cx),
            _ => Poll::Ready(None),
        }
    }

    fn poll_stop(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        let mut this = self.project();
        loop {
            match *this.state {
                State::Running => *this.state = State::StoppingSource,
                State::StoppingSource => {
                    if let Err(error) = ready!(this.source.as_mut().poll_stop(cx)) {
                        *this.error = Some(error);
                    }
                    if let Some(hook) = this.hook.take() {
                        this.cleanup.set(Some(hook()));
                    }
                    *this.state = State::CleaningUp;
                }
                State::CleaningUp => {
                    if let Some(cleanup) = this.cleanup.as_mut().as_pin_mut() {
                        let res = ready!(cleanup.poll(cx));
                        this.cleanup.set(None);
                        if let Err(error) = res {
                            if this.error.is_none() {
                                *this.error = Some(error);
                            }
                        }
                    }
                    *this.state = State::Stopped;
                    return Poll::Ready(match this.error.take() {
                        Some(error) => Err(error),
                        None => Ok(()),
                    });
                }
                State::Stopped => return Poll::Ready(Ok(())),
            }
        }
    }
}
