//! Stream adapter that drives a [`Follower`] one line at a time.

use crate::error::Result;
use crate::follower::Follower;
use futures::Stream;
use futures::stream;
use std::future::{self, Future};
use std::pin::Pin;
use std::task::{Context, Poll};

type Interrupt = Pin<Box<dyn Future<Output = ()> + Send>>;

/// An infinite stream of lines appended to a followed file.
///
/// The file is opened on the first poll, not when the stream is created. The
/// stream ends right after yielding its first error, and releases the file
/// handle at that point or when it is dropped.
pub struct LineStream {
    inner: Pin<Box<dyn Stream<Item = Result<String>> + Send>>,
}

impl LineStream {
    pub(crate) fn new(follower: Follower) -> Self {
        Self::with_interrupt(follower, future::pending::<()>())
    }

    pub(crate) fn with_interrupt<F>(follower: Follower, interrupt: F) -> Self
    where
        F: Future + Send + 'static,
    {
        let interrupt: Interrupt = Box::pin(async move {
            let _ = interrupt.await;
        });

        let inner = stream::unfold(Some((follower, interrupt)), |state| async move {
            let (mut follower, mut interrupt) = state?;

            match follower.next_line_until(&mut interrupt).await {
                Ok(line) => Some((Ok(line), Some((follower, interrupt)))),
                Err(e) => {
                    follower.close();
                    Some((Err(e), None))
                }
            }
        });

        LineStream {
            inner: Box::pin(inner),
        }
    }
}

impl Stream for LineStream {
    type Item = Result<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}
