use std::{
    future::Future,
    sync::Arc,
    task::{Context, Poll},
    thread::{self, Thread},
    time::Duration,
};

use futures::task::{waker, ArcWake};

const PARK_TIMEOUT: Duration = Duration::from_millis(10);

struct ThreadWaker {
    thread: Thread,
}

impl ArcWake for ThreadWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.thread.unpark();
    }
}

/// Drives `future` to completion on the calling thread.
///
/// SDK futures need a Tokio runtime to be entered on this thread; the
/// runtime's workers drive their I/O while this thread parks.
pub fn poll_until_ready<Fut, T>(future: Fut) -> T
where
    Fut: Future<Output = T>,
{
    let mut future = Box::pin(future);
    let waker = waker(Arc::new(ThreadWaker {
        thread: thread::current(),
    }));
    let mut context = Context::from_waker(&waker);

    loop {
        match future.as_mut().poll(&mut context) {
            Poll::Ready(result) => {
                return result;
            }
            Poll::Pending => {
                thread::park_timeout(PARK_TIMEOUT);
            }
        }
    }
}

/// `poll_until_ready` for SDK calls, pinning the output to a `Result` so the
/// adapter can chain `map_err` without spelling out the error type.
pub fn poll_until_ready_error<Fut, T, E>(future: Fut) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
{
    poll_until_ready(future)
}
