//! Interrupt futures for ending a follow on a shutdown signal.

use std::fmt::Display;
use std::future::{self, Future};
use tracing::warn;

/// Completes once Ctrl-C is received.
///
/// If the signal handler cannot be installed this never completes, so the
/// follow keeps running instead of ending as if interrupted.
pub async fn ctrl_c() {
    interrupt_on(tokio::signal::ctrl_c()).await
}

/// Completes when `signal` resolves with `Ok`. An `Err` is logged and the
/// future then stays pending forever.
pub async fn interrupt_on<F, E>(signal: F)
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    if let Err(e) = signal.await {
        warn!(error = %e, "failed to listen for shutdown signal");
        future::pending::<()>().await;
    }
}
