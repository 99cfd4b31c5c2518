//! A tailer library that follows a growing text file and yields each newly
//! appended line.
//!
//! The file is polled once per second. When it shrinks between two polls it
//! is treated as truncated and reopened from the start, so lines written
//! after the truncation are not lost.
//!
//! # Example
//!
//! ```rust,no_run
//! use simple_tailer::follow;
//! use tokio_stream::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut lines = follow("app.log", None)?;
//!
//!     while let Some(line) = lines.next().await {
//!         println!("{}", line?);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Internal modules - not part of public API
mod encoding;
mod error;
mod follower;
mod signal;
mod stream;

#[cfg(test)]
mod test_helpers;

// Public API exports
pub use encoding::Encoding;
pub use error::{Error, Result};
pub use follower::{Follower, POLL_INTERVAL};
pub use signal::{ctrl_c, interrupt_on};
pub use stream::LineStream;

use std::path::Path;

/// Creates a stream of the lines appended to a file from now on.
///
/// # Arguments
///
/// * `path` - File path to follow; must be an existing regular file
/// * `encoding` - Encoding of the file (defaults to the platform's preferred one)
///
/// # Example
///
/// ```rust,no_run
/// use simple_tailer::{Encoding, follow};
/// use tokio_stream::StreamExt;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut lines = follow("app.log", Some(Encoding::Latin1))?;
///
///     while let Some(line) = lines.next().await {
///         println!("New line: {}", line?);
///     }
///
///     Ok(())
/// }
/// ```
pub fn follow<P: AsRef<Path>>(path: P, encoding: Option<Encoding>) -> Result<LineStream> {
    Ok(Follower::new(path, encoding)?.lines())
}
