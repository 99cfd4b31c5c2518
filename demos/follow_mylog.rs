//! Prints every line appended to `mylog.file` until Ctrl-C.
//!
//! Usage:
//!     cargo run --example follow_mylog

use simple_tailer::{Error, Follower, ctrl_c};
use tokio_stream::StreamExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = Follower::new("mylog.file", None)?.follow_until(ctrl_c());

    while let Some(line) = lines.next().await {
        match line {
            Ok(line) => println!("{}", line),
            // Ctrl-C is a clean shutdown for this consumer
            Err(Error::Interrupted) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
