use simple_tailer::{Encoding, Error, Follower};
use std::env;
use std::process;
use tokio_stream::StreamExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_PATH: &str = "mylog.file";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() > 3 {
        eprintln!("Usage: {} [file_path] [encoding]", args[0]);
        process::exit(1);
    }

    let file_path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_PATH);
    let encoding = match args.get(2).map(|label| label.parse::<Encoding>()) {
        Some(Ok(encoding)) => Some(encoding),
        Some(Err(e)) => {
            eprintln!("{}", e);
            process::exit(1);
        }
        None => None,
    };

    let follower = match Follower::new(file_path, encoding) {
        Ok(follower) => follower,
        Err(e) => {
            eprintln!("Error following file: {}", e);
            process::exit(1);
        }
    };

    tracing::info!(path = file_path, encoding = %follower.encoding(), "following");

    let mut lines = follower.follow_until(simple_tailer::ctrl_c());
    while let Some(line_result) = lines.next().await {
        match line_result {
            Ok(line) => println!("{}", line),
            Err(Error::Interrupted) => break,
            Err(e) => {
                eprintln!("Error reading file: {}", e);
                process::exit(1);
            }
        }
    }
}
