//! Follows a single growing file, polling for appended lines and reopening
//! the file when it shrinks.

use crate::encoding::Encoding;
use crate::error::{Error, Result};
use crate::stream::LineStream;
use std::future::{self, Future};
use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::{self, File};
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tracing::{debug, info, trace};

/// Delay before the next poll cycle when no new data is available.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Follows a file the way `tail -f` does, one line at a time.
///
/// Construction only records configuration and checks that the path is an
/// existing regular file. The handle is opened on the first call to
/// [`next_line`](Self::next_line), at which point the cursor is moved to the
/// end of the file so only lines appended afterwards are returned.
///
/// Truncation is inferred purely from the file size shrinking between two
/// polls. A file that is truncated and then grows back to at least its last
/// recorded size before the next poll goes unnoticed, and reading continues
/// from the old cursor position.
#[derive(Debug)]
pub struct Follower {
    path: PathBuf,
    encoding: Encoding,
    handle: Option<BufReader<File>>,
    last_known_size: u64,
    /// Bytes of the line being assembled. Kept across a cancelled read.
    line_buf: Vec<u8>,
    generation: u64,
    closed: bool,
}

impl Follower {
    /// Creates a follower for `path`, decoding lines with `encoding` or the
    /// platform's preferred encoding.
    ///
    /// Fails with [`Error::FileNotFound`] if `path` is not an existing regular
    /// file.
    pub fn new<P: AsRef<Path>>(path: P, encoding: Option<Encoding>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        check_regular_file(&path, std::fs::metadata(&path))?;

        let encoding = encoding.unwrap_or_else(Encoding::preferred);
        debug!(path = %path.display(), %encoding, "follower created");

        Ok(Self {
            path,
            encoding,
            handle: None,
            last_known_size: 0,
            line_buf: Vec::new(),
            generation: 0,
            closed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Whether a handle onto the file is currently open.
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// File size observed at the last poll, or at the last (re)open.
    pub fn last_known_size(&self) -> u64 {
        self.last_known_size
    }

    /// Number of times a handle has been opened. Increments on every reopen
    /// caused by truncation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Waits for the next line appended to the file.
    ///
    /// Each poll cycle first checks for truncation, then tries to read one
    /// line. When nothing is available it sleeps for [`POLL_INTERVAL`] and
    /// tries again, forever. Any I/O or decoding error is returned as is.
    ///
    /// Dropping the returned future while it waits leaves the follower usable.
    pub async fn next_line(&mut self) -> Result<String> {
        self.next_line_until(future::pending::<()>()).await
    }

    /// Like [`next_line`](Self::next_line), but returns [`Error::Interrupted`]
    /// if `interrupt` completes while the follower is waiting for new data.
    ///
    /// The interrupt is only observed at the idle wait: a line that is already
    /// available is returned even if `interrupt` has completed.
    pub async fn next_line_until<F: Future>(&mut self, interrupt: F) -> Result<String> {
        tokio::pin!(interrupt);
        self.activate().await?;

        loop {
            self.truncated_check().await?;

            if let Some(line) = self.read_line().await? {
                return Ok(line);
            }

            trace!(path = %self.path.display(), "no new data, waiting");
            tokio::select! {
                _ = &mut interrupt => {
                    debug!(path = %self.path.display(), "interrupted while waiting");
                    return Err(Error::Interrupted);
                }
                _ = tokio::time::sleep(POLL_INTERVAL) => {}
            }
        }
    }

    /// Turns the follower into an infinite stream of lines.
    pub fn lines(self) -> LineStream {
        LineStream::new(self)
    }

    /// Turns the follower into a stream of lines that yields
    /// [`Error::Interrupted`] and ends once `interrupt` completes during an
    /// idle wait.
    pub fn follow_until<F>(self, interrupt: F) -> LineStream
    where
        F: Future + Send + 'static,
    {
        LineStream::with_interrupt(self, interrupt)
    }

    /// Releases the file handle. The follower cannot be restarted afterwards.
    pub fn close(&mut self) {
        self.close_handle();
        self.closed = true;
    }

    /// Opens the handle on first use. A follower whose reopen failed retries
    /// the reopen from the start of the file.
    pub(crate) async fn activate(&mut self) -> Result<()> {
        if self.closed {
            return Err(Error::StreamClosed);
        }
        if self.handle.is_none() {
            let seek_to_end = self.generation == 0;
            self.open_handle(seek_to_end).await?;
        }
        Ok(())
    }

    async fn open_handle(&mut self, seek_to_end: bool) -> Result<()> {
        check_regular_file(&self.path, fs::metadata(&self.path).await)?;

        let mut file = File::open(&self.path)
            .await
            .map_err(|e| io_error(&self.path, e))?;
        let size = self.current_size().await?;

        if seek_to_end {
            file.seek(SeekFrom::End(0)).await?;
        }

        self.handle = Some(BufReader::new(file));
        self.last_known_size = size;
        self.line_buf.clear();
        self.generation += 1;

        debug!(
            path = %self.path.display(),
            generation = self.generation,
            size,
            seek_to_end,
            "opened handle"
        );
        Ok(())
    }

    fn close_handle(&mut self) {
        if self.handle.take().is_some() {
            debug!(
                path = %self.path.display(),
                generation = self.generation,
                "closed handle"
            );
        }
    }

    /// Closes the current handle before opening a fresh one at byte 0, so
    /// data written after the truncation is not skipped.
    async fn reopen_handle(&mut self) -> Result<()> {
        self.close_handle();
        self.open_handle(false).await
    }

    /// Reopens the file if it shrank since the last poll, otherwise records
    /// its new size.
    async fn truncated_check(&mut self) -> Result<bool> {
        let current_size = self.current_size().await?;

        if detect_file_truncation(current_size, self.last_known_size) {
            info!(
                path = %self.path.display(),
                last_known_size = self.last_known_size,
                current_size,
                "file truncated, reopening"
            );
            self.reopen_handle().await?;
            Ok(true)
        } else {
            self.last_known_size = current_size;
            Ok(false)
        }
    }

    /// Reads one line from the cursor. A trailing fragment without a
    /// terminator counts as a line.
    async fn read_line(&mut self) -> Result<Option<String>> {
        let Some(reader) = self.handle.as_mut() else {
            return Ok(None);
        };

        reader.read_until(b'\n', &mut self.line_buf).await?;

        // A fragment read at EOF may end inside a character the writer has
        // not finished; those bytes wait in the buffer for the next cycle.
        let complete = if self.line_buf.ends_with(b"\n") {
            self.line_buf.len()
        } else {
            self.encoding.complete_prefix_len(&self.line_buf)
        };
        if complete == 0 {
            return Ok(None);
        }

        let pending = self.line_buf.split_off(complete);
        let raw = std::mem::replace(&mut self.line_buf, pending);
        let line = self.encoding.decode(raw)?;
        Ok(Some(line.trim().to_string()))
    }

    async fn current_size(&self) -> Result<u64> {
        let metadata = fs::metadata(&self.path)
            .await
            .map_err(|e| io_error(&self.path, e))?;
        Ok(metadata.len())
    }
}

impl Drop for Follower {
    fn drop(&mut self) {
        self.close_handle();
    }
}

/// Detect if the file was truncated by comparing its current size with the
/// last recorded one
fn detect_file_truncation(current_size: u64, last_known_size: u64) -> bool {
    current_size < last_known_size
}

fn check_regular_file(path: &Path, metadata: io::Result<std::fs::Metadata>) -> Result<()> {
    match metadata {
        Ok(metadata) if metadata.is_file() => Ok(()),
        Ok(_) => Err(Error::FileNotFound {
            path: path.display().to_string(),
        }),
        Err(e) => Err(io_error(path, e)),
    }
}

fn io_error(path: &Path, e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::NotFound {
        Error::FileNotFound {
            path: path.display().to_string(),
        }
    } else {
        Error::Io(e)
    }
}
