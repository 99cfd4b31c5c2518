//! Test utilities for creating temporary log files and inspecting open handles.

#[cfg(test)]
use std::fs::{File, OpenOptions};
#[cfg(test)]
use std::io::Write;
#[cfg(test)]
use std::path::{Path, PathBuf};

#[cfg(test)]
pub struct TempLogFile {
    pub path: PathBuf,
    _temp_dir: tempfile::TempDir,
}

#[cfg(test)]
impl TempLogFile {
    /// Create a new, empty temporary log file
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("test.log");

        File::create(&path)?;

        Ok(Self {
            path,
            _temp_dir: temp_dir,
        })
    }

    /// Create a temporary log file with initial content
    pub fn with_content(content: &str) -> std::io::Result<Self> {
        let temp_file = Self::new()?;
        temp_file.append_raw(content)?;
        Ok(temp_file)
    }

    /// Append a line, terminator included
    pub fn append_line(&self, line: &str) -> std::io::Result<()> {
        self.append_raw(&format!("{}\n", line))
    }

    /// Append text exactly as given
    pub fn append_raw(&self, content: &str) -> std::io::Result<()> {
        self.append_bytes(content.as_bytes())
    }

    /// Append raw bytes, which need not be valid text
    pub fn append_bytes(&self, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(())
    }

    /// Truncate the file in place and write new content (copytruncate rotation)
    pub fn truncate_with(&self, content: &str) -> std::io::Result<()> {
        let mut file = File::create(&self.path)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Current size of the file in bytes
    pub fn len(&self) -> u64 {
        std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }

    /// Get the path to the temporary file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Number of descriptors this process holds open on `path`.
#[cfg(all(test, target_os = "linux"))]
pub fn open_handles_to(path: &Path) -> usize {
    let target = match std::fs::canonicalize(path) {
        Ok(target) => target,
        Err(_) => return 0,
    };

    std::fs::read_dir("/proc/self/fd")
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| std::fs::read_link(entry.path()).ok())
                .filter(|link| *link == target)
                .count()
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_log_file_creation() {
        let temp_file = TempLogFile::new().unwrap();
        assert!(temp_file.path().exists());
        assert_eq!(temp_file.len(), 0);
    }

    #[test]
    fn test_append_line_and_raw() {
        let temp_file = TempLogFile::with_content("partial").unwrap();
        temp_file.append_line(" done").unwrap();
        temp_file.append_line("line 2").unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(content, "partial done\nline 2\n");
    }

    #[test]
    fn test_truncate_with() {
        let temp_file = TempLogFile::with_content("initial content that is long\n").unwrap();
        temp_file.truncate_with("short\n").unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(content, "short\n");
        assert_eq!(temp_file.len(), 6);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_open_handles_to() {
        let temp_file = TempLogFile::new().unwrap();
        assert_eq!(open_handles_to(temp_file.path()), 0);

        let handle = File::open(temp_file.path()).unwrap();
        assert_eq!(open_handles_to(temp_file.path()), 1);

        drop(handle);
        assert_eq!(open_handles_to(temp_file.path()), 0);
    }
}
