//! Whole-file log reading

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

use crate::lister;

/// An opened log file
pub struct LogReader {
    path: PathBuf,
    file: File,
}

impl LogReader {
    /// Open a log file for reading
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Position at the start of the file
    pub fn rewind(&mut self) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Read the whole file as concatenated lines, bytes kept as stored.
    ///
    /// Line terminators (`\n`) are dropped and not restored, so the result
    /// is shorter than the file by one byte per newline.
    pub fn read_stripped_bytes(&mut self) -> io::Result<Vec<u8>> {
        let mut reader = BufReader::new(&mut self.file);
        let mut content = Vec::new();
        let mut line = Vec::new();

        loop {
            line.clear();
            let n = reader.read_until(b'\n', &mut line)?;
            if n == 0 {
                break;
            }
            if line.last() == Some(&b'\n') {
                line.pop();
            }
            content.extend_from_slice(&line);
        }

        debug!("Read {} bytes from {}", content.len(), self.path.display());
        Ok(content)
    }

    /// [`read_stripped_bytes`](Self::read_stripped_bytes) as text, invalid
    /// UTF-8 replaced rather than rejected
    pub fn read_stripped(&mut self) -> io::Result<String> {
        let content = self.read_stripped_bytes()?;
        Ok(String::from_utf8_lossy(&content).into_owned())
    }

    /// File size as reported by stat, 0 if it cannot be read
    pub fn size(&self) -> u64 {
        fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }

    /// Last modification time of the open file
    pub fn modified(&self) -> SystemTime {
        self.file
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or_else(|_| lister::modified_time(&self.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(LogReader::open(&dir.path().join("missing.log")).is_err());
    }

    #[test]
    fn test_read_strips_newlines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.log");

        {
            let mut file = File::create(&path).unwrap();
            for i in 1..=3 {
                writeln!(file, "Line {}", i).unwrap();
            }
        }

        let mut reader = LogReader::open(&path).unwrap();
        reader.rewind().unwrap();
        assert_eq!(reader.read_stripped().unwrap(), "Line 1Line 2Line 3");
        assert_eq!(reader.size(), 21);
    }

    #[test]
    fn test_read_keeps_last_partial_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.log");
        fs::write(&path, "first\nsecond").unwrap();

        let mut reader = LogReader::open(&path).unwrap();
        assert_eq!(reader.read_stripped().unwrap(), "firstsecond");
    }

    #[test]
    fn test_read_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.log");
        File::create(&path).unwrap();

        let mut reader = LogReader::open(&path).unwrap();
        assert_eq!(reader.read_stripped().unwrap(), "");
        assert_eq!(reader.size(), 0);
    }

    #[test]
    fn test_read_lossy_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.log");
        fs::write(&path, b"caf\xe9\n").unwrap();

        let mut reader = LogReader::open(&path).unwrap();
        assert_eq!(reader.read_stripped().unwrap(), "caf\u{FFFD}");
    }

    #[test]
    fn test_read_bytes_keeps_non_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.log");
        fs::write(&path, b"caf\xe9\nok\n").unwrap();

        let mut reader = LogReader::open(&path).unwrap();
        assert_eq!(reader.read_stripped_bytes().unwrap(), b"caf\xe9ok".to_vec());
    }

    #[test]
    fn test_rewind_after_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.log");
        fs::write(&path, "a\nb\n").unwrap();

        let mut reader = LogReader::open(&path).unwrap();
        assert_eq!(reader.read_stripped().unwrap(), "ab");
        reader.rewind().unwrap();
        assert_eq!(reader.read_stripped().unwrap(), "ab");
    }
}
