// src/fs/followed.rs

use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::identity::FileIdentity;

/// Where the read cursor starts when a file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Skip existing content; only lines appended from now on are read.
    FromEnd,
    /// Replay the whole file.
    FromStart,
}

/// One open file being followed.
///
/// Bytes after the last newline are kept in `pending` and completed by later
/// reads, so a line written in several chunks is still emitted exactly once.
#[derive(Debug)]
pub struct FollowedFile {
    path: PathBuf,
    reader: BufReader<File>,
    pending: Vec<u8>,
    identity: Option<FileIdentity>,
    mode: OpenMode,
    lines_read: u64,
}

impl FollowedFile {
    pub fn open(path: &Path, mode: OpenMode) -> io::Result<Self> {
        let mut file = File::open(path)?;
        let identity = FileIdentity::of_file(&file);

        if mode == OpenMode::FromEnd {
            let offset = file.seek(SeekFrom::End(0))?;
            debug!(?path, offset, "opened at end of file");
        } else {
            debug!(?path, "opened at start of file");
        }

        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            pending: Vec::new(),
            identity,
            mode,
            lines_read: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    pub fn identity(&self) -> Option<FileIdentity> {
        self.identity
    }

    /// Number of complete lines handed out so far.
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Whether `path` currently names the same file this handle has open.
    ///
    /// `false` whenever either side cannot be identified.
    pub fn is_same_file_as(&self, path: &Path) -> bool {
        match (self.identity, FileIdentity::of_path(path)) {
            (Some(ours), Some(theirs)) => ours == theirs,
            _ => false,
        }
    }

    /// Read every complete line currently available and hand each to `emit`.
    ///
    /// Returns the number of lines emitted. On error, lines read before the
    /// failure have already been emitted and the cursor stays where it got
    /// to, so a later call resumes from there.
    pub fn read_lines<F>(&mut self, mut emit: F) -> io::Result<usize>
    where
        F: FnMut(String),
    {
        self.reset_if_truncated()?;

        let mut count = 0;
        loop {
            let n = self.reader.read_until(b'\n', &mut self.pending)?;
            if n == 0 {
                break;
            }
            if self.pending.last() != Some(&b'\n') {
                // Writer is mid-line; keep the fragment until its newline lands.
                break;
            }

            emit(take_line(&mut self.pending));
            self.lines_read += 1;
            count += 1;
        }

        Ok(count)
    }

    /// Take the buffered partial line, if any.
    pub fn take_pending(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        Some(decode(std::mem::take(&mut self.pending)))
    }

    /// A file shorter than our cursor was truncated in place (e.g.
    /// `copytruncate` rotation); start over from its beginning.
    fn reset_if_truncated(&mut self) -> io::Result<()> {
        let len = self.reader.get_ref().metadata()?.len();
        let position = self.reader.stream_position()?;

        if len < position {
            info!(path = ?self.path, len, position, "file truncated; reading from start");
            self.reader.seek(SeekFrom::Start(0))?;
            self.pending.clear();
        }
        Ok(())
    }
}

/// Split off one newline-terminated line, dropping `\n` and an optional `\r`.
fn take_line(buf: &mut Vec<u8>) -> String {
    let mut bytes = std::mem::take(buf);
    bytes.pop();
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }
    decode(bytes)
}

fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}
