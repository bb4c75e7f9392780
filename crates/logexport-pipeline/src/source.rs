//! Record sources: where raw NDJSON lines come from.

use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSource {
    Stdin,
    File(PathBuf),
}

impl RecordSource {
    /// `None` or `-` is stdin; anything else is a file path.
    pub fn from_arg(arg: Option<&Path>) -> Self {
        match arg {
            Some(path) if path != Path::new("-") => RecordSource::File(path.to_path_buf()),
            _ => RecordSource::Stdin,
        }
    }

    async fn open(&self) -> std::io::Result<Box<dyn AsyncRead + Unpin + Send>> {
        Ok(match self {
            RecordSource::Stdin => Box::new(tokio::io::stdin()),
            RecordSource::File(path) => Box::new(tokio::fs::File::open(path).await?),
        })
    }
}

impl std::fmt::Display for RecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordSource::Stdin => write!(f, "stdin"),
            RecordSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One input line, numbered from 1, without its line terminator.
///
/// Bytes are passed through untouched; decoding is the consumer's job so a
/// single bad line cannot end the read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub seq: u64,
    pub bytes: Vec<u8>,
}

impl RawLine {
    pub fn is_blank(&self) -> bool {
        self.bytes.iter().all(u8::is_ascii_whitespace)
    }
}

/// Drop a trailing `\n` or `\r\n`.
fn strip_terminator(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
}

/// Read `source` line by line on a background task.
///
/// The channel holds at most `capacity` lines. The task finishes at EOF or as
/// soon as the receiver is dropped, and returns the number of lines sent.
pub fn spawn_reader(
    source: RecordSource,
    capacity: usize,
) -> (mpsc::Receiver<RawLine>, JoinHandle<std::io::Result<u64>>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let handle = tokio::spawn(async move {
        let mut reader = BufReader::new(source.open().await?);
        let mut seq = 0;
        loop {
            let mut bytes = Vec::new();
            if reader.read_until(b'\n', &mut bytes).await? == 0 {
                break;
            }
            strip_terminator(&mut bytes);
            seq += 1;
            if tx.send(RawLine { seq, bytes }).await.is_err() {
                tracing::debug!(%source, seq, "receiver closed; stopping reader");
                break;
            }
        }
        Ok(seq)
    });
    (rx, handle)
}
