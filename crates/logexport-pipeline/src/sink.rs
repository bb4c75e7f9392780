//! Row targets: where emitted NDJSON lines go.

use std::path::{Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowTarget {
    Stdout,
    File(PathBuf),
}

impl RowTarget {
    /// `None` or `-` is stdout; anything else is a file path (truncated).
    pub fn from_arg(arg: Option<&Path>) -> Self {
        match arg {
            Some(path) if path != Path::new("-") => RowTarget::File(path.to_path_buf()),
            _ => RowTarget::Stdout,
        }
    }
}

/// Buffered newline-delimited writer.
pub struct LineWriter {
    inner: BufWriter<Box<dyn AsyncWrite + Unpin + Send>>,
    written: u64,
}

impl LineWriter {
    pub async fn open(target: &RowTarget) -> std::io::Result<Self> {
        let inner: Box<dyn AsyncWrite + Unpin + Send> = match target {
            RowTarget::Stdout => Box::new(tokio::io::stdout()),
            RowTarget::File(path) => Box::new(tokio::fs::File::create(path).await?),
        };
        Ok(Self {
            inner: BufWriter::new(inner),
            written: 0,
        })
    }

    pub async fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        self.write_raw_line(line.as_bytes()).await
    }

    /// Write `line` as-is, whatever its encoding.
    pub async fn write_raw_line(&mut self, line: &[u8]) -> std::io::Result<()> {
        self.inner.write_all(line).await?;
        self.inner.write_all(b"\n").await?;
        self.written += 1;
        Ok(())
    }

    /// Flush and release the target.
    pub async fn finish(mut self) -> std::io::Result<u64> {
        self.inner.flush().await?;
        self.inner.shutdown().await?;
        Ok(self.written)
    }
}
