//! The record loop: read, extract, write.

use crate::sink::{LineWriter, RowTarget};
use crate::source::{spawn_reader, RawLine, RecordSource};
use anyhow::Context;
use logexport_core::config::{OnError, PipelineConfig};
use logexport_core::{ExtractError, Extraction, LogsExtractor};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Non-blank lines read.
    pub read: u64,
    /// Rows written.
    pub emitted: u64,
    /// Records that could not be turned into a row.
    pub failed: u64,
    /// Anomalies raised by records that did produce a row.
    pub anomalies: u64,
}

/// Why one record produced no row.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("line is not valid UTF-8: {0}")]
    NotUtf8(#[from] std::str::Utf8Error),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("failed to serialize row: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("record on line {seq} failed: {source}")]
    Aborted {
        seq: u64,
        #[source]
        source: RecordError,
    },
}

pub struct Pipeline {
    extractor: Arc<LogsExtractor>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(extractor: Arc<LogsExtractor>, config: PipelineConfig) -> Self {
        Self { extractor, config }
    }

    /// Turn one input line into a serialized row.
    pub fn process_line(&self, bytes: &[u8]) -> Result<(String, Extraction), RecordError> {
        let text = std::str::from_utf8(bytes)?;
        let extraction = self.extractor.extract_json(text)?;
        let row = serde_json::to_string(&extraction.row).map_err(RecordError::Serialize)?;
        Ok((row, extraction))
    }

    /// Drain `source` into `output`, routing failed records to `dead_letter`
    /// when one is given.
    pub async fn run(
        &self,
        source: RecordSource,
        output: &RowTarget,
        dead_letter: Option<PathBuf>,
    ) -> anyhow::Result<RunStats> {
        tracing::info!(%source, "starting run");
        let (mut lines, reader) = spawn_reader(source, self.config.channel_capacity);
        let mut writer = LineWriter::open(output)
            .await
            .context("failed to open output")?;
        let mut dead_letters = match dead_letter {
            Some(path) => Some(
                LineWriter::open(&RowTarget::File(path.clone()))
                    .await
                    .with_context(|| format!("failed to open dead-letter file {}", path.display()))?,
            ),
            None => None,
        };

        let mut stats = RunStats::default();
        let mut aborted = None;
        while let Some(line) = lines.recv().await {
            if line.is_blank() {
                continue;
            }
            stats.read += 1;
            let RawLine { seq, bytes } = line;

            match self.process_line(&bytes) {
                Ok((row, extraction)) => {
                    stats.anomalies += extraction.anomalies.len() as u64;
                    writer.write_line(&row).await.context("failed to write row")?;
                    stats.emitted += 1;
                }
                Err(err) => {
                    stats.failed += 1;
                    tracing::warn!(seq, error = %err, "skipping record");
                    if let Some(dead) = dead_letters.as_mut() {
                        dead.write_raw_line(&bytes)
                            .await
                            .context("failed to write dead letter")?;
                    }
                    if self.config.on_error == OnError::Abort {
                        aborted = Some(PipelineError::Aborted { seq, source: err });
                        break;
                    }
                }
            }
        }

        // Rows already written are flushed even when the run ends in error.
        let read_result = match aborted {
            Some(err) => {
                reader.abort();
                Err(anyhow::Error::from(err))
            }
            None => match reader.await {
                Ok(result) => result.context("failed to read input"),
                Err(join) => Err(anyhow::Error::from(join).context("reader task panicked")),
            },
        };
        writer.finish().await.context("failed to flush output")?;
        if let Some(dead) = dead_letters {
            dead.finish().await.context("failed to flush dead letters")?;
        }
        read_result?;

        tracing::info!(?stats, "run complete");
        Ok(stats)
    }
}
