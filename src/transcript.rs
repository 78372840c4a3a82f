//! The result log and its flush-to-disk path.

use crate::config::OutputFormat;
use crate::error::{Result, VoxnoteError};
use crate::pipeline::types::Utterance;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Append-only ordered sequence of finalized utterances.
///
/// Owned exclusively by the recognition driver while the pipeline runs;
/// ownership passes to the shutdown coordinator for persistence. Durable
/// only via [`write_transcript`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResultLog {
    entries: Vec<Utterance>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finalized utterance in arrival order.
    pub fn append(&mut self, utterance: Utterance) {
        self.entries.push(utterance);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Utterance> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[Utterance] {
        &self.entries
    }
}

/// Write the result log to `path`, one utterance per line, in arrival order.
///
/// The file is overwritten (not appended); an empty log still produces an
/// empty file. Text format writes each utterance's recognized text;
/// JSON format writes one JSON object per line.
///
/// # Errors
/// `FlushWrite` with the offending path and the underlying I/O cause.
pub fn write_transcript(path: &Path, log: &ResultLog, format: OutputFormat) -> Result<()> {
    let flush_err = |source: std::io::Error| VoxnoteError::FlushWrite {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(flush_err)?;
    let mut writer = BufWriter::new(file);

    for utterance in log.iter() {
        match format {
            OutputFormat::Text => writeln!(writer, "{}", utterance.text).map_err(flush_err)?,
            OutputFormat::Json => {
                let line = serde_json::to_string(utterance)
                    .map_err(|e| flush_err(std::io::Error::from(e)))?;
                writeln!(writer, "{}", line).map_err(flush_err)?;
            }
        }
    }

    writer.flush().map_err(flush_err)
}
