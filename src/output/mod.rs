use std::io::{BufWriter, Write};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use console::Style;
use log::debug;
use serde::Serialize;

use crate::core::context::SearchResult;

pub mod preview;

pub use preview::{DEFAULT_PREVIEW_LINES, MAX_PREVIEW_LINES};

/// Results accumulate in the stdout buffer and get flushed in batches so
/// large searches are not syscall-bound
const FLUSH_THRESHOLD: usize = 64;

/// Streams matched paths as they arrive, optionally coloured and with
/// text-file previews. Invoked from worker threads through the result
/// callback, which already serialises calls; the internal lock satisfies
/// the compiler and costs nothing uncontended.
pub struct StreamPrinter {
    inner: Mutex<PrinterInner>,
    directory_style: Option<Style>,
    file_style: Option<Style>,
    preview_lines: Option<usize>,
}

struct PrinterInner {
    out: BufWriter<Box<dyn Write + Send>>,
    unflushed: usize,
}

impl StreamPrinter {
    pub fn new(out: Box<dyn Write + Send>, use_color: bool, preview_lines: Option<usize>) -> Self {
        let (directory_style, file_style) = if use_color {
            (
                Some(Style::new().cyan().force_styling(true)),
                Some(Style::new().green().force_styling(true)),
            )
        } else {
            (None, None)
        };

        StreamPrinter {
            inner: Mutex::new(PrinterInner {
                out: BufWriter::new(out),
                unflushed: 0,
            }),
            directory_style,
            file_style,
            preview_lines,
        }
    }

    /// Print one result. Returns false when the output side is gone
    /// (closed pipe, full disk) and the search may as well stop.
    pub fn print(&self, result: &SearchResult) -> bool {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match self.write_result(&mut inner, result) {
            Ok(()) => true,
            Err(err) => {
                debug!("output failed: {err}");
                false
            }
        }
    }

    fn write_result(
        &self,
        inner: &mut PrinterInner,
        result: &SearchResult,
    ) -> std::io::Result<()> {
        let style = if result.is_directory {
            &self.directory_style
        } else {
            &self.file_style
        };

        let path = result.path.display();
        match style {
            Some(style) => writeln!(inner.out, "{}", style.apply_to(path))?,
            None => writeln!(inner.out, "{path}")?,
        }

        if let Some(lines) = self.preview_lines {
            // previews want to appear right under their path
            preview::write_preview(&mut inner.out, result, lines)?;
            inner.out.flush()?;
            inner.unflushed = 0;
        } else {
            inner.unflushed += 1;
            if inner.unflushed >= FLUSH_THRESHOLD {
                inner.out.flush()?;
                inner.unflushed = 0;
            }
        }

        Ok(())
    }

    /// Flush whatever is still buffered once the search has returned
    pub fn finish(&self) {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(err) = inner.out.flush() {
            debug!("final flush failed: {err}");
        }
    }
}

#[derive(Serialize)]
struct ResultRecord {
    path: String,
    #[serde(rename = "type")]
    kind: &'static str,
    size: u64,
    modified: String,
}

/// Emit the materialised result list as a JSON array
pub fn write_json<W: Write>(results: &[SearchResult], out: &mut W) -> anyhow::Result<()> {
    let records: Vec<ResultRecord> = results
        .iter()
        .map(|result| ResultRecord {
            path: result.path.display().to_string(),
            kind: if result.is_directory {
                "directory"
            } else {
                "file"
            },
            size: result.size,
            modified: DateTime::<Utc>::from(result.mtime).to_rfc3339(),
        })
        .collect();

    serde_json::to_writer_pretty(&mut *out, &records)?;
    writeln!(out)?;
    Ok(())
}
