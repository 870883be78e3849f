use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use log::debug;

use crate::core::context::SearchResult;
use crate::filters::file_type::{self, FileTypeClass};

pub const DEFAULT_PREVIEW_LINES: usize = 10;
pub const MAX_PREVIEW_LINES: usize = 1000;

/// Write an indented preview under a result's path: the first lines of a
/// text file, a size summary for anything else, a tag for directories.
pub(crate) fn write_preview(
    out: &mut dyn Write,
    result: &SearchResult,
    lines: usize,
) -> io::Result<()> {
    if result.is_directory {
        writeln!(out, "  [Directory]")?;
        writeln!(out)?;
        return Ok(());
    }

    if is_text_file(result) {
        write_text_preview(out, result, lines)?;
    } else {
        writeln!(out, "  [{} bytes]", result.size)?;
    }
    writeln!(out)?;
    Ok(())
}

fn is_text_file(result: &SearchResult) -> bool {
    result
        .path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(file_type::classify)
        == Some(FileTypeClass::Text)
}

fn write_text_preview(out: &mut dyn Write, result: &SearchResult, lines: usize) -> io::Result<()> {
    let file = match File::open(&result.path) {
        Ok(file) => file,
        Err(err) => {
            debug!("cannot preview {}: {err}", result.path.display());
            return Ok(());
        }
    };

    for line in BufReader::new(file).lines().take(lines) {
        // a read error mid-file (or binary junk) just ends the preview
        let Ok(line) = line else { break };
        writeln!(out, "  {line}")?;
    }
    Ok(())
}
