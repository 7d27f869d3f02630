//! Separator-aware line counting over a chunked reader.
//!
//! A chunk holding `k` separators contributes `k + 1` lines. The reader consumes the
//! separator at every chunk boundary, so the sum over all chunks is the number of
//! separators in the input plus one.

use crate::error::{CountError, OptionError};
use crate::options::CountOptions;
use crate::reader::ChunkedReader;
use crate::separator::{DetectSeparator, DominantLineBreak, Separator};

use regex::bytes::{NoExpand, Regex};
use std::io::Read;

/// Per-chunk line accounting for one count.
#[derive(Debug)]
pub struct Tally {
    sep: Separator,
    // matches one or more consecutive separators; only built with `skip_blank`
    collapse: Option<Regex>,
    skip_ending_line_break: bool,
}

impl Tally {
    pub fn new(sep: Separator, opts: &CountOptions) -> Result<Self, OptionError> {
        let collapse = if opts.skip_blank {
            Some(collapse_pattern(&sep)?)
        } else {
            None
        };
        Ok(Self {
            sep,
            collapse,
            skip_ending_line_break: opts.skip_ending_line_break,
        })
    }

    #[inline]
    pub fn separator(&self) -> &Separator {
        &self.sep
    }

    /// Lines contributed by `raw`; `last` marks the chunk delivered as the reader ran dry.
    pub fn lines_in(&self, raw: &[u8], last: bool) -> u64 {
        let collapsed;
        let data = match &self.collapse {
            Some(re) => {
                collapsed = re.replace_all(raw, NoExpand(self.sep.as_bytes()));
                let trimmed = self.sep.trim(&collapsed);
                if trimmed.is_empty() {
                    return 0;
                }
                trimmed
            }
            None => raw,
        };

        let mut lines = self.sep.count_in(data) + 1;
        if last
            && self.skip_ending_line_break
            && (data.is_empty() || data.ends_with(self.sep.as_bytes()))
        {
            lines -= 1;
        }
        lines
    }

    /// Final total; input that produced no bytes at all has no lines.
    pub fn finish(&self, total: u64, bytes_read: u64) -> u64 {
        if bytes_read == 0 {
            if total != 0 {
                log::debug!("empty input accumulated {total} lines, reporting 0");
            }
            return 0;
        }
        total
    }
}

fn collapse_pattern(sep: &Separator) -> Result<Regex, OptionError> {
    let mut pattern = String::from("(?-u)(?:");
    for b in sep.as_bytes() {
        pattern.push_str(&format!("\\x{b:02X}"));
    }
    pattern.push_str(")+");
    Regex::new(&pattern).map_err(|e| OptionError::SeparatorPattern(e.to_string()))
}

/// Counts the lines of `options.file_path`, detecting the separator when none is set.
pub fn count(options: &CountOptions) -> Result<u64, CountError> {
    count_with(options, &DominantLineBreak)
}

/// Like [`count`], resolving an unset separator with `detector`.
pub fn count_with(
    options: &CountOptions,
    detector: &dyn DetectSeparator,
) -> Result<u64, CountError> {
    if options.file_path.as_os_str().is_empty() {
        return Err(OptionError::MissingPath.into());
    }
    let reader_opts = options.reader_options()?;
    let reader = ChunkedReader::from_path(&options.file_path, reader_opts)?;
    drive(reader, options, detector)
}

/// Counts lines read from `reader`. `options.file_path` is not used.
pub fn count_reader<R: Read + Send + 'static>(
    reader: R,
    options: &CountOptions,
) -> Result<u64, CountError> {
    let reader = ChunkedReader::from_read(reader, options.reader_options()?);
    drive(reader, options, &DominantLineBreak)
}

fn drive(
    mut reader: ChunkedReader,
    options: &CountOptions,
    detector: &dyn DetectSeparator,
) -> Result<u64, CountError> {
    let sep = reader.detect_separator(detector)?;
    let tally = Tally::new(sep, options)?;

    let mut chunk = Vec::new();
    let mut total = 0u64;
    while !reader.is_exhausted() {
        reader.next_chunk(&mut chunk)?;
        total += tally.lines_in(&chunk, reader.is_exhausted());
    }

    let total = tally.finish(total, reader.bytes_read());
    log::debug!(
        "{:?}: {total} lines in {} bytes",
        reader.source(),
        reader.bytes_read()
    );
    Ok(total)
}

#[cfg(feature = "async")]
pub use self::nonblocking::{count_async, count_async_with};

#[cfg(feature = "async")]
mod nonblocking {
    use super::Tally;
    use crate::async_reader::AsyncChunkedReader;
    use crate::error::{CountError, OptionError};
    use crate::options::CountOptions;
    use crate::separator::{DetectSeparator, DominantLineBreak};

    /// Async [`count`](super::count); each chunk pull yields to the runtime.
    pub async fn count_async(options: &CountOptions) -> Result<u64, CountError> {
        count_async_with(options, &DominantLineBreak).await
    }

    pub async fn count_async_with(
        options: &CountOptions,
        detector: &(dyn DetectSeparator + Sync),
    ) -> Result<u64, CountError> {
        if options.file_path.as_os_str().is_empty() {
            return Err(OptionError::MissingPath.into());
        }
        let reader_opts = options.reader_options()?;
        let mut reader = AsyncChunkedReader::from_path(&options.file_path, reader_opts).await?;

        let sep = reader.detect_separator(detector).await?;
        let tally = Tally::new(sep, options)?;

        let mut chunk = Vec::new();
        let mut total = 0u64;
        while !reader.is_exhausted() {
            reader.next_chunk(&mut chunk).await?;
            total += tally.lines_in(&chunk, reader.is_exhausted());
        }

        let total = tally.finish(total, reader.bytes_read());
        log::debug!(
            "{:?}: {total} lines in {} bytes",
            reader.source(),
            reader.bytes_read()
        );
        Ok(total)
    }
}
