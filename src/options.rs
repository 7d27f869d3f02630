use crate::error::OptionError;
use crate::separator::Separator;
use std::path::PathBuf;

pub const DEFAULT_BUFFER_SIZE: usize = 65536;

/// What to count and how.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountOptions {
    pub file_path: PathBuf,
    /// `None` asks the reader to detect the separator from the input.
    pub line_separator: Option<String>,
    /// `None` means [`DEFAULT_BUFFER_SIZE`].
    pub buffer_size: Option<usize>,
    /// Do not count empty lines.
    pub skip_blank: bool,
    /// Do not count the empty line after a separator that ends the input.
    pub skip_ending_line_break: bool,
    /// Decompress the file as gzip before counting. Never guessed from the input.
    pub gzip: bool,
}

impl CountOptions {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Self::default()
        }
    }

    pub fn line_separator(mut self, sep: impl Into<String>) -> Self {
        self.line_separator = Some(sep.into());
        self
    }

    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = Some(size);
        self
    }

    pub fn skip_blank(mut self, yes: bool) -> Self {
        self.skip_blank = yes;
        self
    }

    pub fn skip_ending_line_break(mut self, yes: bool) -> Self {
        self.skip_ending_line_break = yes;
        self
    }

    pub fn gzip(mut self, yes: bool) -> Self {
        self.gzip = yes;
        self
    }

    /// Validated reader settings.
    pub fn reader_options(&self) -> Result<ReaderOptions, OptionError> {
        let buffer_size = match self.buffer_size {
            None => DEFAULT_BUFFER_SIZE,
            Some(0) => return Err(OptionError::ZeroBufferSize),
            Some(n) => n,
        };
        let separator = self
            .line_separator
            .as_deref()
            .map(Separator::new)
            .transpose()?;
        if self.gzip && !cfg!(feature = "gzip") {
            return Err(OptionError::GzipDisabled);
        }
        Ok(ReaderOptions {
            buffer_size,
            separator,
            gzip: self.gzip,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Bytes requested from the source per refill.
    pub buffer_size: usize,
    pub separator: Option<Separator>,
    /// Source is gzip-compressed; only honoured by the `from_path` constructors.
    pub gzip: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            separator: None, // detect from the first buffer
            gzip: false,
        }
    }
}

/// Parses a buffer size given as text.
pub fn parse_buffer_size(raw: &str) -> Result<usize, OptionError> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(OptionError::ZeroBufferSize),
        Ok(n) => Ok(n),
        Err(_) => Err(OptionError::MalformedBufferSize(raw.to_string())),
    }
}
