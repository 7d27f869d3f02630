use crate::chunk::Pending;
use crate::error::{CountError, IoContext};
use crate::options::ReaderOptions;
use crate::separator::{DetectSeparator, DominantLineBreak, Separator};
use crate::util::{open_file, read_some};

#[cfg(feature = "gzip")]
use flate2::read::MultiGzDecoder;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Upper bound on how much is sampled when detecting the separator.
pub(crate) const MAX_DETECT_SAMPLE: usize = 1 << 20;

#[derive(Debug)]
pub enum Source {
    Path(PathBuf),
    Reader,
}

/// Sync chunked reader (plain, or gzip on request). Every chunk ends right before a
/// separator, so no separator is ever split across two chunks.
pub struct ChunkedReader {
    src: Source,
    rdr: Box<dyn Read + Send>,
    opts: ReaderOptions,
    pending: Pending,
    bytes_read: u64,
    chunk_num: u64,
    eof: bool,
    exhausted: bool,
}

impl ChunkedReader {
    /// Open from a file path. The file is read as raw bytes unless `opts.gzip` is set;
    /// names and leading bytes are never used to guess compression.
    pub fn from_path<P: AsRef<Path>>(path: P, opts: ReaderOptions) -> Result<Self, CountError> {
        let path = path.as_ref();
        let f = open_file(path)?;

        let rdr: Box<dyn Read + Send> = if opts.gzip {
            #[cfg(feature = "gzip")]
            {
                Box::new(MultiGzDecoder::new(f))
            }
            #[cfg(not(feature = "gzip"))]
            {
                return Err(crate::error::OptionError::GzipDisabled.into());
            }
        } else {
            Box::new(f)
        };

        Ok(Self::new(Source::Path(path.to_path_buf()), rdr, opts))
    }

    /// Wrap an arbitrary `Read` (stdin, in-memory data, etc.).
    pub fn from_read<R: Read + Send + 'static>(reader: R, opts: ReaderOptions) -> Self {
        Self::new(Source::Reader, Box::new(reader), opts)
    }

    fn new(src: Source, rdr: Box<dyn Read + Send>, opts: ReaderOptions) -> Self {
        let pending = Pending::with_capacity(opts.buffer_size);
        Self {
            src,
            rdr,
            opts,
            pending,
            bytes_read: 0,
            chunk_num: 0,
            eof: false,
            exhausted: false,
        }
    }

    #[inline]
    pub fn source(&self) -> &Source {
        &self.src
    }

    /// The configured or detected separator; `None` until one is resolved.
    #[inline]
    pub fn separator(&self) -> Option<&Separator> {
        self.opts.separator.as_ref()
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Bytes pulled from the source so far (decompressed bytes for gzip input).
    #[inline]
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Resolves the separator with `detector` unless one is configured. Reads until the
    /// sample holds a line feed, the input ends, or the sample reaches 1 MiB.
    pub fn detect_separator(
        &mut self,
        detector: &dyn DetectSeparator,
    ) -> Result<Separator, CountError> {
        if let Some(sep) = &self.opts.separator {
            return Ok(sep.clone());
        }
        // bytes before `searched` hold no line feed
        let mut searched = 0;
        loop {
            let sample = self.pending.bytes();
            if self.eof
                || sample.len() >= MAX_DETECT_SAMPLE
                || memchr::memchr(b'\n', &sample[searched..]).is_some()
            {
                break;
            }
            searched = sample.len();
            self.fill()?;
        }
        let sep = detector.detect(self.pending.bytes());
        log::debug!(
            "detected line separator \"{sep}\" from {} sampled bytes",
            self.pending.bytes().len()
        );
        self.opts.separator = Some(sep.clone());
        Ok(sep)
    }

    /// Replaces `out` with the next chunk and returns its length. Once the input is
    /// consumed the remaining tail (possibly empty) is returned and the reader is
    /// exhausted; later calls return 0.
    pub fn next_chunk(&mut self, out: &mut Vec<u8>) -> Result<usize, CountError> {
        out.clear();
        if self.exhausted {
            return Ok(0);
        }
        let sep = self.detect_separator(&DominantLineBreak)?;

        loop {
            self.pending.scan(&sep);
            if self.pending.take_aligned(&sep, out) {
                break;
            }
            if self.eof {
                self.pending.take_rest(out);
                self.exhausted = true;
                // release the file handle
                self.rdr = Box::new(io::empty());
                break;
            }
            self.fill()?;
        }

        self.chunk_num += 1;
        log::trace!(
            "chunk {}: {} bytes, {} read so far",
            self.chunk_num,
            out.len(),
            self.bytes_read
        );
        Ok(out.len())
    }

    fn fill(&mut self) -> Result<usize, CountError> {
        let want = self.opts.buffer_size;
        match read_some(&mut self.rdr, self.pending.spare(want)) {
            Ok(n) => {
                self.pending.commit(want, n);
                self.bytes_read += n as u64;
                self.eof = n == 0;
                Ok(n)
            }
            Err(e) => {
                self.pending.commit(want, 0);
                Err(CountError::io_err(e, self.ctx()))
            }
        }
    }

    #[inline]
    fn ctx(&self) -> IoContext {
        IoContext {
            byte_pos: self.bytes_read,
            chunk_num: self.chunk_num,
        }
    }
}
