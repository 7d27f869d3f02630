#![cfg(feature = "async")]

use crate::chunk::Pending;
use crate::error::{CountError, IoContext};
use crate::options::ReaderOptions;
use crate::reader::MAX_DETECT_SAMPLE;
use crate::separator::{DetectSeparator, DominantLineBreak, Separator};

#[cfg(feature = "gzip")]
use async_compression::tokio::bufread::GzipDecoder;
use std::path::{Path, PathBuf};
use tokio::fs::File;
#[cfg(feature = "gzip")]
use tokio::io::BufReader;
use tokio::io::{self, AsyncRead, AsyncReadExt};

#[derive(Debug)]
pub enum AsyncSource {
    Path(PathBuf),
    Reader,
}

/// Async chunked reader (plain, or gzip on request); same chunking as
/// [`ChunkedReader`](crate::ChunkedReader).
pub struct AsyncChunkedReader {
    src: AsyncSource,
    rdr: Box<dyn AsyncRead + Unpin + Send>,
    opts: ReaderOptions,
    pending: Pending,
    bytes_read: u64,
    chunk_num: u64,
    eof: bool,
    exhausted: bool,
}

impl AsyncChunkedReader {
    /// Open async from path; gzip only when `opts.gzip` is set, as in
    /// [`ChunkedReader::from_path`](crate::ChunkedReader::from_path).
    pub async fn from_path<P: AsRef<Path>>(
        path: P,
        opts: ReaderOptions,
    ) -> Result<Self, CountError> {
        let path = path.as_ref().to_path_buf();
        let f = File::open(&path)
            .await
            .map_err(|e| CountError::not_found(e, &path))?;
        let meta = f
            .metadata()
            .await
            .map_err(|e| CountError::not_found(e, &path))?;
        if meta.is_dir() {
            return Err(CountError::not_found(
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "is a directory"),
                &path,
            ));
        }

        let rdr: Box<dyn AsyncRead + Unpin + Send> = if opts.gzip {
            #[cfg(feature = "gzip")]
            {
                let mut gz = GzipDecoder::new(BufReader::with_capacity(256 * 1024, f));
                // concatenated members, like flate2's MultiGzDecoder
                gz.multiple_members(true);
                Box::new(gz)
            }
            #[cfg(not(feature = "gzip"))]
            {
                return Err(crate::error::OptionError::GzipDisabled.into());
            }
        } else {
            Box::new(f)
        };

        Ok(Self::new(AsyncSource::Path(path), rdr, opts))
    }

    /// Wrap any `AsyncRead`.
    pub fn from_async_read<R>(reader: R, opts: ReaderOptions) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        Self::new(AsyncSource::Reader, Box::new(reader), opts)
    }

    fn new(src: AsyncSource, rdr: Box<dyn AsyncRead + Unpin + Send>, opts: ReaderOptions) -> Self {
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
    pub fn source(&self) -> &AsyncSource {
        &self.src
    }

    #[inline]
    pub fn separator(&self) -> Option<&Separator> {
        self.opts.separator.as_ref()
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    #[inline]
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub async fn detect_separator(
        &mut self,
        detector: &(dyn DetectSeparator + Sync),
    ) -> Result<Separator, CountError> {
        if let Some(sep) = &self.opts.separator {
            return Ok(sep.clone());
        }
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
            self.fill().await?;
        }
        let sep = detector.detect(self.pending.bytes());
        log::debug!(
            "detected line separator \"{sep}\" from {} sampled bytes",
            self.pending.bytes().len()
        );
        self.opts.separator = Some(sep.clone());
        Ok(sep)
    }

    /// Fetch next chunk (async).
    pub async fn next_chunk(&mut self, out: &mut Vec<u8>) -> Result<usize, CountError> {
        out.clear();
        if self.exhausted {
            return Ok(0);
        }
        let sep = self.detect_separator(&DominantLineBreak).await?;

        loop {
            self.pending.scan(&sep);
            if self.pending.take_aligned(&sep, out) {
                break;
            }
            if self.eof {
                self.pending.take_rest(out);
                self.exhausted = true;
                self.rdr = Box::new(io::empty());
                break;
            }
            self.fill().await?;
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

    async fn fill(&mut self) -> Result<usize, CountError> {
        let want = self.opts.buffer_size;
        let spare = self.pending.spare(want);
        let res = loop {
            match self.rdr.read(&mut *spare).await {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                res => break res,
            }
        };
        match res {
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
