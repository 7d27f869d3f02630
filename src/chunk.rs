use crate::separator::Separator;
use memchr::memmem;

/// Bytes read from the source but not yet handed out, plus where the last separator
/// in them sits. Shared by the sync and async readers so both cut chunks identically.
#[derive(Debug, Default)]
pub(crate) struct Pending {
    buf: Vec<u8>,
    // prefix of `buf` already searched; always ends on a match end or where a
    // separator could still start
    scanned: usize,
    // start of the last separator found in `buf`
    split: Option<usize>,
}

impl Pending {
    pub(crate) fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap),
            scanned: 0,
            split: None,
        }
    }

    #[inline]
    pub(crate) fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Room to read `n` more bytes into; commit them with [`Pending::commit`].
    pub(crate) fn spare(&mut self, n: usize) -> &mut [u8] {
        let len = self.buf.len();
        self.buf.resize(len + n, 0);
        &mut self.buf[len..]
    }

    /// Keeps `filled` bytes of the last [`Pending::spare`] region and drops the rest.
    pub(crate) fn commit(&mut self, reserved: usize, filled: usize) {
        let len = self.buf.len();
        self.buf.truncate(len - reserved + filled);
    }

    /// Searches bytes appended since the last scan, greedy and non-overlapping.
    pub(crate) fn scan(&mut self, sep: &Separator) {
        let needle = sep.as_bytes();
        let start = self.scanned;
        let mut resume = start;
        for at in memmem::find_iter(&self.buf[start..], needle) {
            self.split = Some(start + at);
            resume = start + at + needle.len();
        }
        // a separator may straddle the end of what has been read so far
        let tail = self.buf.len().saturating_sub(needle.len() - 1);
        self.scanned = resume.max(tail).max(start);
    }

    /// Moves everything before the last found separator into `out` and drops the
    /// separator itself. Returns `false` when no separator has been found.
    pub(crate) fn take_aligned(&mut self, sep: &Separator, out: &mut Vec<u8>) -> bool {
        let Some(at) = self.split.take() else {
            return false;
        };
        let consumed = at + sep.len();
        out.extend_from_slice(&self.buf[..at]);
        self.buf.drain(..consumed);
        self.scanned -= consumed;
        true
    }

    /// Moves all remaining bytes into `out`.
    pub(crate) fn take_rest(&mut self, out: &mut Vec<u8>) {
        out.append(&mut self.buf);
        self.scanned = 0;
        self.split = None;
    }
}
