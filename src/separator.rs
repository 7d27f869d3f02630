use crate::error::OptionError;
use memchr::memmem;
use std::fmt;
use std::sync::Arc;

/// A non-empty byte sequence delimiting two logical lines. Cheap to clone.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Separator(Arc<[u8]>);

impl Separator {
    /// Unix line break.
    pub fn lf() -> Self {
        Self(Arc::from(&b"\n"[..]))
    }

    /// Windows line break.
    pub fn crlf() -> Self {
        Self(Arc::from(&b"\r\n"[..]))
    }

    pub fn new(bytes: impl AsRef<[u8]>) -> Result<Self, OptionError> {
        let bytes = bytes.as_ref();
        if bytes.is_empty() {
            return Err(OptionError::EmptySeparator);
        }
        Ok(Self(Arc::from(bytes)))
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Non-overlapping occurrences in `haystack`, scanning left to right.
    pub fn count_in(&self, haystack: &[u8]) -> u64 {
        if haystack.len() < self.len() {
            return 0;
        }
        memmem::find_iter(haystack, self.as_bytes()).count() as u64
    }

    /// Strips whole leading and trailing repetitions of the separator.
    pub fn trim<'a>(&self, mut data: &'a [u8]) -> &'a [u8] {
        while let Some(rest) = data.strip_prefix(self.as_bytes()) {
            data = rest;
        }
        while let Some(rest) = data.strip_suffix(self.as_bytes()) {
            data = rest;
        }
        data
    }
}

impl fmt::Debug for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Separator({:?})", self.0.escape_ascii().to_string())
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.escape_ascii())
    }
}

/// Strategy resolving the line separator from a sample taken at the start of the input.
pub trait DetectSeparator {
    fn detect(&self, sample: &[u8]) -> Separator;
}

/// Picks `"\r\n"` when CRLF breaks are at least as frequent as lone LF breaks in the
/// sample, `"\n"` otherwise (including samples without any break).
#[derive(Debug, Clone, Copy, Default)]
pub struct DominantLineBreak;

impl DetectSeparator for DominantLineBreak {
    fn detect(&self, sample: &[u8]) -> Separator {
        let lf = memchr::memchr_iter(b'\n', sample).count();
        let crlf = memmem::find_iter(sample, b"\r\n").count();
        let lone_lf = lf - crlf;
        if crlf > 0 && crlf >= lone_lf {
            Separator::crlf()
        } else {
            Separator::lf()
        }
    }
}

/// Always resolves to the same separator.
#[derive(Debug, Clone)]
pub struct Fixed(pub Separator);

impl DetectSeparator for Fixed {
    fn detect(&self, _sample: &[u8]) -> Separator {
        self.0.clone()
    }
}

/// Expands `\n`, `\r`, `\t` and `\\` in a separator typed on a command line.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
