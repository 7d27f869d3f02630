//! Streaming line counter.
//!
//! - Reads the input in fixed-size chunks (no full-file buffering).
//! - Any non-empty byte sequence can separate lines; `\r\n` vs `\n` is auto-detected
//!   when none is given.
//! - Optional skipping of blank lines and of the empty line after a final separator.
//! - Plain input, or gzip when asked for with `CountOptions::gzip`; `zlib` feature for
//!   system-zlib parity.
//! - Optional async API behind `async` feature.
//!
//! ```no_run
//! use chunk_line_count::{count, CountOptions};
//!
//! let opts = CountOptions::new("access.log").skip_blank(true);
//! let lines = count(&opts)?;
//! println!("{lines}");
//! # Ok::<(), chunk_line_count::CountError>(())
//! ```

mod chunk;
pub mod counter;
pub mod error;
pub mod options;
pub mod reader;
pub mod separator;
mod util;

#[cfg(feature = "async")]
pub mod async_reader;

pub use crate::counter::{Tally, count, count_reader, count_with};
pub use crate::error::{CountError, IoContext, OptionError};
pub use crate::options::{CountOptions, DEFAULT_BUFFER_SIZE, ReaderOptions, parse_buffer_size};
pub use crate::reader::{ChunkedReader, Source};
pub use crate::separator::{DetectSeparator, DominantLineBreak, Separator};

#[cfg(feature = "async")]
pub use crate::async_reader::{AsyncChunkedReader, AsyncSource};
#[cfg(feature = "async")]
pub use crate::counter::{count_async, count_async_with};
