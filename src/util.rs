use crate::error::CountError;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Opens `path` for reading; a missing or unreadable path is `NotFound`.
pub fn open_file(path: &Path) -> Result<File, CountError> {
    let f = File::open(path).map_err(|e| CountError::not_found(e, path))?;
    // File::open succeeds on directories on unix; reading them fails later
    let meta = f.metadata().map_err(|e| CountError::not_found(e, path))?;
    if meta.is_dir() {
        return Err(CountError::not_found(
            io::Error::new(io::ErrorKind::InvalidInput, "is a directory"),
            path,
        ));
    }
    Ok(f)
}

/// `Read::read` that retries on `Interrupted`.
pub fn read_some<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match r.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            res => return res,
        }
    }
}
