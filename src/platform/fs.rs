// HydroFlow Export - platform/fs.rs
//
// Filesystem helpers: bounded log reading and atomic artifact writes.

use crate::util::constants;
use crate::util::error::SourceError;
use std::io;
use std::path::Path;

/// Read a log file as a string, refusing files above `MAX_LOG_FILE_SIZE`.
///
/// Invalid UTF-8 is replaced rather than rejected so a single corrupt byte
/// never loses the whole log.
pub fn read_log_file(path: &Path) -> Result<String, SourceError> {
    let io_err = |e: io::Error| SourceError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > constants::MAX_LOG_FILE_SIZE {
        return Err(SourceError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max_size: constants::MAX_LOG_FILE_SIZE,
        });
    }

    let bytes = std::fs::read(path).map_err(io_err)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write `bytes` to `path` atomically (write temp → rename).
///
/// A failure between write and rename leaves any previous file at `path`
/// untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path).map_err(|e| {
        // Clean up the temp file on failure; ignore any secondary error.
        let _ = std::fs::remove_file(&tmp);
        e
    })
}
