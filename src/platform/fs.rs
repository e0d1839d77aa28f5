// GrepMark - platform/fs.rs
//
// Input acquisition: the ordered lines of text to filter, read from a
// file or stdin. Invalid UTF-8 is replaced rather than rejected, since
// log files routinely carry stray bytes.

use crate::util::constants::{LARGE_INPUT_THRESHOLD, MAX_INPUT_BYTES};
use crate::util::error::InputError;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Display name used for stdin in errors and logs.
const STDIN_NAME: &str = "<stdin>";

/// Read input lines from `path`, or from stdin when `path` is `None` or `-`.
pub fn read_input_lines(path: Option<&Path>) -> Result<Vec<String>, InputError> {
    let text = match path {
        Some(p) if p != Path::new("-") => read_file_lossy(p)?,
        _ => read_stdin_lossy()?,
    };
    Ok(split_lines(&text))
}

/// Split text into lines, dropping `\n` / `\r\n` terminators.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Read the full content of a file as a string.
///
/// Files above `LARGE_INPUT_THRESHOLD` are mapped with `memmap2` instead
/// of being copied into an intermediate buffer first.
pub fn read_file_lossy(path: &Path) -> Result<String, InputError> {
    let io_err = |source: io::Error| InputError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > MAX_INPUT_BYTES {
        return Err(InputError::TooLarge {
            path: path.to_path_buf(),
            size,
            max: MAX_INPUT_BYTES,
        });
    }

    if size > LARGE_INPUT_THRESHOLD {
        let file = std::fs::File::open(path).map_err(io_err)?;
        // SAFETY: the map is read-only and dropped before returning. An
        // external writer truncating the file meanwhile is the documented
        // memmap risk, accepted for reading already-written text files.
        let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(io_err)?;
        tracing::debug!(path = %path.display(), size, "Reading input via memory map");
        return Ok(String::from_utf8_lossy(&mmap).into_owned());
    }

    let bytes = std::fs::read(path).map_err(io_err)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read all of stdin as a string.
fn read_stdin_lossy() -> Result<String, InputError> {
    let mut bytes = Vec::new();
    io::stdin()
        .lock()
        .take(MAX_INPUT_BYTES + 1)
        .read_to_end(&mut bytes)
        .map_err(|source| InputError::Io {
            path: PathBuf::from(STDIN_NAME),
            source,
        })?;
    if bytes.len() as u64 > MAX_INPUT_BYTES {
        return Err(InputError::TooLarge {
            path: PathBuf::from(STDIN_NAME),
            size: bytes.len() as u64,
            max: MAX_INPUT_BYTES,
        });
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_split_lines_handles_crlf_and_trailing_newline() {
        assert_eq!(split_lines("a\r\nb\n\nc\n"), vec!["a", "b", "", "c"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_read_file_replaces_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.log");
        std::fs::write(&path, b"ok\nbad \xff byte\n").unwrap();
        let lines = read_input_lines(Some(&path)).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "ok");
        assert!(lines[1].starts_with("bad "));
        assert!(lines[1].contains('\u{FFFD}'));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = read_input_lines(Some(&dir.path().join("nope.log")));
        assert!(matches!(result, Err(InputError::Io { .. })));
    }
}
