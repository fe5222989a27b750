//! Text loading for response bodies and schema documents.

use crate::error::{Error, Result};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Reads a whole file as UTF-8 text.
///
/// Files ending in `.gz` are decompressed first.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, is not valid gzip
/// (for `.gz` files) or is not valid UTF-8.
pub fn read_text_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path_ref = path.as_ref();
    let io_error = |source| Error::Io {
        path: path_ref.to_path_buf(),
        source,
    };

    if is_gzipped(path_ref) {
        let file = fs::File::open(path_ref).map_err(io_error)?;
        let mut content = String::new();
        flate2::read::GzDecoder::new(file)
            .read_to_string(&mut content)
            .map_err(io_error)?;
        Ok(content)
    } else {
        fs::read_to_string(path_ref).map_err(io_error)
    }
}

/// Reads a response body from standard input.
///
/// Gzip input is recognised by its magic bytes (0x1f 0x8b) and decompressed.
pub fn read_stdin() -> anyhow::Result<String> {
    use anyhow::Context;

    let mut buffer = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    if buffer.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(&buffer)
    } else {
        String::from_utf8(buffer).context("stdin is not valid UTF-8")
    }
}

fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false)
}

/// Decompresses gzip-encoded bytes to a UTF-8 string.
fn decompress_gzip_bytes(bytes: &[u8]) -> anyhow::Result<String> {
    use anyhow::Context;

    let mut decoder = flate2::read::GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped stdin")?;
    Ok(content)
}
