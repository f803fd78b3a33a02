//! Command implementations.

use anyhow::Context;
use camino::Utf8Path;

pub mod detect;
pub mod info;
pub mod name;
#[cfg(feature = "mcp")]
pub mod serve;

/// Read a file as raw bytes and validate its size against the configured limit.
///
/// Bytes are handed to the core undecoded; it decodes them as UTF-8 itself.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<Vec<u8>> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    std::fs::read(path.as_std_path()).with_context(|| format!("failed to read {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn write_tmp(tmp: &TempDir, contents: &[u8]) -> Utf8PathBuf {
        let path = tmp.path().join("input.csv");
        std::fs::write(&path, contents).unwrap();
        Utf8PathBuf::try_from(path).unwrap()
    }

    #[test]
    fn reads_within_limit() {
        let tmp = TempDir::new().unwrap();
        let path = write_tmp(&tmp, b"a;b\n1;2\n");
        let bytes = read_input_file(&path, Some(1024)).unwrap();
        assert_eq!(bytes, b"a;b\n1;2\n");
    }

    #[test]
    fn rejects_oversized_input() {
        let tmp = TempDir::new().unwrap();
        let path = write_tmp(&tmp, b"a;b\n1;2\n");
        let err = read_input_file(&path, Some(4)).unwrap_err();
        assert!(err.to_string().contains("input too large"));
    }

    #[test]
    fn no_limit_reads_anything() {
        let tmp = TempDir::new().unwrap();
        let path = write_tmp(&tmp, &[b'x'; 4096]);
        assert_eq!(read_input_file(&path, None).unwrap().len(), 4096);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_input_file(Utf8Path::new("/nonexistent/data.csv"), None).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/data.csv"));
    }
}
