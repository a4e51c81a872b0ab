use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use tracing::warn;
use unicode_normalization::UnicodeNormalization;

/// Decode raw bytes as UTF-8, falling back to a lossy decode, and NFC-normalize the result.
pub fn decode_text(bytes: &[u8]) -> String {
    let decoded = match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(e) => {
            warn!(target: "showmeta::text", error = %e, "Invalid UTF-8, decoding lossily");
            String::from_utf8_lossy(bytes)
        }
    };
    decoded.nfc().collect()
}

/// Canonical text form of a path, as used for pattern matching.
pub fn path_text(path: &Path) -> String {
    #[cfg(target_family = "unix")]
    {
        use std::os::unix::ffi::OsStrExt;
        decode_text(path.as_os_str().as_bytes())
    }
    #[cfg(not(target_family = "unix"))]
    {
        decode_text(path.to_string_lossy().as_bytes())
    }
}

/// Make a path absolute and drop `.` / `..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let bytes = b"Show \xff Title";
        assert_eq!(decode_text(bytes), "Show \u{FFFD} Title");
    }

    #[test]
    fn decomposed_text_is_composed() {
        // "e" + combining acute accent
        let decomposed = "Cafe\u{301}";
        assert_eq!(decode_text(decomposed.as_bytes()), "Caf\u{e9}");
    }

    #[test]
    fn normalize_removes_dot_components() {
        let p = normalize_path(Path::new("/media/tv/./Show/../Other/file.mkv"));
        assert_eq!(p, PathBuf::from("/media/tv/Other/file.mkv"));
    }

    #[test]
    fn relative_paths_become_absolute() {
        assert!(normalize_path(Path::new("some/file.mkv")).is_absolute());
    }
}
