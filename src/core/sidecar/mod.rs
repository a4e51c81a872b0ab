pub mod metadata;
pub mod names;
pub mod search;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::utils::text::decode_text;
use crate::utils::{Error, ShowmetaResult};

pub use metadata::ShowMetadata;
pub use names::{season_file_names, show_file_names};
pub use search::SearchRoots;

/// Read a sidecar text file. Invalid UTF-8 is decoded lossily; newlines are kept.
pub fn read_text(path: &Path) -> ShowmetaResult<String> {
    let bytes = fs::read(path).map_err(|source| Error::SidecarRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_text(&bytes))
}

/// `read_text`, with read failures logged and treated as an absent sidecar.
pub fn read_text_lenient(path: &Path) -> Option<String> {
    match read_text(path) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(target: "showmeta::sidecar", "{e}");
            None
        }
    }
}

/// `<file without extension><extension>`, beside the media file.
pub fn episode_summary_path(media_file: &Path, extension: &str) -> PathBuf {
    media_file.with_extension(extension.trim_start_matches('.'))
}

pub fn episode_summary(media_file: &Path, extension: &str) -> Option<String> {
    let path = episode_summary_path(media_file, extension);
    if !path.is_file() {
        debug!(target: "showmeta::sidecar", path = %path.display(), "No episode summary file");
        return None;
    }
    read_text_lenient(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_path_replaces_last_extension() {
        let p = episode_summary_path(Path::new("/tv/Show/a.b - Title.mp4"), ".summary");
        assert_eq!(p, PathBuf::from("/tv/Show/a.b - Title.summary"));
        let p = episode_summary_path(Path::new("/tv/Show/x.mkv"), "txt");
        assert_eq!(p, PathBuf::from("/tv/Show/x.txt"));
    }

    #[test]
    fn summary_text_keeps_newlines_and_tolerates_bad_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let media = tmp.path().join("ep.mkv");
        fs::write(tmp.path().join("ep.summary"), b"Line one\nLine \xfe two\n").unwrap();
        let text = episode_summary(&media, ".summary").unwrap();
        assert_eq!(text, "Line one\nLine \u{FFFD} two\n");
    }

    #[test]
    fn unreadable_sidecar_is_an_error_not_a_panic() {
        let tmp = tempfile::tempdir().unwrap();
        let err = read_text(&tmp.path().join("missing.summary")).unwrap_err();
        assert!(matches!(err, Error::SidecarRead { .. }));
        assert_eq!(read_text_lenient(&tmp.path().join("missing.summary")), None);
    }
}
