use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, trace};

use crate::utils::text::normalize_path;

/// Walk upward from each starting point in turn, testing every candidate name
/// at each level; the first existing file wins. A starting file is replaced by
/// its parent directory.
pub fn find_file<P: AsRef<Path>>(starts: &[P], names: &[String]) -> Option<PathBuf> {
    for start in starts {
        let start = start.as_ref();
        let mut dir = if start.is_file() {
            match start.parent() {
                Some(parent) => parent,
                None => continue,
            }
        } else {
            start
        };
        loop {
            trace!(target: "showmeta::sidecar", dir = %dir.display(), "Looking for sidecar files");
            for name in names {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    debug!(target: "showmeta::sidecar", path = %candidate.display(), "Found sidecar file");
                    return Some(candidate);
                }
            }
            // the filesystem root has no parent
            match dir.parent() {
                Some(parent) if parent != dir => dir = parent,
                _ => break,
            }
        }
    }
    None
}

/// Directories to start upward sidecar searches from. No entry is an ancestor
/// of another and equal entries collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchRoots {
    dirs: Vec<PathBuf>,
}

impl SearchRoots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Merge a directory: absorbed when an existing entry covers it, otherwise it
    /// replaces every entry it covers (taking the first one's position) or is
    /// appended as a new independent root.
    pub fn add_directory(&mut self, dir: impl AsRef<Path>) {
        let dir = normalize_path(dir.as_ref());
        if self.dirs.iter().any(|existing| dir.starts_with(existing)) {
            return;
        }
        let position = self.dirs.iter().position(|existing| existing.starts_with(&dir));
        self.dirs.retain(|existing| !existing.starts_with(&dir));
        match position {
            Some(idx) => self.dirs.insert(idx.min(self.dirs.len()), dir),
            None => self.dirs.push(dir),
        }
    }

    /// Merge the directory holding `file`.
    pub fn add_file(&mut self, file: impl AsRef<Path>) {
        if let Some(parent) = file.as_ref().parent() {
            self.add_directory(parent);
        }
    }

    pub fn find_file(&self, names: &[String]) -> Option<PathBuf> {
        find_file(&self.dirs, names)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn assert_minimal(roots: &SearchRoots) {
        for (i, a) in roots.dirs().iter().enumerate() {
            for (j, b) in roots.dirs().iter().enumerate() {
                if i != j {
                    assert!(!b.starts_with(a), "{} is an ancestor of {}", a.display(), b.display());
                }
            }
        }
    }

    #[test]
    fn ancestor_subsumes_descendants() {
        let mut roots = SearchRoots::new();
        roots.add_directory("/a/b/c");
        roots.add_directory("/a/b");
        roots.add_directory("/a/b/d");
        assert_eq!(roots.dirs(), &[PathBuf::from("/a/b")]);
        assert_minimal(&roots);
    }

    #[test]
    fn equal_paths_collapse_and_siblings_stay_independent() {
        let mut roots = SearchRoots::new();
        roots.add_directory("/tv/Show/Season 1");
        roots.add_directory("/tv/Show/Season 1/");
        roots.add_directory("/tv/Other/Season 1");
        roots.add_directory("/tv/Show/Season 10");
        assert_eq!(
            roots.dirs(),
            &[
                PathBuf::from("/tv/Show/Season 1"),
                PathBuf::from("/tv/Other/Season 1"),
                PathBuf::from("/tv/Show/Season 10"),
            ]
        );
        assert_minimal(&roots);
    }

    #[test]
    fn one_ancestor_can_absorb_several_roots() {
        let mut roots = SearchRoots::new();
        roots.add_directory("/x/1");
        roots.add_directory("/tv/a");
        roots.add_directory("/tv/b");
        roots.add_directory("/tv");
        assert_eq!(roots.dirs(), &[PathBuf::from("/x/1"), PathBuf::from("/tv")]);
        assert_minimal(&roots);
    }

    #[test]
    fn name_priority_beats_depth_within_a_start() {
        let tmp = tempfile::tempdir().unwrap();
        let season = tmp.path().join("Show").join("Season 1");
        fs::create_dir_all(&season).unwrap();
        fs::write(season.join("second.summary"), "near").unwrap();
        fs::write(tmp.path().join("Show").join("first.summary"), "far").unwrap();

        let names = vec!["first.summary".to_string(), "second.summary".to_string()];
        // both names are tested at the starting level before walking up
        let found = find_file(&[&season], &names).unwrap();
        assert_eq!(found, season.join("second.summary"));

        let names = vec!["first.summary".to_string()];
        let found = find_file(&[&season], &names).unwrap();
        assert_eq!(found, tmp.path().join("Show").join("first.summary"));
    }

    #[test]
    fn starting_points_are_tried_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        fs::write(b.join("show.summary"), "b").unwrap();
        let media = a.join("ep.mkv");
        fs::write(&media, b"").unwrap();

        let names = vec!["show.summary".to_string()];
        assert_eq!(find_file(&[&media, &b], &names), Some(b.join("show.summary")));
        assert_eq!(find_file(&[&media], &["nothing.here".to_string()]), None);
    }
}
