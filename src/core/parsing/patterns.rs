use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use super::types::{PatternFields, RawFields};

// Shared fragments. Separators accept either native path separator.
const SEP: &str = r"[ ]*[-.]?[ ]*";
const TAIL: &str = r"(?P<episodeTitle>[^\\/]*)\.(?P<ext>[^.\\/]+)$";
const YMD: &str = r"(?P<episodeYear>[0-9]{4})[-. ](?P<episodeMonth>[0-9]{2})[-. ](?P<episodeDay>[0-9]{2})";
const MDY: &str = r"(?P<episodeMonth>[0-9]{2})[-. ](?P<episodeDay>[0-9]{2})[-. ](?P<episodeYear>[0-9]{4})";
const MD: &str = r"(?P<episodeMonth>[0-9]{2})[-. ](?P<episodeDay>[0-9]{2})";
const IDX: &str = r"(?:_(?P<episodeIndex>[0-9]+)){0,2}";
const SE: &str = r"[sc](?P<seasonNumber>[0-9]+)e(?P<episodeNumber>[0-9]+)";
const EP: &str = r"(?P<episodeNumber>[0-9]+)";
const SHOW_IN_FILE: &str = r"[\\/](?P<showTitle>[^\\/]+?)";
const SHOW_DIR: &str = r"(?P<showTitle>[^\\/]+)[\\/]";
const SEASON_NUM: &str = r"(?:season|chapter|lesson|s|c)?[ ]*(?P<seasonNumber>[0-9]+)";
const SEASON_DIR: &str =
    r"(?:season|chapter|lesson|s|c)?[ ]*(?P<seasonNumber>[0-9]+)(?:[-. ]+(?P<seasonTitle>[^\\/]+))?";
const YEAR_DIR: &str = r"(?P<seasonNumber>[0-9]{4})(?:[-. ]+(?P<seasonTitle>[^\\/]+))?";
const FILE_TITLE: &str = r"(?P<episodeTitle>[^\\/]+)\.(?P<ext>[^.\\/]+)$";

/// A compiled, case-insensitive path pattern together with the fields it defines.
#[derive(Debug, Clone)]
pub struct PathPattern {
    regex: Regex,
    fields: PatternFields,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        let mut fields = PatternFields::default();
        for name in regex.capture_names().flatten() {
            match name {
                "showTitle" => fields.show_title = true,
                "seasonNumber" => fields.season_number = true,
                "seasonTitle" => fields.season_title = true,
                "episodeNumber" => fields.episode_number = true,
                "episodeYear" => fields.episode_year = true,
                "episodeMonth" => fields.episode_month = true,
                "episodeDay" => fields.episode_day = true,
                "episodeIndex" => fields.episode_index = true,
                "episodeTitle" => fields.episode_title = true,
                "ext" => fields.ext = true,
                _ => {}
            }
        }
        Ok(Self { regex, fields })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn fields(&self) -> PatternFields {
        self.fields
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    pub fn captures<'h>(&self, path: &'h str) -> Option<RawFields<'h>> {
        let caps = self.regex.captures(path)?;
        let f = self.fields;
        let get = |defined: bool, name: &str| -> Option<&'h str> {
            if defined {
                caps.name(name).map(|m| m.as_str())
            } else {
                None
            }
        };
        Some(RawFields {
            show_title: get(f.show_title, "showTitle"),
            season_number: get(f.season_number, "seasonNumber"),
            season_title: get(f.season_title, "seasonTitle"),
            episode_number: get(f.episode_number, "episodeNumber"),
            episode_year: get(f.episode_year, "episodeYear"),
            episode_month: get(f.episode_month, "episodeMonth"),
            episode_day: get(f.episode_day, "episodeDay"),
            episode_index: get(f.episode_index, "episodeIndex"),
            episode_title: get(f.episode_title, "episodeTitle"),
            ext: get(f.ext, "ext"),
        })
    }
}

fn compile(patterns: &[String]) -> Vec<PathPattern> {
    patterns
        .iter()
        .map(|p| PathPattern::new(p).unwrap())
        .collect()
}

/// Season/episode numbers and a date in the same path.
pub static DATED_NUMBERED: Lazy<Vec<PathPattern>> = Lazy::new(|| {
    compile(&[
        // \Show Title - s2012e09 - 2015-12-31 - Episode Title.mp4
        format!("{SHOW_IN_FILE}{SEP}{SE}{SEP}{YMD}{SEP}{TAIL}"),
        // \Show Title - s2012e09 - 12-31-2015 - Episode Title.mp4
        format!("{SHOW_IN_FILE}{SEP}{SE}{SEP}{MDY}{SEP}{TAIL}"),
        // Show Title\s2012e09 - 2015-12-31 - Episode Title.mp4
        format!("{SHOW_DIR}{SE}{SEP}{YMD}{SEP}{TAIL}"),
        // Show Title\s2012e09 - 12-31-2015 - Episode Title.mp4
        format!("{SHOW_DIR}{SE}{SEP}{MDY}{SEP}{TAIL}"),
        // Show Title\s2015\e09 - 2015-12-31 - Episode Title.mp4
        format!(r"{SHOW_DIR}{SEASON_NUM}[\\/]e{EP}{SEP}{YMD}{SEP}{TAIL}"),
        // Show Title\s2015\e09 - 12-31-2015 - Episode Title.mp4
        format!(r"{SHOW_DIR}{SEASON_NUM}[\\/]e{EP}{SEP}{MDY}{SEP}{TAIL}"),
        // Show Title\e09 - 2015-12-31 - Episode Title.mp4
        format!("{SHOW_DIR}e{EP}{SEP}{YMD}{SEP}{TAIL}"),
        // Show Title\e09 - 12-31-2015 - Episode Title.mp4
        format!("{SHOW_DIR}e{EP}{SEP}{MDY}{SEP}{TAIL}"),
    ])
});

/// A date in the path, no explicit episode number.
pub static DATE_BASED: Lazy<Vec<PathPattern>> = Lazy::new(|| {
    compile(&[
        // \Show Title - 2012-09-19_23 - Episode Title.mp4
        // \Show.Title.2012.09.19_23.Episode.Title.mp4
        format!("{SHOW_IN_FILE}{SEP}{YMD}{IDX}{SEP}{TAIL}"),
        // \Show Title - 09-19-2012_23 - Episode Title.mp4
        format!("{SHOW_IN_FILE}{SEP}{MDY}{IDX}{SEP}{TAIL}"),
        // Show Title\2012 - Season Title\[Show Title - ]2012-09-19 - Episode Title.mp4
        format!(r"{SHOW_DIR}{YEAR_DIR}[\\/][^\\/]*?{YMD}{IDX}{SEP}{TAIL}"),
        // 2012 - Season Title\Show Title\[Show Title - ]2012-09-19 - Episode Title.mp4
        format!(r"{YEAR_DIR}[\\/]{SHOW_DIR}[^\\/]*?{YMD}{IDX}{SEP}{TAIL}"),
        // Show Title\2012 - Season Title\[Show Title - ]09-19-2012 - Episode Title.mp4
        format!(r"{SHOW_DIR}{YEAR_DIR}[\\/][^\\/]*?{MDY}{IDX}{SEP}{TAIL}"),
        // 2012 - Season Title\Show Title\[Show Title - ]09-19-2012 - Episode Title.mp4
        format!(r"{YEAR_DIR}[\\/]{SHOW_DIR}[^\\/]*?{MDY}{IDX}{SEP}{TAIL}"),
        // Show Title\2012\[Show Title - ]09-19 - Episode Title.mp4
        format!(r"{SHOW_DIR}{YEAR_DIR}[\\/][^\\/]*?{MD}{IDX}{SEP}{TAIL}"),
        // 2012\Show Title\[Show Title - ]09-19 - Episode Title.mp4
        format!(r"{YEAR_DIR}[\\/]{SHOW_DIR}[^\\/]*?{MD}{IDX}{SEP}{TAIL}"),
        // Show Title\2012-09-19 - Episode Title.mp4
        format!(r"{SHOW_DIR}[^\\/]*?{YMD}{IDX}{SEP}{TAIL}"),
        // Show Title\09-19-2012 - Episode Title.mp4
        format!(r"{SHOW_DIR}[^\\/]*?{MDY}{IDX}{SEP}{TAIL}"),
    ])
});

/// Explicit season and episode numbers, no date.
pub static NUMBERED: Lazy<Vec<PathPattern>> = Lazy::new(|| {
    compile(&[
        // \Show Title - s2012e09 - Episode Title.mp4
        format!("{SHOW_IN_FILE}{SEP}{SE}{SEP}{TAIL}"),
        // Show Title\01 - Season Title\[Show Title - s01]e09 - Episode Title.mp4
        format!(r"{SHOW_DIR}{SEASON_DIR}[\\/][^\\/]*?e{EP}{SEP}{TAIL}"),
        // 01 - Season Title\Show Title\[Show Title - s01]e09 - Episode Title.mp4
        format!(r"{SEASON_DIR}[\\/]{SHOW_DIR}[^\\/]*?e{EP}{SEP}{TAIL}"),
        // Show Title\01 - Season Title\09 - Episode Title.mp4
        format!(r"{SHOW_DIR}{SEASON_DIR}[\\/]{EP}{SEP}{TAIL}"),
        // 01 - Season Title\Show Title\09 - Episode Title.mp4
        format!(r"{SEASON_DIR}[\\/]{SHOW_DIR}{EP}{SEP}{TAIL}"),
        // Show Title\s01e09 - Episode Title.mp4
        format!("{SHOW_DIR}{SE}{SEP}{TAIL}"),
    ])
});

/// Show/season directory nesting only; the file name is the episode title.
pub static SIMPLE: Lazy<Vec<PathPattern>> = Lazy::new(|| {
    compile(&[
        // Show Title\01 - Season Title\Episode Title.mp4
        format!(r"{SHOW_DIR}{SEASON_DIR}[\\/]{FILE_TITLE}"),
        // Show Title\Season Folder\Episode Title.mp4
        format!(r"{SHOW_DIR}(?P<seasonTitle>[^\\/]+)[\\/]{FILE_TITLE}"),
    ])
});

/// The catch-all pattern used behind a custom override.
pub fn generic_fallback() -> PathPattern {
    SIMPLE[SIMPLE.len() - 1].clone()
}
