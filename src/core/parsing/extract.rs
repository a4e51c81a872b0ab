use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::types::{PatternFields, RawFields};
use crate::config::{ParsingConfig, ScrubMode, TimestampFallback};
use crate::utils::{Error, ShowmetaResult};

// Trailing "part2" / "pt2" suffixes, tried in order.
static PART_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)^(?P<episodeTitle>.+)(?:\.[ ]*|-[ ]*)(?:part[0-9]+|pt[0-9]+)").unwrap(),
        Regex::new(r"(?i)^(?P<episodeTitle>.+)[ ]+(?:part[0-9]+|pt[0-9]+)").unwrap(),
    ]
});
static SCRUB_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[._\-]+").unwrap());

/// Season numbers at or above this are read as a year when no explicit year exists.
pub const SEASON_AS_YEAR_THRESHOLD: i32 = 1000;

/// Strip a trailing part marker and everything after the separator preceding it.
pub fn strip_part(title: &str) -> String {
    for re in PART_RES.iter() {
        if let Some(m) = re.captures(title).and_then(|c| c.name("episodeTitle")) {
            debug!(target: "showmeta::parser", title, stripped = m.as_str(), "Stripped part suffix");
            return m.as_str().trim().to_string();
        }
    }
    title.to_string()
}

pub fn scrub_tokens(title: &str) -> String {
    SCRUB_RE.split(title).collect::<Vec<_>>().join(" ").trim().to_string()
}

/// One `FROM=TO` replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

impl Substitution {
    pub fn parse(entry: &str) -> Option<Self> {
        let (from, to) = entry.split_once('=')?;
        if from.is_empty() {
            return None;
        }
        Some(Self {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

pub fn substitute_chars(title: &str, substitutions: &[Substitution]) -> String {
    substitutions
        .iter()
        .fold(title.to_string(), |acc, s| acc.replace(&s.from, &s.to))
}

/// Title cleanup: part stripping first, then the configured scrub mode.
#[derive(Debug, Clone)]
pub struct TitleCleaner {
    mode: ScrubMode,
    substitutions: Vec<Substitution>,
}

impl TitleCleaner {
    pub fn new(mode: ScrubMode, substitutions: Vec<Substitution>) -> Self {
        Self { mode, substitutions }
    }

    pub fn from_config(config: &ParsingConfig) -> Self {
        let substitutions = config
            .substitutions
            .iter()
            .filter_map(|entry| {
                let parsed = Substitution::parse(entry);
                if parsed.is_none() {
                    warn!(target: "showmeta::parser", entry = %entry, "Ignoring malformed substitution (expected FROM=TO)");
                }
                parsed
            })
            .collect();
        Self::new(config.scrub_mode, substitutions)
    }

    pub fn clean(&self, raw: &str) -> String {
        let stripped = strip_part(raw.trim());
        match self.mode {
            ScrubMode::Tokens => scrub_tokens(&stripped),
            ScrubMode::Substitute => substitute_chars(&stripped, &self.substitutions),
            ScrubMode::None => stripped,
        }
    }
}

impl Default for TitleCleaner {
    fn default() -> Self {
        Self::new(ScrubMode::Tokens, Vec::new())
    }
}

/// File-system timestamp source used when a pattern has no date groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
    Modified,
    Created,
}

impl TimestampSource {
    pub fn from_config(fallback: TimestampFallback) -> Option<Self> {
        match fallback {
            TimestampFallback::None => None,
            TimestampFallback::Modified => Some(Self::Modified),
            TimestampFallback::Created => Some(Self::Created),
        }
    }

    pub fn read(&self, media_file: &Path) -> Option<NaiveDate> {
        let meta = fs::metadata(media_file).ok()?;
        let time = match self {
            Self::Modified => meta.modified(),
            Self::Created => meta.created(),
        };
        match time {
            Ok(t) => Some(DateTime::<Local>::from(t).date_naive()),
            Err(e) => {
                debug!(target: "showmeta::parser", path = %media_file.display(), source = ?self, error = %e, "Timestamp unavailable");
                None
            }
        }
    }
}

/// Release date resolution: path fields first, then an optional timestamp source.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateResolver {
    fallback: Option<TimestampSource>,
}

impl DateResolver {
    pub fn new(fallback: Option<TimestampSource>) -> Self {
        Self { fallback }
    }

    pub fn resolve(
        &self,
        path: &str,
        pattern: PatternFields,
        fields: &RawFields<'_>,
        media_file: &Path,
    ) -> ShowmetaResult<Option<NaiveDate>> {
        if let Some(date) = date_from_fields(path, fields)? {
            return Ok(Some(date));
        }
        if pattern.has_date() {
            return Ok(None);
        }
        Ok(self.fallback.and_then(|source| source.read(media_file)))
    }
}

fn parse_field<T: std::str::FromStr>(path: &str, field: &'static str, raw: &str) -> ShowmetaResult<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| Error::extraction(path, field, format!("'{raw}': {e}")))
}

pub(crate) fn parse_number(path: &str, field: &'static str, raw: Option<&str>) -> ShowmetaResult<Option<u64>> {
    raw.map(|r| parse_field::<u64>(path, field, r)).transpose()
}

fn date_from_fields(path: &str, fields: &RawFields<'_>) -> ShowmetaResult<Option<NaiveDate>> {
    let year = match fields.episode_year {
        Some(raw) => Some(parse_field::<i32>(path, "episodeYear", raw)?),
        None => fields
            .season_number
            .and_then(|s| s.trim().parse::<i32>().ok())
            .filter(|y| *y >= SEASON_AS_YEAR_THRESHOLD),
    };
    let (Some(year), Some(month), Some(day)) = (year, fields.episode_month, fields.episode_day) else {
        return Ok(None);
    };
    let month = parse_field::<u32>(path, "episodeMonth", month)?;
    let day = parse_field::<u32>(path, "episodeDay", day)?;
    NaiveDate::from_ymd_opt(year, month, day)
        .map(Some)
        .ok_or_else(|| Error::extraction(path, "episodeDate", format!("{year}-{month:02}-{day:02} is not a calendar date")))
}
