use std::path::Path;

use chrono::NaiveDate;
use ini::Ini;
use serde::Serialize;
use tracing::warn;

use crate::utils::{Error, ShowmetaResult};

const SECTION: &str = "metadata";

/// Structured show-level fields read from a `key = value` metadata file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShowMetadata {
    pub release: Option<NaiveDate>,
    pub studio: Option<String>,
    pub genres: Vec<String>,
}

impl ShowMetadata {
    pub fn load(path: &Path) -> ShowmetaResult<Self> {
        let text = super::read_text(path)?;
        Self::parse(&text, path)
    }

    pub fn parse(text: &str, source: &Path) -> ShowmetaResult<Self> {
        let ini = Ini::load_from_str_noescape(text).map_err(|e| Error::config_parse(source, e))?;
        let release = lookup(&ini, "release").and_then(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|e| {
                    warn!(target: "showmeta::sidecar", path = %source.display(), release = raw, error = %e, "Ignoring invalid release date");
                })
                .ok()
        });
        let studio = lookup(&ini, "studio").map(str::to_string);
        let genres = lookup(&ini, "genres")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            release,
            studio,
            genres,
        })
    }
}

/// The `[metadata]` value for `key`, falling back to keys outside any section.
fn lookup<'a>(ini: &'a Ini, key: &str) -> Option<&'a str> {
    ini.section(Some(SECTION))
        .and_then(|s| s.get(key))
        .or_else(|| ini.section(None::<String>).and_then(|s| s.get(key)))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_fields() {
        let text = "[metadata]\nrelease = 2015-03-01\nstudio = Home Videos\ngenres = Travel, Family ,, Documentary\n";
        let md = ShowMetadata::parse(text, Path::new("Show.metadata")).unwrap();
        assert_eq!(md.release, NaiveDate::from_ymd_opt(2015, 3, 1));
        assert_eq!(md.studio.as_deref(), Some("Home Videos"));
        assert_eq!(md.genres, vec!["Travel", "Family", "Documentary"]);
    }

    #[test]
    fn keys_without_section_are_accepted() {
        let md = ShowMetadata::parse("studio = Garage\n", Path::new("show.metadata")).unwrap();
        assert_eq!(md.studio.as_deref(), Some("Garage"));
        assert!(md.genres.is_empty());
    }

    #[test]
    fn invalid_release_is_skipped() {
        let text = "[metadata]\nrelease = sometime\nstudio = X\n";
        let md = ShowMetadata::parse(text, Path::new("Show.metadata")).unwrap();
        assert_eq!(md.release, None);
        assert_eq!(md.studio.as_deref(), Some("X"));
    }

    #[test]
    fn malformed_file_is_config_error() {
        let err = ShowMetadata::parse("[metadata\nrelease = 2015-01-01\n", Path::new("bad.metadata")).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }
}
