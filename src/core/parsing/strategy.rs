use std::path::Path;

use tracing::debug;

use super::extract::{parse_number, DateResolver, TitleCleaner};
use super::patterns::{PathPattern, DATED_NUMBERED, DATE_BASED, NUMBERED, SIMPLE};
use super::types::{ParseResult, RawFields, StrategyKind};
use crate::utils::{Error, ShowmetaResult};

/// A family of path patterns. Order inside a family is significant: the first
/// matching pattern is the one extracted from.
#[derive(Debug, Clone)]
pub enum ParserStrategy {
    Custom(Vec<PathPattern>),
    DatedNumbered,
    DateBased,
    Numbered,
    Simple,
}

impl ParserStrategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::Custom(_) => StrategyKind::Custom,
            Self::DatedNumbered => StrategyKind::DatedNumbered,
            Self::DateBased => StrategyKind::DateBased,
            Self::Numbered => StrategyKind::Numbered,
            Self::Simple => StrategyKind::Simple,
        }
    }

    pub fn patterns(&self) -> &[PathPattern] {
        match self {
            Self::Custom(patterns) => patterns,
            Self::DatedNumbered => &DATED_NUMBERED,
            Self::DateBased => &DATE_BASED,
            Self::Numbered => &NUMBERED,
            Self::Simple => &SIMPLE,
        }
    }

    pub fn contains_match(&self, path: &str) -> bool {
        self.patterns().iter().any(|p| p.is_match(path))
    }

    /// The first pattern, in declared order, that matches `path`.
    pub fn first_match<'h>(&self, path: &'h str) -> Option<(usize, &PathPattern, RawFields<'h>)> {
        self.patterns()
            .iter()
            .enumerate()
            .find_map(|(idx, p)| p.captures(path).map(|fields| (idx, p, fields)))
    }

    pub fn parse(
        &self,
        path: &str,
        media_file: &Path,
        cleaner: &TitleCleaner,
        dates: &DateResolver,
    ) -> ShowmetaResult<Option<ParseResult>> {
        let Some((pattern_index, pattern, fields)) = self.first_match(path) else {
            return Ok(None);
        };
        debug!(target: "showmeta::parser", strategy = %self.kind(), pattern_index, regex = pattern.as_str(), "Pattern matched");

        if let Some(season) = fields.season_number {
            season
                .trim()
                .parse::<u32>()
                .map_err(|e| Error::extraction(path, "seasonNumber", format!("'{season}': {e}")))?;
        }
        let episode_number = parse_number(path, "episodeNumber", fields.episode_number)?;
        let episode_index = parse_number(path, "episodeIndex", fields.episode_index)?;
        let release_date = dates.resolve(path, pattern.fields(), &fields, media_file)?;

        let mut episode_title = fields
            .episode_title
            .map(|t| cleaner.clean(t))
            .unwrap_or_default();
        if episode_title.is_empty() {
            episode_title = match release_date {
                Some(d) => d.format("%Y-%m-%d").to_string(),
                None => media_file
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default(),
            };
        }

        let season_title = fields
            .season_title
            .map(|t| cleaner.clean(t))
            .filter(|t| !t.is_empty());

        Ok(Some(ParseResult {
            strategy: self.kind(),
            pattern_index,
            show_title: fields.show_title.map(|t| t.trim().to_string()),
            season_number: fields.season_number.map(|s| s.trim().to_string()),
            season_title,
            episode_number,
            episode_index,
            episode_title,
            episode_summary: None,
            episode_release_date: release_date,
            ext: fields.ext.map(|e| e.to_string()),
        }))
    }
}
