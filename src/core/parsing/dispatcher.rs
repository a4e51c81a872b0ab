use std::path::Path;

use tracing::debug;

use super::custom::CustomParserConfig;
use super::extract::{DateResolver, TimestampSource, TitleCleaner};
use super::strategy::ParserStrategy;
use super::types::ParseResult;
use crate::config::{ParsingConfig, SidecarConfig};
use crate::core::sidecar;
use crate::utils::text::{normalize_path, path_text};
use crate::utils::ShowmetaResult;

/// Built-in strategies, highest priority first.
const BUILTIN_ORDER: [ParserStrategy; 4] = [
    ParserStrategy::DatedNumbered,
    ParserStrategy::DateBased,
    ParserStrategy::Numbered,
    ParserStrategy::Simple,
];

/// Runs strategies in priority order; the first one whose rule set matches a
/// path is used exclusively for that path.
#[derive(Debug, Clone)]
pub struct EpisodeParser {
    strategies: Vec<ParserStrategy>,
    cleaner: TitleCleaner,
    dates: DateResolver,
    summary_extension: String,
}

impl EpisodeParser {
    pub fn new(parsing: &ParsingConfig, sidecar: &SidecarConfig) -> Self {
        Self {
            strategies: BUILTIN_ORDER.to_vec(),
            cleaner: TitleCleaner::from_config(parsing),
            dates: DateResolver::new(TimestampSource::from_config(parsing.timestamp_fallback)),
            summary_extension: sidecar.summary_extension.clone(),
        }
    }

    /// A copy of this parser with a custom override ahead of every built-in strategy.
    pub fn with_custom(&self, custom: CustomParserConfig) -> Self {
        debug!(target: "showmeta::parser", source = %custom.source.display(), "Custom parser override enabled");
        let mut strategies = Vec::with_capacity(self.strategies.len() + 1);
        strategies.push(custom.into_strategy());
        strategies.extend(
            self.strategies
                .iter()
                .filter(|s| !matches!(s, ParserStrategy::Custom(_)))
                .cloned(),
        );
        Self {
            strategies,
            ..self.clone()
        }
    }

    pub fn strategy_for(&self, path: &str) -> Option<&ParserStrategy> {
        self.strategies.iter().find(|s| s.contains_match(path))
    }

    /// Parse one media file. `Ok(None)` means no strategy recognised the path.
    pub fn parse(&self, media_file: &Path) -> ShowmetaResult<Option<ParseResult>> {
        let media_file = normalize_path(media_file);
        let path = path_text(&media_file);

        let Some(strategy) = self.strategy_for(&path) else {
            debug!(target: "showmeta::parser", path = %path, "No strategy matched");
            return Ok(None);
        };
        let Some(mut result) = strategy.parse(&path, &media_file, &self.cleaner, &self.dates)? else {
            return Ok(None);
        };
        result.episode_summary = sidecar::episode_summary(&media_file, &self.summary_extension);
        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::NaiveDate;

    use super::*;
    use crate::config::TimestampFallback;
    use crate::core::parsing::StrategyKind;

    fn parser() -> EpisodeParser {
        EpisodeParser::new(&ParsingConfig::default(), &SidecarConfig::default())
    }

    #[test]
    fn first_matching_strategy_wins() {
        let p = parser();
        // also matched by Numbered and Simple, but the dated family is tried first
        let path = "/tv/Show/Show - s01e02 - 2015-12-31 - Title.mp4";
        assert_eq!(p.strategy_for(path).map(|s| s.kind()), Some(StrategyKind::DatedNumbered));
        assert!(ParserStrategy::Numbered.contains_match(path));

        let path = "/tv/Show/Season 1/Show - s01e02 - Title.mp4";
        assert_eq!(p.strategy_for(path).map(|s| s.kind()), Some(StrategyKind::Numbered));

        let path = "/tv/Show/Extras/Making of.mp4";
        assert_eq!(p.strategy_for(path).map(|s| s.kind()), Some(StrategyKind::Simple));

        assert!(p.strategy_for("/loose.mp4").is_none());
    }

    #[test]
    fn end_to_end_with_episode_summary() {
        let tmp = tempfile::tempdir().unwrap();
        let show = tmp.path().join("lib").join("MyShow");
        fs::create_dir_all(&show).unwrap();
        let media = show.join("s01e02 - Arrival.mp4");
        fs::write(&media, b"").unwrap();
        fs::write(show.join("s01e02 - Arrival.summary"), "First contact.").unwrap();

        let r = parser().parse(&media).unwrap().unwrap();
        assert_eq!(r.episode_title, "Arrival");
        assert_eq!(r.episode_summary.as_deref(), Some("First contact."));
        assert_eq!(r.episode_release_date, None);
    }

    #[test]
    fn path_date_beats_file_timestamp() {
        let tmp = tempfile::tempdir().unwrap();
        let show = tmp.path().join("Show");
        fs::create_dir_all(&show).unwrap();
        let media = show.join("2015-12-31 - Title.mp4");
        fs::write(&media, b"").unwrap();

        let parsing = ParsingConfig {
            timestamp_fallback: TimestampFallback::Modified,
            ..Default::default()
        };
        let p = EpisodeParser::new(&parsing, &SidecarConfig::default());
        let r = p.parse(&media).unwrap().unwrap();
        assert_eq!(r.strategy, StrategyKind::DateBased);
        assert_eq!(r.episode_release_date, NaiveDate::from_ymd_opt(2015, 12, 31));
        assert_eq!(r.episode_title, "Title");
    }

    #[test]
    fn custom_override_takes_priority() {
        let custom = CustomParserConfig::parse(
            "[parser]\nregex = (?P<showTitle>[^\\\\/]+)[\\\\/](?P<episodeTitle>[^\\\\/]+) - s(?P<seasonNumber>[0-9]+)e(?P<episodeNumber>[0-9]+)\\.(?P<ext>[^.]+)$\n",
            Path::new("showmeta.ini"),
        )
        .unwrap();
        let p = parser().with_custom(custom);
        assert_eq!(p.strategies.len(), 5);

        let r = p.parse(Path::new("/tv/Show/Title First - s01e04.mkv")).unwrap().unwrap();
        assert_eq!(r.strategy, StrategyKind::Custom);
        assert_eq!(r.episode_title, "Title First");
        assert_eq!(r.episode_number, Some(4));
    }
}
