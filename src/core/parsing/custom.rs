use std::path::{Path, PathBuf};

use ini::Ini;
use tracing::{debug, info};

use super::patterns::{generic_fallback, PathPattern};
use super::strategy::ParserStrategy;
use crate::utils::{Error, ShowmetaResult};

const SECTION: &str = "parser";
const REGEX_KEY: &str = "regex";

/// A user-supplied override pattern found in a directory's parser config file.
#[derive(Debug, Clone)]
pub struct CustomParserConfig {
    pub source: PathBuf,
    pub pattern: PathPattern,
}

impl CustomParserConfig {
    /// Search upward from the media file's directory for `file_name`, never above `root`.
    pub fn discover(root: &Path, media_file: &Path, file_name: &str) -> Option<PathBuf> {
        let mut dir = if media_file.is_dir() {
            media_file
        } else {
            media_file.parent()?
        };
        if !dir.starts_with(root) {
            return None;
        }
        loop {
            let candidate = dir.join(file_name);
            if candidate.is_file() {
                debug!(target: "showmeta::parser", path = %candidate.display(), "Found custom parser config");
                return Some(candidate);
            }
            if dir == root {
                return None;
            }
            dir = dir.parent()?;
        }
    }

    pub fn load(path: &Path) -> ShowmetaResult<Self> {
        let text = std::fs::read(path).map_err(|e| Error::config_parse(path, e))?;
        Self::parse(&crate::utils::text::decode_text(&text), path)
    }

    pub fn parse(text: &str, source: &Path) -> ShowmetaResult<Self> {
        let ini = Ini::load_from_str_noescape(text).map_err(|e| Error::config_parse(source, e))?;
        let regex = ini
            .section(Some(SECTION))
            .and_then(|s| s.get(REGEX_KEY))
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| Error::config_parse(source, format!("missing [{SECTION}] {REGEX_KEY}")))?;
        let pattern = PathPattern::new(regex).map_err(|e| Error::config_parse(source, e))?;
        info!(target: "showmeta::parser", path = %source.display(), regex, "Loaded custom parser override");
        Ok(Self {
            source: source.to_path_buf(),
            pattern,
        })
    }

    /// Override pattern first, then the generic show/season/episode fallback.
    pub fn into_strategy(self) -> ParserStrategy {
        ParserStrategy::Custom(vec![self.pattern, generic_fallback()])
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const CONFIG: &str = r"[parser]
regex = [\\/](?P<showTitle>[^\\/]+)[\\/]Ep(?P<episodeNumber>[0-9]+)_(?P<episodeTitle>.*)\.(?P<ext>[^.]+)$
";

    #[test]
    fn parses_regex_without_unescaping() {
        let cfg = CustomParserConfig::parse(CONFIG, Path::new("showmeta.ini")).unwrap();
        assert!(cfg.pattern.as_str().starts_with(r"[\\/]"));
        assert!(cfg.pattern.is_match("/tv/Show/Ep04_Title.mkv"));
    }

    #[test]
    fn missing_or_invalid_regex_is_config_error() {
        let err = CustomParserConfig::parse("[parser]\nother = 1\n", Path::new("x.ini")).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));

        let err = CustomParserConfig::parse("[parser]\nregex = (unclosed\n", Path::new("x.ini")).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn strategy_puts_override_before_fallback() {
        let cfg = CustomParserConfig::parse(CONFIG, Path::new("showmeta.ini")).unwrap();
        let strategy = cfg.into_strategy();
        assert_eq!(strategy.patterns().len(), 2);
        let (idx, _, fields) = strategy.first_match("/tv/Show/Ep04_Title.mkv").unwrap();
        assert_eq!(idx, 0);
        assert_eq!(fields.episode_number, Some("04"));

        let (idx, _, _) = strategy.first_match("/tv/Show/Extras/Other.mkv").unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn discovery_is_bounded_by_root() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("library");
        let season = root.join("Show").join("Season 1");
        fs::create_dir_all(&season).unwrap();
        let media = season.join("Ep01_Pilot.mkv");
        fs::write(&media, b"").unwrap();

        assert_eq!(CustomParserConfig::discover(&root, &media, "showmeta.ini"), None);

        // above the root: ignored
        fs::write(tmp.path().join("showmeta.ini"), CONFIG).unwrap();
        assert_eq!(CustomParserConfig::discover(&root, &media, "showmeta.ini"), None);

        let show_cfg = root.join("Show").join("showmeta.ini");
        fs::write(&show_cfg, CONFIG).unwrap();
        assert_eq!(
            CustomParserConfig::discover(&root, &media, "showmeta.ini"),
            Some(show_cfg)
        );
    }
}
