use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::Config;
use crate::core::parsing::{CustomParserConfig, EpisodeParser, ParseResult, StrategyKind};
use crate::core::sidecar::{self, season_file_names, show_file_names, SearchRoots, ShowMetadata};
use crate::core::template::{TemplateContext, TemplateFormatter};
use crate::utils::text::normalize_path;
use crate::utils::{Error, ShowmetaResult};

// ================================================================================================
// Report
// ================================================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LibraryReport {
    pub root: PathBuf,
    pub shows: Vec<ShowReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShowReport {
    pub title: String,
    pub path: PathBuf,
    pub summary: Option<String>,
    pub metadata: ShowMetadata,
    pub search_roots: SearchRoots,
    pub seasons: Vec<SeasonReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeasonReport {
    pub number: u32,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub search_roots: SearchRoots,
    pub episodes: Vec<EpisodeReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EpisodeReport {
    pub path: PathBuf,
    /// `None` when no strategy recognised the path.
    pub strategy: Option<StrategyKind>,
    pub show_title: Option<String>,
    pub episode_number: Option<u64>,
    pub episode_index: Option<u64>,
    pub title: String,
    pub summary: Option<String>,
    pub release_date: Option<NaiveDate>,
}

// ================================================================================================
// Scanner
// ================================================================================================

/// Scan every show directory directly under `root`.
pub fn scan_library(root: &Path, config: &Config) -> ShowmetaResult<LibraryReport> {
    let root = normalize_path(root);
    if !root.is_dir() {
        return Err(Error::Other(format!(
            "Library root '{}' is not a directory",
            root.display()
        )));
    }

    let mut show_dirs = fs::read_dir(&root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect::<Vec<_>>();
    show_dirs.sort();
    tracing::info!(target: "showmeta::library", "Scanning {} show directories under '{}'", show_dirs.len(), root.display());

    let mut scanner = LibraryScanner::new(root.clone(), config);
    let shows = show_dirs
        .iter()
        .map(|dir| scanner.scan_show(dir))
        .collect::<Vec<_>>();

    Ok(LibraryReport { root, shows })
}

#[derive(Default)]
struct SeasonAccumulator {
    /// Season number as first captured, zero padding included.
    label: Option<String>,
    title: Option<String>,
    roots: SearchRoots,
    episodes: Vec<EpisodeReport>,
}

struct LibraryScanner<'c> {
    root: PathBuf,
    config: &'c Config,
    parser: EpisodeParser,
    formatter: TemplateFormatter,
    /// Parsers keyed by custom config path; `None` when the file failed to load.
    custom_parsers: HashMap<PathBuf, Option<EpisodeParser>>,
}

impl<'c> LibraryScanner<'c> {
    fn new(root: PathBuf, config: &'c Config) -> Self {
        Self {
            root,
            config,
            parser: EpisodeParser::new(&config.parsing, &config.sidecar),
            formatter: TemplateFormatter::new(&config.library.language),
            custom_parsers: HashMap::new(),
        }
    }

    fn parser_for(&mut self, media_file: &Path) -> &EpisodeParser {
        let Some(path) = CustomParserConfig::discover(
            &self.root,
            media_file,
            &self.config.library.custom_parser_file,
        ) else {
            return &self.parser;
        };
        let base = &self.parser;
        self.custom_parsers
            .entry(path)
            .or_insert_with_key(|path| match CustomParserConfig::load(path) {
                Ok(custom) => Some(base.with_custom(custom)),
                Err(e) => {
                    tracing::warn!(target: "showmeta::library", "{e}; using built-in strategies");
                    None
                }
            })
            .as_ref()
            .unwrap_or(base)
    }

    fn video_files(&self, dir: &Path) -> Vec<PathBuf> {
        let extensions = &self.config.library.video_extensions;
        let mut files = WalkDir::new(dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.extension()
                    .map(|ext| ext.to_string_lossy().to_lowercase())
                    .is_some_and(|ext| extensions.iter().any(|known| known.eq_ignore_ascii_case(&ext)))
            })
            .collect::<Vec<_>>();
        files.sort();
        files
    }

    fn scan_show(&mut self, dir: &Path) -> ShowReport {
        let title = dir
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        tracing::info!(target: "showmeta::library", "Processing show: '{title}'");

        let mut seasons: BTreeMap<u32, SeasonAccumulator> = BTreeMap::new();
        let mut show_roots = SearchRoots::new();

        for file in self.video_files(dir) {
            let parsed = self.parser_for(&file).parse(&file).unwrap_or_else(|e| {
                tracing::warn!(target: "showmeta::library", "Keeping defaults for '{}': {e}", file.display());
                None
            });

            let (season, label, season_title) = match &parsed {
                Some(result) => (
                    season_key(result.season_number.as_deref()),
                    result.season_number.clone(),
                    result.season_title.clone(),
                ),
                None => (1, None, None),
            };
            let episode = self.episode_report(&file, parsed, &title);

            let acc = seasons.entry(season).or_default();
            if acc.label.is_none() {
                acc.label = label;
            }
            if acc.title.is_none() {
                acc.title = season_title;
            }
            acc.roots.add_file(&file);
            acc.episodes.push(episode);
            show_roots.add_file(&file);
        }

        let sidecars = &self.config.sidecar;
        let seasons = seasons
            .into_iter()
            .map(|(number, acc)| {
                tracing::debug!(target: "showmeta::library", "Season {number} search roots: {:?}", acc.roots.dirs());
                let label = acc.label.unwrap_or_else(|| number.to_string());
                let names = season_file_names(&title, &label, &sidecars.summary_extension);
                let summary = acc
                    .roots
                    .find_file(&names)
                    .and_then(|path| sidecar::read_text_lenient(&path));
                SeasonReport {
                    number,
                    title: acc.title,
                    summary,
                    search_roots: acc.roots,
                    episodes: acc.episodes,
                }
            })
            .collect::<Vec<_>>();

        let summary = show_roots
            .find_file(&show_file_names(&title, &sidecars.summary_extension))
            .and_then(|path| sidecar::read_text_lenient(&path));
        let metadata = show_roots
            .find_file(&show_file_names(&title, &sidecars.metadata_extension))
            .and_then(|path| match ShowMetadata::load(&path) {
                Ok(metadata) => Some(metadata),
                Err(e) => {
                    tracing::warn!(target: "showmeta::library", "{e}");
                    None
                }
            })
            .unwrap_or_default();

        tracing::info!(
            target: "showmeta::library",
            "Show '{}' has {} seasons and {} episodes",
            title,
            seasons.len(),
            seasons.iter().map(|s| s.episodes.len()).sum::<usize>()
        );

        ShowReport {
            title,
            path: dir.to_path_buf(),
            summary,
            metadata,
            search_roots: show_roots,
            seasons,
        }
    }

    fn episode_report(&self, file: &Path, parsed: Option<ParseResult>, show_title: &str) -> EpisodeReport {
        let Some(result) = parsed else {
            tracing::debug!(target: "showmeta::library", "No pattern matched '{}': keeping defaults", file.display());
            return EpisodeReport {
                path: file.to_path_buf(),
                strategy: None,
                show_title: None,
                episode_number: None,
                episode_index: None,
                title: file
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().to_string())
                    .unwrap_or_default(),
                summary: None,
                release_date: None,
            };
        };

        let templates = &self.config.templates;
        let ctx = TemplateContext::for_episode(&result, show_title, file);
        let title = self.formatter.format(&templates.episode_title, &ctx);
        let summary = result
            .episode_summary
            .as_ref()
            .map(|_| self.formatter.format(&templates.episode_summary, &ctx));

        EpisodeReport {
            path: file.to_path_buf(),
            strategy: Some(result.strategy),
            show_title: result.show_title,
            episode_number: result.episode_number,
            episode_index: result.episode_index,
            title,
            summary,
            release_date: result.episode_release_date,
        }
    }
}

/// Season grouping key: the parsed number without zero padding, `1` when absent.
fn season_key(season_number: Option<&str>) -> u32 {
    season_number
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(1)
}
