use serde::Deserialize;

impl Config {
    pub fn init() -> Result<Self, config::ConfigError> {
        // get config toml dir from env, with default
        let config_path =
            std::env::var("SHOWMETA_CONFIG_PATH").unwrap_or_else(|_| String::from("./config.toml"));

        let config = config::Config::builder()
            // Add in config toml, if any
            .add_source(config::File::with_name(&config_path).required(false))
            // Add in settings from the environment (with a prefix of SHOWMETA)
            .add_source(environment())
            .build()?;

        config.try_deserialize()
    }
}

/// `SHOWMETA__SECTION__KEY` variables; `SHOWMETA__PARSING__SUBSTITUTIONS` takes `;`-separated pairs.
fn environment() -> config::Environment {
    config::Environment::with_prefix("SHOWMETA")
        .separator("__")
        .list_separator(";")
        .with_list_parse_key("parsing.substitutions")
        .try_parsing(true)
}

// ================================================================================================
// Models
// ================================================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[allow(unused)]
pub struct Config {
    #[serde(default)]
    pub logs: LogsConfig,
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub parsing: ParsingConfig,
    #[serde(default)]
    pub sidecar: SidecarConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
}

// ===============================================================================
// Logs
// ===============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

// ===============================================================================
// Library
// ===============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryConfig {
    /// Root directory holding one sub-directory per show.
    #[serde(default)]
    pub root: Option<String>,
    /// Language identifier used for date rendering (e.g. "en", "fr-CA").
    #[serde(default = "default_language")]
    pub language: String,
    /// Name of the per-directory custom parser file.
    #[serde(default = "default_custom_parser_file")]
    pub custom_parser_file: String,
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: None,
            language: default_language(),
            custom_parser_file: default_custom_parser_file(),
            video_extensions: default_video_extensions(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_custom_parser_file() -> String {
    "showmeta.ini".to_string()
}

fn default_video_extensions() -> Vec<String> {
    [
        "mkv", "mp4", "avi", "mov", "wmv", "m4v", "mpg", "mpeg", "ts", "m2ts", "webm",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

// ===============================================================================
// Parsing
// ===============================================================================

/// How raw episode titles are scrubbed after part-suffix stripping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrubMode {
    /// Split on `.`, `-`, `_` runs and rejoin with single spaces.
    #[default]
    Tokens,
    /// Apply the configured `FROM=TO` substitutions in order.
    Substitute,
    None,
}

/// File-system timestamp used when a pattern carries no date fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFallback {
    #[default]
    None,
    Modified,
    Created,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParsingConfig {
    #[serde(default)]
    pub scrub_mode: ScrubMode,
    /// Ordered `FROM=TO` pairs, used when `scrub_mode = "substitute"`.
    #[serde(default)]
    pub substitutions: Vec<String>,
    #[serde(default)]
    pub timestamp_fallback: TimestampFallback,
}

// ===============================================================================
// Sidecar files
// ===============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SidecarConfig {
    #[serde(default = "default_summary_extension")]
    pub summary_extension: String,
    #[serde(default = "default_metadata_extension")]
    pub metadata_extension: String,
}

impl Default for SidecarConfig {
    fn default() -> Self {
        Self {
            summary_extension: default_summary_extension(),
            metadata_extension: default_metadata_extension(),
        }
    }
}

fn default_summary_extension() -> String {
    ".summary".to_string()
}

fn default_metadata_extension() -> String {
    ".metadata".to_string()
}

// ===============================================================================
// Templates
// ===============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesConfig {
    #[serde(default = "default_title_template")]
    pub episode_title: String,
    #[serde(default = "default_summary_template")]
    pub episode_summary: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            episode_title: default_title_template(),
            episode_summary: default_summary_template(),
        }
    }
}

fn default_title_template() -> String {
    "$episode_title".to_string()
}

fn default_summary_template() -> String {
    "$episode_summary".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_env(vars: &[(&str, &str)]) -> Config {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<config::Map<String, String>>();
        config::Config::builder()
            .add_source(environment().source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn environment_overrides_sections() {
        let config = from_env(&[
            ("SHOWMETA__PARSING__SCRUB_MODE", "substitute"),
            ("SHOWMETA__PARSING__SUBSTITUTIONS", "_=-;x=y"),
            ("SHOWMETA__SIDECAR__SUMMARY_EXTENSION", ".txt"),
        ]);
        assert_eq!(config.parsing.scrub_mode, ScrubMode::Substitute);
        assert_eq!(config.parsing.substitutions, vec!["_=-", "x=y"]);
        assert_eq!(config.sidecar.summary_extension, ".txt");
        assert_eq!(config.logs.level, "info");
    }

    #[test]
    fn single_underscore_after_prefix_is_ignored() {
        let config = from_env(&[("SHOWMETA_PARSING__SCRUB_MODE", "none")]);
        assert_eq!(config.parsing.scrub_mode, ScrubMode::Tokens);
    }
}
