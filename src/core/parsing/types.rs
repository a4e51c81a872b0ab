use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// Which fields a compiled pattern is able to populate, resolved once at load time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternFields {
    pub show_title: bool,
    pub season_number: bool,
    pub season_title: bool,
    pub episode_number: bool,
    pub episode_year: bool,
    pub episode_month: bool,
    pub episode_day: bool,
    pub episode_index: bool,
    pub episode_title: bool,
    pub ext: bool,
}

impl PatternFields {
    pub fn has_date(&self) -> bool {
        self.episode_year || self.episode_month || self.episode_day
    }
}

/// Raw substrings captured by one pattern; a field is `None` when the pattern
/// does not define it or the optional group did not participate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawFields<'h> {
    pub show_title: Option<&'h str>,
    pub season_number: Option<&'h str>,
    pub season_title: Option<&'h str>,
    pub episode_number: Option<&'h str>,
    pub episode_year: Option<&'h str>,
    pub episode_month: Option<&'h str>,
    pub episode_day: Option<&'h str>,
    pub episode_index: Option<&'h str>,
    pub episode_title: Option<&'h str>,
    pub ext: Option<&'h str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Custom,
    DatedNumbered,
    DateBased,
    Numbered,
    Simple,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Custom => "custom",
            Self::DatedNumbered => "dated_numbered",
            Self::DateBased => "date_based",
            Self::Numbered => "numbered",
            Self::Simple => "simple",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub strategy: StrategyKind,
    /// Index of the winning pattern inside the strategy's rule set.
    pub pattern_index: usize,
    pub show_title: Option<String>,
    pub season_number: Option<String>,
    pub season_title: Option<String>,
    pub episode_number: Option<u64>,
    pub episode_index: Option<u64>,
    pub episode_title: String,
    pub episode_summary: Option<String>,
    pub episode_release_date: Option<NaiveDate>,
    pub ext: Option<String>,
}
