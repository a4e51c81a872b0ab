//! Rendering of user templates for episode titles and summaries.
//!
//! Two passes run over a template:
//! - date tokens `${name|format}` are rendered with strftime-style specs in the
//!   configured locale;
//! - plain placeholders `$name` / `${name}` are then substituted, `$$` renders a
//!   literal `$`, and unknown placeholders are left as written.

use std::collections::HashMap;
use std::fmt::Write;
use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use chrono::{Locale, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::core::parsing::ParseResult;

static DATE_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\$\{(?P<name>[_a-z][_a-z0-9]*)\|(?P<spec>[^}]*)\}").unwrap());
static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\$(?:(?P<escaped>\$)|(?P<named>[_a-z][_a-z0-9]*)|\{(?P<braced>[_a-z][_a-z0-9]*)\})").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValue {
    Text(String),
    Date(NaiveDate),
}

impl TemplateValue {
    fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Variables available to a template, built fresh for each file.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    vars: HashMap<String, TemplateValue>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for one parsed episode.
    ///
    /// Adds `show_title`, `episode_title`, `file_name` and `ext` always, and
    /// `season_number`, `season_title`, `episode_number`, `episode_index`,
    /// `episode_summary`, `episode_date` when known.
    pub fn for_episode(result: &ParseResult, show_title: &str, media_file: &Path) -> Self {
        let mut ctx = Self::new()
            .with_var("show_title", show_title)
            .with_var("episode_title", &result.episode_title);
        if let Some(name) = media_file.file_stem() {
            ctx.set("file_name", &name.to_string_lossy());
        }
        let ext = result
            .ext
            .clone()
            .or_else(|| media_file.extension().map(|e| e.to_string_lossy().to_string()));
        if let Some(ext) = ext {
            ctx.set("ext", &ext);
        }
        if let Some(s) = &result.season_number {
            ctx.set("season_number", s);
        }
        if let Some(s) = &result.season_title {
            ctx.set("season_title", s);
        }
        if let Some(n) = result.episode_number {
            ctx.set("episode_number", &n.to_string());
        }
        if let Some(n) = result.episode_index {
            ctx.set("episode_index", &n.to_string());
        }
        if let Some(s) = &result.episode_summary {
            ctx.set("episode_summary", s);
        }
        if let Some(d) = result.episode_release_date {
            ctx.set_date("episode_date", d);
        }
        ctx
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn with_date(mut self, key: &str, value: NaiveDate) -> Self {
        self.set_date(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.vars
            .insert(key.to_string(), TemplateValue::Text(value.to_string()));
    }

    pub fn set_date(&mut self, key: &str, value: NaiveDate) {
        self.vars.insert(key.to_string(), TemplateValue::Date(value));
    }

    pub fn get(&self, key: &str) -> Option<&TemplateValue> {
        self.vars.get(key)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TemplateFormatter {
    locale: Locale,
}

impl TemplateFormatter {
    pub fn new(language: &str) -> Self {
        Self {
            locale: locale_for(language),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn format(&self, template: &str, ctx: &TemplateContext) -> String {
        let dated = DATE_TOKEN_RE.replace_all(template, |caps: &Captures| {
            let token = &caps[0];
            let rendered = match ctx.get(&caps["name"]) {
                Some(TemplateValue::Date(date)) => self.render_date(*date, &caps["spec"]),
                _ => None,
            };
            match rendered {
                // a `$` produced by the date format stays literal through the second pass
                Some(text) => text.replace('$', "$$"),
                None => {
                    debug!(target: "showmeta::template", token, "Leaving date token unexpanded");
                    token.to_string()
                }
            }
        });

        PLACEHOLDER_RE
            .replace_all(&dated, |caps: &Captures| {
                if caps.name("escaped").is_some() {
                    return "$".to_string();
                }
                let name = caps
                    .name("named")
                    .or_else(|| caps.name("braced"))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                match ctx.get(name) {
                    Some(value) => value.as_text(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    fn render_date(&self, date: NaiveDate, spec: &str) -> Option<String> {
        if StrftimeItems::new_with_locale(spec, self.locale).any(|item| matches!(item, Item::Error)) {
            return None;
        }
        let at_midnight = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?);
        let mut out = String::new();
        write!(out, "{}", at_midnight.format_localized(spec, self.locale)).ok()?;
        Some(out)
    }
}

impl Default for TemplateFormatter {
    fn default() -> Self {
        Self {
            locale: Locale::POSIX,
        }
    }
}

/// Map a language identifier such as `fr`, `fr-CA` or `pt_BR` to a date locale.
pub fn locale_for(language: &str) -> Locale {
    let normalized = language.trim().to_ascii_lowercase().replace('-', "_");
    let (lang, region) = match normalized.split_once('_') {
        Some((l, r)) => (l.to_string(), Some(r.to_string())),
        None => (normalized.clone(), None),
    };
    match (lang.as_str(), region.as_deref()) {
        ("en", Some("gb")) => Locale::en_GB,
        ("en", Some("ca")) => Locale::en_CA,
        ("en", Some("au")) => Locale::en_AU,
        ("en", _) => Locale::en_US,
        ("fr", Some("ca")) => Locale::fr_CA,
        ("fr", Some("be")) => Locale::fr_BE,
        ("fr", _) => Locale::fr_FR,
        ("de", Some("at")) => Locale::de_AT,
        ("de", Some("ch")) => Locale::de_CH,
        ("de", _) => Locale::de_DE,
        ("es", Some("mx")) => Locale::es_MX,
        ("es", _) => Locale::es_ES,
        ("pt", Some("br")) => Locale::pt_BR,
        ("pt", _) => Locale::pt_PT,
        ("it", _) => Locale::it_IT,
        ("nl", _) => Locale::nl_NL,
        ("sv", _) => Locale::sv_SE,
        ("da", _) => Locale::da_DK,
        ("nb", _) | ("no", _) => Locale::nb_NO,
        ("fi", _) => Locale::fi_FI,
        ("pl", _) => Locale::pl_PL,
        ("cs", _) => Locale::cs_CZ,
        ("ru", _) => Locale::ru_RU,
        ("ja", _) => Locale::ja_JP,
        ("ko", _) => Locale::ko_KR,
        ("zh", _) => Locale::zh_CN,
        _ => Locale::POSIX,
    }
}
