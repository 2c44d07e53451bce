use std::collections::HashMap;
use std::env;

use chrono_tz::Tz;
use serde::Deserialize;

use crate::core::models::{Category, Destination};
use crate::errors::NotifyError;

/// Tags the summarization prompt wraps its instructions in. Anything inside them
/// must never reach a notification.
pub const DEFAULT_REMOVABLE_TAGS: [&str; 6] = [
    "outputFormat",
    "summaryRule",
    "outputLanguage",
    "instruction",
    "persona",
    "input",
];

pub const DEFAULT_SUMMARY_TAG: &str = "summary";
pub const DEFAULT_DETAIL_TAG: &str = "thinking";
pub const DEFAULT_INDENT_WIDTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizerConfig {
    /// Tags removed together with everything between them.
    pub removable_tags: Vec<String>,
    /// Tags whose stray open/close markers are dropped while their content is kept.
    pub unwrap_tags: Vec<String>,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            removable_tags: DEFAULT_REMOVABLE_TAGS.iter().map(ToString::to_string).collect(),
            unwrap_tags: vec![DEFAULT_SUMMARY_TAG.to_string(), DEFAULT_DETAIL_TAG.to_string()],
        }
    }
}

/// Keyword heuristic mapping bullet wording to a decorative category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub category: Category,
    /// Lowercase substrings; any hit selects the category.
    pub keywords: Vec<String>,
}

impl CategoryRule {
    fn new(category: Category, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletConfig {
    pub markers: Vec<String>,
    /// Columns per indent level; a tab counts as one full level.
    pub indent_width: usize,
    /// Checked in order, first match wins.
    pub categories: Vec<CategoryRule>,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            markers: ["-", "•", "*", "・"].iter().map(ToString::to_string).collect(),
            indent_width: DEFAULT_INDENT_WIDTH,
            categories: vec![
                CategoryRule::new(
                    Category::Availability,
                    &["available", "availability", "good for", "use case", "region", "利用可能", "対象"],
                ),
                CategoryRule::new(
                    Category::NewFeature,
                    &["new feature", "introduc", "launch", "now support", "新機能", "追加"],
                ),
                CategoryRule::new(
                    Category::Change,
                    &["update", "change", "improve", "deprecat", "変更", "更新"],
                ),
            ],
        }
    }
}

/// Decorative strings the renderers insert around model-derived text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub untitled: String,
    pub published: String,
    pub summary: String,
    pub details: String,
    pub read_article: String,
    pub no_summary: String,
    pub continuation: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            untitled: "(untitled)".to_string(),
            published: "Published".to_string(),
            summary: "Summary".to_string(),
            details: "Details".to_string(),
            read_article: "Read article".to_string(),
            no_summary: "No summary available.".to_string(),
            continuation: "… (continued in article)".to_string(),
        }
    }
}

impl Labels {
    #[must_use]
    pub fn japanese() -> Self {
        Self {
            untitled: "(無題)".to_string(),
            published: "公開日時".to_string(),
            summary: "要約".to_string(),
            details: "詳細分析".to_string(),
            read_article: "記事を読む".to_string(),
            no_summary: "要約はありません。".to_string(),
            continuation: "…（続きは記事で）".to_string(),
        }
    }

    /// Pick labels matching the summarizer's output language.
    #[must_use]
    pub fn for_language(language: &str) -> Self {
        let lang = language.trim().to_lowercase();
        if lang.starts_with("ja") || lang == "日本語" {
            Self::japanese()
        } else {
            Self::default()
        }
    }
}

/// Everything the text pipeline needs. Built once per process and shared read-only.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub summary_tag: String,
    pub detail_tag: String,
    pub sanitizer: SanitizerConfig,
    pub bullets: BulletConfig,
    pub labels: Labels,
    pub display_timezone: Tz,
    /// When false every message takes the legacy plain-text path.
    pub structured_layout: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            summary_tag: DEFAULT_SUMMARY_TAG.to_string(),
            detail_tag: DEFAULT_DETAIL_TAG.to_string(),
            sanitizer: SanitizerConfig::default(),
            bullets: BulletConfig::default(),
            labels: Labels::default(),
            display_timezone: Tz::UTC,
            structured_layout: true,
        }
    }
}

impl PipelineConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` for empty or malformed tag names, no bullet markers,
    /// or a zero indent width.
    pub fn validate(&self) -> Result<(), NotifyError> {
        let tags = [&self.summary_tag, &self.detail_tag]
            .into_iter()
            .chain(&self.sanitizer.removable_tags)
            .chain(&self.sanitizer.unwrap_tags);
        for tag in tags {
            validate_tag_name(tag)?;
        }
        if self.summary_tag == self.detail_tag {
            return Err(NotifyError::ConfigError(
                "summary and detail tags must differ".to_string(),
            ));
        }
        if self.bullets.markers.iter().all(|m| m.trim().is_empty()) {
            return Err(NotifyError::ConfigError(
                "at least one bullet marker is required".to_string(),
            ));
        }
        if self.bullets.indent_width == 0 {
            return Err(NotifyError::ConfigError(
                "BULLET_INDENT_WIDTH must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_tag_name(tag: &str) -> Result<(), NotifyError> {
    let ok = !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'));
    if ok {
        Ok(())
    } else {
        Err(NotifyError::ConfigError(format!("invalid tag name: {:?}", tag)))
    }
}

/// Per-notifier routing, mirroring the `NOTIFIERS` table the stack is deployed with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NotifierConfig {
    #[serde(default)]
    pub destination: Destination,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub notifiers: HashMap<String, NotifierConfig>,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` when an environment variable holds an invalid value.
    pub fn from_env() -> Result<Self, NotifyError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Missing keys fall back
    /// to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a present value cannot be parsed or fails validation.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NotifyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut pipeline = PipelineConfig::default();

        if let Some(tag) = lookup("SUMMARY_TAG") {
            pipeline.summary_tag = tag.trim().to_string();
        }
        if let Some(tag) = lookup("DETAIL_TAG") {
            pipeline.detail_tag = tag.trim().to_string();
        }
        if let Some(tags) = lookup("SANITIZER_REMOVABLE_TAGS") {
            pipeline.sanitizer.removable_tags = split_list(&tags);
        }
        if let Some(tags) = lookup("SANITIZER_UNWRAP_TAGS") {
            pipeline.sanitizer.unwrap_tags = split_list(&tags);
        } else {
            // Keep stray field markers out of the output even when the field tags are renamed.
            pipeline.sanitizer.unwrap_tags =
                vec![pipeline.summary_tag.clone(), pipeline.detail_tag.clone()];
        }
        if let Some(markers) = lookup("BULLET_MARKERS") {
            pipeline.bullets.markers = split_list(&markers);
        }
        if let Some(width) = lookup("BULLET_INDENT_WIDTH") {
            pipeline.bullets.indent_width = width
                .trim()
                .parse()
                .map_err(|e| NotifyError::ConfigError(format!("BULLET_INDENT_WIDTH: {}", e)))?;
        }
        if let Some(language) = lookup("OUTPUT_LANGUAGE") {
            pipeline.labels = Labels::for_language(&language);
        }
        if let Some(tz) = lookup("DISPLAY_TIMEZONE") {
            pipeline.display_timezone = tz
                .trim()
                .parse::<Tz>()
                .map_err(|e| NotifyError::ConfigError(format!("DISPLAY_TIMEZONE: {}", e)))?;
        }
        if let Some(flag) = lookup("STRUCTURED_LAYOUT") {
            pipeline.structured_layout = parse_bool(&flag).ok_or_else(|| {
                NotifyError::ConfigError(format!("STRUCTURED_LAYOUT: not a boolean: {}", flag))
            })?;
        }

        let notifiers = match lookup("NOTIFIERS") {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)
                .map_err(|e| NotifyError::ConfigError(format!("NOTIFIERS: {}", e)))?,
            _ => HashMap::new(),
        };

        pipeline.validate()?;

        Ok(Self {
            pipeline,
            notifiers,
        })
    }

    /// Destination for a notifier name; unknown or missing names go to Slack.
    #[must_use]
    pub fn destination_for(&self, notifier: Option<&str>) -> Destination {
        notifier
            .and_then(|name| self.notifiers.get(name))
            .map(|n| n.destination)
            .unwrap_or_default()
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
