//! Tagged-region extraction from raw model output.
//!
//! Matching is loose: a region is `<tag>` ... `</tag>` anywhere in the
//! text, tag names are case-insensitive and may carry inner whitespace (`< summary >`).
//! The first region wins. Nested regions of the same name are not supported; the
//! first closing tag ends the match.

use regex::Regex;
use tracing::warn;

use crate::core::config::PipelineConfig;
use crate::core::models::ExtractedFields;
use crate::errors::NotifyError;

/// Extractor for one tag name, with its pattern compiled up front.
#[derive(Debug, Clone)]
pub struct TagExtractor {
    tag: String,
    pattern: Regex,
}

impl TagExtractor {
    /// # Errors
    ///
    /// Returns `ConfigError` if the pattern built from `tag` does not compile.
    pub fn new(tag: &str) -> Result<Self, NotifyError> {
        let name = regex::escape(tag);
        let pattern = Regex::new(&format!(r"(?is)<\s*{name}\s*>(.*?)<\s*/\s*{name}\s*>"))?;
        Ok(Self {
            tag: tag.to_string(),
            pattern,
        })
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Inner text of the first `<tag>…</tag>` region, trimmed. `None` when there is
    /// no complete region; the caller must not substitute the raw text instead.
    #[must_use]
    pub fn extract(&self, raw: &str) -> Option<String> {
        let mut regions = self.pattern.captures_iter(raw);
        let first = regions.next()?;
        let ignored = regions.count();
        if ignored > 0 {
            warn!(
                tag = %self.tag,
                ignored,
                "Response holds more than one <{}> region; keeping the first",
                self.tag
            );
        }
        first.get(1).map(|m| m.as_str().trim().to_string())
    }
}

/// Convenience form of [`TagExtractor::extract`] for a one-off tag name.
#[must_use]
pub fn extract(raw: &str, tag_name: &str) -> Option<String> {
    match TagExtractor::new(tag_name) {
        Ok(extractor) => extractor.extract(raw),
        Err(e) => {
            warn!("Cannot extract <{}>: {}", tag_name, e);
            None
        }
    }
}

/// Pulls the summary and detail fields out of a response.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    summary: TagExtractor,
    detail: TagExtractor,
}

impl FieldExtractor {
    /// # Errors
    ///
    /// Returns `ConfigError` if either configured tag cannot be compiled.
    pub fn new(config: &PipelineConfig) -> Result<Self, NotifyError> {
        Ok(Self {
            summary: TagExtractor::new(&config.summary_tag)?,
            detail: TagExtractor::new(&config.detail_tag)?,
        })
    }

    #[must_use]
    pub fn summary_tag(&self) -> &str {
        self.summary.tag()
    }

    #[must_use]
    pub fn detail_tag(&self) -> &str {
        self.detail.tag()
    }

    #[must_use]
    pub fn extract_fields(&self, raw: &str) -> ExtractedFields {
        ExtractedFields {
            summary: self.summary.extract(raw),
            detail: self.detail.extract(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiline_region_is_trimmed() {
        let raw = "noise\n<thinking>\n- a\n- b\n</thinking>\ntrailer";
        assert_eq!(extract(raw, "thinking").as_deref(), Some("- a\n- b"));
    }

    #[test]
    fn first_region_wins() {
        let raw = "<summary>one</summary> and <summary>two</summary>";
        assert_eq!(extract(raw, "summary").as_deref(), Some("one"));
    }

    #[test]
    fn unclosed_region_is_absent() {
        assert_eq!(extract("<summary>never closed", "summary"), None);
    }

    #[test]
    fn nested_same_name_stops_at_first_close() {
        let raw = "<summary>a<summary>b</summary>c</summary>";
        assert_eq!(extract(raw, "summary").as_deref(), Some("a<summary>b"));
    }

    #[test]
    fn tolerates_whitespace_and_case_in_markers() {
        let raw = "< Summary >ok</ summary >";
        assert_eq!(extract(raw, "summary").as_deref(), Some("ok"));
    }

    #[test]
    fn tag_names_are_not_treated_as_patterns() {
        assert_eq!(extract("<a.b>x</a.b>", "a.b").as_deref(), Some("x"));
        assert_eq!(extract("<acb>x</acb>", "a.b"), None);
    }
}
