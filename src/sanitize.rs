//! Removal of prompt-scaffold markup from model-derived text.
//!
//! The removable tag list must cover every tag the prompt templates emit. Text that
//! reaches a renderer has been through [`Sanitizer::sanitize`] at least once.

use std::ops::Range;

use regex::Regex;

use crate::core::config::SanitizerConfig;
use crate::errors::NotifyError;

#[derive(Debug, Clone)]
pub struct Sanitizer {
    /// Removable tags; a region goes together with its content.
    regions: Vec<RegionPattern>,
    /// Lone open/close markers of removable tags.
    scaffold_markers: Vec<Regex>,
    /// Lone open/close markers of field tags; content stays.
    unwrap_markers: Vec<Regex>,
    blank_runs: Regex,
}

/// Opening and closing markers of one removable tag.
#[derive(Debug, Clone)]
struct RegionPattern {
    open: Regex,
    close: Regex,
}

impl RegionPattern {
    fn new(tag: &str) -> Result<Self, regex::Error> {
        let name = regex::escape(tag);
        Ok(Self {
            open: Regex::new(&format!(r"(?i)<\s*{name}(?:\s[^>]*)?>"))?,
            close: Regex::new(&format!(r"(?i)<\s*/\s*{name}\s*>"))?,
        })
    }

    /// Innermost complete region: the first closing marker that has an opening
    /// marker before it, paired with the nearest such opening marker.
    fn innermost(&self, text: &str) -> Option<Range<usize>> {
        self.close.find_iter(text).find_map(|close| {
            self.open
                .find_iter(&text[..close.start()])
                .last()
                .map(|open| open.start()..close.end())
        })
    }
}

fn marker_pattern(tag: &str) -> Result<Regex, regex::Error> {
    let name = regex::escape(tag);
    Regex::new(&format!(r"(?i)<\s*/?\s*{name}(?:\s[^>]*)?\s*/?\s*>"))
}

impl Sanitizer {
    /// # Errors
    ///
    /// Returns `ConfigError` if a tag pattern cannot be compiled.
    pub fn new(config: &SanitizerConfig) -> Result<Self, NotifyError> {
        let regions = config
            .removable_tags
            .iter()
            .map(|t| RegionPattern::new(t))
            .collect::<Result<Vec<_>, _>>()?;
        let scaffold_markers = config
            .removable_tags
            .iter()
            .map(|t| marker_pattern(t))
            .collect::<Result<Vec<_>, _>>()?;
        let unwrap_markers = config
            .unwrap_tags
            .iter()
            .map(|t| marker_pattern(t))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            regions,
            scaffold_markers,
            unwrap_markers,
            blank_runs: Regex::new(r"\n{3,}")?,
        })
    }

    /// Strip scaffold regions and stray tag markers, then tidy whitespace.
    ///
    /// Total and idempotent: removal repeats until nothing matches, since cutting a
    /// region can splice a new one together (`<a<a>x</a>>y</a>`).
    #[must_use]
    pub fn sanitize(&self, text: &str) -> String {
        let mut current: String = text
            .replace("\r\n", "\n")
            .chars()
            .filter(|&c| !c.is_control() || c == '\n' || c == '\t')
            .collect();

        loop {
            let mut next = self.remove_regions(&current);
            next = Self::remove_all(&self.scaffold_markers, &next);
            next = Self::remove_all(&self.unwrap_markers, &next);
            if next == current {
                break;
            }
            current = next;
        }

        self.blank_runs
            .replace_all(&current, "\n\n")
            .trim()
            .to_string()
    }

    fn remove_all(patterns: &[Regex], text: &str) -> String {
        patterns.iter().fold(text.to_string(), |acc, re| {
            if re.is_match(&acc) {
                re.replace_all(&acc, "").into_owned()
            } else {
                acc
            }
        })
    }

    /// Cut regions innermost first, so a nested region takes its enclosing one
    /// with it on a later pass.
    fn remove_regions(&self, text: &str) -> String {
        let mut out = text.to_string();
        while let Some(range) = self.regions.iter().find_map(|r| r.innermost(&out)) {
            out.replace_range(range, "");
        }
        out
    }

    /// Whether `raw` carries any removable scaffold markup.
    #[must_use]
    pub fn contains_scaffold(&self, raw: &str) -> bool {
        self.scaffold_markers.iter().any(|re| re.is_match(raw))
    }
}
