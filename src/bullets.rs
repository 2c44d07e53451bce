//! Turns a free-text detail block into ordered bullet items.

use tracing::debug;

use crate::core::config::{BulletConfig, CategoryRule};
use crate::core::models::{BulletItem, Category};

#[derive(Debug, Clone)]
pub struct BulletStructurer {
    /// Longest first so `--` style markers win over `-`.
    markers: Vec<String>,
    indent_width: usize,
    categories: Vec<CategoryRule>,
}

impl BulletStructurer {
    #[must_use]
    pub fn new(config: &BulletConfig) -> Self {
        let mut markers: Vec<String> = config
            .markers
            .iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        markers.sort_by_key(|m| std::cmp::Reverse(m.chars().count()));

        let categories = config
            .categories
            .iter()
            .map(|rule| CategoryRule {
                category: rule.category,
                keywords: rule.keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();

        Self {
            markers,
            indent_width: config.indent_width.max(1),
            categories,
        }
    }

    /// Split `detail` into bullet items in source order.
    ///
    /// Lines that are not bullets extend the previous bullet until a blank line
    /// ends the run. No bullets at all yields an empty vector.
    #[must_use]
    pub fn structure(&self, detail: &str) -> Vec<BulletItem> {
        let mut items: Vec<BulletItem> = Vec::new();
        let mut continuing = false;

        for line in detail.lines() {
            if line.trim().is_empty() {
                continuing = false;
                continue;
            }

            match self.parse_bullet(line) {
                Some((_, "")) => continuing = false,
                Some((level, text)) => {
                    items.push(BulletItem {
                        level,
                        marker: None,
                        text: text.to_string(),
                    });
                    continuing = true;
                }
                None if continuing => {
                    if let Some(last) = items.last_mut() {
                        last.text.push(' ');
                        last.text.push_str(line.trim());
                    }
                }
                None => debug!("Skipping non-bullet line outside a bullet run"),
            }
        }

        for item in &mut items {
            item.marker = self.categorize(&item.text);
        }
        items
    }

    /// Indent level and trimmed text when `line` starts with a bullet marker.
    fn parse_bullet<'a>(&self, line: &'a str) -> Option<(usize, &'a str)> {
        let body_start = line
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(line.len());
        let (indent, rest) = line.split_at(body_start);

        let marker = self.markers.iter().find(|m| {
            rest.strip_prefix(m.as_str()).is_some_and(|after| {
                // ASCII markers need a following space so "-5%" or "*bold*" stay text.
                after.is_empty() || after.starts_with(char::is_whitespace) || !m.is_ascii()
            })
        })?;

        let columns: usize = indent
            .chars()
            .map(|c| if c == '\t' { self.indent_width } else { 1 })
            .sum();
        Some((columns / self.indent_width, rest[marker.len()..].trim()))
    }

    /// First configured category whose keywords appear in `text`.
    #[must_use]
    pub fn categorize(&self, text: &str) -> Option<Category> {
        let lower = text.to_lowercase();
        self.categories
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| lower.contains(k.as_str())))
            .map(|rule| rule.category)
    }
}
