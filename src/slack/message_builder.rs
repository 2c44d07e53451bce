//! Rich Block Kit rendering of a structured summary.
//!
//! Layout, top to bottom: header, publish time, summary section, divider, detail
//! sections, divider, "read article" button. Every string that came from the model
//! or the feed is escaped; the renderer's own decoration is not.

use chrono_tz::Tz;
use tracing::{info, warn};

use crate::core::config::{Labels, PipelineConfig};
use crate::core::models::{BulletItem, ExtractedFields, NotificationInput};
use crate::errors::RenderError;
use crate::slack::blocks::{ActionElement, Block, ButtonStyle, RenderedMessage, TextObject};
use crate::slack::mrkdwn::{
    HEADER_TEXT_LIMIT, MAX_BLOCKS, SECTION_TEXT_LIMIT, escape, truncate_plain,
    truncate_with_suffix,
};
use crate::utils::links::normalize_article_url;
use crate::utils::time::format_published;

/// Blocks that are not detail sections: header, context, summary, two dividers, actions.
const FIXED_BLOCKS: usize = 6;

/// Longest `Topic:` prefix that is still treated as a label.
const MAX_TOPIC_CHARS: usize = 40;

/// Summary characters carried into the notification fallback text.
const FALLBACK_SUMMARY_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct MessageRenderer {
    labels: Labels,
    timezone: Tz,
}

impl MessageRenderer {
    #[must_use]
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            labels: config.labels.clone(),
            timezone: config.display_timezone,
        }
    }

    /// Compose the rich message from already-sanitized fields.
    ///
    /// # Errors
    ///
    /// Returns `StructuringFailure` when there is neither a summary nor a bullet.
    pub fn render(
        &self,
        input: &NotificationInput,
        fields: &ExtractedFields,
        bullets: &[BulletItem],
    ) -> Result<RenderedMessage, RenderError> {
        let summary = non_blank(fields.summary.as_deref());
        let detail = non_blank(fields.detail.as_deref());
        if summary.is_none() && bullets.is_empty() {
            return Err(RenderError::StructuringFailure);
        }

        let mut blocks = vec![
            self.header(input.title()),
            self.context(input.published_at()),
            self.summary_section(summary),
            Block::Divider,
        ];

        let details = if bullets.is_empty() {
            detail.map(|d| vec![self.paragraph(d)]).unwrap_or_default()
        } else {
            self.bullet_sections(bullets)
        };
        if !details.is_empty() {
            blocks.extend(details.into_iter().map(Block::section));
            blocks.push(Block::Divider);
        }

        match self.actions(input.article_url()) {
            Some(actions) => blocks.push(actions),
            None => {
                warn!(
                    url = input.article_url(),
                    "Article URL is not an absolute http(s) URL; omitting button"
                );
                if matches!(blocks.last(), Some(Block::Divider)) {
                    blocks.pop();
                }
            }
        }

        Ok(RenderedMessage {
            blocks,
            text: fallback_text(input.title(), summary),
        })
    }

    fn header(&self, title: &str) -> Block {
        let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
        let title = if title.is_empty() {
            self.labels.untitled.clone()
        } else {
            title
        };
        let (text, _) = truncate_plain(&title, HEADER_TEXT_LIMIT, "…");
        Block::Header {
            text: TextObject::plain(text),
        }
    }

    fn context(&self, published_at: &str) -> Block {
        let formatted = format_published(published_at, self.timezone);
        let formatted = if formatted.is_empty() {
            "-".to_string()
        } else {
            escape(&formatted)
        };
        let text = self.fit(&format!("📅 *{}:* ", self.labels.published), &formatted);
        Block::Context {
            elements: vec![TextObject::mrkdwn(text)],
        }
    }

    fn summary_section(&self, summary: Option<&str>) -> Block {
        let prefix = format!("*📝 {}*\n", self.labels.summary);
        let text = match summary {
            Some(s) => self.fit(&prefix, &escape(s)),
            None => format!("{prefix}_{}_", self.labels.no_summary),
        };
        Block::section(text)
    }

    fn details_heading(&self) -> String {
        format!("*🔍 {}*", self.labels.details)
    }

    fn paragraph(&self, detail: &str) -> String {
        self.fit(&format!("{}\n", self.details_heading()), &escape(detail))
    }

    /// `prefix` followed by `body`, with `body` cut so the whole fits a section.
    fn fit(&self, prefix: &str, body: &str) -> String {
        let budget = SECTION_TEXT_LIMIT.saturating_sub(prefix.chars().count());
        let (body, cut) = truncate_with_suffix(body, budget, &self.labels.continuation);
        if cut {
            info!(limit = SECTION_TEXT_LIMIT, "Section text too long; truncated");
        }
        format!("{prefix}{body}")
    }

    /// Detail section texts: consecutive bullets of one level share a section,
    /// and a section that would overflow spills into the next.
    fn bullet_sections(&self, bullets: &[BulletItem]) -> Vec<String> {
        let heading = self.details_heading();
        let line_budget = SECTION_TEXT_LIMIT - heading.chars().count() - 1;

        let mut sections: Vec<String> = Vec::new();
        let mut current = heading;
        let mut current_len = current.chars().count();
        let mut current_has_lines = false;
        let mut previous_level: Option<usize> = None;

        for item in bullets {
            let (line, cut) =
                truncate_with_suffix(&self.bullet_line(item), line_budget, &self.labels.continuation);
            if cut {
                info!(limit = SECTION_TEXT_LIMIT, "Bullet text too long; truncated");
            }
            let line_len = line.chars().count();

            let level_changed = previous_level.is_some_and(|level| level != item.level);
            let overflows = current_len + 1 + line_len > SECTION_TEXT_LIMIT;
            if current_has_lines && (level_changed || overflows) {
                sections.push(std::mem::take(&mut current));
                current_len = 0;
            }

            if current_len > 0 {
                current.push('\n');
                current_len += 1;
            }
            current.push_str(&line);
            current_len += line_len;
            current_has_lines = true;
            previous_level = Some(item.level);
        }
        if current_has_lines {
            sections.push(current);
        }

        self.cap_sections(sections)
    }

    /// Fold sections past the block budget into the last permitted one.
    fn cap_sections(&self, mut sections: Vec<String>) -> Vec<String> {
        let allowed = MAX_BLOCKS - FIXED_BLOCKS;
        if sections.len() <= allowed {
            return sections;
        }

        info!(
            sections = sections.len(),
            allowed, "Too many detail sections for one message; folding the rest"
        );
        let tail = sections.split_off(allowed - 1).join("\n");
        let (folded, _) = truncate_with_suffix(&tail, SECTION_TEXT_LIMIT, &self.labels.continuation);
        sections.push(folded);
        sections
    }

    fn bullet_line(&self, item: &BulletItem) -> String {
        let indent = "    ".repeat(item.level);
        let glyph = match (item.marker, item.level) {
            (Some(category), _) => category.emoji(),
            (None, 0) => "•",
            (None, _) => "◦",
        };

        let body = match (item.marker, item.level) {
            (Some(_), 0) => split_topic(&item.text)
                .map(|(topic, rest)| format!("*{}*: {}", escape(topic), escape(rest)))
                .unwrap_or_else(|| escape(&item.text)),
            _ => escape(&item.text),
        };

        format!("{indent}{glyph} {body}")
    }

    fn actions(&self, article_url: &str) -> Option<Block> {
        let url = normalize_article_url(article_url)?;
        Some(Block::Actions {
            elements: vec![ActionElement::Button {
                text: TextObject::plain(format!("📖 {}", self.labels.read_article)),
                url,
                style: ButtonStyle::Primary,
            }],
        })
    }
}

fn non_blank(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|s| !s.is_empty())
}

/// `Topic: rest` split for short topics, accepting ASCII and full-width colons.
fn split_topic(text: &str) -> Option<(&str, &str)> {
    let idx = text.find([':', '：'])?;
    let topic = text[..idx].trim();
    let sep_len = text[idx..].chars().next().map_or(1, char::len_utf8);
    let rest = text[idx + sep_len..].trim();
    let topic_len = topic.chars().count();
    (topic_len > 0 && topic_len <= MAX_TOPIC_CHARS && !rest.is_empty()).then_some((topic, rest))
}

/// Notification text: the title, plus the start of the summary when there is one.
#[must_use]
pub fn fallback_text(title: &str, summary: Option<&str>) -> String {
    let title = escape(title.trim());
    match summary {
        Some(s) => {
            let head: String = s.chars().take(FALLBACK_SUMMARY_CHARS).collect();
            format!("{} - {}...", title, escape(&head))
        }
        None => title,
    }
}
