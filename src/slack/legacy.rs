//! Plain single-section rendering used when a response cannot be structured.
//!
//! This is the last fallback and cannot fail.

use tracing::warn;

use crate::core::config::{Labels, PipelineConfig};
use crate::core::models::NotificationInput;
use crate::slack::blocks::{Block, RenderedMessage};
use crate::slack::message_builder::fallback_text;
use crate::slack::mrkdwn::{HEADER_TEXT_LIMIT, SECTION_TEXT_LIMIT, escape, truncate_with_suffix};
use crate::utils::links::{normalize_article_url, slack_link};

#[derive(Debug, Clone)]
pub struct LegacyRenderer {
    labels: Labels,
}

impl LegacyRenderer {
    #[must_use]
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            labels: config.labels.clone(),
        }
    }

    /// One section holding the title, the sanitized text (if any) and the article link.
    #[must_use]
    pub fn render_legacy(
        &self,
        input: &NotificationInput,
        sanitized_fallback: Option<&str>,
    ) -> RenderedMessage {
        let title = match input.title().trim() {
            "" => self.labels.untitled.clone(),
            t => t.to_string(),
        };
        let (title, _) = truncate_with_suffix(&escape(&title), HEADER_TEXT_LIMIT, "…");
        let title_line = format!("*{title}*");

        let link = self.link_line(input.article_url());
        let body = sanitized_fallback
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let mut lines = vec![title_line];
        if let Some(body) = body {
            let reserved: usize = lines
                .iter()
                .chain(&link)
                .map(|l| l.chars().count() + 1)
                .sum();
            let budget = SECTION_TEXT_LIMIT.saturating_sub(reserved);
            let (body, _) = truncate_with_suffix(&escape(body), budget, &self.labels.continuation);
            lines.push(body);
        }
        lines.extend(link);

        RenderedMessage {
            blocks: vec![Block::section(lines.join("\n"))],
            text: fallback_text(input.title(), None),
        }
    }

    fn link_line(&self, article_url: &str) -> Option<String> {
        let line = match normalize_article_url(article_url) {
            Some(url) => slack_link(&url, &self.labels.read_article),
            None => {
                warn!(url = article_url, "Article URL unusable as a link; showing it as text");
                escape(article_url.trim())
            }
        };
        // Leave most of the section for the body; an enormous URL is dropped instead.
        (!line.is_empty() && line.chars().count() <= SECTION_TEXT_LIMIT / 2).then_some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_message_has_title_and_link_only() {
        let renderer = LegacyRenderer::new(&PipelineConfig::default());
        let input = NotificationInput::new("Launch", "", "https://example.com/p", "");
        let message = renderer.render_legacy(&input, None);
        assert_eq!(
            message.section_texts(),
            ["*Launch*\n<https://example.com/p|Read article>"]
        );
    }

    #[test]
    fn oversized_body_is_truncated_within_limit() {
        let renderer = LegacyRenderer::new(&PipelineConfig::default());
        let input = NotificationInput::new("T", "", "https://example.com/p", "");
        let body = "word ".repeat(2000);
        let message = renderer.render_legacy(&input, Some(&body));
        let text = message.section_texts()[0];
        assert!(text.chars().count() <= SECTION_TEXT_LIMIT);
        assert!(text.contains("(continued in article)"));
        assert!(text.ends_with("<https://example.com/p|Read article>"));
    }
}
