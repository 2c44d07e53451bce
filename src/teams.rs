//! Microsoft Teams output: an Adaptive Card with a collapsible detail pane.

use serde_json::{Value, json};
use tracing::warn;

use crate::core::config::Labels;
use crate::core::models::{NotificationInput, PreparedFields};
use crate::utils::links::normalize_article_url;

const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";
const ADAPTIVE_CARD_SCHEMA: &str = "http://adaptivecards.io/schemas/adaptive-card.json";

/// Teams renders `\n` after a Japanese full stop as a paragraph gap; `\r` keeps the
/// sentences in one paragraph.
#[must_use]
pub fn soften_sentence_breaks(detail: &str) -> String {
    detail.replace("。\n", "。\r")
}

/// Build the webhook body for a Teams channel.
///
/// With no structured summary the sanitized response stands in as the summary and
/// the detail pane is left empty. The open-link action is only added for an absolute
/// `http(s)` article URL.
#[must_use]
pub fn render_adaptive_card(
    input: &NotificationInput,
    prepared: &PreparedFields,
    labels: &Labels,
) -> Value {
    let (summary, detail) = match (&prepared.fields.summary, &prepared.fields.detail) {
        (None, None) => (prepared.fallback_text().unwrap_or_default(), String::new()),
        (summary, detail) => (
            summary.clone().unwrap_or_else(|| labels.no_summary.clone()),
            detail.as_deref().map(soften_sentence_breaks).unwrap_or_default(),
        ),
    };
    let title = match input.title().trim() {
        "" => labels.untitled.clone(),
        t => t.to_string(),
    };

    let actions = match normalize_article_url(input.article_url()) {
        Some(url) => vec![json!({
            "type": "Action.OpenUrl",
            "title": labels.read_article,
            "url": url
        })],
        None => {
            warn!(
                url = input.article_url(),
                "Article URL is not an absolute http(s) URL; omitting card action"
            );
            Vec::new()
        }
    };

    json!({
        "type": "message",
        "attachments": [{
            "contentType": ADAPTIVE_CARD_CONTENT_TYPE,
            "content": {
                "type": "AdaptiveCard",
                "version": "1.3",
                "body": [
                    {
                        "type": "ColumnSet",
                        "columns": [{
                            "type": "Column",
                            "width": "auto",
                            "items": [
                                {
                                    "type": "Container",
                                    "id": "collapsedItems",
                                    "items": [
                                        { "type": "TextBlock", "text": format!("**{title}**") },
                                        { "type": "TextBlock", "wrap": true, "text": summary }
                                    ]
                                },
                                {
                                    "type": "Container",
                                    "id": "expandedItems",
                                    "isVisible": false,
                                    "items": [
                                        { "type": "TextBlock", "wrap": true, "text": detail }
                                    ]
                                }
                            ]
                        }]
                    },
                    {
                        "type": "Container",
                        "items": [{
                            "type": "ColumnSet",
                            "columns": [{
                                "type": "Column",
                                "width": "stretch",
                                "items": [
                                    { "type": "TextBlock", "text": "see less", "id": "collapse", "isVisible": false, "wrap": true, "color": "Accent" },
                                    { "type": "TextBlock", "text": "see more", "id": "expand", "wrap": true, "color": "Accent" }
                                ]
                            }],
                            "selectAction": {
                                "type": "Action.ToggleVisibility",
                                "targetElements": ["collapse", "expand", "expandedItems"]
                            }
                        }]
                    }
                ],
                "actions": actions,
                "msteams": { "width": "Full" },
                "$schema": ADAPTIVE_CARD_SCHEMA
            }
        }]
    })
}
