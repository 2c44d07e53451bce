//! Block Kit message model and its JSON shape.
//!
//! Serializes to exactly what an incoming webhook accepts:
//! `{"blocks": [{"type": "header", ...}, ...], "text": "..."}`.

use serde::Serialize;
use serde_json::Value;

use crate::errors::NotifyError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String, emoji: bool },
    Mrkdwn { text: String },
}

impl TextObject {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        TextObject::PlainText {
            text: text.into(),
            emoji: true,
        }
    }

    #[must_use]
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        TextObject::Mrkdwn { text: text.into() }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            TextObject::PlainText { text, .. } | TextObject::Mrkdwn { text } => text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Primary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionElement {
    Button {
        text: TextObject,
        url: String,
        style: ButtonStyle,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header { text: TextObject },
    Context { elements: Vec<TextObject> },
    Section { text: TextObject },
    Divider,
    Actions { elements: Vec<ActionElement> },
}

/// Block discriminant, handy for asserting message layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Header,
    Context,
    Section,
    Divider,
    Actions,
}

impl Block {
    #[must_use]
    pub fn section(text: impl Into<String>) -> Self {
        Block::Section {
            text: TextObject::mrkdwn(text),
        }
    }

    #[must_use]
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Header { .. } => BlockKind::Header,
            Block::Context { .. } => BlockKind::Context,
            Block::Section { .. } => BlockKind::Section,
            Block::Divider => BlockKind::Divider,
            Block::Actions { .. } => BlockKind::Actions,
        }
    }

    /// Every text payload the block carries.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Block::Header { text } | Block::Section { text } => vec![text.text()],
            Block::Context { elements } => elements.iter().map(TextObject::text).collect(),
            Block::Actions { elements } => elements
                .iter()
                .map(|ActionElement::Button { text, .. }| text.text())
                .collect(),
            Block::Divider => Vec::new(),
        }
    }
}

/// A finished notification in Block Kit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedMessage {
    pub blocks: Vec<Block>,
    /// Plain fallback shown in push notifications and by clients without blocks.
    pub text: String,
}

impl RenderedMessage {
    #[must_use]
    pub fn kinds(&self) -> Vec<BlockKind> {
        self.blocks.iter().map(Block::kind).collect()
    }

    /// Texts of all section blocks, in order.
    #[must_use]
    pub fn section_texts(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Section { text } => Some(text.text()),
                _ => None,
            })
            .collect()
    }

    /// Every text payload in the message, decorative and derived alike.
    pub fn all_texts(&self) -> impl Iterator<Item = &str> {
        self.blocks
            .iter()
            .flat_map(Block::texts)
            .chain(std::iter::once(self.text.as_str()))
    }

    /// # Errors
    ///
    /// Returns `SerializeError` if the message cannot be represented as JSON.
    pub fn to_json(&self) -> Result<Value, NotifyError> {
        serde_json::to_value(self).map_err(|e| NotifyError::SerializeError(e.to_string()))
    }
}
