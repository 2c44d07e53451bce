//! All Slack-specific output: Block Kit model, mrkdwn rules and the two renderers

pub mod blocks;
pub mod legacy;
pub mod message_builder;
pub mod mrkdwn;

// Re-export main types for convenience
pub use blocks::{Block, BlockKind, RenderedMessage};
pub use legacy::LegacyRenderer;
pub use message_builder::MessageRenderer;
