//! Orchestration of one notification: extract, sanitize, structure, render.
//!
//! ```text
//! Start -> Extracted -> Sanitized -> Structured -> Rendered
//!                           |             |
//!                           +-------------+--> LegacyRendered
//! ```
//!
//! The legacy edge out of `Sanitized` is taken when neither field survived
//! (or structured layout is switched off); the one out of `Structured` when the
//! renderer reports a structuring failure. Nothing here retries.

use serde_json::Value;
use tracing::{debug, info_span, warn};
use uuid::Uuid;

use crate::bullets::BulletStructurer;
use crate::core::config::{Labels, PipelineConfig};
use crate::core::models::{BulletItem, ExtractedFields, NotificationInput, PreparedFields};
use crate::errors::{NotifyError, RenderError};
use crate::extract::FieldExtractor;
use crate::sanitize::Sanitizer;
use crate::slack::{LegacyRenderer, MessageRenderer, RenderedMessage};
use crate::teams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Extracted,
    Sanitized,
    Structured,
    Rendered,
    LegacyRendered,
}

impl Stage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::Extracted => "extracted",
            Stage::Sanitized => "sanitized",
            Stage::Structured => "structured",
            Stage::Rendered => "rendered",
            Stage::LegacyRendered => "legacy_rendered",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Neither the summary nor the detail region was present (or both were empty).
    NoTaggedFields,
    /// Renderer found no summary and no bullets.
    StructuringFailure,
    /// Structured layout is switched off in configuration.
    LayoutDisabled,
}

impl FallbackReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FallbackReason::NoTaggedFields => "no_tagged_fields",
            FallbackReason::StructuringFailure => "structuring_failure",
            FallbackReason::LayoutDisabled => "layout_disabled",
        }
    }
}

impl From<RenderError> for FallbackReason {
    fn from(error: RenderError) -> Self {
        match error {
            RenderError::StructuringFailure => FallbackReason::StructuringFailure,
        }
    }
}

/// Path chosen once the fields are sanitized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Structured,
    Legacy(FallbackReason),
}

/// Routing decision, independent of any rendering.
#[must_use]
pub fn route_after_sanitize(structured_layout: bool, fields: &ExtractedFields) -> Route {
    if !structured_layout {
        Route::Legacy(FallbackReason::LayoutDisabled)
    } else if fields.is_empty() {
        Route::Legacy(FallbackReason::NoTaggedFields)
    } else {
        Route::Structured
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Rendered(RenderedMessage),
    LegacyRendered {
        message: RenderedMessage,
        reason: FallbackReason,
    },
}

impl Outcome {
    #[must_use]
    pub fn message(&self) -> &RenderedMessage {
        match self {
            Outcome::Rendered(message) | Outcome::LegacyRendered { message, .. } => message,
        }
    }

    #[must_use]
    pub fn into_message(self) -> RenderedMessage {
        match self {
            Outcome::Rendered(message) | Outcome::LegacyRendered { message, .. } => message,
        }
    }

    /// Terminal state reached.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Outcome::Rendered(_) => Stage::Rendered,
            Outcome::LegacyRendered { .. } => Stage::LegacyRendered,
        }
    }

    #[must_use]
    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            Outcome::Rendered(_) => None,
            Outcome::LegacyRendered { reason, .. } => Some(*reason),
        }
    }
}

/// Stateless pipeline; one instance serves any number of inputs, from any thread.
#[derive(Debug, Clone)]
pub struct Pipeline {
    extractor: FieldExtractor,
    sanitizer: Sanitizer,
    structurer: BulletStructurer,
    renderer: MessageRenderer,
    legacy: LegacyRenderer,
    labels: Labels,
    structured_layout: bool,
}

impl Pipeline {
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn new(config: &PipelineConfig) -> Result<Self, NotifyError> {
        config.validate()?;
        Ok(Self {
            extractor: FieldExtractor::new(config)?,
            sanitizer: Sanitizer::new(&config.sanitizer)?,
            structurer: BulletStructurer::new(&config.bullets),
            renderer: MessageRenderer::new(config),
            legacy: LegacyRenderer::new(config),
            labels: config.labels.clone(),
            structured_layout: config.structured_layout,
        })
    }

    /// Run `input` through to a Slack message. Always yields one.
    #[must_use]
    pub fn run(&self, input: &NotificationInput) -> Outcome {
        let corr_id = Uuid::new_v4();
        let span = info_span!("notification", corr_id = %corr_id);
        let _guard = span.enter();

        let prepared = self.prepare(input);

        match route_after_sanitize(self.structured_layout, &prepared.fields) {
            Route::Legacy(reason) => self.legacy_outcome(input, &prepared, reason),
            Route::Structured => {
                let bullets = self.structure(prepared.fields.detail.as_deref());
                debug!(stage = ?Stage::Structured, bullets = bullets.len());

                match self.renderer.render(input, &prepared.fields, &bullets) {
                    Ok(message) => {
                        debug!(stage = ?Stage::Rendered);
                        Outcome::Rendered(message)
                    }
                    Err(e) => {
                        warn!("{}; falling back to plain rendering", e);
                        self.legacy_outcome(input, &prepared, e.into())
                    }
                }
            }
        }
    }

    /// Run `input` through to a Teams Adaptive Card, with the terminal stage reached.
    #[must_use]
    pub fn run_teams(&self, input: &NotificationInput) -> (Value, Stage) {
        let corr_id = Uuid::new_v4();
        let span = info_span!("notification", corr_id = %corr_id);
        let _guard = span.enter();

        let prepared = self.prepare(input);
        let stage = match route_after_sanitize(self.structured_layout, &prepared.fields) {
            Route::Structured => Stage::Rendered,
            Route::Legacy(reason) => {
                warn!(reason = reason.as_str(), "Teams card without structured fields");
                Stage::LegacyRendered
            }
        };
        (teams::render_adaptive_card(input, &prepared, &self.labels), stage)
    }

    /// Extraction and sanitization, shared by every destination.
    #[must_use]
    pub fn prepare(&self, input: &NotificationInput) -> PreparedFields {
        let raw = input.raw_response();
        debug!(stage = ?Stage::Start, raw_len = raw.len());
        #[cfg(feature = "debug-logs")]
        debug!(raw_response = raw, "Raw model response");

        if self.sanitizer.contains_scaffold(raw) {
            warn!("Response contains prompt scaffold tags");
        }

        let extracted = self.extractor.extract_fields(raw);
        debug!(stage = ?Stage::Extracted);
        if extracted.summary.is_none() {
            warn!("No <{}> region found in response", self.extractor.summary_tag());
        }
        if extracted.detail.is_none() {
            warn!("No <{}> region found in response", self.extractor.detail_tag());
        }

        let fields = ExtractedFields {
            summary: self.sanitize_field(extracted.summary),
            detail: self.sanitize_field(extracted.detail),
        };
        debug!(stage = ?Stage::Sanitized);

        let sanitized_raw = fields
            .is_empty()
            .then(|| self.sanitizer.sanitize(raw));

        PreparedFields {
            fields,
            sanitized_raw,
        }
    }

    fn sanitize_field(&self, field: Option<String>) -> Option<String> {
        field
            .map(|text| self.sanitizer.sanitize(&text))
            .filter(|text| !text.is_empty())
    }

    fn structure(&self, detail: Option<&str>) -> Vec<BulletItem> {
        let Some(detail) = detail else {
            return Vec::new();
        };
        // Joining continuation lines can splice a tag back together.
        self.structurer
            .structure(detail)
            .into_iter()
            .map(|mut item| {
                item.text = self.sanitizer.sanitize(&item.text);
                item
            })
            .filter(|item| !item.text.is_empty())
            .collect()
    }

    fn legacy_outcome(
        &self,
        input: &NotificationInput,
        prepared: &PreparedFields,
        reason: FallbackReason,
    ) -> Outcome {
        warn!(reason = reason.as_str(), "Using plain notification layout");
        let text = prepared.fallback_text();
        let message = self.legacy.render_legacy(input, text.as_deref());
        debug!(stage = ?Stage::LegacyRendered);
        Outcome::LegacyRendered { message, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(summary: Option<&str>, detail: Option<&str>) -> ExtractedFields {
        ExtractedFields {
            summary: summary.map(Into::into),
            detail: detail.map(Into::into),
        }
    }

    #[test]
    fn routing_is_decided_before_rendering() {
        assert_eq!(
            route_after_sanitize(true, &fields(Some("s"), None)),
            Route::Structured
        );
        assert_eq!(
            route_after_sanitize(true, &fields(None, Some("- d"))),
            Route::Structured
        );
        assert_eq!(
            route_after_sanitize(true, &fields(None, None)),
            Route::Legacy(FallbackReason::NoTaggedFields)
        );
        assert_eq!(
            route_after_sanitize(false, &fields(Some("s"), Some("- d"))),
            Route::Legacy(FallbackReason::LayoutDisabled)
        );
    }

    #[test]
    fn pipeline_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();
    }
}
