use serde::{Deserialize, Serialize};

/// One unit of work for the pipeline: a feed entry plus the model's raw answer.
///
/// Fields are private so the value cannot change once it has been built or
/// deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationInput {
    title: String,
    #[serde(default)]
    published_at: String,
    article_url: String,
    #[serde(default)]
    raw_response: String,
}

impl NotificationInput {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        published_at: impl Into<String>,
        article_url: impl Into<String>,
        raw_response: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            published_at: published_at.into(),
            article_url: article_url.into(),
            raw_response: raw_response.into(),
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn published_at(&self) -> &str {
        &self.published_at
    }

    #[must_use]
    pub fn article_url(&self) -> &str {
        &self.article_url
    }

    #[must_use]
    pub fn raw_response(&self) -> &str {
        &self.raw_response
    }
}

/// Structured fields recovered from a raw response. `None` means the tag was absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub summary: Option<String>,
    pub detail: Option<String>,
}

impl ExtractedFields {
    /// True when neither field carries any non-whitespace text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let blank = |f: &Option<String>| f.as_deref().is_none_or(|s| s.trim().is_empty());
        blank(&self.summary) && blank(&self.detail)
    }
}

/// Sanitized fields of one response, ready for any renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedFields {
    /// Blank-after-sanitizing fields are `None`.
    pub fields: ExtractedFields,
    /// Sanitized whole response, kept only when no field survived.
    pub sanitized_raw: Option<String>,
}

impl PreparedFields {
    /// Plain text for fallback renderers: the fields joined, else the sanitized response.
    #[must_use]
    pub fn fallback_text(&self) -> Option<String> {
        let joined = [&self.fields.summary, &self.fields.detail]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n\n");
        if joined.is_empty() {
            self.sanitized_raw.clone().filter(|s| !s.is_empty())
        } else {
            Some(joined)
        }
    }
}

/// Presentation category guessed from a bullet's wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Who can use it, where it is available.
    Availability,
    /// What the capability is.
    NewFeature,
    /// Updates to something that already existed.
    Change,
}

impl Category {
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Category::Availability => "✅",
            Category::NewFeature => "🚀",
            Category::Change => "🔄",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletItem {
    /// Indent depth, 0 for top-level bullets.
    pub level: usize,
    pub marker: Option<Category>,
    pub text: String,
}

/// Where a rendered notification is headed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    #[default]
    Slack,
    Teams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_deserializes_from_camel_case() {
        let input: NotificationInput = serde_json::from_str(
            r#"{"title":"T","publishedAt":"2024-01-01","articleUrl":"https://a.b","rawResponse":"x"}"#,
        )
        .unwrap();
        assert_eq!(input.title(), "T");
        assert_eq!(input.published_at(), "2024-01-01");
        assert_eq!(input.article_url(), "https://a.b");
        assert_eq!(input.raw_response(), "x");
    }

    #[test]
    fn whitespace_only_fields_count_as_empty() {
        let fields = ExtractedFields {
            summary: Some("  \n".into()),
            detail: None,
        };
        assert!(fields.is_empty());
    }

    #[test]
    fn fallback_text_prefers_fields_over_raw() {
        let prepared = PreparedFields {
            fields: ExtractedFields {
                summary: Some("sum".into()),
                detail: Some("det".into()),
            },
            sanitized_raw: None,
        };
        assert_eq!(prepared.fallback_text().as_deref(), Some("sum\n\ndet"));

        let prepared = PreparedFields {
            fields: ExtractedFields::default(),
            sanitized_raw: Some("raw".into()),
        };
        assert_eq!(prepared.fallback_text().as_deref(), Some("raw"));
    }
}
