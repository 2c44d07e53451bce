use url::Url;

use crate::slack::mrkdwn::escape;

/// Slack refuses button URLs longer than this.
pub const MAX_URL_LEN: usize = 3000;

/// Normalise an article URL for use in buttons and link markup.
///
/// Only absolute `http(s)` URLs are accepted. Characters that would end Slack's
/// `<url|label>` markup early are percent-encoded.
#[must_use]
pub fn normalize_article_url(raw: &str) -> Option<String> {
    let raw = raw
        .trim()
        .trim_matches(|c: char| matches!(c, '<' | '>' | '"' | '\''));
    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return None;
    }

    let url = Url::parse(raw).ok()?;
    url.host_str()?;

    let rendered = url
        .as_str()
        .replace('|', "%7C")
        .replace('<', "%3C")
        .replace('>', "%3E");

    (rendered.len() <= MAX_URL_LEN).then_some(rendered)
}

/// Slack link markup `<url|label>` with the label escaped.
#[must_use]
pub fn slack_link(url: &str, label: &str) -> String {
    format!("<{}|{}>", url, escape(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_ordinary_article_urls() {
        assert_eq!(
            normalize_article_url(" https://example.com/blog/post?id=1 ").as_deref(),
            Some("https://example.com/blog/post?id=1")
        );
    }

    #[test]
    fn rejects_relative_and_non_http_urls() {
        assert_eq!(normalize_article_url("/blog/post"), None);
        assert_eq!(normalize_article_url("javascript:alert(1)"), None);
        assert_eq!(normalize_article_url(""), None);
    }

    #[test]
    fn encodes_link_terminators() {
        let url = normalize_article_url("https://example.com/a?q=x|y").unwrap();
        assert!(!url.contains('|'));
        assert_eq!(slack_link(&url, "Read *now*"), format!("<{url}|Read ＊now＊>"));
    }
}
