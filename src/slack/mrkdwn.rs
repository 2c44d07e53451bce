//! Escaping and size limits for Slack's `mrkdwn` dialect.

/// Hard cap on a section or context text object.
pub const SECTION_TEXT_LIMIT: usize = 3000;

/// Hard cap on a header's `plain_text`.
pub const HEADER_TEXT_LIMIT: usize = 150;

/// Slack rejects messages with more blocks than this.
pub const MAX_BLOCKS: usize = 50;

/// Neutralise characters that Slack would read as markup.
///
/// `&`, `<`, `>` become entities. Emphasis markers become their full-width forms and
/// backticks become single quotes, since `mrkdwn` has no backslash escape.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '*' => out.push('＊'),
            '_' => out.push('＿'),
            '~' => out.push('～'),
            '`' => out.push('\''),
            c => out.push(c),
        }
    }
    out
}

/// Byte offset just past the first `max_chars` characters of `s`.
#[must_use]
pub fn slice_end_for_max_chars(s: &str, max_chars: usize) -> usize {
    if max_chars == 0 {
        return 0;
    }

    for (count, (idx, _)) in s.char_indices().enumerate() {
        if count == max_chars {
            return idx;
        }
    }
    s.len()
}

/// Cut escaped `mrkdwn` to at most `limit` characters including `suffix`.
///
/// The cut lands on the last whitespace before the limit when there is one, never
/// inside an `&…;` entity, and `suffix` marks that something was dropped. Returns
/// the text and whether it was cut.
#[must_use]
pub fn truncate_with_suffix(text: &str, limit: usize, suffix: &str) -> (String, bool) {
    truncate(text, limit, suffix, true)
}

/// Like [`truncate_with_suffix`] for `plain_text`, where `&` is literal.
#[must_use]
pub fn truncate_plain(text: &str, limit: usize, suffix: &str) -> (String, bool) {
    truncate(text, limit, suffix, false)
}

fn truncate(text: &str, limit: usize, suffix: &str, escaped: bool) -> (String, bool) {
    if text.chars().count() <= limit {
        return (text.to_string(), false);
    }

    let suffix_len = suffix.chars().count();
    if suffix_len >= limit {
        let end = slice_end_for_max_chars(suffix, limit);
        return (suffix[..end].to_string(), true);
    }

    let end = slice_end_for_max_chars(text, limit - suffix_len);
    let head = &text[..end];
    let at_word_end = text[end..].starts_with(char::is_whitespace);

    let cut = if at_word_end {
        head
    } else {
        match head.rfind(char::is_whitespace) {
            Some(i) if i > 0 => &head[..i],
            _ => head,
        }
    };
    let cut = cut.trim_end();
    let cut = if escaped { without_partial_entity(cut) } else { cut };

    (format!("{cut}{suffix}"), true)
}

fn without_partial_entity(s: &str) -> &str {
    match s.rfind('&') {
        Some(i) if !s[i..].contains(';') => &s[..i],
        _ => s,
    }
}
