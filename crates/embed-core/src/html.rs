//! HTML fragments emitted by the engine itself
//!
//! Only markup the engine synthesizes passes through here. Provider-supplied
//! HTML is used verbatim, apart from the autoplay rewrite which touches the
//! iframe `src` value and nothing else.

use regex::Regex;
use std::sync::OnceLock;

/// Escape text for use inside a double-quoted attribute or element body
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Minimal image tag for photo responses without an HTML fragment
pub fn image_tag(src: &str, width: &str, height: &str) -> String {
    format!(
        r#"<img src="{}" width="{}" height="{}">"#,
        escape(src),
        escape(width),
        escape(height)
    )
}

fn iframe_src_regex() -> &'static Regex {
    static IFRAME_SRC_REGEX: OnceLock<Regex> = OnceLock::new();
    IFRAME_SRC_REGEX.get_or_init(|| {
        // Group 1: a double-quoted src value, group 2: a single-quoted one
        Regex::new(r#"(?is)<iframe\b[^>]*?\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("iframe src pattern is valid")
    })
}

/// Add `autoplay=1` to the `src` of the first iframe in `fragment`
///
/// Every byte outside the src value is preserved. Returns `None` when no
/// iframe with a src attribute is found.
pub fn inject_autoplay(fragment: &str) -> Option<String> {
    let captures = iframe_src_regex().captures(fragment)?;
    let src = captures.get(1).or_else(|| captures.get(2))?;

    let mut rewritten = String::with_capacity(fragment.len() + 11);
    rewritten.push_str(&fragment[..src.start()]);
    rewritten.push_str(&set_query_flag(src.as_str(), "autoplay", "1"));
    rewritten.push_str(&fragment[src.end()..]);
    Some(rewritten)
}

/// Set `key=value` in a URL's query, ahead of any fragment
///
/// An existing `key` keeps its position and has its value replaced; the URL
/// is returned untouched when it already carries `value`. Otherwise the pair
/// is appended.
fn set_query_flag(url: &str, key: &str, value: &str) -> String {
    let (base, fragment) = match url.find('#') {
        Some(pos) => url.split_at(pos),
        None => (url, ""),
    };

    if let Some(question) = base.find('?') {
        let mut offset = question + 1;
        for pair in base[offset..].split(['&', ';']) {
            let (name, current) = match pair.split_once('=') {
                Some((name, current)) => (name, Some(current)),
                None => (pair, None),
            };
            if name == key {
                if current == Some(value) {
                    return url.to_string();
                }
                let end = offset + pair.len();
                return format!(
                    "{}{}={}{}{}",
                    &base[..offset],
                    key,
                    value,
                    &base[end..],
                    fragment
                );
            }
            // separators are single bytes
            offset += pair.len() + 1;
        }
    }

    let separator = if !base.contains('?') {
        "?"
    } else if base.ends_with('?') || base.ends_with('&') {
        ""
    } else {
        "&"
    };

    format!("{}{}{}={}{}", base, separator, key, value, fragment)
}
