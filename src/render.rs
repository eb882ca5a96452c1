//! Display rendering for catalog text: HTML escaping, URL autolinking and
//! lightweight list/paragraph formatting. Presentation only; nothing here
//! touches session state.

/// Escape the five HTML metacharacters.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap bare `http(s)://` URLs in anchor tags. A URL run ends at whitespace,
/// `<` or `)`, so URLs inside already-escaped markup or parentheses stay
/// intact.
pub fn linkify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some((start, scheme_len)) = next_scheme(rest) {
        let after_scheme = &rest[start + scheme_len..];
        let url_len = after_scheme
            .find(|c: char| c.is_whitespace() || c == '<' || c == ')')
            .unwrap_or(after_scheme.len());

        // A scheme with nothing after it is not a link.
        if url_len == 0 {
            out.push_str(&rest[..start + scheme_len]);
            rest = after_scheme;
            continue;
        }

        let end = start + scheme_len + url_len;
        let url = &rest[start..end];
        out.push_str(&rest[..start]);
        out.push_str("<a href=\"");
        out.push_str(url);
        out.push_str("\" target=\"_blank\" rel=\"noopener\">");
        out.push_str(url);
        out.push_str("</a>");
        rest = &rest[end..];
    }

    out.push_str(rest);
    out
}

fn next_scheme(s: &str) -> Option<(usize, usize)> {
    let http = s.find("http://").map(|i| (i, "http://".len()));
    let https = s.find("https://").map(|i| (i, "https://".len()));
    match (http, https) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

/// Render raw text as display markup: `*`/`-` lines become `<ul>` items,
/// `1.`-style lines become `<ol>` items, other non-empty lines become
/// paragraphs, blank lines separate blocks. Content is escaped first and
/// URLs are linkified per line.
pub fn format_text(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let escaped = escape_html(raw);
    let mut html = String::new();
    let mut in_ul = false;
    let mut in_ol = false;

    for line in escaped.split('\n') {
        let trimmed = line.trim();

        if let Some(item) = bullet_item(trimmed) {
            if !in_ul {
                html.push_str("<ul>");
                in_ul = true;
            }
            if in_ol {
                html.push_str("</ol>");
                in_ol = false;
            }
            push_item(&mut html, item);
            continue;
        }

        if let Some(item) = numbered_item(trimmed) {
            if !in_ol {
                html.push_str("<ol>");
                in_ol = true;
            }
            if in_ul {
                html.push_str("</ul>");
                in_ul = false;
            }
            push_item(&mut html, item);
            continue;
        }

        if in_ul {
            html.push_str("</ul>");
            in_ul = false;
        }
        if in_ol {
            html.push_str("</ol>");
            in_ol = false;
        }

        if trimmed.is_empty() {
            continue;
        }

        html.push_str("<p>");
        html.push_str(&linkify(trimmed));
        html.push_str("</p>");
    }

    if in_ul {
        html.push_str("</ul>");
    }
    if in_ol {
        html.push_str("</ol>");
    }

    html
}

fn push_item(html: &mut String, item: &str) {
    html.push_str("<li>");
    html.push_str(&linkify(item));
    html.push_str("</li>");
}

/// `* item` or `- item`; the marker must be followed by whitespace.
fn bullet_item(line: &str) -> Option<&str> {
    let rest = line
        .strip_prefix('*')
        .or_else(|| line.strip_prefix('-'))?;
    let item = rest.trim_start();
    if item.len() == rest.len() {
        return None;
    }
    Some(item)
}

/// `1. item` style; digits, a dot, then whitespace.
fn numbered_item(line: &str) -> Option<&str> {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    let item = rest.trim_start();
    if item.len() == rest.len() {
        return None;
    }
    Some(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_metacharacters() {
        assert_eq!(
            escape_html("<div class=\"x\">&'test'</div>"),
            "&lt;div class=&quot;x&quot;&gt;&amp;&#39;test&#39;&lt;/div&gt;"
        );
    }

    #[test]
    fn test_escape_html_preserves_normal_text() {
        assert_eq!(escape_html("Hello world"), "Hello world");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_linkify_http_url() {
        assert_eq!(
            linkify("visit http://example.com today"),
            "visit <a href=\"http://example.com\" target=\"_blank\" rel=\"noopener\">http://example.com</a> today"
        );
    }

    #[test]
    fn test_linkify_https_url() {
        assert_eq!(
            linkify("see https://example.com/path"),
            "see <a href=\"https://example.com/path\" target=\"_blank\" rel=\"noopener\">https://example.com/path</a>"
        );
    }

    #[test]
    fn test_linkify_preserves_non_url_text() {
        assert_eq!(linkify("no links here"), "no links here");
    }

    #[test]
    fn test_linkify_multiple_urls() {
        let result = linkify("a http://one.com b https://two.com c");
        assert!(result.contains("href=\"http://one.com\""));
        assert!(result.contains("href=\"https://two.com\""));
    }

    #[test]
    fn test_linkify_stops_at_closing_paren() {
        let result = linkify("(https://example.com) rest");
        assert!(result.contains("href=\"https://example.com\""));
        assert!(result.contains(") rest"));
    }

    #[test]
    fn test_format_text_empty() {
        assert_eq!(format_text(""), "");
    }

    #[test]
    fn test_format_text_wraps_paragraphs() {
        assert_eq!(format_text("Hello world"), "<p>Hello world</p>");
        assert_eq!(
            format_text("First paragraph\n\nSecond paragraph"),
            "<p>First paragraph</p><p>Second paragraph</p>"
        );
    }

    #[test]
    fn test_format_text_bullet_lists() {
        let result = format_text("* item one\n* item two");
        assert_eq!(result, "<ul><li>item one</li><li>item two</li></ul>");

        let dashes = format_text("- item one\n- item two");
        assert_eq!(dashes, "<ul><li>item one</li><li>item two</li></ul>");
    }

    #[test]
    fn test_format_text_numbered_lists() {
        let result = format_text("1. first\n2. second");
        assert_eq!(result, "<ol><li>first</li><li>second</li></ol>");
    }

    #[test]
    fn test_format_text_closes_list_on_type_switch() {
        let result = format_text("* bullet\n1. numbered");
        assert_eq!(result, "<ul><li>bullet</li></ul><ol><li>numbered</li></ol>");
    }

    #[test]
    fn test_format_text_escapes_content() {
        let result = format_text("<script>alert(\"xss\")</script>");
        assert!(!result.contains("<script>"));
        assert!(result.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_format_text_linkifies() {
        let result = format_text("Visit https://example.com for info");
        assert!(result.contains("href=\"https://example.com\""));
    }

    #[test]
    fn test_marker_without_space_is_a_paragraph() {
        assert_eq!(format_text("*bold* text"), "<p>*bold* text</p>");
        assert_eq!(format_text("1.5 is a number"), "<p>1.5 is a number</p>");
    }
}
