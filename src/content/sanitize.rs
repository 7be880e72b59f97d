//! Neutralization of markup constructs that can execute script or load
//! unsafe resources when rendered as HTML.

use regex::Regex;
use std::sync::OnceLock;

fn fenced_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```.*?```").expect("Failed to compile fenced block regex"))
}

fn inline_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"`[^`]*`").expect("Failed to compile inline code regex"))
}

fn script_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<script[^>]*>.*?</script>")
            .expect("Failed to compile script block regex")
    })
}

fn event_handler_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)on\w+\s*=\s*["'][^"']*["']"#)
            .expect("Failed to compile event handler regex")
    })
}

fn javascript_href_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)href\s*=\s*["']javascript:[^"']*["']"#)
            .expect("Failed to compile javascript href regex")
    })
}

fn data_html_src_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)src\s*=\s*["']data:text/html[^"']*["']"#)
            .expect("Failed to compile data src regex")
    })
}

/// Remove fenced code blocks and inline code spans. Used to build the copy
/// of the body that the security scan runs against.
pub(crate) fn strip_code_spans(body: &str) -> String {
    let without_fences = fenced_block_regex().replace_all(body, "");
    inline_code_regex()
        .replace_all(&without_fences, "")
        .into_owned()
}

/// Strip script blocks, inline event handlers, `javascript:` hrefs, and
/// `data:text/html` sources from a document that already passed validation.
#[must_use]
pub fn sanitize_content(content: &str) -> String {
    let stripped = script_block_regex().replace_all(content, "");
    let stripped = event_handler_regex().replace_all(&stripped, "");
    let stripped = javascript_href_regex().replace_all(&stripped, "");
    data_html_src_regex().replace_all(&stripped, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_code_spans_removes_fences_and_inline_code() {
        let body = "before\n```html\n<script>x</script>\n```\nmiddle `<embed>` after";
        let stripped = strip_code_spans(body);
        assert!(!stripped.contains("script"));
        assert!(!stripped.contains("embed"));
        assert!(stripped.contains("before"));
        assert!(stripped.contains("middle"));
        assert!(stripped.contains("after"));
    }

    #[test]
    fn strip_code_spans_keeps_unfenced_markup() {
        let stripped = strip_code_spans("text <script>x</script> more");
        assert!(stripped.contains("<script>"));
    }

    #[test]
    fn sanitize_removes_script_blocks_entirely() {
        let out = sanitize_content("a<SCRIPT type=\"x\">alert(1)\nmore</SCRIPT>b");
        assert_eq!(out, "ab");
    }

    #[test]
    fn sanitize_removes_inline_event_handlers() {
        let out = sanitize_content(r#"<img src="x.png" onerror="alert(1)" onload='go()'>"#);
        assert!(!out.to_lowercase().contains("onerror"));
        assert!(!out.to_lowercase().contains("onload"));
        assert!(out.contains("x.png"));
    }

    #[test]
    fn sanitize_removes_javascript_hrefs() {
        let out = sanitize_content(r#"<a href="javascript:alert(1)">x</a>"#);
        assert!(!out.contains("javascript:"));
        assert!(out.contains("<a"));
    }

    #[test]
    fn sanitize_removes_data_html_sources() {
        let out = sanitize_content(r#"<iframe src="data:text/html,<p>x</p>"></iframe>"#);
        assert!(!out.contains("data:text/html"));
    }

    #[test]
    fn sanitize_leaves_benign_markup_alone() {
        let doc = "# Title\n\n[link](https://example.com) and `code` stay.\n";
        assert_eq!(sanitize_content(doc), doc);
    }
}
