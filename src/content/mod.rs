//! Markdown content validation and sanitization.
//!
//! Everything fetched from GitHub is treated as untrusted until it has been
//! through [`validate_markdown`]. The pipeline short-circuits only on the
//! size check; every later stage accumulates errors and warnings so a
//! rejected document reports all of its problems at once.
//!
//! Documentation *about* dangerous syntax is expected, so the security scan
//! runs against a copy of the body with fenced code blocks and inline code
//! spans removed. The final sanitization pass, by contrast, runs against the
//! original document and is only applied once validation has succeeded.

mod frontmatter;
mod outline;
mod sanitize;

pub use outline::{extract_description, extract_tags, extract_title, reading_time_minutes};
pub use sanitize::sanitize_content;

use pulldown_cmark::{Options, Parser};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Hard cap on document size in bytes (1 MiB).
pub const MAX_FILE_SIZE: usize = 1024 * 1024;

/// Cap on decoded character length.
pub const MAX_CONTENT_LENGTH: usize = 500_000;

/// Outcome of a full validation run. `sanitized_content` is present only
/// when `is_valid` is true; a non-empty `errors` list implies invalidity.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub sanitized_content: Option<String>,
    pub frontmatter: Option<Map<String, Value>>,
}

/// Validate a markdown document, optionally checking its filename too.
#[must_use]
pub fn validate_markdown(content: &str, filename: Option<&str>) -> ValidationResult {
    let mut result = ValidationResult {
        is_valid: true,
        ..ValidationResult::default()
    };

    // Size failures abort the pipeline; nothing else is worth reporting for
    // a document we refuse to hold in memory as text.
    if !check_size(content, &mut result) {
        result.is_valid = false;
        return result;
    }

    let (metadata, body) = frontmatter::split(content);
    check_frontmatter(&metadata, &mut result);
    result.frontmatter = Some(metadata);

    check_security(body, &mut result);
    check_links(body, &mut result);
    run_markdown_parser(body);

    if let Some(filename) = filename {
        check_filename(filename, &mut result);
    }

    result.is_valid = result.errors.is_empty();
    if result.is_valid {
        result.sanitized_content = Some(sanitize::sanitize_content(content));
    }

    result
}

/// Cheap pre-check for fast-path gating: non-empty, under the size cap, and
/// free of the highest-severity patterns. Not a replacement for the full
/// pipeline.
///
/// # Errors
/// Returns a single message describing the first problem found.
pub fn quick_validate(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Content is empty".to_string());
    }
    if content.len() > MAX_FILE_SIZE {
        return Err("File too large".to_string());
    }

    static QUICK_DANGER: OnceLock<Regex> = OnceLock::new();
    let regex = QUICK_DANGER.get_or_init(|| {
        Regex::new(r"(?i)(<script|javascript:|data:text/html)")
            .expect("Failed to compile quick danger regex")
    });
    if regex.is_match(content) {
        return Err("Content contains potentially dangerous elements".to_string());
    }

    Ok(())
}

fn check_size(content: &str, result: &mut ValidationResult) -> bool {
    let size_in_bytes = content.len();
    if size_in_bytes > MAX_FILE_SIZE {
        result.errors.push(format!(
            "File too large: {}KB (max: {}KB)",
            size_in_bytes / 1024,
            MAX_FILE_SIZE / 1024
        ));
        return false;
    }

    let chars = content.chars().count();
    if chars > MAX_CONTENT_LENGTH {
        result.errors.push(format!(
            "Content too long: {chars} characters (max: {MAX_CONTENT_LENGTH})"
        ));
        return false;
    }

    if content.trim().is_empty() {
        result.errors.push("Content cannot be empty".to_string());
        return false;
    }

    true
}

/// Frontmatter keys that look like code injection are errors; everything
/// else about frontmatter shape is advisory only.
const DANGEROUS_FRONTMATTER_KEYS: [&str; 4] = ["script", "javascript", "eval", "function"];

fn check_frontmatter(metadata: &Map<String, Value>, result: &mut ValidationResult) {
    if let Some(title) = metadata.get("title") {
        if !title.is_string() {
            result
                .warnings
                .push("Frontmatter title should be a string".to_string());
        }
    }

    if let Some(order) = metadata.get("order") {
        let non_negative = order.as_f64().is_some_and(|n| n >= 0.0);
        if !non_negative {
            result
                .warnings
                .push("Frontmatter order should be a positive number".to_string());
        }
    }

    if let Some(hidden) = metadata.get("hidden") {
        if !hidden.is_boolean() {
            result
                .warnings
                .push("Frontmatter hidden should be a boolean".to_string());
        }
    }

    if let Some(tags) = metadata.get("tags") {
        if !tags.is_array() {
            result
                .warnings
                .push("Frontmatter tags should be an array".to_string());
        }
    }

    for key in DANGEROUS_FRONTMATTER_KEYS {
        if metadata.contains_key(key) {
            result
                .errors
                .push(format!("Dangerous frontmatter field: {key}"));
        }
    }
}

fn script_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("Failed to compile script tag regex")
    })
}

fn js_iframe_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)<iframe[^>]*src\s*=\s*["'][^"']*javascript:"#)
            .expect("Failed to compile iframe regex")
    })
}

fn object_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<object[^>]*>").expect("Failed to compile object regex"))
}

fn embed_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<embed[^>]*>").expect("Failed to compile embed regex"))
}

fn check_security(body: &str, result: &mut ValidationResult) {
    // Code spans are stripped first so documentation about dangerous syntax
    // does not trip the scan.
    let scannable = sanitize::strip_code_spans(body);

    let dangerous: [(&Regex, &str); 4] = [
        (script_tag_regex(), "Script tags are not allowed"),
        (js_iframe_regex(), "JavaScript iframes are not allowed"),
        (object_tag_regex(), "Object embeds are not allowed"),
        (embed_tag_regex(), "Embed tags are not allowed"),
    ];

    for (regex, message) in dangerous {
        if regex.is_match(&scannable) {
            result.errors.push(message.to_string());
        }
    }
}

const SUSPICIOUS_URL_SCHEMES: [&str; 4] = ["javascript:", "data:", "vbscript:", "file:"];

fn markdown_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").expect("Failed to compile markdown link regex")
    })
}

/// Links with executable or local schemes are flagged but never block
/// publication.
fn check_links(body: &str, result: &mut ValidationResult) {
    for capture in markdown_link_regex().captures_iter(body) {
        let Some(url) = capture.get(2).map(|m| m.as_str()) else {
            continue;
        };
        if is_suspicious_url(url) {
            result
                .warnings
                .push(format!("Potentially suspicious URL detected: {url}"));
        }
    }
}

fn is_suspicious_url(url: &str) -> bool {
    let lowered = url.trim_start().to_lowercase();
    SUSPICIOUS_URL_SCHEMES
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
}

/// Extensions enabled for every markdown parse in this crate.
pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Markdown syntax pass. The pull parser is lossless and cannot fail on any
/// input, so draining the event stream is the whole check; it exists so a
/// future parser swap keeps the pipeline stage in place.
fn run_markdown_parser(body: &str) {
    for _event in Parser::new_ext(body, parser_options()) {}
}

const INVALID_FILENAME_CHARS: [char; 7] = ['<', '>', ':', '"', '|', '?', '*'];
const MAX_FILENAME_CHARS: usize = 255;

fn check_filename(filename: &str, result: &mut ValidationResult) {
    if !filename.ends_with(".md") && !filename.ends_with(".markdown") {
        result
            .warnings
            .push("File should have .md or .markdown extension".to_string());
    }

    let has_invalid = filename
        .chars()
        .any(|c| c.is_control() || INVALID_FILENAME_CHARS.contains(&c));
    if has_invalid {
        result
            .errors
            .push("Filename contains invalid characters".to_string());
    }

    if filename.chars().count() > MAX_FILENAME_CHARS {
        result.errors.push("Filename is too long".to_string());
    }
}
