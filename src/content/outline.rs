//! Derived document metadata: title, description, tags, and reading time.
//!
//! These helpers feed the content endpoint's response enrichment. They never
//! fail; absent or malformed input degrades to a sensible fallback.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use serde_json::Value;

use super::{frontmatter, parser_options};

const DEFAULT_TITLE: &str = "Untitled";
const WORDS_PER_MINUTE: usize = 200;

/// Document title: frontmatter `title`, else the first top-level heading,
/// else a cleaned-up filename stem.
#[must_use]
pub fn extract_title(content: &str, filename: Option<&str>) -> String {
    let (metadata, body) = frontmatter::split(content);

    if let Some(Value::String(title)) = metadata.get("title") {
        let trimmed = title.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    if let Some(heading) = first_h1(body) {
        return heading;
    }

    filename.map_or_else(|| DEFAULT_TITLE.to_string(), title_from_filename)
}

fn first_h1(body: &str) -> Option<String> {
    let mut in_h1 = false;
    let mut text = String::new();

    for event in Parser::new_ext(body, parser_options()) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => in_h1 = true,
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
                in_h1 = false;
                text.clear();
            }
            Event::Text(chunk) | Event::Code(chunk) => {
                if in_h1 {
                    text.push_str(&chunk);
                }
            }
            _ => {}
        }
    }

    None
}

fn title_from_filename(filename: &str) -> String {
    let stem = filename
        .rsplit('/')
        .next()
        .unwrap_or(filename)
        .trim_end_matches(".markdown")
        .trim_end_matches(".md");
    if stem.is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    stem.replace(['-', '_'], " ")
}

/// Plain-text description truncated near `max_length` characters at a word
/// boundary. Headings are skipped; inline markup is flattened.
#[must_use]
pub fn extract_description(content: &str, max_length: usize) -> String {
    let (_, body) = frontmatter::split(content);

    let mut plain = String::new();
    let mut in_heading = false;
    for event in Parser::new_ext(body, parser_options()) {
        match event {
            Event::Start(Tag::Heading { .. }) => in_heading = true,
            Event::End(TagEnd::Heading(_)) => in_heading = false,
            Event::Text(chunk) | Event::Code(chunk) => {
                if !in_heading {
                    let chunk = chunk.trim();
                    if !chunk.is_empty() {
                        if !plain.is_empty() {
                            plain.push(' ');
                        }
                        plain.push_str(chunk);
                    }
                }
            }
            _ => {}
        }
    }

    if plain.chars().count() <= max_length {
        return plain;
    }

    let truncated: String = plain.chars().take(max_length).collect();
    match truncated.rfind(' ') {
        // Only back up to the word boundary when it is near the cut point.
        Some(idx) if idx * 5 > truncated.len() * 4 => format!("{}...", &truncated[..idx]),
        _ => format!("{truncated}..."),
    }
}

/// String tags from frontmatter, trimmed; non-string entries are dropped.
#[must_use]
pub fn extract_tags(content: &str) -> Vec<String> {
    let (metadata, _) = frontmatter::split(content);
    match metadata.get("tags") {
        Some(Value::Array(tags)) => tags
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Estimated reading time in whole minutes, never below one.
#[must_use]
pub fn reading_time_minutes(content: &str) -> u32 {
    let (_, body) = frontmatter::split(content);
    let words = body.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_prefers_frontmatter() {
        let doc = "---\ntitle: From Frontmatter\n---\n# From Heading\n";
        assert_eq!(extract_title(doc, Some("file.md")), "From Frontmatter");
    }

    #[test]
    fn title_falls_back_to_first_heading() {
        let doc = "# Getting `Started`\n\nBody.\n";
        assert_eq!(extract_title(doc, Some("file.md")), "Getting Started");
    }

    #[test]
    fn title_falls_back_to_filename_stem() {
        assert_eq!(
            extract_title("plain body", Some("docs/getting-started_guide.md")),
            "getting started guide"
        );
    }

    #[test]
    fn title_defaults_when_nothing_available() {
        assert_eq!(extract_title("plain body", None), "Untitled");
    }

    #[test]
    fn non_string_frontmatter_title_is_ignored() {
        let doc = "---\ntitle: 42\n---\n# Real Title\n";
        assert_eq!(extract_title(doc, None), "Real Title");
    }

    #[test]
    fn description_flattens_markup_and_skips_headings() {
        let doc = "# Skip Me\n\nSome **bold** and [linked](https://example.com) text.\n";
        let description = extract_description(doc, 160);
        assert!(!description.contains("Skip Me"));
        assert!(description.contains("bold"));
        assert!(description.contains("linked"));
        assert!(!description.contains("**"));
        assert!(!description.contains("https://example.com"));
    }

    #[test]
    fn description_truncates_at_word_boundary() {
        let doc = "word ".repeat(100);
        let description = extract_description(&doc, 60);
        assert!(description.ends_with("..."));
        assert!(description.chars().count() <= 63);
        assert!(!description.contains("wor..."));
    }

    #[test]
    fn short_description_is_untruncated() {
        assert_eq!(extract_description("Short body.", 160), "Short body.");
    }

    #[test]
    fn tags_come_from_frontmatter_strings_only() {
        let doc = "---\ntags: [\" rust \", 42, \"docs\", \"\"]\n---\nBody.\n";
        assert_eq!(extract_tags(doc), vec!["rust", "docs"]);
    }

    #[test]
    fn missing_tags_yield_empty_list() {
        assert_eq!(extract_tags("Body only."), Vec::<String>::new());
    }

    #[test]
    fn reading_time_rounds_up_and_floors_at_one() {
        assert_eq!(reading_time_minutes("a few words here"), 1);
        let long = "word ".repeat(401);
        assert_eq!(reading_time_minutes(&long), 3);
    }
}
