//! Leading YAML frontmatter extraction.

use serde_json::{Map, Value};

/// Split a leading `---` frontmatter block from the body.
///
/// Malformed YAML is tolerated: the block is still consumed but yields empty
/// metadata. A missing closing delimiter means the document never had
/// frontmatter, so the whole input is returned as the body.
pub(crate) fn split(content: &str) -> (Map<String, Value>, &str) {
    let after_open = match content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    {
        Some(rest) => rest,
        None => return (Map::new(), content),
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == "---" {
            let raw = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return (parse_mapping(raw), body);
        }
        offset += line.len();
    }

    (Map::new(), content)
}

fn parse_mapping(raw: &str) -> Map<String, Value> {
    match serde_yaml::from_str::<serde_yaml::Value>(raw) {
        Ok(serde_yaml::Value::Mapping(mapping)) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                let Some(key) = scalar_key(&key) else {
                    continue;
                };
                if let Ok(json) = serde_json::to_value(&value) {
                    map.insert(key, json);
                }
            }
            map
        }
        _ => Map::new(),
    }
}

/// Frontmatter keys are expected to be scalars; anything else is dropped.
fn scalar_key(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_without_frontmatter_is_all_body() {
        let (metadata, body) = split("# Title\n\nBody.\n");
        assert!(metadata.is_empty());
        assert_eq!(body, "# Title\n\nBody.\n");
    }

    #[test]
    fn frontmatter_is_parsed_and_removed_from_body() {
        let (metadata, body) = split("---\ntitle: Guide\norder: 2\n---\n# Heading\n");
        assert_eq!(metadata.get("title"), Some(&Value::from("Guide")));
        assert_eq!(metadata.get("order"), Some(&Value::from(2)));
        assert_eq!(body, "# Heading\n");
    }

    #[test]
    fn crlf_delimiters_are_accepted() {
        let (metadata, body) = split("---\r\ntitle: Guide\r\n---\r\nBody.\r\n");
        assert_eq!(metadata.get("title"), Some(&Value::from("Guide")));
        assert_eq!(body, "Body.\r\n");
    }

    #[test]
    fn malformed_yaml_yields_empty_metadata_not_failure() {
        let (metadata, body) = split("---\n: [unbalanced\n---\nBody.\n");
        assert!(metadata.is_empty());
        assert_eq!(body, "Body.\n");
    }

    #[test]
    fn missing_closing_delimiter_means_no_frontmatter() {
        let content = "---\ntitle: Guide\nBody without closing fence.\n";
        let (metadata, body) = split(content);
        assert!(metadata.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn non_mapping_yaml_yields_empty_metadata() {
        let (metadata, body) = split("---\n- just\n- a\n- list\n---\nBody.\n");
        assert!(metadata.is_empty());
        assert_eq!(body, "Body.\n");
    }

    #[test]
    fn empty_block_yields_empty_metadata() {
        let (metadata, body) = split("---\n---\nBody.\n");
        assert!(metadata.is_empty());
        assert_eq!(body, "Body.\n");
    }
}
