//! Defensive JSON span extraction
//!
//! The model is instructed to answer with a single JSON object but is
//! not trusted to emit *only* JSON: replies arrive wrapped in prose,
//! markdown fences, or with trailing commentary. The scanner locates
//! the first balanced brace-delimited span, ignoring braces inside
//! string literals.

/// Return the first balanced `{...}` span in `raw`, or `None` when no
/// complete object exists.
pub fn first_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in raw[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse the first JSON object in `raw` into `T`. `None` on a missing
/// span or a shape mismatch — callers fall back to their documented
/// degraded behavior.
pub fn parse_first_object<T: serde::de::DeserializeOwned>(raw: &str) -> Option<T> {
    let span = first_json_object(raw)?;
    match serde_json::from_str(span) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "JSON span did not match expected shape");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_object() {
        assert_eq!(first_json_object(r#"{"a": 1}"#), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn test_fenced_object() {
        let raw = "```json\n{\"intent\": \"x\"}\n```";
        assert_eq!(first_json_object(raw), Some(r#"{"intent": "x"}"#));
    }

    #[test]
    fn test_prose_around_object() {
        let raw = "Voici ma réponse : {\"a\": {\"b\": 2}} j'espère que cela aide.";
        assert_eq!(first_json_object(raw), Some(r#"{"a": {"b": 2}}"#));
    }

    #[test]
    fn test_braces_inside_strings_ignored() {
        let raw = r#"{"text": "un { seul } objet"} reste"#;
        assert_eq!(first_json_object(raw), Some(r#"{"text": "un { seul } objet"}"#));
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let raw = r#"{"text": "dit \"bonjour\" {"}"#;
        assert_eq!(first_json_object(raw), Some(raw));
    }

    #[test]
    fn test_unterminated_object() {
        assert_eq!(first_json_object(r#"{"a": 1"#), None);
        assert_eq!(first_json_object("pas de json ici"), None);
    }

    #[test]
    fn test_parse_first_object() {
        #[derive(serde::Deserialize)]
        struct Reply {
            intent: String,
        }
        let reply: Option<Reply> = parse_first_object("ok ```{\"intent\": \"transfert\"}```");
        assert_eq!(reply.unwrap().intent, "transfert");

        let missing: Option<Reply> = parse_first_object(r#"{"confidence": 0.5}"#);
        assert!(missing.is_none());
    }
}
