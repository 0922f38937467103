use serde_json::Value;

/// Containers nested deeper than this are left out of the search text
pub const MAX_DATA_DEPTH: usize = 8;

/// Flatten a breadcrumb's `data` payload into compact JSON-like text for
/// substring search.
///
/// The walk is driven purely by the value's shape: keys are written as
/// text, whatever they are called, and nothing is ever looked up on the
/// payload to decide how to print it. Containers beyond [`MAX_DATA_DEPTH`]
/// are omitted together with their key; everything else is kept.
pub fn data_search_text(value: &Value) -> String {
    let mut out = String::new();
    if !value.is_null() {
        write_value(value, 0, &mut out);
    }
    out
}

/// Returns false when the value was omitted
fn write_value(value: &Value, depth: usize, out: &mut String) -> bool {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => {
            out.push('"');
            out.push_str(s);
            out.push('"');
        }
        Value::Array(items) => {
            if depth >= MAX_DATA_DEPTH {
                return false;
            }
            out.push('[');
            let mut first = true;
            for item in items {
                let mark = out.len();
                if !first {
                    out.push(',');
                }
                if write_value(item, depth + 1, out) {
                    first = false;
                } else {
                    out.truncate(mark);
                }
            }
            out.push(']');
        }
        Value::Object(map) => {
            if depth >= MAX_DATA_DEPTH {
                return false;
            }
            out.push('{');
            let mut first = true;
            for (key, item) in map {
                let mark = out.len();
                if !first {
                    out.push(',');
                }
                out.push('"');
                out.push_str(key);
                out.push_str("\":");
                if write_value(item, depth + 1, out) {
                    first = false;
                } else {
                    out.truncate(mark);
                }
            }
            out.push('}');
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_string_key_is_plain_data() {
        let text = data_search_text(&json!({"nested": {"toString": "hello"}}));
        assert_eq!(text, r#"{"nested":{"toString":"hello"}}"#);
    }

    #[test]
    fn test_scalars_and_arrays() {
        let text = data_search_text(&json!({"url": "/api", "status": 200, "ok": true, "tags": ["a", null]}));
        assert!(text.contains(r#""url":"/api""#));
        assert!(text.contains(r#""status":200"#));
        assert!(text.contains(r#""tags":["a",null]"#));
    }

    #[test]
    fn test_null_payload_is_empty() {
        assert_eq!(data_search_text(&Value::Null), "");
    }

    #[test]
    fn test_depth_bound_omits_only_the_deep_branch() {
        let mut deep = json!("bottom");
        for _ in 0..(MAX_DATA_DEPTH + 2) {
            deep = json!({ "level": deep });
        }
        let text = data_search_text(&json!({"keep": "me", "deep": deep}));

        assert!(text.contains(r#""keep":"me""#));
        assert!(!text.contains("bottom"));
    }

    #[test]
    fn test_omitted_first_entry_leaves_no_stray_comma() {
        // The innermost array sits at the last allowed depth, so its first
        // element (another array) falls past the bound.
        let wrappers = MAX_DATA_DEPTH - 1;
        let mut value = json!([[1], "x"]);
        for _ in 0..wrappers {
            value = json!([value]);
        }
        let text = data_search_text(&value);
        assert_eq!(
            text,
            format!("{}[\"x\"]{}", "[".repeat(wrappers), "]".repeat(wrappers))
        );
    }
}
