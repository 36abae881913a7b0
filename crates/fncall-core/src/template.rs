//! Placeholder interpolation and payload expression resolution.

use serde_json::{Map, Value as JsonValue};

/// Per-call binding of argument name to supplied value.
pub type ValueMap = Map<String, JsonValue>;

/// Replace every `{{key}}` occurrence with the mapped value's string form.
///
/// A key absent from the mapping leaves the placeholder text untouched, so
/// partially-bound templates stay inspectable instead of failing.
pub fn interpolate(template: &str, values: &ValueMap) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) if is_identifier(&after[..end]) => {
                let key = &after[..end];
                match values.get(key) {
                    Some(value) => out.push_str(&display_value(value)),
                    None => {
                        out.push_str("{{");
                        out.push_str(key);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            _ => {
                // Not a placeholder; emit the braces and keep scanning.
                out.push_str("{{");
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Payload template values form a small expression grammar: a non-string
/// value is a literal, a string naming a bound argument (braces optional) is
/// a reference, anything else is a textual template.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadExpr {
    Literal(JsonValue),
    Reference(String),
    Template(String),
}

impl PayloadExpr {
    /// Classify one payload template value against the bound argument names.
    pub fn classify(value: &JsonValue, bound: &ValueMap) -> Self {
        match value {
            JsonValue::String(text) => {
                let stripped = text.strip_prefix('{').unwrap_or(text);
                let stripped = stripped.strip_suffix('}').unwrap_or(stripped);
                if bound.contains_key(stripped) {
                    Self::Reference(stripped.to_string())
                } else {
                    Self::Template(text.clone())
                }
            }
            other => Self::Literal(other.clone()),
        }
    }
}

/// Resolve a payload template into the request body object.
///
/// Keys are themselves interpolated. References substitute the raw typed
/// argument value; templates substitute-and-stringify; literals pass through
/// unchanged.
pub fn resolve_payload(template: &Map<String, JsonValue>, bound: &ValueMap) -> Map<String, JsonValue> {
    let mut payload = Map::new();
    for (key, value) in template {
        let key = interpolate(key, bound);
        let resolved = match PayloadExpr::classify(value, bound) {
            PayloadExpr::Reference(name) => bound.get(&name).cloned().unwrap_or(JsonValue::Null),
            PayloadExpr::Template(text) => JsonValue::String(interpolate(&text, bound)),
            PayloadExpr::Literal(value) => value,
        };
        payload.insert(key, resolved);
    }
    payload
}

/// String form used inside textual templates: strings bare, everything else
/// as its JSON rendering.
fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bound(pairs: &[(&str, JsonValue)]) -> ValueMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn substitutes_mapped_keys() {
        let values = bound(&[("x", json!(5)), ("y", json!("a"))]);
        assert_eq!(interpolate("id={{x}}&y={{y}}", &values), "id=5&y=a");
    }

    #[test]
    fn missing_key_leaves_placeholder() {
        assert_eq!(interpolate("hello {{name}}", &ValueMap::new()), "hello {{name}}");
    }

    #[test]
    fn non_identifier_braces_pass_through() {
        let values = bound(&[("a", json!(1))]);
        assert_eq!(interpolate("{{a b}} {{}} {{a}}", &values), "{{a b}} {{}} 1");
    }

    #[test]
    fn stringifies_non_string_values() {
        let values = bound(&[
            ("n", json!(2.5)),
            ("flag", json!(true)),
            ("list", json!([1, 2])),
            ("obj", json!({"k": "v"})),
        ]);
        assert_eq!(
            interpolate("{{n}} {{flag}} {{list}} {{obj}}", &values),
            r#"2.5 true [1,2] {"k":"v"}"#
        );
    }

    #[test]
    fn classifies_references_templates_and_literals() {
        let values = bound(&[("amount", json!([1, 2, 3]))]);

        assert_eq!(
            PayloadExpr::classify(&json!("{amount}"), &values),
            PayloadExpr::Reference("amount".to_string())
        );
        assert_eq!(
            PayloadExpr::classify(&json!("amount"), &values),
            PayloadExpr::Reference("amount".to_string())
        );
        assert_eq!(
            PayloadExpr::classify(&json!("total: {{amount}}"), &values),
            PayloadExpr::Template("total: {{amount}}".to_string())
        );
        assert_eq!(
            PayloadExpr::classify(&json!(7), &values),
            PayloadExpr::Literal(json!(7))
        );
    }

    #[test]
    fn reference_substitutes_raw_typed_value() {
        let mut template = Map::new();
        template.insert("ids".to_string(), json!("{amount}"));
        let values = bound(&[("amount", json!([1, 2, 3]))]);

        let payload = resolve_payload(&template, &values);
        assert_eq!(payload["ids"], json!([1, 2, 3]));
    }

    #[test]
    fn template_value_substitutes_and_stringifies() {
        let mut template = Map::new();
        template.insert("note".to_string(), json!("total: {{amount}}"));
        let values = bound(&[("amount", json!(5))]);

        let payload = resolve_payload(&template, &values);
        assert_eq!(payload["note"], json!("total: 5"));
    }

    #[test]
    fn literal_values_pass_through_unchanged() {
        let mut template = Map::new();
        template.insert("version".to_string(), json!(2));
        template.insert("nested".to_string(), json!({"keep": ["me"]}));
        let values = bound(&[("unused", json!("x"))]);

        let payload = resolve_payload(&template, &values);
        assert_eq!(payload["version"], json!(2));
        assert_eq!(payload["nested"], json!({"keep": ["me"]}));
    }

    #[test]
    fn payload_keys_are_interpolated() {
        let mut template = Map::new();
        template.insert("{{field}}".to_string(), json!("{value}"));
        let values = bound(&[("field", json!("title")), ("value", json!("Ahoy"))]);

        let payload = resolve_payload(&template, &values);
        assert_eq!(payload["title"], json!("Ahoy"));
    }
}
