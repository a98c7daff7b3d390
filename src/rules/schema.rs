//! Serde schema for the rule document.
//!
//! The on-disk document is JSON with three top-level entries: a mapping
//! whose keys are prepend phrases, a mapping whose keys are append
//! phrases, and an ordered list of replacement rule records. Mapping
//! values are ignored; key order is the pool order, so the mappings
//! deserialize into [`IndexMap`].

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Top-level rule document.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RuleDocument {
    /// Prepend phrase pool; keys only, declaration order preserved.
    #[serde(default)]
    pub prepended_words: IndexMap<String, Value>,

    /// Append phrase pool; keys only, declaration order preserved.
    #[serde(default)]
    pub appended_words: IndexMap<String, Value>,

    /// Replacement rules in priority order.
    #[serde(default)]
    pub word_replacements: Vec<RuleRecord>,
}

/// One replacement rule as written in the document.
///
/// Every field is optional; absent fields default to empty/zero.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RuleRecord {
    /// Fire probability denominator; falsy values collapse to 1.
    #[serde(default)]
    pub chance: Option<Value>,

    /// Number of prepended adjectives to draw.
    #[serde(default)]
    pub prepend_count: Option<Value>,

    /// Adjective candidates for the prepend draw.
    #[serde(default)]
    pub replacement_prepend: Vec<String>,

    /// Singular replacement candidates.
    #[serde(default)]
    pub replacement: Vec<String>,

    /// Plural replacement candidates.
    #[serde(default)]
    pub replacement_plural: Vec<String>,

    /// Singular trigger words.
    #[serde(default)]
    pub word: Vec<String>,

    /// Plural trigger words.
    #[serde(default)]
    pub word_plural: Vec<String>,

    /// Optional previous-word gate.
    #[serde(default)]
    pub prev: Vec<String>,
}

/// Coerces a loosely-typed numeric field to `u64`.
///
/// Falsy values (absent, `null`, `0`, `""`, `false`) collapse to the
/// default. Numbers and numeric strings are accepted; anything else
/// falls back to the default with a warning, so a sloppy document can
/// never abort the load.
pub(crate) fn coerce_count(field: &str, value: Option<&Value>, default: u64) -> u64 {
    let Some(value) = value else { return default };
    match value {
        Value::Null | Value::Bool(false) => default,
        Value::Number(n) => n.as_u64().filter(|&n| n != 0).unwrap_or(default),
        Value::String(s) => {
            if s.is_empty() {
                return default;
            }
            match s.parse::<u64>() {
                Ok(0) => default,
                Ok(n) => n,
                Err(_) => {
                    warn!(field, value = %s, "non-numeric value in rule document, using default");
                    default
                }
            }
        }
        other => {
            warn!(field, value = %other, "unexpected value type in rule document, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerce_absent_uses_default() {
        assert_eq!(coerce_count("chance", None, 1), 1);
        assert_eq!(coerce_count("prepend_count", None, 0), 0);
    }

    #[test]
    fn coerce_falsy_collapses_to_default() {
        assert_eq!(coerce_count("chance", Some(&json!(null)), 1), 1);
        assert_eq!(coerce_count("chance", Some(&json!(0)), 1), 1);
        assert_eq!(coerce_count("chance", Some(&json!("")), 1), 1);
        assert_eq!(coerce_count("chance", Some(&json!(false)), 1), 1);
    }

    #[test]
    fn coerce_accepts_numbers_and_numeric_strings() {
        assert_eq!(coerce_count("chance", Some(&json!(4)), 1), 4);
        assert_eq!(coerce_count("chance", Some(&json!("12")), 1), 12);
    }

    #[test]
    fn coerce_rejects_garbage_without_panicking() {
        assert_eq!(coerce_count("chance", Some(&json!("many")), 1), 1);
        assert_eq!(coerce_count("chance", Some(&json!([1, 2])), 1), 1);
        assert_eq!(coerce_count("chance", Some(&json!(-3)), 1), 1);
    }

    #[test]
    fn document_defaults_are_empty() {
        let doc: RuleDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.prepended_words.is_empty());
        assert!(doc.appended_words.is_empty());
        assert!(doc.word_replacements.is_empty());
    }

    #[test]
    fn record_fields_all_optional() {
        let rec: RuleRecord = serde_json::from_str(r#"{"word": ["horse"]}"#).unwrap();
        assert_eq!(rec.word, vec!["horse"]);
        assert!(rec.chance.is_none());
        assert!(rec.replacement.is_empty());
        assert!(rec.prev.is_empty());
    }

    #[test]
    fn pool_order_follows_document() {
        let doc: RuleDocument = serde_json::from_str(
            r#"{"prepended_words": {"zounds": 1, "alack": 1, "hark": 1}}"#,
        )
        .unwrap();
        let keys: Vec<&String> = doc.prepended_words.keys().collect();
        assert_eq!(keys, ["zounds", "alack", "hark"]);
    }
}
