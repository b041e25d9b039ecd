//! Replacement map - what a tag name resolves to
//!
//! A name maps either to a literal string or to a producer that computes a
//! string from the tag's arguments.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::ReplacerError;

/// Value-producing function. Receives the tag's `:` arguments, or `None`
/// when the tag had no argument suffix.
pub type Producer = Arc<dyn Fn(Option<&[String]>) -> String + Send + Sync>;

/// What a tag name resolves to
#[derive(Clone)]
pub enum Replacement {
    /// Used verbatim; tag arguments are ignored
    Literal(String),
    /// Invoked once per tag occurrence
    Producer(Producer),
}

impl Replacement {
    pub fn producer<F>(f: F) -> Self
    where
        F: Fn(Option<&[String]>) -> String + Send + Sync + 'static,
    {
        Replacement::Producer(Arc::new(f))
    }

    /// Compute the value for one tag occurrence
    pub fn evaluate(&self, args: Option<&[String]>) -> String {
        match self {
            Replacement::Literal(s) => s.clone(),
            Replacement::Producer(f) => f(args),
        }
    }
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Literal(s) => f.debug_tuple("Literal").field(s).finish(),
            Replacement::Producer(_) => f.write_str("Producer(<fn>)"),
        }
    }
}

impl From<String> for Replacement {
    fn from(s: String) -> Self {
        Replacement::Literal(s)
    }
}

impl From<&str> for Replacement {
    fn from(s: &str) -> Self {
        Replacement::Literal(s.to_string())
    }
}

/// Caller-owned name → replacement mapping. Never mutated by the engine.
#[derive(Debug, Clone, Default)]
pub struct ReplacementMap {
    entries: HashMap<String, Replacement>,
}

impl ReplacementMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Replacement>) -> &mut Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    /// Builder-style literal entry
    pub fn with_literal(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries
            .insert(name.into(), Replacement::Literal(value.into()));
        self
    }

    /// Builder-style producer entry
    pub fn with_producer<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Option<&[String]>) -> String + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Replacement::producer(f));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Replacement> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a map from a JSON object.
    ///
    /// String values become literals. Other values have no string form and
    /// are skipped, so tags naming them resolve to empty.
    pub fn from_json(value: Value) -> Result<Self, ReplacerError> {
        let object = match value {
            Value::Object(map) => map,
            other => {
                return Err(ReplacerError::InvalidReplacementMap {
                    found: json_type(&other).to_string(),
                })
            }
        };

        let mut map = Self::new();
        for (name, value) in object {
            match value {
                Value::String(s) => {
                    map.insert(name, s);
                }
                other => {
                    debug!(name = %name, kind = json_type(&other), "skipping non-string replacement");
                }
            }
        }
        Ok(map)
    }
}

impl<K, V> FromIterator<(K, V)> for ReplacementMap
where
    K: Into<String>,
    V: Into<Replacement>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Extend<(String, Replacement)> for ReplacementMap {
    fn extend<I: IntoIterator<Item = (String, Replacement)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn literal_ignores_args() {
        let r = Replacement::from("V");
        let args = vec!["1".to_string(), "2".to_string()];
        assert_eq!(r.evaluate(Some(&args)), "V");
        assert_eq!(r.evaluate(None), "V");
    }

    #[test]
    fn producer_receives_args() {
        let r = Replacement::producer(|args| match args {
            Some(a) => a.join("-"),
            None => "none".to_string(),
        });
        let args = vec!["a".to_string(), "b".to_string()];
        assert_eq!(r.evaluate(Some(&args)), "a-b");
        assert_eq!(r.evaluate(None), "none");
    }

    #[test]
    fn from_iter_builds_literals() {
        let map: ReplacementMap = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(map.len(), 2);
        assert!(matches!(map.get("a"), Some(Replacement::Literal(s)) if s == "1"));
    }

    #[test]
    fn from_json_keeps_only_strings() {
        let map = ReplacementMap::from_json(json!({
            "name": "Ada",
            "age": 36,
            "tags": ["x"],
        }))
        .unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains("name"));
        assert!(!map.contains("age"));
    }

    #[test]
    fn from_json_rejects_non_object() {
        let err = ReplacementMap::from_json(json!(["a"])).unwrap_err();
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn debug_hides_producer_body() {
        let r = Replacement::producer(|_| String::new());
        assert_eq!(format!("{r:?}"), "Producer(<fn>)");
    }
}
