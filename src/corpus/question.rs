use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::QUESTION_FIELD;

/// One corpus record.
///
/// Only the `Question` field is interpreted; every other field is carried
/// through to responses untouched. Identity is the record's position in the
/// fetched list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Question(Map<String, Value>);

impl Question {
    /// A record holding only a `Question` field.
    pub fn from_text(text: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(QUESTION_FIELD.to_string(), Value::String(text.into()));
        Self(fields)
    }

    /// The raw `Question` text, or `""` if the field is absent or not a string.
    pub fn text(&self) -> &str {
        self.0
            .get(QUESTION_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn with_field(mut self, field: impl Into<String>, value: Value) -> Self {
        self.0.insert(field.into(), value);
        self
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Question {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Decodes a fetched body: a JSON array whose every element is an object.
///
/// Returns `None` for any other shape.
pub fn parse_corpus(value: Value) -> Option<Vec<Question>> {
    let Value::Array(items) = value else {
        return None;
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(fields) => Some(Question(fields)),
            _ => None,
        })
        .collect()
}
