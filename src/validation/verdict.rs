use serde::Deserialize;
use serde_json::Value;

/// Outcome of one quality check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub reason: Option<String>,
    /// The model's answer could not be read; `is_valid` is then `false`.
    pub malformed: bool,
}

#[derive(Deserialize)]
struct RawVerdict {
    is_valid: bool,
    #[serde(default)]
    reason: Option<Value>,
}

/// Any `reason` is kept: strings as-is, other JSON values as their JSON text.
fn reason_text(reason: Option<Value>) -> Option<String> {
    match reason? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

impl ValidationVerdict {
    pub fn valid(reason: Option<String>) -> Self {
        Self {
            is_valid: true,
            reason,
            malformed: false,
        }
    }

    pub fn invalid(reason: Option<String>) -> Self {
        Self {
            is_valid: false,
            reason,
            malformed: false,
        }
    }

    fn malformed(detail: String) -> Self {
        Self {
            is_valid: false,
            reason: Some(format!("validator returned an unreadable answer: {}", detail)),
            malformed: true,
        }
    }

    /// Reads a model answer of the form `{"is_valid": bool, "reason": "..."}`.
    ///
    /// `is_valid` must be a JSON boolean. Anything else, including a missing
    /// field or non-JSON text, yields a malformed negative verdict. `reason`
    /// is never a cause for rejection.
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<RawVerdict>(strip_code_fence(text)) {
            Ok(raw) if raw.is_valid => Self::valid(reason_text(raw.reason)),
            Ok(raw) => Self::invalid(reason_text(raw.reason)),
            Err(e) => Self::malformed(e.to_string()),
        }
    }
}

/// Models in JSON mode still sometimes wrap the object in a markdown fence.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
