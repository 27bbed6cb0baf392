use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::CallType;

/// Key under which the provider nests agent-defined extraction fields
pub const CUSTOM_DATA_KEY: &str = "custom_analysis_data";

/// Provider-generated analysis of a call, keyed by field name
///
/// Key names are provider-defined and may be missing or carry unexpected
/// types. Every accessor treats such values as undefined rather than
/// failing, so callers can fall back field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct StructuredAnalysis {
    fields: Map<String, Value>,
}

impl From<Map<String, Value>> for StructuredAnalysis {
    fn from(mut fields: Map<String, Value>) -> Self {
        // Nested custom fields win over top-level keys of the same name
        if let Some(Value::Object(custom)) = fields.remove(CUSTOM_DATA_KEY) {
            for (key, value) in custom {
                fields.insert(key, value);
            }
        }
        Self { fields }
    }
}

impl From<StructuredAnalysis> for Map<String, Value> {
    fn from(analysis: StructuredAnalysis) -> Self {
        analysis.fields
    }
}

impl StructuredAnalysis {
    /// Accept an arbitrary JSON value, keeping it only if it is an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::from(map)),
            Value::Null => None,
            other => {
                warn!("Discarding call analysis that is not an object: {}", other);
                None
            }
        }
    }

    /// True when no key carries a non-null value
    pub fn is_empty(&self) -> bool {
        self.fields.values().all(Value::is_null)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Raw value for a key, with `null` treated as absent
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// String value for a key
    ///
    /// Strings are returned verbatim, blank ones included. Numbers and
    /// booleans are stringified. Arrays and objects are ignored.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => {
                debug!("Ignoring non-primitive analysis value for {}: {}", key, other);
                None
            }
        }
    }

    /// Boolean value for a key, accepting common string and numeric spellings
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|f| f != 0.0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" | "1" => Some(true),
                "false" | "no" | "n" | "0" => Some(false),
                _ => {
                    debug!("Ignoring unrecognised boolean for {}: {:?}", key, s);
                    None
                }
            },
            other => {
                debug!("Ignoring non-primitive analysis value for {}: {}", key, other);
                None
            }
        }
    }

    /// Explicit call category, if the provider named one
    ///
    /// Only `emergency` selects the emergency path; any other label is normal.
    /// A blank label names no category.
    pub fn call_type(&self) -> Option<CallType> {
        let label = self.text("call_type").filter(|l| !l.trim().is_empty());
        label.map(|label| {
            if label.trim().eq_ignore_ascii_case("emergency") {
                CallType::Emergency
            } else {
                CallType::Normal
            }
        })
    }
}

/// Everything the extractor consumes for one call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCallInput {
    /// Plain-text transcript, possibly empty
    pub transcript: String,
    /// Optional provider analysis
    pub structured_analysis: Option<StructuredAnalysis>,
}

impl RawCallInput {
    pub fn new(
        transcript: impl Into<String>,
        structured_analysis: Option<StructuredAnalysis>,
    ) -> Self {
        Self {
            transcript: transcript.into(),
            structured_analysis,
        }
    }

    /// Analysis worth trusting: present and non-empty
    pub fn usable_analysis(&self) -> Option<&StructuredAnalysis> {
        self.structured_analysis.as_ref().filter(|a| !a.is_empty())
    }
}
