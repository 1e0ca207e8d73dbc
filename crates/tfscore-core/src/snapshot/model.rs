use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared infrastructure state for one subject.
///
/// Only the parts the rubric reads are modelled; every other field of the
/// state document is ignored during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub resources: Vec<DeclaredResource>,
}

/// One `resources[]` entry: a type tag plus its instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclaredResource {
    #[serde(rename = "type")]
    pub kind: String,

    /// Resource address name (informational only).
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub instances: Vec<Instance>,
}

impl DeclaredResource {
    /// Attributes of the first instance, if any.
    ///
    /// The rubric expects every graded resource to be declared once, so
    /// only the first instance is considered.
    pub fn primary_attributes(&self) -> Option<&AttributeSet> {
        self.instances.first().map(|i| &i.attributes)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Instance {
    #[serde(default)]
    pub attributes: AttributeSet,
}

/// Attribute mapping of a single resource instance.
///
/// Lookups use JSON pointers (`/bandwidth/0/name`) so nested sets and
/// sequences are reached the same way as top-level keys. A missing key is
/// a normal state and simply yields `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSet(Value);

impl Default for AttributeSet {
    fn default() -> Self {
        Self(Value::Object(serde_json::Map::new()))
    }
}

impl From<Value> for AttributeSet {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl AttributeSet {
    pub fn lookup(&self, pointer: &str) -> Option<&Value> {
        self.0.pointer(pointer)
    }

    /// String value at `pointer`; non-string values are treated as absent.
    pub fn lookup_str(&self, pointer: &str) -> Option<&str> {
        self.lookup(pointer).and_then(Value::as_str)
    }
}
