//! Field definitions for blueprints.

use serde::{Deserialize, Serialize};

use crate::data::Value;

/// The declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Any value is accepted
    #[default]
    Any,
    Text,
    /// Text that must look like an e-mail address
    Email,
    /// Text holding a plaintext password; never persisted by user records
    Password,
    Bool,
    Int,
    /// Floating point; integers are accepted too
    Float,
    List,
    /// A nested mapping whose whole sub-tree belongs to this field
    Map,
}

impl FieldType {
    /// Name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Any => "any",
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Password => "password",
            FieldType::Bool => "bool",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::List => "list",
            FieldType::Map => "map",
        }
    }

    /// Returns true if `value` has a shape this type accepts.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            FieldType::Any => true,
            FieldType::Text | FieldType::Email | FieldType::Password => {
                matches!(value, Value::Text(_))
            }
            FieldType::Bool => matches!(value, Value::Bool(_)),
            FieldType::Int => matches!(value, Value::Int(_)),
            FieldType::Float => matches!(value, Value::Float(_) | Value::Int(_)),
            FieldType::List => matches!(value, Value::List(_)),
            FieldType::Map => matches!(value, Value::Map(_)),
        }
    }
}

/// How a field combines an existing value with an incoming one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Mappings merge key by key, recursively
    Deep,
    /// The incoming value overwrites the existing one
    Replace,
    /// Lists keep existing items and add incoming items not already present
    Append,
}

/// A single field declaration.
///
/// `name` is a dot path; declaring `"access.admin.login"` implicitly makes
/// `access` and `access.admin` parents that merge recursively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,

    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge: Option<MergeStrategy>,

    #[serde(default)]
    pub required: bool,

    /// Regular expression the whole text value must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Allowed values; empty means unrestricted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl Field {
    /// Declares a field of the given type with no constraints.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            default: None,
            merge: None,
            required: false,
            pattern: None,
            options: Vec::new(),
            min_length: None,
            max_length: None,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text)
    }

    pub fn map(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Map)
    }

    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::List)
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_merge(mut self, strategy: MergeStrategy) -> Self {
        self.merge = Some(strategy);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_options<V: Into<Value>>(mut self, options: impl IntoIterator<Item = V>) -> Self {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    /// The strategy used when merging into this field.
    pub fn merge_strategy(&self) -> MergeStrategy {
        self.merge.unwrap_or(match self.field_type {
            FieldType::Map | FieldType::Any => MergeStrategy::Deep,
            _ => MergeStrategy::Replace,
        })
    }
}
