//! Blueprints: schemas describing a record type's fields.
//!
//! A [`Blueprint`] declares which fields a record may hold, their defaults,
//! their validation constraints and how incoming data merges into existing
//! data. Field names are dot paths into a [`Properties`] tree.
//!
//! ```
//! use tessera::blueprint::{Blueprint, Field, MergeStrategy};
//! use tessera::data::Properties;
//!
//! let blueprint = Blueprint::builder("account")
//!     .field(Field::text("state").with_default("enabled"))
//!     .field(Field::map("access"))
//!     .field(Field::list("tags").with_merge(MergeStrategy::Append))
//!     .build()?;
//!
//! let old = Properties::from_json(r#"{"access": {"site": {"login": true}}, "tags": ["a"]}"#)?;
//! let new = Properties::from_json(r#"{"access": {"admin": {"login": true}}, "tags": ["b"]}"#)?;
//! let merged = blueprint.merge_data(&old, &new, None, '.')?;
//!
//! assert!(merged.contains("access.site.login"));
//! assert!(merged.contains("access.admin.login"));
//! assert_eq!(merged.get("tags").unwrap().text_items(), vec!["a", "b"]);
//! assert_eq!(blueprint.get_defaults().get_text("state"), Some("enabled"));
//! # Ok::<(), tessera::Error>(())
//! ```

use std::collections::{BTreeMap, HashMap};

use regex::Regex;
use serde::Deserialize;

pub mod errors;
pub mod field;
pub mod validation;

pub use errors::BlueprintError;
pub use field::{Field, FieldType, MergeStrategy};
pub use validation::{ValidationError, Violation};

use crate::{
    Result,
    data::{
        Properties, Value,
        path::{self, SEPARATOR},
    },
};

/// An immutable schema for one record type.
#[derive(Debug, Clone)]
pub struct Blueprint {
    name: String,
    fields: BTreeMap<String, Field>,
    patterns: HashMap<String, Regex>,
}

/// Builder for [`Blueprint`].
#[derive(Debug, Clone)]
pub struct BlueprintBuilder {
    name: String,
    fields: Vec<Field>,
}

impl BlueprintBuilder {
    /// Adds a field declaration. Later declarations of the same name win.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Checks the declarations and compiles patterns.
    pub fn build(self) -> std::result::Result<Blueprint, BlueprintError> {
        let mut fields = BTreeMap::new();
        let mut patterns = HashMap::new();

        for field in self.fields {
            let name = path::normalize_path(&field.name, SEPARATOR);
            if name.is_empty() {
                return Err(BlueprintError::InvalidDefinition {
                    field: field.name,
                    reason: "field name is empty".to_string(),
                });
            }
            if let Some(pattern) = &field.pattern {
                let regex = validation::compile_pattern(pattern).map_err(|e| {
                    BlueprintError::InvalidDefinition {
                        field: name.clone(),
                        reason: format!("invalid pattern: {e}"),
                    }
                })?;
                patterns.insert(name.clone(), regex);
            }
            if let Some(default) = &field.default
                && !field.field_type.accepts(default)
            {
                return Err(BlueprintError::InvalidDefinition {
                    field: name,
                    reason: format!(
                        "default is {} but the field is {}",
                        default.type_name(),
                        field.field_type.name()
                    ),
                });
            }
            fields.insert(name.clone(), Field { name, ..field });
        }

        // A field with children must be able to hold a mapping.
        for (name, field) in &fields {
            let has_children = fields
                .keys()
                .any(|other| other != name && path::is_within(other, name, SEPARATOR));
            if has_children && !matches!(field.field_type, FieldType::Map | FieldType::Any) {
                return Err(BlueprintError::InvalidDefinition {
                    field: name.clone(),
                    reason: format!(
                        "field has nested fields but is declared as {}",
                        field.field_type.name()
                    ),
                });
            }
        }

        Ok(Blueprint {
            name: self.name,
            fields,
            patterns,
        })
    }
}

/// On-disk blueprint definition.
#[derive(Debug, Deserialize)]
struct BlueprintDefinition {
    name: String,
    #[serde(default)]
    fields: Vec<Field>,
}

impl Blueprint {
    /// Starts a new blueprint definition.
    pub fn builder(name: impl Into<String>) -> BlueprintBuilder {
        BlueprintBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Parses a JSON blueprint definition of the form
    /// `{"name": "...", "fields": [{"name": "...", "type": "text", ...}]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let definition: BlueprintDefinition = serde_json::from_str(json)?;
        let builder = definition
            .fields
            .into_iter()
            .fold(Blueprint::builder(definition.name), BlueprintBuilder::field);
        Ok(builder.build()?)
    }

    /// The built-in account blueprint.
    ///
    /// Usernames are checked separately against the configured username
    /// pattern, so no pattern is declared here.
    pub fn user() -> Self {
        let fields = [
            Field::text("username").required(),
            Field::new("email", FieldType::Email).required(),
            Field::text("fullname"),
            Field::text("title"),
            Field::text("language"),
            Field::text("state")
                .with_options(["enabled", "disabled"])
                .with_default("enabled"),
            Field::list("groups"),
            Field::map("access"),
            Field::map("avatar"),
            Field::new("provider", FieldType::Any),
            Field::text("hashed_password"),
            Field::new("password", FieldType::Password).with_length(Some(8), None),
        ];
        Blueprint {
            name: "user".to_string(),
            fields: fields
                .into_iter()
                .map(|field| (field.name.clone(), field))
                .collect(),
            patterns: HashMap::new(),
        }
    }

    /// The blueprint name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a field declaration by its dot path.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Returns all declared fields in path order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Returns true if some declared field lies strictly below `name`.
    fn has_children(&self, name: &str) -> bool {
        self.fields
            .range::<str, _>((std::ops::Bound::Excluded(name), std::ops::Bound::Unbounded))
            .take_while(|(other, _)| other.starts_with(name))
            .any(|(other, _)| path::is_within(other, name, SEPARATOR))
    }

    /// Returns true if the value at `name` must be a mapping.
    fn expects_map(&self, name: &str) -> bool {
        self.fields
            .get(name)
            .is_some_and(|field| field.field_type == FieldType::Map)
            || self.has_children(name)
    }

    /// Returns every field default, placed at its path.
    ///
    /// Fields without a declared default are left out.
    pub fn get_defaults(&self) -> Properties {
        let mut defaults = Properties::new();
        for field in self.fields.values() {
            if let Some(value) = &field.default
                && let Err(e) = defaults.set(&field.name, value.clone())
            {
                tracing::warn!(blueprint = %self.name, field = %field.name, "Skipping default: {e}");
            }
        }
        defaults
    }

    /// Deep-merges `new` into `old` following each field's merge strategy.
    ///
    /// With `path`, `new` is merged into the sub-tree of `old` at that path
    /// (interpreted with `separator`) and field lookups are scoped to it.
    /// Neither input is modified; the merged tree is returned.
    pub fn merge_data(
        &self,
        old: &Properties,
        new: &Properties,
        path: Option<&str>,
        separator: char,
    ) -> Result<Properties> {
        let scope = path
            .map(|p| path::segments(p, separator))
            .filter(|segments| !segments.is_empty());

        let Some(segments) = scope else {
            return Ok(self.merge_map(old, new, "")?);
        };

        let field_prefix = segments.join(".");
        let scoped_path = segments.join(separator.to_string().as_str());

        // Every parent of the scope has to be able to hold a mapping.
        let mut node = Some(old);
        for (depth, segment) in segments[..segments.len() - 1].iter().enumerate() {
            let Some(current) = node else { break };
            node = match current.get_key(segment) {
                None | Some(Value::Null) => None,
                Some(Value::Map(map)) => Some(map),
                Some(other) => {
                    return Err(BlueprintError::MergeType {
                        path: segments[..=depth].join("."),
                        expected: "map",
                        found: other.type_name(),
                    }
                    .into());
                }
            };
        }

        let base = match old.get_with(&scoped_path, separator) {
            None | Some(Value::Null) => Properties::new(),
            Some(Value::Map(map)) => map.clone(),
            Some(other) => {
                return Err(BlueprintError::MergeType {
                    path: field_prefix,
                    expected: "map",
                    found: other.type_name(),
                }
                .into());
            }
        };

        let merged = self.merge_map(&base, new, &field_prefix)?;
        let mut result = old.clone();
        result.set_with(&scoped_path, merged, separator)?;
        Ok(result)
    }

    fn merge_map(
        &self,
        old: &Properties,
        new: &Properties,
        prefix: &str,
    ) -> std::result::Result<Properties, BlueprintError> {
        let mut result = old.clone();
        for (key, incoming) in new {
            let field_path = path::join(prefix, key, SEPARATOR);
            let merged = match old.get_key(key) {
                None => {
                    self.check_shape(&field_path, incoming)?;
                    incoming.clone()
                }
                Some(existing) => self.merge_value(existing, incoming, &field_path)?,
            };
            result.insert(key.clone(), merged);
        }
        Ok(result)
    }

    fn merge_value(
        &self,
        existing: &Value,
        incoming: &Value,
        field_path: &str,
    ) -> std::result::Result<Value, BlueprintError> {
        self.check_shape(field_path, existing)?;
        self.check_shape(field_path, incoming)?;

        let strategy = self
            .fields
            .get(field_path)
            .map_or(MergeStrategy::Deep, Field::merge_strategy);

        Ok(match (strategy, existing, incoming) {
            (MergeStrategy::Deep, Value::Map(old), Value::Map(new)) => {
                Value::Map(self.merge_map(old, new, field_path)?)
            }
            (MergeStrategy::Append, Value::List(old), Value::List(new)) => {
                let mut items = old.clone();
                for item in new {
                    if !items.contains(item) {
                        items.push(item.clone());
                    }
                }
                Value::List(items)
            }
            _ => incoming.clone(),
        })
    }

    /// Rejects values whose mapping-ness contradicts the declaration.
    ///
    /// Nulls are always accepted: they clear a field.
    fn check_shape(
        &self,
        field_path: &str,
        value: &Value,
    ) -> std::result::Result<(), BlueprintError> {
        if value.is_null() {
            return Ok(());
        }
        if self.expects_map(field_path) {
            if !value.is_branch() {
                return Err(BlueprintError::MergeType {
                    path: field_path.to_string(),
                    expected: "map",
                    found: value.type_name(),
                });
            }
        } else if let Some(field) = self.fields.get(field_path)
            && field.field_type != FieldType::Any
            && value.is_branch()
        {
            return Err(BlueprintError::MergeType {
                path: field_path.to_string(),
                expected: field.field_type.name(),
                found: value.type_name(),
            });
        }
        Ok(())
    }

    /// Validates `data`, reporting every violated constraint at once.
    pub fn validate(&self, data: &Properties) -> std::result::Result<(), BlueprintError> {
        let mut violations = Vec::new();
        for field in self.fields.values() {
            validation::check_field(field, self.patterns.get(&field.name), data, &mut violations);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            tracing::debug!(
                blueprint = %self.name,
                count = violations.len(),
                "Validation failed"
            );
            Err(ValidationError {
                blueprint: self.name.clone(),
                violations,
            }
            .into())
        }
    }

    /// Returns `data` restricted to declared fields.
    ///
    /// A declared leaf or map field keeps its whole value.
    pub fn filter(&self, data: &Properties) -> Properties {
        self.split(data, "").0
    }

    /// Returns the parts of `data` that no field declares.
    ///
    /// `filter(d)` merged with `extra(d)` rebuilds `d`.
    pub fn extra(&self, data: &Properties) -> Properties {
        self.split(data, "").1
    }

    /// Splits `data` into (declared, undeclared) trees.
    fn split(&self, data: &Properties, prefix: &str) -> (Properties, Properties) {
        let mut declared = Properties::new();
        let mut undeclared = Properties::new();

        for (key, value) in data {
            let field_path = path::join(prefix, key, SEPARATOR);
            let field = self.fields.get(&field_path);
            let has_children = self.has_children(&field_path);

            let owns_subtree =
                field.is_some_and(|f| f.field_type == FieldType::Map || !has_children);
            if owns_subtree {
                declared.insert(key.clone(), value.clone());
                continue;
            }

            match value {
                Value::Map(map) if has_children && !map.is_empty() => {
                    let (inner_declared, inner_undeclared) = self.split(map, &field_path);
                    if !inner_declared.is_empty() {
                        declared.insert(key.clone(), inner_declared);
                    }
                    if !inner_undeclared.is_empty() {
                        undeclared.insert(key.clone(), inner_undeclared);
                    }
                }
                _ if has_children || field.is_some() => {
                    declared.insert(key.clone(), value.clone());
                }
                _ => {
                    undeclared.insert(key.clone(), value.clone());
                }
            }
        }

        (declared, undeclared)
    }
}
