//! Field constraint checking.
//!
//! Validation never stops at the first problem: every violated constraint of
//! every field is collected into a single [`ValidationError`].

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::field::{Field, FieldType};
use crate::data::{Properties, Value};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("e-mail pattern is valid")
});

/// A single violated constraint.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Violation {
    #[error("'{field}' is required")]
    Missing { field: String },

    #[error("'{field}' must be {expected}, found {found}")]
    Type {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("'{field}' is not a valid e-mail address")]
    Email { field: String },

    #[error("'{field}' does not match pattern '{pattern}'")]
    Pattern { field: String, pattern: String },

    #[error("'{field}' must be one of the allowed options, found {value}")]
    Options { field: String, value: String },

    #[error("'{field}' has length {length}, allowed range is {min:?}..={max:?}")]
    Length {
        field: String,
        length: usize,
        min: Option<usize>,
        max: Option<usize>,
    },
}

impl Violation {
    /// The field this violation belongs to.
    pub fn field(&self) -> &str {
        match self {
            Violation::Missing { field }
            | Violation::Type { field, .. }
            | Violation::Email { field }
            | Violation::Pattern { field, .. }
            | Violation::Options { field, .. }
            | Violation::Length { field, .. } => field,
        }
    }
}

/// Every constraint violated by a data tree.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Validation failed for blueprint '{blueprint}': {}", list(.violations))]
pub struct ValidationError {
    pub blueprint: String,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Returns the violations reported for `field`.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| v.field() == field)
    }
}

fn list(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Checks a single field against `data`, pushing violations into `out`.
pub(super) fn check_field(
    field: &Field,
    pattern: Option<&Regex>,
    data: &Properties,
    out: &mut Vec<Violation>,
) {
    let value = match data.get(&field.name) {
        None | Some(Value::Null) => {
            if field.required {
                out.push(Violation::Missing {
                    field: field.name.clone(),
                });
            }
            return;
        }
        Some(value) => value,
    };

    if !field.field_type.accepts(value) {
        out.push(Violation::Type {
            field: field.name.clone(),
            expected: field.field_type.name(),
            found: value.type_name(),
        });
        // Further checks assume the declared shape.
        return;
    }

    if field.required && is_blank(value) {
        out.push(Violation::Missing {
            field: field.name.clone(),
        });
    }

    if let Value::Text(text) = value {
        if field.field_type == FieldType::Email && !EMAIL.is_match(text) {
            out.push(Violation::Email {
                field: field.name.clone(),
            });
        }
        if let (Some(regex), Some(source)) = (pattern, &field.pattern)
            && !regex.is_match(text)
        {
            out.push(Violation::Pattern {
                field: field.name.clone(),
                pattern: source.clone(),
            });
        }
    }

    if !field.options.is_empty() && !allowed(&field.options, value) {
        out.push(Violation::Options {
            field: field.name.clone(),
            value: value.to_string(),
        });
    }

    if let Some(length) = length_of(value) {
        let too_short = field.min_length.is_some_and(|min| length < min);
        let too_long = field.max_length.is_some_and(|max| length > max);
        if too_short || too_long {
            out.push(Violation::Length {
                field: field.name.clone(),
                length,
                min: field.min_length,
                max: field.max_length,
            });
        }
    }
}

fn is_blank(value: &Value) -> bool {
    matches!(value, Value::Text(s) if s.trim().is_empty())
}

/// Lists are allowed when every item is an option.
fn allowed(options: &[Value], value: &Value) -> bool {
    match value {
        Value::List(items) => items.iter().all(|item| options.contains(item)),
        other => options.contains(other),
    }
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::Text(s) => Some(s.chars().count()),
        Value::List(items) => Some(items.len()),
        _ => None,
    }
}

/// Compiles a field pattern so that it must match the whole value.
pub(super) fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}
