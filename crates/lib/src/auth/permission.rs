//! Interpretation of stored permission values.
//!
//! Permissions come from configuration files and account documents, so they
//! arrive in several spellings. Only an explicit, well-known "yes" grants
//! access; everything else denies.

use crate::data::Value;

/// Returns true if `value` grants access.
///
/// Accepted: `true`, `1`, `"1"`, `"yes"`, `"on"`, `"true"`. Matching is
/// exact; `"Yes"` or `1.0` do not count.
///
/// ```
/// use tessera::auth::is_positive;
/// use tessera::data::Value;
///
/// assert!(is_positive(&Value::from("yes")));
/// assert!(!is_positive(&Value::from("YES")));
/// assert!(!is_positive(&Value::Null));
/// ```
pub fn is_positive(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Int(i) => *i == 1,
        Value::Text(s) => matches!(s.as_str(), "1" | "yes" | "on" | "true"),
        _ => false,
    }
}

/// Returns true if `value` explicitly denies access.
///
/// Accepted: `false`, `0`, `"0"`, `"no"`, `"off"`, `"false"`, `null`.
/// A value that is neither positive nor negative is malformed and is still
/// treated as a denial by [`Permission::from_value`].
pub fn is_negative(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !*b,
        Value::Int(i) => *i == 0,
        Value::Text(s) => matches!(s.as_str(), "0" | "no" | "off" | "false"),
        _ => false,
    }
}

/// A resolved permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Allow,
    Deny,
}

impl Permission {
    /// Reads a stored value. Anything not positive denies.
    pub fn from_value(value: &Value) -> Self {
        if is_positive(value) {
            Permission::Allow
        } else {
            Permission::Deny
        }
    }

    pub fn is_allowed(self) -> bool {
        self == Permission::Allow
    }
}

impl From<Permission> for Value {
    fn from(permission: Permission) -> Self {
        Value::Bool(permission.is_allowed())
    }
}
