//! Authorization decisions for account subjects.

use std::sync::Arc;

use super::permission::{Permission, is_negative};
use crate::{
    config::ConfigStore,
    data::{Properties, Value},
};

/// What settled an authorization decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// A group configuration granted the action.
    Group(String),
    /// The subject's own `access` entry decided, overriding any group.
    Direct,
    /// Nothing granted the action.
    Default,
}

/// An authorization outcome with its cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub granted: bool,
    pub reason: Reason,
}

/// Evaluates actions against group configuration and per-account access.
///
/// A subject is an account's element tree: its `groups` list and its
/// `access` map are read from there. For an action key `k`:
///
/// 1. Groups are scanned in stored order; the first group whose
///    `groups.<group>.access.<k>` configuration value is positive grants.
/// 2. If the subject's `access` holds an entry for `k` (as a flat key, then
///    as a nested path), that entry decides instead, granting or denying.
///
/// The engine never fails; anything ambiguous denies.
#[derive(Clone)]
pub struct AuthorizationEngine {
    config: Arc<dyn ConfigStore>,
}

impl std::fmt::Debug for AuthorizationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationEngine").finish_non_exhaustive()
    }
}

impl AuthorizationEngine {
    pub fn new(config: Arc<dyn ConfigStore>) -> Self {
        Self { config }
    }

    /// The configuration the engine reads group permissions from.
    pub fn config(&self) -> &Arc<dyn ConfigStore> {
        &self.config
    }

    /// Returns whether `subject` may perform `action`, optionally within
    /// `scope` (the key becomes `scope.action`).
    pub fn authorize(&self, subject: &Properties, action: &str, scope: Option<&str>) -> bool {
        self.decide(subject, action, scope).granted
    }

    /// Like [`AuthorizationEngine::authorize`], reporting what decided.
    pub fn decide(&self, subject: &Properties, action: &str, scope: Option<&str>) -> Decision {
        let key = action_key(action, scope);

        let mut decision = Decision {
            granted: false,
            reason: Reason::Default,
        };

        let groups = subject
            .get_key("groups")
            .map(Value::text_items)
            .unwrap_or_default();
        for group in groups {
            let Some(value) = self.config.get(&format!("groups.{group}.access.{key}")) else {
                continue;
            };
            if Permission::from_value(&value).is_allowed() {
                decision = Decision {
                    granted: true,
                    reason: Reason::Group(group.to_string()),
                };
                break;
            }
        }

        if let Some(value) = direct_entry(subject, &key) {
            if !is_negative(value) && !Permission::from_value(value).is_allowed() {
                tracing::warn!(action = %key, "Unrecognized access value {value}, denying");
            }
            decision = Decision {
                granted: Permission::from_value(value).is_allowed(),
                reason: Reason::Direct,
            };
        }

        tracing::debug!(
            action = %key,
            granted = decision.granted,
            reason = ?decision.reason,
            "Authorization decision"
        );
        decision
    }
}

/// Joins an optional scope and an action into a permission key.
pub fn action_key(action: &str, scope: Option<&str>) -> String {
    match scope {
        Some(scope) if !scope.is_empty() => format!("{scope}.{action}"),
        _ => action.to_string(),
    }
}

/// Finds the subject's own access entry for `key`.
///
/// Older account documents store dotted actions as flat keys
/// (`{"access": {"site.login": true}}`); newer ones nest them.
fn direct_entry<'a>(subject: &'a Properties, key: &str) -> Option<&'a Value> {
    let access = subject.get_key("access")?.as_map()?;
    let present = |value: &&Value| !value.is_null();
    access
        .get_key(key)
        .filter(present)
        .or_else(|| access.get(key).filter(present))
}
