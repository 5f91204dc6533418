//! Validation rules
//!
//! A rule is a pure predicate that maps the value under test to an optional
//! failure message. Field rules see the current [`Value`] of the field; group
//! rules see the whole [`CheckboxGroup`] or [`RadioButtonGroup`] so they can
//! inspect every option.
//!
//! ## Example
//! ```
//! use familiar_forms::validators::{is_required, min_length, Validator};
//! use serde_json::json;
//!
//! let required = is_required("Required");
//! assert_eq!(required.validate(&json!("")), Some("Required".to_string()));
//! assert_eq!(required.validate(&json!("doe")), None);
//!
//! let short = min_length(3, "Too short");
//! assert!(short.validate(&json!("ab")).is_some());
//! ```

use regex::Regex;
use serde_json::Value;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::LazyLock;

use crate::element::{CheckboxGroup, RadioButtonGroup};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(EMAIL_PATTERN).unwrap());

// =============================================================================
// Validator
// =============================================================================

/// A pluggable validation predicate
pub trait Validator<T: ?Sized> {
    /// `None` when `target` passes, otherwise the failure message
    fn validate(&self, target: &T) -> Option<String>;
}

impl<T: ?Sized, F> Validator<T> for F
where
    F: Fn(&T) -> Option<String>,
{
    fn validate(&self, target: &T) -> Option<String> {
        self(target)
    }
}

/// Shared, type-erased validator
pub type Rule<T> = Rc<dyn Validator<T>>;

/// Turn a closure into a [`Rule`]
pub fn rule<T: ?Sized, F>(f: F) -> Rule<T>
where
    F: Fn(&T) -> Option<String> + 'static,
{
    Rc::new(f)
}

/// An empty message counts as a pass
pub fn normalize(result: Option<String>) -> Option<String> {
    result.filter(|message| !message.is_empty())
}

// =============================================================================
// Rules
// =============================================================================

/// Rule-name to validator mapping
pub struct Rules<T: ?Sized>(BTreeMap<String, Rule<T>>);

impl<T: ?Sized> Rules<T> {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add or replace a rule
    pub fn insert(&mut self, name: impl Into<String>, rule: Rule<T>) {
        self.0.insert(name.into(), rule);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Rule<T>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Run every rule against `target`
    pub fn evaluate(&self, target: &T) -> BTreeMap<String, Option<String>> {
        self.iter()
            .map(|(name, rule)| (name.clone(), normalize(rule.validate(target))))
            .collect()
    }
}

impl<T: ?Sized> Default for Rules<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for Rules<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: ?Sized> fmt::Debug for Rules<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.keys()).finish()
    }
}

impl<T: ?Sized, S: Into<String>> FromIterator<(S, Rule<T>)> for Rules<T> {
    fn from_iter<I: IntoIterator<Item = (S, Rule<T>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(name, rule)| (name.into(), rule)).collect())
    }
}

// =============================================================================
// Field rules
// =============================================================================

/// Fails on null, blank strings, `false` and empty collections
pub fn is_required(message: impl Into<String>) -> Rule<Value> {
    let message = message.into();
    rule(move |value: &Value| {
        let missing = match value {
            Value::Null => true,
            Value::Bool(set) => !set,
            Value::String(text) => text.trim().is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(entries) => entries.is_empty(),
            Value::Number(_) => false,
        };
        missing.then(|| message.clone())
    })
}

/// Fails on non-empty strings shorter than `min` characters
pub fn min_length(min: usize, message: impl Into<String>) -> Rule<Value> {
    let message = message.into();
    rule(move |value: &Value| match value.as_str() {
        Some(text) if !text.is_empty() && text.chars().count() < min => Some(message.clone()),
        _ => None,
    })
}

/// Fails on strings longer than `max` characters
pub fn max_length(max: usize, message: impl Into<String>) -> Rule<Value> {
    let message = message.into();
    rule(move |value: &Value| match value.as_str() {
        Some(text) if text.chars().count() > max => Some(message.clone()),
        _ => None,
    })
}

/// Fails on non-empty strings that do not match `pattern`
pub fn matches_pattern(pattern: Regex, message: impl Into<String>) -> Rule<Value> {
    let message = message.into();
    rule(move |value: &Value| match value.as_str() {
        Some(text) if !text.is_empty() && !pattern.is_match(text) => Some(message.clone()),
        _ => None,
    })
}

/// Fails on non-empty strings that do not look like an email address
pub fn is_email(message: impl Into<String>) -> Rule<Value> {
    matches_pattern(EMAIL_REGEX.clone(), message)
}

// =============================================================================
// Group rules
// =============================================================================

/// Fails when fewer than `min` options are checked
pub fn has_min_checked(min: usize, message: impl Into<String>) -> Rule<CheckboxGroup> {
    let message = message.into();
    rule(move |group: &CheckboxGroup| {
        if group.is_empty() {
            return None;
        }
        (group.checked_count() < min).then(|| message.clone())
    })
}

/// Fails when more than `max` options are checked
pub fn has_max_checked(max: usize, message: impl Into<String>) -> Rule<CheckboxGroup> {
    let message = message.into();
    rule(move |group: &CheckboxGroup| {
        if group.is_empty() {
            return None;
        }
        (group.checked_count() > max).then(|| message.clone())
    })
}

/// Fails when no radio option is selected
pub fn is_selected(message: impl Into<String>) -> Rule<RadioButtonGroup> {
    let message = message.into();
    rule(move |group: &RadioButtonGroup| {
        if group.is_empty() {
            return None;
        }
        group.selected().is_none().then(|| message.clone())
    })
}
