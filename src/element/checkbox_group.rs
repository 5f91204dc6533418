//! Checkbox options and the group that validates them as a whole

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::rc::Rc;

use super::ElementCore;
use crate::handle::{ElementHandle, ElementRef};
use crate::validators::Rules;

/// One checkbox option, keyed in its group by `value`
#[derive(Debug)]
pub struct Checkbox {
    pub id: String,
    /// Shared with the owning group
    pub name: String,
    pub value: String,
    pub default_checked: bool,
    pub(crate) handle: ElementRef,
}

impl Checkbox {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
        default_checked: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value: value.into(),
            default_checked,
            handle: ElementRef::default(),
        }
    }

    /// Proxies the handle; an unbound checkbox reads unchecked
    pub fn checked(&self) -> bool {
        self.handle.get().is_some_and(|handle| handle.checked())
    }

    /// No-op while unbound
    pub fn set_checked(&self, checked: bool) {
        if let Some(handle) = self.handle.get() {
            handle.set_checked(checked);
        }
    }

    pub fn is_bound(&self) -> bool {
        self.handle.is_bound()
    }

    pub fn bind(&mut self, handle: &Rc<dyn ElementHandle>) {
        self.handle.bind(handle);
    }

    pub fn unbind(&mut self) {
        self.handle.unbind();
    }

    pub fn focus(&self) -> bool {
        match self.handle.get() {
            Some(handle) => {
                handle.focus();
                true
            }
            None => false,
        }
    }
}

/// Boolean options sharing one field name, validated by group-level rules
#[derive(Debug)]
pub struct CheckboxGroup {
    pub core: ElementCore<CheckboxGroup>,
    /// Option value to initial checked state
    pub default_checked: HashMap<String, bool>,
    pub fields: IndexMap<String, Checkbox>,
}

impl CheckboxGroup {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        rules: Rules<CheckboxGroup>,
        default_checked: HashMap<String, bool>,
    ) -> Self {
        Self {
            core: ElementCore::new(id, name, rules),
            default_checked,
            fields: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn errors(&self) -> &super::FieldErrors {
        &self.core.errors
    }

    /// Initial checked state for an option value
    pub fn default_checked_for(&self, value: &str) -> bool {
        self.default_checked.get(value).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn checked_count(&self) -> usize {
        self.fields.values().filter(|checkbox| checkbox.checked()).count()
    }

    /// Values of the checked options, in registration order
    pub fn checked_values(&self) -> Vec<&str> {
        self.fields
            .values()
            .filter(|checkbox| checkbox.checked())
            .map(|checkbox| checkbox.value.as_str())
            .collect()
    }

    /// Returns false if `value` is not a registered option
    pub fn set_checked(&self, value: &str, checked: bool) -> bool {
        match self.fields.get(value) {
            Some(checkbox) => {
                checkbox.set_checked(checked);
                true
            }
            None => false,
        }
    }

    /// Option value to checked state
    pub fn value(&self) -> Option<Value> {
        let values: Map<String, Value> = self
            .fields
            .iter()
            .map(|(key, checkbox)| (key.clone(), Value::Bool(checkbox.checked())))
            .collect();
        Some(Value::Object(values))
    }

    /// Runs the group rules against the whole group
    pub fn validate(&mut self) {
        if self.core.rules.is_empty() || self.fields.is_empty() {
            return;
        }
        let errors = self.core.rules.evaluate(self);
        self.core.errors = errors;
    }

    pub fn is_valid(&self) -> bool {
        self.core.is_valid()
    }
}
