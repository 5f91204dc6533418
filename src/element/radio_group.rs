//! Mutually exclusive options

use indexmap::IndexMap;
use serde_json::Value;
use std::rc::Rc;

use super::ElementCore;
use crate::handle::{ElementHandle, ElementRef};
use crate::validators::Rules;

/// One radio option, keyed in its group by `value`
#[derive(Debug)]
pub struct RadioButton {
    pub id: String,
    pub name: String,
    pub value: String,
    pub default_checked: bool,
    pub(crate) handle: ElementRef,
}

impl RadioButton {
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

/// Options sharing one field name of which at most one is selected
#[derive(Debug)]
pub struct RadioButtonGroup {
    pub core: ElementCore<RadioButtonGroup>,
    /// Value of the option that starts out checked
    pub default_value: Option<String>,
    pub fields: IndexMap<String, RadioButton>,
}

impl RadioButtonGroup {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        rules: Rules<RadioButtonGroup>,
        default_value: Option<String>,
    ) -> Self {
        Self {
            core: ElementCore::new(id, name, rules),
            default_value,
            fields: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn errors(&self) -> &super::FieldErrors {
        &self.core.errors
    }

    pub fn default_checked_for(&self, value: &str) -> bool {
        self.default_value.as_deref() == Some(value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Value of the checked option
    pub fn selected(&self) -> Option<&str> {
        self.fields
            .values()
            .find(|radio| radio.checked())
            .map(|radio| radio.value.as_str())
    }

    pub fn value(&self) -> Option<Value> {
        self.selected().map(|value| Value::String(value.to_string()))
    }

    /// Check exactly the option registered under `value`
    ///
    /// An unknown value leaves every option untouched and returns false.
    pub fn set_value(&self, value: &str) -> bool {
        if !self.fields.contains_key(value) {
            return false;
        }
        for (key, radio) in &self.fields {
            radio.set_checked(key == value);
        }
        true
    }

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
