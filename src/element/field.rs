//! Scalar field bound to one live handle

use serde_json::Value;
use std::rc::Rc;

use super::ElementCore;
use crate::handle::{ElementHandle, ElementRef};
use crate::validators::Rules;

/// A single scalar input
#[derive(Debug)]
pub struct Field {
    pub core: ElementCore<Value>,
    /// Input type hint echoed to the renderer (e.g. "text", "email")
    pub field_type: String,
    pub default_value: Option<Value>,
    pub(crate) handle: ElementRef,
}

impl Field {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        rules: Rules<Value>,
        field_type: impl Into<String>,
        default_value: Option<Value>,
    ) -> Self {
        Self {
            core: ElementCore::new(id, name, rules),
            field_type: field_type.into(),
            default_value,
            handle: ElementRef::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.core.id
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn rules(&self) -> &Rules<Value> {
        &self.core.rules
    }

    pub fn errors(&self) -> &super::FieldErrors {
        &self.core.errors
    }

    /// Reads through the handle; `None` while unbound
    pub fn value(&self) -> Option<Value> {
        self.handle.get().map(|handle| handle.value())
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

    /// Returns false when there is nothing to focus
    pub fn focus(&self) -> bool {
        match self.handle.get() {
            Some(handle) => {
                handle.focus();
                true
            }
            None => false,
        }
    }

    /// Run every rule against the bound value
    ///
    /// Does nothing without rules or without a bound handle, so the error bag
    /// keeps its previous state.
    pub fn validate(&mut self) {
        if self.core.rules.is_empty() {
            return;
        }
        let Some(value) = self.value() else {
            return;
        };
        self.core.errors = self.core.rules.evaluate(&value);
    }

    pub fn is_valid(&self) -> bool {
        self.core.is_valid()
    }
}
