//! Fixed grouping of heterogeneous elements

use serde_json::Value;

use super::{aggregate_errors, aggregate_values, children_valid, ElementMap, Errors};
use crate::validators::Rules;

/// Named group of elements validated independently but reported together
///
/// Rules are never evaluated at the fieldset level. An empty rule set marks
/// the fieldset as unconditionally valid.
#[derive(Debug)]
pub struct Fieldset {
    pub id: String,
    pub name: String,
    pub rules: Rules<Value>,
    pub fields: ElementMap,
}

impl Fieldset {
    pub fn new(id: impl Into<String>, name: impl Into<String>, rules: Rules<Value>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rules,
            fields: ElementMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn value(&self) -> Option<Value> {
        Some(aggregate_values(&self.fields))
    }

    pub fn errors(&self) -> Errors {
        aggregate_errors(&self.fields)
    }

    pub fn validate(&mut self) {
        for child in self.fields.values_mut() {
            child.validate();
        }
    }

    pub fn is_valid(&self) -> bool {
        self.rules.is_empty() || children_valid(&self.fields)
    }
}
