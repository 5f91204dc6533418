//! Form elements
//!
//! Every named, validated entity in a form is a [`FormElement`]. Scalars
//! ([`Field`]) read their value through a live handle; composites
//! ([`FieldArray`], [`Fieldset`], [`CheckboxGroup`], [`RadioButtonGroup`])
//! own a mapping of children and aggregate value, errors and validity from
//! them.
//!
//! Child keys are the child's name for fields, fieldsets and field arrays,
//! and the option value for checkboxes and radio buttons, since options share
//! their group's name.

mod checkbox_group;
mod field;
mod field_array;
mod fieldset;
mod radio_group;

pub use checkbox_group::{Checkbox, CheckboxGroup};
pub use field::Field;
pub use field_array::FieldArray;
pub use fieldset::Fieldset;
pub use radio_group::{RadioButton, RadioButtonGroup};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::validators::Rules;

/// Rule name to failure message; `None` means passed or not yet evaluated
pub type FieldErrors = BTreeMap<String, Option<String>>;

/// Children of a field array or fieldset, in registration order
pub type ElementMap = IndexMap<String, FormElement>;

// =============================================================================
// Kind
// =============================================================================

/// Discriminant of [`FormElement`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormElementKind {
    Field,
    FieldArray,
    Fieldset,
    CheckboxGroup,
    RadioButtonGroup,
}

impl FormElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormElementKind::Field => "field",
            FormElementKind::FieldArray => "field array",
            FormElementKind::Fieldset => "fieldset",
            FormElementKind::CheckboxGroup => "checkbox group",
            FormElementKind::RadioButtonGroup => "radio button group",
        }
    }

    /// Whether elements of this kind can hold other form elements
    pub fn is_container(&self) -> bool {
        matches!(self, FormElementKind::FieldArray | FormElementKind::Fieldset)
    }
}

impl fmt::Display for FormElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Errors
// =============================================================================

/// What an element reports from `errors()`
///
/// Scalars and option groups report per rule. Field arrays and fieldsets
/// report per child instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Errors {
    Flat(FieldErrors),
    Nested(IndexMap<String, Errors>),
}

impl Errors {
    /// Whether any message is present, at any depth
    pub fn has_errors(&self) -> bool {
        match self {
            Errors::Flat(errors) => errors.values().any(Option::is_some),
            Errors::Nested(children) => children.values().any(Errors::has_errors),
        }
    }

    /// Every failure message, depth first
    pub fn messages(&self) -> Vec<&str> {
        match self {
            Errors::Flat(errors) => errors.values().flatten().map(String::as_str).collect(),
            Errors::Nested(children) => children.values().flat_map(Errors::messages).collect(),
        }
    }
}

// =============================================================================
// Element core
// =============================================================================

/// Identity, rules and flat error bag shared by rule-carrying elements
#[derive(Debug)]
pub struct ElementCore<T: ?Sized> {
    pub id: String,
    pub name: String,
    pub rules: Rules<T>,
    pub errors: FieldErrors,
}

impl<T: ?Sized> ElementCore<T> {
    /// Seeds one unevaluated entry per rule
    pub fn new(id: impl Into<String>, name: impl Into<String>, rules: Rules<T>) -> Self {
        let errors = rules.names().map(|rule| (rule.to_string(), None)).collect();
        Self {
            id: id.into(),
            name: name.into(),
            rules,
            errors,
        }
    }

    /// Swap in a new rule set, keeping results for rules that survive
    pub fn set_rules(&mut self, rules: Rules<T>) {
        let mut errors = FieldErrors::new();
        for rule in rules.names() {
            let previous = self.errors.remove(rule).flatten();
            errors.insert(rule.to_string(), previous);
        }
        self.errors = errors;
        self.rules = rules;
    }

    pub fn is_valid(&self) -> bool {
        self.errors.values().all(Option::is_none)
    }
}

// =============================================================================
// FormElement
// =============================================================================

/// Any named, validated entity in a form
#[derive(Debug)]
pub enum FormElement {
    Field(Field),
    FieldArray(FieldArray),
    Fieldset(Fieldset),
    CheckboxGroup(CheckboxGroup),
    RadioButtonGroup(RadioButtonGroup),
}

impl FormElement {
    pub fn kind(&self) -> FormElementKind {
        match self {
            FormElement::Field(_) => FormElementKind::Field,
            FormElement::FieldArray(_) => FormElementKind::FieldArray,
            FormElement::Fieldset(_) => FormElementKind::Fieldset,
            FormElement::CheckboxGroup(_) => FormElementKind::CheckboxGroup,
            FormElement::RadioButtonGroup(_) => FormElementKind::RadioButtonGroup,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            FormElement::Field(field) => &field.core.id,
            FormElement::FieldArray(array) => &array.id,
            FormElement::Fieldset(fieldset) => &fieldset.id,
            FormElement::CheckboxGroup(group) => &group.core.id,
            FormElement::RadioButtonGroup(group) => &group.core.id,
        }
    }

    /// Registry key of the element
    pub fn name(&self) -> &str {
        match self {
            FormElement::Field(field) => &field.core.name,
            FormElement::FieldArray(array) => &array.name,
            FormElement::Fieldset(fieldset) => &fieldset.name,
            FormElement::CheckboxGroup(group) => &group.core.name,
            FormElement::RadioButtonGroup(group) => &group.core.name,
        }
    }

    /// Current value, `None` when nothing is bound
    pub fn value(&self) -> Option<Value> {
        match self {
            FormElement::Field(field) => field.value(),
            FormElement::FieldArray(array) => array.value(),
            FormElement::Fieldset(fieldset) => fieldset.value(),
            FormElement::CheckboxGroup(group) => group.value(),
            FormElement::RadioButtonGroup(group) => group.value(),
        }
    }

    pub fn errors(&self) -> Errors {
        match self {
            FormElement::Field(field) => Errors::Flat(field.core.errors.clone()),
            FormElement::FieldArray(array) => array.errors(),
            FormElement::Fieldset(fieldset) => fieldset.errors(),
            FormElement::CheckboxGroup(group) => Errors::Flat(group.core.errors.clone()),
            FormElement::RadioButtonGroup(group) => Errors::Flat(group.core.errors.clone()),
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            FormElement::Field(field) => field.is_valid(),
            FormElement::FieldArray(array) => array.is_valid(),
            FormElement::Fieldset(fieldset) => fieldset.is_valid(),
            FormElement::CheckboxGroup(group) => group.is_valid(),
            FormElement::RadioButtonGroup(group) => group.is_valid(),
        }
    }

    pub fn validate(&mut self) {
        match self {
            FormElement::Field(field) => field.validate(),
            FormElement::FieldArray(array) => array.validate(),
            FormElement::Fieldset(fieldset) => fieldset.validate(),
            FormElement::CheckboxGroup(group) => group.validate(),
            FormElement::RadioButtonGroup(group) => group.validate(),
        }
    }

    /// Child elements of a field array or fieldset
    pub fn children(&self) -> Option<&ElementMap> {
        match self {
            FormElement::FieldArray(array) => Some(&array.fields),
            FormElement::Fieldset(fieldset) => Some(&fieldset.fields),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut ElementMap> {
        match self {
            FormElement::FieldArray(array) => Some(&mut array.fields),
            FormElement::Fieldset(fieldset) => Some(&mut fieldset.fields),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<&Field> {
        match self {
            FormElement::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_field_array(&self) -> Option<&FieldArray> {
        match self {
            FormElement::FieldArray(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_fieldset(&self) -> Option<&Fieldset> {
        match self {
            FormElement::Fieldset(fieldset) => Some(fieldset),
            _ => None,
        }
    }

    pub fn as_checkbox_group(&self) -> Option<&CheckboxGroup> {
        match self {
            FormElement::CheckboxGroup(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_radio_group(&self) -> Option<&RadioButtonGroup> {
        match self {
            FormElement::RadioButtonGroup(group) => Some(group),
            _ => None,
        }
    }
}

// =============================================================================
// Aggregation over child maps
// =============================================================================

/// Children's values keyed by child name; unbound children are skipped
pub(crate) fn aggregate_values(fields: &ElementMap) -> Value {
    let values: Map<String, Value> = fields
        .iter()
        .filter_map(|(key, child)| child.value().map(|value| (key.clone(), value)))
        .collect();
    Value::Object(values)
}

pub(crate) fn aggregate_errors(fields: &ElementMap) -> Errors {
    Errors::Nested(
        fields
            .iter()
            .map(|(key, child)| (key.clone(), child.errors()))
            .collect(),
    )
}

/// Valid unless any child reports invalid
pub(crate) fn children_valid(fields: &ElementMap) -> bool {
    fields.values().all(FormElement::is_valid)
}

/// Look up a descendant by path segments
pub(crate) fn lookup<'a>(fields: &'a ElementMap, segments: &[String]) -> Option<&'a FormElement> {
    let (first, rest) = segments.split_first()?;
    let element = fields.get(first)?;
    if rest.is_empty() {
        Some(element)
    } else {
        lookup(element.children()?, rest)
    }
}

pub(crate) fn lookup_mut<'a>(
    fields: &'a mut ElementMap,
    segments: &[String],
) -> Option<&'a mut FormElement> {
    let (first, rest) = segments.split_first()?;
    let element = fields.get_mut(first)?;
    if rest.is_empty() {
        Some(element)
    } else {
        lookup_mut(element.children_mut()?, rest)
    }
}
