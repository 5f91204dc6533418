//! Registration descriptors and the props handed back to the renderer
//!
//! A descriptor is what a rendering component declares when it mounts. The
//! matching props bundle echoes it back, adds the [`FieldPath`] used to bind
//! the live element, and carries a [`ChangeHandler`] when the form validates
//! on change.

use serde_json::Value;
use std::collections::HashMap;

use crate::element::{CheckboxGroup, FormElementKind, RadioButtonGroup};
use crate::path::FieldPath;
use crate::registry::Form;
use crate::validators::{Rule, Rules};

// =============================================================================
// Descriptors
// =============================================================================

/// Declaration of a scalar field
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Defaults to the name
    pub id: Option<String>,
    pub name: String,
    pub rules: Rules<Value>,
    /// Defaults to the configured field type ("text")
    pub field_type: Option<String>,
    pub default_value: Option<Value>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            rules: Rules::new(),
            field_type: None,
            default_value: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_rule(mut self, name: impl Into<String>, rule: Rule<Value>) -> Self {
        self.rules.insert(name, rule);
        self
    }

    pub fn with_rules(mut self, rules: Rules<Value>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = Some(field_type.into());
        self
    }

    pub fn with_default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Declaration of a fieldset or field array
///
/// For a field array the rules are applied to every appended child.
#[derive(Debug, Clone)]
pub struct GroupDescriptor {
    pub id: Option<String>,
    pub name: String,
    pub rules: Rules<Value>,
}

impl GroupDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            rules: Rules::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_rule(mut self, name: impl Into<String>, rule: Rule<Value>) -> Self {
        self.rules.insert(name, rule);
        self
    }
}

/// Declaration of a checkbox group
#[derive(Debug, Clone)]
pub struct CheckboxGroupDescriptor {
    pub id: Option<String>,
    pub name: String,
    pub rules: Rules<CheckboxGroup>,
    /// Option value to initial checked state
    pub default_checked: HashMap<String, bool>,
}

impl CheckboxGroupDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            rules: Rules::new(),
            default_checked: HashMap::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_rule(mut self, name: impl Into<String>, rule: Rule<CheckboxGroup>) -> Self {
        self.rules.insert(name, rule);
        self
    }

    pub fn with_default_checked(mut self, value: impl Into<String>, checked: bool) -> Self {
        self.default_checked.insert(value.into(), checked);
        self
    }
}

/// Declaration of a radio button group
#[derive(Debug, Clone)]
pub struct RadioButtonGroupDescriptor {
    pub id: Option<String>,
    pub name: String,
    pub rules: Rules<RadioButtonGroup>,
    pub default_value: Option<String>,
}

impl RadioButtonGroupDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            rules: Rules::new(),
            default_value: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_rule(mut self, name: impl Into<String>, rule: Rule<RadioButtonGroup>) -> Self {
        self.rules.insert(name, rule);
        self
    }

    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Declaration of a checkbox or radio option
#[derive(Debug, Clone)]
pub struct OptionDescriptor {
    pub id: Option<String>,
    pub value: String,
}

impl OptionDescriptor {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            id: None,
            value: value.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

// =============================================================================
// Props
// =============================================================================

/// Validate-and-publish routine attached to props when validating on change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeHandler {
    /// Element that gets revalidated; options point at their group
    pub target: FieldPath,
}

impl ChangeHandler {
    pub fn new(target: FieldPath) -> Self {
        Self { target }
    }

    pub fn call(&self, form: &mut Form) {
        form.validate_path(&self.target, true);
    }
}

/// Props for a scalar field
#[derive(Debug, Clone)]
pub struct FieldProps {
    pub id: String,
    pub name: String,
    pub path: FieldPath,
    pub rules: Rules<Value>,
    pub field_type: String,
    pub default_value: Option<Value>,
    pub on_change: Option<ChangeHandler>,
}

/// Props for a fieldset, field array or option group
///
/// `path` is the scope for registering children.
#[derive(Debug, Clone)]
pub struct GroupProps {
    pub id: String,
    pub name: String,
    pub kind: FormElementKind,
    pub path: FieldPath,
}

/// Input type of an option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Checkbox,
    Radio,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Checkbox => "checkbox",
            InputType::Radio => "radio",
        }
    }
}

/// Props for a checkbox or radio option
#[derive(Debug, Clone)]
pub struct OptionProps {
    pub id: String,
    /// The group's name
    pub name: String,
    pub path: FieldPath,
    pub input_type: InputType,
    pub value: String,
    pub default_checked: bool,
    pub on_change: Option<ChangeHandler>,
}
