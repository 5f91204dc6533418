//! Form Registry
//!
//! Owns the top-level form elements of one mounted form, the mirrored error
//! map and the published [`FormState`] snapshot.
//!
//! Lifecycle of one registration:
//!
//! ```text
//! UNREGISTERED --register--> REGISTERED --register_field(Some)--> BOUND
//!      ^                                                            |
//!      |                                          validate_* (0..n) |
//!      +------------------ register_field(None) / unregister <------+
//! ```
//!
//! All operations are synchronous and run on the UI thread. The registry is
//! always consulted by path at call time, so a stale path (an element that
//! was unmounted in the meantime) is detected and ignored rather than
//! faulting.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::rc::Rc;
use tracing::{debug, warn};

use crate::config::FormConfig;
use crate::descriptor::{
    ChangeHandler, CheckboxGroupDescriptor, FieldDescriptor, FieldProps, GroupDescriptor,
    GroupProps, InputType, OptionDescriptor, OptionProps, RadioButtonGroupDescriptor,
};
use crate::element::{
    lookup, lookup_mut, Checkbox, CheckboxGroup, ElementMap, Errors, Field, FieldArray, Fieldset,
    FormElement, FormElementKind, RadioButton, RadioButtonGroup,
};
use crate::error::{FormError, Result};
use crate::handle::ElementHandle;
use crate::path::FieldPath;

/// Values of every bound top-level element, keyed by name
pub type FormData = Map<String, Value>;

// =============================================================================
// Snapshot
// =============================================================================

/// Externally observable state, republished on demand
///
/// `None` marks a known element that has not been validated yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormState {
    pub errors: IndexMap<String, Option<Errors>>,
}

impl FormState {
    /// Whether any published error bag holds a message
    pub fn has_errors(&self) -> bool {
        self.errors.values().flatten().any(Errors::has_errors)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Submission event whose default behavior the registry suppresses
pub trait SubmitEvent {
    fn prevent_default(&mut self);
}

/// Plain submission event for headless use
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FormSubmitEvent {
    pub default_prevented: bool,
}

impl SubmitEvent for FormSubmitEvent {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

// =============================================================================
// Form
// =============================================================================

/// Registry and validation orchestrator for one form instance
#[derive(Debug)]
pub struct Form {
    config: FormConfig,
    fields: ElementMap,
    form_errors: IndexMap<String, Option<Errors>>,
    state: Rc<FormState>,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a path lands once resolved
enum Target {
    Element(FieldPath),
    /// An option inside the group at the given path
    Option(FieldPath),
}

impl Form {
    pub fn new() -> Self {
        Self::with_config(FormConfig::default())
    }

    pub fn with_config(config: FormConfig) -> Self {
        Self {
            config,
            fields: ElementMap::new(),
            form_errors: IndexMap::new(),
            state: Rc::new(FormState::default()),
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Top-level elements in registration order
    pub fn fields(&self) -> &ElementMap {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Element at `path`, if registered
    pub fn element(&self, path: &FieldPath) -> Option<&FormElement> {
        lookup(&self.fields, path.segments())
    }

    /// Mirrored errors of a top-level element
    ///
    /// Outer `None`: unknown name. Inner `None`: known but not validated.
    pub fn errors_for(&self, name: &str) -> Option<&Option<Errors>> {
        self.form_errors.get(name)
    }

    /// The last published snapshot
    ///
    /// Every publish swaps in a new allocation, so `Rc::ptr_eq` tells
    /// consumers whether anything was republished.
    pub fn form_state(&self) -> Rc<FormState> {
        Rc::clone(&self.state)
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Register a top-level field
    pub fn register(&mut self, descriptor: FieldDescriptor) -> Result<FieldProps> {
        self.register_in(&FieldPath::root(), descriptor)
    }

    /// Register a field inside `scope` (the form root, a fieldset or a field array)
    ///
    /// Re-registering an existing name updates it in place and keeps any bound
    /// element.
    pub fn register_in(&mut self, scope: &FieldPath, descriptor: FieldDescriptor) -> Result<FieldProps> {
        let name = checked_name(&descriptor.name, FormElementKind::Field)?;
        let id = descriptor.id.unwrap_or_else(|| name.clone());
        let field_type = descriptor
            .field_type
            .unwrap_or_else(|| self.config.form.default_field_type.clone());
        let path = scope.child(name.clone());

        let container = self.container_mut(scope)?;
        match container.get_mut(&name) {
            Some(FormElement::Field(field)) => {
                field.core.id = id.clone();
                field.core.set_rules(descriptor.rules.clone());
                field.field_type = field_type.clone();
                field.default_value = descriptor.default_value.clone();
            }
            Some(existing) => return Err(conflict(&name, existing, FormElementKind::Field)),
            None => {
                let field = Field::new(
                    id.clone(),
                    name.clone(),
                    descriptor.rules.clone(),
                    field_type.clone(),
                    descriptor.default_value.clone(),
                );
                container.insert(name.clone(), FormElement::Field(field));
                self.seed_errors(&path);
                debug!(path = %path, "registered field");
            }
        }

        Ok(FieldProps {
            id,
            name,
            on_change: self.change_handler(&path),
            path,
            rules: descriptor.rules,
            field_type,
            default_value: descriptor.default_value,
        })
    }

    /// Register a fieldset inside `scope`
    pub fn register_fieldset(&mut self, scope: &FieldPath, descriptor: GroupDescriptor) -> Result<GroupProps> {
        let kind = FormElementKind::Fieldset;
        let name = checked_name(&descriptor.name, kind)?;
        let id = descriptor.id.unwrap_or_else(|| name.clone());
        let path = scope.child(name.clone());

        let container = self.container_mut(scope)?;
        match container.get_mut(&name) {
            Some(FormElement::Fieldset(fieldset)) => {
                fieldset.id = id.clone();
                fieldset.rules = descriptor.rules;
            }
            Some(existing) => return Err(conflict(&name, existing, kind)),
            None => {
                let fieldset = Fieldset::new(id.clone(), name.clone(), descriptor.rules);
                container.insert(name.clone(), FormElement::Fieldset(fieldset));
                self.seed_errors(&path);
                debug!(path = %path, "registered fieldset");
            }
        }

        Ok(GroupProps { id, name, kind, path })
    }

    /// Register a field array inside `scope`
    pub fn register_field_array(&mut self, scope: &FieldPath, descriptor: GroupDescriptor) -> Result<GroupProps> {
        let kind = FormElementKind::FieldArray;
        let name = checked_name(&descriptor.name, kind)?;
        let id = descriptor.id.unwrap_or_else(|| name.clone());
        let path = scope.child(name.clone());

        let container = self.container_mut(scope)?;
        match container.get_mut(&name) {
            Some(FormElement::FieldArray(array)) => {
                array.id = id.clone();
                array.rules = descriptor.rules;
            }
            Some(existing) => return Err(conflict(&name, existing, kind)),
            None => {
                let array = FieldArray::new(id.clone(), name.clone(), descriptor.rules);
                container.insert(name.clone(), FormElement::FieldArray(array));
                self.seed_errors(&path);
                debug!(path = %path, "registered field array");
            }
        }

        Ok(GroupProps { id, name, kind, path })
    }

    /// Register a checkbox group inside `scope`
    pub fn register_checkbox_group(
        &mut self,
        scope: &FieldPath,
        descriptor: CheckboxGroupDescriptor,
    ) -> Result<GroupProps> {
        let kind = FormElementKind::CheckboxGroup;
        let name = checked_name(&descriptor.name, kind)?;
        let id = descriptor.id.unwrap_or_else(|| name.clone());
        let path = scope.child(name.clone());

        let container = self.container_mut(scope)?;
        match container.get_mut(&name) {
            Some(FormElement::CheckboxGroup(group)) => {
                group.core.id = id.clone();
                group.core.set_rules(descriptor.rules);
                group.default_checked = descriptor.default_checked;
            }
            Some(existing) => return Err(conflict(&name, existing, kind)),
            None => {
                let group = CheckboxGroup::new(
                    id.clone(),
                    name.clone(),
                    descriptor.rules,
                    descriptor.default_checked,
                );
                container.insert(name.clone(), FormElement::CheckboxGroup(group));
                self.seed_errors(&path);
                debug!(path = %path, "registered checkbox group");
            }
        }

        Ok(GroupProps { id, name, kind, path })
    }

    /// Register a radio button group inside `scope`
    pub fn register_radio_group(
        &mut self,
        scope: &FieldPath,
        descriptor: RadioButtonGroupDescriptor,
    ) -> Result<GroupProps> {
        let kind = FormElementKind::RadioButtonGroup;
        let name = checked_name(&descriptor.name, kind)?;
        let id = descriptor.id.unwrap_or_else(|| name.clone());
        let path = scope.child(name.clone());

        let container = self.container_mut(scope)?;
        match container.get_mut(&name) {
            Some(FormElement::RadioButtonGroup(group)) => {
                group.core.id = id.clone();
                group.core.set_rules(descriptor.rules);
                group.default_value = descriptor.default_value;
            }
            Some(existing) => return Err(conflict(&name, existing, kind)),
            None => {
                let group = RadioButtonGroup::new(
                    id.clone(),
                    name.clone(),
                    descriptor.rules,
                    descriptor.default_value,
                );
                container.insert(name.clone(), FormElement::RadioButtonGroup(group));
                self.seed_errors(&path);
                debug!(path = %path, "registered radio button group");
            }
        }

        Ok(GroupProps { id, name, kind, path })
    }

    /// Register a checkbox option in the group at `group_path`
    pub fn register_checkbox(&mut self, group_path: &FieldPath, descriptor: OptionDescriptor) -> Result<OptionProps> {
        let on_change = self.change_handler(group_path);
        let group = match lookup_mut(&mut self.fields, group_path.segments()) {
            Some(FormElement::CheckboxGroup(group)) => group,
            Some(other) => return Err(mismatch(group_path, "checkbox group", other)),
            None => return Err(missing(group_path)),
        };
        let value = checked_option(&descriptor.value, group.name())?;
        let id = descriptor.id.unwrap_or_else(|| value.clone());
        let default_checked = group.default_checked_for(&value);
        let name = group.name().to_string();

        match group.fields.get_mut(&value) {
            Some(checkbox) => {
                checkbox.id = id.clone();
                checkbox.default_checked = default_checked;
            }
            None => {
                let checkbox = Checkbox::new(id.clone(), name.clone(), value.clone(), default_checked);
                group.fields.insert(value.clone(), checkbox);
                debug!(group = %group_path, value = %value, input = InputType::Checkbox.as_str(), "registered option");
            }
        }

        Ok(OptionProps {
            id,
            name,
            path: group_path.child(value.clone()),
            input_type: InputType::Checkbox,
            value,
            default_checked,
            on_change,
        })
    }

    /// Register a radio option in the group at `group_path`
    pub fn register_radio(&mut self, group_path: &FieldPath, descriptor: OptionDescriptor) -> Result<OptionProps> {
        let on_change = self.change_handler(group_path);
        let group = match lookup_mut(&mut self.fields, group_path.segments()) {
            Some(FormElement::RadioButtonGroup(group)) => group,
            Some(other) => return Err(mismatch(group_path, "radio button group", other)),
            None => return Err(missing(group_path)),
        };
        let value = checked_option(&descriptor.value, group.name())?;
        let id = descriptor.id.unwrap_or_else(|| value.clone());
        let default_checked = group.default_checked_for(&value);
        let name = group.name().to_string();

        match group.fields.get_mut(&value) {
            Some(radio) => {
                radio.id = id.clone();
                radio.default_checked = default_checked;
            }
            None => {
                let radio = RadioButton::new(id.clone(), name.clone(), value.clone(), default_checked);
                group.fields.insert(value.clone(), radio);
                debug!(group = %group_path, value = %value, input = InputType::Radio.as_str(), "registered option");
            }
        }

        Ok(OptionProps {
            id,
            name,
            path: group_path.child(value.clone()),
            input_type: InputType::Radio,
            value,
            default_checked,
            on_change,
        })
    }

    /// Append a fresh child to the field array at `array_path`
    ///
    /// The child is named `{array}{separator}{counter}` and carries the
    /// array's rules.
    pub fn append(&mut self, array_path: &FieldPath) -> Result<FieldProps> {
        let separator = self.config.form.array_separator.clone();
        let array = match lookup_mut(&mut self.fields, array_path.segments()) {
            Some(FormElement::FieldArray(array)) => array,
            Some(other) => return Err(mismatch(array_path, "field array", other)),
            None => return Err(missing(array_path)),
        };
        let name = array.next_child_name(&separator);
        let rules = array.rules.clone();
        debug!(array = %array_path, child = %name, "appending field");

        self.register_in(array_path, FieldDescriptor::new(name).with_rules(rules))
    }

    /// Remove one child of the field array at `array_path`
    ///
    /// Returns false, without failing, when the array or the child is gone.
    pub fn remove(&mut self, array_path: &FieldPath, child: &str) -> bool {
        let removed = match lookup_mut(&mut self.fields, array_path.segments()) {
            Some(FormElement::FieldArray(array)) => array.remove(child).is_some(),
            _ => false,
        };
        if removed {
            debug!(array = %array_path, child = %child, "removed field");
            if let Some(top) = array_path.top_level() {
                self.remirror_errors(top);
            }
        } else {
            self.stale(&array_path.child(child), "remove");
        }
        removed
    }

    // -------------------------------------------------------------------------
    // Binding
    // -------------------------------------------------------------------------

    /// Ref callback: bind a mounted element, or unregister on unmount
    ///
    /// Binding validates the element (or its option group) right away without
    /// publishing a snapshot.
    pub fn register_field(&mut self, path: &FieldPath, handle: Option<&Rc<dyn ElementHandle>>) {
        let Some(handle) = handle else {
            self.unregister(path);
            return;
        };

        let validate_target = match self.resolve(path) {
            Some(Target::Element(element_path)) => {
                match lookup_mut(&mut self.fields, element_path.segments()) {
                    Some(FormElement::Field(field)) => {
                        field.bind(handle);
                        Some(element_path)
                    }
                    _ => None,
                }
            }
            Some(Target::Option(group_path)) => {
                let value = path.last().unwrap_or_default();
                match lookup_mut(&mut self.fields, group_path.segments()) {
                    Some(FormElement::CheckboxGroup(group)) => {
                        if let Some(checkbox) = group.fields.get_mut(value) {
                            checkbox.bind(handle);
                        }
                        Some(group_path)
                    }
                    Some(FormElement::RadioButtonGroup(group)) => {
                        if let Some(radio) = group.fields.get_mut(value) {
                            radio.bind(handle);
                        }
                        Some(group_path)
                    }
                    _ => None,
                }
            }
            None => None,
        };

        match validate_target {
            Some(target) => {
                debug!(path = %path, "bound element");
                self.validate_path(&target, false);
            }
            None => self.stale(path, "bind"),
        }
    }

    /// Remove the element at `path` from its parent mapping
    ///
    /// Top-level elements also drop their mirrored errors. Returns false when
    /// nothing was registered there.
    pub fn unregister(&mut self, path: &FieldPath) -> bool {
        let removed = match self.resolve(path) {
            Some(Target::Element(element_path)) => match element_path.parent() {
                Some(parent) if parent.is_root() => {
                    let name = path.last().unwrap_or_default();
                    self.form_errors.shift_remove(name);
                    self.fields.shift_remove(name).is_some()
                }
                Some(parent) => {
                    let name = path.last().unwrap_or_default();
                    lookup_mut(&mut self.fields, parent.segments())
                        .and_then(FormElement::children_mut)
                        .and_then(|children| children.shift_remove(name))
                        .is_some()
                }
                None => false,
            },
            Some(Target::Option(group_path)) => {
                let value = path.last().unwrap_or_default();
                match lookup_mut(&mut self.fields, group_path.segments()) {
                    Some(FormElement::CheckboxGroup(group)) => group.fields.shift_remove(value).is_some(),
                    Some(FormElement::RadioButtonGroup(group)) => group.fields.shift_remove(value).is_some(),
                    _ => false,
                }
            }
            None => false,
        };

        if removed {
            debug!(path = %path, "unregistered element");
            if path.len() > 1 {
                if let Some(top) = path.top_level() {
                    self.remirror_errors(top);
                }
            }
        } else {
            self.stale(path, "unregister");
        }
        removed
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Validate a top-level element by name
    ///
    /// Unknown names are ignored: an unmount may have raced the call.
    pub fn validate_field(&mut self, name: &str, should_refresh: bool) {
        self.validate_path(&FieldPath::top(name), should_refresh);
    }

    /// Validate the element at `path` and mirror its top-level errors
    ///
    /// An option path validates its group. With `should_refresh` a new
    /// snapshot is published.
    pub fn validate_path(&mut self, path: &FieldPath, should_refresh: bool) {
        let element_path = match self.resolve(path) {
            Some(Target::Element(element_path)) => element_path,
            Some(Target::Option(group_path)) => group_path,
            None => {
                self.stale(path, "validate");
                return;
            }
        };
        let Some(element) = lookup_mut(&mut self.fields, element_path.segments()) else {
            return;
        };
        element.validate();

        if let Some(top) = element_path.top_level() {
            self.mirror_errors(top);
        }
        if should_refresh {
            self.publish();
        }
    }

    /// Validate every top-level element, then publish once
    pub fn validate_form(&mut self) {
        let names: Vec<String> = self.fields.keys().cloned().collect();
        for name in &names {
            if let Some(element) = self.fields.get_mut(name) {
                element.validate();
            }
            self.mirror_errors(name);
        }
        self.publish();
    }

    pub fn is_form_valid(&self) -> bool {
        self.fields.values().all(FormElement::is_valid)
    }

    /// Values of every top-level element that has one
    pub fn get_form_values(&self) -> FormData {
        self.fields
            .iter()
            .filter_map(|(name, element)| element.value().map(|value| (name.clone(), value)))
            .collect()
    }

    /// Submit intercept: prevent default, validate, and hand the values to
    /// `callback` only if the whole form is valid
    ///
    /// Returns whether the callback ran. An invalid form is not an error; the
    /// failures are in [`Form::form_state`].
    pub fn handle_submit<E, F>(&mut self, event: &mut E, callback: F) -> bool
    where
        E: SubmitEvent + ?Sized,
        F: FnOnce(FormData),
    {
        event.prevent_default();
        self.validate_form();
        if !self.is_form_valid() {
            debug!("submit blocked by invalid form");
            return false;
        }
        callback(self.get_form_values());
        true
    }

    // -------------------------------------------------------------------------
    // Element access
    // -------------------------------------------------------------------------

    /// Focus the element at `path`; false when it is gone or unbound
    pub fn focus(&self, path: &FieldPath) -> bool {
        match self.resolve(path) {
            Some(Target::Element(element_path)) => match self.element(&element_path) {
                Some(FormElement::Field(field)) => field.focus(),
                _ => false,
            },
            Some(Target::Option(group_path)) => {
                let value = path.last().unwrap_or_default();
                match self.element(&group_path) {
                    Some(FormElement::CheckboxGroup(group)) => {
                        group.fields.get(value).is_some_and(Checkbox::focus)
                    }
                    Some(FormElement::RadioButtonGroup(group)) => {
                        group.fields.get(value).is_some_and(RadioButton::focus)
                    }
                    _ => false,
                }
            }
            None => false,
        }
    }

    /// Select `value` in the radio group at `group_path`
    pub fn set_radio_value(&self, group_path: &FieldPath, value: &str) -> bool {
        match self.element(group_path) {
            Some(FormElement::RadioButtonGroup(group)) => group.set_value(value),
            _ => false,
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Child mapping that registrations in `scope` go into
    fn container_mut(&mut self, scope: &FieldPath) -> Result<&mut ElementMap> {
        if scope.is_root() {
            return Ok(&mut self.fields);
        }
        match lookup_mut(&mut self.fields, scope.segments()) {
            Some(element) => {
                let kind = element.kind();
                element.children_mut().ok_or_else(|| FormError::ScopeMismatch {
                    path: scope.to_string(),
                    expected: "fieldset or field array".to_string(),
                    found: kind,
                })
            }
            None => Err(missing(scope)),
        }
    }

    fn resolve(&self, path: &FieldPath) -> Option<Target> {
        if self.element(path).is_some() {
            return Some(Target::Element(path.clone()));
        }
        let parent = path.parent()?;
        let value = path.last()?;
        let is_option = match self.element(&parent)? {
            FormElement::CheckboxGroup(group) => group.fields.contains_key(value),
            FormElement::RadioButtonGroup(group) => group.fields.contains_key(value),
            _ => false,
        };
        is_option.then_some(Target::Option(parent))
    }

    fn change_handler(&self, target: &FieldPath) -> Option<ChangeHandler> {
        self.config
            .form
            .validate_on_change
            .then(|| ChangeHandler::new(target.clone()))
    }

    /// Known but unvalidated top-level entries read as `None`
    fn seed_errors(&mut self, path: &FieldPath) {
        if path.len() == 1 {
            if let Some(name) = path.top_level() {
                self.form_errors.entry(name.to_string()).or_insert(None);
            }
        }
    }

    fn mirror_errors(&mut self, name: &str) {
        if let Some(element) = self.fields.get(name) {
            self.form_errors.insert(name.to_string(), Some(element.errors()));
        }
    }

    /// Refresh an already mirrored entry after its element changed shape
    ///
    /// Unvalidated entries stay `None`.
    fn remirror_errors(&mut self, name: &str) {
        if matches!(self.form_errors.get(name), Some(Some(_))) {
            self.mirror_errors(name);
        }
    }

    fn publish(&mut self) {
        self.state = Rc::new(FormState {
            errors: self.form_errors.clone(),
        });
        debug!(fields = self.form_errors.len(), "published form state");
    }

    fn stale(&self, path: &FieldPath, operation: &str) {
        if cfg!(debug_assertions) && self.config.diagnostics.warn_stale_references {
            warn!(path = %path, operation, "ignoring unregistered form element");
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn checked_name(name: &str, kind: FormElementKind) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FormError::EmptyName { kind });
    }
    Ok(name.to_string())
}

fn checked_option(value: &str, group: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(FormError::EmptyOptionValue {
            group: group.to_string(),
        });
    }
    Ok(value.to_string())
}

fn conflict(name: &str, existing: &FormElement, requested: FormElementKind) -> FormError {
    FormError::KindConflict {
        name: name.to_string(),
        existing: existing.kind(),
        requested,
    }
}

fn mismatch(path: &FieldPath, expected: &str, found: &FormElement) -> FormError {
    FormError::ScopeMismatch {
        path: path.to_string(),
        expected: expected.to_string(),
        found: found.kind(),
    }
}

fn missing(path: &FieldPath) -> FormError {
    FormError::MissingScope {
        path: path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::MemoryElement;
    use crate::validators::{has_max_checked, is_required};
    use serde_json::json;

    fn bind(form: &mut Form, path: &FieldPath, value: &str) -> Rc<MemoryElement> {
        let element = Rc::new(MemoryElement::new(value));
        let handle: Rc<dyn ElementHandle> = element.clone();
        form.register_field(path, Some(&handle));
        element
    }

    #[test]
    fn test_create_form() {
        let form = Form::new();
        assert!(form.is_empty());
        assert!(form.form_state().errors.is_empty());
    }

    #[test]
    fn test_register_seeds_unvalidated_errors() {
        let mut form = Form::new();
        let props = form
            .register(FieldDescriptor::new("lastName").with_rule("required", is_required("req")))
            .unwrap();

        assert_eq!(props.path, FieldPath::top("lastName"));
        assert_eq!(props.field_type, "text");
        assert_eq!(props.id, "lastName");
        assert!(props.on_change.is_none());
        assert_eq!(form.errors_for("lastName"), Some(&None));
        assert_eq!(form.errors_for("unknown"), None);
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut form = Form::new();
        let result = form.register(FieldDescriptor::new("   "));
        assert!(matches!(result, Err(FormError::EmptyName { .. })));
    }

    #[test]
    fn test_name_is_trimmed() {
        let mut form = Form::new();
        let props = form.register(FieldDescriptor::new(" email ")).unwrap();
        assert_eq!(props.name, "email");
        assert!(form.element(&FieldPath::top("email")).is_some());
    }

    #[test]
    fn test_kind_conflict() {
        let mut form = Form::new();
        form.register_fieldset(&FieldPath::root(), GroupDescriptor::new("address"))
            .unwrap();
        let result = form.register(FieldDescriptor::new("address"));
        assert!(matches!(result, Err(FormError::KindConflict { .. })));
    }

    #[test]
    fn test_missing_scope() {
        let mut form = Form::new();
        let result = form.register_in(&FieldPath::top("address"), FieldDescriptor::new("street"));
        assert!(matches!(result, Err(FormError::MissingScope { .. })));
    }

    #[test]
    fn test_scope_mismatch() {
        let mut form = Form::new();
        let colors = form
            .register_checkbox_group(&FieldPath::root(), CheckboxGroupDescriptor::new("colors"))
            .unwrap();
        let result = form.register_in(&colors.path, FieldDescriptor::new("red"));
        assert!(matches!(result, Err(FormError::ScopeMismatch { .. })));

        let result = form.register_radio(&colors.path, OptionDescriptor::new("red"));
        assert!(matches!(result, Err(FormError::ScopeMismatch { .. })));
    }

    #[test]
    fn test_bind_validates_without_publishing() {
        let mut form = Form::new();
        let props = form
            .register(FieldDescriptor::new("lastName").with_rule("required", is_required("req")))
            .unwrap();
        let before = form.form_state();

        bind(&mut form, &props.path, "");

        let mirrored = form.errors_for("lastName").unwrap().as_ref().unwrap();
        assert_eq!(mirrored.messages(), vec!["req"]);
        assert!(Rc::ptr_eq(&before, &form.form_state()));
    }

    #[test]
    fn test_validate_field_publishes_new_snapshot() {
        let mut form = Form::new();
        let props = form
            .register(FieldDescriptor::new("lastName").with_rule("required", is_required("req")))
            .unwrap();
        let element = bind(&mut form, &props.path, "");
        let before = form.form_state();

        element.set_value("doe");
        form.validate_field("lastName", true);

        let after = form.form_state();
        assert!(!Rc::ptr_eq(&before, &after));
        assert!(!after.has_errors());
    }

    #[test]
    fn test_unbind_unregisters() {
        let mut form = Form::new();
        let props = form.register(FieldDescriptor::new("email")).unwrap();
        bind(&mut form, &props.path, "x");

        form.register_field(&props.path, None);
        assert!(form.is_empty());
        assert_eq!(form.errors_for("email"), None);
    }

    #[test]
    fn test_change_handler_when_configured() {
        let mut form = Form::with_config(FormConfig::validating_on_change());
        let props = form
            .register(FieldDescriptor::new("lastName").with_rule("required", is_required("req")))
            .unwrap();
        let element = bind(&mut form, &props.path, "");
        let handler = props.on_change.clone().unwrap();
        assert_eq!(handler.target, props.path);

        element.set_value("doe");
        let before = form.form_state();
        handler.call(&mut form);
        assert!(!Rc::ptr_eq(&before, &form.form_state()));
        assert!(form.is_form_valid());
    }

    #[test]
    fn test_option_change_handler_targets_group() {
        let mut form = Form::with_config(FormConfig::validating_on_change());
        let colors = form
            .register_checkbox_group(
                &FieldPath::root(),
                CheckboxGroupDescriptor::new("colors").with_rule("max", has_max_checked(1, "one only")),
            )
            .unwrap();
        let red = form.register_checkbox(&colors.path, OptionDescriptor::new("red")).unwrap();
        assert_eq!(red.on_change.unwrap().target, colors.path);
        assert_eq!(red.path, FieldPath::from_segments(["colors", "red"]));
    }

    #[test]
    fn test_get_form_values_skips_unbound() {
        let mut form = Form::new();
        let first = form.register(FieldDescriptor::new("first")).unwrap();
        form.register(FieldDescriptor::new("last")).unwrap();
        let _jane = bind(&mut form, &first.path, "Jane");

        assert_eq!(Value::Object(form.get_form_values()), json!({"first": "Jane"}));
    }

    #[test]
    fn test_submit_prevents_default() {
        let mut form = Form::new();
        let mut event = FormSubmitEvent::default();
        let submitted = form.handle_submit(&mut event, |_| {});
        assert!(event.default_prevented);
        assert!(submitted);
    }

    #[test]
    fn test_focus() {
        let mut form = Form::new();
        let props = form.register(FieldDescriptor::new("email")).unwrap();
        assert!(!form.focus(&props.path));
        let element = bind(&mut form, &props.path, "");
        assert!(form.focus(&props.path));
        assert_eq!(element.focus_count(), 1);
        assert!(!form.focus(&FieldPath::top("missing")));
    }
}
