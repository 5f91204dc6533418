//! Form Lifecycle Tests
//!
//! Mount, bind, validate, submit and unmount whole forms through the public
//! registry API, the way a rendering layer drives it.

use std::rc::Rc;

use familiar_forms::validators::{has_max_checked, is_email, is_required, is_selected, rule};
use familiar_forms::{
    CheckboxGroupDescriptor, ElementHandle, Errors, FieldDescriptor, FieldPath, Form, FormConfig,
    FormElementKind, FormError, FormSubmitEvent, GroupDescriptor, MemoryElement, OptionDescriptor,
    RadioButtonGroupDescriptor,
};
use serde_json::{json, Value};

fn bind(form: &mut Form, path: &FieldPath, value: &str) -> Rc<MemoryElement> {
    let element = Rc::new(MemoryElement::new(value));
    let handle: Rc<dyn ElementHandle> = element.clone();
    form.register_field(path, Some(&handle));
    element
}

fn bind_option(form: &mut Form, path: &FieldPath, checked: bool) -> Rc<MemoryElement> {
    let value = path.last().unwrap().to_string();
    let element = Rc::new(MemoryElement::option(value, checked));
    let handle: Rc<dyn ElementHandle> = element.clone();
    form.register_field(path, Some(&handle));
    element
}

fn submit(form: &mut Form) -> Option<Value> {
    let mut submitted = None;
    form.handle_submit(&mut FormSubmitEvent::default(), |values| {
        submitted = Some(Value::Object(values))
    });
    submitted
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn test_reregistration_keeps_bound_handle() {
    let mut form = Form::new();
    let props = form
        .register(FieldDescriptor::new("lastName").with_rule("required", is_required("req")))
        .unwrap();
    let _input = bind(&mut form, &props.path, "doe");

    // A re-render registers the same descriptor again
    form.register(FieldDescriptor::new("lastName").with_rule("required", is_required("req")))
        .unwrap();

    assert_eq!(form.len(), 1);
    let field = form.element(&props.path).unwrap().as_field().unwrap();
    assert!(field.is_bound());
    assert_eq!(field.value(), Some(json!("doe")));
}

#[test]
fn test_reregistration_updates_rules() {
    let mut form = Form::new();
    let props = form
        .register(FieldDescriptor::new("email").with_rule("required", is_required("req")))
        .unwrap();
    let _input = bind(&mut form, &props.path, "not-an-email");

    form.register(FieldDescriptor::new("email").with_rule("email", is_email("bad email")))
        .unwrap();
    form.validate_field("email", true);

    let field = form.element(&props.path).unwrap().as_field().unwrap();
    let keys: Vec<&str> = field.errors().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["email"]);
    assert_eq!(field.errors()["email"].as_deref(), Some("bad email"));
}

#[test]
fn test_registration_order_is_preserved() {
    let mut form = Form::new();
    for name in ["zeta", "alpha", "mid"] {
        let props = form.register(FieldDescriptor::new(name)).unwrap();
        bind(&mut form, &props.path, name);
    }
    let names: Vec<&str> = form.fields().keys().map(String::as_str).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_register_into_missing_fieldset_fails() {
    let mut form = Form::new();
    let result = form.register_in(
        &FieldPath::top("address"),
        FieldDescriptor::new("street"),
    );
    match result {
        Err(FormError::MissingScope { path }) => assert_eq!(path, "address"),
        other => panic!("Expected MissingScope, got {:?}", other),
    }
}

#[test]
fn test_kind_conflict_reports_both_kinds() {
    let mut form = Form::new();
    form.register(FieldDescriptor::new("tags")).unwrap();
    let result = form.register_field_array(&FieldPath::root(), GroupDescriptor::new("tags"));
    match result {
        Err(FormError::KindConflict { existing, requested, .. }) => {
            assert_eq!(existing, FormElementKind::Field);
            assert_eq!(requested, FormElementKind::FieldArray);
        }
        other => panic!("Expected KindConflict, got {:?}", other),
    }
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_last_name_scenario() {
    let mut form = Form::new();
    let props = form
        .register(FieldDescriptor::new("lastName").with_rule("required", is_required("req")))
        .unwrap();
    let input = bind(&mut form, &props.path, "");

    form.validate_field("lastName", true);
    let field = form.element(&props.path).unwrap();
    assert_eq!(
        field.errors(),
        Errors::Flat([("required".to_string(), Some("req".to_string()))].into())
    );
    assert!(!field.is_valid());

    input.set_value("doe");
    form.validate_field("lastName", true);
    let field = form.element(&props.path).unwrap();
    assert_eq!(
        field.errors(),
        Errors::Flat([("required".to_string(), None)].into())
    );
    assert!(field.is_valid());
}

#[test]
fn test_validate_form_publishes_once() {
    let mut form = Form::new();
    for name in ["firstName", "lastName"] {
        let props = form
            .register(FieldDescriptor::new(name).with_rule("required", is_required("req")))
            .unwrap();
        bind(&mut form, &props.path, "");
    }
    let before = form.form_state();

    form.validate_form();
    let after = form.form_state();

    assert!(!Rc::ptr_eq(&before, &after));
    assert_eq!(after.errors.len(), 2);
    assert!(after.has_errors());
}

#[test]
fn test_snapshot_is_not_republished_without_refresh() {
    let mut form = Form::new();
    let props = form
        .register(FieldDescriptor::new("lastName").with_rule("required", is_required("req")))
        .unwrap();
    bind(&mut form, &props.path, "");
    let before = form.form_state();

    form.validate_field("lastName", false);

    assert!(Rc::ptr_eq(&before, &form.form_state()));
    assert!(form.errors_for("lastName").unwrap().as_ref().unwrap().has_errors());
}

#[test]
fn test_form_state_serializes_nested_errors() {
    let mut form = Form::new();
    let address = form
        .register_fieldset(&FieldPath::root(), GroupDescriptor::new("address"))
        .unwrap();
    let street = form
        .register_in(
            &address.path,
            FieldDescriptor::new("street").with_rule("required", is_required("Street is required")),
        )
        .unwrap();
    bind(&mut form, &street.path, "");

    form.validate_form();
    let state: Value = serde_json::from_str(&form.form_state().to_json().unwrap()).unwrap();
    assert_eq!(
        state,
        json!({"errors": {"address": {"street": {"required": "Street is required"}}}})
    );
}

// =============================================================================
// Submit
// =============================================================================

#[test]
fn test_submit_gating() {
    let mut form = Form::new();
    let props = form
        .register(FieldDescriptor::new("lastName").with_rule("required", is_required("req")))
        .unwrap();
    let input = bind(&mut form, &props.path, "");

    assert_eq!(submit(&mut form), None);

    input.set_value("x");
    assert_eq!(submit(&mut form), Some(json!({"lastName": "x"})));
}

#[test]
fn test_fieldset_rule_makes_children_gate_submit() {
    let mut form = Form::new();
    let address = form
        .register_fieldset(
            &FieldPath::root(),
            GroupDescriptor::new("address").with_rule("children", rule(|_: &Value| None)),
        )
        .unwrap();
    let street = form
        .register_in(
            &address.path,
            FieldDescriptor::new("street").with_rule("required", is_required("req")),
        )
        .unwrap();
    let input = bind(&mut form, &street.path, "");

    assert_eq!(submit(&mut form), None);
    let messages: Vec<String> = form.form_state().errors["address"]
        .as_ref()
        .unwrap()
        .messages()
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(messages, vec!["req"]);

    input.set_value("Main St");
    assert_eq!(submit(&mut form), Some(json!({"address": {"street": "Main St"}})));
}

#[test]
fn test_submit_collects_nested_values() {
    let mut form = Form::new();
    let root = FieldPath::root();

    let name = form.register(FieldDescriptor::new("name")).unwrap();
    let _name = bind(&mut form, &name.path, "Jane");

    let address = form.register_fieldset(&root, GroupDescriptor::new("address")).unwrap();
    let city = form.register_in(&address.path, FieldDescriptor::new("city")).unwrap();
    let _city = bind(&mut form, &city.path, "Oslo");

    let colors = form
        .register_checkbox_group(&root, CheckboxGroupDescriptor::new("colors"))
        .unwrap();
    let red = form.register_checkbox(&colors.path, OptionDescriptor::new("red")).unwrap();
    let blue = form.register_checkbox(&colors.path, OptionDescriptor::new("blue")).unwrap();
    let _red = bind_option(&mut form, &red.path, true);
    let _blue = bind_option(&mut form, &blue.path, false);

    let size = form
        .register_radio_group(&root, RadioButtonGroupDescriptor::new("size"))
        .unwrap();
    let small = form.register_radio(&size.path, OptionDescriptor::new("s")).unwrap();
    let _small = bind_option(&mut form, &small.path, true);

    assert_eq!(
        submit(&mut form),
        Some(json!({
            "name": "Jane",
            "address": {"city": "Oslo"},
            "colors": {"red": true, "blue": false},
            "size": "s",
        }))
    );
}

// =============================================================================
// Unmount
// =============================================================================

#[test]
fn test_validate_after_unregister_is_noop() {
    let mut form = Form::new();
    let props = form
        .register(FieldDescriptor::new("f").with_rule("required", is_required("req")))
        .unwrap();
    let _input = bind(&mut form, &props.path, "");
    let other = form
        .register(FieldDescriptor::new("g").with_rule("required", is_required("req")))
        .unwrap();
    let _other = bind(&mut form, &other.path, "");

    form.register_field(&props.path, None);
    let before = form.form_state();
    let errors_before = form.errors_for("g").cloned();

    form.validate_field("f", false);

    assert!(form.element(&props.path).is_none());
    assert_eq!(form.errors_for("f"), None);
    assert_eq!(form.errors_for("g").cloned(), errors_before);
    assert!(Rc::ptr_eq(&before, &form.form_state()));
}

#[test]
fn test_stale_operations_are_absorbed() {
    let mut form = Form::new();
    let gone = FieldPath::from_segments(["address", "street"]);

    form.validate_path(&gone, true);
    form.register_field(&gone, None);
    assert!(!form.unregister(&gone));
    assert!(!form.focus(&gone));
    assert!(!form.remove(&FieldPath::top("emails"), "emails-0"));
    assert!(form.is_empty());
}

#[test]
fn test_unmounting_nested_field() {
    let mut form = Form::new();
    let address = form
        .register_fieldset(&FieldPath::root(), GroupDescriptor::new("address"))
        .unwrap();
    let street = form.register_in(&address.path, FieldDescriptor::new("street")).unwrap();
    let zip = form.register_in(&address.path, FieldDescriptor::new("zip")).unwrap();
    let _street = bind(&mut form, &street.path, "Main St");
    let _zip = bind(&mut form, &zip.path, "12345");

    assert!(form.unregister(&street.path));

    let fieldset = form.element(&address.path).unwrap().as_fieldset().unwrap();
    assert_eq!(fieldset.len(), 1);
    assert_eq!(fieldset.value(), Some(json!({"zip": "12345"})));
}

#[test]
fn test_dropped_element_reads_as_unbound() {
    let mut form = Form::new();
    let props = form.register(FieldDescriptor::new("email")).unwrap();
    {
        let _input = bind(&mut form, &props.path, "a@b.io");
        assert_eq!(Value::Object(form.get_form_values()), json!({"email": "a@b.io"}));
    }
    assert!(form.get_form_values().is_empty());
}

// =============================================================================
// Field arrays
// =============================================================================

#[test]
fn test_field_array_append_and_remove() {
    let mut form = Form::new();
    let emails = form
        .register_field_array(
            &FieldPath::root(),
            GroupDescriptor::new("emails").with_rule("email", is_email("bad email")),
        )
        .unwrap();

    let first = form.append(&emails.path).unwrap();
    let second = form.append(&emails.path).unwrap();
    assert_eq!(first.name, "emails-0");
    assert_eq!(second.name, "emails-1");
    assert!(first.rules.contains("email"));

    let _first = bind(&mut form, &first.path, "a@b.io");
    let _second = bind(&mut form, &second.path, "nope");

    form.validate_field("emails", true);
    assert!(!form.is_form_valid());

    assert!(form.remove(&emails.path, "emails-1"));
    assert!(form.is_form_valid());

    let third = form.append(&emails.path).unwrap();
    assert_eq!(third.name, "emails-2");

    let array = form.element(&emails.path).unwrap().as_field_array().unwrap();
    assert_eq!(array.names().collect::<Vec<_>>(), vec!["emails-0", "emails-2"]);
}

#[test]
fn test_field_array_separator_from_config() {
    let mut config = FormConfig::default();
    config.form.array_separator = "_".to_string();
    let mut form = Form::with_config(config);
    let phones = form
        .register_field_array(&FieldPath::root(), GroupDescriptor::new("phones"))
        .unwrap();

    assert_eq!(form.append(&phones.path).unwrap().name, "phones_0");
}

#[test]
fn test_append_skips_directly_registered_child() {
    let mut form = Form::new();
    let emails = form
        .register_field_array(&FieldPath::root(), GroupDescriptor::new("emails"))
        .unwrap();
    let manual = form
        .register_in(
            &emails.path,
            FieldDescriptor::new("emails-0").with_rule("required", is_required("req")),
        )
        .unwrap();
    let _manual = bind(&mut form, &manual.path, "a@b.io");

    let appended = form.append(&emails.path).unwrap();
    assert_eq!(appended.name, "emails-1");

    let array = form.element(&emails.path).unwrap().as_field_array().unwrap();
    assert_eq!(array.len(), 2);
    let kept = form.element(&manual.path).unwrap().as_field().unwrap();
    assert!(kept.rules().contains("required"));
    assert!(kept.is_bound());
}

#[test]
fn test_removed_child_drops_from_published_errors() {
    let mut form = Form::new();
    let last_name = form.register(FieldDescriptor::new("lastName")).unwrap();
    let _last_name = bind(&mut form, &last_name.path, "doe");
    let emails = form
        .register_field_array(
            &FieldPath::root(),
            GroupDescriptor::new("emails").with_rule("email", is_email("bad email")),
        )
        .unwrap();
    let first = form.append(&emails.path).unwrap();
    let second = form.append(&emails.path).unwrap();
    let _first = bind(&mut form, &first.path, "a@b.io");
    let _second = bind(&mut form, &second.path, "nope");

    form.validate_field("emails", true);
    assert!(form.form_state().has_errors());

    assert!(form.remove(&emails.path, "emails-1"));
    form.validate_field("lastName", true);

    let state = form.form_state();
    assert!(form.is_form_valid());
    assert!(!state.has_errors());
    let json: Value = serde_json::from_str(&state.to_json().unwrap()).unwrap();
    assert!(json["errors"]["emails"].get("emails-1").is_none());
}

#[test]
fn test_unregistered_nested_field_drops_from_published_errors() {
    let mut form = Form::new();
    let address = form
        .register_fieldset(&FieldPath::root(), GroupDescriptor::new("address"))
        .unwrap();
    let street = form
        .register_in(
            &address.path,
            FieldDescriptor::new("street").with_rule("required", is_required("req")),
        )
        .unwrap();
    let _street = bind(&mut form, &street.path, "");
    form.validate_form();
    assert!(form.form_state().has_errors());

    form.register_field(&street.path, None);
    form.validate_form();

    assert!(!form.form_state().has_errors());
    assert_eq!(
        form.errors_for("address").cloned(),
        Some(Some(Errors::Nested(Default::default())))
    );
}

#[test]
fn test_append_to_fieldset_fails() {
    let mut form = Form::new();
    let address = form
        .register_fieldset(&FieldPath::root(), GroupDescriptor::new("address"))
        .unwrap();
    assert!(matches!(
        form.append(&address.path),
        Err(FormError::ScopeMismatch { .. })
    ));
}

// =============================================================================
// Option groups
// =============================================================================

#[test]
fn test_radio_group_exclusive_selection() {
    let mut form = Form::new();
    let size = form
        .register_radio_group(
            &FieldPath::root(),
            RadioButtonGroupDescriptor::new("size")
                .with_rule("selected", is_selected("pick a size"))
                .with_default_value("m"),
        )
        .unwrap();

    let mut inputs = Vec::new();
    for value in ["s", "m", "l"] {
        let props = form.register_radio(&size.path, OptionDescriptor::new(value)).unwrap();
        assert_eq!(props.default_checked, value == "m");
        inputs.push(bind_option(&mut form, &props.path, props.default_checked));
    }

    assert!(form.set_radio_value(&size.path, "l"));
    let checked: Vec<bool> = inputs.iter().map(|input| input.checked()).collect();
    assert_eq!(checked, vec![false, false, true]);

    assert!(!form.set_radio_value(&size.path, "xl"));
    let checked: Vec<bool> = inputs.iter().map(|input| input.checked()).collect();
    assert_eq!(checked, vec![false, false, true]);

    assert_eq!(submit(&mut form), Some(json!({"size": "l"})));
}

#[test]
fn test_checkbox_group_max_checked() {
    let mut form = Form::new();
    let colors = form
        .register_checkbox_group(
            &FieldPath::root(),
            CheckboxGroupDescriptor::new("colors")
                .with_rule("max", has_max_checked(2, "at most two"))
                .with_default_checked("red", true)
                .with_default_checked("green", true),
        )
        .unwrap();

    let mut inputs = Vec::new();
    for color in ["red", "green", "blue"] {
        let props = form.register_checkbox(&colors.path, OptionDescriptor::new(color)).unwrap();
        inputs.push(bind_option(&mut form, &props.path, props.default_checked));
    }
    assert!(form.is_form_valid());

    inputs[2].set_checked(true);
    form.validate_field("colors", true);
    assert!(!form.is_form_valid());
    let state = form.form_state();
    let errors = state.errors["colors"].as_ref().unwrap();
    assert_eq!(errors.messages(), vec!["at most two"]);

    inputs[0].set_checked(false);
    form.validate_field("colors", true);
    assert!(form.is_form_valid());
}

#[test]
fn test_change_handler_revalidates_option_group() {
    let mut form = Form::with_config(FormConfig::validating_on_change());
    let colors = form
        .register_checkbox_group(
            &FieldPath::root(),
            CheckboxGroupDescriptor::new("colors").with_rule("max", has_max_checked(1, "one only")),
        )
        .unwrap();
    let red = form.register_checkbox(&colors.path, OptionDescriptor::new("red")).unwrap();
    let blue = form.register_checkbox(&colors.path, OptionDescriptor::new("blue")).unwrap();
    let _red = bind_option(&mut form, &red.path, true);
    let blue_input = bind_option(&mut form, &blue.path, false);

    blue_input.set_checked(true);
    blue.on_change.unwrap().call(&mut form);

    assert!(form.form_state().has_errors());
}

#[test]
fn test_focus_option() {
    let mut form = Form::new();
    let size = form
        .register_radio_group(&FieldPath::root(), RadioButtonGroupDescriptor::new("size"))
        .unwrap();
    let small = form.register_radio(&size.path, OptionDescriptor::new("s")).unwrap();
    let input = bind_option(&mut form, &small.path, false);

    assert!(form.focus(&small.path));
    assert_eq!(input.focus_count(), 1);
}
