//! Form Session CLI
//!
//! Drives a headless form through its whole lifecycle: register a sample
//! form, bind in-memory elements, apply input, submit, and report the
//! resulting snapshot.

use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use familiar_forms::validators::{
    has_max_checked, has_min_checked, is_email, is_required, is_selected, matches_pattern,
    min_length, rule,
};
use familiar_forms::{
    ChangeHandler, CheckboxGroupDescriptor, ElementHandle, FieldDescriptor, FieldPath, Form, FormConfig,
    FormSubmitEvent, GroupDescriptor, MemoryElement, OptionDescriptor, RadioButtonGroupDescriptor,
};
use regex::Regex;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "form-session")]
#[command(about = "Run a scripted headless form session")]
struct Cli {
    /// Config file to load (optional)
    #[arg(short, long)]
    config: Option<String>,

    /// Revalidate through change handlers after every input
    #[arg(long)]
    validate_on_change: bool,

    /// Set a text input, e.g. `--set lastName=Doe` or `--set address.zip=12345`
    #[arg(long = "set", value_name = "PATH=VALUE")]
    values: Vec<String>,

    /// Check a checkbox option, e.g. `--check colors.red`
    #[arg(long = "check", value_name = "PATH")]
    checks: Vec<String>,

    /// Select a radio option, e.g. `--select size=m`
    #[arg(long = "select", value_name = "GROUP=VALUE")]
    selections: Vec<String>,

    /// Number of entries in the `emails` field array
    #[arg(long, default_value_t = 1)]
    emails: usize,

    /// Print the form state as JSON
    #[arg(long)]
    json: bool,
}

/// Live elements of the session, keyed by dotted path
#[derive(Default)]
struct Elements {
    inputs: HashMap<String, Rc<MemoryElement>>,
    handlers: HashMap<String, ChangeHandler>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = FormConfig::load_from(cli.config.as_deref()).context("loading config")?;
    if cli.validate_on_change {
        config.form.validate_on_change = true;
    }

    let mut form = Form::with_config(config);
    let mut elements = Elements::default();
    build_sample_form(&mut form, &mut elements, cli.emails)?;

    for assignment in &cli.values {
        let (path, value) = split_assignment(assignment)?;
        let input = elements
            .inputs
            .get(path)
            .ok_or_else(|| anyhow!("no text input at '{}'", path))?;
        input.set_value(value);
        notify_change(&mut form, &elements, path);
    }

    for path in &cli.checks {
        let input = elements
            .inputs
            .get(path.as_str())
            .ok_or_else(|| anyhow!("no checkbox at '{}'", path))?;
        input.set_checked(true);
        notify_change(&mut form, &elements, path);
    }

    for selection in &cli.selections {
        let (group, value) = split_assignment(selection)?;
        if !form.set_radio_value(&FieldPath::top(group), value) {
            bail!("'{}' is not an option of radio group '{}'", value, group);
        }
        notify_change(&mut form, &elements, &format!("{}.{}", group, value));
    }

    let mut submitted = None;
    let mut event = FormSubmitEvent::default();
    form.handle_submit(&mut event, |values| submitted = Some(values));

    let state = form.form_state();
    if cli.json {
        println!("{}", state.to_json()?);
    }

    match submitted {
        Some(values) => {
            println!("✅ Form submitted");
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
        None => {
            println!("❌ Form is invalid");
            for (name, errors) in &state.errors {
                let Some(errors) = errors else { continue };
                for message in errors.messages() {
                    println!("  └─ {}: {}", name, message);
                }
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

fn build_sample_form(form: &mut Form, elements: &mut Elements, emails: usize) -> anyhow::Result<()> {
    let root = FieldPath::root();

    for name in ["firstName", "lastName"] {
        let props = form.register(
            FieldDescriptor::new(name)
                .with_rule("required", is_required("This field is required"))
                .with_rule("minLength", min_length(2, "Must be at least 2 characters")),
        )?;
        bind_text(form, elements, &props.path, props.on_change);
    }

    // Fieldset rules are never evaluated; having any makes the fieldset's
    // validity follow its children instead of passing unconditionally.
    let address = form.register_fieldset(
        &root,
        GroupDescriptor::new("address").with_rule("children", rule(|_: &Value| None)),
    )?;
    let street = form.register_in(
        &address.path,
        FieldDescriptor::new("street").with_rule("required", is_required("Street is required")),
    )?;
    bind_text(form, elements, &street.path, street.on_change);
    let zip = form.register_in(
        &address.path,
        FieldDescriptor::new("zip").with_rule(
            "pattern",
            matches_pattern(Regex::new(r"^\d{5}$")?, "Zip code must have 5 digits"),
        ),
    )?;
    bind_text(form, elements, &zip.path, zip.on_change);

    let email_list = form.register_field_array(
        &root,
        GroupDescriptor::new("emails")
            .with_rule("required", is_required("Email is required"))
            .with_rule("email", is_email("Not a valid email address")),
    )?;
    for _ in 0..emails {
        let props = form.append(&email_list.path)?;
        bind_text(form, elements, &props.path, props.on_change);
    }

    let colors = form.register_checkbox_group(
        &root,
        CheckboxGroupDescriptor::new("colors")
            .with_rule("min", has_min_checked(1, "Pick at least one color"))
            .with_rule("max", has_max_checked(2, "Pick at most two colors")),
    )?;
    for color in ["red", "green", "blue"] {
        let props = form.register_checkbox(&colors.path, OptionDescriptor::new(color))?;
        bind_option(form, elements, &props.path, props.default_checked, props.on_change);
    }

    let size = form.register_radio_group(
        &root,
        RadioButtonGroupDescriptor::new("size")
            .with_rule("selected", is_selected("Pick a size"))
            .with_default_value("m"),
    )?;
    for value in ["s", "m", "l"] {
        let props = form.register_radio(&size.path, OptionDescriptor::new(value))?;
        bind_option(form, elements, &props.path, props.default_checked, props.on_change);
    }

    Ok(())
}

fn bind_text(form: &mut Form, elements: &mut Elements, path: &FieldPath, on_change: Option<ChangeHandler>) {
    let input = Rc::new(MemoryElement::new(""));
    let handle: Rc<dyn ElementHandle> = input.clone();
    form.register_field(path, Some(&handle));
    track(elements, path, input, on_change);
}

fn bind_option(
    form: &mut Form,
    elements: &mut Elements,
    path: &FieldPath,
    default_checked: bool,
    on_change: Option<ChangeHandler>,
) {
    let value = path.last().unwrap_or_default().to_string();
    let input = Rc::new(MemoryElement::option(value, default_checked));
    let handle: Rc<dyn ElementHandle> = input.clone();
    form.register_field(path, Some(&handle));
    track(elements, path, input, on_change);
}

fn track(elements: &mut Elements, path: &FieldPath, input: Rc<MemoryElement>, on_change: Option<ChangeHandler>) {
    let key = path.to_string();
    if let Some(handler) = on_change {
        elements.handlers.insert(key.clone(), handler);
    }
    elements.inputs.insert(key, input);
}

/// Fire the element's change handler, if the form validates on change
fn notify_change(form: &mut Form, elements: &Elements, path: &str) {
    if let Some(handler) = elements.handlers.get(path) {
        handler.call(form);
    }
}

fn split_assignment(assignment: &str) -> anyhow::Result<(&str, &str)> {
    assignment
        .split_once('=')
        .ok_or_else(|| anyhow!("expected PATH=VALUE, got '{}'", assignment))
}
