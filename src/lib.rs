//! Familiar Forms
//!
//! Controlled-form state for UI components: a registry of fields and field
//! groups that lives outside the render cycle, evaluates validation rules,
//! aggregates errors, and extracts values on submit.
//!
//! ## Features
//!
//! - **Idempotent Registration**: Mounting the same name twice updates the
//!   existing element in place and keeps its bound handle
//! - **Composite Elements**: Field arrays, fieldsets, checkbox groups and
//!   radio groups aggregate value, errors and validity from their children
//! - **Pull-Based Snapshot**: `FormState` is republished only on request, and
//!   a new snapshot is a new allocation
//! - **Stale-Safe**: Operations on unmounted elements are no-ops, never faults
//!
//! ## Architecture
//!
//! ```text
//! Form
//! ├── lastName            Field            ── ElementRef ─ ─▶ live handle
//! ├── address             Fieldset
//! │   ├── street          Field
//! │   └── zip             Field
//! ├── emails              FieldArray
//! │   ├── emails-0        Field
//! │   └── emails-2        Field
//! ├── colors              CheckboxGroup
//! │   ├── red             Checkbox
//! │   └── blue            Checkbox
//! └── size                RadioButtonGroup
//!     ├── s               RadioButton
//!     └── m               RadioButton
//! ```
//!
//! ## Example
//!
//! ```
//! use familiar_forms::{FieldDescriptor, Form, FormSubmitEvent, MemoryElement};
//! use familiar_forms::validators::is_required;
//! use std::rc::Rc;
//!
//! let mut form = Form::new();
//! let props = form
//!     .register(FieldDescriptor::new("lastName").with_rule("required", is_required("Required")))
//!     .unwrap();
//!
//! let input = Rc::new(MemoryElement::new(""));
//! let handle: Rc<dyn familiar_forms::ElementHandle> = input.clone();
//! form.register_field(&props.path, Some(&handle));
//!
//! let mut submitted = None;
//! form.handle_submit(&mut FormSubmitEvent::default(), |values| submitted = Some(values));
//! assert!(submitted.is_none());
//!
//! input.set_value("doe");
//! form.handle_submit(&mut FormSubmitEvent::default(), |values| submitted = Some(values));
//! assert_eq!(submitted.unwrap()["lastName"], "doe");
//! ```

pub mod config;
pub mod descriptor;
pub mod element;
pub mod error;
pub mod handle;
pub mod path;
pub mod registry;
pub mod validators;

pub use config::FormConfig;
pub use descriptor::{
    ChangeHandler, CheckboxGroupDescriptor, FieldDescriptor, FieldProps, GroupDescriptor,
    GroupProps, InputType, OptionDescriptor, OptionProps, RadioButtonGroupDescriptor,
};
pub use element::{
    Checkbox, CheckboxGroup, Errors, Field, FieldArray, FieldErrors, Fieldset, FormElement,
    FormElementKind, RadioButton, RadioButtonGroup,
};
pub use error::{FormError, Result};
pub use handle::{ElementHandle, ElementRef, MemoryElement};
pub use path::FieldPath;
pub use registry::{Form, FormData, FormState, FormSubmitEvent, SubmitEvent};
pub use validators::{Rule, Rules, Validator};
