//! Live element handles
//!
//! The rendering layer owns its elements. The registry only keeps a weak,
//! non-owning [`ElementRef`] to read the current value or checked state and
//! to move focus. An element that was dropped by the UI reads as unbound.

use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Capability surface of a rendered, value-bearing element
pub trait ElementHandle {
    /// Current value of the element
    fn value(&self) -> Value;

    /// Current checked state (checkbox and radio inputs)
    fn checked(&self) -> bool {
        false
    }

    /// Update the checked state
    fn set_checked(&self, _checked: bool) {}

    /// Move input focus to the element
    fn focus(&self) {}
}

/// Optional weak back-reference from a form element to its live handle
#[derive(Clone, Default)]
pub struct ElementRef(Option<Weak<dyn ElementHandle>>);

impl ElementRef {
    /// Attach a live handle (mount)
    pub fn bind(&mut self, handle: &Rc<dyn ElementHandle>) {
        self.0 = Some(Rc::downgrade(handle));
    }

    /// Drop the back-reference (unmount)
    pub fn unbind(&mut self) {
        self.0 = None;
    }

    /// Upgrade to the live handle, if it is still mounted
    pub fn get(&self) -> Option<Rc<dyn ElementHandle>> {
        self.0.as_ref().and_then(Weak::upgrade)
    }

    pub fn is_bound(&self) -> bool {
        self.get().is_some()
    }
}

impl fmt::Debug for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bound() {
            write!(f, "ElementRef(bound)")
        } else {
            write!(f, "ElementRef(unbound)")
        }
    }
}

/// In-memory element for headless front ends and tests
#[derive(Debug, Default)]
pub struct MemoryElement {
    value: RefCell<Value>,
    checked: Cell<bool>,
    focus_count: Cell<usize>,
}

impl MemoryElement {
    /// A text-like element holding `value`
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: RefCell::new(value.into()),
            ..Self::default()
        }
    }

    /// A checkbox or radio option with the given option value
    pub fn option(value: impl Into<Value>, checked: bool) -> Self {
        Self {
            value: RefCell::new(value.into()),
            checked: Cell::new(checked),
            focus_count: Cell::new(0),
        }
    }

    /// Wrap into the shared handle the registry binds to
    pub fn into_handle(self) -> Rc<dyn ElementHandle> {
        Rc::new(self)
    }

    /// Simulate user input
    pub fn set_value(&self, value: impl Into<Value>) {
        *self.value.borrow_mut() = value.into();
    }

    /// How many times focus was requested
    pub fn focus_count(&self) -> usize {
        self.focus_count.get()
    }
}

impl ElementHandle for MemoryElement {
    fn value(&self) -> Value {
        self.value.borrow().clone()
    }

    fn checked(&self) -> bool {
        self.checked.get()
    }

    fn set_checked(&self, checked: bool) {
        self.checked.set(checked);
    }

    fn focus(&self) {
        self.focus_count.set(self.focus_count.get() + 1);
    }
}
