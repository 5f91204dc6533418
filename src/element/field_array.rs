//! Dynamically sized collection of same-shaped fields

use serde_json::Value;

use super::{aggregate_errors, aggregate_values, children_valid, ElementMap, Errors, FormElement};
use crate::validators::Rules;

/// Ordered collection of fields under one logical name
///
/// `rules` are the rules every appended child is registered with. Child names
/// come from a per-array counter that only ever grows, so a removed name is
/// never handed out again.
#[derive(Debug)]
pub struct FieldArray {
    pub id: String,
    pub name: String,
    pub rules: Rules<Value>,
    pub fields: ElementMap,
    next_index: usize,
}

impl FieldArray {
    pub fn new(id: impl Into<String>, name: impl Into<String>, rules: Rules<Value>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rules,
            fields: ElementMap::new(),
            next_index: 0,
        }
    }

    /// Reserve the next free child name, e.g. `emails-3`
    ///
    /// Names already taken by children registered directly in the array's
    /// scope are skipped.
    pub fn next_child_name(&mut self, separator: &str) -> String {
        loop {
            let name = format!("{}{}{}", self.name, separator, self.next_index);
            self.next_index += 1;
            if !self.fields.contains_key(&name) {
                return name;
            }
        }
    }

    /// Remove a child; returns it if it was present
    pub fn remove(&mut self, name: &str) -> Option<FormElement> {
        self.fields.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn value(&self) -> Option<Value> {
        Some(aggregate_values(&self.fields))
    }

    pub fn errors(&self) -> Errors {
        aggregate_errors(&self.fields)
    }

    /// Children validate themselves; there is no array-level rule pass
    pub fn validate(&mut self) {
        for child in self.fields.values_mut() {
            child.validate();
        }
    }

    pub fn is_valid(&self) -> bool {
        self.rules.is_empty() || children_valid(&self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Field;
    use crate::handle::{ElementHandle, MemoryElement};
    use crate::validators::is_required;
    use serde_json::json;
    use std::rc::Rc;

    fn required() -> Rules<Value> {
        [("required", is_required("req"))].into_iter().collect()
    }

    fn push_child(array: &mut FieldArray, handle: &Rc<dyn ElementHandle>) -> String {
        let name = array.next_child_name("-");
        let mut field = Field::new(name.clone(), name.clone(), array.rules.clone(), "text", None);
        field.bind(handle);
        array.fields.insert(name.clone(), FormElement::Field(field));
        name
    }

    #[test]
    fn test_names_are_never_reused() {
        let mut array = FieldArray::new("emails", "emails", Rules::new());
        assert_eq!(array.next_child_name("-"), "emails-0");
        assert_eq!(array.next_child_name("-"), "emails-1");
        array.remove("emails-1");
        assert_eq!(array.next_child_name("-"), "emails-2");
    }

    #[test]
    fn test_skips_names_taken_by_direct_registration() {
        let handle: Rc<dyn ElementHandle> = Rc::new(MemoryElement::new("a@x.io"));
        let mut array = FieldArray::new("emails", "emails", Rules::new());
        let mut field = Field::new("emails-0", "emails-0", required(), "text", None);
        field.bind(&handle);
        array.fields.insert("emails-0".to_string(), FormElement::Field(field));

        assert_eq!(array.next_child_name("-"), "emails-1");
        assert_eq!(array.next_child_name("-"), "emails-2");
    }

    #[test]
    fn test_aggregates_children() {
        let first: Rc<dyn ElementHandle> = Rc::new(MemoryElement::new("a@x.io"));
        let second: Rc<dyn ElementHandle> = Rc::new(MemoryElement::new(""));
        let mut array = FieldArray::new("emails", "emails", required());
        let a = push_child(&mut array, &first);
        let b = push_child(&mut array, &second);

        assert_eq!(array.value(), Some(json!({ a.clone(): "a@x.io", b.clone(): "" })));

        array.validate();
        assert!(!array.is_valid());
        assert_eq!(
            serde_json::to_value(array.errors()).unwrap(),
            json!({ a: {"required": null}, b.clone(): {"required": "req"} })
        );

        array.remove(&b);
        assert!(array.is_valid());
    }

    #[test]
    fn test_no_rules_is_always_valid() {
        let blank: Rc<dyn ElementHandle> = Rc::new(MemoryElement::new(""));
        let mut array = FieldArray::new("tags", "tags", Rules::new());
        let name = array.next_child_name("-");
        let rules = required();
        let mut field = Field::new(name.clone(), name.clone(), rules, "text", None);
        field.bind(&blank);
        array.fields.insert(name, FormElement::Field(field));

        array.validate();
        assert!(array.is_valid());
    }
}
