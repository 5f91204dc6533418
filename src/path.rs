//! Field addressing
//!
//! The registry is passed explicitly to every caller, so instead of closures
//! that capture their parent, registrations hand back a [`FieldPath`]: the
//! chain of mapping keys from the form root down to the element. The last
//! segment of a checkbox or radio path is the option value, because options
//! share their group's name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of an element inside a form
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// The form root (the scope for top-level registrations)
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of a top-level element
    pub fn top(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// Build a path from its segments
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Path of a child of this element
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.into());
        Self(segments)
    }

    /// Path of the containing element, `None` at the root
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.0.split_last()?;
        Some(Self(parent.to_vec()))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Name of the top-level element this path lives under
    pub fn top_level(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<form>");
        }
        write!(f, "{}", self.0.join("."))
    }
}
