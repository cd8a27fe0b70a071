pub mod dom;
pub mod event;
pub mod selector;
pub mod validity;

use std::fmt;

/// Handle into a [`dom::Document`] arena. Handles stay valid for the
/// document's lifetime, whether or not the element is still attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

impl From<ElementId> for usize {
    fn from(value: ElementId) -> Self {
        value.0
    }
}
