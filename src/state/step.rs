use crate::core::ElementId;
use crate::core::dom::Document;
use crate::state::validation::StepErrors;
use indexmap::IndexMap;

/// One navigable section of the wizard.
///
/// Position, label and the last-step flag are fixed when the step is built.
/// The active and completed flags are owned by the wizard; only the error
/// map is open to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    index: usize,
    label: String,
    element: ElementId,
    fields: IndexMap<String, ElementId>,
    active: bool,
    completed: bool,
    errors: StepErrors,
    last: bool,
}

impl Step {
    pub fn new(
        index: usize,
        label: impl Into<String>,
        element: ElementId,
        fields: IndexMap<String, ElementId>,
        last: bool,
    ) -> Self {
        Self {
            index,
            label: label.into(),
            element,
            fields,
            active: false,
            completed: false,
            errors: StepErrors::new(),
            last,
        }
    }

    /// Builds a step from `element`, registering every named field below it.
    /// Fields sharing a name (radio groups) register their first member.
    pub fn from_element(
        form: &Document,
        index: usize,
        label: impl Into<String>,
        element: ElementId,
        last: bool,
    ) -> Self {
        let mut fields = IndexMap::new();
        for id in form.form_fields(element) {
            if let Some(name) = form.get(id).and_then(|field| field.name()) {
                fields.entry(name.to_string()).or_insert(id);
            }
        }
        Self::new(index, label, element, fields, last)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn fields(&self) -> &IndexMap<String, ElementId> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<ElementId> {
        self.fields.get(name).copied()
    }

    pub fn indexed(&self, index: usize) -> bool {
        self.index == index
    }

    pub fn labeled(&self, label: &str) -> bool {
        self.label == label
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.last
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &StepErrors {
        &self.errors
    }

    pub fn errors_for(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
        self
    }

    pub fn clear_errors(&mut self) -> &mut Self {
        self.errors.clear();
        self
    }

    /// Runs native validity on every field, last registered first, so the
    /// first field's message is the one left on screen.
    pub fn validate(&mut self, form: &mut Document) -> bool {
        self.clear_errors();
        let mut valid = true;
        for (name, id) in self.fields.iter().rev() {
            if form.check_validity(*id) {
                continue;
            }
            valid = false;
            let message = form.validation_message(*id).unwrap_or_default();
            self.errors.entry(name.clone()).or_default().push(message);
            form.report_validity(*id);
        }
        valid
    }

    /// Detaches the backing element. Returns `false` if it was already detached.
    pub fn remove_element(&self, form: &mut Document) -> bool {
        form.detach(self.element)
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub(crate) fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }
}
