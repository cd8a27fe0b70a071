use crate::core::ElementId;
use crate::core::dom::Document;
use crate::state::step::Step;
use indexmap::IndexMap;

/// Field name to the messages collected for it, in the order they were added.
pub type StepErrors = IndexMap<String, Vec<String>>;

/// What a validation hook sees: the current step, its fields and the form.
pub struct ValidationContext<'a> {
    step: &'a mut Step,
    form: &'a Document,
    form_element: ElementId,
}

impl<'a> ValidationContext<'a> {
    pub(crate) fn new(step: &'a mut Step, form: &'a Document, form_element: ElementId) -> Self {
        Self {
            step,
            form,
            form_element,
        }
    }

    pub fn step(&self) -> &Step {
        self.step
    }

    pub fn step_mut(&mut self) -> &mut Step {
        self.step
    }

    pub fn fields(&self) -> &IndexMap<String, ElementId> {
        self.step.fields()
    }

    pub fn form(&self) -> &Document {
        self.form
    }

    pub fn form_element(&self) -> ElementId {
        self.form_element
    }

    /// Current value of the named field on this step.
    pub fn value(&self, field: &str) -> Option<&str> {
        let id = self.step.field(field)?;
        self.form.get(id).map(|element| element.value())
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.step.add_error(field, message);
        self
    }
}
