use super::Wizard;
use crate::core::ElementId;
use crate::core::dom::Document;
use crate::core::event::SubmitOutcome;
use crate::state::step::Step;
use crate::state::validation::ValidationContext;
use tracing::debug;

/// Marks the form so the host skips its own validation UI while a custom
/// validation hook is in charge.
const NOVALIDATE: &str = "novalidate";

/// Passed to the submit hook once the current step has validated.
pub struct SubmitEvent<'a> {
    pub form: &'a Document,
    pub form_element: ElementId,
    pub step: Option<&'a Step>,
}

impl Wizard {
    /// Decides whether the current step may be left going forward.
    ///
    /// A custom validation hook replaces native validation outright. Without
    /// one, native validation runs and an `on_validation` hook, if set, must
    /// also pass.
    pub(super) fn validate_current_step(&mut self) -> bool {
        if self.options.settings.bypass_validation {
            return true;
        }
        let Some(step) = self.steps.get_mut(self.current_index) else {
            return true;
        };
        let form = self.host.form;
        let document = &mut self.host.document;
        let hooks = &mut self.options.hooks;

        if let Some(custom) = hooks.custom_validation.as_mut() {
            if let Some(element) = document.get_mut(form) {
                element.set_attr(NOVALIDATE, "");
            }
            step.clear_errors();
            return custom(&mut ValidationContext::new(step, document, form));
        }

        if let Some(element) = document.get_mut(form) {
            element.remove_attr(NOVALIDATE);
        }
        let native = step.validate(document);
        let hooked = match hooks.on_validation.as_mut() {
            Some(hook) => hook(&mut ValidationContext::new(step, document, form)),
            None => true,
        };
        native && hooked
    }

    /// Handles the form's submit event.
    pub fn submit(&mut self) -> SubmitOutcome {
        if !self.validate_current_step() {
            debug!(step = self.current_index, "submission blocked by validation");
            return SubmitOutcome::Blocked;
        }
        let Some(hook) = self.options.hooks.on_submit.as_mut() else {
            return SubmitOutcome::Default;
        };
        hook(&SubmitEvent {
            form: &self.host.document,
            form_element: self.host.form,
            step: self.steps.get(self.current_index),
        });
        SubmitOutcome::Handled
    }
}
