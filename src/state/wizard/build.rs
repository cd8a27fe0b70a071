use super::Wizard;
use super::listeners::ListenerGroup;
use crate::core::ElementId;
use crate::core::dom::{Document, Element};
use crate::core::selector::Selector;
use crate::error::WizardError;
use crate::state::step::Step;
use std::collections::HashSet;
use tracing::debug;

pub(super) const WIZARD_ID_ATTR: &str = "data-wizard-id";
const PREV_LABEL: &str = "Prev.";

impl Wizard {
    /// Rebuilds the steps from the host's current step elements, keeping the
    /// current step and the completed flags of steps whose label survived.
    pub fn refresh(&mut self) -> Result<&mut Self, WizardError> {
        let finished = self.is_finished();
        let current_label = self.get_current_step().map(|step| step.label().to_string());
        let completed: HashSet<String> = self
            .steps
            .iter()
            .filter(|step| step.is_complete())
            .map(|step| step.label().to_string())
            .collect();

        self.init()?;

        for step in &mut self.steps {
            if completed.contains(step.label()) {
                step.set_completed(true);
            }
        }
        let index = if finished {
            self.steps.len()
        } else {
            current_label
                .and_then(|label| self.steps.iter().position(|step| step.labeled(&label)))
                .unwrap_or_else(|| self.clamp_index(self.current_index))
        };
        self.current_index = index;
        self.reveal();
        debug!(steps = self.steps.len(), current = self.current_index, "wizard refreshed");
        Ok(self)
    }

    /// Discovers steps and wires the form, prev and next controls. Nothing is
    /// touched when the form has no step elements.
    pub(super) fn init(&mut self) -> Result<(), WizardError> {
        let elements = self.step_elements();
        if elements.is_empty() {
            self.steps.clear();
            return Ok(());
        }

        let (steps, next_controls) = self.collect_steps(&elements)?;
        self.build_form();
        self.ensure_prev_controls()?;

        let classes = &self.options.settings.classes;
        for control in next_controls {
            if let Some(element) = self.host.document.get_mut(control) {
                element.add_class(classes.next_button.as_str());
            }
            self.host.listeners.bind(ListenerGroup::Next, control);
        }
        for step in &steps {
            if let Some(element) = self.host.document.get_mut(step.element()) {
                element.add_class(classes.step.as_str());
            }
        }

        self.steps = steps;
        self.host.listeners.prune_detached(&self.host.document);
        Ok(())
    }

    pub(super) fn clamp_index(&self, index: usize) -> usize {
        index.min(self.steps.len().saturating_sub(1))
    }

    pub(super) fn step_elements(&self) -> Vec<ElementId> {
        match &self.options.settings.step_selector {
            Some(selector) => self.host.document.query_all(self.host.form, selector),
            None => Vec::new(),
        }
    }

    /// Builds steps for `elements` without touching the wizard. Fails on a
    /// missing next control or a repeated label.
    pub(super) fn collect_steps(
        &self,
        elements: &[ElementId],
    ) -> Result<(Vec<Step>, Vec<ElementId>), WizardError> {
        let settings = &self.options.settings;
        let document = &self.host.document;
        let mut steps = Vec::with_capacity(elements.len());
        let mut next_controls = Vec::new();
        let mut labels = HashSet::with_capacity(elements.len());

        for (index, &element) in elements.iter().enumerate() {
            let label = step_label(document, element, settings.step_selector.as_ref(), index);
            if !labels.insert(label.clone()) {
                return Err(WizardError::DuplicateLabel { label, index });
            }
            let last = index + 1 == elements.len();
            if !last && let Some(selector) = &settings.next_step_selector {
                let control = document.query(element, selector).ok_or_else(|| {
                    WizardError::MissingNextControl {
                        label: label.clone(),
                        selector: selector.to_string(),
                    }
                })?;
                next_controls.push(control);
            }
            steps.push(Step::from_element(document, index, label, element, last));
        }

        Ok((steps, next_controls))
    }

    fn build_form(&mut self) {
        let form = self.host.form;
        if let Some(element) = self.host.document.get_mut(form) {
            element.add_class(self.options.settings.classes.form.as_str());
            element.set_attr(WIZARD_ID_ATTR, self.unique_id.as_str());
        }
        self.host.listeners.bind(ListenerGroup::Submit, form);
    }

    /// Makes sure at least one prev control exists and every one is bound.
    fn ensure_prev_controls(&mut self) -> Result<(), WizardError> {
        let Some(selector) = self.options.settings.prev_step_selector.as_ref() else {
            return Ok(());
        };
        let form = self.host.form;
        let mut controls = self.host.document.query_all(form, selector);
        if controls.is_empty() {
            let mut button = Element::new("button")
                .with_attr("type", "button")
                .with_text(PREV_LABEL);
            selector.stamp(&mut button, None);
            let id = self.host.document.create(button);
            self.host.document.prepend_child(form, id)?;
            debug!(%selector, "created prev control");
            controls.push(id);
        }

        let class = self.options.settings.classes.prev_button.as_str();
        for id in controls {
            if let Some(element) = self.host.document.get_mut(id) {
                element.add_class(class);
            }
            self.host.listeners.bind(ListenerGroup::Prev, id);
        }
        Ok(())
    }
}

/// The step selector's attribute value, falling back to the position.
fn step_label(
    document: &Document,
    element: ElementId,
    selector: Option<&Selector>,
    index: usize,
) -> String {
    selector
        .and_then(Selector::attribute_name)
        .and_then(|name| document.get(element)?.attr(name))
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| index.to_string())
}
