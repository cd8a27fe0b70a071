mod build;
mod listeners;
mod navigation;
mod template;
mod validation_runtime;

pub use listeners::{ListenerGroup, Listeners};
pub use navigation::{Command, Commands, Direction, StepChange, StepKey};
pub use template::Template;
pub use validation_runtime::SubmitEvent;

use crate::config::{Hook, Options, Settings};
use crate::core::ElementId;
use crate::core::dom::Document;
use crate::core::selector::Selector;
use crate::error::WizardError;
use crate::state::step::Step;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

/// Where the wizard's form lives in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    Element(ElementId),
    Selector(String),
}

impl From<ElementId> for FormTarget {
    fn from(value: ElementId) -> Self {
        Self::Element(value)
    }
}

impl From<&str> for FormTarget {
    fn from(value: &str) -> Self {
        Self::Selector(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub index: usize,
    pub completed: bool,
    pub active: bool,
}

/// Label-keyed snapshot of every step's progress, in step order.
pub type Breadcrumb = IndexMap<String, Progress>;

#[derive(Debug)]
struct HostState {
    document: Document,
    form: ElementId,
    listeners: Listeners,
}

/// Multi-step controller over a form.
///
/// Owns the steps and the current position; every change of either goes
/// through the navigation methods. `current_index` ranges over
/// `0..=count()`, where `count()` means the wizard has moved past its last
/// step.
#[derive(Debug)]
pub struct Wizard {
    host: HostState,
    steps: Vec<Step>,
    current_index: usize,
    options: Options,
    unique_id: String,
}

impl Wizard {
    pub fn new(
        document: Document,
        target: impl Into<FormTarget>,
        options: Options,
    ) -> Result<Self, WizardError> {
        let form = resolve_form(&document, &target.into())?;
        let unique_id = format!(
            "{}{}",
            options.settings.unique_id_prefix,
            Uuid::new_v4().simple()
        );
        let initial = options.settings.active_step_index;
        let mut wizard = Self {
            host: HostState {
                document,
                form,
                listeners: Listeners::default(),
            },
            steps: Vec::new(),
            current_index: 0,
            options,
            unique_id,
        };
        wizard.init()?;
        if initial >= wizard.steps.len() && !wizard.steps.is_empty() {
            warn!(initial, steps = wizard.steps.len(), "active step index out of range, clamping");
        }
        wizard.current_index = wizard.clamp_index(initial);
        wizard.reveal();
        debug!(id = %wizard.unique_id, steps = wizard.steps.len(), "wizard ready");
        Ok(wizard)
    }

    pub fn count(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> &[Step] {
        self.steps.as_slice()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// True once navigation has moved past the last step. A wizard without
    /// steps is never finished.
    pub fn is_finished(&self) -> bool {
        !self.steps.is_empty() && self.current_index >= self.steps.len()
    }

    pub fn get_step(&self, key: impl Into<StepKey>) -> Option<&Step> {
        let index = self.position_of(&key.into()).ok()?;
        self.steps.get(index)
    }

    /// Mutable access for editing a step's error map.
    pub fn get_step_mut(&mut self, key: impl Into<StepKey>) -> Option<&mut Step> {
        let index = self.position_of(&key.into()).ok()?;
        self.steps.get_mut(index)
    }

    pub fn get_current_step(&self) -> Option<&Step> {
        self.steps.get(self.current_index)
    }

    /// Removes the step and its element, then rebuilds. Returns `false` when
    /// `key` names no step. Nothing changes when the remaining steps would
    /// not build.
    pub fn remove_step(&mut self, key: impl Into<StepKey>) -> Result<bool, WizardError> {
        let Ok(position) = self.position_of(&key.into()) else {
            return Ok(false);
        };
        let removed = self.steps[position].element();
        let remaining: Vec<ElementId> = self
            .step_elements()
            .into_iter()
            .filter(|id| !self.host.document.contains(removed, *id))
            .collect();
        self.collect_steps(&remaining)?;

        let step = self.steps.remove(position);
        step.remove_element(&mut self.host.document);
        if position < self.current_index {
            self.current_index -= 1;
        } else if position == self.current_index {
            self.current_index = self.clamp_index(position);
        }
        debug!(label = step.label(), position, "step removed");
        self.refresh()?;
        Ok(true)
    }

    pub fn breadcrumb(&self) -> Breadcrumb {
        self.steps
            .iter()
            .map(|step| {
                (
                    step.label().to_string(),
                    Progress {
                        index: step.index(),
                        completed: step.is_complete(),
                        active: step.is_active(),
                    },
                )
            })
            .collect()
    }

    /// Replaces one recognized setting. Unknown keys are ignored and values
    /// of the wrong shape leave the setting untouched.
    pub fn set_option(&mut self, key: &str, value: impl Into<serde_json::Value>) -> &mut Self {
        match self.options.settings.with_option(key, value.into()) {
            Ok(Some(settings)) => self.options.settings = settings,
            Ok(None) => debug!(key, "ignoring unknown option"),
            Err(error) => warn!(key, %error, "rejected option value"),
        }
        self
    }

    pub fn set_hook(&mut self, hook: Hook) -> &mut Self {
        debug!(?hook, "hook replaced");
        self.options.hooks.set(hook);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.options.settings
    }

    pub fn unique_id(&self) -> &str {
        self.unique_id.as_str()
    }

    pub fn form(&self) -> ElementId {
        self.host.form
    }

    pub fn document(&self) -> &Document {
        &self.host.document
    }

    /// Host access for filling in fields. Structural edits become visible
    /// to the wizard after [`Wizard::refresh`].
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.host.document
    }

    pub fn into_document(self) -> Document {
        self.host.document
    }
}

fn resolve_form(document: &Document, target: &FormTarget) -> Result<ElementId, WizardError> {
    let id = match target {
        FormTarget::Element(id) => Some(*id),
        FormTarget::Selector(raw) => document.query(document.root(), &Selector::parse(raw)?),
    };
    let Some((id, element)) = id.and_then(|id| document.get(id).map(|element| (id, element)))
    else {
        return Err(WizardError::InvalidContainer {
            found: "nothing".to_string(),
        });
    };
    if element.tag() != "form" {
        return Err(WizardError::InvalidContainer {
            found: format!("<{}>", element.tag()),
        });
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::{FormTarget, Wizard};
    use crate::config::Options;
    use crate::core::dom::{Document, Element};
    use crate::error::WizardError;

    fn three_step_form() -> Document {
        let mut doc = Document::new();
        let form = doc
            .append(doc.root(), Element::new("form").with_attr("id", "wizard"))
            .expect("form");
        for (index, label) in ["one", "two", "three"].into_iter().enumerate() {
            let section = doc
                .append(form, Element::new("section").with_attr("data-step", label))
                .expect("section");
            doc.append(section, Element::new("input").with_attr("name", label))
                .expect("field");
            if index < 2 {
                doc.append(section, Element::new("button").with_attr("data-next", ""))
                    .expect("next");
            }
        }
        doc
    }

    #[test]
    fn resolves_form_by_selector() {
        let wizard = Wizard::new(three_step_form(), "#wizard", Options::new()).expect("wizard");
        assert_eq!(wizard.count(), 3);
        assert!(wizard.unique_id().starts_with("zangdar_form_"));
        let form = wizard.document().get(wizard.form()).expect("form");
        assert_eq!(form.attr("data-wizard-id"), Some(wizard.unique_id()));
    }

    #[test]
    fn rejects_non_form_container() {
        let doc = three_step_form();
        let section = doc
            .query(
                doc.root(),
                &crate::core::selector::Selector::parse("[data-step=one]").expect("selector"),
            )
            .expect("section");
        let result = Wizard::new(doc, FormTarget::Element(section), Options::new());
        assert!(matches!(result, Err(WizardError::InvalidContainer { .. })));
        let missing = Wizard::new(Document::new(), "#nowhere", Options::new());
        assert!(matches!(missing, Err(WizardError::InvalidContainer { .. })));
    }

    #[test]
    fn clamps_initial_index() {
        let wizard = Wizard::new(three_step_form(), "#wizard", Options::new().active_step_index(9))
            .expect("wizard");
        assert_eq!(wizard.current_index(), 2);
        assert!(wizard.steps()[2].is_active());
    }

    #[test]
    fn set_option_ignores_unknown_and_bad_values() {
        let mut wizard = Wizard::new(three_step_form(), "#wizard", Options::new()).expect("wizard");
        wizard
            .set_option("not_an_option", true)
            .set_option("bypass_validation", "yes")
            .set_option("active_step_index", 1);
        assert!(!wizard.settings().bypass_validation);
        assert_eq!(wizard.settings().active_step_index, 1);
    }

    #[test]
    fn empty_form_has_no_steps() {
        let mut doc = Document::new();
        doc.append(doc.root(), Element::new("form").with_attr("id", "wizard"))
            .expect("form");
        let mut wizard = Wizard::new(doc, "#wizard", Options::new()).expect("wizard");
        assert_eq!(wizard.count(), 0);
        assert!(wizard.get_current_step().is_none());
        assert!(!wizard.is_finished());
        wizard.next().prev().last().first();
        assert!(!wizard.is_finished());
        assert_eq!(wizard.current_index(), 0);
        assert!(wizard.listeners().is_empty());
    }
}
