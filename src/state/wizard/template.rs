use super::Wizard;
use crate::core::dom::Element;
use crate::core::selector::Selector;
use crate::error::{ConfigError, WizardError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

const NEXT_LABEL: &str = "Next";

/// Ordered step label to field selectors, used to carve an existing flat
/// form into steps.
///
/// ```yaml
/// personal: ["[name=name]", "[name=email]"]
/// address: ["[name=street]"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template {
    sections: IndexMap<String, Vec<String>>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section<I, S>(mut self, label: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sections
            .insert(label.into(), fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.sections
            .iter()
            .map(|(label, fields)| (label.as_str(), fields.as_slice()))
    }
}

impl Wizard {
    /// Builds one section per template entry, moves the matching fields into
    /// it, adds a next control to every section but the last, moves the
    /// submit control into the last one, then rebuilds the steps.
    pub fn create_from_template(&mut self, template: &Template) -> Result<&mut Self, WizardError> {
        let settings = &self.options.settings;
        let step_selector = settings
            .step_selector
            .clone()
            .ok_or(WizardError::RoleDisabled { role: "step" })?;
        let next_selector = settings.next_step_selector.clone();
        let submit_selector = settings.submit_selector.clone();

        let sections = template
            .iter()
            .map(|(label, fields)| {
                let selectors = fields
                    .iter()
                    .map(|field| Selector::parse(field))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((label, selectors))
            })
            .collect::<Result<Vec<_>, WizardError>>()?;

        let form = self.host.form;
        let document = &mut self.host.document;
        let count = sections.len();
        for (position, (label, selectors)) in sections.into_iter().enumerate() {
            let mut section = Element::new("section");
            step_selector.stamp(&mut section, Some(label));
            let section = document.create(section);

            for selector in &selectors {
                if let Some(field) = document.query(form, selector) {
                    document.append_child(section, field)?;
                }
            }

            let last = position + 1 == count;
            if !last
                && let Some(next) = &next_selector
                && document.query(section, next).is_none()
            {
                let mut button = Element::new("button")
                    .with_attr("type", "button")
                    .with_text(NEXT_LABEL);
                next.stamp(&mut button, None);
                document.append(section, button)?;
            }
            if last
                && let Some(submit) = &submit_selector
                && let Some(control) = document.query(form, submit)
            {
                document.append_child(section, control)?;
            }

            document.append_child(form, section)?;
            debug!(label, fields = selectors.len(), "section built from template");
        }

        self.refresh()
    }
}

#[cfg(test)]
mod tests {
    use super::Template;

    #[test]
    fn yaml_keeps_section_order() {
        let template = Template::from_yaml(
            "zeta:\n  - \"[name=a]\"\nalpha:\n  - \"[name=b]\"\n  - \"[name=c]\"\n",
        )
        .expect("yaml");
        let labels: Vec<&str> = template.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["zeta", "alpha"]);
        assert_eq!(template.len(), 2);
    }

    #[test]
    fn builder_matches_json() {
        let built = Template::new()
            .section("one", ["[name=a]"])
            .section("two", ["[name=b]"]);
        let parsed =
            Template::from_json(r#"{"one": ["[name=a]"], "two": ["[name=b]"]}"#).expect("json");
        assert_eq!(built, parsed);
    }
}
