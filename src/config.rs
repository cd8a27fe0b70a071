use crate::core::selector::Selector;
use crate::error::ConfigError;
use crate::state::validation::ValidationContext;
use crate::state::wizard::{Commands, StepChange, SubmitEvent};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_STEP_SELECTOR: &str = "[data-step]";
pub const DEFAULT_PREV_SELECTOR: &str = "[data-prev]";
pub const DEFAULT_NEXT_SELECTOR: &str = "[data-next]";
pub const DEFAULT_SUBMIT_SELECTOR: &str = r#"[type="submit"]"#;

/// Keys accepted by [`Settings::with_option`].
pub const OPTION_KEYS: &[&str] = &[
    "step_selector",
    "prev_step_selector",
    "next_step_selector",
    "submit_selector",
    "active_step_index",
    "unique_id_prefix",
    "classes",
    "bypass_validation",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Classes {
    pub form: String,
    pub prev_button: String,
    pub next_button: String,
    pub step: String,
    pub step_active: String,
}

impl Default for Classes {
    fn default() -> Self {
        Self {
            form: "zangdar__wizard".to_string(),
            prev_button: "zangdar__prev".to_string(),
            next_button: "zangdar__next".to_string(),
            step: "zangdar__step".to_string(),
            step_active: "zangdar__step__active".to_string(),
        }
    }
}

/// Serializable part of the wizard options. Unknown keys are ignored and
/// missing keys fall back to their defaults.
///
/// A role selector set to `false` (or `null`) disables discovery of that role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(with = "role_selector")]
    pub step_selector: Option<Selector>,
    #[serde(with = "role_selector")]
    pub prev_step_selector: Option<Selector>,
    #[serde(with = "role_selector")]
    pub next_step_selector: Option<Selector>,
    #[serde(with = "role_selector")]
    pub submit_selector: Option<Selector>,
    pub active_step_index: usize,
    pub unique_id_prefix: String,
    pub classes: Classes,
    pub bypass_validation: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            step_selector: Selector::parse(DEFAULT_STEP_SELECTOR).ok(),
            prev_step_selector: Selector::parse(DEFAULT_PREV_SELECTOR).ok(),
            next_step_selector: Selector::parse(DEFAULT_NEXT_SELECTOR).ok(),
            submit_selector: Selector::parse(DEFAULT_SUBMIT_SELECTOR).ok(),
            active_step_index: 0,
            unique_id_prefix: "zangdar_form_".to_string(),
            classes: Classes::default(),
            bypass_validation: false,
        }
    }
}

impl Settings {
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn is_recognized(key: &str) -> bool {
        OPTION_KEYS.contains(&key)
    }

    /// Returns a copy with `key` replaced by `value`, or `None` when the key
    /// is not a recognized option.
    pub fn with_option(
        &self,
        key: &str,
        value: serde_json::Value,
    ) -> Result<Option<Self>, ConfigError> {
        if !Self::is_recognized(key) {
            return Ok(None);
        }
        let mut raw = serde_json::to_value(self)?;
        if let Some(map) = raw.as_object_mut() {
            map.insert(key.to_string(), value);
        }
        Ok(Some(serde_json::from_value(raw)?))
    }
}

mod role_selector {
    use crate::core::selector::Selector;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Slot {
        Flag(bool),
        Selector(Selector),
    }

    pub fn serialize<S: Serializer>(value: &Option<Selector>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(selector) => selector.serialize(serializer),
            None => serializer.serialize_bool(false),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Selector>, D::Error> {
        match Option::<Slot>::deserialize(deserializer)? {
            None | Some(Slot::Flag(false)) => Ok(None),
            Some(Slot::Flag(true)) => Err(D::Error::custom("expected a selector or false")),
            Some(Slot::Selector(selector)) => Ok(Some(selector)),
        }
    }
}

// ── Hooks ─────────────────────────────────────────────────────────────────────

pub type SubmitHook = Box<dyn FnMut(&SubmitEvent<'_>)>;
pub type StepChangeHook = Box<dyn FnMut(&StepChange<'_>, &mut Commands)>;
pub type ValidationHook = Box<dyn FnMut(&mut ValidationContext<'_>) -> bool>;

/// One hook slot, used to replace a hook after construction.
pub enum Hook {
    OnSubmit(SubmitHook),
    OnStepChange(StepChangeHook),
    /// Runs after native validation; both must pass.
    OnValidation(ValidationHook),
    /// Replaces native validation entirely.
    CustomValidation(ValidationHook),
}

impl Hook {
    pub fn on_submit(f: impl FnMut(&SubmitEvent<'_>) + 'static) -> Self {
        Self::OnSubmit(Box::new(f))
    }

    pub fn on_step_change(f: impl FnMut(&StepChange<'_>, &mut Commands) + 'static) -> Self {
        Self::OnStepChange(Box::new(f))
    }

    pub fn on_validation(f: impl FnMut(&mut ValidationContext<'_>) -> bool + 'static) -> Self {
        Self::OnValidation(Box::new(f))
    }

    pub fn custom_validation(f: impl FnMut(&mut ValidationContext<'_>) -> bool + 'static) -> Self {
        Self::CustomValidation(Box::new(f))
    }

    fn name(&self) -> &'static str {
        match self {
            Self::OnSubmit(_) => "on_submit",
            Self::OnStepChange(_) => "on_step_change",
            Self::OnValidation(_) => "on_validation",
            Self::CustomValidation(_) => "custom_validation",
        }
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Hook").field(&self.name()).finish()
    }
}

#[derive(Default)]
pub struct Hooks {
    pub(crate) on_submit: Option<SubmitHook>,
    pub(crate) on_step_change: Option<StepChangeHook>,
    pub(crate) on_validation: Option<ValidationHook>,
    pub(crate) custom_validation: Option<ValidationHook>,
}

impl Hooks {
    pub fn set(&mut self, hook: Hook) {
        match hook {
            Hook::OnSubmit(f) => self.on_submit = Some(f),
            Hook::OnStepChange(f) => self.on_step_change = Some(f),
            Hook::OnValidation(f) => self.on_validation = Some(f),
            Hook::CustomValidation(f) => self.custom_validation = Some(f),
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_submit", &self.on_submit.is_some())
            .field("on_step_change", &self.on_step_change.is_some())
            .field("on_validation", &self.on_validation.is_some())
            .field("custom_validation", &self.custom_validation.is_some())
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct Options {
    pub settings: Settings,
    pub hooks: Hooks,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn active_step_index(mut self, index: usize) -> Self {
        self.settings.active_step_index = index;
        self
    }

    pub fn bypass_validation(mut self, bypass: bool) -> Self {
        self.settings.bypass_validation = bypass;
        self
    }

    pub fn hook(mut self, hook: Hook) -> Self {
        self.hooks.set(hook);
        self
    }

    pub fn on_submit(self, f: impl FnMut(&SubmitEvent<'_>) + 'static) -> Self {
        self.hook(Hook::on_submit(f))
    }

    pub fn on_step_change(self, f: impl FnMut(&StepChange<'_>, &mut Commands) + 'static) -> Self {
        self.hook(Hook::on_step_change(f))
    }

    pub fn on_validation(self, f: impl FnMut(&mut ValidationContext<'_>) -> bool + 'static) -> Self {
        self.hook(Hook::on_validation(f))
    }

    pub fn custom_validation(
        self,
        f: impl FnMut(&mut ValidationContext<'_>) -> bool + 'static,
    ) -> Self {
        self.hook(Hook::custom_validation(f))
    }
}
