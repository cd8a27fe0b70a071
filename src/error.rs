use crate::core::dom::DomError;
use crate::core::selector::SelectorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("the container must be a form element, found {found}")]
    InvalidContainer { found: String },

    #[error("step \"{key}\" not found")]
    StepNotFound {
        key: String,
        #[source]
        source: ResolveError,
    },

    #[error("step \"{label}\" has no next control matching {selector}")]
    MissingNextControl { label: String, selector: String },

    #[error("step {index} repeats the label \"{label}\"")]
    DuplicateLabel { label: String, index: usize },

    #[error("the {role} role is disabled in the settings")]
    RoleDisabled { role: &'static str },

    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Why a step key failed to resolve to a position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no step is labeled \"{0}\"")]
    UnknownLabel(String),

    #[error("index {index} is out of range for {len} steps")]
    OutOfRange { index: usize, len: usize },

    #[error("step \"{label}\" at index {index} is no longer part of the wizard")]
    Stale { index: usize, label: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
