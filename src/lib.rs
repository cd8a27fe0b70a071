//! Multi-step form controller.
//!
//! A [`Wizard`] takes a form whose sections are marked as steps, shows one
//! step at a time and validates the current step before letting navigation
//! move forward. Hooks observe step changes, validation and submission.

pub mod config;
pub mod core;
pub mod error;
pub mod state;

pub use crate::config::{Classes, Hook, Hooks, Options, Settings};
pub use crate::core::ElementId;
pub use crate::core::dom::{Document, DomError, Element};
pub use crate::core::event::{DomEvent, EventOutcome, SubmitOutcome};
pub use crate::core::selector::{Selector, SelectorError};
pub use crate::core::validity::Violation;
pub use crate::error::{ConfigError, ResolveError, WizardError};
pub use crate::state::step::Step;
pub use crate::state::validation::{StepErrors, ValidationContext};
pub use crate::state::wizard::{
    Breadcrumb, Command, Commands, Direction, FormTarget, ListenerGroup, Listeners, Progress,
    StepChange, StepKey, SubmitEvent, Template, Wizard,
};
