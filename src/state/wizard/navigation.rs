use super::Wizard;
use super::listeners::ListenerGroup;
use crate::core::ElementId;
use crate::core::dom::Document;
use crate::error::{ResolveError, WizardError};
use crate::state::step::Step;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn delta(self) -> i8 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

/// Ways of naming a step: by position, by label, or by a step obtained earlier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKey {
    Index(usize),
    Label(String),
    Step { index: usize, label: String },
}

impl fmt::Display for StepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Label(label) | Self::Step { label, .. } => f.write_str(label),
        }
    }
}

impl From<usize> for StepKey {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

impl From<&str> for StepKey {
    fn from(value: &str) -> Self {
        Self::Label(value.to_string())
    }
}

impl From<String> for StepKey {
    fn from(value: String) -> Self {
        Self::Label(value)
    }
}

impl From<&Step> for StepKey {
    fn from(value: &Step) -> Self {
        Self::Step {
            index: value.index(),
            label: value.label().to_string(),
        }
    }
}

/// Passed to the step-change hook after a transition has been applied.
pub struct StepChange<'a> {
    /// `None` once the wizard has moved past its last step.
    pub current: Option<&'a Step>,
    pub previous: Option<&'a Step>,
    pub direction: Direction,
    pub form: &'a Document,
    pub form_element: ElementId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Prev,
    First,
    Last,
    Reveal(StepKey),
}

/// Navigation requested from inside the step-change hook. Commands run in
/// order once the hook returns, each as a transition of its own.
#[derive(Debug, Default)]
pub struct Commands {
    queue: Vec<Command>,
}

impl Commands {
    pub fn push(&mut self, command: Command) -> &mut Self {
        self.queue.push(command);
        self
    }

    pub fn next(&mut self) -> &mut Self {
        self.push(Command::Next)
    }

    pub fn prev(&mut self) -> &mut Self {
        self.push(Command::Prev)
    }

    pub fn first(&mut self) -> &mut Self {
        self.push(Command::First)
    }

    pub fn last(&mut self) -> &mut Self {
        self.push(Command::Last)
    }

    pub fn reveal(&mut self, key: impl Into<StepKey>) -> &mut Self {
        self.push(Command::Reveal(key.into()))
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn drain(&mut self) -> impl Iterator<Item = Command> + '_ {
        self.queue.drain(..)
    }
}

impl Wizard {
    /// Validates the current step and, when it passes, moves one step forward.
    /// Moving past the last step enters the finished state.
    pub fn next(&mut self) -> &mut Self {
        if self.get_current_step().is_none() {
            debug!("next ignored: no current step");
            return self;
        }
        if !self.validate_current_step() {
            debug!(step = self.current_index, "forward navigation blocked by validation");
            return self;
        }
        let from = self.current_index;
        if let Some(step) = self.steps.get_mut(from) {
            step.set_completed(true);
        }
        self.current_index = (from + 1).min(self.steps.len());
        self.transition(from, Direction::Forward);
        self
    }

    pub fn prev(&mut self) -> &mut Self {
        let from = self.current_index;
        self.current_index = from.saturating_sub(1);
        for index in [from, self.current_index] {
            if let Some(step) = self.steps.get_mut(index) {
                step.set_completed(false);
            }
        }
        self.transition(from, Direction::Backward);
        self
    }

    pub fn first(&mut self) -> &mut Self {
        let from = self.current_index;
        for step in &mut self.steps {
            step.set_completed(false);
            step.set_active(false);
        }
        self.current_index = 0;
        self.transition(from, Direction::Backward);
        self
    }

    pub fn last(&mut self) -> &mut Self {
        let Some(target) = self.steps.len().checked_sub(1) else {
            return self;
        };
        let from = self.current_index;
        for step in &mut self.steps {
            step.set_completed(!step.indexed(target));
            step.set_active(false);
        }
        self.current_index = target;
        self.transition(from, Direction::Forward);
        self
    }

    /// Jumps to `key`. Jumping forward requires the current step to validate;
    /// jumping to the current step does nothing. An unknown label resolves
    /// to the first step.
    pub fn reveal_step(&mut self, key: impl Into<StepKey>) -> Result<&mut Self, WizardError> {
        let key = key.into();
        let target = self
            .resolve_target(&key)
            .map_err(|source| WizardError::StepNotFound {
                key: key.to_string(),
                source,
            })?;
        let from = self.current_index;
        if target == from {
            return Ok(self);
        }

        let direction = if target < from {
            Direction::Backward
        } else {
            Direction::Forward
        };
        match direction {
            Direction::Forward => {
                if !self.validate_current_step() {
                    debug!(step = from, target, "reveal blocked by validation");
                    return Ok(self);
                }
                if let Some(step) = self.steps.get_mut(from) {
                    step.set_completed(true);
                }
            }
            Direction::Backward => {
                if let Some(step) = self.steps.get_mut(target) {
                    step.set_completed(false);
                }
            }
        }
        self.current_index = target;
        self.transition(from, direction);
        Ok(self)
    }

    pub fn apply(&mut self, command: Command) -> &mut Self {
        match command {
            Command::Next => self.next(),
            Command::Prev => self.prev(),
            Command::First => self.first(),
            Command::Last => self.last(),
            Command::Reveal(key) => {
                if let Err(error) = self.reveal_step(key) {
                    warn!(%error, "queued reveal failed");
                }
                self
            }
        }
    }

    /// Strict lookup: every key must name an existing step.
    pub(super) fn position_of(&self, key: &StepKey) -> Result<usize, ResolveError> {
        match key {
            StepKey::Index(index) if *index < self.steps.len() => Ok(*index),
            StepKey::Index(index) => Err(ResolveError::OutOfRange {
                index: *index,
                len: self.steps.len(),
            }),
            StepKey::Label(label) => self
                .steps
                .iter()
                .position(|step| step.labeled(label))
                .ok_or_else(|| ResolveError::UnknownLabel(label.clone())),
            StepKey::Step { index, label } => self
                .steps
                .get(*index)
                .filter(|step| step.labeled(label))
                .map(Step::index)
                .ok_or_else(|| ResolveError::Stale {
                    index: *index,
                    label: label.clone(),
                }),
        }
    }

    fn resolve_target(&self, key: &StepKey) -> Result<usize, ResolveError> {
        match self.position_of(key) {
            Err(ResolveError::UnknownLabel(_)) => Ok(0),
            resolved => resolved,
        }
    }

    fn transition(&mut self, from: usize, direction: Direction) {
        self.reveal();
        debug!(from, to = self.current_index, ?direction, "step changed");
        self.notify_step_change(from, direction);
    }

    /// Projects step state onto the host: active class on the current step,
    /// prev controls hidden on the first step.
    pub(super) fn reveal(&mut self) {
        let current = self.current_index;
        let active_class = self.options.settings.classes.step_active.as_str();
        for (index, step) in self.steps.iter_mut().enumerate() {
            let active = index == current;
            step.set_active(active);
            if let Some(element) = self.host.document.get_mut(step.element()) {
                if active {
                    element.add_class(active_class);
                } else {
                    element.remove_class(active_class);
                }
            }
        }
        for id in self.host.listeners.bound(ListenerGroup::Prev) {
            if let Some(element) = self.host.document.get_mut(id) {
                if current == 0 {
                    element.set_attr("hidden", "");
                } else {
                    element.remove_attr("hidden");
                }
            }
        }
    }

    fn notify_step_change(&mut self, from: usize, direction: Direction) {
        let mut commands = Commands::default();
        {
            let Some(hook) = self.options.hooks.on_step_change.as_mut() else {
                return;
            };
            let change = StepChange {
                current: self.steps.get(self.current_index),
                previous: self.steps.get(from),
                direction,
                form: &self.host.document,
                form_element: self.host.form,
            };
            hook(&change, &mut commands);
        }
        for command in commands.drain() {
            self.apply(command);
        }
    }
}
