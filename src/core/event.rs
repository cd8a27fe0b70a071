use crate::core::ElementId;

/// Host events routed into the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomEvent {
    Click(ElementId),
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The current step failed validation; the default submission is suppressed.
    Blocked,
    /// The submit hook took over; the default submission is suppressed.
    Handled,
    /// No hook is configured and the host should submit the form.
    Default,
}

impl SubmitOutcome {
    pub fn prevents_default(self) -> bool {
        !matches!(self, Self::Default)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    pub handled: bool,
    pub default_prevented: bool,
}

impl EventOutcome {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn prevented() -> Self {
        Self {
            handled: true,
            default_prevented: true,
        }
    }
}

impl From<SubmitOutcome> for EventOutcome {
    fn from(value: SubmitOutcome) -> Self {
        Self {
            handled: true,
            default_prevented: value.prevents_default(),
        }
    }
}
