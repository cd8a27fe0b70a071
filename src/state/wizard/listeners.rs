use super::Wizard;
use crate::core::ElementId;
use crate::core::dom::{Document, DomError};
use crate::core::event::{DomEvent, EventOutcome};
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerGroup {
    Submit,
    Prev,
    Next,
}

impl ListenerGroup {
    pub const ALL: [Self; 3] = [Self::Submit, Self::Prev, Self::Next];

    pub fn name(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Prev => "prev",
            Self::Next => "next",
        }
    }
}

/// Which host elements the wizard listens on, per role. Binding is idempotent.
#[derive(Debug, Default)]
pub struct Listeners {
    groups: IndexMap<ListenerGroup, IndexSet<ElementId>>,
}

impl Listeners {
    /// Returns `false` when `id` was already bound for `group`.
    pub fn bind(&mut self, group: ListenerGroup, id: ElementId) -> bool {
        self.groups.entry(group).or_default().insert(id)
    }

    pub fn is_bound(&self, group: ListenerGroup, id: ElementId) -> bool {
        self.groups
            .get(&group)
            .is_some_and(|bound| bound.contains(&id))
    }

    pub fn group_of(&self, id: ElementId) -> Option<ListenerGroup> {
        self.groups
            .iter()
            .find_map(|(group, bound)| bound.contains(&id).then_some(*group))
    }

    pub fn bound(&self, group: ListenerGroup) -> impl Iterator<Item = ElementId> + '_ {
        self.groups.get(&group).into_iter().flatten().copied()
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(IndexSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops bindings whose element left the document.
    pub fn prune_detached(&mut self, document: &Document) {
        for bound in self.groups.values_mut() {
            bound.retain(|id| document.is_connected(*id));
        }
    }

    /// Unbinds every element of `group`. The whole group is released even
    /// when some elements are gone; the first such element is reported.
    pub fn unbind_group(
        &mut self,
        group: ListenerGroup,
        document: &Document,
    ) -> Result<usize, DomError> {
        let Some(bound) = self.groups.shift_remove(&group) else {
            return Ok(0);
        };
        match bound.iter().find(|id| !document.is_connected(**id)) {
            Some(id) => Err(DomError::Detached(*id)),
            None => Ok(bound.len()),
        }
    }
}

impl Wizard {
    /// Routes a host event to the bound control it targets. Clicks bubble up
    /// from the target through its ancestors.
    pub fn dispatch(&mut self, event: DomEvent) -> EventOutcome {
        match event {
            DomEvent::Submit => {
                if !self
                    .host
                    .listeners
                    .is_bound(ListenerGroup::Submit, self.host.form)
                {
                    return EventOutcome::ignored();
                }
                self.submit().into()
            }
            DomEvent::Click(target) => match self.control_group(target) {
                Some(ListenerGroup::Prev) => {
                    self.prev();
                    EventOutcome::prevented()
                }
                Some(ListenerGroup::Next) => {
                    self.next();
                    EventOutcome::prevented()
                }
                Some(ListenerGroup::Submit) | None => EventOutcome::ignored(),
            },
        }
    }

    /// Releases every listener group. Failures are logged per group and
    /// never stop the remaining groups from being released.
    pub fn teardown(&mut self) -> &mut Self {
        for group in ListenerGroup::ALL {
            match self.host.listeners.unbind_group(group, &self.host.document) {
                Ok(count) => debug!(group = group.name(), count, "listeners released"),
                Err(error) => warn!(group = group.name(), %error, "failed to release listeners"),
            }
        }
        self
    }

    pub fn listeners(&self) -> &Listeners {
        &self.host.listeners
    }

    fn control_group(&self, target: ElementId) -> Option<ListenerGroup> {
        let mut cursor = Some(target);
        while let Some(id) = cursor {
            if let Some(group) = self.host.listeners.group_of(id) {
                return Some(group);
            }
            if id == self.host.form {
                return None;
            }
            cursor = self.host.document.get(id).and_then(|element| element.parent());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{ListenerGroup, Listeners};
    use crate::core::dom::{Document, DomError, Element};

    #[test]
    fn bind_is_idempotent() {
        let mut doc = Document::new();
        let button = doc.append(doc.root(), Element::new("button")).expect("button");
        let mut listeners = Listeners::default();
        assert!(listeners.bind(ListenerGroup::Prev, button));
        assert!(!listeners.bind(ListenerGroup::Prev, button));
        assert_eq!(listeners.len(), 1);
        assert_eq!(listeners.group_of(button), Some(ListenerGroup::Prev));
    }

    #[test]
    fn unbind_reports_detached_elements_but_releases_group() {
        let mut doc = Document::new();
        let kept = doc.append(doc.root(), Element::new("button")).expect("kept");
        let gone = doc.append(doc.root(), Element::new("button")).expect("gone");
        let mut listeners = Listeners::default();
        listeners.bind(ListenerGroup::Next, kept);
        listeners.bind(ListenerGroup::Next, gone);
        doc.detach(gone);

        assert_eq!(
            listeners.unbind_group(ListenerGroup::Next, &doc),
            Err(DomError::Detached(gone))
        );
        assert!(listeners.is_empty());
        assert_eq!(listeners.unbind_group(ListenerGroup::Next, &doc), Ok(0));
    }

    #[test]
    fn prune_drops_detached_bindings() {
        let mut doc = Document::new();
        let button = doc.append(doc.root(), Element::new("button")).expect("button");
        let mut listeners = Listeners::default();
        listeners.bind(ListenerGroup::Prev, button);
        doc.detach(button);
        listeners.prune_detached(&doc);
        assert_eq!(listeners.bound(ListenerGroup::Prev).count(), 0);
    }
}
