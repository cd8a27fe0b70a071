use crate::core::ElementId;
use crate::core::selector::Selector;
use crate::core::validity::{self, Violation};
use indexmap::{IndexMap, IndexSet};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("{0} does not belong to this document")]
    UnknownElement(ElementId),
    #[error("cannot insert {child} into {parent}: it would become its own ancestor")]
    HierarchyRequest { parent: ElementId, child: ElementId },
    #[error("{0} is no longer attached to the document")]
    Detached(ElementId),
}

#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    attributes: IndexMap<String, String>,
    classes: IndexSet<String>,
    value: String,
    text: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    reported: Option<String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn tag(&self) -> &str {
        self.tag.as_str()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.shift_remove(name);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn add_class(&mut self, class: impl Into<String>) {
        self.classes.insert(class.into());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.shift_remove(class);
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        self.children.as_slice()
    }

    /// The `name` attribute, when present and non-empty.
    pub fn name(&self) -> Option<&str> {
        self.attr("name").filter(|name| !name.is_empty())
    }

    /// The `type` attribute, lowercased, defaulting to `text`.
    pub fn input_type(&self) -> String {
        self.attr("type")
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| "text".to_string())
    }

    pub fn is_radio(&self) -> bool {
        self.tag() == "input" && self.input_type() == "radio"
    }

    pub fn is_disabled(&self) -> bool {
        self.has_attr("disabled")
    }

    pub fn is_hidden(&self) -> bool {
        self.has_attr("hidden")
    }

    /// Inputs (other than `type=hidden`), selects and textareas that are not disabled.
    pub fn is_form_field(&self) -> bool {
        if self.is_disabled() {
            return false;
        }
        match self.tag() {
            "input" => self.input_type() != "hidden",
            "select" | "textarea" => true,
            _ => false,
        }
    }

    /// Message left by the last `report_validity` that failed.
    pub fn reported_message(&self) -> Option<&str> {
        self.reported.as_deref()
    }
}

/// Arena-backed element tree standing in for the host page.
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
    root: ElementId,
    focused: Option<ElementId>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            elements: vec![Element::new("body")],
            root: ElementId::new(0),
            focused: None,
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.index())
    }

    /// Adds a detached element to the arena.
    pub fn create(&mut self, mut element: Element) -> ElementId {
        element.parent = None;
        element.children.clear();
        let id = ElementId::new(self.elements.len());
        self.elements.push(element);
        id
    }

    /// Creates `element` and appends it as the last child of `parent`.
    pub fn append(&mut self, parent: ElementId, element: Element) -> Result<ElementId, DomError> {
        self.element(parent)?;
        let id = self.create(element);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Moves `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), DomError> {
        self.check_insert(parent, child)?;
        self.detach(child);
        self.link(parent, child, None);
        Ok(())
    }

    /// Moves `child` to the front of `parent`'s children.
    pub fn prepend_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), DomError> {
        self.check_insert(parent, child)?;
        self.detach(child);
        self.link(parent, child, Some(0));
        Ok(())
    }

    /// Removes `id` from its parent. Returns `false` when it was already detached.
    pub fn detach(&mut self, id: ElementId) -> bool {
        let Some(parent) = self.get(id).and_then(Element::parent) else {
            return false;
        };
        if let Some(parent) = self.get_mut(parent) {
            parent.children.retain(|child| *child != id);
        }
        if let Some(element) = self.get_mut(id) {
            element.parent = None;
        }
        if self.focused.is_some_and(|focused| !self.is_connected(focused)) {
            self.focused = None;
        }
        true
    }

    /// True when `id` is reachable from the document root.
    pub fn is_connected(&self, id: ElementId) -> bool {
        self.contains(self.root, id)
    }

    /// True when `id` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.get(current).and_then(Element::parent);
        }
        false
    }

    /// Descendants of `scope` in document order, excluding `scope` itself.
    pub fn descendants(&self, scope: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self
            .get(scope)
            .map(|element| element.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(element) = self.get(id) {
                stack.extend(element.children.iter().rev().copied());
            }
        }
        out
    }

    pub fn query_all(&self, scope: ElementId, selector: &Selector) -> Vec<ElementId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(|element| selector.matches(element)))
            .collect()
    }

    pub fn query(&self, scope: ElementId, selector: &Selector) -> Option<ElementId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.get(*id).is_some_and(|element| selector.matches(element)))
    }

    pub fn form_fields(&self, scope: ElementId) -> Vec<ElementId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(Element::is_form_field))
            .collect()
    }

    pub fn focus(&mut self, id: ElementId) {
        if self.get(id).is_some() {
            self.focused = Some(id);
        }
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    pub fn set_value(&mut self, id: ElementId, value: impl Into<String>) -> Result<(), DomError> {
        self.element_mut(id)?.set_value(value);
        Ok(())
    }

    pub fn check_validity(&self, id: ElementId) -> bool {
        self.violation(id).is_none()
    }

    pub fn validation_message(&self, id: ElementId) -> Option<String> {
        self.violation(id).map(|violation| violation.message())
    }

    /// First constraint `id` fails. A named radio is checked as part of its
    /// group: the group is required when any member is, and satisfied when
    /// any member is checked.
    pub fn violation(&self, id: ElementId) -> Option<Violation> {
        let element = self.get(id)?;
        if element.is_radio()
            && element.is_form_field()
            && let Some(name) = element.name()
        {
            let group = self.radio_group(id, name);
            let required = group.iter().any(|member| member.has_attr("required"));
            let checked = group.iter().any(|member| member.has_attr("checked"));
            return (required && !checked).then_some(Violation::ValueMissing);
        }
        validity::check(element).err()
    }

    /// Nearest enclosing `form`, or the root for elements outside any form.
    pub fn form_owner(&self, id: ElementId) -> ElementId {
        let mut cursor = self.get(id).and_then(Element::parent);
        while let Some(current) = cursor {
            let Some(element) = self.get(current) else {
                break;
            };
            if element.tag() == "form" {
                return current;
            }
            cursor = element.parent();
        }
        self.root
    }

    fn radio_group(&self, id: ElementId, name: &str) -> Vec<&Element> {
        let mut group: Vec<&Element> = self
            .descendants(self.form_owner(id))
            .into_iter()
            .filter_map(|member| self.get(member))
            .filter(|member| member.is_radio() && member.name() == Some(name))
            .collect();
        if group.is_empty()
            && let Some(element) = self.get(id)
        {
            group.push(element);
        }
        group
    }

    /// Checks the field and, when invalid, leaves its message on the
    /// element and moves focus to it.
    pub fn report_validity(&mut self, id: ElementId) -> bool {
        let message = self.validation_message(id);
        let Some(element) = self.get_mut(id) else {
            return true;
        };
        let valid = message.is_none();
        element.reported = message;
        if !valid {
            self.focused = Some(id);
        }
        valid
    }

    fn element(&self, id: ElementId) -> Result<&Element, DomError> {
        self.get(id).ok_or(DomError::UnknownElement(id))
    }

    fn element_mut(&mut self, id: ElementId) -> Result<&mut Element, DomError> {
        self.get_mut(id).ok_or(DomError::UnknownElement(id))
    }

    fn check_insert(&self, parent: ElementId, child: ElementId) -> Result<(), DomError> {
        self.element(parent)?;
        self.element(child)?;
        if self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    fn link(&mut self, parent: ElementId, child: ElementId, position: Option<usize>) {
        if let Some(element) = self.get_mut(parent) {
            match position {
                Some(index) => element.children.insert(index.min(element.children.len()), child),
                None => element.children.push(child),
            }
        }
        if let Some(element) = self.get_mut(child) {
            element.parent = Some(parent);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
