#![allow(dead_code)]

use zangdar::{Document, Element, ElementId, Options, Wizard};

pub const FORM: &str = "#wizard-form";

/// Three steps: `personal` (name, email), `address` (street) and `confirm`
/// (terms), followed by a submit button. With `required` set, every field
/// of `personal` must be filled before moving on.
pub fn signup_document(required: bool) -> Document {
    let mut doc = Document::new();
    let form = doc
        .append(doc.root(), Element::new("form").with_attr("id", "wizard-form"))
        .expect("form");

    let personal = section(&mut doc, form, "personal");
    let mut name = Element::new("input").with_attr("name", "name");
    let mut email = Element::new("input")
        .with_attr("name", "email")
        .with_attr("type", "email");
    if required {
        name = name.with_attr("required", "");
        email = email.with_attr("required", "");
    }
    doc.append(personal, name).expect("name");
    doc.append(personal, email).expect("email");
    next_button(&mut doc, personal);

    let address = section(&mut doc, form, "address");
    doc.append(address, Element::new("input").with_attr("name", "street"))
        .expect("street");
    next_button(&mut doc, address);

    let confirm = section(&mut doc, form, "confirm");
    doc.append(
        confirm,
        Element::new("input")
            .with_attr("name", "terms")
            .with_attr("type", "checkbox"),
    )
    .expect("terms");

    doc.append(
        form,
        Element::new("button")
            .with_attr("type", "submit")
            .with_text("Send"),
    )
    .expect("submit");
    doc
}

pub fn signup_wizard(required: bool, options: Options) -> Wizard {
    Wizard::new(signup_document(required), FORM, options).expect("wizard")
}

pub fn fill(wizard: &mut Wizard, step: &str, field: &str, value: &str) {
    let id = wizard
        .get_step(step)
        .and_then(|step| step.field(field))
        .expect("field");
    wizard.document_mut().set_value(id, value).expect("value");
}

pub fn fill_personal(wizard: &mut Wizard) {
    fill(wizard, "personal", "name", "Foo");
    fill(wizard, "personal", "email", "email@test.local");
}

pub fn active_indices(wizard: &Wizard) -> Vec<usize> {
    wizard
        .steps()
        .iter()
        .filter(|step| step.is_active())
        .map(|step| step.index())
        .collect()
}

pub fn next_control(wizard: &Wizard, step: &str) -> ElementId {
    let selector = zangdar::Selector::parse("[data-next]").expect("selector");
    let element = wizard.get_step(step).expect("step").element();
    wizard.document().query(element, &selector).expect("next control")
}

pub fn prev_control(wizard: &Wizard) -> ElementId {
    let selector = zangdar::Selector::parse("[data-prev]").expect("selector");
    wizard
        .document()
        .query(wizard.form(), &selector)
        .expect("prev control")
}

fn section(doc: &mut Document, form: ElementId, label: &str) -> ElementId {
    doc.append(form, Element::new("section").with_attr("data-step", label))
        .expect("section")
}

fn next_button(doc: &mut Document, parent: ElementId) {
    doc.append(
        parent,
        Element::new("button")
            .with_attr("data-next", "")
            .with_text("Next"),
    )
    .expect("next");
}
