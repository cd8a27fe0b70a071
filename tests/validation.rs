mod support;

use std::cell::RefCell;
use std::rc::Rc;
use support::{active_indices, fill, fill_personal, signup_wizard};
use zangdar::{Document, DomEvent, Element, Options, SubmitOutcome, Wizard};

#[test]
fn required_fields_block_forward_navigation() {
    let mut wizard = signup_wizard(true, Options::new());
    wizard.reveal_step("address").expect("reveal");

    assert_eq!(wizard.current_index(), 0);
    assert_eq!(active_indices(&wizard), vec![0]);
    let personal = wizard.get_step("personal").expect("step");
    assert!(personal.has_errors());
    assert!(!personal.is_complete());
    let mut keys: Vec<&str> = personal.errors().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["email", "name"]);
    assert!(personal.errors_for("name").iter().all(|message| !message.is_empty()));
    assert_eq!(personal.errors_for("email").len(), 1);
}

#[test]
fn first_invalid_field_receives_focus() {
    let mut wizard = signup_wizard(true, Options::new());
    wizard.next();
    let name = wizard
        .get_step("personal")
        .and_then(|step| step.field("name"))
        .expect("name");
    assert_eq!(wizard.document().focused(), Some(name));
    let element = wizard.document().get(name).expect("element");
    assert_eq!(element.reported_message(), Some("Please fill out this field."));
}

#[test]
fn filled_fields_let_navigation_through() {
    let mut wizard = signup_wizard(true, Options::new());
    fill_personal(&mut wizard);
    wizard.reveal_step("address").expect("reveal");

    assert_eq!(wizard.current_index(), 1);
    let personal = wizard.get_step("personal").expect("step");
    assert!(!personal.has_errors());
    assert!(personal.is_complete());
    assert!(!personal.is_active());
    assert!(wizard.get_step("address").expect("step").is_active());
}

#[test]
fn malformed_email_is_a_type_mismatch() {
    let mut wizard = signup_wizard(true, Options::new());
    fill(&mut wizard, "personal", "name", "Foo");
    fill(&mut wizard, "personal", "email", "not an address");
    wizard.next();

    assert_eq!(wizard.current_index(), 0);
    let personal = wizard.get_step("personal").expect("step");
    assert_eq!(
        personal.errors_for("email"),
        ["Please enter an email address.".to_string()]
    );
    assert!(personal.errors_for("name").is_empty());
}

#[test]
fn errors_clear_on_next_successful_attempt() {
    let mut wizard = signup_wizard(true, Options::new());
    wizard.next();
    assert!(wizard.get_step("personal").expect("step").has_errors());
    fill_personal(&mut wizard);
    wizard.next();
    assert!(!wizard.get_step("personal").expect("step").has_errors());
    assert_eq!(wizard.current_index(), 1);
}

#[test]
fn backward_navigation_never_validates() {
    let mut wizard = signup_wizard(true, Options::new().bypass_validation(true));
    wizard.last();
    wizard.set_option("bypass_validation", false);
    wizard.prev().reveal_step(0usize).expect("reveal");
    assert_eq!(wizard.current_index(), 0);
    assert!(!wizard.get_step("personal").expect("step").has_errors());
}

#[test]
fn bypass_validation_skips_every_check() {
    let mut wizard = signup_wizard(true, Options::new().bypass_validation(true));
    wizard.next();
    assert_eq!(wizard.current_index(), 1);
    assert!(!wizard.get_step("personal").expect("step").has_errors());
}

#[test]
fn on_validation_is_combined_with_native_checks() {
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let mut wizard = signup_wizard(
        true,
        Options::new().on_validation(move |context| {
            *counter.borrow_mut() += 1;
            if context.value("name") == Some("admin") {
                context.add_error("name", "reserved name");
                return false;
            }
            true
        }),
    );

    wizard.next();
    assert_eq!(wizard.current_index(), 0);
    assert_eq!(*calls.borrow(), 1);

    fill(&mut wizard, "personal", "name", "admin");
    fill(&mut wizard, "personal", "email", "admin@test.local");
    wizard.next();
    assert_eq!(wizard.current_index(), 0);
    assert_eq!(
        wizard.get_step("personal").expect("step").errors_for("name"),
        ["reserved name".to_string()]
    );

    fill(&mut wizard, "personal", "name", "Foo");
    wizard.next();
    assert_eq!(wizard.current_index(), 1);
    assert_eq!(*calls.borrow(), 3);
}

#[test]
fn custom_validation_replaces_native_checks() {
    let mut wizard = signup_wizard(
        true,
        Options::new().custom_validation(|context| {
            let ok = context.value("name").is_some_and(|name| name.len() >= 2);
            if !ok {
                context.add_error("name", "too short");
            }
            ok
        }),
    );

    let form = wizard.form();
    assert!(!wizard.document().get(form).expect("form").has_attr("novalidate"));

    fill(&mut wizard, "personal", "name", "x");
    wizard.next();
    assert_eq!(wizard.current_index(), 0);
    assert!(wizard.document().get(form).expect("form").has_attr("novalidate"));
    let personal = wizard.get_step("personal").expect("step");
    assert_eq!(personal.errors_for("name"), ["too short".to_string()]);
    assert!(personal.errors_for("email").is_empty());
    assert_eq!(wizard.document().focused(), None);

    fill(&mut wizard, "personal", "name", "Foo");
    wizard.next();
    assert_eq!(wizard.current_index(), 1);
    assert!(!wizard.get_step("personal").expect("step").has_errors());
}

#[test]
fn submit_is_blocked_by_an_invalid_step() {
    let submitted = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&submitted);
    let mut wizard = signup_wizard(
        true,
        Options::new().on_submit(move |_| *counter.borrow_mut() += 1),
    );

    let outcome = wizard.submit();
    assert_eq!(outcome, SubmitOutcome::Blocked);
    assert!(outcome.prevents_default());
    assert_eq!(*submitted.borrow(), 0);
}

#[test]
fn submit_hands_over_to_the_hook() {
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    let mut wizard = signup_wizard(
        false,
        Options::new().on_submit(move |event| {
            *sink.borrow_mut() = event.step.map(|step| step.label().to_string());
        }),
    );
    wizard.last();

    let outcome = wizard.dispatch(DomEvent::Submit);
    assert!(outcome.handled);
    assert!(outcome.default_prevented);
    assert_eq!(seen.borrow().as_deref(), Some("confirm"));
}

#[test]
fn submit_without_hook_lets_the_host_submit() {
    let mut wizard = signup_wizard(true, Options::new());
    fill_personal(&mut wizard);
    let outcome = wizard.submit();
    assert_eq!(outcome, SubmitOutcome::Default);
    assert!(!outcome.prevents_default());
}

fn plan_wizard(checked: Option<usize>) -> Wizard {
    let mut doc = Document::new();
    let form = doc
        .append(doc.root(), Element::new("form").with_attr("id", "wizard-form"))
        .expect("form");
    let plan = doc
        .append(form, Element::new("section").with_attr("data-step", "plan"))
        .expect("plan");
    for (index, value) in ["basic", "pro", "team"].into_iter().enumerate() {
        let mut radio = Element::new("input")
            .with_attr("type", "radio")
            .with_attr("name", "plan")
            .with_attr("value", value)
            .with_attr("required", "");
        if checked == Some(index) {
            radio = radio.with_attr("checked", "");
        }
        doc.append(plan, radio).expect("radio");
    }
    doc.append(plan, Element::new("button").with_attr("data-next", ""))
        .expect("next");
    doc.append(form, Element::new("section").with_attr("data-step", "done"))
        .expect("done");
    Wizard::new(doc, support::FORM, Options::new()).expect("wizard")
}

#[test]
fn required_radio_group_accepts_any_checked_option() {
    let mut wizard = plan_wizard(Some(0));
    wizard.next();
    assert_eq!(wizard.current_index(), 1);
    assert!(!wizard.get_step("plan").expect("step").has_errors());
}

#[test]
fn required_radio_group_without_choice_blocks() {
    let mut wizard = plan_wizard(None);
    wizard.next();
    assert_eq!(wizard.current_index(), 0);
    assert_eq!(
        wizard.get_step("plan").expect("step").errors_for("plan"),
        ["Please fill out this field.".to_string()]
    );
}

#[test]
fn mixed_case_checkbox_type_counts_as_checked() {
    let mut doc = Document::new();
    let form = doc
        .append(doc.root(), Element::new("form").with_attr("id", "wizard-form"))
        .expect("form");
    let terms = doc
        .append(form, Element::new("section").with_attr("data-step", "terms"))
        .expect("terms");
    doc.append(
        terms,
        Element::new("input")
            .with_attr("type", "Checkbox")
            .with_attr("name", "terms")
            .with_attr("required", "")
            .with_attr("checked", ""),
    )
    .expect("checkbox");
    doc.append(terms, Element::new("button").with_attr("data-next", ""))
        .expect("next");
    doc.append(form, Element::new("section").with_attr("data-step", "done"))
        .expect("done");

    let mut wizard = Wizard::new(doc, support::FORM, Options::new()).expect("wizard");
    wizard.next();
    assert_eq!(wizard.current_index(), 1);
}
