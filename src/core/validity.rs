use crate::core::dom::Element;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*$")
        .expect("email pattern is valid")
});

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:\S+$").expect("url pattern is valid")
});

/// First constraint a field fails, mirroring the browser's validity flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    ValueMissing,
    TypeMismatch(&'static str),
    PatternMismatch,
    TooShort { min: usize, actual: usize },
    TooLong { max: usize, actual: usize },
}

impl Violation {
    pub fn message(&self) -> String {
        match self {
            Self::ValueMissing => "Please fill out this field.".to_string(),
            Self::TypeMismatch("email") => "Please enter an email address.".to_string(),
            Self::TypeMismatch("url") => "Please enter a URL.".to_string(),
            Self::TypeMismatch(kind) => format!("Please enter a valid {kind}."),
            Self::PatternMismatch => "Please match the requested format.".to_string(),
            Self::TooShort { min, actual } => format!(
                "Please lengthen this text to {min} characters or more (you are currently using {actual} characters)."
            ),
            Self::TooLong { max, actual } => format!(
                "Please shorten this text to {max} characters or less (you are currently using {actual} characters)."
            ),
        }
    }
}

pub type Constraint = fn(&Element) -> Result<(), Violation>;

const CONSTRAINTS: &[Constraint] = &[
    value_missing,
    type_mismatch,
    pattern_mismatch,
    too_short,
    too_long,
];

/// Runs every constraint against `element`, returning the first violation.
pub fn check(element: &Element) -> Result<(), Violation> {
    if !element.is_form_field() {
        return Ok(());
    }
    for constraint in CONSTRAINTS {
        constraint(element)?;
    }
    Ok(())
}

fn is_checkable(element: &Element) -> bool {
    element.tag() == "input" && matches!(element.input_type().as_str(), "checkbox" | "radio")
}

fn value_missing(element: &Element) -> Result<(), Violation> {
    if !element.has_attr("required") {
        return Ok(());
    }
    let missing = if is_checkable(element) {
        !element.has_attr("checked")
    } else {
        element.value().is_empty()
    };
    if missing {
        Err(Violation::ValueMissing)
    } else {
        Ok(())
    }
}

fn type_mismatch(element: &Element) -> Result<(), Violation> {
    if element.tag() != "input" || element.value().is_empty() {
        return Ok(());
    }
    let value = element.value();
    match element.input_type().as_str() {
        "email" if !EMAIL.is_match(value) => Err(Violation::TypeMismatch("email")),
        "url" if !URL.is_match(value) => Err(Violation::TypeMismatch("url")),
        _ => Ok(()),
    }
}

fn pattern_mismatch(element: &Element) -> Result<(), Violation> {
    let Some(pattern) = element.attr("pattern") else {
        return Ok(());
    };
    if element.value().is_empty() {
        return Ok(());
    }
    // Invalid patterns are ignored, as browsers do.
    let Ok(re) = Regex::new(&format!("^(?:{pattern})$")) else {
        return Ok(());
    };
    if re.is_match(element.value()) {
        Ok(())
    } else {
        Err(Violation::PatternMismatch)
    }
}

fn length_limit(element: &Element, name: &str) -> Option<usize> {
    element.attr(name).and_then(|raw| raw.trim().parse().ok())
}

fn too_short(element: &Element) -> Result<(), Violation> {
    let Some(min) = length_limit(element, "minlength") else {
        return Ok(());
    };
    let actual = element.value().chars().count();
    if actual > 0 && actual < min {
        Err(Violation::TooShort { min, actual })
    } else {
        Ok(())
    }
}

fn too_long(element: &Element) -> Result<(), Violation> {
    let Some(max) = length_limit(element, "maxlength") else {
        return Ok(());
    };
    let actual = element.value().chars().count();
    if actual > max {
        Err(Violation::TooLong { max, actual })
    } else {
        Ok(())
    }
}
