use crate::core::dom::Element;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static SELECTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?P<tag>[a-zA-Z][a-zA-Z0-9-]*)?(?:\.(?P<class>[\w-]+)|#(?P<id>[\w-]+)|\[(?P<attr>[a-zA-Z@:.\-]+)(?:=["']?(?P<value>[^"'\]]*)["']?)?\])?$"#,
    )
    .expect("selector pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("unsupported selector \"{0}\"")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Matcher {
    Any,
    Class(String),
    Id(String),
    Attribute { name: String, value: Option<String> },
}

/// A single compound selector: an optional tag followed by at most one
/// class, id or attribute test (`button[data-next]`, `.step`, `[type="submit"]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Selector {
    source: String,
    tag: Option<String>,
    matcher: Matcher,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let trimmed = source.trim();
        let captures = SELECTOR
            .captures(trimmed)
            .ok_or_else(|| SelectorError::Invalid(source.to_string()))?;

        let tag = captures.name("tag").map(|m| m.as_str().to_ascii_lowercase());
        let matcher = if let Some(class) = captures.name("class") {
            Matcher::Class(class.as_str().to_string())
        } else if let Some(id) = captures.name("id") {
            Matcher::Id(id.as_str().to_string())
        } else if let Some(name) = captures.name("attr") {
            Matcher::Attribute {
                name: name.as_str().to_string(),
                value: captures.name("value").map(|m| m.as_str().to_string()),
            }
        } else {
            Matcher::Any
        };

        if tag.is_none() && matcher == Matcher::Any {
            return Err(SelectorError::Invalid(source.to_string()));
        }

        Ok(Self {
            source: trimmed.to_string(),
            tag,
            matcher,
        })
    }

    pub fn as_str(&self) -> &str {
        self.source.as_str()
    }

    pub fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag
            && !element.tag().eq_ignore_ascii_case(tag)
        {
            return false;
        }
        match &self.matcher {
            Matcher::Any => true,
            Matcher::Class(class) => element.has_class(class),
            Matcher::Id(id) => element.attr("id") == Some(id.as_str()),
            Matcher::Attribute { name, value: None } => element.has_attr(name),
            Matcher::Attribute {
                name,
                value: Some(value),
            } => element.attr(name) == Some(value.as_str()),
        }
    }

    /// Name of the attribute this selector tests, if any.
    pub fn attribute_name(&self) -> Option<&str> {
        match &self.matcher {
            Matcher::Attribute { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Writes the selector onto `element` so that it matches afterwards.
    /// For attribute selectors `value` wins over the selector's own value.
    pub fn stamp(&self, element: &mut Element, value: Option<&str>) {
        match &self.matcher {
            Matcher::Any => {}
            Matcher::Class(class) => element.add_class(class.as_str()),
            Matcher::Id(id) => element.set_attr("id", id.as_str()),
            Matcher::Attribute { name, value: own } => {
                let value = value.or(own.as_deref()).unwrap_or_default();
                element.set_attr(name.as_str(), value);
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Selector {
    type Error = SelectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value.as_str())
    }
}

impl From<Selector> for String {
    fn from(value: Selector) -> Self {
        value.source
    }
}
