use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Element lookup strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum By {
    Css,
    XPath,
    Id,
    ClassName,
    Name,
    LinkText,
    TagName,
}

/// A strategy + selector pair identifying zero or more DOM elements.
///
/// Page objects declare their locators as `const` items; computed locators
/// (from a [`LocatorTemplate`]) own their selector string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    pub by: By,
    pub value: Cow<'static, str>,
}

impl Locator {
    pub const fn css(value: &'static str) -> Self {
        Locator {
            by: By::Css,
            value: Cow::Borrowed(value),
        }
    }

    pub const fn xpath(value: &'static str) -> Self {
        Locator {
            by: By::XPath,
            value: Cow::Borrowed(value),
        }
    }

    pub const fn id(value: &'static str) -> Self {
        Locator {
            by: By::Id,
            value: Cow::Borrowed(value),
        }
    }

    pub fn new(by: By, value: impl Into<String>) -> Self {
        Locator {
            by,
            value: Cow::Owned(value.into()),
        }
    }

    /// The W3C `(using, value)` pair for a find-elements request.
    ///
    /// W3C WebDriver only knows css/xpath/link text/tag name, so id, class
    /// and name lookups are rewritten to CSS selectors.
    pub fn to_w3c(&self) -> (&'static str, String) {
        match self.by {
            By::Css => ("css selector", self.value.to_string()),
            By::XPath => ("xpath", self.value.to_string()),
            By::Id => ("css selector", format!("[id=\"{}\"]", self.value)),
            By::ClassName => ("css selector", format!(".{}", self.value)),
            By::Name => ("css selector", format!("[name=\"{}\"]", self.value)),
            By::LinkText => ("link text", self.value.to_string()),
            By::TagName => ("tag name", self.value.to_string()),
        }
    }

    /// Append an XPath step to an XPath locator.
    ///
    /// Returns `None` for non-XPath locators, which cannot be extended by
    /// string concatenation.
    pub fn child(&self, step: &str) -> Option<Locator> {
        match self.by {
            By::XPath => Some(Locator::new(By::XPath, format!("{}/{}", self.value, step))),
            _ => None,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.by, self.value)
    }
}

/// A pure `index -> Locator` function over a positional selector.
///
/// The pattern holds a single `{}` placeholder that receives `index + 1`:
/// callers address items 0-based, the DOM's `nth-child`/XPath positions are
/// 1-based. This couples the locator to the DOM's child ordering, so any
/// reordering of the rendered list breaks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatorTemplate {
    pub by: By,
    pub pattern: &'static str,
}

impl LocatorTemplate {
    pub const fn xpath(pattern: &'static str) -> Self {
        LocatorTemplate {
            by: By::XPath,
            pattern,
        }
    }

    /// Selector text for the 0-based `index`.
    pub fn expand(&self, index: usize) -> String {
        self.pattern.replacen("{}", &(index + 1).to_string(), 1)
    }

    pub fn at(&self, index: usize) -> Locator {
        Locator::new(self.by, self.expand(index))
    }
}

/// Quote a string as an XPath literal, handling embedded quotes.
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        format!("'{}'", text)
    } else if !text.contains('"') {
        format!("\"{}\"", text)
    } else {
        let parts: Vec<String> = text.split('\'').map(|p| format!("'{}'", p)).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}
