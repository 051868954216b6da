// src/browser/locator.rs
use std::fmt;

/// How the locator's value is compared against the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// `//tag[@attribute='value']`
    Attribute,
    /// `//tag[function()='value']`, e.g. `normalize-space()`.
    Function,
    /// `//tag[contains(text(),'value')]`
    ContainsText,
}

/// Structural address of one control on the rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub tag: String,
    pub attribute: String,
    pub value: String,
    /// Appended verbatim; must start with `/`.
    pub subpath: Option<String>,
    pub kind: MatchKind,
}

impl Locator {
    pub fn attr(tag: &str, attribute: &str, value: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
            subpath: None,
            kind: MatchKind::Attribute,
        }
    }

    pub fn function(tag: &str, function: &str, value: &str) -> Self {
        Self {
            kind: MatchKind::Function,
            ..Self::attr(tag, function, value)
        }
    }

    /// Matches on whitespace-normalized text, the usual way to hit a labelled button.
    pub fn text(tag: &str, value: &str) -> Self {
        Self::function(tag, "normalize-space()", value)
    }

    pub fn contains_text(tag: &str, value: &str) -> Self {
        Self {
            kind: MatchKind::ContainsText,
            ..Self::attr(tag, "text()", value)
        }
    }

    #[cfg(test)]
    pub fn with_subpath(mut self, subpath: &str) -> Self {
        self.subpath = Some(subpath.to_string());
        self
    }

    pub fn xpath(&self) -> String {
        let value = xpath_literal(&self.value);
        let predicate = match self.kind {
            MatchKind::Attribute => format!("@{}={}", self.attribute, value),
            MatchKind::Function => format!("{}={}", self.attribute, value),
            MatchKind::ContainsText => format!("contains({},{})", self.attribute, value),
        };
        format!(
            "//{}[{}]{}",
            self.tag,
            predicate,
            self.subpath.as_deref().unwrap_or("")
        )
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.xpath())
    }
}

/// XPath 1.0 has no escape sequences, so a value holding both quote kinds
/// has to be stitched together with `concat()`.
fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }

    let parts: Vec<String> = value
        .split('\'')
        .map(|part| format!("'{part}'"))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}
