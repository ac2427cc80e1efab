//! User-facing text.
//!
//! Hosts usually own a translation layer; [`Localizer`] is the seam. The
//! bundled [`Catalog`] covers the keys this crate uses, in English.

use std::collections::HashMap;

/// Message keys used by the starboard feature.
pub mod keys {
    /// Star removed; parameters `step`, `emoji`.
    pub const CENSURE_STEP: &str = "starboard.censure.step";
    /// Star removed with a configured reason; parameters `step`, `emoji`, `reason`.
    pub const CENSURE_REASON: &str = "starboard.censure.reason";
}

/// Turns a message key and named parameters into user-facing text.
pub trait Localizer: Send + Sync {
    /// Render `key` with `params`.
    fn localize(&self, key: &str, params: &[(&str, &str)]) -> String;
}

/// A key → template table with `{name}` placeholders.
///
/// Unknown keys render as the key itself so that a missing entry is visible
/// rather than silent.
#[derive(Debug, Clone)]
pub struct Catalog {
    templates: HashMap<String, String>,
}

impl Catalog {
    /// An empty catalog.
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// The built-in English catalog.
    pub fn english() -> Self {
        Self::empty()
            .with_entry(
                keys::CENSURE_STEP,
                "Your {emoji} on a message was removed ({step}).",
            )
            .with_entry(
                keys::CENSURE_REASON,
                "Your {emoji} on a message was removed ({step}): {reason}",
            )
    }

    /// Add or replace an entry.
    pub fn with_entry(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(key.into(), template.into());
        self
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::english()
    }
}

impl Localizer for Catalog {
    fn localize(&self, key: &str, params: &[(&str, &str)]) -> String {
        match self.templates.get(key) {
            Some(template) => render(template, params),
            None => key.to_string(),
        }
    }
}

fn render(template: &str, params: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in params {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_templates() {
        let catalog = Catalog::english();
        let text = catalog.localize(
            keys::CENSURE_REASON,
            &[("emoji", "⭐"), ("step", "FILTER"), ("reason", "too old")],
        );
        assert_eq!(text, "Your ⭐ on a message was removed (FILTER): too old");

        let text = catalog.localize(keys::CENSURE_STEP, &[("emoji", "⭐"), ("step", "SELF-STAR")]);
        assert_eq!(text, "Your ⭐ on a message was removed (SELF-STAR).");
    }

    #[test]
    fn test_unknown_key_renders_key() {
        assert_eq!(Catalog::empty().localize("nope", &[]), "nope");
    }

    #[test]
    fn test_override_entry() {
        let catalog = Catalog::english().with_entry(keys::CENSURE_STEP, "{step}!");
        assert_eq!(
            catalog.localize(keys::CENSURE_STEP, &[("step", "USER-BLOCK")]),
            "USER-BLOCK!"
        );
    }
}
