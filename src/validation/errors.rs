//! Validation error collection with localized full messages.

use crate::i18n::{interpolate, Translator};
use crate::validation::{BoundArgs, Value};

const DEFAULT_FORMAT: &str = "%{attribute} %{message}";
const DEFAULT_CONNECTOR: &str = " and ";

/// Error messages grouped by attribute, in insertion order.
///
/// Most errors belong to one attribute. Rules spanning several columns (such
/// as multi-column uniqueness) attach to the whole attribute list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Errors {
    entries: Vec<(Vec<String>, Vec<String>)>,
}

impl Errors {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `message` to a single attribute.
    pub fn add(&mut self, attribute: &str, message: impl Into<String>) {
        self.add_to(&[attribute], message);
    }

    /// Attach `message` to a group of attributes.
    pub fn add_to(&mut self, attributes: &[&str], message: impl Into<String>) {
        let key: Vec<String> = attributes.iter().map(|a| a.to_string()).collect();
        let message = message.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, messages)) => messages.push(message),
            None => self.entries.push((key, vec![message])),
        }
    }

    /// Messages attached to exactly `attribute`.
    pub fn on(&self, attribute: &str) -> Vec<&str> {
        self.on_all(&[attribute])
    }

    /// Messages attached to exactly this attribute group.
    pub fn on_all(&self, attributes: &[&str]) -> Vec<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.iter().map(String::as_str).eq(attributes.iter().copied()))
            .map(|(_, messages)| messages.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether no message has been attached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of messages.
    pub fn count(&self) -> usize {
        self.entries.iter().map(|(_, m)| m.len()).sum()
    }

    /// Remove every message (used when re-validating a record).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Attribute groups and their messages, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&[String], &[String])> {
        self.entries
            .iter()
            .map(|(k, m)| (k.as_slice(), m.as_slice()))
    }

    /// Messages prefixed with their localized attribute names.
    ///
    /// Formatting uses the `errors.format` catalog entry (default
    /// `%{attribute} %{message}`); attribute groups join with
    /// `errors.connector` (default `" and "`).
    ///
    /// # Arguments
    /// * `translator` - Catalog view for the current locale
    /// * `scope` - Translation scope used for attribute names
    /// * `model` - Model key used for attribute names
    ///
    /// # Returns
    /// One full message per attached message, in insertion order
    pub fn full_messages<T: Translator + ?Sized>(
        &self,
        translator: &T,
        scope: &str,
        model: &str,
    ) -> Vec<String> {
        let connector = translator
            .lookup("errors.connector")
            .unwrap_or_else(|| DEFAULT_CONNECTOR.to_string());

        let mut out = Vec::with_capacity(self.count());
        for (attributes, messages) in &self.entries {
            let names: Vec<String> = attributes
                .iter()
                .map(|a| human_attribute_name(translator, scope, model, a))
                .collect();
            let subject = names.join(&connector);

            for message in messages {
                let args = BoundArgs::bind(
                    &["attribute", "message"],
                    &[Value::from(subject.as_str()), Value::from(message.as_str())],
                );
                let full = translator
                    .translate("errors.format", &args, &[])
                    .unwrap_or_else(|| interpolate(DEFAULT_FORMAT, &args));
                out.push(full);
            }
        }
        out
    }
}

/// Localized display name of an attribute.
///
/// Tries `{scope}.attributes.{model}.{attribute}`, then `attributes.{attribute}`,
/// then humanizes the raw name (`first_name` -> `First name`).
pub fn human_attribute_name<T: Translator + ?Sized>(
    translator: &T,
    scope: &str,
    model: &str,
    attribute: &str,
) -> String {
    let model_key = if scope.is_empty() {
        format!("attributes.{}.{}", model, attribute)
    } else {
        format!("{}.attributes.{}.{}", scope, model, attribute)
    };
    translator
        .translate(
            &model_key,
            &BoundArgs::default(),
            &[format!("attributes.{}", attribute)],
        )
        .unwrap_or_else(|| humanize(attribute))
}

fn humanize(attribute: &str) -> String {
    let base = attribute.strip_suffix("_id").unwrap_or(attribute);
    let spaced = base.replace('_', " ");
    let trimmed = spaced.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
