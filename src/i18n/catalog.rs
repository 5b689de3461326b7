//! Translation catalog: locale-keyed string tables with fallback lookups.
//!
//! Catalog files are JSON documents whose top-level keys are locale codes and
//! whose nested objects flatten to dotted keys:
//!
//! ```json
//! { "en": { "errors": { "messages": { "presence": "can't be blank" } } } }
//! ```
//!
//! becomes `errors.messages.presence` under the `en` locale.

use crate::i18n::Locale;
use crate::validation::BoundArgs;
use anyhow::{bail, Context, Result};
use regex::{Captures, Regex};
use serde_json::Value as Json;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"%\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap())
}

/// Replace `%{name}` placeholders with bound arguments.
///
/// Absent arguments and names that are not bound render as empty text.
pub fn interpolate(template: &str, args: &BoundArgs) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| args.text(&caps[1]))
        .into_owned()
}

/// Names of all `%{name}` placeholders in a template, in order of appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    placeholder_regex()
        .captures_iter(template)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// The translation service consumed by the message resolver.
///
/// `translate` resolves `primary`, then each of `fallbacks` in order, and
/// returns the first match interpolated with `args`. Blank entries count as
/// misses.
pub trait Translator {
    /// Look up `primary`, then `fallbacks` in order.
    ///
    /// # Returns
    /// The first non-blank entry interpolated with `args`, or `None`
    fn translate(&self, primary: &str, args: &BoundArgs, fallbacks: &[String]) -> Option<String>;

    /// Single-key lookup without arguments.
    fn lookup(&self, key: &str) -> Option<String> {
        self.translate(key, &BoundArgs::default(), &[])
    }
}

/// In-memory translation store for any number of locales.
#[derive(Debug, Clone)]
pub struct Catalog {
    default_locale: Locale,
    entries: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    /// Create an empty catalog.
    ///
    /// # Arguments
    /// * `default_locale` - Locale consulted after every requested locale's own chain
    pub fn new(default_locale: Locale) -> Self {
        Self {
            default_locale,
            entries: HashMap::new(),
        }
    }

    /// The last-resort locale for lookups.
    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Insert a single translation, replacing any previous value.
    pub fn insert(&mut self, locale: &Locale, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .entry(locale.code().to_string())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Merge a parsed catalog document.
    ///
    /// Top-level keys are parsed as locales and canonicalized, so entries under
    /// `"pt-br"` and `"pt_BR"` land in the same table.
    ///
    /// # Arguments
    /// * `document` - JSON object keyed by locale code
    ///
    /// # Returns
    /// The number of keys added or replaced, or an error for a non-object
    /// document or an invalid locale key
    pub fn merge_json(&mut self, document: &Json) -> Result<usize> {
        let Json::Object(locales) = document else {
            bail!("Catalog document must be an object keyed by locale");
        };

        let mut count = 0;
        for (code, tree) in locales {
            let locale = Locale::parse(code)
                .with_context(|| format!("Invalid locale key '{}' in catalog", code))?;
            let mut flat = Vec::new();
            flatten(String::new(), tree, &mut flat);
            for (key, value) in flat {
                self.insert(&locale, key, value);
                count += 1;
            }
        }
        Ok(count)
    }

    /// Load and merge one JSON catalog file.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let document: Json = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog file {}", path.display()))?;
        let count = self.merge_json(&document)?;
        debug!("Loaded {} translations from {}", count, path.display());
        Ok(count)
    }

    /// Load every `*.json` file in a directory, in file-name order.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let mut paths: Vec<_> = fs::read_dir(dir)
            .with_context(|| format!("Failed to read catalog directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut total = 0;
        for path in paths {
            total += self.load_file(&path)?;
        }
        Ok(total)
    }

    /// Load a file or a directory of files, depending on what `path` is.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        if path.is_dir() {
            self.load_dir(path)
        } else {
            self.load_file(path)
        }
    }

    /// Locale codes with at least one entry, sorted.
    pub fn locales(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Whether `key` is stored directly under `locale` (no fallback).
    pub fn has_key(&self, locale: &Locale, key: &str) -> bool {
        self.raw(locale.code(), key).is_some()
    }

    /// Entries stored directly under `locale` (no fallback), sorted by key.
    pub fn entries_for(&self, locale: &Locale) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .entries
            .get(locale.code())
            .map(|table| {
                table
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect()
            })
            .unwrap_or_default();
        entries.sort_unstable();
        entries
    }

    fn raw(&self, code: &str, key: &str) -> Option<&str> {
        self.entries
            .get(code)
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }

    /// A read-only view that resolves keys for `locale`.
    ///
    /// The view tries `locale`'s fallback chain, then the default locale's.
    pub fn localized(&self, locale: &Locale) -> LocalizedCatalog<'_> {
        let mut chain = locale.fallback_chain();
        for code in self.default_locale.fallback_chain() {
            if !chain.contains(&code) {
                chain.push(code);
            }
        }
        LocalizedCatalog {
            catalog: self,
            chain,
        }
    }
}

fn flatten(prefix: String, node: &Json, out: &mut Vec<(String, String)>) {
    match node {
        Json::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(path, child, out);
            }
        }
        Json::String(s) => out.push((prefix, s.clone())),
        Json::Number(n) => out.push((prefix, n.to_string())),
        Json::Bool(b) => out.push((prefix, b.to_string())),
        Json::Null | Json::Array(_) => debug!("Skipping non-scalar catalog entry at '{}'", prefix),
    }
}

/// Catalog view for one locale and its fallback chain.
///
/// For every locale in the chain the primary key and all fallback keys are
/// tried in order before moving to the next locale, so a less specific key in
/// the requested locale wins over a more specific key in a fallback locale.
#[derive(Debug, Clone)]
pub struct LocalizedCatalog<'a> {
    catalog: &'a Catalog,
    chain: Vec<String>,
}

impl LocalizedCatalog<'_> {
    /// Locale codes consulted, in order.
    pub fn chain(&self) -> &[String] {
        &self.chain
    }
}

impl Translator for LocalizedCatalog<'_> {
    fn translate(&self, primary: &str, args: &BoundArgs, fallbacks: &[String]) -> Option<String> {
        for code in &self.chain {
            let keys = std::iter::once(primary).chain(fallbacks.iter().map(String::as_str));
            for key in keys {
                match self.catalog.raw(code, key) {
                    Some(value) if !value.trim().is_empty() => {
                        debug!("Catalog hit for '{}' in locale {}", key, code);
                        return Some(interpolate(value, args));
                    }
                    _ => continue,
                }
            }
        }
        None
    }
}
