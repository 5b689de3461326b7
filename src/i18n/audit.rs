//! Startup audit of a rule table against a catalog.
//!
//! Resolution itself never fails, so configuration problems are reported
//! here instead:
//! - a rule with no default template and no `errors.messages.{rule}` entry
//!   can resolve to an empty message (error). Rules with a suffix selector
//!   are also checked under `errors.messages.{rule}.{suffix}` for the
//!   suffixes their selector picks when arguments are absent or nil.
//! - a catalog message using a `%{name}` placeholder the rule does not
//!   declare will interpolate as empty text (warning)

use crate::error::ConfigError;
use crate::i18n::{placeholders, Catalog, Locale, Translator};
use crate::validation::{RuleTable, ValidationRuleSpec, Value};
use std::collections::BTreeSet;
use tracing::warn;

/// Audit findings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuditReport {
    /// Rules that may resolve to an empty message
    pub errors: Vec<String>,

    /// Non-critical catalog issues
    pub warnings: Vec<String>,
}

impl AuditReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

/// Check every rule in `table` for a reachable default message.
///
/// # Arguments
/// * `table` - Rules to check
/// * `translator` - Catalog view the rules resolve against
///
/// # Returns
/// A report whose `errors` name each rule (as `rule` or `rule.suffix`) that
/// has no default template and no global catalog entry
pub fn audit_defaults<T: Translator + ?Sized>(table: &RuleTable, translator: &T) -> AuditReport {
    let mut report = AuditReport::new();
    for spec in table.rules() {
        if spec.has_default() {
            continue;
        }
        for suffix in probe_suffixes(spec) {
            let path = match &suffix {
                Some(suffix) => format!("{}.{}", spec.rule(), suffix),
                None => spec.rule().to_string(),
            };
            let key = format!("errors.messages.{}", path);
            let fallbacks = vec![format!("errors.sequel.{}", path)];
            if translator
                .translate(&key, &Default::default(), &fallbacks)
                .is_none()
            {
                report.errors.push(path);
            }
        }
    }
    report
}

/// Suffixes a rule's selector picks for absent arguments and for each
/// leading run of nil arguments. Selectors keyed on other values are not
/// enumerated.
fn probe_suffixes(spec: &ValidationRuleSpec) -> BTreeSet<Option<String>> {
    let mut suffixes = BTreeSet::new();
    suffixes.insert(spec.evaluate(&[]).suffix);
    for len in 1..=spec.params().len() {
        suffixes.insert(spec.evaluate(&vec![Value::Nil; len]).suffix);
    }
    suffixes
}

/// Full audit for one locale: reachable defaults plus placeholder checks on
/// every catalog entry under an `errors.` path whose rule is known.
pub fn audit(table: &RuleTable, catalog: &Catalog, locale: &Locale) -> AuditReport {
    let view = catalog.localized(locale);
    let mut report = audit_defaults(table, &view);

    for (key, value) in catalog.entries_for(locale) {
        let Some(spec) = rule_for_key(table, key) else {
            continue;
        };
        for name in placeholders(value) {
            if !spec.params().iter().any(|p| *p == name) {
                report.warnings.push(format!(
                    "'{}' uses %{{{}}} but rule '{}' declares {:?}",
                    key,
                    name,
                    spec.rule(),
                    spec.params()
                ));
            }
        }
    }
    report.warnings.sort();
    report
}

/// The rule an `errors` catalog key belongs to: the last path segment that
/// names a rule in the table. `errors` must be a whole segment, and the
/// segment right after it is a category (`messages`, `models`, ...), so
/// `errors.format` maps to nothing.
fn rule_for_key<'t>(table: &'t RuleTable, key: &str) -> Option<&'t ValidationRuleSpec> {
    let segments: Vec<&str> = key.split('.').collect();
    let errors_at = segments.iter().position(|segment| *segment == "errors")?;
    segments
        .get(errors_at + 2..)?
        .iter()
        .rev()
        .find_map(|segment| table.get(segment))
}

impl RuleTable {
    /// Fail if any rule could resolve to an empty message through `translator`.
    pub fn ensure_resolvable<T: Translator + ?Sized>(&self, translator: &T) -> Result<(), ConfigError> {
        let report = audit_defaults(self, translator);
        if report.has_errors() {
            warn!("Rules without a reachable default: {:?}", report.errors);
            return Err(ConfigError::MissingDefault {
                rules: report.errors,
            });
        }
        Ok(())
    }
}
