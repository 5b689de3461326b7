//! Rule specs and the rule table: the single source of truth for each
//! validation rule's parameters, default message and key suffix behavior.
//!
//! A table is built once at startup, optionally customized, and then passed
//! to a [`MessageResolver`](crate::validation::MessageResolver). A process-wide
//! table can be installed once with [`RuleTable::install`].

use crate::error::ConfigError;
use crate::i18n::interpolate;
use crate::validation::defaults::default_rules;
use crate::validation::{BoundArgs, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::debug;

pub type TemplateFn = Arc<dyn Fn(&BoundArgs) -> String + Send + Sync>;
pub type DirectiveFn = Arc<dyn Fn(&BoundArgs) -> Directive + Send + Sync>;
pub type SuffixSelector = Arc<dyn Fn(&BoundArgs) -> Option<String> + Send + Sync>;

/// Default message plus an optional key suffix, chosen from the arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub default: String,
    pub suffix: Option<String>,
}

/// The shape of a rule's default message.
///
/// Only `Fixed` text goes through `%{name}` interpolation. Computed messages
/// are final, so argument text containing `%{` survives unchanged.
#[derive(Clone)]
pub enum MessageTemplate {
    /// Interpolated with the bound arguments.
    Fixed(String),
    /// Computed from the bound arguments.
    Parameterized(TemplateFn),
    /// Computed default that also selects a key suffix for the catalog lookup.
    CatalogDirective(DirectiveFn),
}

impl MessageTemplate {
    pub fn fixed(text: impl Into<String>) -> Self {
        MessageTemplate::Fixed(text.into())
    }

    pub fn parameterized<F>(f: F) -> Self
    where
        F: Fn(&BoundArgs) -> String + Send + Sync + 'static,
    {
        MessageTemplate::Parameterized(Arc::new(f))
    }

    pub fn directive<F>(f: F) -> Self
    where
        F: Fn(&BoundArgs) -> Directive + Send + Sync + 'static,
    {
        MessageTemplate::CatalogDirective(Arc::new(f))
    }

    /// Evaluate against bound arguments, producing the final default message
    /// and any key suffix.
    pub fn render(&self, args: &BoundArgs) -> Directive {
        match self {
            MessageTemplate::Fixed(text) => Directive {
                default: interpolate(text, args),
                suffix: None,
            },
            MessageTemplate::Parameterized(f) => Directive {
                default: f(args),
                suffix: None,
            },
            MessageTemplate::CatalogDirective(f) => f(args),
        }
    }
}

impl fmt::Debug for MessageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageTemplate::Fixed(text) => f.debug_tuple("Fixed").field(text).finish(),
            MessageTemplate::Parameterized(_) => f.write_str("Parameterized(..)"),
            MessageTemplate::CatalogDirective(_) => f.write_str("CatalogDirective(..)"),
        }
    }
}

/// Result of evaluating a rule spec for one set of arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub args: BoundArgs,
    pub default: Option<String>,
    pub suffix: Option<String>,
}

/// Static description of one validation rule.
#[derive(Clone)]
pub struct ValidationRuleSpec {
    rule: String,
    params: Vec<String>,
    template: Option<MessageTemplate>,
    suffix_selector: Option<SuffixSelector>,
}

impl ValidationRuleSpec {
    pub fn new(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            params: Vec::new(),
            template: None,
            suffix_selector: None,
        }
    }

    pub fn with_params(mut self, params: &[&str]) -> Self {
        self.params = params.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_template(mut self, template: MessageTemplate) -> Self {
        self.template = Some(template);
        self
    }

    pub fn with_default(self, text: impl Into<String>) -> Self {
        self.with_template(MessageTemplate::fixed(text))
    }

    pub fn with_suffix_selector<F>(mut self, f: F) -> Self
    where
        F: Fn(&BoundArgs) -> Option<String> + Send + Sync + 'static,
    {
        self.suffix_selector = Some(Arc::new(f));
        self
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn template(&self) -> Option<&MessageTemplate> {
        self.template.as_ref()
    }

    pub fn has_default(&self) -> bool {
        self.template.is_some()
    }

    /// Bind arguments and evaluate the default message and key suffix.
    ///
    /// A directive's suffix takes precedence over the suffix selector. Empty
    /// suffixes are dropped.
    pub fn evaluate(&self, args: &[Value]) -> Evaluation {
        let bound = BoundArgs::bind(&self.params, args);
        let directive = self.template.as_ref().map(|t| t.render(&bound));

        let (default, directive_suffix) = match directive {
            Some(Directive { default, suffix }) => (Some(default), suffix),
            None => (None, None),
        };
        let suffix = directive_suffix
            .or_else(|| self.suffix_selector.as_ref().and_then(|select| select(&bound)))
            .filter(|s| !s.is_empty());

        Evaluation {
            args: bound,
            default,
            suffix,
        }
    }
}

impl fmt::Debug for ValidationRuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRuleSpec")
            .field("rule", &self.rule)
            .field("params", &self.params)
            .field("template", &self.template)
            .field("suffix_selector", &self.suffix_selector.is_some())
            .finish()
    }
}

/// Registry of rule specs keyed by rule name.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: BTreeMap<String, ValidationRuleSpec>,
}

/// Process-wide table (installed once, or defaults on first access)
static GLOBAL_TABLE: OnceLock<RuleTable> = OnceLock::new();

impl RuleTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding the built-in rules.
    pub fn defaults() -> Self {
        let mut table = Self::new();
        for spec in default_rules() {
            table.insert(spec);
        }
        table
    }

    /// Install `table` as the process-wide table.
    ///
    /// Must happen at startup, before the first call to [`RuleTable::global`].
    pub fn install(table: RuleTable) -> Result<(), ConfigError> {
        GLOBAL_TABLE
            .set(table)
            .map_err(|_| ConfigError::AlreadyInstalled)
    }

    /// The process-wide table, falling back to the defaults if none was installed.
    pub fn global() -> &'static RuleTable {
        GLOBAL_TABLE.get_or_init(RuleTable::defaults)
    }

    /// Add or replace a rule spec.
    pub fn insert(&mut self, spec: ValidationRuleSpec) {
        self.rules.insert(spec.rule.clone(), spec);
    }

    pub fn get(&self, rule: &str) -> Option<&ValidationRuleSpec> {
        self.rules.get(rule)
    }

    /// Replace the default message of `rule`, keeping its parameters and
    /// suffix selector. Unknown rules are added without parameters.
    pub fn override_template(&mut self, rule: &str, template: MessageTemplate) {
        debug!("Overriding default message for rule '{}'", rule);
        self.rules
            .entry(rule.to_string())
            .or_insert_with(|| ValidationRuleSpec::new(rule))
            .template = Some(template);
    }

    /// All specs, ordered by rule name.
    pub fn rules(&self) -> impl Iterator<Item = &ValidationRuleSpec> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
