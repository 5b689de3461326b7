//! Message resolution: candidate key chain, catalog lookup, default fallback.
//!
//! For a failed rule the resolver builds the candidate keys from most to least
//! specific:
//!
//! 1. `{scope}.errors.models.{model}.attributes.{attribute}.{rule}.{a1}.{a2}...`
//!    for each prefix of the key-segment arguments, longest first
//! 2. `{scope}.errors.models.{model}.attributes.{attribute}.{rule}`
//! 3. `{scope}.errors.models.{model}.{rule}`
//! 4. `{scope}.errors.messages.{rule}`
//! 5. `errors.attributes.{attribute}.{rule}`
//! 6. `errors.messages.{rule}`
//! 7. `errors.sequel.{rule}`
//!
//! When the rule selects a suffix for its arguments, every key gets `.{suffix}`.
//! The whole chain goes to the translator in one call; if nothing non-blank
//! comes back, the rule's default message is rendered instead. Resolution never
//! fails: with no catalog match and no default the message is empty.

use crate::i18n::{ResolutionMetrics, Translator};
use crate::validation::{RuleTable, ValidationRuleSpec, Value};
use tracing::debug;

/// Everything needed to resolve one message.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionContext {
    /// Translation namespace of the application or model family
    pub scope: String,

    /// Key of the model being validated
    pub model: String,

    /// Attribute under validation
    pub attribute: String,

    /// Rule that failed
    pub rule: String,

    /// Rule arguments, in positional order
    pub args: Vec<Value>,
}

impl ResolutionContext {
    /// Create a context with no rule arguments.
    ///
    /// # Arguments
    /// * `scope` - Translation namespace; empty to build keys without a scope prefix
    /// * `model` - Model key (e.g. "post")
    /// * `attribute` - Attribute that failed (e.g. "title")
    /// * `rule` - Rule identifier (e.g. "max_length")
    pub fn new(
        scope: impl Into<String>,
        model: impl Into<String>,
        attribute: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            scope: scope.into(),
            model: model.into(),
            attribute: attribute.into(),
            rule: rule.into(),
            args: Vec::new(),
        }
    }

    /// Set the rule arguments, in the order the rule declares its parameters.
    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    fn scoped(&self, path: String) -> String {
        if self.scope.is_empty() {
            path
        } else {
            format!("{}.{}", self.scope, path)
        }
    }
}

/// Build the ordered candidate keys for `ctx`, most specific first.
///
/// # Arguments
/// * `ctx` - The failed rule and where it failed
/// * `suffix` - Appended to every key when present and non-empty
///
/// # Returns
/// Argument keys (longest first), then the six fixed keys
pub fn key_chain(ctx: &ResolutionContext, suffix: Option<&str>) -> Vec<String> {
    let exact = ctx.scoped(format!(
        "errors.models.{}.attributes.{}.{}",
        ctx.model, ctx.attribute, ctx.rule
    ));

    let mut arg_keys = Vec::new();
    let mut accumulated = exact.clone();
    for arg in ctx.args.iter().take_while(|a| a.is_key_segment()) {
        accumulated = format!("{}.{}", accumulated, arg);
        arg_keys.push(accumulated.clone());
    }
    arg_keys.reverse();

    let mut keys = arg_keys;
    keys.push(exact);
    keys.push(ctx.scoped(format!("errors.models.{}.{}", ctx.model, ctx.rule)));
    keys.push(ctx.scoped(format!("errors.messages.{}", ctx.rule)));
    keys.push(format!("errors.attributes.{}.{}", ctx.attribute, ctx.rule));
    keys.push(format!("errors.messages.{}", ctx.rule));
    keys.push(format!("errors.sequel.{}", ctx.rule));

    match suffix {
        Some(suffix) if !suffix.is_empty() => keys
            .into_iter()
            .map(|key| format!("{}.{}", key, suffix))
            .collect(),
        _ => keys,
    }
}

/// Resolves validation messages against a translator and a rule table.
pub struct MessageResolver<'a, T: Translator + ?Sized> {
    translator: &'a T,
    rules: &'a RuleTable,
    metrics: &'a ResolutionMetrics,
}

impl<'a, T: Translator + ?Sized> MessageResolver<'a, T> {
    /// Create a resolver recording into the process-wide metrics.
    ///
    /// # Arguments
    /// * `translator` - Catalog view used for every lookup
    /// * `rules` - Rule specs consulted by [`MessageResolver::resolve_rule`]
    pub fn new(translator: &'a T, rules: &'a RuleTable) -> Self {
        Self {
            translator,
            rules,
            metrics: ResolutionMetrics::global(),
        }
    }

    /// Record outcomes into `metrics` instead of the process-wide counters.
    pub fn with_metrics(mut self, metrics: &'a ResolutionMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// The translator lookups go through.
    pub fn translator(&self) -> &'a T {
        self.translator
    }

    /// The rule table used by `resolve_rule`.
    pub fn rules(&self) -> &'a RuleTable {
        self.rules
    }

    /// Resolve using the spec registered for `ctx.rule`.
    ///
    /// Rules missing from the table resolve through the unsuffixed chain with
    /// no default.
    pub fn resolve_rule(&self, ctx: &ResolutionContext) -> String {
        match self.rules.get(&ctx.rule) {
            Some(spec) => self.resolve(ctx, spec),
            None => self.resolve(ctx, &ValidationRuleSpec::new(ctx.rule.as_str())),
        }
    }

    /// Resolve the message for `ctx` using `spec`'s parameters, suffix and default.
    ///
    /// # Returns
    /// The first non-blank catalog entry along the key chain, otherwise the
    /// spec's default message, otherwise an empty string
    pub fn resolve(&self, ctx: &ResolutionContext, spec: &ValidationRuleSpec) -> String {
        let eval = spec.evaluate(&ctx.args);
        let keys = key_chain(ctx, eval.suffix.as_deref());

        let found = match keys.split_first() {
            Some((primary, fallbacks)) => self.translator.translate(primary, &eval.args, fallbacks),
            None => None,
        };

        if let Some(message) = found.filter(|m| !m.trim().is_empty()) {
            debug!(
                rule = %ctx.rule,
                attribute = %ctx.attribute,
                "Resolved validation message from catalog"
            );
            self.metrics.record_catalog_hit();
            return message;
        }

        match eval.default {
            Some(message) => {
                debug!(
                    rule = %ctx.rule,
                    attribute = %ctx.attribute,
                    "No catalog entry, using default message"
                );
                self.metrics.record_default_fallback();
                message
            }
            None => {
                debug!(
                    rule = %ctx.rule,
                    attribute = %ctx.attribute,
                    "No catalog entry and no default message"
                );
                self.metrics.record_empty_result();
                String::new()
            }
        }
    }
}
