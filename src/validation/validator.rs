//! Validation rules over records, with localized failure messages.
//!
//! ```rust,ignore
//! let resolver = MessageResolver::new(&catalog.localized(&locale), &rules);
//! let validator = Validator::new(resolver, "blog");
//!
//! let errors = validator
//!     .check(&post)
//!     .presence(&["title", "body"], &ValidationOptions::new())
//!     .max_length(100, &["title"], &ValidationOptions::new().allow_nil())
//!     .into_errors();
//! ```

use crate::i18n::Translator;
use crate::validation::{Errors, MessageResolver, ResolutionContext, Value};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::ops::RangeInclusive;
use tracing::debug;

/// Read access to the record under validation.
pub trait Record {
    /// Key of the model in catalog paths (e.g. "post").
    fn model_key(&self) -> &str;

    /// Current value of `attribute`; `None` when the record has no such attribute.
    fn get(&self, attribute: &str) -> Option<Value>;
}

/// Existence check backing uniqueness validation.
pub trait UniquenessLookup {
    /// Whether another record of `model` already has these column values.
    fn exists(&self, model: &str, columns: &[(&str, &Value)]) -> bool;
}

/// Per-call options shared by all rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Skip nil values
    pub allow_nil: bool,

    /// Skip blank values (nil, empty strings, empty lists, `false`)
    pub allow_blank: bool,

    /// Skip attributes the record does not have
    pub allow_missing: bool,

    /// Message used verbatim instead of resolving one
    pub message: Option<String>,
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_nil(mut self) -> Self {
        self.allow_nil = true;
        self
    }

    pub fn allow_blank(mut self) -> Self {
        self.allow_blank = true;
        self
    }

    pub fn allow_missing(mut self) -> Self {
        self.allow_missing = true;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Comparison used by the `operator` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Eq => "==",
            Operator::Ne => "!=",
        }
    }

    fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Ge => ordering != Ordering::Less,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Le => ordering != Ordering::Greater,
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

fn compare(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => lhs.as_f64()?.partial_cmp(&rhs.as_f64()?),
    }
}

/// Runs rules against records and resolves messages for failures.
pub struct Validator<'a, T: Translator + ?Sized> {
    resolver: MessageResolver<'a, T>,
    scope: String,
}

impl<'a, T: Translator + ?Sized> Validator<'a, T> {
    pub fn new(resolver: MessageResolver<'a, T>, scope: impl Into<String>) -> Self {
        Self {
            resolver,
            scope: scope.into(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn resolver(&self) -> &MessageResolver<'a, T> {
        &self.resolver
    }

    /// Start validating `record`.
    pub fn check<'v>(&'v self, record: &'v dyn Record) -> Checks<'v, 'a, T> {
        Checks {
            validator: self,
            record,
            errors: Errors::new(),
        }
    }

    /// Full messages for errors collected on a record of `model`.
    pub fn full_messages(&self, errors: &Errors, model: &str) -> Vec<String> {
        errors.full_messages(self.resolver.translator(), &self.scope, model)
    }
}

/// One validation pass over one record.
pub struct Checks<'v, 'a, T: Translator + ?Sized> {
    validator: &'v Validator<'a, T>,
    record: &'v dyn Record,
    errors: Errors,
}

impl<T: Translator + ?Sized> Checks<'_, '_, T> {
    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    pub fn into_errors(self) -> Errors {
        self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Attribute is present: not nil, not an empty or whitespace-only string,
    /// not an empty list. `false` counts as present.
    pub fn presence(&mut self, attributes: &[&str], opts: &ValidationOptions) -> &mut Self {
        self.each(attributes, opts, "presence", |v| {
            (v.is_blank() && !matches!(v, Value::Bool(false))).then(Vec::new)
        })
    }

    pub fn not_null(&mut self, attributes: &[&str], opts: &ValidationOptions) -> &mut Self {
        self.each(attributes, opts, "not_null", |v| v.is_nil().then(Vec::new))
    }

    pub fn exact_length(
        &mut self,
        exact: usize,
        attributes: &[&str],
        opts: &ValidationOptions,
    ) -> &mut Self {
        self.each(attributes, opts, "exact_length", |v| {
            (v.length() != Some(exact)).then(|| vec![Value::from(exact)])
        })
    }

    pub fn min_length(
        &mut self,
        min: usize,
        attributes: &[&str],
        opts: &ValidationOptions,
    ) -> &mut Self {
        self.each(attributes, opts, "min_length", |v| {
            v.length()
                .map_or(true, |len| len < min)
                .then(|| vec![Value::from(min)])
        })
    }

    /// A nil value fails with the rule's `nil` variant unless `allow_nil` is set.
    pub fn max_length(
        &mut self,
        max: usize,
        attributes: &[&str],
        opts: &ValidationOptions,
    ) -> &mut Self {
        self.each(attributes, opts, "max_length", |v| {
            if v.is_nil() {
                return Some(vec![Value::from(max), Value::Nil]);
            }
            v.length()
                .map_or(true, |len| len > max)
                .then(|| vec![Value::from(max)])
        })
    }

    pub fn length_range(
        &mut self,
        range: RangeInclusive<usize>,
        attributes: &[&str],
        opts: &ValidationOptions,
    ) -> &mut Self {
        let rendered = Value::from(format!("{}..{}", range.start(), range.end()));
        self.each(attributes, opts, "length_range", |v| {
            v.length()
                .map_or(true, |len| !range.contains(&len))
                .then(|| vec![rendered.clone()])
        })
    }

    /// String value matching `pattern`. Non-string values fail.
    pub fn format(&mut self, pattern: &Regex, attributes: &[&str], opts: &ValidationOptions) -> &mut Self {
        self.each(attributes, opts, "format", |v| {
            let matched = matches!(v, Value::Str(s) if pattern.is_match(s));
            (!matched).then(|| vec![Value::from(pattern.as_str())])
        })
    }

    pub fn includes(&mut self, set: &[Value], attributes: &[&str], opts: &ValidationOptions) -> &mut Self {
        self.each(attributes, opts, "includes", |v| {
            (!set.contains(v)).then(|| vec![Value::List(set.to_vec())])
        })
    }

    /// Integers, or strings that parse as integers.
    pub fn integer(&mut self, attributes: &[&str], opts: &ValidationOptions) -> &mut Self {
        self.each(attributes, opts, "integer", |v| {
            let ok = match v {
                Value::Int(_) => true,
                Value::Str(s) => s.trim().parse::<i64>().is_ok(),
                _ => false,
            };
            (!ok).then(Vec::new)
        })
    }

    /// Integers, floats, or strings that parse as numbers.
    pub fn numeric(&mut self, attributes: &[&str], opts: &ValidationOptions) -> &mut Self {
        self.each(attributes, opts, "numeric", |v| {
            v.as_f64().is_none().then(Vec::new)
        })
    }

    pub fn min_value(&mut self, min: Value, attributes: &[&str], opts: &ValidationOptions) -> &mut Self {
        self.each(attributes, opts, "min_value", |v| {
            compare(v, &min)
                .map_or(true, |ord| ord == Ordering::Less)
                .then(|| vec![min.clone()])
        })
    }

    pub fn max_value(&mut self, max: Value, attributes: &[&str], opts: &ValidationOptions) -> &mut Self {
        self.each(attributes, opts, "max_value", |v| {
            compare(v, &max)
                .map_or(true, |ord| ord == Ordering::Greater)
                .then(|| vec![max.clone()])
        })
    }

    /// `value <op> rhs` must hold. Values that cannot be compared fail.
    pub fn operator(
        &mut self,
        op: Operator,
        rhs: Value,
        attributes: &[&str],
        opts: &ValidationOptions,
    ) -> &mut Self {
        self.each(attributes, opts, "operator", |v| {
            compare(v, &rhs)
                .map_or(true, |ord| !op.holds(ord))
                .then(|| vec![Value::from(op.symbol()), rhs.clone()])
        })
    }

    /// Value kind must be one of `types` (see [`Value::kind`]); `"number"`
    /// accepts integers and floats. Nil values are skipped.
    pub fn type_of(&mut self, types: &[&str], attributes: &[&str], opts: &ValidationOptions) -> &mut Self {
        let expected = match types {
            [single] => Value::from(*single),
            many => Value::from(many.to_vec()),
        };
        self.each(attributes, opts, "type", |v| {
            if v.is_nil() {
                return None;
            }
            let kind = v.kind();
            let ok = types
                .iter()
                .any(|t| *t == kind || (*t == "number" && matches!(v, Value::Int(_) | Value::Float(_))));
            (!ok).then(|| vec![expected.clone()])
        })
    }

    pub fn no_null_byte(&mut self, attributes: &[&str], opts: &ValidationOptions) -> &mut Self {
        self.each(attributes, opts, "no_null_byte", |v| {
            matches!(v, Value::Str(s) if s.contains('\0')).then(Vec::new)
        })
    }

    /// The combination of `columns` must not exist on another record.
    ///
    /// Skipped when any column is nil. Several columns report a single error
    /// attached to the whole column group.
    pub fn unique(
        &mut self,
        columns: &[&str],
        lookup: &dyn UniquenessLookup,
        opts: &ValidationOptions,
    ) -> &mut Self {
        let values: Vec<Value> = columns
            .iter()
            .map(|c| self.record.get(c).unwrap_or(Value::Nil))
            .collect();
        if columns.is_empty() || values.iter().any(Value::is_nil) {
            return self;
        }

        let pairs: Vec<(&str, &Value)> = columns.iter().copied().zip(values.iter()).collect();
        if lookup.exists(self.record.model_key(), &pairs) {
            let args = vec![Value::from(columns.to_vec())];
            self.attach(columns, "unique", args, opts);
        }
        self
    }

    fn each<F>(&mut self, attributes: &[&str], opts: &ValidationOptions, rule: &str, mut failed: F) -> &mut Self
    where
        F: FnMut(&Value) -> Option<Vec<Value>>,
    {
        for attribute in attributes {
            let value = match self.record.get(attribute) {
                Some(value) => value,
                None if opts.allow_missing => continue,
                None => Value::Nil,
            };
            if (opts.allow_nil && value.is_nil()) || (opts.allow_blank && value.is_blank()) {
                continue;
            }
            if let Some(args) = failed(&value) {
                self.attach(&[*attribute], rule, args, opts);
            }
        }
        self
    }

    fn attach(&mut self, attributes: &[&str], rule: &str, args: Vec<Value>, opts: &ValidationOptions) {
        let message = match &opts.message {
            Some(custom) => custom.clone(),
            None => {
                let ctx = ResolutionContext::new(
                    self.validator.scope.as_str(),
                    self.record.model_key(),
                    attributes.join("_and_"),
                    rule,
                )
                .with_args(args);
                self.validator.resolver.resolve_rule(&ctx)
            }
        };

        if message.is_empty() {
            debug!("Empty message for rule '{}', no error attached", rule);
            return;
        }
        self.errors.add_to(attributes, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Catalog, Locale, ResolutionMetrics};
    use crate::validation::RuleTable;
    use std::collections::HashMap;

    struct Post {
        values: HashMap<&'static str, Value>,
    }

    impl Post {
        fn new(values: Vec<(&'static str, Value)>) -> Self {
            Self {
                values: values.into_iter().collect(),
            }
        }
    }

    impl Record for Post {
        fn model_key(&self) -> &str {
            "post"
        }

        fn get(&self, attribute: &str) -> Option<Value> {
            self.values.get(attribute).cloned()
        }
    }

    struct Taken(Vec<&'static str>);

    impl UniquenessLookup for Taken {
        fn exists(&self, _model: &str, columns: &[(&str, &Value)]) -> bool {
            columns
                .iter()
                .all(|(_, v)| self.0.iter().any(|t| Value::from(*t) == **v))
        }
    }

    fn en() -> Locale {
        Locale::parse("en").unwrap()
    }

    fn run<F>(catalog: &Catalog, post: &Post, f: F) -> Errors
    where
        F: FnOnce(&mut Checks<'_, '_, crate::i18n::LocalizedCatalog<'_>>),
    {
        let rules = RuleTable::defaults();
        let metrics = ResolutionMetrics::new();
        let view = catalog.localized(&en());
        let resolver = MessageResolver::new(&view, &rules).with_metrics(&metrics);
        let validator = Validator::new(resolver, "blog");
        let mut checks = validator.check(post);
        f(&mut checks);
        checks.into_errors()
    }

    fn opts() -> ValidationOptions {
        ValidationOptions::new()
    }

    // ==================== Presence Tests ====================

    #[test]
    fn test_presence() {
        let catalog = Catalog::new(en());
        let post = Post::new(vec![
            ("title", Value::from("  ")),
            ("body", Value::from("text")),
            ("draft", Value::from(false)),
        ]);
        let errors = run(&catalog, &post, |c| {
            c.presence(&["title", "body", "draft", "author"], &opts());
        });

        assert_eq!(errors.on("title"), vec!["is not present"]);
        assert!(errors.on("body").is_empty());
        assert!(errors.on("draft").is_empty());
        assert_eq!(errors.on("author"), vec!["is not present"]);
    }

    #[test]
    fn test_allow_missing_skips_absent_attributes() {
        let catalog = Catalog::new(en());
        let post = Post::new(vec![]);
        let errors = run(&catalog, &post, |c| {
            c.presence(&["title"], &opts().allow_missing());
        });
        assert!(errors.is_empty());
    }

    #[test]
    fn test_custom_message_bypasses_resolution() {
        let catalog = Catalog::new(en());
        let post = Post::new(vec![("title", Value::Nil)]);
        let errors = run(&catalog, &post, |c| {
            c.presence(&["title"], &opts().message("needs a title"));
        });
        assert_eq!(errors.on("title"), vec!["needs a title"]);
    }

    // ==================== Length Tests ====================

    #[test]
    fn test_max_length_uses_catalog_then_default() {
        let mut catalog = Catalog::new(en());
        catalog.insert(&en(), "blog.errors.models.post.attributes.title.max_length", "too long!");
        let post = Post::new(vec![
            ("title", Value::from("a very long title")),
            ("summary", Value::from("also far too long")),
        ]);
        let errors = run(&catalog, &post, |c| {
            c.max_length(10, &["title", "summary"], &opts());
        });

        assert_eq!(errors.on("title"), vec!["too long!"]);
        assert_eq!(errors.on("summary"), vec!["is longer than 10 characters"]);
    }

    #[test]
    fn test_max_length_nil_reports_not_present() {
        let catalog = Catalog::new(en());
        let post = Post::new(vec![("title", Value::Nil)]);
        let errors = run(&catalog, &post, |c| {
            c.max_length(10, &["title"], &opts());
        });
        assert_eq!(errors.on("title"), vec!["is not present"]);

        let errors = run(&catalog, &post, |c| {
            c.max_length(10, &["title"], &opts().allow_nil());
        });
        assert!(errors.is_empty());
    }

    #[test]
    fn test_min_exact_and_range() {
        let catalog = Catalog::new(en());
        let post = Post::new(vec![("code", Value::from("ab"))]);
        let errors = run(&catalog, &post, |c| {
            c.min_length(3, &["code"], &opts())
                .exact_length(4, &["code"], &opts())
                .length_range(3..=5, &["code"], &opts());
        });
        assert_eq!(
            errors.on("code"),
            vec![
                "is shorter than 3 characters",
                "is not 4 characters",
                "is too short or too long"
            ]
        );
    }

    // ==================== Format / Inclusion Tests ====================

    #[test]
    fn test_format() {
        let catalog = Catalog::new(en());
        let pattern = Regex::new(r"^[a-z-]+$").unwrap();
        let post = Post::new(vec![("slug", Value::from("Bad Slug")), ("other", Value::from("ok-slug"))]);
        let errors = run(&catalog, &post, |c| {
            c.format(&pattern, &["slug", "other"], &opts());
        });
        assert_eq!(errors.on("slug"), vec!["is invalid"]);
        assert!(errors.on("other").is_empty());
    }

    #[test]
    fn test_includes_renders_set() {
        let catalog = Catalog::new(en());
        let post = Post::new(vec![("status", Value::from("archived"))]);
        let set = vec![Value::from("draft"), Value::from("published")];
        let errors = run(&catalog, &post, |c| {
            c.includes(&set, &["status"], &opts());
        });
        assert_eq!(
            errors.on("status"),
            vec!["is not in range or set: draft, published"]
        );
    }

    // ==================== Numeric Tests ====================

    #[test]
    fn test_integer_and_numeric() {
        let catalog = Catalog::new(en());
        let post = Post::new(vec![
            ("a", Value::from("12")),
            ("b", Value::from("1.5")),
            ("c", Value::from("abc")),
        ]);
        let errors = run(&catalog, &post, |c| {
            c.integer(&["a", "b"], &opts()).numeric(&["b", "c"], &opts());
        });
        assert!(errors.on("a").is_empty());
        assert_eq!(errors.on("b"), vec!["is not a number"]);
        assert_eq!(errors.on("c"), vec!["is not a number"]);
    }

    #[test]
    fn test_min_and_max_value() {
        let catalog = Catalog::new(en());
        let post = Post::new(vec![("rating", Value::from(7i64))]);
        let errors = run(&catalog, &post, |c| {
            c.min_value(Value::from(1i64), &["rating"], &opts())
                .max_value(Value::from(5i64), &["rating"], &opts());
        });
        assert_eq!(
            errors.on("rating"),
            vec!["is greater than maximum allowed value"]
        );
    }

    #[test]
    fn test_operator() {
        let catalog = Catalog::new(en());
        let post = Post::new(vec![("rank", Value::from(2i64))]);
        let errors = run(&catalog, &post, |c| {
            c.operator(Operator::Gt, Value::from(3i64), &["rank"], &opts())
                .operator(Operator::Le, Value::from(3i64), &["rank"], &opts());
        });
        assert_eq!(errors.on("rank"), vec!["is not > 3"]);
    }

    // ==================== Type Tests ====================

    #[test]
    fn test_type_singular_and_multiple_suffixes() {
        let mut catalog = Catalog::new(en());
        catalog.insert(&en(), "errors.messages.type.multiple", "has the wrong type (%{type})");
        let post = Post::new(vec![("count", Value::from("three")), ("score", Value::from(true))]);
        let errors = run(&catalog, &post, |c| {
            c.type_of(&["integer"], &["count"], &opts())
                .type_of(&["integer", "float"], &["score"], &opts());
        });
        assert_eq!(errors.on("count"), vec!["is not a valid integer"]);
        assert_eq!(errors.on("score"), vec!["has the wrong type (integer, float)"]);
    }

    #[test]
    fn test_type_number_and_nil() {
        let catalog = Catalog::new(en());
        let post = Post::new(vec![("x", Value::from(1.5)), ("y", Value::Nil)]);
        let errors = run(&catalog, &post, |c| {
            c.type_of(&["number"], &["x", "y"], &opts());
        });
        assert!(errors.is_empty());
    }

    #[test]
    fn test_no_null_byte_and_not_null() {
        let catalog = Catalog::new(en());
        let post = Post::new(vec![("name", Value::from("a\0b")), ("email", Value::Nil)]);
        let errors = run(&catalog, &post, |c| {
            c.no_null_byte(&["name"], &opts()).not_null(&["email"], &opts());
        });
        assert_eq!(errors.on("name"), vec!["contains a null byte"]);
        assert_eq!(errors.on("email"), vec!["is not present"]);
    }

    // ==================== Uniqueness Tests ====================

    #[test]
    fn test_unique_single_column() {
        let catalog = Catalog::new(en());
        let post = Post::new(vec![("slug", Value::from("hello"))]);
        let errors = run(&catalog, &post, |c| {
            c.unique(&["slug"], &Taken(vec!["hello"]), &opts());
        });
        assert_eq!(errors.on("slug"), vec!["is already taken"]);
    }

    #[test]
    fn test_unique_multi_column_attaches_to_group() {
        let mut catalog = Catalog::new(en());
        catalog.insert(
            &en(),
            "blog.errors.models.post.attributes.author_and_slug.unique",
            "already used by this author",
        );
        let post = Post::new(vec![("author", Value::from("ann")), ("slug", Value::from("hello"))]);
        let errors = run(&catalog, &post, |c| {
            c.unique(&["author", "slug"], &Taken(vec!["ann", "hello"]), &opts());
        });
        assert_eq!(
            errors.on_all(&["author", "slug"]),
            vec!["already used by this author"]
        );
    }

    #[test]
    fn test_unique_skips_nil_columns() {
        let catalog = Catalog::new(en());
        let post = Post::new(vec![("slug", Value::Nil)]);
        let errors = run(&catalog, &post, |c| {
            c.unique(&["slug"], &Taken(vec![""]), &opts());
        });
        assert!(errors.is_empty());
    }

    // ==================== Empty Message Tests ====================

    #[test]
    fn test_empty_message_attaches_nothing() {
        let catalog = Catalog::new(en());
        let mut rules = RuleTable::defaults();
        rules.insert(crate::validation::ValidationRuleSpec::new("presence"));
        let metrics = ResolutionMetrics::new();
        let view = catalog.localized(&en());
        let validator = Validator::new(MessageResolver::new(&view, &rules).with_metrics(&metrics), "blog");
        let post = Post::new(vec![]);

        let mut checks = validator.check(&post);
        checks.presence(&["title"], &opts());
        assert!(checks.is_valid());
    }

    #[test]
    fn test_full_messages_through_validator() {
        let catalog = Catalog::new(en());
        let rules = RuleTable::defaults();
        let metrics = ResolutionMetrics::new();
        let view = catalog.localized(&en());
        let validator = Validator::new(MessageResolver::new(&view, &rules).with_metrics(&metrics), "blog");
        let post = Post::new(vec![]);

        let mut checks = validator.check(&post);
        checks.presence(&["title"], &opts());
        let errors = checks.into_errors();
        assert_eq!(validator.full_messages(&errors, "post"), vec!["Title is not present"]);
    }
}
