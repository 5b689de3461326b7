//! Validation rules and localized message resolution.
//!
//! - `value`: Dynamic attribute and argument values
//! - `binder`: Positional-to-named argument binding
//! - `rules`: Rule specs, message templates and the rule table
//! - `resolver`: Candidate key chain and message resolution
//! - `errors`: Error collection and full messages
//! - `validator`: Rule checks over records

mod binder;
mod defaults;
mod errors;
mod resolver;
mod rules;
mod validator;
mod value;

pub use binder::BoundArgs;
pub use errors::{human_attribute_name, Errors};
pub use resolver::{key_chain, MessageResolver, ResolutionContext};
pub use rules::{
    Directive, DirectiveFn, Evaluation, MessageTemplate, RuleTable, SuffixSelector, TemplateFn,
    ValidationRuleSpec,
};
pub use validator::{Checks, Operator, Record, UniquenessLookup, ValidationOptions, Validator};
pub use value::Value;
