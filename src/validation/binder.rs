//! Positional-to-named argument binding.
//!
//! Rule arguments arrive as an ordered list, while default templates and
//! catalog strings refer to them by name (`%{max}`). Binding never fails on
//! an arity mismatch: declared parameters without a supplied argument bind to
//! an absent value, and surplus arguments are kept under `arg{index}` names.

use crate::validation::Value;

/// Arguments bound to parameter names, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArgs {
    entries: Vec<(String, Option<Value>)>,
}

impl BoundArgs {
    /// Bind `args` positionally to `params`.
    pub fn bind<S: AsRef<str>>(params: &[S], args: &[Value]) -> Self {
        let mut entries: Vec<(String, Option<Value>)> = params
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_ref().to_string(), args.get(i).cloned()))
            .collect();

        for (i, extra) in args.iter().enumerate().skip(params.len()) {
            entries.push((format!("arg{}", i), Some(extra.clone())));
        }

        Self { entries }
    }

    /// Value bound to `name`. `None` covers both unknown names and absent arguments.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Whether `name` is a declared parameter (bound or absent).
    pub fn declares(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Text for interpolation; absent and unknown names render empty.
    pub fn text(&self, name: &str) -> String {
        self.get(name).map(|v| v.to_string()).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_ref()))
    }

    /// Supplied arguments in positional order, stopping at the first absent one.
    pub fn positional(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map_while(|(_, v)| v.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
