//! Argument binding contracts.
//!
//! Structural decoding (JSON body, SOAP fragment, JSON-RPC params) goes
//! through serde. The REST query layer instead uses a declared
//! [`QueryBinding`] table: each argument type lists the query parameter names
//! it accepts and how to store them. The table is built once, when a handler
//! is registered, and consulted per request.

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;

/// Stores one query parameter value into an argument field.
pub type FieldSetter<A> = fn(&mut A, String);

/// Declared mapping from query parameter name to argument field.
pub struct QueryBinding<A> {
    fields: HashMap<&'static str, FieldSetter<A>>,
}

impl<A> QueryBinding<A> {
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Declare that parameter `name` sets a field through `setter`.
    pub fn field(mut self, name: &'static str, setter: FieldSetter<A>) -> Self {
        self.fields.insert(name, setter);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    /// Apply `params` to `args`. Only the first value of a repeated name is
    /// used; names without a declared field are ignored. Returns the number
    /// of fields set.
    pub fn apply<'a, I>(&self, args: &mut A, params: I) -> usize
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut seen: Vec<&str> = Vec::new();
        let mut set = 0;
        for (name, value) in params {
            if seen.contains(&name) {
                continue;
            }
            seen.push(name);
            if let Some(setter) = self.fields.get(name) {
                setter(args, value.to_string());
                set += 1;
            }
        }
        set
    }
}

impl<A> Default for QueryBinding<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for QueryBinding<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("QueryBinding").field("fields", &names).finish()
    }
}

/// Argument types a server codec can bind onto.
///
/// `Default` is the starting value when the wire carries no structured
/// params (empty REST body, absent JSON-RPC params).
pub trait RpcArgs: DeserializeOwned + Default + Send + 'static {
    /// Query parameters accepted by the REST codec. Empty by default.
    fn query_binding() -> QueryBinding<Self> {
        QueryBinding::new()
    }
}

impl RpcArgs for () {}
impl RpcArgs for String {}
impl RpcArgs for serde_json::Value {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Args {
        a: String,
        b: String,
    }

    fn binding() -> QueryBinding<Args> {
        QueryBinding::<Args>::new()
            .field("A", |a, v| a.a = v)
            .field("B", |a, v| a.b = v)
    }

    #[test]
    fn first_value_wins_and_unknown_names_are_ignored() {
        let mut args = Args::default();
        let set = binding().apply(
            &mut args,
            [("A", "one"), ("Z", "zzz"), ("A", "two"), ("B", "bee")],
        );
        assert_eq!(set, 2);
        assert_eq!(args.a, "one");
        assert_eq!(args.b, "bee");
    }

    #[test]
    fn debug_lists_declared_names() {
        assert_eq!(
            format!("{:?}", binding()),
            r#"QueryBinding { fields: ["A", "B"] }"#
        );
    }
}
