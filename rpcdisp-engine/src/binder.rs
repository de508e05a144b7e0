//! Argument binding
//!
//! Request params are split into positional and keyword arguments, then
//! matched against a method's declared [`Signature`]:
//!
//! - object params: every member is a keyword argument
//! - array params: every element is positional, except a trailing object,
//!   which is popped and used as the keyword arguments
//! - no params: nothing is bound
//!
//! A bind failure carries a human-readable diagnostic and is reported to the
//! caller as Invalid params.

use rpcdisp_core::{Error, Params, Result};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Split params into positional and keyword arguments
///
/// ```rust
/// use rpcdisp_core::Params;
/// use rpcdisp_engine::binder::split_params;
/// use serde_json::json;
///
/// let params = Params::Array(vec![json!(1), json!(2), json!({"c": 3})]);
/// let (positional, keyword) = split_params(params);
/// assert_eq!(positional, vec![json!(1), json!(2)]);
/// assert_eq!(keyword.get("c"), Some(&json!(3)));
/// ```
pub fn split_params(params: Params) -> (Vec<Value>, Map<String, Value>) {
    match params {
        Params::Empty => (Vec::new(), Map::new()),
        Params::Object(keyword) => (Vec::new(), keyword),
        Params::Array(mut positional) => match positional.pop() {
            Some(Value::Object(keyword)) => (positional, keyword),
            Some(last) => {
                positional.push(last);
                (positional, Map::new())
            }
            None => (positional, Map::new()),
        },
    }
}

/// Declared parameters of a method
///
/// Parameters are named and ordered. The first `required` of them must be
/// bound; the rest are optional. A signature may also accept a variadic
/// positional tail and arbitrary extra keywords.
///
/// ```rust
/// use rpcdisp_engine::Signature;
///
/// // fn(a, b, c=None, *rest)
/// let sig = Signature::new(["a", "b", "c"]).with_optional(1).variadic();
/// assert_eq!(sig.required(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    names: Arc<[String]>,
    required: usize,
    var_positional: bool,
    var_keyword: bool,
}

impl Signature {
    /// Signature with the given parameters, all required
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Arc<[String]> = names.into_iter().map(Into::into).collect();
        Self {
            required: names.len(),
            names,
            var_positional: false,
            var_keyword: false,
        }
    }

    /// Signature without parameters
    pub fn empty() -> Self {
        Self::new(std::iter::empty::<String>())
    }

    /// Signature accepting any positional and keyword arguments
    pub fn any() -> Self {
        Self::empty().variadic().var_keyword()
    }

    /// Make the last `count` parameters optional
    pub fn with_optional(mut self, count: usize) -> Self {
        self.required = self.names.len().saturating_sub(count);
        self
    }

    /// Accept extra positional arguments past the named ones
    pub fn variadic(mut self) -> Self {
        self.var_positional = true;
        self
    }

    /// Accept keyword arguments that match no named parameter
    pub fn var_keyword(mut self) -> Self {
        self.var_keyword = true;
        self
    }

    /// Parameter names in declaration order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of parameters that must be bound
    pub fn required(&self) -> usize {
        self.required
    }

    /// Bind request params to this signature
    pub fn bind_params(&self, params: Params) -> std::result::Result<BoundArgs, String> {
        let (positional, keyword) = split_params(params);
        self.bind(positional, keyword)
    }

    /// Bind already-split arguments to this signature
    ///
    /// Fails with a diagnostic on too many positionals, a missing required
    /// parameter, a parameter given both positionally and by keyword, or an
    /// unknown keyword.
    pub fn bind(
        &self,
        positional: Vec<Value>,
        keyword: Map<String, Value>,
    ) -> std::result::Result<BoundArgs, String> {
        let declared = self.names.len();
        if positional.len() > declared && !self.var_positional {
            return Err(format!(
                "takes {} positional argument{} but {} {} given",
                declared,
                if declared == 1 { "" } else { "s" },
                positional.len(),
                if positional.len() == 1 { "was" } else { "were" },
            ));
        }

        let mut values: Vec<Option<Value>> = vec![None; declared];
        let mut rest = Vec::new();
        for (index, value) in positional.into_iter().enumerate() {
            match values.get_mut(index) {
                Some(slot) => *slot = Some(value),
                None => rest.push(value),
            }
        }

        let mut extra = Map::new();
        for (name, value) in keyword {
            match self.names.iter().position(|n| *n == name) {
                Some(index) => {
                    if values[index].is_some() {
                        return Err(format!("got multiple values for argument '{}'", name));
                    }
                    values[index] = Some(value);
                }
                None if self.var_keyword => {
                    extra.insert(name, value);
                }
                None => return Err(format!("got an unexpected keyword argument '{}'", name)),
            }
        }

        let missing: Vec<String> = self.names[..self.required]
            .iter()
            .zip(&values)
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| format!("'{}'", name))
            .collect();
        if !missing.is_empty() {
            return Err(format!(
                "missing {} required argument{}: {}",
                missing.len(),
                if missing.len() == 1 { "" } else { "s" },
                missing.join(", ")
            ));
        }

        Ok(BoundArgs {
            names: Arc::clone(&self.names),
            values,
            rest,
            extra,
        })
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::empty()
    }
}

/// Arguments bound to a signature
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArgs {
    names: Arc<[String]>,
    values: Vec<Option<Value>>,
    rest: Vec<Value>,
    extra: Map<String, Value>,
}

impl Default for BoundArgs {
    fn default() -> Self {
        Self {
            names: Arc::from(Vec::new()),
            values: Vec::new(),
            rest: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl BoundArgs {
    /// Value bound to a named parameter, if any
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|index| self.values[index].as_ref())
    }

    /// Deserialize a named parameter
    ///
    /// An unbound parameter deserializes from `null`, so `Option<T>` reads
    /// optional parameters. Failures are Invalid params.
    pub fn get_as<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self.get(name).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value)
            .map_err(|e| Error::InvalidParams(format!("argument '{}': {}", name, e)))
    }

    /// Positional arguments past the named parameters
    pub fn rest(&self) -> &[Value] {
        &self.rest
    }

    /// Keywords that matched no named parameter
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Bound named parameters plus extra keywords, as one object
    pub fn to_object(&self) -> Map<String, Value> {
        let mut object: Map<String, Value> = self
            .names
            .iter()
            .zip(&self.values)
            .filter_map(|(name, value)| value.clone().map(|v| (name.clone(), v)))
            .collect();
        object.extend(self.extra.clone());
        object
    }

    /// Single JSON value for typed deserialization
    ///
    /// An object when the signature names parameters or extra keywords were
    /// bound, otherwise the positional tail as an array if non-empty,
    /// otherwise `null`.
    pub fn to_value(&self) -> Value {
        if !self.names.is_empty() || !self.extra.is_empty() {
            Value::Object(self.to_object())
        } else if !self.rest.is_empty() {
            Value::Array(self.rest.clone())
        } else {
            Value::Null
        }
    }
}
