//! Method registry
//!
//! [`Methods`] maps names to [`Method`] entries: a declared [`Signature`]
//! plus the [`Handler`] that runs the body. Registering a name twice keeps
//! the later entry.
//!
//! Names of the form `__name__` are reserved. They can be stored, but lookup
//! never resolves them, so calling one yields Method not found.
//!
//! # Thread Safety
//!
//! A registry is cheaply cloneable (`Arc`-based) and is only read during
//! dispatch, so it can be shared across concurrent calls.
//!
//! # Examples
//!
//! ```rust
//! use rpcdisp_engine::{from_fn, Methods, MethodResult, Signature};
//!
//! let mut methods = Methods::new();
//! methods.register("ping", Signature::empty(), from_fn(|_ctx, _args| async {
//!     Ok(MethodResult::success("pong"))
//! }));
//!
//! assert!(methods.contains("ping"));
//! assert!(methods.lookup("ping").is_some());
//! ```

use crate::binder::Signature;
use crate::handler::Handler;
use rpcdisp_core::is_reserved_method_name;
use std::collections::HashMap;
use std::sync::Arc;

/// A registered method
#[derive(Clone)]
pub struct Method {
    name: String,
    signature: Signature,
    handler: Arc<dyn Handler>,
}

impl Method {
    /// Describe a method
    pub fn new(name: impl Into<String>, signature: Signature, handler: Arc<dyn Handler>) -> Self {
        Self {
            name: name.into(),
            signature,
            handler,
        }
    }

    /// Registered name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameters
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Method body
    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }
}

impl std::fmt::Debug for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Name to method mapping used by dispatch
#[derive(Clone, Default)]
pub struct Methods {
    methods: Arc<HashMap<String, Method>>,
}

impl Methods {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method body under a name, replacing any earlier entry
    pub fn register(
        &mut self,
        name: impl Into<String>,
        signature: Signature,
        handler: Arc<dyn Handler>,
    ) {
        self.add(Method::new(name, signature, handler));
    }

    /// Register a prepared [`Method`], replacing any earlier entry
    pub fn add(&mut self, method: Method) {
        let methods = Arc::make_mut(&mut self.methods);
        methods.insert(method.name.clone(), method);
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(
        mut self,
        name: impl Into<String>,
        signature: Signature,
        handler: Arc<dyn Handler>,
    ) -> Self {
        self.register(name, signature, handler);
        self
    }

    /// Resolve a name for dispatch
    ///
    /// Reserved names never resolve.
    pub fn lookup(&self, name: &str) -> Option<&Method> {
        if is_reserved_method_name(name) {
            return None;
        }
        self.methods.get(name)
    }

    /// Check if a name resolves
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered entries
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl std::fmt::Debug for Methods {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Methods")
            .field("names", &self.names())
            .finish()
    }
}

impl FromIterator<Method> for Methods {
    fn from_iter<I: IntoIterator<Item = Method>>(iter: I) -> Self {
        let mut methods = Methods::new();
        for method in iter {
            methods.add(method);
        }
        methods
    }
}
