//! Global bindings.
//!
//! Globals are names the host application injects into every script. They
//! are visible to the resolver as script-level variables.

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Failure to obtain the global bindings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GlobalsError {
    #[error("Error in globals script '{path}': {message}")]
    Script { path: String, message: String },
}

/// Global variable names and their type names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Globals {
    vars: FxHashMap<String, String>,
}

impl Globals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, type_name: impl Into<String>) {
        self.vars.insert(name.into(), type_name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.vars.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Globals {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut globals = Globals::new();
        for (name, ty) in iter {
            globals.insert(name, ty);
        }
        globals
    }
}

/// Where global bindings come from.
pub trait GlobalsSource: Send + Sync {
    fn load(&self) -> Result<Globals, GlobalsError>;
}

/// A fixed, in-memory set of globals.
#[derive(Clone, Debug, Default)]
pub struct StaticGlobals(Globals);

impl StaticGlobals {
    pub fn new(globals: Globals) -> Self {
        StaticGlobals(globals)
    }
}

impl GlobalsSource for StaticGlobals {
    fn load(&self) -> Result<Globals, GlobalsError> {
        Ok(self.0.clone())
    }
}
