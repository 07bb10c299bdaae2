use std::collections::hash_map::Entry;

use ahash::{HashMap, HashMapExt};
use tracing::debug;

use crate::error::ExpressionError;
use crate::evaluate::{evaluate, is_valid_name};
use crate::poly::{Polynomial, Variable};

/// Named polynomials that can be referred to from expressions.
///
/// The environment is owned by its caller and only changes through
/// [`Environment::store`] and [`Environment::bind`]. Callers that share it
/// between threads should guard it with a single `Mutex`.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: HashMap<Variable, Polynomial>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment {
            bindings: HashMap::new(),
        }
    }

    /// Evaluate `expression` in the current environment and bind the result to `name`,
    /// replacing a previous binding. If evaluation fails, the environment is not modified.
    pub fn store(&mut self, name: &str, expression: &str) -> Result<&Polynomial, ExpressionError> {
        if !is_valid_name(name) {
            return Err(ExpressionError::syntax(
                format!("cannot assign to '{}': a name consists of letters only", name),
                0,
            ));
        }

        let value = evaluate(expression, self)?;
        Ok(self.bind(name, value))
    }

    /// Bind `value` to `name`, replacing a previous binding.
    pub fn bind(&mut self, name: &str, value: Polynomial) -> &Polynomial {
        debug!("{} = {}", name, value);

        match self.bindings.entry(name.into()) {
            Entry::Occupied(mut o) => {
                o.insert(value);
                o.into_mut()
            }
            Entry::Vacant(v) => v.insert(value),
        }
    }

    /// Get the value bound to `name`, if any.
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<&Polynomial> {
        self.bindings.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Polynomial> {
        self.bindings.remove(name)
    }

    /// Iterate over all bindings, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Polynomial)> {
        let mut entries: Vec<_> = self
            .bindings
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
