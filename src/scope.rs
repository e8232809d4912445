use serde::{Deserialize, Serialize};
use std::fmt;

/// Dotted path naming a component in an external state tree,
/// e.g. `simulation.schrodingerModel.electron`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateScope(String);

impl StateScope {
    pub fn root(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn child(&self, name: &str) -> Self {
        Self(format!("{}.{}", self.0, name))
    }

    pub fn path(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
