//! The set of defined macro names.

use super::error::PreprocessError;
use parking_lot::RwLock;
use std::collections::BTreeSet;

/// Names defined with `#define`, presence only.
///
/// Shared between a preprocessor and the children it creates for includes, so
/// a definition made in an included file is visible to its includer.
#[derive(Debug, Default)]
pub struct SymbolTable {
    names: RwLock<BTreeSet<String>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the name was already defined.
    pub fn define(&self, name: &str) -> bool {
        self.names.write().insert(name.to_string())
    }

    /// Removing a name that is not defined is an error.
    pub fn undef(&self, name: &str) -> Result<(), PreprocessError> {
        if self.names.write().remove(name) {
            Ok(())
        } else {
            Err(PreprocessError::UndefinedSymbol(name.to_string()))
        }
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.names.read().contains(name)
    }

    /// Defined names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.names.read().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.names.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.read().is_empty()
    }
}
