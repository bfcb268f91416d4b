//! Vocabularies and the shared vocabulary handle.
//!
//! A vocabulary is shared, by reference, between every entity built from it:
//! assignments, named states, formulas, interpretations and contexts. Growing
//! it (for instance when a named state gains a new constant mid-derivation) is
//! visible to all of them. Two handles are the same vocabulary only when they
//! point to the same allocation.
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::utils::error::{VividError, VividResult};

/// A predicate name with its arity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationSymbol {
    name: String,
    arity: usize,
}

impl RelationSymbol {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl std::fmt::Display for RelationSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

/// Ordered, deduplicated constants, variables and relation symbols.
///
/// A name is either a constant or a variable, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    constants: IndexSet<String>,
    variables: IndexSet<String>,
    relation_symbols: IndexMap<String, RelationSymbol>,
}

impl Vocabulary {
    pub fn new<C, V>(
        constants: impl IntoIterator<Item = C>,
        relation_symbols: impl IntoIterator<Item = RelationSymbol>,
        variables: impl IntoIterator<Item = V>,
    ) -> VividResult<Self>
    where
        C: Into<String>,
        V: Into<String>,
    {
        let mut vocabulary = Self::default();
        for constant in constants {
            vocabulary.add_constant(constant)?;
        }
        for variable in variables {
            vocabulary.add_variable(variable)?;
        }
        for symbol in relation_symbols {
            vocabulary.add_relation_symbol(symbol)?;
        }
        Ok(vocabulary)
    }

    /// Add a constant. Returns `false` if it was already a constant.
    pub fn add_constant(&mut self, name: impl Into<String>) -> VividResult<bool> {
        let name = name.into();
        if self.variables.contains(&name) {
            return Err(VividError::DuplicateSymbol {
                name,
                kind: "variable",
            });
        }
        Ok(self.constants.insert(name))
    }

    /// Add a variable. Returns `false` if it was already a variable.
    pub fn add_variable(&mut self, name: impl Into<String>) -> VividResult<bool> {
        let name = name.into();
        if self.constants.contains(&name) {
            return Err(VividError::DuplicateSymbol {
                name,
                kind: "constant",
            });
        }
        Ok(self.variables.insert(name))
    }

    pub fn add_relation_symbol(&mut self, symbol: RelationSymbol) -> VividResult<()> {
        if let Some(existing) = self.relation_symbols.get(symbol.name()) {
            if *existing == symbol {
                return Ok(());
            }
            return Err(VividError::DuplicateSymbol {
                name: symbol.name,
                kind: "relation symbol",
            });
        }
        self.relation_symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    #[inline]
    pub fn constants(&self) -> &IndexSet<String> {
        &self.constants
    }

    #[inline]
    pub fn variables(&self) -> &IndexSet<String> {
        &self.variables
    }

    pub fn relation_symbols(&self) -> impl Iterator<Item = &RelationSymbol> {
        self.relation_symbols.values()
    }

    pub fn relation_symbol(&self, name: &str) -> Option<&RelationSymbol> {
        self.relation_symbols.get(name)
    }

    #[inline]
    pub fn is_constant(&self, name: &str) -> bool {
        self.constants.contains(name)
    }

    #[inline]
    pub fn is_variable(&self, name: &str) -> bool {
        self.variables.contains(name)
    }

    /// Wrap into a fresh shared handle.
    pub fn into_shared(self) -> VocabularyRef {
        VocabularyRef::new(self)
    }
}

/// Shared handle to a [`Vocabulary`], compared by identity.
#[derive(Debug, Clone)]
pub struct VocabularyRef {
    inner: Arc<RwLock<Vocabulary>>,
}

impl VocabularyRef {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            inner: Arc::new(RwLock::new(vocabulary)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Vocabulary> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Vocabulary> {
        self.inner.write()
    }

    /// `true` if both handles point to the same vocabulary.
    #[inline]
    pub fn same_as(&self, other: &VocabularyRef) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Fail with [`VividError::VocabularyMismatch`] unless both handles are the same.
    pub fn ensure_same(&self, other: &VocabularyRef, operation: &'static str) -> VividResult<()> {
        if self.same_as(other) {
            Ok(())
        } else {
            Err(VividError::VocabularyMismatch { operation })
        }
    }
}

impl PartialEq for VocabularyRef {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for VocabularyRef {}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> Vocabulary {
        Vocabulary::new(["c1", "c2"], [RelationSymbol::new("Ahead", 2)], ["x"]).unwrap()
    }

    #[test]
    fn constants_and_variables_are_disjoint() {
        let mut vocabulary = clock();
        assert!(vocabulary.add_variable("c1").unwrap_err().is_duplicate_symbol());
        assert!(vocabulary.add_constant("x").unwrap_err().is_duplicate_symbol());
        assert!(!vocabulary.add_constant("c1").unwrap());
        assert!(vocabulary.add_constant("c3").unwrap());
        assert_eq!(
            vocabulary.constants().iter().collect::<Vec<_>>(),
            vec!["c1", "c2", "c3"]
        );
    }

    #[test]
    fn relation_symbols_keep_one_arity() {
        let mut vocabulary = clock();
        assert!(vocabulary.add_relation_symbol(RelationSymbol::new("Ahead", 2)).is_ok());
        assert!(
            vocabulary
                .add_relation_symbol(RelationSymbol::new("Ahead", 3))
                .unwrap_err()
                .is_duplicate_symbol()
        );
        assert_eq!(vocabulary.relation_symbol("Ahead").unwrap().arity(), 2);
    }

    #[test]
    fn handles_compare_by_identity() {
        let a = clock().into_shared();
        let b = clock().into_shared();
        let a2 = a.clone();

        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert!(a.ensure_same(&b, "test").unwrap_err().is_vocabulary_mismatch());

        a.write().add_constant("c9").unwrap();
        assert!(a2.read().is_constant("c9"));
        assert!(!b.read().is_constant("c9"));
    }
}
