//! Constant and variable assignments.
//!
//! An assignment is a partial injective map from vocabulary symbols of one
//! category to objects. Both categories share the same container, tagged by a
//! zero-sized [`SymbolKind`] marker.
use std::{
    collections::{BTreeMap, BTreeSet},
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use crate::{
    utils::error::{VividError, VividResult},
    vocabulary::{Vocabulary, VocabularyRef},
};

/// Category of vocabulary symbols an assignment ranges over.
pub trait SymbolKind: std::fmt::Debug + Clone + Copy + Default + Send + Sync + 'static {
    const NAME: &'static str;

    fn declares(vocabulary: &Vocabulary, symbol: &str) -> bool;

    fn symbols(vocabulary: &Vocabulary) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Constant;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Variable;

impl SymbolKind for Constant {
    const NAME: &'static str = "constant";

    fn declares(vocabulary: &Vocabulary, symbol: &str) -> bool {
        vocabulary.is_constant(symbol)
    }

    fn symbols(vocabulary: &Vocabulary) -> Vec<String> {
        vocabulary.constants().iter().cloned().collect()
    }
}

impl SymbolKind for Variable {
    const NAME: &'static str = "variable";

    fn declares(vocabulary: &Vocabulary, symbol: &str) -> bool {
        vocabulary.is_variable(symbol)
    }

    fn symbols(vocabulary: &Vocabulary) -> Vec<String> {
        vocabulary.variables().iter().cloned().collect()
    }
}

/// Partial injective map from symbols of kind `K` to objects.
#[derive(Debug, Clone)]
pub struct SymbolAssignment<K: SymbolKind> {
    vocabulary: VocabularyRef,
    mapping: BTreeMap<String, String>,
    _kind: PhantomData<K>,
}

pub type ConstantAssignment = SymbolAssignment<Constant>;
pub type VariableAssignment = SymbolAssignment<Variable>;

impl<K: SymbolKind> SymbolAssignment<K> {
    pub fn empty(vocabulary: VocabularyRef) -> Self {
        Self {
            vocabulary,
            mapping: BTreeMap::new(),
            _kind: PhantomData,
        }
    }

    pub fn new<S, O>(
        vocabulary: VocabularyRef,
        bindings: impl IntoIterator<Item = (S, O)>,
    ) -> VividResult<Self>
    where
        S: Into<String>,
        O: Into<String>,
    {
        let mut assignment = Self::empty(vocabulary);
        for (symbol, object) in bindings {
            assignment.bind(symbol, object)?;
        }
        Ok(assignment)
    }

    #[inline]
    pub fn vocabulary(&self) -> &VocabularyRef {
        &self.vocabulary
    }

    /// Bind `symbol` to `object`, keeping the map injective.
    ///
    /// Rebinding a symbol to the object it already denotes is a no-op.
    pub fn bind(&mut self, symbol: impl Into<String>, object: impl Into<String>) -> VividResult<()> {
        let symbol = symbol.into();
        let object = object.into();

        if !K::declares(&self.vocabulary.read(), &symbol) {
            return Err(VividError::UnknownSymbol {
                name: symbol,
                kind: K::NAME,
            });
        }

        if let Some(bound) = self.mapping.get(&symbol) {
            if *bound == object {
                return Ok(());
            }
            return Err(VividError::ConflictingBinding {
                symbol,
                bound: bound.clone(),
                object,
            });
        }

        if let Some((other, _)) = self.mapping.iter().find(|(_, bound)| **bound == object) {
            return Err(VividError::NonInjective {
                object,
                first: other.clone(),
                second: symbol,
            });
        }

        self.mapping.insert(symbol, object);
        Ok(())
    }

    /// Copy of this assignment with one more binding.
    pub fn with(&self, symbol: impl Into<String>, object: impl Into<String>) -> VividResult<Self> {
        let mut extended = self.clone();
        extended.bind(symbol, object)?;
        Ok(extended)
    }

    /// Bind symbols known to be unbound to objects known to be unused.
    pub(crate) fn extend_unchecked(&mut self, bindings: impl IntoIterator<Item = (String, String)>) {
        self.mapping.extend(bindings);
    }

    pub fn get(&self, symbol: &str) -> Option<&str> {
        self.mapping.get(symbol).map(String::as_str)
    }

    #[inline]
    pub fn contains(&self, symbol: &str) -> bool {
        self.mapping.contains_key(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.mapping.iter().map(|(s, o)| (s.as_str(), o.as_str()))
    }

    /// Symbols bound by this assignment.
    pub fn domain(&self) -> impl Iterator<Item = &str> {
        self.mapping.keys().map(String::as_str)
    }

    /// Objects referred to by this assignment.
    pub fn objects(&self) -> BTreeSet<&str> {
        self.mapping.values().map(String::as_str).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Symbols of the vocabulary not bound by this assignment, in vocabulary order.
    pub fn unbound_symbols(&self) -> Vec<String> {
        K::symbols(&self.vocabulary.read())
            .into_iter()
            .filter(|symbol| !self.mapping.contains_key(symbol))
            .collect()
    }

    /// `true` if every symbol of this kind in the vocabulary is bound.
    pub fn is_total(&self) -> bool {
        let vocabulary = self.vocabulary.read();
        K::symbols(&vocabulary)
            .iter()
            .all(|symbol| self.mapping.contains_key(symbol))
    }

    /// `true` if every binding of `other` is also a binding of `self`.
    pub fn is_superset_of(&self, other: &Self) -> bool {
        other
            .mapping
            .iter()
            .all(|(symbol, object)| self.mapping.get(symbol) == Some(object))
    }

    /// `true` if both assignments cannot be merged into one injective map.
    pub fn conflicts_with(&self, other: &Self) -> bool {
        other.mapping.iter().any(|(symbol, object)| {
            match self.mapping.get(symbol) {
                Some(bound) => bound != object,
                None => self
                    .mapping
                    .iter()
                    .any(|(mine, bound)| bound == object && mine != symbol),
            }
        })
    }
}

impl<K: SymbolKind> PartialEq for SymbolAssignment<K> {
    fn eq(&self, other: &Self) -> bool {
        self.vocabulary.same_as(&other.vocabulary) && self.mapping == other.mapping
    }
}

impl<K: SymbolKind> Eq for SymbolAssignment<K> {}

impl<K: SymbolKind> Hash for SymbolAssignment<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.mapping.hash(state);
    }
}

impl<K: SymbolKind> std::fmt::Display for SymbolAssignment<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (symbol, object)) in self.mapping.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{symbol} -> {object}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::{RelationSymbol, Vocabulary};

    fn vocabulary() -> VocabularyRef {
        Vocabulary::new(["c1", "c2"], [RelationSymbol::new("Ahead", 2)], ["x", "y"])
            .unwrap()
            .into_shared()
    }

    #[test]
    fn bindings_are_validated() {
        let vocabulary = vocabulary();
        let mut a = ConstantAssignment::empty(vocabulary.clone());

        a.bind("c1", "s1").unwrap();
        a.bind("c1", "s1").unwrap();
        assert!(a.bind("c1", "s2").unwrap_err().is_conflicting_binding());
        assert!(a.bind("c2", "s1").unwrap_err().is_non_injective());
        assert!(a.bind("x", "s2").unwrap_err().is_unknown_symbol());

        let mut x = VariableAssignment::empty(vocabulary);
        assert!(x.bind("c1", "s1").unwrap_err().is_unknown_symbol());
        x.bind("x", "s1").unwrap();
        assert_eq!(x.get("x"), Some("s1"));
    }

    #[test]
    fn totality_and_ordering() {
        let vocabulary = vocabulary();
        let partial = ConstantAssignment::new(vocabulary.clone(), [("c1", "s1")]).unwrap();
        let total = partial.with("c2", "s2").unwrap();

        assert!(!partial.is_total());
        assert!(total.is_total());
        assert_eq!(partial.unbound_symbols(), vec!["c2".to_string()]);

        assert!(total.is_superset_of(&partial));
        assert!(!partial.is_superset_of(&total));
        assert!(partial.is_superset_of(&partial));
    }

    #[test]
    fn conflicts() {
        let vocabulary = vocabulary();
        let a = ConstantAssignment::new(vocabulary.clone(), [("c1", "s1")]).unwrap();
        let same_object = ConstantAssignment::new(vocabulary.clone(), [("c2", "s1")]).unwrap();
        let other_object = ConstantAssignment::new(vocabulary.clone(), [("c1", "s2")]).unwrap();
        let compatible = ConstantAssignment::new(vocabulary, [("c2", "s2")]).unwrap();

        assert!(a.conflicts_with(&same_object));
        assert!(a.conflicts_with(&other_object));
        assert!(!a.conflicts_with(&compatible));
        assert!(!a.conflicts_with(&a));
    }

    #[test]
    fn equality_requires_the_same_vocabulary() {
        let a = ConstantAssignment::new(vocabulary(), [("c1", "s1")]).unwrap();
        let b = ConstantAssignment::new(vocabulary(), [("c1", "s1")]).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
