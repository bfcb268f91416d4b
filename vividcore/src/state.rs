//! States: total ascriptions of value sets to every `(attribute, object)` pair.
//!
//! A state over an attribute system never has missing entries: a pair nobody
//! constrained is ascribed the full set of the attribute's possible values.
//! States are ordered by extension (pointwise subset), enumerate the worlds
//! they admit, and compute the alternate extensions used by the
//! non-monotonic rules.
use std::{
    collections::{BTreeMap, HashSet, btree_map},
    hash::{Hash, Hasher},
    sync::Arc,
};

use log::{debug, trace};
use vividset::{DiscreteValues, Discretization, ValueSet};

use crate::{
    system::AttributeSystem,
    utils::{
        combinatorics::CartesianProduct,
        error::{VividError, VividResult},
    },
};

/// An `(attribute label, object)` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AscriptionKey {
    label: String,
    object: String,
}

impl AscriptionKey {
    pub fn new(label: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            object: object.into(),
        }
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn object(&self) -> &str {
        &self.object
    }
}

impl<L: Into<String>, O: Into<String>> From<(L, O)> for AscriptionKey {
    fn from((label, object): (L, O)) -> Self {
        Self::new(label, object)
    }
}

impl std::fmt::Display for AscriptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.label, self.object)
    }
}

#[derive(Debug, Clone)]
pub struct State {
    system: Arc<AttributeSystem>,
    ascriptions: BTreeMap<AscriptionKey, ValueSet>,
}

impl State {
    /// The least informative state: every pair ascribed its full range.
    pub fn new(system: impl Into<Arc<AttributeSystem>>) -> Self {
        let system = system.into();
        let ascriptions = system
            .structure()
            .attributes()
            .flat_map(|attribute| {
                system.objects().iter().map(move |object| {
                    (
                        AscriptionKey::new(attribute.label(), object.as_str()),
                        attribute.possible_values().clone(),
                    )
                })
            })
            .collect();
        Self {
            system,
            ascriptions,
        }
    }

    /// Full ranges, refined by `overrides`.
    pub fn with_ascriptions<K, V>(
        system: impl Into<Arc<AttributeSystem>>,
        overrides: impl IntoIterator<Item = (K, V)>,
    ) -> VividResult<Self>
    where
        K: Into<AscriptionKey>,
        V: Into<ValueSet>,
    {
        let mut state = Self::new(system);
        for (key, values) in overrides {
            state.set_ascription(key, values)?;
        }
        Ok(state)
    }

    /// Replace the ascription of one pair.
    ///
    /// The new value set must be non-empty and within the attribute's
    /// possible values.
    pub fn set_ascription(
        &mut self,
        key: impl Into<AscriptionKey>,
        values: impl Into<ValueSet>,
    ) -> VividResult<()> {
        let key = key.into();
        let values = values.into();

        let attribute = self.system.structure().attribute(key.label())?;
        if !self.system.contains_object(key.object()) {
            return Err(VividError::UnknownObject(key.object));
        }
        if values.is_empty() {
            return Err(VividError::EmptyAscription {
                label: key.label,
                object: key.object,
            });
        }
        if !values.is_subset(attribute.possible_values()) {
            return Err(VividError::AscriptionOutOfRange {
                values: values.to_string(),
                label: key.label,
                object: key.object,
            });
        }

        self.ascriptions.insert(key, values);
        Ok(())
    }

    #[inline]
    pub fn system(&self) -> &Arc<AttributeSystem> {
        &self.system
    }

    pub fn ascription(&self, key: &AscriptionKey) -> VividResult<&ValueSet> {
        self.ascriptions.get(key).ok_or_else(|| {
            if self.system.structure().contains_attribute(key.label()) {
                VividError::UnknownObject(key.object.clone())
            } else {
                VividError::UnknownAttribute(key.label.clone())
            }
        })
    }

    pub fn ascriptions(&self) -> btree_map::Iter<'_, AscriptionKey, ValueSet> {
        self.ascriptions.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &AscriptionKey> {
        self.ascriptions.keys()
    }

    /// `true` if both states range over the same attribute system.
    pub fn same_system(&self, other: &State) -> bool {
        Arc::ptr_eq(&self.system, &other.system) || self.system == other.system
    }

    fn ensure_same_system(&self, other: &State, operation: &'static str) -> VividResult<()> {
        if self.same_system(other) {
            Ok(())
        } else {
            Err(VividError::SystemMismatch { operation })
        }
    }

    /// `true` if every ascription of `self` is within the matching one of `other`.
    pub fn is_extension_of(&self, other: &State) -> VividResult<bool> {
        self.ensure_same_system(other, "state extension")?;
        Ok(self
            .ascriptions
            .iter()
            .zip(other.ascriptions.values())
            .all(|((_, mine), theirs)| mine.is_subset(theirs)))
    }

    pub fn is_strict_extension_of(&self, other: &State) -> VividResult<bool> {
        Ok(self.is_extension_of(other)? && self.ascriptions != other.ascriptions)
    }

    /// `true` if the pair is ascribed a single, non-range value.
    pub fn is_valuation(&self, key: &AscriptionKey) -> VividResult<bool> {
        Ok(self.ascription(key)?.is_singleton())
    }

    pub fn is_world(&self) -> bool {
        self.ascriptions.values().all(ValueSet::is_singleton)
    }

    /// `true` if no world extends both states.
    pub fn is_disjoint(&self, other: &State) -> VividResult<bool> {
        self.ensure_same_system(other, "state disjointness")?;
        Ok(self
            .ascriptions
            .values()
            .zip(other.ascriptions.values())
            .any(|(mine, theirs)| mine.is_disjoint(theirs)))
    }

    /// Lazily enumerate every combination of materialized values of the given
    /// pairs.
    ///
    /// Items list one value per key, in the order of `keys`. Ascriptions are
    /// discretized on the fly, so the first items are available regardless of
    /// how many values each pair admits.
    pub fn valuations(
        &self,
        keys: &[AscriptionKey],
        discretization: &Discretization,
    ) -> VividResult<CartesianProduct<DiscreteValues<'_>>> {
        let factors = keys
            .iter()
            .map(|key| Ok(self.ascription(key)?.discretize(discretization)?))
            .collect::<VividResult<Vec<_>>>()?;
        Ok(CartesianProduct::new(factors))
    }

    /// Lazily enumerate the worlds extending this state.
    pub fn worlds(&self, discretization: &Discretization) -> VividResult<Worlds<'_>> {
        let keys: Vec<AscriptionKey> = self.ascriptions.keys().cloned().collect();
        let count = self.world_count(discretization)?;
        let product = self.valuations(&keys, discretization)?;
        debug!("enumerating {count} world(s)");
        Ok(Worlds {
            system: self.system.clone(),
            keys,
            product,
            count,
        })
    }

    /// Number of worlds extending this state, saturating at `u128::MAX`.
    pub fn world_count(&self, discretization: &Discretization) -> VividResult<u128> {
        self.ascriptions.values().try_fold(1u128, |count, values| {
            Ok(count.saturating_mul(values.discrete_len(discretization)?))
        })
    }

    /// Lazily compute the alternate extensions of `self` with respect to `cases`.
    ///
    /// Each case must be a strict extension of `self`. Every alternate
    /// extension refines, for one choice of narrowed pair per case, those
    /// pairs to what the cases leave out.
    pub fn alternate_extensions<'a>(
        &'a self,
        cases: &[&State],
    ) -> VividResult<AlternateExtensions<'a>> {
        if cases.is_empty() {
            return Err(VividError::NoCases);
        }

        let mut factors = Vec::with_capacity(cases.len());
        for (index, case) in cases.iter().enumerate() {
            self.ensure_same_system(case, "alternate extensions")?;
            if !case.is_strict_extension_of(self)? {
                return Err(VividError::NotStrictExtension { index });
            }

            let narrowed = self.narrowed_by(case);
            trace!("case #{index} narrows {} pair(s)", narrowed.len());
            factors.push(narrowed);
        }

        Ok(self.alternates_unchecked(factors))
    }

    /// Narrowed entries of `case`, assumed to be a strict extension of `self`.
    pub(crate) fn narrowed_by(&self, case: &State) -> Vec<(AscriptionKey, ValueSet)> {
        case.ascriptions
            .iter()
            .zip(self.ascriptions.values())
            .filter(|((_, theirs), mine)| theirs.is_proper_subset(mine))
            .map(|((key, theirs), _)| (key.clone(), theirs.clone()))
            .collect()
    }

    pub(crate) fn alternates_unchecked(
        &self,
        factors: Vec<Vec<(AscriptionKey, ValueSet)>>,
    ) -> AlternateExtensions<'_> {
        let product = CartesianProduct::new(factors.into_iter().map(Vec::into_iter).collect());
        debug!(
            "computing alternate extensions over {} combination(s)",
            product.len_hint()
        );
        AlternateExtensions {
            base: self,
            product,
            seen: HashSet::new(),
        }
    }

    /// Add a new object to the underlying system, ascribing it full ranges.
    pub fn add_object(&mut self, object: impl Into<String>) -> VividResult<()> {
        let object = object.into();
        Arc::make_mut(&mut self.system).add_object(object.clone())?;

        let fresh: Vec<_> = self
            .system
            .structure()
            .attributes()
            .map(|attribute| {
                (
                    AscriptionKey::new(attribute.label(), object.as_str()),
                    attribute.possible_values().clone(),
                )
            })
            .collect();
        self.ascriptions.extend(fresh);
        Ok(())
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.same_system(other) && self.ascriptions == other.ascriptions
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ascriptions.hash(state);
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, (key, values)) in self.ascriptions.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            if values.is_singleton() {
                write!(f, "{key} = {}", values)?;
            } else {
                write!(f, "{key} in {}", values)?;
            }
        }
        Ok(())
    }
}

/// Lazy world enumeration, see [`State::worlds`].
#[derive(Debug, Clone)]
pub struct Worlds<'a> {
    system: Arc<AttributeSystem>,
    keys: Vec<AscriptionKey>,
    product: CartesianProduct<DiscreteValues<'a>>,
    count: u128,
}

impl Worlds<'_> {
    /// Total number of worlds of the enumeration, saturating at `u128::MAX`.
    pub fn len_hint(&self) -> u128 {
        self.count
    }
}

impl Iterator for Worlds<'_> {
    type Item = State;

    fn next(&mut self) -> Option<State> {
        let values = self.product.next()?;
        let ascriptions = self
            .keys
            .iter()
            .cloned()
            .zip(values.into_iter().map(ValueSet::single))
            .collect();
        Some(State {
            system: self.system.clone(),
            ascriptions,
        })
    }
}

/// Lazy alternate-extension computation, see [`State::alternate_extensions`].
///
/// Distinct combinations of cases may refine to the same alternate; those are
/// yielded once. Deduplication remembers the refined pairs of every alternate
/// yielded so far (never a whole state), so memory grows with the number of
/// distinct alternates produced. Bound long enumerations with
/// [`BudgetKind::Alternates`](crate::utils::budget::BudgetKind::Alternates).
#[derive(Debug)]
pub struct AlternateExtensions<'a> {
    base: &'a State,
    product: CartesianProduct<std::vec::IntoIter<(AscriptionKey, ValueSet)>>,
    seen: HashSet<BTreeMap<AscriptionKey, ValueSet>>,
}

impl AlternateExtensions<'_> {
    /// Merge the narrowed entries of one combination, pair by pair, into what
    /// each refined pair keeps of its ascription in `base`.
    ///
    /// `None` if a pair ends up covering its whole ascription in `base`.
    fn refine(
        &self,
        combination: Vec<(AscriptionKey, ValueSet)>,
    ) -> Option<BTreeMap<AscriptionKey, ValueSet>> {
        let mut merged: BTreeMap<AscriptionKey, ValueSet> = BTreeMap::new();
        for (key, values) in combination {
            merged
                .entry(key)
                .and_modify(|acc| *acc = acc.union(&values))
                .or_insert(values);
        }

        for (key, values) in merged.iter_mut() {
            let own = self.base.ascriptions.get(key)?;
            if *values == *own {
                return None;
            }
            let remaining = own.difference(values);
            if remaining.is_empty() {
                return None;
            }
            *values = remaining;
        }
        Some(merged)
    }
}

impl Iterator for AlternateExtensions<'_> {
    type Item = State;

    fn next(&mut self) -> Option<State> {
        loop {
            let combination = self.product.next()?;
            let Some(refined) = self.refine(combination) else {
                continue;
            };
            if self.seen.contains(&refined) {
                continue;
            }

            let mut residual = self.base.clone();
            residual
                .ascriptions
                .extend(refined.iter().map(|(key, values)| (key.clone(), values.clone())));
            self.seen.insert(refined);
            return Some(residual);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        attribute::Attribute, config::EngineConfig, structure::AttributeStructure,
        utils::budget::BudgetKind,
    };
    use vividset::{Interval, Value};

    fn range(inf: i64, sup: i64) -> ValueSet {
        ValueSet::single(Interval::int(inf, sup).unwrap())
    }

    fn ints(values: &[i64]) -> ValueSet {
        values.iter().map(|&v| Value::Int(v)).collect()
    }

    fn system() -> Arc<AttributeSystem> {
        let structure = AttributeStructure::new(
            [
                Attribute::new("hour", range(1, 3)).unwrap(),
                Attribute::new("minute", range(0, 1)).unwrap(),
            ],
            [],
        )
        .unwrap();
        Arc::new(AttributeSystem::new(structure, ["s1", "s2"]).unwrap())
    }

    #[test]
    fn new_states_are_total() {
        let state = State::new(system());
        assert_eq!(state.keys().count(), 4);
        assert_eq!(
            state.ascription(&("hour", "s2").into()).unwrap(),
            &range(1, 3)
        );
        assert!(
            state
                .ascription(&("weight", "s1").into())
                .unwrap_err()
                .is_unknown_attribute()
        );
        assert!(!state.is_world());
    }

    #[test]
    fn ascriptions_are_validated() {
        let mut state = State::new(system());
        assert!(
            state
                .set_ascription(("hour", "s1"), ValueSet::empty())
                .unwrap_err()
                .is_empty_ascription()
        );
        assert!(
            state
                .set_ascription(("hour", "s1"), ints(&[7]))
                .unwrap_err()
                .is_ascription_out_of_range()
        );
        assert!(
            state
                .set_ascription(("hour", "s9"), ints(&[1]))
                .unwrap_err()
                .is_unknown_object()
        );
        state.set_ascription(("hour", "s1"), ints(&[2])).unwrap();
        assert!(state.is_valuation(&("hour", "s1").into()).unwrap());
        assert!(!state.is_valuation(&("hour", "s2").into()).unwrap());
    }

    #[test]
    fn extension_order() {
        let system = system();
        let a = State::new(system.clone());
        let b = State::with_ascriptions(system.clone(), [(("hour", "s1"), ints(&[1, 3]))]).unwrap();
        let c = State::with_ascriptions(system, [(("hour", "s1"), ints(&[3]))]).unwrap();

        for s in [&a, &b, &c] {
            assert!(s.is_extension_of(s).unwrap());
            assert!(!s.is_strict_extension_of(s).unwrap());
        }
        assert!(b.is_strict_extension_of(&a).unwrap());
        assert!(c.is_strict_extension_of(&b).unwrap());
        assert!(c.is_strict_extension_of(&a).unwrap());
        assert!(!a.is_extension_of(&c).unwrap());
    }

    #[test]
    fn states_over_other_systems_are_rejected() {
        let a = State::new(system());
        let mut other = (*system()).clone();
        other.add_object("s3").unwrap();
        let b = State::new(other);
        assert!(a.is_extension_of(&b).unwrap_err().is_system_mismatch());
    }

    #[test]
    fn world_enumeration() {
        let state = State::with_ascriptions(system(), [(("hour", "s1"), ints(&[2]))]).unwrap();
        let discretization = Discretization::default();

        // hour(s2) * minute(s1) * minute(s2)
        assert_eq!(state.world_count(&discretization).unwrap(), 3 * 2 * 2);

        let worlds: Vec<_> = state.worlds(&discretization).unwrap().collect();
        assert_eq!(worlds.len(), 12);
        assert_eq!(worlds.iter().collect::<HashSet<_>>().len(), 12);
        for world in &worlds {
            assert!(world.is_world());
            assert!(world.is_extension_of(&state).unwrap());
        }

        let world = &worlds[0];
        assert_eq!(world.worlds(&discretization).unwrap().count(), 1);
    }

    #[test]
    fn valuations_do_not_materialize_ascriptions() {
        let structure = AttributeStructure::new(
            [Attribute::new("tick", range(0, 20_000_000)).unwrap()],
            [],
        )
        .unwrap();
        let system = Arc::new(AttributeSystem::new(structure, ["s1", "s2"]).unwrap());
        let state = State::new(system);
        let keys: Vec<AscriptionKey> = state.keys().cloned().collect();
        let discretization = Discretization::default();

        let mut valuations = state.valuations(&keys, &discretization).unwrap();
        assert_eq!(valuations.next(), Some(vec![Value::Int(0), Value::Int(0)]));
        assert_eq!(valuations.next(), Some(vec![Value::Int(0), Value::Int(1)]));

        let worlds = state.worlds(&discretization).unwrap();
        assert_eq!(worlds.len_hint(), 20_000_001 * 20_000_001);

        let mut config = EngineConfig::default();
        config.budget.max_worlds = Some(5);
        let results: Vec<_> = config.budgeted(worlds, BudgetKind::Worlds).collect();
        assert_eq!(results.len(), 6);
        assert!(results[..5].iter().all(Result::is_ok));
        assert!(results[5].as_ref().unwrap_err().is_budget_exhausted());
    }

    #[test]
    fn alternate_extensions_of_one_case() {
        let system = system();
        let state = State::new(system.clone());
        let case = State::with_ascriptions(system, [(("hour", "s1"), ints(&[3]))]).unwrap();

        let alternates: Vec<_> = state.alternate_extensions(&[&case]).unwrap().collect();
        assert_eq!(alternates.len(), 1);
        assert_eq!(
            alternates[0].ascription(&("hour", "s1").into()).unwrap(),
            &range(1, 2)
        );
        assert!(alternates[0].is_strict_extension_of(&state).unwrap());
        assert!(alternates[0].is_disjoint(&case).unwrap());
    }

    #[test]
    fn alternate_extensions_merge_cases_on_the_same_pair() {
        let system = system();
        let state = State::new(system.clone());
        let low = State::with_ascriptions(system.clone(), [(("hour", "s1"), ints(&[1]))]).unwrap();
        let high = State::with_ascriptions(system.clone(), [(("hour", "s1"), ints(&[3]))]).unwrap();
        let middle = State::with_ascriptions(system, [(("hour", "s1"), ints(&[2]))]).unwrap();

        let alternates: Vec<_> = state.alternate_extensions(&[&low, &high]).unwrap().collect();
        assert_eq!(alternates.len(), 1);
        assert_eq!(
            alternates[0].ascription(&("hour", "s1").into()).unwrap(),
            &ints(&[2])
        );

        // Together the cases cover the whole ascription.
        let covering = state.alternate_extensions(&[&low, &high, &middle]).unwrap();
        assert_eq!(covering.count(), 0);
    }

    #[test]
    fn alternate_extensions_over_several_pairs() {
        let system = system();
        let state = State::new(system.clone());
        let case = State::with_ascriptions(
            system,
            [
                (("hour", "s1"), ints(&[3])),
                (("minute", "s2"), ints(&[0])),
            ],
        )
        .unwrap();

        let alternates: HashSet<_> = state.alternate_extensions(&[&case]).unwrap().collect();
        assert_eq!(alternates.len(), 2);
        for alternate in &alternates {
            assert!(alternate.is_disjoint(&case).unwrap());
        }
    }

    #[test]
    fn alternate_extensions_are_yielded_once() {
        let system = system();
        let state = State::new(system.clone());
        let case = State::with_ascriptions(
            system,
            [
                (("hour", "s1"), ints(&[1])),
                (("minute", "s1"), ints(&[0])),
            ],
        )
        .unwrap();

        // Four combinations; (hour, minute) and (minute, hour) refine alike.
        let alternates: Vec<_> = state.alternate_extensions(&[&case, &case]).unwrap().collect();
        assert_eq!(alternates.len(), 3);
        assert_eq!(alternates.iter().collect::<HashSet<_>>().len(), 3);
        assert!(alternates.iter().any(|alternate| {
            alternate.ascription(&("hour", "s1").into()).unwrap() == &range(2, 3)
                && alternate.ascription(&("minute", "s1").into()).unwrap() == &ints(&[1])
        }));
    }

    #[test]
    fn alternate_extensions_reject_bad_input() {
        let system = system();
        let state = State::with_ascriptions(system.clone(), [(("hour", "s1"), ints(&[2, 3]))]).unwrap();
        let wider = State::new(system);

        assert!(state.alternate_extensions(&[]).unwrap_err().is_no_cases());
        assert!(matches!(
            state.alternate_extensions(&[&state]).unwrap_err(),
            VividError::NotStrictExtension { index: 0 }
        ));
        assert!(matches!(
            state.alternate_extensions(&[&wider]).unwrap_err(),
            VividError::NotStrictExtension { index: 0 }
        ));
    }

    #[test]
    fn add_object_extends_every_attribute() {
        let mut state = State::with_ascriptions(system(), [(("hour", "s1"), ints(&[2]))]).unwrap();
        state.add_object("s3").unwrap();

        assert_eq!(state.keys().count(), 6);
        assert_eq!(
            state.ascription(&("minute", "s3").into()).unwrap(),
            &range(0, 1)
        );
        assert!(state.add_object("s3").unwrap_err().is_duplicate_object());
        assert_eq!(state.ascription(&("hour", "s1").into()).unwrap(), &ints(&[2]));
    }
}
