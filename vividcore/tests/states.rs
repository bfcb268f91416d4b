use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use vividcore::{Attribute, AttributeStructure, AttributeSystem, EngineConfig, State, VividError};
use vividset::{Discretization, Interval, Value, ValueSet};

// Helpers

fn system() -> Arc<AttributeSystem> {
    let structure = AttributeStructure::new(
        [
            Attribute::new("hue", Value::from(Interval::int(0, 3).unwrap())).unwrap(),
            Attribute::new("size", Value::from(Interval::int(0, 2).unwrap())).unwrap(),
            Attribute::new(
                "shape",
                ValueSet::new(["circle", "square", "triangle"].map(Value::from)),
            )
            .unwrap(),
        ],
        [],
    )
    .unwrap();
    Arc::new(AttributeSystem::new(structure, ["o1", "o2"]).unwrap())
}

/// Narrow some ascriptions of `state` to random non-empty subsets.
fn refine(state: &State, rng: &mut impl Rng) -> State {
    let discretization = Discretization::default();
    let mut refined = state.clone();
    let keys: Vec<_> = state.keys().cloned().collect();

    for key in keys {
        if !rng.random_bool(0.4) {
            continue;
        }
        let values: Vec<Value> = state
            .ascription(&key)
            .unwrap()
            .discretize(&discretization)
            .unwrap()
            .collect();
        let mut kept: Vec<Value> = values.iter().filter(|_| rng.random_bool(0.5)).cloned().collect();
        if kept.is_empty() {
            kept.push(values[rng.random_range(0..values.len())].clone());
        }
        refined.set_ascription(key, ValueSet::new(kept)).unwrap();
    }
    refined
}

#[test]
fn extension_is_a_partial_order() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x5eed);
    let top = State::new(system());

    for _ in 0..64 {
        let a = refine(&top, &mut rng);
        let b = refine(&a, &mut rng);
        let c = refine(&b, &mut rng);

        for s in [&a, &b, &c] {
            assert!(s.is_extension_of(s).unwrap());
            assert!(!s.is_strict_extension_of(s).unwrap());
        }
        assert!(b.is_extension_of(&a).unwrap());
        assert!(c.is_extension_of(&b).unwrap());
        assert!(c.is_extension_of(&a).unwrap());

        if b.is_strict_extension_of(&a).unwrap() && c.is_strict_extension_of(&b).unwrap() {
            assert!(c.is_strict_extension_of(&a).unwrap());
            assert!(!a.is_extension_of(&c).unwrap());
        }
    }
}

#[test]
fn world_count_matches_the_enumeration() {
    let discretization = Discretization::default();
    let mut state = State::new(system());
    state.set_ascription(("hue", "o1"), Value::Int(2)).unwrap();

    // hue(o2) * size(o1) * size(o2) * shape(o1) * shape(o2)
    let expected = 4 * 3 * 3 * 3 * 3;
    assert_eq!(state.world_count(&discretization).unwrap(), expected);

    let worlds: Vec<_> = state.worlds(&discretization).unwrap().collect();
    assert_eq!(worlds.len() as u128, expected);
    for world in &worlds {
        assert!(world.is_world());
        assert!(world.is_extension_of(&state).unwrap());
    }
}

#[test]
fn alternate_extensions_avoid_every_case() {
    let mut rng = ChaCha20Rng::seed_from_u64(0xa17);
    let top = State::new(system());
    let mut checked = 0;

    for _ in 0..64 {
        let base = refine(&top, &mut rng);
        let cases: Vec<State> = (0..rng.random_range(1..=3))
            .map(|_| refine(&base, &mut rng))
            .filter(|case| case.is_strict_extension_of(&base).unwrap())
            .collect();
        if cases.is_empty() {
            continue;
        }
        let cases: Vec<&State> = cases.iter().collect();

        for alternate in base.alternate_extensions(&cases).unwrap() {
            checked += 1;
            assert!(alternate.is_strict_extension_of(&base).unwrap());
            for case in &cases {
                assert!(alternate.is_disjoint(case).unwrap());
            }
        }
    }
    assert!(checked > 0);
}

#[test]
fn alternate_extensions_never_fail_silently() {
    let base = State::new(system());
    assert!(matches!(
        base.alternate_extensions(&[]).unwrap_err(),
        VividError::NoCases
    ));

    let mut narrow = base.clone();
    narrow.set_ascription(("size", "o2"), Value::Int(0)).unwrap();
    assert!(matches!(
        narrow.alternate_extensions(&[&base]).unwrap_err(),
        VividError::NotStrictExtension { index: 0 }
    ));
    assert!(matches!(
        base.alternate_extensions(&[&narrow, &base]).unwrap_err(),
        VividError::NotStrictExtension { index: 1 }
    ));
}

#[test]
fn budgets_bound_the_enumeration() {
    let mut config = EngineConfig::default();
    config.budget.max_worlds = Some(5);
    let state = State::new(system());

    let results: Vec<_> = config
        .budgeted(state.worlds(&config.discretization).unwrap(), vividcore::utils::budget::BudgetKind::Worlds)
        .collect();
    assert_eq!(results.len(), 6);
    assert!(results[..5].iter().all(Result::is_ok));
    assert!(results[5].as_ref().unwrap_err().is_budget_exhausted());
}
