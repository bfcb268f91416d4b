use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use vividcore::{
    Attribute, AttributeStructure, AttributeSystem, ConstantAssignment, EngineConfig, Formula,
    Interpretation, NamedState, Relation, RelationSymbol, State, VariableAssignment, Vocabulary,
};
use vividset::{Interval, Value, ValueSet};

fn build_system() -> Arc<AttributeSystem> {
    let structure = AttributeStructure::new(
        [
            Attribute::new("hour", Value::from(Interval::int(1, 12).unwrap())).unwrap(),
            Attribute::new("minute", Value::from(Interval::int(0, 59).unwrap())).unwrap(),
        ],
        [Relation::new(
            "R1(h1, m1, h2, m2) <=> h1 > h2 or (h1 == h2 and m1 > m2)",
            1,
            ["hour", "minute", "hour", "minute"],
        )
        .unwrap()],
    )
    .unwrap();
    Arc::new(AttributeSystem::new(structure, ["s1", "s2", "s3"]).unwrap())
}

/// A state narrowing every ascription to a few random values. Seeded for
/// determinism.
fn build_state(system: &Arc<AttributeSystem>, width: usize) -> State {
    let mut rng = ChaCha20Rng::seed_from_u64(0x42);
    let mut state = State::new(system.clone());
    let keys: Vec<_> = state.keys().cloned().collect();

    for key in keys {
        let sup = if key.label() == "hour" { 12 } else { 59 };
        let inf = if key.label() == "hour" { 1 } else { 0 };
        let values: ValueSet = (0..width)
            .map(|_| Value::Int(rng.random_range(inf..=sup)))
            .collect();
        state.set_ascription(key, values).unwrap();
    }
    state
}

fn bench_worlds(c: &mut Criterion) {
    let system = build_system();
    let config = EngineConfig::default();
    let state = build_state(&system, 3);

    c.bench_function("world_count", |b| {
        b.iter(|| {
            black_box(state.world_count(&config.discretization).unwrap());
        })
    });

    c.bench_function("worlds_enumerate", |b| {
        b.iter(|| {
            black_box(state.worlds(&config.discretization).unwrap().count());
        })
    });
}

fn bench_alternates(c: &mut Criterion) {
    let system = build_system();
    let base = build_state(&system, 4);

    // Each case pins one ascription of the base to its first value.
    let cases: Vec<State> = base
        .ascriptions()
        .filter(|(_, values)| !values.is_singleton())
        .map(|(key, values)| {
            let mut case = base.clone();
            let first = values.iter().next().cloned().unwrap();
            case.set_ascription(key.clone(), first).unwrap();
            case
        })
        .collect();
    let cases: Vec<&State> = cases.iter().collect();

    c.bench_function("alternate_extensions", |b| {
        b.iter(|| {
            black_box(base.alternate_extensions(&cases).unwrap().count());
        })
    });
}

fn bench_truth_value(c: &mut Criterion) {
    let system = build_system();
    let config = EngineConfig::default();

    let vocabulary = Vocabulary::new(
        ["c1", "c2"],
        [RelationSymbol::new("Ahead", 2)],
        Vec::<String>::new(),
    )
    .unwrap()
    .into_shared();
    let mut interpretation = Interpretation::new(vocabulary.clone());
    interpretation
        .insert(
            system.structure(),
            "Ahead",
            1,
            [("hour", 1), ("minute", 1), ("hour", 2), ("minute", 2)],
        )
        .unwrap();

    let assignment =
        ConstantAssignment::new(vocabulary.clone(), [("c1", "s1"), ("c2", "s2")]).unwrap();
    let named = NamedState::new(build_state(&system, 3), assignment).unwrap();
    let formula = Formula::new(vocabulary.clone(), "Ahead", ["c1", "c2"]).unwrap();
    let variables = VariableAssignment::empty(vocabulary);

    c.bench_function("assign_truth_value", |b| {
        b.iter(|| {
            black_box(
                formula
                    .assign_truth_value(&interpretation, &named, &variables, &config)
                    .unwrap(),
            );
        })
    });
}

criterion_group!(benches, bench_worlds, bench_alternates, bench_truth_value);
criterion_main!(benches);
