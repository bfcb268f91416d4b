use std::{path::PathBuf, sync::Arc};

use clap::Parser as ClapParser;
use log::info;
use vividcore::{
    AssumptionBase, Attribute, AttributeStructure, AttributeSystem, ConstantAssignment, Context,
    EngineConfig, Formula, Interpretation, NamedState, Relation, RelationSymbol, State,
    VariableAssignment, VividResult, Vocabulary, VocabularyRef, rules,
};
use vividset::{Interval, Value, ValueSet};

/// Reason about two clocks: is the first one ahead of the second?
#[derive(ClapParser)]
pub struct Arguments {
    /// Engine configuration file (TOML); defaults to the user configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Candidate hours of the first clock
    #[arg(long, value_delimiter = ',', default_values_t = [4, 5, 6])]
    hours: Vec<i64>,

    /// Hour the first clock is thinned to
    #[arg(long, default_value_t = 6)]
    thin_to: i64,
}

struct Clocks {
    vocabulary: VocabularyRef,
    system: Arc<AttributeSystem>,
    interpretation: Interpretation,
}

fn clocks() -> VividResult<Clocks> {
    let structure = AttributeStructure::new(
        [
            Attribute::new("hour", Value::from(Interval::int(1, 12)?))?,
            Attribute::new("minute", Value::from(Interval::int(0, 59)?))?,
        ],
        [Relation::new(
            "R1(h1, m1, h2, m2) <=> h1 > h2 or (h1 == h2 and m1 > m2)",
            1,
            ["hour", "minute", "hour", "minute"],
        )?],
    )?;

    let vocabulary = Vocabulary::new(
        ["c1", "c2"],
        [RelationSymbol::new("Ahead", 2)],
        Vec::<String>::new(),
    )?
    .into_shared();

    let mut interpretation = Interpretation::new(vocabulary.clone());
    interpretation.insert(
        &structure,
        "Ahead",
        1,
        [("hour", 1), ("minute", 1), ("hour", 2), ("minute", 2)],
    )?;

    Ok(Clocks {
        vocabulary,
        system: Arc::new(AttributeSystem::new(structure, ["s1", "s2"])?),
        interpretation,
    })
}

impl Clocks {
    /// The first clock reads `hours`:28, the second 5:45.
    fn diagram(&self, hours: &[i64]) -> VividResult<NamedState> {
        let hours: ValueSet = hours.iter().map(|&h| Value::Int(h)).collect();
        let state = State::with_ascriptions(
            self.system.clone(),
            [
                (("hour", "s1"), hours),
                (("minute", "s1"), ValueSet::single(28)),
                (("hour", "s2"), ValueSet::single(5)),
                (("minute", "s2"), ValueSet::single(45)),
            ],
        )?;
        let assignment =
            ConstantAssignment::new(self.vocabulary.clone(), [("c1", "s1"), ("c2", "s2")])?;
        NamedState::new(state, assignment)
    }
}

fn run(args: &Arguments) -> VividResult<()> {
    let config = match &args.config {
        Some(path) => EngineConfig::load_from_toml(path)?,
        None => EngineConfig::load_or_default()?,
    };

    let clocks = clocks()?;
    let ahead = Formula::new(clocks.vocabulary.clone(), "Ahead", ["c1", "c2"])?;
    let assumptions = AssumptionBase::new(clocks.vocabulary.clone(), [ahead.clone()])?;
    let context = Context::new(assumptions.clone(), clocks.diagram(&args.hours)?)?;
    info!("context: {context}");

    let variables = VariableAssignment::empty(clocks.vocabulary.clone());
    let truth = ahead.assign_truth_value(
        &clocks.interpretation,
        context.named_state(),
        &variables,
        &config,
    )?;
    println!("{ahead} in the diagram: {truth}");

    let observed = rules::observe(&context, &ahead, &clocks.interpretation, &config)?;
    println!("observe {ahead}: {observed}");

    let target = clocks.diagram(&[args.thin_to])?;
    let thinned = rules::thinning(
        &context,
        &target,
        Some(&assumptions),
        Some(&clocks.interpretation),
        &config,
    )?;
    println!("thinning to {target}: {thinned}");

    let absurd = rules::sentential_absurdity(
        &context,
        &ahead,
        &clocks.interpretation,
        None,
        &config,
    )?;
    println!("absurd: {absurd}");
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Arguments::parse();

    if let Err(error) = run(&args) {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}
