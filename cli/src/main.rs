mod formatter;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use formatter::Formatter;
use relsynth::{
    DefaultRanking, DisjunctiveSpec, Domain, Example, LatticeSearch, Operator, Oracle,
    PropertyCatalog, Ranking, ResolvedSlots, SearchReport, SubstringOracle, SynthesisConfig,
    SynthesisOutcome, TieBreak, TreeOracle, Value, ValueKind, WitnessRegistry,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "relsynth")]
#[command(about = "Programming by example with witness rules and relational properties.")]
#[command(
    long_about = "relsynth learns string-extraction programs from input/output examples.\nIt strengthens the examples with relational properties (perturbations a correct program\nmust tolerate) and searches for the largest combination the synthesizer can still satisfy."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a program from a file of examples
    ///
    /// The file holds a JSON array of {"input": ..., "output": ...} objects.
    /// String inputs learn substring programs; tree inputs with list outputs
    /// learn node-selection programs. Without -p or --all-properties the
    /// examples are used as they are.
    Synth {
        /// JSON file with the examples
        examples: PathBuf,
        /// Relational property to consider (repeatable)
        ///
        /// Examples: -p prefix-invariant -p suffix-invariant
        #[arg(short = 'p', long = "property", value_name = "NAME")]
        properties: Vec<String>,
        /// Consider every property in the catalog
        #[arg(long, conflicts_with = "properties")]
        all_properties: bool,
        /// Budget in milliseconds for each oracle call
        #[arg(long, value_name = "N")]
        timeout_ms: Option<u64>,
        /// Seed for perturbation and the seeded tie-break
        #[arg(long, value_name = "N")]
        seed: Option<u64>,
        /// How to pick among equally large combinations
        /// (lexicographic, oracle-score, seeded)
        #[arg(long, value_name = "POLICY")]
        tie_break: Option<String>,
        /// JSON file with synthesis settings; flags override it
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Number of programs to show
        #[arg(long, default_value = "5")]
        top: usize,
        /// Print programs and the search report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run one witness rule and print the candidate arguments
    ///
    /// Every JSON argument is an array with one entry per input state.
    ///
    /// Example:
    ///   relsynth invert Split 1 --input '["1270 ab"]' --output '[["1270","ab"]]' --resolved '0=["1270 ab"]'
    Invert {
        /// Operator name, e.g. Split or SubstringPP
        operator: String,
        /// Argument slot to invert
        slot: usize,
        /// Example inputs, one per state
        #[arg(long, value_name = "JSON")]
        input: String,
        /// Required operator outputs, one per state
        #[arg(long, value_name = "JSON")]
        output: String,
        /// Values already chosen for another slot (format: SLOT=JSON)
        #[arg(long, value_name = "SLOT=JSON")]
        resolved: Vec<String>,
        /// JSON file with synthesis settings
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the relational properties in the catalog
    Properties,
    /// List operators with their argument slots and rule dependencies
    Operators,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Synth {
            examples,
            properties,
            all_properties,
            timeout_ms,
            seed,
            tie_break,
            config,
            top,
            json,
        } => {
            let overrides = Overrides {
                timeout_ms,
                seed,
                tie_break,
            };
            synth_command(
                &examples,
                &properties,
                all_properties,
                config.as_deref(),
                overrides,
                top,
                json,
            )
        }
        Commands::Invert {
            operator,
            slot,
            input,
            output,
            resolved,
            config,
            json,
        } => invert_command(
            &operator,
            slot,
            &input,
            &output,
            &resolved,
            config.as_deref(),
            json,
        ),
        Commands::Properties => properties_command(),
        Commands::Operators => operators_command(),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "relsynth=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

struct Overrides {
    timeout_ms: Option<u64>,
    seed: Option<u64>,
    tie_break: Option<String>,
}

fn load_config(path: Option<&Path>) -> Result<SynthesisConfig> {
    let Some(path) = path else {
        return Ok(SynthesisConfig::default());
    };
    let source = fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;
    let config = SynthesisConfig::from_json_str(&source)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    Ok(config)
}

fn apply_overrides(config: &mut SynthesisConfig, overrides: Overrides) -> Result<()> {
    if let Some(ms) = overrides.timeout_ms {
        config.oracle_timeout_ms = ms;
        config.final_timeout_ms = ms;
    }
    if let Some(seed) = overrides.seed {
        config.seed = seed;
    }
    if let Some(policy) = overrides.tie_break {
        config.tie_break = policy.parse::<TieBreak>()?;
    }
    config.validate()?;
    Ok(())
}

fn synth_command(
    examples_path: &Path,
    property_names: &[String],
    all_properties: bool,
    config_path: Option<&Path>,
    overrides: Overrides,
    top: usize,
    json: bool,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    apply_overrides(&mut config, overrides)?;

    let source = fs::read_to_string(examples_path)
        .with_context(|| format!("cannot read examples file {}", examples_path.display()))?;
    let examples = parse_examples(&source)?;
    if examples.is_empty() {
        bail!("{} contains no examples", examples_path.display());
    }

    let catalog = PropertyCatalog::standard();
    let candidates = if all_properties {
        (0..catalog.len()).collect()
    } else {
        catalog.select(property_names)?
    };

    let trees = examples.iter().all(|e| e.input.as_node().is_some());
    info!(
        examples = examples.len(),
        properties = candidates.len(),
        domain = if trees { "tree" } else { "text" },
        "starting synthesis"
    );
    let run = SearchRun {
        catalog,
        config,
        examples: &examples,
        candidates: &candidates,
        top,
        json,
    };
    if trees {
        let oracle = TreeOracle::new(&run.config)?;
        run.execute(oracle)
    } else {
        let oracle = SubstringOracle::new(&run.config)?;
        run.execute(oracle)
    }
}

/// One lattice search, printed in the requested format.
struct SearchRun<'a> {
    catalog: PropertyCatalog,
    config: SynthesisConfig,
    examples: &'a [Example],
    candidates: &'a [usize],
    top: usize,
    json: bool,
}

impl SearchRun<'_> {
    fn execute<O>(self, oracle: O) -> Result<()>
    where
        O: Oracle,
        O::Program: Serialize,
        DefaultRanking: Ranking<O::Program>,
    {
        let search = LatticeSearch::new(oracle, DefaultRanking, self.catalog, self.config);
        let outcome = search.run_with(self.examples, self.candidates);
        let report = outcome.report();
        info!(
            oracle_calls = report.oracle_calls(),
            applicable = report.applicable.len(),
            chosen = report.chosen.len(),
            "search finished"
        );
        if report.fell_back {
            debug!("chosen combination failed; fell back to the plain examples");
        }

        let formatter = Formatter::default();
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&SynthesisJson::new(&outcome, self.top))?
            );
        } else {
            if let Some(programs) = outcome.programs() {
                print!("{}", formatter.format_programs(programs, self.top));
                println!();
            }
            print!("{}", formatter.format_report(report));
        }

        if !outcome.is_synthesized() {
            bail!("no program is consistent with the examples");
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct SynthesisJson<'a, P> {
    synthesized: bool,
    programs: Vec<ProgramJson<'a, P>>,
    report: &'a SearchReport,
}

#[derive(Serialize)]
struct ProgramJson<'a, P> {
    text: String,
    score: f64,
    program: &'a P,
}

impl<'a, P: std::fmt::Display> SynthesisJson<'a, P> {
    fn new(outcome: &'a SynthesisOutcome<P>, top: usize) -> Self {
        let programs = outcome
            .programs()
            .map(|set| {
                set.iter()
                    .take(top)
                    .map(|ranked| ProgramJson {
                        text: ranked.program.to_string(),
                        score: ranked.score,
                        program: &ranked.program,
                    })
                    .collect()
            })
            .unwrap_or_default();
        SynthesisJson {
            synthesized: outcome.is_synthesized(),
            programs,
            report: outcome.report(),
        }
    }
}

/// Examples are `{"input": ..., "output": ...}` objects. A string input is
/// text and an object input is a tree; a string output is a string and an
/// array output is a list of strings.
fn parse_examples(source: &str) -> Result<Vec<Example>> {
    let document: serde_json::Value =
        serde_json::from_str(source).context("examples file is not valid JSON")?;
    let items = document
        .as_array()
        .ok_or_else(|| anyhow!("examples file must hold a JSON array"))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let input = item
                .get("input")
                .ok_or_else(|| anyhow!("example {} has no \"input\"", i))?;
            let output = item
                .get("output")
                .ok_or_else(|| anyhow!("example {} has no \"output\"", i))?;
            let input_kind = if input.is_object() {
                ValueKind::Node
            } else {
                ValueKind::Str
            };
            let output_kind = if output.is_array() {
                ValueKind::StrList
            } else {
                ValueKind::Str
            };
            Ok(Example {
                input: Value::from_json(input_kind, input)
                    .with_context(|| format!("example {} input", i))?,
                output: Value::from_json(output_kind, output)
                    .with_context(|| format!("example {} output", i))?,
            })
        })
        .collect()
}

fn invert_command(
    operator_name: &str,
    slot: usize,
    input: &str,
    output: &str,
    resolved: &[String],
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let operator: Operator = operator_name.parse()?;
    let params = operator.params();
    if slot >= params.len() {
        bail!(
            "{} has {} argument(s); slot {} does not exist",
            operator,
            params.len(),
            slot
        );
    }

    let input_kind = match operator.domain() {
        Domain::Text => ValueKind::Str,
        Domain::Tree => ValueKind::Node,
    };
    let inputs = parse_states(input_kind, input).context("--input")?;
    let outputs = parse_states(operator.result(), output).context("--output")?;
    if inputs.len() != outputs.len() {
        bail!(
            "--input has {} state(s) but --output has {}",
            inputs.len(),
            outputs.len()
        );
    }

    let mut slots = ResolvedSlots::new();
    for binding in resolved {
        let (slot_text, values) = binding
            .split_once('=')
            .ok_or_else(|| anyhow!("--resolved expects SLOT=JSON, got '{}'", binding))?;
        let bound: usize = slot_text
            .trim()
            .parse()
            .with_context(|| format!("invalid slot '{}' in --resolved", slot_text))?;
        let kind = params
            .get(bound)
            .copied()
            .ok_or_else(|| anyhow!("{} has no slot {}", operator, bound))?;
        let values = parse_states(kind, values).with_context(|| format!("--resolved {}", bound))?;
        slots.bind(bound, values);
    }

    let registry = WitnessRegistry::standard(&config)?;
    let result = registry.invert(
        operator,
        slot,
        &inputs,
        &DisjunctiveSpec::exact(outputs),
        &slots,
    );

    if json {
        let value = match result.candidates() {
            Some(spec) => serde_json::json!({ "feasible": true, "candidates": spec }),
            None => serde_json::json!({ "feasible": false, "reason": result.reason() }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        let formatter = Formatter::default();
        print!("{}", formatter.format_inversion(operator, slot, &result));
    }
    Ok(())
}

/// A JSON array with one value of `kind` per input state.
fn parse_states(kind: ValueKind, source: &str) -> Result<Vec<Value>> {
    let document: serde_json::Value = serde_json::from_str(source).context("not valid JSON")?;
    let items = document
        .as_array()
        .ok_or_else(|| anyhow!("expected a JSON array with one entry per input state"))?;
    items
        .iter()
        .map(|item| Value::from_json(kind, item).map_err(anyhow::Error::from))
        .collect()
}

fn properties_command() -> Result<()> {
    let catalog = PropertyCatalog::standard();
    let formatter = Formatter::default();
    print!("{}", formatter.format_properties(&catalog));
    Ok(())
}

fn operators_command() -> Result<()> {
    let registry = WitnessRegistry::standard(&SynthesisConfig::default())?;
    let formatter = Formatter::default();
    print!("{}", formatter.format_operators(&registry));
    Ok(())
}
