use std::{io, io::Read, path::PathBuf};

use float_pretty_print::PrettyPrintFloat;
use hdl_grover::{
    engine::StateVectorEngine,
    pipeline::{Compiled, GroverSearch, compile},
    report::{observed_success_rate, top_outcome},
    text::ToDoc,
};
use miette::{IntoDiagnostic, NamedSource, Report};
use tracing_subscriber::EnvFilter;

/// Widest plan for which `--print-unitary` prints a matrix
const MAX_PRINTED_QUBITS: usize = 6;

/// Compile an HDL boolean assignment into a Grover search and run it
#[derive(clap::Parser)]
struct Args {
    /// File containing the assignment; read from stdin if absent
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Number of measurement shots
    #[arg(long, env = "HDL_GROVER_SHOTS", default_value_t = 1024)]
    shots: u64,

    /// Seed for the measurement sampler
    #[arg(long)]
    seed: Option<u64>,

    /// Largest circuit the simulator will run
    #[arg(long, default_value_t = StateVectorEngine::DEFAULT_MAX_QUBITS)]
    max_qubits: usize,

    /// Print the assembled circuit
    #[arg(long)]
    print_circuit: bool,

    /// Print the unitary of the circuit (small circuits only)
    #[arg(long)]
    print_unitary: bool,

    /// Log stage details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
}

fn print_unitary(search: &GroverSearch) {
    if search.circuit.qubits() > MAX_PRINTED_QUBITS {
        println!(
            "Unitary omitted: {} qubits exceeds the display limit of {MAX_PRINTED_QUBITS}",
            search.circuit.qubits()
        );
        return;
    }
    let Some(unitary) = search.circuit.to_unitary() else {
        return;
    };
    println!("Unitary:");
    for x in unitary.row_iter() {
        println!(
            "[ {} ]",
            x.iter()
                .map(|x| {
                    match (x.re.abs() > 0.000001, x.im.abs() > 0.000001) {
                        (false, false) => "0.0".to_owned(),
                        (true, false) => format!("{}", PrettyPrintFloat(x.re)),
                        (false, true) => format!("{}i", PrettyPrintFloat(x.im)),
                        (true, true) => {
                            format!("{} + {}i", PrettyPrintFloat(x.re), PrettyPrintFloat(x.im))
                        }
                    }
                })
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

fn run(args: &Args, search: &GroverSearch) -> miette::Result<()> {
    let m = search.oracle.solution_count();
    println!("Target: {}", search.target);
    println!("Expression: {}", search.expr.to_doc(&search.variables).pretty(80));
    println!("Variables: {}", search.variables);
    println!("Qubits: {}", search.circuit.qubits());
    println!("Solutions: {m} of {}", search.oracle.len());
    println!("Iterations: {}", search.iterations);
    println!(
        "Theoretical success probability: {}",
        PrettyPrintFloat(search.success_probability())
    );

    if args.print_circuit {
        println!("{}", search.circuit.to_doc().pretty(80));
        let counts = search
            .circuit
            .operation_counts()
            .into_iter()
            .map(|(kind, n)| format!("{kind}: {n}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("Operation counts: {counts}");
    }
    if args.print_unitary {
        print_unitary(search);
    }

    let mut engine = StateVectorEngine::new().with_max_qubits(args.max_qubits);
    if let Some(seed) = args.seed {
        engine = engine.with_seed(seed);
    }
    let counts = search.run(&engine, args.shots)?;

    if let Some(top) = top_outcome(&counts, &search.variables, &search.oracle) {
        let assignment = top
            .assignment
            .iter()
            .map(|(name, value)| format!("{name}={}", u8::from(*value)))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "Most frequent: {} ({} of {} shots){}",
            top.bitstring,
            top.count,
            counts.total(),
            if top.is_solution { "" } else { " [not a solution]" }
        );
        println!("Assignment: {assignment}");
    }
    println!("Counts:");
    for (bits, n) in counts.by_frequency() {
        println!("  {bits:>width$}: {n}", width = search.variables.len());
    }
    println!(
        "Observed success rate: {}",
        PrettyPrintFloat(observed_success_rate(&counts, &search.oracle))
    );
    Ok(())
}

fn main() -> miette::Result<()> {
    let args: Args = clap::Parser::parse();
    init_tracing(args.verbose);

    let (name, src) = if let Some(path) = &args.file {
        (
            path.display().to_string(),
            std::fs::read_to_string(path).into_diagnostic()?,
        )
    } else {
        let mut s = String::new();
        io::stdin().read_to_string(&mut s).into_diagnostic()?;
        ("<stdin>".to_owned(), s)
    };

    let compiled =
        compile(&src).map_err(|e| Report::new(e).with_source_code(NamedSource::new(name, src)))?;
    match compiled {
        Compiled::Unsatisfiable { target, variables } => {
            println!("No assignment of {variables} satisfies the expression for {target}.");
            println!("Nothing to search for.");
            Ok(())
        }
        Compiled::Search(search) => run(&args, &search),
    }
}
