use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use num_complex::Complex64;
use qubitlab::bloch::{bloch_point, BlochPoint};
use qubitlab::config::SessionConfig;
use qubitlab::error::{Result, SimError};
use qubitlab::gates::{GateTable, HadamardForm};
use qubitlab::linalg::{try_normalize, StateVector};
use qubitlab::random::{self, Counts, Outcome};
use qubitlab::runtime::{run_circuit, Circuit, Session};
use qubitlab::shell::Shell;
use qubitlab::visualizer;
use rand::Rng;
use serde::Serialize;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

// shots per progress bar tick in `sample`
const SAMPLE_BATCH: u64 = 100_000;

#[derive(Parser, Debug)]
#[command(name = "qubitlab", version,
    about = "qubitlab - single qubit simulator: apply gates, step through circuits, \
             measure, and see the state on the bloch sphere.",
    long_about = None)]
struct Cli {
    /// Seed for measurement randomness (overrides the config file).
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Use the textbook hadamard [[1,1],[1,-1]]/sqrt2 instead of the shipped one.
    #[arg(long, global = true)]
    textbook_hadamard: bool,
    /// JSON config file with seed, hadamard and precision.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Decimal places for printed numbers.
    #[arg(long, global = true)]
    precision: Option<usize>,
    /// Enable debug logging (RUST_LOG still wins).
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lists the gate table.
    Gates,
    /// Runs a circuit from |0> and prints every step.
    Run {
        /// Gate names in application order, e.g. `H S T`.
        gates: Vec<String>,
        /// Measure the final state.
        #[arg(long)]
        measure: bool,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
        /// Draw the final state on the ascii bloch sphere.
        #[arg(long)]
        sphere: bool,
    },
    /// Projects the given amplitudes (normalized first) onto the bloch sphere.
    Bloch {
        #[arg(allow_negative_numbers = true)]
        re0: f64,
        #[arg(allow_negative_numbers = true)]
        im0: f64,
        #[arg(allow_negative_numbers = true)]
        re1: f64,
        #[arg(allow_negative_numbers = true)]
        im1: f64,
        #[arg(long)]
        json: bool,
    },
    /// Runs a circuit and histograms repeated measurements of the final state.
    Sample {
        gates: Vec<String>,
        #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
        shots: u64,
    },
    /// Interactive session reading commands from stdin.
    Shell,
}

#[derive(Serialize)]
struct StepReport<'a> {
    gate: &'a str,
    state: StateVector,
    probabilities: [f64; 2],
    bloch: BlochPoint,
}

#[derive(Serialize)]
struct RunReport<'a> {
    hadamard: HadamardForm,
    circuit: &'a Circuit,
    steps: Vec<StepReport<'a>>,
    final_state: StateVector,
    bloch: BlochPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<Outcome>,
}

fn load_config(cli: &Cli) -> Result<SessionConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("loading config from {}", path.display());
            SessionConfig::from_file(path)?
        }
        None => SessionConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.textbook_hadamard {
        config.hadamard = HadamardForm::Textbook;
    }
    if let Some(p) = cli.precision {
        config.precision = p;
    }
    config.validate()?;
    debug!("effective config: {:?}", config);
    Ok(config)
}

// stores the table's own spelling, so `h` and `H` build the same circuit
fn build_circuit(table: &GateTable, gates: &[String]) -> Result<Circuit> {
    gates
        .iter()
        .map(|g| table.require(g).map(|gate| gate.name))
        .collect()
}

fn cmd_gates(config: &SessionConfig) {
    let table = config.gate_table();
    println!("gate table ({:?} hadamard):", table.form());
    for gate in table.iter() {
        let m = &gate.matrix.0;
        println!(
            "  {:<2} {:<16} [[{}, {}], [{}, {}]]{}",
            gate.name,
            gate.description,
            visualizer::amplitude_string(m[0][0], config.precision),
            visualizer::amplitude_string(m[0][1], config.precision),
            visualizer::amplitude_string(m[1][0], config.precision),
            visualizer::amplitude_string(m[1][1], config.precision),
            if gate.is_unitary(1e-9) { "" } else { "  (not unitary)" }
        );
    }
}

fn cmd_run(config: &SessionConfig, gates: &[String], measure: bool, json: bool, sphere: bool) -> Result<()> {
    let table = config.gate_table();
    let circuit = build_circuit(&table, gates)?;
    let (final_state, history) = run_circuit(&table, &circuit);

    let outcome = if measure {
        let mut rng = config.rng();
        Some(random::measure(&final_state, &mut rng).0)
    } else {
        None
    };

    if json {
        let report = RunReport {
            hadamard: table.form(),
            circuit: &circuit,
            steps: history
                .iter()
                .map(|e| StepReport {
                    gate: &e.gate,
                    state: e.state,
                    probabilities: e.state.probabilities(),
                    bloch: bloch_point(&e.state),
                })
                .collect(),
            final_state,
            bloch: bloch_point(&final_state),
            outcome,
        };
        serde_json::to_writer_pretty(io::stdout().lock(), &report)?;
        println!();
        return Ok(());
    }

    let p = config.precision;
    println!("circuit: {}", visualizer::circuit_string(&circuit));
    print!("{}", visualizer::render_history(&history, p));
    println!("\nfinal state:");
    print!("{}", visualizer::render_amplitudes(&final_state, p));
    print!("{}", visualizer::render_bloch(&bloch_point(&final_state), p));
    if sphere {
        print!("{}", visualizer::render_sphere(&bloch_point(&final_state)));
    }
    if let Some(o) = outcome {
        println!("{}", visualizer::render_outcome(Some(o)));
    }
    Ok(())
}

fn cmd_bloch(config: &SessionConfig, amps: [f64; 4], json: bool) -> Result<()> {
    let [re0, im0, re1, im1] = amps;
    let raw = StateVector::new(Complex64::new(re0, im0), Complex64::new(re1, im1));
    if !raw.is_finite() {
        return Err(SimError::InvalidAmplitudes("amplitudes must be finite".to_string()));
    }
    let state = try_normalize(&raw)
        .map_err(|_| SimError::InvalidAmplitudes("both amplitudes are zero".to_string()))?;
    let point = bloch_point(&state);
    if json {
        serde_json::to_writer_pretty(io::stdout().lock(), &point)?;
        println!();
    } else {
        print!("{}", visualizer::render_amplitudes(&state, config.precision));
        print!("{}", visualizer::render_bloch(&point, config.precision));
    }
    Ok(())
}

fn cmd_sample(config: &SessionConfig, gates: &[String], shots: u64) -> Result<()> {
    let table = config.gate_table();
    let circuit = build_circuit(&table, gates)?;
    let (state, _) = run_circuit(&table, &circuit);
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());

    let bar = ProgressBar::new(shots);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} shots ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let mut counts = Counts::default();
    let mut done = 0u64;
    let mut batch = 0u64;
    while done < shots {
        let n = SAMPLE_BATCH.min(shots - done);
        let c = random::sample_counts(&state, n, seed.wrapping_add(batch));
        counts.zeros += c.zeros;
        counts.ones += c.ones;
        done += n;
        batch += 1;
        bar.inc(n);
    }
    bar.finish_and_clear();

    let p = config.precision;
    let [p0, p1] = state.probabilities();
    println!("circuit: {}", visualizer::circuit_string(&circuit));
    println!("seed: {}", seed);
    println!(
        "0: {:>10} ({:.p$}, expected {:.p$})",
        counts.zeros,
        counts.frequency_zero(),
        p0,
        p = p
    );
    println!(
        "1: {:>10} ({:.p$}, expected {:.p$})",
        counts.ones,
        counts.frequency_one(),
        p1,
        p = p
    );
    Ok(())
}

fn cmd_shell(config: &SessionConfig) -> Result<()> {
    let session = Session::new(config);
    let mut shell = Shell::new(session, config.precision);
    let stdin = io::stdin();
    let prompt = stdin.is_terminal();
    if prompt {
        println!("qubitlab shell, type 'help' for commands");
    }
    shell.run(stdin.lock(), &mut io::stdout().lock(), prompt)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    match cli.command {
        Commands::Gates => {
            cmd_gates(&config);
            Ok(())
        }
        Commands::Run {
            gates,
            measure,
            json,
            sphere,
        } => cmd_run(&config, &gates, measure, json, sphere),
        Commands::Bloch {
            re0,
            im0,
            re1,
            im1,
            json,
        } => cmd_bloch(&config, [re0, im0, re1, im1], json),
        Commands::Sample { gates, shots } => cmd_sample(&config, &gates, shots),
        Commands::Shell => cmd_shell(&config),
    }
}

fn main() -> std::result::Result<(), String> {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    run(cli).map_err(|e| e.to_string())
}
