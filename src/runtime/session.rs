use crate::bloch::{bloch_point, BlochPoint};
use crate::config::SessionConfig;
use crate::gates::GateTable;
use crate::linalg::StateVector;
use crate::random::{self, Outcome};
use crate::runtime::circuit::{self, Circuit, HistoryEntry};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// At |0> with nothing applied since the last clear
    Idle,
    /// Some gate or replay has moved the state
    Evolved,
    /// Collapsed by a measurement
    Measured,
}

/// One interactive simulator session: current state, the circuit being built, the last
/// replay's history and the last measurement outcome.
///
/// The session never calls out to whatever renders it; front ends read the accessors
/// after each mutation.
pub struct Session<R: Rng = StdRng> {
    table: GateTable,
    state: StateVector,
    circuit: Circuit,
    history: Vec<HistoryEntry>,
    outcome: Option<Outcome>,
    phase: Phase,
    rng: R,
}

impl Session<StdRng> {
    pub fn new(config: &SessionConfig) -> Self {
        Session::with_rng(config.gate_table(), config.rng())
    }
}

impl Default for Session<StdRng> {
    fn default() -> Self {
        Session::new(&SessionConfig::default())
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(table: GateTable, rng: R) -> Self {
        Session {
            table,
            state: StateVector::zero(),
            circuit: Circuit::new(),
            history: Vec::new(),
            outcome: None,
            phase: Phase::Idle,
            rng,
        }
    }

    pub fn state(&self) -> &StateVector {
        &self.state
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn table(&self) -> &GateTable {
        &self.table
    }

    pub fn bloch(&self) -> BlochPoint {
        bloch_point(&self.state)
    }

    // any move away from a collapsed state makes the recorded outcome stale
    fn set_state(&mut self, state: StateVector) {
        self.state = state;
        self.outcome = None;
        self.phase = Phase::Evolved;
    }

    /// Quick apply: runs one gate on the current state.
    ///
    /// The circuit and history are left as they are. An unknown name changes nothing.
    pub fn apply_gate(&mut self, name: &str) -> &StateVector {
        if self.table.contains(name) {
            let next = self.table.apply(name, &self.state);
            self.set_state(next);
        } else {
            debug!("quick apply of unknown gate '{}' ignored", name);
        }
        &self.state
    }

    /// Adds a gate to the end of the circuit without touching the state.
    ///
    /// Known gates are stored under the table's spelling; anything else is kept trimmed
    /// and replays as a no-op.
    pub fn append(&mut self, name: &str) {
        match self.table.get(name) {
            Some(gate) => self.circuit.push(gate.name),
            None => self.circuit.push(name.trim()),
        }
    }

    /// Removes the most recently appended gate.
    pub fn undo_last(&mut self) -> Option<String> {
        self.circuit.pop()
    }

    /// Replays the circuit from |0>, rebuilding history from scratch.
    pub fn run(&mut self) -> &StateVector {
        let (state, history) = circuit::run_circuit(&self.table, &self.circuit);
        self.history = history;
        self.set_state(state);
        debug!("ran circuit of {} gates", self.circuit.len());
        &self.state
    }

    /// Replays gates `0..=index` from |0>. History is not touched.
    pub fn run_up_to(&mut self, index: usize) -> &StateVector {
        let state = circuit::run_up_to(&self.table, &self.circuit, index);
        self.set_state(state);
        &self.state
    }

    /// Back to the initial state: empty circuit and history, |0>, no outcome.
    pub fn clear(&mut self) {
        self.circuit.clear();
        self.history.clear();
        self.state = StateVector::zero();
        self.outcome = None;
        self.phase = Phase::Idle;
        info!("session cleared");
    }

    /// Measures the current state and collapses it to the sampled basis vector.
    pub fn measure(&mut self) -> Outcome {
        let (outcome, collapsed) = random::measure(&self.state, &mut self.rng);
        self.state = collapsed;
        self.outcome = Some(outcome);
        self.phase = Phase::Measured;
        outcome
    }
}
