use crate::gates::GateTable;
use crate::linalg::StateVector;
use log::debug;
use serde::{Deserialize, Serialize};

/// Ordered list of gate names, applied first to last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit {
    gates: Vec<String>,
}

impl Circuit {
    pub fn new() -> Self {
        Circuit { gates: Vec::new() }
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.gates.push(name.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.gates.pop()
    }

    pub fn clear(&mut self) {
        self.gates.clear();
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    pub fn gates(&self) -> &[String] {
        &self.gates
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.gates.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Circuit {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Circuit {
            gates: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// State after one step of a circuit replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub gate: String,
    pub state: StateVector,
}

/// Replays the whole circuit from |0>, recording every intermediate state.
///
/// Returns the final state (|0> for an empty circuit) and the fresh history.
pub fn run_circuit(table: &GateTable, circuit: &Circuit) -> (StateVector, Vec<HistoryEntry>) {
    let mut state = StateVector::zero();
    let mut history = Vec::with_capacity(circuit.len());
    for (step, name) in circuit.iter().enumerate() {
        state = table.apply(name, &state);
        debug!("step {}: {} -> {}", step, name, state);
        history.push(HistoryEntry {
            gate: name.to_string(),
            state,
        });
    }
    let final_state = history.last().map_or(StateVector::zero(), |e| e.state);
    (final_state, history)
}

/// Replays gates `0..=index` from |0>. An index past the end is clamped to the last
/// gate; an empty circuit gives |0>.
pub fn run_up_to(table: &GateTable, circuit: &Circuit, index: usize) -> StateVector {
    circuit
        .iter()
        .take(index.saturating_add(1))
        .fold(StateVector::zero(), |state, name| table.apply(name, &state))
}
