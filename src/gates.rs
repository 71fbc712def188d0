// fixed single qubit gate table.
//
// two tables exist: OBSERVED keeps the hadamard exactly as the simulator has always
// shipped it (zero bottom-right entry), TEXTBOOK has the usual -1/sqrt(2) there.
// both are compile-time constants and are never mutated.

use crate::complex::{I, ONE, ZERO};
use crate::error::{Result, SimError};
use crate::linalg::{mat_vec, normalize, Matrix2, StateVector};
use log::debug;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;

const H: Complex64 = Complex64::new(FRAC_1_SQRT_2, 0.0);
const NEG_H: Complex64 = Complex64::new(-FRAC_1_SQRT_2, 0.0);
const NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);
// cos(pi/4) + i*sin(pi/4)
const E_I_PI_4: Complex64 = Complex64::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2);

/// Which hadamard matrix the gate table carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HadamardForm {
    /// [[1/sqrt2, 1/sqrt2], [1/sqrt2, 0]]
    #[default]
    Observed,
    /// [[1/sqrt2, 1/sqrt2], [1/sqrt2, -1/sqrt2]]
    Textbook,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gate {
    pub name: &'static str,
    pub matrix: Matrix2,
    pub description: &'static str,
}

impl Gate {
    /// Matrix-vector product followed by re-normalization.
    pub fn apply(&self, state: &StateVector) -> StateVector {
        normalize(&mat_vec(&self.matrix, state))
    }

    /// U^dagger U == I within `tol`.
    pub fn is_unitary(&self, tol: f64) -> bool {
        self.matrix
            .dagger()
            .mul(&self.matrix)
            .approx_eq(&Matrix2::IDENTITY, tol)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.description)
    }
}

const fn gate(name: &'static str, m: [[Complex64; 2]; 2], description: &'static str) -> Gate {
    Gate {
        name,
        matrix: Matrix2(m),
        description,
    }
}

const GATE_I: Gate = gate("I", [[ONE, ZERO], [ZERO, ONE]], "identity");
const GATE_X: Gate = gate("X", [[ZERO, ONE], [ONE, ZERO]], "bit flip");
const GATE_Z: Gate = gate("Z", [[ONE, ZERO], [ZERO, NEG_ONE]], "phase flip");
const GATE_S: Gate = gate("S", [[ONE, ZERO], [ZERO, I]], "90 degree phase");
const GATE_T: Gate = gate("T", [[ONE, ZERO], [ZERO, E_I_PI_4]], "45 degree phase");

const OBSERVED_GATES: [Gate; 6] = [
    GATE_I,
    GATE_X,
    GATE_Z,
    gate("H", [[H, H], [H, ZERO]], "superposition"),
    GATE_S,
    GATE_T,
];

const TEXTBOOK_GATES: [Gate; 6] = [
    GATE_I,
    GATE_X,
    GATE_Z,
    gate("H", [[H, H], [H, NEG_H]], "superposition"),
    GATE_S,
    GATE_T,
];

/// Immutable name -> gate lookup.
#[derive(Debug, Clone, Copy)]
pub struct GateTable {
    gates: &'static [Gate],
    form: HadamardForm,
}

impl GateTable {
    pub const OBSERVED: GateTable = GateTable {
        gates: &OBSERVED_GATES,
        form: HadamardForm::Observed,
    };

    pub const TEXTBOOK: GateTable = GateTable {
        gates: &TEXTBOOK_GATES,
        form: HadamardForm::Textbook,
    };

    pub fn for_form(form: HadamardForm) -> GateTable {
        match form {
            HadamardForm::Observed => GateTable::OBSERVED,
            HadamardForm::Textbook => GateTable::TEXTBOOK,
        }
    }

    pub fn form(&self) -> HadamardForm {
        self.form
    }

    /// Case-insensitive lookup, surrounding whitespace ignored.
    pub fn get(&self, name: &str) -> Option<&'static Gate> {
        let key = name.trim();
        self.gates.iter().find(|g| g.name.eq_ignore_ascii_case(key))
    }

    pub fn require(&self, name: &str) -> Result<&'static Gate> {
        self.get(name)
            .ok_or_else(|| SimError::UnknownGate(name.trim().to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Applies the named gate. Unknown names leave the state untouched.
    pub fn apply(&self, name: &str, state: &StateVector) -> StateVector {
        match self.get(name) {
            Some(g) => {
                let out = g.apply(state);
                debug!("applied {} gate: {} -> {}", g.name, state, out);
                out
            }
            None => {
                debug!("gate '{}' not in table, state unchanged", name);
                *state
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Gate> {
        self.gates.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.gates.iter().map(|g| g.name)
    }
}

impl Default for GateTable {
    fn default() -> Self {
        GateTable::OBSERVED
    }
}

/// Lookup in the default table.
pub fn get_gate(name: &str) -> Option<&'static Gate> {
    GateTable::OBSERVED.get(name)
}

/// Applies the named gate from the default table to `state`.
pub fn apply_gate(name: &str, state: &StateVector) -> StateVector {
    GateTable::OBSERVED.apply(name, state)
}
