pub mod bloch; // bloch sphere projection
pub mod complex; // complex arithmetic primitives
pub mod config; // session settings
pub mod error; // error type
pub mod gates; // fixed gate table
pub mod linalg; // 2-vector / 2x2 helpers
pub mod random; // measurement sampling
pub mod runtime; // circuit replay and session state
pub mod shell; // interactive line front end
pub mod visualizer; // text rendering

#[cfg(test)] // cross-module scenarios
mod test;

pub use bloch::{bloch_point, BlochPoint};
pub use config::SessionConfig;
pub use error::{Result, SimError};
pub use gates::{apply_gate, get_gate, Gate, GateTable, HadamardForm};
pub use linalg::{Matrix2, StateVector};
pub use random::{measure, Outcome};
pub use runtime::{run_circuit, Circuit, HistoryEntry, Session};
