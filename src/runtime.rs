// circuit replay and the interactive session built on top of it

pub mod circuit;
pub mod session;

pub use circuit::{run_circuit, run_up_to, Circuit, HistoryEntry};
pub use session::{Phase, Session};
