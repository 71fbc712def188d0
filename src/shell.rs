// line oriented front end over a Session. one command per line, each command is one
// discrete user action and is fully applied before the next line is read.

use crate::error::{Result, SimError};
use crate::runtime::Session;
use crate::visualizer;
use log::warn;
use rand::Rng;
use std::io::{BufRead, Write};

const HELP: &str = "\
commands:
  apply <G>       apply gate G to the current state (quick apply)
  add <G>...      append gates to the circuit
  undo            remove the last gate from the circuit
  run             replay the circuit from |0> and record history
  step <N>        replay gates 0..=N from |0> without touching history
  measure         measure and collapse the current state
  clear           reset circuit, history, state and measurement
  state           show the current state
  circuit         show the circuit
  history         show the recorded history
  sphere          draw the bloch sphere
  gates           list available gates
  help            this text
  quit            leave the shell
gates: I X Z H S T";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Apply(String),
    Add(Vec<String>),
    Undo,
    Run,
    Step(usize),
    Measure,
    Clear,
    State,
    Circuit,
    History,
    Sphere,
    Gates,
    Help,
    Quit,
}

/// Parses one input line. Empty lines and `#` comments give `Ok(None)`.
pub fn parse_command(line: &str) -> std::result::Result<Option<Command>, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((head, args)) = parts.split_first() else {
        return Ok(None);
    };
    if head.starts_with('#') {
        return Ok(None);
    }

    let cmd = match (head.to_lowercase().as_str(), args) {
        ("apply" | "a", [gate]) => Command::Apply(gate.to_string()),
        ("apply" | "a", _) => return Err("usage: apply <gate>".to_string()),
        ("add", []) => return Err("usage: add <gate>...".to_string()),
        ("add", gates) => Command::Add(gates.iter().map(|g| g.to_string()).collect()),
        ("undo", []) => Command::Undo,
        ("run", []) => Command::Run,
        ("step", [n]) => Command::Step(
            n.parse()
                .map_err(|_| format!("step index must be a non-negative integer, got '{}'", n))?,
        ),
        ("step", _) => return Err("usage: step <index>".to_string()),
        ("measure" | "m", []) => Command::Measure,
        ("clear" | "reset", []) => Command::Clear,
        ("state" | "s", []) => Command::State,
        ("circuit", []) => Command::Circuit,
        ("history", []) => Command::History,
        ("sphere", []) => Command::Sphere,
        ("gates", []) => Command::Gates,
        ("help" | "?", []) => Command::Help,
        ("quit" | "exit" | "q", []) => Command::Quit,
        (other, _) => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(Some(cmd))
}

pub struct Shell<R: Rng> {
    session: Session<R>,
    precision: usize,
}

impl<R: Rng> Shell<R> {
    pub fn new(session: Session<R>, precision: usize) -> Self {
        Shell { session, precision }
    }

    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    /// Runs one command, writing its output. Returns `false` on quit.
    pub fn execute<W: Write>(&mut self, cmd: Command, out: &mut W) -> Result<bool> {
        let p = self.precision;
        match cmd {
            Command::Apply(gate) => {
                // the core treats unknown names as a no-op; the shell tells the user
                self.session.table().require(&gate)?;
                self.session.apply_gate(&gate);
                write!(out, "{}", visualizer::render_session(&self.session, p))?;
            }
            Command::Add(gates) => {
                for gate in &gates {
                    self.session.table().require(gate)?;
                }
                for gate in &gates {
                    self.session.append(gate);
                }
                writeln!(out, "circuit: {}", visualizer::circuit_string(self.session.circuit()))?;
            }
            Command::Undo => match self.session.undo_last() {
                Some(gate) => writeln!(
                    out,
                    "removed {}, circuit: {}",
                    gate,
                    visualizer::circuit_string(self.session.circuit())
                )?,
                None => writeln!(out, "circuit is already empty")?,
            },
            Command::Run => {
                self.session.run();
                write!(out, "{}", visualizer::render_history(self.session.history(), p))?;
                write!(out, "{}", visualizer::render_session(&self.session, p))?;
            }
            Command::Step(index) => {
                let len = self.session.circuit().len();
                if len > 0 && index >= len {
                    warn!("step {} past end of {}-gate circuit, clamping", index, len);
                }
                self.session.run_up_to(index);
                write!(out, "{}", visualizer::render_session(&self.session, p))?;
            }
            Command::Measure => {
                let outcome = self.session.measure();
                writeln!(out, "outcome: {}", outcome)?;
                write!(out, "{}", visualizer::render_session(&self.session, p))?;
            }
            Command::Clear => {
                self.session.clear();
                write!(out, "{}", visualizer::render_session(&self.session, p))?;
            }
            Command::State => write!(out, "{}", visualizer::render_session(&self.session, p))?,
            Command::Circuit => writeln!(
                out,
                "{}",
                visualizer::circuit_string(self.session.circuit())
            )?,
            Command::History => {
                write!(out, "{}", visualizer::render_history(self.session.history(), p))?
            }
            Command::Sphere => {
                write!(out, "{}", visualizer::render_sphere(&self.session.bloch()))?
            }
            Command::Gates => {
                for gate in self.session.table().iter() {
                    writeln!(out, "  {}", gate)?;
                }
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Reads commands until quit or end of input. Bad commands are reported and skipped.
    pub fn run<I: BufRead, W: Write>(&mut self, input: I, out: &mut W, prompt: bool) -> Result<()> {
        if prompt {
            write!(out, "qubit> ")?;
            out.flush()?;
        }
        for line in input.lines() {
            let line = line?;
            match parse_command(&line) {
                Ok(Some(cmd)) => match self.execute(cmd, out) {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e @ SimError::UnknownGate(_)) => writeln!(out, "error: {}", e)?,
                    Err(e) => return Err(e),
                },
                Ok(None) => {}
                Err(msg) => writeln!(out, "error: {}", msg)?,
            }
            if prompt {
                write!(out, "qubit> ")?;
                out.flush()?;
            }
        }
        Ok(())
    }
}
