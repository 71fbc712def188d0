// text rendering of the qubit for the terminal front end.
// nothing in here feeds back into the simulation.

use crate::bloch::{bloch_point, BlochPoint};
use crate::linalg::StateVector;
use crate::random::Outcome;
use crate::runtime::{Circuit, HistoryEntry, Phase, Session};
use itertools::Itertools;
use num_complex::Complex64;
use rand::Rng;
use std::fmt::Write;

// radius of the ascii sphere, in character cells
const SPHERE_RADIUS: i32 = 8;
const BAR_WIDTH: usize = 30;

/// "0.7071 + 0.0000i"
pub fn amplitude_string(a: Complex64, precision: usize) -> String {
    format!(
        "{:.p$} {} {:.p$}i",
        a.re,
        if a.im < 0.0 { '-' } else { '+' },
        a.im.abs(),
        p = precision
    )
}

pub fn circuit_string(circuit: &Circuit) -> String {
    if circuit.is_empty() {
        "(empty)".to_string()
    } else {
        circuit.iter().join(" -> ")
    }
}

/// Amplitudes with probability bars, one line per basis state.
pub fn render_amplitudes(state: &StateVector, precision: usize) -> String {
    let mut out = String::new();
    for (idx, (amp, prob)) in state
        .amps
        .iter()
        .zip(state.probabilities())
        .enumerate()
    {
        let filled = ((prob.clamp(0.0, 1.0) * BAR_WIDTH as f64).round()) as usize;
        let _ = writeln!(
            out,
            "|{}>: {:<w$} P={:.p$} [{}{}]",
            idx,
            amplitude_string(*amp, precision),
            prob,
            "#".repeat(filled),
            ".".repeat(BAR_WIDTH - filled),
            w = 2 * precision + 8,
            p = precision
        );
    }
    out
}

// one circle projection; `h` and `v` are the point's horizontal/vertical coordinates
fn render_plane(h: f64, v: f64, top: &str, bottom: &str, left: &str, right: &str) -> String {
    let r = SPHERE_RADIUS;
    let width = (2 * r + 1) as usize;
    let height = (r + 1) as usize;
    let mut grid = vec![vec![' '; width]; height];

    // terminal cells are roughly twice as tall as wide, so rows are halved
    let cell = |x: f64, y: f64| -> (usize, usize) {
        let gx = (r as f64 + x * r as f64).round() as i32;
        let gy = (r as f64 / 2.0 - y * r as f64 / 2.0).round() as i32;
        (gx.clamp(0, 2 * r) as usize, gy.clamp(0, r) as usize)
    };

    for deg in (0..360).step_by(4) {
        let rad = (deg as f64).to_radians();
        let (gx, gy) = cell(rad.cos(), rad.sin());
        grid[gy][gx] = '.';
    }
    let (cx, cy) = cell(0.0, 0.0);
    for row in grid.iter_mut() {
        row[cx] = '|';
    }
    for c in grid[cy].iter_mut() {
        *c = '-';
    }
    grid[cy][cx] = '+';

    let (px, py) = cell(h, v);
    grid[py][px] = '@';

    let mut out = String::new();
    let _ = writeln!(out, "{:>w$}{}", "", top, w = r as usize);
    for row in &grid {
        let _ = writeln!(out, "{}", row.iter().collect::<String>().trim_end());
    }
    let _ = writeln!(out, "{:>w$}{}", "", bottom, w = r as usize);
    let _ = writeln!(out, "{}{:w$}{}", left, "", right, w = width.saturating_sub(left.len() + right.len()));
    out
}

/// Side (x/z) and top (x/y) projections of the Bloch point.
pub fn render_sphere(point: &BlochPoint) -> String {
    let mut out = String::new();
    out.push_str("side view (x/z):\n");
    out.push_str(&render_plane(point.x, point.z, "|0>", "|1>", "|->", "|+>"));
    out.push_str("top view (x/y):\n");
    out.push_str(&render_plane(point.x, point.y, "|+i>", "|-i>", "|->", "|+>"));
    out
}

pub fn render_bloch(point: &BlochPoint, precision: usize) -> String {
    let mut out = format!("bloch: {:.p$}\n", point, p = precision);
    if let Some(name) = point.describe() {
        let _ = writeln!(out, "       at {}", name);
    }
    out
}

pub fn render_history(history: &[HistoryEntry], precision: usize) -> String {
    if history.is_empty() {
        return "no history, run the circuit first\n".to_string();
    }
    let mut out = String::new();
    for (step, entry) in history.iter().enumerate() {
        let point = bloch_point(&entry.state);
        let _ = writeln!(
            out,
            "{:>3} {:<2} {:.p$}  theta={:.p$} phi={:.p$}",
            step,
            entry.gate,
            entry.state,
            point.theta,
            point.phi,
            p = precision
        );
    }
    out
}

pub fn render_outcome(outcome: Option<Outcome>) -> String {
    match outcome {
        Some(o) => format!("measured: {}", o),
        None => "measured: not yet".to_string(),
    }
}

/// Full status block shown by the shell after each action.
pub fn render_session<R: Rng>(session: &Session<R>, precision: usize) -> String {
    let mut out = String::new();
    let phase = match session.phase() {
        Phase::Idle => "idle",
        Phase::Evolved => "evolved",
        Phase::Measured => "measured",
    };
    let _ = writeln!(out, "phase: {}", phase);
    let _ = writeln!(out, "circuit: {}", circuit_string(session.circuit()));
    out.push_str(&render_amplitudes(session.state(), precision));
    out.push_str(&render_bloch(&session.bloch(), precision));
    let _ = writeln!(out, "{}", render_outcome(session.outcome()));
    out
}
