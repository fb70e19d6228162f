//! The 3x3 grid world used by the demo binary, the tests and the benchmarks.
//!
//! ```text
//! S0 S1 S2
//! S3 S4 S5      S4: reward -1
//! S6 S7 S8      S8: reward +1
//! ```
//!
//! Every state moves to its orthogonal neighbours.

use std::fmt::Write;

use crate::error::Result;
use crate::mdp::{Engine, EngineConfig, State, StateId};

pub const GRID_COLUMNS: usize = 3;

pub(crate) const GRID_REWARDS: [f64; 9] = [0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 1.0];

pub(crate) const GRID_ADJACENCY: [&[usize]; 9] = [
    &[1, 3],
    &[0, 2, 4],
    &[1, 5],
    &[0, 4, 6],
    &[1, 3, 5, 7],
    &[2, 4, 8],
    &[3, 7],
    &[4, 6, 8],
    &[5, 7],
];

/// Builds the grid world with every state starting at value 0.
///
/// # Errors
/// Fails if `preferred_bias` or `discount_factor` is outside `[0, 1]`.
pub fn build_grid_world(preferred_bias: f64, discount_factor: f64) -> Result<Engine> {
    let order: Vec<usize> = (0..GRID_REWARDS.len()).collect();
    build_grid_world_in_order(&order, preferred_bias, discount_factor)
}

/// Same grid, with states registered in `order` (a permutation of `0..9`).
/// Each state's transitions keep the same order regardless of registration.
pub(crate) fn build_grid_world_in_order(
    order: &[usize],
    preferred_bias: f64,
    discount_factor: f64,
) -> Result<Engine> {
    let mut engine = Engine::with_config(EngineConfig { discount_factor })?;

    let mut ids = [StateId(0); 9];
    for &cell in order {
        let state = State::create(format!("S{}", cell), GRID_REWARDS[cell], 0.0, preferred_bias)?;
        ids[cell] = engine.add_state(state)?;
    }

    for (cell, neighbours) in GRID_ADJACENCY.iter().enumerate() {
        for &next in neighbours.iter() {
            engine.add_next_state(ids[cell], ids[next])?;
        }
    }

    Ok(engine)
}

/// Renders the registry as a table, `columns` states per row.
///
/// Absorbing states show their reward, all others their value, with five
/// decimals and a leading space for non-negative numbers.
pub fn render_values(engine: &Engine, columns: usize) -> String {
    let mut out = String::new();
    for row in engine.states().chunks(columns.max(1)) {
        for state in row {
            let shown = if state.is_terminal() {
                state.reward()
            } else {
                state.value()
            };
            let sign = if shown >= 0.0 { " " } else { "" };
            let _ = write!(out, "{}{:.5}\t", sign, shown);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_layout() {
        let engine = build_grid_world(0.7, 0.9).unwrap();
        assert_eq!(engine.len(), 9);
        assert_eq!(engine.discount_factor(), 0.9);

        let names: Vec<&str> = engine.states().iter().map(State::name).collect();
        assert_eq!(names, vec!["S0", "S1", "S2", "S3", "S4", "S5", "S6", "S7", "S8"]);

        let s4 = engine.find("S4").unwrap();
        let targets: Vec<usize> = engine
            .state(s4)
            .unwrap()
            .transitions()
            .iter()
            .map(|id| id.index())
            .collect();
        assert_eq!(targets, vec![1, 3, 5, 7]);
        assert_eq!(engine.state(s4).unwrap().reward(), -1.0);
    }

    #[test]
    fn test_grid_rejects_bad_parameters() {
        assert!(build_grid_world(1.5, 0.9).is_err());
        assert!(build_grid_world(0.7, 1.1).is_err());
    }

    #[test]
    fn test_render_initial_grid() {
        let engine = build_grid_world(0.7, 0.9).unwrap();
        let rendered = render_values(&engine, GRID_COLUMNS);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], " 0.00000\t 0.00000\t 0.00000\t");
        assert_eq!(lines[1], " 0.00000\t-1.00000\t 0.00000\t");
        assert_eq!(lines[2], " 0.00000\t 0.00000\t 1.00000\t");
    }
}
