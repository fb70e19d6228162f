//! Finite Markov Decision Process modelled as a graph of states, solved by
//! synchronous value iteration.

pub mod engine;
pub mod grid;
pub mod state;


use crate::error::{Error, Result};

pub use engine::Engine;
pub use grid::{build_grid_world, render_values, GRID_COLUMNS};
pub use state::{State, StateId};

/// Discount factor used when none is configured.
pub const DEFAULT_DISCOUNT_FACTOR: f64 = 0.9;

/// Configuration options for the value-iteration engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Weight of future reward relative to immediate reward (0 <= gamma <= 1)
    pub discount_factor: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            discount_factor: DEFAULT_DISCOUNT_FACTOR,
        }
    }
}

impl EngineConfig {
    /// # Errors
    /// Returns [`Error::DiscountOutOfRange`] if the discount factor is outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        check_discount(self.discount_factor).map(|_| ())
    }
}

pub(crate) fn check_discount(discount: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&discount) {
        Ok(discount)
    } else {
        Err(Error::DiscountOutOfRange { discount })
    }
}

/// Summary of one synchronous sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepReport {
    /// 1-based index of the sweep
    pub sweep: usize,
    /// Largest absolute change of any state value
    pub max_delta: f64,
    /// States whose value was recomputed
    pub updated: usize,
    /// Absorbing or dead-end states left untouched
    pub frozen: usize,
}
