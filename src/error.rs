//! Error types shared by the state graph and the value-iteration engine.

use thiserror::Error;

use crate::mdp::StateId;

/// Failures raised while building or iterating a Markov Decision Process.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("preferred transition probability must be in range [0,1], got {bias}")]
    InvalidBias { bias: f64 },

    #[error("discount factor must be in range [0,1], got {discount}")]
    DiscountOutOfRange { discount: f64 },

    #[error("state {id} is not registered with this engine")]
    UnregisteredState { id: StateId },

    #[error("state '{name}' has no outgoing transitions")]
    NoTransitions { name: String },

    #[error("{target} is not a successor of state '{state}'")]
    NotASuccessor { state: String, target: StateId },
}

pub type Result<T> = std::result::Result<T, Error>;
