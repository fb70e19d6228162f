//! A single node of a finite Markov Decision Process.
//!
//! A [`State`] carries its immediate reward, the value refined by value
//! iteration and a bias towards one "preferred" successor. The remaining
//! probability mass is spread evenly across every other outgoing transition,
//! so for a state with `k > 1` transitions and bias `b`:
//!
//! ```text
//! P(preferred)   = b
//! P(unpreferred) = (1 - b) / (k - 1)
//! ```
//!
//! Successors are referenced by [`StateId`], an index into the registry that
//! owns every state (see [`Engine`](crate::mdp::Engine)).

use std::fmt;

use crate::error::{Error, Result};

/// Opaque handle to a state registered with an [`Engine`](crate::mdp::Engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) usize);

impl StateId {
    /// Position of the state in its registry (insertion order).
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node of the MDP graph.
///
/// A state with a non-zero reward is absorbing: the engine never updates its
/// value.
#[derive(Debug, Clone)]
pub struct State {
    name: String,
    reward: f64,
    value: f64,
    preferred_bias: f64,
    transitions: Vec<StateId>,
}

fn check_bias(bias: f64) -> Result<f64> {
    // NaN fails `contains` as well
    if (0.0..=1.0).contains(&bias) {
        Ok(bias)
    } else {
        Err(Error::InvalidBias { bias })
    }
}

impl State {
    /// Creates a new state without outgoing transitions.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBias`] if `preferred_bias` is outside `[0, 1]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mdp_value_iteration::State;
    ///
    /// let state = State::create("S0", 0.0, 0.0, 0.7).unwrap();
    /// assert_eq!(state.name(), "S0");
    /// assert!(State::create("S1", 0.0, 0.0, 1.5).is_err());
    /// ```
    pub fn create(
        name: impl Into<String>,
        reward: f64,
        value: f64,
        preferred_bias: f64,
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            reward,
            value,
            preferred_bias: check_bias(preferred_bias)?,
            transitions: Vec::new(),
        })
    }

    /// Appends `target` to the outgoing transitions. Duplicates and self
    /// loops are accepted; a duplicated target simply carries more weight.
    ///
    /// Registration of `target` is checked by
    /// [`Engine::add_next_state`](crate::mdp::Engine::add_next_state).
    pub(crate) fn add_next_state(&mut self, target: StateId) {
        self.transitions.push(target);
    }

    pub fn transitions(&self) -> &[StateId] {
        &self.transitions
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn reward(&self) -> f64 {
        self.reward
    }

    pub fn set_reward(&mut self, reward: f64) {
        self.reward = reward;
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// The configured bias, regardless of how many transitions exist.
    pub fn preferred_bias(&self) -> f64 {
        self.preferred_bias
    }

    /// # Errors
    /// Returns [`Error::InvalidBias`] if `bias` is outside `[0, 1]`; the
    /// previous bias is kept.
    pub fn set_preferred_transition_probability(&mut self, bias: f64) -> Result<()> {
        self.preferred_bias = check_bias(bias)?;
        Ok(())
    }

    /// Absorbing states (non-zero reward) keep their value across sweeps.
    pub fn is_terminal(&self) -> bool {
        self.reward != 0.0
    }

    /// Probability of following the preferred transition; `1` when there is
    /// no choice to make.
    pub fn preferred_transition_probability(&self) -> f64 {
        if self.transitions.len() <= 1 {
            return 1.0;
        }
        self.preferred_bias
    }

    /// Probability of following each non-preferred transition; `1` when there
    /// is no choice to make.
    pub fn unpreferred_transition_probability(&self) -> f64 {
        let k = self.transitions.len();
        if k <= 1 {
            return 1.0;
        }
        (1.0 - self.preferred_bias) / (k - 1) as f64
    }

    /// Expected discounted return when biasing towards `preferred`:
    ///
    /// `sum_t P(t) * (reward(t) + discount * value(t))`
    ///
    /// Successor rewards and values are read from `registry`; nothing is
    /// mutated.
    ///
    /// # Errors
    /// - [`Error::NotASuccessor`] if `preferred` is not an outgoing transition.
    /// - [`Error::UnregisteredState`] if a transition points outside `registry`.
    pub fn calculate_new_value_given(
        &self,
        preferred: StateId,
        registry: &[State],
        discount: f64,
    ) -> Result<f64> {
        if !self.transitions.contains(&preferred) {
            return Err(Error::NotASuccessor {
                state: self.name.clone(),
                target: preferred,
            });
        }

        let p_preferred = self.preferred_transition_probability();
        let p_other = self.unpreferred_transition_probability();

        self.transitions.iter().try_fold(0.0, |acc, &next| {
            let successor = registry
                .get(next.0)
                .ok_or(Error::UnregisteredState { id: next })?;
            let probability = if next == preferred {
                p_preferred
            } else {
                p_other
            };
            Ok(acc + probability * (successor.reward + discount * successor.value))
        })
    }

    /// Value of biasing towards each successor, in transition order.
    pub fn action_values(&self, registry: &[State], discount: f64) -> Result<Vec<(StateId, f64)>> {
        self.transitions
            .iter()
            .map(|&target| {
                self.calculate_new_value_given(target, registry, discount)
                    .map(|q| (target, q))
            })
            .collect()
    }

    /// Bellman optimality update: the best [`calculate_new_value_given`]
    /// over all successors.
    ///
    /// [`calculate_new_value_given`]: State::calculate_new_value_given
    ///
    /// # Errors
    /// Returns [`Error::NoTransitions`] for a dead-end state, plus anything
    /// [`State::calculate_new_value_given`] returns.
    pub fn calculate_new_max_value(&self, registry: &[State], discount: f64) -> Result<f64> {
        if self.transitions.is_empty() {
            return Err(Error::NoTransitions {
                name: self.name.clone(),
            });
        }
        Ok(self
            .action_values(registry, discount)?
            .into_iter()
            .map(|(_, q)| q)
            .fold(f64::NEG_INFINITY, f64::max))
    }
}

/// States are identified by name.
impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for State {}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}(Reward: {}, Value: {})",
            self.name, self.reward, self.value
        )
    }
}
