//! State registry and synchronous value-iteration driver.
//!
//! The engine owns every [`State`]; transitions are [`StateId`] indices into
//! that registry. One call to [`Engine::perform_iteration_step`] is one
//! Jacobi-style sweep: every new value is computed from the values as they
//! were before the sweep started, and only then committed.

use std::collections::HashMap;

use log::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::mdp::{check_discount, EngineConfig, State, StateId, SweepReport};

#[derive(Debug, Clone, Default)]
pub struct Engine {
    states: Vec<State>,
    config: EngineConfig,
    q_function: HashMap<(StateId, StateId), f64>,
    sweeps: usize,
}

impl Engine {
    /// Creates an empty engine with the default discount factor.
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns [`Error::DiscountOutOfRange`] if the configuration is invalid.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn discount_factor(&self) -> f64 {
        self.config.discount_factor
    }

    /// # Errors
    /// Returns [`Error::DiscountOutOfRange`] if `discount` is outside `[0, 1]`.
    pub fn set_discount_factor(&mut self, discount: f64) -> Result<()> {
        self.config.discount_factor = check_discount(discount)?;
        Ok(())
    }

    /// Registers a copy of `state` and returns its handle.
    ///
    /// A template that already carries transitions (e.g. a clone of a
    /// registered state) is accepted only if every target is registered.
    ///
    /// # Examples
    ///
    /// ```
    /// use mdp_value_iteration::{Engine, State};
    ///
    /// let mut engine = Engine::new();
    /// let a = engine.add_state(State::create("A", 0.0, 0.0, 0.7).unwrap()).unwrap();
    /// let b = engine.add_state(State::create("B", 1.0, 0.0, 0.7).unwrap()).unwrap();
    /// engine.add_next_state(a, b).unwrap();
    ///
    /// engine.perform_iteration_step().unwrap();
    /// assert_eq!(engine.state(a).unwrap().value(), 1.0);
    /// ```
    pub fn add_state(&mut self, state: State) -> Result<StateId> {
        if let Some(&id) = state
            .transitions()
            .iter()
            .find(|id| id.0 >= self.states.len())
        {
            return Err(Error::UnregisteredState { id });
        }
        let id = StateId(self.states.len());
        trace!("registered state {} as {}", state.name(), id);
        self.states.push(state);
        Ok(id)
    }

    /// Adds a transition `from -> to`. Both states must already be registered.
    ///
    /// # Errors
    /// Returns [`Error::UnregisteredState`] for an unknown handle.
    pub fn add_next_state(&mut self, from: StateId, to: StateId) -> Result<()> {
        self.state(to)?;
        self.state_mut(from)?.add_next_state(to);
        Ok(())
    }

    /// All registered states in insertion order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn ids(&self) -> impl Iterator<Item = StateId> + '_ {
        (0..self.states.len()).map(StateId)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, id: StateId) -> Result<&State> {
        self.states
            .get(id.0)
            .ok_or(Error::UnregisteredState { id })
    }

    pub fn state_mut(&mut self, id: StateId) -> Result<&mut State> {
        self.states
            .get_mut(id.0)
            .ok_or(Error::UnregisteredState { id })
    }

    /// Handle of the first state called `name`.
    pub fn find(&self, name: &str) -> Option<StateId> {
        self.states
            .iter()
            .position(|s| s.name() == name)
            .map(StateId)
    }

    pub fn sweeps_performed(&self) -> usize {
        self.sweeps
    }

    /// Action values `Q(s, t)` computed during the most recent sweep, keyed
    /// by `(state, preferred successor)`. Empty before the first sweep.
    pub fn q_function(&self) -> &HashMap<(StateId, StateId), f64> {
        &self.q_function
    }

    pub fn q_value(&self, state: StateId, target: StateId) -> Option<f64> {
        self.q_function.get(&(state, target)).copied()
    }

    /// Current state values in registry order.
    pub fn value_function(&self) -> Vec<f64> {
        self.states.iter().map(State::value).collect()
    }

    /// Performs one synchronous sweep over every state.
    ///
    /// Absorbing states (non-zero reward) and states without transitions keep
    /// their value. Every other state takes the maximum over its successors
    /// of [`State::calculate_new_value_given`], evaluated on the pre-sweep
    /// values. On error nothing is committed.
    pub fn perform_iteration_step(&mut self) -> Result<SweepReport> {
        let gamma = self.config.discount_factor;
        let mut next_values = Vec::with_capacity(self.states.len());
        let mut q_function = HashMap::new();
        let mut updated = 0;
        let mut frozen = 0;

        for (index, state) in self.states.iter().enumerate() {
            if state.is_terminal() {
                next_values.push(state.value());
                frozen += 1;
                continue;
            }
            if state.transitions().is_empty() {
                warn!(
                    "state {} has no transitions and zero reward, keeping value {}",
                    state.name(),
                    state.value()
                );
                next_values.push(state.value());
                frozen += 1;
                continue;
            }

            let id = StateId(index);
            let mut best = f64::NEG_INFINITY;
            for (target, q) in state.action_values(&self.states, gamma)? {
                q_function.insert((id, target), q);
                best = best.max(q);
            }
            trace!("{}: {} -> {}", state.name(), state.value(), best);
            next_values.push(best);
            updated += 1;
        }

        let mut max_delta = 0.0_f64;
        for (state, value) in self.states.iter_mut().zip(next_values) {
            max_delta = max_delta.max((value - state.value()).abs());
            state.set_value(value);
        }
        self.q_function = q_function;
        self.sweeps += 1;

        debug!(
            "sweep {}: updated {} states, froze {}, max delta {:e}",
            self.sweeps, updated, frozen, max_delta
        );

        Ok(SweepReport {
            sweep: self.sweeps,
            max_delta,
            updated,
            frozen,
        })
    }

    /// Runs `sweeps` consecutive sweeps, stopping at the first error.
    pub fn perform_iterations(&mut self, sweeps: usize) -> Result<Vec<SweepReport>> {
        (0..sweeps).map(|_| self.perform_iteration_step()).collect()
    }
}
