//! A single transition `(o_t, a_t, r_t, o_t+1, terminal)`.
use ndarray::{Array, ArrayD, Dimension};

/// One observed step of an environment.
///
/// Observations and actions are stored as dynamic-dimension arrays so that a
/// single [`ReplayMemory`](crate::ReplayMemory) can hold tensors of any shape.
/// Their shapes are not checked against the memory's shape table when
/// recorded.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    observation: ArrayD<f32>,
    action: ArrayD<f32>,
    reward: f32,
    next_observation: ArrayD<f32>,
    terminal: bool,
}

impl Transition {
    /// Constructs a transition.
    pub fn new<D1, D2>(
        observation: Array<f32, D1>,
        action: Array<f32, D2>,
        reward: f32,
        next_observation: Array<f32, D1>,
        terminal: bool,
    ) -> Self
    where
        D1: Dimension,
        D2: Dimension,
    {
        Self {
            observation: observation.into_dyn(),
            action: action.into_dyn(),
            reward,
            next_observation: next_observation.into_dyn(),
            terminal,
        }
    }

    /// Observation before the action.
    pub fn observation(&self) -> &ArrayD<f32> {
        &self.observation
    }

    /// Action taken.
    pub fn action(&self) -> &ArrayD<f32> {
        &self.action
    }

    /// Reward received.
    pub fn reward(&self) -> f32 {
        self.reward
    }

    /// Observation after the action.
    pub fn next_observation(&self) -> &ArrayD<f32> {
        &self.next_observation
    }

    /// `true` if the transition ended an episode.
    pub fn terminal(&self) -> bool {
        self.terminal
    }
}
