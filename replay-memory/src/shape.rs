//! Field names and per-field shapes of transitions.
use crate::ReplayMemoryError;
use std::{fmt, str::FromStr};

/// Shape of the scalar fields, `rewards` and `terminal`.
const SCALAR_SHAPE: [usize; 1] = [1];

/// A field of a transition, used as a key of [`TransitionBatch`](crate::TransitionBatch).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// Observations.
    Observations,

    /// Actions.
    Actions,

    /// Rewards.
    Rewards,

    /// Next observations.
    NextObservations,

    /// Terminal flags.
    Terminal,
}

impl Field {
    /// All fields, in the order they appear in a transition.
    pub const ALL: [Field; 5] = [
        Field::Observations,
        Field::Actions,
        Field::Rewards,
        Field::NextObservations,
        Field::Terminal,
    ];

    /// Returns the key of the field in a batch.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Observations => "observations",
            Field::Actions => "actions",
            Field::Rewards => "rewards",
            Field::NextObservations => "next_observations",
            Field::Terminal => "terminal",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .find(|field| field.name() == s)
            .copied()
            .ok_or_else(|| format!("Unknown field: {}", s))
    }
}

/// Expected shape of each field of a single transition.
///
/// Observations and next observations share `obs_shape`, actions use
/// `act_shape`, rewards and terminal flags are always `[1]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeTable {
    obs_shape: Vec<usize>,
    act_shape: Vec<usize>,
}

impl ShapeTable {
    /// Creates a shape table.
    ///
    /// Fails with [`ReplayMemoryError::InvalidConfig`] when a shape contains
    /// a zero dimension or its number of elements does not fit in `isize`.
    /// An empty shape denotes a scalar.
    pub fn new(obs_shape: &[usize], act_shape: &[usize]) -> Result<Self, ReplayMemoryError> {
        check_dims("obs_shape", obs_shape)?;
        check_dims("act_shape", act_shape)?;

        Ok(Self {
            obs_shape: obs_shape.to_vec(),
            act_shape: act_shape.to_vec(),
        })
    }

    /// Returns the shape of `field` for a single transition.
    pub fn get(&self, field: Field) -> &[usize] {
        match field {
            Field::Observations | Field::NextObservations => &self.obs_shape,
            Field::Actions => &self.act_shape,
            Field::Rewards | Field::Terminal => &SCALAR_SHAPE,
        }
    }

    /// Returns the shape of `field` for a batch of `n` transitions, i.e. `[n, shape..]`.
    pub fn batch_shape(&self, field: Field, n: usize) -> Vec<usize> {
        let mut shape = Vec::with_capacity(self.get(field).len() + 1);
        shape.push(n);
        shape.extend_from_slice(self.get(field));
        shape
    }

    /// Number of elements of `field` in a single transition.
    pub fn n_elems(&self, field: Field) -> usize {
        self.get(field).iter().product()
    }
}

fn check_dims(name: &str, shape: &[usize]) -> Result<(), ReplayMemoryError> {
    if shape.iter().any(|&d| d == 0) {
        return Err(ReplayMemoryError::InvalidConfig(format!(
            "{} must not contain a zero dimension, got {:?}",
            name, shape
        )));
    }

    let n_elems = shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .filter(|&n| n <= isize::MAX as usize);
    if n_elems.is_none() {
        return Err(ReplayMemoryError::InvalidConfig(format!(
            "{} has too many elements, got {:?}",
            name, shape
        )));
    }
    Ok(())
}
