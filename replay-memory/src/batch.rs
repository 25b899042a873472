//! Columnar batch of transitions.
use crate::{Field, ReplayMemoryError, ShapeTable, Transition};
use log::warn;
use ndarray::{ArrayD, IxDyn};
use std::collections::HashMap;

/// A batch of `n` transitions, one array per [`Field`].
///
/// Every array has shape `[n, shape..]` where `shape` is the field's entry in
/// the [`ShapeTable`] of the memory the batch was drawn from. Terminal flags
/// are encoded as `1.0` (terminal) and `0.0`.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionBatch {
    /// Observations.
    pub obs: ArrayD<f32>,

    /// Actions.
    pub act: ArrayD<f32>,

    /// Rewards.
    pub reward: ArrayD<f32>,

    /// Next observations.
    pub next_obs: ArrayD<f32>,

    /// Terminal flags.
    pub terminal: ArrayD<f32>,

    /// Positions of the sampled transitions in the memory, the oldest stored
    /// transition being at position 0. Follows the draw order of the batch.
    pub ix_sample: Vec<usize>,
}

impl TransitionBatch {
    /// Stacks `items` field by field, in the given order.
    ///
    /// # Errors
    ///
    /// * [`ReplayMemoryError::ShapeMismatch`] if an item does not have the number
    ///   of elements its field's shape requires.
    /// * [`ReplayMemoryError::CorruptBatch`] if a stacked field contains NaN.
    pub(crate) fn assemble(
        shapes: &ShapeTable,
        items: &[&Transition],
        ix_sample: Vec<usize>,
    ) -> Result<Self, ReplayMemoryError> {
        Ok(Self {
            obs: stack(shapes, Field::Observations, items)?,
            act: stack(shapes, Field::Actions, items)?,
            reward: stack(shapes, Field::Rewards, items)?,
            next_obs: stack(shapes, Field::NextObservations, items)?,
            terminal: stack(shapes, Field::Terminal, items)?,
            ix_sample,
        })
    }

    /// Number of transitions in the batch.
    pub fn len(&self) -> usize {
        self.ix_sample.len()
    }

    /// Returns `true` if the batch has no transition.
    pub fn is_empty(&self) -> bool {
        self.ix_sample.is_empty()
    }

    /// Returns the array of `field`.
    pub fn get(&self, field: Field) -> &ArrayD<f32> {
        match field {
            Field::Observations => &self.obs,
            Field::Actions => &self.act,
            Field::Rewards => &self.reward,
            Field::NextObservations => &self.next_obs,
            Field::Terminal => &self.terminal,
        }
    }

    /// Iterates over the fields and their arrays in [`Field::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &ArrayD<f32>)> + '_ {
        Field::ALL.iter().map(move |&field| (field, self.get(field)))
    }

    /// Converts the batch into a map keyed by field names.
    pub fn into_map(self) -> HashMap<&'static str, ArrayD<f32>> {
        let mut map = HashMap::with_capacity(Field::ALL.len());
        map.insert(Field::Observations.name(), self.obs);
        map.insert(Field::Actions.name(), self.act);
        map.insert(Field::Rewards.name(), self.reward);
        map.insert(Field::NextObservations.name(), self.next_obs);
        map.insert(Field::Terminal.name(), self.terminal);
        map
    }
}

fn stack(
    shapes: &ShapeTable,
    field: Field,
    items: &[&Transition],
) -> Result<ArrayD<f32>, ReplayMemoryError> {
    let n_elems = shapes.n_elems(field);
    let mut data = Vec::new();

    for tr in items {
        match field {
            Field::Observations => extend(&mut data, field, n_elems, tr.observation())?,
            Field::Actions => extend(&mut data, field, n_elems, tr.action())?,
            Field::NextObservations => {
                extend(&mut data, field, n_elems, tr.next_observation())?
            }
            Field::Rewards => data.push(tr.reward()),
            Field::Terminal => data.push(if tr.terminal() { 1.0 } else { 0.0 }),
        }
    }

    let found = data.len();
    let array = ArrayD::from_shape_vec(IxDyn(&shapes.batch_shape(field, items.len())), data)
        .map_err(|_| ReplayMemoryError::ShapeMismatch {
            field,
            expected: n_elems,
            found: found / items.len().max(1),
        })?;

    if array.iter().any(|x| x.is_nan()) {
        warn!("NaN found in field {} of a batch of size {}", field, items.len());
        return Err(ReplayMemoryError::CorruptBatch { field });
    }

    Ok(array)
}

fn extend(
    data: &mut Vec<f32>,
    field: Field,
    n_elems: usize,
    value: &ArrayD<f32>,
) -> Result<(), ReplayMemoryError> {
    if value.len() != n_elems {
        warn!(
            "Cannot reshape {:?} into the shape of {} ({} elements)",
            value.shape(),
            field,
            n_elems
        );
        return Err(ReplayMemoryError::ShapeMismatch {
            field,
            expected: n_elems,
            found: value.len(),
        });
    }
    data.extend(value.iter().copied());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    fn transition(v: f32, terminal: bool) -> Transition {
        Transition::new(
            arr2(&[[v, v], [v, v]]),
            arr1(&[v]),
            v,
            arr2(&[[v + 1.0, v + 1.0], [v + 1.0, v + 1.0]]),
            terminal,
        )
    }

    #[test]
    fn test_assemble() {
        let shapes = ShapeTable::new(&[2, 2], &[1]).unwrap();
        let (t0, t1) = (transition(0.0, false), transition(1.0, true));
        let batch = TransitionBatch::assemble(&shapes, &[&t1, &t0], vec![1, 0]).unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.obs.shape(), &[2, 2, 2]);
        assert_eq!(batch.act.shape(), &[2, 1]);
        assert_eq!(batch.reward.shape(), &[2, 1]);
        assert_eq!(batch.next_obs.shape(), &[2, 2, 2]);
        assert_eq!(batch.terminal.shape(), &[2, 1]);

        // Draw order is kept
        assert_eq!(batch.reward.iter().copied().collect::<Vec<_>>(), vec![1.0, 0.0]);
        assert_eq!(batch.terminal.iter().copied().collect::<Vec<_>>(), vec![1.0, 0.0]);
        assert_eq!(batch.next_obs[[0, 1, 1]], 2.0);
    }

    #[test]
    fn test_assemble_reshapes_by_element_count() {
        // A [4] observation fits a [2, 2] shape table
        let shapes = ShapeTable::new(&[2, 2], &[1]).unwrap();
        let tr = Transition::new(arr1(&[1., 2., 3., 4.]), arr1(&[0.]), 0., arr1(&[1., 2., 3., 4.]), false);
        let batch = TransitionBatch::assemble(&shapes, &[&tr], vec![0]).unwrap();
        assert_eq!(batch.obs[[0, 1, 0]], 3.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let shapes = ShapeTable::new(&[3], &[1]).unwrap();
        let tr = transition(0.0, false);
        assert_eq!(
            TransitionBatch::assemble(&shapes, &[&tr], vec![0]),
            Err(ReplayMemoryError::ShapeMismatch {
                field: Field::Observations,
                expected: 3,
                found: 4,
            })
        );
    }

    #[test]
    fn test_nan() {
        let shapes = ShapeTable::new(&[2, 2], &[1]).unwrap();
        let tr = Transition::new(
            arr2(&[[0., 0.], [0., 0.]]),
            arr1(&[f32::NAN]),
            0.,
            arr2(&[[0., 0.], [0., 0.]]),
            false,
        );
        assert_eq!(
            TransitionBatch::assemble(&shapes, &[&tr], vec![0]),
            Err(ReplayMemoryError::CorruptBatch {
                field: Field::Actions
            })
        );
    }

    #[test]
    fn test_into_map() {
        let shapes = ShapeTable::new(&[2, 2], &[1]).unwrap();
        let batch = TransitionBatch::assemble(&shapes, &[], vec![]).unwrap();
        assert!(batch.is_empty());

        let map = batch.into_map();
        let mut keys = map.keys().copied().collect::<Vec<_>>();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["actions", "next_observations", "observations", "rewards", "terminal"]
        );
        assert_eq!(map["observations"].shape(), &[0, 2, 2]);
    }
}
