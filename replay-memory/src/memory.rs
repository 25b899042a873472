//! Fixed-capacity replay memory with uniform sampling.
use crate::{
    ExperienceBufferBase, ReplayBufferBase, ReplayMemoryConfig, ReplayMemoryError, ShapeTable,
    Transition, TransitionBatch,
};
use anyhow::Result;
use log::{debug, info, trace};
use ndarray::{Array, Dimension};
use rand::{rngs::StdRng, seq::index, SeedableRng};
use std::{collections::VecDeque, fmt};

/// A replay memory holding the most recent `capacity` transitions.
///
/// Transitions are kept in insertion order. Once the memory is full, recording
/// a new transition evicts the oldest one. Batches are drawn uniformly at random
/// without replacement and assembled column by column into arrays whose shapes
/// follow the memory's [`ShapeTable`].
///
/// The shapes of recorded values are not checked; a malformed transition is
/// reported by [`ReplayMemory::sample_batch`] when it is drawn.
///
/// # Examples
///
/// ```
/// use ndarray::arr1;
/// use replay_memory::ReplayMemory;
///
/// let mut memory = ReplayMemory::with_seed(&[4], &[1], 3, 42).unwrap();
/// for i in 0..5 {
///     let obs = arr1(&[i as f32; 4]);
///     let next_obs = arr1(&[(i + 1) as f32; 4]);
///     memory.record(obs, arr1(&[0.0]), 1.0, next_obs, false);
/// }
/// assert_eq!(memory.len(), 3);
///
/// let batch = memory.sample_batch(32).unwrap();
/// assert_eq!(batch.obs.shape(), &[3, 4]);
/// ```
pub struct ReplayMemory {
    capacity: usize,
    shapes: ShapeTable,
    storage: VecDeque<Transition>,
    rng: StdRng,
}

impl ReplayMemory {
    /// Creates an empty memory whose random generator is seeded from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayMemoryError::InvalidConfig`] if `capacity` is zero or
    /// either shape contains a zero dimension or describes more elements than
    /// an array can hold.
    pub fn new(
        obs_shape: &[usize],
        act_shape: &[usize],
        capacity: usize,
    ) -> Result<Self, ReplayMemoryError> {
        Self::with_rng(obs_shape, act_shape, capacity, StdRng::from_entropy())
    }

    /// Creates an empty memory whose sampling is deterministic given `seed`.
    pub fn with_seed(
        obs_shape: &[usize],
        act_shape: &[usize],
        capacity: usize,
        seed: u64,
    ) -> Result<Self, ReplayMemoryError> {
        Self::with_rng(obs_shape, act_shape, capacity, StdRng::seed_from_u64(seed))
    }

    /// Creates an empty memory drawing samples with `rng`.
    pub fn with_rng(
        obs_shape: &[usize],
        act_shape: &[usize],
        capacity: usize,
        rng: StdRng,
    ) -> Result<Self, ReplayMemoryError> {
        let config = ReplayMemoryConfig::default()
            .obs_shape(obs_shape.to_vec())
            .act_shape(act_shape.to_vec())
            .capacity(capacity);
        let shapes = config.validate()?;

        info!(
            "Create replay memory, capacity = {}, obs_shape = {:?}, act_shape = {:?}",
            capacity, obs_shape, act_shape
        );

        Ok(Self {
            capacity,
            shapes,
            storage: VecDeque::new(),
            rng,
        })
    }

    /// Stores a transition, evicting the oldest one if the memory is full.
    pub fn record<D1, D2>(
        &mut self,
        observation: Array<f32, D1>,
        action: Array<f32, D2>,
        reward: f32,
        next_observation: Array<f32, D1>,
        terminal: bool,
    ) where
        D1: Dimension,
        D2: Dimension,
    {
        self.record_transition(Transition::new(
            observation,
            action,
            reward,
            next_observation,
            terminal,
        ));
    }

    /// Stores an already constructed transition, evicting the oldest one if the
    /// memory is full.
    pub fn record_transition(&mut self, tr: Transition) {
        if self.storage.len() == self.capacity {
            self.storage.pop_front();
            trace!("Evict the oldest transition");
        }
        self.storage.push_back(tr);
        trace!("Record transition, len = {}", self.storage.len());
    }

    /// Number of stored transitions.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if no transition is stored.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Returns `true` if the next record will evict a transition.
    pub fn is_full(&self) -> bool {
        self.storage.len() == self.capacity
    }

    /// Maximum number of stored transitions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Shapes of the fields of a single transition.
    pub fn shapes(&self) -> &ShapeTable {
        &self.shapes
    }

    /// Iterates over the stored transitions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> + '_ {
        self.storage.iter()
    }

    /// Draws a batch of `min(batch_size, len())` distinct transitions uniformly
    /// at random.
    ///
    /// An oversized request is clamped to the number of stored transitions,
    /// so an empty memory yields an empty batch. The order of the transitions in
    /// the batch is random and unrelated to their insertion order.
    ///
    /// # Errors
    ///
    /// * [`ReplayMemoryError::ShapeMismatch`] if a drawn transition does not fit
    ///   the shape table.
    /// * [`ReplayMemoryError::CorruptBatch`] if the batch contains NaN.
    pub fn sample_batch(&mut self, batch_size: usize) -> Result<TransitionBatch, ReplayMemoryError> {
        let n = batch_size.min(self.storage.len());
        if n < batch_size {
            debug!(
                "Requested {} transitions but only {} are stored",
                batch_size,
                self.storage.len()
            );
        }

        let ixs = index::sample(&mut self.rng, self.storage.len(), n).into_vec();
        let items = ixs.iter().map(|&ix| &self.storage[ix]).collect::<Vec<_>>();

        TransitionBatch::assemble(&self.shapes, &items, ixs)
    }
}

impl fmt::Display for ReplayMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class Memory len={}>", self.len())
    }
}

impl fmt::Debug for ReplayMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplayMemory")
            .field("capacity", &self.capacity)
            .field("len", &self.storage.len())
            .field("shapes", &self.shapes)
            .finish()
    }
}

impl ExperienceBufferBase for ReplayMemory {
    type Item = Transition;

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        self.record_transition(tr);
        Ok(())
    }

    fn len(&self) -> usize {
        self.storage.len()
    }
}

impl ReplayBufferBase for ReplayMemory {
    type Config = ReplayMemoryConfig;
    type Batch = TransitionBatch;

    fn build(config: &Self::Config) -> Result<Self> {
        Ok(Self::with_seed(
            &config.obs_shape,
            &config.act_shape,
            config.capacity,
            config.seed,
        )?)
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        Ok(self.sample_batch(size)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn record_value(memory: &mut ReplayMemory, v: f32) {
        memory.record(arr1(&[v, v]), arr1(&[v]), v, arr1(&[v, v]), false);
    }

    #[test]
    fn test_eviction_order() {
        init();
        let mut memory = ReplayMemory::with_seed(&[2], &[1], 2, 0).unwrap();
        assert!(memory.is_empty());

        record_value(&mut memory, 0.0);
        assert!(!memory.is_full());
        record_value(&mut memory, 1.0);
        assert!(memory.is_full());
        record_value(&mut memory, 2.0);
        assert!(memory.is_full());

        let rewards = memory.iter().map(|tr| tr.reward()).collect::<Vec<_>>();
        assert_eq!(rewards, vec![1.0, 2.0]);
    }

    #[test]
    fn test_sample_is_read_only() {
        init();
        let mut memory = ReplayMemory::with_seed(&[2], &[1], 5, 0).unwrap();
        for i in 0..5 {
            record_value(&mut memory, i as f32);
        }
        let before = memory.iter().cloned().collect::<Vec<_>>();
        for _ in 0..10 {
            memory.sample_batch(3).unwrap();
        }
        let after = memory.iter().cloned().collect::<Vec<_>>();
        assert_eq!(before, after);
    }

    #[test]
    fn test_ix_sample_matches_contents() {
        init();
        let mut memory = ReplayMemory::with_seed(&[2], &[1], 4, 1).unwrap();
        for i in 0..6 {
            record_value(&mut memory, i as f32);
        }
        let batch = memory.sample_batch(4).unwrap();
        for (row, &ix) in batch.ix_sample.iter().enumerate() {
            // Stored rewards are 2, 3, 4, 5
            assert_eq!(batch.reward[[row, 0]], (ix + 2) as f32);
        }
    }

    #[test]
    fn test_seeded_sampling_is_deterministic() {
        let build = || {
            let mut memory = ReplayMemory::with_seed(&[2], &[1], 100, 123).unwrap();
            for i in 0..100 {
                record_value(&mut memory, i as f32);
            }
            memory
        };
        let (mut m1, mut m2) = (build(), build());
        assert_eq!(m1.sample_batch(16).unwrap(), m2.sample_batch(16).unwrap());
    }

    #[test]
    fn test_large_capacity() {
        init();
        let mut memory = ReplayMemory::with_seed(&[2], &[1], usize::MAX, 0).unwrap();
        assert_eq!(memory.capacity(), usize::MAX);
        record_value(&mut memory, 0.0);
        record_value(&mut memory, 1.0);
        assert_eq!(memory.len(), 2);
        assert!(!memory.is_full());
        assert_eq!(memory.sample_batch(8).unwrap().len(), 2);
    }

    #[test]
    fn test_display() {
        let mut memory = ReplayMemory::new(&[2], &[1], 3).unwrap();
        assert_eq!(memory.to_string(), "<class Memory len=0>");
        record_value(&mut memory, 0.0);
        assert_eq!(memory.to_string(), "<class Memory len=1>");
    }

    #[test]
    fn test_traits() -> Result<()> {
        let config = ReplayMemoryConfig::default()
            .obs_shape(vec![2])
            .act_shape(vec![1])
            .capacity(8);
        let mut memory = ReplayMemory::build(&config)?;
        memory.push(Transition::new(arr1(&[0., 1.]), arr1(&[1.]), 0.5, arr1(&[1., 2.]), true))?;
        assert_eq!(ExperienceBufferBase::len(&memory), 1);

        let batch = memory.batch(4)?;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.terminal[[0, 0]], 1.0);

        assert!(ReplayMemory::build(&config.capacity(0)).is_err());
        Ok(())
    }
}
