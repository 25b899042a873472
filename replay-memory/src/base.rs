//! Replay buffer interface for reinforcement learning.
//!
//! This module defines the interfaces of experience buffers. [`ExperienceBufferBase`]
//! is the side used by a process collecting experiences from an environment,
//! [`ReplayBufferBase`] is the side used by a training loop drawing batches.
//! [`ReplayMemory`](crate::ReplayMemory) implements both.
use anyhow::Result;

/// Interface for buffers that store experiences from environments.
///
/// # Type Parameters
///
/// * `Item` - The type of experience stored in the buffer
///
/// # Examples
///
/// ```ignore
/// struct SimpleBuffer<T> {
///     items: Vec<T>,
/// }
///
/// impl<T> ExperienceBufferBase for SimpleBuffer<T> {
///     type Item = T;
///
///     fn push(&mut self, tr: T) -> Result<()> {
///         self.items.push(tr);
///         Ok(())
///     }
///
///     fn len(&self) -> usize {
///         self.items.len()
///     }
/// }
/// ```
pub trait ExperienceBufferBase {
    /// The type of items stored in the buffer.
    type Item;

    /// Pushes a new experience into the buffer.
    ///
    /// # Arguments
    ///
    /// * `tr` - The experience to store
    ///
    /// # Returns
    ///
    /// `Ok(())` if the push was successful, or an error if it failed
    fn push(&mut self, tr: Self::Item) -> Result<()>;

    /// Returns the current number of experiences in the buffer.
    fn len(&self) -> usize;

    /// Returns `true` if the buffer holds no experience.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Interface for replay buffers that generate batches for training.
///
/// # Associated Types
///
/// * `Config` - Configuration parameters for the buffer
/// * `Batch` - The type of batch generated for training
///
/// # Examples
///
/// ```
/// use ndarray::arr1;
/// use replay_memory::{ReplayBufferBase, ReplayMemory, ReplayMemoryConfig};
///
/// let config = ReplayMemoryConfig::default()
///     .obs_shape(vec![2])
///     .act_shape(vec![1])
///     .capacity(100);
/// let mut memory = ReplayMemory::build(&config).unwrap();
/// memory.record(arr1(&[0.0, 1.0]), arr1(&[0.0]), 1.0, arr1(&[1.0, 2.0]), false);
///
/// let batch = memory.batch(32).unwrap();
/// assert_eq!(batch.len(), 1);
/// ```
pub trait ReplayBufferBase {
    /// Configuration parameters for the replay buffer.
    type Config: Clone;

    /// The type of batch generated for training.
    type Batch;

    /// Builds a replay buffer from the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration parameters for the buffer
    ///
    /// # Returns
    ///
    /// A new, empty replay buffer
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is not usable.
    fn build(config: &Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Draws a batch of at most `size` experiences.
    ///
    /// Implementations may return fewer than `size` experiences when the
    /// buffer holds fewer.
    ///
    /// # Arguments
    ///
    /// * `size` - The requested number of experiences
    ///
    /// # Returns
    ///
    /// A batch of sampled experiences, or an error if the sampled data is invalid
    fn batch(&mut self, size: usize) -> Result<Self::Batch>;
}
