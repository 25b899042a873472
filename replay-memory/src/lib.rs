#![warn(missing_docs)]
//! A fixed-capacity experience replay memory for reinforcement learning.
//!
//! [`ReplayMemory`] stores the most recent transitions
//! `(observation, action, reward, next_observation, terminal)` recorded by an agent
//! and draws uniformly random batches of them for training:
//!
//! * Transitions are kept in insertion order. When the memory is full, the oldest
//!   transition is evicted to make room for a new one.
//! * [`ReplayMemory::sample_batch`] draws distinct transitions without replacement
//!   and stacks each field into an [`ndarray::ArrayD`] of shape `[n, shape..]`,
//!   where `shape` comes from the memory's [`ShapeTable`]. A request larger than the
//!   number of stored transitions is clamped.
//! * Batches containing NaN are rejected with [`ReplayMemoryError::CorruptBatch`].
//!
//! The memory can also be built from a [`ReplayMemoryConfig`] through
//! [`ReplayBufferBase::build`], which makes sampling reproducible with a fixed seed.
mod base;
mod batch;
mod config;
mod error;
mod memory;
mod shape;
mod transition;
pub use base::{ExperienceBufferBase, ReplayBufferBase};
pub use batch::TransitionBatch;
pub use config::ReplayMemoryConfig;
pub use error::ReplayMemoryError;
pub use memory::ReplayMemory;
pub use shape::{Field, ShapeTable};
pub use transition::Transition;
