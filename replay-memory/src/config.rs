//! Configuration of [`ReplayMemory`](crate::ReplayMemory).
//!
//! This module provides the configuration of the replay memory, including:
//! - Shapes of observations and actions
//! - Capacity and random seed
//! - Serialization and deserialization support
use crate::{ReplayMemoryError, ShapeTable};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`ReplayMemory`](crate::ReplayMemory).
///
/// # Fields
///
/// * `obs_shape` - Shape of a single observation
/// * `act_shape` - Shape of a single action
/// * `capacity` - Maximum number of transitions to store
/// * `seed` - Random seed for sampling
///
/// # Examples
///
/// ```
/// use replay_memory::ReplayMemoryConfig;
///
/// let config = ReplayMemoryConfig::default()
///     .obs_shape(vec![4])
///     .act_shape(vec![1])
///     .capacity(10000)
///     .seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct ReplayMemoryConfig {
    /// Shape of a single observation. Next observations share this shape.
    pub obs_shape: Vec<usize>,

    /// Shape of a single action.
    pub act_shape: Vec<usize>,

    /// Maximum number of transitions that can be stored in the memory.
    /// When the memory is full, new transitions replace the oldest ones.
    pub capacity: usize,

    /// Random seed used for sampling transitions. The same seed gives the same
    /// sequence of batches for the same sequence of records.
    pub seed: u64,
}

impl Default for ReplayMemoryConfig {
    /// Creates a default configuration:
    /// - `obs_shape = [1]`
    /// - `act_shape = [1]`
    /// - `capacity = 10000`
    /// - `seed = 42`
    fn default() -> Self {
        Self {
            obs_shape: vec![1],
            act_shape: vec![1],
            capacity: 10000,
            seed: 42,
        }
    }
}

impl ReplayMemoryConfig {
    /// Sets the shape of observations.
    ///
    /// # Arguments
    ///
    /// * `obs_shape` - The shape of a single observation
    ///
    /// # Returns
    ///
    /// The modified configuration
    pub fn obs_shape(mut self, obs_shape: Vec<usize>) -> Self {
        self.obs_shape = obs_shape;
        self
    }

    /// Sets the shape of actions.
    ///
    /// # Arguments
    ///
    /// * `act_shape` - The shape of a single action
    ///
    /// # Returns
    ///
    /// The modified configuration
    pub fn act_shape(mut self, act_shape: Vec<usize>) -> Self {
        self.act_shape = act_shape;
        self
    }

    /// Sets the capacity of the replay memory.
    ///
    /// # Arguments
    ///
    /// * `capacity` - The new capacity for the memory
    ///
    /// # Returns
    ///
    /// The modified configuration
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the random seed for sampling.
    ///
    /// # Arguments
    ///
    /// * `seed` - The new random seed
    ///
    /// # Returns
    ///
    /// The modified configuration
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks the capacity and the shapes.
    ///
    /// # Returns
    ///
    /// The shape table described by `obs_shape` and `act_shape`
    ///
    /// # Errors
    ///
    /// Returns [`ReplayMemoryError::InvalidConfig`] if the capacity is zero, or
    /// either shape contains a zero dimension or describes more elements than
    /// an array can hold.
    pub fn validate(&self) -> Result<ShapeTable, ReplayMemoryError> {
        if self.capacity == 0 {
            return Err(ReplayMemoryError::InvalidConfig(
                "capacity must be positive".to_string(),
            ));
        }
        ShapeTable::new(&self.obs_shape, &self.act_shape)
    }

    /// Loads the configuration from a YAML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves the configuration to a YAML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path where the configuration should be saved
    ///
    /// # Returns
    ///
    /// `Ok(())` if the configuration was saved successfully
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_save_and_load() -> Result<()> {
        let config = ReplayMemoryConfig::default()
            .obs_shape(vec![84, 84, 4])
            .act_shape(vec![2])
            .capacity(50000)
            .seed(7);
        let dir = TempDir::new("replay_memory_config")?;
        let path = dir.path().join("replay_memory.yaml");

        config.save(&path)?;
        let loaded = ReplayMemoryConfig::load(&path)?;
        assert_eq!(config, loaded);

        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(ReplayMemoryConfig::default().validate().is_ok());
        assert!(matches!(
            ReplayMemoryConfig::default().capacity(0).validate(),
            Err(ReplayMemoryError::InvalidConfig(_))
        ));
        assert!(matches!(
            ReplayMemoryConfig::default().obs_shape(vec![3, 0]).validate(),
            Err(ReplayMemoryError::InvalidConfig(_))
        ));
        assert!(matches!(
            ReplayMemoryConfig::default()
                .act_shape(vec![usize::MAX, usize::MAX])
                .validate(),
            Err(ReplayMemoryError::InvalidConfig(_))
        ));
    }
}
