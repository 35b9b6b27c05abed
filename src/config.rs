use std::num::NonZeroUsize;

use crate::error::ConfigError;

/// Starting capacity of both the slot block and the free-list.
pub const DEFAULT_INITIAL_CAPACITY: usize = 8;

const DEFAULT: NonZeroUsize = match NonZeroUsize::new(DEFAULT_INITIAL_CAPACITY) {
    Some(cap) => cap,
    None => unreachable!(),
};

/// Construction parameters for an [`OrderedSet`](crate::OrderedSet).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    initial_capacity: NonZeroUsize,
}

impl Config {
    pub fn new(initial_capacity: usize) -> Result<Self, ConfigError> {
        let initial_capacity = NonZeroUsize::new(initial_capacity)
            .ok_or(ConfigError::ZeroCapacity)?;
        Ok(Self { initial_capacity })
    }

    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity.get()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { initial_capacity: DEFAULT }
    }
}
