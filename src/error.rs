pub use slotset_allocator::AllocError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Initial capacity must be at least 1.")]
    ZeroCapacity,
}

/// Failure of a fallible insertion. The set is left as it was before the call.
#[derive(Debug, thiserror::Error)]
pub enum InsertError<E> {
    #[error(transparent)]
    OutOfMemory(#[from] AllocError),
    #[error("Element construction failed: {0}")]
    Construction(E),
}

impl <E> InsertError<E> {
    pub fn into_construction(self) -> Option<E> {
        match self {
            Self::Construction(err) => Some(err),
            Self::OutOfMemory(_) => None,
        }
    }
}
