use std::alloc::{self, Layout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    #[error("Failed to allocate {} bytes (align {}).", .layout.size(), .layout.align())]
    OutOfMemory {
        layout: Layout,
    },
    #[error("Requested capacity overflows the address space.")]
    CapacityOverflow,
}

impl AllocError {
    /// Escalates the error the way the standard collections do.
    ///
    /// # Panics
    /// Panics on [`AllocError::CapacityOverflow`], aborts through
    /// [`alloc::handle_alloc_error`] otherwise
    pub fn raise(self) -> ! {
        match self {
            Self::OutOfMemory { layout } => alloc::handle_alloc_error(layout),
            Self::CapacityOverflow => panic!("capacity overflow"),
        }
    }
}
