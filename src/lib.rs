//! Indexed arena with stable integer handles.
//!
//! [`OrderedSet`] places every element in its own cell, hands back the slot
//! index as a handle and recycles removed slots last-freed first. Iteration
//! walks the live slots in ascending order and skips holes.
//!
//! ```
//! use slotset::{Config, OrderedSet};
//!
//! let mut set = OrderedSet::with_config(Config::new(2)?)?;
//! let a = set.insert("and2")?;
//! let b = set.insert("inv1")?;
//! set.remove(a);
//! assert_eq!(set.insert("nor2")?, a);
//! assert_eq!(set.get(b), Some(&"inv1"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
mod config;
mod error;
mod free_list;
mod iter;
mod set;
mod storage;

pub use config::{Config, DEFAULT_INITIAL_CAPACITY};
pub use error::{AllocError, ConfigError, InsertError};
pub use iter::{Cursor, Iter, IterMut};
pub use set::OrderedSet;
pub use slotset_allocator::{Heap, Pool, Strategy};
