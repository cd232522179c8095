//! Reference implementations of the corpus and favorites traits.

pub mod memory;

pub use memory::{MemoryCorpus, MemoryFavorites};
