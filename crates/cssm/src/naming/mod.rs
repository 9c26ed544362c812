//! Scoped name generation.
//!
//! A scoped name is derived from the original class name and the seed
//! material of the file that owns the class. Generation must be a pure
//! function of those inputs: a class referenced from several files resolves
//! to the same scoped name everywhere without any coordination.

mod generator;
mod hash;

pub use generator::{DefaultNameGenerator, NameGenerator, Seed, SeedMode};
pub use hash::{string_hash, to_base36};
