//! Core primitives.
//!
//! Geometry, hashing and id generation shared by the simulation.
//! Nothing in here knows about fighters or combat rules.

pub mod vec2;
pub mod aabb;
pub mod hash;
pub mod sequence;

// Re-export core types
pub use vec2::Vec2;
pub use aabb::Aabb;
pub use hash::{StateHash, StateHasher, compute_state_hash};
pub use sequence::AttackIdSequence;
