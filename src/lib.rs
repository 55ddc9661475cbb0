//! # Stance Duel
//!
//! Authoritative simulation for a two-fighter melee duel: stance guards,
//! stamina, dash and attack frame timing, hitstun and hitstop.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        STANCE DUEL                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/             - Deterministic primitives                │
//! │  ├── vec2.rs       - 2D vector (screen space, +Y down)       │
//! │  ├── aabb.rs       - Axis-aligned boxes                      │
//! │  ├── hash.rs       - State hashing for replay checks         │
//! │  └── sequence.rs   - Attack id generator                     │
//! │                                                              │
//! │  game/             - Combat logic                            │
//! │  ├── config.rs     - Tuning and stages                       │
//! │  ├── stance.rs     - Stances and distance                    │
//! │  ├── attack.rs     - Attack phases and instances             │
//! │  ├── guard.rs      - Stance guard resolver                   │
//! │  ├── fighter.rs    - Fighter state machine                   │
//! │  ├── collision.rs  - Hitboxes, separation, bounds            │
//! │  ├── arbiter.rs    - Per-tick orchestration, replay          │
//! │  ├── state.rs      - Match state and lifecycle               │
//! │  ├── input.rs      - Input frames and recording              │
//! │  ├── events.rs     - Combat events                           │
//! │  └── presentation.rs - Renderer views                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! - Fighters live in a fixed two-slot array; iteration is always P1, P2
//! - Inputs are keyed by `FighterId` in a `BTreeMap`
//! - No system time or randomness inside the simulation
//!
//! Given identical config, stage, inputs and `dt` sequence the simulation
//! produces identical state hashes on the same platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::vec2::Vec2;
pub use core::aabb::Aabb;
pub use game::config::{CombatConfig, StageConfig};
pub use game::input::{InputFrame, InputEdgeDetector, PlayerInputBuffer};
pub use game::state::{MatchState, FighterId, MatchPhase};
pub use game::arbiter::{tick, replay_match, TickResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default simulation tick rate (Hz)
pub const DEFAULT_TICK_RATE: u32 = 60;

/// Seconds per tick at the default rate
pub const DEFAULT_DT: f32 = 1.0 / DEFAULT_TICK_RATE as f32;
