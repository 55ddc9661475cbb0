//! Game Logic Module
//!
//! All combat simulation code. Given the same config, stage, inputs and
//! `dt` sequence, it produces the same state hash.
//!
//! ## Module Structure
//!
//! - `config`: Combat tuning and stage geometry
//! - `stance`: Low / mid / high and stance distance
//! - `attack`: Attack types, phases and one-shot attack instances
//! - `guard`: Stance guard resolution (pure)
//! - `fighter`: Per-fighter state machine
//! - `collision`: Hitbox tests, body separation, arena bounds
//! - `arbiter`: Per-tick orchestration and replay
//! - `state`: Match state and lifecycle
//! - `input`: Input frames, edge detection, recording
//! - `events`: Combat events for logs and replay checks
//! - `presentation`: Read-only renderer views

pub mod config;
pub mod stance;
pub mod attack;
pub mod guard;
pub mod fighter;
pub mod collision;
pub mod arbiter;
pub mod state;
pub mod input;
pub mod events;
pub mod presentation;

// Re-export key types
pub use config::{CombatConfig, ConfigError, StageConfig};
pub use stance::Stance;
pub use attack::{AttackInstance, AttackPhase, AttackType};
pub use guard::{GuardOutcome, Impact};
pub use fighter::{ActionState, Facing, Fighter};
pub use arbiter::{replay_match, tick, TickResult};
pub use state::{FighterId, MatchError, MatchPhase, MatchState};
pub use input::{InputEdgeDetector, InputFrame, PlayerInputBuffer};
pub use events::{CombatEvent, CombatEventData, EventPriority};
pub use presentation::{AnimationState, FighterView, MatchView};
