//! Match State
//!
//! Both fighters, the stage, the attack-id sequence and the match phase.
//! Fighters are stored in a fixed two-slot array indexed by `FighterId`,
//! so iteration order is always P1 then P2.

use std::fmt;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::info;

use crate::core::hash::{StateHash, compute_state_hash};
use crate::core::sequence::AttackIdSequence;
use crate::core::vec2::Vec2;
use crate::game::config::{CombatConfig, ConfigError, StageConfig};
use crate::game::events::CombatEvent;
use crate::game::fighter::{Facing, Fighter};

// =============================================================================
// FIGHTER ID
// =============================================================================

/// Which side of the match a fighter is on.
///
/// Implements Ord so events tie-break deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum FighterId {
    /// Player one, spawns on the left facing right
    P1 = 0,
    /// Player two, spawns on the right facing left
    P2 = 1,
}

impl FighterId {
    /// Both ids in slot order.
    pub const ALL: [FighterId; 2] = [FighterId::P1, FighterId::P2];

    /// Slot index (0 or 1).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Id from slot index.
    pub fn from_index(index: usize) -> Option<FighterId> {
        match index {
            0 => Some(FighterId::P1),
            1 => Some(FighterId::P2),
            _ => None,
        }
    }

    /// The other fighter.
    #[inline]
    pub fn other(self) -> FighterId {
        match self {
            FighterId::P1 => FighterId::P2,
            FighterId::P2 => FighterId::P1,
        }
    }

    /// Short tag used by renderers and logs ("p1" / "p2").
    pub fn tag(self) -> &'static str {
        match self {
            FighterId::P1 => "p1",
            FighterId::P2 => "p2",
        }
    }
}

impl fmt::Display for FighterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// =============================================================================
// MATCH PHASE
// =============================================================================

/// Current phase of the match.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[derive(Default)]
pub enum MatchPhase {
    /// Set up, not started
    #[default]
    Waiting,
    /// Counting down before the fight (seconds left)
    Countdown { remaining: f32 },
    /// Fighters are live
    Fighting,
    /// A fighter is down
    Ended,
}

impl MatchPhase {
    fn discriminant(self) -> u8 {
        match self {
            MatchPhase::Waiting => 0,
            MatchPhase::Countdown { .. } => 1,
            MatchPhase::Fighting => 2,
            MatchPhase::Ended => 3,
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Errors raised by match lifecycle operations.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Operation needs a different phase.
    #[error("match is in phase {actual:?}, expected {expected}")]
    WrongPhase {
        /// Phase the operation requires
        expected: &'static str,
        /// Phase the match is in
        actual: MatchPhase,
    },

    /// Tuning or stage failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

// =============================================================================
// MATCH STATE
// =============================================================================

/// Complete state of a match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchState {
    /// Fighting ticks simulated so far
    pub tick: u32,

    /// Fighting time simulated so far (s)
    pub elapsed: f32,

    /// Current match phase
    pub phase: MatchPhase,

    /// Combat tuning
    pub config: CombatConfig,

    /// Arena geometry
    pub stage: StageConfig,

    /// Both fighters, indexed by `FighterId`
    pub(crate) fighters: [Fighter; 2],

    /// Attack id source shared by both fighters
    pub(crate) attack_ids: AttackIdSequence,

    /// Winner once ended (none on a double knockout)
    pub winner: Option<FighterId>,

    /// Events generated this tick (cleared each tick)
    #[serde(skip)]
    pub pending_events: Vec<CombatEvent>,
}

impl MatchState {
    /// Create a match after validating tuning and stage.
    pub fn new(config: CombatConfig, stage: StageConfig) -> Result<Self, MatchError> {
        config.validate()?;
        stage.validate(config.fighter.body_width, config.fighter.body_height)?;
        Ok(Self::build(config, stage))
    }

    fn build(config: CombatConfig, stage: StageConfig) -> Self {
        let mut p1 = Fighter::new(
            FighterId::P1,
            Vec2::new(stage.p1_spawn_x, stage.ground_y),
            Facing::Right,
            &config,
        );
        let mut p2 = Fighter::new(
            FighterId::P2,
            Vec2::new(stage.p2_spawn_x, stage.ground_y),
            Facing::Left,
            &config,
        );
        p1.link_opponent(FighterId::P2);
        p2.link_opponent(FighterId::P1);

        Self {
            tick: 0,
            elapsed: 0.0,
            phase: MatchPhase::Waiting,
            config,
            stage,
            fighters: [p1, p2],
            attack_ids: AttackIdSequence::new(),
            winner: None,
            pending_events: Vec::new(),
        }
    }

    /// Leave `Waiting`. A non-positive countdown starts the fight at once.
    pub fn start(&mut self, countdown: f32) -> Result<(), MatchError> {
        if self.phase != MatchPhase::Waiting {
            return Err(MatchError::WrongPhase {
                expected: "waiting",
                actual: self.phase,
            });
        }

        if countdown > 0.0 {
            self.phase = MatchPhase::Countdown { remaining: countdown };
            info!(stage = %self.stage.name, countdown, "match countdown");
        } else {
            self.begin_fight();
        }
        Ok(())
    }

    pub(crate) fn begin_fight(&mut self) {
        self.phase = MatchPhase::Fighting;
        info!(stage = %self.stage.name, "fight");
        let event = CombatEvent::match_started(self.tick, &self.stage.name);
        self.push_event(event);
    }

    /// Get a fighter by id.
    #[inline]
    pub fn fighter(&self, id: FighterId) -> &Fighter {
        &self.fighters[id.index()]
    }

    /// Both fighters in slot order.
    #[inline]
    pub fn fighters(&self) -> &[Fighter; 2] {
        &self.fighters
    }

    /// Id the next attack will receive.
    pub fn next_attack_id(&self) -> u64 {
        self.attack_ids.peek()
    }

    /// Check if match has ended.
    pub fn is_ended(&self) -> bool {
        matches!(self.phase, MatchPhase::Ended)
    }

    /// Fighters still standing.
    pub fn alive_count(&self) -> usize {
        self.fighters.iter().filter(|f| !f.is_dead()).count()
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, |hasher| {
            hasher.update_bytes(self.stage.name.as_bytes());
            hasher.update_f32(self.elapsed);
            hasher.update_u8(self.phase.discriminant());
            if let MatchPhase::Countdown { remaining } = self.phase {
                hasher.update_f32(remaining);
            }

            for fighter in &self.fighters {
                fighter.hash_into(hasher);
            }

            hasher.update_u64(self.attack_ids.peek());
            hasher.update_u8(self.winner.map_or(u8::MAX, |w| w.index() as u8));
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a combat event.
    pub fn push_event(&mut self, event: CombatEvent) {
        self.pending_events.push(event);
    }
}

impl Default for MatchState {
    /// Default tuning on the training stage.
    fn default() -> Self {
        Self::build(CombatConfig::default(), StageConfig::default())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::fighter::ActionState;

    #[test]
    fn test_fighter_id_ordering_and_tags() {
        assert!(FighterId::P1 < FighterId::P2);
        assert_eq!(FighterId::P1.other(), FighterId::P2);
        assert_eq!(FighterId::P2.tag(), "p2");
        assert_eq!(FighterId::P1.to_string(), "p1");
        assert_eq!(FighterId::from_index(1), Some(FighterId::P2));
        assert_eq!(FighterId::from_index(2), None);
        assert_eq!(serde_json::to_string(&FighterId::P1).unwrap(), "\"p1\"");
    }

    #[test]
    fn test_new_match_links_opponents() {
        let state = MatchState::new(CombatConfig::default(), StageConfig::pagoda()).unwrap();

        let p1 = state.fighter(FighterId::P1);
        let p2 = state.fighter(FighterId::P2);
        assert_eq!(p1.opponent(), Some(FighterId::P2));
        assert_eq!(p2.opponent(), Some(FighterId::P1));
        assert_eq!(p1.position(), Vec2::new(200.0, 530.0));
        assert_eq!(p2.position(), Vec2::new(600.0, 530.0));
        assert_eq!(p1.facing(), Facing::Right);
        assert_eq!(p2.facing(), Facing::Left);
        assert_eq!(p1.state(), ActionState::Idle);
        assert_eq!(state.phase, MatchPhase::Waiting);
        assert_eq!(state.alive_count(), 2);
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let mut config = CombatConfig::default();
        config.block.perfect_window = 1.0;
        let err = MatchState::new(config, StageConfig::training()).unwrap_err();
        assert!(matches!(err, MatchError::Config(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_start_twice_fails() {
        let mut state = MatchState::default();
        state.start(0.0).unwrap();
        assert_eq!(state.phase, MatchPhase::Fighting);
        assert_eq!(state.take_events().len(), 1);

        let err = state.start(0.0).unwrap_err();
        assert!(matches!(err, MatchError::WrongPhase { expected: "waiting", .. }));
    }

    #[test]
    fn test_start_with_countdown() {
        let mut state = MatchState::default();
        state.start(3.0).unwrap();
        assert_eq!(state.phase, MatchPhase::Countdown { remaining: 3.0 });
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_match_state_hash_determinism() {
        let a = MatchState::default();
        let b = MatchState::default();
        assert_eq!(a.compute_hash(), b.compute_hash());

        let c = MatchState::new(CombatConfig::default(), StageConfig::temple()).unwrap();
        assert_ne!(a.compute_hash(), c.compute_hash());
    }

    #[test]
    fn test_hash_tracks_phase() {
        let mut state = MatchState::default();
        let waiting = state.compute_hash();
        state.start(0.0).unwrap();
        assert_ne!(waiting, state.compute_hash());
    }
}
