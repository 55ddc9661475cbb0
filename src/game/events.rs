//! Combat Events
//!
//! Events generated during simulation for renderers, logs and replay checks.

use serde::{Serialize, Deserialize};
use crate::game::attack::AttackType;
use crate::game::guard::GuardOutcome;
use crate::game::stance::Stance;
use crate::game::state::FighterId;

/// Priority for event processing order.
///
/// Lower value = processed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Knockouts first
    KnockOut = 0,
    /// Then guard breaks
    GuardBreak = 1,
    /// Then perfect blocks
    PerfectBlock = 2,
    /// Then every other resolved attack
    AttackLanded = 3,
    /// Match start and end
    MatchLifecycle = 4,
    /// Lowest priority
    Other = 255,
}

/// Combat event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CombatEventData {
    /// An attack reached the defender's body and was resolved
    AttackLanded {
        /// Fighter who threw the attack
        attacker: FighterId,
        /// Fighter the attack reached
        defender: FighterId,
        /// Match-scoped attack id
        attack_id: u64,
        /// Light or heavy
        attack_type: AttackType,
        /// Stance the attack was thrown in
        stance: Stance,
        /// How the defender's guard resolved it
        outcome: GuardOutcome,
        /// Health removed from the defender
        damage: u32,
        /// Attacker's combo length after this hit (0 if it dealt no damage)
        combo: u32,
    },

    /// Defender negated an attack inside the perfect window
    PerfectBlock {
        /// Fighter who blocked
        defender: FighterId,
        /// Fighter whose attack was negated
        attacker: FighterId,
        /// Match-scoped attack id
        attack_id: u64,
        /// Stamina restored to the defender
        stamina_bonus: f32,
    },

    /// Heavy attack broke a matching guard
    GuardBroken {
        /// Fighter whose guard broke
        defender: FighterId,
        /// Fighter who threw the heavy
        attacker: FighterId,
        /// Match-scoped attack id
        attack_id: u64,
        /// Stun applied to the defender (s)
        stun: f32,
    },

    /// A fighter's health reached zero
    FighterKnockedOut {
        /// Fighter knocked out
        fighter: FighterId,
        /// Attacker responsible, if any
        by: Option<FighterId>,
    },

    /// Countdown finished, fighting begins
    MatchStarted {
        /// Stage name
        stage: String,
    },

    /// Match ended
    MatchEnded {
        /// None on a double knockout
        winner: Option<FighterId>,
        /// Fighting ticks simulated
        duration_ticks: u32,
    },
}

/// A combat event with timing and priority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CombatEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Processing priority
    pub priority: EventPriority,

    /// Fighter involved (for tie-breaking)
    pub fighter: Option<FighterId>,

    /// Event data
    pub data: CombatEventData,
}

impl CombatEvent {
    /// Create a new event. The tie-break fighter is derived from the data.
    pub fn new(tick: u32, priority: EventPriority, data: CombatEventData) -> Self {
        let fighter = match &data {
            CombatEventData::AttackLanded { attacker, .. } => Some(*attacker),
            CombatEventData::PerfectBlock { defender, .. } => Some(*defender),
            CombatEventData::GuardBroken { defender, .. } => Some(*defender),
            CombatEventData::FighterKnockedOut { fighter, .. } => Some(*fighter),
            CombatEventData::MatchEnded { winner, .. } => *winner,
            CombatEventData::MatchStarted { .. } => None,
        };

        Self {
            tick,
            priority,
            fighter,
            data,
        }
    }

    /// Create attack landed event.
    #[allow(clippy::too_many_arguments)]
    pub fn attack_landed(
        tick: u32,
        attacker: FighterId,
        defender: FighterId,
        attack_id: u64,
        attack_type: AttackType,
        stance: Stance,
        outcome: GuardOutcome,
        damage: u32,
        combo: u32,
    ) -> Self {
        Self::new(
            tick,
            EventPriority::AttackLanded,
            CombatEventData::AttackLanded {
                attacker,
                defender,
                attack_id,
                attack_type,
                stance,
                outcome,
                damage,
                combo,
            },
        )
    }

    /// Create perfect block event.
    pub fn perfect_block(
        tick: u32,
        defender: FighterId,
        attacker: FighterId,
        attack_id: u64,
        stamina_bonus: f32,
    ) -> Self {
        Self::new(
            tick,
            EventPriority::PerfectBlock,
            CombatEventData::PerfectBlock { defender, attacker, attack_id, stamina_bonus },
        )
    }

    /// Create guard broken event.
    pub fn guard_broken(tick: u32, defender: FighterId, attacker: FighterId, attack_id: u64, stun: f32) -> Self {
        Self::new(
            tick,
            EventPriority::GuardBreak,
            CombatEventData::GuardBroken { defender, attacker, attack_id, stun },
        )
    }

    /// Create knockout event.
    pub fn knocked_out(tick: u32, fighter: FighterId, by: Option<FighterId>) -> Self {
        Self::new(
            tick,
            EventPriority::KnockOut,
            CombatEventData::FighterKnockedOut { fighter, by },
        )
    }

    /// Create match started event.
    pub fn match_started(tick: u32, stage: &str) -> Self {
        Self::new(
            tick,
            EventPriority::MatchLifecycle,
            CombatEventData::MatchStarted { stage: stage.to_string() },
        )
    }

    /// Create match ended event.
    pub fn match_ended(tick: u32, winner: Option<FighterId>) -> Self {
        Self::new(
            tick,
            EventPriority::MatchLifecycle,
            CombatEventData::MatchEnded {
                winner,
                duration_ticks: tick,
            },
        )
    }
}

impl PartialEq for CombatEvent {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick
            && self.priority == other.priority
            && self.fighter == other.fighter
    }
}

impl Eq for CombatEvent {}

impl PartialOrd for CombatEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CombatEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: tick, then priority, then fighter
        self.tick
            .cmp(&other.tick)
            .then(self.priority.cmp(&other.priority))
            .then(self.fighter.cmp(&other.fighter))
    }
}
