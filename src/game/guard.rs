//! Stance Guard Resolution
//!
//! Pure mapping from (incoming attack, defender guard state) to an impact.
//! Nothing here mutates a fighter or the attack; `Fighter::resolve_incoming_attack`
//! applies the returned `Impact`.
//!
//! ## Outcome table
//!
//! ```text
//! ┌──────────────────────────────┬──────────┬────────┬──────────────────┐
//! │ defender                     │ distance │ attack │ outcome          │
//! ├──────────────────────────────┼──────────┼────────┼──────────────────┤
//! │ dead                         │    -     │   -    │ Ignored          │
//! │ blocking, perfect window > 0 │   any    │  any   │ PerfectBlock     │
//! │ blocking                     │    0     │ heavy  │ GuardBreak       │
//! │ blocking                     │    0     │ light  │ Blocked          │
//! │ blocking                     │    1     │  any   │ PartialBlock     │
//! │ blocking                     │    2     │  any   │ Hit              │
//! │ not blocking                 │    -     │  any   │ Hit              │
//! └──────────────────────────────┴──────────┴────────┴──────────────────┘
//! ```

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::attack::{AttackInstance, AttackType};
use crate::game::config::GuardTuning;
use crate::game::fighter::ActionState;
use crate::game::stance::Stance;

/// What the defender was doing when the attack arrived.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuardContext {
    /// Defender's action state
    pub state: ActionState,
    /// Defender's current stance
    pub stance: Stance,
    /// Perfect-block window remaining (s)
    pub perfect_window: f32,
    /// Defender is off the ground
    pub airborne: bool,
    /// -1.0 or +1.0, pointing from the attacker toward the defender
    pub knockback_dir: f32,
}

/// Classified result of an attack reaching a defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardOutcome {
    /// Defender was already dead
    Ignored,
    /// Blocked inside the perfect window
    PerfectBlock,
    /// Heavy attack on a matching block outside the perfect window
    GuardBreak,
    /// Light attack on a matching block
    Blocked,
    /// Block one stance away
    PartialBlock,
    /// Unblocked, or blocked at the opposite stance
    Hit,
}

impl GuardOutcome {
    /// True if the defender takes damage from this outcome.
    #[inline]
    pub fn deals_damage(self) -> bool {
        matches!(self, GuardOutcome::PartialBlock | GuardOutcome::Hit)
    }
}

/// Everything the defender must apply for one resolved attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Impact {
    /// Classified outcome
    pub outcome: GuardOutcome,
    /// Health to remove
    pub damage: u32,
    /// Hitstun to apply (s)
    pub hitstun: f32,
    /// Hitstop to apply (s)
    pub hitstop: f32,
    /// Stun to apply (s), guard break only
    pub stun: f32,
    /// Stamina to grant
    pub stamina_bonus: f32,
    /// Velocity to impose, clean hits only
    pub knockback: Option<Vec2>,
}

impl Impact {
    fn none(outcome: GuardOutcome) -> Self {
        Self {
            outcome,
            damage: 0,
            hitstun: 0.0,
            hitstop: 0.0,
            stun: 0.0,
            stamina_bonus: 0.0,
            knockback: None,
        }
    }
}

/// Resolve an attack against a defender's guard.
pub fn resolve_guard(ctx: &GuardContext, attack: &AttackInstance, tuning: &GuardTuning) -> Impact {
    if ctx.state == ActionState::Dead {
        return Impact::none(GuardOutcome::Ignored);
    }

    let blocking = ctx.state == ActionState::Block;
    let distance = ctx.stance.distance(attack.stance);
    debug_assert!(distance <= 2, "stance distance out of range: {}", distance);

    if blocking && ctx.perfect_window > 0.0 {
        return Impact {
            hitstop: tuning.perfect_block_hitstop,
            stamina_bonus: tuning.perfect_block_stamina_bonus,
            ..Impact::none(GuardOutcome::PerfectBlock)
        };
    }

    if blocking && distance == 0 {
        return match attack.attack_type {
            AttackType::Heavy => Impact {
                stun: tuning.guard_break_stun,
                ..Impact::none(GuardOutcome::GuardBreak)
            },
            AttackType::Light => Impact {
                hitstun: tuning.block_hitstun,
                hitstop: tuning.block_hitstop,
                ..Impact::none(GuardOutcome::Blocked)
            },
        };
    }

    if blocking && distance == 1 {
        let damage = (attack.damage as f32 * tuning.partial_block_multiplier).round() as u32;
        return Impact {
            damage: damage.min(attack.damage),
            hitstun: tuning.partial_block_hitstun,
            hitstop: tuning.partial_block_hitstop,
            ..Impact::none(GuardOutcome::PartialBlock)
        };
    }

    let launch = if ctx.airborne {
        tuning.airborne_launch_speed
    } else {
        tuning.hit_launch_speed
    };

    Impact {
        damage: attack.damage,
        hitstun: attack.hitstun,
        hitstop: tuning.hit_hitstop,
        knockback: Some(Vec2::new(ctx.knockback_dir * attack.knockback, -launch)),
        ..Impact::none(GuardOutcome::Hit)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::AttackProfile;
    use crate::game::fighter::Facing;
    use crate::game::state::FighterId;

    fn attack(attack_type: AttackType, stance: Stance) -> AttackInstance {
        let profile = match attack_type {
            AttackType::Light => AttackProfile::light(),
            AttackType::Heavy => AttackProfile::heavy(),
        };
        AttackInstance::new(1, FighterId::P1, attack_type, stance, Facing::Right, &profile)
    }

    fn blocking(stance: Stance, perfect_window: f32) -> GuardContext {
        GuardContext {
            state: ActionState::Block,
            stance,
            perfect_window,
            airborne: false,
            knockback_dir: 1.0,
        }
    }

    fn open(state: ActionState) -> GuardContext {
        GuardContext {
            state,
            stance: Stance::Mid,
            perfect_window: 0.0,
            airborne: false,
            knockback_dir: 1.0,
        }
    }

    #[test]
    fn test_dead_defender_ignores() {
        let tuning = GuardTuning::default();
        let impact = resolve_guard(&open(ActionState::Dead), &attack(AttackType::Heavy, Stance::Mid), &tuning);
        assert_eq!(impact.outcome, GuardOutcome::Ignored);
        assert_eq!(impact.damage, 0);
    }

    #[test]
    fn test_perfect_block_any_stance() {
        let tuning = GuardTuning::default();
        for stance in Stance::ALL {
            for kind in [AttackType::Light, AttackType::Heavy] {
                let impact = resolve_guard(&blocking(Stance::Mid, 0.05), &attack(kind, stance), &tuning);
                assert_eq!(impact.outcome, GuardOutcome::PerfectBlock);
                assert_eq!(impact.damage, 0);
                assert_eq!(impact.hitstun, 0.0);
                assert_eq!(impact.stamina_bonus, tuning.perfect_block_stamina_bonus);
                assert!(impact.hitstop > 0.0);
            }
        }
    }

    #[test]
    fn test_guard_break_on_matching_heavy() {
        let tuning = GuardTuning::default();
        let impact = resolve_guard(&blocking(Stance::High, 0.0), &attack(AttackType::Heavy, Stance::High), &tuning);
        assert_eq!(impact.outcome, GuardOutcome::GuardBreak);
        assert_eq!(impact.stun, tuning.guard_break_stun);
        assert_eq!(impact.damage, 0);
    }

    #[test]
    fn test_normal_block_on_matching_light() {
        let tuning = GuardTuning::default();
        let impact = resolve_guard(&blocking(Stance::Low, 0.0), &attack(AttackType::Light, Stance::Low), &tuning);
        assert_eq!(impact.outcome, GuardOutcome::Blocked);
        assert_eq!(impact.damage, 0);
        assert_eq!(impact.hitstop, tuning.block_hitstop);
        assert!(impact.knockback.is_none());
    }

    #[test]
    fn test_partial_block_reduces_damage() {
        let tuning = GuardTuning::default();
        for kind in [AttackType::Light, AttackType::Heavy] {
            let incoming = attack(kind, Stance::High);
            let impact = resolve_guard(&blocking(Stance::Mid, 0.0), &incoming, &tuning);
            assert_eq!(impact.outcome, GuardOutcome::PartialBlock);
            assert!(impact.damage < incoming.damage);
            assert_eq!(
                impact.damage,
                (incoming.damage as f32 * tuning.partial_block_multiplier).round() as u32
            );
            assert_eq!(impact.hitstun, tuning.partial_block_hitstun);
        }
    }

    #[test]
    fn test_opposite_stance_is_full_hit() {
        let tuning = GuardTuning::default();
        let incoming = attack(AttackType::Heavy, Stance::Low);
        let impact = resolve_guard(&blocking(Stance::High, 0.0), &incoming, &tuning);
        assert_eq!(impact.outcome, GuardOutcome::Hit);
        assert_eq!(impact.damage, incoming.damage);
        assert_eq!(impact.hitstun, incoming.hitstun);
    }

    #[test]
    fn test_unblocked_hit_knocks_away_from_attacker() {
        let tuning = GuardTuning::default();
        let incoming = attack(AttackType::Light, Stance::Mid);
        let impact = resolve_guard(&open(ActionState::Idle), &incoming, &tuning);
        assert_eq!(impact.outcome, GuardOutcome::Hit);
        let knockback = impact.knockback.unwrap();
        assert_eq!(knockback.x, incoming.knockback);
        assert_eq!(knockback.y, -tuning.hit_launch_speed);
    }

    #[test]
    fn test_knockback_follows_positions_not_facing() {
        let tuning = GuardTuning::default();
        let incoming = attack(AttackType::Heavy, Stance::Mid);
        let mut ctx = open(ActionState::Idle);
        ctx.knockback_dir = -1.0;
        let impact = resolve_guard(&ctx, &incoming, &tuning);
        assert_eq!(impact.knockback.unwrap().x, -incoming.knockback);
    }

    #[test]
    fn test_airborne_hit_launches_higher() {
        let tuning = GuardTuning::default();
        let mut ctx = open(ActionState::Dash);
        ctx.airborne = true;
        let impact = resolve_guard(&ctx, &attack(AttackType::Light, Stance::Mid), &tuning);
        assert_eq!(impact.knockback.unwrap().y, -tuning.airborne_launch_speed);
    }

    #[test]
    fn test_perfect_window_ignored_when_not_blocking() {
        let tuning = GuardTuning::default();
        let mut ctx = open(ActionState::Attack);
        ctx.perfect_window = 0.1;
        let impact = resolve_guard(&ctx, &attack(AttackType::Light, Stance::Mid), &tuning);
        assert_eq!(impact.outcome, GuardOutcome::Hit);
    }

    #[test]
    fn test_resolver_does_not_touch_has_hit() {
        let tuning = GuardTuning::default();
        let incoming = attack(AttackType::Light, Stance::Mid);
        let _ = resolve_guard(&open(ActionState::Idle), &incoming, &tuning);
        assert!(!incoming.has_hit());
    }
}
