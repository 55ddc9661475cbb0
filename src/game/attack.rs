//! Attack Instances
//!
//! One `AttackInstance` exists per swing. It captures everything the
//! defender needs to resolve the hit and carries the one-shot `has_hit`
//! flag that guarantees the swing lands at most once.

use serde::{Serialize, Deserialize};

use crate::game::config::AttackProfile;
use crate::game::fighter::Facing;
use crate::game::stance::Stance;
use crate::game::state::FighterId;

/// Attack strength.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum AttackType {
    /// Fast, cheap, guard-safe
    Light = 0,
    /// Slow, expensive, breaks a matching guard
    Heavy = 1,
}

impl AttackType {
    /// Attack type from index (0-1).
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(AttackType::Light),
            1 => Some(AttackType::Heavy),
            _ => None,
        }
    }
}

/// Sub-phase of an attack. Only `Active` exposes a hitbox.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
#[derive(Default)]
pub enum AttackPhase {
    /// Telegraph, no hitbox
    #[default]
    Startup = 0,
    /// Hitbox live
    Active = 1,
    /// Hitbox gone, cannot act
    Recovery = 2,
}

/// A single swing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackInstance {
    /// Unique id from the match's attack sequence
    pub id: u64,
    /// Fighter that threw the attack
    pub owner: FighterId,
    /// Light or heavy
    pub attack_type: AttackType,
    /// Attacker's stance when the swing began
    pub stance: Stance,
    /// Damage on a clean hit
    pub damage: u32,
    /// Hitstun on a clean hit (s)
    pub hitstun: f32,
    /// Knockback speed on a clean hit (px/s)
    pub knockback: f32,
    /// Direction the attacker faced when the swing began
    pub facing: Facing,
    /// Attacker's x when the swing connected
    #[serde(default)]
    pub origin_x: Option<f32>,
    /// Set once when the swing connects
    has_hit: bool,
}

impl AttackInstance {
    /// Create a fresh, unlanded attack.
    pub fn new(
        id: u64,
        owner: FighterId,
        attack_type: AttackType,
        stance: Stance,
        facing: Facing,
        profile: &AttackProfile,
    ) -> Self {
        Self {
            id,
            owner,
            attack_type,
            stance,
            damage: profile.damage,
            hitstun: profile.hitstun,
            knockback: profile.knockback,
            facing,
            origin_x: None,
            has_hit: false,
        }
    }

    /// Has this attack already connected?
    #[inline]
    pub fn has_hit(&self) -> bool {
        self.has_hit
    }

    /// Mark the attack as landed.
    ///
    /// Returns `false` if it had already landed; the caller must then not
    /// resolve it again.
    #[inline]
    pub(crate) fn mark_hit(&mut self) -> bool {
        if self.has_hit {
            return false;
        }
        self.has_hit = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AttackInstance {
        AttackInstance::new(
            7,
            FighterId::P1,
            AttackType::Heavy,
            Stance::High,
            Facing::Right,
            &AttackProfile::heavy(),
        )
    }

    #[test]
    fn test_new_attack_copies_profile() {
        let attack = sample();
        let profile = AttackProfile::heavy();
        assert_eq!(attack.id, 7);
        assert_eq!(attack.damage, profile.damage);
        assert_eq!(attack.hitstun, profile.hitstun);
        assert_eq!(attack.knockback, profile.knockback);
        assert_eq!(attack.stance, Stance::High);
        assert!(!attack.has_hit());
    }

    #[test]
    fn test_mark_hit_is_one_shot() {
        let mut attack = sample();
        assert!(attack.mark_hit());
        assert!(attack.has_hit());
        assert!(!attack.mark_hit());
        assert!(attack.has_hit());
    }

    #[test]
    fn test_attack_type_from_index() {
        assert_eq!(AttackType::from_index(0), Some(AttackType::Light));
        assert_eq!(AttackType::from_index(1), Some(AttackType::Heavy));
        assert_eq!(AttackType::from_index(2), None);
    }
}
