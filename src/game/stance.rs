//! Stances
//!
//! Low / mid / high, sampled every tick from the held vertical direction.

use serde::{Serialize, Deserialize};

/// Guard and attack height.
///
/// Ordered low < mid < high; the discriminant is the index used for
/// stance distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
#[derive(Default)]
pub enum Stance {
    /// Crouched guard, sweeping attacks
    Low = 0,
    /// Neutral
    #[default]
    Mid = 1,
    /// Raised guard, overhead attacks
    High = 2,
}

impl Stance {
    /// All stances in order.
    pub const ALL: [Stance; 3] = [Stance::Low, Stance::Mid, Stance::High];

    /// Position in the ordered sequence (low, mid, high).
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Stance from index (0-2).
    pub fn from_index(index: u8) -> Option<Stance> {
        match index {
            0 => Some(Stance::Low),
            1 => Some(Stance::Mid),
            2 => Some(Stance::High),
            _ => None,
        }
    }

    /// Stance distance: 0 = exact match, 2 = opposite extremes.
    #[inline]
    pub fn distance(self, other: Stance) -> u8 {
        self.index().abs_diff(other.index())
    }

    /// Stance selected by held directions. Up wins over down.
    #[inline]
    pub fn from_held(up: bool, down: bool) -> Stance {
        if up {
            Stance::High
        } else if down {
            Stance::Low
        } else {
            Stance::Mid
        }
    }

    /// Vertical offset of an attack hitbox relative to mid-body, as a
    /// fraction of body height. Screen Y grows downward.
    #[inline]
    pub fn attack_height_factor(self) -> f32 {
        match self {
            Stance::High => -0.25,
            Stance::Mid => 0.0,
            Stance::Low => 0.25,
        }
    }

    /// Which third of the body a block covers, counted from the feet.
    #[inline]
    pub fn guard_band(self) -> u8 {
        self.index()
    }
}
