//! Collision Detection
//!
//! Hitbox-versus-body tests, body separation and arena clamping.
//! All functions work on plain boxes; none of them resolve combat.

use crate::game::config::StageConfig;
use crate::game::fighter::Fighter;

/// Check if `attacker`'s live hitbox overlaps `defender`'s body this tick.
///
/// False when the attacker has no active, unlanded attack or the defender's
/// body is inactive.
pub fn attack_connects(attacker: &Fighter, defender: &Fighter) -> bool {
    if !defender.body_active() {
        return false;
    }
    attacker
        .live_hitbox()
        .is_some_and(|(_, hitbox)| hitbox.overlaps(&defender.body_box()))
}

/// Push overlapping bodies apart horizontally, half the overlap each.
///
/// Relative order is preserved; on an exact tie `a` goes left. Returns the
/// total overlap that was removed (0 if none or either body is inactive).
pub fn separate_bodies(a: &mut Fighter, b: &mut Fighter) -> f32 {
    if !a.body_active() || !b.body_active() {
        return 0.0;
    }

    let overlap = a.body_box().horizontal_overlap(&b.body_box());
    if overlap <= 0.0 {
        return 0.0;
    }

    let half = overlap * 0.5;
    if a.pos.x <= b.pos.x {
        a.pos.x -= half;
        b.pos.x += half;
    } else {
        a.pos.x += half;
        b.pos.x -= half;
    }
    overlap
}

/// Keep a fighter's body inside the stage.
///
/// Horizontally the whole body stays between the walls. Vertically the head
/// stays below the ceiling and the feet stay on or above the ground line.
/// Velocity into a wall or the ceiling is cancelled. Dead fighters are left
/// where they fell.
pub fn clamp_to_arena(fighter: &mut Fighter, stage: &StageConfig) {
    if fighter.is_dead() {
        return;
    }

    let half_width = fighter.body_width() * 0.5;
    let height = fighter.body_height();

    let min_x = stage.left_wall + half_width;
    let max_x = stage.right_wall - half_width;
    if fighter.pos.x < min_x {
        fighter.pos.x = min_x;
        fighter.vel.x = fighter.vel.x.max(0.0);
    } else if fighter.pos.x > max_x {
        fighter.pos.x = max_x;
        fighter.vel.x = fighter.vel.x.min(0.0);
    }

    let min_y = stage.ceiling_y + height;
    if fighter.pos.y < min_y {
        fighter.pos.y = min_y;
        fighter.vel.y = fighter.vel.y.max(0.0);
    }
    if fighter.pos.y > stage.ground_y {
        fighter.pos.y = stage.ground_y;
        fighter.vel.y = fighter.vel.y.min(0.0);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::Vec2;
    use crate::game::config::CombatConfig;
    use crate::game::fighter::Facing;
    use crate::game::state::FighterId;

    fn fighter_at(id: FighterId, x: f32) -> Fighter {
        Fighter::new(id, Vec2::new(x, 600.0), Facing::Right, &CombatConfig::default())
    }

    #[test]
    fn test_separation_is_symmetric() {
        let mut a = fighter_at(FighterId::P1, 390.0);
        let mut b = fighter_at(FighterId::P2, 410.0);

        let removed = separate_bodies(&mut a, &mut b);

        assert!((removed - 20.0).abs() < 1e-4);
        assert!((a.position().x - 380.0).abs() < 1e-4);
        assert!((b.position().x - 420.0).abs() < 1e-4);
        assert!(!a.body_box().overlaps(&b.body_box()));
    }

    #[test]
    fn test_separation_preserves_order() {
        let mut a = fighter_at(FighterId::P1, 420.0);
        let mut b = fighter_at(FighterId::P2, 400.0);
        separate_bodies(&mut a, &mut b);
        assert!(a.position().x > b.position().x);
    }

    #[test]
    fn test_separation_tie_breaks_left() {
        let mut a = fighter_at(FighterId::P1, 400.0);
        let mut b = fighter_at(FighterId::P2, 400.0);
        separate_bodies(&mut a, &mut b);
        assert!((a.position().x - 380.0).abs() < 1e-4);
        assert!((b.position().x - 420.0).abs() < 1e-4);
    }

    #[test]
    fn test_touching_bodies_are_not_pushed() {
        let mut a = fighter_at(FighterId::P1, 380.0);
        let mut b = fighter_at(FighterId::P2, 420.0);
        assert_eq!(separate_bodies(&mut a, &mut b), 0.0);
        assert_eq!(a.position().x, 380.0);
    }

    #[test]
    fn test_clamp_walls() {
        let stage = StageConfig::training();
        let mut f = fighter_at(FighterId::P1, -50.0);
        f.vel = Vec2::new(-200.0, 0.0);
        clamp_to_arena(&mut f, &stage);
        assert_eq!(f.position().x, 20.0);
        assert_eq!(f.velocity().x, 0.0);

        let mut g = fighter_at(FighterId::P2, 1000.0);
        clamp_to_arena(&mut g, &stage);
        assert_eq!(g.position().x, 780.0);
    }

    #[test]
    fn test_clamp_ground_and_ceiling() {
        let stage = StageConfig::pagoda();
        let mut f = fighter_at(FighterId::P1, 400.0);
        clamp_to_arena(&mut f, &stage);
        assert_eq!(f.position().y, 530.0);

        f.pos.y = 10.0;
        f.vel.y = -500.0;
        clamp_to_arena(&mut f, &stage);
        assert_eq!(f.position().y, 60.0);
        assert_eq!(f.velocity().y, 0.0);
    }
}
