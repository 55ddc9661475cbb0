//! Renderer View
//!
//! Read-only snapshots for renderers and HUDs. Nothing here feeds back
//! into the simulation.

use serde::Serialize;

use crate::core::aabb::Aabb;
use crate::core::vec2::Vec2;
use crate::game::attack::{AttackPhase, AttackType};
use crate::game::fighter::{ActionState, Facing, Fighter};
use crate::game::stance::Stance;
use crate::game::state::{FighterId, MatchPhase, MatchState};

/// Which animation a renderer should play for a fighter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    /// Standing still
    Idle,
    /// Walking, or sliding off residual speed
    Walk,
    /// Dash burst
    Dash,
    /// Any phase of a light attack
    AttackLight,
    /// Any phase of a heavy attack
    AttackHeavy,
    /// Guard up
    Block,
    /// Reeling from a hit
    Hit,
    /// Guard broken
    Stunned,
    /// Knocked out
    Dead,
}

impl AnimationState {
    /// Resolve from fighter state.
    ///
    /// An idle fighter reads as walking if it moved under input on its last
    /// update or still carries more than `walk_threshold` horizontal speed.
    pub fn resolve(fighter: &Fighter, walk_threshold: f32) -> Self {
        match fighter.state() {
            ActionState::Idle => {
                if fighter.move_axis() != 0.0 || fighter.velocity().x.abs() > walk_threshold {
                    AnimationState::Walk
                } else {
                    AnimationState::Idle
                }
            }
            ActionState::Dash => AnimationState::Dash,
            ActionState::Attack => match fighter.current_attack().map(|a| a.attack_type) {
                Some(AttackType::Heavy) => AnimationState::AttackHeavy,
                _ => AnimationState::AttackLight,
            },
            ActionState::Block => AnimationState::Block,
            ActionState::Hit => AnimationState::Hit,
            ActionState::Stunned => AnimationState::Stunned,
            ActionState::Dead => AnimationState::Dead,
        }
    }

    /// Clip name.
    pub fn as_str(self) -> &'static str {
        match self {
            AnimationState::Idle => "idle",
            AnimationState::Walk => "walk",
            AnimationState::Dash => "dash",
            AnimationState::AttackLight => "attack_light",
            AnimationState::AttackHeavy => "attack_heavy",
            AnimationState::Block => "block",
            AnimationState::Hit => "hit",
            AnimationState::Stunned => "stunned",
            AnimationState::Dead => "dead",
        }
    }
}

/// Everything a renderer may read about one fighter.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FighterView {
    /// Fighter id
    pub id: FighterId,
    /// "p1" or "p2"
    pub tag: &'static str,
    /// Feet position
    pub position: Vec2,
    /// Facing direction
    pub facing: Facing,
    /// Top-level action state
    pub state: ActionState,
    /// Present only while attacking
    pub attack_phase: Option<AttackPhase>,
    /// Current stance
    pub stance: Stance,
    /// Remaining health
    pub health: u32,
    /// Health cap
    pub max_health: u32,
    /// Remaining stamina
    pub stamina: f32,
    /// Stamina cap
    pub max_stamina: f32,
    /// Present only while visible
    pub attack_hitbox: Option<Aabb>,
    /// Present only while visible
    pub block_hitbox: Option<Aabb>,
    /// True only during the active phase
    pub is_attacking: bool,
    /// Current combo length
    pub combo: u32,
    /// Resolved animation
    pub animation: AnimationState,
}

impl FighterView {
    /// Snapshot a fighter.
    pub fn new(fighter: &Fighter, walk_threshold: f32) -> Self {
        let attacking = fighter.state() == ActionState::Attack;
        Self {
            id: fighter.id(),
            tag: fighter.id().tag(),
            position: fighter.position(),
            facing: fighter.facing(),
            state: fighter.state(),
            attack_phase: attacking.then(|| fighter.attack_phase()),
            stance: fighter.stance(),
            health: fighter.health(),
            max_health: fighter.max_health(),
            stamina: fighter.stamina(),
            max_stamina: fighter.max_stamina(),
            attack_hitbox: fighter.attack_hitbox_visible().then(|| fighter.attack_hitbox()),
            block_hitbox: fighter.block_hitbox_visible().then(|| fighter.block_hitbox()),
            is_attacking: fighter.is_attacking(),
            combo: fighter.combo(),
            animation: AnimationState::resolve(fighter, walk_threshold),
        }
    }
}

/// Whole-match snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchView {
    /// Fighting ticks simulated
    pub tick: u32,
    /// Match phase
    pub phase: MatchPhase,
    /// Stage name
    pub stage: String,
    /// Winner once ended
    pub winner: Option<FighterId>,
    /// Both fighters in slot order
    pub fighters: [FighterView; 2],
}

impl MatchView {
    /// Snapshot a match.
    pub fn new(state: &MatchState) -> Self {
        let threshold = state.config.fighter.walk_anim_threshold;
        let [p1, p2] = state.fighters();
        Self {
            tick: state.tick,
            phase: state.phase,
            stage: state.stage.name.clone(),
            winner: state.winner,
            fighters: [FighterView::new(p1, threshold), FighterView::new(p2, threshold)],
        }
    }

    /// View of one fighter.
    pub fn fighter(&self, id: FighterId) -> &FighterView {
        &self.fighters[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::arbiter::tick;
    use crate::game::input::InputFrame;
    use std::collections::BTreeMap;

    const DT: f32 = 1.0 / 60.0;

    fn fighting() -> MatchState {
        let mut state = MatchState::default();
        state.start(0.0).unwrap();
        state
    }

    fn step(state: &mut MatchState, p1: InputFrame) {
        let mut inputs = BTreeMap::new();
        inputs.insert(FighterId::P1, p1);
        tick(state, &inputs, DT);
    }

    #[test]
    fn test_fresh_match_view() {
        let state = MatchState::default();
        let view = MatchView::new(&state);

        let p1 = view.fighter(FighterId::P1);
        assert_eq!(p1.tag, "p1");
        assert_eq!(p1.animation, AnimationState::Idle);
        assert_eq!(p1.attack_phase, None);
        assert!(p1.attack_hitbox.is_none());
        assert!(p1.block_hitbox.is_none());
        assert_eq!(view.fighter(FighterId::P2).facing, Facing::Left);
        assert_eq!(view.stage, "training");
    }

    #[test]
    fn test_walk_then_slide() {
        let mut state = fighting();
        step(&mut state, InputFrame::new().holding(InputFrame::HELD_RIGHT));
        assert_eq!(MatchView::new(&state).fighter(FighterId::P1).animation, AnimationState::Walk);

        step(&mut state, InputFrame::new());
        assert_eq!(MatchView::new(&state).fighter(FighterId::P1).animation, AnimationState::Idle);

        // Residual speed above the threshold still reads as walking
        state.fighters[0].vel.x = 50.0;
        let p1 = FighterView::new(state.fighter(FighterId::P1), 10.0);
        assert_eq!(p1.animation, AnimationState::Walk);
    }

    #[test]
    fn test_attack_and_block_views() {
        let mut state = fighting();
        step(&mut state, InputFrame::new().pressing(InputFrame::PRESS_HEAVY));
        let view = MatchView::new(&state);
        let p1 = view.fighter(FighterId::P1);
        assert_eq!(p1.animation, AnimationState::AttackHeavy);
        assert_eq!(p1.attack_phase, Some(AttackPhase::Startup));
        assert!(!p1.is_attacking);

        let mut state = fighting();
        step(&mut state, InputFrame::new().pressing(InputFrame::PRESS_BLOCK));
        let p1 = MatchView::new(&state).fighters[0].clone();
        assert_eq!(p1.animation, AnimationState::Block);
        assert!(p1.block_hitbox.is_some());
    }

    #[test]
    fn test_view_serializes() {
        let view = MatchView::new(&MatchState::default());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["fighters"][0]["tag"], "p1");
        assert_eq!(json["fighters"][1]["animation"], "idle");
        assert_eq!(AnimationState::AttackLight.as_str(), "attack_light");
    }
}
