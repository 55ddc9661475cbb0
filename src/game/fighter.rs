//! Fighter State Machine
//!
//! Per-fighter state: body physics, timers, stamina, the attack phase
//! machine and the single entry point for being hit.
//!
//! ## Per-tick order
//!
//! ```text
//! dead?      -> nothing
//! stunned?   -> count stun down, nothing else
//! hitstop?   -> count hitstop down, nothing else
//! timers     -> cooldowns, windows, hitstun, flash, combo
//! physics    -> gravity, velocity, friction, ground
//! stance     -> sampled from held up/down
//! stamina    -> regen
//! hitstun?   -> no actions this tick
//! dispatch   -> idle | dash | attack | block
//! ```
//!
//! A fighter only ever mutates itself. The arbiter hands in the
//! opponent's position and drives hits through `resolve_incoming_attack`.

use serde::{Serialize, Deserialize};
use tracing::{debug, trace};

use crate::core::aabb::Aabb;
use crate::core::hash::StateHasher;
use crate::core::sequence::AttackIdSequence;
use crate::core::vec2::Vec2;
use crate::game::attack::{AttackInstance, AttackPhase, AttackType};
use crate::game::config::{CombatConfig, HitboxTuning};
use crate::game::guard::{resolve_guard, GuardContext, GuardOutcome, Impact};
use crate::game::input::InputFrame;
use crate::game::stance::Stance;
use crate::game::state::FighterId;

// =============================================================================
// FACING
// =============================================================================

/// Horizontal facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
#[derive(Default)]
pub enum Facing {
    /// Toward -X
    Left = 0,
    /// Toward +X
    #[default]
    Right = 1,
}

impl Facing {
    /// -1.0 for left, +1.0 for right.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing for a movement axis. `None` for zero.
    #[inline]
    pub fn from_axis(axis: f32) -> Option<Facing> {
        if axis > 0.0 {
            Some(Facing::Right)
        } else if axis < 0.0 {
            Some(Facing::Left)
        } else {
            None
        }
    }

    /// The other direction.
    #[inline]
    pub fn opposite(self) -> Facing {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

// =============================================================================
// ACTION STATE
// =============================================================================

/// Top-level action state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
#[derive(Default)]
pub enum ActionState {
    /// Free to move and start actions
    #[default]
    Idle = 0,
    /// Dash burst in progress
    Dash = 1,
    /// Attack phase machine running
    Attack = 2,
    /// Guard up
    Block = 3,
    /// Guard broken, frozen until the stun runs out
    Stunned = 4,
    /// Reeling from a hit
    Hit = 5,
    /// Knocked out. Terminal.
    Dead = 6,
}

impl ActionState {
    /// Lowercase name for logs and renderers.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionState::Idle => "idle",
            ActionState::Dash => "dash",
            ActionState::Attack => "attack",
            ActionState::Block => "block",
            ActionState::Stunned => "stunned",
            ActionState::Hit => "hit",
            ActionState::Dead => "dead",
        }
    }
}

// =============================================================================
// TIMERS
// =============================================================================

/// Every countdown a fighter carries, in seconds. All floor at zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FighterTimers {
    /// Remaining dash time
    pub dash: f32,
    /// Time until another dash may start
    pub dash_cooldown: f32,
    /// Remaining block time
    pub block: f32,
    /// Time until another block may start
    pub block_cooldown: f32,
    /// Remaining perfect-block window
    pub perfect_window: f32,
    /// Remaining time in the current attack phase
    pub attack: f32,
    /// Time until another attack may start
    pub attack_cooldown: f32,
    /// Remaining hitstun
    pub hitstun: f32,
    /// Remaining hitstop (local freeze)
    pub hitstop: f32,
    /// Remaining stun
    pub stun: f32,
    /// Remaining perfect-block flash
    pub block_flash: f32,
    /// Remaining combo window
    pub combo: f32,
}

impl FighterTimers {
    fn hash_into(&self, hasher: &mut StateHasher) {
        for value in [
            self.dash, self.dash_cooldown, self.block, self.block_cooldown,
            self.perfect_window, self.attack, self.attack_cooldown, self.hitstun,
            self.hitstop, self.stun, self.block_flash, self.combo,
        ] {
            hasher.update_f32(value);
        }
    }
}

#[inline]
fn count_down(timer: &mut f32, dt: f32) {
    *timer = (*timer - dt).max(0.0);
}

// =============================================================================
// UPDATE CONTEXT
// =============================================================================

/// What a fighter may read from the outside world during its own update.
pub struct UpdateContext<'a> {
    /// Combat tuning
    pub config: &'a CombatConfig,
    /// Ground line of the current stage
    pub ground_y: f32,
    /// Opponent's position, snapshotted before either fighter moved
    pub opponent_pos: Option<Vec2>,
    /// Match-scoped attack id source
    pub attack_ids: &'a mut AttackIdSequence,
}

// =============================================================================
// FIGHTER
// =============================================================================

/// One combatant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Fighter {
    id: FighterId,
    opponent: Option<FighterId>,

    /// Feet, bottom-center of the body box
    pub(crate) pos: Vec2,
    pub(crate) vel: Vec2,
    facing: Facing,
    grounded: bool,
    body_width: f32,
    body_height: f32,
    body_active: bool,

    state: ActionState,
    attack_phase: AttackPhase,
    stance: Stance,

    health: u32,
    max_health: u32,
    stamina: f32,
    max_stamina: f32,

    timers: FighterTimers,
    dash_velocity: f32,
    current_attack: Option<AttackInstance>,

    attack_hitbox: Aabb,
    attack_hitbox_visible: bool,
    block_hitbox: Aabb,
    block_hitbox_visible: bool,

    /// Horizontal walk input applied on the last idle tick
    move_axis: f32,
    combo: u32,
}

impl Fighter {
    /// Create a fighter at full health and stamina, idle, standing at `spawn`.
    pub fn new(id: FighterId, spawn: Vec2, facing: Facing, config: &CombatConfig) -> Self {
        let tuning = &config.fighter;
        Self {
            id,
            opponent: None,
            pos: spawn,
            vel: Vec2::ZERO,
            facing,
            grounded: true,
            body_width: tuning.body_width,
            body_height: tuning.body_height,
            body_active: true,
            state: ActionState::Idle,
            attack_phase: AttackPhase::Startup,
            stance: Stance::Mid,
            health: tuning.max_health,
            max_health: tuning.max_health,
            stamina: tuning.max_stamina,
            max_stamina: tuning.max_stamina,
            timers: FighterTimers::default(),
            dash_velocity: 0.0,
            current_attack: None,
            attack_hitbox: Aabb::default(),
            attack_hitbox_visible: false,
            block_hitbox: Aabb::default(),
            block_hitbox_visible: false,
            move_axis: 0.0,
            combo: 0,
        }
    }

    /// Establish the opponent link. Called once at match setup.
    pub(crate) fn link_opponent(&mut self, opponent: FighterId) {
        debug_assert!(self.opponent.is_none(), "{} already has an opponent", self.id);
        debug_assert_ne!(opponent, self.id, "fighter cannot oppose itself");
        self.opponent = Some(opponent);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Fighter id.
    #[inline]
    pub fn id(&self) -> FighterId {
        self.id
    }

    /// Linked opponent, if any.
    #[inline]
    pub fn opponent(&self) -> Option<FighterId> {
        self.opponent
    }

    /// Feet position.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.pos
    }

    /// Current velocity.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    /// Facing direction.
    #[inline]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Top-level action state.
    #[inline]
    pub fn state(&self) -> ActionState {
        self.state
    }

    /// Attack sub-phase. Only meaningful while `state() == Attack`.
    #[inline]
    pub fn attack_phase(&self) -> AttackPhase {
        self.attack_phase
    }

    /// Stance sampled on the last update.
    #[inline]
    pub fn stance(&self) -> Stance {
        self.stance
    }

    /// Remaining health.
    #[inline]
    pub fn health(&self) -> u32 {
        self.health
    }

    /// Health cap.
    #[inline]
    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Remaining stamina.
    #[inline]
    pub fn stamina(&self) -> f32 {
        self.stamina
    }

    /// Stamina cap.
    #[inline]
    pub fn max_stamina(&self) -> f32 {
        self.max_stamina
    }

    /// All countdowns.
    #[inline]
    pub fn timers(&self) -> &FighterTimers {
        &self.timers
    }

    /// The live attack, if one is in progress.
    #[inline]
    pub fn current_attack(&self) -> Option<&AttackInstance> {
        self.current_attack.as_ref()
    }

    /// True only while the attack hitbox is live.
    #[inline]
    pub fn is_attacking(&self) -> bool {
        self.state == ActionState::Attack && self.attack_phase == AttackPhase::Active
    }

    /// Knocked out.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.state == ActionState::Dead
    }

    /// Feet above the ground line.
    #[inline]
    pub fn is_airborne(&self) -> bool {
        !self.grounded
    }

    /// Body participates in collisions. False once dead.
    #[inline]
    pub fn body_active(&self) -> bool {
        self.body_active
    }

    /// Body box anchored at the feet.
    #[inline]
    pub fn body_box(&self) -> Aabb {
        Aabb::from_bottom_center(self.pos, self.body_width, self.body_height)
    }

    /// Body box width.
    #[inline]
    pub fn body_width(&self) -> f32 {
        self.body_width
    }

    /// Body box height.
    #[inline]
    pub fn body_height(&self) -> f32 {
        self.body_height
    }

    /// Attack hitbox bounds, whether or not visible.
    #[inline]
    pub fn attack_hitbox(&self) -> Aabb {
        self.attack_hitbox
    }

    /// True while the attack hitbox is live.
    #[inline]
    pub fn attack_hitbox_visible(&self) -> bool {
        self.attack_hitbox_visible
    }

    /// Block hitbox bounds, whether or not visible.
    #[inline]
    pub fn block_hitbox(&self) -> Aabb {
        self.block_hitbox
    }

    /// True while the block hitbox is raised or flashing.
    #[inline]
    pub fn block_hitbox_visible(&self) -> bool {
        self.block_hitbox_visible
    }

    /// Walk input applied on the last idle tick (-1, 0, +1).
    #[inline]
    pub fn move_axis(&self) -> f32 {
        self.move_axis
    }

    /// Hits landed inside the current combo window.
    #[inline]
    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// The attack that can still connect this tick, with its hitbox.
    pub fn live_hitbox(&self) -> Option<(&AttackInstance, Aabb)> {
        if !self.is_attacking() || !self.attack_hitbox_visible {
            return None;
        }
        self.current_attack
            .as_ref()
            .filter(|attack| !attack.has_hit())
            .map(|attack| (attack, self.attack_hitbox))
    }

    // =========================================================================
    // Per-tick update
    // =========================================================================

    /// Advance this fighter by `dt` seconds.
    ///
    /// A zero-length tick advances nothing; presses on it are dropped like
    /// any other rejected action.
    pub(crate) fn update(&mut self, dt: f32, input: &InputFrame, ctx: &mut UpdateContext<'_>) {
        debug_assert!(dt.is_finite() && dt >= 0.0, "bad dt: {}", dt);

        if self.state == ActionState::Dead {
            return;
        }
        if !(dt > 0.0) {
            return;
        }

        if self.state == ActionState::Stunned {
            count_down(&mut self.timers.stun, dt);
            if self.timers.stun <= 0.0 {
                trace!(fighter = %self.id, "stun expired");
                self.state = ActionState::Idle;
            }
            return;
        }

        if self.timers.hitstop > 0.0 {
            count_down(&mut self.timers.hitstop, dt);
            return;
        }

        let config = ctx.config;
        self.tick_timers(dt);
        self.integrate(dt, config, ctx.ground_y);
        self.stance = Stance::from_held(input.up(), input.down());
        self.stamina = (self.stamina + config.fighter.stamina_regen * dt).min(self.max_stamina);
        self.move_axis = 0.0;

        if self.timers.hitstun > 0.0 {
            return;
        }
        if self.state == ActionState::Hit {
            trace!(fighter = %self.id, "recovered from hit");
            self.state = ActionState::Idle;
        }

        match self.state {
            ActionState::Idle => self.update_idle(dt, input, ctx),
            ActionState::Dash => self.update_dash(dt),
            ActionState::Attack => self.update_attack(dt, config),
            ActionState::Block => self.update_block(dt, &config.hitbox),
            ActionState::Stunned | ActionState::Hit | ActionState::Dead => {}
        }

        debug_assert!(
            !self.attack_hitbox_visible || self.is_attacking(),
            "attack hitbox visible outside the active phase"
        );
        debug_assert!(self.stamina >= 0.0 && self.stamina <= self.max_stamina);
    }

    fn tick_timers(&mut self, dt: f32) {
        let t = &mut self.timers;
        count_down(&mut t.dash_cooldown, dt);
        count_down(&mut t.block_cooldown, dt);
        count_down(&mut t.attack_cooldown, dt);
        count_down(&mut t.perfect_window, dt);
        count_down(&mut t.hitstun, dt);

        if t.block_flash > 0.0 {
            count_down(&mut t.block_flash, dt);
            if t.block_flash <= 0.0 && self.state != ActionState::Block {
                self.block_hitbox_visible = false;
            }
        }

        if t.combo > 0.0 {
            count_down(&mut t.combo, dt);
            if t.combo <= 0.0 {
                self.combo = 0;
            }
        }
    }

    fn integrate(&mut self, dt: f32, config: &CombatConfig, ground_y: f32) {
        let tuning = &config.fighter;
        self.vel.y += tuning.gravity * dt;
        self.pos += self.vel.scale(dt);
        self.vel.x *= tuning.friction.powf(dt * tuning.friction_reference_hz);

        if self.pos.y >= ground_y {
            self.pos.y = ground_y;
            if self.vel.y > 0.0 {
                self.vel.y = 0.0;
            }
            self.grounded = true;
        } else {
            self.grounded = false;
        }
    }

    // =========================================================================
    // Idle
    // =========================================================================

    fn update_idle(&mut self, dt: f32, input: &InputFrame, ctx: &mut UpdateContext<'_>) {
        let config = ctx.config;
        let axis = input.move_axis();
        if let Some(facing) = Facing::from_axis(axis) {
            self.pos.x += axis * config.fighter.walk_speed * dt;
            self.facing = facing;
            self.move_axis = axis;
        }

        if input.dash_pressed() && self.try_dash(config, ctx.opponent_pos) {
            return;
        }
        if input.light_pressed() && self.begin_attack(AttackType::Light, config, ctx.attack_ids) {
            return;
        }
        if input.heavy_pressed() && self.begin_attack(AttackType::Heavy, config, ctx.attack_ids) {
            return;
        }
        if input.block_pressed() {
            self.try_block(config);
        }
    }

    // =========================================================================
    // Dash
    // =========================================================================

    /// Start a dash along the current facing. Returns `false` if rejected.
    pub(crate) fn try_dash(&mut self, config: &CombatConfig, opponent_pos: Option<Vec2>) -> bool {
        if self.state != ActionState::Idle || self.timers.dash_cooldown > 0.0 {
            trace!(fighter = %self.id, "dash rejected");
            return false;
        }

        // Back dash only when the opponent is strictly behind us
        let forward = opponent_pos
            .map(|opp| (opp.x - self.pos.x) * self.facing.sign() >= 0.0)
            .unwrap_or(true);

        let dash = &config.dash;
        let (speed, duration) = if forward {
            (dash.forward_speed, dash.forward_duration)
        } else {
            (dash.back_speed, dash.back_duration)
        };

        self.state = ActionState::Dash;
        self.dash_velocity = self.facing.sign() * speed;
        self.timers.dash = duration;
        self.timers.dash_cooldown = dash.cooldown;
        trace!(fighter = %self.id, forward, "dash");
        true
    }

    fn update_dash(&mut self, dt: f32) {
        let step = dt.min(self.timers.dash);
        self.pos.x += self.dash_velocity * step;
        self.timers.dash -= step;

        if self.timers.dash <= 0.0 {
            self.timers.dash = 0.0;
            self.dash_velocity = 0.0;
            self.state = ActionState::Idle;
        }
    }

    // =========================================================================
    // Attack
    // =========================================================================

    /// Start an attack in the current stance. Returns `false` if rejected.
    pub(crate) fn begin_attack(
        &mut self,
        attack_type: AttackType,
        config: &CombatConfig,
        ids: &mut AttackIdSequence,
    ) -> bool {
        let profile = config.attack(attack_type);
        if self.state != ActionState::Idle
            || self.timers.attack_cooldown > 0.0
            || self.stamina < profile.stamina_cost
        {
            trace!(fighter = %self.id, ?attack_type, stamina = self.stamina, "attack rejected");
            return false;
        }

        debug_assert!(self.current_attack.is_none(), "starting an attack while one is live");
        self.stamina = (self.stamina - profile.stamina_cost).max(0.0);
        self.current_attack = Some(AttackInstance::new(
            ids.next_id(),
            self.id,
            attack_type,
            self.stance,
            self.facing,
            profile,
        ));
        self.state = ActionState::Attack;
        self.attack_phase = AttackPhase::Startup;
        self.timers.attack = profile.startup;
        self.timers.attack_cooldown = profile.cooldown;
        trace!(fighter = %self.id, ?attack_type, stance = ?self.stance, "attack startup");
        true
    }

    fn update_attack(&mut self, dt: f32, config: &CombatConfig) {
        let Some(attack) = self.current_attack.as_ref() else {
            debug_assert!(false, "attack state without an attack instance");
            self.end_attack();
            return;
        };
        let profile = config.attack(attack.attack_type);
        let stance = attack.stance;
        let landed = attack.has_hit();

        count_down(&mut self.timers.attack, dt);

        match self.attack_phase {
            AttackPhase::Startup => {
                if self.timers.attack <= 0.0 {
                    self.attack_phase = AttackPhase::Active;
                    self.timers.attack = profile.active;
                    self.attack_hitbox_visible = true;
                    self.place_attack_hitbox(stance, &config.hitbox);
                    trace!(fighter = %self.id, "attack active");
                }
            }
            AttackPhase::Active => {
                if self.timers.attack <= 0.0 || landed {
                    self.enter_recovery(profile.recovery);
                } else {
                    self.place_attack_hitbox(stance, &config.hitbox);
                }
            }
            AttackPhase::Recovery => {
                if self.timers.attack <= 0.0 {
                    self.end_attack();
                    trace!(fighter = %self.id, "attack recovered");
                }
            }
        }
    }

    fn enter_recovery(&mut self, recovery: f32) {
        self.attack_phase = AttackPhase::Recovery;
        self.timers.attack = recovery;
        self.attack_hitbox_visible = false;
    }

    fn end_attack(&mut self) {
        self.current_attack = None;
        self.attack_phase = AttackPhase::Startup;
        self.timers.attack = 0.0;
        self.attack_hitbox_visible = false;
        self.state = ActionState::Idle;
    }

    fn place_attack_hitbox(&mut self, stance: Stance, tuning: &HitboxTuning) {
        let reach = self.body_width * 0.5 + tuning.attack_width * 0.5 + tuning.reach_gap;
        let center = Vec2::new(
            self.pos.x + self.facing.sign() * reach,
            self.pos.y - self.body_height * 0.5 + self.body_height * stance.attack_height_factor(),
        );
        self.attack_hitbox = Aabb::from_center(center, tuning.attack_width, tuning.attack_height);
    }

    /// Consume the live attack after it overlapped the opponent.
    ///
    /// Sets `has_hit` and ends the active window early. Returns the landed
    /// attack for resolution, or `None` if there was nothing left to land.
    pub(crate) fn mark_attack_landed(&mut self, config: &CombatConfig) -> Option<AttackInstance> {
        if !self.is_attacking() {
            return None;
        }
        let attack = self.current_attack.as_mut()?;
        if !attack.mark_hit() {
            debug_assert!(false, "attack {} resolved twice", attack.id);
            return None;
        }
        attack.origin_x = Some(self.pos.x);
        let landed = attack.clone();
        self.enter_recovery(config.attack(landed.attack_type).recovery);
        Some(landed)
    }

    /// Count a landed hit toward the combo. Returns the new combo length.
    pub(crate) fn register_landed_hit(&mut self, config: &CombatConfig) -> u32 {
        self.combo = self.combo.saturating_add(1);
        self.timers.combo = config.combo.window;
        self.combo
    }

    // =========================================================================
    // Block
    // =========================================================================

    /// Raise the guard. Returns `false` if rejected.
    pub(crate) fn try_block(&mut self, config: &CombatConfig) -> bool {
        let block = &config.block;
        if self.state != ActionState::Idle
            || self.timers.block_cooldown > 0.0
            || self.stamina < block.stamina_cost
        {
            trace!(fighter = %self.id, stamina = self.stamina, "block rejected");
            return false;
        }

        self.stamina = (self.stamina - block.stamina_cost).max(0.0);
        self.state = ActionState::Block;
        self.timers.block = block.duration;
        self.timers.perfect_window = block.perfect_window;
        self.timers.block_cooldown = block.cooldown;
        self.timers.block_flash = 0.0;
        self.block_hitbox_visible = true;
        self.place_block_hitbox(&config.hitbox);
        trace!(fighter = %self.id, stance = ?self.stance, "block");
        true
    }

    fn update_block(&mut self, dt: f32, tuning: &HitboxTuning) {
        count_down(&mut self.timers.block, dt);
        self.place_block_hitbox(tuning);

        if self.timers.block <= 0.0 {
            self.timers.perfect_window = 0.0;
            self.block_hitbox_visible = false;
            self.state = ActionState::Idle;
        }
    }

    fn place_block_hitbox(&mut self, tuning: &HitboxTuning) {
        let reach = self.body_width * 0.5 + tuning.block_width * 0.5 + tuning.reach_gap;
        let third = self.body_height / 3.0;
        let bottom = Vec2::new(
            self.pos.x + self.facing.sign() * reach,
            self.pos.y - third * self.stance.guard_band() as f32,
        );
        self.block_hitbox = Aabb::from_bottom_center(bottom, tuning.block_width, third);
    }

    fn lower_guard(&mut self) {
        self.timers.block = 0.0;
        self.timers.perfect_window = 0.0;
        self.block_hitbox_visible = false;
    }

    // =========================================================================
    // Being hit
    // =========================================================================

    /// Force a stun. Cancels whatever the fighter was doing.
    pub(crate) fn stun(&mut self, duration: f32) {
        if self.state == ActionState::Dead {
            return;
        }
        debug_assert!(duration.is_finite() && duration >= 0.0);
        self.cancel_actions();
        self.lower_guard();
        self.timers.hitstun = 0.0;
        self.timers.hitstop = 0.0;
        self.timers.stun = duration.max(0.0);
        self.state = ActionState::Stunned;
        debug!(fighter = %self.id, duration, "stunned");
    }

    /// Apply an attack that reached this fighter's body.
    ///
    /// The only way one fighter affects the other. The caller has already
    /// consumed the attack's `has_hit`.
    pub(crate) fn resolve_incoming_attack(
        &mut self,
        attack: &AttackInstance,
        config: &CombatConfig,
    ) -> Impact {
        debug_assert!(attack.has_hit(), "resolving an attack that was not marked");
        debug_assert_ne!(attack.owner, self.id, "fighter hit by its own attack");

        // Away from where the attacker stood; facing only breaks a tie
        let knockback_dir = attack
            .origin_x
            .and_then(|x| Facing::from_axis(self.pos.x - x))
            .unwrap_or(attack.facing)
            .sign();
        let ctx = GuardContext {
            state: self.state,
            stance: self.stance,
            perfect_window: self.timers.perfect_window,
            airborne: self.is_airborne(),
            knockback_dir,
        };
        let impact = resolve_guard(&ctx, attack, &config.guard);

        match impact.outcome {
            GuardOutcome::Ignored => {}
            GuardOutcome::PerfectBlock => {
                self.gain_stamina(impact.stamina_bonus);
                self.timers.hitstop = impact.hitstop;
                self.timers.block = 0.0;
                self.timers.perfect_window = 0.0;
                self.timers.block_flash = config.block.flash_duration;
                self.block_hitbox_visible = config.block.flash_duration > 0.0;
                self.state = ActionState::Idle;
            }
            GuardOutcome::GuardBreak => {
                self.stun(impact.stun);
            }
            GuardOutcome::Blocked => {
                self.lower_guard();
                self.timers.hitstun = impact.hitstun;
                self.timers.hitstop = impact.hitstop;
                self.state = ActionState::Idle;
            }
            GuardOutcome::PartialBlock => {
                self.lower_guard();
                if self.take_damage(impact.damage) {
                    self.timers.hitstun = impact.hitstun;
                    self.timers.hitstop = impact.hitstop;
                    self.state = ActionState::Hit;
                }
            }
            GuardOutcome::Hit => {
                self.cancel_actions();
                self.lower_guard();
                if self.take_damage(impact.damage) {
                    self.timers.hitstun = impact.hitstun;
                    self.timers.hitstop = impact.hitstop;
                    if let Some(knockback) = impact.knockback {
                        self.vel = knockback;
                    }
                    self.state = ActionState::Hit;
                }
            }
        }

        debug!(
            defender = %self.id,
            attacker = %attack.owner,
            attack_id = attack.id,
            outcome = ?impact.outcome,
            damage = impact.damage,
            health = self.health,
            "attack resolved"
        );
        impact
    }

    /// Remove health. Returns `true` if the fighter survived.
    fn take_damage(&mut self, damage: u32) -> bool {
        self.health = self.health.saturating_sub(damage);
        if self.health == 0 {
            self.die();
            return false;
        }
        true
    }

    fn die(&mut self) {
        self.cancel_actions();
        self.lower_guard();
        self.timers = FighterTimers::default();
        self.health = 0;
        self.vel = Vec2::ZERO;
        self.move_axis = 0.0;
        self.body_active = false;
        self.block_hitbox_visible = false;
        self.state = ActionState::Dead;
        debug!(fighter = %self.id, "knocked out");
    }

    fn cancel_actions(&mut self) {
        if self.current_attack.take().is_some() {
            trace!(fighter = %self.id, "attack cancelled");
        }
        self.attack_phase = AttackPhase::Startup;
        self.attack_hitbox_visible = false;
        self.timers.attack = 0.0;
        self.timers.dash = 0.0;
        self.timers.stun = 0.0;
        self.dash_velocity = 0.0;
    }

    fn gain_stamina(&mut self, amount: f32) {
        self.stamina = (self.stamina + amount).clamp(0.0, self.max_stamina);
    }

    #[cfg(test)]
    pub(crate) fn set_health(&mut self, health: u32) {
        self.health = health.min(self.max_health);
    }

    #[cfg(test)]
    pub(crate) fn set_stamina(&mut self, stamina: f32) {
        self.stamina = stamina.clamp(0.0, self.max_stamina);
    }

    // =========================================================================
    // Hashing
    // =========================================================================

    /// Hash every observable field.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u8(self.id.index() as u8);
        hasher.update_vec2(self.pos);
        hasher.update_vec2(self.vel);
        hasher.update_u8(self.facing as u8);
        hasher.update_bool(self.grounded);
        hasher.update_bool(self.body_active);
        hasher.update_u8(self.state as u8);
        hasher.update_u8(self.attack_phase as u8);
        hasher.update_u8(self.stance.index());
        hasher.update_u32(self.health);
        hasher.update_f32(self.stamina);
        self.timers.hash_into(hasher);
        hasher.update_f32(self.dash_velocity);
        match &self.current_attack {
            Some(attack) => {
                hasher.update_bool(true);
                hasher.update_u64(attack.id);
                hasher.update_u8(attack.attack_type as u8);
                hasher.update_u8(attack.stance.index());
                hasher.update_bool(attack.has_hit());
            }
            None => hasher.update_bool(false),
        }
        hasher.update_aabb(&self.attack_hitbox);
        hasher.update_bool(self.attack_hitbox_visible);
        hasher.update_aabb(&self.block_hitbox);
        hasher.update_bool(self.block_hitbox_visible);
        hasher.update_f32(self.move_axis);
        hasher.update_u32(self.combo);
    }
}

// =============================================================================
// TESTS
// =============================================================================
