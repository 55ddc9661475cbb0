//! Combat Tuning and Stage Configuration
//!
//! Every constant the simulation reads lives here. Defaults reproduce the
//! reference tuning; hosts can override any subset from JSON.

use std::path::Path;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::game::attack::AttackType;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A tuning value breaks a combat invariant.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// JSON could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.into() }
}

// =============================================================================
// FIGHTER BODY
// =============================================================================

/// Body, movement and resource tuning shared by both fighters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FighterTuning {
    /// Starting and maximum health
    pub max_health: u32,
    /// Starting and maximum stamina
    pub max_stamina: f32,
    /// Stamina regenerated per second
    pub stamina_regen: f32,
    /// Walk speed (px/s)
    pub walk_speed: f32,
    /// Downward acceleration (px/s^2)
    pub gravity: f32,
    /// Fraction of horizontal velocity kept per reference tick
    pub friction: f32,
    /// Rate the friction coefficient is expressed at (Hz)
    pub friction_reference_hz: f32,
    /// Body box width (px)
    pub body_width: f32,
    /// Body box height (px)
    pub body_height: f32,
    /// Residual horizontal speed above which an idle fighter reads as walking
    pub walk_anim_threshold: f32,
}

impl Default for FighterTuning {
    fn default() -> Self {
        Self {
            max_health: 100,
            max_stamina: 40.0,
            stamina_regen: 1.0,
            walk_speed: 200.0,
            gravity: 1800.0,
            friction: 0.85,
            friction_reference_hz: 60.0,
            body_width: 40.0,
            body_height: 60.0,
            walk_anim_threshold: 10.0,
        }
    }
}

// =============================================================================
// DASH
// =============================================================================

/// Dash tuning. Forward dashes are faster and last longer than back dashes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashTuning {
    /// Speed of a dash toward the opponent (px/s)
    pub forward_speed: f32,
    /// Duration of a dash toward the opponent (s)
    pub forward_duration: f32,
    /// Speed of a back dash (px/s)
    pub back_speed: f32,
    /// Duration of a back dash (s)
    pub back_duration: f32,
    /// Time before another dash may start (s)
    pub cooldown: f32,
}

impl Default for DashTuning {
    fn default() -> Self {
        Self {
            forward_speed: 600.0,
            forward_duration: 0.15,
            back_speed: 300.0,
            back_duration: 0.1,
            cooldown: 0.5,
        }
    }
}

// =============================================================================
// BLOCK
// =============================================================================

/// Block timing and cost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockTuning {
    /// How long a block is held (s)
    pub duration: f32,
    /// Time before another block may start (s)
    pub cooldown: f32,
    /// Perfect-block window at the start of the block (s)
    pub perfect_window: f32,
    /// Stamina spent to start a block
    pub stamina_cost: f32,
    /// How long the block hitbox stays visible after a perfect block (s)
    pub flash_duration: f32,
}

impl Default for BlockTuning {
    fn default() -> Self {
        Self {
            duration: 0.4,
            cooldown: 0.2,
            perfect_window: 0.12,
            stamina_cost: 5.0,
            flash_duration: 0.1,
        }
    }
}

// =============================================================================
// GUARD OUTCOMES
// =============================================================================

/// Numbers applied by the stance guard resolver for each outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardTuning {
    /// Freeze applied to the defender on a perfect block (s)
    pub perfect_block_hitstop: f32,
    /// Stamina granted to the defender on a perfect block
    pub perfect_block_stamina_bonus: f32,
    /// Hitstun after a normal block (s)
    pub block_hitstun: f32,
    /// Hitstop after a normal block (s)
    pub block_hitstop: f32,
    /// Stun applied on a guard break (s)
    pub guard_break_stun: f32,
    /// Fraction of damage that passes a partial block
    pub partial_block_multiplier: f32,
    /// Hitstun after a partial block (s)
    pub partial_block_hitstun: f32,
    /// Hitstop after a partial block (s)
    pub partial_block_hitstop: f32,
    /// Hitstop after a clean hit (s)
    pub hit_hitstop: f32,
    /// Upward pop on a clean hit against a grounded fighter (px/s)
    pub hit_launch_speed: f32,
    /// Upward pop on a clean hit against an airborne fighter (px/s)
    pub airborne_launch_speed: f32,
}

impl Default for GuardTuning {
    fn default() -> Self {
        Self {
            perfect_block_hitstop: 0.08,
            perfect_block_stamina_bonus: 5.0,
            block_hitstun: 0.0,
            block_hitstop: 0.05,
            guard_break_stun: 1.0,
            partial_block_multiplier: 0.5,
            partial_block_hitstun: 0.08,
            partial_block_hitstop: 0.05,
            hit_hitstop: 0.06,
            hit_launch_speed: 120.0,
            airborne_launch_speed: 180.0,
        }
    }
}

// =============================================================================
// ATTACKS
// =============================================================================

/// Per-attack-type numbers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackProfile {
    /// Health removed by a clean hit
    pub damage: u32,
    /// Hitstun applied by a clean hit (s)
    pub hitstun: f32,
    /// Horizontal knockback speed applied by a clean hit (px/s)
    pub knockback: f32,
    /// Startup (telegraph) duration (s)
    pub startup: f32,
    /// Active (hitbox live) duration (s)
    pub active: f32,
    /// Recovery duration (s)
    pub recovery: f32,
    /// Time from attack start before another attack may start (s)
    pub cooldown: f32,
    /// Stamina spent to start the attack
    pub stamina_cost: f32,
}

impl AttackProfile {
    /// Reference light attack.
    pub fn light() -> Self {
        Self {
            damage: 10,
            hitstun: 0.15,
            knockback: 160.0,
            startup: 0.12,
            active: 0.12,
            recovery: 0.11,
            cooldown: 0.4,
            stamina_cost: 10.0,
        }
    }

    /// Reference heavy attack.
    pub fn heavy() -> Self {
        Self {
            damage: 25,
            hitstun: 0.25,
            knockback: 250.0,
            startup: 0.18,
            active: 0.18,
            recovery: 0.24,
            cooldown: 0.8,
            stamina_cost: 20.0,
        }
    }

    /// Total time from start to the end of recovery.
    pub fn total_duration(&self) -> f32 {
        self.startup + self.active + self.recovery
    }
}

/// Attack profile as written in a config file. Missing fields fall back
/// to the reference profile for that attack type.
#[derive(Deserialize)]
struct AttackProfileOverride {
    damage: Option<u32>,
    hitstun: Option<f32>,
    knockback: Option<f32>,
    startup: Option<f32>,
    active: Option<f32>,
    recovery: Option<f32>,
    cooldown: Option<f32>,
    stamina_cost: Option<f32>,
}

impl AttackProfileOverride {
    fn apply(self, base: AttackProfile) -> AttackProfile {
        AttackProfile {
            damage: self.damage.unwrap_or(base.damage),
            hitstun: self.hitstun.unwrap_or(base.hitstun),
            knockback: self.knockback.unwrap_or(base.knockback),
            startup: self.startup.unwrap_or(base.startup),
            active: self.active.unwrap_or(base.active),
            recovery: self.recovery.unwrap_or(base.recovery),
            cooldown: self.cooldown.unwrap_or(base.cooldown),
            stamina_cost: self.stamina_cost.unwrap_or(base.stamina_cost),
        }
    }
}

fn light_profile<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AttackProfile, D::Error> {
    Ok(AttackProfileOverride::deserialize(deserializer)?.apply(AttackProfile::light()))
}

fn heavy_profile<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AttackProfile, D::Error> {
    Ok(AttackProfileOverride::deserialize(deserializer)?.apply(AttackProfile::heavy()))
}

/// Hitbox geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitboxTuning {
    /// Attack hitbox width (px)
    pub attack_width: f32,
    /// Attack hitbox height (px)
    pub attack_height: f32,
    /// Gap between the body edge and the hitbox (px)
    pub reach_gap: f32,
    /// Block hitbox width (px)
    pub block_width: f32,
}

impl Default for HitboxTuning {
    fn default() -> Self {
        Self {
            attack_width: 60.0,
            attack_height: 20.0,
            reach_gap: 10.0,
            block_width: 40.0,
        }
    }
}

/// Combo tracking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboTuning {
    /// Time after a landed hit during which the next hit extends the combo (s)
    pub window: f32,
}

impl Default for ComboTuning {
    fn default() -> Self {
        Self { window: 0.6 }
    }
}

// =============================================================================
// COMBAT CONFIG
// =============================================================================

/// Complete combat tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Body and resources
    pub fighter: FighterTuning,
    /// Dash
    pub dash: DashTuning,
    /// Block
    pub block: BlockTuning,
    /// Guard outcomes
    pub guard: GuardTuning,
    /// Light attack
    #[serde(deserialize_with = "light_profile")]
    pub light: AttackProfile,
    /// Heavy attack
    #[serde(deserialize_with = "heavy_profile")]
    pub heavy: AttackProfile,
    /// Hitbox geometry
    pub hitbox: HitboxTuning,
    /// Combo tracking
    pub combo: ComboTuning,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            fighter: FighterTuning::default(),
            dash: DashTuning::default(),
            block: BlockTuning::default(),
            guard: GuardTuning::default(),
            light: AttackProfile::light(),
            heavy: AttackProfile::heavy(),
            hitbox: HitboxTuning::default(),
            combo: ComboTuning::default(),
        }
    }
}

impl CombatConfig {
    /// Profile for an attack type.
    #[inline]
    pub fn attack(&self, attack_type: AttackType) -> &AttackProfile {
        match attack_type {
            AttackType::Light => &self.light,
            AttackType::Heavy => &self.heavy,
        }
    }

    /// Parse from JSON and validate. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check every invariant the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.fighter;
        if f.max_health == 0 {
            return Err(invalid("fighter.max_health", "must be at least 1"));
        }
        positive("fighter.max_stamina", f.max_stamina)?;
        non_negative("fighter.stamina_regen", f.stamina_regen)?;
        non_negative("fighter.walk_speed", f.walk_speed)?;
        non_negative("fighter.gravity", f.gravity)?;
        if !(f.friction > 0.0 && f.friction <= 1.0) {
            return Err(invalid("fighter.friction", format!("{} is outside (0, 1]", f.friction)));
        }
        positive("fighter.friction_reference_hz", f.friction_reference_hz)?;
        positive("fighter.body_width", f.body_width)?;
        positive("fighter.body_height", f.body_height)?;

        let d = &self.dash;
        positive("dash.forward_duration", d.forward_duration)?;
        positive("dash.back_duration", d.back_duration)?;
        non_negative("dash.cooldown", d.cooldown)?;
        if d.forward_speed <= d.back_speed {
            return Err(invalid("dash.forward_speed", "must exceed dash.back_speed"));
        }
        if d.forward_duration < d.back_duration {
            return Err(invalid("dash.forward_duration", "must be at least dash.back_duration"));
        }

        let b = &self.block;
        positive("block.duration", b.duration)?;
        non_negative("block.cooldown", b.cooldown)?;
        non_negative("block.perfect_window", b.perfect_window)?;
        non_negative("block.stamina_cost", b.stamina_cost)?;
        non_negative("block.flash_duration", b.flash_duration)?;
        if b.perfect_window >= b.duration {
            return Err(invalid("block.perfect_window", "must be shorter than block.duration"));
        }

        let g = &self.guard;
        positive("guard.guard_break_stun", g.guard_break_stun)?;
        non_negative("guard.perfect_block_hitstop", g.perfect_block_hitstop)?;
        non_negative("guard.perfect_block_stamina_bonus", g.perfect_block_stamina_bonus)?;
        non_negative("guard.block_hitstun", g.block_hitstun)?;
        non_negative("guard.block_hitstop", g.block_hitstop)?;
        non_negative("guard.partial_block_hitstun", g.partial_block_hitstun)?;
        non_negative("guard.partial_block_hitstop", g.partial_block_hitstop)?;
        non_negative("guard.hit_hitstop", g.hit_hitstop)?;
        if !(0.0..=1.0).contains(&g.partial_block_multiplier) {
            return Err(invalid("guard.partial_block_multiplier", "must be within [0, 1]"));
        }

        validate_profile(&self.light, &LIGHT_FIELDS)?;
        validate_profile(&self.heavy, &HEAVY_FIELDS)?;
        if self.heavy.damage <= self.light.damage {
            return Err(invalid("heavy.damage", "must exceed light.damage"));
        }
        if self.heavy.hitstun <= self.light.hitstun {
            return Err(invalid("heavy.hitstun", "must exceed light.hitstun"));
        }
        if self.heavy.knockback <= self.light.knockback {
            return Err(invalid("heavy.knockback", "must exceed light.knockback"));
        }
        if self.heavy.stamina_cost <= self.light.stamina_cost {
            return Err(invalid("heavy.stamina_cost", "must exceed light.stamina_cost"));
        }
        if self.heavy.cooldown < self.light.cooldown {
            return Err(invalid("heavy.cooldown", "must be at least light.cooldown"));
        }

        positive("hitbox.attack_width", self.hitbox.attack_width)?;
        positive("hitbox.attack_height", self.hitbox.attack_height)?;
        positive("hitbox.block_width", self.hitbox.block_width)?;
        non_negative("combo.window", self.combo.window)?;

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{} must be positive", value)))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{} must be non-negative", value)))
    }
}

/// Field paths checked for an attack profile, in declaration order.
const LIGHT_FIELDS: [&str; 7] = [
    "light.startup", "light.active", "light.recovery", "light.hitstun",
    "light.knockback", "light.stamina_cost", "light.cooldown",
];

const HEAVY_FIELDS: [&str; 7] = [
    "heavy.startup", "heavy.active", "heavy.recovery", "heavy.hitstun",
    "heavy.knockback", "heavy.stamina_cost", "heavy.cooldown",
];

fn validate_profile(p: &AttackProfile, fields: &[&'static str; 7]) -> Result<(), ConfigError> {
    positive(fields[0], p.startup)?;
    positive(fields[1], p.active)?;
    positive(fields[2], p.recovery)?;
    non_negative(fields[3], p.hitstun)?;
    non_negative(fields[4], p.knockback)?;
    non_negative(fields[5], p.stamina_cost)?;
    non_negative(fields[6], p.cooldown)?;
    Ok(())
}

// =============================================================================
// STAGE
// =============================================================================

/// Arena geometry for one stage.
///
/// Stages differ only in data; visuals are the renderer's concern.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Stage name
    pub name: String,
    /// Y of the ground line (fighters' feet rest here)
    pub ground_y: f32,
    /// X of the left wall
    pub left_wall: f32,
    /// X of the right wall
    pub right_wall: f32,
    /// Y of the ceiling (heads stay below this)
    pub ceiling_y: f32,
    /// Spawn X of player one
    pub p1_spawn_x: f32,
    /// Spawn X of player two
    pub p2_spawn_x: f32,
}

impl StageConfig {
    /// Arena width shared by the built-in stages.
    pub const ARENA_WIDTH: f32 = 800.0;

    fn preset(name: &str, ground_y: f32) -> Self {
        Self {
            name: name.to_string(),
            ground_y,
            left_wall: 0.0,
            right_wall: Self::ARENA_WIDTH,
            ceiling_y: 0.0,
            p1_spawn_x: 200.0,
            p2_spawn_x: 600.0,
        }
    }

    /// Flat training room.
    pub fn training() -> Self {
        Self::preset("training", 600.0)
    }

    /// Pagoda rooftop.
    pub fn pagoda() -> Self {
        Self::preset("pagoda", 530.0)
    }

    /// Bamboo temple courtyard.
    pub fn temple() -> Self {
        Self::preset("temple", 490.0)
    }

    /// Look up a built-in stage by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "training" => Some(Self::training()),
            "pagoda" => Some(Self::pagoda()),
            "temple" => Some(Self::temple()),
            _ => None,
        }
    }

    /// Check the stage can hold a body of the given size.
    pub fn validate(&self, body_width: f32, body_height: f32) -> Result<(), ConfigError> {
        if self.right_wall - self.left_wall < body_width * 2.0 {
            return Err(invalid("stage.right_wall", "arena is too narrow for two fighters"));
        }
        if self.ground_y - self.ceiling_y < body_height {
            return Err(invalid("stage.ground_y", "arena is shorter than a fighter"));
        }
        let half = body_width * 0.5;
        for (field, x) in [("stage.p1_spawn_x", self.p1_spawn_x), ("stage.p2_spawn_x", self.p2_spawn_x)] {
            if x - half < self.left_wall || x + half > self.right_wall {
                return Err(invalid(field, "spawn point is outside the walls"));
            }
        }
        Ok(())
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self::training()
    }
}

// =============================================================================
// TESTS
// =============================================================================
