//! Combat Arbiter
//!
//! The per-tick orchestrator. Order inside a fighting tick is fixed:
//!
//! 1. Update both fighters against a pre-tick snapshot of positions
//! 2. Detect hits in both directions, then resolve each landed attack once
//! 3. Push overlapping bodies apart
//! 4. Clamp both fighters to the stage
//! 5. End the match if anyone is down
//!
//! Because detection finishes before any resolution, two attacks that
//! overlap on the same tick trade: both land.

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::core::vec2::Vec2;
use crate::game::attack::AttackInstance;
use crate::game::collision::{attack_connects, clamp_to_arena, separate_bodies};
use crate::game::config::CombatConfig;
use crate::game::events::CombatEvent;
use crate::game::fighter::{Fighter, UpdateContext};
use crate::game::guard::GuardOutcome;
use crate::game::input::{InputFrame, PlayerInputBuffer};
use crate::game::state::{FighterId, MatchPhase, MatchState};

/// Result of a tick.
#[derive(Debug)]
#[derive(Default)]
pub struct TickResult {
    /// Events generated this tick, in (tick, priority, fighter) order
    pub events: Vec<CombatEvent>,
    /// Whether the match is over
    pub match_ended: bool,
    /// Winner (if the match ended with one)
    pub winner: Option<FighterId>,
}

/// Run one simulation tick of `dt` seconds.
///
/// Missing inputs count as idle. `dt` is not sub-stepped; every timer is
/// floored at zero so any positive `dt` makes progress.
pub fn tick(
    state: &mut MatchState,
    inputs: &BTreeMap<FighterId, InputFrame>,
    dt: f32,
) -> TickResult {
    debug_assert!(dt.is_finite() && dt >= 0.0, "bad dt: {}", dt);
    let mut result = TickResult::default();

    match state.phase {
        MatchPhase::Waiting => return result,
        MatchPhase::Countdown { remaining } => {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                state.begin_fight();
            } else {
                state.phase = MatchPhase::Countdown { remaining };
            }
            result.events = take_sorted_events(state);
            return result;
        }
        MatchPhase::Ended => {
            result.match_ended = true;
            result.winner = state.winner;
            return result;
        }
        MatchPhase::Fighting => {}
    }

    state.tick += 1;
    state.elapsed += dt;

    // 1. Independent fighter updates
    advance_fighters(state, inputs, dt);

    // 2. Hit detection and resolution
    process_hits(state);

    // 3-4. Bodies and bounds
    {
        let MatchState { fighters, stage, .. } = state;
        let [p1, p2] = fighters;
        separate_bodies(p1, p2);
        clamp_to_arena(p1, stage);
        clamp_to_arena(p2, stage);
    }

    #[cfg(feature = "debug-tracing")]
    trace_fighters(state);

    // 5. End conditions
    check_end_conditions(state, &mut result);

    result.events = take_sorted_events(state);
    result
}

fn advance_fighters(state: &mut MatchState, inputs: &BTreeMap<FighterId, InputFrame>, dt: f32) {
    let MatchState { fighters, config, stage, attack_ids, .. } = state;
    let snapshot: [Vec2; 2] = [fighters[0].position(), fighters[1].position()];

    for fighter in fighters.iter_mut() {
        let input = inputs.get(&fighter.id()).copied().unwrap_or_default();
        let mut ctx = UpdateContext {
            config: &*config,
            ground_y: stage.ground_y,
            opponent_pos: fighter.opponent().map(|id| snapshot[id.index()]),
            attack_ids: &mut *attack_ids,
        };
        fighter.update(dt, &input, &mut ctx);
    }
}

fn process_hits(state: &mut MatchState) {
    let MatchState { fighters, config, tick, pending_events, .. } = state;
    let [p1, p2] = fighters;

    // Detect both directions before touching either fighter
    let p1_connects = attack_connects(p1, p2);
    let p2_connects = attack_connects(p2, p1);

    let p1_attack = if p1_connects { p1.mark_attack_landed(config) } else { None };
    let p2_attack = if p2_connects { p2.mark_attack_landed(config) } else { None };

    if let Some(attack) = p1_attack {
        resolve_hit(*tick, p1, p2, &attack, config, pending_events);
    }
    if let Some(attack) = p2_attack {
        resolve_hit(*tick, p2, p1, &attack, config, pending_events);
    }
}

fn resolve_hit(
    tick: u32,
    attacker: &mut Fighter,
    defender: &mut Fighter,
    attack: &AttackInstance,
    config: &CombatConfig,
    events: &mut Vec<CombatEvent>,
) {
    let impact = defender.resolve_incoming_attack(attack, config);
    if impact.outcome == GuardOutcome::Ignored {
        return;
    }

    let combo = if impact.outcome.deals_damage() && !attacker.is_dead() {
        attacker.register_landed_hit(config)
    } else {
        0
    };

    events.push(CombatEvent::attack_landed(
        tick,
        attacker.id(),
        defender.id(),
        attack.id,
        attack.attack_type,
        attack.stance,
        impact.outcome,
        impact.damage,
        combo,
    ));

    match impact.outcome {
        GuardOutcome::PerfectBlock => events.push(CombatEvent::perfect_block(
            tick,
            defender.id(),
            attacker.id(),
            attack.id,
            impact.stamina_bonus,
        )),
        GuardOutcome::GuardBreak => events.push(CombatEvent::guard_broken(
            tick,
            defender.id(),
            attacker.id(),
            attack.id,
            impact.stun,
        )),
        _ => {}
    }

    if defender.is_dead() {
        info!(fighter = %defender.id(), by = %attacker.id(), tick, "knockout");
        events.push(CombatEvent::knocked_out(tick, defender.id(), Some(attacker.id())));
    }
}

/// Check if match should end.
fn check_end_conditions(state: &mut MatchState, result: &mut TickResult) {
    if state.alive_count() == 2 {
        return;
    }

    // Survivor wins; a double knockout has no winner
    let winner = state
        .fighters()
        .iter()
        .find(|f| !f.is_dead())
        .map(|f| f.id());

    state.phase = MatchPhase::Ended;
    state.winner = winner;
    result.match_ended = true;
    result.winner = winner;

    info!(tick = state.tick, winner = ?winner, "match ended");
    let event = CombatEvent::match_ended(state.tick, winner);
    state.push_event(event);
}

fn take_sorted_events(state: &mut MatchState) -> Vec<CombatEvent> {
    let mut events = state.take_events();
    events.sort();
    events
}

#[cfg(feature = "debug-tracing")]
fn trace_fighters(state: &MatchState) {
    for f in state.fighters() {
        tracing::trace!(
            tick = state.tick,
            fighter = %f.id(),
            state = f.state().as_str(),
            phase = ?f.attack_phase(),
            stance = ?f.stance(),
            x = f.position().x,
            y = f.position().y,
            health = f.health(),
            stamina = f.stamina(),
            "fighter snapshot"
        );
    }
}

/// Replay a match from recorded inputs at a fixed `dt`.
///
/// Recordings are indexed by fighting tick, so an initial state that is
/// waiting or still counting down is put straight into `Fighting`.
/// Returns the final state and every event produced.
pub fn replay_match(
    initial_state: MatchState,
    recordings: &[PlayerInputBuffer],
    dt: f32,
    tick_count: u32,
) -> (MatchState, Vec<CombatEvent>) {
    let mut state = initial_state;
    let mut all_events = Vec::new();

    if matches!(state.phase, MatchPhase::Waiting | MatchPhase::Countdown { .. }) {
        state.phase = MatchPhase::Fighting;
    }

    for t in 0..tick_count {
        let tick_inputs: BTreeMap<FighterId, InputFrame> = recordings
            .iter()
            .map(|buffer| (buffer.fighter, buffer.get_input_at(t)))
            .collect();

        let result = tick(&mut state, &tick_inputs, dt);
        all_events.extend(result.events);

        if result.match_ended {
            break;
        }
    }

    debug!(ticks = state.tick, events = all_events.len(), "replay finished");
    (state, all_events)
}

// =============================================================================
// TESTS
// =============================================================================
