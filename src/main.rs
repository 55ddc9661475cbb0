//! Stance Duel Demo
//!
//! Runs a scripted match between two bots, logs the combat events, then
//! replays the recorded inputs and checks the state hashes agree.
//!
//! Usage: `stance-duel [stage] [config.json]`

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use stance_duel::{
    DEFAULT_DT, DEFAULT_TICK_RATE, VERSION,
    game::{
        arbiter::{replay_match, tick},
        config::{CombatConfig, StageConfig},
        events::CombatEventData,
        input::{InputEdgeDetector, InputFrame, PlayerInputBuffer},
        presentation::MatchView,
        state::{FighterId, MatchPhase, MatchState},
    },
};

/// Demo match cap (60 seconds at the default rate)
const MAX_TICKS: u32 = 60 * DEFAULT_TICK_RATE;

/// Countdown before the fight (s)
const COUNTDOWN: f32 = 1.0;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Stance Duel v{}", VERSION);
    info!("Tick Rate: {} Hz", DEFAULT_TICK_RATE);

    let mut args = std::env::args().skip(1);
    let stage_name = args.next().unwrap_or_else(|| "training".to_string());
    let stage = match StageConfig::by_name(&stage_name) {
        Some(stage) => stage,
        None => bail!("unknown stage `{}` (expected training, pagoda or temple)", stage_name),
    };
    let config = match args.next() {
        Some(path) => CombatConfig::from_json_path(&path)
            .with_context(|| format!("loading combat config from {}", path))?,
        None => CombatConfig::default(),
    };

    demo_match(config, stage)
}

/// Raw button levels for a bot at a given fighting tick.
///
/// P1 walks in and throws lights with the odd high heavy. P2 waits,
/// guards on a rhythm and answers with low lights.
fn scripted_buttons(id: FighterId, t: u32) -> InputFrame {
    let mut frame = InputFrame::new();
    match id {
        FighterId::P1 => {
            if t < 60 {
                frame.set_held(InputFrame::HELD_RIGHT, true);
            }
            match t % 90 {
                0..=3 => frame.set_pressed(InputFrame::PRESS_LIGHT, true),
                45..=48 if t % 270 >= 180 => {
                    frame.set_held(InputFrame::HELD_UP, true);
                    frame.set_pressed(InputFrame::PRESS_HEAVY, true);
                }
                70..=72 => frame.set_pressed(InputFrame::PRESS_DASH, true),
                _ => {}
            }
        }
        FighterId::P2 => {
            if (30..60).contains(&t) {
                frame.set_held(InputFrame::HELD_LEFT, true);
            }
            match t % 75 {
                5..=7 => frame.set_pressed(InputFrame::PRESS_BLOCK, true),
                40..=42 => {
                    frame.set_held(InputFrame::HELD_DOWN, true);
                    frame.set_pressed(InputFrame::PRESS_LIGHT, true);
                }
                _ => {}
            }
        }
    }
    frame
}

fn demo_match(config: CombatConfig, stage: StageConfig) -> Result<()> {
    info!("=== Starting Demo Match ===");
    info!(stage = %stage.name, ground_y = stage.ground_y, "stage");

    let mut state = MatchState::new(config, stage)?;
    state.start(COUNTDOWN)?;

    // Inputs are ignored until the fight begins; nothing is recorded yet
    let idle: BTreeMap<FighterId, InputFrame> = BTreeMap::new();
    while state.phase != MatchPhase::Fighting {
        let result = tick(&mut state, &idle, DEFAULT_DT);
        for event in &result.events {
            info!(tick = event.tick, "{:?}", event.data);
        }
    }
    let initial = state.clone();

    let mut detectors = [InputEdgeDetector::new(), InputEdgeDetector::new()];
    let mut recordings = [
        PlayerInputBuffer::new(FighterId::P1),
        PlayerInputBuffer::new(FighterId::P2),
    ];
    let mut total_events = 0;

    info!("Running up to {} ticks...", MAX_TICKS);
    while state.tick < MAX_TICKS {
        let t = state.tick;
        let mut inputs = BTreeMap::new();
        for id in FighterId::ALL {
            let frame = detectors[id.index()].sample(scripted_buttons(id, t));
            recordings[id.index()].record(t, frame);
            inputs.insert(id, frame);
        }

        let result = tick(&mut state, &inputs, DEFAULT_DT);
        total_events += result.events.len();

        for event in &result.events {
            match &event.data {
                CombatEventData::AttackLanded { attacker, defender, attack_type, stance, outcome, damage, combo, .. } => {
                    info!(
                        tick = event.tick,
                        %attacker, %defender, ?attack_type, ?stance, ?outcome, damage, combo,
                        "attack landed"
                    );
                }
                CombatEventData::PerfectBlock { defender, .. } => {
                    info!(tick = event.tick, %defender, "perfect block");
                }
                CombatEventData::GuardBroken { defender, .. } => {
                    info!(tick = event.tick, %defender, "guard broken");
                }
                _ => {}
            }
        }

        if state.tick % (10 * DEFAULT_TICK_RATE) == 0 {
            let [p1, p2] = state.fighters();
            info!(
                tick = state.tick,
                p1_health = p1.health(),
                p2_health = p2.health(),
                events = total_events,
                "status"
            );
        }

        if result.match_ended {
            break;
        }
    }

    info!("=== Match Results ===");
    match state.winner {
        Some(winner) => info!("Winner: {}", winner),
        None if state.is_ended() => info!("Double knockout"),
        None => info!("Time ran out after {} ticks", state.tick),
    }
    let hash = state.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    info!("Total events: {}", total_events);
    for recording in &recordings {
        info!(
            fighter = %recording.fighter,
            deltas = recording.delta_count(),
            hash = %hex::encode(recording.compute_hash()),
            "input recording"
        );
    }

    info!("=== Verifying Determinism ===");
    let (replayed, replay_events) = replay_match(initial, &recordings, DEFAULT_DT, state.tick);
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    verify_replay(&hash, &replay_hash)?;
    info!("DETERMINISM VERIFIED: Hashes match ({} events)", replay_events.len());

    let view = MatchView::new(&state);
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

/// Fail the run when the replayed state diverged from the live one.
fn verify_replay(live: &[u8], replay: &[u8]) -> Result<()> {
    if live != replay {
        bail!(
            "determinism failure: live hash {} differs from replay hash {}",
            hex::encode(live),
            hex::encode(replay)
        );
    }
    Ok(())
}
