//! Input Frames and Recording
//!
//! Logical per-fighter input for one tick, edge detection for action
//! buttons, and delta-compressed recording for replays.
//!
//! Device binding (which key is "up") is the host's concern; this module
//! starts from logical buttons.

use serde::{Serialize, Deserialize};
use crate::core::hash::{StateHash, StateHasher};
use crate::game::state::FighterId;

// =============================================================================
// INPUT FRAME
// =============================================================================

/// Logical input for a single tick.
///
/// Two bytes: held directions and action presses. Press bits are
/// edge-triggered; a frame fed to the simulation carries a press bit only on
/// the tick the button went down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(C)]
pub struct InputFrame {
    /// Held directions (packed bits):
    /// - Bit 0: up
    /// - Bit 1: down
    /// - Bit 2: left
    /// - Bit 3: right
    pub held: u8,

    /// Action presses (packed bits):
    /// - Bit 0: light attack
    /// - Bit 1: heavy attack
    /// - Bit 2: block
    /// - Bit 3: dash
    pub pressed: u8,
}

impl InputFrame {
    /// Size in bytes
    pub const SIZE: usize = 2;

    /// Up held
    pub const HELD_UP: u8 = 0x01;
    /// Down held
    pub const HELD_DOWN: u8 = 0x02;
    /// Left held
    pub const HELD_LEFT: u8 = 0x04;
    /// Right held
    pub const HELD_RIGHT: u8 = 0x08;

    /// Light attack pressed
    pub const PRESS_LIGHT: u8 = 0x01;
    /// Heavy attack pressed
    pub const PRESS_HEAVY: u8 = 0x02;
    /// Block pressed
    pub const PRESS_BLOCK: u8 = 0x04;
    /// Dash pressed
    pub const PRESS_DASH: u8 = 0x08;

    const HELD_MASK: u8 = 0x0F;
    const PRESS_MASK: u8 = 0x0F;

    /// Create an empty input frame.
    pub const fn new() -> Self {
        Self { held: 0, pressed: 0 }
    }

    /// Create a frame from raw bit sets. Reserved bits are dropped.
    pub const fn from_bits(held: u8, pressed: u8) -> Self {
        Self {
            held: held & Self::HELD_MASK,
            pressed: pressed & Self::PRESS_MASK,
        }
    }

    /// Builder: hold a direction bit.
    pub const fn holding(mut self, bit: u8) -> Self {
        self.held |= bit & Self::HELD_MASK;
        self
    }

    /// Builder: press an action bit.
    pub const fn pressing(mut self, bit: u8) -> Self {
        self.pressed |= bit & Self::PRESS_MASK;
        self
    }

    /// Up is held.
    #[inline]
    pub fn up(&self) -> bool {
        self.held & Self::HELD_UP != 0
    }

    /// Down is held.
    #[inline]
    pub fn down(&self) -> bool {
        self.held & Self::HELD_DOWN != 0
    }

    /// Left is held.
    #[inline]
    pub fn left(&self) -> bool {
        self.held & Self::HELD_LEFT != 0
    }

    /// Right is held.
    #[inline]
    pub fn right(&self) -> bool {
        self.held & Self::HELD_RIGHT != 0
    }

    /// Horizontal movement axis: -1, 0 or +1. Opposing directions cancel.
    #[inline]
    pub fn move_axis(&self) -> f32 {
        (self.right() as i8 - self.left() as i8) as f32
    }

    /// Light attack pressed this tick.
    #[inline]
    pub fn light_pressed(&self) -> bool {
        self.pressed & Self::PRESS_LIGHT != 0
    }

    /// Heavy attack pressed this tick.
    #[inline]
    pub fn heavy_pressed(&self) -> bool {
        self.pressed & Self::PRESS_HEAVY != 0
    }

    /// Block pressed this tick.
    #[inline]
    pub fn block_pressed(&self) -> bool {
        self.pressed & Self::PRESS_BLOCK != 0
    }

    /// Dash pressed this tick.
    #[inline]
    pub fn dash_pressed(&self) -> bool {
        self.pressed & Self::PRESS_DASH != 0
    }

    /// No direction held and nothing pressed.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.held == 0 && self.pressed == 0
    }

    /// Set or clear a held direction.
    #[inline]
    pub fn set_held(&mut self, bit: u8, on: bool) {
        if on {
            self.held |= bit & Self::HELD_MASK;
        } else {
            self.held &= !bit;
        }
    }

    /// Set or clear an action press.
    #[inline]
    pub fn set_pressed(&mut self, bit: u8, on: bool) {
        if on {
            self.pressed |= bit & Self::PRESS_MASK;
        } else {
            self.pressed &= !bit;
        }
    }
}

// =============================================================================
// EDGE DETECTION
// =============================================================================

/// Converts level-sampled action buttons into once-per-press frames.
///
/// Feed it a frame whose `pressed` bits mean "button is down right now";
/// the returned frame keeps `held` as is and sets a press bit only on the
/// first tick a button is down.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputEdgeDetector {
    last_down: u8,
}

impl InputEdgeDetector {
    /// Create a detector with every button released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample raw button levels and produce the edge-triggered frame.
    pub fn sample(&mut self, raw: InputFrame) -> InputFrame {
        let down = raw.pressed & InputFrame::PRESS_MASK;
        let edges = down & !self.last_down;
        self.last_down = down;
        InputFrame::from_bits(raw.held, edges)
    }

    /// Forget button history (e.g. on focus loss).
    pub fn reset(&mut self) {
        self.last_down = 0;
    }
}

// =============================================================================
// INPUT RECORDING
// =============================================================================

/// Delta-compressed input entry.
///
/// Only stored when input CHANGES (not every tick).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Tick when this input state began
    pub tick: u32,
    /// The new input state
    pub frame: InputFrame,
}

impl InputDelta {
    /// Size in bytes (approximate)
    pub const SIZE: usize = 6;

    /// Create new delta entry.
    pub fn new(tick: u32, frame: InputFrame) -> Self {
        Self { tick, frame }
    }
}

/// Complete input recording for one fighter in one match.
///
/// Used for replay playback and determinism checks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerInputBuffer {
    /// Fighter this recording drives
    pub fighter: FighterId,

    /// Starting tick (usually 0)
    pub start_tick: u32,

    /// Last recorded tick
    pub end_tick: u32,

    /// Only ticks where input CHANGED.
    deltas: Vec<InputDelta>,

    /// Last recorded input (for delta comparison)
    #[serde(skip)]
    last_frame: InputFrame,
}

impl PlayerInputBuffer {
    /// Create an empty recording.
    pub fn new(fighter: FighterId) -> Self {
        Self {
            fighter,
            start_tick: 0,
            end_tick: 0,
            deltas: Vec::with_capacity(256),
            last_frame: InputFrame::new(),
        }
    }

    /// Record input for a tick.
    ///
    /// Only stores if input changed from previous frame.
    pub fn record(&mut self, tick: u32, frame: InputFrame) {
        debug_assert!(
            self.deltas.last().map_or(true, |d| d.tick <= tick),
            "input recorded out of order"
        );
        self.end_tick = tick;

        if frame != self.last_frame {
            self.deltas.push(InputDelta::new(tick, frame));
            self.last_frame = frame;
        }
    }

    /// Input in effect at a tick.
    pub fn get_input_at(&self, tick: u32) -> InputFrame {
        let idx = self.deltas.partition_point(|d| d.tick <= tick);
        if idx == 0 {
            InputFrame::new()
        } else {
            self.deltas[idx - 1].frame
        }
    }

    /// All stored deltas.
    pub fn deltas(&self) -> &[InputDelta] {
        &self.deltas
    }

    /// Number of delta entries.
    pub fn delta_count(&self) -> usize {
        self.deltas.len()
    }

    /// Estimated size in bytes.
    pub fn estimated_size(&self) -> usize {
        16 + self.deltas.len() * InputDelta::SIZE
    }

    /// Set the final tick (call at match end).
    pub fn finalize(&mut self, end_tick: u32) {
        self.end_tick = end_tick;
    }

    /// Hash of the recording, for comparing logs across machines.
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_input_buffer();
        hasher.update_u8(self.fighter.index() as u8);
        hasher.update_u32(self.start_tick);
        hasher.update_u32(self.end_tick);
        for delta in &self.deltas {
            hasher.update_u32(delta.tick);
            hasher.update_bytes(&[delta.frame.held, delta.frame.pressed]);
        }
        hasher.finalize()
    }

    /// Iterate every tick from `start_tick` to `end_tick` inclusive.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            buffer: self,
            current_tick: self.start_tick,
            delta_idx: 0,
            current_frame: InputFrame::new(),
        }
    }
}

/// Iterator for replaying inputs tick-by-tick.
pub struct ReplayIterator<'a> {
    buffer: &'a PlayerInputBuffer,
    current_tick: u32,
    delta_idx: usize,
    current_frame: InputFrame,
}

impl<'a> Iterator for ReplayIterator<'a> {
    type Item = (u32, InputFrame);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_tick > self.buffer.end_tick {
            return None;
        }

        while let Some(delta) = self.buffer.deltas.get(self.delta_idx) {
            if delta.tick > self.current_tick {
                break;
            }
            self.current_frame = delta.frame;
            self.delta_idx += 1;
        }

        let result = (self.current_tick, self.current_frame);
        self.current_tick += 1;
        Some(result)
    }
}

// =============================================================================
// TESTS
// =============================================================================
