//! Bit-exact codec for the two shared-memory frames.
//!
//! Both nodes must agree on offsets, endianness, and the convention that
//! floats travel as their raw IEEE-754 bit pattern. 64-bit fields are split
//! into two 32-bit little-endian words (low word first) because the web
//! controller's view primitives operate in 32-bit units; decoding recombines
//! `(high << 32) | low`.
//!
//! The codec does not validate field values. Out-of-domain numbers (negative
//! radius, colors outside [0,1]) are written as-is; the game node is the
//! authority on rejecting nonsensical state. The only checked condition is a
//! buffer shorter than the frame, which is a contract violation between the
//! two nodes and fails loudly.

use byteorder::{ByteOrder, LittleEndian};

use crate::{COMMANDS_SIZE, GAME_STATE_SIZE};

// ============================================================================
// COMMAND FRAME
// ============================================================================

// Command region byte offsets (9 bytes total).
const OFF_ROTATE_LEFT: usize = 0;
const OFF_ROTATE_RIGHT: usize = 1;
const OFF_ZOOM_IN: usize = 2;
const OFF_ZOOM_OUT: usize = 3;
const OFF_CHECK_ALIGNMENT: usize = 4;
const OFF_RESET: usize = 5;
const OFF_BLANK_SCREEN: usize = 6;
const OFF_STOP_RENDERING: usize = 7;
const OFF_RESUME_RENDERING: usize = 8;

/// Commands sent from Controller to Game, one byte per flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandFrame {
    /// Rotate pyramid left (continuous)
    pub rotate_left: bool,
    /// Rotate pyramid right (continuous)
    pub rotate_right: bool,
    /// Zoom camera in (continuous)
    pub zoom_in: bool,
    /// Zoom camera out (continuous)
    pub zoom_out: bool,
    /// Trigger: Check alignment
    pub check_alignment: bool,
    /// Trigger: Reset game (Game reads config from game_structure when this is true)
    pub reset: bool,
    /// Trigger: Blank the screen (show black overlay)
    pub blank_screen: bool,
    /// Trigger: Stop/pause rendering
    pub stop_rendering: bool,
    /// Trigger: Resume rendering
    pub resume_rendering: bool,
}

impl CommandFrame {
    /// Clear the one-shot triggers. These are valid for exactly one written
    /// frame; the control loop calls this after every encode.
    pub fn clear_one_shots(&mut self) {
        self.check_alignment = false;
        self.reset = false;
        self.blank_screen = false;
        self.stop_rendering = false;
        self.resume_rendering = false;
    }
}

/// Encode a command frame into the command region.
pub fn encode_commands(frame: &CommandFrame, buf: &mut [u8]) {
    assert!(
        buf.len() >= COMMANDS_SIZE,
        "command buffer too small: {} < {}",
        buf.len(),
        COMMANDS_SIZE
    );
    buf[OFF_ROTATE_LEFT] = frame.rotate_left as u8;
    buf[OFF_ROTATE_RIGHT] = frame.rotate_right as u8;
    buf[OFF_ZOOM_IN] = frame.zoom_in as u8;
    buf[OFF_ZOOM_OUT] = frame.zoom_out as u8;
    buf[OFF_CHECK_ALIGNMENT] = frame.check_alignment as u8;
    buf[OFF_RESET] = frame.reset as u8;
    buf[OFF_BLANK_SCREEN] = frame.blank_screen as u8;
    buf[OFF_STOP_RENDERING] = frame.stop_rendering as u8;
    buf[OFF_RESUME_RENDERING] = frame.resume_rendering as u8;
}

/// Decode a command frame from the command region (game-node side).
pub fn decode_commands(buf: &[u8]) -> CommandFrame {
    assert!(
        buf.len() >= COMMANDS_SIZE,
        "command buffer too small: {} < {}",
        buf.len(),
        COMMANDS_SIZE
    );
    CommandFrame {
        rotate_left: buf[OFF_ROTATE_LEFT] != 0,
        rotate_right: buf[OFF_ROTATE_RIGHT] != 0,
        zoom_in: buf[OFF_ZOOM_IN] != 0,
        zoom_out: buf[OFF_ZOOM_OUT] != 0,
        check_alignment: buf[OFF_CHECK_ALIGNMENT] != 0,
        reset: buf[OFF_RESET] != 0,
        blank_screen: buf[OFF_BLANK_SCREEN] != 0,
        stop_rendering: buf[OFF_STOP_RENDERING] != 0,
        resume_rendering: buf[OFF_RESUME_RENDERING] != 0,
    }
}

// ============================================================================
// GAME STRUCTURE
// ============================================================================

// Game structure byte offsets (128 bytes total).
// Offsets 0..76 are config fields (written by controller, read by game on
// reset); 76..128 are state fields (written by game every frame).
const OFF_SEED: usize = 0;
const OFF_PYRAMID_TYPE: usize = 8;
const OFF_BASE_RADIUS: usize = 12;
const OFF_HEIGHT: usize = 16;
const OFF_START_ORIENT: usize = 20;
const OFF_TARGET_DOOR: usize = 24;
const OFF_COLORS: usize = 28;
const OFF_PHASE: usize = 76;
const OFF_FRAME_NUMBER: usize = 80;
const OFF_ELAPSED_SECS: usize = 88;
const OFF_CAMERA_RADIUS: usize = 92;
const OFF_CAMERA_X: usize = 96;
const OFF_CAMERA_Y: usize = 100;
const OFF_CAMERA_Z: usize = 104;
const OFF_PYRAMID_YAW: usize = 108;
const OFF_ATTEMPTS: usize = 112;
const OFF_ALIGNMENT: usize = 116;
const OFF_IS_ANIMATING: usize = 120;
const OFF_HAS_WON: usize = 121;
const OFF_WIN_TIME: usize = 124;

/// Game phase: playing.
pub const PHASE_PLAYING: u32 = 0;
/// Game phase: won.
pub const PHASE_WON: u32 = 1;

/// Alignment value the game writes when no check has happened yet.
const ALIGNMENT_NONE_SENTINEL: f32 = 2.0;

/// Configuration the game reads from the game structure when a reset is
/// triggered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResetConfig {
    /// Random seed for procedural generation
    pub seed: u64,
    /// Pyramid type: 0=Type1, 1=Type2
    pub pyramid_type: u32,
    /// Base radius of pyramid
    pub base_radius: f32,
    /// Height of pyramid
    pub height: f32,
    /// Starting orientation in radians
    pub start_orient: f32,
    /// Target door index
    pub target_door: u32,
    /// Colors: 3 faces * 4 channels (RGBA)
    pub colors: [[f32; 4]; 3],
}

/// Decoded view of the game structure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameStateFrame {
    /// Config echo (the last configuration staged for reset)
    pub config: ResetConfig,
    /// Current game phase: 0=Playing, 1=Won
    pub phase: u32,
    /// Current frame number (monotonic, game-incremented)
    pub frame_number: u64,
    /// Elapsed seconds since game start
    pub elapsed_secs: f32,
    /// Camera orbit radius
    pub camera_radius: f32,
    /// Camera position
    pub camera_x: f32,
    pub camera_y: f32,
    pub camera_z: f32,
    /// Pyramid yaw in radians
    pub pyramid_yaw: f32,
    /// Number of alignment check attempts
    pub attempts: u32,
    /// Cosine alignment of the last check, if any
    pub alignment: Option<f32>,
    /// Whether door animation is currently playing
    pub is_animating: bool,
    /// Whether the player has won
    pub has_won: bool,
    /// Seconds from round start to win, 0.0 if not won yet
    pub win_time: f32,
}

// 64-bit fields travel as two 32-bit LE words, low word first.
fn write_u64_words(buf: &mut [u8], offset: usize, value: u64) {
    LittleEndian::write_u32(&mut buf[offset..offset + 4], value as u32);
    LittleEndian::write_u32(&mut buf[offset + 4..offset + 8], (value >> 32) as u32);
}

fn read_u64_words(buf: &[u8], offset: usize) -> u64 {
    let low = LittleEndian::read_u32(&buf[offset..offset + 4]) as u64;
    let high = LittleEndian::read_u32(&buf[offset + 4..offset + 8]) as u64;
    (high << 32) | low
}

fn write_f32_bits(buf: &mut [u8], offset: usize, value: f32) {
    LittleEndian::write_u32(&mut buf[offset..offset + 4], value.to_bits());
}

fn read_f32_bits(buf: &[u8], offset: usize) -> f32 {
    f32::from_bits(LittleEndian::read_u32(&buf[offset..offset + 4]))
}

/// Write a reset configuration into the config fields of the game structure.
///
/// Only offsets 0..76 are touched; the state fields stay game-owned.
pub fn encode_config(config: &ResetConfig, buf: &mut [u8]) {
    assert!(
        buf.len() >= GAME_STATE_SIZE,
        "game structure buffer too small: {} < {}",
        buf.len(),
        GAME_STATE_SIZE
    );
    write_u64_words(buf, OFF_SEED, config.seed);
    LittleEndian::write_u32(&mut buf[OFF_PYRAMID_TYPE..OFF_PYRAMID_TYPE + 4], config.pyramid_type);
    write_f32_bits(buf, OFF_BASE_RADIUS, config.base_radius);
    write_f32_bits(buf, OFF_HEIGHT, config.height);
    write_f32_bits(buf, OFF_START_ORIENT, config.start_orient);
    LittleEndian::write_u32(&mut buf[OFF_TARGET_DOOR..OFF_TARGET_DOOR + 4], config.target_door);
    for (face_idx, face_colors) in config.colors.iter().enumerate() {
        for (chan_idx, &channel) in face_colors.iter().enumerate() {
            let offset = OFF_COLORS + (face_idx * 4 + chan_idx) * 4;
            write_f32_bits(buf, offset, channel);
        }
    }
}

/// Decode the full game structure.
pub fn decode_game_state(buf: &[u8]) -> GameStateFrame {
    assert!(
        buf.len() >= GAME_STATE_SIZE,
        "game structure buffer too small: {} < {}",
        buf.len(),
        GAME_STATE_SIZE
    );
    let mut colors = [[0.0f32; 4]; 3];
    for face_idx in 0..3 {
        for chan_idx in 0..4 {
            let offset = OFF_COLORS + (face_idx * 4 + chan_idx) * 4;
            colors[face_idx][chan_idx] = read_f32_bits(buf, offset);
        }
    }

    let alignment_raw = read_f32_bits(buf, OFF_ALIGNMENT);
    let alignment = if alignment_raw == ALIGNMENT_NONE_SENTINEL {
        None
    } else {
        Some(alignment_raw)
    };

    GameStateFrame {
        config: ResetConfig {
            seed: read_u64_words(buf, OFF_SEED),
            pyramid_type: LittleEndian::read_u32(&buf[OFF_PYRAMID_TYPE..OFF_PYRAMID_TYPE + 4]),
            base_radius: read_f32_bits(buf, OFF_BASE_RADIUS),
            height: read_f32_bits(buf, OFF_HEIGHT),
            start_orient: read_f32_bits(buf, OFF_START_ORIENT),
            target_door: LittleEndian::read_u32(&buf[OFF_TARGET_DOOR..OFF_TARGET_DOOR + 4]),
            colors,
        },
        phase: LittleEndian::read_u32(&buf[OFF_PHASE..OFF_PHASE + 4]),
        frame_number: read_u64_words(buf, OFF_FRAME_NUMBER),
        elapsed_secs: read_f32_bits(buf, OFF_ELAPSED_SECS),
        camera_radius: read_f32_bits(buf, OFF_CAMERA_RADIUS),
        camera_x: read_f32_bits(buf, OFF_CAMERA_X),
        camera_y: read_f32_bits(buf, OFF_CAMERA_Y),
        camera_z: read_f32_bits(buf, OFF_CAMERA_Z),
        pyramid_yaw: read_f32_bits(buf, OFF_PYRAMID_YAW),
        attempts: LittleEndian::read_u32(&buf[OFF_ATTEMPTS..OFF_ATTEMPTS + 4]),
        alignment,
        is_animating: buf[OFF_IS_ANIMATING] != 0,
        has_won: buf[OFF_HAS_WON] != 0,
        win_time: read_f32_bits(buf, OFF_WIN_TIME),
    }
}

/// Write the state fields of the game structure (game-node side; the
/// controller only ever calls this from tests that stand in for the game).
pub fn encode_game_state(state: &GameStateFrame, buf: &mut [u8]) {
    assert!(
        buf.len() >= GAME_STATE_SIZE,
        "game structure buffer too small: {} < {}",
        buf.len(),
        GAME_STATE_SIZE
    );
    encode_config(&state.config, buf);
    LittleEndian::write_u32(&mut buf[OFF_PHASE..OFF_PHASE + 4], state.phase);
    write_u64_words(buf, OFF_FRAME_NUMBER, state.frame_number);
    write_f32_bits(buf, OFF_ELAPSED_SECS, state.elapsed_secs);
    write_f32_bits(buf, OFF_CAMERA_RADIUS, state.camera_radius);
    write_f32_bits(buf, OFF_CAMERA_X, state.camera_x);
    write_f32_bits(buf, OFF_CAMERA_Y, state.camera_y);
    write_f32_bits(buf, OFF_CAMERA_Z, state.camera_z);
    write_f32_bits(buf, OFF_PYRAMID_YAW, state.pyramid_yaw);
    LittleEndian::write_u32(&mut buf[OFF_ATTEMPTS..OFF_ATTEMPTS + 4], state.attempts);
    write_f32_bits(
        buf,
        OFF_ALIGNMENT,
        state.alignment.unwrap_or(ALIGNMENT_NONE_SENTINEL),
    );
    buf[OFF_IS_ANIMATING] = state.is_animating as u8;
    buf[OFF_HAS_WON] = state.has_won as u8;
    // Padding bytes 122..124 stay zero.
    write_f32_bits(buf, OFF_WIN_TIME, state.win_time);
}

impl Default for GameStateFrame {
    fn default() -> Self {
        Self {
            config: ResetConfig {
                seed: 0,
                pyramid_type: 0,
                base_radius: 0.0,
                height: 0.0,
                start_orient: 0.0,
                target_door: 0,
                colors: [[0.0; 4]; 3],
            },
            phase: PHASE_PLAYING,
            frame_number: 0,
            elapsed_secs: 0.0,
            camera_radius: 0.0,
            camera_x: 0.0,
            camera_y: 0.0,
            camera_z: 0.0,
            pyramid_yaw: 0.0,
            attempts: 0,
            alignment: None,
            is_animating: false,
            has_won: false,
            win_time: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GAME_STATE_SIZE;

    fn sample_config() -> ResetConfig {
        ResetConfig {
            seed: 0xDEAD_BEEF_0000_0045,
            pyramid_type: 1,
            base_radius: 2.5,
            height: 4.0,
            start_orient: 0.7853982,
            target_door: 5,
            colors: [
                [1.0, 0.2, 0.2, 1.0],
                [0.2, 0.5, 1.0, 1.0],
                [0.2, 1.0, 0.3, 1.0],
            ],
        }
    }

    #[test]
    fn command_frame_round_trips() {
        let frame = CommandFrame {
            rotate_left: true,
            zoom_out: true,
            reset: true,
            resume_rendering: true,
            ..Default::default()
        };
        let mut buf = [0u8; COMMANDS_SIZE];
        encode_commands(&frame, &mut buf);
        assert_eq!(decode_commands(&buf), frame);
        // Flag order on the wire is fixed.
        assert_eq!(buf, [1, 0, 0, 0, 0, 1, 0, 0, 1]);
    }

    #[test]
    fn config_round_trips_bit_for_bit() {
        let config = sample_config();
        let mut buf = [0u8; GAME_STATE_SIZE];
        encode_config(&config, &mut buf);
        let decoded = decode_game_state(&buf).config;
        assert_eq!(decoded.seed, config.seed);
        assert_eq!(decoded.pyramid_type, config.pyramid_type);
        assert_eq!(decoded.base_radius.to_bits(), config.base_radius.to_bits());
        assert_eq!(decoded.height.to_bits(), config.height.to_bits());
        assert_eq!(decoded.start_orient.to_bits(), config.start_orient.to_bits());
        assert_eq!(decoded.target_door, config.target_door);
        for face in 0..3 {
            for chan in 0..4 {
                assert_eq!(
                    decoded.colors[face][chan].to_bits(),
                    config.colors[face][chan].to_bits()
                );
            }
        }
    }

    #[test]
    fn seed_words_are_little_endian_low_first() {
        let config = ResetConfig {
            seed: 0x1122_3344_5566_7788,
            ..sample_config()
        };
        let mut buf = [0u8; GAME_STATE_SIZE];
        encode_config(&config, &mut buf);
        // Low word first, each word little-endian.
        assert_eq!(&buf[0..8], &[0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11]);
    }

    #[test]
    fn game_state_round_trips_with_large_frame_number() {
        let state = GameStateFrame {
            config: sample_config(),
            phase: PHASE_WON,
            frame_number: (7u64 << 32) | 42,
            elapsed_secs: 12.5,
            camera_radius: 8.0,
            camera_x: 1.0,
            camera_y: 0.5,
            camera_z: 7.9,
            pyramid_yaw: -1.25,
            attempts: 3,
            alignment: Some(0.97),
            is_animating: true,
            has_won: true,
            win_time: 11.75,
        };
        let mut buf = [0u8; GAME_STATE_SIZE];
        encode_game_state(&state, &mut buf);
        assert_eq!(decode_game_state(&buf), state);
    }

    #[test]
    fn alignment_sentinel_decodes_to_none() {
        let mut buf = [0u8; GAME_STATE_SIZE];
        let state = GameStateFrame::default();
        encode_game_state(&state, &mut buf);
        assert_eq!(decode_game_state(&buf).alignment, None);
    }

    #[test]
    fn negative_radius_passes_through_unvalidated() {
        let config = ResetConfig {
            base_radius: -3.0,
            ..sample_config()
        };
        let mut buf = [0u8; GAME_STATE_SIZE];
        encode_config(&config, &mut buf);
        assert_eq!(decode_game_state(&buf).config.base_radius, -3.0);
    }

    #[test]
    #[should_panic(expected = "game structure buffer too small")]
    fn decode_rejects_short_buffer() {
        let buf = [0u8; GAME_STATE_SIZE - 1];
        let _ = decode_game_state(&buf);
    }

    #[test]
    #[should_panic(expected = "command buffer too small")]
    fn encode_commands_rejects_short_buffer() {
        let mut buf = [0u8; COMMANDS_SIZE - 1];
        encode_commands(&CommandFrame::default(), &mut buf);
    }
}
