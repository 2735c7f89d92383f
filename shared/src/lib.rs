//! Cross-platform shared memory interface for Monkey 3D Game.
//!
//! This library is the controller-side half of the lock-free channel between
//! the controller (state machine) and the game node (renderer). The mapped
//! region is treated as raw bytes; all structured access goes through the
//! [`codec`] module, which owns the field offsets.
//!
//! ## Memory Layout
//!
//! SharedMemory {
//!     commands:       9 used bytes, padded to 16  // Controller -> Game (one-way)
//!     game_structure: 128 bytes                   // Config set by controller,
//!                                                 // state written by game
//! }
//!
//! From controller perspective:
//! - Write: commands + config fields of game_structure (to send commands and
//!   stage the next reset configuration)
//! - Read: game_structure (to observe current state)

/// Shared timing constants for stimulus experiments.
/// These constants ensure consistent timing across all controllers.
pub mod timing {
    /// Target refresh rate in Hz (game runs at 60fps)
    pub const REFRESH_RATE_HZ: u64 = 60;

    /// Duration to show black screen after win (in frames)
    /// At 60fps, 60 frames = 1 second
    pub const WIN_BLANK_DURATION_FRAMES: u64 = 60;

    /// Convert frames to approximate seconds
    pub const fn frames_to_seconds(frames: u64) -> f32 {
        frames as f32 / REFRESH_RATE_HZ as f32
    }

    /// Convert seconds to frames
    pub const fn seconds_to_frames(seconds: f32) -> u64 {
        (seconds * REFRESH_RATE_HZ as f32) as u64
    }
}

pub mod codec;

/// Bytes of the command region actually carrying flags.
pub const COMMANDS_SIZE: usize = 9;

/// Command region including padding: the game structure starts 8-byte aligned.
pub const COMMANDS_REGION_SIZE: usize = 16;

/// Size of the game structure region.
pub const GAME_STATE_SIZE: usize = 128;

/// Total size of the mapped region.
pub const SHARED_MEMORY_SIZE: usize = COMMANDS_REGION_SIZE + GAME_STATE_SIZE;

/// Split the full mapped region into (commands, game_structure) sub-regions.
///
/// Panics if the slice is shorter than [`SHARED_MEMORY_SIZE`]: a short
/// mapping is a contract violation between the two nodes, not a runtime
/// condition.
pub fn split_regions(bytes: &mut [u8]) -> (&mut [u8], &mut [u8]) {
    assert!(
        bytes.len() >= SHARED_MEMORY_SIZE,
        "shared memory region too small: {} < {}",
        bytes.len(),
        SHARED_MEMORY_SIZE
    );
    let (commands, rest) = bytes.split_at_mut(COMMANDS_REGION_SIZE);
    (commands, &mut rest[..GAME_STATE_SIZE])
}

// Platform modules
cfg_if::cfg_if! {
    if #[cfg(not(target_arch = "wasm32"))] {
        mod native;
        pub use native::*;
    } else {
        mod web;
        pub use web::*;
    }
}
