//! Web (WASM) shared memory implementation.
//!
//! The game node allocates the region inside WASM linear memory; JS hands the
//! base pointer to this wrapper, which exposes the two sub-region pointers so
//! either side can build views over them.

use crate::{COMMANDS_REGION_SIZE, GAME_STATE_SIZE, SHARED_MEMORY_SIZE};
use wasm_bindgen::prelude::*;

/// Helper wrapper for WASM side
#[wasm_bindgen]
pub struct WebSharedMemory {
    ptr: *mut u8,
}

#[wasm_bindgen]
impl WebSharedMemory {
    #[wasm_bindgen(constructor)]
    pub fn new(ptr: usize) -> Self {
        Self { ptr: ptr as *mut u8 }
    }

    /// Get base pointer to the shared region
    pub fn get_ptr(&self) -> usize {
        self.ptr as usize
    }

    /// Get pointer to the command region (for writing commands)
    pub fn get_commands_ptr(&self) -> usize {
        self.ptr as usize
    }

    /// Get pointer to the game structure (for reading state / staging config)
    pub fn get_game_structure_ptr(&self) -> usize {
        self.ptr as usize + COMMANDS_REGION_SIZE
    }

    /// Size of the game structure region in bytes
    pub fn game_structure_size(&self) -> usize {
        GAME_STATE_SIZE
    }
}

impl WebSharedMemory {
    /// View the whole region as mutable bytes for the codec.
    ///
    /// Safety: the pointer must come from the game node's allocation and
    /// stay valid for the page lifetime, which the bootstrap guarantees.
    pub unsafe fn bytes_mut(&mut self) -> &mut [u8] {
        std::slice::from_raw_parts_mut(self.ptr, SHARED_MEMORY_SIZE)
    }
}

/// Monotonic-enough clock for gesture timestamps on the web (seconds).
pub fn now_secs() -> f64 {
    js_sys::Date::now() / 1000.0
}
