// This file is the root of the `monkey_controller` library.
// It declares the `utils` module and its submodules, making them available to other parts of the crate.

/// The `utils` module contains the bridge core and its supporting types.
pub mod utils {
    // The `constants` module contains all the constants used by the controller.
    pub mod constants;
    // The `control_loop` module drives one command tick over shared memory.
    pub mod control_loop;
    // The `inputs` module handles keyboard state and input fusion.
    pub mod inputs;
    // The `macros` module defines macros used by the controller.
    pub mod macros;
    // The `objects` module defines the controller context, modes, and the UI capability surface.
    pub mod objects;
    // The `touch_inputs` module classifies raw pointer events into gestures.
    pub mod touch_inputs;
    // The `trials` module loads and cycles trial configurations.
    pub mod trials;
    // The `win_transition` module sequences the win -> blank -> next-trial protocol.
    pub mod win_transition;
}
