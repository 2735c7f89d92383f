//! Native Controller - Windowed (minifb)
//!
//! This controller opens a small window to handle input reliably.
//! It mimics a standard game loop: poll window events -> feed the bridge ->
//! tick shared memory. The mouse stands in for a single touch contact.

use console::style;
use minifb::{Key, MouseButton, MouseMode, Window, WindowOptions};
use monkey_controller::utils::{
    control_loop::ControlLoop,
    inputs::EdgeDetector,
    objects::{ControllerContext, UiFeedback},
    touch_inputs::GesturePolicy,
    trials::TrialStore,
};
use shared::{codec, open_shared_memory, split_regions, NativeSharedMemory};
use std::{
    error::Error,
    thread,
    time::{Duration, Instant},
};

const WIDTH: usize = 600;
const HEIGHT: usize = 200;

/// Feedback sink rendered into the window title and the terminal.
#[derive(Default)]
struct StatusLine {
    trial_index: usize,
    trial_count: usize,
    status: String,
    active: Vec<String>,
}

impl UiFeedback for StatusLine {
    fn set_indicator(&mut self, name: &str, active: bool) {
        self.active.retain(|n| n != name);
        if active {
            self.active.push(name.to_string());
        }
    }

    fn set_status(&mut self, trial_index: usize, trial_count: usize, status: &str) {
        self.trial_index = trial_index;
        self.trial_count = trial_count;
        if self.status != status {
            self.status = status.to_string();
            let styled = if status.starts_with("WINNER") {
                style(status).green()
            } else if status == "Animating..." || status.starts_with("Wait") {
                style(status).yellow()
            } else {
                style(status).cyan()
            };
            println!("Status: {}", styled);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    println!("Starting Native Controller...");

    // Load trials
    let trials = TrialStore::load();

    // Connect to shared memory
    let mut shm: Option<NativeSharedMemory> = None;

    println!("Waiting for Game Node to initialize Shared Memory...");
    // Simple retry loop; the control loop keeps retrying after this too.
    for _ in 0..10 {
        match open_shared_memory("monkey_game") {
            Ok(m) => {
                shm = Some(m);
                break;
            }
            Err(_) => {
                thread::sleep(Duration::from_secs(1));
                println!("Retrying...");
            }
        }
    }
    if shm.is_none() {
        println!("Shared memory not ready yet; the controller will keep trying.");
    }

    // Create Window
    let mut window = Window::new(
        "Monkey Game Controller - Press ESC to exit",
        WIDTH,
        HEIGHT,
        WindowOptions::default(),
    )?;
    window.set_target_fps(60);

    println!("=== Native Controller Window Open ===");
    println!("Focus the WINDOW to control the game.");
    println!(
        "Controls: Arrows (Rotate/Zoom), Space (Check), R (Reset), B (Blank), P (Pause), O (Resume), Enter (Start), Q (Menu)"
    );

    let mut control = ControlLoop::new(ControllerContext::new(trials, GesturePolicy::default()));
    let mut status = StatusLine::default();
    let started = Instant::now();

    // Edge debounce for one-shot keys
    let mut enter_edge = EdgeDetector::default();
    let mut q_edge = EdgeDetector::default();
    let mut space_edge = EdgeDetector::default();
    let mut r_edge = EdgeDetector::default();
    let mut b_edge = EdgeDetector::default();
    let mut p_edge = EdgeDetector::default();
    let mut o_edge = EdgeDetector::default();
    let mut mouse_was_down = false;
    let mut last_connect_attempt = Instant::now();

    // Framebuffer (black)
    let buffer: Vec<u32> = vec![0; WIDTH * HEIGHT];

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let now = started.elapsed().as_secs_f32();

        // Late mapping: keep trying once a second, tick no-ops meanwhile.
        if shm.is_none() && last_connect_attempt.elapsed() >= Duration::from_secs(1) {
            last_connect_attempt = Instant::now();
            shm = open_shared_memory("monkey_game").ok();
            if shm.is_some() {
                println!("Connected to Shared Memory.");
            }
        }

        // 1. Poll keyboard: directional keys are level-triggered,
        //    everything else fires on the rising edge.
        control.ctx.keys.rotate_left = window.is_key_down(Key::Left);
        control.ctx.keys.rotate_right = window.is_key_down(Key::Right);
        control.ctx.keys.zoom_in = window.is_key_down(Key::Up);
        control.ctx.keys.zoom_out = window.is_key_down(Key::Down);

        if enter_edge.rising(window.is_key_down(Key::Enter)) {
            control.ctx.enter_game();
        }
        if q_edge.rising(window.is_key_down(Key::Q)) {
            control.ctx.exit_to_menu();
        }
        if space_edge.rising(window.is_key_down(Key::Space)) {
            control.ctx.trigger_check();
        }
        if r_edge.rising(window.is_key_down(Key::R)) {
            control.ctx.trigger_reset();
        }
        if b_edge.rising(window.is_key_down(Key::B)) {
            control.ctx.trigger_blank_screen();
        }
        if p_edge.rising(window.is_key_down(Key::P)) {
            control.ctx.trigger_stop_rendering();
        }
        if o_edge.rising(window.is_key_down(Key::O)) {
            control.ctx.trigger_resume_rendering();
        }

        // 2. Mouse as a single touch contact
        let mouse_down = window.get_mouse_down(MouseButton::Left);
        if let Some((x, y)) = window.get_mouse_pos(MouseMode::Clamp) {
            if mouse_down && !mouse_was_down {
                control.ctx.gestures.on_pointer_down(0, x, y, now);
            } else if mouse_down {
                control.ctx.gestures.on_pointer_move(0, x, y, now);
            } else if mouse_was_down {
                control.ctx.gestures.on_pointer_up(0, now);
            }
        }
        mouse_was_down = mouse_down;

        // 3. Tick the bridge
        control.tick(shm.as_mut().map(|m| m.bytes_mut()), now, &mut status);

        // 4. Read Game State (Telemetry)
        let frame_number = shm
            .as_mut()
            .map(|m| {
                let (_, game_region) = split_regions(m.bytes_mut());
                codec::decode_game_state(game_region).frame_number
            })
            .unwrap_or(0);

        // Update Title with Telemetry
        let title = format!(
            "Trial {}/{} | Frame: {} | {} | ←→ Rotate, ↑↓ Zoom, Space Check, R Reset, Enter Start, Q Menu",
            status.trial_index + 1,
            status.trial_count,
            frame_number,
            if status.active.is_empty() {
                status.status.clone()
            } else {
                format!("{} [{}]", status.status, status.active.join(", "))
            }
        );
        window.set_title(&title);

        // 5. Update Window
        // Push black buffer to keep window alive
        window.update_with_buffer(&buffer, WIDTH, HEIGHT)?;
    }

    println!("Controller window closed.");
    Ok(())
}
