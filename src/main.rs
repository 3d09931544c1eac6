//! Starship Swarm headless runner
//!
//! Plays a game with the autopilot flying every ship and prints a JSON
//! summary of the final state.
//!
//! Usage: `starship-swarm [settings.json] [frames]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::Path;

    use starship_swarm::GameSettings;
    use starship_swarm::audio::NullAudio;
    use starship_swarm::consts::FRAME_DT;
    use starship_swarm::platform::InputState;
    use starship_swarm::renderer::{RecordingRenderer, render_game};
    use starship_swarm::sim::{GameState, tick};

    /// One minute at 60 Hz
    const DEFAULT_FRAMES: u64 = 3600;

    env_logger::init();
    log::info!("Starship Swarm (headless) starting...");

    let mut args = std::env::args().skip(1);
    let mut settings = match args.next() {
        Some(path) => GameSettings::load_or_default(Path::new(&path)),
        None => GameSettings::default(),
    };
    let frames = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(frames)) => frames,
        Some(Err(err)) => {
            log::warn!("Ignoring frame count: {err}");
            DEFAULT_FRAMES
        }
        None => DEFAULT_FRAMES,
    };
    // Nobody is at the controls
    settings.autopilot = true;

    let mut audio = NullAudio::new();
    let input = InputState::new();
    let mut state = GameState::new(settings, &mut audio);

    for _ in 0..frames {
        tick(&mut state, &input, &mut audio, FRAME_DT);
        if state.is_over() {
            break;
        }
    }

    let mut renderer = RecordingRenderer::new();
    render_game(&state, &mut renderer);
    log::info!(
        "Final frame: {} draw calls, {} vertices",
        renderer.calls.len(),
        renderer.total_vertices()
    );

    let snapshot = state.snapshot();
    state.shutdown(&mut audio);

    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            log::error!("Failed to serialize snapshot: {err}");
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive the library directly
}
