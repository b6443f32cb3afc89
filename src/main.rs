//! Galton Board entry point
//!
//! Headless driver: plays the role of the board's main loop without the
//! panel or buttons. It presses "start", ticks on a simulated frame clock,
//! releases a ball whenever the admission interval elapses, and prints the
//! final frame once every ball has landed.
//!
//! Usage: `galton-board [settings.json]`

use anyhow::{Context, Result};
use galton_board::renderer::{render, render_cleared};
use galton_board::sim::{RunPhase, SimulationState, TickInput, tick};
use galton_board::{BoardSettings, HistogramSummary, PixelGrid};

/// Simulated time between two frames
const FRAME_INTERVAL_MICROS: u64 = 5_000;

/// Outcome of one headless run
struct HeadlessRun {
    state: SimulationState,
    /// Last frame drawn before the run finished
    frame: PixelGrid,
    frames: u64,
    /// Simulated microseconds since the start trigger
    clock: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Galton Board (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => BoardSettings::load(&path)
            .with_context(|| format!("Failed to load settings from '{path}'"))?,
        None => {
            log::info!("Using default settings");
            BoardSettings::default()
        }
    };

    let run = run_headless(&settings)?;
    println!("{}", run.frame.to_ascii());

    let summary = HistogramSummary::from_bins(run.state.bins());
    log::info!(
        "{} balls in {} frames ({:.1} ms simulated), peak bin {:?}, unimodal: {}",
        summary.total,
        run.frames,
        run.clock as f64 / 1000.0,
        summary.peak_bin,
        summary.is_unimodal()
    );
    println!("bins: {:?}", run.state.bins());
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("Failed to encode histogram summary")?
    );

    Ok(())
}

/// Press start, tick until the run finishes, then press stop
fn run_headless(settings: &BoardSettings) -> Result<HeadlessRun> {
    settings.validate().context("Settings cannot drive a run")?;

    let layout = settings.layout();
    log::debug!(
        "Lattice: {} rows, step {:.2} x {:.2}, bins at {:?}",
        layout.rows(),
        layout.step_x(),
        layout.step_y(),
        layout.bin_positions()
    );

    let mut state = settings.new_state(&layout);
    let options = settings.render_options();

    // Start trigger; the first ball waits one admission interval
    tick(&mut state, &layout, settings, &TickInput { start: true, ..Default::default() });
    let mut frame = render(&layout, &state, options);

    let mut clock = 0u64;
    let mut last_release = 0u64;
    let mut frames = 0u64;
    while state.phase == RunPhase::Running {
        clock += FRAME_INTERVAL_MICROS;
        let admit = clock - last_release >= settings.admission_interval_micros;
        if admit {
            last_release = clock;
        }

        let report = tick(&mut state, &layout, settings, &TickInput { admit, ..Default::default() });
        if !report.counted.is_empty() {
            log::trace!("Frame {frames}: counted into bins {:?}", report.counted);
        }
        frame = render(&layout, &state, options);
        frames += 1;
    }

    let finished = state.clone();

    // Stop trigger clears the board and blanks the panel
    tick(&mut state, &layout, settings, &TickInput { stop: true, ..Default::default() });
    let cleared = render_cleared(&layout);
    log::debug!("Cleared frame: {} page bytes", cleared.to_page_buffer().len());

    Ok(HeadlessRun {
        state: finished,
        frame,
        frames,
        clock,
    })
}
