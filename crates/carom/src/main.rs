//! Driver of the event-driven hard-sphere simulation.
//!
//! Loads the configuration from the environment and the initial state
//! from the input directory, then consumes events until the simulated
//! time limit or the wall-clock budget runs out, periodically appending
//! diagnostics tables and saving snapshots under `output/`.

use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use carom_config::Config;
use carom_engine::{Engine, EngineParams};
use carom_io::{Snapshot, save_directory};
use carom_particle::{Restitution, Vector};

mod logging;
mod progress;

use logging::DiagnosticsLog;
use progress::EventLoopPbar;

/// Everything the driver writes lives below this directory.
const OUTPUT_ROOT: &str = "output";

#[derive(thiserror::Error, Debug)]
enum DriverError {
    #[error("configuration: {0}")]
    Config(#[from] carom_config::ConfigError),

    #[error("snapshot: {0}")]
    Snapshot(#[from] carom_io::SnapshotError),

    #[error("engine: {0}")]
    Engine(#[from] carom_engine::EngineError),

    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
}

fn main() -> ExitCode {
    let fmt_layer = fmt::layer().compact();
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter_layer)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("carom: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), DriverError> {
    let wall_start = Instant::now();
    let config = Config::from_env()?;

    let snapshot = Snapshot::load(&config.input_directory)?;
    let lengths = snapshot.lengths;
    let mut iter = snapshot.iter;
    let mut time = snapshot.time;
    let params = EngineParams {
        tmax: config.tmax,
        restitution: Restitution {
            pair: config.restcoef_pp,
            wall: config.restcoef_pw,
            threshold: config.restcoef_threshold,
        },
    };
    let mut engine = Engine::new(lengths, snapshot.to_particles(), params)?;
    info!(iter, time, "initialisation complete");

    let output_root = Path::new(OUTPUT_ROOT);
    let mut diagnostics = DiagnosticsLog::new(output_root.join("log"))?;
    log_state(&mut diagnostics, time, &engine);
    save_state(output_root, iter, time, lengths, &engine);

    let mut log_next = time + config.log_rate;
    let mut save_next = time + config.save_rate;
    let pbar = EventLoopPbar::new(time, config.tmax);

    loop {
        time = engine.process_next()?;
        if time > config.tmax {
            // events past tmax are never planned: nothing was processed
            info!("time limit exceeded");
            break;
        }
        iter += 1;
        if wall_start.elapsed().as_secs_f64() > config.wtmax {
            info!("wall time limit exceeded");
            break;
        }
        if time > log_next {
            engine.advance_all(time);
            pbar.update(time);
            info!(time, iter, "progressing");
            log_state(&mut diagnostics, time, &engine);
            log_next += config.log_rate;
        }
        if time > save_next {
            engine.advance_all(time);
            save_state(output_root, iter, time, lengths, &engine);
            save_next += config.save_rate;
        }
    }

    // capture the final state at a time no pending event precedes
    let final_time = if time.is_finite() {
        time.min(config.tmax)
    } else {
        config.tmax
    };
    engine.advance_all(final_time);
    log_state(&mut diagnostics, final_time, &engine);
    save_state(output_root, iter, final_time, lengths, &engine);
    pbar.finish();
    Ok(())
}

/// Saves a snapshot of the current state; a failure skips the save with a
/// warning and the simulation goes on.
fn save_state(output_root: &Path, iter: u64, time: f64, lengths: Vector, engine: &Engine) {
    let snapshot = Snapshot::from_particles(iter, time, lengths, engine.particles());
    let directory = save_directory(output_root, iter);
    if let Err(error) = snapshot.write(&directory) {
        warn!(%error, "snapshot skipped");
    }
}

/// Appends one diagnostics line per table; failures are not fatal.
fn log_state(diagnostics: &mut DiagnosticsLog, time: f64, engine: &Engine) {
    if let Err(error) = diagnostics.append(time, engine) {
        warn!(%error, "diagnostics line skipped");
    }
}
