//! Progress display for the main event loop.

use indicatif::{ProgressBar, ProgressStyle};

/// The event loop progress bar style.
const EVENT_LOOP_PBAR_STYLE: &str = "{elapsed_precise} [{wide_bar:.cyan/blue}] {percent:>3}% ({eta})";

/// The progress bar chars (filled, current, to do).
const EVENT_LOOP_PROGRESS_CHARS: &str = "#>-";

/// Positions on the bar; simulated time is mapped onto this resolution.
const RESOLUTION: u64 = 1000;

/// Wraps a bar tracking simulated time against `tmax`.
#[derive(Debug)]
pub struct EventLoopPbar {
    pbar: ProgressBar,
    start: f64,
    tmax: f64,
}

impl EventLoopPbar {
    pub fn new(start: f64, tmax: f64) -> Self {
        let style = ProgressStyle::with_template(EVENT_LOOP_PBAR_STYLE)
            .unwrap_or(ProgressStyle::default_bar())
            .progress_chars(EVENT_LOOP_PROGRESS_CHARS);
        let pbar = ProgressBar::new(RESOLUTION).with_style(style);
        Self { pbar, start, tmax }
    }

    /// Moves the bar to the given simulated time.
    pub fn update(&self, time: f64) {
        let span = self.tmax - self.start;
        if span > 0.0 {
            let fraction = ((time - self.start) / span).clamp(0.0, 1.0);
            self.pbar.set_position((fraction * RESOLUTION as f64) as u64);
        }
    }

    pub fn finish(&self) {
        self.pbar.finish();
    }
}
