use std::{fmt, time::Duration};

use crate::{RenderConfig, Strategy};

/// Timing summary of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub strategy: Strategy,
    pub passes: usize,
    pub threads: usize,
    pub width: usize,
    pub height: usize,
    pub elapsed: Duration,
}

impl Report {
    pub fn new(config: &RenderConfig, elapsed: Duration) -> Self {
        Self {
            strategy: config.strategy,
            passes: config.passes,
            threads: config.threads,
            width: config.grid.width(),
            height: config.grid.height(),
            elapsed,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "strategy {} ({}), {} thread(s), {}x{}",
            self.strategy.selector(),
            self.strategy,
            self.threads,
            self.width,
            self.height
        )?;
        write!(
            f,
            "Drawing {} image(s) took {:.6} seconds",
            self.passes,
            self.elapsed.as_secs_f64()
        )
    }
}
