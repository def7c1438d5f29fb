use std::sync::atomic::{AtomicBool, Ordering};

use log::trace;

use crate::{
    hsb_to_argb,
    schedule::{Assignment, Partition},
    to_field, FrameWriter, Granularity, Grid, NoiseField,
};

/// What one worker did during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkerStats {
    pub id: usize,
    pub units: usize,
    pub cells: usize,
}

/// Draws the units of one assignment into the shared frame.
///
/// Only built by [`Partition::workers`], one per identity.
pub struct Worker<'a> {
    id: usize,
    grid: Grid,
    granularity: Granularity,
    assignment: Assignment<'a>,
    writer: FrameWriter<'a>,
    noise: NoiseField,
    stop: Option<&'a AtomicBool>,
}

impl<'a> Worker<'a> {
    pub(crate) fn new(
        id: usize,
        partition: &'a Partition,
        writer: FrameWriter<'a>,
        noise: NoiseField,
    ) -> Self {
        Self {
            id,
            grid: partition.grid(),
            granularity: partition.granularity(),
            assignment: partition.assignment(id),
            writer,
            noise,
            stop: None,
        }
    }

    /// Check `stop` between units and return early once it is set.
    pub fn with_stop(mut self, stop: &'a AtomicBool) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn run(self) -> WorkerStats {
        let Worker {
            id,
            grid,
            granularity,
            assignment,
            writer,
            noise,
            stop,
        } = self;
        let (width, height) = (grid.width(), grid.height());

        let mut stats = WorkerStats {
            id,
            ..Default::default()
        };
        for unit in assignment {
            if stop.is_some_and(|stop| stop.load(Ordering::Relaxed)) {
                break;
            }
            for index in granularity.cells(grid, unit) {
                let (col, row) = grid.position(index);
                let (x, y) = to_field(col, row, width, height);
                let value = noise.evaluate(x, y);
                // SAFETY: workers only come from `Partition::workers`, which
                // holds the frame exclusively and makes one worker per id, and
                // the partition never gives a unit to two ids.
                unsafe { writer.write(index, hsb_to_argb(value, value, value)) };
                stats.cells += 1;
            }
            stats.units += 1;
        }

        trace!(
            "worker {}: {} units, {} cells",
            id,
            stats.units,
            stats.cells
        );
        stats
    }
}
