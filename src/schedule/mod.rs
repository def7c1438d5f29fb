//! Partitioning of the grid among the workers of a pass.
//!
//! Every strategy hands out units (pixels, rows or blocks of rows) and every
//! unit covers a contiguous row-major range of cells. Static strategies
//! stride through the units by the thread count, dynamic ones claim them one
//! by one from a [`SharedCounter`].

use std::{fmt, ops::Range};

use crate::{Frame, Grid, NoiseField, RenderError, Result, Worker};

mod counter;

pub use counter::SharedCounter;

/// Rows per block for the block strategies.
pub const BLOCK_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    RowStatic,
    BlockStatic,
    PixelStatic,
    RowDynamic,
    PixelDynamic,
    BlockDynamic,
}

impl Strategy {
    /// All strategies in selector order.
    pub const ALL: [Strategy; 6] = [
        Strategy::RowStatic,
        Strategy::BlockStatic,
        Strategy::PixelStatic,
        Strategy::RowDynamic,
        Strategy::PixelDynamic,
        Strategy::BlockDynamic,
    ];

    /// Strategy for a selector in `1..=6`.
    pub fn from_selector(selector: u8) -> Result<Self> {
        match selector {
            1..=6 => Ok(Self::ALL[selector as usize - 1]),
            _ => Err(RenderError::InvalidConfiguration(format!(
                "strategy selector must be in [1, 6], got {}",
                selector
            ))),
        }
    }

    pub fn selector(&self) -> u8 {
        match self {
            Strategy::RowStatic => 1,
            Strategy::BlockStatic => 2,
            Strategy::PixelStatic => 3,
            Strategy::RowDynamic => 4,
            Strategy::PixelDynamic => 5,
            Strategy::BlockDynamic => 6,
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            Strategy::PixelStatic | Strategy::PixelDynamic => Granularity::Pixel,
            Strategy::RowStatic | Strategy::RowDynamic => Granularity::Row,
            Strategy::BlockStatic | Strategy::BlockDynamic => Granularity::Block,
        }
    }

    /// Whether the workers claim units from a shared counter.
    pub fn is_dynamic(&self) -> bool {
        matches!(
            self,
            Strategy::RowDynamic | Strategy::PixelDynamic | Strategy::BlockDynamic
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::RowStatic => "row-static",
            Strategy::BlockStatic => "block-static",
            Strategy::PixelStatic => "pixel-static",
            Strategy::RowDynamic => "row-dynamic",
            Strategy::PixelDynamic => "pixel-dynamic",
            Strategy::BlockDynamic => "block-dynamic",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unit of assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Pixel,
    Row,
    Block,
}

impl Granularity {
    /// Number of units covering the grid.
    pub fn unit_count(&self, grid: Grid) -> usize {
        match self {
            Granularity::Pixel => grid.len(),
            Granularity::Row => grid.height(),
            Granularity::Block => grid.height().div_ceil(BLOCK_SIZE),
        }
    }

    /// Linear cell indices covered by `unit`.
    /// The last block is clipped to the grid height.
    pub fn cells(&self, grid: Grid, unit: usize) -> Range<usize> {
        let width = grid.width();
        match self {
            Granularity::Pixel => unit..unit + 1,
            Granularity::Row => unit * width..(unit + 1) * width,
            Granularity::Block => {
                let first_row = unit * BLOCK_SIZE;
                let end_row = (first_row + BLOCK_SIZE).min(grid.height());
                first_row * width..end_row * width
            }
        }
    }
}

/// Lazy sequence of unit indices for one worker.
#[derive(Debug)]
pub enum Assignment<'a> {
    /// `next, next + step, ...` while below `limit`.
    Stride {
        next: usize,
        step: usize,
        limit: usize,
    },
    /// Units claimed from a shared counter while below `limit`.
    Claim {
        counter: &'a SharedCounter,
        limit: usize,
        exhausted: bool,
    },
}

impl<'a> Assignment<'a> {
    pub fn stride(id: usize, threads: usize, limit: usize) -> Self {
        Assignment::Stride {
            next: id,
            step: threads,
            limit,
        }
    }

    pub fn claim(counter: &'a SharedCounter, limit: usize) -> Self {
        Assignment::Claim {
            counter,
            limit,
            exhausted: false,
        }
    }
}

impl Iterator for Assignment<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match self {
            Assignment::Stride { next, step, limit } => {
                if *next >= *limit {
                    return None;
                }
                let unit = *next;
                *next = next.saturating_add(*step);
                Some(unit)
            }
            Assignment::Claim {
                counter,
                limit,
                exhausted,
            } => {
                if *exhausted {
                    return None;
                }
                let unit = counter.claim();
                if unit >= *limit {
                    *exhausted = true;
                    return None;
                }
                Some(unit)
            }
        }
    }
}

impl std::iter::FusedIterator for Assignment<'_> {}

enum Discipline {
    Static,
    Dynamic(SharedCounter),
}

/// The partition of one pass: strategy, grid and thread count, plus the
/// counter when the strategy is dynamic.
pub struct Partition {
    strategy: Strategy,
    grid: Grid,
    threads: usize,
    discipline: Discipline,
}

impl Partition {
    pub fn new(strategy: Strategy, grid: Grid, threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(RenderError::InvalidConfiguration(
                "thread count must be positive".to_string(),
            ));
        }
        let discipline = if strategy.is_dynamic() {
            Discipline::Dynamic(SharedCounter::new())
        } else {
            Discipline::Static
        };
        Ok(Self {
            strategy,
            grid,
            threads,
            discipline,
        })
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn granularity(&self) -> Granularity {
        self.strategy.granularity()
    }

    pub fn unit_count(&self) -> usize {
        self.granularity().unit_count(self.grid)
    }

    /// The shared counter of a dynamic partition.
    pub fn counter(&self) -> Option<&SharedCounter> {
        match &self.discipline {
            Discipline::Static => None,
            Discipline::Dynamic(counter) => Some(counter),
        }
    }

    /// One worker per identity, all drawing into `frame`.
    ///
    /// The frame stays mutably borrowed for as long as the workers live, so
    /// no second set can be made for it in the meantime:
    ///
    /// ```compile_fail
    /// use perlin_stride::{Frame, Grid, NoiseField, Partition, Strategy};
    ///
    /// let grid = Grid::new(8, 8).unwrap();
    /// let partition = Partition::new(Strategy::RowStatic, grid, 2).unwrap();
    /// let mut frame = Frame::new(grid);
    /// let first = partition.workers(&mut frame, NoiseField::new()).unwrap();
    /// let second = partition.workers(&mut frame, NoiseField::new()).unwrap();
    /// drop((first, second));
    /// ```
    pub fn workers<'a>(
        &'a self,
        frame: &'a mut Frame,
        noise: NoiseField,
    ) -> Result<Vec<Worker<'a>>> {
        if frame.grid() != self.grid {
            return Err(RenderError::InvalidConfiguration(format!(
                "frame is {}x{} but the partition covers {}x{}",
                frame.width(),
                frame.height(),
                self.grid.width(),
                self.grid.height()
            )));
        }
        let writer = frame.writer();
        Ok((0..self.threads)
            .map(|id| Worker::new(id, self, writer.share(), noise))
            .collect())
    }

    /// Units for worker `id`, which must be below the thread count.
    pub fn assignment(&self, id: usize) -> Assignment<'_> {
        debug_assert!(id < self.threads, "worker {} of {}", id, self.threads);
        let limit = self.unit_count();
        match &self.discipline {
            Discipline::Static => Assignment::stride(id, self.threads, limit),
            Discipline::Dynamic(counter) => Assignment::claim(counter, limit),
        }
    }
}
