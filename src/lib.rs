use thiserror::Error;

mod internal_util;

pub mod display;
pub mod frame;
pub mod noise;
pub mod render;
pub mod report;
pub mod schedule;
pub mod worker;

pub use frame::{Frame, FrameWriter};
pub use internal_util::{hsb_to_argb, to_field, FIELD_HEIGHT, FIELD_WIDTH};
pub use noise::NoiseField;
pub use render::{RenderConfig, Renderer, Rendering, Stopwatch};
pub use report::Report;
pub use schedule::{Assignment, Granularity, Partition, SharedCounter, Strategy, BLOCK_SIZE};
pub use worker::{Worker, WorkerStats};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("execution was interrupted: worker {worker} did not finish")]
    ExecutionInterrupted { worker: usize },
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Pixel grid dimensions.
/// Fixed for the lifetime of one rendering run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidConfiguration(format!(
                "grid must be non-empty, got {}x{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells in the grid.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Row-major linear index of a cell.
    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.width + col
    }

    /// Inverse of [`Grid::index`], returns `(col, row)`.
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }
}
