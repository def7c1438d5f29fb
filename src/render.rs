use std::{
    thread::{self, ScopedJoinHandle},
    time::{Duration, Instant},
};

use log::{debug, info};

use crate::{
    schedule::Partition, Frame, Grid, NoiseField, RenderError, Result, Strategy, WorkerStats,
};

/// Everything one rendering run is configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub grid: Grid,
    pub threads: usize,
    pub strategy: Strategy,
    pub passes: usize,
}

/// Monotonic wall-clock timer.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

/// Output of a run: the frame of the last pass and the time spent on all
/// passes.
#[derive(Debug, Clone)]
pub struct Rendering {
    pub frame: Frame,
    pub elapsed: Duration,
    /// Per-worker counts of the last pass, ordered by worker id.
    pub stats: Vec<WorkerStats>,
}

impl Rendering {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

pub struct Renderer {
    config: RenderConfig,
    noise: NoiseField,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Result<Self> {
        if config.threads == 0 {
            return Err(RenderError::InvalidConfiguration(
                "thread count must be positive".to_string(),
            ));
        }
        if config.passes == 0 {
            return Err(RenderError::InvalidConfiguration(
                "pass count must be positive".to_string(),
            ));
        }
        Ok(Self {
            config,
            noise: NoiseField::new(),
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Run every pass, one after the other, and time them.
    ///
    /// The same frame is overwritten by each pass. A pass starts only after
    /// every worker of the previous one has been joined.
    pub fn render(&self) -> Result<Rendering> {
        let RenderConfig {
            grid,
            threads,
            strategy,
            passes,
        } = self.config;
        info!(
            "rendering {}x{} with {} ({}), {} thread(s), {} pass(es)",
            grid.width(),
            grid.height(),
            strategy,
            strategy.selector(),
            threads,
            passes
        );

        let mut frame = Frame::new(grid);
        let mut stats = Vec::new();

        let watch = Stopwatch::start();
        for pass in 0..passes {
            let partition = Partition::new(strategy, grid, threads)?;
            stats = self.run_pass(&partition, &mut frame)?;
            debug!(
                "pass {}/{} finished at {:.6}s",
                pass + 1,
                passes,
                watch.elapsed_secs()
            );
        }
        let elapsed = watch.elapsed();

        Ok(Rendering {
            frame,
            elapsed,
            stats,
        })
    }

    fn run_pass(&self, partition: &Partition, frame: &mut Frame) -> Result<Vec<WorkerStats>> {
        let threads = partition.threads();
        let workers = partition.workers(frame, self.noise)?;

        thread::scope(|s| -> Result<Vec<WorkerStats>> {
            let handles = workers
                .into_iter()
                .map(|worker| {
                    thread::Builder::new()
                        .name(format!("noise-worker {}/{}", worker.id(), threads))
                        .spawn_scoped(s, move || worker.run())
                })
                .collect::<std::io::Result<Vec<_>>>()?;
            join_all(handles)
        })
    }
}

/// Join every handle, then report the first one that panicked.
/// Handles are indexed by worker id.
fn join_all<T>(handles: Vec<ScopedJoinHandle<'_, T>>) -> Result<Vec<T>> {
    let joined = handles
        .into_iter()
        .map(|handle| handle.join())
        .collect::<Vec<_>>();

    joined
        .into_iter()
        .enumerate()
        .map(|(id, result)| result.map_err(|_| RenderError::ExecutionInterrupted { worker: id }))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn config(strategy: Strategy, threads: usize, passes: usize) -> RenderConfig {
        RenderConfig {
            grid: Grid::new(32, 24).unwrap(),
            threads,
            strategy,
            passes,
        }
    }

    #[test]
    fn test_rejects_zero_threads_and_passes() {
        assert!(matches!(
            Renderer::new(config(Strategy::RowStatic, 0, 1)),
            Err(RenderError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Renderer::new(config(Strategy::RowStatic, 1, 0)),
            Err(RenderError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_render_fills_frame() {
        let rendering = Renderer::new(config(Strategy::BlockDynamic, 3, 2))
            .unwrap()
            .render()
            .unwrap();
        assert!(rendering.frame.is_complete());
        assert_eq!(rendering.frame.width(), 32);
        assert_eq!(rendering.frame.height(), 24);
        assert!(rendering.elapsed_secs() >= 0.0);
    }

    #[test]
    fn test_stats_cover_grid() {
        for strategy in Strategy::ALL {
            let rendering = Renderer::new(config(strategy, 5, 1))
                .unwrap()
                .render()
                .unwrap();
            assert_eq!(rendering.stats.len(), 5);
            for (id, stats) in rendering.stats.iter().enumerate() {
                assert_eq!(stats.id, id);
            }
            let cells = rendering.stats.iter().map(|stats| stats.cells).sum::<usize>();
            assert_eq!(cells, 32 * 24, "{}", strategy);
        }
    }

    #[test]
    fn test_more_threads_than_units() {
        let config = RenderConfig {
            grid: Grid::new(3, 2).unwrap(),
            threads: 32,
            strategy: Strategy::BlockStatic,
            passes: 1,
        };
        let rendering = Renderer::new(config).unwrap().render().unwrap();
        assert!(rendering.frame.is_complete());
        assert_eq!(rendering.stats.iter().filter(|stats| stats.units > 0).count(), 1);
    }

    #[test]
    fn test_join_all_reports_panicked_worker() {
        let finished = AtomicBool::new(false);
        let result = thread::scope(|s| {
            let handles = vec![
                s.spawn(|| 0),
                s.spawn(|| -> usize { panic!("worker 1 failed") }),
                s.spawn(|| {
                    thread::sleep(Duration::from_millis(50));
                    finished.store(true, Ordering::SeqCst);
                    2
                }),
            ];
            let result = join_all(handles);
            // the slow worker after the failed one was joined too
            assert!(finished.load(Ordering::SeqCst));
            result
        });
        assert!(matches!(
            result,
            Err(RenderError::ExecutionInterrupted { worker: 1 })
        ));
    }

    #[test]
    fn test_join_all_keeps_worker_order() {
        let results = thread::scope(|s| {
            let handles = (0..4)
                .map(|id| s.spawn(move || id * 10))
                .collect::<Vec<_>>();
            join_all(handles)
        })
        .unwrap();
        assert_eq!(results, vec![0, 10, 20, 30]);
    }

    #[test]
    fn test_stopwatch_is_monotonic() {
        let watch = Stopwatch::start();
        let first = watch.elapsed();
        let second = watch.elapsed();
        assert!(second >= first);
    }
}
