use std::{error::Error, io};

use clap::Parser;
use log::debug;
use perlin_stride::{
    display::{Present, TerminalPreview},
    Grid, RenderConfig, Renderer, Report, Strategy,
};

/// Render Perlin noise with a pool of worker threads and time it.
#[derive(Parser, Debug)]
#[command(name = "perlin-stride", version, long_about = None)]
struct Args {
    /// Image width in pixels
    #[arg(value_parser = clap::value_parser!(u32).range(1..=2048))]
    width: u32,
    /// Image height in pixels
    #[arg(value_parser = clap::value_parser!(u32).range(1..=1080))]
    height: u32,
    /// Number of full images to draw
    #[arg(value_parser = clap::value_parser!(u32).range(1..=10000))]
    passes: u32,
    /// Number of worker threads
    #[arg(value_parser = clap::value_parser!(u32).range(1..=32))]
    threads: u32,
    /// Distribution model: 1 row-static, 2 block-static, 3 pixel-static,
    /// 4 row-dynamic, 5 pixel-dynamic, 6 block-dynamic
    #[arg(value_parser = clap::value_parser!(u8).range(1..=6))]
    strategy: u8,
    /// Skip drawing the finished image in the terminal
    #[arg(long)]
    no_preview: bool,
    /// Width of the terminal preview in columns
    #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u32).range(1..=512))]
    preview_width: u32,
}

impl Args {
    fn render_config(&self) -> perlin_stride::Result<RenderConfig> {
        Ok(RenderConfig {
            grid: Grid::new(self.width as usize, self.height as usize)?,
            threads: self.threads as usize,
            strategy: Strategy::from_selector(self.strategy)?,
            passes: self.passes as usize,
        })
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    debug!("{:?}", args);

    let config = args.render_config()?;
    let rendering = Renderer::new(config)?.render()?;

    println!("{}", Report::new(&config, rendering.elapsed));

    if !args.no_preview {
        TerminalPreview::new(io::stdout().lock(), args.preview_width as usize)
            .present(&rendering.frame)?;
    }
    Ok(())
}
