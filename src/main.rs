use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use blockfall::{
    backend::game::Game,
    config::GameConfig,
    error::AppError,
    frontend::terminal::{App, Settings},
};
use clap::Parser;
use log::info;

/// Falling-block puzzle game for the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file with startup configuration; flags below override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Field width in cells.
    #[arg(long)]
    width: Option<usize>,
    /// Field height in cells.
    #[arg(long)]
    height: Option<usize>,
    /// Number of upcoming pieces shown in the preview.
    #[arg(short, long)]
    queue_capacity: Option<usize>,
    /// Spawn column of new pieces.
    #[arg(long)]
    spawn_x: Option<usize>,
    /// Spawn row of new pieces.
    #[arg(long)]
    spawn_y: Option<usize>,
    /// Seed for the piece generator.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Drop the piece one row every this many milliseconds (0 disables).
    #[arg(short, long)]
    gravity_ms: Option<u64>,
    /// Write logs to this file (level from RUST_LOG, default info).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn game_config(&self) -> Result<GameConfig, AppError> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(capacity) = self.queue_capacity {
            config.queue_capacity = capacity;
        }
        if let Some(x) = self.spawn_x {
            config.spawn.0 = x;
        }
        if let Some(y) = self.spawn_y {
            config.spawn.1 = y;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(ms) = self.gravity_ms {
            config.gravity = (ms > 0).then(|| Duration::from_millis(ms));
        }
        Ok(config)
    }
}

fn init_logging(path: &Path) -> Result<(), AppError> {
    let file = File::create(path).map_err(|source| AppError::LogFile {
        path: path.to_path_buf(),
        source,
    })?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }
    let config = args.game_config()?;
    info!("starting with {config:?}");
    let settings = Settings {
        gravity: config.gravity,
        ..Default::default()
    };
    let game = Game::new(config)?;
    let stdout = io::BufWriter::new(io::stdout());
    let msg = {
        let mut app = App::new(stdout, settings, game)?;
        app.run()?
    };
    println!("{msg}");
    Ok(())
}
