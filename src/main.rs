mod config;
mod error;
mod food;
mod game;
mod render;
mod snake;
mod state;
mod term;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;

use config::GameConfig;
use game::{Outcome, SnakeGame};

pub type TermInt = u16;
pub type Coords = (u16, u16);

pub type GridInt = i32;
/// Grid cell (x, y), with (0, 0) in the top left corner
pub type Position = (GridInt, GridInt);

#[derive(Parser)]
#[command(name = "grid-snake")]
#[command(version, about = "Snake on a fixed grid, in the terminal")]
struct Cli {
    /// Cells along each side of the square board
    #[arg(long, default_value_t = config::DEFAULT_GRID_SIZE)]
    grid_size: GridInt,

    /// Width of the render surface; the cell size is this split between the cells
    #[arg(long, default_value_t = config::DEFAULT_SURFACE_WIDTH)]
    surface_width: u32,

    /// Milliseconds between two moves of the snake
    #[arg(long, default_value_t = config::DEFAULT_TICK_MS)]
    tick_ms: u64,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let config = GameConfig::from_surface(self.surface_width, self.grid_size)?
            .with_tick_interval(self.tick_ms)?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    // Logs go to stderr; redirect it (2>snake.log) to keep the board clean
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut game = SnakeGame::new(cli.game_config()?, cli.seed)?;
    game.initialize()?;

    let res = run(&mut game);
    // The terminal goes back to normal whether or not the game failed
    game.restore()?;
    res
}

fn run(game: &mut SnakeGame) -> Result<()> {
    if game.show_intro()? == Outcome::Quit {
        return Ok(());
    }

    while game.play()? == Outcome::PlayAgain {}

    Ok(())
}
