use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::GameConfig;
use crate::snake::Snake;
use crate::Position;

const RANDOM_ATTEMPTS: usize = 32;

/// Picks a free cell uniformly at random, or `None` if the snake covers the
/// whole board.
///
/// Blind draws are tried first since the board is mostly empty; once they keep
/// landing on the snake, the free cells are listed and one of them is chosen.
pub fn spawn_food<R: Rng + ?Sized>(config: &GameConfig, snake: &Snake, rng: &mut R) -> Option<Position> {
    for _ in 0..RANDOM_ATTEMPTS {
        let pos = (rng.gen_range(0..config.grid_width), rng.gen_range(0..config.grid_height));
        if !snake.occupies(pos) {
            debug!("food spawned at {:?}", pos);
            return Some(pos);
        }
    }

    let choices = free_cells(config, snake);
    let res = choices.choose(rng).copied();
    debug!("food spawned at {:?} from {} free cells", res, choices.len());
    res
}

fn free_cells(config: &GameConfig, snake: &Snake) -> Vec<Position> {
    let mut cells = Vec::with_capacity(config.cell_count().saturating_sub(snake.len()));

    for y in 0..config.grid_height {
        for x in 0..config.grid_width {
            if !snake.occupies((x, y)) {
                cells.push((x, y));
            }
        }
    }

    cells
}
