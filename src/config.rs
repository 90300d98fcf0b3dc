use crate::error::SnakeError;

pub const DEFAULT_GRID_SIZE: i32 = 20;
pub const DEFAULT_SURFACE_WIDTH: u32 = 400;
pub const DEFAULT_TICK_MS: u64 = 200;

/// Everything a fresh game needs to know about its board and cadence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Board width in cells
    pub grid_width: i32,
    /// Board height in cells
    pub grid_height: i32,
    /// Surface units covered by one cell
    pub cell_size: u32,
    /// Minimum time between two moves of the snake
    pub tick_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid_width: DEFAULT_GRID_SIZE,
            grid_height: DEFAULT_GRID_SIZE,
            cell_size: DEFAULT_SURFACE_WIDTH / DEFAULT_GRID_SIZE as u32,
            tick_interval_ms: DEFAULT_TICK_MS,
        }
    }
}

impl GameConfig {
    /// Square board whose cell size is the surface width split evenly between
    /// `grid_size` cells, rounded down.
    pub fn from_surface(surface_width: u32, grid_size: i32) -> Result<Self, SnakeError> {
        if grid_size < 2 {
            return Err(SnakeError::GridTooSmall { width: grid_size, height: grid_size });
        }

        let cell_size = surface_width / grid_size as u32;
        if cell_size == 0 {
            return Err(SnakeError::CellSizeTooSmall { surface_width, grid_size });
        }

        Ok(GameConfig {
            grid_width: grid_size,
            grid_height: grid_size,
            cell_size,
            ..Default::default()
        })
    }

    pub fn with_tick_interval(mut self, tick_interval_ms: u64) -> Result<Self, SnakeError> {
        if tick_interval_ms == 0 {
            return Err(SnakeError::ZeroTickInterval);
        }

        self.tick_interval_ms = tick_interval_ms;
        Ok(self)
    }

    pub fn cell_count(&self) -> usize {
        self.grid_width as usize * self.grid_height as usize
    }

    /// Width of the whole board in surface units
    pub fn surface_width(&self) -> u32 {
        self.grid_width as u32 * self.cell_size
    }

    pub fn surface_height(&self) -> u32 {
        self.grid_height as u32 * self.cell_size
    }
}
