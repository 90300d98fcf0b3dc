use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SnakeError {
    #[error("The grid must be at least 2x2 cells, got {width}x{height}")]
    GridTooSmall { width: i32, height: i32 },
    #[error("A surface {surface_width} units wide cannot hold {grid_size} cells")]
    CellSizeTooSmall { surface_width: u32, grid_size: i32 },
    #[error("The tick interval must be greater than zero")]
    ZeroTickInterval,
    #[error("({0}, {1}) is not a unit movement vector")]
    InvalidDirection(i32, i32),
    #[error("The terminal is {have_w}x{have_h}, the board needs at least {need_w}x{need_h}")]
    TerminalTooSmall {
        have_w: u16,
        have_h: u16,
        need_w: u16,
        need_h: u16,
    },
}
