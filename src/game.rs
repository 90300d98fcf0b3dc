use std::{collections::HashMap, convert::TryFrom, thread::sleep, time::{Duration, Instant}};

use crate::{Coords, Position, TermInt};
use crate::config::GameConfig;
use crate::error::SnakeError;
use crate::render::{self, Color, DrawCommand, Entity};
use crate::snake::Direction::{*, self};
use crate::state::{GameEvent, GameOverCause, GameState};
use crate::term::{Glyph, TermManager, BLANK};

use anyhow::Result;
use crossterm::event::{KeyEvent, KeyModifiers, KeyCode};
use crossterm::style;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

const FRAME_INTERVAL_MS: u64 = 5;

// Terminal characters are about twice as tall as they are wide, so every
// grid cell takes two columns
const COLS_PER_CELL: TermInt = 2;

const SNAKE_BODY_CHAR: char = '█';
const DEAD_SNAKE_CHAR: char = 'X';

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    PlayAgain,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Turn(Direction),
    Quit,
    Nothing,
}

pub struct SnakeGame {
    term: TermManager,
    state: GameState,
    rng: StdRng,
    // Board size in terminal cells, borders included
    board: Coords,
    // What's currently painted on the board, by grid cell
    painted: HashMap<Position, [Glyph; 2]>,
}

impl SnakeGame {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let term = TermManager::new()?;
        let board = fit_board(&config, term.get_terminal_size())?;
        let state = GameState::new(config, &mut rng);
        Ok(SnakeGame { term, state, rng, board, painted: HashMap::new() })
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.term.setup()
    }

    pub fn restore(&mut self) -> Result<()> {
        self.term.restore()
    }

    /// Shows the controls and waits for the start key.
    pub fn show_intro(&mut self) -> Result<Outcome> {
        let lines = &[
            "Arrow keys or WASD to move",
            "CTRL+C to quit",
            "",
            "Press any key to start"
        ];

        self.term.show_message(lines)?;

        if is_ctrl_c(&self.term.read_key_blocking()?) {
            return Ok(Outcome::Quit);
        }

        self.term.hide_message()?;
        Ok(Outcome::PlayAgain)
    }

    /// Plays one round from a fresh board until game over or CTRL+C.
    pub fn play(&mut self) -> Result<Outcome> {
        self.term.clear()?;
        self.term.draw_borders(self.board)?;
        self.painted.clear();
        self.show_score(0)?;
        self.paint()?;

        let config = self.state.config();
        info!(
            "new round on a {}x{} board, {}x{} surface units",
            config.grid_width, config.grid_height, config.surface_width(), config.surface_height()
        );
        let mut last_frame = Instant::now();

        while !self.state.is_over() {
            sleep(Duration::from_millis(FRAME_INTERVAL_MS));

            for key_ev in self.term.read_key_events_queue()? {
                match key_command(&key_ev) {
                    Command::Quit => return Ok(Outcome::Quit),
                    Command::Turn(dir) => {
                        self.state.set_direction(dir);
                    },
                    Command::Nothing => {}
                }
            }

            let now = Instant::now();
            let elapsed_ms = now.duration_since(last_frame).as_millis() as u64;
            last_frame = now;

            let events = self.state.tick(elapsed_ms, &mut self.rng);
            self.paint()?;

            for event in events {
                match event {
                    GameEvent::Score { score } => self.show_score(score)?,
                    GameEvent::GameOver { cause, score } => self.game_over(cause, score)?,
                }
            }
        }

        // Any key starts the next round, CTRL+C still quits
        if is_ctrl_c(&self.term.read_key_blocking()?) {
            return Ok(Outcome::Quit);
        }

        self.state.restart(&mut self.rng);
        Ok(Outcome::PlayAgain)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn show_score(&mut self, score: u32) -> Result<()> {
        let row = self.board.1;
        self.term.print_line((0, row), &format!(" Score: {}", score))?;
        self.term.flush()
    }

    fn game_over(&mut self, cause: GameOverCause, score: u32) -> Result<()> {
        let s = match cause {
            GameOverCause::BoardFull => "You won!",
            GameOverCause::Wall | GameOverCause::SelfCollision => "Game over!",
        };

        self.term.show_message(&[
            s,
            &*format!("Score: {}", score),
            "",
            "Press any key to play again,",
            "or CTRL+C to quit."
        ])
    }

    /// Repaints only the grid cells whose glyphs changed since the last frame.
    fn paint(&mut self) -> Result<()> {
        let commands = render::frame(&self.state);
        let cell_size = self.state.config().cell_size;
        let heading = self.state.snake().direction();

        let mut next: HashMap<Position, [Glyph; 2]> = HashMap::with_capacity(commands.len());
        for cmd in commands.iter() {
            next.insert(cmd.grid_pos(cell_size), glyphs_for(cmd, heading));
        }

        let gone: Vec<Position> = self.painted.keys()
            .filter(|pos| !next.contains_key(*pos))
            .copied()
            .collect();

        for pos in gone {
            self.print_cell(pos, [BLANK, BLANK])?;
        }

        for (pos, glyphs) in next.iter() {
            if self.painted.get(pos) != Some(glyphs) {
                self.print_cell(*pos, *glyphs)?;
            }
        }

        self.painted = next;
        self.term.flush()
    }

    fn print_cell(&mut self, pos: Position, glyphs: [Glyph; 2]) -> Result<()> {
        let (x, y) = to_term(pos);
        self.term.print_at((x, y), glyphs[0])?;
        self.term.print_at((x + 1, y), glyphs[1])
    }
}

/// Board size in terminal cells, borders included, if the board and the score
/// line below it fit in a terminal of `have_w` x `have_h`.
fn fit_board(config: &GameConfig, (have_w, have_h): Coords) -> Result<Coords, SnakeError> {
    let cols = TermInt::try_from(config.grid_width).ok()
        .and_then(|w| w.checked_mul(COLS_PER_CELL))
        .and_then(|w| w.checked_add(2));
    let rows = TermInt::try_from(config.grid_height).ok()
        .and_then(|h| h.checked_add(3));

    match (cols, rows) {
        (Some(w), Some(h)) if w <= have_w && h <= have_h => Ok((w, h - 1)),
        _ => Err(SnakeError::TerminalTooSmall {
            have_w,
            have_h,
            need_w: cols.unwrap_or(TermInt::MAX),
            need_h: rows.unwrap_or(TermInt::MAX),
        }),
    }
}

fn to_term(pos: Position) -> Coords {
    (1 + pos.0 as TermInt * COLS_PER_CELL, 1 + pos.1 as TermInt)
}

fn term_color(color: Color) -> style::Color {
    match color {
        Color::Green => style::Color::Green,
        Color::DarkGreen => style::Color::DarkGreen,
        Color::Red => style::Color::Red,
        Color::Grey => style::Color::DarkGrey,
    }
}

fn glyphs_for(cmd: &DrawCommand, heading: Direction) -> [Glyph; 2] {
    let color = term_color(cmd.color);
    let dead = cmd.color == Color::Grey;

    let (left, right) = match cmd.entity {
        _ if dead => (DEAD_SNAKE_CHAR, DEAD_SNAKE_CHAR),
        Entity::Food => ('(', ')'),
        Entity::Tail => (SNAKE_BODY_CHAR, SNAKE_BODY_CHAR),
        Entity::Head => match heading {
            Up => ('^', '^'),
            Down => ('v', 'v'),
            Left => ('<', SNAKE_BODY_CHAR),
            Right => (SNAKE_BODY_CHAR, '>'),
        },
    };

    [Glyph::new(left, color), Glyph::new(right, color)]
}

fn key_command(ev: &KeyEvent) -> Command {
    if is_ctrl_c(ev) {
        return Command::Quit;
    }

    let cmd = match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Command::Turn(Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Command::Turn(Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Command::Turn(Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Command::Turn(Right),
        _ => Command::Nothing,
    };

    debug!("key {:?} -> {:?}", ev.code, cmd);
    cmd
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
