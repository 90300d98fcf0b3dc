use std::convert::TryFrom;

use log::{debug, info};
use rand::Rng;

use crate::config::GameConfig;
use crate::error::SnakeError;
use crate::food::spawn_food;
use crate::snake::{Direction, MoveResult, Snake};
use crate::{GridInt, Position};

/// Where every fresh snake starts, heading right
pub const ORIGIN: Position = (0, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    Wall,
    SelfCollision,
    /// No free cell left for food. The player won.
    BoardFull,
}

/// Things the host has to react to, returned from each update in the order
/// they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Score { score: u32 },
    GameOver { cause: GameOverCause, score: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    config: GameConfig,
    snake: Snake,
    food: Position,
    score: u32,
    phase: Phase,
    since_last_move: u64,
}

impl GameState {
    pub fn new<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Self {
        let snake = Snake::new(ORIGIN, Direction::Right);
        // A valid board is at least 2x2, so the far corner is free at the start
        let food = spawn_food(&config, &snake, rng)
            .unwrap_or((config.grid_width - 1, config.grid_height - 1));

        GameState { config, snake, food, score: 0, phase: Phase::Running, since_last_move: 0 }
    }

    /// Drops everything and starts over from a fresh board with the same config.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        info!("restarting, previous score {}", self.score);
        *self = GameState::new(self.config.clone(), rng);
    }

    /// Feeds frame time into the game. The snake moves once enough time has
    /// piled up since its last move; leftover time is not carried over.
    pub fn tick<R: Rng + ?Sized>(&mut self, elapsed_ms: u64, rng: &mut R) -> Vec<GameEvent> {
        if self.is_over() {
            return vec![];
        }

        self.since_last_move = self.since_last_move.saturating_add(elapsed_ms);
        if self.since_last_move < self.config.tick_interval_ms {
            return vec![];
        }

        self.since_last_move = 0;
        self.step(rng)
    }

    /// Moves the snake one cell right now, whatever the clock says.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<GameEvent> {
        if self.is_over() {
            return vec![];
        }

        match self.snake.move_step(self.config.grid_width, self.config.grid_height) {
            MoveResult::HitWall => self.finish(GameOverCause::Wall),
            MoveResult::HitSelf => self.finish(GameOverCause::SelfCollision),
            MoveResult::Moved { new_head, .. } => {
                debug!("head moved to {:?}", new_head);
                self.on_collision(rng)
            }
        }
    }

    /// Eats the food if the head is on it: one more tail segment, one more
    /// point, and new food somewhere free. Does nothing otherwise.
    pub fn on_collision<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<GameEvent> {
        if self.is_over() || self.snake.head() != self.food {
            return vec![];
        }

        self.snake.grow();
        self.score += 1;
        info!("food eaten at {:?}, score {}", self.food, self.score);

        let mut events = vec![GameEvent::Score { score: self.score }];

        match spawn_food(&self.config, &self.snake, rng) {
            Some(food) => self.food = food,
            None => events.extend(self.finish(GameOverCause::BoardFull)),
        }

        events
    }

    /// Returns whether the turn was taken; see `Snake::set_direction`.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        let accepted = self.snake.set_direction(direction);
        if !accepted {
            debug!("ignored reversal to {:?}", direction);
        }
        accepted
    }

    /// Same as `set_direction`, for raw (dx, dy) input.
    pub fn set_direction_vector(&mut self, vector: (GridInt, GridInt)) -> Result<bool, SnakeError> {
        let direction = Direction::try_from(vector)?;
        Ok(self.set_direction(direction))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn head(&self) -> Position {
        self.snake.head()
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    ///////////////////////////////////////////////////////////////////////////

    fn finish(&mut self, cause: GameOverCause) -> Vec<GameEvent> {
        self.phase = Phase::GameOver;
        info!("game over ({:?}), score {}", cause, self.score);
        vec![GameEvent::GameOver { cause, score: self.score }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn new_game() -> (GameState, StdRng) {
        let mut rng = StdRng::seed_from_u64(42);
        let mut state = GameState::new(GameConfig::default(), &mut rng);
        // Keep food off the first row so plain runs to the right don't eat it
        state.food = (10, 10);
        (state, rng)
    }

    #[test]
    fn test_initial_state() {
        let mut rng = StdRng::seed_from_u64(9);
        let state = GameState::new(GameConfig::default(), &mut rng);

        assert_eq!(state.head(), ORIGIN);
        assert_eq!(state.snake().direction(), Direction::Right);
        assert_eq!(state.score(), 0);
        assert_eq!(state.phase, Phase::Running);
        assert!(state.snake().tail().is_empty());
        assert_ne!(state.food(), ORIGIN);
    }

    #[test]
    fn test_moves_right_until_the_wall() {
        let (mut state, mut rng) = new_game();
        let cell = state.config().cell_size as GridInt;

        assert!(state.step(&mut rng).is_empty());
        assert_eq!(state.head(), (1, 0));
        assert_eq!(state.head().0 * cell, cell);
        assert!(!state.is_over());

        for x in 2..20 {
            assert!(state.step(&mut rng).is_empty());
            assert_eq!(state.head(), (x, 0));
        }

        // The 20th move would put the head at 20 * cell, past the right edge
        let events = state.step(&mut rng);
        assert_eq!(events, vec![GameEvent::GameOver { cause: GameOverCause::Wall, score: 0 }]);
        assert!(state.is_over());
        assert_eq!(state.head(), (19, 0));

        // Nothing moves once it's over
        assert!(state.step(&mut rng).is_empty());
        assert!(state.tick(10_000, &mut rng).is_empty());
        assert_eq!(state.head(), (19, 0));
    }

    #[test]
    fn test_ticks_run_into_the_wall() {
        let (mut state, mut rng) = new_game();
        let interval = state.config().tick_interval_ms;

        for x in 1..20 {
            assert!(state.tick(interval, &mut rng).is_empty());
            assert_eq!(state.head(), (x, 0));
            assert!(!state.is_over());
        }

        let events = state.tick(interval, &mut rng);
        assert_eq!(events, vec![GameEvent::GameOver { cause: GameOverCause::Wall, score: 0 }]);
        assert!(state.is_over());
        assert_eq!(state.head(), (19, 0));
    }

    #[test]
    fn test_every_edge_ends_the_game() {
        for dir in [Direction::Up, Direction::Left].iter() {
            let (mut state, mut rng) = new_game();
            state.set_direction(*dir);
            let events = state.step(&mut rng);
            assert_eq!(events, vec![GameEvent::GameOver { cause: GameOverCause::Wall, score: 0 }]);
            assert_eq!(state.head(), ORIGIN);
        }

        let (mut state, mut rng) = new_game();
        state.set_direction(Direction::Down);
        for _ in 0..19 {
            state.step(&mut rng);
        }
        assert_eq!(state.head(), (0, 19));
        assert!(!state.is_over());
        state.step(&mut rng);
        assert!(state.is_over());
    }

    #[test]
    fn test_tick_waits_for_interval() {
        let (mut state, mut rng) = new_game();

        state.tick(150, &mut rng);
        assert_eq!(state.head(), ORIGIN);
        state.tick(49, &mut rng);
        assert_eq!(state.head(), ORIGIN);
        state.tick(1, &mut rng);
        assert_eq!(state.head(), (1, 0));

        // A long frame still moves only one cell
        state.tick(1_000, &mut rng);
        assert_eq!(state.head(), (2, 0));
        state.tick(16, &mut rng);
        assert_eq!(state.head(), (2, 0));
    }

    #[test]
    fn test_eating_food() {
        let (mut state, mut rng) = new_game();
        state.food = (1, 0);

        let events = state.step(&mut rng);
        assert_eq!(events, vec![GameEvent::Score { score: 1 }]);
        assert_eq!(state.score(), 1);
        assert_eq!(state.snake().tail().len(), 1);

        let (x, y) = state.food();
        assert_ne!((x, y), (1, 0));
        assert!(x >= 0 && x < 20 && y >= 0 && y < 20);
        assert!(!state.snake().occupies(state.food()));

        // The new segment follows the head
        state.food = (10, 10);
        state.step(&mut rng);
        assert_eq!(state.snake().tail().iter().copied().collect::<Vec<_>>(), vec![(1, 0)]);
    }

    #[test]
    fn test_collision_only_fires_on_overlap() {
        let (mut state, mut rng) = new_game();
        assert!(state.on_collision(&mut rng).is_empty());
        assert_eq!(state.score(), 0);

        state.food = state.head();
        assert_eq!(state.on_collision(&mut rng), vec![GameEvent::Score { score: 1 }]);
        // Food moved away, so a second call is a no-op
        assert!(state.on_collision(&mut rng).is_empty());
        assert_eq!(state.score(), 1);
        assert_eq!(state.snake().len(), 2);
    }

    #[test]
    fn test_biting_own_tail() {
        let (mut state, mut rng) = new_game();
        for _ in 0..4 {
            state.snake.grow();
        }
        for _ in 0..4 {
            state.step(&mut rng);
        }
        assert_eq!(state.head(), (4, 0));

        for dir in [Direction::Down, Direction::Left].iter() {
            state.set_direction(*dir);
            assert!(state.step(&mut rng).is_empty());
        }
        state.set_direction(Direction::Up);
        let events = state.step(&mut rng);
        assert_eq!(events, vec![GameEvent::GameOver { cause: GameOverCause::SelfCollision, score: 0 }]);
        assert_eq!(state.head(), (3, 1));
    }

    #[test]
    fn test_filling_the_board_wins() {
        let mut rng = StdRng::seed_from_u64(5);
        let config = GameConfig::from_surface(40, 2).unwrap();
        let mut state = GameState::new(config, &mut rng);

        // Walk the 2x2 loop, parking the food in front of the head each time
        let route = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];
        let mut events = vec![];
        for dir in route.iter() {
            state.set_direction(*dir);
            state.food = state.snake().next_head();
            events.extend(state.step(&mut rng));
        }

        // The last meal leaves every cell covered, so there's nowhere for food to go
        assert_eq!(events.last(), Some(&GameEvent::GameOver { cause: GameOverCause::BoardFull, score: 4 }));
        assert_eq!(state.score(), 4);
        assert!(state.is_over());
    }

    #[test]
    fn test_direction_vector_input() {
        let (mut state, _) = new_game();
        assert_eq!(state.set_direction_vector((0, 1)), Ok(true));
        assert_eq!(state.snake().direction(), Direction::Down);
        assert_eq!(state.set_direction_vector((2, 0)), Err(SnakeError::InvalidDirection(2, 0)));
        assert_eq!(state.snake().direction(), Direction::Down);
    }

    #[test]
    fn test_restart() {
        let (mut state, mut rng) = new_game();
        state.food = (1, 0);
        state.step(&mut rng);
        state.set_direction(Direction::Up);
        state.step(&mut rng);
        assert!(state.is_over());
        assert_eq!(state.score(), 1);

        state.restart(&mut rng);
        assert_eq!(state.score(), 0);
        assert!(!state.is_over());
        assert_eq!(state.head(), ORIGIN);
        assert_eq!(state.snake().direction(), Direction::Right);
        assert!(state.snake().tail().is_empty());
        assert_ne!(state.food(), ORIGIN);
        assert_eq!(state.config(), &GameConfig::default());
    }
}
