//! Draw instructions for whatever surface hosts the game. Positions and sizes
//! are in surface units: a cell at (x, y) covers `x * cell_size, y * cell_size`
//! and is `cell_size` wide and tall.

use crate::state::GameState;
use crate::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Green,
    DarkGreen,
    Red,
    Grey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Head,
    Tail,
    Food,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCommand {
    pub entity: Entity,
    pub shape: Shape,
    pub position: (u32, u32),
    pub size: (u32, u32),
    pub color: Color,
}

impl DrawCommand {
    fn cell(entity: Entity, pos: Position, cell_size: u32, color: Color) -> Self {
        DrawCommand {
            entity,
            shape: Shape::Rect,
            position: (pos.0 as u32 * cell_size, pos.1 as u32 * cell_size),
            size: (cell_size, cell_size),
            color,
        }
    }

    /// Grid cell the command was drawn for
    pub fn grid_pos(&self, cell_size: u32) -> Position {
        ((self.position.0 / cell_size) as i32, (self.position.1 / cell_size) as i32)
    }
}

/// Everything to paint for the current state, back to front: food, then the
/// tail from its end, then the head.
pub fn frame(state: &GameState) -> Vec<DrawCommand> {
    let cell_size = state.config().cell_size;
    let snake = state.snake();
    let (head_color, tail_color) = if state.is_over() {
        (Color::Grey, Color::Grey)
    } else {
        (Color::Green, Color::DarkGreen)
    };

    let mut commands = Vec::with_capacity(snake.len() + 1);
    commands.push(DrawCommand::cell(Entity::Food, state.food(), cell_size, Color::Red));

    for seg in snake.tail().iter().rev() {
        commands.push(DrawCommand::cell(Entity::Tail, *seg, cell_size, tail_color));
    }

    commands.push(DrawCommand::cell(Entity::Head, snake.head(), cell_size, head_color));
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fresh_frame() {
        let mut rng = StdRng::seed_from_u64(11);
        let state = GameState::new(GameConfig::default(), &mut rng);
        let commands = frame(&state);

        assert_eq!(commands.len(), 2);

        let food = commands[0];
        assert_eq!(food.entity, Entity::Food);
        assert_eq!(food.color, Color::Red);
        assert_eq!(food.grid_pos(20), state.food());

        let head = commands[1];
        assert_eq!(head, DrawCommand {
            entity: Entity::Head,
            shape: Shape::Rect,
            position: (0, 0),
            size: (20, 20),
            color: Color::Green,
        });
    }

    #[test]
    fn test_head_position_in_surface_units() {
        let mut rng = StdRng::seed_from_u64(12);
        let config = GameConfig::from_surface(300, 20).unwrap();
        let mut state = GameState::new(config, &mut rng);
        while state.food().1 == 0 {
            state.restart(&mut rng);
        }

        state.step(&mut rng);
        let head = *frame(&state).last().unwrap();
        assert_eq!(head.position, (15, 0));
        assert_eq!(head.size, (15, 15));
    }

    #[test]
    fn test_tail_and_dead_snake() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut state = GameState::new(GameConfig::default(), &mut rng);
        while state.food().1 == 0 {
            state.restart(&mut rng);
        }

        // Feed it once by walking onto the food
        let food = state.food();
        for _ in 0..food.0 {
            state.step(&mut rng);
        }
        state.set_direction(crate::snake::Direction::Down);
        for _ in 0..food.1 {
            state.step(&mut rng);
        }
        assert_eq!(state.score(), 1);

        let commands = frame(&state);
        let tails: Vec<_> = commands.iter().filter(|c| c.entity == Entity::Tail).collect();
        assert_eq!(tails.len(), 1);
        assert_eq!(tails[0].color, Color::DarkGreen);

        // Run into the left wall
        state.set_direction(crate::snake::Direction::Left);
        while !state.is_over() {
            state.step(&mut rng);
        }
        assert!(frame(&state).iter()
            .filter(|c| c.entity != Entity::Food)
            .all(|c| c.color == Color::Grey));
    }
}
