use crate::game::entities::{Basket, Field};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Hold {
    #[default]
    Up,
    Down,
    // Held for this many more frames unless refreshed by another press.
    Expiring(u32),
}

/// Currently-held movement keys.
///
/// With `hold_frames` unset, a key stays held from press until release. Hosts
/// that never report releases set `hold_frames`, so each press (or auto-repeat)
/// holds the key for that many frames.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    left: Hold,
    right: Hold,
    hold_frames: Option<u32>,
}

impl InputState {
    pub fn new(hold_frames: Option<u32>) -> Self {
        InputState {
            hold_frames: hold_frames.filter(|&n| n > 0),
            ..Default::default()
        }
    }

    pub fn press(&mut self, dir: Direction) {
        let hold = match self.hold_frames {
            Some(n) => Hold::Expiring(n),
            None => Hold::Down,
        };
        *self.slot(dir) = hold;
    }

    pub fn release(&mut self, dir: Direction) {
        *self.slot(dir) = Hold::Up;
    }

    pub fn is_held(&self, dir: Direction) -> bool {
        let hold = match dir {
            Direction::Left => self.left,
            Direction::Right => self.right,
        };
        hold != Hold::Up
    }

    /// Age timed holds by one frame.
    pub fn advance_frame(&mut self) {
        for hold in [&mut self.left, &mut self.right] {
            if let Hold::Expiring(n) = *hold {
                *hold = if n <= 1 { Hold::Up } else { Hold::Expiring(n - 1) };
            }
        }
    }

    fn slot(&mut self, dir: Direction) -> &mut Hold {
        match dir {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }
}

/// Move the basket by one step for each held direction, keeping it inside the field.
pub fn update_basket(input: &InputState, basket: &Basket, field: Field) -> Basket {
    let max_x = basket.max_x(field);
    let mut x = basket.x;
    if input.is_held(Direction::Left) && x > 0.0 {
        x -= basket.speed;
    }
    if input.is_held(Direction::Right) && x < max_x {
        x += basket.speed;
    }
    Basket {
        x: x.clamp(0.0, max_x.max(0.0)),
        ..basket.clone()
    }
}
