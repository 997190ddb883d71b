use crate::game::random::RandomSource;

const BASKET_WIDTH: f64 = 80.0;
const BASKET_HEIGHT: f64 = 40.0;
const BASKET_SPEED: f64 = 8.0;
// Distance from the bottom of the field to the basket's top edge.
const BASKET_LIFT: f64 = 60.0;

/// Horizontal span reserved for a star when picking its spawn column.
pub const STAR_SPAWN_WIDTH: f64 = 40.0;
/// Stars appear this far above the visible field.
pub const STAR_SPAWN_Y: f64 = -20.0;
pub const STAR_SIZE: f64 = 15.0;
const STAR_SPEED_JITTER: f64 = 2.0;

/// Logical play-field dimensions. Rendering scales these onto the terminal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Field {
    pub width: f64,
    pub height: f64,
}

impl Default for Field {
    fn default() -> Self {
        Field {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Basket {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
}

impl Basket {
    /// A basket centred horizontally near the bottom of `field`.
    pub fn centered(field: Field) -> Self {
        Basket {
            x: field.width / 2.0 - BASKET_WIDTH / 2.0,
            y: field.height - BASKET_LIFT,
            width: BASKET_WIDTH,
            height: BASKET_HEIGHT,
            speed: BASKET_SPEED,
        }
    }

    /// Largest x the basket may occupy.
    pub fn max_x(&self, field: Field) -> f64 {
        field.width - self.width
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed: f64,
}

impl Star {
    /// The same star one tick later.
    pub fn fallen(self) -> Self {
        Star {
            y: self.y + self.speed,
            ..self
        }
    }
}

/// Build a star just above the field at a random column, falling at
/// `base_speed` plus up to two units of jitter.
pub fn create_star(field: Field, base_speed: f64, rng: &mut dyn RandomSource) -> Star {
    let x = rng.next_unit() * (field.width - STAR_SPAWN_WIDTH);
    let speed = base_speed + rng.next_unit() * STAR_SPEED_JITTER;
    Star {
        x,
        y: STAR_SPAWN_Y,
        size: STAR_SIZE,
        speed,
    }
}
