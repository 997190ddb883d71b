use crate::game::random::RandomSource;

pub const BASE_SPEED: f64 = 2.0;
const SPEED_STEP: f64 = 1.5;
const SECONDS_PER_LEVEL: u32 = 15;

const BASE_SPAWN_CHANCE: f64 = 0.03;
const SPAWN_CHANCE_PER_SECOND: f64 = 0.001;

/// Difficulty level reached after `elapsed_secs` whole seconds.
pub fn level(elapsed_secs: u32) -> u32 {
    elapsed_secs / SECONDS_PER_LEVEL
}

/// Base fall speed for stars created now. Steps up by 1.5 every 15 seconds.
pub fn current_speed(elapsed_secs: u32) -> f64 {
    BASE_SPEED + level(elapsed_secs) as f64 * SPEED_STEP
}

/// Per-frame probability of spawning a star. Grows linearly without a cap.
pub fn spawn_probability(elapsed_secs: u32) -> f64 {
    BASE_SPAWN_CHANCE + elapsed_secs as f64 * SPAWN_CHANCE_PER_SECOND
}

/// One Bernoulli trial per frame.
pub fn should_spawn(elapsed_secs: u32, rng: &mut dyn RandomSource) -> bool {
    rng.next_unit() < spawn_probability(elapsed_secs)
}
