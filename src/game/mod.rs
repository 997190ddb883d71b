//! Star Catcher: a basket at the bottom of the field catches falling stars
//! until the countdown runs out.
//!
//! [`StarCatcher`] owns all session state and moves between
//! [`Phase::Idle`], [`Phase::Running`] and [`Phase::Ended`]. It is driven
//! entirely through a [`Scheduler`]: a self-rescheduling frame wakeup runs
//! the per-frame update, and a one-second interval runs the countdown.

pub mod difficulty;
pub mod entities;
pub mod input;
pub mod random;
pub mod world;

use std::time::Duration;

use log::{debug, info};

use crate::game::entities::{create_star, Basket, Field, Star};
use crate::game::input::{update_basket, Direction, InputState};
use crate::game::random::RandomSource;
use crate::scheduler::{Scheduler, TimerToken, Wake};
use crate::scores::HighScores;

const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Ended,
}

/// What the end-of-session display shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub final_score: u32,
    /// Final score equals the (possibly just raised) high score.
    pub new_high_score: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameConfig {
    pub field: Field,
    pub session_secs: u32,
    /// Frames a press stays held on hosts without key-release events.
    pub hold_frames: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            field: Field::default(),
            session_secs: 60,
            hold_frames: None,
        }
    }
}

pub struct StarCatcher {
    config: GameConfig,
    phase: Phase,
    basket: Basket,
    stars: Vec<Star>,
    input: InputState,
    score: u32,
    time_left: u32,
    star_speed: f64,
    countdown: Option<TimerToken>,
    summary: Option<SessionSummary>,
    high_scores: HighScores,
    rng: Box<dyn RandomSource>,
}

impl StarCatcher {
    pub fn new(config: GameConfig, high_scores: HighScores, rng: Box<dyn RandomSource>) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            basket: Basket::centered(config.field),
            stars: Vec::new(),
            input: InputState::new(config.hold_frames),
            score: 0,
            time_left: config.session_secs,
            star_speed: difficulty::BASE_SPEED,
            countdown: None,
            summary: None,
            high_scores,
            rng,
        }
    }

    /// Begin a fresh session from any phase.
    pub fn start(&mut self, sched: &mut dyn Scheduler) {
        if let Some(token) = self.countdown.take() {
            sched.cancel(token);
        }

        self.score = 0;
        self.time_left = self.config.session_secs;
        self.star_speed = difficulty::BASE_SPEED;
        self.stars.clear();
        self.basket = Basket::centered(self.config.field);
        self.summary = None;
        self.phase = Phase::Running;

        self.countdown = Some(sched.schedule_interval(COUNTDOWN_PERIOD));
        sched.schedule_frame();
        info!(
            "session started: {}s, high score {}",
            self.time_left,
            self.high_scores.best()
        );
    }

    /// Route a scheduler wakeup.
    pub fn on_wake(&mut self, wake: Wake, sched: &mut dyn Scheduler) {
        match wake {
            Wake::Frame => self.on_frame(sched),
            Wake::Interval(token) => self.on_countdown(token, sched),
        }
    }

    /// One animation frame. A frame arriving after the session stopped is
    /// dropped and not rescheduled.
    pub fn on_frame(&mut self, sched: &mut dyn Scheduler) {
        if self.phase != Phase::Running {
            return;
        }

        self.basket = update_basket(&self.input, &self.basket, self.config.field);
        self.input.advance_frame();

        let stars = std::mem::take(&mut self.stars);
        let outcome = world::update_stars(stars, &self.basket, self.config.field);
        self.stars = outcome.stars;
        if outcome.caught > 0 {
            self.score += outcome.caught;
            self.high_scores.record(self.score);
        }

        let speed = difficulty::current_speed(self.elapsed_secs());
        if speed != self.star_speed {
            debug!(
                "difficulty level {}: star speed {}",
                difficulty::level(self.elapsed_secs()),
                speed
            );
            self.star_speed = speed;
        }

        if difficulty::should_spawn(self.elapsed_secs(), &mut *self.rng) {
            let star = create_star(self.config.field, self.star_speed, &mut *self.rng);
            debug!("spawned star at x={:.0} speed {:.2}", star.x, star.speed);
            self.stars.push(star);
        }

        sched.schedule_frame();
    }

    /// One countdown second. Ticks from a cancelled timer are ignored.
    pub fn on_countdown(&mut self, token: TimerToken, sched: &mut dyn Scheduler) {
        if self.countdown != Some(token) || self.phase != Phase::Running {
            return;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.end(sched);
        }
    }

    fn end(&mut self, sched: &mut dyn Scheduler) {
        if let Some(token) = self.countdown.take() {
            sched.cancel(token);
        }
        self.phase = Phase::Ended;
        let summary = SessionSummary {
            final_score: self.score,
            new_high_score: self.score == self.high_scores.best(),
        };
        self.summary = Some(summary);
        info!(
            "session ended: caught {} stars{}",
            summary.final_score,
            if summary.new_high_score { " (new high score)" } else { "" }
        );
    }

    pub fn press(&mut self, dir: Direction) {
        self.input.press(dir);
    }

    pub fn release(&mut self, dir: Direction) {
        self.input.release(dir);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn get_score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_scores.best()
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// Whole seconds since the session started, counted by countdown ticks.
    pub fn elapsed_secs(&self) -> u32 {
        self.config.session_secs.saturating_sub(self.time_left)
    }

    pub fn star_speed(&self) -> f64 {
        self.star_speed
    }

    pub fn field(&self) -> Field {
        self.config.field
    }

    pub fn basket(&self) -> &Basket {
        &self.basket
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Present only once a session has ended; cleared by the next start.
    pub fn summary(&self) -> Option<SessionSummary> {
        self.summary
    }
}

#[cfg(test)]
impl StarCatcher {
    pub(crate) fn place_basket(&mut self, x: f64) {
        self.basket.x = x;
    }

    pub(crate) fn drop_star(&mut self, star: Star) {
        self.stars.push(star);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::{STAR_SIZE, STAR_SPAWN_Y};
    use crate::game::random::{ScriptedRandom, UniformRandom};
    use crate::scheduler::ManualScheduler;
    use crate::scores::MemoryStore;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn game_with(rng: Box<dyn RandomSource>) -> StarCatcher {
        StarCatcher::new(
            GameConfig::default(),
            HighScores::load(Box::new(MemoryStore::default())),
            rng,
        )
    }

    fn quiet_game() -> StarCatcher {
        game_with(Box::new(ScriptedRandom::never_spawn()))
    }

    fn run_frames(game: &mut StarCatcher, sched: &mut ManualScheduler, n: usize) {
        for _ in 0..n {
            if !sched.take_frame() {
                return;
            }
            game.on_frame(sched);
        }
    }

    fn run_seconds(game: &mut StarCatcher, sched: &mut ManualScheduler, n: u32) {
        for _ in 0..n {
            for token in sched.active_intervals() {
                game.on_countdown(token, sched);
            }
        }
    }

    #[test]
    fn idle_until_started() {
        let mut sched = ManualScheduler::new();
        let mut game = quiet_game();
        assert_eq!(game.phase(), Phase::Idle);
        game.on_frame(&mut sched);
        assert!(!sched.frame_requested());
        assert!(sched.active_intervals().is_empty());
        assert_eq!(game.time_left(), 60);
    }

    #[test]
    fn start_schedules_frame_and_one_countdown() {
        let mut sched = ManualScheduler::new();
        let mut game = quiet_game();
        game.start(&mut sched);
        assert_eq!(game.phase(), Phase::Running);
        assert!(sched.frame_requested());
        let timers = sched.active_intervals();
        assert_eq!(timers.len(), 1);
        assert_eq!(sched.period_of(timers[0]), Some(Duration::from_secs(1)));
    }

    #[test]
    fn restart_mid_session_keeps_a_single_countdown() {
        let mut sched = ManualScheduler::new();
        let mut game = quiet_game();
        game.start(&mut sched);
        let first = sched.active_intervals()[0];
        run_seconds(&mut game, &mut sched, 5);
        game.start(&mut sched);
        let timers = sched.active_intervals();
        assert_eq!(timers.len(), 1);
        assert_ne!(timers[0], first);
        assert_eq!(game.time_left(), 60);

        // The old timer's ticks no longer count.
        game.on_countdown(first, &mut sched);
        assert_eq!(game.time_left(), 60);
    }

    #[test]
    fn catches_a_star_dropped_over_the_basket() {
        let mut sched = ManualScheduler::new();
        let mut game = quiet_game();
        game.start(&mut sched);
        game.place_basket(80.0);
        game.drop_star(Star { x: 100.0, y: STAR_SPAWN_Y, size: STAR_SIZE, speed: 5.0 });

        let field = game.field();
        let ticks = ((field.height - 60.0 - STAR_SPAWN_Y) / 5.0).ceil() as usize;
        run_frames(&mut game, &mut sched, ticks);
        assert_eq!(game.get_score(), 1);
        assert!(game.stars().is_empty());
        assert_eq!(game.high_score(), 1);

        run_seconds(&mut game, &mut sched, 60);
        assert_eq!(game.phase(), Phase::Ended);
        assert_eq!(game.time_left(), 0);
        assert_eq!(
            game.summary(),
            Some(SessionSummary { final_score: 1, new_high_score: true })
        );
        assert!(sched.active_intervals().is_empty());
    }

    #[test]
    fn missed_star_leaves_score_alone() {
        let mut sched = ManualScheduler::new();
        let mut game = quiet_game();
        game.start(&mut sched);
        game.place_basket(0.0);
        game.drop_star(Star { x: 600.0, y: STAR_SPAWN_Y, size: STAR_SIZE, speed: 10.0 });
        run_frames(&mut game, &mut sched, 70);
        assert_eq!(game.get_score(), 0);
        assert!(game.stars().is_empty());
    }

    #[test]
    fn ended_session_stops_the_frame_loop() {
        let mut sched = ManualScheduler::new();
        let mut game = quiet_game();
        game.start(&mut sched);
        run_seconds(&mut game, &mut sched, 60);
        assert_eq!(game.phase(), Phase::Ended);

        // A frame scheduled before the end still arrives once.
        assert!(sched.take_frame());
        game.on_frame(&mut sched);
        assert!(!sched.frame_requested());
    }

    #[test]
    fn ended_state_is_frozen() {
        let mut sched = ManualScheduler::new();
        let mut game = quiet_game();
        game.start(&mut sched);
        game.drop_star(Star { x: 10.0, y: 100.0, size: STAR_SIZE, speed: 3.0 });
        run_seconds(&mut game, &mut sched, 60);
        game.on_frame(&mut sched);
        assert_eq!(game.stars()[0].y, 100.0);
    }

    #[test]
    fn restart_after_end_resets_session_but_keeps_high_score() {
        let mut sched = ManualScheduler::new();
        let mut game = quiet_game();
        game.start(&mut sched);
        game.place_basket(80.0);
        game.drop_star(Star { x: 100.0, y: 500.0, size: STAR_SIZE, speed: 5.0 });
        game.drop_star(Star { x: 300.0, y: 100.0, size: STAR_SIZE, speed: 5.0 });
        run_frames(&mut game, &mut sched, 10);
        assert_eq!(game.get_score(), 1);
        run_seconds(&mut game, &mut sched, 60);
        assert_eq!(game.phase(), Phase::Ended);

        game.start(&mut sched);
        assert_eq!(game.phase(), Phase::Running);
        assert_eq!(game.get_score(), 0);
        assert_eq!(game.time_left(), 60);
        assert!(game.stars().is_empty());
        assert_eq!(game.basket().x, game.field().width / 2.0 - game.basket().width / 2.0);
        assert_eq!(game.high_score(), 1);
        assert_eq!(game.summary(), None);
    }

    #[test]
    fn restart_resets_fall_speed() {
        let mut sched = ManualScheduler::new();
        let mut game = quiet_game();
        game.start(&mut sched);
        run_seconds(&mut game, &mut sched, 16);
        run_frames(&mut game, &mut sched, 1);
        assert_eq!(game.star_speed(), 3.5);

        game.start(&mut sched);
        assert_eq!(game.star_speed(), difficulty::BASE_SPEED);
        run_frames(&mut game, &mut sched, 1);
        assert_eq!(game.star_speed(), 2.0);
    }

    #[test]
    fn zero_score_matching_zero_record_is_flagged() {
        let mut sched = ManualScheduler::new();
        let mut game = quiet_game();
        game.start(&mut sched);
        run_seconds(&mut game, &mut sched, 60);
        assert_eq!(
            game.summary(),
            Some(SessionSummary { final_score: 0, new_high_score: true })
        );
    }

    #[test]
    fn lower_score_than_record_is_not_flagged() {
        let mut store = MemoryStore::default();
        crate::scores::KeyValueStore::set(&mut store, "starCatcherHighScore", "9");
        let mut game = StarCatcher::new(
            GameConfig::default(),
            HighScores::load(Box::new(store)),
            Box::new(ScriptedRandom::never_spawn()),
        );
        let mut sched = ManualScheduler::new();
        game.start(&mut sched);
        run_seconds(&mut game, &mut sched, 60);
        assert_eq!(
            game.summary(),
            Some(SessionSummary { final_score: 0, new_high_score: false })
        );
        assert_eq!(game.high_score(), 9);
    }

    #[test]
    fn difficulty_follows_countdown_and_spares_falling_stars() {
        let mut sched = ManualScheduler::new();
        let mut game = quiet_game();
        game.start(&mut sched);
        game.place_basket(720.0);
        game.drop_star(Star { x: 10.0, y: 0.0, size: STAR_SIZE, speed: 2.0 });
        run_seconds(&mut game, &mut sched, 15);
        run_frames(&mut game, &mut sched, 1);
        assert_eq!(game.star_speed(), 3.5);
        assert_eq!(game.stars()[0].speed, 2.0);

        run_seconds(&mut game, &mut sched, 15);
        run_frames(&mut game, &mut sched, 1);
        assert_eq!(game.star_speed(), 5.0);
    }

    #[test]
    fn spawned_stars_use_current_speed() {
        // Spawn trial passes, then x draw, then jitter draw of zero.
        let mut game = game_with(Box::new(ScriptedRandom::new(&[0.0, 0.5, 0.0])));
        let mut sched = ManualScheduler::new();
        game.start(&mut sched);
        run_frames(&mut game, &mut sched, 1);
        assert_eq!(game.stars().len(), 1);
        let star = &game.stars()[0];
        assert_eq!(star.y, STAR_SPAWN_Y);
        assert_eq!(star.speed, 2.0);
        assert_eq!(star.x, 380.0);
    }

    #[test]
    fn at_most_one_spawn_per_frame() {
        let mut game = game_with(Box::new(ScriptedRandom::new(&[0.0])));
        let mut sched = ManualScheduler::new();
        game.start(&mut sched);
        run_frames(&mut game, &mut sched, 5);
        assert_eq!(game.stars().len(), 5);
    }

    #[test]
    fn held_keys_move_the_basket_each_frame() {
        let mut sched = ManualScheduler::new();
        let mut game = quiet_game();
        game.start(&mut sched);
        let start_x = game.basket().x;
        game.press(Direction::Left);
        run_frames(&mut game, &mut sched, 3);
        assert_eq!(game.basket().x, start_x - 3.0 * game.basket().speed);
        game.release(Direction::Left);
        run_frames(&mut game, &mut sched, 3);
        assert_eq!(game.basket().x, start_x - 3.0 * game.basket().speed);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn score_and_record_only_grow(
            seed in any::<u64>(),
            moves in prop::collection::vec(0u8..4, 600),
        ) {
            let rng = UniformRandom::from_rng(StdRng::seed_from_u64(seed));
            let mut game = game_with(Box::new(rng));
            let mut sched = ManualScheduler::new();
            let mut last_record = 0;

            for _session in 0..2 {
                game.start(&mut sched);
                let mut last_score = 0;
                for (i, m) in moves.iter().enumerate() {
                    game.release(Direction::Left);
                    game.release(Direction::Right);
                    match m {
                        1 => game.press(Direction::Left),
                        2 => game.press(Direction::Right),
                        3 => {
                            game.press(Direction::Left);
                            game.press(Direction::Right);
                        }
                        _ => {}
                    }
                    run_frames(&mut game, &mut sched, 1);
                    if i % 10 == 9 {
                        run_seconds(&mut game, &mut sched, 1);
                    }

                    prop_assert!(game.get_score() >= last_score);
                    prop_assert!(game.high_score() >= game.get_score());
                    last_score = game.get_score();
                    let b = game.basket();
                    prop_assert!(b.x >= 0.0 && b.x <= b.max_x(game.field()));
                    // Only a star spawned this frame can still sit at the spawn line.
                    let fresh = game.stars().iter().filter(|s| s.y <= STAR_SPAWN_Y).count();
                    prop_assert!(fresh <= 1);
                }
                prop_assert_eq!(game.phase(), Phase::Ended);
                prop_assert!(game.high_score() >= last_record);
                last_record = game.high_score();
            }
        }
    }
}
