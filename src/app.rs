use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::warn;

use crate::game::input::Direction;
use crate::game::random::UniformRandom;
use crate::game::{Phase, StarCatcher};
use crate::scheduler::{RealtimeScheduler, Wake};
use crate::scores::{FileStore, HighScores};
use crate::settings::{parse_key, KeyBindings, Settings};

// Presses of the restart key closer together than this are auto-repeat
// from a held key, on terminals that report repeats as presses.
const RESTART_REPEAT_GAP: Duration = Duration::from_millis(250);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    Restart,
    Quit,
}

pub struct Keymap {
    bindings: Vec<(KeyCode, Action)>,
}

impl Keymap {
    pub fn from_bindings(keys: &KeyBindings) -> Self {
        let groups = [
            (&keys.left, Action::Move(Direction::Left)),
            (&keys.right, Action::Move(Direction::Right)),
            (&keys.restart, Action::Restart),
            (&keys.quit, Action::Quit),
        ];
        let mut bindings = Vec::new();
        for (names, action) in groups {
            for name in names {
                match parse_key(name) {
                    Some(code) => bindings.push((code, action)),
                    None => warn!("unknown key name {:?} for {:?}", name, action),
                }
            }
        }
        Self { bindings }
    }

    pub fn action_for(&self, code: KeyCode) -> Option<Action> {
        let code = match code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        self.bindings
            .iter()
            .find(|(k, _)| *k == code)
            .map(|(_, action)| *action)
    }
}

pub struct App {
    pub should_quit: bool,
    pub game: StarCatcher,
    pub scheduler: RealtimeScheduler,
    keymap: Keymap,
    last_restart: Option<(KeyCode, Instant)>,
}

impl App {
    pub fn new(settings: &Settings, releases_reported: bool) -> Self {
        let scores_path = settings
            .scores_file
            .clone()
            .unwrap_or_else(FileStore::default_path);
        let high_scores = HighScores::load(Box::new(FileStore::open(scores_path)));
        let game = StarCatcher::new(
            settings.game_config(releases_reported),
            high_scores,
            Box::new(UniformRandom::default()),
        );
        Self::with_parts(
            game,
            RealtimeScheduler::new(settings.frame_period()),
            Keymap::from_bindings(&settings.keys),
        )
    }

    pub fn with_parts(game: StarCatcher, scheduler: RealtimeScheduler, keymap: Keymap) -> Self {
        Self {
            should_quit: false,
            game,
            scheduler,
            keymap,
            last_restart: None,
        }
    }

    /// How long the host may wait for input before the next wakeup is due.
    pub fn time_until_next(&self) -> Duration {
        self.scheduler.time_until_next(Instant::now())
    }

    /// Deliver every wakeup that is due at `now`.
    pub fn on_due(&mut self, now: Instant) {
        for wake in self.scheduler.due(now) {
            if let Wake::Interval(token) = wake {
                if !self.scheduler.is_active(token) {
                    continue;
                }
            }
            self.game.on_wake(wake, &mut self.scheduler);
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        self.on_key_at(key, Instant::now());
    }

    pub fn on_key_at(&mut self, key: KeyEvent, now: Instant) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let action = self.keymap.action_for(key.code);

        if key.kind == KeyEventKind::Release {
            if let Some(Action::Move(dir)) = action {
                self.game.release(dir);
            }
            if self.last_restart.is_some_and(|(code, _)| code == key.code) {
                self.last_restart = None;
            }
            return;
        }

        match action {
            Some(Action::Quit) => {
                self.should_quit = true;
                return;
            }
            Some(Action::Move(dir)) => self.game.press(dir),
            _ => {}
        }

        if key.kind != KeyEventKind::Press {
            return;
        }
        if action == Some(Action::Restart) {
            let repeat = self.last_restart.is_some_and(|(code, at)| {
                code == key.code && now.saturating_duration_since(at) < RESTART_REPEAT_GAP
            });
            self.last_restart = Some((key.code, now));
            if repeat {
                return;
            }
        }
        // Any key starts the first session; restart works from any phase.
        if self.game.phase() == Phase::Idle || action == Some(Action::Restart) {
            self.game.start(&mut self.scheduler);
        }
    }
}
