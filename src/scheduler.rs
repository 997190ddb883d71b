//! Wakeup scheduling for the game loop.
//!
//! The game never sleeps or spawns timers itself. It asks a [`Scheduler`] for
//! a frame callback or a repeating interval, and the host delivers the
//! resulting [`Wake`]s back to it.

use std::time::{Duration, Instant};

/// Handle to a repeating interval, used to cancel it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wake {
    Frame,
    Interval(TimerToken),
}

pub trait Scheduler {
    /// Request one frame wakeup at the next display-refresh slot.
    fn schedule_frame(&mut self);
    /// Start a repeating interval.
    fn schedule_interval(&mut self, period: Duration) -> TimerToken;
    /// Stop an interval. Unknown or already-cancelled tokens are ignored.
    fn cancel(&mut self, token: TimerToken);
}

struct IntervalEntry {
    token: TimerToken,
    period: Duration,
    next_due: Instant,
}

/// Wall-clock scheduler driven by the host loop.
pub struct RealtimeScheduler {
    frame_period: Duration,
    last_frame: Instant,
    next_frame: Option<Instant>,
    intervals: Vec<IntervalEntry>,
    next_token: u64,
    // Wait used when nothing is scheduled, so input is still polled.
    idle_wait: Duration,
}

impl RealtimeScheduler {
    pub fn new(frame_period: Duration) -> Self {
        Self {
            frame_period,
            last_frame: Instant::now(),
            next_frame: None,
            intervals: Vec::new(),
            next_token: 0,
            idle_wait: Duration::from_millis(250),
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        let interval = self.intervals.iter().map(|e| e.next_due).min();
        match (self.next_frame, interval) {
            (Some(f), Some(i)) => Some(f.min(i)),
            (f, i) => f.or(i),
        }
    }

    /// How long the host may block waiting for input before something is due.
    pub fn time_until_next(&self, now: Instant) -> Duration {
        match self.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now),
            None => self.idle_wait,
        }
    }

    /// Take every wakeup due at `now`. An interval that fell behind fires
    /// once per missed period.
    pub fn due(&mut self, now: Instant) -> Vec<Wake> {
        let mut wakes = Vec::new();
        for entry in &mut self.intervals {
            while entry.next_due <= now {
                wakes.push(Wake::Interval(entry.token));
                entry.next_due += entry.period;
            }
        }
        if self.next_frame.is_some_and(|at| at <= now) {
            self.next_frame = None;
            self.last_frame = now;
            wakes.push(Wake::Frame);
        }
        wakes
    }

    /// Whether `token` is still scheduled. A wake drained before a cancel
    /// may still be in the host's hands, so it checks before delivering.
    pub fn is_active(&self, token: TimerToken) -> bool {
        self.intervals.iter().any(|e| e.token == token)
    }
}

impl Scheduler for RealtimeScheduler {
    fn schedule_frame(&mut self) {
        if self.next_frame.is_none() {
            let at = (self.last_frame + self.frame_period).max(Instant::now());
            self.next_frame = Some(at);
        }
    }

    fn schedule_interval(&mut self, period: Duration) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.intervals.push(IntervalEntry {
            token,
            period,
            next_due: Instant::now() + period,
        });
        token
    }

    fn cancel(&mut self, token: TimerToken) {
        self.intervals.retain(|e| e.token != token);
    }
}

/// Deterministic scheduler for tests: nothing fires until the test says so.
#[cfg(test)]
#[derive(Default)]
pub struct ManualScheduler {
    frame_requested: bool,
    intervals: Vec<(TimerToken, Duration)>,
    next_token: u64,
}

#[cfg(test)]
impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a pending frame request.
    pub fn take_frame(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    pub fn active_intervals(&self) -> Vec<TimerToken> {
        self.intervals.iter().map(|(t, _)| *t).collect()
    }

    pub fn period_of(&self, token: TimerToken) -> Option<Duration> {
        self.intervals
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, p)| *p)
    }
}

#[cfg(test)]
impl Scheduler for ManualScheduler {
    fn schedule_frame(&mut self) {
        self.frame_requested = true;
    }

    fn schedule_interval(&mut self, period: Duration) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.intervals.push((token, period));
        token
    }

    fn cancel(&mut self, token: TimerToken) {
        self.intervals.retain(|(t, _)| *t != token);
    }
}
