use std::io;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, KeyEvent};
use log::error;

const POLL_RATE: Duration = Duration::from_millis(50);

pub enum Event {
    Key(KeyEvent),
    Resize,
}

/// Reads terminal input on a background thread.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || loop {
            // Dropping the sender on a poll error ends the host loop.
            match event::poll(POLL_RATE) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    error!("terminal input failed: {}", e);
                    return;
                }
            }
            let ev = match event::read() {
                Ok(crossterm::event::Event::Key(key)) => Event::Key(key),
                Ok(crossterm::event::Event::Resize(..)) => Event::Resize,
                _ => continue,
            };
            if tx.send(ev).is_err() {
                return;
            }
        });

        Self { rx }
    }

    /// Wait up to `timeout` for the next input event.
    pub fn next_timeout(&self, timeout: Duration) -> io::Result<Option<Event>> {
        match self.rx.recv_timeout(timeout) {
            Ok(ev) => Ok(Some(ev)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
        }
    }
}
