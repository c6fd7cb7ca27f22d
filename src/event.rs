use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize(u16, u16),
}

/// Polls the terminal on a background thread.
///
/// `Tick` is only sent while the shared `ticking` flag is set; the app
/// updates the flag after each event, so the timer simply stops once
/// nothing is animating.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    ticking: Arc<AtomicBool>,
    _tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration, ticking: bool) -> Self {
        let (tx, rx) = mpsc::channel();
        let _tx = tx.clone();
        let ticking = Arc::new(AtomicBool::new(ticking));
        let thread_ticking = Arc::clone(&ticking);

        thread::spawn(move || {
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    let forwarded = match event::read() {
                        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                            Some(AppEvent::Key(key))
                        }
                        Ok(Event::Resize(w, h)) => Some(AppEvent::Resize(w, h)),
                        _ => None,
                    };
                    if let Some(ev) = forwarded
                        && tx.send(ev).is_err()
                    {
                        return;
                    }
                } else if thread_ticking.load(Ordering::Relaxed) && tx.send(AppEvent::Tick).is_err()
                {
                    return;
                }
            }
        });

        Self { rx, ticking, _tx }
    }

    pub fn set_ticking(&self, on: bool) {
        self.ticking.store(on, Ordering::Relaxed);
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
