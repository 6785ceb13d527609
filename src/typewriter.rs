//! Hero-line typewriter: a [`Rotator`] driven by a single host timer.

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use parking_lot::Mutex;
use tracing::debug;

use crate::{
    config::RotatorConfig,
    error::Result,
    host::{Host, TimerId},
    rotator::{Mode, Rotator},
};

/// Blinking caret, independent of what is being typed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Caret {
    pub period: Duration,
}

impl Caret {
    /// Visible for the first half of each period.
    pub fn visible_at(&self, now: Duration) -> bool {
        let period = self.period.as_nanos();
        if period == 0 {
            return true;
        }
        now.as_nanos() % period < period / 2
    }
}

impl Default for Caret {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(1000),
        }
    }
}

/// What to draw for the typed line at a given instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypedLine {
    pub text: String,
    pub caret_visible: bool,
}

struct TypewriterState {
    rotator: Rotator,
    timer: Option<TimerId>,
}

pub struct Typewriter {
    state: Arc<Mutex<TypewriterState>>,
    caret: Caret,
}

impl Typewriter {
    pub fn new(config: &RotatorConfig) -> Result<Self> {
        config.validate()?;
        let rotator = Rotator::new(config.phrases.iter().cloned(), config.timings())?;
        Ok(Self::with_rotator(
            rotator,
            Caret {
                period: config.caret_period(),
            },
        ))
    }

    pub fn with_rotator(rotator: Rotator, caret: Caret) -> Self {
        Self {
            state: Arc::new(Mutex::new(TypewriterState {
                rotator,
                timer: None,
            })),
            caret,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.state.lock().timer.is_some()
    }

    /// Start from the first phrase and schedule the first tick.
    pub fn mount(&mut self, host: &mut Host) {
        if self.is_mounted() {
            return;
        }
        self.state.lock().rotator.reset();
        schedule_tick(host, &self.state);
        debug!("typewriter mounted");
    }

    /// Cancel the pending tick. Safe to call repeatedly or without a prior
    /// mount.
    pub fn unmount(&mut self, host: &mut Host) {
        if let Some(timer) = self.state.lock().timer.take() {
            host.clear_timeout(timer);
            debug!("typewriter unmounted");
        }
    }

    pub fn text(&self) -> String {
        self.state.lock().rotator.text().to_string()
    }

    pub fn mode(&self) -> Mode {
        self.state.lock().rotator.mode()
    }

    pub fn active_index(&self) -> usize {
        self.state.lock().rotator.active_index()
    }

    pub fn visible_chars(&self) -> usize {
        self.state.lock().rotator.visible_chars()
    }

    pub fn line(&self, now: Duration) -> TypedLine {
        TypedLine {
            text: self.text(),
            caret_visible: self.caret.visible_at(now),
        }
    }
}

/// Replace whatever tick is pending with one for the rotator's current state.
///
/// The timer holds a weak reference: a dropped typewriter stops ticking the
/// next time its timer fires.
fn schedule_tick(host: &mut Host, state: &Arc<Mutex<TypewriterState>>) {
    let mut guard = state.lock();
    if let Some(stale) = guard.timer.take() {
        host.clear_timeout(stale);
    }

    let delay = guard.rotator.next_delay();
    let next: Weak<_> = Arc::downgrade(state);
    let timer = host.set_timeout(
        delay,
        Box::new(move |host| {
            let Some(state) = next.upgrade() else {
                debug!("typewriter dropped, tick chain stopped");
                return;
            };
            {
                let mut guard = state.lock();
                guard.timer = None;
                guard.rotator.tick();
            }
            schedule_tick(host, &state);
        }),
    );
    guard.timer = Some(timer);
}
