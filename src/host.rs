//! Cooperative host event loop.
//!
//! Everything the effects need from their environment lives here: a
//! monotonic clock with one-shot timers, per-frame callbacks, window event
//! subscriptions and 2D surface acquisition. All of it runs on one thread;
//! callbacks receive the host so they can reschedule themselves.

use std::time::Duration;

use slotmap::{SlotMap, new_key_type};

use crate::surface::{Canvas, SharedCanvas, Viewport};

new_key_type! {
    pub struct TimerId;
    pub struct FrameId;
    pub struct ListenerId;
}

pub type TimerCallback = Box<dyn FnOnce(&mut Host)>;
pub type FrameCallback = Box<dyn FnOnce(&mut Host)>;
pub type EventHandler = Box<dyn FnMut(&mut Host, &Event)>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    Resize(Viewport),
    PointerMove(cgmath::Vector2<f32>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Resize,
    PointerMove,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Resize(_) => EventKind::Resize,
            Event::PointerMove(_) => EventKind::PointerMove,
        }
    }
}

struct Timer {
    due: Duration,
    seq: u64,
    zero_delay: bool,
    callback: TimerCallback,
}

struct Listener {
    kind: EventKind,
    // Taken out while the handler runs so it can borrow the host mutably.
    handler: Option<EventHandler>,
}

pub struct Host {
    now: Duration,
    viewport: Viewport,
    supports_2d: bool,
    timer_seq: u64,
    timers: SlotMap<TimerId, Timer>,
    frames: SlotMap<FrameId, FrameCallback>,
    listeners: SlotMap<ListenerId, Listener>,
}

impl Host {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            now: Duration::ZERO,
            viewport,
            supports_2d: true,
            timer_seq: 0,
            timers: SlotMap::with_key(),
            frames: SlotMap::with_key(),
            listeners: SlotMap::with_key(),
        }
    }

    /// A host whose surfaces cannot produce a 2D drawing context.
    pub fn without_2d_context(viewport: Viewport) -> Self {
        Self {
            supports_2d: false,
            ..Self::new(viewport)
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Acquire a drawing surface sized to the current viewport.
    pub fn create_canvas(&self) -> Option<SharedCanvas> {
        self.supports_2d.then(|| Canvas::shared(self.viewport))
    }

    pub fn set_timeout(&mut self, delay: Duration, callback: TimerCallback) -> TimerId {
        self.timer_seq += 1;
        self.timers.insert(Timer {
            due: self.now + delay,
            seq: self.timer_seq,
            zero_delay: delay.is_zero(),
            callback,
        })
    }

    /// Returns `false` when the timer already fired or was cleared.
    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Move the clock forward by `dt`, firing every timer that comes due.
    ///
    /// Timers fire in due-time order (ties in scheduling order) with the clock
    /// set to their due time, so a timer scheduled from inside a callback
    /// fires within the same call if it is due before the end of `dt`.
    /// Zero-delay timers scheduled during the call wait for the next one, so
    /// a callback that keeps rescheduling itself with no delay cannot stall
    /// the clock.
    pub fn advance(&mut self, dt: Duration) {
        let target = self.now + dt;
        let last_seq = self.timer_seq;
        loop {
            let next = self
                .timers
                .iter()
                .filter(|(_, timer)| timer.due <= target)
                .filter(|(_, timer)| timer.seq <= last_seq || !timer.zero_delay)
                .min_by_key(|(_, timer)| (timer.due, timer.seq))
                .map(|(id, _)| id);
            let Some(timer) = next.and_then(|id| self.timers.remove(id)) else {
                break;
            };
            self.now = self.now.max(timer.due);
            (timer.callback)(self);
        }
        self.now = target;
    }

    pub fn request_frame(&mut self, callback: FrameCallback) -> FrameId {
        self.frames.insert(callback)
    }

    /// Returns `false` when the frame already ran or was cancelled.
    pub fn cancel_frame(&mut self, id: FrameId) -> bool {
        self.frames.remove(id).is_some()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Run one display frame. Returns how many callbacks ran.
    ///
    /// Only callbacks pending when the frame starts run; anything requested
    /// meanwhile waits for the next frame.
    pub fn run_frame(&mut self) -> usize {
        let due: Vec<FrameCallback> = self.frames.drain().map(|(_, cb)| cb).collect();
        let count = due.len();
        for callback in due {
            callback(self);
        }
        count
    }

    pub fn subscribe(&mut self, kind: EventKind, handler: EventHandler) -> ListenerId {
        self.listeners.insert(Listener {
            kind,
            handler: Some(handler),
        })
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn dispatch(&mut self, event: Event) {
        if let Event::Resize(viewport) = event {
            self.viewport = viewport;
        }

        let kind = event.kind();
        let targets: Vec<ListenerId> = self
            .listeners
            .iter()
            .filter(|(_, listener)| listener.kind == kind)
            .map(|(id, _)| id)
            .collect();

        for id in targets {
            let Some(mut handler) = self.listeners.get_mut(id).and_then(|l| l.handler.take()) else {
                continue;
            };
            handler(self, &event);
            // The handler may have unsubscribed itself.
            if let Some(listener) = self.listeners.get_mut(id) {
                listener.handler = Some(handler);
            }
        }
    }
}
