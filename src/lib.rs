//! Decorative motion effects for a portfolio front page: a pointer-following
//! particle trail and a typewriter that rotates through a list of phrases.
//!
//! Both engines mount onto a [`Host`], a single-threaded event loop that
//! supplies display frames, timers, window events and a drawing surface.

pub mod config;
pub mod error;
pub mod host;
pub mod overlay;
pub mod particle;
pub mod pool;
pub mod rotator;
pub mod surface;
pub mod trail;
pub mod typewriter;

pub use config::{Config, RotatorConfig, RotatorTimings, TrailConfig};
pub use error::{Error, Result};
pub use host::{Event, EventKind, FrameId, Host, ListenerId, TimerId};
pub use overlay::{ScrollLock, ScrollLockGuard};
pub use particle::Particle;
pub use pool::ParticlePool;
pub use rotator::{Mode, Rotator};
pub use surface::{Canvas, CircleStyle, Color, DrawCommand, SharedCanvas, Viewport};
pub use trail::ParticleTrail;
pub use typewriter::{Caret, TypedLine, Typewriter};
