//! Pointer-following particle trail.
//!
//! Every pointer move spawns one particle at the pointer; every display frame
//! clears the canvas, ages and draws every particle, and drops the expired
//! ones. The frame chain is owned by the engine and cancelled on unmount.
//! Host callbacks only hold weak references, so dropping a mounted trail
//! ends the chain and its subscriptions at the next frame.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, trace};

use crate::{
    config::TrailConfig,
    host::{Event, EventKind, FrameId, Host, ListenerId},
    particle::Particle,
    pool::ParticlePool,
    surface::{CircleStyle, SharedCanvas},
};

struct TrailState {
    pool: ParticlePool,
    canvas: SharedCanvas,
    rng: StdRng,
    lifespan: u32,
    max_radius: f32,
    style: CircleStyle,
    frame: Option<FrameId>,
    running: bool,
}

impl TrailState {
    fn spawn(&mut self, position: cgmath::Vector2<f32>) {
        let particle = Particle::spawn(position, self.lifespan, &mut self.rng);
        self.pool.spawn(particle);
    }

    fn render_frame(&mut self) {
        let mut canvas = self.canvas.lock();
        canvas.clear();

        let (lifespan, max_radius, style) = (self.lifespan, self.max_radius, self.style);
        self.pool.step(|particle| {
            let radius = max_radius * particle.render_scale(lifespan);
            canvas.circle(particle.position, radius, style);
        });
    }
}

struct Mounted {
    state: Arc<Mutex<TrailState>>,
    listeners: [ListenerId; 2],
}

pub struct ParticleTrail {
    config: TrailConfig,
    mounted: Option<Mounted>,
}

impl ParticleTrail {
    pub fn new(config: TrailConfig) -> Self {
        Self {
            config,
            mounted: None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Canvas the trail draws into while mounted.
    pub fn canvas(&self) -> Option<SharedCanvas> {
        self.mounted
            .as_ref()
            .map(|mounted| Arc::clone(&mounted.state.lock().canvas))
    }

    /// Number of live particles; zero while unmounted.
    pub fn particle_count(&self) -> usize {
        self.mounted
            .as_ref()
            .map_or(0, |mounted| mounted.state.lock().pool.len())
    }

    /// Snapshot of live particles, for inspection.
    pub fn particles(&self) -> Vec<Particle> {
        self.mounted
            .as_ref()
            .map(|mounted| mounted.state.lock().pool.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Acquire a canvas, subscribe to resize and pointer moves, and start the
    /// frame loop. Without a 2D context the trail stays disabled.
    pub fn mount(&mut self, host: &mut Host) {
        if self.mounted.is_some() {
            return;
        }
        let Some(canvas) = host.create_canvas() else {
            debug!("no 2d context available, particle trail disabled");
            return;
        };

        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = Arc::new(Mutex::new(TrailState {
            pool: ParticlePool::with_capacity(self.config.capacity),
            canvas,
            rng,
            lifespan: self.config.lifespan,
            max_radius: self.config.max_radius,
            style: self.config.style(),
            frame: None,
            running: true,
        }));

        let on_resize = {
            let state = Arc::downgrade(&state);
            host.subscribe(
                EventKind::Resize,
                Box::new(move |_, event| {
                    let (Event::Resize(viewport), Some(state)) = (*event, state.upgrade()) else {
                        return;
                    };
                    trace!(width = viewport.width, height = viewport.height, "resizing trail canvas");
                    state.lock().canvas.lock().set_size(viewport);
                }),
            )
        };
        let on_move = {
            let state = Arc::downgrade(&state);
            host.subscribe(
                EventKind::PointerMove,
                Box::new(move |_, event| {
                    let (Event::PointerMove(position), Some(state)) = (*event, state.upgrade()) else {
                        return;
                    };
                    state.lock().spawn(position);
                }),
            )
        };

        let listeners = [on_resize, on_move];
        schedule_frame(host, Arc::downgrade(&state), listeners);
        debug!(viewport = ?host.viewport(), "particle trail mounted");
        self.mounted = Some(Mounted { state, listeners });
    }

    /// Remove subscriptions and cancel the pending frame. Safe to call
    /// repeatedly or without a prior mount.
    pub fn unmount(&mut self, host: &mut Host) {
        let Some(mounted) = self.mounted.take() else {
            return;
        };
        for listener in mounted.listeners {
            host.unsubscribe(listener);
        }

        let mut state = mounted.state.lock();
        state.running = false;
        if let Some(frame) = state.frame.take() {
            host.cancel_frame(frame);
        }
        debug!(particles = state.pool.len(), "particle trail unmounted");
    }
}

impl Drop for ParticleTrail {
    fn drop(&mut self) {
        if self.mounted.is_some() {
            debug!("particle trail dropped while mounted; host callbacks end at the next frame");
        }
    }
}

/// Queue the next frame. Once the trail is gone the chain stops and takes
/// the trail's subscriptions with it.
fn schedule_frame(host: &mut Host, state: Weak<Mutex<TrailState>>, listeners: [ListenerId; 2]) {
    let Some(strong) = state.upgrade() else {
        return;
    };
    let frame = host.request_frame(Box::new(move |host| {
        let Some(strong) = state.upgrade() else {
            for listener in listeners {
                host.unsubscribe(listener);
            }
            debug!("particle trail dropped, frame loop stopped");
            return;
        };
        {
            let mut guard = strong.lock();
            guard.frame = None;
            if !guard.running {
                return;
            }
            guard.render_frame();
        }
        drop(strong);
        schedule_frame(host, state, listeners);
    }));
    strong.lock().frame = Some(frame);
}
