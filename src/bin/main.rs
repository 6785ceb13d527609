use std::{path::PathBuf, time::Instant};

use anyhow::Context as _;
use clap::Parser;
use eframe::egui;
use portfolio_fx::{
    Color, Config, DrawCommand, Event, Host, ParticleTrail, ScrollLock, ScrollLockGuard,
    Typewriter, Viewport,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const INITIAL_WINDOW_SIZE: egui::Vec2 = egui::vec2(1280.0, 800.0);
const HERO_TEXT_SIZE: f32 = 40.0;
const CARET_COLOR: egui::Color32 = egui::Color32::from_rgb(0x7c, 0xd4, 0xff);

#[derive(Parser, Debug)]
#[command(version, about = "Portfolio hero page with a particle trail and typed-text rotator")]
struct Args {
    /// TOML file with [trail] and [rotator] sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for particle velocities
    #[arg(long)]
    seed: Option<u64>,
}

fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

struct Showcase {
    host: Host,
    trail: ParticleTrail,
    typewriter: Typewriter,
    scroll_lock: ScrollLock,
    contact_sheet: Option<ScrollLockGuard>,
    last_frame_time: Instant,
    frame_seconds: f32,
}

impl Showcase {
    fn new(cc: &eframe::CreationContext, config: Config, typewriter: Typewriter) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let mut host = Host::new(Viewport::new(INITIAL_WINDOW_SIZE.x, INITIAL_WINDOW_SIZE.y));
        let mut trail = ParticleTrail::new(config.trail);
        let mut typewriter = typewriter;
        trail.mount(&mut host);
        typewriter.mount(&mut host);

        Self {
            host,
            trail,
            typewriter,
            scroll_lock: ScrollLock::new(),
            contact_sheet: None,
            last_frame_time: Instant::now(),
            frame_seconds: 0.0,
        }
    }

    /// Feed window size changes and pointer motion into the host.
    fn forward_input(&mut self, ctx: &egui::Context) {
        let (screen, moves) = ctx.input(|i| {
            let moves: Vec<_> = i
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::PointerMoved(pos) => Some(cgmath::vec2(pos.x, pos.y)),
                    _ => None,
                })
                .collect();
            (i.screen_rect(), moves)
        });

        let viewport = Viewport::new(screen.width(), screen.height());
        if viewport != self.host.viewport() {
            self.host.dispatch(Event::Resize(viewport));
        }
        for position in moves {
            self.host.dispatch(Event::PointerMove(position));
        }
    }

    fn render_hero(&mut self, ui: &mut egui::Ui) {
        let line = self.typewriter.line(self.host.now());
        let caret = if line.caret_visible {
            CARET_COLOR
        } else {
            egui::Color32::TRANSPARENT
        };

        ui.add_space(160.0);
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new("Hello, I work in").size(24.0));
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(line.text)
                        .size(HERO_TEXT_SIZE)
                        .monospace()
                        .strong(),
                );
                ui.label(
                    egui::RichText::new("|")
                        .size(HERO_TEXT_SIZE)
                        .monospace()
                        .color(caret),
                );
            });
            ui.add_space(24.0);
            if ui.button("Contact").clicked() {
                self.contact_sheet = Some(self.scroll_lock.acquire());
            }
        });
        ui.add_space(800.0);
    }

    fn render_contact_sheet(&mut self, ctx: &egui::Context) {
        let mut open = self.contact_sheet.is_some();
        let mut close_clicked = false;
        egui::Window::new("Contact")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("Send a message and I'll get back to you.");
                if ui.button("Close").clicked() {
                    close_clicked = true;
                }
            });
        if !open || close_clicked {
            self.contact_sheet = None;
        }
    }

    fn render_stats(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(format!("FPS: {:.1}", 1.0 / self.frame_seconds.max(f32::EPSILON)));
            ui.separator();
            ui.label(format!("Particles: {}", self.trail.particle_count()));
            ui.separator();
            ui.label(format!("Rotator: {:?}", self.typewriter.mode()));
        });
    }

    /// Paint the trail's latest frame on a foreground layer that takes no input.
    fn paint_trail(&self, ctx: &egui::Context) {
        let Some(canvas) = self.trail.canvas() else {
            return;
        };
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("particle_trail"),
        ));

        for command in canvas.lock().commands() {
            let DrawCommand::Circle {
                center,
                radius,
                style,
            } = *command;
            painter.circle(
                egui::pos2(center.x, center.y),
                radius,
                to_color32(style.fill),
                egui::Stroke::new(style.stroke_width, to_color32(style.stroke)),
            );
        }
    }
}

impl eframe::App for Showcase {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let current_time = Instant::now();
        let frame_time = current_time.duration_since(self.last_frame_time);
        self.last_frame_time = current_time;
        self.frame_seconds = frame_time.as_secs_f32();

        self.host.advance(frame_time);
        self.forward_input(ctx);
        self.host.run_frame();

        egui::TopBottomPanel::bottom("stats").show(ctx, |ui| self.render_stats(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .enable_scrolling(!self.scroll_lock.is_locked())
                .show(ui, |ui| self.render_hero(ui));
        });
        self.render_contact_sheet(ctx);
        self.paint_trail(ctx);

        ctx.request_repaint();
    }
}

impl Drop for Showcase {
    fn drop(&mut self) {
        self.trail.unmount(&mut self.host);
        self.typewriter.unmount(&mut self.host);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    if args.seed.is_some() {
        config.trail.seed = args.seed;
    }
    let typewriter = Typewriter::new(&config.rotator).context("invalid rotator configuration")?;
    info!(phrases = config.rotator.phrases.len(), "starting showcase");

    eframe::run_native(
        "Portfolio FX",
        eframe::NativeOptions {
            renderer: eframe::Renderer::Wgpu,
            initial_window_size: Some(INITIAL_WINDOW_SIZE),
            vsync: true,
            ..Default::default()
        },
        Box::new(move |cc| Box::new(Showcase::new(cc, config, typewriter))),
    )
    .map_err(|err| anyhow::anyhow!("showcase window failed: {err}"))
}
