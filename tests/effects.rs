use std::time::Duration;

use portfolio_fx::{
    Config, Event, Host, Mode, ParticleTrail, RotatorConfig, TrailConfig, Typewriter, Viewport,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn host() -> Host {
    Host::new(Viewport::new(1024.0, 768.0))
}

fn trail(host: &mut Host) -> ParticleTrail {
    let mut trail = ParticleTrail::new(TrailConfig {
        seed: Some(0xfeed),
        ..TrailConfig::default()
    });
    trail.mount(host);
    trail
}

fn typewriter(host: &mut Host, phrases: &[&str]) -> Typewriter {
    let config = RotatorConfig {
        phrases: phrases.iter().map(|p| p.to_string()).collect(),
        ..RotatorConfig::default()
    };
    let mut typewriter = Typewriter::new(&config).unwrap();
    typewriter.mount(host);
    typewriter
}

#[test]
fn rotator_full_cycle_on_the_host_clock() {
    let mut host = host();
    let mut tw = typewriter(&mut host, &["AB", "CD"]);
    assert_eq!((tw.active_index(), tw.visible_chars(), tw.mode()), (0, 0, Mode::Typing));

    host.advance(ms(200));
    assert_eq!((tw.visible_chars(), tw.text().as_str()), (2, "AB"));

    host.advance(ms(2000));
    assert_eq!(tw.mode(), Mode::Deleting);

    host.advance(ms(100));
    assert_eq!(
        (tw.visible_chars(), tw.active_index(), tw.mode()),
        (0, 1, Mode::Typing)
    );

    // Pause after switching phrases before the first character appears.
    host.advance(ms(799));
    assert_eq!(tw.text(), "");
    host.advance(ms(1));
    assert_eq!(tw.text(), "C");
    tw.unmount(&mut host);
}

#[test]
fn rotator_wraps_after_last_phrase() {
    let mut host = host();
    let tw = typewriter(&mut host, &["a", "b", "c"]);

    // Per phrase: type 100, hold 2000, delete 50. Later phrases wait 800
    // instead of 100 for their first character.
    host.advance(ms(2150 + 2 * 2850));
    assert_eq!((tw.active_index(), tw.mode()), (0, Mode::Typing));
}

#[test]
fn rotator_never_has_two_ticks_pending() {
    let mut host = host();
    let mut tw = typewriter(&mut host, &["Computer Science", "", "Freelancer"]);
    for _ in 0..5000 {
        host.advance(ms(7));
        assert_eq!(host.pending_timers(), 1);
    }
    tw.unmount(&mut host);
    assert_eq!(host.pending_timers(), 0);
}

#[test]
fn teardown_is_idempotent_for_both_engines() {
    let mut host = host();
    let mut trail = trail(&mut host);
    let mut tw = typewriter(&mut host, &["x"]);
    host.dispatch(Event::PointerMove(cgmath::vec2(5.0, 5.0)));
    host.run_frame();
    host.advance(ms(500));

    for _ in 0..2 {
        trail.unmount(&mut host);
        tw.unmount(&mut host);
    }
    assert_eq!(
        (host.pending_timers(), host.pending_frames(), host.listener_count()),
        (0, 0, 0)
    );

    let mut fresh_trail = ParticleTrail::new(TrailConfig::default());
    let mut fresh_tw = Typewriter::new(&RotatorConfig::default()).unwrap();
    fresh_trail.unmount(&mut host);
    fresh_tw.unmount(&mut host);
}

#[test]
fn dropped_engines_leave_nothing_scheduled() {
    let mut host = host();
    {
        let _trail = trail(&mut host);
        let _tw = typewriter(&mut host, &["AB"]);
        host.dispatch(Event::PointerMove(cgmath::vec2(5.0, 5.0)));
    }

    host.run_frame();
    host.advance(ms(100));
    assert_eq!(
        (host.pending_frames(), host.pending_timers(), host.listener_count()),
        (0, 0, 0)
    );
}

#[test]
fn engines_share_a_host_without_interfering() {
    let mut host = host();
    let mut trail = trail(&mut host);
    let mut tw = typewriter(&mut host, &["Freelancer"]);

    for step in 0..120u32 {
        host.dispatch(Event::PointerMove(cgmath::vec2(step as f32, 300.0)));
        host.advance(Duration::from_micros(16_667));
        host.run_frame();
    }

    // Particles spawned in the first 21 frames have expired.
    assert_eq!(trail.particle_count(), 99);
    assert_eq!(tw.text(), "Freelancer");
    trail.unmount(&mut host);
    tw.unmount(&mut host);
}

#[test]
fn config_file_drives_both_engines() {
    let config = Config::from_toml_str(
        r##"
        [trail]
        lifespan = 10
        seed = 3

        [rotator]
        phrases = ["Hi"]
        type_delay_ms = 10
        "##,
    )
    .unwrap();

    let mut host = host();
    let mut trail = ParticleTrail::new(config.trail.clone());
    let mut tw = Typewriter::new(&config.rotator).unwrap();
    trail.mount(&mut host);
    tw.mount(&mut host);

    host.dispatch(Event::PointerMove(cgmath::vec2(0.0, 0.0)));
    for _ in 0..9 {
        host.run_frame();
    }
    assert_eq!(trail.particle_count(), 1);
    host.run_frame();
    assert_eq!(trail.particle_count(), 0);

    host.advance(ms(20));
    assert_eq!(tw.text(), "Hi");
    trail.unmount(&mut host);
    tw.unmount(&mut host);
}

proptest! {
    #[test]
    fn lifecycle_holds_for_any_move_schedule(
        moves_per_frame in prop::collection::vec(0usize..4, 1..150),
    ) {
        let mut host = host();
        let mut trail = trail(&mut host);
        let mut births: Vec<usize> = Vec::new();

        for (frame, &moves) in moves_per_frame.iter().enumerate() {
            for _ in 0..moves {
                host.dispatch(Event::PointerMove(cgmath::vec2(10.0, 10.0)));
                births.push(frame);
            }
            host.run_frame();

            // A particle born before frame `b` has been aged (frame - b + 1)
            // times; it is live exactly while that is below 100.
            let mut expected: Vec<i32> = births
                .iter()
                .map(|&b| 100 - (frame - b + 1) as i32)
                .filter(|&life| life > 0)
                .collect();
            let mut actual: Vec<i32> = trail.particles().iter().map(|p| p.remaining_life).collect();
            expected.sort_unstable();
            actual.sort_unstable();
            prop_assert_eq!(actual, expected);
        }

        let before = trail.particle_count();
        host.dispatch(Event::Resize(Viewport::new(640.0, 480.0)));
        prop_assert_eq!(trail.particle_count(), before);
        trail.unmount(&mut host);
    }
}
