use super::*;

fn vp(w: u32, h: u32) -> Viewport {
    Viewport::new(w, h).unwrap()
}

fn ctx(viewport: Viewport, frame: u64) -> FrameCtx {
    FrameCtx {
        local_frame: frame,
        local_secs: frame as f64 / 60.0,
        clock_secs: frame as f64 / 60.0,
        viewport,
    }
}

fn field(mode: VisualMode, viewport: Viewport) -> ParticleField {
    let mut f = ParticleField::new(mode, Rgb8::new(0x3b, 0x82, 0xf6), 7, ParticleFieldOpts::default());
    f.init(viewport);
    f
}

#[test]
fn count_is_stable_across_reinit() {
    let v = vp(800, 600);
    let mut f = field(VisualMode::Grid, v);
    let first = f.len();
    f.init(v);
    assert_eq!(f.len(), first);
    assert_eq!(first, ParticleFieldOpts::default().particle_count(v));
    assert_eq!(first, 480);
}

#[test]
fn count_respects_device_class_cap() {
    let opts = ParticleFieldOpts::default();
    assert_eq!(opts.particle_count(vp(1920, 1080)), 800);
    assert_eq!(opts.particle_count(vp(700, 1400)), 400);
    assert_eq!(opts.particle_count(vp(10, 10)), 1);
}

#[test]
fn lattice_has_at_least_one_row_and_column() {
    let l = Lattice::for_count(1, vp(10, 1000));
    assert_eq!((l.cols, l.rows), (1, 1));
    let l = Lattice::for_count(480, vp(800, 600));
    assert_eq!(l.cols, 25);
    assert_eq!(l.rows, 19);
    let home = l.home(0);
    assert!((home.x - 16.0).abs() < 1e-9);
}

#[test]
fn initial_attributes_are_in_range() {
    let v = vp(800, 600);
    let f = field(VisualMode::Chaos, v);
    for p in &f.particles {
        assert!(v.contains(p.pos));
        assert!((-1.0..1.0).contains(&p.vel.x) && (-1.0..1.0).contains(&p.vel.y));
        assert!((1.0..3.0).contains(&p.size));
        assert!((0.0..100.0).contains(&p.phase));
        assert!((0.0..1.0).contains(&p.alpha));
        assert!((0.0..100.0).contains(&p.life));
    }
}

#[test]
fn grid_spring_approaches_home_without_overshoot() {
    let v = vp(800, 600);
    let mut f = field(VisualMode::Grid, v);
    let mut prev: Vec<f64> = f.particles.iter().map(|p| (p.home - p.pos).hypot()).collect();
    for frame in 0..60 {
        f.step(&ctx(v, frame));
        for (p, d_prev) in f.particles.iter().zip(prev.iter_mut()) {
            let d = (p.home - p.pos).hypot();
            assert!(d <= *d_prev + 1e-9);
            *d_prev = d;
        }
    }
}

#[test]
fn flow_particle_leaving_viewport_respawns_invisible() {
    let v = vp(800, 600);
    let mut f = field(VisualMode::Flow, v);
    f.particles[0].pos = Point::new(900.0, 300.0);
    f.particles[0].alpha = 0.5;
    f.step(&ctx(v, 0));
    let p = f.particles[0];
    assert_eq!(p.alpha, 0.0);
    assert!((0.0..=800.0).contains(&p.pos.x));
    assert!((0.0..=600.0).contains(&p.pos.y));
}

#[test]
fn flow_alpha_rises_to_cap() {
    let v = vp(800, 600);
    let mut f = field(VisualMode::Flow, v);
    for frame in 0..200 {
        f.step(&ctx(v, frame));
        for p in &f.particles {
            assert!(p.alpha <= 1.0);
            assert!(v.contains(p.pos));
        }
    }
}

#[test]
fn network_wrap_keeps_particles_near_viewport() {
    let v = vp(800, 600);
    let mut f = field(VisualMode::Network, v);
    f.particles[0].pos = Point::new(-60.0, 700.0);
    f.step(&ctx(v, 0));
    for frame in 1..120 {
        f.step(&ctx(v, frame));
    }
    for p in &f.particles {
        assert!(p.pos.x >= -51.0 && p.pos.x <= 851.0);
        assert!(p.pos.y >= -51.0 && p.pos.y <= 651.0);
    }
}

#[test]
fn network_edges_link_only_close_pairs() {
    let v = vp(800, 600);
    let mut f = field(VisualMode::Network, v);
    for p in &mut f.particles {
        p.pos = Point::new(700.0, 500.0);
    }
    f.particles[0].pos = Point::new(0.0, 0.0);
    f.particles[1].pos = Point::new(30.0, 40.0);
    let edges = f.network_edges();
    let from_origin: Vec<_> = edges.iter().filter(|(a, _, _)| a.x == 0.0).collect();
    assert_eq!(from_origin.len(), 1);
    assert!((from_origin[0].2 - 0.75).abs() < 1e-6);
}

#[test]
fn convergence_respawns_particles_at_centre() {
    let v = vp(800, 600);
    let mut f = field(VisualMode::Convergence, v);
    f.particles[0].pos = Point::new(402.0, 301.0);
    f.step(&ctx(v, 0));
    let d = (f.particles[0].pos - v.center()).hypot();
    assert!(v.contains(f.particles[0].pos));
    assert!(d != (Point::new(402.0, 301.0) - v.center()).hypot());
}

#[test]
fn chaos_bounce_reverses_velocity() {
    let v = vp(800, 600);
    let mut f = field(VisualMode::Chaos, v);
    f.particles[0].pos = Point::new(799.0, 300.0);
    f.particles[0].vel = Vec2::new(1.0, 0.0);
    f.step(&ctx(v, 0));
    assert_eq!(f.particles[0].vel.x, -1.0);
}

#[test]
fn explosion_drifts_at_half_speed_and_bounces() {
    let v = vp(800, 600);
    let mut f = field(VisualMode::Explosion, v);
    f.particles[0].pos = Point::new(400.0, 300.0);
    f.particles[0].vel = Vec2::new(1.0, -1.0);
    f.step(&ctx(v, 0));
    assert_eq!(f.particles[0].pos, Point::new(400.5, 299.5));
    assert_eq!(f.particles[0].vel, Vec2::new(1.0, -1.0));

    f.particles[1].pos = Point::new(0.2, 300.0);
    f.particles[1].vel = Vec2::new(-1.0, 0.0);
    f.step(&ctx(v, 1));
    assert!((f.particles[1].pos.x + 0.3).abs() < 1e-12);
    assert_eq!(f.particles[1].vel.x, 1.0);
}

#[test]
fn resize_recomputes_count() {
    let small = vp(800, 600);
    let mut f = field(VisualMode::Grid, small);
    f.step(&ctx(small, 0));
    assert_eq!(f.len(), 480);

    let large = vp(1920, 1080);
    f.step(&ctx(large, 1));
    assert_eq!(f.len(), 800);
    assert!(f.particles.iter().all(|p| large.contains(p.home)));
}

#[test]
fn retune_restarts_state_and_keeps_count() {
    let v = vp(800, 600);
    let mut f = field(VisualMode::Grid, v);
    let before = f.len();
    for frame in 0..10 {
        f.step(&ctx(v, frame));
    }
    f.retune(VisualMode::Flow, Rgb8::new(1, 2, 3));
    assert_eq!(f.mode(), VisualMode::Flow);
    assert_eq!(f.accent(), Rgb8::new(1, 2, 3));
    assert_eq!(f.len(), before);
}

#[test]
fn render_draws_into_surface() {
    let v = vp(64, 48);
    let mut f = field(VisualMode::Chaos, v);
    let mut surface = Surface::new(v).unwrap();
    f.render(&ctx(v, 0), &mut surface);
    assert!(surface.data().chunks_exact(4).any(|px| px[3] > 0));
}
