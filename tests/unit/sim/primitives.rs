use super::*;

fn vp() -> Viewport {
    Viewport::new(800, 600).unwrap()
}

#[test]
fn rng_is_deterministic() {
    let mut a = Rng64::new(123);
    let mut b = Rng64::new(123);
    for _ in 0..10 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn rng_ranges_stay_in_bounds() {
    let mut rng = Rng64::new(9);
    for _ in 0..1000 {
        let v = rng.range(30.0, 80.0);
        assert!((30.0..80.0).contains(&v));
        let s = rng.symmetric(200.0);
        assert!((-200.0..200.0).contains(&s));
        assert!(rng.index(7) < 7);
        assert!(vp().contains(rng.point_in(vp())));
    }
}

#[test]
fn forked_streams_diverge() {
    let mut root = Rng64::new(1);
    let mut a = root.fork(1);
    let mut b = root.fork(1);
    assert_ne!(a.next_u64(), b.next_u64());
}

#[test]
fn flow_field_is_continuous_in_space() {
    let a = flow_field_angle(Point::new(100.0, 100.0), vp());
    let b = flow_field_angle(Point::new(100.5, 100.0), vp());
    assert!((a - b).abs() < 0.01);
}

#[test]
fn pseudo_noise_is_bounded() {
    for i in 0..100 {
        let p = Point::new(i as f64 * 37.0, i as f64 * 11.0);
        let v = pseudo_noise_angle(p, i as f64 * 0.005);
        assert!(v.abs() <= TAU + 1e-12);
    }
}

#[test]
fn approach_angle_moves_a_fixed_fraction() {
    let next = approach_angle(1.0, 3.0, 0.05);
    assert!((next - 1.1).abs() < 1e-12);
}

#[test]
fn wrap_edges_lands_inside_viewport() {
    let v = vp();
    for p in [
        Point::new(-1.0, 10.0),
        Point::new(801.0, 10.0),
        Point::new(10.0, -3.0),
        Point::new(10.0, 601.0),
        Point::new(-5.0, 700.0),
    ] {
        assert!(v.contains(wrap_edges(p, v)));
    }
}

#[test]
fn margin_wrap_tolerates_overshoot_up_to_margin() {
    let v = vp();
    let p = wrap_with_margin(Point::new(-40.0, 10.0), v, 50.0);
    assert_eq!(p.x, -40.0);
    let p = wrap_with_margin(Point::new(-51.0, 10.0), v, 50.0);
    assert_eq!(p.x, 850.0);
    let p = wrap_with_margin(Point::new(10.0, 651.0), v, 50.0);
    assert_eq!(p.y, -50.0);
}

#[test]
fn projection_scale_at_near_depth() {
    let persp = Perspective::new(400.0, Point::new(400.0, 300.0));
    let s = persp.scale(-360.0).unwrap();
    assert!((s - 10.0).abs() < 1e-9);
    assert!(persp.scale(-400.0).is_none());
    assert!(persp.scale(-500.0).is_none());
}

#[test]
fn projection_scale_strictly_decreases_with_depth() {
    let persp = Perspective::new(400.0, Point::ZERO);
    let mut prev = f64::INFINITY;
    let mut z = -399.0;
    while z <= 1000.0 {
        let s = persp.scale(z).unwrap();
        assert!(s > 0.0 && s.is_finite());
        assert!(s < prev);
        prev = s;
        z += 7.0;
    }
}

#[test]
fn projection_maps_origin_to_center() {
    let persp = Perspective::new(400.0, Point::new(400.0, 300.0));
    let p = persp.project(0.0, 0.0, 250.0).unwrap();
    assert_eq!(p.pos, Point::new(400.0, 300.0));
    let p = persp.project(100.0, -50.0, 0.0).unwrap();
    assert_eq!(p.pos, Point::new(500.0, 250.0));
    assert_eq!(p.scale, 1.0);
}
