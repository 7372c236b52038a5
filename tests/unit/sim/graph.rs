use super::*;

fn vp() -> Viewport {
    Viewport::new(800, 600).unwrap()
}

fn ctx(frame: u64) -> FrameCtx {
    FrameCtx {
        local_frame: frame,
        local_secs: frame as f64 / 60.0,
        clock_secs: frame as f64 / 60.0,
        viewport: vp(),
    }
}

fn graph(opts: GraphOpts) -> GraphAutomaton {
    let mut g = GraphAutomaton::new(Rgb8::new(0xa8, 0x55, 0xf7), 11, opts);
    g.init(vp());
    g
}

#[test]
fn starts_from_a_single_central_seed() {
    let g = graph(GraphOpts::default());
    assert_eq!(g.len(), 1);
    let seed = g.nodes[0];
    assert_eq!(seed.pos, Point::new(400.0, 300.0));
    assert_eq!(seed.radius, 0.0);
    assert!(seed.parent.is_none());
}

#[test]
fn new_nodes_have_valid_parents_inside_viewport() {
    let mut g = graph(GraphOpts::default());
    for frame in 0..400 {
        let before = g.len();
        g.step(&ctx(frame));
        if g.len() > before {
            let node = *g.nodes.last().unwrap();
            let parent = node.parent.unwrap();
            assert!(parent < before);
            let d = (node.pos - g.nodes[parent].pos).hypot();
            assert!((30.0 - 1e-9..80.0 + 1e-9).contains(&d));
            assert!(vp().contains_strict(node.pos));
            assert_eq!(node.radius, 3.0);
        }
    }
}

#[test]
fn growth_only_on_interval_frames_and_below_limit() {
    let mut g = graph(GraphOpts::default());
    g.step(&ctx(1));
    g.step(&ctx(2));
    assert_eq!(g.len(), 1);
    for frame in 0..5000 {
        g.step(&ctx(frame));
    }
    assert!(g.len() <= 200);
}

#[test]
fn node_count_never_exceeds_cap() {
    let opts = GraphOpts {
        growth_interval: 1,
        growth_limit: usize::MAX,
        ..GraphOpts::default()
    };
    let mut g = graph(opts);
    let mut saw_eviction = false;
    for frame in 0..1500 {
        let before = g.len();
        g.step(&ctx(frame));
        assert!(g.len() <= 300);
        saw_eviction |= g.len() < before;
    }
    assert!(saw_eviction);
}

#[test]
fn eviction_keeps_stale_parent_indices() {
    let opts = GraphOpts {
        growth_interval: 1,
        growth_limit: usize::MAX,
        max_nodes: 20,
        evict_block: 10,
        ..GraphOpts::default()
    };
    let mut g = graph(opts);
    for frame in 0..200 {
        g.step(&ctx(frame));
    }
    // After evictions nodes still carry indices taken before the shift.
    assert!(g.nodes.iter().all(|n| n.parent.is_some()));
    assert!(g.len() <= 20);
}

#[test]
fn ages_advance_every_step() {
    let mut g = graph(GraphOpts::default());
    g.step(&ctx(1));
    g.step(&ctx(2));
    assert_eq!(g.nodes[0].age, 2);
}

#[test]
fn renders_with_dangling_parents() {
    let mut g = graph(GraphOpts::default());
    g.nodes.push(GraphNode {
        pos: Point::new(10.0, 10.0),
        radius: 3.0,
        parent: Some(999),
        age: 0,
    });
    let mut surface = Surface::new(vp()).unwrap();
    g.render(&ctx(0), &mut surface);
    assert!(surface.data().chunks_exact(4).any(|px| px[3] > 0));
}
