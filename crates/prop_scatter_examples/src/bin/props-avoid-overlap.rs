use glam::Vec3;
use prop_scatter::prelude::*;
use prop_scatter_examples::{init_tracing, log_instances, FlatGround, SphereObstacles};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut planner = PlacementPlanner::try_new(PlannerConfig::props())?;
    let mut scene = MemoryScene::new();
    let mut rng = StdRng::seed_from_u64(7);

    let ground = FlatGround { height: 0.0 };
    let obstacles = SphereObstacles::new()
        .with_sphere(Vec3::new(0.0, 0.0, 0.0), 2.5)
        .with_sphere(Vec3::new(4.0, 0.0, -3.0), 1.5)
        .with_sphere(Vec3::new(-5.0, 0.0, 4.0), 2.0);

    let constraints = PlacementConstraints::props()
        .with_random_rotation(true)
        .with_snap_to_ground(true)
        .with_avoid_overlap(0.75)
        .with_max_attempts(16);

    // Pumpkins appear on Halloween or whenever it gets dark.
    let pumpkins = PlaceBatchCommand::new(Template::new("Pumpkin").with_name_prefix("Prop"), 20)
        .with_constraints(constraints)
        .with_rules(
            RuleAssignment::new(VisibilityRule::date_or_light("10/31", 0.3))
                .with_label(Occasion::Halloween.label()),
        )
        .with_overlap_policy(OverlapPolicy::SkipInstance);

    let mut sink = VecSink::new();
    planner.create_area(Volume::from_size(Vec3::new(0.0, 1.0, 0.0), Vec3::new(16.0, 2.0, 16.0)))?;
    let placed = planner.place_batch_with_events(
        &pumpkins,
        &mut scene,
        Probes::new(&ground, &obstacles),
        &mut rng,
        &mut sink,
    )?;
    log_instances(&placed);
    tracing::info!(
        "{} placed, {} skipped after exhausting attempts.",
        sink.count(PlacementEventKind::InstancePlaced),
        sink.count(PlacementEventKind::InstanceSkipped)
    );

    // The props preset consumes the area; the next batch needs a new one.
    let lanterns = PlaceBatchCommand::new(Template::new("Lantern"), 5)
        .with_constraints(constraints)
        .with_rules(RuleAssignment::always_visible());
    if let Err(e) = planner.place_batch(&lanterns, &mut scene, Probes::new(&ground, &obstacles), &mut rng) {
        tracing::info!("Second batch refused as expected: {e}");
    }
    planner.create_area(Volume::from_size(Vec3::new(10.0, 1.0, 10.0), Vec3::new(6.0, 2.0, 6.0)))?;
    let placed = planner.place_batch(&lanterns, &mut scene, Probes::new(&ground, &obstacles), &mut rng)?;
    log_instances(&placed);

    let engine = VisibilityEngine::without_whitelists();
    let night = ViewerContext::new("10/30").with_ambient_light(0.1);
    let revealed = engine.apply(planner.placed(), &night, &mut scene)?;
    tracing::info!("At night {revealed}/{} props are revealed.", planner.placed().len());
    Ok(())
}
