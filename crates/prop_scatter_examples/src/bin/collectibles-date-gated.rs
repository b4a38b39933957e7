use std::path::Path;

use glam::Vec3;
use prop_scatter::prelude::*;
use prop_scatter_examples::{init_tracing, log_instances, FlatGround};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Five eggs at most, hidden until Easter unless it is dark enough.
    let mut planner = PlacementPlanner::try_new(PlannerConfig::collectibles())?;
    planner.create_area(Volume::from_size(Vec3::new(0.0, 1.0, 0.0), Vec3::splat(6.0)))?;

    let mut scene = MemoryScene::new();
    let mut rng = StdRng::seed_from_u64(2025);
    let ground = FlatGround { height: 0.0 };

    let easter = RuleAssignment::new(VisibilityRule::date_or_light(
        Occasion::Easter.date().unwrap_or_default(),
        0.25,
    ))
    .with_label(Occasion::Easter.label());
    let cmd = PlaceBatchCommand::new(Template::new("Egg"), 4)
        .with_constraints(
            PlacementConstraints::collectibles()
                .with_random_rotation(true)
                .with_snap_to_ground(true),
        )
        .with_rules(easter);

    let eggs = planner.place_batch(&cmd, &mut scene, Probes::new(&ground, &NoObstacles), &mut rng)?;
    log_instances(&eggs);
    for egg in &eggs {
        scene.set_material(egg.node, "PastelShell")?;
    }

    // A fifth egg fits; a sixth would exceed the cap.
    let golden = PlaceBatchCommand::single(Template::new("Egg"))
        .with_name("GoldenEgg")
        .with_rules(RuleAssignment::always_visible());
    planner.place_batch(&golden, &mut scene, Probes::none(), &mut rng)?;
    if let Err(e) = planner.place_batch(&golden, &mut scene, Probes::none(), &mut rng) {
        tracing::warn!("Sixth egg rejected: {e}");
    }

    let engine = VisibilityEngine::without_whitelists();
    for (date, light) in [("04/08", 1.0), ("04/09", 1.0), ("04/08", 0.1)] {
        let ctx = ViewerContext::new(date).with_ambient_light(light);
        let revealed = engine.apply(planner.placed(), &ctx, &mut scene)?;
        tracing::info!(
            "{date} light {light:.2}: {revealed}/{} revealed",
            planner.placed().len()
        );
    }

    PlacementReport::new(planner.placed())
        .write_to(&scene, Path::new("target/demo/egg_placement_info.txt"))?;
    Ok(())
}
